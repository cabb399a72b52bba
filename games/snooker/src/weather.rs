//! Weather presets: each mode swaps the cloth and cushion physics.

use serde::{Deserialize, Serialize};

/// Active weather challenge. Cycles normal → snow → rain → normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weather {
    #[default]
    Normal,
    Snow,
    Rain,
}

impl Weather {
    pub fn next(self) -> Self {
        match self {
            Weather::Normal => Weather::Snow,
            Weather::Snow => Weather::Rain,
            Weather::Rain => Weather::Normal,
        }
    }

    /// Index used on the HUD event channel.
    pub fn index(self) -> u32 {
        match self {
            Weather::Normal => 0,
            Weather::Snow => 1,
            Weather::Rain => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Weather::Normal => "normal",
            Weather::Snow => "snow",
            Weather::Rain => "rain",
        }
    }
}

/// Physics parameters derived from a weather mode.
///
/// `air_friction` is the fraction of velocity lost per 60 Hz tick;
/// `strike_magnitude` scales cue pull into strike force.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherParams {
    pub ball_restitution: f32,
    pub wall_restitution: f32,
    pub air_friction: f32,
    pub strike_magnitude: f32,
}

impl WeatherParams {
    pub const NORMAL: Self = Self {
        ball_restitution: 0.95,
        wall_restitution: 0.85,
        air_friction: 0.0095,
        strike_magnitude: 0.00035,
    };

    /// Slippery table, hard walls.
    pub const SNOW: Self = Self {
        ball_restitution: 1.0,
        wall_restitution: 1.0,
        air_friction: 0.004,
        strike_magnitude: 0.0004,
    };

    /// Bogged table, slow balls.
    pub const RAIN: Self = Self {
        ball_restitution: 0.8,
        wall_restitution: 0.7,
        air_friction: 0.012,
        strike_magnitude: 0.0003,
    };

    /// Rapier linear damping that loses `air_friction` of the velocity
    /// every step of length `dt`.
    pub fn linear_damping(&self, dt: f32) -> f32 {
        let keep = (1.0 - self.air_friction).max(f32::EPSILON);
        self.air_friction / (keep * dt)
    }
}

impl Default for WeatherParams {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// Lookup from weather mode to its parameters. Overridable from settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherTable {
    pub normal: WeatherParams,
    pub snow: WeatherParams,
    pub rain: WeatherParams,
}

impl WeatherTable {
    pub fn params(&self, weather: Weather) -> WeatherParams {
        match weather {
            Weather::Normal => self.normal,
            Weather::Snow => self.snow,
            Weather::Rain => self.rain,
        }
    }
}

impl Default for WeatherTable {
    fn default() -> Self {
        Self {
            normal: WeatherParams::NORMAL,
            snow: WeatherParams::SNOW,
            rain: WeatherParams::RAIN,
        }
    }
}
