//! Session settings, loaded from JSON pushed by the host page.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::table::{CANVAS, DEFAULT_TABLE_SIZE};
use crate::weather::{Weather, WeatherParams, WeatherTable};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid settings json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("table size {0} does not fit the canvas")]
    TableSize(f32),
    #[error("{weather} weather: {field} = {value} is out of range")]
    Weather {
        weather: &'static str,
        field: &'static str,
        value: f32,
    },
}

/// Everything a session can be started with. Missing fields take defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnookerConfig {
    /// Short side of the table; the long side is twice this.
    pub table_size: f32,
    /// Seed for rack scattering and weather particles.
    pub seed: u64,
    pub menu_visible: bool,
    pub aim_assist: bool,
    pub weather: Weather,
    pub weather_table: WeatherTable,
    pub rain_drops: usize,
    pub snow_flakes: usize,
}

impl Default for SnookerConfig {
    fn default() -> Self {
        Self {
            table_size: DEFAULT_TABLE_SIZE,
            seed: 0x5eed,
            menu_visible: true,
            aim_assist: false,
            weather: Weather::Normal,
            weather_table: WeatherTable::default(),
            rain_drops: 200,
            snow_flakes: 200,
        }
    }
}

impl SnookerConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let size = self.table_size;
        if !(size > 0.0 && 2.0 * size <= CANVAS.x && size <= CANVAS.y) {
            return Err(ConfigError::TableSize(size));
        }
        for weather in [Weather::Normal, Weather::Snow, Weather::Rain] {
            check_params(weather, &self.weather_table.params(weather))?;
        }
        Ok(())
    }
}

fn check_params(weather: Weather, p: &WeatherParams) -> Result<(), ConfigError> {
    let fields = [
        ("ball_restitution", p.ball_restitution, 0.0..=1.0),
        ("wall_restitution", p.wall_restitution, 0.0..=1.0),
        // A full loss per tick has no finite damping.
        ("air_friction", p.air_friction, 0.0..=0.99),
        ("strike_magnitude", p.strike_magnitude, 0.0..=1.0),
    ];
    for (field, value, range) in fields {
        if !range.contains(&value) {
            return Err(ConfigError::Weather {
                weather: weather.name(),
                field,
                value,
            });
        }
    }
    Ok(())
}
