//! Cue stick: aiming, charging and striking the cue ball.

use glam::Vec2;
use snooker_engine::{keys, InputState};

/// Pointer presses closer than this to the handle pick up the stick.
pub const GRAB_RADIUS: f32 = 50.0;

/// Longest pull-back; stronger pulls are capped here.
pub const MAX_PULL: f32 = 100.0;

/// Key-mode turn rate in radians per tick.
const KEY_TURN: f32 = 0.02;

/// Key-mode power change per tick.
const KEY_POWER_STEP: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlMode {
    #[default]
    Pointer,
    Keys,
}

impl ControlMode {
    pub fn index(self) -> u32 {
        match self {
            ControlMode::Pointer => 0,
            ControlMode::Keys => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CueState {
    /// No cue ball, or balls are rolling.
    Hidden,
    /// Following the pointer, waiting to be picked up.
    Idle,
    /// Pulled back and aiming.
    Charging,
    /// Released this tick.
    Struck,
}

/// A strike request: unit direction and how far the stick was drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Strike {
    pub direction: Vec2,
    pub pull: f32,
}

impl Strike {
    pub fn force(&self, strike_magnitude: f32) -> Vec2 {
        self.direction * self.pull.min(MAX_PULL) * strike_magnitude
    }
}

/// Where to draw the stick this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StickPose {
    pub angle: f32,
    pub handle: Vec2,
    pub tip: Vec2,
}

#[derive(Debug)]
pub struct CueController {
    ball_diameter: f32,
    state: CueState,
    mode: ControlMode,
    angle: f32,
    pull: f32,
    key_angle: f32,
    key_power: f32,
}

impl CueController {
    pub fn new(ball_diameter: f32) -> Self {
        Self {
            ball_diameter,
            state: CueState::Hidden,
            mode: ControlMode::Pointer,
            angle: 0.0,
            pull: 0.0,
            key_angle: 0.0,
            key_power: 0.0,
        }
    }

    pub fn state(&self) -> CueState {
        self.state
    }

    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn pull(&self) -> f32 {
        self.pull
    }

    /// Drive the stick for one tick with every ball at rest.
    pub fn update(&mut self, cue: Vec2, input: &InputState) -> Option<Strike> {
        if matches!(self.state, CueState::Hidden | CueState::Struck) {
            self.state = CueState::Idle;
            self.pull = 0.0;
        }
        match self.mode {
            ControlMode::Pointer => self.update_pointer(cue, input),
            ControlMode::Keys => self.update_keys(input),
        }
    }

    fn update_pointer(&mut self, cue: Vec2, input: &InputState) -> Option<Strike> {
        if self.state == CueState::Idle {
            self.aim_at(cue, input.pointer());
            if let Some(p) = input.pointer_pressed() {
                let handle = self.handle_at(cue, 0.0);
                if p.distance(handle) < GRAB_RADIUS {
                    self.state = CueState::Charging;
                } else {
                    log::debug!("Pointer press {:.1} away from the cue handle", p.distance(handle));
                }
            }
        }

        if self.state != CueState::Charging {
            return None;
        }

        let pointer = input.pointer_released().unwrap_or_else(|| input.pointer());
        self.aim_at(cue, pointer);
        self.pull = pointer.distance(cue).min(MAX_PULL);

        if input.pointer_released().is_some() {
            return Some(self.strike());
        }
        if !input.pointer_down() {
            // Release happened somewhere we never saw it.
            self.state = CueState::Idle;
            self.pull = 0.0;
        }
        None
    }

    fn update_keys(&mut self, input: &InputState) -> Option<Strike> {
        self.state = CueState::Charging;
        if input.is_held(keys::ARROW_LEFT) {
            self.key_angle -= KEY_TURN;
        }
        if input.is_held(keys::ARROW_RIGHT) {
            self.key_angle += KEY_TURN;
        }
        if input.is_held(keys::ARROW_UP) {
            self.key_power += KEY_POWER_STEP;
        }
        if input.is_held(keys::ARROW_DOWN) {
            self.key_power -= KEY_POWER_STEP;
        }
        self.key_power = self.key_power.clamp(0.0, MAX_PULL);

        self.angle = self.key_angle;
        self.pull = self.key_power.max(self.ball_diameter / 2.0).min(MAX_PULL);

        if input.was_released(keys::SPACE) {
            return Some(self.strike());
        }
        None
    }

    fn aim_at(&mut self, cue: Vec2, pointer: Vec2) {
        let d = pointer - cue;
        if d != Vec2::ZERO {
            self.angle = d.y.atan2(d.x);
        }
    }

    fn strike(&mut self) -> Strike {
        self.state = CueState::Struck;
        let strike = Strike {
            direction: -Vec2::from_angle(self.angle),
            pull: self.pull,
        };
        log::debug!(
            "Strike at {:.3} rad, pull {:.1} ({:?} control)",
            self.angle,
            self.pull,
            self.mode
        );
        strike
    }

    /// Balls are rolling: stop drawing and ignore input until they settle.
    pub fn suspend(&mut self) {
        self.state = CueState::Hidden;
        self.pull = 0.0;
    }

    /// Rack reset: everything but the control mode goes back to zero.
    pub fn reset(&mut self) {
        *self = Self {
            mode: self.mode,
            ..Self::new(self.ball_diameter)
        };
    }

    /// Switch pointer/key control. Only with exactly one cue ball on the table.
    pub fn toggle_mode(&mut self, cue_count: usize) -> bool {
        if cue_count != 1 {
            log::debug!("Control toggle ignored with {} cue balls", cue_count);
            return false;
        }
        self.mode = match self.mode {
            ControlMode::Pointer => ControlMode::Keys,
            ControlMode::Keys => ControlMode::Pointer,
        };
        self.key_angle = 0.0;
        self.key_power = 0.0;
        self.pull = 0.0;
        if self.state != CueState::Hidden {
            self.state = CueState::Idle;
        }
        true
    }

    fn drawn_back(&self) -> f32 {
        if self.state == CueState::Charging {
            self.pull
        } else {
            0.0
        }
    }

    fn handle_at(&self, cue: Vec2, pull: f32) -> Vec2 {
        cue + Vec2::from_angle(self.angle) * (6.0 * self.ball_diameter - 5.0 + pull)
    }

    /// Distance from the cue-ball centre to the stick tip.
    pub fn tip_distance(&self) -> f32 {
        self.ball_diameter + self.drawn_back()
    }

    pub fn pose(&self, cue: Vec2) -> Option<StickPose> {
        if self.state == CueState::Hidden {
            return None;
        }
        let pull = self.drawn_back();
        Some(StickPose {
            angle: self.angle,
            handle: self.handle_at(cue, pull),
            tip: cue + Vec2::from_angle(self.angle) * self.tip_distance(),
        })
    }
}
