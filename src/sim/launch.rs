//! Aiming and powering the launch

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::lerp;
use crate::tuning::Tuning;

/// Angle from `pivot` to `target`, clamped to the allowed launch cone.
///
/// Screen y points down, so upward aims are negative angles.
pub fn aim_angle(pivot: Vec2, target: Vec2, tuning: &Tuning) -> f32 {
    let d = target - pivot;
    let angle = d.y.atan2(d.x);
    angle.clamp(tuning.min_angle(), tuning.max_angle())
}

/// Launch speed for a committed power level
pub fn launch_speed(power: f32, tuning: &Tuning) -> f32 {
    lerp(
        tuning.min_launch_speed,
        tuning.max_launch_speed,
        power.clamp(0.0, 1.0),
    )
}

pub fn launch_velocity(angle: f32, power: f32, tuning: &Tuning) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin()) * launch_speed(power, tuning)
}

/// Oscillating power meter (triangle wave over [0, 1])
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerMeter {
    pub level: f32,
    /// +1 filling, -1 draining
    pub direction: f32,
}

impl Default for PowerMeter {
    fn default() -> Self {
        Self {
            level: 0.0,
            direction: 1.0,
        }
    }
}

impl PowerMeter {
    pub fn advance(&mut self, dt_ms: f32, rate: f32) {
        self.level += rate * dt_ms * self.direction;
        if self.level >= 1.0 {
            self.level = 1.0;
            self.direction = -1.0;
        } else if self.level <= 0.0 {
            self.level = 0.0;
            self.direction = 1.0;
        }
    }
}
