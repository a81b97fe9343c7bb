//! Glide resource: a bounded meter spent on upward boosts

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Glide {
    pub level: f32,
    pub max: f32,
    pub consumption: f32,
    pub recharge_per_ms: f32,
}

impl Glide {
    /// Full meter
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            level: tuning.glide_max,
            max: tuning.glide_max,
            consumption: tuning.glide_consumption,
            recharge_per_ms: tuning.glide_recharge_per_ms,
        }
    }

    pub fn can_boost(&self) -> bool {
        self.level >= self.consumption
    }

    /// Fraction of the meter that is filled, for the HUD bar
    pub fn fill(&self) -> f32 {
        if self.max <= 0.0 {
            0.0
        } else {
            (self.level / self.max).clamp(0.0, 1.0)
        }
    }

    pub fn recharge(&mut self, dt_ms: f32) {
        self.level = (self.level + self.recharge_per_ms * dt_ms).clamp(0.0, self.max);
    }

    /// Spend one boost and apply it to `vel`. Leaves both untouched and
    /// returns false when the meter is short.
    pub fn boost(&mut self, vel: &mut Vec2, tuning: &Tuning) -> bool {
        if !self.can_boost() {
            return false;
        }
        self.level = (self.level - self.consumption).max(0.0);

        // Screen y points down: positive vy is falling
        if vel.y > 0.0 {
            vel.y *= tuning.glide_damping;
        }
        vel.y -= tuning.glide_impulse;
        vel.y = vel.y.max(-tuning.glide_max_rise_speed);
        true
    }
}
