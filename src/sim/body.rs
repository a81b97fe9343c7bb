//! Arcade-style body integration: gravity, linear drag, ground bounce

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self::new(center - half, center + half)
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Vertical bounce speeds below this come to rest on the ground
const REST_SPEED: f32 = 20.0;

/// Dynamic square body. `pos` is the center; screen y points down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub accel: Vec2,
    pub size: f32,
    pub gravity_enabled: bool,
    pub bounce: f32,
    pub drag_x: f32,
    /// Resting on the ground this tick
    pub grounded: bool,
}

impl Body {
    pub fn new(pos: Vec2, size: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            accel: Vec2::ZERO,
            size,
            gravity_enabled: false,
            bounce: 0.0,
            drag_x: 0.0,
            grounded: true,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, Vec2::splat(self.size))
    }

    /// Integrate one step and resolve contact with a ground plane at
    /// `ground_y`
    pub fn step(&mut self, dt: f32, gravity: f32, ground_y: f32) {
        if self.gravity_enabled {
            self.vel.y += gravity * dt;
        }

        // Drag only applies when not accelerating on that axis
        if self.accel.x != 0.0 {
            self.vel.x += self.accel.x * dt;
        } else if self.drag_x > 0.0 {
            let drag = self.drag_x * dt;
            if self.vel.x.abs() <= drag {
                self.vel.x = 0.0;
            } else {
                self.vel.x -= drag * self.vel.x.signum();
            }
        }
        self.vel.y += self.accel.y * dt;

        self.pos += self.vel * dt;

        let half = self.size * 0.5;
        self.grounded = false;
        if self.pos.y + half >= ground_y {
            self.pos.y = ground_y - half;
            if self.vel.y > 0.0 {
                self.vel.y = -self.vel.y * self.bounce;
            }
            if self.vel.y.abs() < REST_SPEED {
                self.vel.y = 0.0;
            }
            self.grounded = true;
        }
    }
}
