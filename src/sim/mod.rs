//! Deterministic run simulation
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod body;
pub mod camera;
pub mod glide;
pub mod launch;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod timers;

pub use body::{Aabb, Body};
pub use camera::Camera;
pub use glide::Glide;
pub use launch::{PowerMeter, aim_angle, launch_speed, launch_velocity};
pub use spawn::{cull_behind_camera, due_checkpoints, due_spawn_positions};
pub use state::{
    CollectibleColor, Entity, EntityKind, EntityState, HudFlags, Inventory, Layer, Phase,
    RunAction, RunState, RunSummary,
};
pub use tick::{PointerEvent, PointerOutcome, apply_pointer, tick};
pub use timers::{TimerId, Timers};
