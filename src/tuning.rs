//! Data-driven game balance
//!
//! Every gameplay number lives here so a run can be retuned from JSON
//! without touching the simulation. Missing fields fall back to the shipped
//! defaults.

use serde::{Deserialize, Serialize};

/// Camera framing: where the player sits on screen and how hard the camera
/// chases it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    /// Player position on screen as a fraction of viewport (x, y)
    pub anchor: [f32; 2],
    pub zoom: f32,
    /// Per-axis follow lerp (1 = locked)
    pub lerp: [f32; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Launch ===
    /// Lowest allowed launch angle (degrees, screen y points down)
    pub min_angle_deg: f32,
    /// Highest allowed launch angle (degrees)
    pub max_angle_deg: f32,
    /// Angle shown before the player starts aiming (degrees)
    pub initial_angle_deg: f32,
    /// Power meter rate (units per ms)
    pub power_rate: f32,
    pub min_launch_speed: f32,
    pub max_launch_speed: f32,

    // === Body ===
    pub gravity: f32,
    pub bounce: f32,
    pub air_drag: f32,
    pub ground_drag: f32,
    /// Below this horizontal speed a grounded player counts as stopped
    pub settle_speed: f32,
    /// Confirmation delay before the end-of-run control appears (ms)
    pub settle_delay_ms: f32,

    // === Glide ===
    pub glide_max: f32,
    pub glide_consumption: f32,
    /// Recharge per ms while flying
    pub glide_recharge_per_ms: f32,
    /// Multiplier applied to downward velocity on boost
    pub glide_damping: f32,
    pub glide_impulse: f32,
    pub glide_max_rise_speed: f32,

    // === Star power-up ===
    pub star_chance: f32,
    pub star_speed_multiplier: f32,
    pub star_acceleration: f32,
    pub star_duration_ms: f32,

    // === Spawning ===
    /// Horizontal px between collectible spawns
    pub spawn_spacing: f32,
    /// Sign spacing (meters) before `sign_threshold`
    pub sign_spacing_near: u32,
    /// Sign spacing (meters) from `sign_threshold` on
    pub sign_spacing_far: u32,
    pub sign_threshold: u32,
    /// Entities this far behind the camera's left edge are culled (px)
    pub cull_distance: f32,
    /// Collection fade duration (ms)
    pub collect_fade_ms: f32,

    // === Camera ===
    pub launch_pose: CameraPose,
    pub flight_pose: CameraPose,
    /// Launch-to-flight camera transition (ms)
    pub camera_transition_ms: f32,

    // === Recap ===
    /// Composite cube edge (mm)
    pub cube_size_mm: f32,
    /// Simulated processing delay before STL generation (ms)
    pub export_delay_ms: f32,
    /// Simulated send latency for the email stub (ms)
    pub email_delay_ms: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            min_angle_deg: -85.0,
            max_angle_deg: -10.0,
            initial_angle_deg: -10.0,
            power_rate: 0.0018,
            min_launch_speed: 400.0,
            max_launch_speed: 1500.0,

            gravity: 800.0,
            bounce: 0.4,
            air_drag: 50.0,
            ground_drag: 1000.0,
            settle_speed: 10.0,
            settle_delay_ms: 1000.0,

            glide_max: 1.0,
            glide_consumption: 1.0 / 6.0,
            glide_recharge_per_ms: (1.0 / 6.0) / 3000.0,
            glide_damping: 0.1,
            glide_impulse: 400.0,
            glide_max_rise_speed: 600.0,

            star_chance: 0.2,
            star_speed_multiplier: 1.1,
            star_acceleration: 300.0,
            star_duration_ms: 3000.0,

            spawn_spacing: 500.0,
            sign_spacing_near: 100,
            sign_spacing_far: 250,
            sign_threshold: 500,
            cull_distance: 200.0,
            collect_fade_ms: 200.0,

            launch_pose: CameraPose {
                anchor: [0.1, 0.5],
                zoom: 1.3,
                lerp: [1.0, 1.0],
            },
            flight_pose: CameraPose {
                anchor: [0.3, 0.6],
                zoom: 0.75,
                lerp: [1.0, 0.1],
            },
            camera_transition_ms: 1500.0,

            cube_size_mm: 20.0,
            export_delay_ms: 2000.0,
            email_delay_ms: 1500.0,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Tuning = serde_json::from_str(json)?;
        log::info!("Loaded tuning override");
        Ok(tuning)
    }

    pub fn min_angle(&self) -> f32 {
        self.min_angle_deg.to_radians()
    }

    pub fn max_angle(&self) -> f32 {
        self.max_angle_deg.to_radians()
    }

    /// Next sign checkpoint after `last` (meters). None once checkpoints
    /// stop advancing: zero spacing or u32 overflow.
    pub fn next_sign_after(&self, last: u32) -> Option<u32> {
        let spacing = if last < self.sign_threshold {
            self.sign_spacing_near
        } else {
            self.sign_spacing_far
        };
        last.checked_add(spacing).filter(|&next| next > last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "gravity": 1200.0, "spawn_spacing": 250.0 }"#).unwrap();
        assert_eq!(tuning.gravity, 1200.0);
        assert_eq!(tuning.spawn_spacing, 250.0);
        assert_eq!(tuning.max_launch_speed, Tuning::default().max_launch_speed);
        assert_eq!(tuning.flight_pose, Tuning::default().flight_pose);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(Tuning::from_json("{ gravity: }").is_err());
    }

    #[test]
    fn test_sign_cadence_widens_after_threshold() {
        let tuning = Tuning::default();
        assert_eq!(tuning.next_sign_after(0), Some(100));
        assert_eq!(tuning.next_sign_after(400), Some(500));
        assert_eq!(tuning.next_sign_after(500), Some(750));
        assert_eq!(tuning.next_sign_after(750), Some(1000));
    }
}
