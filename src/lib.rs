//! When Pigs Fly - a side-scrolling launch game
//!
//! Core modules:
//! - `sim`: Deterministic run simulation (launch, glide, spawning, camera)
//! - `scene`: Menu / Run / Recap scene machine
//! - `recap`: Run summary, composite volume, export and email flows
//! - `forms`: Print-request lead capture
//! - `export`: Binary STL writer
//! - `overlay`: DOM overlay visibility and text
//! - `renderer`: WebGPU quad pipeline with layer-filtered cameras
//! - `tuning`: Data-driven game balance

pub mod error;
pub mod export;
pub mod forms;
pub mod overlay;
pub mod recap;
pub mod renderer;
pub mod scene;
pub mod sim;
pub mod tuning;

pub use error::{ExportError, FormError};
pub use scene::{App, Scene};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep in milliseconds (60 Hz)
    pub const SIM_DT_MS: f32 = 1000.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Character square side (px)
    pub const PLAYER_SIZE: f32 = 50.0;
    /// Collectible square side (px)
    pub const COLLECTIBLE_SIZE: f32 = 30.0;
    /// Star outer radius (px)
    pub const STAR_RADIUS: f32 = 30.0;
    /// World pixels per meter of distance
    pub const PIXELS_PER_METER: f32 = 10.0;
    /// Ground band height as a fraction of viewport height
    pub const GROUND_FRACTION: f32 = 0.1;
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Quadratic ease-out on `t` in [0, 1]
#[inline]
pub fn ease_out_quad(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * (2.0 - t)
}

/// Unpack a 0xRRGGBB color into linear-ish RGBA floats
#[inline]
pub fn rgb_hex(hex: u32, alpha: f32) -> [f32; 4] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
        alpha,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ease_out_quad_endpoints() {
        assert_eq!(ease_out_quad(0.0), 0.0);
        assert_eq!(ease_out_quad(1.0), 1.0);
        assert!(ease_out_quad(0.5) > 0.5);
        assert_eq!(ease_out_quad(2.0), 1.0);
    }

    #[test]
    fn test_rgb_hex() {
        assert_eq!(rgb_hex(0xff0000, 1.0), [1.0, 0.0, 0.0, 1.0]);
        let purple = rgb_hex(0x800080, 0.5);
        assert!((purple[0] - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(purple[1], 0.0);
        assert_eq!(purple[3], 0.5);
    }
}
