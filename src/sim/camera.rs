//! Tracking camera with anchored follow and eased pose transitions

use glam::Vec2;

use super::body::Aabb;
use crate::tuning::CameraPose;
use crate::{ease_out_quad, lerp};

#[derive(Debug, Clone, Copy, PartialEq)]
struct PoseTransition {
    from: CameraPose,
    to: CameraPose,
    elapsed_ms: f32,
    duration_ms: f32,
}

/// World camera. `center` is the world point under the middle of the
/// viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub center: Vec2,
    pub zoom: f32,
    /// Where the followed target sits on screen (fraction of viewport)
    pub anchor: Vec2,
    pub lerp: Vec2,
    /// Viewport size in CSS pixels
    pub viewport: Vec2,
    transition: Option<PoseTransition>,
}

impl Camera {
    /// Camera snapped onto `target` at `pose`
    pub fn new(viewport: Vec2, pose: CameraPose, target: Vec2) -> Self {
        let mut camera = Self {
            center: Vec2::ZERO,
            zoom: pose.zoom,
            anchor: Vec2::from(pose.anchor),
            lerp: Vec2::from(pose.lerp),
            viewport,
            transition: None,
        };
        camera.center = camera.desired_center(target);
        camera
    }

    /// Fixed screen-space camera for the UI overlay
    pub fn screen(viewport: Vec2) -> Self {
        Self {
            center: viewport * 0.5,
            zoom: 1.0,
            anchor: Vec2::splat(0.5),
            lerp: Vec2::ZERO,
            viewport,
            transition: None,
        }
    }

    fn desired_center(&self, target: Vec2) -> Vec2 {
        target + (Vec2::splat(0.5) - self.anchor) * self.viewport / self.zoom
    }

    /// Ease from the current pose to `to`. Follow lerp switches immediately.
    pub fn transition_to(&mut self, to: CameraPose, duration_ms: f32) {
        let from = CameraPose {
            anchor: self.anchor.to_array(),
            zoom: self.zoom,
            lerp: self.lerp.to_array(),
        };
        self.lerp = Vec2::from(to.lerp);
        if duration_ms <= 0.0 {
            self.anchor = Vec2::from(to.anchor);
            self.zoom = to.zoom;
            return;
        }
        self.transition = Some(PoseTransition {
            from,
            to,
            elapsed_ms: 0.0,
            duration_ms,
        });
    }

    pub fn in_transition(&self) -> bool {
        self.transition.is_some()
    }

    /// Advance any pose transition and chase `target`
    pub fn follow(&mut self, target: Vec2, dt_ms: f32) {
        if let Some(mut t) = self.transition.take() {
            t.elapsed_ms += dt_ms;
            let k = ease_out_quad(t.elapsed_ms / t.duration_ms);
            self.zoom = lerp(t.from.zoom, t.to.zoom, k);
            self.anchor = Vec2::new(
                lerp(t.from.anchor[0], t.to.anchor[0], k),
                lerp(t.from.anchor[1], t.to.anchor[1], k),
            );
            if t.elapsed_ms < t.duration_ms {
                self.transition = Some(t);
            }
        }

        let desired = self.desired_center(target);
        self.center += (desired - self.center) * self.lerp;
    }

    /// World-space rectangle currently on screen
    pub fn visible_rect(&self) -> Aabb {
        let half = self.viewport * 0.5 / self.zoom;
        Aabb::new(self.center - half, self.center + half)
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        self.center + (screen - self.viewport * 0.5) / self.zoom
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        (world - self.center) * self.zoom + self.viewport * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    const VIEW: Vec2 = Vec2::new(1000.0, 800.0);

    #[test]
    fn test_target_sits_at_anchor() {
        let tuning = Tuning::default();
        let target = Vec2::new(300.0, 400.0);
        let camera = Camera::new(VIEW, tuning.launch_pose, target);
        let on_screen = camera.world_to_screen(target);
        assert!((on_screen.x - 100.0).abs() < 1e-3);
        assert!((on_screen.y - 400.0).abs() < 1e-3);
    }

    #[test]
    fn test_screen_world_roundtrip() {
        let tuning = Tuning::default();
        let camera = Camera::new(VIEW, tuning.flight_pose, Vec2::new(5000.0, -200.0));
        let p = Vec2::new(123.0, 456.0);
        let back = camera.world_to_screen(camera.screen_to_world(p));
        assert!((back - p).length() < 1e-2);
    }

    #[test]
    fn test_transition_eases_to_flight_pose() {
        let tuning = Tuning::default();
        let target = Vec2::new(0.0, 0.0);
        let mut camera = Camera::new(VIEW, tuning.launch_pose, target);
        camera.transition_to(tuning.flight_pose, 1500.0);
        camera.follow(target, 750.0);
        // Ease-out is past the midpoint at half time
        let mid = (1.3 + 0.75) / 2.0;
        assert!(camera.zoom < mid && camera.zoom > 0.75);
        camera.follow(target, 750.0);
        assert!(!camera.in_transition());
        assert!((camera.zoom - 0.75).abs() < 1e-6);
        assert_eq!(camera.anchor, Vec2::new(0.3, 0.6));
    }

    #[test]
    fn test_vertical_lerp_lags() {
        let tuning = Tuning::default();
        let mut camera = Camera::new(VIEW, tuning.launch_pose, Vec2::ZERO);
        camera.transition_to(tuning.flight_pose, 0.0);
        let start = camera.center;
        camera.follow(Vec2::new(100.0, -1000.0), 16.0);
        let desired = Vec2::new(100.0, -1000.0)
            + (Vec2::splat(0.5) - camera.anchor) * VIEW / camera.zoom;
        assert!((camera.center.x - desired.x).abs() < 1e-3);
        assert!((camera.center.y - (start.y + (desired.y - start.y) * 0.1)).abs() < 1e-3);
    }

    #[test]
    fn test_visible_rect_scales_with_zoom() {
        let camera = Camera::new(
            VIEW,
            crate::tuning::CameraPose {
                anchor: [0.5, 0.5],
                zoom: 0.5,
                lerp: [1.0, 1.0],
            },
            Vec2::ZERO,
        );
        let rect = camera.visible_rect();
        assert_eq!(rect.size(), VIEW * 2.0);
        assert_eq!(rect.center(), Vec2::ZERO);
    }
}
