//! Menu -> Run -> Recap scene machine
//!
//! Each scene owns its state and timers outright; leaving a scene drops
//! them, so nothing scheduled there can fire later.

use glam::Vec2;

use crate::recap::RecapState;
use crate::sim::{PointerEvent, PointerOutcome, RunState, apply_pointer, tick};
use crate::tuning::Tuning;

/// Active presentation state
pub enum Scene {
    Menu,
    Run(Box<RunState>),
    Recap(Box<RecapState>),
}

impl Scene {
    pub fn name(&self) -> &'static str {
        match self {
            Scene::Menu => "Menu",
            Scene::Run(_) => "Run",
            Scene::Recap(_) => "Recap",
        }
    }
}

pub struct App {
    pub scene: Scene,
    /// Current canvas size in CSS pixels
    pub viewport: Vec2,
    pub tuning: Tuning,
    seed: u64,
    runs: u64,
}

impl App {
    pub fn new(seed: u64, viewport: Vec2, tuning: Tuning) -> Self {
        Self {
            scene: Scene::Menu,
            viewport,
            tuning,
            seed,
            runs: 0,
        }
    }

    pub fn run(&self) -> Option<&RunState> {
        match &self.scene {
            Scene::Run(run) => Some(run),
            _ => None,
        }
    }

    pub fn run_mut(&mut self) -> Option<&mut RunState> {
        match &mut self.scene {
            Scene::Run(run) => Some(run),
            _ => None,
        }
    }

    pub fn recap(&self) -> Option<&RecapState> {
        match &self.scene {
            Scene::Recap(recap) => Some(recap),
            _ => None,
        }
    }

    pub fn recap_mut(&mut self) -> Option<&mut RecapState> {
        match &mut self.scene {
            Scene::Recap(recap) => Some(recap),
            _ => None,
        }
    }

    /// Menu -> Run. Every run gets its own seed derived from the app seed.
    pub fn start_run(&mut self) -> bool {
        if !matches!(self.scene, Scene::Menu) {
            return false;
        }
        let seed = self.seed.wrapping_add(self.runs);
        self.runs += 1;
        let run = RunState::new(seed, self.viewport, self.tuning.clone());
        log::info!("Menu -> Run (seed {seed})");
        self.scene = Scene::Run(Box::new(run));
        true
    }

    /// Run -> Recap, only once the end-of-run control is showing
    pub fn end_run(&mut self) -> bool {
        let summary = match &self.scene {
            Scene::Run(run) if run.hud.end_run_button => run.summary(),
            _ => return false,
        };
        log::info!(
            "Run -> Recap ({}m, {} collected)",
            summary.distance,
            summary.inventory.total()
        );
        self.scene = Scene::Recap(Box::new(RecapState::new(summary, &self.tuning)));
        true
    }

    /// Recap -> Menu
    pub fn restart(&mut self) -> bool {
        match &self.scene {
            Scene::Recap(recap) if recap.restart_available() => {
                log::info!("Recap -> Menu");
                self.scene = Scene::Menu;
                true
            }
            _ => false,
        }
    }

    /// Back out of the print form into a fresh recap
    pub fn cancel_print_form(&mut self) {
        let tuning = &self.tuning;
        if let Scene::Recap(recap) = &mut self.scene {
            recap.cancel_print_form(tuning);
        }
    }

    /// Canvas pointer input. Only the run scene reacts to it.
    pub fn pointer(&mut self, event: PointerEvent) -> PointerOutcome {
        match &mut self.scene {
            Scene::Run(run) => apply_pointer(run, event),
            _ => PointerOutcome::Ignored,
        }
    }

    /// Advance the active scene by one fixed step
    pub fn tick(&mut self, dt_ms: f32) {
        match &mut self.scene {
            Scene::Menu => {}
            Scene::Run(run) => tick(run, dt_ms),
            Scene::Recap(recap) => recap.tick(dt_ms),
        }
    }

    /// New canvas size. Scene layout keeps the viewport it was built with.
    pub fn resize(&mut self, viewport: Vec2) {
        if viewport.x > 0.0 && viewport.y > 0.0 {
            self.viewport = viewport;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(7, Vec2::new(1280.0, 720.0), Tuning::default())
    }

    #[test]
    fn test_transitions_are_linear() {
        let mut app = app();
        assert!(!app.end_run());
        assert!(!app.restart());
        assert!(app.start_run());
        assert_eq!(app.scene.name(), "Run");
        assert!(!app.start_run());
        // Not settled yet
        assert!(!app.end_run());
        app.run_mut().unwrap().hud.end_run_button = true;
        assert!(app.end_run());
        assert_eq!(app.scene.name(), "Recap");
        assert!(app.restart());
        assert_eq!(app.scene.name(), "Menu");
    }

    #[test]
    fn test_pointer_ignored_outside_run() {
        let mut app = app();
        assert_eq!(
            app.pointer(PointerEvent::Down(Vec2::new(10.0, 10.0))),
            PointerOutcome::Ignored
        );
    }

    #[test]
    fn test_resize_keeps_run_layout() {
        let mut app = app();
        app.start_run();
        let ground = app.run().unwrap().ground_y;
        app.resize(Vec2::new(640.0, 480.0));
        assert_eq!(app.viewport, Vec2::new(640.0, 480.0));
        assert_eq!(app.run().unwrap().ground_y, ground);
        // Zero-sized canvases are ignored
        app.resize(Vec2::ZERO);
        assert_eq!(app.viewport, Vec2::new(640.0, 480.0));
    }

    #[test]
    fn test_each_run_gets_a_new_seed() {
        let mut app = app();
        app.start_run();
        let first = app.run().unwrap().rng.clone();
        app.run_mut().unwrap().hud.end_run_button = true;
        app.end_run();
        app.restart();
        app.start_run();
        assert_ne!(app.run().unwrap().rng, first);
    }

    #[test]
    fn test_restart_blocked_while_print_form_open() {
        let mut app = app();
        app.start_run();
        app.run_mut().unwrap().hud.end_run_button = true;
        app.end_run();
        app.recap_mut().unwrap().open_print_form();
        assert!(!app.restart());
        app.cancel_print_form();
        assert!(app.restart());
    }
}
