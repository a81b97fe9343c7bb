//! End-to-end flows through the scene machine

use glam::Vec2;

use when_pigs_fly::consts::SIM_DT_MS;
use when_pigs_fly::error::FormError;
use when_pigs_fly::export::{export_filename, stl};
use when_pigs_fly::recap::{EmailFlow, ExportFlow, RecapView};
use when_pigs_fly::sim::{Phase, PointerEvent, PointerOutcome};
use when_pigs_fly::{App, Scene, Tuning};

const VIEWPORT: Vec2 = Vec2::new(1280.0, 720.0);
/// Two simulated minutes
const MAX_TICKS: u32 = 60 * 120;

fn ticks_for(ms: f32) -> u32 {
    (ms / SIM_DT_MS).ceil() as u32 + 1
}

/// Aim 45 degrees up, let the meter fill for `power_ticks`, launch
fn launch(app: &mut App, power_ticks: u32) {
    assert!(app.start_run());
    let run = app.run().unwrap();
    let aim = run
        .camera
        .world_to_screen(run.launch_pivot + Vec2::new(100.0, -100.0));

    assert!(matches!(
        app.pointer(PointerEvent::Down(aim)),
        PointerOutcome::Aimed(_)
    ));
    assert_eq!(app.pointer(PointerEvent::Up(aim)), PointerOutcome::PowerStarted);
    for _ in 0..power_ticks {
        app.tick(SIM_DT_MS);
    }
    assert!(matches!(
        app.pointer(PointerEvent::Down(aim)),
        PointerOutcome::Launched { .. }
    ));
    assert_eq!(app.run().unwrap().phase, Phase::Flying);
}

/// Tick until the end-of-run control shows up
fn fly_until_settled(app: &mut App) -> u32 {
    let mut ticks = 0;
    while !app.run().unwrap().hud.end_run_button {
        assert!(ticks < MAX_TICKS, "run never settled");
        app.tick(SIM_DT_MS);
        ticks += 1;
    }
    ticks
}

fn finished_app(seed: u64) -> App {
    let mut app = App::new(seed, VIEWPORT, Tuning::default());
    launch(&mut app, 20);
    fly_until_settled(&mut app);
    app
}

#[test]
fn test_full_run_reaches_recap() {
    let mut app = App::new(2024, VIEWPORT, Tuning::default());
    launch(&mut app, 30);

    // End control is not available mid-flight
    app.tick(SIM_DT_MS);
    assert!(!app.end_run());

    fly_until_settled(&mut app);
    let run = app.run().unwrap();
    assert!(!run.hud.glide_meter);
    assert_eq!(run.player.vel.x, 0.0);
    assert!(run.distance > 0);
    let distance = run.distance;
    let inventory = run.inventory;

    assert!(app.end_run());
    let recap = app.recap().unwrap();
    assert_eq!(recap.summary.distance, distance);
    assert_eq!(recap.summary.inventory, inventory);
    let sum: f32 = recap.segments.iter().map(|s| s.height).sum();
    assert!((sum - 1.0).abs() < 1e-6);
}

#[test]
fn test_same_seed_same_run() {
    let a = finished_app(99);
    let b = finished_app(99);
    let (a, b) = (a.run().unwrap(), b.run().unwrap());
    assert_eq!(a.distance, b.distance);
    assert_eq!(a.inventory, b.inventory);
    assert_eq!(a.spawned, b.spawned);
}

#[test]
fn test_export_and_download_name() {
    let mut app = finished_app(7);
    app.end_run();
    let segments = app.recap().unwrap().segments.len();

    assert!(app.recap_mut().unwrap().request_export());
    for _ in 0..ticks_for(Tuning::default().export_delay_ms) {
        app.tick(SIM_DT_MS);
    }
    let bytes = app.recap().unwrap().export_bytes().expect("export ready");
    assert_eq!(
        bytes.len(),
        stl::HEADER_LEN + 4 + segments * 12 * stl::TRIANGLE_LEN
    );
    assert!(export_filename(1234.0).starts_with("unique_cube_"));
}

#[test]
fn test_print_form_validation_and_restart() {
    let mut app = finished_app(11);
    app.end_run();

    let recap = app.recap_mut().unwrap();
    recap.open_print_form();
    let form = recap.print_form_mut().unwrap();
    form.name = "Pat".into();
    form.email = "   ".into();
    assert_eq!(recap.submit_print_form(), Err(FormError::MissingEmail));
    assert!(matches!(recap.view, RecapView::PrintForm { .. }));
    assert!(!app.restart());

    let recap = app.recap_mut().unwrap();
    recap.print_form_mut().unwrap().email = "pat@example.com".into();
    assert_eq!(recap.submit_print_form(), Ok(()));
    assert!(matches!(recap.view, RecapView::PrintSubmitted { .. }));

    assert!(app.restart());
    assert!(matches!(app.scene, Scene::Menu));
}

#[test]
fn test_restart_waits_for_export() {
    let mut app = finished_app(3);
    app.end_run();
    app.recap_mut().unwrap().request_export();
    app.tick(SIM_DT_MS);
    assert!(!app.restart());

    for _ in 0..ticks_for(Tuning::default().export_delay_ms) {
        app.tick(SIM_DT_MS);
    }
    assert!(app.restart());
}

#[test]
fn test_leaving_recap_drops_pending_email() {
    let mut app = finished_app(5);
    app.end_run();
    app.recap_mut().unwrap().request_export();
    for _ in 0..ticks_for(Tuning::default().export_delay_ms) {
        app.tick(SIM_DT_MS);
    }
    assert_eq!(app.recap_mut().unwrap().send_email("me@example.com"), Ok(()));
    app.tick(SIM_DT_MS);
    assert!(app.restart());

    // The old recap's send never lands anywhere
    for _ in 0..ticks_for(3000.0) {
        app.tick(SIM_DT_MS);
    }
    assert!(matches!(app.scene, Scene::Menu));

    launch(&mut app, 10);
    fly_until_settled(&mut app);
    app.end_run();
    let recap = app.recap().unwrap();
    assert_eq!(recap.export, ExportFlow::Idle);
    assert_eq!(recap.email, EmailFlow::Editing { error: None });
}
