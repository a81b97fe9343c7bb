//! Fixed timestep simulation tick and pointer dispatch
//!
//! Pointer events are applied as they arrive; `tick` advances everything
//! else by one fixed step.

use glam::Vec2;

use super::launch::{aim_angle, launch_velocity};
use super::spawn::{cull_behind_camera, spawn_collectibles, spawn_signs};
use super::state::{EntityKind, EntityState, Phase, RunAction, RunState};
use crate::consts::PIXELS_PER_METER;

/// Pointer input in viewport (CSS pixel) coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Vec2),
    Move(Vec2),
    Up(Vec2),
}

/// What a pointer event did, for logging and tests
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerOutcome {
    Ignored,
    Aimed(f32),
    PowerStarted,
    Launched { power: f32, angle: f32 },
    Boosted,
    BoostRejected,
}

/// Interpret a pointer event for the current phase
pub fn apply_pointer(run: &mut RunState, event: PointerEvent) -> PointerOutcome {
    match (run.phase, event) {
        (Phase::Aiming, PointerEvent::Down(p)) => {
            run.aiming = true;
            update_aim(run, p)
        }
        (Phase::Aiming, PointerEvent::Move(p)) if run.aiming => update_aim(run, p),
        (Phase::Aiming, PointerEvent::Up(_)) if run.aiming => {
            run.phase = Phase::Powering;
            run.hud.aim_line = false;
            run.hud.power_meter = true;
            log::info!("Angle locked at {:.1} deg", run.launch_angle.to_degrees());
            PointerOutcome::PowerStarted
        }
        (Phase::Powering, PointerEvent::Down(_)) => launch(run),
        (Phase::Flying, PointerEvent::Down(_)) => {
            let tuning = &run.tuning;
            if run.glide.boost(&mut run.player.vel, tuning) {
                PointerOutcome::Boosted
            } else {
                PointerOutcome::BoostRejected
            }
        }
        _ => PointerOutcome::Ignored,
    }
}

fn update_aim(run: &mut RunState, screen: Vec2) -> PointerOutcome {
    let world = run.camera.screen_to_world(screen);
    run.launch_angle = aim_angle(run.launch_pivot, world, &run.tuning);
    PointerOutcome::Aimed(run.launch_angle)
}

/// Commit power and angle and throw the player
fn launch(run: &mut RunState) -> PointerOutcome {
    let power = run.power.level;
    let angle = run.launch_angle;

    run.phase = Phase::Flying;
    run.hud.power_meter = false;
    run.hud.glide_meter = true;

    run.player.vel = launch_velocity(angle, power, &run.tuning);
    run.player.gravity_enabled = true;
    run.player.bounce = run.tuning.bounce;
    run.player.drag_x = run.tuning.air_drag;
    run.player.grounded = false;

    run.camera
        .transition_to(run.tuning.flight_pose, run.tuning.camera_transition_ms);

    log::info!(
        "Launched: power {:.2}, angle {:.1} deg, speed {:.0}",
        power,
        angle.to_degrees(),
        run.player.vel.length()
    );
    PointerOutcome::Launched { power, angle }
}

/// Advance the run by one fixed timestep
pub fn tick(run: &mut RunState, dt_ms: f32) {
    run.time_ms += dt_ms as f64;
    let dt = dt_ms / 1000.0;

    match run.phase {
        Phase::Aiming => {}

        Phase::Powering => {
            let rate = run.tuning.power_rate;
            run.power.advance(dt_ms, rate);
        }

        Phase::Flying => {
            run.player.step(dt, run.tuning.gravity, run.ground_y);

            let travelled = ((run.player.pos.x - run.start_x) / PIXELS_PER_METER).floor();
            if travelled > run.distance as f32 {
                run.distance = travelled as u32;
            }

            spawn_collectibles(run);
            spawn_signs(run);
            collect_overlaps(run);
            cull_behind_camera(run);

            run.glide.recharge(dt_ms);

            if run.player.grounded {
                run.player.drag_x = run.tuning.ground_drag;
                if run.player.vel.x.abs() < run.tuning.settle_speed {
                    run.player.vel.x = 0.0;
                    if !run.settle_timer_started {
                        run.settle_timer_started = true;
                        run.timers
                            .schedule(run.tuning.settle_delay_ms, RunAction::RevealEndRun);
                        log::info!("Player stopped at {}m", run.distance);
                    }
                }
            } else {
                run.player.drag_x = run.tuning.air_drag;
            }
        }
    }

    run.camera.follow(run.player.pos, dt_ms);
    animate_entities(run, dt_ms);

    for action in run.timers.advance(dt_ms) {
        apply_action(run, action);
    }
}

/// Collect everything the player currently overlaps
fn collect_overlaps(run: &mut RunState) {
    let player = run.player.bounds();
    let mut hits = Vec::new();
    for entity in &mut run.entities {
        if !entity.is_alive() {
            continue;
        }
        let Some(bounds) = entity.bounds() else {
            continue;
        };
        if bounds.overlaps(&player) {
            // Mark first so a second overlap cannot count it again
            entity.state = EntityState::Collected { fade_ms: 0.0 };
            hits.push(entity.kind);
        }
    }

    for kind in hits {
        match kind {
            EntityKind::Collectible(color) => {
                let count = run.inventory.add(color);
                run.player_color = color.hex();
                log::debug!("Collected {} ({})", color.as_str(), count);
            }
            EntityKind::Star => start_star_boost(run),
            EntityKind::Sign(_) => {}
        }
    }
}

fn start_star_boost(run: &mut RunState) {
    run.player.vel.x *= run.tuning.star_speed_multiplier;
    run.player.accel.x = run.tuning.star_acceleration;
    run.player_pulsing = true;
    if let Some(previous) = run.star_boost.take() {
        run.timers.cancel(previous);
    }
    run.star_boost = Some(
        run.timers
            .schedule(run.tuning.star_duration_ms, RunAction::EndStarBoost),
    );
    log::debug!("Star boost, vx = {:.0}", run.player.vel.x);
}

fn apply_action(run: &mut RunState, action: RunAction) {
    match action {
        RunAction::RevealEndRun => {
            run.hud.end_run_button = true;
            run.hud.glide_meter = false;
            log::info!("Run over at {}m, {} items", run.distance, run.inventory.total());
        }
        RunAction::EndStarBoost => {
            // A newer star may have taken over the boost
            if run.star_boost.take().is_some() {
                run.player.accel.x = 0.0;
                run.player_pulsing = false;
            }
        }
    }
}

/// Spin stars and retire finished collection fades
fn animate_entities(run: &mut RunState, dt_ms: f32) {
    let fade = run.tuning.collect_fade_ms;
    for entity in &mut run.entities {
        if entity.kind == EntityKind::Star {
            // One turn every 3 s
            entity.spin += std::f32::consts::TAU * dt_ms / 3000.0;
        }
        if let EntityState::Collected { fade_ms } = &mut entity.state {
            *fade_ms += dt_ms;
        }
    }
    run.entities
        .retain(|e| !matches!(e.state, EntityState::Collected { fade_ms } if fade_ms >= fade));
}
