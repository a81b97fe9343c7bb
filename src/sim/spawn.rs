//! Distance-keyed spawn scheduling and culling
//!
//! Both spawners loop until caught up: a fast tick can cross several
//! thresholds at once and every one of them must fire, in order.

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::state::{CollectibleColor, EntityKind, RunState};
use crate::consts::PIXELS_PER_METER;
use crate::tuning::Tuning;

/// Sign checkpoints due when the view reaches `horizon` meters, strictly
/// increasing after `last`
pub fn due_checkpoints(last: u32, horizon: f32, tuning: &Tuning) -> Vec<u32> {
    let mut due = Vec::new();
    let mut last = last;
    while let Some(next) = tuning.next_sign_after(last) {
        if next as f32 > horizon {
            break;
        }
        due.push(next);
        last = next;
    }
    due
}

/// Spawn trigger x-positions crossed by `player_x`, with the new last
/// trigger position
pub fn due_spawn_positions(last_x: f32, player_x: f32, spacing: f32) -> (Vec<f32>, f32) {
    let mut due = Vec::new();
    let mut last = last_x;
    if spacing <= 0.0 {
        return (due, last);
    }
    while player_x > last + spacing {
        last += spacing;
        due.push(last);
    }
    (due, last)
}

/// Spawn collectibles and stars for every spacing the player has crossed.
/// Returns how many were spawned.
pub fn spawn_collectibles(run: &mut RunState) -> usize {
    let (due, last) = due_spawn_positions(run.last_spawn_x, run.player.pos.x, run.tuning.spawn_spacing);
    run.last_spawn_x = last;

    for &trigger_x in &due {
        let view = run.camera.visible_rect();
        let zoom = run.camera.zoom;
        let ground_band = run.viewport.y - run.ground_y;

        // Later triggers land closer to the right edge
        let lag = run.player.pos.x - trigger_x;
        let x = view.max.x + 100.0 / zoom - lag;

        let min_y = view.min.y - 50.0 / zoom;
        let max_y = view.max.y - ground_band + 50.0 / zoom;
        let y = if max_y > min_y {
            run.rng.random_range(min_y..max_y)
        } else {
            min_y
        };
        let y = y.min(run.ground_y - 20.0);

        let kind = if run.rng.random::<f32>() < run.tuning.star_chance {
            EntityKind::Star
        } else {
            let color = *CollectibleColor::ALL
                .choose(&mut run.rng)
                .unwrap_or(&CollectibleColor::Red);
            EntityKind::Collectible(color)
        };
        let id = run.spawn_entity(kind, Vec2::new(x, y));
        log::debug!("Spawned {:?} #{} at ({:.0}, {:.0})", kind, id, x, y);
    }
    due.len()
}

/// Spawn every sign checkpoint within the look-ahead. Returns the
/// checkpoints placed.
pub fn spawn_signs(run: &mut RunState) -> Vec<u32> {
    let look_ahead = (run.viewport.x / run.camera.zoom) / PIXELS_PER_METER;
    let horizon = run.distance as f32 + look_ahead;
    let due = due_checkpoints(run.last_sign, horizon, &run.tuning);

    for &meters in &due {
        let x = run.start_x + meters as f32 * PIXELS_PER_METER;
        run.spawn_entity(EntityKind::Sign(meters), Vec2::new(x, run.ground_y));
        run.last_sign = meters;
        log::debug!("Sign at {}m", meters);
    }
    due
}

/// Drop entities that fell far behind the camera's left edge. Returns how
/// many were removed.
pub fn cull_behind_camera(run: &mut RunState) -> usize {
    let cutoff = run.camera.visible_rect().min.x - run.tuning.cull_distance;
    let before = run.entities.len();
    run.entities.retain(|e| e.pos.x >= cutoff);
    before - run.entities.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkpoints_catch_up_in_one_jump() {
        let tuning = Tuning::default();
        // Distance 80 -> 600 in a single tick, starting after the 0 marker
        let before = due_checkpoints(0, 80.0, &tuning);
        assert!(before.is_empty());
        let due = due_checkpoints(0, 600.0, &tuning);
        assert_eq!(due, vec![100, 200, 300, 400, 500]);
        let later = due_checkpoints(500, 1000.0, &tuning);
        assert_eq!(later, vec![750, 1000]);
    }

    #[test]
    fn test_checkpoint_exactly_on_horizon_fires() {
        let tuning = Tuning::default();
        assert_eq!(due_checkpoints(400, 500.0, &tuning), vec![500]);
        assert!(due_checkpoints(400, 499.9, &tuning).is_empty());
    }

    #[test]
    fn test_zero_sign_spacing_stops_checkpoints() {
        let tuning = Tuning::from_json(r#"{ "sign_spacing_near": 0 }"#).unwrap();
        assert!(due_checkpoints(0, 50.0, &tuning).is_empty());
        assert!(due_checkpoints(0, 1.0e9, &tuning).is_empty());

        // Far spacing of zero stops right after the threshold
        let tuning = Tuning::from_json(r#"{ "sign_spacing_far": 0 }"#).unwrap();
        assert_eq!(due_checkpoints(0, 1.0e9, &tuning), vec![100, 200, 300, 400, 500]);
    }

    #[test]
    fn test_checkpoints_stop_before_overflow() {
        let tuning = Tuning::default();
        let last = u32::MAX - 100;
        assert!(due_checkpoints(last, f32::MAX, &tuning).is_empty());
    }

    #[test]
    fn test_spawn_positions_catch_up() {
        let (due, last) = due_spawn_positions(0.0, 1600.0, 500.0);
        assert_eq!(due, vec![500.0, 1000.0, 1500.0]);
        assert_eq!(last, 1500.0);
        let (due, last) = due_spawn_positions(last, 1900.0, 500.0);
        assert!(due.is_empty());
        assert_eq!(last, 1500.0);
    }

    #[test]
    fn test_zero_spacing_never_spawns() {
        let (due, _) = due_spawn_positions(0.0, 1.0e6, 0.0);
        assert!(due.is_empty());
    }

    #[test]
    fn test_spawned_collectibles_stay_above_ground_and_ahead() {
        let mut run = RunState::new(7, Vec2::new(1000.0, 800.0), Tuning::default());
        run.player.pos.x = 50_000.0;
        run.camera.follow(run.player.pos, 16.0);
        let n = spawn_collectibles(&mut run);
        assert_eq!(n, 99);
        let right = run.camera.visible_rect().max.x;
        for e in &run.entities {
            assert!(e.pos.y <= run.ground_y - 20.0);
            assert!(e.pos.x <= right + 100.0 / run.camera.zoom + 1e-3);
            assert!(matches!(e.kind, EntityKind::Star | EntityKind::Collectible(_)));
        }
        let stars = run.spawned.stars as f32;
        // 20% stars, loosely
        assert!(stars > 5.0 && stars < 40.0, "stars = {stars}");
    }

    #[test]
    fn test_signs_are_placed_on_the_ground() {
        let mut run = RunState::new(7, Vec2::new(1000.0, 800.0), Tuning::default());
        // Look-ahead at launch zoom is 1000 / 1.3 / 10 ~ 77m
        run.distance = 700;
        let placed = spawn_signs(&mut run);
        assert_eq!(placed, vec![100, 200, 300, 400, 500, 750]);
        assert_eq!(run.last_sign, *placed.last().unwrap());
        for e in &run.entities {
            if let EntityKind::Sign(m) = e.kind {
                assert_eq!(e.pos.x, run.start_x + m as f32 * 10.0);
                assert_eq!(e.pos.y, run.ground_y);
            }
        }
    }

    #[test]
    fn test_cull_removes_only_far_behind() {
        let mut run = RunState::new(7, Vec2::new(1000.0, 800.0), Tuning::default());
        let left = run.camera.visible_rect().min.x;
        run.spawn_entity(EntityKind::Star, Vec2::new(left - 250.0, 0.0));
        run.spawn_entity(EntityKind::Star, Vec2::new(left - 150.0, 0.0));
        assert_eq!(cull_behind_camera(&mut run), 1);
        assert_eq!(run.entities.len(), 1);
    }
}
