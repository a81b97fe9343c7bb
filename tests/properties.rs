//! Property tests for the run simulation and recap math

use glam::Vec2;
use proptest::prelude::*;

use when_pigs_fly::consts::SIM_DT_MS;
use when_pigs_fly::recap::composite_segments;
use when_pigs_fly::sim::{
    CollectibleColor, Glide, Inventory, PointerEvent, RunState, aim_angle, apply_pointer,
    due_checkpoints, launch_speed, tick,
};
use when_pigs_fly::Tuning;

#[derive(Debug, Clone)]
enum GlideOp {
    Boost(f32),
    Recharge(f32),
}

fn glide_op() -> impl Strategy<Value = GlideOp> {
    prop_oneof![
        (-800.0f32..800.0).prop_map(GlideOp::Boost),
        (0.0f32..5000.0).prop_map(GlideOp::Recharge),
    ]
}

proptest! {
    #[test]
    fn launch_speed_is_monotonic_and_bounded(a in 0.0f32..=1.0, b in 0.0f32..=1.0) {
        let tuning = Tuning::default();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let slow = launch_speed(lo, &tuning);
        let fast = launch_speed(hi, &tuning);
        prop_assert!(slow <= fast);
        prop_assert!(slow >= tuning.min_launch_speed - 1e-3);
        prop_assert!(fast <= tuning.max_launch_speed + 1e-3);
    }

    #[test]
    fn aim_angle_stays_clamped(x in -5000.0f32..5000.0, y in -5000.0f32..5000.0) {
        let tuning = Tuning::default();
        let pivot = Vec2::new(150.0, 600.0);
        let angle = aim_angle(pivot, Vec2::new(x, y), &tuning);
        prop_assert!(angle >= tuning.min_angle() - 1e-6);
        prop_assert!(angle <= tuning.max_angle() + 1e-6);
    }

    #[test]
    fn glide_level_stays_in_bounds(ops in prop::collection::vec(glide_op(), 0..64)) {
        let tuning = Tuning::default();
        let mut glide = Glide::new(&tuning);
        for op in ops {
            match op {
                GlideOp::Boost(vy) => {
                    let mut vel = Vec2::new(200.0, vy);
                    let before = (glide.level, vel);
                    let could = glide.can_boost();
                    let boosted = glide.boost(&mut vel, &tuning);
                    prop_assert_eq!(boosted, could);
                    if boosted {
                        prop_assert!(vel.y >= -tuning.glide_max_rise_speed);
                        prop_assert!(vel.y <= vy.max(-tuning.glide_max_rise_speed));
                    } else {
                        prop_assert_eq!((glide.level, vel), before);
                    }
                }
                GlideOp::Recharge(dt) => glide.recharge(dt),
            }
            prop_assert!(glide.level >= 0.0 && glide.level <= glide.max);
        }
    }

    #[test]
    fn checkpoints_are_strictly_increasing_without_gaps(
        last_step in 0u32..20,
        horizon in 0.0f32..10_000.0,
    ) {
        let tuning = Tuning::default();
        // Any reachable checkpoint is a valid starting point
        let mut last = 0;
        for _ in 0..last_step {
            last = tuning.next_sign_after(last).unwrap();
        }
        let due = due_checkpoints(last, horizon, &tuning);
        let mut prev = last;
        for &m in &due {
            prop_assert_eq!(Some(m), tuning.next_sign_after(prev));
            prop_assert!(m as f32 <= horizon);
            prev = m;
        }
        prop_assert!(tuning.next_sign_after(prev).is_some_and(|n| n as f32 > horizon));
    }

    #[test]
    fn composite_heights_sum_to_one(counts in prop::array::uniform3(0u32..50)) {
        let mut inventory = Inventory::new();
        for (color, n) in CollectibleColor::ALL.iter().zip(counts) {
            for _ in 0..n {
                inventory.add(*color);
            }
        }
        let segments = composite_segments(&inventory, &CollectibleColor::ALL);
        let sum: f32 = segments.iter().map(|s| s.height).sum();
        prop_assert!((sum - 1.0).abs() < 1e-5);
        let nonzero = counts.iter().filter(|&&n| n > 0).count();
        prop_assert_eq!(segments.len(), nonzero.max(1));
        for pair in segments.windows(2) {
            prop_assert!((pair[1].start - (pair[0].start + pair[0].height)).abs() < 1e-6);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn runs_keep_their_invariants(
        seed in any::<u64>(),
        power_ticks in 1usize..120,
        boost_every in 10usize..90,
    ) {
        let mut run = RunState::new(seed, Vec2::new(1280.0, 720.0), Tuning::default());
        let aim = run
            .camera
            .world_to_screen(run.launch_pivot + Vec2::new(100.0, -120.0));
        apply_pointer(&mut run, PointerEvent::Down(aim));
        apply_pointer(&mut run, PointerEvent::Up(aim));
        for _ in 0..power_ticks {
            tick(&mut run, SIM_DT_MS);
        }
        apply_pointer(&mut run, PointerEvent::Down(aim));

        let mut distance = run.distance;
        for i in 0..1200 {
            if i % boost_every == 0 {
                apply_pointer(&mut run, PointerEvent::Down(aim));
            }
            tick(&mut run, SIM_DT_MS);

            prop_assert!(run.distance >= distance);
            distance = run.distance;
            prop_assert!(run.glide.level >= 0.0 && run.glide.level <= run.glide.max);
            for color in CollectibleColor::ALL {
                prop_assert!(run.inventory.get(color) <= run.spawned.collectibles[color.index()]);
            }
        }
    }
}
