// Host-side tests for the headline wormhole displacement.

use backdrop_core::hero::wormhole::*;
use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn headline() -> Vec<CharBox> {
    (0..12)
        .map(|i| CharBox {
            center: Vec2::new(100.0 + i as f32 * 60.0, 200.0),
            height: 64.0,
        })
        .collect()
}

const VIEWPORT: Vec2 = Vec2::new(1280.0, 800.0);

#[test]
fn container_shift_is_clamped_then_scaled() {
    let s = container_shift(Vec2::new(1000.0, -50.0));
    assert!((s.x - 300.0 * 0.28).abs() < 1e-4);
    assert!((s.y + 50.0 * 0.28).abs() < 1e-4);
    assert_eq!(container_shift(Vec2::ZERO), Vec2::ZERO);
}

#[test]
fn shifts_are_deterministic_per_run() {
    let run = WormholeRun { variant: 5, run_id: 3 };
    let a = char_shifts(&headline(), VIEWPORT, run);
    let b = char_shifts(&headline(), VIEWPORT, run);
    assert_eq!(a, b);
    assert_eq!(a.len(), 12);

    let other = char_shifts(&headline(), VIEWPORT, run.next().next());
    assert_ne!(a, other);
}

#[test]
fn x_axis_variant_keeps_glyphs_on_their_line() {
    let run = WormholeRun { variant: 2, run_id: 1 };
    assert_eq!(run.params().axis, Axis::X);
    for s in char_shifts(&headline(), VIEWPORT, run) {
        assert_eq!(s.offset.y, 0.0);
    }
}

#[test]
fn far_glyphs_move_more_and_shrink_within_scale() {
    let run = WormholeRun { variant: 0, run_id: 1 };
    let chars = [
        CharBox {
            center: Vec2::new(640.0, 400.0),
            height: 64.0,
        },
        CharBox {
            center: Vec2::new(40.0, 40.0),
            height: 64.0,
        },
    ];
    let shifts = char_shifts(&chars, VIEWPORT, run);
    assert!(shifts[0].offset.length() < 1e-3, "centered glyph stays put");
    assert!(shifts[1].offset.length() > 10.0);
    for s in &shifts {
        assert!(s.shrink >= 0.0 && s.shrink <= run.params().scale + 1e-6);
    }
}

#[test]
fn runs_cycle_through_variants() {
    let mut rng = StdRng::seed_from_u64(9);
    let first = WormholeRun::first(&mut rng);
    assert_eq!(first.run_id, 1);
    assert!(first.variant < WORMHOLE_VARIANT_COUNT);

    let mut run = first;
    for _ in 0..WORMHOLE_VARIANT_COUNT {
        run = run.next();
    }
    assert_eq!(run.variant, first.variant);
    assert_eq!(run.run_id, 1 + WORMHOLE_VARIANT_COUNT as u32);
}
