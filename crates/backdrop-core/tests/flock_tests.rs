// Host-side tests for the below-the-fold particle field and its wordmark.

use backdrop_core::flock::letters::{densest_cells, place_letters, text_points, MIN_LETTER_SPACING};
use backdrop_core::flock::*;
use backdrop_core::RecordingSurface;
use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn page() -> PageMetrics {
    PageMetrics::new(1200.0, 800.0, 4000.0)
}

fn letter(ch: char, pos: Vec2) -> LetterPlacement {
    LetterPlacement {
        ch,
        pos,
        angle: 0.0,
        drift: Vec2::ZERO,
        delay: 0.0,
    }
}

#[test]
fn depth_ratio_spans_fold_to_bottom() {
    let p = page();
    assert_eq!(p.depth_ratio(800.0), 0.0);
    assert_eq!(p.depth_ratio(100.0), 0.0);
    assert!((p.depth_ratio(2400.0) - 0.5).abs() < 1e-6);
    assert_eq!(p.depth_ratio(9000.0), 1.0);

    let short = PageMetrics::new(100.0, 800.0, 500.0);
    assert_eq!(short.height, 800.0);
    assert_eq!(short.depth_ratio(900.0), 0.0);
}

#[test]
fn flock_count_scales_with_viewport_and_page() {
    let mut rng = StdRng::seed_from_u64(4);
    let flocks = generate_flocks(&page(), &mut rng);
    // 4 base + 1 for 1200x800 + 4 full-width for a 4000px page.
    assert_eq!(flocks.len(), 9);
    let (local, wide) = flocks.split_at(5);
    assert!(local.iter().all(|f| !f.full_width && (15..140).contains(&f.size)));
    assert!(local.iter().all(|f| (150.0..=1200.0).contains(&f.spread)));
    assert!(wide
        .iter()
        .all(|f| f.full_width && f.density == Density::UltraSparse));
}

#[test]
fn field_spawns_every_flock_member() {
    let field = ParticleField::new(page(), 1.0, 7);
    let total: usize = field.flocks().iter().map(|f| f.size).sum();
    assert_eq!(field.particles().len(), total);
    assert_eq!(field.assignments().len(), total);
    for p in field.particles() {
        assert!(p.flock < field.flocks().len());
        if p.pos.y <= 800.0 {
            assert_eq!(p.opacity, 0.0, "nothing shows above the fold");
        }
        assert!(p.opacity <= 0.9);
    }
}

#[test]
fn trail_keeps_the_last_ten_positions() {
    let mut trail = Trail::default();
    assert!(trail.is_empty());
    for i in 0..15 {
        trail.push(Vec2::new(i as f32, 0.0));
    }
    assert_eq!(trail.len(), field::TRAIL_LEN);
    let xs: Vec<f32> = trail.iter().map(|p| p.x).collect();
    assert_eq!(xs, (5..15).map(|i| i as f32).collect::<Vec<_>>());
    assert_eq!(trail.last(), Some(Vec2::new(14.0, 0.0)));

    trail.reset(Vec2::ONE);
    assert_eq!(trail.len(), 1);
    assert_eq!(trail.last(), Some(Vec2::ONE));
}

#[test]
fn trails_stay_bounded_while_ticking() {
    let mut field = ParticleField::new(page(), 1.0, 3);
    for i in 0..40 {
        field.tick(i as f64 * 16.0);
    }
    assert!(field.particles().iter().all(|p| p.trail.len() <= field::TRAIL_LEN));
}

#[test]
fn wrapping_resets_the_trail() {
    let mut field = ParticleField::new(page(), 1.0, 3);
    for i in 0..12 {
        field.tick(i as f64 * 16.0);
    }
    {
        let p = &mut field.particles_mut()[0];
        p.pos = Vec2::new(1200.0 + 49.9, 2000.0);
        p.vel = Vec2::new(3.0, 0.0);
    }
    field.tick(12.0 * 16.0);
    let p = &field.particles()[0];
    assert_eq!(p.pos.x, -50.0);
    assert_eq!(p.trail.len(), 1);
}

#[test]
fn formation_needs_time_and_scroll() {
    let mut field = ParticleField::new(page(), 1.0, 5);
    field.tick(0.0);
    field.tick(20_001.0);
    assert!(!field.formation().is_forming(), "page not scrolled yet");

    field.set_scroll(1000.0);
    field.tick(30_000.0);
    assert!(!field.formation().is_forming(), "toggle interval not elapsed");
    field.tick(40_002.0);
    assert!(field.formation().is_forming());
    assert_eq!(field.formation().letters().len(), WORDMARK.chars().count());
    assert!((field.formation().progress() - field::FORM_RATE).abs() < 1e-6);

    let points = field.text_points().len();
    assert!(points > 0);
    let assigned = field.assignments().iter().flatten().count();
    assert_eq!(assigned, points.min(field.particles().len()));

    for k in 1..20 {
        field.tick(40_002.0 + k as f64 * 16.0);
    }
    let formed = field.formation().progress();
    field.tick(60_003.0);
    assert!(!field.formation().is_forming());
    assert!(field.formation().progress() < formed, "release fades out");
}

#[test]
fn letters_keep_their_distance_on_a_roomy_page() {
    let roomy = PageMetrics::new(20_000.0, 800.0, 20_000.0);
    let mut rng = StdRng::seed_from_u64(1);
    let letters = place_letters(std::iter::empty(), &roomy, &mut rng);
    assert_eq!(letters.len(), 10);
    for (i, a) in letters.iter().enumerate() {
        assert!(a.pos.y >= 800.0 + 50.0);
        assert!(a.delay >= 0.0 && a.delay <= 0.3);
        for b in &letters[i + 1..] {
            assert!(a.pos.distance(b.pos) >= MIN_LETTER_SPACING);
        }
    }
}

#[test]
fn narrow_page_falls_back_to_a_single_column() {
    let narrow = PageMetrics::new(300.0, 800.0, 3000.0);
    let mut rng = StdRng::seed_from_u64(2);
    let letters = place_letters(std::iter::empty(), &narrow, &mut rng);
    assert_eq!(letters.len(), 10);
    for l in &letters {
        assert!((100.0..=120.0).contains(&l.pos.x), "x = {}", l.pos.x);
        assert!(l.pos.y >= 850.0);
    }
}

#[test]
fn densest_cells_ignore_the_first_screen() {
    let positions = [
        Vec2::new(250.0, 1050.0),
        Vec2::new(260.0, 1090.0),
        Vec2::new(390.0, 1001.0),
        Vec2::new(50.0, 1050.0),
        Vec2::new(50.0, 50.0),
        Vec2::new(60.0, 50.0),
        Vec2::new(70.0, 50.0),
        Vec2::new(80.0, 50.0),
    ];
    let cells = densest_cells(positions.into_iter(), 800.0, 5);
    assert_eq!(
        cells,
        vec![(Vec2::new(300.0, 1100.0), 3), (Vec2::new(100.0, 1100.0), 1)]
    );
}

#[test]
fn glyphs_become_one_point_per_lit_cell() {
    let mut out = Vec::new();
    text_points(&[letter('J', Vec2::new(1000.0, 1000.0))], &mut out);
    assert_eq!(out.len(), 11);
    assert!(out.iter().all(|p| p.letter == 0));

    text_points(
        &[letter('_', Vec2::new(0.0, 0.0)), letter('?', Vec2::ZERO)],
        &mut out,
    );
    assert_eq!(out.len(), 5, "unknown glyphs are skipped and out is cleared");
    assert!(out.iter().all(|p| (p.pos.y - out[0].pos.y).abs() < 1e-4));
}

#[test]
fn obstacles_cover_their_rect() {
    let o = Obstacle::from_rect(100.0, 200.0, 300.0, 100.0);
    assert_eq!(o.center, Vec2::new(250.0, 250.0));
    assert_eq!(o.radius, 150.0);
}

#[test]
fn pointer_and_obstacles_push_particles_away() {
    let mut plain = ParticleField::new(page(), 1.0, 8);
    let mut pointed = ParticleField::new(page(), 1.0, 8);
    let mut blocked = ParticleField::new(page(), 1.0, 8);
    let at = plain.particles()[0].pos;

    pointed.set_pointer(Some(at + Vec2::new(10.0, 0.0)));
    blocked.set_obstacles([Obstacle {
        center: at + Vec2::new(10.0, 0.0),
        radius: 200.0,
    }]);
    for f in [&mut plain, &mut pointed, &mut blocked] {
        f.tick(0.0);
    }
    let base = plain.particles()[0].vel.x;
    assert!(pointed.particles()[0].vel.x < base);
    assert!(blocked.particles()[0].vel.x < base);
}

#[test]
fn draw_clears_once_and_skips_invisible_particles() {
    let mut field = ParticleField::new(page(), 1.0, 6);
    for i in 0..20 {
        field.tick(i as f64 * 16.0);
    }
    let mut s = RecordingSurface::new();
    field.draw(&mut s);
    let visible = field.particles().iter().filter(|p| p.opacity > 0.0).count();
    assert_eq!(s.clears, 1);
    assert_eq!(s.circles, visible);
    assert_eq!(s.gradients, visible);
    assert!(s.max_alpha <= 1.0);

    let hidden = ParticleField::new(page(), 0.0, 6);
    let mut s = RecordingSurface::new();
    hidden.draw(&mut s);
    assert_eq!(s.circles + s.lines + s.gradients, 0);
}
