// Host-side tests for the canvas renderers, drawn onto a recording surface.

use backdrop_core::config::*;
use backdrop_core::math::fbm;
use backdrop_core::renderers::nebula::{buffer_size, MIN_BUFFER_SIDE};
use backdrop_core::renderers::starfield::{FAR_Z, NEAR_Z};
use backdrop_core::renderers::vector_lanes::GATE_COUNT;
use backdrop_core::renderers::warp::{LATERAL_BOUND, NEAR_PLANE_Z, SPAWN_Z_MAX, SPAWN_Z_MIN};
use backdrop_core::renderers::wireframe::SLICES;
use backdrop_core::renderers::*;
use backdrop_core::{Composite, Frame, RecordingSurface, Renderer, Viewport};
use glam::Vec2;

const DT: f32 = 1.0 / 60.0;

fn viewport() -> Viewport {
    Viewport::new(1280.0, 720.0, 1.0).unwrap()
}

fn frame(i: u32) -> Frame {
    Frame::new(i as f64 * 1000.0 / 60.0, DT)
}

#[test]
fn warp_respawns_inside_spawn_band() {
    let mut warp = WarpField::new(&WarpFieldConfig::default(), 64, 3);
    for p in warp.particles_mut() {
        p.z = NEAR_PLANE_Z + 0.001;
        p.speed = 1.0;
    }
    warp.step(&Frame::new(0.0, 0.03));
    assert_eq!(warp.respawns(), 64);
    for p in warp.particles() {
        assert!(p.z >= SPAWN_Z_MIN && p.z < SPAWN_Z_MAX, "z = {}", p.z);
    }
}

#[test]
fn warp_respawns_particles_pushed_off_the_side() {
    let mut warp = WarpField::new(&WarpFieldConfig::default(), 2, 5);
    {
        let ps = warp.particles_mut();
        ps[0].pos = Vec2::new(2.5, 0.0);
        ps[0].z = 0.5;
        ps[1].pos = Vec2::new(0.0, -2.5);
        ps[1].z = 0.5;
    }
    assert!(2.5 > LATERAL_BOUND);
    warp.step(&Frame::new(0.0, DT));
    assert_eq!(warp.respawns(), 2);
    for p in warp.particles() {
        assert!(p.pos.x.abs() <= 1.2 && p.pos.y.abs() <= 1.2, "pos = {:?}", p.pos);
        assert!(p.z >= SPAWN_Z_MIN && p.z < SPAWN_Z_MAX, "z = {}", p.z);
    }
}

#[test]
fn warp_particles_stay_in_bounds_over_time() {
    let mut warp = WarpField::new(&WarpFieldConfig::default(), 300, 11);
    warp.resize(viewport());
    let mut surface = RecordingSurface::new();
    for i in 0..240 {
        warp.render(&frame(i), &mut surface);
        for p in warp.particles() {
            assert!(p.z > 0.0 && p.z <= 1.0);
        }
    }
    assert!(surface.max_alpha <= 1.0);
}

#[test]
fn spool_decays_to_zero() {
    let mut warp = WarpField::new(&WarpFieldConfig::default(), 10, 1);
    assert_eq!(warp.spool_factor(0.0), 0.0);
    warp.spool(1000.0);
    assert!((warp.spool_factor(1000.0) - 1.0).abs() < 1e-6);
    let mid = warp.spool_factor(1300.0);
    assert!(mid > 0.0 && mid < 1.0);
    assert_eq!(warp.spool_factor(1000.0 + 900.0), 0.0);
}

#[test]
fn spool_speeds_particles_up() {
    let cfg = WarpFieldConfig::default();
    let mut calm = WarpField::new(&cfg, 50, 5);
    let mut spooled = WarpField::new(&cfg, 50, 5);
    for w in [&mut calm, &mut spooled] {
        w.particles_mut().iter_mut().for_each(|p| p.z = 0.8);
    }
    spooled.spool(0.0);
    let before: f32 = calm.particles().iter().map(|p| p.z).sum();
    calm.step(&Frame::new(1.0, 0.016));
    spooled.step(&Frame::new(1.0, 0.016));
    let calm_travel = before - calm.particles().iter().map(|p| p.z).sum::<f32>();
    let spool_travel = before - spooled.particles().iter().map(|p| p.z).sum::<f32>();
    assert!(spool_travel > calm_travel * 2.0, "{spool_travel} vs {calm_travel}");
}

#[test]
fn highlight_glyphs_use_configured_glyph_set() {
    let cfg = WarpFieldConfig {
        highlight_chance: 1.0,
        glyphs: vec!["#".to_string()],
        ..Default::default()
    };
    let mut warp = WarpField::new(&cfg, 40, 9);
    warp.resize(viewport());
    let mut surface = RecordingSurface::new();
    warp.render(&frame(1), &mut surface);
    assert!(surface.texts > 0);
    assert_eq!(surface.last_text.as_deref(), Some("#"));
}

#[test]
fn starfield_recycles_every_star_within_five_seconds() {
    let cfg = StarfieldConfig {
        star_count: 700,
        speed: 0.24,
        depth: 1.0,
        twinkle: 0.65,
        color_mode: StarColorMode::Mono,
    };
    let mut stars = Starfield::new(&cfg, 700, 42);
    for _ in 0..300 {
        stars.step(DT);
        for s in stars.stars() {
            assert!(s.z > 0.0 && s.z <= FAR_Z, "z = {}", s.z);
        }
    }
    assert!(stars.stars().iter().all(|s| s.respawns >= 1));
}

#[test]
fn starfield_masks_the_center() {
    let cfg = StarfieldConfig {
        star_count: 200,
        speed: 0.24,
        depth: 1.0,
        twinkle: 0.65,
        color_mode: StarColorMode::Mono,
    };
    let mut stars = Starfield::new(&cfg, 200, 9);
    stars.resize(viewport());
    let mut surface = RecordingSurface::new();
    stars.render(&frame(1), &mut surface);
    assert_eq!(surface.gradients, 1);
    assert_eq!(surface.composite, Composite::SourceOver);
    assert!(surface.max_alpha <= 1.0);
}

#[test]
fn starfield_initial_depths_are_spread() {
    let cfg = StarfieldConfig {
        star_count: 400,
        speed: 0.3,
        depth: 1.0,
        twinkle: 0.0,
        color_mode: StarColorMode::Prismatic,
    };
    let stars = Starfield::new(&cfg, 400, 1);
    assert!(stars.stars().iter().all(|s| s.z >= NEAR_Z && s.z < FAR_Z));
    assert!(stars.stars().iter().any(|s| s.z < 0.5));
    assert!(stars.stars().iter().any(|s| s.z > 0.5));
}

#[test]
fn ascii_tunnel_draws_text_only() {
    let preset = BackgroundPreset::ascii("", 1.0, 0.5);
    let BackgroundPreset::AsciiTunnel(cfg) = preset else {
        unreachable!()
    };
    let mut tunnel = AsciiTunnel::new(&cfg, 4);
    tunnel.resize(viewport());
    let mut surface = RecordingSurface::new();
    tunnel.render(&frame(1), &mut surface);
    assert!(!tunnel.glyphs().is_empty());
    assert!(surface.texts > 0);
    assert_eq!(surface.lines, 0);
}

#[test]
fn gates_draw_four_rings_on_a_cleared_layer() {
    let gates = GatesConfig {
        rate_hz: 0.8,
        thickness: 1.6,
        glow: 0.9,
    };
    let mut overlay = GatesOverlay::new(&gates);
    overlay.resize(viewport());
    let mut surface = RecordingSurface::new();
    overlay.render(&frame(30), &mut surface);
    assert_eq!(surface.clears, 1);
    assert_eq!(surface.rings, 4);
    for i in 0..4 {
        let p = overlay.ring_progress(i, 1.7);
        assert!((0.0..=1.0).contains(&p));
    }
}

#[test]
fn lane_gates_stay_between_horizon_and_bottom() {
    let cfg = VectorLanesConfig {
        lanes: 3,
        speed: 0.6,
        glow: 0.85,
        color_mode: LaneColorMode::Cyan,
    };
    let mut lanes = VectorLanes::new(&cfg);
    lanes.resize(viewport());
    assert_eq!(lanes.lane_count(), 6, "lane count has a floor");
    for step in 0..100 {
        let t = step as f32 * 0.137;
        for g in 0..GATE_COUNT {
            let y = lanes.gate_y(g, t);
            assert!(y >= lanes.horizon() - 1e-3 && y <= 720.0 + 40.0 + 1e-3, "y = {y}");
        }
    }
    let mut surface = RecordingSurface::new();
    lanes.render(&frame(2), &mut surface);
    assert_eq!(surface.lines, 6 + GATE_COUNT);
}

#[test]
fn wireframe_draws_every_slice() {
    let preset = BackgroundPreset::wireframe(0.78, "#7c5cff");
    let BackgroundPreset::Wireframe(cfg) = preset else {
        unreachable!()
    };
    let mut corridor = WireframeCorridor::new(&cfg);
    corridor.resize(viewport());
    let mut surface = RecordingSurface::new();
    corridor.render(&frame(5), &mut surface);
    assert_eq!(surface.polygons, SLICES);
    assert_eq!(surface.lines, cfg.grid_size as usize + 1);
    assert!(corridor.roll_angle(1.0).abs() <= 0.2);
}

#[test]
fn wireframe_bad_color_falls_back_to_white() {
    let cfg = WireframeConfig {
        grid_size: 10,
        speed: 1.0,
        roll: 0.5,
        color: "not-a-color".to_string(),
    };
    let mut corridor = WireframeCorridor::new(&cfg);
    corridor.resize(viewport());
    let mut surface = RecordingSurface::new();
    corridor.render(&frame(1), &mut surface);
    assert_eq!(surface.polygons, SLICES);
}

#[test]
fn fbm_is_deterministic_and_bounded() {
    for i in 0..200 {
        let x = i as f32 * 0.173 - 8.0;
        let y = i as f32 * -0.291 + 3.0;
        let a = fbm(x, y);
        assert_eq!(a, fbm(x, y));
        assert!((0.0..=1.2).contains(&a), "fbm({x}, {y}) = {a}");
    }
}

#[test]
fn nebula_buffer_is_a_third_with_floor() {
    assert_eq!(buffer_size(&viewport()), (426, 260));
    let small = Viewport::new(300.0, 200.0, 1.0).unwrap();
    assert_eq!(buffer_size(&small), (MIN_BUFFER_SIDE, MIN_BUFFER_SIDE));

    let mut nebula = Nebula::new(&NebulaConfig {
        intensity: 0.9,
        speed: 0.22,
        scale: 1.0,
        color_mode: NebulaColorMode::Sunset,
    });
    nebula.resize(viewport());
    let mut surface = RecordingSurface::new();
    nebula.render(&frame(0), &mut surface);
    assert_eq!(surface.blits, 1);
    let buf = nebula.buffer();
    assert_eq!(buf.data.len(), (buf.width * buf.height * 4) as usize);
    assert_eq!(nebula.min_interval_ms(), Some(140.0));
}

#[test]
fn raymarch_uniforms_are_sanitized() {
    let params = RaymarchParams::from_config(&RaymarchConfig {
        intensity: 3.0,
        speed: 0.0,
        palette: RaymarchPalette::Infra,
    });
    let u = params.uniforms(2.5, 0, 600);
    assert_eq!(u.intensity, 1.0);
    assert_eq!(u.speed, 0.25);
    assert_eq!(u.palette, 2.0);
    assert_eq!(u.resolution, [1.0, 600.0]);
    assert_eq!(std::mem::size_of_val(&u), 32);
    assert_eq!(bytemuck::bytes_of(&u).len(), 32);
}

#[test]
fn warp_pointer_only_nudges() {
    let mut warp = WarpField::new(&WarpFieldConfig::default(), 20, 2);
    warp.particles_mut().iter_mut().for_each(|p| p.z = 0.8);
    let before: Vec<Vec2> = warp.particles().iter().map(|p| p.pos).collect();
    warp.pointer(Vec2::new(1.0, -1.0));
    warp.step(&Frame::new(16.0, DT));
    for (p, b) in warp.particles().iter().zip(before) {
        assert!(p.pos.distance(b) < 0.05);
    }
}
