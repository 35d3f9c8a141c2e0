//! Particle warp tunnel with glyph highlights and spool bursts.

use crate::color::{palette_or_white, Rgba};
use crate::config::{StreakMode, WarpFieldConfig};
use crate::math::{ease_out_cubic, lerp, perspective, pseudo_noise, rotate};
use crate::renderer::{Frame, Renderer, Viewport};
use crate::surface::{center_mask, Composite, Surface};
use glam::Vec2;
use rand::prelude::*;
use std::f32::consts::TAU;

pub const NEAR_PLANE_Z: f32 = 0.04;
pub const LATERAL_BOUND: f32 = 2.2;
pub const SPAWN_Z_MIN: f32 = 0.1;
pub const SPAWN_Z_MAX: f32 = 1.0;
const SPAWN_RADIUS: f32 = 1.2;
const MOUSE_SMOOTHING: f32 = 0.06;
const CENTER_PULL_PER_SEC: f32 = 0.015;
const CULL_MARGIN: f32 = 50.0;
const FALLBACK_GLYPH: &str = "•";

#[derive(Clone, Debug, PartialEq)]
pub struct WarpParticle {
    pub pos: Vec2,
    /// 0 near, 1 far.
    pub z: f32,
    pub size: f32,
    pub speed: f32,
    pub drift: f32,
    pub highlight: bool,
    pub color: usize,
    pub glyph: usize,
}

pub struct WarpField {
    cfg: WarpFieldConfig,
    palette: Vec<Rgba>,
    particles: Vec<WarpParticle>,
    rng: StdRng,
    viewport: Viewport,
    mouse: Vec2,
    mouse_target: Vec2,
    spool_start: Option<f64>,
    respawns: u64,
}

impl WarpField {
    pub fn new(cfg: &WarpFieldConfig, count: usize, seed: u64) -> Self {
        let cfg = cfg.sanitized();
        let palette = palette_or_white(&cfg.palette_stops);
        let mut rng = StdRng::seed_from_u64(seed);
        let particles = (0..count)
            .map(|_| spawn(&mut rng, &cfg, palette.len()))
            .collect();
        Self {
            cfg,
            palette,
            particles,
            rng,
            viewport: Viewport::default(),
            mouse: Vec2::ZERO,
            mouse_target: Vec2::ZERO,
            spool_start: None,
            respawns: 0,
        }
    }

    pub fn config(&self) -> &WarpFieldConfig {
        &self.cfg
    }

    pub fn particles(&self) -> &[WarpParticle] {
        &self.particles
    }

    /// Mutable pool access, for placing particles in tests.
    pub fn particles_mut(&mut self) -> &mut [WarpParticle] {
        &mut self.particles
    }

    pub fn respawns(&self) -> u64 {
        self.respawns
    }

    /// 1 at the start of a burst, eased to 0 over `spool_duration_ms`.
    pub fn spool_factor(&self, now_ms: f64) -> f32 {
        let Some(start) = self.spool_start else {
            return 0.0;
        };
        let duration = self.cfg.spool_duration_ms.max(1.0) as f64;
        let elapsed = (now_ms - start).max(0.0);
        if elapsed >= duration {
            return 0.0;
        }
        1.0 - ease_out_cubic((elapsed / duration) as f32)
    }

    fn pulse(&self, t: f32) -> f32 {
        if self.cfg.pulse_rate_hz <= 0.0 || self.cfg.pulse_depth <= 0.0 {
            return 1.0;
        }
        (1.0 + self.cfg.pulse_depth * (TAU * self.cfg.pulse_rate_hz * t).sin()).max(0.0)
    }

    /// Advance the simulation without drawing.
    pub fn step(&mut self, frame: &Frame) {
        let t = frame.time();
        let dt = frame.dt;
        let spool = self.spool_factor(frame.now_ms);
        if self.spool_start.is_some() && spool == 0.0 {
            self.spool_start = None;
        }
        let boost = self.cfg.base_speed * (1.0 + spool * self.cfg.spool_boost) * self.pulse(t);

        self.mouse += (self.mouse_target - self.mouse) * MOUSE_SMOOTHING;

        let palette_len = self.palette.len();
        for p in self.particles.iter_mut() {
            p.z -= p.speed * boost * dt;
            if p.z <= NEAR_PLANE_Z || p.pos.x.abs() > LATERAL_BOUND || p.pos.y.abs() > LATERAL_BOUND {
                *p = spawn(&mut self.rng, &self.cfg, palette_len);
                self.respawns += 1;
                continue;
            }

            let n = pseudo_noise(p.pos.x * 1.8, p.pos.y * 1.8, p.z * 1.2, t);
            let angle = n * TAU;
            let near = 1.0 - p.z;
            let drift = p.drift * (0.6 + near);
            p.pos += Vec2::new(angle.cos(), angle.sin()) * drift * dt
                + self.mouse * self.cfg.mouse_strength * near;

            if self.cfg.swirl_strength > 0.0 {
                let a = self.cfg.swirl_strength * (0.35 + near * 1.2) * dt;
                p.pos = rotate(p.pos, a);
            }

            p.pos *= 1.0 - dt * CENTER_PULL_PER_SEC;
        }
    }

    /// Screen position of a particle, or `None` when culled.
    fn project(&self, p: &WarpParticle, scale: f32, roll: f32, shake: Vec2) -> Option<Vec2> {
        let vp = self.viewport;
        let persp = perspective(p.z, 0.9, 0.08);
        let mut off = Vec2::new(p.pos.x * vp.width, p.pos.y * vp.height) * scale * persp;
        if self.cfg.lens_strength > 0.0 {
            let r = off.length() / (0.5 * vp.min_side());
            off *= 1.0 + self.cfg.lens_strength * r;
        }
        if roll != 0.0 {
            off = rotate(off, roll);
        }
        let s = vp.center() + off + shake;
        let inside = s.x >= -CULL_MARGIN
            && s.x <= vp.width + CULL_MARGIN
            && s.y >= -CULL_MARGIN
            && s.y <= vp.height + CULL_MARGIN;
        inside.then_some(s)
    }

    fn draw(&self, frame: &Frame, surface: &mut dyn Surface) {
        let cfg = &self.cfg;
        let vp = self.viewport;
        let t = frame.time();
        let spool = self.spool_factor(frame.now_ms);

        let trail = lerp(cfg.trail_fade, cfg.trail_fade_spool, spool);
        surface.set_composite(Composite::SourceOver);
        surface.set_alpha(1.0);
        surface.fill_rect(0.0, 0.0, vp.width, vp.height, Rgba::BLACK.with_alpha(trail));
        surface.set_composite(Composite::Lighter);

        let scale = cfg.tunnel_scale + cfg.tunnel_scale_spool_boost * spool;
        let roll = cfg.camera_roll * (t * cfg.camera_roll_rate).sin();
        let shake = if cfg.shake != 0.0 {
            Vec2::new((t * 47.0).sin(), (t * 53.0).cos()) * cfg.shake * (1.0 + spool)
        } else {
            Vec2::ZERO
        };
        let glow = cfg.glow_base + cfg.glow_spool_boost * spool;
        let size_boost = 1.0 + cfg.size_spool_boost * spool;

        for p in &self.particles {
            let Some(s) = self.project(p, scale, roll, shake) else {
                continue;
            };
            let near = 1.0 - p.z;
            let persp = perspective(p.z, 0.9, 0.08);
            let size = p.size * persp * (0.45 + near) * size_boost;
            let base = if p.highlight { 0.7 } else { 0.18 };
            let spool_gain = if p.highlight { 1.2 } else { 0.4 };
            let alpha = (base * (0.55 + near) * (1.0 + spool * spool_gain)).min(1.0);

            let streak = match cfg.streak_mode {
                StreakMode::None => false,
                StreakMode::Highlights => p.highlight,
                StreakMode::All => true,
            };
            if streak && cfg.streak_length > 0.0 {
                let dir = (s - vp.center()).normalize_or_zero();
                let len = cfg.streak_length * near * (0.25 + spool);
                let color = if p.highlight { self.palette[p.color] } else { Rgba::WHITE };
                surface.set_alpha(alpha * if p.highlight { 0.55 } else { 0.35 });
                surface.stroke_line(s - dir * len, s, (size * 0.35).max(0.6), color);
            }

            if p.highlight {
                let color = self.palette[p.color];
                let glyph = cfg.glyphs.get(p.glyph).map(String::as_str).unwrap_or(FALLBACK_GLYPH);
                let font = (size * 9.0).max(10.0);
                surface.set_alpha(alpha);
                surface.set_shadow(glow, color);
                surface.fill_text(glyph, s, font, color);
                surface.set_shadow(0.0, Rgba::TRANSPARENT);

                if cfg.chroma_offset > 0.0 && self.palette.len() > 1 {
                    let n = self.palette.len();
                    let dx = Vec2::X * cfg.chroma_offset * (1.5 + near * 4.0);
                    surface.set_alpha(alpha * 0.35);
                    surface.fill_text(glyph, s - dx, font, self.palette[(p.color + 1) % n]);
                    surface.fill_text(glyph, s + dx, font, self.palette[(p.color + 2) % n]);
                }
            } else {
                surface.set_alpha(alpha);
                surface.fill_rect(s.x, s.y, size, size, Rgba::WHITE);
            }
        }

        surface.set_alpha(1.0);
        surface.set_composite(Composite::SourceOver);
        center_mask(
            surface,
            vp.width,
            vp.height,
            cfg.center_mask_strength,
            cfg.center_mask_radius,
            cfg.center_mask_softness,
        );
    }
}

fn spawn(rng: &mut StdRng, cfg: &WarpFieldConfig, palette_len: usize) -> WarpParticle {
    let angle = rng.gen::<f32>() * TAU;
    let radius = rng.gen::<f32>() * SPAWN_RADIUS;
    let highlight = rng.gen::<f32>() < cfg.highlight_chance;
    let mut size = lerp(cfg.particle_size_min, cfg.particle_size_max, rng.gen());
    if highlight {
        size *= 1.6;
    }
    WarpParticle {
        pos: Vec2::new(angle.cos(), angle.sin()) * radius,
        z: rng.gen_range(SPAWN_Z_MIN..SPAWN_Z_MAX),
        size,
        speed: lerp(cfg.particle_speed_min, cfg.particle_speed_max, rng.gen()),
        drift: lerp(cfg.particle_drift_min, cfg.particle_drift_max, rng.gen()),
        highlight,
        color: rng.gen_range(0..palette_len.max(1)),
        glyph: rng.gen_range(0..cfg.glyphs.len().max(1)),
    }
}

impl Renderer for WarpField {
    fn name(&self) -> &'static str {
        "warp"
    }

    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn render(&mut self, frame: &Frame, surface: &mut dyn Surface) {
        self.step(frame);
        self.draw(frame, surface);
    }

    fn spool(&mut self, now_ms: f64) {
        self.spool_start = Some(now_ms);
    }

    fn pointer(&mut self, ndc: Vec2) {
        self.mouse_target = ndc;
    }
}
