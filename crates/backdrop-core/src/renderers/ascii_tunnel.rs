use crate::color::Rgba;
use crate::config::AsciiTunnelConfig;
use crate::math::{clamp01, perspective, rotate};
use crate::renderer::{Frame, Renderer, Viewport};
use crate::surface::{simple_center_mask, Composite, Surface};
use glam::Vec2;
use rand::prelude::*;
use std::f32::consts::TAU;

pub const DEFAULT_GLYPH_SET: &str = "░▒▓█<>/\\[]{}()";
const BASE_COUNT: f32 = 420.0;
const NEAR_Z: f32 = 0.05;
const BOUND: f32 = 2.4;
const BLOOM_MIN_SIZE: f32 = 26.0;

#[derive(Clone, Debug, PartialEq)]
pub struct TunnelGlyph {
    pub pos: Vec2,
    pub z: f32,
    pub glyph: usize,
    pub hue: f32,
    pub weight: f32,
}

pub struct AsciiTunnel {
    glyphs: Vec<String>,
    list: Vec<TunnelGlyph>,
    speed: f32,
    swirl: f32,
    chroma: f32,
    rng: StdRng,
    viewport: Viewport,
}

fn make_glyph(rng: &mut StdRng, set_len: usize, random_z: bool) -> TunnelGlyph {
    let a = rng.gen::<f32>() * TAU;
    let r = rng.gen::<f32>() * 1.3;
    TunnelGlyph {
        pos: Vec2::new(a.cos(), a.sin()) * r,
        z: if random_z { rng.gen::<f32>() * 0.9 + 0.1 } else { 1.0 },
        glyph: rng.gen_range(0..set_len.max(1)),
        hue: 190.0 + rng.gen::<f32>() * 120.0,
        weight: rng.gen(),
    }
}

impl AsciiTunnel {
    pub fn new(cfg: &AsciiTunnelConfig, seed: u64) -> Self {
        let set = match cfg.glyphs.trim() {
            "" => DEFAULT_GLYPH_SET,
            s => s,
        };
        let glyphs: Vec<String> = set.chars().map(String::from).collect();
        let density = cfg.density.max(0.2);
        let count = (BASE_COUNT * density).floor() as usize;
        let mut rng = StdRng::seed_from_u64(seed);
        let list = (0..count)
            .map(|_| make_glyph(&mut rng, glyphs.len(), true))
            .collect();
        Self {
            glyphs,
            list,
            speed: cfg.speed.max(0.08),
            swirl: cfg.swirl.max(0.0),
            chroma: clamp01(cfg.chroma),
            rng,
            viewport: Viewport::default(),
        }
    }

    pub fn glyphs(&self) -> &[TunnelGlyph] {
        &self.list
    }

    pub fn step(&mut self, dt: f32) {
        let set_len = self.glyphs.len();
        for p in self.list.iter_mut() {
            p.z -= dt * self.speed * (0.35 + (1.0 - p.z) * 1.35);
            if p.z <= NEAR_Z || p.pos.x.abs() > BOUND || p.pos.y.abs() > BOUND {
                *p = make_glyph(&mut self.rng, set_len, false);
                continue;
            }
            if self.swirl > 0.0 {
                p.pos = rotate(p.pos, (0.35 + (1.0 - p.z) * 1.2) * self.swirl * dt);
            }
        }
    }
}

impl Renderer for AsciiTunnel {
    fn name(&self) -> &'static str {
        "asciiTunnel"
    }

    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn render(&mut self, frame: &Frame, surface: &mut dyn Surface) {
        self.step(frame.dt);

        let vp = self.viewport;
        let c = vp.center();
        surface.set_composite(Composite::SourceOver);
        surface.set_alpha(1.0);
        surface.fill_rect(0.0, 0.0, vp.width, vp.height, Rgba::BLACK.with_alpha(0.22));
        surface.set_composite(Composite::Lighter);

        for p in &self.list {
            let persp = perspective(p.z, 0.9, 0.08);
            let s = c + Vec2::new(p.pos.x * vp.width, p.pos.y * vp.height) * 0.38 * persp;
            if s.x < -80.0 || s.x > vp.width + 80.0 || s.y < -80.0 || s.y > vp.height + 80.0 {
                continue;
            }
            let size = (10.0 + 28.0 * persp).max(10.0);
            let a = ((0.08 + (1.0 - p.z) * 0.22) * (0.75 + p.weight * 0.4)).min(1.0);
            let glyph = self.glyphs.get(p.glyph).map(String::as_str).unwrap_or("·");
            let color = Rgba::from_hsl(p.hue, 0.9, 0.7);

            surface.set_alpha(a);
            surface.fill_text(glyph, s, size, color);

            if self.chroma > 0.02 {
                let off = Vec2::X * self.chroma * (1.5 + (1.0 - p.z) * 6.0);
                surface.set_alpha(a * 0.32);
                surface.fill_text(glyph, s - off, size, Rgba::from_hsl(p.hue + 55.0, 0.95, 0.72));
                surface.fill_text(glyph, s + off, size, Rgba::from_hsl(p.hue + 205.0, 0.95, 0.72));
            }

            if size > BLOOM_MIN_SIZE {
                surface.set_alpha(a * 0.08);
                surface.fill_circle(s, size * 0.6, color);
            }
        }

        surface.set_alpha(1.0);
        surface.set_composite(Composite::SourceOver);
        simple_center_mask(surface, vp.width, vp.height, 0.22, 0.55);
    }
}
