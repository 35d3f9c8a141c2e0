use crate::color::Rgba;
use crate::config::{StarColorMode, StarfieldConfig};
use crate::math::{clamp01, perspective};
use crate::renderer::{Frame, Renderer, Viewport};
use crate::surface::{simple_center_mask, Composite, Surface};
use glam::Vec2;
use rand::prelude::*;
use std::f32::consts::TAU;

pub const FAR_Z: f32 = 1.0;
pub const NEAR_Z: f32 = 0.02;
// Recession speed at the far plane, as a fraction of the configured speed
const FAR_RATE: f32 = 0.4;
const NEAR_RATE_GAIN: f32 = 1.25;
const FADE_ALPHA: f32 = 0.25;

const MONO: &[Rgba] = &[Rgba::WHITE];
const COOL: &[Rgba] = &[Rgba::rgb(0xbf, 0xef, 0xff), Rgba::rgb(0x7f, 0xd9, 0xff), Rgba::WHITE];
const PRISMATIC: &[Rgba] = &[
    Rgba::rgb(0x00, 0xe0, 0xff),
    Rgba::rgb(0x7c, 0x5c, 0xff),
    Rgba::rgb(0xff, 0x4e, 0xcd),
    Rgba::WHITE,
];

pub fn star_palette(mode: StarColorMode) -> &'static [Rgba] {
    match mode {
        StarColorMode::Mono => MONO,
        StarColorMode::Cool => COOL,
        StarColorMode::Prismatic => PRISMATIC,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Star {
    /// Lateral position, roughly -1.2..1.2.
    pub pos: Vec2,
    pub z: f32,
    pub size: f32,
    pub phase: f32,
    /// How many times this slot has been recycled.
    pub respawns: u32,
}

pub struct Starfield {
    stars: Vec<Star>,
    speed: f32,
    depth: f32,
    twinkle: f32,
    palette: &'static [Rgba],
    rng: StdRng,
    viewport: Viewport,
}

fn make_star(rng: &mut StdRng, z: f32) -> Star {
    Star {
        pos: Vec2::new(rng.gen_range(-1.0f32..1.0), rng.gen_range(-1.0f32..1.0)) * 1.2,
        z,
        size: 0.6 + rng.gen::<f32>() * 1.9,
        phase: rng.gen::<f32>() * TAU,
        respawns: 0,
    }
}

impl Starfield {
    pub fn new(cfg: &StarfieldConfig, count: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let stars = (0..count)
            .map(|_| {
                let z = rng.gen_range(NEAR_Z..FAR_Z);
                make_star(&mut rng, z)
            })
            .collect();
        Self {
            stars,
            speed: cfg.speed.max(0.02),
            depth: cfg.depth.max(0.2),
            twinkle: clamp01(cfg.twinkle),
            palette: star_palette(cfg.color_mode),
            rng,
            viewport: Viewport::default(),
        }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn step(&mut self, dt: f32) {
        for s in self.stars.iter_mut() {
            s.z -= dt * self.speed * (FAR_RATE + (1.0 - s.z) * NEAR_RATE_GAIN);
            if s.z <= NEAR_Z {
                let respawns = s.respawns + 1;
                *s = make_star(&mut self.rng, FAR_Z);
                s.respawns = respawns;
            }
        }
    }
}

impl Renderer for Starfield {
    fn name(&self) -> &'static str {
        "starfield"
    }

    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn render(&mut self, frame: &Frame, surface: &mut dyn Surface) {
        self.step(frame.dt);

        let vp = self.viewport;
        let c = vp.center();
        let t = frame.time();

        surface.set_composite(Composite::SourceOver);
        surface.set_alpha(1.0);
        surface.fill_rect(0.0, 0.0, vp.width, vp.height, Rgba::BLACK.with_alpha(FADE_ALPHA));
        surface.set_composite(Composite::Lighter);

        for (i, s) in self.stars.iter().enumerate() {
            let p = perspective(s.z, self.depth, 0.08);
            let x = c.x + s.pos.x * vp.width * 0.36 * p;
            let y = c.y + s.pos.y * vp.height * 0.36 * p;
            if x < -20.0 || x > vp.width + 20.0 || y < -20.0 || y > vp.height + 20.0 {
                continue;
            }
            let size = s.size * p;
            let tw = if self.twinkle > 0.0 {
                0.7 + 0.3 * (t + s.phase).sin()
            } else {
                1.0
            };
            let a = ((0.12 + (1.0 - s.z) * 0.24) * tw).min(1.0);
            let color = self.palette[i % self.palette.len()];

            surface.set_alpha(a);
            surface.fill_rect(x, y, size, size, color);
            if size > 2.2 {
                surface.set_alpha(a * 0.18);
                surface.fill_circle(Vec2::new(x, y), size * 2.1, color);
            }
        }

        simple_center_mask(surface, vp.width, vp.height, 0.24, 0.55);
    }
}
