//! Decorative below-the-fold particle field: boid flocks that now and then
//! gather into a wordmark.
//!
//! Everything here steps once per display frame in page coordinates (CSS
//! pixels from the top of the document).

pub mod field;
pub mod letters;

pub use field::{FieldParticle, Formation, Obstacle, ParticleField, Trail};
pub use letters::{LetterPlacement, TextPoint, WORDMARK};

use crate::color::Rgba;
use glam::Vec2;
use rand::prelude::*;
use std::f32::consts::{PI, TAU};

pub const FLOCK_PALETTE: [Rgba; 4] = [
    Rgba::rgb(0x00, 0xe0, 0xff),
    Rgba::rgb(0xff, 0x4e, 0xcd),
    Rgba::rgb(0xff, 0xb5, 0x00),
    Rgba::rgb(0x4a, 0x9e, 0xff),
];

const BASE_FLOCKS: usize = 4;
// One extra flock per this much viewport area (px²)
const AREA_PER_EXTRA_FLOCK: f32 = 600_000.0;
// One full-width sparse flock per this much page height
const PAGE_PER_SPARSE_FLOCK: f32 = 1000.0;

/// Document geometry the field lives in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageMetrics {
    pub width: f32,
    /// Height of the first screen; the field stays below it.
    pub fold: f32,
    pub height: f32,
}

impl PageMetrics {
    pub fn new(width: f32, fold: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            fold: fold.max(0.0),
            height: height.max(fold).max(1.0),
        }
    }

    /// 0 at the fold, 1 at the bottom of the page.
    pub fn depth_ratio(&self, y: f32) -> f32 {
        let span = self.height - self.fold;
        if span <= 0.0 {
            return 0.0;
        }
        ((y - self.fold) / span).clamp(0.0, 1.0)
    }
}

/// How loosely a flock holds together.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Density {
    Tight,
    Medium,
    Loose,
    Scattered,
    Sparse,
    UltraSparse,
}

impl Density {
    pub const ALL: [Density; 6] = [
        Density::Tight,
        Density::Medium,
        Density::Loose,
        Density::Scattered,
        Density::Sparse,
        Density::UltraSparse,
    ];

    /// Spawn offset multiplier from the flock center.
    pub fn spread_factor(self) -> f32 {
        match self {
            Density::Tight => 0.3,
            Density::Medium => 0.6,
            Density::Loose => 1.0,
            Density::Scattered => 1.5,
            Density::Sparse => 3.0,
            Density::UltraSparse => 10.0,
        }
    }

    /// Neighbour radius multiplier.
    pub fn influence(self) -> f32 {
        match self {
            Density::Tight => 0.7,
            Density::Medium => 1.0,
            Density::Loose => 1.3,
            Density::Scattered => 1.8,
            Density::Sparse => 3.0,
            Density::UltraSparse => 5.0,
        }
    }

    pub fn cohesion(self) -> f32 {
        match self {
            Density::Tight => 0.02,
            Density::Medium => 0.015,
            Density::Loose => 0.01,
            Density::Scattered => 0.005,
            Density::Sparse => 0.002,
            Density::UltraSparse => 0.0005,
        }
    }

    pub fn alignment(self) -> f32 {
        match self {
            Density::Tight => 0.05,
            Density::Medium => 0.03,
            Density::Loose => 0.02,
            Density::Scattered => 0.01,
            Density::Sparse => 0.005,
            Density::UltraSparse => 0.002,
        }
    }

    pub fn separation(self) -> f32 {
        match self {
            Density::Tight => 0.2,
            Density::Medium => 0.15,
            Density::Loose => 0.1,
            Density::Scattered => 0.08,
            Density::Sparse => 0.05,
            Density::UltraSparse => 0.03,
        }
    }
}

/// Spawn outline of a flock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    Circle,
    Triangle,
    Diamond,
    Star,
    Heart,
}

impl Shape {
    pub const ALL: [Shape; 5] = [
        Shape::Circle,
        Shape::Triangle,
        Shape::Diamond,
        Shape::Star,
        Shape::Heart,
    ];
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlockSpec {
    pub size: usize,
    pub spread: f32,
    pub multi_color: bool,
    pub density: Density,
    pub shape: Shape,
    pub center_y: f32,
    /// May spawn anywhere horizontally instead of avoiding the edges.
    pub full_width: bool,
}

/// Random flock layout for a page, biased toward the bottom.
pub fn generate_flocks(page: &PageMetrics, rng: &mut impl Rng) -> Vec<FlockSpec> {
    let extra = (page.width * page.fold / AREA_PER_EXTRA_FLOCK).floor().max(0.0) as usize;
    let mut flocks = Vec::with_capacity(BASE_FLOCKS + extra + 8);

    let min_y = page.fold + 100.0;
    let max_y = page.height - 200.0;
    for _ in 0..BASE_FLOCKS + extra {
        let bias = rng.gen::<f32>().powf(0.7);
        let tight = rng.gen::<f32>() > 0.85;
        let large = rng.gen::<f32>() > 0.7;
        let sparse = rng.gen::<f32>() > 0.4;
        let shape = *Shape::ALL.choose(rng).unwrap_or(&Shape::Circle);
        flocks.push(FlockSpec {
            size: if large {
                rng.gen_range(60..140)
            } else {
                rng.gen_range(15..55)
            },
            spread: if sparse {
                400.0 + rng.gen::<f32>() * 800.0
            } else {
                150.0 + rng.gen::<f32>() * 350.0
            },
            multi_color: rng.gen::<f32>() > 0.3,
            density: if tight {
                Density::Tight
            } else {
                Density::ALL[rng.gen_range(1..Density::ALL.len())]
            },
            shape,
            center_y: min_y + (max_y - min_y) * bias,
            full_width: false,
        });
    }

    let sparse_count = (page.height / PAGE_PER_SPARSE_FLOCK).floor() as usize;
    for i in 0..sparse_count {
        let along = i as f32 / sparse_count as f32;
        flocks.push(FlockSpec {
            size: rng.gen_range(30..80),
            spread: 800.0 + rng.gen::<f32>() * 1200.0,
            multi_color: rng.gen::<f32>() > 0.2,
            density: Density::UltraSparse,
            shape: *Shape::ALL.choose(rng).unwrap_or(&Shape::Circle),
            center_y: min_y + (page.height - page.fold - 100.0) * along + rng.gen::<f32>() * 500.0,
            full_width: true,
        });
    }
    flocks
}

/// Spawn offset of member `i` of `spec` from the flock center, before the
/// density spread is applied.
pub fn shape_offset(spec: &FlockSpec, i: usize, rng: &mut impl Rng) -> Vec2 {
    let t = i as f32 / spec.size.max(1) as f32;
    let spread = spec.spread;
    match spec.shape {
        Shape::Star => {
            let angle = t * PI * 10.0;
            let arm = if i % 2 == 0 { spread } else { spread * 0.5 };
            let r = arm * (0.5 + rng.gen::<f32>() * 0.5);
            Vec2::new(angle.cos(), angle.sin()) * r
        }
        Shape::Diamond => {
            let angle = t * TAU;
            let r = spread * (0.5 + rng.gen::<f32>() * 0.5);
            let (dx, dy) = (angle.cos() * r, angle.sin() * r);
            Vec2::new((dx - dy) * 0.7, (dx + dy) * 0.5)
        }
        Shape::Triangle => {
            let side = (t * 3.0).floor() as u32;
            let along = (t * 3.0).fract();
            let s = spread * (0.7 + rng.gen::<f32>() * 0.3);
            match side {
                0 => Vec2::new((along - 0.5) * s, -s * 0.5),
                1 => Vec2::new(s * 0.5 - along * s, -s * 0.5 + along * s),
                _ => Vec2::new(-s * 0.5 + along * s, s * 0.5 - along * s * 0.5),
            }
        }
        Shape::Heart => {
            let a = t * TAU - PI / 2.0;
            let k = spread * 0.02;
            let x = k * 16.0 * a.sin().powi(3);
            let y = -k * (13.0 * a.cos() - 5.0 * (2.0 * a).cos() - 2.0 * (3.0 * a).cos() - (4.0 * a).cos());
            let jitter = Vec2::new(rng.gen::<f32>() - 0.5, rng.gen::<f32>() - 0.5) * spread * 0.2;
            Vec2::new(x, y) + jitter
        }
        Shape::Circle => {
            let angle = t * TAU;
            let r = spread * (0.5 + rng.gen::<f32>() * 0.5);
            if spec.density != Density::Tight {
                return Vec2::new(angle.cos(), angle.sin()) * r;
            }
            // Tight clusters get irregular rotated ellipses.
            let ratio = 0.5 + rng.gen::<f32>();
            let wobble = (angle * 3.0).sin() * rng.gen::<f32>() * 0.3;
            let a = angle + wobble;
            let p = Vec2::new(a.cos() * r * ratio, a.sin() * r / ratio);
            crate::math::rotate(p, rng.gen::<f32>() * PI)
        }
    }
}
