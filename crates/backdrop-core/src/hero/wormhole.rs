//! Per-character "wormhole" pull of the hero headline toward screen center.

use glam::Vec2;
use rand::prelude::*;

pub const WORMHOLE_VARIANT_COUNT: usize = 10;
// Seconds the active class stays on after a run starts
pub const WORMHOLE_ACTIVE_SEC: f64 = 5.0;
const CONTAINER_MAX_SHIFT: f32 = 300.0;
const CONTAINER_PULL: f32 = 0.28;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Both,
    X,
    Y,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WormholeParams {
    /// Shift as a fraction of glyph height.
    pub pull: f32,
    /// Falloff exponent on normalized distance.
    pub pow: f32,
    /// Sideways tear, alternating sign per glyph.
    pub ortho: f32,
    pub jitter: f32,
    pub scale: f32,
    pub axis: Axis,
}

const fn p(pull: f32, pow: f32, ortho: f32, jitter: f32, scale: f32, axis: Axis) -> WormholeParams {
    WormholeParams {
        pull,
        pow,
        ortho,
        jitter,
        scale,
        axis,
    }
}

pub const WORMHOLE_VARIANTS: [WormholeParams; WORMHOLE_VARIANT_COUNT] = [
    p(0.34, 1.35, 0.06, 0.0, 0.08, Axis::Both),
    p(0.42, 1.2, 0.08, 0.0, 0.11, Axis::Both),
    p(0.38, 1.55, 0.0, 0.0, 0.08, Axis::X),
    p(0.38, 1.55, 0.0, 0.0, 0.08, Axis::Y),
    p(0.3, 1.05, 0.12, 0.0, 0.1, Axis::Both),
    p(0.28, 1.1, 0.05, 0.08, 0.07, Axis::Both),
    p(0.52, 1.3, 0.03, 0.0, 0.13, Axis::Both),
    p(0.36, 1.25, -0.1, 0.0, 0.09, Axis::Both),
    p(0.33, 1.75, 0.07, 0.0, 0.07, Axis::Both),
    p(0.44, 2.1, 0.05, 0.0, 0.08, Axis::Both),
];

/// Which variant runs, and a counter bumped on every retrigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WormholeRun {
    pub variant: usize,
    pub run_id: u32,
}

impl WormholeRun {
    pub fn first(rng: &mut impl Rng) -> Self {
        Self {
            variant: rng.gen_range(0..WORMHOLE_VARIANT_COUNT),
            run_id: 1,
        }
    }

    pub fn next(self) -> Self {
        Self {
            variant: (self.variant + 1) % WORMHOLE_VARIANT_COUNT,
            run_id: self.run_id + 1,
        }
    }

    pub fn params(&self) -> &'static WormholeParams {
        &WORMHOLE_VARIANTS[self.variant.min(WORMHOLE_VARIANT_COUNT - 1)]
    }

    fn seed(&self) -> u64 {
        (self.run_id as u64 + 1) * 10_007 + self.variant as u64 * 97
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CharBox {
    pub center: Vec2,
    pub height: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CharShift {
    pub offset: Vec2,
    pub shrink: f32,
}

/// Whole-headline shift toward the viewport center, clamped.
pub fn container_shift(to_center: Vec2) -> Vec2 {
    to_center.clamp(Vec2::splat(-CONTAINER_MAX_SHIFT), Vec2::splat(CONTAINER_MAX_SHIFT)) * CONTAINER_PULL
}

/// Displacement of every glyph for one run. Glyphs far from the center move
/// the most.
pub fn char_shifts(chars: &[CharBox], viewport: Vec2, run: WormholeRun) -> Vec<CharShift> {
    let params = run.params();
    let center = viewport / 2.0;
    let max_dist = (viewport.x.min(viewport.y) * 0.55).max(280.0);
    let mut rng = StdRng::seed_from_u64(run.seed());

    chars
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let d = center - c.center;
            let dist = d.length().max(1.0);
            let n = d / dist;
            let strength = (dist / max_dist).clamp(0.0, 1.0).powf(params.pow);
            let base = c.height * params.pull;

            let mut off = n * base * strength;
            match params.axis {
                Axis::X => off.y = 0.0,
                Axis::Y => off.x = 0.0,
                Axis::Both => {}
            }
            let tear = if i % 2 == 0 { 1.0 } else { -1.0 };
            off += n.perp() * base * strength * params.ortho * tear;
            if params.jitter > 0.0 {
                let j = Vec2::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0));
                off += j * base * strength * params.jitter;
            }
            CharShift {
                offset: off,
                shrink: params.scale * strength,
            }
        })
        .collect()
}
