use crate::color::Rgba;
use crate::config::{LaneColorMode, VectorLanesConfig};
use crate::math::clamp01;
use crate::renderer::{Frame, Renderer, Viewport};
use crate::surface::{simple_center_mask, Composite, Surface};
use glam::Vec2;

pub const GATE_COUNT: usize = 18;
pub const MIN_LANES: usize = 6;

const CYAN: &[Rgba] = &[Rgba::rgb(0x00, 0xe0, 0xff), Rgba::rgb(0xbf, 0xef, 0xff), Rgba::WHITE];
const VIOLET: &[Rgba] = &[Rgba::rgb(0x7c, 0x5c, 0xff), Rgba::rgb(0xa7, 0x8b, 0xfa), Rgba::WHITE];
const PRISMATIC: &[Rgba] = &[
    Rgba::rgb(0x00, 0xe0, 0xff),
    Rgba::rgb(0x7c, 0x5c, 0xff),
    Rgba::rgb(0xff, 0x4e, 0xcd),
    Rgba::rgb(0xff, 0x8a, 0x00),
];

pub fn lane_palette(mode: LaneColorMode) -> &'static [Rgba] {
    match mode {
        LaneColorMode::Cyan => CYAN,
        LaneColorMode::Violet => VIOLET,
        LaneColorMode::Prismatic => PRISMATIC,
    }
}

/// Perspective lanes converging on a horizon, crossed by moving gate lines.
pub struct VectorLanes {
    lanes: usize,
    speed: f32,
    glow: f32,
    palette: &'static [Rgba],
    viewport: Viewport,
}

impl VectorLanes {
    pub fn new(cfg: &VectorLanesConfig) -> Self {
        Self {
            lanes: (cfg.lanes as usize).max(MIN_LANES),
            speed: cfg.speed.max(0.2),
            glow: clamp01(cfg.glow),
            palette: lane_palette(cfg.color_mode),
            viewport: Viewport::default(),
        }
    }

    pub fn lane_count(&self) -> usize {
        self.lanes
    }

    pub fn horizon(&self) -> f32 {
        self.viewport.height / 2.0 - self.viewport.height * 0.12
    }

    /// Depth of gate `g` at time `t`: 1 at the viewer, 0 at the horizon.
    pub fn gate_depth(&self, g: usize, t: f32) -> f32 {
        let phase = (t * self.speed).rem_euclid(1.0);
        1.0 - (g as f32 / GATE_COUNT as f32 + phase).rem_euclid(1.0)
    }

    /// Screen y of gate `g`; always between the horizon and just below the
    /// bottom edge.
    pub fn gate_y(&self, g: usize, t: f32) -> f32 {
        let horizon = self.horizon();
        let depth = self.gate_depth(g, t);
        horizon + depth * depth * (self.viewport.height - horizon + 40.0)
    }
}

impl Renderer for VectorLanes {
    fn name(&self) -> &'static str {
        "vectorLanes"
    }

    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn render(&mut self, frame: &Frame, surface: &mut dyn Surface) {
        let vp = self.viewport;
        let (w, h) = (vp.width, vp.height);
        let cx = w / 2.0;
        let t = frame.time();

        surface.set_composite(Composite::SourceOver);
        surface.set_alpha(1.0);
        surface.fill_rect(0.0, 0.0, w, h, Rgba::BLACK.with_alpha(0.2));
        surface.set_composite(Composite::Lighter);

        let horizon = self.horizon();
        let spread = 0.8 + (t * 0.45).sin() * 0.06;
        for i in 0..self.lanes {
            let lane_x = (i as f32 / (self.lanes - 1) as f32 - 0.5) * 2.0;
            let x0 = cx + lane_x * w * 0.5;
            let x1 = cx + lane_x * w * 0.06 * spread;
            let color = self.palette[i % self.palette.len()];
            surface.set_shadow(12.0 + self.glow * 26.0, color);
            surface.set_alpha(0.22 + self.glow * 0.24);
            surface.stroke_line(Vec2::new(x0, h + 40.0), Vec2::new(x1, horizon), 1.5, color);
        }

        for g in 0..GATE_COUNT {
            let y = self.gate_y(g, t);
            let depth = self.gate_depth(g, t);
            let span = (1.0 - depth) * w * 0.9;
            let color = self.palette[g % self.palette.len()];
            surface.set_shadow(10.0 + self.glow * 24.0, color);
            surface.set_alpha((0.06 + self.glow * 0.14) * (1.0 - depth));
            surface.stroke_line(Vec2::new(cx - span / 2.0, y), Vec2::new(cx + span / 2.0, y), 1.0, color);
        }

        surface.set_shadow(0.0, Rgba::TRANSPARENT);
        surface.set_alpha(1.0);
        surface.set_composite(Composite::SourceOver);
        simple_center_mask(surface, w, h, 0.24, 0.62);
    }
}
