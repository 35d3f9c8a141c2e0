use crate::color::Rgba;
use crate::config::GatesConfig;
use crate::math::ease_out_cubic;
use crate::renderer::{Frame, Renderer, Viewport};
use crate::surface::{Composite, Surface};

const RING_COUNT: usize = 4;
const RING_COLORS: [Rgba; 2] = [Rgba::rgb(0x00, 0xe0, 0xff), Rgba::rgb(0x7c, 0x5c, 0xff)];

/// Expanding ring "gates" drawn on their own cleared layer above a warp field.
pub struct GatesOverlay {
    rate_hz: f32,
    thickness: f32,
    glow: f32,
    viewport: Viewport,
}

impl GatesOverlay {
    pub fn new(cfg: &GatesConfig) -> Self {
        Self {
            rate_hz: cfg.rate_hz.max(0.05),
            thickness: cfg.thickness.max(0.5),
            glow: cfg.glow.max(0.0),
            viewport: Viewport::default(),
        }
    }

    /// Eased expansion (0..1) of ring `i` at time `t` seconds.
    pub fn ring_progress(&self, i: usize, t: f32) -> f32 {
        let base = (t * self.rate_hz).rem_euclid(1.0);
        ease_out_cubic((base + i as f32 / RING_COUNT as f32).rem_euclid(1.0))
    }
}

impl Renderer for GatesOverlay {
    fn name(&self) -> &'static str {
        "gates"
    }

    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn render(&mut self, frame: &Frame, surface: &mut dyn Surface) {
        let vp = self.viewport;
        let t = frame.time();
        surface.clear(0.0, 0.0, vp.width, vp.height);
        surface.set_composite(Composite::Lighter);

        for i in 0..RING_COUNT {
            let ease = self.ring_progress(i, t);
            let r = vp.min_side() * (0.18 + ease * 0.8);
            let color = RING_COLORS[i % RING_COLORS.len()];
            surface.set_alpha((1.0 - ease) * (0.22 + self.glow * 0.12));
            surface.set_shadow(18.0 + self.glow * 38.0, color);
            let width = self.thickness + (1.0 - ease) * (2.6 + self.glow * 1.4);
            surface.stroke_circle(vp.center(), r, width, color);
        }

        surface.set_shadow(0.0, Rgba::TRANSPARENT);
        surface.set_alpha(1.0);
        surface.set_composite(Composite::SourceOver);
    }
}
