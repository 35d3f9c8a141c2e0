//! Throttled low-resolution fBm clouds, blitted additively.

use crate::color::Rgba;
use crate::config::{NebulaColorMode, NebulaConfig};
use crate::math::{clamp01, fbm, lerp};
use crate::renderer::{Frame, Renderer, Viewport};
use crate::surface::{simple_center_mask, Composite, PixelBuffer, Surface};

pub const NEBULA_INTERVAL_MS: f64 = 140.0;
pub const MIN_BUFFER_SIDE: u32 = 260;

pub fn nebula_palette(mode: NebulaColorMode) -> [Rgba; 3] {
    match mode {
        NebulaColorMode::Blue => [
            Rgba::rgb(0x00, 0xe0, 0xff),
            Rgba::rgb(0x7f, 0xd9, 0xff),
            Rgba::rgb(0x7c, 0x5c, 0xff),
        ],
        NebulaColorMode::Violet => [
            Rgba::rgb(0x7c, 0x5c, 0xff),
            Rgba::rgb(0xa7, 0x8b, 0xfa),
            Rgba::rgb(0xff, 0x4e, 0xcd),
        ],
        NebulaColorMode::Sunset => [
            Rgba::rgb(0xff, 0x8a, 0x00),
            Rgba::rgb(0xff, 0x4e, 0xcd),
            Rgba::rgb(0x7c, 0x5c, 0xff),
        ],
    }
}

/// Offscreen buffer size for a viewport: a third of it, never under 260.
pub fn buffer_size(vp: &Viewport) -> (u32, u32) {
    (
        ((vp.width / 3.0).floor() as u32).max(MIN_BUFFER_SIDE),
        ((vp.height / 3.0).floor() as u32).max(MIN_BUFFER_SIDE),
    )
}

pub struct Nebula {
    colors: [Rgba; 3],
    intensity: f32,
    speed: f32,
    scale: f32,
    buffer: PixelBuffer,
    viewport: Viewport,
}

impl Nebula {
    pub fn new(cfg: &NebulaConfig) -> Self {
        Self {
            colors: nebula_palette(cfg.color_mode),
            intensity: clamp01(cfg.intensity),
            speed: cfg.speed.max(0.01),
            scale: cfg.scale.max(0.6),
            buffer: PixelBuffer::default(),
            viewport: Viewport::default(),
        }
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    /// Fill the offscreen buffer for time `t` seconds.
    pub fn generate(&mut self, t: f32) {
        let (dw, dh) = buffer_size(&self.viewport);
        if self.buffer.width != dw || self.buffer.height != dh {
            self.buffer.resize(dw, dh);
        }
        let tt = t * self.speed;
        let [a, b, c] = self.colors;
        let ch = |x: u8, y: u8, z: u8, mix: f32, v2: f32| {
            lerp(lerp(x as f32, y as f32, mix), z as f32, v2 * 0.65).round().clamp(0.0, 255.0) as u8
        };

        for y in 0..dh {
            let ny = (y as f32 / dh as f32) * 2.0 - 1.0;
            for x in 0..dw {
                let nx = (x as f32 / dw as f32) * 2.0 - 1.0;
                let r = nx.hypot(ny);
                let v = fbm(nx * 1.4 * self.scale + tt * 0.35, ny * 1.4 * self.scale - tt * 0.28);
                let v2 = fbm(nx * 2.6 * self.scale - tt * 0.12, ny * 2.6 * self.scale + tt * 0.18);
                let cloud = (v * 0.75 + v2 * 0.55 - r * 0.35).max(0.0);
                let alpha = clamp01(cloud * (0.85 + self.intensity * 0.85));
                let mix = clamp01(cloud);
                self.buffer.put(
                    x,
                    y,
                    [
                        ch(a.r, b.r, c.r, mix, v2),
                        ch(a.g, b.g, c.g, mix, v2),
                        ch(a.b, b.b, c.b, mix, v2),
                        (alpha * 255.0).round() as u8,
                    ],
                );
            }
        }
    }
}

impl Renderer for Nebula {
    fn name(&self) -> &'static str {
        "nebula"
    }

    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn render(&mut self, frame: &Frame, surface: &mut dyn Surface) {
        self.generate(frame.time());

        let vp = self.viewport;
        surface.set_composite(Composite::SourceOver);
        surface.set_alpha(1.0);
        surface.fill_rect(0.0, 0.0, vp.width, vp.height, Rgba::BLACK.with_alpha(0.25));

        surface.set_composite(Composite::Lighter);
        surface.set_alpha(0.85);
        surface.draw_pixels(&self.buffer, 0.0, 0.0, vp.width, vp.height);
        surface.set_alpha(1.0);
        surface.set_composite(Composite::SourceOver);

        simple_center_mask(surface, vp.width, vp.height, 0.26, 0.66);
    }

    fn min_interval_ms(&self) -> Option<f64> {
        Some(NEBULA_INTERVAL_MS)
    }
}
