use crate::color::{palette_or_white, Rgba};
use crate::config::WireframeConfig;
use crate::math::{clamp01, perspective, rotate};
use crate::renderer::{Frame, Renderer, Viewport};
use crate::surface::{simple_center_mask, Composite, Surface};
use glam::Vec2;

pub const SLICES: usize = 18;

/// Receding corridor cross-sections over a floor grid, with a slow roll.
pub struct WireframeCorridor {
    speed: f32,
    grid: usize,
    roll: f32,
    color: Rgba,
    viewport: Viewport,
}

impl WireframeCorridor {
    pub fn new(cfg: &WireframeConfig) -> Self {
        Self {
            speed: cfg.speed.max(0.2),
            grid: (cfg.grid_size as usize).max(6),
            roll: clamp01(cfg.roll),
            color: palette_or_white(&[cfg.color.as_str()])[0],
            viewport: Viewport::default(),
        }
    }

    pub fn roll_angle(&self, t: f32) -> f32 {
        self.roll * 0.2 * (t * 0.6).sin()
    }

    fn project(&self, p: Vec2, z: f32) -> Vec2 {
        let vp = self.viewport;
        let persp = perspective(z, 0.88, 0.08);
        vp.center() + Vec2::new(p.x * vp.width, p.y * vp.height) * 0.45 * persp
    }
}

impl Renderer for WireframeCorridor {
    fn name(&self) -> &'static str {
        "wireframe"
    }

    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn render(&mut self, frame: &Frame, surface: &mut dyn Surface) {
        let vp = self.viewport;
        let t = frame.time();
        let phase = (t * self.speed).rem_euclid(1.0);

        surface.set_composite(Composite::SourceOver);
        surface.set_alpha(1.0);
        surface.fill_rect(0.0, 0.0, vp.width, vp.height, Rgba::BLACK.with_alpha(0.22));
        surface.set_composite(Composite::Lighter);
        surface.set_shadow(18.0, self.color);

        let roll = self.roll_angle(t);
        for zi in 0..SLICES {
            let z = (zi as f32 / SLICES as f32 + phase).rem_euclid(1.0);
            let dz = 1.0 - z;
            let size = 1.05 - dz * 0.75;
            surface.set_alpha(0.05 + (1.0 - dz) * 0.18);
            let corners = [
                Vec2::new(-size, -size),
                Vec2::new(size, -size),
                Vec2::new(size, size),
                Vec2::new(-size, size),
            ]
            .map(|c| self.project(rotate(c, roll), dz));
            surface.stroke_polygon(&corners, 1.0, self.color);
        }

        surface.set_alpha(0.06);
        for i in 0..=self.grid {
            let x = (i as f32 / self.grid as f32 - 0.5) * 2.0;
            let a = self.project(rotate(Vec2::new(x, 1.15), roll), 0.15);
            let b = self.project(rotate(Vec2::new(x, -0.15), roll), 1.0);
            surface.stroke_line(a, b, 1.0, self.color);
        }

        surface.set_shadow(0.0, Rgba::TRANSPARENT);
        surface.set_alpha(1.0);
        surface.set_composite(Composite::SourceOver);
        simple_center_mask(surface, vp.width, vp.height, 0.24, 0.62);
    }
}
