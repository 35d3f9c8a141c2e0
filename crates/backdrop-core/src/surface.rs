//! Abstract 2D drawing target.
//!
//! Renderers only ever talk to a [`Surface`]; the web crate implements it
//! over `CanvasRenderingContext2d`, tests use [`RecordingSurface`].

use crate::color::Rgba;
use glam::Vec2;
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Composite {
    #[default]
    SourceOver,
    /// Additive blending (`lighter`).
    Lighter,
}

impl Composite {
    pub fn as_css(self) -> &'static str {
        match self {
            Composite::SourceOver => "source-over",
            Composite::Lighter => "lighter",
        }
    }
}

/// Two-circle radial gradient sharing one center.
#[derive(Clone, Debug, PartialEq)]
pub struct RadialGradient {
    pub center: Vec2,
    pub inner: f32,
    pub outer: f32,
    pub stops: SmallVec<[(f32, Rgba); 4]>,
}

impl RadialGradient {
    pub fn new(center: Vec2, inner: f32, outer: f32) -> Self {
        Self {
            center,
            inner,
            outer,
            stops: SmallVec::new(),
        }
    }

    pub fn stop(mut self, offset: f32, color: Rgba) -> Self {
        self.stops.push((offset.clamp(0.0, 1.0), color));
        self
    }
}

/// Row-major RGBA8 pixel buffer.
#[derive(Clone, Debug, Default)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl PixelBuffer {
    /// Resize in place; contents are unspecified afterwards.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.data.resize(width as usize * height as usize * 4, 0);
    }

    #[inline]
    pub fn put(&mut self, x: u32, y: u32, px: [u8; 4]) {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.data[i..i + 4].copy_from_slice(&px);
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }
}

/// Canvas-like drawing operations in CSS pixels.
///
/// State set through `set_*` persists until changed, the same way it does on
/// a 2D context.
pub trait Surface {
    fn set_composite(&mut self, mode: Composite);
    fn set_alpha(&mut self, alpha: f32);
    /// `blur = 0` disables the shadow.
    fn set_shadow(&mut self, blur: f32, color: Rgba);

    fn clear(&mut self, x: f32, y: f32, w: f32, h: f32);
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);
    /// Text centered on `at`, monospace.
    fn fill_text(&mut self, text: &str, at: Vec2, size: f32, color: Rgba);

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba);
    /// Closed outline through `points`.
    fn stroke_polygon(&mut self, points: &[Vec2], width: f32, color: Rgba);
    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Rgba);

    fn fill_radial_gradient(&mut self, gradient: &RadialGradient, x: f32, y: f32, w: f32, h: f32);
    /// Scale `pixels` onto the destination rectangle.
    fn draw_pixels(&mut self, pixels: &PixelBuffer, x: f32, y: f32, w: f32, h: f32);
}

/// Counts draw calls instead of drawing. Used for headless tests.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    pub composite: Composite,
    pub alpha: f32,
    pub shadow_blur: f32,
    pub clears: usize,
    pub rects: usize,
    pub circles: usize,
    pub texts: usize,
    pub lines: usize,
    pub polygons: usize,
    pub rings: usize,
    pub gradients: usize,
    pub blits: usize,
    /// Largest alpha ever set; renderers must stay within [0, 1].
    pub max_alpha: f32,
    pub last_text: Option<String>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            alpha: 1.0,
            ..Default::default()
        }
    }

    /// Total number of draw calls of any kind.
    pub fn draw_calls(&self) -> usize {
        self.clears
            + self.rects
            + self.circles
            + self.texts
            + self.lines
            + self.polygons
            + self.rings
            + self.gradients
            + self.blits
    }
}

impl Surface for RecordingSurface {
    fn set_composite(&mut self, mode: Composite) {
        self.composite = mode;
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha;
        self.max_alpha = self.max_alpha.max(alpha);
    }

    fn set_shadow(&mut self, blur: f32, _color: Rgba) {
        self.shadow_blur = blur;
    }

    fn clear(&mut self, _x: f32, _y: f32, _w: f32, _h: f32) {
        self.clears += 1;
    }

    fn fill_rect(&mut self, _x: f32, _y: f32, _w: f32, _h: f32, _color: Rgba) {
        self.rects += 1;
    }

    fn fill_circle(&mut self, _center: Vec2, _radius: f32, _color: Rgba) {
        self.circles += 1;
    }

    fn fill_text(&mut self, text: &str, _at: Vec2, _size: f32, _color: Rgba) {
        self.texts += 1;
        self.last_text = Some(text.to_string());
    }

    fn stroke_line(&mut self, _from: Vec2, _to: Vec2, _width: f32, _color: Rgba) {
        self.lines += 1;
    }

    fn stroke_polygon(&mut self, _points: &[Vec2], _width: f32, _color: Rgba) {
        self.polygons += 1;
    }

    fn stroke_circle(&mut self, _center: Vec2, _radius: f32, _width: f32, _color: Rgba) {
        self.rings += 1;
    }

    fn fill_radial_gradient(&mut self, _g: &RadialGradient, _x: f32, _y: f32, _w: f32, _h: f32) {
        self.gradients += 1;
    }

    fn draw_pixels(&mut self, _pixels: &PixelBuffer, _x: f32, _y: f32, _w: f32, _h: f32) {
        self.blits += 1;
    }
}

/// Darken the middle of the viewport so overlaid text stays readable.
///
/// `radius` is a fraction of `min(w, h)`; `softness` widens the transparent
/// edge beyond it.
pub fn center_mask(
    surface: &mut dyn Surface,
    w: f32,
    h: f32,
    strength: f32,
    radius: f32,
    softness: f32,
) {
    if strength <= 0.0 {
        return;
    }
    let c = Vec2::new(w / 2.0, h / 2.0);
    let m = w.min(h);
    let r = m * (radius + softness).max(0.01);
    let core = (radius / (radius + softness).max(0.01)).clamp(0.0, 1.0);
    let g = RadialGradient::new(c, 0.0, r)
        .stop(0.0, Rgba::BLACK.with_alpha(strength.min(1.0)))
        .stop(core, Rgba::BLACK.with_alpha(strength.min(1.0) * 0.5))
        .stop(1.0, Rgba::TRANSPARENT);
    surface.set_composite(Composite::SourceOver);
    surface.set_alpha(1.0);
    surface.fill_radial_gradient(&g, c.x - r, c.y - r, r * 2.0, r * 2.0);
}

/// The fixed two-stop mask used by the single-purpose renderers.
pub fn simple_center_mask(surface: &mut dyn Surface, w: f32, h: f32, radius: f32, alpha: f32) {
    let c = Vec2::new(w / 2.0, h / 2.0);
    let r = w.min(h) * radius;
    let g = RadialGradient::new(c, 0.0, r)
        .stop(0.0, Rgba::BLACK.with_alpha(alpha))
        .stop(1.0, Rgba::TRANSPARENT);
    surface.set_composite(Composite::SourceOver);
    surface.set_alpha(1.0);
    surface.fill_radial_gradient(&g, c.x - r, c.y - r, r * 2.0, r * 2.0);
}
