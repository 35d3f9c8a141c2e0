//! Renderer capability interface and the shared animation-loop policy.

use crate::constants::{MAX_DEVICE_PIXEL_RATIO, MAX_FRAME_DT_SEC};
use crate::error::{BackdropError, Result};
use crate::surface::Surface;
use glam::Vec2;

/// Drawable area in CSS pixels plus the (capped) device pixel ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub dpr: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32, dpr: f32) -> Result<Self> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(BackdropError::InvalidViewport { width, height });
        }
        let dpr = if dpr.is_finite() && dpr > 0.0 {
            dpr.min(MAX_DEVICE_PIXEL_RATIO as f32)
        } else {
            1.0
        };
        Ok(Self { width, height, dpr })
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn min_side(&self) -> f32 {
        self.width.min(self.height)
    }

    /// Backing-store size in device pixels.
    pub fn backing_size(&self) -> (u32, u32) {
        (
            (self.width * self.dpr).floor() as u32,
            (self.height * self.dpr).floor() as u32,
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            dpr: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    /// Timestamp from the frame clock, milliseconds.
    pub now_ms: f64,
    /// Seconds since the previous frame, clamped; 0 for a static frame.
    pub dt: f32,
}

impl Frame {
    pub fn new(now_ms: f64, dt: f32) -> Self {
        Self { now_ms, dt }
    }

    /// Seconds, for time-based animation.
    pub fn time(&self) -> f32 {
        (self.now_ms / 1000.0) as f32
    }
}

/// A procedural background.
///
/// Construction plays the role of `init`; `render` is one tick. A renderer
/// owns its particle pool and never allocates per frame.
pub trait Renderer {
    fn name(&self) -> &'static str;

    /// Canvas resized. Particle state is kept.
    fn resize(&mut self, viewport: Viewport);

    fn render(&mut self, frame: &Frame, surface: &mut dyn Surface);

    /// Start a spool burst at `now_ms`. Only warp-family renderers react.
    fn spool(&mut self, _now_ms: f64) {}

    /// Pointer position in normalized device coordinates (-1..1).
    fn pointer(&mut self, _ndc: Vec2) {}

    /// Minimum spacing between renders, for renderers too expensive to run
    /// every display frame.
    fn min_interval_ms(&self) -> Option<f64> {
        None
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopAction {
    /// Request another animation frame.
    Schedule,
    /// Do not request another frame.
    Stop,
}

/// Owns one renderer and decides when it draws.
pub struct AnimationLoop {
    renderer: Box<dyn Renderer>,
    reduced_motion: bool,
    last_ms: Option<f64>,
    last_render_ms: Option<f64>,
    renders: u64,
    disposed: bool,
}

impl AnimationLoop {
    pub fn new(renderer: Box<dyn Renderer>, reduced_motion: bool) -> Self {
        Self {
            renderer,
            reduced_motion,
            last_ms: None,
            last_render_ms: None,
            renders: 0,
            disposed: false,
        }
    }

    pub fn renderer_name(&self) -> &'static str {
        self.renderer.name()
    }

    pub fn renders(&self) -> u64 {
        self.renders
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn resize(&mut self, viewport: Viewport) {
        if !self.disposed {
            self.renderer.resize(viewport);
        }
    }

    /// First call after mounting. Under reduced motion this draws the single
    /// static frame and asks for no further frames.
    pub fn mount(&mut self, now_ms: f64, surface: &mut dyn Surface) -> LoopAction {
        if self.disposed {
            return LoopAction::Stop;
        }
        if self.reduced_motion {
            self.draw(Frame::new(now_ms, 0.0), surface);
            log::debug!("{}: reduced motion, drew one static frame", self.renderer.name());
            return LoopAction::Stop;
        }
        LoopAction::Schedule
    }

    /// One animation-frame callback.
    pub fn frame(&mut self, now_ms: f64, surface: &mut dyn Surface) -> LoopAction {
        if self.disposed || self.reduced_motion {
            return LoopAction::Stop;
        }
        let last = self.last_ms.unwrap_or(now_ms);
        self.last_ms = Some(now_ms);
        let dt = (((now_ms - last) / 1000.0) as f32).clamp(0.0, MAX_FRAME_DT_SEC);

        if let (Some(interval), Some(prev)) = (self.renderer.min_interval_ms(), self.last_render_ms) {
            if now_ms - prev < interval {
                return LoopAction::Schedule;
            }
        }
        self.draw(Frame::new(now_ms, dt), surface);
        LoopAction::Schedule
    }

    pub fn spool(&mut self, now_ms: f64) {
        if !self.disposed {
            self.renderer.spool(now_ms);
        }
    }

    pub fn pointer(&mut self, ndc: Vec2) {
        if !self.disposed {
            self.renderer.pointer(ndc);
        }
    }

    /// After this, every call is a no-op and `frame` returns `Stop`.
    pub fn dispose(&mut self) {
        if !self.disposed {
            log::debug!("{}: disposed after {} renders", self.renderer.name(), self.renders);
        }
        self.disposed = true;
    }

    fn draw(&mut self, frame: Frame, surface: &mut dyn Surface) {
        self.renderer.render(&frame, surface);
        self.last_render_ms = Some(frame.now_ms);
        self.renders += 1;
    }
}
