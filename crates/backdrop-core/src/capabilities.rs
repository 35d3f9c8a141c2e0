use crate::constants::MAX_DEVICE_PIXEL_RATIO;

/// Browser features, probed once at startup and handed to every component.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Capabilities {
    pub reduced_motion: bool,
    /// A WebGPU or WebGL2 adapter is expected to be available.
    pub gpu: bool,
    pub video_frame_callback: bool,
    /// Capped at 2.
    pub device_pixel_ratio: f32,
    pub mobile: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            reduced_motion: false,
            gpu: true,
            video_frame_callback: true,
            device_pixel_ratio: 1.0,
            mobile: false,
        }
    }
}

impl Capabilities {
    pub fn new(
        reduced_motion: bool,
        gpu: bool,
        video_frame_callback: bool,
        device_pixel_ratio: f64,
        mobile: bool,
    ) -> Self {
        let dpr = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio.min(MAX_DEVICE_PIXEL_RATIO)
        } else {
            1.0
        };
        Self {
            reduced_motion,
            gpu,
            video_frame_callback,
            device_pixel_ratio: dpr as f32,
            mobile,
        }
    }

    /// Particle pool size for the warp field.
    pub fn warp_particle_count(&self, density: f32) -> usize {
        let base = if self.mobile { 600.0 } else { 1100.0 };
        (base * density.max(0.0) * self.device_pixel_ratio).floor() as usize
    }

    /// Star count after the mobile/dpr adjustment, never below 200.
    pub fn star_count(&self, configured: u32) -> usize {
        let scale = if self.mobile { 0.75 } else { 1.0 } * self.device_pixel_ratio;
        ((configured as f32 * scale).floor() as usize).max(200)
    }
}
