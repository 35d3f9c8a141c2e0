use crate::config::RaymarchConfig;
use crate::math::clamp01;

pub const RAYMARCH_STEPS: u32 = 64;
pub const MIN_SPEED: f32 = 0.25;

/// Uniform block of `raymarch.wgsl`; 32 bytes, 16-byte aligned.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RaymarchUniforms {
    pub resolution: [f32; 2],
    pub time: f32,
    pub intensity: f32,
    pub speed: f32,
    pub palette: f32,
    pub _pad: [f32; 2],
}

/// Sanitized shader inputs for one raymarch background.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RaymarchParams {
    pub intensity: f32,
    pub speed: f32,
    pub palette: f32,
}

impl RaymarchParams {
    pub fn from_config(cfg: &RaymarchConfig) -> Self {
        Self {
            intensity: clamp01(cfg.intensity),
            speed: cfg.speed.max(MIN_SPEED),
            palette: cfg.palette.shader_id(),
        }
    }

    /// Uniforms for a frame at `time_sec`, drawn at `width` x `height` device pixels.
    pub fn uniforms(&self, time_sec: f32, width: u32, height: u32) -> RaymarchUniforms {
        RaymarchUniforms {
            resolution: [width.max(1) as f32, height.max(1) as f32],
            time: time_sec,
            intensity: self.intensity,
            speed: self.speed,
            palette: self.palette,
            _pad: [0.0; 2],
        }
    }
}
