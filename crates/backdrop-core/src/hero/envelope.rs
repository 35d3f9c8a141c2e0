use super::HeroPhase;
use crate::constants::HERO_WARP_MAX_DISPLACEMENT;
use crate::math::{clamp01, smoothstep};
use serde::{Deserialize, Serialize};

/// A time window during which the hero text warps.
///
/// `start`/`end` are seconds into the clip; negative values (including
/// `-0.0`, the clip end itself) count back from the clip's end. Intensity
/// rises over `rise` seconds after `start`, falls over `fall` seconds before
/// `end`, and tops out at `peak`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarpWindow {
    pub start: f64,
    pub end: f64,
    pub rise: f64,
    pub fall: f64,
    pub peak: f32,
}

impl WarpWindow {
    pub const fn new(start: f64, end: f64, rise: f64, fall: f64, peak: f32) -> Self {
        Self {
            start,
            end,
            rise,
            fall,
            peak,
        }
    }

    fn resolve(offset: f64, duration: f64) -> f64 {
        if offset.is_sign_negative() {
            (duration + offset).max(0.0)
        } else {
            offset
        }
    }

    pub fn sample(&self, t: f64, duration: f64) -> f32 {
        if !duration.is_finite() || duration <= 0.0 {
            return 0.0;
        }
        let start = Self::resolve(self.start, duration);
        let end = Self::resolve(self.end, duration).max(start);
        if t < start || t > end {
            return 0.0;
        }
        let up = smoothstep(start as f32, (start + self.rise) as f32, t as f32);
        let down = 1.0 - smoothstep((end - self.fall) as f32, end as f32, t as f32);
        clamp01(self.peak) * up * down
    }
}

/// Intensity of the hero distortion over each phase's clip.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WarpCurve {
    pub intro: Vec<WarpWindow>,
    #[serde(rename = "loop")]
    pub loop_: Vec<WarpWindow>,
    pub swap: Vec<WarpWindow>,
}

impl Default for WarpCurve {
    fn default() -> Self {
        Self {
            // Arrival surge, then a softer pull into the loop handoff.
            intro: vec![
                WarpWindow::new(0.0, 1.6, 0.35, 0.9, 1.0),
                WarpWindow::new(-1.2, -0.0, 0.6, 0.25, 0.65),
            ],
            // Hide the loop seam.
            loop_: vec![
                WarpWindow::new(0.0, 0.6, 0.0, 0.45, 0.45),
                WarpWindow::new(-0.9, -0.0, 0.6, 0.0, 0.45),
            ],
            swap: vec![WarpWindow::new(0.0, -0.0, 0.4, 0.4, 0.3)],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WarpSample {
    /// 0..1, written to `--hero-warp`.
    pub intensity: f32,
    /// `feDisplacementMap` scale.
    pub scale: f32,
}

impl WarpSample {
    pub const ZERO: WarpSample = WarpSample {
        intensity: 0.0,
        scale: 0.0,
    };

    /// Custom property value, three decimals.
    pub fn css_value(&self) -> String {
        format!("{:.3}", self.intensity)
    }

    pub fn scale_attr(&self) -> String {
        format!("{:.2}", self.scale)
    }
}

impl WarpCurve {
    fn windows(&self, phase: HeroPhase) -> &[WarpWindow] {
        match phase {
            HeroPhase::Intro => &self.intro,
            HeroPhase::Loop => &self.loop_,
            HeroPhase::Swap => &self.swap,
        }
    }

    /// Strongest window at playback time `t` of a clip lasting `duration`.
    pub fn sample(&self, phase: HeroPhase, t: f64, duration: f64) -> WarpSample {
        let intensity = self
            .windows(phase)
            .iter()
            .map(|w| w.sample(t, duration))
            .fold(0.0f32, f32::max);
        let intensity = clamp01(intensity);
        WarpSample {
            intensity,
            scale: intensity * HERO_WARP_MAX_DISPLACEMENT,
        }
    }
}
