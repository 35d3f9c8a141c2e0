use super::warp::WarpFieldOverride;
use crate::error::Result;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinimalConfig {
    /// 0..1
    pub vignette: f32,
    /// Degrees.
    pub accent_hue: f32,
    /// 0..1
    pub accent_strength: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StarColorMode {
    #[default]
    Mono,
    Cool,
    Prismatic,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarfieldConfig {
    pub star_count: u32,
    pub speed: f32,
    pub depth: f32,
    pub twinkle: f32,
    pub color_mode: StarColorMode,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AsciiTunnelConfig {
    pub glyphs: String,
    pub density: f32,
    pub speed: f32,
    pub swirl: f32,
    pub chroma: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LaneColorMode {
    #[default]
    Cyan,
    Violet,
    Prismatic,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VectorLanesConfig {
    pub lanes: u32,
    pub speed: f32,
    pub glow: f32,
    pub color_mode: LaneColorMode,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatesConfig {
    pub rate_hz: f32,
    pub thickness: f32,
    pub glow: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarpGatesConfig {
    pub warp: WarpFieldOverride,
    pub gates: GatesConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireframeConfig {
    pub grid_size: u32,
    pub speed: f32,
    pub roll: f32,
    pub color: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NebulaColorMode {
    #[default]
    Blue,
    Violet,
    Sunset,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NebulaConfig {
    pub intensity: f32,
    pub speed: f32,
    pub scale: f32,
    pub color_mode: NebulaColorMode,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiImageConfig {
    pub variant_id: String,
    pub opacity: f32,
    pub blur: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RaymarchPalette {
    #[default]
    Cyan,
    Prismatic,
    Infra,
}

impl RaymarchPalette {
    /// Index understood by the shader's palette switch.
    pub fn shader_id(self) -> f32 {
        match self {
            RaymarchPalette::Cyan => 0.0,
            RaymarchPalette::Prismatic => 1.0,
            RaymarchPalette::Infra => 2.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaymarchConfig {
    pub intensity: f32,
    pub speed: f32,
    pub palette: RaymarchPalette,
}

/// One background per page render, tagged by renderer kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "config", rename_all = "camelCase")]
pub enum BackgroundPreset {
    Minimal(MinimalConfig),
    Starfield(StarfieldConfig),
    AsciiTunnel(AsciiTunnelConfig),
    VectorLanes(VectorLanesConfig),
    Warp(WarpFieldOverride),
    WarpGates(WarpGatesConfig),
    Wireframe(WireframeConfig),
    Nebula(NebulaConfig),
    AiImage(AiImageConfig),
    Raymarch(RaymarchConfig),
}

impl BackgroundPreset {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            BackgroundPreset::Minimal(_) => "minimal",
            BackgroundPreset::Starfield(_) => "starfield",
            BackgroundPreset::AsciiTunnel(_) => "asciiTunnel",
            BackgroundPreset::VectorLanes(_) => "vectorLanes",
            BackgroundPreset::Warp(_) => "warp",
            BackgroundPreset::WarpGates(_) => "warpGates",
            BackgroundPreset::Wireframe(_) => "wireframe",
            BackgroundPreset::Nebula(_) => "nebula",
            BackgroundPreset::AiImage(_) => "aiImage",
            BackgroundPreset::Raymarch(_) => "raymarch",
        }
    }

    // Builders mirroring how variants are declared.

    pub fn minimal(accent_hue: f32, accent_strength: f32, vignette: f32) -> Self {
        Self::Minimal(MinimalConfig {
            vignette,
            accent_hue,
            accent_strength,
        })
    }

    pub fn starfield(star_count: u32, speed: f32, color_mode: StarColorMode) -> Self {
        Self::Starfield(StarfieldConfig {
            star_count,
            speed,
            depth: 1.0,
            twinkle: 0.65,
            color_mode,
        })
    }

    pub fn ascii(glyphs: &str, density: f32, speed: f32) -> Self {
        Self::AsciiTunnel(AsciiTunnelConfig {
            glyphs: glyphs.to_string(),
            density,
            speed,
            swirl: 1.2,
            chroma: 0.55,
        })
    }

    pub fn lanes(lanes: u32, speed: f32, color_mode: LaneColorMode) -> Self {
        Self::VectorLanes(VectorLanesConfig {
            lanes,
            speed,
            glow: 0.85,
            color_mode,
        })
    }

    pub fn warp_gates(warp: WarpFieldOverride, rate_hz: f32) -> Self {
        Self::WarpGates(WarpGatesConfig {
            warp,
            gates: GatesConfig {
                rate_hz,
                thickness: 1.6,
                glow: 0.9,
            },
        })
    }

    pub fn wireframe(speed: f32, color: &str) -> Self {
        Self::Wireframe(WireframeConfig {
            grid_size: 10,
            speed,
            roll: 0.55,
            color: color.to_string(),
        })
    }

    pub fn nebula(color_mode: NebulaColorMode, intensity: f32) -> Self {
        Self::Nebula(NebulaConfig {
            intensity,
            speed: 0.22,
            scale: 1.0,
            color_mode,
        })
    }

    pub fn ai_image(variant_id: &str, opacity: f32) -> Self {
        Self::AiImage(AiImageConfig {
            variant_id: variant_id.to_string(),
            opacity,
            blur: 8.0,
        })
    }

    pub fn raymarch(palette: RaymarchPalette, intensity: f32) -> Self {
        Self::Raymarch(RaymarchConfig {
            intensity,
            speed: 1.0,
            palette,
        })
    }
}
