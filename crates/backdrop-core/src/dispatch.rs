//! Preset tag to renderer mapping.

use crate::capabilities::Capabilities;
use crate::config::{
    merge_warp_config, AiImageConfig, BackgroundPreset, MinimalConfig, WarpFieldConfig,
};
use crate::math::clamp01;
use crate::renderer::Renderer;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use crate::renderers::{
    AsciiTunnel, GatesOverlay, Nebula, RaymarchParams, Starfield, VectorLanes, WarpField,
    WireframeCorridor,
};

/// Everything outside the URI unreserved set.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// One absolutely positioned `<div>` of a pure-CSS backdrop.
#[derive(Clone, Debug, PartialEq)]
pub struct CssLayer {
    pub background: String,
    pub opacity: f32,
    pub filter: Option<String>,
    /// CSS `mix-blend-mode`.
    pub blend: Option<String>,
    /// Set for image layers; rendered as an `<img>` instead of a `<div>`.
    pub image_src: Option<String>,
}

impl CssLayer {
    fn fill(background: impl Into<String>) -> Self {
        Self {
            background: background.into(),
            opacity: 1.0,
            filter: None,
            blend: None,
            image_src: None,
        }
    }

    fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    fn with_blend(mut self, blend: &str) -> Self {
        self.blend = Some(blend.to_owned());
        self
    }
}

/// What the web front-end has to mount for a preset.
pub enum Backdrop {
    /// Canvas layers, bottom first, each on its own canvas.
    Canvas(Vec<Box<dyn Renderer>>),
    /// Fullscreen GPU shader.
    Raymarch(RaymarchParams),
    /// Static DOM layers, bottom first.
    Css(Vec<CssLayer>),
    /// Nothing to draw.
    Empty,
}

impl Backdrop {
    pub fn from_preset(preset: &BackgroundPreset, caps: &Capabilities, seed: u64) -> Self {
        match preset {
            BackgroundPreset::Minimal(cfg) => Backdrop::Css(minimal_layers(cfg)),
            BackgroundPreset::AiImage(cfg) => Backdrop::Css(ai_image_layers(cfg)),
            BackgroundPreset::Starfield(cfg) => Backdrop::Canvas(vec![Box::new(Starfield::new(
                cfg,
                caps.star_count(cfg.star_count),
                seed,
            ))]),
            BackgroundPreset::AsciiTunnel(cfg) => {
                Backdrop::Canvas(vec![Box::new(AsciiTunnel::new(cfg, seed))])
            }
            BackgroundPreset::VectorLanes(cfg) => {
                Backdrop::Canvas(vec![Box::new(VectorLanes::new(cfg))])
            }
            BackgroundPreset::Wireframe(cfg) => {
                Backdrop::Canvas(vec![Box::new(WireframeCorridor::new(cfg))])
            }
            BackgroundPreset::Nebula(cfg) => Backdrop::Canvas(vec![Box::new(Nebula::new(cfg))]),
            BackgroundPreset::Warp(over) => {
                Backdrop::Canvas(vec![Box::new(warp_field(over, caps, seed))])
            }
            BackgroundPreset::WarpGates(cfg) => Backdrop::Canvas(vec![
                Box::new(warp_field(&cfg.warp, caps, seed)),
                Box::new(GatesOverlay::new(&cfg.gates)),
            ]),
            BackgroundPreset::Raymarch(cfg) => {
                if caps.gpu {
                    Backdrop::Raymarch(RaymarchParams::from_config(cfg))
                } else {
                    log::warn!("raymarch backdrop skipped: no GPU context available");
                    Backdrop::Empty
                }
            }
        }
    }

    pub fn layer_count(&self) -> usize {
        match self {
            Backdrop::Canvas(layers) => layers.len(),
            Backdrop::Css(layers) => layers.len(),
            Backdrop::Raymarch(_) => 1,
            Backdrop::Empty => 0,
        }
    }
}

fn warp_field(
    over: &crate::config::WarpFieldOverride,
    caps: &Capabilities,
    seed: u64,
) -> WarpField {
    let cfg = merge_warp_config(&WarpFieldConfig::default(), Some(over));
    let count = caps.warp_particle_count(cfg.density_multiplier);
    WarpField::new(&cfg, count, seed)
}

fn minimal_layers(cfg: &MinimalConfig) -> Vec<CssLayer> {
    let hue = cfg.accent_hue.round().rem_euclid(360.0);
    let accent = clamp01(cfg.accent_strength);
    let vignette = clamp01(cfg.vignette);
    vec![
        CssLayer::fill("#000"),
        CssLayer::fill(format!(
            "radial-gradient(circle at 50% 35%, hsla({hue}, 90%, 60%, {a1}), transparent 55%), \
             radial-gradient(circle at 80% 70%, hsla({hue2}, 90%, 62%, {a2}), transparent 60%)",
            a1 = 0.22 * accent,
            hue2 = (hue + 70.0).rem_euclid(360.0),
            a2 = 0.14 * accent,
        )),
        CssLayer::fill(
            "radial-gradient(60% 60% at 50% 50%, rgba(0,0,0,0) 35%, rgba(0,0,0,1) 85%)",
        )
        .with_opacity(vignette),
        CssLayer::fill(
            "radial-gradient(rgba(255,255,255,0.08) 1px, transparent 1px) 0 0 / 6px 6px",
        )
        .with_opacity(0.08)
        .with_blend("soft-light"),
    ]
}

fn ai_image_layers(cfg: &AiImageConfig) -> Vec<CssLayer> {
    let opacity = clamp01(cfg.opacity);
    let blur = cfg.blur.max(0.0);
    vec![
        CssLayer::fill("#000"),
        CssLayer {
            background: String::new(),
            opacity,
            filter: Some(format!("blur({blur}px) saturate(1.15) contrast(1.05)")),
            blend: None,
            image_src: Some(format!(
                "/api/ai/backdrop/{}",
                utf8_percent_encode(&cfg.variant_id, PATH_SEGMENT)
            )),
        },
        CssLayer::fill(
            "radial-gradient(circle at 50% 35%, rgba(0,224,255,0.10), transparent 55%)",
        ),
        CssLayer::fill(
            "radial-gradient(circle at 70% 65%, rgba(255,78,205,0.10), transparent 60%)",
        ),
        CssLayer::fill("rgba(0,0,0,0.4)"),
    ]
}

