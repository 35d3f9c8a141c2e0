//! Static table of page variants, keyed by route id.

use super::presets::{
    BackgroundPreset, LaneColorMode, NebulaColorMode, RaymarchPalette, StarColorMode,
};
use super::warp::{StreakMode, WarpFieldOverride};
use crate::error::{BackdropError, Result};
use std::sync::OnceLock;

pub const ROOT_VARIANT_ID: &str = "root";

#[derive(Clone, Debug, PartialEq)]
pub struct VariantMetadata {
    pub title: String,
    pub description: String,
    pub robots_index: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Variant {
    pub id: &'static str,
    pub name: &'static str,
    pub metadata: VariantMetadata,
    pub background: BackgroundPreset,
}

fn entry(
    id: &'static str,
    name: &'static str,
    description: &str,
    background: BackgroundPreset,
) -> Variant {
    let (title, robots_index) = if id == ROOT_VARIANT_ID {
        ("JustEvery".to_string(), true)
    } else {
        (format!("JustEvery /{id} — {name}"), false)
    };
    Variant {
        id,
        name,
        metadata: VariantMetadata {
            title,
            description: description.to_string(),
            robots_index,
        },
        background,
    }
}

fn build() -> Vec<Variant> {
    vec![
        entry(
            ROOT_VARIANT_ID,
            "Calm Minimal",
            "Push frontier AI further. Ship faster. Professional tools that turn powerful models into reliable workflows.",
            BackgroundPreset::minimal(205.0, 0.3, 0.92),
        ),
        entry(
            "1",
            "Quiet Stars",
            "Sparse starfield. Calm. Minimal. Future-ready.",
            BackgroundPreset::starfield(700, 0.24, StarColorMode::Mono),
        ),
        entry(
            "2",
            "Neon Lanes",
            "Structured neon lanes. Smooth acceleration.",
            BackgroundPreset::lanes(18, 0.6, LaneColorMode::Cyan),
        ),
        entry(
            "3",
            "ASCII Hyperlane",
            "Monospace hyperspace. Huge motion. Low visual noise.",
            BackgroundPreset::ascii("░▒▓█<>/\\[]{}()", 1.1, 0.55),
        ),
        entry(
            "4",
            "Vector Lanes",
            "Neon lanes and gate-lines. Clean acceleration cues.",
            BackgroundPreset::lanes(14, 0.95, LaneColorMode::Prismatic),
        ),
        entry(
            "5",
            "Corkscrew Drive",
            "Helical motion. Strong forward pull. Controlled chaos.",
            BackgroundPreset::Warp(WarpFieldOverride {
                density_multiplier: Some(1.25),
                base_speed: Some(1.35),
                spool_boost: Some(5.8),
                trail_fade: Some(0.095),
                trail_fade_spool: Some(0.042),
                tunnel_scale: Some(0.42),
                tunnel_scale_spool_boost: Some(0.24),
                swirl_strength: Some(1.3),
                lens_strength: Some(0.22),
                chroma_offset: Some(1.6),
                streak_mode: Some(StreakMode::Highlights),
                streak_length: Some(86.0),
                glow_base: Some(16.0),
                glow_spool_boost: Some(38.0),
                center_mask_strength: Some(0.62),
                center_mask_radius: Some(0.26),
                ..Default::default()
            }),
        ),
        entry(
            "6",
            "Pulse Gates",
            "Rhythmic acceleration gates and dense streaking.",
            BackgroundPreset::warp_gates(
                WarpFieldOverride {
                    density_multiplier: Some(1.35),
                    base_speed: Some(1.5),
                    spool_boost: Some(6.5),
                    trail_fade: Some(0.09),
                    trail_fade_spool: Some(0.04),
                    pulse_rate_hz: Some(0.85),
                    pulse_depth: Some(0.45),
                    chroma_offset: Some(1.8),
                    streak_length: Some(92.0),
                    center_mask_strength: Some(0.6),
                    ..Default::default()
                },
                0.9,
            ),
        ),
        entry(
            "7",
            "Singularity Lens",
            "Gravitational lensing. Controlled center-safe warp.",
            BackgroundPreset::Warp(WarpFieldOverride {
                density_multiplier: Some(1.45),
                base_speed: Some(1.8),
                spool_boost: Some(7.6),
                trail_fade: Some(0.08),
                trail_fade_spool: Some(0.035),
                lens_strength: Some(0.45),
                chroma_offset: Some(2.0),
                streak_length: Some(104.0),
                center_mask_strength: Some(0.72),
                center_mask_radius: Some(0.3),
                center_mask_softness: Some(0.2),
                ..Default::default()
            }),
        ),
        entry(
            "8",
            "Quantum Shards",
            "Crystalline shards and glitch bursts.",
            BackgroundPreset::wireframe(0.78, "#7c5cff"),
        ),
        entry(
            "9",
            "Overclock Plasma",
            "Dense plasma streaks with heavy optics.",
            BackgroundPreset::nebula(NebulaColorMode::Sunset, 0.92),
        ),
        entry(
            "10",
            "Event Horizon",
            "Maximum future-warp: roll, lensing, streaks — still readable at the center.",
            BackgroundPreset::raymarch(RaymarchPalette::Infra, 1.0),
        ),
    ]
}

fn table() -> &'static [Variant] {
    static TABLE: OnceLock<Vec<Variant>> = OnceLock::new();
    TABLE.get_or_init(build)
}

/// Look up a variant by route id. Unknown ids are a not-found error.
pub fn variant(id: &str) -> Result<&'static Variant> {
    table()
        .iter()
        .find(|v| v.id == id)
        .ok_or_else(|| BackdropError::UnknownVariant(id.to_string()))
}

pub fn root_variant() -> &'static Variant {
    &table()[0]
}

/// Numbered variant ids in route order (the root variant is excluded).
pub fn variant_ids() -> impl Iterator<Item = &'static str> {
    table()
        .iter()
        .map(|v| v.id)
        .filter(|id| *id != ROOT_VARIANT_ID)
}
