use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StreakMode {
    None,
    #[default]
    Highlights,
    All,
}

pub const DEFAULT_PALETTE: [&str; 4] = ["#00e0ff", "#7c5cff", "#ff4ecd", "#ff8a00"];
pub const DEFAULT_GLYPHS: [&str; 6] = ["▢", "▣", "▪", "▫", "·", "•"];

/// Parameters of the particle warp tunnel.
///
/// All numeric fields are non-negative except `camera_roll` and `shake`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WarpFieldConfig {
    pub density_multiplier: f32,
    pub palette_stops: Vec<String>,
    pub glyphs: Vec<String>,

    // Motion
    pub base_speed: f32,
    pub spool_boost: f32,
    pub spool_duration_ms: f32,

    // Rendering
    /// Alpha of the black fill laid over the previous frame; lower = longer trails.
    pub trail_fade: f32,
    pub trail_fade_spool: f32,
    pub tunnel_scale: f32,
    pub tunnel_scale_spool_boost: f32,
    pub size_spool_boost: f32,

    // Particles
    pub particle_speed_min: f32,
    pub particle_speed_max: f32,
    pub particle_drift_min: f32,
    pub particle_drift_max: f32,
    pub particle_size_min: f32,
    pub particle_size_max: f32,
    pub highlight_chance: f32,

    // Effects
    pub glow_base: f32,
    pub glow_spool_boost: f32,
    pub streak_mode: StreakMode,
    pub streak_length: f32,
    pub chroma_offset: f32,
    pub mouse_strength: f32,
    pub swirl_strength: f32,
    pub pulse_rate_hz: f32,
    pub pulse_depth: f32,
    pub lens_strength: f32,
    pub camera_roll: f32,
    pub camera_roll_rate: f32,
    pub shake: f32,

    // Legibility
    pub center_mask_strength: f32,
    /// Fraction of `min(viewport)`.
    pub center_mask_radius: f32,
    /// Fraction of `min(viewport)`.
    pub center_mask_softness: f32,
}

impl Default for WarpFieldConfig {
    fn default() -> Self {
        Self {
            density_multiplier: 1.0,
            palette_stops: DEFAULT_PALETTE.iter().map(|s| s.to_string()).collect(),
            glyphs: DEFAULT_GLYPHS.iter().map(|s| s.to_string()).collect(),

            base_speed: 0.5,
            spool_boost: 3.0,
            spool_duration_ms: 900.0,

            trail_fade: 0.18,
            trail_fade_spool: 0.07,
            tunnel_scale: 0.38,
            tunnel_scale_spool_boost: 0.18,
            size_spool_boost: 0.35,

            particle_speed_min: 0.12,
            particle_speed_max: 0.4,
            particle_drift_min: 0.02,
            particle_drift_max: 0.07,
            particle_size_min: 0.8,
            particle_size_max: 2.2,
            highlight_chance: 0.06,

            glow_base: 10.0,
            glow_spool_boost: 26.0,
            streak_mode: StreakMode::Highlights,
            streak_length: 28.0,
            chroma_offset: 0.0,
            mouse_strength: 0.002,
            swirl_strength: 0.0,
            pulse_rate_hz: 0.0,
            pulse_depth: 0.0,
            lens_strength: 0.0,
            camera_roll: 0.0,
            camera_roll_rate: 0.9,
            shake: 0.0,

            center_mask_strength: 0.0,
            center_mask_radius: 0.24,
            center_mask_softness: 0.18,
        }
    }
}

macro_rules! warp_override {
    ($($field:ident: $ty:ty),* $(,)?) => {
        /// Sparse override of a [`WarpFieldConfig`]; `None` keeps the base value.
        #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase", default)]
        pub struct WarpFieldOverride {
            $(
                #[serde(skip_serializing_if = "Option::is_none")]
                pub $field: Option<$ty>,
            )*
        }

        impl WarpFieldOverride {
            fn apply_to(&self, cfg: &mut WarpFieldConfig) {
                $(
                    if let Some(v) = &self.$field {
                        cfg.$field = v.clone();
                    }
                )*
            }

            pub fn is_empty(&self) -> bool {
                true $(&& self.$field.is_none())*
            }
        }
    };
}

warp_override! {
    density_multiplier: f32,
    palette_stops: Vec<String>,
    glyphs: Vec<String>,
    base_speed: f32,
    spool_boost: f32,
    spool_duration_ms: f32,
    trail_fade: f32,
    trail_fade_spool: f32,
    tunnel_scale: f32,
    tunnel_scale_spool_boost: f32,
    size_spool_boost: f32,
    particle_speed_min: f32,
    particle_speed_max: f32,
    particle_drift_min: f32,
    particle_drift_max: f32,
    particle_size_min: f32,
    particle_size_max: f32,
    highlight_chance: f32,
    glow_base: f32,
    glow_spool_boost: f32,
    streak_mode: StreakMode,
    streak_length: f32,
    chroma_offset: f32,
    mouse_strength: f32,
    swirl_strength: f32,
    pulse_rate_hz: f32,
    pulse_depth: f32,
    lens_strength: f32,
    camera_roll: f32,
    camera_roll_rate: f32,
    shake: f32,
    center_mask_strength: f32,
    center_mask_radius: f32,
    center_mask_softness: f32,
}

/// Layer `over` on top of `base`, keeping every field `over` leaves unset.
pub fn merge_warp_config(base: &WarpFieldConfig, over: Option<&WarpFieldOverride>) -> WarpFieldConfig {
    let mut out = base.clone();
    if let Some(o) = over {
        o.apply_to(&mut out);
    }
    out
}

impl WarpFieldConfig {
    /// Clamp fields that must be non-negative and order the min/max ranges.
    pub fn sanitized(&self) -> Self {
        let mut c = self.clone();
        for v in [
            &mut c.density_multiplier,
            &mut c.base_speed,
            &mut c.spool_boost,
            &mut c.spool_duration_ms,
            &mut c.tunnel_scale,
            &mut c.tunnel_scale_spool_boost,
            &mut c.size_spool_boost,
            &mut c.particle_speed_min,
            &mut c.particle_speed_max,
            &mut c.particle_drift_min,
            &mut c.particle_drift_max,
            &mut c.particle_size_min,
            &mut c.particle_size_max,
            &mut c.glow_base,
            &mut c.glow_spool_boost,
            &mut c.streak_length,
            &mut c.chroma_offset,
            &mut c.mouse_strength,
            &mut c.swirl_strength,
            &mut c.pulse_rate_hz,
            &mut c.pulse_depth,
            &mut c.lens_strength,
            &mut c.camera_roll_rate,
            &mut c.center_mask_radius,
            &mut c.center_mask_softness,
        ] {
            if !v.is_finite() || *v < 0.0 {
                *v = 0.0;
            }
        }
        c.trail_fade = c.trail_fade.clamp(0.0, 1.0);
        c.trail_fade_spool = c.trail_fade_spool.clamp(0.0, 1.0);
        c.highlight_chance = c.highlight_chance.clamp(0.0, 1.0);
        c.center_mask_strength = c.center_mask_strength.clamp(0.0, 1.0);
        if c.particle_speed_max < c.particle_speed_min {
            std::mem::swap(&mut c.particle_speed_min, &mut c.particle_speed_max);
        }
        if c.particle_drift_max < c.particle_drift_min {
            std::mem::swap(&mut c.particle_drift_min, &mut c.particle_drift_max);
        }
        if c.particle_size_max < c.particle_size_min {
            std::mem::swap(&mut c.particle_size_min, &mut c.particle_size_max);
        }
        c
    }
}
