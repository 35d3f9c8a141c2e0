use super::envelope::WarpCurve;
use crate::config::asset_url;
use crate::constants::SWAP_COOLDOWN_LOOPS;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSource {
    pub src: String,
    /// MIME type, e.g. `video/webm`.
    #[serde(rename = "type")]
    pub mime: String,
}

impl VideoSource {
    pub fn new(src: &str, mime: &str) -> Self {
        Self {
            src: src.to_string(),
            mime: mime.to_string(),
        }
    }

    /// WebM first, MP4 fallback.
    pub fn pair(stem: &str) -> Vec<VideoSource> {
        vec![
            VideoSource::new(&format!("{stem}.webm"), "video/webm"),
            VideoSource::new(&format!("{stem}.mp4"), "video/mp4"),
        ]
    }
}

/// A clip that can be spliced between loop plays.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroSwapVideo {
    pub id: String,
    pub sources: Vec<VideoSource>,
}

/// Everything `mount_hero` needs; deserializable from JS.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeroMediaConfig {
    pub intro: Vec<VideoSource>,
    #[serde(rename = "loop")]
    pub loop_: Vec<VideoSource>,
    pub poster: String,
    pub swaps: Vec<HeroSwapVideo>,
    pub cooldown_loops: u32,
    pub warp: WarpCurve,
    /// Ids of the two `feDisplacementMap` elements driven by the warp curve.
    pub displacement_ids: [String; 2],
}

impl Default for HeroMediaConfig {
    fn default() -> Self {
        Self {
            intro: VideoSource::pair("/video/hero-intro"),
            loop_: VideoSource::pair("/video/hero-loop"),
            poster: "/img/hero-bg.jpeg".to_string(),
            swaps: (1..=4)
                .map(|i| HeroSwapVideo {
                    id: format!("swap-{i:02}"),
                    sources: VideoSource::pair(&format!("/video/hero-swap-{i:02}")),
                })
                .collect(),
            cooldown_loops: SWAP_COOLDOWN_LOOPS,
            warp: WarpCurve::default(),
            displacement_ids: ["hero-warp-map-a".to_string(), "hero-warp-map-b".to_string()],
        }
    }
}

impl HeroMediaConfig {
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Rewrite every media path against `base`.
    pub fn resolved(&self, base: Option<&str>) -> Self {
        let fix = |list: &[VideoSource]| -> Vec<VideoSource> {
            list.iter()
                .map(|s| VideoSource {
                    src: asset_url(&s.src, base),
                    mime: s.mime.clone(),
                })
                .collect()
        };
        Self {
            intro: fix(&self.intro),
            loop_: fix(&self.loop_),
            poster: asset_url(&self.poster, base),
            swaps: self
                .swaps
                .iter()
                .map(|v| HeroSwapVideo {
                    id: v.id.clone(),
                    sources: fix(&v.sources),
                })
                .collect(),
            cooldown_loops: self.cooldown_loops,
            warp: self.warp.clone(),
            displacement_ids: self.displacement_ids.clone(),
        }
    }
}
