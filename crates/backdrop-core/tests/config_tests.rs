// Host-side tests for preset configuration: warp overrides, JSON presets,
// colors and asset URLs.

use backdrop_core::config::*;
use backdrop_core::{parse_palette, BackdropError, Rgba};

#[test]
fn merge_keeps_defaults_for_unset_fields() {
    let over = WarpFieldOverride {
        base_speed: Some(2.0),
        ..Default::default()
    };
    let merged = merge_warp_config(&WarpFieldConfig::default(), Some(&over));
    let mut expected = WarpFieldConfig::default();
    expected.base_speed = 2.0;
    assert_eq!(merged, expected);
}

#[test]
fn merge_without_override_is_identity() {
    let base = WarpFieldConfig::default();
    assert_eq!(merge_warp_config(&base, None), base);
    assert!(WarpFieldOverride::default().is_empty());
}

#[test]
fn merge_replaces_lists_wholesale() {
    let over = WarpFieldOverride {
        palette_stops: Some(vec!["#fff".to_string()]),
        ..Default::default()
    };
    let merged = merge_warp_config(&WarpFieldConfig::default(), Some(&over));
    assert_eq!(merged.palette_stops, vec!["#fff".to_string()]);
    assert_eq!(merged.glyphs.len(), DEFAULT_GLYPHS.len());
}

#[test]
fn sanitized_orders_ranges_and_clamps_negatives() {
    let mut cfg = WarpFieldConfig::default();
    cfg.particle_speed_min = 0.5;
    cfg.particle_speed_max = 0.1;
    cfg.base_speed = -1.0;
    let s = cfg.sanitized();
    assert!(s.particle_speed_min <= s.particle_speed_max);
    assert!(s.base_speed >= 0.0);
}

#[test]
fn warp_override_parses_camel_case_json() {
    let json = r#"{"kind":"warp","config":{"baseSpeed":1.3,"streakMode":"all","cameraRoll":0.2}}"#;
    let preset = BackgroundPreset::from_json(json).expect("valid preset");
    assert_eq!(preset.kind(), "warp");
    match preset {
        BackgroundPreset::Warp(o) => {
            assert_eq!(o.base_speed, Some(1.3));
            assert_eq!(o.streak_mode, Some(StreakMode::All));
            assert_eq!(o.camera_roll, Some(0.2));
            assert_eq!(o.shake, None);
        }
        other => panic!("unexpected preset {:?}", other.kind()),
    }
}

#[test]
fn starfield_preset_parses() {
    let json = r#"{"kind":"starfield","config":{"starCount":500,"speed":0.3,"depth":1.0,"twinkle":0.5,"colorMode":"cool"}}"#;
    let preset = BackgroundPreset::from_json(json).expect("valid preset");
    assert_eq!(
        preset,
        BackgroundPreset::Starfield(StarfieldConfig {
            star_count: 500,
            speed: 0.3,
            depth: 1.0,
            twinkle: 0.5,
            color_mode: StarColorMode::Cool,
        })
    );
}

#[test]
fn unknown_kind_is_a_json_error() {
    let err = BackgroundPreset::from_json(r#"{"kind":"lava","config":{}}"#).unwrap_err();
    assert!(matches!(err, BackdropError::Json(_)));
}

#[test]
fn preset_round_trips_through_serde() {
    let preset = BackgroundPreset::nebula(NebulaColorMode::Sunset, 0.92);
    let json = serde_json::to_string(&preset).unwrap();
    assert!(json.contains("\"kind\":\"nebula\""), "{json}");
    assert_eq!(BackgroundPreset::from_json(&json).unwrap(), preset);
}

#[test]
fn raymarch_palette_ids_are_distinct() {
    let ids = [
        RaymarchPalette::Cyan.shader_id(),
        RaymarchPalette::Prismatic.shader_id(),
        RaymarchPalette::Infra.shader_id(),
    ];
    assert_eq!(ids, [0.0, 1.0, 2.0]);
}

#[test]
fn hex_colors_parse_short_and_long() {
    assert_eq!(Rgba::from_hex("#fff").unwrap(), Rgba::WHITE);
    assert_eq!(Rgba::from_hex("00e0ff").unwrap(), Rgba::rgb(0, 0xe0, 0xff));
    assert!(matches!(Rgba::from_hex("#12"), Err(BackdropError::InvalidColor(_))));
    assert!(matches!(Rgba::from_hex("#gggggg"), Err(BackdropError::InvalidColor(_))));
}

#[test]
fn empty_palette_is_rejected() {
    let none: [&str; 0] = [];
    assert!(matches!(parse_palette(&none), Err(BackdropError::EmptyPalette)));
}

#[test]
fn asset_urls_join_against_base() {
    assert_eq!(asset_url("/video/a.mp4", None), "/video/a.mp4");
    assert_eq!(
        asset_url("/video/a.mp4", Some("https://cdn.example.com/")),
        "https://cdn.example.com/video/a.mp4"
    );
    assert_eq!(
        asset_url("img/x.jpeg", Some("https://cdn.example.com")),
        "https://cdn.example.com/img/x.jpeg"
    );
    assert_eq!(
        asset_url("https://other.example/v.webm", Some("https://cdn.example.com")),
        "https://other.example/v.webm"
    );
    assert_eq!(asset_url("/a", Some("")), "/a");
}
