// Host-side tests for the variant registry and preset dispatch.

use backdrop_core::config::*;
use backdrop_core::{Backdrop, BackdropError, Capabilities};

#[test]
fn root_variant_is_indexed_minimal() {
    let root = root_variant();
    assert_eq!(root.id, ROOT_VARIANT_ID);
    assert!(root.metadata.robots_index);
    assert_eq!(root.background.kind(), "minimal");
}

#[test]
fn numbered_variants_are_noindex_and_titled() {
    let ids: Vec<&str> = variant_ids().collect();
    assert_eq!(ids.len(), 10);
    assert_eq!(ids[0], "1");
    for id in ids {
        let v = variant(id).expect("listed id resolves");
        assert!(!v.metadata.robots_index, "{id} must be noindex");
        assert!(v.metadata.title.contains(&format!("/{id}")), "{}", v.metadata.title);
        assert!(v.metadata.title.contains(v.name));
    }
}

#[test]
fn unknown_variant_is_not_found() {
    match variant("42") {
        Err(BackdropError::UnknownVariant(id)) => assert_eq!(id, "42"),
        other => panic!("expected not found, got {:?}", other.map(|v| v.id)),
    }
}

#[test]
fn event_horizon_uses_raymarch() {
    let v = variant("10").unwrap();
    assert_eq!(v.background.kind(), "raymarch");
}

#[test]
fn every_variant_dispatches_to_something() {
    let caps = Capabilities::default();
    for v in std::iter::once(root_variant()).chain(variant_ids().map(|id| variant(id).unwrap())) {
        let backdrop = Backdrop::from_preset(&v.background, &caps, 7);
        assert!(backdrop.layer_count() > 0, "{} produced nothing", v.id);
    }
}

#[test]
fn warp_gates_stack_two_canvas_layers() {
    let preset = BackgroundPreset::warp_gates(WarpFieldOverride::default(), 0.8);
    match Backdrop::from_preset(&preset, &Capabilities::default(), 1) {
        Backdrop::Canvas(layers) => {
            let names: Vec<&str> = layers.iter().map(|l| l.name()).collect();
            assert_eq!(names, ["warp", "gates"]);
        }
        _ => panic!("warpGates must be canvas layers"),
    }
}

#[test]
fn raymarch_without_gpu_draws_nothing() {
    let caps = Capabilities {
        gpu: false,
        ..Default::default()
    };
    let preset = BackgroundPreset::raymarch(RaymarchPalette::Infra, 1.0);
    assert!(matches!(Backdrop::from_preset(&preset, &caps, 1), Backdrop::Empty));
    assert!(matches!(
        Backdrop::from_preset(&preset, &Capabilities::default(), 1),
        Backdrop::Raymarch(_)
    ));
}

#[test]
fn minimal_is_four_css_layers_topped_by_dot_grain() {
    let preset = BackgroundPreset::minimal(205.0, 0.3, 0.92);
    match Backdrop::from_preset(&preset, &Capabilities::default(), 1) {
        Backdrop::Css(layers) => {
            assert_eq!(layers.len(), 4);
            assert!(layers[1].background.contains("hsla(205"), "{}", layers[1].background);
            assert!((layers[2].opacity - 0.92).abs() < 1e-6);
            let grain = &layers[3];
            assert!(grain.background.contains("6px 6px"), "{}", grain.background);
            assert!((grain.opacity - 0.08).abs() < 1e-6);
            assert_eq!(grain.blend.as_deref(), Some("soft-light"));
            assert!(layers[..3].iter().all(|l| l.blend.is_none()));
        }
        _ => panic!("minimal must be CSS layers"),
    }
}

#[test]
fn ai_image_points_at_encoded_endpoint() {
    let preset = BackgroundPreset::ai_image("a b", 0.5);
    match Backdrop::from_preset(&preset, &Capabilities::default(), 1) {
        Backdrop::Css(layers) => {
            let img = layers.iter().find_map(|l| l.image_src.clone()).expect("image layer");
            assert_eq!(img, "/api/ai/backdrop/a%20b");
        }
        _ => panic!("aiImage must be CSS layers"),
    }
}

#[test]
fn ai_image_escapes_reserved_and_non_ascii_characters() {
    let preset = BackgroundPreset::ai_image("neon/grid?v=2 ü-_.~", 0.5);
    match Backdrop::from_preset(&preset, &Capabilities::default(), 1) {
        Backdrop::Css(layers) => {
            let img = layers.iter().find_map(|l| l.image_src.clone()).expect("image layer");
            assert_eq!(img, "/api/ai/backdrop/neon%2Fgrid%3Fv%3D2%20%C3%BC-_.~");
        }
        _ => panic!("aiImage must be CSS layers"),
    }
}

#[test]
fn particle_counts_scale_with_device() {
    let desktop = Capabilities::new(false, true, true, 1.0, false);
    let phone = Capabilities::new(false, true, true, 3.0, true);
    assert_eq!(desktop.warp_particle_count(1.0), 1100);
    assert_eq!(phone.device_pixel_ratio, 2.0);
    assert_eq!(phone.warp_particle_count(1.0), 1200);
    assert_eq!(desktop.star_count(700), 700);
    assert_eq!(desktop.star_count(50), 200);
}
