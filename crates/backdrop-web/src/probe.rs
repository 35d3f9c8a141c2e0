use backdrop_core::constants::MOBILE_MAX_WIDTH;
use backdrop_core::Capabilities;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

fn media_matches(window: &web::Window, query: &str) -> bool {
    window
        .match_media(query)
        .ok()
        .flatten()
        .map(|m| m.matches())
        .unwrap_or(false)
}

fn has_webgpu(window: &web::Window) -> bool {
    let nav: JsValue = window.navigator().into();
    js_sys::Reflect::get(&nav, &JsValue::from_str("gpu"))
        .map(|g| !g.is_undefined() && !g.is_null())
        .unwrap_or(false)
}

fn has_webgl2(document: &web::Document) -> bool {
    document
        .create_element("canvas")
        .ok()
        .and_then(|el| el.dyn_into::<web::HtmlCanvasElement>().ok())
        .and_then(|c| c.get_context("webgl2").ok().flatten())
        .is_some()
}

fn has_video_frame_callback(window: &web::Window) -> bool {
    let global: JsValue = window.clone().into();
    js_sys::Reflect::get(&global, &JsValue::from_str("HTMLVideoElement"))
        .and_then(|ctor| js_sys::Reflect::get(&ctor, &JsValue::from_str("prototype")))
        .and_then(|proto| js_sys::Reflect::has(&proto, &JsValue::from_str("requestVideoFrameCallback")))
        .unwrap_or(false)
}

/// Probe once at startup; everything downstream takes the result by value.
pub fn probe_capabilities() -> Capabilities {
    let Some(window) = web::window() else {
        return Capabilities::default();
    };
    let gpu = has_webgpu(&window) || window.document().map(|d| has_webgl2(&d)).unwrap_or(false);
    let caps = Capabilities::new(
        media_matches(&window, "(prefers-reduced-motion: reduce)"),
        gpu,
        has_video_frame_callback(&window),
        window.device_pixel_ratio(),
        media_matches(&window, &format!("(max-width: {}px)", MOBILE_MAX_WIDTH)),
    );
    log::info!(
        "capabilities: reduced_motion={} gpu={} rvfc={} dpr={} mobile={}",
        caps.reduced_motion,
        caps.gpu,
        caps.video_frame_callback,
        caps.device_pixel_ratio,
        caps.mobile
    );
    caps
}
