#![cfg(target_arch = "wasm32")]
//! Browser bindings: mounts backdrops, hero media, the particle field and
//! wormhole headlines into host elements. Every mount returns a handle whose
//! `dispose` tears down listeners, frame loops and created elements.

mod background;
mod canvas;
mod dom;
mod flock;
mod frame;
mod hero;
mod probe;
mod raymarch;
mod spool;
mod wormhole;

use backdrop_core::config::{cdn_base, variant, BackgroundPreset};
use backdrop_core::hero::HeroMediaConfig;
use backdrop_core::Capabilities;
use std::any::Any;
use std::cell::Cell;
use wasm_bindgen::prelude::*;
use web_sys as web;

/// Drop-to-cleanup resources owned by one mount.
pub(crate) type Guards = Vec<Box<dyn Any>>;

thread_local! {
    static CAPABILITIES: Cell<Option<Capabilities>> = const { Cell::new(None) };
}

fn capabilities() -> Capabilities {
    CAPABILITIES.with(|c| match c.get() {
        Some(caps) => caps,
        None => {
            let caps = probe::probe_capabilities();
            c.set(Some(caps));
            caps
        }
    })
}

fn to_js(e: anyhow::Error) -> JsValue {
    JsValue::from_str(&format!("{:#}", e))
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("backdrop-web starting");
    capabilities();
    Ok(())
}

/// Handle returned by every `mount_*` call.
#[wasm_bindgen]
pub struct Mounted {
    guards: Guards,
}

#[wasm_bindgen]
impl Mounted {
    /// Stop everything this mount started. Safe to call twice.
    pub fn dispose(&mut self) {
        // Newest first, mirroring construction.
        while let Some(guard) = self.guards.pop() {
            drop(guard);
        }
    }

    #[wasm_bindgen(getter)]
    pub fn active(&self) -> bool {
        !self.guards.is_empty()
    }
}

fn host(host_id: &str) -> anyhow::Result<web::HtmlElement> {
    dom::element_by_id(&dom::window_document()?, host_id)
}

fn mount_preset(host_id: &str, preset: &BackgroundPreset) -> anyhow::Result<Mounted> {
    let host = host(host_id)?;
    let mut guards = Guards::new();
    background::mount(&host, preset, capabilities(), &mut guards)?;
    Ok(Mounted { guards })
}

/// Mount the backdrop of a page variant (`"root"`, `"1"`..).
#[wasm_bindgen]
pub fn mount_variant(host_id: &str, variant_id: &str) -> Result<Mounted, JsValue> {
    let v = variant(variant_id)
        .map_err(|_| JsValue::from_str(&format!("variant `{}` not found", variant_id)))?;
    log::info!("backdrop: variant {} ({})", v.id, v.name);
    mount_preset(host_id, &v.background).map_err(to_js)
}

/// Mount an arbitrary preset given as JSON.
#[wasm_bindgen]
pub fn mount_background_json(host_id: &str, json: &str) -> Result<Mounted, JsValue> {
    let preset = BackgroundPreset::from_json(json).map_err(|e| to_js(e.into()))?;
    mount_preset(host_id, &preset).map_err(to_js)
}

/// Document title of a variant, for the host page's `<title>`.
#[wasm_bindgen]
pub fn variant_title(variant_id: &str) -> Result<String, JsValue> {
    variant(variant_id)
        .map(|v| v.metadata.title.clone())
        .map_err(|_| JsValue::from_str(&format!("variant `{}` not found", variant_id)))
}

/// Mount the intro/loop/swap hero videos. `config_json` overrides the
/// default media set; paths are rewritten against the CDN base when set.
#[wasm_bindgen]
pub fn mount_hero(host_id: &str, config_json: Option<String>) -> Result<Mounted, JsValue> {
    let config = match config_json {
        Some(json) => HeroMediaConfig::from_json(&json).map_err(|e| to_js(e.into()))?,
        None => HeroMediaConfig::default(),
    };
    let host = host(host_id).map_err(to_js)?;
    let mut guards = Guards::new();
    hero::mount(&host, config.resolved(cdn_base()), capabilities(), &mut guards).map_err(to_js)?;
    Ok(Mounted { guards })
}

#[wasm_bindgen]
pub fn mount_particle_field(canvas_id: &str, opacity: f32) -> Result<Mounted, JsValue> {
    let canvas: web::HtmlCanvasElement =
        dom::element_by_id(&dom::window_document().map_err(to_js)?, canvas_id).map_err(to_js)?;
    let mut guards = Guards::new();
    flock::mount(canvas, opacity, capabilities().reduced_motion, &mut guards).map_err(to_js)?;
    Ok(Mounted { guards })
}

#[wasm_bindgen]
pub struct WormholeHandle {
    inner: Option<wormhole::Wormhole>,
}

#[wasm_bindgen]
impl WormholeHandle {
    pub fn next(&self) {
        if let Some(w) = &self.inner {
            w.next();
        }
    }

    pub fn dispose(&mut self) {
        self.inner = None;
    }
}

/// Split an element's text into glyphs that warp toward the viewport center.
#[wasm_bindgen]
pub fn mount_wormhole(element_id: &str, interactive: bool) -> Result<WormholeHandle, JsValue> {
    let element = host(element_id).map_err(to_js)?;
    let w = wormhole::Wormhole::mount(element, interactive, capabilities()).map_err(to_js)?;
    Ok(WormholeHandle { inner: Some(w) })
}

/// Fire `warpfield:spool`; every mounted warp-family layer accelerates.
#[wasm_bindgen]
pub fn trigger_spool() -> Result<(), JsValue> {
    spool::trigger().map_err(to_js)
}
