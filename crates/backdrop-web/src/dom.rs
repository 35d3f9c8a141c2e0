use anyhow::anyhow;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

#[inline]
pub fn js_err(e: JsValue) -> anyhow::Error {
    anyhow!("{:?}", e)
}

#[inline]
pub fn window() -> anyhow::Result<web::Window> {
    web::window().ok_or_else(|| anyhow!("no window"))
}

#[inline]
pub fn window_document() -> anyhow::Result<web::Document> {
    window()?.document().ok_or_else(|| anyhow!("no document"))
}

pub fn element_by_id<T: JsCast>(document: &web::Document, id: &str) -> anyhow::Result<T> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| anyhow!("missing #{}", id))?
        .dyn_into::<T>()
        .map_err(|e| anyhow!("#{} has the wrong element type: {:?}", id, e))
}

pub fn create<T: JsCast>(document: &web::Document, tag: &str) -> anyhow::Result<T> {
    document
        .create_element(tag)
        .map_err(js_err)?
        .dyn_into::<T>()
        .map_err(|e| anyhow!("<{}> cast failed: {:?}", tag, e))
}

pub fn set_style(el: &web::HtmlElement, props: &[(&str, &str)]) {
    let style = el.style();
    for (k, v) in props {
        let _ = style.set_property(k, v);
    }
}

/// Full-bleed layer that never takes pointer input.
pub fn overlay_style(el: &web::HtmlElement) {
    set_style(
        el,
        &[
            ("position", "absolute"),
            ("inset", "0"),
            ("width", "100%"),
            ("height", "100%"),
            ("pointer-events", "none"),
        ],
    );
}

#[inline]
pub fn now_ms() -> f64 {
    web::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

pub fn inner_size(window: &web::Window) -> (f64, f64) {
    let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    (w, h)
}

/// Tallest of the usual document height measurements.
pub fn document_height(document: &web::Document) -> f64 {
    let mut h = 0i32;
    if let Some(body) = document.body() {
        h = h.max(body.scroll_height()).max(body.offset_height());
    }
    if let Some(root) = document.document_element() {
        h = h.max(root.client_height()).max(root.scroll_height());
    }
    h as f64
}

/// Random seed from the JS engine.
pub fn js_seed() -> u64 {
    let hi = (js_sys::Math::random() * u32::MAX as f64) as u64;
    let lo = (js_sys::Math::random() * u32::MAX as f64) as u64;
    (hi << 32) | lo
}

/// Removes its element from the document when dropped.
pub struct ElementGuard(pub web::Element);

impl Drop for ElementGuard {
    fn drop(&mut self) {
        self.0.remove();
    }
}

/// Event listener that unregisters itself when dropped.
pub struct Listener {
    target: web::EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(web::Event)>,
}

impl Listener {
    pub fn new(
        target: &web::EventTarget,
        kind: &'static str,
        handler: impl FnMut(web::Event) + 'static,
    ) -> anyhow::Result<Self> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
        target
            .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
            .map_err(js_err)?;
        Ok(Self {
            target: target.clone(),
            kind,
            closure,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref());
    }
}

/// One-shot `setTimeout`, cleared on drop if it has not fired.
pub struct Timeout {
    id: i32,
    _closure: Closure<dyn FnMut()>,
}

impl Timeout {
    pub fn new(ms: i32, f: impl FnMut() + 'static) -> anyhow::Result<Self> {
        let closure = Closure::wrap(Box::new(f) as Box<dyn FnMut()>);
        let id = window()?
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                ms,
            )
            .map_err(js_err)?;
        Ok(Self {
            id,
            _closure: closure,
        })
    }
}

impl Drop for Timeout {
    fn drop(&mut self) {
        if let Some(w) = web::window() {
            w.clear_timeout_with_handle(self.id);
        }
    }
}
