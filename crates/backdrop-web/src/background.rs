//! Mounts a [`Backdrop`] into a host element: one canvas per layer, a GPU
//! canvas for the raymarch tunnel, or plain DOM for CSS backdrops.

use crate::canvas::CanvasSurface;
use crate::dom::{self, create, js_err, overlay_style, set_style, ElementGuard, Listener};
use crate::frame::{RafLoop, ResizeWatch};
use crate::raymarch::RaymarchGpu;
use crate::spool;
use crate::Guards;
use backdrop_core::config::BackgroundPreset;
use backdrop_core::dispatch::CssLayer;
use backdrop_core::renderers::RaymarchParams;
use backdrop_core::{AnimationLoop, Backdrop, Capabilities, LoopAction, Renderer, Viewport};
use glam::Vec2;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

struct Layer {
    lp: AnimationLoop,
    surface: CanvasSurface,
}

type SharedLayer = Rc<RefCell<Layer>>;

pub fn mount(
    host: &web::HtmlElement,
    preset: &BackgroundPreset,
    caps: Capabilities,
    guards: &mut Guards,
) -> anyhow::Result<()> {
    let document = dom::window_document()?;
    match Backdrop::from_preset(preset, &caps, dom::js_seed()) {
        Backdrop::Canvas(renderers) => {
            let mut layers = Vec::with_capacity(renderers.len());
            for renderer in renderers {
                layers.push(mount_canvas_layer(&document, host, renderer, caps, guards)?);
            }
            wire_layer_input(&layers, guards)?;
            log::info!("backdrop: mounted {} {} layer(s)", layers.len(), preset.kind());
        }
        Backdrop::Raymarch(params) => mount_raymarch(&document, host, params, caps, guards)?,
        Backdrop::Css(layers) => {
            for layer in &layers {
                mount_css_layer(&document, host, layer, guards)?;
            }
        }
        Backdrop::Empty => log::debug!("backdrop: {} has nothing to draw", preset.kind()),
    }
    Ok(())
}

fn host_viewport(host: &web::HtmlElement, caps: &Capabilities) -> Option<Viewport> {
    let rect = host.get_bounding_client_rect();
    Viewport::new(rect.width() as f32, rect.height() as f32, caps.device_pixel_ratio).ok()
}

fn resize_layer(layer: &SharedLayer, host: &web::HtmlElement, caps: &Capabilities) {
    let Some(vp) = host_viewport(host, caps) else {
        return;
    };
    let mut l = layer.borrow_mut();
    let Layer { lp, surface } = &mut *l;
    surface.resize(&vp);
    lp.resize(vp);
    if caps.reduced_motion {
        // Resizing wiped the static frame.
        lp.mount(dom::now_ms(), surface);
    }
}

fn mount_canvas_layer(
    document: &web::Document,
    host: &web::HtmlElement,
    renderer: Box<dyn Renderer>,
    caps: Capabilities,
    guards: &mut Guards,
) -> anyhow::Result<SharedLayer> {
    let canvas: web::HtmlCanvasElement = create(document, "canvas")?;
    overlay_style(&canvas);
    let _ = canvas.set_attribute("data-backdrop-layer", renderer.name());
    host.append_child(&canvas).map_err(js_err)?;
    guards.push(Box::new(ElementGuard(canvas.clone().into())));

    let surface = CanvasSurface::new(canvas)?;
    let layer = Rc::new(RefCell::new(Layer {
        lp: AnimationLoop::new(renderer, caps.reduced_motion),
        surface,
    }));

    if let Some(vp) = host_viewport(host, &caps) {
        let mut l = layer.borrow_mut();
        l.surface.resize(&vp);
        l.lp.resize(vp);
    }
    {
        let layer = layer.clone();
        let host = host.clone();
        let target: web::Element = host.clone().into();
        guards.push(Box::new(ResizeWatch::new(&target, move || {
            resize_layer(&layer, &host, &caps)
        })?));
    }

    let action = {
        let mut l = layer.borrow_mut();
        let Layer { lp, surface } = &mut *l;
        lp.mount(dom::now_ms(), surface)
    };
    if action == LoopAction::Schedule {
        let layer = layer.clone();
        guards.push(Box::new(RafLoop::start(move |now| {
            let mut l = layer.borrow_mut();
            let Layer { lp, surface } = &mut *l;
            lp.frame(now, surface)
        })));
    }
    Ok(layer)
}

// Spool event and pointer tracking shared by every layer of one backdrop.
fn wire_layer_input(layers: &[SharedLayer], guards: &mut Guards) -> anyhow::Result<()> {
    let spool_layers = layers.to_vec();
    guards.push(Box::new(spool::listen(move || {
        let now = dom::now_ms();
        for l in &spool_layers {
            l.borrow_mut().lp.spool(now);
        }
    })?));

    let window = dom::window()?;
    let pointer_layers = layers.to_vec();
    let win = window.clone();
    guards.push(Box::new(Listener::new(window.as_ref(), "pointermove", move |ev| {
        let Some(ev) = ev.dyn_ref::<web::PointerEvent>() else {
            return;
        };
        let (w, h) = dom::inner_size(&win);
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        let ndc = Vec2::new(
            (ev.client_x() as f64 / w * 2.0 - 1.0) as f32,
            (ev.client_y() as f64 / h * 2.0 - 1.0) as f32,
        );
        for l in &pointer_layers {
            l.borrow_mut().lp.pointer(ndc);
        }
    })?));
    Ok(())
}

/// Keeps the async GPU setup from starting a loop after disposal.
struct PendingGpu {
    alive: Rc<Cell<bool>>,
    raf: Rc<RefCell<Option<RafLoop>>>,
}

impl Drop for PendingGpu {
    fn drop(&mut self) {
        self.alive.set(false);
        self.raf.borrow_mut().take();
    }
}

fn size_gpu_canvas(canvas: &web::HtmlCanvasElement, host: &web::HtmlElement, caps: &Capabilities) {
    if let Some(vp) = host_viewport(host, caps) {
        let (w, h) = vp.backing_size();
        canvas.set_width(w.max(1));
        canvas.set_height(h.max(1));
    }
}

fn mount_raymarch(
    document: &web::Document,
    host: &web::HtmlElement,
    params: RaymarchParams,
    caps: Capabilities,
    guards: &mut Guards,
) -> anyhow::Result<()> {
    let canvas: web::HtmlCanvasElement = create(document, "canvas")?;
    overlay_style(&canvas);
    let _ = canvas.set_attribute("data-backdrop-layer", "raymarch");
    host.append_child(&canvas).map_err(js_err)?;
    guards.push(Box::new(ElementGuard(canvas.clone().into())));
    size_gpu_canvas(&canvas, host, &caps);
    {
        let canvas = canvas.clone();
        let host = host.clone();
        let target: web::Element = host.clone().into();
        guards.push(Box::new(ResizeWatch::new(&target, move || {
            size_gpu_canvas(&canvas, &host, &caps)
        })?));
    }

    let alive = Rc::new(Cell::new(true));
    let raf = Rc::new(RefCell::new(None));
    guards.push(Box::new(PendingGpu {
        alive: alive.clone(),
        raf: raf.clone(),
    }));

    spawn_local(async move {
        let mut gpu = match RaymarchGpu::new(&canvas, params).await {
            Ok(g) => g,
            Err(e) => {
                log::warn!("raymarch backdrop disabled: {:?}", e);
                return;
            }
        };
        if !alive.get() {
            return;
        }
        if caps.reduced_motion {
            let t = (dom::now_ms() / 1000.0) as f32;
            if let Err(e) = gpu.render(t) {
                log::warn!("raymarch static frame failed: {:?}", e);
            }
            return;
        }
        let start = dom::now_ms();
        let loop_ = RafLoop::start(move |now| {
            gpu.resize_if_needed(canvas.width(), canvas.height());
            match gpu.render(((now - start) / 1000.0) as f32) {
                Ok(()) => LoopAction::Schedule,
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    gpu.reconfigure();
                    LoopAction::Schedule
                }
                Err(wgpu::SurfaceError::Timeout) => LoopAction::Schedule,
                Err(e) => {
                    log::error!("raymarch render error: {:?}", e);
                    LoopAction::Stop
                }
            }
        });
        *raf.borrow_mut() = Some(loop_);
    });
    Ok(())
}

fn mount_css_layer(
    document: &web::Document,
    host: &web::HtmlElement,
    layer: &CssLayer,
    guards: &mut Guards,
) -> anyhow::Result<()> {
    let opacity = format!("{:.3}", layer.opacity.clamp(0.0, 1.0));
    let el: web::HtmlElement = match &layer.image_src {
        Some(src) => {
            let img: web::HtmlImageElement = create(document, "img")?;
            img.set_src(src);
            img.set_alt("");
            set_style(&img, &[("object-fit", "cover")]);
            img.into()
        }
        None => {
            let div: web::HtmlElement = create(document, "div")?;
            set_style(&div, &[("background", layer.background.as_str())]);
            div
        }
    };
    overlay_style(&el);
    set_style(&el, &[("opacity", opacity.as_str())]);
    if let Some(filter) = &layer.filter {
        set_style(&el, &[("filter", filter.as_str())]);
    }
    if let Some(blend) = &layer.blend {
        set_style(&el, &[("mix-blend-mode", blend.as_str())]);
    }
    let _ = el.set_attribute("aria-hidden", "true");
    host.append_child(&el).map_err(js_err)?;
    guards.push(Box::new(ElementGuard(el.into())));
    Ok(())
}
