//! Page-wide particle flocks on a fixed canvas.

use crate::canvas::CanvasSurface;
use crate::dom::{self, Listener};
use crate::frame::{RafLoop, ResizeWatch};
use crate::Guards;
use backdrop_core::flock::{Obstacle, PageMetrics, ParticleField};
use backdrop_core::{LoopAction, Viewport};
use glam::Vec2;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

const OBSTACLE_SELECTOR: &str = "h1, h2, p, button";

struct FlockView {
    field: ParticleField,
    surface: CanvasSurface,
    clock: Instant,
}

fn page_metrics(window: &web::Window, document: &web::Document) -> PageMetrics {
    let (w, h) = dom::inner_size(window);
    let doc_h = dom::document_height(document).max(h);
    PageMetrics::new(w as f32, h as f32, doc_h as f32)
}

// The canvas spans the whole document in CSS pixels.
fn fit_canvas(view: &mut FlockView, page: &PageMetrics) {
    if let Ok(vp) = Viewport::new(page.width, page.height, 1.0) {
        view.surface.resize(&vp);
    }
    let canvas = view.surface.canvas();
    let _ = canvas.style().set_property("width", &format!("{}px", page.width));
    let _ = canvas.style().set_property("height", &format!("{}px", page.height));
}

fn refresh_obstacles(document: &web::Document, scroll_y: f64) -> Vec<Obstacle> {
    let Ok(nodes) = document.query_selector_all(OBSTACLE_SELECTOR) else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|n| n.dyn_into::<web::Element>().ok())
        .map(|el| {
            let r = el.get_bounding_client_rect();
            Obstacle::from_rect(
                r.left() as f32,
                (r.top() + scroll_y) as f32,
                r.width() as f32,
                r.height() as f32,
            )
        })
        .collect()
}

fn resize(view: &Rc<RefCell<FlockView>>, reduced_motion: bool) {
    let (Ok(window), Ok(document)) = (dom::window(), dom::window_document()) else {
        return;
    };
    let page = page_metrics(&window, &document);
    let mut v = view.borrow_mut();
    if *v.field.page() == page {
        return;
    }
    v.field.resize(page);
    fit_canvas(&mut v, &page);
    if reduced_motion {
        let FlockView { field, surface, .. } = &mut *v;
        field.draw(surface);
    }
}

pub fn mount(
    canvas: web::HtmlCanvasElement,
    opacity: f32,
    reduced_motion: bool,
    guards: &mut Guards,
) -> anyhow::Result<()> {
    let window = dom::window()?;
    let document = dom::window_document()?;
    let page = page_metrics(&window, &document);

    let mut view = FlockView {
        field: ParticleField::new(page, opacity, dom::js_seed()),
        surface: CanvasSurface::new(canvas)?,
        clock: Instant::now(),
    };
    fit_canvas(&mut view, &page);
    let view = Rc::new(RefCell::new(view));

    if reduced_motion {
        let mut v = view.borrow_mut();
        let FlockView { field, surface, .. } = &mut *v;
        field.tick(0.0);
        field.draw(surface);
    } else {
        let v2 = view.clone();
        let doc = document.clone();
        let win = window.clone();
        guards.push(Box::new(RafLoop::start(move |_| {
            let scroll_y = win.scroll_y().unwrap_or(0.0);
            let mut v = v2.borrow_mut();
            let FlockView { field, surface, clock } = &mut *v;
            field.set_obstacles(refresh_obstacles(&doc, scroll_y));
            field.set_scroll(scroll_y as f32);
            field.tick(clock.elapsed().as_secs_f64() * 1000.0);
            field.draw(surface);
            LoopAction::Schedule
        })));

        let v2 = view.clone();
        let win = window.clone();
        guards.push(Box::new(Listener::new(window.as_ref(), "mousemove", move |ev| {
            let Some(ev) = ev.dyn_ref::<web::MouseEvent>() else {
                return;
            };
            let scroll_y = win.scroll_y().unwrap_or(0.0);
            v2.borrow_mut().field.set_pointer(Some(Vec2::new(
                ev.client_x() as f32,
                (ev.client_y() as f64 + scroll_y) as f32,
            )));
        })?));
    }

    let v2 = view.clone();
    guards.push(Box::new(Listener::new(window.as_ref(), "resize", move |_| {
        resize(&v2, reduced_motion)
    })?));
    if let Some(body) = document.body() {
        // Content growing below the fold changes the document height too.
        let v2 = view.clone();
        let body: web::Element = body.into();
        guards.push(Box::new(ResizeWatch::new(&body, move || resize(&v2, reduced_motion))?));
    }
    log::info!(
        "flock: particle field mounted ({}x{}, opacity {:.2})",
        page.width,
        page.height,
        opacity
    );
    Ok(())
}
