//! Headline text pulled toward the viewport center, one glyph at a time.
//!
//! The element's text is split into `span[data-wh-char]` glyphs. Each run
//! writes per-glyph offsets as CSS custom properties and toggles
//! `wormhole-warp--active` for [`WORMHOLE_ACTIVE_SEC`]; the stylesheet owns
//! the actual animation.

use crate::dom::{self, create, js_err, Listener, Timeout};
use crate::frame::RafLoop;
use backdrop_core::hero::wormhole::{
    char_shifts, container_shift, CharBox, WormholeRun, WORMHOLE_ACTIVE_SEC, WORMHOLE_VARIANT_COUNT,
};
use backdrop_core::{Capabilities, LoopAction};
use glam::Vec2;
use rand::SeedableRng;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::JsCast;
use web_sys as web;

const BASE_CLASS: &str = "wormhole-warp";
const ACTIVE_CLASS: &str = "wormhole-warp--active";
const INTERACTIVE_CLASS: &str = "wormhole-warp--interactive";

fn variant_class(variant: usize) -> String {
    format!("{BASE_CLASS}--v{variant}")
}

struct WormholeText {
    element: web::HtmlElement,
    original_text: String,
    glyphs: Vec<web::HtmlElement>,
    run: WormholeRun,
    activate: Option<RafLoop>,
    deactivate: Option<Timeout>,
}

impl WormholeText {
    fn apply(&self) {
        let Ok(window) = dom::window() else { return };
        let (vw, vh) = dom::inner_size(&window);
        let viewport = Vec2::new(vw as f32, vh as f32);
        let rect = self.element.get_bounding_client_rect();
        let style = self.element.style();

        let origin = viewport / 2.0 - Vec2::new(rect.left() as f32, rect.top() as f32);
        let _ = style.set_property("--wh-ox", &format!("{:.2}px", origin.x));
        let _ = style.set_property("--wh-oy", &format!("{:.2}px", origin.y));

        let element_center = Vec2::new(
            (rect.left() + rect.width() / 2.0) as f32,
            (rect.top() + rect.height() / 2.0) as f32,
        );
        let shift = container_shift(viewport / 2.0 - element_center);
        let _ = style.set_property("--wh-tx", &format!("{:.2}px", shift.x));
        let _ = style.set_property("--wh-ty", &format!("{:.2}px", shift.y));

        if self.glyphs.is_empty() {
            return;
        }
        let boxes: Vec<CharBox> = self
            .glyphs
            .iter()
            .map(|g| {
                let r = g.get_bounding_client_rect();
                CharBox {
                    center: Vec2::new(
                        (r.left() + r.width() / 2.0) as f32,
                        (r.top() + r.height() / 2.0) as f32,
                    ),
                    height: r.height() as f32,
                }
            })
            .collect();
        for (glyph, s) in self.glyphs.iter().zip(char_shifts(&boxes, viewport, self.run)) {
            let gs = glyph.style();
            let _ = gs.set_property("--wh-cx", &format!("{:.2}px", s.offset.x));
            let _ = gs.set_property("--wh-cy", &format!("{:.2}px", s.offset.y));
            let _ = gs.set_property("--wh-cs", &format!("{:.3}", s.shrink));
        }
    }

    fn start_run(&mut self) {
        self.apply();
        let classes = self.element.class_list();
        for v in 0..WORMHOLE_VARIANT_COUNT {
            let _ = classes.remove_1(&variant_class(v));
        }
        let _ = classes.add_1(&variant_class(self.run.variant));
        let _ = classes.remove_1(ACTIVE_CLASS);

        // Re-adding on the next frame restarts the CSS animation.
        let el = self.element.clone();
        self.activate = Some(RafLoop::start(move |_| {
            let _ = el.class_list().add_1(ACTIVE_CLASS);
            LoopAction::Stop
        }));
        let el = self.element.clone();
        self.deactivate = Timeout::new((WORMHOLE_ACTIVE_SEC * 1000.0) as i32, move || {
            let _ = el.class_list().remove_1(ACTIVE_CLASS);
        })
        .map_err(|e| log::warn!("wormhole: no deactivate timer: {:?}", e))
        .ok();
    }
}

fn split_glyphs(
    document: &web::Document,
    element: &web::HtmlElement,
    text: &str,
) -> anyhow::Result<Vec<web::HtmlElement>> {
    element.set_text_content(None);
    let mut glyphs = Vec::with_capacity(text.len());
    for ch in text.chars() {
        if ch == '\n' {
            let br: web::Element = document.create_element("br").map_err(js_err)?;
            element.append_child(&br).map_err(js_err)?;
            continue;
        }
        let span: web::HtmlElement = create(document, "span")?;
        span.set_class_name("wormhole-char");
        let _ = span.set_attribute("data-wh-char", "");
        let shown = if ch == ' ' { '\u{a0}' } else { ch };
        let mut buf = [0u8; 4];
        span.set_text_content(Some(&*shown.encode_utf8(&mut buf)));
        element.append_child(&span).map_err(js_err)?;
        glyphs.push(span);
    }
    Ok(glyphs)
}

/// A mounted wormhole headline. Dropping it restores the plain text.
pub struct Wormhole {
    text: Rc<RefCell<WormholeText>>,
    interactive: bool,
    reduced_motion: bool,
    _listeners: Vec<Listener>,
}

fn trigger_next(text: &Weak<RefCell<WormholeText>>) {
    let Some(text) = text.upgrade() else { return };
    let mut t = text.borrow_mut();
    t.run = t.run.next();
    log::debug!("wormhole: run {} variant {}", t.run.run_id, t.run.variant);
    t.start_run();
}

impl Wormhole {
    pub fn mount(element: web::HtmlElement, interactive: bool, caps: Capabilities) -> anyhow::Result<Self> {
        let document = dom::window_document()?;
        let original_text = element.text_content().unwrap_or_default();
        let classes = element.class_list();
        classes.add_1(BASE_CLASS).map_err(js_err)?;

        let mut rng = rand::rngs::StdRng::seed_from_u64(dom::js_seed());
        let run = WormholeRun::first(&mut rng);
        let glyphs = if caps.reduced_motion {
            Vec::new()
        } else {
            split_glyphs(&document, &element, &original_text)?
        };
        let text = Rc::new(RefCell::new(WormholeText {
            element: element.clone(),
            original_text,
            glyphs,
            run,
            activate: None,
            deactivate: None,
        }));

        let mut listeners = Vec::new();
        if !caps.reduced_motion {
            text.borrow_mut().start_run();

            let weak = Rc::downgrade(&text);
            let window = dom::window()?;
            listeners.push(Listener::new(window.as_ref(), "resize", move |_| {
                if let Some(t) = weak.upgrade() {
                    t.borrow().apply();
                }
            })?);

            if interactive {
                let _ = classes.add_1(INTERACTIVE_CLASS);
                element.set_tab_index(0);
                let _ = element.set_attribute("role", "button");
                let weak = Rc::downgrade(&text);
                listeners.push(Listener::new(element.as_ref(), "click", move |_| {
                    trigger_next(&weak)
                })?);
                let weak = Rc::downgrade(&text);
                listeners.push(Listener::new(element.as_ref(), "keydown", move |ev| {
                    let Some(key) = ev.dyn_ref::<web::KeyboardEvent>().map(|k| k.key()) else {
                        return;
                    };
                    if key == "Enter" || key == " " {
                        ev.prevent_default();
                        trigger_next(&weak);
                    }
                })?);
            }
        }
        log::debug!("wormhole: mounted (interactive={})", interactive);
        Ok(Self {
            text,
            interactive,
            reduced_motion: caps.reduced_motion,
            _listeners: listeners,
        })
    }

    /// Advance to the next variant. Ignored under reduced motion.
    pub fn next(&self) {
        if self.reduced_motion {
            return;
        }
        trigger_next(&Rc::downgrade(&self.text));
    }
}

impl Drop for Wormhole {
    fn drop(&mut self) {
        let mut t = self.text.borrow_mut();
        t.activate = None;
        t.deactivate = None;
        let classes = t.element.class_list();
        for v in 0..WORMHOLE_VARIANT_COUNT {
            let _ = classes.remove_1(&variant_class(v));
        }
        let _ = classes.remove_1(ACTIVE_CLASS);
        let _ = classes.remove_1(BASE_CLASS);
        if self.interactive {
            let _ = classes.remove_1(INTERACTIVE_CLASS);
            let _ = t.element.remove_attribute("role");
            let _ = t.element.remove_attribute("tabindex");
        }
        if !t.glyphs.is_empty() {
            t.glyphs.clear();
            t.element.set_text_content(Some(&t.original_text));
        }
    }
}
