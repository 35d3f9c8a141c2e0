//! requestAnimationFrame and ResizeObserver plumbing with drop-based cleanup.

use crate::dom::js_err;
use backdrop_core::LoopAction;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

struct RafInner {
    id: Cell<Option<i32>>,
    tick: RefCell<Option<Closure<dyn FnMut(f64)>>>,
}

impl RafInner {
    fn request(&self) {
        let Some(w) = web::window() else { return };
        if let Some(cb) = self.tick.borrow().as_ref() {
            self.id
                .set(w.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
        }
    }

    fn cancel(&self) {
        if let (Some(id), Some(w)) = (self.id.take(), web::window()) {
            let _ = w.cancel_animation_frame(id);
        }
    }
}

/// A running animation-frame loop. Cancelled when dropped.
pub struct RafLoop {
    inner: Rc<RafInner>,
}

impl RafLoop {
    /// Call `tick` with the frame timestamp (ms) until it returns
    /// [`LoopAction::Stop`] or the handle is dropped.
    pub fn start(mut tick: impl FnMut(f64) -> LoopAction + 'static) -> Self {
        let inner = Rc::new(RafInner {
            id: Cell::new(None),
            tick: RefCell::new(None),
        });
        let weak: Weak<RafInner> = Rc::downgrade(&inner);
        *inner.tick.borrow_mut() = Some(Closure::wrap(Box::new(move |now: f64| {
            let Some(inner) = weak.upgrade() else { return };
            inner.id.set(None);
            if tick(now) == LoopAction::Schedule {
                inner.request();
            }
        }) as Box<dyn FnMut(f64)>));
        inner.request();
        Self { inner }
    }
}

impl Drop for RafLoop {
    fn drop(&mut self) {
        self.inner.cancel();
        // Break the closure's hold on the loop state.
        self.inner.tick.borrow_mut().take();
    }
}

/// ResizeObserver on one element, disconnected when dropped.
pub struct ResizeWatch {
    observer: web::ResizeObserver,
    _callback: Closure<dyn FnMut(js_sys::Array)>,
}

impl ResizeWatch {
    pub fn new(target: &web::Element, mut on_resize: impl FnMut() + 'static) -> anyhow::Result<Self> {
        let callback = Closure::wrap(Box::new(move |_entries: js_sys::Array| {
            on_resize();
        }) as Box<dyn FnMut(js_sys::Array)>);
        let observer =
            web::ResizeObserver::new(callback.as_ref().unchecked_ref()).map_err(js_err)?;
        observer.observe(target);
        Ok(Self {
            observer,
            _callback: callback,
        })
    }
}

impl Drop for ResizeWatch {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}
