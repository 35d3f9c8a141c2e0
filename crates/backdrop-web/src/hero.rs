//! Drives three stacked `<video>` elements from a [`HeroMachine`].
//!
//! Media callbacks are turned into [`HeroEvent`]s and queued; the queue is
//! drained in order so commands that answer synchronously (first frame
//! without `requestVideoFrameCallback`) never re-enter the machine.

use crate::dom::{self, create, js_err, overlay_style, set_style, ElementGuard, Listener};
use crate::frame::RafLoop;
use crate::Guards;
use backdrop_core::constants::HERO_WARP_PROPERTY;
use backdrop_core::hero::{HeroCommand, HeroEvent, HeroMachine, HeroMediaConfig, VideoSource};
use backdrop_core::hero::{HeroPhase, Slot};
use backdrop_core::{Capabilities, LoopAction};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

struct HeroDriver {
    machine: HeroMachine,
    videos: [web::HtmlVideoElement; 3],
    config: HeroMediaConfig,
    caps: Capabilities,
    queue: VecDeque<HeroEvent>,
    draining: bool,
    disposed: bool,
}

type SharedHero = Rc<RefCell<HeroDriver>>;

impl HeroDriver {
    fn video(&self, slot: Slot) -> &web::HtmlVideoElement {
        &self.videos[slot.index()]
    }
}

fn post(hero: &SharedHero, event: HeroEvent) {
    {
        let mut h = hero.borrow_mut();
        if h.disposed {
            return;
        }
        h.queue.push_back(event);
        if h.draining {
            return;
        }
        h.draining = true;
    }
    loop {
        let commands = {
            let mut h = hero.borrow_mut();
            let Some(event) = h.queue.pop_front() else {
                h.draining = false;
                break;
            };
            let mut out = Vec::new();
            h.machine.handle(event, &mut out);
            out
        };
        for cmd in commands {
            execute(hero, cmd);
        }
    }
}

fn post_weak(hero: &Weak<RefCell<HeroDriver>>, event: HeroEvent) {
    if let Some(hero) = hero.upgrade() {
        post(&hero, event);
    }
}

fn execute(hero: &SharedHero, cmd: HeroCommand) {
    let (video, caps) = {
        let h = hero.borrow();
        let slot = match &cmd {
            HeroCommand::Play(s)
            | HeroCommand::Pause(s)
            | HeroCommand::Seek(s, _)
            | HeroCommand::Show(s)
            | HeroCommand::AwaitFirstFrame(s) => *s,
            HeroCommand::LoadSwapSource(_) => Slot::Swap,
        };
        (h.video(slot).clone(), h.caps)
    };
    match cmd {
        HeroCommand::Play(slot) => play(hero, &video, slot),
        HeroCommand::Pause(_) => {
            let _ = video.pause();
        }
        HeroCommand::Seek(_, t) => video.set_current_time(t),
        HeroCommand::Show(slot) => show(hero, slot),
        HeroCommand::AwaitFirstFrame(slot) => {
            if !caps.video_frame_callback || !request_video_frame(hero, &video, slot) {
                post(hero, HeroEvent::FirstFrameDisplayed(slot));
            }
        }
        HeroCommand::LoadSwapSource(index) => {
            let sources = hero.borrow().config.swaps.get(index).map(|s| s.sources.clone());
            match sources {
                Some(sources) => {
                    if let Err(e) = replace_sources(&video, &sources) {
                        log::warn!("hero: could not load swap {}: {:?}", index, e);
                    }
                }
                None => log::warn!("hero: swap index {} out of range", index),
            }
        }
    }
}

fn play(hero: &SharedHero, video: &web::HtmlVideoElement, slot: Slot) {
    let weak = Rc::downgrade(hero);
    match video.play() {
        Ok(promise) => spawn_local(async move {
            if JsFuture::from(promise).await.is_err() {
                post_weak(&weak, HeroEvent::PlayRejected(slot));
            }
        }),
        Err(_) => post(hero, HeroEvent::PlayRejected(slot)),
    }
}

fn show(hero: &SharedHero, slot: Slot) {
    let h = hero.borrow();
    for s in Slot::ALL {
        let opacity = if s == slot { "1" } else { "0" };
        set_style(h.video(s), &[("opacity", opacity)]);
    }
}

// Returns false when the browser lacks the callback after all.
fn request_video_frame(hero: &SharedHero, video: &web::HtmlVideoElement, slot: Slot) -> bool {
    let Ok(func) = js_sys::Reflect::get(video, &JsValue::from_str("requestVideoFrameCallback"))
    else {
        return false;
    };
    let Some(func) = func.dyn_ref::<js_sys::Function>() else {
        return false;
    };
    let weak = Rc::downgrade(hero);
    let callback = Closure::once_into_js(move |_now: JsValue, _meta: JsValue| {
        post_weak(&weak, HeroEvent::FirstFrameDisplayed(slot));
    });
    func.call1(video, &callback).is_ok()
}

fn append_sources(
    document: &web::Document,
    video: &web::HtmlVideoElement,
    sources: &[VideoSource],
) -> anyhow::Result<()> {
    for s in sources {
        let el: web::HtmlSourceElement = create(document, "source")?;
        el.set_src(&s.src);
        el.set_type(&s.mime);
        video.append_child(&el).map_err(js_err)?;
    }
    Ok(())
}

fn replace_sources(video: &web::HtmlVideoElement, sources: &[VideoSource]) -> anyhow::Result<()> {
    let document = video
        .owner_document()
        .ok_or_else(|| anyhow::anyhow!("video is detached"))?;
    while let Some(child) = video.first_child() {
        video.remove_child(&child).map_err(js_err)?;
    }
    append_sources(&document, video, sources)?;
    video.load();
    Ok(())
}

fn create_video(
    document: &web::Document,
    host: &web::HtmlElement,
    slot: Slot,
    config: &HeroMediaConfig,
) -> anyhow::Result<web::HtmlVideoElement> {
    let video: web::HtmlVideoElement = create(document, "video")?;
    overlay_style(&video);
    set_style(&video, &[("object-fit", "cover"), ("opacity", "0")]);
    video.set_muted(true);
    video.set_default_muted(true);
    video.set_preload("auto");
    video.set_poster(&config.poster);
    let _ = video.set_attribute("playsinline", "");
    let _ = video.set_attribute("aria-hidden", "true");
    let _ = video.set_attribute("data-hero-slot", &format!("{:?}", slot).to_lowercase());
    match slot {
        Slot::Intro => append_sources(document, &video, &config.intro)?,
        // Swaps restart the loop by hand; native looping would swallow `ended`.
        Slot::Loop => {
            video.set_loop(config.swaps.is_empty());
            append_sources(document, &video, &config.loop_)?;
        }
        Slot::Swap => {}
    }
    host.append_child(&video).map_err(js_err)?;
    Ok(video)
}

/// Pauses the videos and stops the queue; the elements themselves go with
/// their [`ElementGuard`]s.
struct HeroGuard(SharedHero);

impl Drop for HeroGuard {
    fn drop(&mut self) {
        let mut h = self.0.borrow_mut();
        h.disposed = true;
        h.queue.clear();
        for v in &h.videos {
            let _ = v.pause();
        }
    }
}

fn listen(
    hero: &SharedHero,
    slot: Slot,
    kind: &'static str,
    to_event: impl Fn(&HeroDriver) -> HeroEvent + 'static,
) -> anyhow::Result<Listener> {
    let video = hero.borrow().video(slot).clone();
    let weak = Rc::downgrade(hero);
    Listener::new(video.as_ref(), kind, move |_| {
        let Some(hero) = weak.upgrade() else { return };
        let event = to_event(&hero.borrow());
        post(&hero, event);
    })
}

pub fn mount(
    host: &web::HtmlElement,
    config: HeroMediaConfig,
    caps: Capabilities,
    guards: &mut Guards,
) -> anyhow::Result<()> {
    let document = dom::window_document()?;
    let mut videos = Vec::with_capacity(3);
    for slot in Slot::ALL {
        let v = create_video(&document, host, slot, &config)?;
        guards.push(Box::new(ElementGuard(v.clone().into())));
        videos.push(v);
    }
    let videos: [web::HtmlVideoElement; 3] = videos
        .try_into()
        .map_err(|_| anyhow::anyhow!("expected three hero videos"))?;

    let hero = Rc::new(RefCell::new(HeroDriver {
        machine: HeroMachine::new(config.swaps.len(), config.cooldown_loops, dom::js_seed()),
        videos,
        config,
        caps,
        queue: VecDeque::new(),
        draining: false,
        disposed: false,
    }));

    guards.push(Box::new(listen(&hero, Slot::Intro, "canplay", |h| {
        // The intro fades in once it can play.
        if h.machine.visible() == Slot::Intro {
            set_style(h.video(Slot::Intro), &[("opacity", "1")]);
        }
        HeroEvent::IntroCanPlay
    })?));
    guards.push(Box::new(listen(&hero, Slot::Intro, "timeupdate", |h| {
        let v = h.video(Slot::Intro);
        HeroEvent::IntroTimeUpdate {
            current: v.current_time(),
            duration: v.duration(),
        }
    })?));
    guards.push(Box::new(listen(&hero, Slot::Intro, "ended", |_| {
        HeroEvent::IntroEnded
    })?));
    guards.push(Box::new(listen(&hero, Slot::Loop, "canplay", |_| {
        HeroEvent::LoopCanPlay
    })?));
    guards.push(Box::new(listen(&hero, Slot::Loop, "ended", |h| {
        HeroEvent::LoopEnded {
            swap_ready_state: h.video(Slot::Swap).ready_state(),
        }
    })?));
    guards.push(Box::new(listen(&hero, Slot::Swap, "ended", |_| {
        HeroEvent::SwapEnded
    })?));

    if caps.reduced_motion {
        set_warp(&WarpWriter::locate(&hero.borrow().config), "0.000", "0.00");
    } else {
        guards.push(Box::new(warp_loop(&hero)?));
    }

    let start = {
        let mut out = Vec::new();
        hero.borrow_mut().machine.start(&mut out);
        out
    };
    for cmd in start {
        execute(&hero, cmd);
    }
    log::info!(
        "hero: mounted with {} swap clip(s)",
        hero.borrow().config.swaps.len()
    );
    guards.push(Box::new(HeroGuard(hero)));
    Ok(())
}

struct WarpWriter {
    root: Option<web::HtmlElement>,
    maps: Vec<web::Element>,
}

impl WarpWriter {
    fn locate(config: &HeroMediaConfig) -> Self {
        let document = dom::window_document().ok();
        let root = document
            .as_ref()
            .and_then(|d| d.document_element())
            .and_then(|e| e.dyn_into::<web::HtmlElement>().ok());
        let maps = document
            .map(|d| {
                config
                    .displacement_ids
                    .iter()
                    .filter_map(|id| d.get_element_by_id(id))
                    .collect()
            })
            .unwrap_or_default();
        Self { root, maps }
    }
}

fn set_warp(writer: &WarpWriter, css_value: &str, scale: &str) {
    if let Some(root) = &writer.root {
        let _ = root.style().set_property(HERO_WARP_PROPERTY, css_value);
    }
    for map in &writer.maps {
        let _ = map.set_attribute("scale", scale);
    }
}

// Samples the warp curve for whichever clip is on screen each frame.
fn warp_loop(hero: &SharedHero) -> anyhow::Result<RafLoop> {
    let writer = WarpWriter::locate(&hero.borrow().config);
    if writer.root.is_none() {
        anyhow::bail!("no document element for {}", HERO_WARP_PROPERTY);
    }
    let weak = Rc::downgrade(hero);
    let mut last = String::new();
    Ok(RafLoop::start(move |_now| {
        let Some(hero) = weak.upgrade() else {
            return LoopAction::Stop;
        };
        let h = hero.borrow();
        let phase = h.machine.phase();
        let slot = match phase {
            HeroPhase::Intro => Slot::Intro,
            HeroPhase::Loop => Slot::Loop,
            HeroPhase::Swap => Slot::Swap,
        };
        let v = h.video(slot);
        let sample = h.config.warp.sample(phase, v.current_time(), v.duration());
        let value = sample.css_value();
        if value != last {
            set_warp(&writer, &value, &sample.scale_attr());
            last = value;
        }
        LoopAction::Schedule
    }))
}
