//! Intro → loop ⇄ swap playback as an explicit state machine.
//!
//! The machine never touches media elements. The web layer feeds it
//! [`HeroEvent`]s from `<video>` callbacks and carries out the returned
//! [`HeroCommand`]s.

use super::shuffle::{Cooldown, SwapShuffle};
use super::{HeroPhase, Slot};
use crate::constants::{
    HAVE_FUTURE_DATA, INTRO_FREEZE_BACKOFF_SEC, INTRO_FREEZE_WINDOW_SEC, LOOP_PLAY_RETRIES,
    SWAP_SKIP_CHANCE,
};
use rand::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HeroEvent {
    IntroCanPlay,
    IntroTimeUpdate { current: f64, duration: f64 },
    IntroEnded,
    LoopCanPlay,
    /// The loop clip finished one play. `swap_ready_state` is the swap
    /// element's `readyState`.
    LoopEnded { swap_ready_state: u16 },
    SwapEnded,
    /// A decoded frame of `slot` has been presented.
    FirstFrameDisplayed(Slot),
    /// `play()` on `slot` was rejected.
    PlayRejected(Slot),
}

#[derive(Clone, Debug, PartialEq)]
pub enum HeroCommand {
    Play(Slot),
    Pause(Slot),
    Seek(Slot, f64),
    /// Make `slot` the visible layer.
    Show(Slot),
    /// Report [`HeroEvent::FirstFrameDisplayed`] once `slot` presents a frame.
    AwaitFirstFrame(Slot),
    /// Point the swap element at clip `index` and start buffering it.
    LoadSwapSource(usize),
}

pub struct HeroMachine {
    phase: HeroPhase,
    visible: Slot,
    intro_started: bool,
    intro_finished: bool,
    intro_frozen: bool,
    loop_ready: bool,
    loop_started: bool,
    /// A loop frame has been presented at least once.
    loop_shown: bool,
    loop_retries: u32,
    reload_swap_on_loop_frame: bool,
    loaded_swap: Option<usize>,
    swaps_played: u32,
    current_swap: Option<usize>,
    handoffs: u32,
    shuffle: SwapShuffle,
    rng: StdRng,
}

impl HeroMachine {
    pub fn new(swap_count: usize, cooldown_loops: u32, seed: u64) -> Self {
        Self {
            phase: HeroPhase::Intro,
            visible: Slot::Intro,
            intro_started: false,
            intro_finished: false,
            intro_frozen: false,
            loop_ready: false,
            loop_started: false,
            loop_shown: false,
            loop_retries: 0,
            reload_swap_on_loop_frame: false,
            loaded_swap: None,
            swaps_played: 0,
            current_swap: None,
            handoffs: 0,
            shuffle: SwapShuffle::new(swap_count, cooldown_loops, seed),
            rng: StdRng::seed_from_u64(seed ^ 0x9e37_79b9_7f4a_7c15),
        }
    }

    pub fn phase(&self) -> HeroPhase {
        self.phase
    }

    pub fn visible(&self) -> Slot {
        self.visible
    }

    /// How many times the intro handed over to the loop. Never exceeds 1.
    pub fn handoffs(&self) -> u32 {
        self.handoffs
    }

    pub fn swaps_played(&self) -> u32 {
        self.swaps_played
    }

    pub fn current_swap(&self) -> Option<usize> {
        self.current_swap
    }

    pub fn intro_frozen(&self) -> bool {
        self.intro_frozen
    }

    pub fn shuffle(&self) -> &SwapShuffle {
        &self.shuffle
    }

    /// Commands to issue right after mounting: preload the first swap clip.
    pub fn start(&mut self, out: &mut Vec<HeroCommand>) {
        self.preload_next(out);
    }

    pub fn handle(&mut self, event: HeroEvent, out: &mut Vec<HeroCommand>) {
        match event {
            HeroEvent::IntroCanPlay => {
                if self.intro_started {
                    return;
                }
                self.intro_started = true;
                out.push(HeroCommand::Seek(Slot::Intro, 0.0));
                out.push(HeroCommand::Play(Slot::Intro));
            }
            HeroEvent::IntroTimeUpdate { current, duration } => {
                self.maybe_freeze_intro(current, duration, out);
            }
            HeroEvent::IntroEnded => {
                self.intro_finished = true;
                self.try_start_loop(out);
            }
            HeroEvent::LoopCanPlay => {
                self.loop_ready = true;
                self.try_start_loop(out);
            }
            HeroEvent::LoopEnded { swap_ready_state } => {
                if self.phase == HeroPhase::Loop {
                    self.loop_retries = 0;
                    self.on_loop_ended(swap_ready_state, out);
                }
            }
            HeroEvent::SwapEnded => {
                if self.phase == HeroPhase::Swap {
                    self.return_to_loop(out);
                }
            }
            HeroEvent::FirstFrameDisplayed(slot) => self.on_first_frame(slot, out),
            HeroEvent::PlayRejected(slot) => self.on_play_rejected(slot, out),
        }
    }

    // Hold the intro on its last frame while the loop is still buffering.
    fn maybe_freeze_intro(&mut self, current: f64, duration: f64, out: &mut Vec<HeroCommand>) {
        if self.intro_finished || self.intro_frozen || self.loop_ready {
            return;
        }
        if !duration.is_finite() || duration <= 0.0 {
            return;
        }
        if duration - current > INTRO_FREEZE_WINDOW_SEC {
            return;
        }
        self.intro_frozen = true;
        self.intro_finished = true;
        log::debug!("hero: intro frozen at {:.2}s awaiting loop", duration);
        out.push(HeroCommand::Pause(Slot::Intro));
        out.push(HeroCommand::Seek(
            Slot::Intro,
            (duration - INTRO_FREEZE_BACKOFF_SEC).max(0.0),
        ));
        self.try_start_loop(out);
    }

    fn try_start_loop(&mut self, out: &mut Vec<HeroCommand>) {
        if !self.intro_finished || !self.loop_ready || self.loop_started {
            return;
        }
        self.loop_started = true;
        if self.phase == HeroPhase::Intro {
            self.phase = HeroPhase::Loop;
            self.handoffs += 1;
            log::debug!("hero: intro -> loop");
        }
        self.play_loop_from_start(out);
    }

    fn play_loop_from_start(&mut self, out: &mut Vec<HeroCommand>) {
        out.push(HeroCommand::Seek(Slot::Loop, 0.0));
        out.push(HeroCommand::Play(Slot::Loop));
        out.push(HeroCommand::AwaitFirstFrame(Slot::Loop));
    }

    fn on_loop_ended(&mut self, swap_ready_state: u16, out: &mut Vec<HeroCommand>) {
        match self.shuffle.on_loop() {
            Cooldown::Consumed => {
                self.restart_loop(out);
                return;
            }
            Cooldown::Finished => {
                self.restart_loop(out);
                self.preload_next(out);
                return;
            }
            Cooldown::Inactive => {}
        }

        if self.swaps_played > 0 && self.rng.gen_bool(SWAP_SKIP_CHANCE) {
            log::debug!("hero: skipping swap this loop");
            self.restart_loop(out);
            return;
        }

        let next = self.shuffle.peek();
        let buffered = swap_ready_state >= HAVE_FUTURE_DATA;
        match next {
            Some(id) if buffered && self.loaded_swap == Some(id) => {
                self.shuffle.advance();
                self.phase = HeroPhase::Swap;
                self.current_swap = Some(id);
                self.swaps_played += 1;
                log::debug!("hero: loop -> swap {}", id);
                out.push(HeroCommand::Seek(Slot::Swap, 0.0));
                out.push(HeroCommand::Play(Slot::Swap));
                out.push(HeroCommand::AwaitFirstFrame(Slot::Swap));
            }
            _ => self.restart_loop(out),
        }
    }

    fn restart_loop(&mut self, out: &mut Vec<HeroCommand>) {
        out.push(HeroCommand::Seek(Slot::Loop, 0.0));
        out.push(HeroCommand::Play(Slot::Loop));
    }

    fn return_to_loop(&mut self, out: &mut Vec<HeroCommand>) {
        self.phase = HeroPhase::Loop;
        self.current_swap = None;
        self.reload_swap_on_loop_frame = true;
        log::debug!("hero: swap -> loop");
        self.play_loop_from_start(out);
    }

    fn on_first_frame(&mut self, slot: Slot, out: &mut Vec<HeroCommand>) {
        let expected = match self.phase {
            HeroPhase::Intro => Slot::Intro,
            HeroPhase::Loop => Slot::Loop,
            HeroPhase::Swap => Slot::Swap,
        };
        if slot != expected {
            return;
        }
        if self.visible != slot {
            self.visible = slot;
            out.push(HeroCommand::Show(slot));
        }
        if slot == Slot::Loop {
            self.loop_shown = true;
            self.loop_retries = 0;
        }
        if slot == Slot::Loop && self.reload_swap_on_loop_frame {
            self.reload_swap_on_loop_frame = false;
            self.preload_next(out);
        }
    }

    fn on_play_rejected(&mut self, slot: Slot, out: &mut Vec<HeroCommand>) {
        log::warn!("hero: play() rejected for {:?}", slot);
        match slot {
            Slot::Intro => {
                // Without an intro, go straight to the loop when it is ready.
                self.intro_finished = true;
                self.try_start_loop(out);
            }
            Slot::Loop => self.on_loop_rejected(out),
            Slot::Swap => {
                if self.phase == HeroPhase::Swap {
                    self.return_to_loop(out);
                }
            }
        }
    }

    fn on_loop_rejected(&mut self, out: &mut Vec<HeroCommand>) {
        if !self.loop_shown {
            // First handoff: the next readiness signal retries.
            self.loop_started = false;
            return;
        }
        if self.phase != HeroPhase::Loop {
            return;
        }
        if self.loop_retries >= LOOP_PLAY_RETRIES {
            log::error!("hero: loop rejected {} times, giving up", self.loop_retries);
            return;
        }
        self.loop_retries += 1;
        self.restart_loop(out);
    }

    fn preload_next(&mut self, out: &mut Vec<HeroCommand>) {
        if let Some(id) = self.shuffle.peek() {
            if self.loaded_swap != Some(id) {
                self.loaded_swap = Some(id);
                out.push(HeroCommand::LoadSwapSource(id));
            }
        }
    }
}
