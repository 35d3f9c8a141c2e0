// Host-side tests for the hero player: intro/loop handoff, swap insertion,
// shuffle order, the warp envelope and the media descriptor.

use backdrop_core::hero::*;

/// Feed `event`, then answer every `AwaitFirstFrame` with the matching
/// frame callback, the way the web layer does.
fn send(m: &mut HeroMachine, event: HeroEvent) -> Vec<HeroCommand> {
    let mut out = Vec::new();
    m.handle(event, &mut out);
    let mut i = 0;
    while i < out.len() {
        if let HeroCommand::AwaitFirstFrame(slot) = out[i] {
            let mut more = Vec::new();
            m.handle(HeroEvent::FirstFrameDisplayed(slot), &mut more);
            out.extend(more);
        }
        i += 1;
    }
    out
}

fn started(swaps: usize, seed: u64) -> HeroMachine {
    let mut m = HeroMachine::new(swaps, 2, seed);
    let mut out = Vec::new();
    m.start(&mut out);
    send(&mut m, HeroEvent::IntroCanPlay);
    send(&mut m, HeroEvent::LoopCanPlay);
    send(&mut m, HeroEvent::IntroEnded);
    m
}

#[test]
fn start_preloads_first_swap() {
    let mut m = HeroMachine::new(4, 2, 1);
    let mut out = Vec::new();
    m.start(&mut out);
    assert_eq!(out.len(), 1);
    assert!(matches!(out[0], HeroCommand::LoadSwapSource(id) if id < 4));
    assert_eq!(m.phase(), HeroPhase::Intro);
    assert_eq!(m.visible(), Slot::Intro);
}

#[test]
fn intro_plays_from_start_once() {
    let mut m = HeroMachine::new(0, 2, 1);
    let out = send(&mut m, HeroEvent::IntroCanPlay);
    assert_eq!(
        out,
        vec![HeroCommand::Seek(Slot::Intro, 0.0), HeroCommand::Play(Slot::Intro)]
    );
    assert!(send(&mut m, HeroEvent::IntroCanPlay).is_empty());
}

#[test]
fn handoff_happens_exactly_once() {
    let mut m = HeroMachine::new(0, 2, 1);
    send(&mut m, HeroEvent::IntroCanPlay);
    assert!(send(&mut m, HeroEvent::LoopCanPlay).is_empty(), "intro still running");

    let out = send(&mut m, HeroEvent::IntroEnded);
    assert!(out.contains(&HeroCommand::Play(Slot::Loop)));
    assert!(out.contains(&HeroCommand::Show(Slot::Loop)));
    assert_eq!(m.phase(), HeroPhase::Loop);
    assert_eq!(m.handoffs(), 1);

    send(&mut m, HeroEvent::IntroEnded);
    send(&mut m, HeroEvent::LoopCanPlay);
    send(&mut m, HeroEvent::IntroTimeUpdate {
        current: 9.99,
        duration: 10.0,
    });
    assert_eq!(m.handoffs(), 1);
}

#[test]
fn loop_becoming_ready_after_intro_still_hands_off() {
    let mut m = HeroMachine::new(0, 2, 1);
    send(&mut m, HeroEvent::IntroCanPlay);
    send(&mut m, HeroEvent::IntroEnded);
    assert_eq!(m.phase(), HeroPhase::Intro);
    let out = send(&mut m, HeroEvent::LoopCanPlay);
    assert!(out.contains(&HeroCommand::Seek(Slot::Loop, 0.0)));
    assert_eq!(m.phase(), HeroPhase::Loop);
    assert_eq!(m.visible(), Slot::Loop);
}

#[test]
fn intro_freezes_on_last_frame_while_loop_buffers() {
    let mut m = HeroMachine::new(0, 2, 1);
    send(&mut m, HeroEvent::IntroCanPlay);
    let early = send(&mut m, HeroEvent::IntroTimeUpdate {
        current: 5.0,
        duration: 10.0,
    });
    assert!(early.is_empty());

    let out = send(&mut m, HeroEvent::IntroTimeUpdate {
        current: 9.93,
        duration: 10.0,
    });
    assert_eq!(out[0], HeroCommand::Pause(Slot::Intro));
    match out[1] {
        HeroCommand::Seek(Slot::Intro, t) => assert!((t - 9.96).abs() < 1e-9),
        ref other => panic!("expected seek, got {other:?}"),
    }
    assert!(m.intro_frozen());
    assert_eq!(m.visible(), Slot::Intro, "frozen frame stays visible");

    send(&mut m, HeroEvent::LoopCanPlay);
    assert_eq!(m.phase(), HeroPhase::Loop);
    assert_eq!(m.handoffs(), 1);
}

#[test]
fn no_freeze_when_loop_is_ready() {
    let mut m = HeroMachine::new(0, 2, 1);
    send(&mut m, HeroEvent::IntroCanPlay);
    send(&mut m, HeroEvent::LoopCanPlay);
    send(&mut m, HeroEvent::IntroTimeUpdate {
        current: 9.95,
        duration: 10.0,
    });
    assert!(!m.intro_frozen());
    assert_eq!(m.phase(), HeroPhase::Intro);
}

#[test]
fn rejected_intro_goes_straight_to_loop() {
    let mut m = HeroMachine::new(0, 2, 1);
    send(&mut m, HeroEvent::IntroCanPlay);
    send(&mut m, HeroEvent::LoopCanPlay);
    send(&mut m, HeroEvent::PlayRejected(Slot::Intro));
    assert_eq!(m.phase(), HeroPhase::Loop);
    assert_eq!(m.handoffs(), 1);
}

#[test]
fn swap_plays_when_buffered_and_returns_to_loop() {
    let mut m = started(4, 3);
    let out = send(&mut m, HeroEvent::LoopEnded { swap_ready_state: 4 });
    assert!(out.contains(&HeroCommand::Play(Slot::Swap)));
    assert!(out.contains(&HeroCommand::Show(Slot::Swap)));
    assert_eq!(m.phase(), HeroPhase::Swap);
    assert_eq!(m.swaps_played(), 1);
    let played = m.current_swap().expect("swap id");

    let back = send(&mut m, HeroEvent::SwapEnded);
    assert_eq!(m.phase(), HeroPhase::Loop);
    assert!(back.contains(&HeroCommand::Show(Slot::Loop)));
    let next = back.iter().find_map(|c| match c {
        HeroCommand::LoadSwapSource(id) => Some(*id),
        _ => None,
    });
    assert!(matches!(next, Some(id) if id != played), "next clip preloaded after return");
}

#[test]
fn unbuffered_swap_restarts_loop() {
    let mut m = started(4, 3);
    let out = send(&mut m, HeroEvent::LoopEnded { swap_ready_state: 2 });
    assert_eq!(
        out,
        vec![HeroCommand::Seek(Slot::Loop, 0.0), HeroCommand::Play(Slot::Loop)]
    );
    assert_eq!(m.phase(), HeroPhase::Loop);
    assert_eq!(m.swaps_played(), 0);
}

#[test]
fn no_swaps_means_plain_looping() {
    let mut m = started(0, 3);
    for _ in 0..10 {
        send(&mut m, HeroEvent::LoopEnded { swap_ready_state: 4 });
        assert_eq!(m.phase(), HeroPhase::Loop);
    }
}

#[test]
fn rejected_swap_falls_back_to_loop() {
    let mut m = started(4, 3);
    send(&mut m, HeroEvent::LoopEnded { swap_ready_state: 4 });
    assert_eq!(m.phase(), HeroPhase::Swap);
    send(&mut m, HeroEvent::PlayRejected(Slot::Swap));
    assert_eq!(m.phase(), HeroPhase::Loop);
    assert_eq!(m.visible(), Slot::Loop);
}

#[test]
fn rejected_loop_restart_is_retried_a_bounded_number_of_times() {
    let mut m = started(0, 3);
    send(&mut m, HeroEvent::LoopEnded { swap_ready_state: 4 });
    let restart = vec![HeroCommand::Seek(Slot::Loop, 0.0), HeroCommand::Play(Slot::Loop)];
    for _ in 0..backdrop_core::constants::LOOP_PLAY_RETRIES {
        assert_eq!(send(&mut m, HeroEvent::PlayRejected(Slot::Loop)), restart);
    }
    assert!(send(&mut m, HeroEvent::PlayRejected(Slot::Loop)).is_empty());
    assert_eq!(m.phase(), HeroPhase::Loop);

    // A completed play resets the budget.
    send(&mut m, HeroEvent::LoopEnded { swap_ready_state: 4 });
    assert_eq!(send(&mut m, HeroEvent::PlayRejected(Slot::Loop)), restart);
}

#[test]
fn rejected_first_loop_play_waits_for_readiness() {
    let mut m = HeroMachine::new(0, 2, 1);
    send(&mut m, HeroEvent::IntroCanPlay);
    send(&mut m, HeroEvent::IntroEnded);
    let mut out = Vec::new();
    m.handle(HeroEvent::LoopCanPlay, &mut out);
    assert!(out.contains(&HeroCommand::Play(Slot::Loop)));
    assert!(send(&mut m, HeroEvent::PlayRejected(Slot::Loop)).is_empty());
    let retry = send(&mut m, HeroEvent::LoopCanPlay);
    assert!(retry.contains(&HeroCommand::Play(Slot::Loop)));
    assert_eq!(m.handoffs(), 1);
}

#[test]
fn stale_frame_callbacks_are_ignored() {
    let mut m = started(4, 3);
    let out = send(&mut m, HeroEvent::FirstFrameDisplayed(Slot::Swap));
    assert!(out.is_empty());
    assert_eq!(m.visible(), Slot::Loop);
}

#[test]
fn long_run_respects_cycles_and_cooldown() {
    let mut m = started(4, 11);
    let mut played = Vec::new();
    let mut loops_before = Vec::new();
    let mut loops = 0;

    for _ in 0..400 {
        match m.phase() {
            HeroPhase::Loop => {
                loops += 1;
                send(&mut m, HeroEvent::LoopEnded { swap_ready_state: 4 });
                if m.phase() == HeroPhase::Swap {
                    played.push(m.current_swap().unwrap());
                    loops_before.push(loops);
                    loops = 0;
                }
            }
            HeroPhase::Swap => {
                send(&mut m, HeroEvent::SwapEnded);
            }
            HeroPhase::Intro => unreachable!(),
        }
    }

    assert!(played.len() >= 12, "only {} swaps", played.len());
    for cycle in played.chunks_exact(4) {
        let mut sorted = cycle.to_vec();
        sorted.sort();
        assert_eq!(sorted, [0, 1, 2, 3], "each clip once per cycle: {cycle:?}");
    }
    for pair in played.windows(2) {
        assert_ne!(pair[0], pair[1], "no back-to-back repeat");
    }
    for (k, n) in loops_before.iter().enumerate() {
        if k > 0 && k % 4 == 0 {
            assert!(*n >= 3, "swap {k} came after only {n} loops");
        }
    }
    assert_eq!(m.handoffs(), 1);
}

#[test]
fn shuffle_visits_each_clip_once_then_cools_down() {
    let mut s = SwapShuffle::new(4, 2, 5);
    let mut seen: Vec<usize> = (0..4).filter_map(|_| s.advance()).collect();
    let last = *seen.last().unwrap();
    seen.sort();
    assert_eq!(seen, [0, 1, 2, 3]);

    assert!(s.cooling_down());
    assert_eq!(s.peek(), None);
    assert_eq!(s.advance(), None);
    assert_eq!(s.on_loop(), Cooldown::Consumed);
    assert_eq!(s.on_loop(), Cooldown::Finished);
    assert_eq!(s.on_loop(), Cooldown::Inactive);
    assert_eq!(s.cycles(), 2);
    assert_ne!(s.peek(), Some(last));
}

#[test]
fn shuffle_never_repeats_across_reshuffle() {
    for seed in 0..64 {
        let mut s = SwapShuffle::new(3, 0, seed);
        let mut prev = None;
        for _ in 0..30 {
            let id = s.advance().expect("no cooldown");
            assert_ne!(Some(id), prev, "seed {seed}");
            prev = Some(id);
        }
    }
}

#[test]
fn shuffle_edge_sizes() {
    let mut empty = SwapShuffle::new(0, 2, 1);
    assert!(empty.is_empty());
    assert_eq!(empty.advance(), None);

    let mut single = SwapShuffle::new(1, 0, 1);
    assert_eq!(single.advance(), Some(0));
    assert_eq!(single.advance(), Some(0));
}

#[test]
fn warp_window_ramps_and_resolves_from_end() {
    let w = WarpWindow::new(-1.0, -0.0, 0.5, 0.0, 0.8);
    assert_eq!(w.sample(5.0, 10.0), 0.0);
    assert_eq!(w.sample(9.0, 10.0), 0.0);
    let mid = w.sample(9.25, 10.0);
    assert!(mid > 0.0 && mid < 0.8);
    assert!((w.sample(9.9, 10.0) - 0.8).abs() < 1e-5);
    assert_eq!(w.sample(1.0, f64::NAN), 0.0);
}

#[test]
fn warp_curve_peaks_on_intro_arrival_and_rests_mid_loop() {
    let curve = WarpCurve::default();
    let arrival = curve.sample(HeroPhase::Intro, 0.6, 8.0);
    assert!(arrival.intensity > 0.9);
    assert!((arrival.scale - arrival.intensity * 38.0).abs() < 1e-4);

    let rest = curve.sample(HeroPhase::Loop, 3.0, 6.0);
    assert_eq!(rest, WarpSample::ZERO);
    assert_eq!(rest.css_value(), "0.000");

    let seam = curve.sample(HeroPhase::Loop, 5.95, 6.0);
    assert!(seam.intensity > 0.0 && seam.intensity <= 1.0);
}

#[test]
fn media_config_defaults_and_resolution() {
    let cfg = HeroMediaConfig::default();
    assert_eq!(cfg.swaps.len(), 4);
    assert_eq!(cfg.intro[0].mime, "video/webm");
    assert_eq!(cfg.intro[1].src, "/video/hero-intro.mp4");

    let cdn = cfg.resolved(Some("https://cdn.example.com"));
    assert_eq!(cdn.loop_[0].src, "https://cdn.example.com/video/hero-loop.webm");
    assert_eq!(cdn.poster, "https://cdn.example.com/img/hero-bg.jpeg");
    assert!(cdn.swaps.iter().all(|v| v.sources[0].src.starts_with("https://cdn.example.com/")));
}

#[test]
fn media_config_parses_partial_json() {
    let json = r#"{
        "loop": [{"src": "/v/l.mp4", "type": "video/mp4"}],
        "swaps": [],
        "cooldownLoops": 0
    }"#;
    let cfg = HeroMediaConfig::from_json(json).expect("valid config");
    assert_eq!(cfg.loop_, vec![VideoSource::new("/v/l.mp4", "video/mp4")]);
    assert!(cfg.swaps.is_empty());
    assert_eq!(cfg.cooldown_loops, 0);
    assert_eq!(cfg.intro.len(), 2, "unset fields keep defaults");
}
