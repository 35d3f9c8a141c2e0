// Host-side tests for the shared animation-loop policy.

use backdrop_core::config::{NebulaColorMode, NebulaConfig};
use backdrop_core::renderers::Nebula;
use backdrop_core::{
    AnimationLoop, BackdropError, Frame, LoopAction, RecordingSurface, Renderer, Surface, Viewport,
};
use std::cell::RefCell;
use std::rc::Rc;

/// Records every frame it is asked to draw.
struct FrameLog {
    frames: Rc<RefCell<Vec<Frame>>>,
    interval: Option<f64>,
}

impl Renderer for FrameLog {
    fn name(&self) -> &'static str {
        "frame-log"
    }

    fn resize(&mut self, _viewport: Viewport) {}

    fn render(&mut self, frame: &Frame, _surface: &mut dyn Surface) {
        self.frames.borrow_mut().push(*frame);
    }

    fn min_interval_ms(&self) -> Option<f64> {
        self.interval
    }
}

fn logging_loop(interval: Option<f64>) -> (AnimationLoop, Rc<RefCell<Vec<Frame>>>) {
    let frames = Rc::new(RefCell::new(Vec::new()));
    let r = FrameLog {
        frames: frames.clone(),
        interval,
    };
    (AnimationLoop::new(Box::new(r), false), frames)
}

#[test]
fn reduced_motion_draws_exactly_one_static_frame() {
    let frames = Rc::new(RefCell::new(Vec::new()));
    let r = FrameLog {
        frames: frames.clone(),
        interval: None,
    };
    let mut lp = AnimationLoop::new(Box::new(r), true);
    let mut s = RecordingSurface::new();
    assert_eq!(lp.mount(0.0, &mut s), LoopAction::Stop);
    assert_eq!(lp.frame(16.0, &mut s), LoopAction::Stop);
    assert_eq!(lp.frame(32.0, &mut s), LoopAction::Stop);
    assert_eq!(lp.renders(), 1);
    assert_eq!(frames.borrow()[0].dt, 0.0);
}

#[test]
fn normal_mount_schedules_without_drawing() {
    let (mut lp, frames) = logging_loop(None);
    let mut s = RecordingSurface::new();
    assert_eq!(lp.mount(0.0, &mut s), LoopAction::Schedule);
    assert!(frames.borrow().is_empty());
    assert_eq!(lp.frame(16.0, &mut s), LoopAction::Schedule);
    assert_eq!(lp.renders(), 1);
}

#[test]
fn frame_delta_is_clamped() {
    let (mut lp, frames) = logging_loop(None);
    let mut s = RecordingSurface::new();
    lp.frame(1000.0, &mut s);
    lp.frame(1016.0, &mut s);
    lp.frame(6000.0, &mut s);
    lp.frame(5000.0, &mut s);
    let dts: Vec<f32> = frames.borrow().iter().map(|f| f.dt).collect();
    assert_eq!(dts[0], 0.0, "first frame has no history");
    assert!((dts[1] - 0.016).abs() < 1e-6);
    assert!((dts[2] - 0.033).abs() < 1e-6, "tab-switch gap clamps");
    assert_eq!(dts[3], 0.0, "clock going backwards clamps at zero");
}

#[test]
fn dispose_stops_the_loop() {
    let (mut lp, frames) = logging_loop(None);
    let mut s = RecordingSurface::new();
    lp.frame(0.0, &mut s);
    lp.dispose();
    assert!(lp.is_disposed());
    assert_eq!(lp.frame(16.0, &mut s), LoopAction::Stop);
    assert_eq!(lp.mount(32.0, &mut s), LoopAction::Stop);
    assert_eq!(frames.borrow().len(), 1);
    lp.dispose();
}

#[test]
fn throttled_renderer_skips_early_frames() {
    let (mut lp, frames) = logging_loop(Some(140.0));
    let mut s = RecordingSurface::new();
    for i in 0..60 {
        assert_eq!(lp.frame(i as f64 * 1000.0 / 60.0, &mut s), LoopAction::Schedule);
    }
    // One second at 60 Hz with a 140 ms floor.
    let n = frames.borrow().len();
    assert!((7..=8).contains(&n), "rendered {n} frames");
    let times: Vec<f64> = frames.borrow().iter().map(|f| f.now_ms).collect();
    assert!(times.windows(2).all(|w| w[1] - w[0] >= 140.0));
}

#[test]
fn nebula_is_throttled_by_the_loop() {
    let mut nebula = Nebula::new(&NebulaConfig {
        intensity: 0.5,
        speed: 0.2,
        scale: 1.0,
        color_mode: NebulaColorMode::Blue,
    });
    nebula.resize(Viewport::new(400.0, 300.0, 1.0).unwrap());
    let mut lp = AnimationLoop::new(Box::new(nebula), false);
    let mut s = RecordingSurface::new();
    for i in 0..30 {
        lp.frame(i as f64 * 1000.0 / 60.0, &mut s);
    }
    assert_eq!(lp.renderer_name(), "nebula");
    assert_eq!(s.blits as u64, lp.renders());
    assert!(lp.renders() <= 4);
}

#[test]
fn viewport_rejects_empty_and_caps_dpr() {
    assert!(matches!(
        Viewport::new(0.0, 100.0, 1.0),
        Err(BackdropError::InvalidViewport { .. })
    ));
    let vp = Viewport::new(100.0, 50.0, 3.0).unwrap();
    assert_eq!(vp.dpr, 2.0);
    assert_eq!(vp.backing_size(), (200, 100));
}
