use super::*;
use crate::encode::sink::InMemorySink;
use crate::foundation::core::{AXIS_COUNT, LogicalSize};
use crate::foundation::error::{VhdsError, VhdsResult};
use crate::render::backend::FrameRGBA;
use crate::render::plan::FramePlan;
use crate::render::surface::{HostBox, RenderTarget};

#[derive(Default)]
struct Recording {
    frames: Vec<(SurfaceId, LogicalSize, Vec<String>)>,
    fail: bool,
}

impl RenderBackend for Recording {
    fn render(&mut self, target: &mut RenderTarget, plan: &FramePlan) -> VhdsResult<FrameRGBA> {
        if self.fail {
            return Err(VhdsError::render("boom"));
        }
        self.frames.push((
            target.id().clone(),
            plan.size(),
            plan.nodes().iter().map(|n| n.label.clone()).collect(),
        ));
        let canvas = target.fitted().map(|f| f.canvas).unwrap();
        Ok(FrameRGBA {
            width: canvas.width,
            height: canvas.height,
            data: Vec::new(),
            premultiplied: true,
        })
    }
}

fn radar(label: &str) -> ChartData {
    ChartData::Radar(RadarData::new(vec![label.to_owned()], vec![70.0]))
}

fn registry(ids: &[&str]) -> SurfaceRegistry {
    let mut reg = SurfaceRegistry::new();
    for id in ids {
        reg.attach(*id, HostBox::new(200.0, 150.0, 1.0));
    }
    reg
}

#[test]
fn restart_cancels_previous_token() {
    let mut c = AnimationLoopController::default();
    let a = c.start("radar", radar("A"));
    let b = c.start("radar", radar("B"));
    assert!(a.is_cancelled());
    assert!(!b.is_cancelled());
    assert_eq!(c.active_count(), 1);
    assert_eq!(c.data(&SurfaceId::from("radar")), Some(&radar("B")));
}

#[test]
fn stop_is_idempotent() {
    let mut c = AnimationLoopController::default();
    let id = SurfaceId::from("radar");
    assert!(!c.stop(&id));
    let t = c.start(id.clone(), radar("A"));
    assert!(c.stop(&id));
    assert!(t.is_cancelled());
    assert!(!c.stop(&id));
    assert!(!c.is_active(&id));
}

#[test]
fn external_cancel_ends_loop_at_next_tick() {
    let mut c = AnimationLoopController::default();
    let mut reg = registry(&["radar"]);
    let mut be = Recording::default();
    let mut sink = InMemorySink::new();

    let token = c.start("radar", radar("A"));
    token.cancel();
    assert!(!c.is_active(&SurfaceId::from("radar")));
    let report = c.tick(0.0, &mut reg, &mut be, &mut sink);
    assert_eq!(report.ended, vec![SurfaceId::from("radar")]);
    assert!(report.rendered.is_empty());
    assert!(be.frames.is_empty());
    assert_eq!(c.active_count(), 0);
}

#[test]
fn frames_are_numbered_per_loop() {
    let mut c = AnimationLoopController::default();
    let mut reg = registry(&["a", "b"]);
    let mut be = Recording::default();
    let mut sink = InMemorySink::new();
    c.start("a", radar("A"));
    c.start("b", radar("B"));

    for step in 0..3 {
        let report = c.tick(f64::from(step) * 16.0, &mut reg, &mut be, &mut sink);
        assert_eq!(report.rendered.len(), 2);
    }
    let a = SurfaceId::from("a");
    let idx: Vec<u64> = sink.frames_for(&a).map(|(i, _)| i.0).collect();
    assert_eq!(idx, vec![0, 1, 2]);
    assert_eq!(sink.len(), 6);
}

#[test]
fn set_data_swaps_labels_without_restart() {
    let mut c = AnimationLoopController::default();
    let mut reg = registry(&["radar"]);
    let mut be = Recording::default();
    let mut sink = InMemorySink::new();
    let id = SurfaceId::from("radar");
    let token = c.start(id.clone(), radar("Cardio"));

    c.tick(0.0, &mut reg, &mut be, &mut sink);
    assert!(c.set_data(&id, radar("Herz")));
    c.tick(16.0, &mut reg, &mut be, &mut sink);

    assert!(!token.is_cancelled());
    assert_eq!(be.frames[0].2[0], "Cardio 70");
    assert_eq!(be.frames[1].2[0], "Herz 70");
    assert_eq!(sink.frames()[1].1, FrameIndex(1));
    assert!(!c.set_data(&SurfaceId::from("ghost"), radar("x")));
}

#[test]
fn failed_frames_keep_the_loop_alive() {
    let mut c = AnimationLoopController::default();
    let mut reg = registry(&["radar"]);
    let mut be = Recording {
        fail: true,
        ..Default::default()
    };
    let mut sink = InMemorySink::new();
    c.start("radar", radar("A"));

    let report = c.tick(0.0, &mut reg, &mut be, &mut sink);
    assert_eq!(report.failed, vec![SurfaceId::from("radar")]);
    assert_eq!(c.active_count(), 1);

    be.fail = false;
    let report = c.tick(16.0, &mut reg, &mut be, &mut sink);
    assert_eq!(report.rendered, vec![(SurfaceId::from("radar"), FrameIndex(0))]);
}

#[test]
fn heatmap_loop_uses_heatmap_renderer() {
    let mut c = AnimationLoopController::default();
    let mut reg = registry(&["heat"]);
    let mut be = Recording::default();
    let mut sink = InMemorySink::new();
    c.start(
        "heat",
        ChartData::Heatmap(HeatmapData::from_values(&[10.0, 20.0], vec![])),
    );
    c.tick(0.0, &mut reg, &mut be, &mut sink);
    let labels = &be.frames[0].2;
    assert_eq!(labels.len(), AXIS_COUNT);
    assert_eq!(labels[0], "Head 10");
    assert_eq!(labels[9], "Right leg 0");
}

#[test]
fn stop_all_cancels_everything() {
    let mut c = AnimationLoopController::default();
    let a = c.start("a", radar("A"));
    let b = c.start("b", radar("B"));
    c.stop_all();
    assert!(a.is_cancelled() && b.is_cancelled());
    assert_eq!(c.active_count(), 0);
}

#[test]
fn heatmap_is_capped_near_twelve_fps() {
    let mut c = AnimationLoopController::default();
    let mut reg = registry(&["heat"]);
    let mut be = Recording::default();
    let mut sink = InMemorySink::new();
    c.start("heat", ChartData::Heatmap(HeatmapData::from_values(&[], vec![])));

    let mut drawn_at = Vec::new();
    let mut throttled = 0;
    for step in 0..12 {
        let now = f64::from(step) * 16.0;
        let report = c.tick(now, &mut reg, &mut be, &mut sink);
        if report.rendered.is_empty() {
            throttled += report.throttled.len();
        } else {
            drawn_at.push(now);
        }
    }
    assert_eq!(drawn_at, vec![0.0, 96.0]);
    assert_eq!(throttled, 10);
}

#[test]
fn detached_surface_ends_loop_quietly() {
    let mut c = AnimationLoopController::default();
    let mut reg = registry(&["radar"]);
    let mut be = Recording::default();
    let mut sink = InMemorySink::new();
    let id = SurfaceId::from("radar");
    let token = c.start(id.clone(), radar("A"));

    c.tick(0.0, &mut reg, &mut be, &mut sink);
    assert!(reg.detach(&id).is_some());
    let report = c.tick(16.0, &mut reg, &mut be, &mut sink);
    assert_eq!(report.ended, vec![id.clone()]);
    assert!(report.failed.is_empty());
    assert!(token.is_cancelled());
    assert!(!c.is_active(&id));
    assert_eq!(be.frames.len(), 1);
}

#[test]
fn resize_between_ticks_refits_canvas() {
    let mut c = AnimationLoopController::default();
    let mut reg = registry(&["radar"]);
    let mut be = Recording::default();
    let mut sink = InMemorySink::new();
    let id = SurfaceId::from("radar");
    c.start(id.clone(), radar("A"));

    c.tick(0.0, &mut reg, &mut be, &mut sink);
    assert!(reg.resize(&id, 300.0, 240.0));
    assert!(reg.set_device_pixel_ratio(&id, 2.0));
    c.tick(16.0, &mut reg, &mut be, &mut sink);

    let frames = sink.frames();
    assert_eq!((frames[0].2.width, frames[0].2.height), (200, 150));
    assert_eq!((frames[1].2.width, frames[1].2.height), (600, 480));
    assert_eq!(be.frames[1].1, LogicalSize::new(300.0, 240.0));
}

#[test]
fn nan_clock_reading_does_not_freeze_heatmap() {
    let mut c = AnimationLoopController::default();
    let mut reg = registry(&["heat"]);
    let mut be = Recording::default();
    let mut sink = InMemorySink::new();
    c.start("heat", ChartData::Heatmap(HeatmapData::default()));

    let first = c.tick(f64::NAN, &mut reg, &mut be, &mut sink);
    assert_eq!(first.rendered.len(), 1);

    let mut drawn = 0;
    for step in 1..50 {
        let report = c.tick(f64::from(step) * 100.0, &mut reg, &mut be, &mut sink);
        drawn += report.rendered.len();
    }
    assert_eq!(drawn, 49);
}
