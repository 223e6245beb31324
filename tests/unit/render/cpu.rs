use super::*;
use crate::foundation::core::{LogicalSize, SurfaceId};
use crate::render::surface::{HostBox, SurfaceManager};

fn fitted_target(w: f64, h: f64, dpr: f64) -> RenderTarget {
    let mut t = RenderTarget::new(SurfaceId::from("t"), HostBox::new(w, h, dpr));
    SurfaceManager::new(3.0, LogicalSize::new(w, h)).fit(&mut t);
    t
}

fn full_rect(size: LogicalSize) -> BezPath {
    use kurbo::Shape;
    Rect::new(0.0, 0.0, size.width, size.height).to_path(0.1)
}

#[test]
fn unfitted_target_is_a_render_error() {
    let mut t = RenderTarget::new(SurfaceId::from("t"), HostBox::new(8.0, 8.0, 1.0));
    let mut be = CpuBackend::new(CpuBackendOpts::default());
    let plan = FramePlan::new(LogicalSize::new(8.0, 8.0));
    let err = be.render(&mut t, &plan).unwrap_err();
    assert!(matches!(err, VhdsError::Render(_)));
}

#[test]
fn frame_matches_canvas_and_fills() {
    let mut t = fitted_target(10.0, 6.0, 2.0);
    let size = LogicalSize::new(10.0, 6.0);
    let mut plan = FramePlan::new(size);
    plan.push(DrawOp::FillPath {
        path: full_rect(size),
        paint: Paint::Solid(Rgba8::opaque(255, 0, 0)),
    });

    let mut be = CpuBackend::new(CpuBackendOpts::default());
    let frame = be.render(&mut t, &plan).unwrap();
    assert_eq!((frame.width, frame.height), (20, 12));
    assert_eq!(frame.data.len(), 20 * 12 * 4);
    assert!(frame.premultiplied);
    assert_eq!(frame.pixel(10, 6), Some([255, 0, 0, 255]));
    assert_eq!(t.frames_drawn(), 1);
}

#[test]
fn clear_color_applies_before_ops() {
    let mut t = fitted_target(4.0, 4.0, 1.0);
    let plan = FramePlan::new(LogicalSize::new(4.0, 4.0));
    let mut be = CpuBackend::new(CpuBackendOpts::default().with_clear_rgba(Some([0, 0, 255, 255])));
    let frame = be.render(&mut t, &plan).unwrap();
    assert_eq!(frame.pixel(1, 1), Some([0, 0, 255, 255]));
}

#[test]
fn additive_group_brightens_backdrop() {
    let size = LogicalSize::new(4.0, 4.0);
    let mut plan = FramePlan::new(size);
    plan.push(DrawOp::FillPath {
        path: full_rect(size),
        paint: Paint::Solid(Rgba8::opaque(100, 0, 0)),
    });
    plan.push(DrawOp::Additive(vec![DrawOp::FillPath {
        path: full_rect(size),
        paint: Paint::Solid(Rgba8::opaque(100, 0, 0)),
    }]));

    let mut t = fitted_target(4.0, 4.0, 1.0);
    let mut be = CpuBackend::new(CpuBackendOpts::default());
    let frame = be.render(&mut t, &plan).unwrap();
    let [r, g, b, a] = frame.pixel(2, 2).unwrap();
    assert!(r >= 195, "expected additive red, got {r}");
    assert_eq!((g, b, a), (0, 0, 255));
}

#[test]
fn text_without_font_is_skipped() {
    let size = LogicalSize::new(16.0, 16.0);
    let mut plan = FramePlan::new(size);
    plan.push(DrawOp::Text {
        text: "Cardio 80".to_owned(),
        anchor: Point::new(8.0, 8.0),
        size_px: 12.0,
        align: TextAlign::Center,
        color: Rgba8::opaque(255, 255, 255),
        max_width: None,
    });
    let mut t = fitted_target(16.0, 16.0, 1.0);
    let mut be = CpuBackend::new(CpuBackendOpts::default().with_font(Some("missing.ttf".into())));
    let frame = be.render(&mut t, &plan).unwrap();
    assert!(frame.data.iter().all(|&b| b == 0));
    assert!(be.warned_no_font);
}

#[test]
fn image_is_stretched_into_rect() {
    let image = BackgroundImage {
        width: 1,
        height: 1,
        rgba8_premul: Arc::new(vec![0, 255, 0, 255]),
    };
    let size = LogicalSize::new(8.0, 8.0);
    let mut plan = FramePlan::new(size);
    plan.push(DrawOp::Image {
        image,
        rect: Rect::new(0.0, 0.0, 8.0, 8.0),
        opacity: 1.0,
    });
    let mut t = fitted_target(8.0, 8.0, 1.0);
    let mut be = CpuBackend::new(CpuBackendOpts::default());
    let frame = be.render(&mut t, &plan).unwrap();
    assert_eq!(frame.pixel(4, 4), Some([0, 255, 0, 255]));
}

#[test]
fn mismatched_image_bytes_are_rejected() {
    assert!(pixmap_from_premul_bytes(&[0; 3], 1, 1).is_err());
    assert!(pixmap_from_premul_bytes(&[0; 4], 70_000, 1).is_err());
}

#[test]
fn resize_reallocates_backing_buffer() {
    let size = LogicalSize::new(4.0, 4.0);
    let mut t = fitted_target(4.0, 4.0, 1.0);
    let mut be = CpuBackend::new(CpuBackendOpts::default());
    be.render(&mut t, &FramePlan::new(size)).unwrap();

    t = {
        let mut t2 = RenderTarget::new(SurfaceId::from("t"), HostBox::new(6.0, 5.0, 2.0));
        SurfaceManager::new(2.0, size).fit(&mut t2);
        t2
    };
    let frame = be.render(&mut t, &FramePlan::new(size)).unwrap();
    assert_eq!((frame.width, frame.height), (12, 10));
}

#[test]
fn wide_text_is_scaled_into_its_box() {
    let p = TextPlacement {
        anchor: Point::new(100.0, 50.0),
        align: TextAlign::Center,
        max_width: Some(40.0),
    };
    // Shaped line twice as wide as allowed.
    let a = p.transform(80.0, 14.0);
    let left = a * Point::new(0.0, 0.0);
    let right = a * Point::new(80.0, 14.0);
    assert!((left.x - 80.0).abs() < 1e-9);
    assert!((right.x - 120.0).abs() < 1e-9);
    assert!((left.y - 46.5).abs() < 1e-9);
    assert!((right.y - 53.5).abs() < 1e-9);

    // Narrow text keeps its size.
    let a = p.transform(20.0, 14.0);
    assert_eq!(a * Point::new(20.0, 0.0), Point::new(110.0, 43.0));

    let unbounded = TextPlacement {
        max_width: None,
        align: TextAlign::Right,
        ..p
    };
    assert_eq!(unbounded.transform(80.0, 14.0) * Point::ZERO, Point::new(20.0, 43.0));
}
