use std::path::PathBuf;
use std::sync::Arc;

use super::*;
use crate::foundation::core::AXIS_COUNT;
use crate::foundation::error::VhdsError;

fn size() -> LogicalSize {
    LogicalSize::new(520.0, 420.0)
}

fn mid_disc_radius(plan: &FramePlan, zone: usize) -> f64 {
    let glows = plan
        .ops()
        .iter()
        .find_map(|op| match op {
            DrawOp::Additive(inner) => Some(inner),
            _ => None,
        })
        .unwrap();
    match &glows[zone * 3 + 1] {
        DrawOp::FillPath {
            paint: Paint::Radial { radius, .. },
            ..
        } => *radius,
        other => panic!("unexpected op {other:?}"),
    }
}

#[test]
fn seven_values_still_draw_ten_zones() {
    let data = HeatmapData::from_values(&[90.0; 7], vec!["A".into(), "B".into()]);
    let plan = HeatmapRenderer::default().plan(size(), &data, 0.0);
    assert_eq!(plan.nodes().len(), AXIS_COUNT);
    assert_eq!(plan.nodes()[0].label, "A 90");
    assert_eq!(plan.nodes()[2].label, "Chest 90");
    assert_eq!(plan.nodes()[7].label, "Right arm 0");
    assert_eq!(plan.nodes()[9].key, "leg_right");
}

#[test]
fn glow_grows_with_score() {
    let mut scores = BTreeMap::new();
    scores.insert(ZoneKey::Head, 20.0);
    scores.insert(ZoneKey::Face, 90.0);
    let plan = HeatmapRenderer::default().plan(size(), &HeatmapData::new(scores, vec![]), 0.0);
    assert!(mid_disc_radius(&plan, 1) > mid_disc_radius(&plan, 0));
}

#[test]
fn glow_scale_multiplies_radius() {
    let data = HeatmapData::from_values(&[50.0; 10], vec![]);
    let base = HeatmapRenderer::default().plan(size(), &data, 0.0);
    let mut cfg = ChartConfig::heatmap();
    cfg.glow_scale = 2.0;
    let scaled = HeatmapRenderer::new(cfg).plan(size(), &data, 0.0);
    let (a, b) = (mid_disc_radius(&base, 3), mid_disc_radius(&scaled, 3));
    assert!((b - 2.0 * a).abs() < 1e-9);
}

#[test]
fn hotspot_positions_ignore_scores() {
    let r = HeatmapRenderer::default();
    let low = r.plan(size(), &HeatmapData::from_values(&[0.0; 10], vec![]), 0.0);
    let high = r.plan(size(), &HeatmapData::from_values(&[100.0; 10], vec![]), 500.0);
    for (a, b) in low.nodes().iter().zip(high.nodes()) {
        assert_eq!(a.center, b.center);
    }
    assert_eq!(low.nodes()[6].center, Point::new(0.32 * 520.0, 0.46 * 420.0));
}

#[test]
fn labels_are_clamped_inside_small_surfaces() {
    let small = LogicalSize::new(200.0, 160.0);
    let labels: Vec<String> = (0..10).map(|i| format!("Zone label {i}")).collect();
    let plan = HeatmapRenderer::default().plan(
        small,
        &HeatmapData::from_values(&[55.0; 10], labels),
        0.0,
    );
    for n in plan.nodes() {
        let b = n.label_box.unwrap();
        assert!(b.x0 >= LABEL_MARGIN - 1e-9);
        assert!(b.y0 >= LABEL_MARGIN - 1e-9);
        assert!(b.x1 <= small.width - LABEL_MARGIN + 1e-9);
        assert!(b.y1 <= small.height - LABEL_MARGIN + 1e-9);
    }
}

#[test]
fn label_text_is_bounded_by_its_pill() {
    let plan = HeatmapRenderer::default().plan(size(), &HeatmapData::default(), 0.0);
    let texts: Vec<_> = plan
        .ops()
        .iter()
        .filter_map(|op| match op {
            DrawOp::Text {
                anchor, max_width, ..
            } => Some((*anchor, *max_width)),
            _ => None,
        })
        .collect();
    assert_eq!(texts.len(), AXIS_COUNT);
    for ((anchor, max_width), node) in texts.iter().zip(plan.nodes()) {
        let pill = node.label_box.unwrap();
        assert_eq!(*anchor, pill.center());
        let max = max_width.expect("heatmap labels are width-bounded");
        assert!((max - (pill.width() - LABEL_PAD * 2.0)).abs() < 1e-9);
    }
}

#[test]
fn label_box_sides() {
    let s = LogicalSize::new(1000.0, 1000.0);
    let at = Point::new(500.0, 500.0);
    let right = label_box(at, LabelSide::Right, "ab", 10.0, s);
    let left = label_box(at, LabelSide::Left, "ab", 10.0, s);
    let center = label_box(at, LabelSide::Center, "ab", 10.0, s);
    assert!((right.x0 - 514.0).abs() < 1e-9);
    assert!((left.x1 - 486.0).abs() < 1e-9);
    assert!((center.center().x - 500.0).abs() < 1e-9);
    assert!((right.height() - LABEL_BOX_H).abs() < 1e-9);
    assert!((right.width() - (11.2 + 14.0)).abs() < 1e-9);
}

#[test]
fn failed_background_degrades_to_no_silhouette() {
    let mut cfg = ChartConfig::heatmap();
    cfg.silhouette = Silhouette::Image(PathBuf::from("nope.png"));
    let r = HeatmapRenderer::new(cfg).with_background(Err(VhdsError::asset("404")));
    assert!(!r.has_background());
    let plan = r.plan(size(), &HeatmapData::default(), 0.0);
    assert!(!plan.ops().iter().any(|op| matches!(op, DrawOp::Image { .. })));
    assert_eq!(plan.nodes().len(), AXIS_COUNT);
}

#[test]
fn load_with_missing_file_still_renders() {
    let mut cfg = ChartConfig::heatmap();
    cfg.silhouette = Silhouette::Image(PathBuf::from("definitely/missing/body.png"));
    let r = HeatmapRenderer::load(cfg);
    assert!(!r.has_background());
}

#[test]
fn loaded_background_is_contained_in_body_frame() {
    let img = BackgroundImage {
        width: 100,
        height: 200,
        rgba8_premul: Arc::new(vec![255; 100 * 200 * 4]),
    };
    let mut cfg = ChartConfig::heatmap();
    cfg.silhouette = Silhouette::Image(PathBuf::from("body.png"));
    let r = HeatmapRenderer::new(cfg).with_background(Ok(img));
    let plan = r.plan(size(), &HeatmapData::default(), 0.0);
    let rect = plan
        .ops()
        .iter()
        .find_map(|op| match op {
            DrawOp::Image { rect, .. } => Some(*rect),
            _ => None,
        })
        .unwrap();
    assert!((rect.height() / rect.width() - 2.0).abs() < 1e-9);
    assert!(rect.y0 >= 420.0 * 0.06 - 1e-9);
    assert!(rect.y1 <= 420.0 * 0.94 + 1e-9);
}

#[test]
fn outline_silhouette_is_default() {
    let plan = HeatmapRenderer::default().plan(size(), &HeatmapData::default(), 0.0);
    let strokes = plan
        .ops()
        .iter()
        .filter(|op| matches!(op, DrawOp::StrokePath { color, .. } if *color == OUTLINE_COLOR))
        .count();
    assert_eq!(strokes, 2);
}
