use std::collections::BTreeMap;

use crate::animation::pulse::hotspot_pulse;
use crate::assets::decode::{BackgroundImage, load_background};
use crate::chart::config::{ChartConfig, Silhouette};
use crate::chart::layout::{HOTSPOT_LAYOUT, LabelSide, ZoneKey};
use crate::chart::normalize::heatmap_items;
use crate::foundation::core::{BezPath, LogicalSize, Point, Rect, Rgba8};
use crate::foundation::error::VhdsResult;
use crate::render::backend::{FrameRGBA, RenderBackend};
use crate::render::plan::{
    DrawOp, FramePlan, NodeMark, Paint, TextAlign, circle_path, estimate_text_width, line_path,
    rounded_rect_path,
};
use crate::render::surface::{RenderTarget, SurfaceManager};
use crate::synth::engine::MetricSet;

const GRID_STEP: f64 = 24.0;
const LABEL_GAP: f64 = 14.0;
const LABEL_PAD: f64 = 7.0;
const LABEL_BOX_H: f64 = 22.0;
const LABEL_MARGIN: f64 = 6.0;
const PILL_RADIUS: f64 = 10.0;
const CORE_RADIUS: f64 = 5.5;
const HALO_SCALE: f64 = 1.6;
const BACKGROUND_OPACITY: f64 = 0.55;

const WASH_TOP: Rgba8 = Rgba8::opaque(10, 18, 35);
const WASH_BOTTOM: Rgba8 = Rgba8::opaque(6, 12, 26);
const GRID_COLOR: Rgba8 = Rgba8::new(120, 160, 255, 11);
const VIGNETTE: Rgba8 = Rgba8::new(0, 0, 0, 140);
const OUTLINE_COLOR: Rgba8 = Rgba8::new(180, 210, 255, 89);
const OUTLINE_GLOW: Rgba8 = Rgba8::new(0, 255, 220, 28);
const PILL_FILL: Rgba8 = Rgba8::new(10, 22, 45, 170);
const LABEL_COLOR: Rgba8 = Rgba8::new(235, 245, 255, 242);

/// Zone scores and labels for one heatmap.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HeatmapData {
    /// Score per zone, nominally `0..=100`. Missing zones are padded.
    pub scores: BTreeMap<ZoneKey, f64>,
    /// Labels in [`ZoneKey::ALL`] order, rendered verbatim.
    pub labels: Vec<String>,
}

impl HeatmapData {
    /// Scores keyed by zone plus labels in zone order.
    pub fn new(scores: BTreeMap<ZoneKey, f64>, labels: Vec<String>) -> Self {
        Self { scores, labels }
    }

    /// Assign `values` to zones in [`ZoneKey::ALL`] order; extra values are ignored.
    pub fn from_values(values: &[f64], labels: Vec<String>) -> Self {
        let scores = ZoneKey::ALL.into_iter().zip(values.iter().copied()).collect();
        Self { scores, labels }
    }
}

impl From<&MetricSet> for HeatmapData {
    fn from(set: &MetricSet) -> Self {
        let values: Vec<f64> = set.values().iter().map(|&v| f64::from(v)).collect();
        Self::from_values(&values, set.labels())
    }
}

/// Body heatmap: ten fixed hotspots glowing by score over a dark backdrop.
#[derive(Clone, Debug)]
pub struct HeatmapRenderer {
    config: ChartConfig,
    surfaces: SurfaceManager,
    background: Option<BackgroundImage>,
}

impl Default for HeatmapRenderer {
    fn default() -> Self {
        Self::new(ChartConfig::heatmap())
    }
}

impl HeatmapRenderer {
    /// Renderer for `config`, without loading any background image.
    pub fn new(config: ChartConfig) -> Self {
        let surfaces = config.surface_manager();
        Self {
            config,
            surfaces,
            background: None,
        }
    }

    /// Renderer for `config`, loading the silhouette image when one is configured.
    ///
    /// A failed load is logged and the silhouette is skipped.
    pub fn load(config: ChartConfig) -> Self {
        let path = match &config.silhouette {
            Silhouette::Image(p) => Some(p.clone()),
            _ => None,
        };
        let this = Self::new(config);
        match path {
            Some(p) => this.with_background(load_background(&p)),
            None => this,
        }
    }

    /// Install the result of a background load, degrading on error.
    pub fn with_background(mut self, loaded: VhdsResult<BackgroundImage>) -> Self {
        match loaded {
            Ok(img) => {
                tracing::debug!(width = img.width, height = img.height, "heatmap background ready");
                self.background = Some(img);
            }
            Err(err) => {
                tracing::warn!(error = %err, "heatmap background failed to load, drawing without silhouette");
                self.background = None;
            }
        }
        self
    }

    /// Whether a background image is installed.
    pub fn has_background(&self) -> bool {
        self.background.is_some()
    }

    /// Active configuration.
    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// Surface fitting policy for this chart.
    pub fn surface_manager(&self) -> &SurfaceManager {
        &self.surfaces
    }

    /// Lay out one frame at time `t_ms`.
    pub fn plan(&self, size: LogicalSize, data: &HeatmapData, t_ms: f64) -> FramePlan {
        let mut plan = FramePlan::new(size);
        self.push_backdrop(&mut plan, size);
        self.push_silhouette(&mut plan, size);

        let cfg = &self.config;
        let items = heatmap_items(&data.scores, &data.labels, cfg.pad_score);

        let mut glows = Vec::with_capacity(items.len() * 3);
        for (i, (spot, it)) in HOTSPOT_LAYOUT.iter().zip(&items).enumerate() {
            let c = spot.center(size);
            let s = f64::from(it.score) / 100.0;
            let intensity = 0.25 + 0.75 * s;
            let r = (spot.radius + 20.0 * s) * cfg.glow_scale * (1.0 + 0.10 * hotspot_pulse(t_ms, i));
            let color = cfg.ramp.for_score(it.score);

            glows.push(radial_disc(
                c,
                r * HALO_SCALE,
                vec![(0.0, color.fade(0.30 * intensity)), (1.0, color.with_alpha(0.0))],
            ));
            glows.push(radial_disc(
                c,
                r,
                vec![
                    (0.0, color.fade(0.85 * intensity)),
                    (0.45, color.fade(0.35 * intensity)),
                    (1.0, color.with_alpha(0.0)),
                ],
            ));
            glows.push(DrawOp::FillPath {
                path: circle_path(c, CORE_RADIUS),
                paint: Paint::Solid(lighten(color, 0.3).fade(0.85 * intensity)),
            });
        }
        plan.push(DrawOp::Additive(glows));

        for (i, (spot, it)) in HOTSPOT_LAYOUT.iter().zip(&items).enumerate() {
            let c = spot.center(size);
            let label = format!("{} {}", it.name, it.score);
            let pill = label_box(c, spot.side, &label, cfg.label_size_px, size);

            plan.push(DrawOp::FillPath {
                path: rounded_rect_path(pill, PILL_RADIUS),
                paint: Paint::Solid(PILL_FILL),
            });
            plan.push(DrawOp::StrokePath {
                path: rounded_rect_path(pill, PILL_RADIUS),
                color: cfg.accent.fade(0.33),
                width: 1.0,
            });
            plan.push(DrawOp::Text {
                text: label.clone(),
                anchor: pill.center(),
                size_px: cfg.label_size_px,
                align: TextAlign::Center,
                color: LABEL_COLOR,
                max_width: Some((pill.width() - LABEL_PAD * 2.0).max(1.0)),
            });
            plan.mark(NodeMark {
                index: i,
                key: spot.zone.key().to_owned(),
                label,
                score: it.score,
                center: c,
                label_anchor: pill.center(),
                label_box: Some(pill),
            });
        }

        plan
    }

    /// Fit `target`, lay out a frame and draw it with `backend`.
    #[tracing::instrument(skip_all, fields(surface = %target.id(), t_ms))]
    pub fn render(
        &self,
        target: &mut RenderTarget,
        backend: &mut dyn RenderBackend,
        data: &HeatmapData,
        t_ms: f64,
    ) -> VhdsResult<FrameRGBA> {
        let size = self.surfaces.fit(target).logical;
        let plan = self.plan(size, data, t_ms);
        backend.render(target, &plan)
    }

    fn push_backdrop(&self, plan: &mut FramePlan, size: LogicalSize) {
        let (w, h) = (size.width, size.height);
        let full = rounded_rect_path(Rect::new(0.0, 0.0, w, h), 0.0);

        plan.push(DrawOp::FillPath {
            path: full.clone(),
            paint: Paint::Linear {
                start: Point::new(0.0, 0.0),
                end: Point::new(0.0, h),
                stops: vec![(0.0, WASH_TOP), (1.0, WASH_BOTTOM)],
            },
        });

        let mut grid = BezPath::new();
        let mut x = 0.0;
        while x <= w {
            grid.extend(line_path(Point::new(x, 0.0), Point::new(x, h)));
            x += GRID_STEP;
        }
        let mut y = 0.0;
        while y <= h {
            grid.extend(line_path(Point::new(0.0, y), Point::new(w, y)));
            y += GRID_STEP;
        }
        plan.push(DrawOp::StrokePath {
            path: grid,
            color: GRID_COLOR,
            width: 1.0,
        });

        let m = size.min_side();
        let inner = (0.1 / 0.75) as f32;
        plan.push(DrawOp::FillPath {
            path: full,
            paint: Paint::Radial {
                center: Point::new(w * 0.5, h * 0.55),
                radius: m * 0.75,
                stops: vec![
                    (0.0, Rgba8::transparent()),
                    (inner, Rgba8::transparent()),
                    (1.0, VIGNETTE),
                ],
            },
        });
    }

    fn push_silhouette(&self, plan: &mut FramePlan, size: LogicalSize) {
        let (w, h) = (size.width, size.height);
        match &self.config.silhouette {
            Silhouette::None => {}
            Silhouette::Image(_) => {
                // A failed load leaves no image; hotspots still draw.
                if let Some(img) = &self.background {
                    let frame = Rect::new(w * 0.2, h * 0.06, w * 0.8, h * 0.94);
                    plan.push(DrawOp::Image {
                        image: img.clone(),
                        rect: contain(frame, img.width, img.height),
                        opacity: BACKGROUND_OPACITY,
                    });
                }
            }
            Silhouette::Outline => {
                let cx = w * 0.5;
                let head_r = size.min_side() * 0.07;
                let head = circle_path(Point::new(cx, h * 0.12 + head_r), head_r);
                let body_w = w * 0.28;
                let torso = rounded_rect_path(
                    Rect::new(cx - body_w / 2.0, h * 0.22, cx + body_w / 2.0, h * 0.86),
                    (body_w * 0.18).min(24.0),
                );
                for path in [head, torso] {
                    plan.push(DrawOp::StrokePath {
                        path: path.clone(),
                        color: OUTLINE_GLOW,
                        width: 6.0,
                    });
                    plan.push(DrawOp::StrokePath {
                        path,
                        color: OUTLINE_COLOR,
                        width: 2.0,
                    });
                }
            }
        }
    }
}

fn radial_disc(center: Point, radius: f64, stops: Vec<(f32, Rgba8)>) -> DrawOp {
    DrawOp::FillPath {
        path: circle_path(center, radius),
        paint: Paint::Radial {
            center,
            radius,
            stops,
        },
    }
}

fn lighten(c: Rgba8, amount: f64) -> Rgba8 {
    let up = |v: u8| (f64::from(v) + (255.0 - f64::from(v)) * amount).round() as u8;
    Rgba8::new(up(c.r), up(c.g), up(c.b), c.a)
}

/// Label pill next to a hotspot, kept inside the surface with a small margin.
pub(crate) fn label_box(
    at: Point,
    side: LabelSide,
    text: &str,
    size_px: f64,
    surface: LogicalSize,
) -> Rect {
    let box_w = estimate_text_width(text, size_px) + LABEL_PAD * 2.0;
    let bx = match side {
        LabelSide::Right => at.x + LABEL_GAP,
        LabelSide::Left => at.x - LABEL_GAP - box_w,
        LabelSide::Center => at.x - box_w / 2.0,
    };
    let by = at.y - LABEL_BOX_H / 2.0;

    let bx = bx.clamp(
        LABEL_MARGIN,
        LABEL_MARGIN.max(surface.width - box_w - LABEL_MARGIN),
    );
    let by = by.clamp(
        LABEL_MARGIN,
        LABEL_MARGIN.max(surface.height - LABEL_BOX_H - LABEL_MARGIN),
    );
    Rect::new(bx, by, bx + box_w, by + LABEL_BOX_H)
}

/// Largest rect with the image's aspect ratio centred inside `frame`.
fn contain(frame: Rect, width: u32, height: u32) -> Rect {
    if width == 0 || height == 0 {
        return frame;
    }
    let scale = (frame.width() / f64::from(width)).min(frame.height() / f64::from(height));
    let (w, h) = (f64::from(width) * scale, f64::from(height) * scale);
    let c = frame.center();
    Rect::new(c.x - w / 2.0, c.y - h / 2.0, c.x + w / 2.0, c.y + h / 2.0)
}

#[cfg(test)]
#[path = "../../tests/unit/chart/heatmap.rs"]
mod tests;
