use crate::animation::pulse::{radar_breath, radar_node_pulse};
use crate::chart::config::ChartConfig;
use crate::chart::layout::RadarGeometry;
use crate::chart::normalize::radar_items;
use crate::foundation::core::{AXIS_COUNT, BezPath, LogicalSize, Point, Rgba8};
use crate::foundation::error::VhdsResult;
use crate::render::backend::{FrameRGBA, RenderBackend};
use crate::render::plan::{
    DrawOp, FramePlan, NodeMark, Paint, TextAlign, circle_path, line_path, polygon_path,
};
use crate::render::surface::{RenderTarget, SurfaceManager};
use crate::synth::engine::MetricSet;
use crate::synth::report::AnalysisReport;

const RING_COUNT: usize = 4;
const LABEL_OFFSET: f64 = 18.0;
const ALIGN_DEADBAND: f64 = 0.05;
const CORE_RADIUS: f64 = 2.4;
const HALO_SCALE: f64 = 2.2;

const RING_COLOR: Rgba8 = Rgba8::new(255, 255, 255, 46);
const SPOKE_COLOR: Rgba8 = Rgba8::new(255, 255, 255, 41);
const CORE_COLOR: Rgba8 = Rgba8::new(255, 255, 255, 235);
const LABEL_COLOR: Rgba8 = Rgba8::new(234, 240, 255, 235);

/// Axis labels and values for one radar. Any length; normalized to ten axes at draw time.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RadarData {
    /// Axis labels, rendered verbatim.
    pub labels: Vec<String>,
    /// Axis values, nominally `0..=100`.
    pub values: Vec<f64>,
}

impl RadarData {
    /// Pair labels with values.
    pub fn new(labels: Vec<String>, values: Vec<f64>) -> Self {
        Self { labels, values }
    }
}

impl From<&MetricSet> for RadarData {
    fn from(set: &MetricSet) -> Self {
        Self::new(
            set.labels(),
            set.values().iter().map(|&v| f64::from(v)).collect(),
        )
    }
}

impl From<&AnalysisReport> for RadarData {
    fn from(report: &AnalysisReport) -> Self {
        Self::new(
            report.radar_axes.clone(),
            report.radar_values.iter().map(|&v| f64::from(v)).collect(),
        )
    }
}

/// Ten-axis radar with a breathing polygon and travelling node pulses.
#[derive(Clone, Debug)]
pub struct RadarRenderer {
    config: ChartConfig,
    surfaces: SurfaceManager,
}

impl Default for RadarRenderer {
    fn default() -> Self {
        Self::new(ChartConfig::radar())
    }
}

impl RadarRenderer {
    /// Renderer for `config`.
    pub fn new(config: ChartConfig) -> Self {
        let surfaces = config.surface_manager();
        Self { config, surfaces }
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
    pub fn plan(&self, size: LogicalSize, data: &RadarData, t_ms: f64) -> FramePlan {
        let cfg = &self.config;
        let geo = RadarGeometry::for_size(size);
        let items = radar_items(&data.labels, &data.values, cfg.pad_score);
        let mut plan = FramePlan::new(size);

        for k in 1..=RING_COUNT {
            plan.push(DrawOp::StrokePath {
                path: circle_path(geo.center, geo.radius * k as f64 / RING_COUNT as f64),
                color: RING_COLOR,
                width: 1.0,
            });
        }

        let mut spokes = BezPath::new();
        for i in 0..AXIS_COUNT {
            spokes.extend(line_path(geo.center, geo.along(i, geo.radius)));
        }
        plan.push(DrawOp::StrokePath {
            path: spokes,
            color: SPOKE_COLOR,
            width: 1.0,
        });

        let breath = 0.96 + 0.04 * radar_breath(t_ms);
        let vertices: Vec<Point> = items
            .iter()
            .enumerate()
            .map(|(i, it)| geo.along(i, geo.radius * f64::from(it.score) / 100.0 * breath))
            .collect();

        let outline = polygon_path(&vertices);
        plan.push(DrawOp::Additive(vec![
            DrawOp::StrokePath {
                path: outline.clone(),
                color: cfg.accent.fade(0.10),
                width: 10.0 * cfg.glow_scale,
            },
            DrawOp::StrokePath {
                path: outline.clone(),
                color: cfg.accent.fade(0.14),
                width: 5.0 * cfg.glow_scale,
            },
        ]));
        plan.push(DrawOp::FillPath {
            path: outline.clone(),
            paint: Paint::Solid(cfg.accent.fade(0.12)),
        });
        plan.push(DrawOp::StrokePath {
            path: outline,
            color: cfg.accent.fade(0.55),
            width: 2.0,
        });

        let radii: Vec<f64> = (0..AXIS_COUNT)
            .map(|i| 4.0 + 3.0 * radar_node_pulse(t_ms, i))
            .collect();

        let halos = vertices
            .iter()
            .zip(&radii)
            .map(|(&p, &r)| {
                let halo = r * HALO_SCALE * cfg.glow_scale;
                DrawOp::FillPath {
                    path: circle_path(p, halo),
                    paint: Paint::Radial {
                        center: p,
                        radius: halo,
                        stops: vec![
                            (0.0, cfg.accent.fade(0.45)),
                            (1.0, cfg.accent.with_alpha(0.0)),
                        ],
                    },
                }
            })
            .collect();
        plan.push(DrawOp::Additive(halos));

        for (i, (it, (&p, &r))) in items.iter().zip(vertices.iter().zip(&radii)).enumerate() {
            plan.push(DrawOp::FillPath {
                path: circle_path(p, r),
                paint: Paint::Solid(cfg.accent.fade(0.85)),
            });
            plan.push(DrawOp::FillPath {
                path: circle_path(p, CORE_RADIUS),
                paint: Paint::Solid(CORE_COLOR),
            });

            let anchor = geo.along(i, geo.radius + LABEL_OFFSET);
            let cos = (anchor.x - geo.center.x) / (geo.radius + LABEL_OFFSET);
            let align = if cos > ALIGN_DEADBAND {
                TextAlign::Left
            } else if cos < -ALIGN_DEADBAND {
                TextAlign::Right
            } else {
                TextAlign::Center
            };
            let label = format!("{} {}", it.name, it.score);
            plan.push(DrawOp::Text {
                text: label.clone(),
                anchor,
                size_px: cfg.label_size_px,
                align,
                color: LABEL_COLOR,
                max_width: None,
            });
            plan.mark(NodeMark {
                index: i,
                key: format!("axis_{i}"),
                label,
                score: it.score,
                center: p,
                label_anchor: anchor,
                label_box: None,
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
        data: &RadarData,
        t_ms: f64,
    ) -> VhdsResult<FrameRGBA> {
        let size = self.surfaces.fit(target).logical;
        let plan = self.plan(size, data, t_ms);
        backend.render(target, &plan)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/chart/radar.rs"]
mod tests;
