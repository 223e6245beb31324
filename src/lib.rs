//! VHDS turns a form snapshot into reproducible metric scores and renders them as animated
//! charts.
//!
//! The crate has three layers:
//!
//! - [`synth`]: a pure, seeded score engine (`(mode, snapshot) -> MetricSet`)
//! - [`chart`]: radar and body-heatmap renderers that turn scores into a [`FramePlan`] per frame
//! - [`animation`]: the loop controller that owns one cooperative redraw loop per surface and
//!   drives a [`RenderBackend`] against fitted surfaces from a [`SurfaceRegistry`]
//!
//! Scores are synthetic by construction. They exist to drive legible, reproducible visuals and
//! carry no physiological meaning.
#![forbid(unsafe_code)]

mod assets;
mod foundation;

/// Loop lifecycle: start/stop/cancel and throttled frame scheduling.
pub mod animation;
/// Radar and heatmap renderers plus their shared configuration surface.
pub mod chart;
/// Crate-level configuration loading.
pub mod config;
/// Frame sinks.
pub mod encode;
/// Render plans, surface fitting and the CPU backend.
pub mod render;
/// Deterministic score synthesis and derived analysis.
pub mod synth;

pub use crate::foundation::core::{
    AXIS_COUNT, Affine, BezPath, Canvas, FrameIndex, LogicalSize, Point, Rect, Rgba8, SurfaceId,
};
pub use crate::foundation::error::{VhdsError, VhdsResult};

pub use crate::animation::controller::{AnimationLoopController, ChartData, TickReport};
pub use crate::animation::token::CancelToken;
pub use crate::assets::color::ColorDef;
pub use crate::assets::decode::{BackgroundImage, load_background};
pub use crate::chart::config::{
    ChartConfig, ChartOverrides, ColorRamp, MAX_DPR_ENV, RampSpace, Silhouette,
};
pub use crate::chart::heatmap::{HeatmapData, HeatmapRenderer};
pub use crate::chart::layout::{HOTSPOT_LAYOUT, Hotspot, LabelSide, ZoneKey};
pub use crate::chart::radar::{RadarData, RadarRenderer};
pub use crate::config::VhdsConfig;
pub use crate::encode::sink::{DiscardSink, FrameSink, InMemorySink, PngSequenceSink};
pub use crate::render::backend::{FrameRGBA, RenderBackend};
pub use crate::render::cpu::{CpuBackend, CpuBackendOpts};
pub use crate::render::plan::{
    DrawOp, FramePlan, NodeMark, Paint, TextAlign, estimate_text_width,
};
pub use crate::render::surface::{
    DEFAULT_LOGICAL_SIZE, FittedSurface, HostBox, RenderTarget, SurfaceManager, SurfaceRegistry,
};
pub use crate::synth::engine::{MetricScore, MetricSet, Seed, Snapshot, synthesize};
pub use crate::synth::index::{
    ModeAggregates, StatusBand, Trend, biological_age, flat_index, overall_index, potential,
    trend_delta,
};
pub use crate::synth::modes::{AxisDef, Mode};
pub use crate::synth::report::{
    AnalysisReport, ConcernCard, OverallReport, analyze, analyze_all, top_concerns,
};
