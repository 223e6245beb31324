use std::collections::BTreeMap;

use crate::animation::throttle::FrameThrottle;
use crate::animation::token::CancelToken;
use crate::chart::heatmap::{HeatmapData, HeatmapRenderer};
use crate::chart::radar::{RadarData, RadarRenderer};
use crate::config::VhdsConfig;
use crate::encode::sink::FrameSink;
use crate::foundation::core::{FrameIndex, SurfaceId};
use crate::render::backend::RenderBackend;
use crate::render::surface::SurfaceRegistry;

/// What a loop draws.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartData {
    /// Radar chart data.
    Radar(RadarData),
    /// Heatmap data.
    Heatmap(HeatmapData),
}

impl ChartData {
    fn kind(&self) -> &'static str {
        match self {
            Self::Radar(_) => "radar",
            Self::Heatmap(_) => "heatmap",
        }
    }
}

struct ActiveLoop {
    token: CancelToken,
    data: ChartData,
    started_ms: Option<f64>,
    throttle: FrameThrottle,
    next_frame: FrameIndex,
}

/// Outcome of one [`AnimationLoopController::tick`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Surfaces that got a frame, with that frame's index.
    pub rendered: Vec<(SurfaceId, FrameIndex)>,
    /// Surfaces whose loop skipped this tick because of its frame-rate cap.
    pub throttled: Vec<SurfaceId>,
    /// Loops that ended this tick: cancelled, or their surface disappeared.
    pub ended: Vec<SurfaceId>,
    /// Surfaces whose frame failed to render or to reach the sink. Their loops keep running.
    pub failed: Vec<SurfaceId>,
}

/// Owns at most one redraw loop per surface id.
///
/// The host drives it by calling [`tick`](Self::tick) on every display refresh. Loops never
/// preempt each other; each one gets at most one frame per tick.
pub struct AnimationLoopController {
    radar: RadarRenderer,
    heatmap: HeatmapRenderer,
    loops: BTreeMap<SurfaceId, ActiveLoop>,
}

impl Default for AnimationLoopController {
    fn default() -> Self {
        Self::new(RadarRenderer::default(), HeatmapRenderer::default())
    }
}

impl std::fmt::Debug for AnimationLoopController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationLoopController")
            .field("active", &self.loops.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl AnimationLoopController {
    /// Controller drawing with the given renderers.
    pub fn new(radar: RadarRenderer, heatmap: HeatmapRenderer) -> Self {
        Self {
            radar,
            heatmap,
            loops: BTreeMap::new(),
        }
    }

    /// Controller configured from `config`; a configured heatmap background is loaded here,
    /// once, before any frame.
    pub fn from_config(config: &VhdsConfig) -> Self {
        Self::new(
            RadarRenderer::new(config.radar.clone()),
            HeatmapRenderer::load(config.heatmap.clone()),
        )
    }

    /// Radar renderer in use.
    pub fn radar(&self) -> &RadarRenderer {
        &self.radar
    }

    /// Heatmap renderer in use.
    pub fn heatmap(&self) -> &HeatmapRenderer {
        &self.heatmap
    }

    /// Start a loop on `surface`, cancelling any loop already running there.
    ///
    /// The returned token stops the new loop cooperatively at its next frame.
    pub fn start(&mut self, surface: impl Into<SurfaceId>, data: ChartData) -> CancelToken {
        let surface = surface.into();
        if let Some(prev) = self.loops.remove(&surface) {
            prev.token.cancel();
            tracing::debug!(%surface, kind = prev.data.kind(), "cancelled previous loop");
        }

        let interval = match &data {
            ChartData::Radar(_) => self.radar.config().frame_interval_ms(),
            ChartData::Heatmap(_) => self.heatmap.config().frame_interval_ms(),
        };
        let token = CancelToken::new();
        tracing::debug!(%surface, kind = data.kind(), ?interval, "loop started");
        self.loops.insert(
            surface,
            ActiveLoop {
                token: token.clone(),
                data,
                started_ms: None,
                throttle: FrameThrottle::new(interval),
                next_frame: FrameIndex(0),
            },
        );
        token
    }

    /// Stop the loop on `surface`. Returns whether one was running; stopping an idle id is a
    /// no-op.
    pub fn stop(&mut self, surface: &SurfaceId) -> bool {
        match self.loops.remove(surface) {
            Some(l) => {
                l.token.cancel();
                tracing::debug!(%surface, "loop stopped");
                true
            }
            None => false,
        }
    }

    /// Stop every loop.
    pub fn stop_all(&mut self) {
        for (surface, l) in std::mem::take(&mut self.loops) {
            l.token.cancel();
            tracing::debug!(%surface, "loop stopped");
        }
    }

    /// Swap the data of a running loop without restarting it (time and frame count carry on).
    ///
    /// Returns `false` when no loop runs on `surface`.
    pub fn set_data(&mut self, surface: &SurfaceId, data: ChartData) -> bool {
        let Some(l) = self.loops.get_mut(surface) else {
            return false;
        };
        if l.data.kind() != data.kind() {
            tracing::debug!(%surface, from = l.data.kind(), to = data.kind(), "loop switched chart kind");
        }
        l.data = data;
        true
    }

    /// Whether a live loop runs on `surface`.
    pub fn is_active(&self, surface: &SurfaceId) -> bool {
        self.loops
            .get(surface)
            .is_some_and(|l| !l.token.is_cancelled())
    }

    /// Number of live loops.
    pub fn active_count(&self) -> usize {
        self.loops
            .values()
            .filter(|l| !l.token.is_cancelled())
            .count()
    }

    /// Data the loop on `surface` currently draws.
    pub fn data(&self, surface: &SurfaceId) -> Option<&ChartData> {
        self.loops.get(surface).map(|l| &l.data)
    }

    /// Advance every loop by one display refresh at host time `now_ms`.
    ///
    /// Surfaces are visited in id order. Nothing here fails: render and sink errors are logged
    /// and reported, and loops whose surface is gone end quietly.
    pub fn tick(
        &mut self,
        now_ms: f64,
        surfaces: &mut SurfaceRegistry,
        backend: &mut dyn RenderBackend,
        sink: &mut dyn FrameSink,
    ) -> TickReport {
        let Self {
            radar,
            heatmap,
            loops,
        } = self;
        let mut report = TickReport::default();

        for (surface, l) in loops.iter_mut() {
            if l.token.is_cancelled() {
                tracing::debug!(%surface, "loop cancelled");
                report.ended.push(surface.clone());
                continue;
            }
            let Some(target) = surfaces.get_mut(surface) else {
                tracing::debug!(%surface, "surface gone, loop ended");
                l.token.cancel();
                report.ended.push(surface.clone());
                continue;
            };
            if !l.throttle.is_due(now_ms) {
                report.throttled.push(surface.clone());
                continue;
            }

            let started = match l.started_ms {
                Some(s) => s,
                None if now_ms.is_finite() => *l.started_ms.insert(now_ms),
                None => now_ms,
            };
            // A NaN reading gives t = 0.
            let t_ms = (now_ms - started).max(0.0);
            let rendered = match &l.data {
                ChartData::Radar(d) => radar.render(target, backend, d, t_ms),
                ChartData::Heatmap(d) => heatmap.render(target, backend, d, t_ms),
            };

            let idx = l.next_frame;
            let outcome = rendered.and_then(|frame| sink.push_frame(surface, idx, &frame));
            match outcome {
                Ok(()) => {
                    l.throttle.mark(now_ms);
                    l.next_frame = FrameIndex(idx.0 + 1);
                    report.rendered.push((surface.clone(), idx));
                }
                Err(err) => {
                    tracing::warn!(%surface, frame = idx.0, error = %err, "frame failed");
                    report.failed.push(surface.clone());
                }
            }
        }

        for surface in &report.ended {
            loops.remove(surface);
        }
        report
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/controller.rs"]
mod tests;
