use crate::foundation::core::AXIS_COUNT;
use crate::synth::engine::{MetricSet, Seed, Snapshot, post_axis_stream, synthesize};
use crate::synth::index::{
    ModeAggregates, StatusBand, Trend, biological_age, overall_index, potential, trend_delta,
};
use crate::synth::modes::Mode;

/// Number of concern cards in a report.
pub const CONCERN_COUNT: usize = 3;

// Derived draws happen in this order after the axis draws: window days, expected lift, then one
// lift per concern card.
const DRAWS_BEFORE_CONCERNS: usize = 2;

/// One of the lowest-scoring metrics, flagged for attention.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ConcernCard {
    /// 1-based rank, 1 being the lowest score.
    pub rank: u8,
    /// Axis key.
    pub axis_id: String,
    /// Axis display name.
    pub display_name: String,
    /// The axis score.
    pub score: u8,
    /// Projected improvement in percent, in `[8, 20]`.
    pub expected_lift_pct: u32,
}

/// The three lowest metrics of `set`, ascending by score; ties keep axis order.
pub fn top_concerns(set: &MetricSet) -> Vec<ConcernCard> {
    let mut rng = post_axis_stream(set.seed());
    for _ in 0..DRAWS_BEFORE_CONCERNS {
        rng.next_u32();
    }

    let mut order: Vec<usize> = (0..set.scores().len()).collect();
    order.sort_by_key(|&i| set.scores()[i].value);

    order
        .into_iter()
        .take(CONCERN_COUNT)
        .enumerate()
        .map(|(rank, i)| {
            let m = &set.scores()[i];
            ConcernCard {
                rank: (rank + 1) as u8,
                axis_id: m.axis_id.clone(),
                display_name: m.display_name.clone(),
                score: m.value,
                expected_lift_pct: rng.next_in_range(8, 20),
            }
        })
        .collect()
}

/// Everything derived from one `(mode, snapshot)` analysis.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct AnalysisReport {
    /// Mode string as requested, before alias/fallback resolution.
    pub requested_mode: String,
    /// Resolved mode.
    pub mode: Mode,
    /// Synthesis seed.
    pub seed: Seed,
    /// The ten scores.
    pub metrics: MetricSet,
    /// This mode's index (flat mean of its metrics).
    pub index: u8,
    /// Band of `index`.
    pub band: StatusBand,
    /// Clamped change against the previous index, 0 when none was given.
    pub delta: i32,
    /// Direction of `delta`.
    pub trend: Trend,
    /// Remaining headroom in percent.
    pub potential: u8,
    /// Index-adjusted age, when the snapshot carries a usable age.
    pub biological_age: Option<u32>,
    /// Suggested follow-up window, `[14, 45]` days.
    pub window_days: u32,
    /// Overall projected lift, `[5, 18]` percent.
    pub expected_lift: u32,
    /// Lowest three metrics.
    pub concerns: Vec<ConcernCard>,
    /// Radar axis labels, one per metric.
    pub radar_axes: Vec<String>,
    /// Radar values, one per metric.
    pub radar_values: Vec<u8>,
}

/// Synthesize one mode and derive the full report.
///
/// Same inputs always produce the same report.
#[tracing::instrument(skip(snapshot))]
pub fn analyze(mode: &str, snapshot: &Snapshot, previous_index: Option<u8>) -> AnalysisReport {
    let metrics = synthesize(mode, snapshot);
    let index = metrics.aggregate();
    let delta = previous_index.map_or(0, |prev| trend_delta(index, prev));

    let mut rng = post_axis_stream(metrics.seed());
    let window_days = rng.next_in_range(14, 45);
    let expected_lift = rng.next_in_range(5, 18);

    let concerns = top_concerns(&metrics);
    let radar_axes = metrics.labels();
    let radar_values = metrics.values().to_vec();
    debug_assert_eq!(radar_values.len(), AXIS_COUNT);

    AnalysisReport {
        requested_mode: mode.to_owned(),
        mode: metrics.mode(),
        seed: metrics.seed(),
        index,
        band: StatusBand::from_index(index),
        delta,
        trend: Trend::from_delta(delta),
        potential: potential(index),
        biological_age: biological_age(snapshot.get("age"), index),
        window_days,
        expected_lift,
        concerns,
        radar_axes,
        radar_values,
        metrics,
    }
}

/// Cross-mode summary using the weighted overall index.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct OverallReport {
    /// Per-mode aggregates.
    pub aggregates: ModeAggregates,
    /// Weighted overall index.
    pub index: u8,
    /// Band of `index`.
    pub band: StatusBand,
    /// Clamped change against the previous overall index, 0 when none was given.
    pub delta: i32,
    /// Direction of `delta`.
    pub trend: Trend,
}

/// Synthesize all four modes and blend their aggregates.
pub fn analyze_all(snapshot: &Snapshot, previous_index: Option<u8>) -> OverallReport {
    let mut values = [0u8; 4];
    for (slot, mode) in values.iter_mut().zip(Mode::ALL) {
        *slot = synthesize(mode.key(), snapshot).aggregate();
    }
    let aggregates = ModeAggregates::from_array(values);
    let index = overall_index(&aggregates);
    let delta = previous_index.map_or(0, |prev| trend_delta(index, prev));

    OverallReport {
        aggregates,
        index,
        band: StatusBand::from_index(index),
        delta,
        trend: Trend::from_delta(delta),
    }
}
