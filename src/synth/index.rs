use crate::foundation::core::AXIS_COUNT;
use crate::synth::engine::MetricSet;
use crate::synth::modes::Mode;

/// Largest trend movement reported between two indices.
pub const MAX_TREND_DELTA: i32 = 25;

/// Per-mode aggregate scores feeding the weighted overall index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ModeAggregates {
    /// Health aggregate.
    pub health: u8,
    /// Skin aggregate.
    pub skin: u8,
    /// Fortune aggregate.
    pub fortune: u8,
    /// Psychology aggregate.
    pub psychology: u8,
}

impl ModeAggregates {
    /// Build from `[health, skin, fortune, psychology]`.
    pub fn from_array(values: [u8; 4]) -> Self {
        let [health, skin, fortune, psychology] = values;
        Self {
            health,
            skin,
            fortune,
            psychology,
        }
    }

    /// Aggregate for one mode.
    pub fn get(&self, mode: Mode) -> u8 {
        match mode {
            Mode::Health => self.health,
            Mode::Skin => self.skin,
            Mode::Fortune => self.fortune,
            Mode::Psychology => self.psychology,
        }
    }
}

/// Weighted blend of the four mode aggregates, rounded and clamped to `[0, 100]`.
pub fn overall_index(aggregates: &ModeAggregates) -> u8 {
    let blended: f64 = Mode::ALL
        .iter()
        .map(|&m| f64::from(aggregates.get(m)) * m.index_weight())
        .sum();
    blended.round().clamp(0.0, 100.0) as u8
}

/// Flat mean of one set's ten metrics.
///
/// Alternative to [`overall_index`]; also used as the per-mode aggregate.
pub fn flat_index(set: &MetricSet) -> u8 {
    let sum: f64 = set.scores().iter().map(|s| f64::from(s.value)).sum();
    (sum / AXIS_COUNT as f64).round().clamp(0.0, 100.0) as u8
}

/// Signed change from `previous` to `current`, clamped to `[-25, 25]`.
pub fn trend_delta(current: u8, previous: u8) -> i32 {
    (i32::from(current) - i32::from(previous)).clamp(-MAX_TREND_DELTA, MAX_TREND_DELTA)
}

/// Direction of a trend delta.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    /// Index rose.
    Up,
    /// Index fell.
    Down,
    /// No change, or no previous index.
    Flat,
}

impl Trend {
    /// Classify a delta.
    pub fn from_delta(delta: i32) -> Self {
        match delta.signum() {
            1 => Self::Up,
            -1 => Self::Down,
            _ => Self::Flat,
        }
    }
}

/// Qualitative band for an index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusBand {
    /// 85 and above.
    Excellent,
    /// 75..85.
    Optimizing,
    /// 65..75.
    Improvable,
    /// 55..65.
    Warning,
    /// Below 55.
    Imbalanced,
}

impl StatusBand {
    /// Band containing `idx`.
    pub fn from_index(idx: u8) -> Self {
        match idx {
            85.. => Self::Excellent,
            75..=84 => Self::Optimizing,
            65..=74 => Self::Improvable,
            55..=64 => Self::Warning,
            _ => Self::Imbalanced,
        }
    }

    /// Stable key a host can localize.
    pub fn key(self) -> &'static str {
        match self {
            Self::Excellent => "label.excellent",
            Self::Optimizing => "label.optimize",
            Self::Improvable => "label.improvable",
            Self::Warning => "label.warning",
            Self::Imbalanced => "label.imbalanced",
        }
    }
}

/// Remaining headroom, `clamp(100 - idx, 5, 40)`.
pub fn potential(idx: u8) -> u8 {
    (100 - i32::from(idx.min(100))).clamp(5, 40) as u8
}

/// Age shifted by how far the index sits from 50 (one year per five points).
///
/// `None` when `age_field` is not a positive finite number.
pub fn biological_age(age_field: &str, idx: u8) -> Option<u32> {
    let age: f64 = age_field.trim().parse().ok()?;
    if !age.is_finite() || age <= 0.0 {
        return None;
    }
    let shift = (f64::from(idx) - 50.0) / 5.0;
    Some((age - shift).round().max(0.0) as u32)
}
