//! Padding and truncation of caller-supplied chart data to exactly [`AXIS_COUNT`] entries.

use std::collections::BTreeMap;

use crate::chart::layout::ZoneKey;
use crate::foundation::core::AXIS_COUNT;

/// One drawable axis or zone after normalization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ChartItem {
    pub(crate) name: String,
    pub(crate) score: u8,
}

/// Clamp a raw value into an integer score; non-finite values count as 0.
pub(crate) fn score_from_raw(raw: f64) -> u8 {
    if raw.is_finite() {
        raw.clamp(0.0, 100.0).round() as u8
    } else {
        0
    }
}

/// Radar items: extra entries are dropped, missing ones become `"Metric {n}"` at `pad_score`.
pub(crate) fn radar_items(labels: &[String], values: &[f64], pad_score: u8) -> Vec<ChartItem> {
    (0..AXIS_COUNT)
        .map(|i| ChartItem {
            name: labels
                .get(i)
                .filter(|s| !s.trim().is_empty())
                .cloned()
                .unwrap_or_else(|| format!("Metric {}", i + 1)),
            score: values.get(i).map_or(pad_score.min(100), |&v| score_from_raw(v)),
        })
        .collect()
}

/// Heatmap items in zone order: missing scores become `pad_score`, missing labels the zone name.
pub(crate) fn heatmap_items(
    scores: &BTreeMap<ZoneKey, f64>,
    labels: &[String],
    pad_score: u8,
) -> Vec<ChartItem> {
    ZoneKey::ALL
        .iter()
        .enumerate()
        .map(|(i, zone)| ChartItem {
            name: labels
                .get(i)
                .filter(|s| !s.trim().is_empty())
                .cloned()
                .unwrap_or_else(|| zone.display_name().to_owned()),
            score: scores
                .get(zone)
                .map_or(pad_score.min(100), |&v| score_from_raw(v)),
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/chart/normalize.rs"]
mod tests;
