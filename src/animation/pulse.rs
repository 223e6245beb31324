//! Cosmetic breathing curves. None of these ever change a represented score.

/// Radar phase advance per millisecond (0.22 rad per frame at 12 fps).
pub const RADAR_PHASE_PER_MS: f64 = 0.22 * 12.0 / 1000.0;

/// Phase offset between neighbouring radar nodes.
pub const RADAR_NODE_PHASE_STEP: f64 = 0.55;

/// Milliseconds per radian of hotspot oscillation.
pub const HOTSPOT_MS_PER_RADIAN: f64 = 420.0;

/// Phase offset between neighbouring hotspots.
pub const HOTSPOT_PHASE_STEP: f64 = 0.7;

/// Whole-polygon radar breath in `[0.3, 1.0]`.
pub fn radar_breath(t_ms: f64) -> f64 {
    0.65 + 0.35 * (t_ms * RADAR_PHASE_PER_MS).sin()
}

/// Breath of radar node `i`, a travelling wave over [`radar_breath`].
pub fn radar_node_pulse(t_ms: f64, i: usize) -> f64 {
    0.65 + 0.35 * (t_ms * RADAR_PHASE_PER_MS + RADAR_NODE_PHASE_STEP * i as f64).sin()
}

/// Breath of hotspot `i` in `[0.7, 1.0]`.
pub fn hotspot_pulse(t_ms: f64, i: usize) -> f64 {
    0.85 + 0.15 * (t_ms / HOTSPOT_MS_PER_RADIAN + HOTSPOT_PHASE_STEP * i as f64).sin()
}
