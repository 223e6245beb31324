/// Skips frames until a minimum interval has passed since the last completed frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct FrameThrottle {
    interval_ms: Option<f64>,
    last_frame_ms: Option<f64>,
}

impl FrameThrottle {
    /// `None` lets every tick through.
    pub(crate) fn new(interval_ms: Option<f64>) -> Self {
        Self {
            interval_ms: interval_ms.filter(|ms| ms.is_finite() && *ms > 0.0),
            last_frame_ms: None,
        }
    }

    /// Whether a frame may be drawn at `now_ms`. A clock that ran backwards counts as due; a
    /// non-finite timestamp is only due before the first frame.
    pub(crate) fn is_due(&self, now_ms: f64) -> bool {
        match (self.interval_ms, self.last_frame_ms) {
            (None, _) | (_, None) => true,
            _ if !now_ms.is_finite() => false,
            (Some(interval), Some(last)) => now_ms < last || now_ms - last >= interval,
        }
    }

    /// Record a completed frame. Non-finite timestamps are not recorded.
    pub(crate) fn mark(&mut self, now_ms: f64) {
        if now_ms.is_finite() {
            self.last_frame_ms = Some(now_ms);
        }
    }
}
