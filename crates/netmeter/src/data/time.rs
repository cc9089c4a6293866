use serde::{Deserialize, Serialize};

/// Wall-clock bounds of one exchange, in epoch milliseconds.
///
/// Captured by the caller around the underlying HTTP call; the end time marks
/// the arrival of the response head, not the end of body consumption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeInterval {
    pub start_time: i64,
    pub end_time:   i64,
}

impl TimeInterval {
    pub fn new(start_time: i64, end_time: i64) -> Self {
        Self {
            start_time,
            end_time,
        }
    }

    /// Current wall-clock time in epoch milliseconds.
    pub fn now_millis() -> i64 { chrono::Utc::now().timestamp_millis() }

    /// Elapsed milliseconds, clamped at zero for clocks that step backwards.
    pub fn duration_ms(&self) -> i64 { self.end_time.saturating_sub(self.start_time).max(0) }
}
