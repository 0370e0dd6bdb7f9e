use std::sync::Mutex;

/// Percent where the frame-generation band starts. The range below is
/// reserved for input parsing and probing by the job driver.
pub const FRAME_BAND_START: i32 = 10;
/// Width of the frame-generation band; frame work ends at 80%, leaving the
/// rest for the muxing collaborator.
pub const FRAME_BAND_SPAN: i32 = 70;

/// Emit a progress report every this many completed frames (the final frame
/// always reports).
pub(crate) const REPORT_EVERY: u64 = 10;

/// One progress update. `percent` is `-1` for a fatal error, `0..=100`
/// otherwise.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgressReport {
    pub percent: i32,
    pub message: String,
}

/// Passive progress consumer.
///
/// Contract: `percent` is monotonically non-decreasing per job, except for a
/// single terminal `-1` fatal signal which supersedes all later calls.
pub trait ProgressSink: Send + Sync {
    fn report(&self, percent: i32, message: &str);
}

/// Sink that drops every report.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn report(&self, _percent: i32, _message: &str) {}
}

/// Sink that records every report, for tests and debugging.
#[derive(Debug, Default)]
pub struct CollectingProgress {
    reports: Mutex<Vec<ProgressReport>>,
}

impl CollectingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all reports received so far, in call order.
    pub fn reports(&self) -> Vec<ProgressReport> {
        self.reports.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl ProgressSink for CollectingProgress {
    fn report(&self, percent: i32, message: &str) {
        if let Ok(mut reports) = self.reports.lock() {
            reports.push(ProgressReport {
                percent,
                message: message.to_string(),
            });
        }
    }
}

/// Map a completed-frame count into the `[10, 80]` band.
pub(crate) fn frame_band_percent(completed: u64, total: u64) -> i32 {
    if total == 0 {
        return FRAME_BAND_START;
    }
    FRAME_BAND_START + ((completed as f64 / total as f64) * f64::from(FRAME_BAND_SPAN)) as i32
}
