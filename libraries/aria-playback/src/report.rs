//! Play reporting seam
//!
//! The catalog counts a play once a track has been listened to for a few
//! seconds. The engine decides *when*; a [`PlayReporter`] decides *how*.
//! Reporting is fire-and-forget: implementors must not block and must
//! swallow their own failures.

/// Receives play notifications from the engine
pub trait PlayReporter {
    /// A track crossed the listening threshold
    fn report_play(&self, track_id: &str);
}

impl<F> PlayReporter for F
where
    F: Fn(&str),
{
    fn report_play(&self, track_id: &str) {
        self(track_id);
    }
}

/// Tracks whether the current activation has been reported
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ReportGate {
    reported: bool,
}

impl ReportGate {
    /// New activation: eligible again
    pub(crate) fn reset(&mut self) {
        self.reported = false;
    }

    /// Returns `true` exactly once per activation, when `progress` first
    /// reaches `threshold`
    pub(crate) fn should_report(&mut self, progress: f64, threshold: f64) -> bool {
        if self.reported || progress < threshold {
            return false;
        }
        self.reported = true;
        true
    }
}
