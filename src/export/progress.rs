use std::time::{Duration, Instant};

/// One progress sample as shown to the user.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ExportProgress {
    /// Whole percent in `0..=100`.
    pub percent: u8,
    /// `"{m}m {s}s remaining"`, absent until an estimate exists.
    pub remaining: Option<String>,
}

/// Completion ratio in percent, unrounded and clamped to `0.0..=100.0`.
///
/// A zero or unknown duration reports no progress.
pub fn progress_ratio(current_secs: f64, duration_secs: f64) -> f64 {
    if duration_secs.is_nan() || duration_secs <= 0.0 || !current_secs.is_finite() {
        return 0.0;
    }
    (current_secs / duration_secs * 100.0).clamp(0.0, 100.0)
}

/// Completion in whole percent (`round(current / duration * 100)`).
pub fn progress_percent(current_secs: f64, duration_secs: f64) -> u8 {
    progress_ratio(current_secs, duration_secs).round() as u8
}

/// `elapsed / (progress / 100) - elapsed`; `None` while progress is zero or the estimate is not
/// positive.
pub fn estimate_remaining(elapsed: Duration, progress: f64) -> Option<Duration> {
    if progress.is_nan() || progress <= 0.0 {
        return None;
    }
    let elapsed = elapsed.as_secs_f64();
    let remaining = elapsed / (progress / 100.0) - elapsed;
    if remaining > 0.0 && remaining.is_finite() {
        Some(Duration::from_secs_f64(remaining))
    } else {
        None
    }
}

/// Render a remaining-time estimate, e.g. `"1m 5s remaining"`.
pub fn format_remaining(remaining: Duration) -> String {
    let total = remaining.as_secs();
    format!("{}m {}s remaining", total / 60, total % 60)
}

/// Samples clone playback time once per tick and derives percent and remaining time.
#[derive(Clone, Debug)]
pub struct ProgressTracker {
    started: Instant,
    last_percent: Option<u8>,
}

impl ProgressTracker {
    /// Measure elapsed time from `started`, normally the job's recording start.
    pub fn since(started: Instant) -> Self {
        Self {
            started,
            last_percent: None,
        }
    }

    /// Sample against the real wall clock.
    pub fn sample(&mut self, current_secs: f64, duration_secs: f64) -> ExportProgress {
        let elapsed = self.started.elapsed();
        self.sample_with_elapsed(current_secs, duration_secs, elapsed)
    }

    /// Sample with an explicit elapsed time.
    pub fn sample_with_elapsed(
        &mut self,
        current_secs: f64,
        duration_secs: f64,
        elapsed: Duration,
    ) -> ExportProgress {
        let ratio = progress_ratio(current_secs, duration_secs);
        let percent = ratio.round() as u8;
        if self.last_percent != Some(percent) {
            tracing::debug!(percent, "export progress");
            self.last_percent = Some(percent);
        }
        ExportProgress {
            percent,
            remaining: estimate_remaining(elapsed, ratio).map(format_remaining),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/progress.rs"]
mod tests;
