//! Progress reporting for a running solve.

use anyhow::Result;
use forge_core::{ProgressInfo, SolveStats, WfcError};
use std::time::{Duration, Instant};

/// Trait for reporting the progress of the WFC algorithm.
///
/// Implementors of this trait can display progress information in various ways
/// (e.g., console output, a log file).
pub trait ProgressReporter: Send + Sync {
    /// Called after every successful collapse with updated progress information.
    fn report(&mut self, info: &ProgressInfo) -> Result<()>;

    /// Called when the WFC process completes successfully.
    fn finish(&mut self, stats: &SolveStats) -> Result<()>;

    /// Called when the WFC process fails with an error.
    fn fail(&mut self, error: &WfcError) -> Result<()>;
}

/// A `ProgressReporter` that logs status updates at most once per interval.
pub struct ConsoleProgressReporter {
    start_time: Instant,
    last_report_time: Instant,
    report_interval: Duration,
    reports: u64,
}

impl ConsoleProgressReporter {
    /// Reports at most once per `report_interval`.
    pub fn new(report_interval: Duration) -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_report_time: now,
            report_interval,
            reports: 0,
        }
    }

    /// Number of progress lines emitted so far.
    pub const fn reports(&self) -> u64 {
        self.reports
    }

    fn format_duration(duration: Duration) -> String {
        format!("{}.{:03}s", duration.as_secs(), duration.subsec_millis())
    }
}

impl ProgressReporter for ConsoleProgressReporter {
    fn report(&mut self, info: &ProgressInfo) -> Result<()> {
        let now = Instant::now();
        if now.duration_since(self.last_report_time) < self.report_interval {
            return Ok(());
        }

        let percentage = if info.total_cells > 0 {
            (info.collapsed_cells as f32 / info.total_cells as f32) * 100.0
        } else {
            100.0
        };
        log::info!(
            "Progress: Iter: {} | Collapsed: {}/{} ({:.1}%) | Restarts: {} | Rollbacks: {} | Elapsed: {}",
            info.iterations,
            info.collapsed_cells,
            info.total_cells,
            percentage,
            info.restarts,
            info.rollbacks,
            Self::format_duration(info.elapsed_time)
        );

        self.last_report_time = now;
        self.reports += 1;
        Ok(())
    }

    fn finish(&mut self, stats: &SolveStats) -> Result<()> {
        log::info!(
            "WFC finished successfully after {} iterations, {} restarts and {} rollbacks. Total time: {}",
            stats.iterations,
            stats.restarts,
            stats.rollbacks,
            Self::format_duration(self.start_time.elapsed())
        );
        Ok(())
    }

    fn fail(&mut self, error: &WfcError) -> Result<()> {
        log::error!(
            "WFC failed: {}. Total time: {}",
            error,
            Self::format_duration(self.start_time.elapsed())
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn info(iterations: u64, collapsed_cells: usize, total_cells: usize) -> ProgressInfo {
        ProgressInfo {
            collapsed_cells,
            total_cells,
            elapsed_time: Duration::from_secs(1),
            iterations,
            restarts: 0,
            rollbacks: 0,
        }
    }

    #[test]
    fn test_console_reporter_throttles() {
        let mut reporter = ConsoleProgressReporter::new(Duration::from_millis(50));
        assert!(reporter.report(&info(10, 50, 1000)).is_ok());
        assert_eq!(reporter.reports(), 0);

        thread::sleep(Duration::from_millis(60));
        assert!(reporter.report(&info(20, 100, 1000)).is_ok());
        assert_eq!(reporter.reports(), 1);

        // Immediately after a report the next one is throttled again.
        assert!(reporter.report(&info(21, 101, 1000)).is_ok());
        assert_eq!(reporter.reports(), 1);
    }

    #[test]
    fn test_console_reporter_zero_cells() {
        let mut reporter = ConsoleProgressReporter::new(Duration::ZERO);
        assert!(reporter.report(&info(0, 0, 0)).is_ok());
        assert_eq!(reporter.reports(), 1);
        assert!(reporter.finish(&SolveStats::default()).is_ok());
        assert!(reporter.fail(&WfcError::Interrupted).is_ok());
    }
}
