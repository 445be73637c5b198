//! Outcomes, the tabular report artifact, and run summaries.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Terminal status of one simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The simulator ran the test to completion and it passed
    Passed,

    /// The test ran and reported a genuine failure
    Failed,

    /// Infrastructure problem: the backend could not deliver a verdict
    /// (spawn failure, simulator crash, timeout, ambiguous exit)
    Error,

    /// Never dispatched (dry run, or early exit after a prior failure)
    Skipped,
}

impl Status {
    /// Returns the report label.
    pub fn name(&self) -> &'static str {
        match self {
            Status::Passed => "passed",
            Status::Failed => "failed",
            Status::Error => "error",
            Status::Skipped => "skipped",
        }
    }

    /// True for statuses that trigger the early-exit policy.
    pub fn stops_dispatch(&self) -> bool {
        matches!(self, Status::Failed | Status::Error)
    }
}

/// Result of executing one simulation. Produced by the scheduler,
/// immutable afterwards.
#[derive(Debug, Clone)]
pub struct Outcome {
    /// Test identifier
    pub id: String,

    /// Terminal status
    pub status: Status,

    /// Wall-clock duration of the child process
    pub duration: Duration,

    /// Captured stdout/stderr, when the simulation was dispatched
    pub log: Option<PathBuf>,

    /// Child exit code, when it exited normally
    pub exit_code: Option<i32>,
}

impl Outcome {
    /// Synthetic outcome for a simulation that was never dispatched.
    pub fn skipped(id: String) -> Self {
        Self {
            id,
            status: Status::Skipped,
            duration: Duration::ZERO,
            log: None,
            exit_code: None,
        }
    }
}

/// Aggregate counts for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
    pub skipped: usize,
}

impl Summary {
    /// Tallies the outcome set.
    pub fn of(outcomes: &[Outcome]) -> Self {
        let mut summary = Summary::default();
        for outcome in outcomes {
            match outcome.status {
                Status::Passed => summary.passed += 1,
                Status::Failed => summary.failed += 1,
                Status::Error => summary.errors += 1,
                Status::Skipped => summary.skipped += 1,
            }
        }
        summary
    }

    /// Derives the process exit status.
    ///
    /// 0 only when no outcome failed or errored (skips are exempt), 1 for
    /// genuine test failures, 2 when any infrastructure error occurred.
    pub fn exit_code(&self) -> i32 {
        if self.errors > 0 {
            2
        } else if self.failed > 0 {
            1
        } else {
            0
        }
    }
}

/// Writes the tabular report: one CSV row per test, in catalog order.
///
/// Log paths are reported relative to `run_root` so the artifact stays
/// stable across checkouts; skipped tests get an empty log column.
pub fn write_report(outcomes: &[Outcome], run_root: &Path, path: &Path) -> io::Result<()> {
    let mut file = File::create(path)?;
    writeln!(file, "test,status,duration_secs,log")?;
    for outcome in outcomes {
        let log = outcome
            .log
            .as_deref()
            .map(|p| p.strip_prefix(run_root).unwrap_or(p).display().to_string())
            .unwrap_or_default();
        writeln!(
            file,
            "{},{},{:.3},{}",
            outcome.id,
            outcome.status.name(),
            outcome.duration.as_secs_f64(),
            log
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(id: &str, status: Status) -> Outcome {
        Outcome {
            id: id.to_string(),
            status,
            duration: Duration::from_millis(1500),
            log: Some(PathBuf::from(format!("runs/{id}/sim.log"))),
            exit_code: Some(0),
        }
    }

    #[test]
    fn exit_status_is_zero_only_without_failures_and_errors() {
        let clean = Summary::of(&[outcome("a", Status::Passed), outcome("b", Status::Passed)]);
        assert_eq!(clean.exit_code(), 0);

        let with_failure = Summary::of(&[outcome("a", Status::Passed), outcome("b", Status::Failed)]);
        assert_eq!(with_failure.exit_code(), 1);

        let with_error = Summary::of(&[
            outcome("a", Status::Failed),
            outcome("b", Status::Error),
        ]);
        assert_eq!(with_error.exit_code(), 2);
    }

    #[test]
    fn skips_are_exempt_from_the_exit_status() {
        let summary = Summary::of(&[
            outcome("a", Status::Passed),
            Outcome::skipped("b".to_string()),
            Outcome::skipped("c".to_string()),
        ]);
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.exit_code(), 0);
    }

    #[test]
    fn early_exit_triggers_on_failures_and_errors_only() {
        assert!(Status::Failed.stops_dispatch());
        assert!(Status::Error.stops_dispatch());
        assert!(!Status::Passed.stops_dispatch());
        assert!(!Status::Skipped.stops_dispatch());
    }

    #[test]
    fn report_rows_follow_outcome_order_with_relative_logs() {
        let dir = tempfile::tempdir().unwrap();
        let report = dir.path().join("report.csv");
        let run_root = PathBuf::from("runs");

        let outcomes = vec![
            outcome("boot", Status::Passed),
            outcome("matmul", Status::Failed),
            Outcome::skipped("fft".to_string()),
        ];
        write_report(&outcomes, &run_root, &report).unwrap();

        let text = std::fs::read_to_string(&report).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "test,status,duration_secs,log");
        assert_eq!(lines[1], "boot,passed,1.500,boot/sim.log");
        assert_eq!(lines[2], "matmul,failed,1.500,matmul/sim.log");
        assert_eq!(lines[3], "fft,skipped,0.000,");
    }
}
