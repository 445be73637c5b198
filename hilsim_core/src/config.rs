//! Resolved run configuration.

use crate::error::ConfigError;
use std::path::PathBuf;
use std::time::Duration;

/// Execution parameters for one orchestrator invocation. Built once from
/// the command line and read-only afterwards.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Registry key of the chosen backend
    pub backend: String,

    /// Worker pool size; 1 degrades to strictly sequential execution
    pub jobs: usize,

    /// Print invocations instead of running them
    pub dry_run: bool,

    /// Stop dispatching new simulations after the first failure or error
    pub early_exit: bool,

    /// Forward verbosity flags to the backend invocations
    pub verbose: bool,

    /// Optional wall-clock cap per simulation; on expiry the child is
    /// killed and the outcome records an error
    pub timeout: Option<Duration>,

    /// Root of the per-test run directory tree
    pub run_root: PathBuf,

    /// Path of the tabular report artifact
    pub report: PathBuf,
}

impl RunConfig {
    /// Creates a configuration with the defaults of the CLI surface.
    pub fn new(run_root: PathBuf) -> Self {
        Self {
            backend: "verilator".to_string(),
            jobs: 1,
            dry_run: false,
            early_exit: false,
            verbose: false,
            timeout: None,
            run_root,
            report: PathBuf::from("report.csv"),
        }
    }

    /// Rejects parameter combinations that must abort before execution.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jobs == 0 {
            return Err(ConfigError::InvalidPoolSize(self.jobs));
        }
        Ok(())
    }
}
