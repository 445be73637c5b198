//! Error types for the orchestrator.
//!
//! Only problems that must abort before any execution are modeled as
//! `Err`: a malformed catalog or an invalid run configuration. Failures of
//! individual simulations are recorded as `Outcome` values and never
//! propagate to sibling tests.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading the test catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read
    #[error("failed to read catalog {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    /// The document is not valid TOML
    #[error("failed to parse catalog {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// The document has no `runs` collection
    #[error("catalog {} has no [[runs]] entries", .path.display())]
    MissingRuns { path: PathBuf },

    /// A run entry lacks its binary path
    #[error("run entry #{index} in {} is missing the `elf` field", .path.display())]
    MissingElf { path: PathBuf, index: usize },
}

/// Errors raised while resolving the run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The requested backend is not in the registry
    #[error("unknown backend `{name}` (available: {known})")]
    UnknownBackend { name: String, known: String },

    /// The worker pool must have at least one slot
    #[error("worker pool size must be at least 1, got {0}")]
    InvalidPoolSize(usize),
}
