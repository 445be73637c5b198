//! Hardware-in-the-loop test orchestration.
//!
//! `hilsim_core` takes a declarative list of test binaries, binds each to
//! one of several interchangeable simulator backends, executes them under
//! a bounded process pool, and aggregates per-test outcomes into a tabular
//! report and a derived exit status.
//!
//! # Pipeline
//!
//! ```text
//! catalog::load ──► sim::materialize ──► scheduler::execute ──► report
//!                         ▲
//!                 BackendRegistry
//!     (questa | vcs | verilator | spike | gvsoc)
//! ```
//!
//! Per-test input generation, golden-model verification, and ELF symbol
//! inspection are external collaborators; to the orchestrator a test is an
//! opaque binary whose exit the backend interprets as a verdict. Tests are
//! independent: there is no dependency scheduling, and concurrency is
//! bounded to one host's process pool.

pub mod backend;
pub mod catalog;
pub mod config;
pub mod error;
pub mod report;
pub mod scheduler;
pub mod sim;

mod gvsoc;
mod questa;
mod spike;
mod vcs;
mod verilator;

pub use backend::{Backend, BackendKind, BackendRegistry, Invocation};
pub use catalog::TestSpec;
pub use config::RunConfig;
pub use error::{CatalogError, ConfigError};
pub use gvsoc::GvsocBackend;
pub use questa::QuestaBackend;
pub use report::{Outcome, Status, Summary};
pub use sim::{materialize, Simulation};
pub use spike::SpikeBackend;
pub use vcs::VcsBackend;
pub use verilator::VerilatorBackend;
