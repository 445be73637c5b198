//! Backend adapter interface and registry.
//!
//! A backend translates an abstract "run this binary" request into a
//! concrete simulator invocation and interprets the finished child process
//! as a verdict. Backends hold only their simulator executable path, fixed
//! at construction, so one instance is safely shared across worker
//! threads.

use crate::catalog::TestSpec;
use crate::error::ConfigError;
use crate::gvsoc::GvsocBackend;
use crate::questa::QuestaBackend;
use crate::report::Status;
use crate::spike::SpikeBackend;
use crate::vcs::VcsBackend;
use crate::verilator::VerilatorBackend;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

/// A fully resolved simulator command: program, argument vector, and
/// environment overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.env {
            write!(f, "{}={} ", key, value)?;
        }
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Capability interface over one simulator technology.
pub trait Backend: Send + Sync {
    /// Registry key for this backend.
    fn name(&self) -> &'static str;

    /// Builds the invocation for one test.
    ///
    /// Deterministic for a given spec and run directory; backend-specific
    /// flags (trace dumps, verbosity) derive only from those inputs.
    fn build_invocation(&self, spec: &TestSpec, run_dir: &Path, verbose: bool) -> Invocation;

    /// Interprets a finished child process as a verdict.
    ///
    /// The default policy maps exit 0 to `Passed` and any other code to
    /// `Failed`. A missing exit code (the child died on a signal) is
    /// ambiguous and reports `Error` so infrastructure problems stay
    /// distinguishable from genuine regressions.
    fn classify(&self, exit_code: Option<i32>, log: &str) -> Status {
        let _ = log;
        default_classify(exit_code)
    }
}

/// Exit-code-only classification shared by backends without a crash
/// signature of their own.
pub fn default_classify(exit_code: Option<i32>) -> Status {
    match exit_code {
        Some(0) => Status::Passed,
        Some(_) => Status::Failed,
        None => Status::Error,
    }
}

/// Backend identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Questa-style RTL simulator driven through `vsim -c`
    Questa,

    /// VCS-style compiled simulator binary (`simv`)
    Vcs,

    /// Verilated testbench model
    Verilator,

    /// ISA-level instruction emulator (`spike`)
    Spike,

    /// Event-driven platform simulator (`gvsoc`)
    Gvsoc,
}

impl BackendKind {
    /// Returns a list of all backends.
    pub fn all() -> Vec<BackendKind> {
        vec![
            BackendKind::Questa,
            BackendKind::Vcs,
            BackendKind::Verilator,
            BackendKind::Spike,
            BackendKind::Gvsoc,
        ]
    }

    /// Returns the registry key.
    pub fn name(&self) -> &'static str {
        match self {
            BackendKind::Questa => "questa",
            BackendKind::Vcs => "vcs",
            BackendKind::Verilator => "verilator",
            BackendKind::Spike => "spike",
            BackendKind::Gvsoc => "gvsoc",
        }
    }

    /// Returns a description of the backend.
    pub fn description(&self) -> &'static str {
        match self {
            BackendKind::Questa => "Questa/ModelSim RTL simulation in batch mode",
            BackendKind::Vcs => "VCS compiled simulator binary",
            BackendKind::Verilator => "Verilated cycle-accurate testbench model",
            BackendKind::Spike => "Spike instruction-accurate ISA emulator",
            BackendKind::Gvsoc => "GVSoC event-driven platform simulator",
        }
    }

    /// Default simulator executable, resolved from `PATH` unless
    /// overridden at construction.
    fn default_exe(&self) -> PathBuf {
        PathBuf::from(match self {
            BackendKind::Questa => "vsim",
            BackendKind::Vcs => "simv",
            BackendKind::Verilator => "Vtop",
            BackendKind::Spike => "spike",
            BackendKind::Gvsoc => "gvsoc",
        })
    }

    /// Constructs the adapter for this kind, optionally overriding the
    /// simulator executable.
    pub fn instantiate(&self, exe: Option<PathBuf>) -> Arc<dyn Backend> {
        let exe = exe.unwrap_or_else(|| self.default_exe());
        match self {
            BackendKind::Questa => Arc::new(QuestaBackend::new(exe)),
            BackendKind::Vcs => Arc::new(VcsBackend::new(exe)),
            BackendKind::Verilator => Arc::new(VerilatorBackend::new(exe)),
            BackendKind::Spike => Arc::new(SpikeBackend::new(exe)),
            BackendKind::Gvsoc => Arc::new(GvsocBackend::new(exe)),
        }
    }
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BackendKind::all()
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ConfigError::UnknownBackend {
                name: s.to_string(),
                known: BackendKind::all()
                    .iter()
                    .map(|kind| kind.name())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

/// Fixed name→instance table, built once per invocation and passed
/// explicitly to whoever needs a backend. There is no ambient global
/// lookup.
pub struct BackendRegistry {
    table: BTreeMap<&'static str, Arc<dyn Backend>>,
}

impl BackendRegistry {
    /// Builds the standard registry with default executable paths.
    pub fn standard() -> Self {
        let mut registry = Self {
            table: BTreeMap::new(),
        };
        for kind in BackendKind::all() {
            registry.register(kind.instantiate(None));
        }
        registry
    }

    /// Replaces (or adds) a backend under its own name.
    pub fn register(&mut self, backend: Arc<dyn Backend>) {
        self.table.insert(backend.name(), backend);
    }

    /// Looks up a backend. Selecting an unknown name is a configuration
    /// error, caught before any execution starts.
    pub fn get(&self, name: &str) -> Result<Arc<dyn Backend>, ConfigError> {
        self.table
            .get(name)
            .cloned()
            .ok_or_else(|| ConfigError::UnknownBackend {
                name: name.to_string(),
                known: self.names().join(", "),
            })
    }

    /// Returns the registered names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        self.table.keys().copied().collect()
    }
}
