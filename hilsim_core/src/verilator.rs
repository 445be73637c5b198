//! Verilator-style adapter for verilated testbench models.

use crate::backend::{default_classify, Backend, Invocation};
use crate::catalog::TestSpec;
use crate::report::Status;
use std::path::{Path, PathBuf};

/// Runs a verilated model binary. The ELF and the trace dump path are
/// handed over as plusargs understood by the testbench harness.
pub struct VerilatorBackend {
    model: PathBuf,
}

impl VerilatorBackend {
    pub fn new(model: PathBuf) -> Self {
        Self { model }
    }
}

impl Backend for VerilatorBackend {
    fn name(&self) -> &'static str {
        "verilator"
    }

    fn build_invocation(&self, spec: &TestSpec, run_dir: &Path, verbose: bool) -> Invocation {
        let mut args = vec![
            format!("+firmware={}", spec.elf.display()),
            format!("+trace={}", run_dir.join("dump.vcd").display()),
        ];
        if verbose {
            args.push("+verbose".to_string());
        }
        args.extend(spec.args.iter().cloned());
        Invocation {
            program: self.model.clone(),
            args,
            env: Vec::new(),
        }
    }

    fn classify(&self, exit_code: Option<i32>, log: &str) -> Status {
        // A verilated model can report internal "%Error" diagnostics and
        // still exit 0; no verdict was delivered in that case.
        if exit_code == Some(0) && log.contains("%Error") {
            return Status::Error;
        }
        default_classify(exit_code)
    }
}
