//! Questa-style RTL simulator adapter.

use crate::backend::{default_classify, Backend, Invocation};
use crate::catalog::TestSpec;
use crate::report::Status;
use std::path::{Path, PathBuf};

/// Drives `vsim` in batch mode. The test ELF reaches the testbench through
/// the `+firmware` plusarg; the waveform log lands inside the run
/// directory so concurrent tests never collide.
pub struct QuestaBackend {
    vsim: PathBuf,
}

impl QuestaBackend {
    pub fn new(vsim: PathBuf) -> Self {
        Self { vsim }
    }
}

impl Backend for QuestaBackend {
    fn name(&self) -> &'static str {
        "questa"
    }

    fn build_invocation(&self, spec: &TestSpec, run_dir: &Path, verbose: bool) -> Invocation {
        let mut args = vec![
            "-c".to_string(),
            "-do".to_string(),
            "run -all; quit -f".to_string(),
            "-wlf".to_string(),
            run_dir.join("vsim.wlf").display().to_string(),
            format!("+firmware={}", spec.elf.display()),
        ];
        if verbose {
            args.push("+verbose".to_string());
        }
        args.extend(spec.args.iter().cloned());
        Invocation {
            program: self.vsim.clone(),
            args,
            env: Vec::new(),
        }
    }

    fn classify(&self, exit_code: Option<i32>, log: &str) -> Status {
        // "** Fatal:" means vsim itself died before the testbench could
        // reach a verdict; that is infrastructure, not a test failure.
        if log.contains("** Fatal:") {
            return Status::Error;
        }
        default_classify(exit_code)
    }
}
