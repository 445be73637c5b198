//! VCS-style compiled simulator adapter.

use crate::backend::{Backend, Invocation};
use crate::catalog::TestSpec;
use std::path::{Path, PathBuf};

/// Runs a pre-compiled `simv` binary. `-exitstatus` makes simv propagate
/// `$finish` status codes, so the default exit-code classification
/// applies unchanged.
pub struct VcsBackend {
    simv: PathBuf,
}

impl VcsBackend {
    pub fn new(simv: PathBuf) -> Self {
        Self { simv }
    }
}

impl Backend for VcsBackend {
    fn name(&self) -> &'static str {
        "vcs"
    }

    fn build_invocation(&self, spec: &TestSpec, run_dir: &Path, verbose: bool) -> Invocation {
        let mut args = vec![
            format!("+firmware={}", spec.elf.display()),
            "-exitstatus".to_string(),
            format!("+vcdplusfile={}", run_dir.join("trace.vpd").display()),
        ];
        if verbose {
            args.push("+verbose".to_string());
        }
        args.extend(spec.args.iter().cloned());
        Invocation {
            program: self.simv.clone(),
            args,
            env: Vec::new(),
        }
    }
}
