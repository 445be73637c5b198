//! Spike-style ISA emulator adapter.

use crate::backend::{default_classify, Backend, Invocation};
use crate::catalog::TestSpec;
use crate::report::Status;
use std::path::{Path, PathBuf};

/// Runs the ELF directly under an instruction-accurate emulator. Extra
/// catalog arguments come before the ELF, matching spike's
/// `spike [options] <binary>` convention.
pub struct SpikeBackend {
    spike: PathBuf,
}

impl SpikeBackend {
    pub fn new(spike: PathBuf) -> Self {
        Self { spike }
    }
}

impl Backend for SpikeBackend {
    fn name(&self) -> &'static str {
        "spike"
    }

    fn build_invocation(&self, spec: &TestSpec, _run_dir: &Path, verbose: bool) -> Invocation {
        let mut args = Vec::new();
        if verbose {
            args.push("-l".to_string());
        }
        args.extend(spec.args.iter().cloned());
        args.push(spec.elf.display().to_string());
        Invocation {
            program: self.spike.clone(),
            args,
            env: Vec::new(),
        }
    }

    fn classify(&self, exit_code: Option<i32>, log: &str) -> Status {
        // spike exits nonzero with "couldn't open ..." when the ELF is
        // missing or unreadable; the test never ran.
        if exit_code.is_some_and(|code| code != 0) && log.contains("couldn't open") {
            return Status::Error;
        }
        default_classify(exit_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> TestSpec {
        TestSpec {
            id: "add".to_string(),
            elf: PathBuf::from("build/add.elf"),
            symbols: None,
            args: vec!["--isa=rv64gc".to_string()],
        }
    }

    #[test]
    fn elf_is_the_final_argument() {
        let backend = SpikeBackend::new(PathBuf::from("spike"));
        let invocation = backend.build_invocation(&spec(), Path::new("runs/add"), false);
        assert_eq!(invocation.args, vec!["--isa=rv64gc", "build/add.elf"]);
    }

    #[test]
    fn verbose_enables_the_instruction_log() {
        let backend = SpikeBackend::new(PathBuf::from("spike"));
        let invocation = backend.build_invocation(&spec(), Path::new("runs/add"), true);
        assert_eq!(invocation.args.first().unwrap(), "-l");
    }

    #[test]
    fn unreadable_elf_is_infrastructure_not_a_regression() {
        let backend = SpikeBackend::new(PathBuf::from("spike"));
        assert_eq!(
            backend.classify(Some(1), "couldn't open build/add.elf"),
            Status::Error
        );
        assert_eq!(backend.classify(Some(1), "tohost = 1337"), Status::Failed);
        assert_eq!(backend.classify(Some(0), ""), Status::Passed);
    }
}
