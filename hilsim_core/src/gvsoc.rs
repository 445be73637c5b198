//! GVSoC-style event-driven platform simulator adapter.

use crate::backend::{Backend, Invocation};
use crate::catalog::TestSpec;
use std::path::{Path, PathBuf};

/// Launches the event-driven platform simulator. The launcher buffers its
/// Python-side output aggressively, so the invocation forces unbuffered
/// streams to keep the captured log ordered.
pub struct GvsocBackend {
    gvsoc: PathBuf,
}

impl GvsocBackend {
    pub fn new(gvsoc: PathBuf) -> Self {
        Self { gvsoc }
    }
}

impl Backend for GvsocBackend {
    fn name(&self) -> &'static str {
        "gvsoc"
    }

    fn build_invocation(&self, spec: &TestSpec, run_dir: &Path, verbose: bool) -> Invocation {
        let mut args = vec![
            "--binary".to_string(),
            spec.elf.display().to_string(),
            format!("--work-dir={}", run_dir.display()),
        ];
        if verbose {
            args.push("--trace=insn".to_string());
        }
        args.extend(spec.args.iter().cloned());
        args.push("run".to_string());
        Invocation {
            program: self.gvsoc.clone(),
            args,
            env: vec![("PYTHONUNBUFFERED".to_string(), "1".to_string())],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Status;

    #[test]
    fn run_subcommand_comes_last() {
        let backend = GvsocBackend::new(PathBuf::from("gvsoc"));
        let spec = TestSpec {
            id: "uart".to_string(),
            elf: PathBuf::from("build/uart.elf"),
            symbols: None,
            args: vec!["--target=pulp".to_string()],
        };
        let invocation = backend.build_invocation(&spec, Path::new("runs/uart"), false);
        assert_eq!(invocation.args.last().unwrap(), "run");
        assert!(invocation.args.contains(&"--work-dir=runs/uart".to_string()));
        assert_eq!(
            invocation.env,
            vec![("PYTHONUNBUFFERED".to_string(), "1".to_string())]
        );
    }

    #[test]
    fn classification_is_exit_code_only() {
        let backend = GvsocBackend::new(PathBuf::from("gvsoc"));
        assert_eq!(backend.classify(Some(0), ""), Status::Passed);
        assert_eq!(backend.classify(Some(1), ""), Status::Failed);
        assert_eq!(backend.classify(None, ""), Status::Error);
    }
}
