//! Simulation units: a test bound to a backend and a run directory.

use crate::backend::Backend;
use crate::catalog::TestSpec;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// One executable unit of work. Created by [`materialize`], consumed
/// exactly once by the scheduler.
pub struct Simulation {
    /// The test to run
    pub spec: TestSpec,

    /// Backend that will build and classify the invocation
    pub backend: Arc<dyn Backend>,

    /// Dedicated run directory, disjoint per test so concurrent artifacts
    /// never collide
    pub run_dir: PathBuf,
}

/// Binds each spec to `backend` and a run directory under `run_root`.
///
/// Pure data assembly: directories are created lazily by the scheduler,
/// so materialization is side-effect-free and testable in isolation.
/// Output order equals input order; the scheduler and the reporter both
/// rely on it.
pub fn materialize(
    specs: Vec<TestSpec>,
    backend: &Arc<dyn Backend>,
    run_root: &Path,
) -> Vec<Simulation> {
    specs
        .into_iter()
        .map(|spec| {
            let run_dir = run_root.join(&spec.id);
            Simulation {
                spec,
                backend: Arc::clone(backend),
                run_dir,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendKind;

    fn spec(id: &str) -> TestSpec {
        TestSpec {
            id: id.to_string(),
            elf: PathBuf::from(format!("build/{id}.elf")),
            symbols: None,
            args: Vec::new(),
        }
    }

    #[test]
    fn run_dirs_are_disjoint_and_order_is_preserved() {
        let backend = BackendKind::Spike.instantiate(None);
        let dir = tempfile::tempdir().unwrap();
        let run_root = dir.path().join("runs");

        let simulations = materialize(
            vec![spec("boot"), spec("matmul"), spec("fft")],
            &backend,
            &run_root,
        );

        let ids: Vec<_> = simulations.iter().map(|s| s.spec.id.as_str()).collect();
        assert_eq!(ids, vec!["boot", "matmul", "fft"]);
        assert_eq!(simulations[0].run_dir, run_root.join("boot"));
        assert_eq!(simulations[2].run_dir, run_root.join("fft"));

        // The factory never touches the filesystem.
        assert!(!run_root.exists());
    }
}
