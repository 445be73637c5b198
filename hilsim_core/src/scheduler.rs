//! Scheduler/executor: runs simulations under a bounded process pool.
//!
//! Workers pull indexed simulations from a shared channel, spawn the
//! backend invocation with combined output captured to a per-run log file,
//! and push `(index, outcome)` pairs back. The collector re-sorts
//! completed results into submission order, so the report is identical for
//! any pool size; concurrency changes wall-clock time, never results.
//!
//! Early exit is cooperative: the stop flag is checked only at dispatch.
//! In-flight children always run to completion and their outcomes are
//! collected; simulations never dispatched come back as skipped.

use crate::backend::Invocation;
use crate::config::RunConfig;
use crate::report::{Outcome, Status};
use crate::sim::Simulation;
use crossbeam_channel::unbounded;
use std::fs::{self, File};
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Name of the captured stdout/stderr file inside each run directory.
pub const LOG_FILE: &str = "sim.log";

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Executes the simulation set and returns outcomes in submission order.
pub fn execute(simulations: Vec<Simulation>, config: &RunConfig) -> Vec<Outcome> {
    if config.dry_run {
        return dry_run(&simulations, config);
    }

    let total = simulations.len();
    let workers = config.jobs.clamp(1, total.max(1));

    let (work_tx, work_rx) = unbounded();
    let (done_tx, done_rx) = unbounded();
    for item in simulations.into_iter().enumerate() {
        work_tx
            .send(item)
            .expect("work queue receiver dropped before dispatch");
    }
    drop(work_tx);

    let stop = AtomicBool::new(false);
    thread::scope(|scope| {
        for _ in 0..workers {
            let work_rx = work_rx.clone();
            let done_tx = done_tx.clone();
            let stop = &stop;
            scope.spawn(move || {
                while let Ok((index, simulation)) = work_rx.recv() {
                    if stop.load(Ordering::SeqCst) {
                        let skipped = Outcome::skipped(simulation.spec.id.clone());
                        let _ = done_tx.send((index, skipped));
                        continue;
                    }
                    let outcome = run_one(&simulation, config);
                    if config.early_exit && outcome.status.stops_dispatch() {
                        stop.store(true, Ordering::SeqCst);
                    }
                    let _ = done_tx.send((index, outcome));
                }
            });
        }
    });
    drop(done_tx);

    let mut slots: Vec<Option<Outcome>> = Vec::new();
    slots.resize_with(total, || None);
    for (index, outcome) in done_rx.iter() {
        slots[index] = Some(outcome);
    }
    slots
        .into_iter()
        .map(|slot| slot.expect("missing outcome for a dispatched simulation"))
        .collect()
}

/// Logs the exact invocation for every simulation, in catalog order,
/// without touching the filesystem or spawning anything.
fn dry_run(simulations: &[Simulation], config: &RunConfig) -> Vec<Outcome> {
    simulations
        .iter()
        .map(|simulation| {
            let invocation = simulation.backend.build_invocation(
                &simulation.spec,
                &simulation.run_dir,
                config.verbose,
            );
            info!("[dry-run] {}: {}", simulation.spec.id, invocation);
            Outcome::skipped(simulation.spec.id.clone())
        })
        .collect()
}

/// Runs one simulation to completion, folding every failure mode into an
/// outcome; nothing in here aborts the run.
fn run_one(simulation: &Simulation, config: &RunConfig) -> Outcome {
    let id = simulation.spec.id.clone();
    let started = Instant::now();
    let log_path = simulation.run_dir.join(LOG_FILE);

    if let Err(error) = fs::create_dir_all(&simulation.run_dir) {
        warn!("{}: failed to create run directory: {}", id, error);
        return error_outcome(id, started, None);
    }

    let invocation =
        simulation
            .backend
            .build_invocation(&simulation.spec, &simulation.run_dir, config.verbose);
    debug!("{}: {}", id, invocation);

    let mut child = match spawn(&invocation, &log_path) {
        Ok(child) => child,
        Err(error) => {
            warn!(
                "{}: failed to spawn {}: {}",
                id,
                invocation.program.display(),
                error
            );
            return error_outcome(id, started, Some(log_path.clone()));
        }
    };

    let exit_code = match wait(&mut child, config.timeout) {
        Ok(WaitResult::Exited(code)) => code,
        Ok(WaitResult::TimedOut) => {
            warn!("{}: wall-clock cap exceeded, child killed", id);
            return error_outcome(id, started, Some(log_path));
        }
        Err(error) => {
            warn!("{}: wait failed: {}", id, error);
            return error_outcome(id, started, Some(log_path));
        }
    };

    let log_text = fs::read_to_string(&log_path).unwrap_or_default();
    let status = simulation.backend.classify(exit_code, &log_text);

    Outcome {
        id,
        status,
        duration: started.elapsed(),
        log: Some(log_path),
        exit_code,
    }
}

fn error_outcome(id: String, started: Instant, log: Option<std::path::PathBuf>) -> Outcome {
    Outcome {
        id,
        status: Status::Error,
        duration: started.elapsed(),
        log,
        exit_code: None,
    }
}

/// Spawns the invocation with stdout and stderr captured to `log_path`.
fn spawn(invocation: &Invocation, log_path: &Path) -> std::io::Result<Child> {
    let stdout = File::create(log_path)?;
    let stderr = stdout.try_clone()?;
    let mut command = Command::new(&invocation.program);
    command
        .args(&invocation.args)
        .stdin(Stdio::null())
        .stdout(Stdio::from(stdout))
        .stderr(Stdio::from(stderr));
    for (key, value) in &invocation.env {
        command.env(key, value);
    }
    command.spawn()
}

enum WaitResult {
    Exited(Option<i32>),
    TimedOut,
}

/// Waits for the child, enforcing the optional wall-clock cap. On expiry
/// the child is killed and reaped before reporting the timeout.
fn wait(child: &mut Child, timeout: Option<Duration>) -> std::io::Result<WaitResult> {
    let Some(timeout) = timeout else {
        return Ok(WaitResult::Exited(child.wait()?.code()));
    };
    let started = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(WaitResult::Exited(status.code()));
        }
        if started.elapsed() >= timeout {
            let _ = child.kill();
            child.wait()?;
            return Ok(WaitResult::TimedOut);
        }
        thread::sleep(POLL_INTERVAL);
    }
}
