//! Hardware-in-the-loop test orchestrator CLI.
//!
//! Dispatches a catalog of test binaries to a simulator backend under a
//! bounded process pool and reports consolidated pass/fail results.

use clap::Parser;
use hilsim_core::report::write_report;
use hilsim_core::{catalog, scheduler};
use hilsim_core::{BackendKind, BackendRegistry, RunConfig, Status, Summary};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Run hardware-in-the-loop test catalogs against simulator backends
#[derive(Parser, Debug)]
#[command(name = "hilsim")]
#[command(about = "Run hardware-in-the-loop test catalogs against simulator backends", long_about = None)]
struct Args {
    /// Simulator backend (questa, vcs, verilator, spike, gvsoc)
    #[arg(short, long, default_value = "verilator")]
    backend: String,

    /// Path to the test catalog document
    #[arg(short, long, default_value = "testlist.toml")]
    catalog: PathBuf,

    /// Root directory for per-test run directories
    #[arg(long, default_value = "runs")]
    run_dir: PathBuf,

    /// Worker pool size
    #[arg(short, long, default_value = "1")]
    jobs: usize,

    /// Print the exact invocations without executing anything
    #[arg(long)]
    dry_run: bool,

    /// Stop dispatching new tests after the first failure or error
    #[arg(long)]
    early_exit: bool,

    /// Verbose output (debug logging plus backend verbosity flags)
    #[arg(short, long)]
    verbose: bool,

    /// Path of the tabular report artifact
    #[arg(long, default_value = "report.csv")]
    report: PathBuf,

    /// Only run catalog entries whose binary lives under this directory
    #[arg(long)]
    only: Option<PathBuf>,

    /// Override the chosen backend's simulator executable
    #[arg(long)]
    simulator_exe: Option<PathBuf>,

    /// Per-test wall-clock cap in seconds; expiry kills the child
    #[arg(long)]
    timeout: Option<u64>,

    /// JSON summary on stdout for CI parsing
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    match run(args) {
        Ok(code) => std::process::exit(code),
        Err(message) => {
            // Fatal configuration problems abort before any execution.
            error!("{}", message);
            std::process::exit(2);
        }
    }
}

fn run(args: Args) -> Result<i32, String> {
    let mut config = RunConfig::new(args.run_dir.clone());
    config.backend = args.backend.clone();
    config.jobs = args.jobs;
    config.dry_run = args.dry_run;
    config.early_exit = args.early_exit;
    config.verbose = args.verbose;
    config.timeout = args.timeout.map(Duration::from_secs);
    config.report = args.report.clone();
    config.validate().map_err(|e| e.to_string())?;

    let mut registry = BackendRegistry::standard();
    if let Some(exe) = args.simulator_exe {
        let kind: BackendKind = args.backend.parse().map_err(|e: hilsim_core::ConfigError| e.to_string())?;
        registry.register(kind.instantiate(Some(exe)));
    }
    let backend = registry.get(&config.backend).map_err(|e| e.to_string())?;

    let mut specs = catalog::load(&args.catalog).map_err(|e| e.to_string())?;
    if let Some(scope) = &args.only {
        specs = catalog::scope_filter(specs, scope);
    }
    info!(
        "Loaded {} tests from {} (backend: {})",
        specs.len(),
        args.catalog.display(),
        backend.name()
    );

    let simulations = hilsim_core::materialize(specs, &backend, &config.run_root);
    let outcomes = scheduler::execute(simulations, &config);

    for outcome in &outcomes {
        let secs = outcome.duration.as_secs_f64();
        match outcome.status {
            Status::Passed => info!("✓ {} passed ({:.2}s)", outcome.id, secs),
            Status::Failed => {
                let code = outcome
                    .exit_code
                    .map_or_else(|| "?".to_string(), |c| c.to_string());
                error!("✗ {} failed (exit {}, {:.2}s)", outcome.id, code, secs);
            }
            Status::Error => error!("✗ {} error ({:.2}s)", outcome.id, secs),
            Status::Skipped => info!("- {} skipped", outcome.id),
        }
    }

    let summary = Summary::of(&outcomes);
    if !config.dry_run {
        write_report(&outcomes, &config.run_root, &config.report)
            .map_err(|e| format!("failed to write report {}: {}", config.report.display(), e))?;
    }

    if args.json {
        let payload = serde_json::json!({
            "passed": summary.passed,
            "failed": summary.failed,
            "errors": summary.errors,
            "skipped": summary.skipped,
            "results": outcomes.iter().map(|o| serde_json::json!({
                "test": o.id,
                "status": o.status.name(),
                "duration_secs": o.duration.as_secs_f64(),
                "exit_code": o.exit_code,
            })).collect::<Vec<_>>(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).map_err(|e| e.to_string())?
        );
    } else {
        info!(
            "{} passed, {} failed, {} errors, {} skipped",
            summary.passed, summary.failed, summary.errors, summary.skipped
        );
        if !config.dry_run {
            info!("Report written to {}", config.report.display());
        }
    }

    Ok(summary.exit_code())
}
