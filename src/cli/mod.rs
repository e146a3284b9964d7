//! Entry point for test binaries.
//!
//! A test binary builds its [`CaseRegistry`] and [`PluginCatalog`] and hands
//! them to [`run`]; argument parsing, configuration, logging and exit codes
//! are handled here.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::args::{HarnessArgs, RunMode};
use crate::config::HarnessConfig;
use crate::discovery::PluginCatalog;
use crate::errors::HarnessResult;
use crate::ledger::Tally;
use crate::suite::{CaseRegistry, RunContext, Suite};

pub mod args;

/// Environment variable holding the log filter (`tracing_subscriber` syntax).
pub const LOG_ENV: &str = "CASEWORK_LOG";

/// Parses the process arguments and runs the selected entry point.
///
/// Exit code 0 when nothing failed, 1 when any assertion failed or any error
/// went unmatched, 2 when the harness itself could not run.
pub fn run(registry: CaseRegistry, catalog: &PluginCatalog) -> ExitCode {
    run_with_defaults(registry, catalog, HarnessConfig::default())
}

/// Like [`run`], with binary-specific defaults used when no `--config` is given.
pub fn run_with_defaults(
    registry: CaseRegistry,
    catalog: &PluginCatalog,
    defaults: HarnessConfig,
) -> ExitCode {
    let args = HarnessArgs::parse();
    init_logging();
    match execute(&args, registry, catalog, defaults) {
        Ok(tally) if tally.is_clean() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(1),
        Err(err) => {
            eprintln!("{:?}", miette::Report::new(err));
            ExitCode::from(2)
        }
    }
}

/// Runs the entry point selected by `args` and returns the resulting tally.
pub fn execute(
    args: &HarnessArgs,
    registry: CaseRegistry,
    catalog: &PluginCatalog,
    defaults: HarnessConfig,
) -> HarnessResult<Tally> {
    let config = args.resolve_config(defaults)?;
    let mut suite = Suite::from_config(registry, &config)?;
    let mut sink = config.stdout_sink();
    let mut ctx = RunContext::standalone();
    let tally = match args.mode() {
        RunMode::One(name) => suite
            .run_one(&ctx, &name, sink.as_mut())?
            .map(|report| report.tally)
            .unwrap_or_default(),
        RunMode::Directory(dir) => {
            suite
                .run_dir(&mut ctx, dir.as_deref(), catalog, sink.as_mut())?
                .tally
        }
        RunMode::All => suite.run_all(&mut ctx, sink.as_mut())?.tally,
    };
    Ok(tally)
}

/// Installs a stderr `tracing` subscriber filtered by [`LOG_ENV`] (default `warn`).
pub fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
