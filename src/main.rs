// src/main.rs
// =============================================================================
// Entry point of handle-probe.
//
// What happens here:
// 1. Parse and validate command-line arguments (a bad argument exits 1)
// 2. Set up tracing on stderr so stdout only carries results
// 3. Build the runner: extractors, fetcher, presenter, recorder
// 4. Probe every platform, print the summary
// 5. Exit 0, or 1 if anything failed before/outside the probes
// =============================================================================

mod cli;
mod error;
mod output;
mod platforms;
mod probe;

use std::io::IsTerminal;
use std::sync::atomic::Ordering;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error, warn};
use tracing_subscriber::EnvFilter;

use cli::Cli;
use output::{Presenter, Recorder};
use platforms::ExtractorRegistry;
use probe::Runner;

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version also land here and are not failures
            let _ = e.print();
            std::process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };

    init_tracing(cli.log_level());

    let exit_code = match run(cli).await {
        Ok(()) => 0,
        Err(e) => {
            error!(error = %e, "run failed");
            eprintln!("Error: {:#}", e);
            1
        }
    };

    std::process::exit(exit_code);
}

async fn run(cli: Cli) -> Result<()> {
    let presenter = Presenter::new(cli.presenter_config(std::io::stdout().is_terminal()));
    if !cli.no_banner {
        presenter.print_banner();
    }

    let query = cli.query();
    let recorder = Recorder::open(query.output_path.clone()).context("cannot open output file")?;
    if let Some(path) = recorder.path() {
        debug!(path = %path.display(), "appending results");
    }

    let runner = Runner::new(
        cli.runner_config(),
        ExtractorRegistry::standard(),
        presenter.clone(),
        recorder,
    )
    .context("cannot set up HTTP client")?;

    // Ctrl-C stops new probes from starting; in-flight ones finish
    let shutdown = runner.shutdown_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, not starting further probes");
            shutdown.store(true, Ordering::SeqCst);
        }
    });

    let summary = runner.run(&query).await;
    presenter.print_summary(&summary);
    Ok(())
}

// RUST_LOG wins over -v when it is set.
fn init_tracing(default_level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
