//! fec-sim: send a message through a noisy channel under Reed-Solomon
//! protection and report what survived.

mod config;
mod input_gen;
mod trials;

use config::Config;
use fec_sim_core::{simulate, Error, Result};
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let config = match Config::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            eprintln!("run with --help for usage");
            return ExitCode::from(2);
        }
    };

    if let Err(e) = init_logging(&config) {
        eprintln!("error: {e}");
        return ExitCode::from(2);
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "run failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Install the stderr subscriber. RUST_LOG wins over `--log-level`.
fn init_logging(config: &Config) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if config.json_logs {
        let json_layer = fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(true)
            .with_writer(std::io::stderr);

        subscriber
            .with(json_layer)
            .try_init()
            .map_err(|e| Error::Config(format!("logging init failed: {e}")))
    } else {
        let pretty_layer = fmt::layer().with_target(true).with_writer(std::io::stderr);

        subscriber
            .with(pretty_layer)
            .try_init()
            .map_err(|e| Error::Config(format!("logging init failed: {e}")))
    }
}

fn run(config: &Config) -> Result<()> {
    if config.print_config {
        config.print();
    }

    let message = config.load_message()?;
    let request = config.request(message);

    tracing::info!(
        seed = config.seed,
        message_len = request.message.len(),
        trials = config.trials,
        "starting"
    );

    if config.trials > 1 {
        let summary = trials::run_trials(&request, config.trials)?;
        if config.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            summary.print();
        }
        return Ok(());
    }

    let report = simulate(&request)?;
    if config.json {
        println!("{}", report.to_json()?);
    } else {
        report.print_summary();
        report.print_result();
    }

    Ok(())
}
