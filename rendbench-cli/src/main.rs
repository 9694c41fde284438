//! ## rendbench
//! Render throughput benchmark for a physics engine client.
//!
//! Connects to the engine, loads the fixed scene and reports mean frames per
//! second of camera renders with and without shadows.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use rendbench_config::RenderTestConfig;
use rendbench_telemetry::BenchLogger;

mod commands;

use commands::{Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = RenderTestConfig::load(cli.config.as_deref())?;
    BenchLogger::init(&config.telemetry.log_level).map_err(|err| anyhow::anyhow!(err))?;

    match cli.command.unwrap_or_default() {
        Commands::Run(args) => commands::run_render_test(args, config, &mut io::stdout().lock()),
        Commands::Config => commands::print_config(&config),
    }
}
