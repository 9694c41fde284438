use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;

use rendbench_config::RenderTestConfig;
use rendbench_core::engine::ConnectionMode;
use rendbench_core::time::MonotonicClock;
use rendbench_engine::backend::{bullet_engine, offline_engine};
use rendbench_engine::RenderTest;
use rendbench_simulator::VirtualClock;
use rendbench_telemetry::FrameMetrics;

#[derive(Parser)]
#[command(name = "rendbench", version, about)]
pub struct Cli {
    /// Configuration file merged over the defaults (must exist).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the render benchmark with and without shadows (default)
    Run(RunArgs),
    /// Print the effective configuration as YAML
    Config,
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Run(RunArgs::default())
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Engine to benchmark. Defaults to bullet when built with the `bullet`
    /// feature, offline otherwise.
    #[arg(short, long, value_enum, default_value_t = Backend::default())]
    pub backend: Backend,

    /// Connection mode, overrides `session.mode`.
    #[arg(short, long, value_enum)]
    pub mode: Option<Mode>,

    /// Frames per pass, overrides `benchmark.num_runs`.
    #[arg(short = 'n', long)]
    pub runs: Option<usize>,

    /// Show every rendered frame.
    #[arg(long)]
    pub plot: bool,

    /// Skip the engine's profile timings log.
    #[arg(long)]
    pub no_state_log: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Native Bullet engine (needs the `bullet` feature).
    Bullet,
    /// Scripted engine on virtual time.
    Offline,
}

impl Default for Backend {
    fn default() -> Self {
        if cfg!(feature = "bullet") {
            Backend::Bullet
        } else {
            Backend::Offline
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Gui,
    Direct,
}

impl From<Mode> for ConnectionMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Gui => ConnectionMode::Gui,
            Mode::Direct => ConnectionMode::Direct,
        }
    }
}

impl RunArgs {
    /// Applies the command line overrides on top of the loaded configuration.
    pub fn apply(&self, config: &mut RenderTestConfig) {
        if let Some(mode) = self.mode {
            config.session.mode = mode.into();
        }
        if let Some(runs) = self.runs {
            config.benchmark.num_runs = runs;
        }
        if self.plot {
            config.benchmark.plot = true;
        }
        if self.no_state_log {
            config.state_log.enabled = false;
        }
    }
}

/// Runs the driver and writes the report to `out`. Logging never goes there.
pub fn run_render_test<W: Write + ?Sized>(
    args: RunArgs,
    mut config: RenderTestConfig,
    out: &mut W,
) -> anyhow::Result<()> {
    args.apply(&mut config);
    if config.benchmark.num_runs == 0 {
        anyhow::bail!("--runs must be at least 1");
    }
    info!(backend = ?args.backend, mode = %config.session.mode, "starting render test");

    let metrics = Arc::new(FrameMetrics::new()?);
    let test = RenderTest::new(&config).with_metrics(metrics);

    let summary = match args.backend {
        Backend::Bullet => {
            let engine = bullet_engine(&config.session)?;
            test.run(engine, MonotonicClock::new(), &mut *out)
        }
        Backend::Offline => {
            let clock = VirtualClock::default();
            let engine = offline_engine(&config, clock.clone());
            test.run(engine, clock, &mut *out)
        }
    }
    .context("render test failed")?;

    out.flush()?;
    info!(passes = summary.passes.len(), "render test complete");
    Ok(())
}

pub fn print_config(config: &RenderTestConfig) -> anyhow::Result<()> {
    print!("{}", config.to_yaml()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_is_default_command() {
        let cli = Cli::try_parse_from(["rendbench"]).unwrap();
        assert!(cli.command.is_none());
        match cli.command.unwrap_or_default() {
            Commands::Run(args) => assert_eq!(args.backend, Backend::default()),
            Commands::Config => panic!("expected run"),
        }
    }

    #[cfg(not(feature = "bullet"))]
    #[test]
    fn test_default_backend_runs_without_bullet() {
        assert_eq!(Backend::default(), Backend::Offline);
        let cli = Cli::try_parse_from(["rendbench", "run"]).unwrap();
        let Some(Commands::Run(args)) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.backend, Backend::Offline);
    }

    #[test]
    fn test_offline_run_writes_only_the_report() {
        let mut config = RenderTestConfig::default();
        config.offline.frame_cost_us = 20_000;
        let args = RunArgs {
            backend: Backend::Offline,
            runs: Some(5),
            no_state_log: true,
            ..RunArgs::default()
        };

        let mut out = Vec::new();
        run_render_test(args, config, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Testing GUI\nmean: 50.0 for 5 runs\n\nTesting GUI w/o shadow\nmean: 50.0 for 5 runs\n\n"
        );
    }

    #[test]
    fn test_zero_runs_rejected() {
        let args = RunArgs {
            backend: Backend::Offline,
            runs: Some(0),
            ..RunArgs::default()
        };
        let mut out = Vec::new();
        assert!(run_render_test(args, RenderTestConfig::default(), &mut out).is_err());
        assert!(out.is_empty());
    }

    #[test]
    fn test_run_flags_override_config() {
        let cli = Cli::try_parse_from([
            "rendbench",
            "--config",
            "bench.yaml",
            "run",
            "--backend",
            "offline",
            "--mode",
            "direct",
            "--runs",
            "7",
            "--plot",
            "--no-state-log",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("bench.yaml")));

        let Some(Commands::Run(args)) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.backend, Backend::Offline);

        let mut config = RenderTestConfig::default();
        args.apply(&mut config);
        assert_eq!(config.session.mode, ConnectionMode::Direct);
        assert_eq!(config.benchmark.num_runs, 7);
        assert!(config.benchmark.plot);
        assert!(!config.state_log.enabled);
    }

    #[test]
    fn test_no_flags_keep_config() {
        let mut config = RenderTestConfig::default();
        RunArgs::default().apply(&mut config);
        assert_eq!(config, RenderTestConfig::default());
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        assert!(Cli::try_parse_from(["rendbench", "run", "--backend", "vulkan"]).is_err());
    }
}
