//! Render test driver - one session, a profiled pass with shadows and one
//! without.
use std::fs;
use std::io::Write;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use rendbench_config::RenderTestConfig;
use rendbench_core::engine::{LoggingKind, PhysicsEngine};
use rendbench_core::time::Clock;
use rendbench_telemetry::FrameMetrics;

use crate::engine::benchmark::{Benchmark, BenchmarkOptions, BenchmarkReport};
use crate::engine::display::FrameDisplay;
use crate::engine::error::RenderTestError;
use crate::engine::session::Session;

/// Reports of the passes of one render test, in run order.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderTestSummary {
    pub passes: Vec<BenchmarkReport>,
}

/// The fixed driver sequence.
pub struct RenderTest<'a> {
    config: &'a RenderTestConfig,
    metrics: Option<Arc<FrameMetrics>>,
    display: Option<Box<dyn FrameDisplay>>,
}

impl<'a> RenderTest<'a> {
    pub fn new(config: &'a RenderTestConfig) -> Self {
        Self {
            config,
            metrics: None,
            display: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<FrameMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Replaces the PNG display configured under `benchmark.plot_path`.
    pub fn with_display(mut self, display: Box<dyn FrameDisplay>) -> Self {
        self.display = Some(display);
        self
    }

    /// Opens a session on `engine`, starts the profile timings log, runs the
    /// benchmark with and without shadows, stops the log and disconnects.
    /// Progress lines and pass summaries go to `out`.
    #[instrument(skip_all, fields(mode = %self.config.session.mode))]
    pub fn run<E, C, W>(
        self,
        engine: E,
        clock: C,
        out: &mut W,
    ) -> Result<RenderTestSummary, RenderTestError>
    where
        E: PhysicsEngine,
        C: Clock,
        W: Write + ?Sized,
    {
        let config = self.config;
        let mut session = Session::open(engine, &config.session)?;

        let mut bench = Benchmark::from_config(clock, config);
        if let Some(display) = self.display {
            bench = bench.with_display(display);
        }
        if let Some(metrics) = &self.metrics {
            bench = bench.with_metrics(metrics.clone());
        }

        let log = if config.state_log.enabled {
            let log = session
                .engine_mut()
                .start_state_logging(LoggingKind::ProfileTimings, &config.state_log.path)?;
            info!(path = %config.state_log.path.display(), "profile timings log started");
            Some(log)
        } else {
            None
        };

        let label = session.mode().label();
        let base = BenchmarkOptions {
            num_runs: config.benchmark.num_runs,
            shadow: true,
            plot: config.benchmark.plot,
        };

        let mut passes = Vec::with_capacity(2);
        for (heading, shadow) in [
            (format!("Testing {label}"), true),
            (format!("Testing {label} w/o shadow"), false),
        ] {
            writeln!(out, "{heading}")?;
            let report = bench.run(&mut session, BenchmarkOptions { shadow, ..base })?;
            report.write_summary(out)?;
            passes.push(report);
        }

        if let Some(log) = log {
            session.engine_mut().stop_state_logging(log)?;
            debug!("profile timings log stopped");
        }
        session.close();

        if let (Some(metrics), Some(path)) = (&self.metrics, &config.telemetry.metrics_path) {
            fs::write(path, metrics.gather()?)?;
            info!(path = %path.display(), "frame metrics written");
        }

        Ok(RenderTestSummary { passes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    use rendbench_core::engine::{ConnectionMode, LogId};
    use rendbench_simulator::{EngineCall, ScriptedEngine, VirtualClock};
    use tracing_test::traced_test;

    fn config(num_runs: usize) -> RenderTestConfig {
        let mut config = RenderTestConfig::default();
        config.benchmark.num_runs = num_runs;
        config
    }

    #[test]
    fn test_driver_sequence_and_output() {
        let config = config(5);
        let clock = VirtualClock::default();
        let engine = ScriptedEngine::new(clock.clone(), Duration::from_millis(20));
        let journal = engine.journal();

        let mut out = Vec::new();
        let summary = RenderTest::new(&config).run(engine, clock, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Testing GUI\nmean: 50.0 for 5 runs\n\nTesting GUI w/o shadow\nmean: 50.0 for 5 runs\n\n"
        );
        assert_eq!(summary.passes.len(), 2);
        assert!(summary.passes[0].shadow);
        assert!(!summary.passes[1].shadow);

        assert_eq!(journal.shadow_flags(), [vec![true; 5], vec![false; 5]].concat());
        let calls = journal.calls();
        let start = calls
            .iter()
            .position(|c| {
                *c == EngineCall::StartStateLogging {
                    kind: LoggingKind::ProfileTimings,
                    path: PathBuf::from("renderTimings"),
                }
            })
            .unwrap();
        let first_step = calls
            .iter()
            .position(|c| *c == EngineCall::StepSimulation)
            .unwrap();
        assert!(start < first_step);

        let n = calls.len();
        assert_eq!(calls[n - 2], EngineCall::StopStateLogging(LogId(0)));
        assert_eq!(calls[n - 1], EngineCall::Disconnect);
        assert_eq!(journal.disconnects(), 1);
    }

    #[test]
    fn test_direct_mode_labels() {
        let mut config = config(1);
        config.session.mode = ConnectionMode::Direct;
        config.state_log.enabled = false;
        let clock = VirtualClock::default();
        let engine = ScriptedEngine::new(clock.clone(), Duration::from_millis(10));
        let journal = engine.journal();

        let mut out = Vec::new();
        RenderTest::new(&config).run(engine, clock, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Testing DIRECT\nmean: 100.0 for 1 runs"));
        assert_eq!(
            journal.count(|c| matches!(c, EngineCall::StartStateLogging { .. })),
            0
        );
    }

    #[test]
    fn test_connection_failure_aborts_before_output() {
        let config = config(5);
        let clock = VirtualClock::default();
        let engine = ScriptedEngine::new(clock.clone(), Duration::ZERO).with_connect_handle(-1);
        let journal = engine.journal();

        let mut out = Vec::new();
        let result = RenderTest::new(&config).run(engine, clock, &mut out);

        assert!(matches!(result, Err(RenderTestError::Connection { .. })));
        assert!(out.is_empty());
        assert_eq!(journal.disconnects(), 0);
    }

    #[test]
    fn test_failure_mid_run_disconnects() {
        let config = config(5);
        let clock = VirtualClock::default();
        let engine =
            ScriptedEngine::new(clock.clone(), Duration::from_millis(1)).failing_render_after(7);
        let journal = engine.journal();

        let mut out = Vec::new();
        let result = RenderTest::new(&config).run(engine, clock, &mut out);

        assert!(matches!(result, Err(RenderTestError::Engine(_))));
        assert_eq!(journal.disconnects(), 1);
        assert_eq!(
            journal.count(|c| matches!(c, EngineCall::StopStateLogging(_))),
            0
        );
    }

    #[test]
    fn test_metrics_file_written() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(3);
        config.telemetry.metrics_path = Some(dir.path().join("metrics.prom"));
        let clock = VirtualClock::default();
        let engine = ScriptedEngine::new(clock.clone(), Duration::from_millis(20));
        let metrics = Arc::new(FrameMetrics::new().unwrap());

        RenderTest::new(&config)
            .with_metrics(metrics.clone())
            .run(engine, clock, &mut std::io::sink())
            .unwrap();

        assert_eq!(metrics.frames_rendered.get(), 6.0);
        let text = std::fs::read_to_string(dir.path().join("metrics.prom")).unwrap();
        assert!(text.contains("rendbench_frames_total 6"));
    }

    #[traced_test]
    #[test]
    fn test_logs_session_lifecycle() {
        let config = config(2);
        let clock = VirtualClock::default();
        let engine = ScriptedEngine::new(clock.clone(), Duration::from_millis(5));
        RenderTest::new(&config)
            .run(engine, clock, &mut std::io::sink())
            .unwrap();

        assert!(logs_contain("connecting"));
        assert!(logs_contain("disconnected"));
        assert!(logs_contain("profile timings log started"));
    }
}
