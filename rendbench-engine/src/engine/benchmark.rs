//! Render benchmark runner.
//!
//! Each iteration steps the simulation once, then times one frame: view and
//! projection matrices plus the camera image request. The timed span converts
//! to FPS with `frames_per_second`.

use std::io::{self, Write};
use std::sync::Arc;

use nalgebra::Vector3;
use tracing::{debug, info_span, trace};

use rendbench_config::RenderTestConfig;
use rendbench_core::camera::CameraRig;
use rendbench_core::engine::{CameraImageRequest, PhysicsEngine, Renderer};
use rendbench_core::time::{frames_per_second, mean, Clock};
use rendbench_telemetry::{BenchLogger, FrameMetrics};

use crate::engine::display::{FrameDisplay, PngFrameDisplay};
use crate::engine::error::RenderTestError;
use crate::engine::session::Session;

/// Per-pass inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchmarkOptions {
    pub num_runs: usize,
    pub shadow: bool,
    pub plot: bool,
}

impl Default for BenchmarkOptions {
    fn default() -> Self {
        Self {
            num_runs: 100,
            shadow: true,
            plot: false,
        }
    }
}

/// FPS samples of one pass, one per iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkReport {
    pub shadow: bool,
    pub samples: Vec<f64>,
}

impl BenchmarkReport {
    pub fn runs(&self) -> usize {
        self.samples.len()
    }

    pub fn mean_fps(&self) -> f64 {
        mean(&self.samples)
    }

    /// Writes `mean: <fps> for <n> runs` and a blank line.
    pub fn write_summary<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "mean: {:?} for {} runs", self.mean_fps(), self.runs())?;
        writeln!(out)
    }
}

/// Drives the fixed camera path against a session.
pub struct Benchmark<C: Clock> {
    clock: C,
    camera: CameraRig,
    width: u32,
    height: u32,
    light_direction: Vector3<f32>,
    renderer: Renderer,
    display: Box<dyn FrameDisplay>,
    metrics: Option<Arc<FrameMetrics>>,
}

impl<C: Clock> Benchmark<C> {
    /// Fixed scenario: 320x200, light from `[1, 1, 1]`, hardware renderer.
    pub fn new(clock: C) -> Self {
        Self::from_config(clock, &RenderTestConfig::default())
    }

    pub fn from_config(clock: C, config: &RenderTestConfig) -> Self {
        Self {
            clock,
            camera: config.camera.rig(),
            width: config.session.width,
            height: config.session.height,
            light_direction: Vector3::from(config.benchmark.light_direction),
            renderer: config.benchmark.renderer,
            display: Box::new(PngFrameDisplay::new(
                config.benchmark.plot_path.clone(),
                config.benchmark.plot_pause(),
            )),
            metrics: None,
        }
    }

    pub fn with_display(mut self, display: Box<dyn FrameDisplay>) -> Self {
        self.display = display;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<FrameMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    /// Runs one pass of `options.num_runs` frames.
    pub fn run<E: PhysicsEngine>(
        &mut self,
        session: &mut Session<E>,
        options: BenchmarkOptions,
    ) -> Result<BenchmarkReport, RenderTestError> {
        let span = info_span!(
            "benchmark",
            mode = %session.mode(),
            shadow = options.shadow,
            runs = options.num_runs
        );
        let _entered = span.enter();

        let lens = self.camera.lens(self.width, self.height);
        let mut samples = Vec::with_capacity(options.num_runs);

        for (i, yaw) in (0..options.num_runs).zip(self.camera.yaw_cycle()) {
            let engine = session.engine_mut();
            engine.step_simulation()?;

            let start = self.clock.now();
            let view = engine.compute_view_matrix(&self.camera.pose(yaw as f32));
            let projection = engine.compute_projection_matrix(&lens);
            let image = engine.get_camera_image(&CameraImageRequest {
                width: self.width,
                height: self.height,
                view,
                projection,
                shadow: options.shadow,
                light_direction: self.light_direction,
                renderer: self.renderer,
            })?;
            let elapsed = self.clock.now().saturating_sub(start);

            let fps = frames_per_second(elapsed.as_secs_f64());
            samples.push(fps);
            if let Some(metrics) = &self.metrics {
                metrics.observe_frame(elapsed);
            }
            trace!(frame = i, yaw, ?elapsed, fps, "frame timed");

            if options.plot {
                self.display.show(&image)?;
            }
        }

        let report = BenchmarkReport {
            shadow: options.shadow,
            samples,
        };
        if let Some(metrics) = &self.metrics {
            metrics.record_pass(report.mean_fps());
        }
        debug!(mean_fps = report.mean_fps(), "pass finished");
        BenchLogger::log_pass(
            session.mode().label(),
            options.shadow,
            report.runs(),
            report.mean_fps(),
        );
        Ok(report)
    }
}
