//! ## rendbench-telemetry::metrics
//! **Prometheus frame metrics**
//!
//! Counts rendered frames, records the render-call latency of each frame and
//! keeps the mean FPS of the most recent benchmark pass.

use std::time::Duration;

use prometheus::{Counter, Encoder, Gauge, Histogram, HistogramOpts, Registry, TextEncoder};

#[derive(Debug, Clone)]
pub struct FrameMetrics {
    pub registry: Registry,
    pub frames_rendered: Counter,
    pub render_seconds: Histogram,
    pub last_mean_fps: Gauge,
}

impl FrameMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();
        let frames_rendered =
            Counter::new("rendbench_frames_total", "Total frames rendered by the benchmark")?;

        let render_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "rendbench_render_seconds",
                "Wall time of the camera image request per frame",
            )
            .buckets(vec![0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 1.0]),
        )?;

        let last_mean_fps = Gauge::new(
            "rendbench_last_mean_fps",
            "Mean frames per second of the latest benchmark pass",
        )?;

        registry.register(Box::new(frames_rendered.clone()))?;
        registry.register(Box::new(render_seconds.clone()))?;
        registry.register(Box::new(last_mean_fps.clone()))?;

        Ok(Self {
            registry,
            frames_rendered,
            render_seconds,
            last_mean_fps,
        })
    }

    pub fn observe_frame(&self, elapsed: Duration) {
        self.frames_rendered.inc();
        self.render_seconds.observe(elapsed.as_secs_f64());
    }

    pub fn record_pass(&self, mean_fps: f64) {
        self.last_mean_fps.set(mean_fps);
    }

    /// Text exposition format of every registered metric.
    pub fn gather(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observe_frames() {
        let metrics = FrameMetrics::new().unwrap();
        metrics.observe_frame(Duration::from_millis(20));
        metrics.observe_frame(Duration::from_millis(20));
        metrics.record_pass(50.0);

        assert_eq!(metrics.frames_rendered.get(), 2.0);
        assert_eq!(metrics.render_seconds.get_sample_count(), 2);
        assert_eq!(metrics.last_mean_fps.get(), 50.0);

        let text = metrics.gather().unwrap();
        assert!(text.contains("rendbench_frames_total 2"));
        assert!(text.contains("rendbench_render_seconds_bucket"));
    }
}
