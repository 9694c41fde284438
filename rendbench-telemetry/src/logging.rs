//! ## rendbench-telemetry::logging
//! **Structured logging with `tracing`**
//!
//! `RUST_LOG` takes precedence; otherwise the configured default level
//! applies to every target. Events go to stderr, stdout carries the
//! benchmark report.

use std::error::Error;

use tracing::{info, Subscriber};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Clone)]
pub struct BenchLogger;

impl BenchLogger {
    /// Installs the global subscriber, writing to stderr. Fails if one is
    /// already installed.
    pub fn init(default_level: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        Self::subscriber(default_level, std::io::stderr).try_init()?;
        Ok(())
    }

    /// The subscriber `init` installs, with a caller-chosen writer.
    pub fn subscriber<W>(default_level: &str, make_writer: W) -> impl Subscriber + Send + Sync
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new(default_level)),
            )
            .with_writer(make_writer)
            .with_target(false)
            .with_span_events(FmtSpan::CLOSE)
            .finish()
    }

    /// Structured record of one finished benchmark pass.
    pub fn log_pass(label: &str, shadow: bool, runs: usize, mean_fps: f64) {
        info!(
            pass = label,
            shadow,
            runs,
            mean_fps,
            "Benchmark pass complete"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::Arc;

    use parking_lot::Mutex;
    use tracing_test::traced_test;

    /// In-memory log sink.
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[traced_test]
    #[test]
    fn test_log_pass() {
        BenchLogger::log_pass("GUI", true, 5, 50.0);
        assert!(logs_contain("Benchmark pass complete"));
        assert!(logs_contain("mean_fps=50.0"));
    }

    #[test]
    fn test_events_go_to_the_given_writer() {
        let sink = Captured::default();
        let subscriber = BenchLogger::subscriber("info", sink.clone());
        tracing::subscriber::with_default(subscriber, || {
            BenchLogger::log_pass("DIRECT", false, 3, 40.0);
        });

        let text = String::from_utf8(sink.0.lock().clone()).unwrap();
        assert!(text.contains("Benchmark pass complete"));
        assert!(text.contains("DIRECT"));
    }
}
