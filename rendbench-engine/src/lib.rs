//! Render benchmark harness: engine sessions, the timed render loop and the
//! driver that runs it with and without shadows.

pub mod backend;
pub mod engine;

pub use engine::{
    Benchmark, BenchmarkOptions, BenchmarkReport, RenderTest, RenderTestError, RenderTestSummary,
    Session,
};
