mod benchmark;
mod display;
mod error;
mod runtime;
mod session;

pub use self::{
    benchmark::{Benchmark, BenchmarkOptions, BenchmarkReport},
    display::{DisplayError, FrameDisplay, PngFrameDisplay},
    error::RenderTestError,
    runtime::{RenderTest, RenderTestSummary},
    session::{Session, DISABLED_OVERLAYS},
};
