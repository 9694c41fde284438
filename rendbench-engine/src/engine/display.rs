//! Live frame output.
//!
//! The benchmark hands every frame to a `FrameDisplay` when plotting is on.
//! `PngFrameDisplay` overwrites one PNG per frame (any auto-reloading image
//! viewer shows it live) and then pauses for a bounded time so the viewer can
//! refresh.

use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use image::ExtendedColorType;
use thiserror::Error;
use tracing::trace;

use rendbench_core::engine::CameraImage;

#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("Frame buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
}

pub trait FrameDisplay {
    fn show(&mut self, frame: &CameraImage) -> Result<(), DisplayError>;
}

impl<D: FrameDisplay + ?Sized> FrameDisplay for Box<D> {
    fn show(&mut self, frame: &CameraImage) -> Result<(), DisplayError> {
        (**self).show(frame)
    }
}

/// Writes the latest frame's color buffer to a PNG file.
#[derive(Debug, Clone)]
pub struct PngFrameDisplay {
    path: PathBuf,
    pause: Duration,
    frames_shown: usize,
}

impl PngFrameDisplay {
    pub fn new(path: impl Into<PathBuf>, pause: Duration) -> Self {
        Self {
            path: path.into(),
            pause,
            frames_shown: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn frames_shown(&self) -> usize {
        self.frames_shown
    }
}

impl FrameDisplay for PngFrameDisplay {
    fn show(&mut self, frame: &CameraImage) -> Result<(), DisplayError> {
        let expected = frame.pixel_count() * 4;
        if frame.rgba.len() != expected {
            return Err(DisplayError::BufferSize {
                expected,
                actual: frame.rgba.len(),
            });
        }

        image::save_buffer(
            &self.path,
            &frame.rgba,
            frame.width,
            frame.height,
            ExtendedColorType::Rgba8,
        )?;
        self.frames_shown += 1;
        trace!(path = %self.path.display(), frame = self.frames_shown, "frame displayed");

        if !self.pause.is_zero() {
            thread::sleep(self.pause);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(width: u32, height: u32) -> CameraImage {
        CameraImage {
            width,
            height,
            rgba: vec![128; (width * height * 4) as usize],
            ..Default::default()
        }
    }

    #[test]
    fn test_png_display_writes_frame() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        let mut display = PngFrameDisplay::new(&path, Duration::ZERO);

        display.show(&frame(8, 4)).unwrap();
        display.show(&frame(8, 4)).unwrap();

        assert_eq!(display.frames_shown(), 2);
        let written = image::open(&path).unwrap();
        assert_eq!(written.width(), 8);
        assert_eq!(written.height(), 4);
    }

    #[test]
    fn test_short_buffer_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut display = PngFrameDisplay::new(dir.path().join("frame.png"), Duration::ZERO);
        let mut bad = frame(8, 4);
        bad.rgba.truncate(10);

        assert!(matches!(
            display.show(&bad),
            Err(DisplayError::BufferSize {
                expected: 128,
                actual: 10
            })
        ));
        assert_eq!(display.frames_shown(), 0);
    }
}
