use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use log::{debug, info};

use super::{CaptureBackend, CaptureDevice};
use crate::buffer::PixelBuffer;
use crate::error::{Error, Result};
use crate::tools::{collect_images, load_pixel_buffer};

/// Plays a list of image files back as camera frames.
///
/// Useful for replaying recorded footage and for driving a session without
/// hardware. The device index is ignored.
#[derive(Debug, Clone, Default)]
pub struct FrameSequence {
    frames: Vec<PathBuf>,
    interval: Duration,
}

impl FrameSequence {
    /// Every image under `dir`, in sorted order
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self::from_paths(collect_images(dir.as_ref()))
    }

    /// Frames in the given order
    pub fn from_paths(frames: Vec<PathBuf>) -> Self {
        Self {
            frames,
            interval: Duration::ZERO,
        }
    }

    /// Wait `interval` before each frame, to mimic a real frame rate
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Number of frames queued
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// True when there is nothing to play
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl CaptureBackend for FrameSequence {
    type Device = FrameSequenceDevice;

    fn open(&mut self, index: u32) -> Result<Self::Device> {
        if self.frames.is_empty() {
            return Err(Error::DeviceUnavailable {
                index,
                reason: "frame sequence is empty".to_string(),
            });
        }
        info!("frame sequence opened with {} frame(s)", self.frames.len());
        Ok(FrameSequenceDevice {
            frames: std::mem::take(&mut self.frames),
            next: 0,
            interval: self.interval,
        })
    }
}

/// An open [`FrameSequence`]
#[derive(Debug)]
pub struct FrameSequenceDevice {
    frames: Vec<PathBuf>,
    next: usize,
    interval: Duration,
}

impl CaptureDevice for FrameSequenceDevice {
    fn read_frame(&mut self) -> Result<Option<PixelBuffer>> {
        let Some(path) = self.frames.get(self.next) else {
            return Ok(None);
        };
        self.next += 1;
        if !self.interval.is_zero() {
            thread::sleep(self.interval);
        }
        debug!("reading frame {}", path.display());
        load_pixel_buffer(path)
            .map(Some)
            .map_err(|err| Error::Capture(format!("{}: {}", path.display(), err)))
    }

    fn release(&mut self) {
        debug!("frame sequence released after {} frame(s)", self.next);
        self.frames.clear();
        self.next = 0;
    }
}
