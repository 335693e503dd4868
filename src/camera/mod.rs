//! Live QR scanning from a capture device.
//!
//! [`CameraSession`] drives a capture device and a display surface through an
//! explicit state machine until a code is detected, the user cancels, or the
//! stream ends. [`spawn`] runs a session on its own thread and hands the
//! single outcome back over a one-shot channel.

/// Frame-file capture backend
pub mod capture;
/// Headless display surface
pub mod display;
/// Box drawing on preview frames
pub mod overlay;
/// Session state machine
pub mod session;
/// V4L2 capture backend
#[cfg(feature = "v4l2")]
pub mod v4l2;
/// OpenCV preview window
#[cfg(feature = "window")]
pub mod window;

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use image::RgbImage;
use log::warn;

use crate::buffer::PixelBuffer;
use crate::decoder::QrDecode;
use crate::error::{Error, Result};

pub use capture::FrameSequence;
pub use display::{CancelFlag, HeadlessDisplay};
pub use session::{CameraSession, SessionEnd, SessionOutcome, SessionState};
#[cfg(feature = "window")]
pub use window::WindowDisplay;

/// A key reported by a display surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Escape
    Esc,
    /// A printable character
    Char(char),
    /// Any other backend key code
    Other(u32),
}

impl Key {
    /// Map a `waitKey`-style code to a key; negative codes mean no key.
    ///
    /// Only the low byte is matched against Esc and printable ASCII.
    pub fn from_code(code: i32) -> Option<Self> {
        if code < 0 {
            return None;
        }
        let low = (code & 0xff) as u8;
        Some(match low {
            27 => Key::Esc,
            0x20..=0x7e => Key::Char(low as char),
            _ => Key::Other(code as u32),
        })
    }
}

/// An open capture device yielding frames in order
pub trait CaptureDevice {
    /// Next frame, or `Ok(None)` once the stream has ended
    fn read_frame(&mut self) -> Result<Option<PixelBuffer>>;

    /// Free the device. Called once by the session.
    fn release(&mut self);
}

/// Opens capture devices by index
pub trait CaptureBackend {
    /// Device type produced by [`open`](CaptureBackend::open)
    type Device: CaptureDevice;

    /// Acquire device `index`
    fn open(&mut self, index: u32) -> Result<Self::Device>;
}

/// Somewhere to show frames and read keys from
pub trait DisplaySurface {
    /// Show `frame` in a window titled `title`
    fn show(&mut self, title: &str, frame: &RgbImage) -> Result<()>;

    /// Wait up to `timeout` for a key press
    fn poll_key(&mut self, timeout: Duration) -> Option<Key>;

    /// Close the window if it is open
    fn close(&mut self);
}

/// Handle to a session running on its own thread
#[derive(Debug)]
pub struct SessionHandle {
    outcome: Receiver<SessionOutcome>,
    thread: Option<JoinHandle<()>>,
}

impl SessionHandle {
    /// Non-blocking check for the outcome; `None` while the session is still running.
    ///
    /// Returns `Err` if the session thread died without reporting.
    pub fn try_outcome(&mut self) -> Result<Option<SessionOutcome>> {
        match self.outcome.try_recv() {
            Ok(outcome) => {
                self.join();
                Ok(Some(outcome))
            }
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => {
                self.join();
                Err(Error::SessionLost)
            }
        }
    }

    /// Block until the session finishes
    pub fn wait(mut self) -> Result<SessionOutcome> {
        let outcome = self.outcome.recv().map_err(|_| Error::SessionLost);
        self.join();
        outcome
    }

    fn join(&mut self) {
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("camera session thread panicked");
            }
        }
    }
}

/// Run `session` on a dedicated thread
pub fn spawn<B, S, D>(session: CameraSession<B, S, D>) -> Result<SessionHandle>
where
    B: CaptureBackend + Send + 'static,
    S: DisplaySurface + Send + 'static,
    D: QrDecode + Send + 'static,
{
    let (tx, rx) = mpsc::sync_channel(1);
    let thread = thread::Builder::new()
        .name("qr-camera".to_string())
        .spawn(move || {
            let outcome = session.run();
            // The receiver may already be gone if the caller stopped listening
            let _ = tx.send(outcome);
        })?;
    Ok(SessionHandle {
        outcome: rx,
        thread: Some(thread),
    })
}
