//! OpenCV preview window (`highgui`).
//!
//! Frames are shown with `imshow`; `waitKey` pumps the window events and
//! reports key presses. A raised [`CancelFlag`] still reads as `Esc`.

use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};

use image::RgbImage;
use log::{info, warn};
use opencv::core::Mat;
use opencv::highgui;
use opencv::prelude::*;

use super::display::CancelFlag;
use super::{DisplaySurface, Key};
use crate::error::{Error, Result};

const WAIT_SLICE_MS: u128 = 10;

/// A native preview window
#[derive(Debug, Default)]
pub struct WindowDisplay {
    cancel: CancelFlag,
    title: Option<String>,
}

impl WindowDisplay {
    /// Window watching `cancel` in addition to the keyboard
    pub fn new(cancel: CancelFlag) -> Self {
        Self {
            cancel,
            title: None,
        }
    }
}

fn display_err(err: opencv::Error) -> Error {
    Error::Display(err.to_string())
}

/// BGR `Mat` copy of an RGB frame
fn to_bgr_mat(frame: &RgbImage) -> Result<Mat> {
    let bgr: Vec<u8> = frame.pixels().flat_map(|p| [p[2], p[1], p[0]]).collect();
    let flat = Mat::from_slice(&bgr).map_err(display_err)?;
    flat.reshape(3, frame.height() as i32)
        .and_then(|mat| mat.try_clone())
        .map_err(display_err)
}

impl DisplaySurface for WindowDisplay {
    fn show(&mut self, title: &str, frame: &RgbImage) -> Result<()> {
        if self.title.as_deref() != Some(title) {
            highgui::named_window(title, highgui::WINDOW_AUTOSIZE).map_err(display_err)?;
            info!("window '{}' opened", title);
            self.title = Some(title.to_string());
        }
        let mat = to_bgr_mat(frame)?;
        highgui::imshow(title, &mat).map_err(display_err)
    }

    fn poll_key(&mut self, timeout: Duration) -> Option<Key> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.cancel.load(Ordering::SeqCst) {
                return Some(Key::Esc);
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            let wait_ms = remaining.as_millis().clamp(1, WAIT_SLICE_MS) as i32;
            match highgui::wait_key(wait_ms) {
                Ok(code) => {
                    if let Some(key) = Key::from_code(code) {
                        return Some(key);
                    }
                }
                Err(err) => {
                    warn!("waitKey failed: {}", err);
                    return None;
                }
            }
            if Instant::now() >= deadline {
                return None;
            }
        }
    }

    fn close(&mut self) {
        if let Some(title) = self.title.take() {
            match highgui::destroy_window(&title) {
                Ok(()) => info!("window '{}' closed", title),
                Err(err) => warn!("failed to close window '{}': {}", title, err),
            }
        }
    }
}
