use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use image::RgbImage;
use log::{info, trace};

use super::{DisplaySurface, Key};
use crate::error::Result;

/// Shared flag that asks a running session to stop
pub type CancelFlag = Arc<AtomicBool>;

const POLL_SLICE: Duration = Duration::from_millis(5);

/// Display surface without a window.
///
/// Frames are only logged. A raised [`CancelFlag`] (typically set from a
/// Ctrl-C handler) is reported as an `Esc` key press.
#[derive(Debug, Default)]
pub struct HeadlessDisplay {
    cancel: CancelFlag,
    title: Option<String>,
    frames_shown: u64,
}

impl HeadlessDisplay {
    /// Display watching `cancel`
    pub fn new(cancel: CancelFlag) -> Self {
        Self {
            cancel,
            title: None,
            frames_shown: 0,
        }
    }

    /// Frames shown since the window was last opened
    pub fn frames_shown(&self) -> u64 {
        self.frames_shown
    }

    /// True between the first `show` and `close`
    pub fn is_open(&self) -> bool {
        self.title.is_some()
    }
}

impl DisplaySurface for HeadlessDisplay {
    fn show(&mut self, title: &str, frame: &RgbImage) -> Result<()> {
        if self.title.as_deref() != Some(title) {
            info!("preview '{}' opened", title);
            self.title = Some(title.to_string());
            self.frames_shown = 0;
        }
        self.frames_shown += 1;
        trace!(
            "preview '{}': frame {} ({}x{})",
            title,
            self.frames_shown,
            frame.width(),
            frame.height()
        );
        Ok(())
    }

    fn poll_key(&mut self, timeout: Duration) -> Option<Key> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.cancel.load(Ordering::SeqCst) {
                return Some(Key::Esc);
            }
            let now = Instant::now();
            if now >= deadline {
                return None;
            }
            thread::sleep(POLL_SLICE.min(deadline - now));
        }
    }

    fn close(&mut self) {
        if let Some(title) = self.title.take() {
            info!("preview '{}' closed after {} frame(s)", title, self.frames_shown);
        }
    }
}
