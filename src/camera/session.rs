use image::Rgb;
use log::{debug, info, warn};

use super::overlay::draw_rect;
use super::{CaptureBackend, CaptureDevice, DisplaySurface};
use crate::config::ScanConfig;
use crate::decoder::{QrDecode, RqrrDecoder};
use crate::detector::{Detector, realtime_tiers};
use crate::error::Error;
use crate::models::DetectionResult;

const HIGHLIGHT: Rgb<u8> = Rgb([0, 255, 0]);
const HIGHLIGHT_THICKNESS: u32 = 2;

/// States of a camera session
#[derive(Debug)]
pub enum SessionState {
    /// Acquiring the capture device
    Opening,
    /// Reading and scanning frames
    Streaming,
    /// A code was found; the annotated frame is on screen
    Detected {
        /// Decoded text
        payload: String,
    },
    /// Terminal: the session is over
    Closed(SessionEnd),
    /// Terminal: the device could not be opened
    Failed(Error),
}

/// Why a session stopped
#[derive(Debug)]
pub enum SessionEnd {
    /// A code was decoded
    Detected(String),
    /// The user pressed a cancel key
    Cancelled,
    /// The device stopped delivering frames
    StreamEnded,
    /// The device never opened
    DeviceUnavailable(Error),
}

/// Result of [`CameraSession::run`]
#[derive(Debug)]
pub struct SessionOutcome {
    /// How the session ended
    pub end: SessionEnd,
    /// Frames successfully read from the device
    pub frames_read: usize,
}

impl SessionOutcome {
    /// Decoded text, if the session ended with a detection
    pub fn payload(&self) -> Option<&str> {
        match &self.end {
            SessionEnd::Detected(payload) => Some(payload),
            _ => None,
        }
    }

    /// Consume the outcome, keeping only the decoded text
    pub fn into_payload(self) -> Option<String> {
        match self.end {
            SessionEnd::Detected(payload) => Some(payload),
            _ => None,
        }
    }

    /// Error detail when the device could not be opened
    pub fn error(&self) -> Option<&Error> {
        match &self.end {
            SessionEnd::DeviceUnavailable(err) => Some(err),
            _ => None,
        }
    }
}

/// Owns the open device and the display for one session; releases both on drop
struct Resources<'a, C: CaptureDevice, S: DisplaySurface> {
    device: Option<C>,
    display: &'a mut S,
    released: bool,
}

impl<'a, C: CaptureDevice, S: DisplaySurface> Resources<'a, C, S> {
    fn new(display: &'a mut S) -> Self {
        Self {
            device: None,
            display,
            released: false,
        }
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Some(mut device) = self.device.take() {
            device.release();
        }
        self.display.close();
    }
}

impl<C: CaptureDevice, S: DisplaySurface> Drop for Resources<'_, C, S> {
    fn drop(&mut self) {
        self.release();
    }
}

/// A bounded scan loop over one capture device
pub struct CameraSession<B, S, D = RqrrDecoder> {
    backend: B,
    display: S,
    detector: Detector<D>,
    config: ScanConfig,
}

impl<B: CaptureBackend, S: DisplaySurface> CameraSession<B, S, RqrrDecoder> {
    /// Session using the default decoder
    pub fn new(backend: B, display: S, config: ScanConfig) -> Self {
        Self {
            backend,
            display,
            detector: Detector::realtime(),
            config,
        }
    }
}

impl<B: CaptureBackend, S: DisplaySurface, D: QrDecode> CameraSession<B, S, D> {
    /// Swap the decode capability. Frames are always decoded at native resolution.
    pub fn with_decoder<E: QrDecode>(self, decoder: E) -> CameraSession<B, S, E> {
        CameraSession {
            backend: self.backend,
            display: self.display,
            detector: Detector::with_decoder(decoder).with_tiers(realtime_tiers()),
            config: self.config,
        }
    }

    /// Run until detection, cancel, end of stream or open failure.
    ///
    /// The device and display are released exactly once on every path.
    pub fn run(self) -> SessionOutcome {
        let CameraSession {
            mut backend,
            mut display,
            detector,
            config,
        } = self;

        let mut resources: Resources<'_, B::Device, S> = Resources::new(&mut display);
        let mut frames_read = 0usize;
        let mut state = SessionState::Opening;

        let end = loop {
            state = match state {
                SessionState::Opening => match backend.open(config.camera_index) {
                    Ok(device) => {
                        info!("camera {} opened", config.camera_index);
                        resources.device = Some(device);
                        SessionState::Streaming
                    }
                    Err(err) => {
                        warn!("camera {} unavailable: {}", config.camera_index, err);
                        SessionState::Failed(err)
                    }
                },
                SessionState::Streaming => {
                    stream_step(&detector, &config, &mut resources, &mut frames_read)
                }
                SessionState::Detected { payload } => {
                    // Keep the highlight up briefly; keys are ignored
                    let _ = resources.display.poll_key(config.detected_pause);
                    SessionState::Closed(SessionEnd::Detected(payload))
                }
                SessionState::Closed(end) => break end,
                SessionState::Failed(err) => break SessionEnd::DeviceUnavailable(err),
            };
        };

        resources.release();
        info!("camera session ended after {} frame(s): {:?}", frames_read, end);
        SessionOutcome { end, frames_read }
    }
}

fn stream_step<C, S, D>(
    detector: &Detector<D>,
    config: &ScanConfig,
    resources: &mut Resources<'_, C, S>,
    frames_read: &mut usize,
) -> SessionState
where
    C: CaptureDevice,
    S: DisplaySurface,
    D: QrDecode,
{
    let Some(device) = resources.device.as_mut() else {
        return SessionState::Closed(SessionEnd::StreamEnded);
    };

    let frame = match device.read_frame() {
        Ok(Some(frame)) => frame,
        Ok(None) => {
            info!("capture stream ended");
            return SessionState::Closed(SessionEnd::StreamEnded);
        }
        Err(err) => {
            warn!("frame read failed: {}", err);
            return SessionState::Closed(SessionEnd::StreamEnded);
        }
    };
    *frames_read += 1;

    let detection = detector.detect(&frame).unwrap_or_else(|err| {
        warn!("frame {}: {}", frames_read, err);
        DetectionResult::default()
    });

    let mut view = frame.to_rgb();
    if let Some(payload) = detection.payload {
        debug!("frame {}: decoded {:?}", frames_read, payload);
        if let Some(bounds) = detection.bounds.and_then(|b| b.clamp_to(view.dimensions())) {
            draw_rect(&mut view, bounds, HIGHLIGHT, HIGHLIGHT_THICKNESS);
        }
        show(&mut *resources.display, &config.window_title, &view);
        return SessionState::Detected { payload };
    }

    show(&mut *resources.display, &config.window_title, &view);
    match resources.display.poll_key(config.key_poll) {
        Some(key) if config.is_cancel(key) => {
            info!("scan cancelled by {:?}", key);
            SessionState::Closed(SessionEnd::Cancelled)
        }
        _ => SessionState::Streaming,
    }
}

fn show<S: DisplaySurface>(display: &mut S, title: &str, frame: &image::RgbImage) {
    if let Err(err) = display.show(title, frame) {
        warn!("display: {}", err);
    }
}
