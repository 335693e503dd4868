//! qr_tool - QR code generation and detection
//!
//! Detects QR codes in still images (native resolution first, then a single
//! 2x upscale retry) and in live camera streams driven by an explicit session
//! state machine. Generation is delegated to the `qrcode` crate.
//!
//! ```no_run
//! let buffer = qr_tool::tools::load_pixel_buffer("ticket.png")?;
//! match qr_tool::detect(&buffer)?.payload {
//!     Some(text) => println!("{}", text),
//!     None => println!("No QR found."),
//! }
//! # Ok::<(), qr_tool::Error>(())
//! ```

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Pixel buffers handed to the detector
pub mod buffer;
/// Live camera scanning (capture, display, session state machine)
pub mod camera;
/// Scanner settings and environment overrides
pub mod config;
/// Decode capability (symbol location and payload extraction)
pub mod decoder;
/// Tiered single-image detection
pub mod detector;
/// Crate error type
pub mod error;
/// QR code generation
pub mod generate;
/// Core data structures (DetectionResult, Rect, Point, etc.)
pub mod models;
/// File loading and batch scanning
pub mod tools;
/// Utility functions (grayscale, resize)
pub mod utils;

pub use buffer::{Channels, PixelBuffer};
pub use config::ScanConfig;
pub use decoder::{QrDecode, RqrrDecoder};
pub use detector::{Detector, Tier};
pub use error::{Error, Result};
pub use models::{DetectionResult, Point, Rect, Symbol, TierKind};

/// Detect the first QR code in `buffer` with the default detector
///
/// Tries native resolution, then a 2x linear upscale. Bounds are always in
/// `buffer` coordinates.
pub fn detect(buffer: &PixelBuffer) -> Result<DetectionResult> {
    Detector::new().detect(buffer)
}

/// Detect a QR code in raw RGB bytes (3 bytes per pixel)
pub fn detect_rgb(image: &[u8], width: u32, height: u32) -> Result<DetectionResult> {
    let buffer = PixelBuffer::from_rgb(width, height, image.to_vec())?;
    detect(&buffer)
}
