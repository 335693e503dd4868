use thiserror::Error;

/// Errors produced by the detection pipeline, the camera session and the generator.
///
/// "No QR code in the image" is not represented here: it is an empty
/// [`DetectionResult`](crate::DetectionResult).
#[derive(Debug, Error)]
pub enum Error {
    /// The decode capability itself malfunctioned (not "found nothing").
    #[error("qr decoder fault: {0}")]
    DecodeFault(String),
    /// The capture device could not be opened.
    #[error("capture device {index} unavailable: {reason}")]
    DeviceUnavailable {
        /// Device index that was requested
        index: u32,
        /// Backend-specific reason
        reason: String,
    },
    /// A frame could not be read from an open capture device.
    #[error("capture read failed: {0}")]
    Capture(String),
    /// The display surface rejected a frame.
    #[error("display error: {0}")]
    Display(String),
    /// A camera session thread exited without reporting an outcome.
    #[error("camera session ended without reporting an outcome")]
    SessionLost,
    /// Pixel data does not match the declared dimensions.
    #[error("pixel buffer {width}x{height} with {channels} channel(s) needs {expected} bytes, got {actual}")]
    BufferSize {
        /// Declared width
        width: u32,
        /// Declared height
        height: u32,
        /// Samples per pixel
        channels: u8,
        /// Byte count implied by the dimensions
        expected: usize,
        /// Byte count actually supplied
        actual: usize,
    },
    /// Nothing to encode.
    #[error("qr payload is empty")]
    EmptyPayload,
    /// Image decoding or encoding failed.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    /// The QR encoder rejected the payload.
    #[error("qr encode error: {0}")]
    Encode(#[from] qrcode::types::QrError),
    /// Filesystem error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
