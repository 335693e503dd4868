//! Scanner settings with environment overrides.
//!
//! Every field has a built-in default; `ScanConfig::from_env` lets the `QR_*`
//! variables override them, and the CLI applies its flags on top.

use std::time::Duration;

use crate::camera::Key;

fn parse_env_u64(name: &str) -> Option<u64> {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
}

fn parse_env_u32(name: &str) -> Option<u32> {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u32>().ok())
}

fn parse_env_f32(name: &str) -> Option<f32> {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<f32>().ok())
        .filter(|v| v.is_finite() && *v > 0.0)
}

fn parse_env_string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Largest image side accepted by the loader before it downscales.
///
/// `QR_MAX_DIM` unset or `0` disables downscaling.
pub fn max_dim_from_env() -> Option<u32> {
    match parse_env_u32("QR_MAX_DIM") {
        Some(0) | None => None,
        Some(v) => Some(v),
    }
}

/// True when `QR_DEBUG` is set
pub fn debug_from_env() -> bool {
    std::env::var_os("QR_DEBUG").is_some()
}

/// Settings shared by the image detector and the camera session
#[derive(Debug, Clone, PartialEq)]
pub struct ScanConfig {
    /// Linear scale of the fallback detection tier
    pub upscale_factor: f32,
    /// Capture device index
    pub camera_index: u32,
    /// How long the annotated frame stays up after a detection
    pub detected_pause: Duration,
    /// Key poll timeout after each displayed frame
    pub key_poll: Duration,
    /// Title of the preview window
    pub window_title: String,
    /// Keys that stop a camera session
    pub cancel_keys: Vec<Key>,
}

impl ScanConfig {
    /// Scale used by the fallback tier unless configured otherwise
    pub const DEFAULT_UPSCALE_FACTOR: f32 = 2.0;

    /// Defaults overridden by `QR_UPSCALE_FACTOR`, `QR_CAMERA_INDEX`,
    /// `QR_DETECTED_PAUSE_MS`, `QR_KEY_POLL_MS` and `QR_WINDOW_TITLE`
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(factor) = parse_env_f32("QR_UPSCALE_FACTOR") {
            config.upscale_factor = factor;
        }
        if let Some(index) = parse_env_u32("QR_CAMERA_INDEX") {
            config.camera_index = index;
        }
        if let Some(ms) = parse_env_u64("QR_DETECTED_PAUSE_MS") {
            config.detected_pause = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_env_u64("QR_KEY_POLL_MS") {
            config.key_poll = Duration::from_millis(ms.max(1));
        }
        if let Some(title) = parse_env_string("QR_WINDOW_TITLE") {
            config.window_title = title;
        }
        config
    }

    /// True when `key` ends a camera session
    pub fn is_cancel(&self, key: Key) -> bool {
        self.cancel_keys.contains(&key)
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            upscale_factor: Self::DEFAULT_UPSCALE_FACTOR,
            camera_index: 0,
            detected_pause: Duration::from_millis(500),
            key_poll: Duration::from_millis(1),
            window_title: "QR Scanner".to_string(),
            cancel_keys: vec![Key::Esc, Key::Char('q')],
        }
    }
}
