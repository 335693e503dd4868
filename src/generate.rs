//! QR code generation.
//!
//! Symbol encoding is delegated to the `qrcode` crate; this module picks the
//! error-correction policy, rasterises the modules and writes a PNG.

use std::path::{Path, PathBuf};

use image::{GrayImage, Luma};
use log::info;
use qrcode::{Color, EcLevel, QrCode};

use crate::error::{Error, Result};

/// Payloads longer than this many characters get the sturdier settings
pub const LONG_PAYLOAD_CHARS: usize = 200;

/// File name used when the user leaves it blank
pub const DEFAULT_FILE_NAME: &str = "qr.png";

/// Encoder settings for one symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeParams {
    /// Error-correction level
    pub ec_level: EcLevel,
    /// Side of one module in pixels
    pub module_size: u32,
    /// Quiet zone width in modules
    pub border: u32,
}

impl EncodeParams {
    /// Level Q with 18 px modules for long payloads, level M with 12 px otherwise
    pub fn for_payload(data: &str) -> Self {
        if data.chars().count() > LONG_PAYLOAD_CHARS {
            Self {
                ec_level: EcLevel::Q,
                module_size: 18,
                border: 4,
            }
        } else {
            Self {
                ec_level: EcLevel::M,
                module_size: 12,
                border: 4,
            }
        }
    }
}

/// Rasterise `data` as black modules on white
pub fn render(data: &str, params: EncodeParams) -> Result<GrayImage> {
    if data.is_empty() {
        return Err(Error::EmptyPayload);
    }
    let code = QrCode::with_error_correction_level(data.as_bytes(), params.ec_level)?;
    let modules = code.width() as u32;
    let colors = code.to_colors();
    let scale = params.module_size.max(1);
    let side = (modules + 2 * params.border) * scale;

    let mut img = GrayImage::from_pixel(side, side, Luma([255]));
    for (i, color) in colors.iter().enumerate() {
        if *color != Color::Dark {
            continue;
        }
        let mx = i as u32 % modules + params.border;
        let my = i as u32 / modules + params.border;
        for dy in 0..scale {
            for dx in 0..scale {
                img.put_pixel(mx * scale + dx, my * scale + dy, Luma([0]));
            }
        }
    }
    Ok(img)
}

/// Encode `data` into a PNG at `output_path`
pub fn encode<P: AsRef<Path>>(data: &str, output_path: P, params: EncodeParams) -> Result<()> {
    let output_path = output_path.as_ref();
    let img = render(data, params)?;
    img.save_with_format(output_path, image::ImageFormat::Png)?;
    info!(
        "wrote {}x{} qr code ({:?}) to {}",
        img.width(),
        img.height(),
        params.ec_level,
        output_path.display()
    );
    Ok(())
}

/// Clean up a user-typed file name: trim, drop surrounding quotes, default
/// to `qr.png`, and make sure it ends in `.png`
pub fn normalize_file_name(name: &str) -> String {
    let name = name.trim().trim_matches(|c| c == '"' || c == '\'').trim();
    if name.is_empty() || name == ".png" {
        return DEFAULT_FILE_NAME.to_string();
    }
    if name.to_lowercase().ends_with(".png") {
        name.to_string()
    } else {
        format!("{}.png", name)
    }
}

/// `dir` joined with the normalised file name
pub fn output_path<P: AsRef<Path>>(dir: P, name: &str) -> PathBuf {
    dir.as_ref().join(normalize_file_name(name))
}
