//! File-facing helpers: loading images into pixel buffers and batch scanning.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use image::GenericImageView;
use log::debug;
use rayon::prelude::*;

use crate::buffer::PixelBuffer;
use crate::config::max_dim_from_env;
use crate::decoder::QrDecode;
use crate::detector::Detector;
use crate::error::{Error, Result};
use crate::models::DetectionResult;

/// Extensions picked up when walking directories
pub const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "bmp", "gif", "webp"];

/// Load an image file into a [`PixelBuffer`].
///
/// A missing file is reported as `Error::Io` with `NotFound`; an unreadable
/// one as `Error::Image`. Images larger than `QR_MAX_DIM` are downscaled.
pub fn load_pixel_buffer<P: AsRef<Path>>(path: P) -> Result<PixelBuffer> {
    load_pixel_buffer_with_max_dim(path, max_dim_from_env())
}

/// [`load_pixel_buffer`] with an explicit size cap
pub fn load_pixel_buffer_with_max_dim<P: AsRef<Path>>(
    path: P,
    max_dim: Option<u32>,
) -> Result<PixelBuffer> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(Error::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("file not found: {}", path.display()),
        )));
    }

    let img = image::open(path)?;
    let img = match max_dim {
        Some(max_dim) => {
            let (orig_w, orig_h) = img.dimensions();
            if orig_w.max(orig_h) > max_dim {
                debug!(
                    "downscaling {} from {}x{} to fit {}",
                    path.display(),
                    orig_w,
                    orig_h,
                    max_dim
                );
                img.resize(max_dim, max_dim, image::imageops::FilterType::Triangle)
            } else {
                img
            }
        }
        None => img,
    };
    Ok(PixelBuffer::from_image(img))
}

/// Load and detect in one call
pub fn scan_file<D: QrDecode, P: AsRef<Path>>(
    detector: &Detector<D>,
    path: P,
) -> Result<DetectionResult> {
    let buffer = load_pixel_buffer(path)?;
    detector.detect(&buffer)
}

/// Per-file outcome of [`scan_paths`]
#[derive(Debug)]
pub struct ScanReport {
    /// Scanned file
    pub path: PathBuf,
    /// Detection outcome or load/decoder error
    pub result: Result<DetectionResult>,
}

/// Scan many files in parallel; reports keep the order of `paths`
pub fn scan_paths<D>(detector: &Detector<D>, paths: &[PathBuf]) -> Vec<ScanReport>
where
    D: QrDecode + Sync,
{
    paths
        .par_iter()
        .map(|path| ScanReport {
            path: path.clone(),
            result: scan_file(detector, path),
        })
        .collect()
}

/// Expand directories into the image files below them; files pass through as-is
pub fn expand_inputs(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut out = Vec::new();
    for input in inputs {
        if input.is_dir() {
            out.extend(collect_images(input));
        } else {
            out.push(input.clone());
        }
    }
    out
}

/// True when `path` has one of [`IMAGE_EXTENSIONS`]
pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// Every image file under `root`, sorted
pub fn collect_images(root: &Path) -> Vec<PathBuf> {
    let mut stack = vec![root.to_path_buf()];
    let mut images = Vec::new();

    while let Some(dir) = stack.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(_) => continue,
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else if is_image_path(&path) {
                images.push(path);
            }
        }
    }

    images.sort();
    images
}
