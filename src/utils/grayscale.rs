//! RGB to grayscale conversion.
//!
//! Y = 0.299*R + 0.587*G + 0.114*B, computed with integer arithmetic:
//! Y = (77*R + 150*G + 29*B) >> 8

use rayon::prelude::*;

const COEF_R: u32 = 77;
const COEF_G: u32 = 150;
const COEF_B: u32 = 29;

/// Images with at least this many pixels are converted row-parallel
pub const PARALLEL_THRESHOLD: usize = 640 * 480;

#[inline]
fn luma(r: u8, g: u8, b: u8) -> u8 {
    let lum = (COEF_R * r as u32 + COEF_G * g as u32 + COEF_B * b as u32) >> 8;
    lum.min(255) as u8
}

/// Convert packed RGB bytes to grayscale, picking the parallel path for large frames
pub fn rgb_to_grayscale(rgb: &[u8], width: usize, height: usize) -> Vec<u8> {
    if width * height >= PARALLEL_THRESHOLD {
        rgb_to_grayscale_parallel(rgb, width, height)
    } else {
        rgb_to_grayscale_scalar(rgb, width, height)
    }
}

/// Single-threaded conversion
pub fn rgb_to_grayscale_scalar(rgb: &[u8], width: usize, height: usize) -> Vec<u8> {
    rgb.chunks_exact(3)
        .take(width * height)
        .map(|px| luma(px[0], px[1], px[2]))
        .collect()
}

/// Convert RGB to grayscale processing rows in parallel
pub fn rgb_to_grayscale_parallel(rgb: &[u8], width: usize, height: usize) -> Vec<u8> {
    let mut gray = vec![0u8; width * height];
    if width == 0 {
        return gray;
    }

    gray.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        let row_start = y * width * 3;
        let src = &rgb[row_start..row_start + width * 3];
        for (out, px) in row.iter_mut().zip(src.chunks_exact(3)) {
            *out = luma(px[0], px[1], px[2]);
        }
    });

    gray
}
