use image::GrayImage;
use image::imageops::{self, FilterType};

/// Target dimensions for scaling `(width, height)` by `factor`, never below 1x1
pub fn scaled_dims(width: u32, height: u32, factor: f32) -> (u32, u32) {
    let w = (width as f32 * factor).round().max(1.0) as u32;
    let h = (height as f32 * factor).round().max(1.0) as u32;
    (w, h)
}

/// Resize a copy of `gray` by `factor` in both axes with linear interpolation
pub fn scale_linear(gray: &GrayImage, factor: f32) -> GrayImage {
    let (w, h) = scaled_dims(gray.width(), gray.height(), factor);
    imageops::resize(gray, w, h, FilterType::Triangle)
}
