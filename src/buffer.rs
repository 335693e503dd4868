use image::{DynamicImage, GrayImage, RgbImage};

use crate::error::{Error, Result};
use crate::utils::grayscale::rgb_to_grayscale;

/// Sample layout of a [`PixelBuffer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channels {
    /// One intensity sample per pixel
    Gray,
    /// Packed R, G, B samples per pixel
    Rgb,
}

impl Channels {
    /// Samples per pixel
    pub fn count(self) -> u8 {
        match self {
            Channels::Gray => 1,
            Channels::Rgb => 3,
        }
    }
}

/// Row-major pixel data handed to detection.
///
/// Detection only ever borrows a buffer; conversions return fresh copies.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    channels: Channels,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw samples, checking the length against the dimensions
    pub fn new(width: u32, height: u32, channels: Channels, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * channels.count() as usize;
        if data.len() != expected {
            return Err(Error::BufferSize {
                width,
                height,
                channels: channels.count(),
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Single-channel buffer
    pub fn from_gray(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        Self::new(width, height, Channels::Gray, data)
    }

    /// Packed RGB buffer
    pub fn from_rgb(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        Self::new(width, height, Channels::Rgb, data)
    }

    /// Convert a decoded image, keeping it single-channel when it has no color
    pub fn from_image(image: DynamicImage) -> Self {
        let (width, height) = (image.width(), image.height());
        if image.color().has_color() {
            let rgb = image.into_rgb8();
            Self {
                width,
                height,
                channels: Channels::Rgb,
                data: rgb.into_raw(),
            }
        } else {
            let gray = image.into_luma8();
            Self {
                width,
                height,
                channels: Channels::Gray,
                data: gray.into_raw(),
            }
        }
    }

    /// Uniform gray buffer
    pub fn filled(width: u32, height: u32, value: u8) -> Self {
        Self {
            width,
            height,
            channels: Channels::Gray,
            data: vec![value; width as usize * height as usize],
        }
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Sample layout
    pub fn channels(&self) -> Channels {
        self.channels
    }

    /// Raw samples
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// True when either dimension is zero
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Grayscale copy of the buffer
    pub fn to_gray(&self) -> GrayImage {
        let samples = match self.channels {
            Channels::Gray => self.data.clone(),
            Channels::Rgb => {
                rgb_to_grayscale(&self.data, self.width as usize, self.height as usize)
            }
        };
        GrayImage::from_raw(self.width, self.height, samples)
            .unwrap_or_else(|| GrayImage::new(self.width, self.height))
    }

    /// RGB copy of the buffer, used for display and overlays
    pub fn to_rgb(&self) -> RgbImage {
        match self.channels {
            Channels::Rgb => RgbImage::from_raw(self.width, self.height, self.data.clone())
                .unwrap_or_else(|| RgbImage::new(self.width, self.height)),
            Channels::Gray => {
                let mut rgb = RgbImage::new(self.width, self.height);
                for (dst, &v) in rgb.pixels_mut().zip(self.data.iter()) {
                    dst.0 = [v, v, v];
                }
                rgb
            }
        }
    }
}

impl From<GrayImage> for PixelBuffer {
    fn from(gray: GrayImage) -> Self {
        let (width, height) = gray.dimensions();
        Self {
            width,
            height,
            channels: Channels::Gray,
            data: gray.into_raw(),
        }
    }
}

impl From<RgbImage> for PixelBuffer {
    fn from(rgb: RgbImage) -> Self {
        let (width, height) = rgb.dimensions();
        Self {
            width,
            height,
            channels: Channels::Rgb,
            data: rgb.into_raw(),
        }
    }
}
