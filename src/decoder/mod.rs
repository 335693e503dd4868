//! The decode capability used by every detection tier.
//!
//! A decoder turns one grayscale image into zero or more [`Symbol`]s. Finding
//! nothing is an empty list; `Err` is reserved for the decoder itself failing.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use image::GrayImage;
use log::debug;
use rqrr::PreparedImage;

use crate::error::{Error, Result};
use crate::models::{Point, Symbol};

/// Something that can find and decode QR symbols in a grayscale image
pub trait QrDecode {
    /// Decode every readable symbol in `gray`
    fn decode(&self, gray: &GrayImage) -> Result<Vec<Symbol>>;
}

impl<T: QrDecode + ?Sized> QrDecode for &T {
    fn decode(&self, gray: &GrayImage) -> Result<Vec<Symbol>> {
        (**self).decode(gray)
    }
}

impl<T: QrDecode + ?Sized> QrDecode for Box<T> {
    fn decode(&self, gray: &GrayImage) -> Result<Vec<Symbol>> {
        (**self).decode(gray)
    }
}

/// Decoder backed by the pure-Rust `rqrr` reader
#[derive(Debug, Clone, Copy, Default)]
pub struct RqrrDecoder;

impl RqrrDecoder {
    /// Create a new decoder
    pub fn new() -> Self {
        Self
    }
}

impl QrDecode for RqrrDecoder {
    fn decode(&self, gray: &GrayImage) -> Result<Vec<Symbol>> {
        let (width, height) = (gray.width() as usize, gray.height() as usize);
        if width == 0 || height == 0 {
            return Err(Error::DecodeFault(format!(
                "cannot decode a {}x{} image",
                width, height
            )));
        }

        let raw = gray.as_raw();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            let mut prepared =
                PreparedImage::prepare_from_greyscale(width, height, |x, y| raw[y * width + x]);
            let grids = prepared.detect_grids();
            let mut symbols = Vec::with_capacity(grids.len());
            for grid in grids {
                let corners = grid.bounds.map(|p| Point::new(p.x as f32, p.y as f32));
                match grid.decode() {
                    Ok((_meta, text)) => symbols.push(Symbol::new(text, corners)),
                    Err(err) => debug!(
                        "grid near ({:.0}, {:.0}) unreadable: {:?}",
                        corners[0].x, corners[0].y, err
                    ),
                }
            }
            symbols
        }));

        outcome.map_err(|payload| Error::DecodeFault(panic_message(payload)))
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "decoder panicked".to_string()
    }
}
