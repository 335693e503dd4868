//! Single-shot QR detection over a pixel buffer.
//!
//! Detection walks an ordered list of [`Tier`]s (by default: native
//! resolution, then a 2x linear upscale) and stops at the first tier whose
//! decode yields at least one symbol.

/// Detection tiers (transform + decode)
pub mod tier;

use image::GrayImage;
use log::debug;

use crate::buffer::PixelBuffer;
use crate::config::ScanConfig;
use crate::decoder::{QrDecode, RqrrDecoder};
use crate::error::{Error, Result};
use crate::models::{DetectionResult, Symbol, TierKind};

pub use tier::{Tier, fallback_tiers, realtime_tiers};

/// Tiered QR detector
#[derive(Debug, Clone)]
pub struct Detector<D = RqrrDecoder> {
    decoder: D,
    tiers: Vec<Tier>,
}

impl Detector<RqrrDecoder> {
    /// Native decode with a single 2x upscale retry
    pub fn new() -> Self {
        Self::from_config(&ScanConfig::default())
    }

    /// Native decode only, for per-frame camera use
    pub fn realtime() -> Self {
        Self::with_decoder(RqrrDecoder::new()).with_tiers(realtime_tiers())
    }

    /// Fallback detector using the configured upscale factor
    pub fn from_config(config: &ScanConfig) -> Self {
        Self::with_decoder(RqrrDecoder::new()).with_tiers(fallback_tiers(config.upscale_factor))
    }
}

impl Default for Detector<RqrrDecoder> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: QrDecode> Detector<D> {
    /// Use a custom decode capability with the default fallback tiers
    pub fn with_decoder(decoder: D) -> Self {
        Self {
            decoder,
            tiers: fallback_tiers(ScanConfig::DEFAULT_UPSCALE_FACTOR),
        }
    }

    /// Replace the tier list
    pub fn with_tiers(mut self, tiers: Vec<Tier>) -> Self {
        self.tiers = tiers;
        self
    }

    /// Tiers in the order they are tried
    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    /// Underlying decode capability
    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    /// Detect the first QR code in `buffer`.
    ///
    /// An empty result means nothing was found; `Err` means the decoder faulted.
    pub fn detect(&self, buffer: &PixelBuffer) -> Result<DetectionResult> {
        if buffer.is_empty() {
            let (width, height) = buffer.dimensions();
            return Err(Error::DecodeFault(format!(
                "cannot decode a {}x{} buffer",
                width, height
            )));
        }
        self.detect_gray(&buffer.to_gray())
    }

    /// Detect the first QR code in an already-grayscale image
    pub fn detect_gray(&self, gray: &GrayImage) -> Result<DetectionResult> {
        Ok(match self.run_tiers(gray)? {
            Some((symbols, kind)) => symbols
                .into_iter()
                .next()
                .map(|symbol| DetectionResult::found(symbol, kind))
                .unwrap_or_default(),
            None => DetectionResult::default(),
        })
    }

    /// All symbols decoded by the first successful tier, in source coordinates
    pub fn detect_all(&self, buffer: &PixelBuffer) -> Result<Vec<Symbol>> {
        Ok(self
            .run_tiers(&buffer.to_gray())?
            .map(|(symbols, _)| symbols)
            .unwrap_or_default())
    }

    fn run_tiers(&self, gray: &GrayImage) -> Result<Option<(Vec<Symbol>, TierKind)>> {
        for tier in &self.tiers {
            let prepared = tier.prepare(gray);
            let mut symbols = self.decoder.decode(&prepared)?;
            // A symbol with no text is not a detection
            symbols.retain(|s| !s.text.is_empty());
            debug!(
                "tier {:?} on {}x{}: {} symbol(s)",
                tier.kind(),
                prepared.width(),
                prepared.height(),
                symbols.len()
            );
            if !symbols.is_empty() {
                let scale = tier.scale();
                let symbols = symbols.iter().map(|s| s.unscale(scale)).collect();
                return Ok(Some((symbols, tier.kind())));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Point, Rect};
    use image::Luma;
    use std::sync::Mutex;

    /// Finds one symbol only when the image is at least `min_width` wide
    struct SizeGatedDecoder {
        min_width: u32,
        calls: Mutex<Vec<(u32, u32)>>,
    }

    impl SizeGatedDecoder {
        fn new(min_width: u32) -> Self {
            Self {
                min_width,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<(u32, u32)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl QrDecode for SizeGatedDecoder {
        fn decode(&self, gray: &GrayImage) -> Result<Vec<Symbol>> {
            self.calls.lock().unwrap().push(gray.dimensions());
            if gray.width() < self.min_width {
                return Ok(Vec::new());
            }
            let corners = [
                Point::new(20.0, 40.0),
                Point::new(120.0, 40.0),
                Point::new(120.0, 140.0),
                Point::new(20.0, 140.0),
            ];
            Ok(vec![Symbol::new("gated", corners)])
        }
    }

    /// Reports an empty-text symbol natively and `"x"` on anything larger
    struct BlankTextDecoder;

    impl QrDecode for BlankTextDecoder {
        fn decode(&self, gray: &GrayImage) -> Result<Vec<Symbol>> {
            let text = if gray.width() > 100 { "x" } else { "" };
            let corners = [
                Point::new(0.0, 0.0),
                Point::new(40.0, 0.0),
                Point::new(40.0, 40.0),
                Point::new(0.0, 40.0),
            ];
            Ok(vec![Symbol::new(text, corners)])
        }
    }

    struct FaultyDecoder;

    impl QrDecode for FaultyDecoder {
        fn decode(&self, _gray: &GrayImage) -> Result<Vec<Symbol>> {
            Err(Error::DecodeFault("backend crashed".into()))
        }
    }

    #[test]
    fn test_native_tier_wins() {
        let detector = Detector::with_decoder(SizeGatedDecoder::new(10));
        let result = detector.detect(&PixelBuffer::filled(100, 100, 255)).unwrap();
        assert_eq!(result.payload.as_deref(), Some("gated"));
        assert_eq!(result.tier, Some(TierKind::Native));
        assert_eq!(result.bounds, Some(Rect::new(20, 40, 100, 100)));
        assert_eq!(detector.decoder().calls(), vec![(100, 100)]);
    }

    #[test]
    fn test_upscale_tier_used_when_native_misses() {
        let detector = Detector::with_decoder(SizeGatedDecoder::new(150));
        let result = detector.detect(&PixelBuffer::filled(100, 100, 255)).unwrap();
        assert_eq!(result.payload.as_deref(), Some("gated"));
        assert_eq!(result.tier, Some(TierKind::Upscaled(2.0)));
        // Bounds come back in the 100x100 source frame
        assert_eq!(result.bounds, Some(Rect::new(10, 20, 50, 50)));
        assert_eq!(detector.decoder().calls(), vec![(100, 100), (200, 200)]);
    }

    #[test]
    fn test_upscale_only_matches_fallback_payload() {
        let buffer = PixelBuffer::filled(100, 100, 255);
        let fallback = Detector::with_decoder(SizeGatedDecoder::new(150));
        let upscale_only = Detector::with_decoder(SizeGatedDecoder::new(150))
            .with_tiers(vec![Tier::upscaled(2.0)]);

        let a = fallback.detect(&buffer).unwrap();
        let b = upscale_only.detect(&buffer).unwrap();
        assert_eq!(a, b);
        assert_eq!(upscale_only.decoder().calls(), vec![(200, 200)]);
    }

    #[test]
    fn test_nothing_found_is_empty_not_error() {
        let detector = Detector::with_decoder(SizeGatedDecoder::new(1000));
        let result = detector.detect(&PixelBuffer::filled(100, 100, 255)).unwrap();
        assert!(result.is_empty());
        assert_eq!(result, DetectionResult::default());
        assert_eq!(detector.decoder().calls().len(), 2);
    }

    #[test]
    fn test_realtime_tiers_never_upscale() {
        let detector =
            Detector::with_decoder(SizeGatedDecoder::new(150)).with_tiers(realtime_tiers());
        let result = detector.detect(&PixelBuffer::filled(100, 100, 255)).unwrap();
        assert!(result.is_empty());
        assert_eq!(detector.decoder().calls(), vec![(100, 100)]);
    }

    #[test]
    fn test_decoder_fault_propagates() {
        let detector = Detector::with_decoder(FaultyDecoder);
        let err = detector.detect(&PixelBuffer::filled(10, 10, 0)).unwrap_err();
        assert!(matches!(err, Error::DecodeFault(_)));
    }

    #[test]
    fn test_empty_text_falls_through_to_upscale() {
        let detector = Detector::with_decoder(BlankTextDecoder);
        let result = detector.detect(&PixelBuffer::filled(100, 100, 255)).unwrap();
        assert_eq!(result.payload.as_deref(), Some("x"));
        assert_eq!(result.tier, Some(TierKind::Upscaled(2.0)));
        assert_eq!(result.bounds, Some(Rect::new(0, 0, 20, 20)));

        let native_only = Detector::with_decoder(BlankTextDecoder).with_tiers(realtime_tiers());
        let result = native_only.detect(&PixelBuffer::filled(100, 100, 255)).unwrap();
        assert_eq!(result, DetectionResult::default());
    }

    #[test]
    fn test_zero_sized_buffer_is_a_fault() {
        let detector = Detector::with_decoder(SizeGatedDecoder::new(0));
        let err = detector.detect(&PixelBuffer::filled(0, 4, 255)).unwrap_err();
        assert!(matches!(err, Error::DecodeFault(_)));
        assert!(detector.decoder().calls().is_empty());
    }

    #[test]
    fn test_blank_buffer_with_rqrr() {
        let detector = Detector::new();
        let gray = GrayImage::from_pixel(100, 100, Luma([255]));
        let result = detector.detect(&PixelBuffer::from(gray.clone())).unwrap();
        assert_eq!(result.payload, None);
        assert_eq!(result.bounds, None);
        assert_eq!(detector.detect_gray(&gray).unwrap(), result);
    }

    #[test]
    fn test_detect_all_unscales_every_symbol() {
        let detector = Detector::with_decoder(SizeGatedDecoder::new(150));
        let symbols = detector.detect_all(&PixelBuffer::filled(100, 100, 255)).unwrap();
        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols[0].corners[0], Point::new(10.0, 20.0));
    }
}
