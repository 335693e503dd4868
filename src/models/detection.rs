use super::{Point, Rect};

/// A symbol reported by the decode capability
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    /// Decoded text
    pub text: String,
    /// Corner points in image coordinates
    pub corners: [Point; 4],
    /// Axis-aligned box around `corners`
    pub bounds: Rect,
}

impl Symbol {
    /// Build a symbol from its corner points
    pub fn new(text: impl Into<String>, corners: [Point; 4]) -> Self {
        Self {
            text: text.into(),
            bounds: Rect::enclosing(&corners),
            corners,
        }
    }

    /// Map a symbol found on a scaled copy back to the source image
    pub fn unscale(&self, factor: f32) -> Self {
        if factor == 1.0 {
            return self.clone();
        }
        Self {
            text: self.text.clone(),
            corners: self.corners.map(|p| p.unscale(factor)),
            bounds: self.bounds.unscale(factor),
        }
    }
}

/// Which detection tier produced a payload
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TierKind {
    /// Decode at the buffer's own resolution
    Native,
    /// Decode after a linear upscale by the given factor
    Upscaled(f32),
}

/// Outcome of one detection call
///
/// The default value (all `None`) means no QR code was found; it is not an error.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DetectionResult {
    /// Text of the first symbol found
    pub payload: Option<String>,
    /// Box of the first symbol, in source buffer coordinates
    pub bounds: Option<Rect>,
    /// Tier that produced the payload
    pub tier: Option<TierKind>,
}

impl DetectionResult {
    /// Result for the first symbol decoded by `tier`
    pub fn found(symbol: Symbol, tier: TierKind) -> Self {
        Self {
            payload: Some(symbol.text),
            bounds: Some(symbol.bounds),
            tier: Some(tier),
        }
    }

    /// True when no payload was decoded
    pub fn is_empty(&self) -> bool {
        self.payload.is_none()
    }
}
