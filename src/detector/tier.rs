use std::borrow::Cow;

use image::GrayImage;

use crate::models::TierKind;
use crate::utils::resize::scale_linear;

/// One detection attempt: an image transform followed by a decode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tier {
    kind: TierKind,
}

impl Tier {
    /// Decode the grayscale image as-is
    pub const fn native() -> Self {
        Self {
            kind: TierKind::Native,
        }
    }

    /// Decode a copy scaled by `factor` with linear interpolation
    pub const fn upscaled(factor: f32) -> Self {
        Self {
            kind: TierKind::Upscaled(factor),
        }
    }

    /// What this tier does
    pub fn kind(&self) -> TierKind {
        self.kind
    }

    /// Linear scale applied to the image before decoding
    pub fn scale(&self) -> f32 {
        match self.kind {
            TierKind::Native => 1.0,
            TierKind::Upscaled(factor) => factor,
        }
    }

    /// Image this tier hands to the decoder; the source is never modified
    pub fn prepare<'a>(&self, gray: &'a GrayImage) -> Cow<'a, GrayImage> {
        match self.kind {
            TierKind::Native => Cow::Borrowed(gray),
            TierKind::Upscaled(factor) if factor == 1.0 => Cow::Borrowed(gray),
            TierKind::Upscaled(factor) => Cow::Owned(scale_linear(gray, factor)),
        }
    }
}

/// Native decode, then a single retry at `upscale_factor`
pub fn fallback_tiers(upscale_factor: f32) -> Vec<Tier> {
    vec![Tier::native(), Tier::upscaled(upscale_factor)]
}

/// Latency-sensitive path: native decode only
pub fn realtime_tiers() -> Vec<Tier> {
    vec![Tier::native()]
}
