/// Detection results and decoded symbols
pub mod detection;
/// 2-D points
pub mod point;
/// Axis-aligned rectangles
pub mod rect;

pub use detection::{DetectionResult, Symbol, TierKind};
pub use point::Point;
pub use rect::Rect;
