use super::Point;

/// Axis-aligned box in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    /// Left edge
    pub x: i32,
    /// Top edge
    pub y: i32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Rect {
    /// Create a new rectangle
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Smallest box enclosing all `corners`
    pub fn enclosing(corners: &[Point]) -> Self {
        if corners.is_empty() {
            return Self::default();
        }
        let min_x = corners.iter().fold(f32::INFINITY, |a, p| a.min(p.x));
        let min_y = corners.iter().fold(f32::INFINITY, |a, p| a.min(p.y));
        let max_x = corners.iter().fold(f32::NEG_INFINITY, |a, p| a.max(p.x));
        let max_y = corners.iter().fold(f32::NEG_INFINITY, |a, p| a.max(p.y));

        let x = min_x.floor() as i32;
        let y = min_y.floor() as i32;
        let right = max_x.ceil() as i32;
        let bottom = max_y.ceil() as i32;
        Self::new(x, y, (right - x).max(0) as u32, (bottom - y).max(0) as u32)
    }

    /// Right edge (exclusive)
    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    /// Bottom edge (exclusive)
    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    /// Map a box found on an image scaled by `factor` back to the unscaled image
    pub fn unscale(&self, factor: f32) -> Self {
        if factor == 1.0 || factor <= 0.0 {
            return *self;
        }
        let x0 = (self.x as f32 / factor).floor() as i32;
        let y0 = (self.y as f32 / factor).floor() as i32;
        let x1 = (self.right() as f32 / factor).ceil() as i32;
        let y1 = (self.bottom() as f32 / factor).ceil() as i32;
        Self::new(x0, y0, (x1 - x0).max(0) as u32, (y1 - y0).max(0) as u32)
    }

    /// Inclusive `[x0, y0, x1, y1]` corners clamped to an image of `dims`.
    ///
    /// Returns `None` when the box lies entirely outside the image.
    pub fn clamp_to(&self, dims: (u32, u32)) -> Option<[u32; 4]> {
        let (w, h) = dims;
        if w == 0 || h == 0 || self.width == 0 || self.height == 0 {
            return None;
        }
        if self.right() <= 0 || self.bottom() <= 0 || self.x >= w as i32 || self.y >= h as i32 {
            return None;
        }
        let x0 = self.x.max(0) as u32;
        let y0 = self.y.max(0) as u32;
        let x1 = ((self.right() - 1) as u32).min(w - 1);
        let y1 = ((self.bottom() - 1) as u32).min(h - 1);
        Some([x0, y0, x1, y1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enclosing_corners() {
        let corners = [
            Point::new(10.0, 12.0),
            Point::new(50.5, 11.0),
            Point::new(49.0, 60.2),
            Point::new(9.5, 59.0),
        ];
        let rect = Rect::enclosing(&corners);
        assert_eq!(rect, Rect::new(9, 11, 42, 50));
    }

    #[test]
    fn test_unscale_halves_box() {
        let rect = Rect::new(40, 20, 100, 60).unscale(2.0);
        assert_eq!(rect, Rect::new(20, 10, 50, 30));
    }

    #[test]
    fn test_clamp_to_image() {
        let rect = Rect::new(-5, 3, 20, 200);
        assert_eq!(rect.clamp_to((10, 50)), Some([0, 3, 9, 49]));
        assert_eq!(Rect::new(100, 100, 5, 5).clamp_to((10, 10)), None);
        assert_eq!(Rect::new(0, 0, 0, 5).clamp_to((10, 10)), None);
    }
}
