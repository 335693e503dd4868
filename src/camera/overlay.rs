use image::{Rgb, RgbImage};

/// Draw a rectangle border with given thickness.
///
/// `bbox_px` is inclusive `[x0, y0, x1, y1]`; see [`Rect::clamp_to`](crate::Rect::clamp_to).
pub fn draw_rect(img: &mut RgbImage, bbox_px: [u32; 4], color: Rgb<u8>, thickness: u32) {
    let (w, h) = img.dimensions();
    let [x0, y0, x1, y1] = bbox_px;
    for t in 0..thickness {
        let xx0 = x0.saturating_add(t);
        let yy0 = y0.saturating_add(t);
        let xx1 = x1.saturating_sub(t);
        let yy1 = y1.saturating_sub(t);
        if xx0 >= w || yy0 >= h || xx1 >= w || yy1 >= h || xx0 > xx1 || yy0 > yy1 {
            continue;
        }
        for x in xx0..=xx1 {
            img.put_pixel(x, yy0, color);
            img.put_pixel(x, yy1, color);
        }
        for y in yy0..=yy1 {
            img.put_pixel(xx0, y, color);
            img.put_pixel(xx1, y, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GREEN: Rgb<u8> = Rgb([0, 255, 0]);

    #[test]
    fn test_border_only() {
        let mut img = RgbImage::new(10, 10);
        draw_rect(&mut img, [2, 2, 7, 7], GREEN, 2);
        assert_eq!(*img.get_pixel(2, 2), GREEN);
        assert_eq!(*img.get_pixel(3, 5), GREEN);
        assert_eq!(*img.get_pixel(7, 4), GREEN);
        assert_eq!(*img.get_pixel(5, 5), Rgb([0, 0, 0]));
        assert_eq!(*img.get_pixel(0, 0), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_out_of_bounds_box_is_skipped() {
        let mut img = RgbImage::new(4, 4);
        draw_rect(&mut img, [5, 5, 9, 9], GREEN, 1);
        assert!(img.pixels().all(|p| *p == Rgb([0, 0, 0])));
    }
}
