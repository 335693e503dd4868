//! End-to-end detection tests: real `rqrr` decoding of `qrcode`-rendered images.

use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Luma, RgbImage};
use qr_tool::generate::{self, EncodeParams};
use qr_tool::tools::{load_pixel_buffer, scan_paths};
use qr_tool::{DetectionResult, Detector, PixelBuffer, TierKind, detect};

fn code_image(data: &str, module_size: u32) -> GrayImage {
    let params = EncodeParams {
        module_size,
        ..EncodeParams::for_payload(data)
    };
    generate::render(data, params).unwrap()
}

#[test]
fn test_native_tier_decodes_legible_code() {
    let img = code_image("https://example.com/ticket/42", 8);
    let (w, h) = img.dimensions();
    let result = detect(&PixelBuffer::from(img)).unwrap();

    assert_eq!(result.payload.as_deref(), Some("https://example.com/ticket/42"));
    assert_eq!(result.tier, Some(TierKind::Native));

    let bounds = result.bounds.unwrap();
    // The symbol sits inside the 4-module quiet zone
    assert!(bounds.x >= 8 * 3 && bounds.y >= 8 * 3);
    assert!(bounds.right() <= w as i32 && bounds.bottom() <= h as i32);
    assert!(bounds.width > w / 2 && bounds.height > h / 2);
}

#[test]
fn test_rgb_buffer_is_converted_first() {
    let gray = code_image("HELLO", 6);
    let rgb = DynamicImage::ImageLuma8(gray).to_rgb8();
    let result = detect(&PixelBuffer::from(rgb)).unwrap();
    assert_eq!(result.payload.as_deref(), Some("HELLO"));
}

#[test]
fn test_white_buffer_finds_nothing() {
    let result = detect(&PixelBuffer::filled(100, 100, 255)).unwrap();
    assert_eq!(result.payload, None);
    assert_eq!(result.bounds, None);
    assert_eq!(result, DetectionResult::default());

    let rgb = PixelBuffer::from(RgbImage::from_pixel(100, 100, image::Rgb([255, 255, 255])));
    assert!(detect(&rgb).unwrap().is_empty());
}

#[test]
fn test_detect_is_idempotent_and_leaves_buffer_alone() {
    let buffer = PixelBuffer::from(code_image("same every time", 6));
    let before = buffer.as_bytes().to_vec();
    let detector = Detector::new();

    let first = detector.detect(&buffer).unwrap();
    let second = detector.detect(&buffer).unwrap();
    assert_eq!(first, second);
    assert_eq!(buffer.as_bytes(), before.as_slice());
}

#[test]
fn test_upscale_only_list_agrees_with_native() {
    let buffer = PixelBuffer::from(code_image("HELLO", 6));
    let native = Detector::realtime().detect(&buffer).unwrap();
    let upscale_only = Detector::new()
        .with_tiers(vec![qr_tool::Tier::upscaled(2.0)])
        .detect(&buffer)
        .unwrap();

    assert_eq!(native.payload, upscale_only.payload);
    assert_eq!(upscale_only.tier, Some(TierKind::Upscaled(2.0)));
    // Bounds come back in source coordinates, within rounding
    let (a, b) = (native.bounds.unwrap(), upscale_only.bounds.unwrap());
    assert!((a.x - b.x).abs() <= 2 && (a.y - b.y).abs() <= 2);
    assert!(a.width.abs_diff(b.width) <= 3 && a.height.abs_diff(b.height) <= 3);
}

#[test]
fn test_small_code_needs_the_upscale_tier() {
    let data = "https://example.com/x";
    let img = code_image(data, 4);
    let small = imageops::resize(&img, img.width() / 2, img.height() / 2, FilterType::Triangle);
    let buffer = PixelBuffer::from(small);

    assert!(Detector::realtime().detect(&buffer).unwrap().is_empty());

    let fallback = Detector::new().detect(&buffer).unwrap();
    assert_eq!(fallback.payload.as_deref(), Some(data));
    assert_eq!(fallback.tier, Some(TierKind::Upscaled(2.0)));
    let bounds = fallback.bounds.unwrap();
    assert!(bounds.right() <= buffer.width() as i32 && bounds.bottom() <= buffer.height() as i32);

    let upscale_only = Detector::new()
        .with_tiers(vec![qr_tool::Tier::upscaled(2.0)])
        .detect(&buffer)
        .unwrap();
    assert_eq!(upscale_only.payload, fallback.payload);
}

#[test]
fn test_generate_then_scan_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = generate::output_path(dir.path(), " \"wifi\" ");
    assert!(path.ends_with("wifi.png"));

    let data = "WIFI:S:home;T:WPA;P:secret;;";
    generate::encode(data, &path, EncodeParams::for_payload(data)).unwrap();

    let buffer = load_pixel_buffer(&path).unwrap();
    assert_eq!(detect(&buffer).unwrap().payload.as_deref(), Some(data));
}

#[test]
fn test_long_payload_uses_sturdier_code() {
    let data = "x".repeat(250);
    let params = EncodeParams::for_payload(&data);
    assert_eq!(params.module_size, 18);
    let img = generate::render(&data, EncodeParams { module_size: 4, ..params }).unwrap();
    let result = detect(&PixelBuffer::from(img)).unwrap();
    assert_eq!(result.payload, Some(data));
}

#[test]
fn test_batch_scan_reports_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let hit = dir.path().join("hit.png");
    let miss = dir.path().join("miss.png");
    code_image("batch", 6).save(&hit).unwrap();
    GrayImage::from_pixel(80, 80, Luma([255])).save(&miss).unwrap();

    let reports = scan_paths(&Detector::new(), &[miss.clone(), hit.clone()]);
    assert_eq!(reports[0].path, miss);
    assert!(reports[0].result.as_ref().unwrap().is_empty());
    assert_eq!(reports[1].path, hit);
    assert_eq!(
        reports[1].result.as_ref().unwrap().payload.as_deref(),
        Some("batch")
    );
}
