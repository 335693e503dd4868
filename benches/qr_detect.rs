use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::imageops::{self, FilterType};
use qr_tool::generate::{EncodeParams, render};
use qr_tool::{Detector, PixelBuffer};

fn bench_detect_blank(c: &mut Criterion) {
    let detector = Detector::new();
    for (w, h) in [(100, 100), (640, 480), (1920, 1080)] {
        let buffer = PixelBuffer::filled(w, h, 255);
        // Blank frames run every tier
        c.bench_function(&format!("detect_blank_{}x{}", w, h), |b| {
            b.iter(|| detector.detect(black_box(&buffer)))
        });
    }
}

fn bench_detect_native_hit(c: &mut Criterion) {
    let data = "https://example.com/bench";
    let code = render(data, EncodeParams::for_payload(data)).expect("render");
    let buffer = PixelBuffer::from(code);
    let detector = Detector::new();
    c.bench_function("detect_native_hit", |b| {
        b.iter(|| detector.detect(black_box(&buffer)))
    });
}

fn bench_detect_upscale_hit(c: &mut Criterion) {
    // Too small for the native tier, legible after the 2x upscale
    let data = "https://example.com/x";
    let params = EncodeParams {
        module_size: 4,
        ..EncodeParams::for_payload(data)
    };
    let code = render(data, params).expect("render");
    let small = imageops::resize(&code, code.width() / 2, code.height() / 2, FilterType::Triangle);
    let buffer = PixelBuffer::from(small);

    let realtime = Detector::realtime();
    c.bench_function("detect_small_native_only", |b| {
        b.iter(|| realtime.detect(black_box(&buffer)))
    });

    let fallback = Detector::new();
    c.bench_function("detect_small_with_fallback", |b| {
        b.iter(|| fallback.detect(black_box(&buffer)))
    });
}

criterion_group!(
    benches,
    bench_detect_blank,
    bench_detect_native_hit,
    bench_detect_upscale_hit
);
criterion_main!(benches);
