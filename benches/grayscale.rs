use criterion::{Criterion, black_box, criterion_group, criterion_main};
use qr_tool::utils::grayscale::{
    rgb_to_grayscale, rgb_to_grayscale_parallel, rgb_to_grayscale_scalar,
};

const SIZES: [(usize, usize); 3] = [(100, 100), (640, 480), (1920, 1080)];

fn bench_rgb_to_grayscale(c: &mut Criterion) {
    for (w, h) in SIZES {
        let image = vec![128u8; w * h * 3];
        c.bench_function(&format!("rgb_to_grayscale_{}x{}", w, h), |b| {
            b.iter(|| rgb_to_grayscale(black_box(&image), black_box(w), black_box(h)))
        });
    }
}

fn bench_rgb_to_grayscale_scalar(c: &mut Criterion) {
    for (w, h) in SIZES {
        let image = vec![128u8; w * h * 3];
        c.bench_function(&format!("rgb_to_grayscale_scalar_{}x{}", w, h), |b| {
            b.iter(|| rgb_to_grayscale_scalar(black_box(&image), black_box(w), black_box(h)))
        });
    }
}

fn bench_rgb_to_grayscale_parallel(c: &mut Criterion) {
    for (w, h) in SIZES {
        let image = vec![128u8; w * h * 3];
        c.bench_function(&format!("rgb_to_grayscale_parallel_{}x{}", w, h), |b| {
            b.iter(|| rgb_to_grayscale_parallel(black_box(&image), black_box(w), black_box(h)))
        });
    }
}

criterion_group!(
    benches,
    bench_rgb_to_grayscale,
    bench_rgb_to_grayscale_scalar,
    bench_rgb_to_grayscale_parallel
);
criterion_main!(benches);
