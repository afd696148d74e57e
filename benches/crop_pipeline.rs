//! Crop pipeline benchmark suite.
//!
//! Benchmarks decoding, clipping and re-encoding a viewport capture at
//! different device pixel ratios and output formats.
//!
//! Run with: cargo bench --bench crop_pipeline
//! Results saved to: target/criterion/

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use image::{DynamicImage, Rgba, RgbaImage};
use webclip_picker::geometry::{Rect, Viewport};
use webclip_picker::imaging::{crop_capture, encode_data_url, encode_image};
use webclip_picker::ImageFormat;

// ============================================================================
// Benchmark Parameters
// ============================================================================

const VIEWPORT_WIDTH: f64 = 1280.0;
const VIEWPORT_HEIGHT: f64 = 720.0;
const DEVICE_PIXEL_RATIOS: &[f64] = &[1.0, 2.0];

// ============================================================================
// Fixtures
// ============================================================================

/// Builds a PNG capture of the whole viewport at `device_pixel_ratio`.
fn capture(device_pixel_ratio: f64) -> String {
    let width = (VIEWPORT_WIDTH * device_pixel_ratio) as u32;
    let height = (VIEWPORT_HEIGHT * device_pixel_ratio) as u32;
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 251) as u8, (y % 241) as u8, ((x ^ y) % 239) as u8, 255])
    });

    let bytes = encode_image(&DynamicImage::ImageRgba8(img), ImageFormat::Png)
        .expect("fixture encode");
    encode_data_url("image/png", &bytes)
}

// ============================================================================
// Benchmark: Crop Capture
// ============================================================================

fn bench_crop_capture(c: &mut Criterion) {
    let mut group = c.benchmark_group("crop_capture");
    group.sample_size(20);

    // partially offscreen, exercises clipping
    let selection = Rect::new(200.0, 400.0, 640.0, 480.0);

    for &ratio in DEVICE_PIXEL_RATIOS {
        let data_url = capture(ratio);
        let viewport = Viewport::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT).with_device_pixel_ratio(ratio);

        for (name, format) in [("png", ImageFormat::png()), ("jpeg", ImageFormat::jpeg(90))] {
            group.bench_with_input(BenchmarkId::new(name, ratio), &data_url, |b, data_url| {
                b.iter(|| {
                    crop_capture(black_box(data_url), selection, viewport, format)
                        .expect("crop")
                });
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_crop_capture);
criterion_main!(benches);
