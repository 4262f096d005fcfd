//! Benchmarks for the per-frame simulation and image reconciliation.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use image::{Rgba, RgbaImage};
use pixeldust::{Canvas, EffectConfig, Field, Vibrate};

const WIDTH: u32 = 640;
const HEIGHT: u32 = 480;

fn disc(radius: u32) -> RgbaImage {
    let size = radius * 2;
    let r2 = (radius * radius) as i64;
    RgbaImage::from_fn(size, size, |x, y| {
        let dx = x as i64 - radius as i64;
        let dy = y as i64 - radius as i64;
        let alpha = if dx * dx + dy * dy <= r2 { 255 } else { 0 };
        Rgba([(x % 256) as u8, (y % 256) as u8, 128, alpha])
    })
}

fn populated(spacing: u32) -> (Field, Canvas) {
    let config = EffectConfig::new()
        .with_particle_spacing(spacing)
        .with_vibrate(Vibrate {
            chance: 0.1,
            velocity: 0.2,
        })
        .with_seed(1);
    let images = vec![disc(200), disc(120)];
    let mut canvas = Canvas::new(WIDTH, HEIGHT);
    let mut field = Field::new(WIDTH, HEIGHT, images, config).expect("valid bench config");
    field.init(&mut canvas);
    field.set_pointer(WIDTH as f32 / 2.0, HEIGHT as f32 / 2.0);
    (field, canvas)
}

fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("update");

    for spacing in [2u32, 3, 5] {
        let (mut field, _) = populated(spacing);
        group.bench_with_input(
            BenchmarkId::new("particles", field.len()),
            &spacing,
            |b, _| b.iter(|| field.update()),
        );
    }

    group.finish();
}

fn bench_frame(c: &mut Criterion) {
    let (mut field, mut canvas) = populated(3);
    c.bench_function("frame_spacing_3", |b| {
        b.iter(|| field.frame(black_box(&mut canvas)))
    });
}

fn bench_switch_image(c: &mut Criterion) {
    let (mut field, mut canvas) = populated(3);
    c.bench_function("switch_image_spacing_3", |b| {
        b.iter(|| black_box(field.switch_image(&mut canvas)))
    });
}

criterion_group!(benches, bench_update, bench_frame, bench_switch_image);
criterion_main!(benches);
