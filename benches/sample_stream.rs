use criterion::{black_box, criterion_group, criterion_main, Criterion};

use framebench::core::fixed::{from_fixed, to_fixed};
use framebench::core::samples::{SampleSource, SAMPLE_COUNT};

/// One full cycle of the float view
fn bench_float_stream(c: &mut Criterion) {
    let mut source = SampleSource::new();

    c.bench_function("sample_stream_float_cycle", |b| {
        b.iter(|| {
            source.reset();
            let mut sum = 0.0f32;
            for _ in 0..SAMPLE_COUNT {
                sum += source.next_float();
            }
            black_box(sum)
        })
    });
}

/// One full cycle of the fixed-point view
fn bench_fixed_stream(c: &mut Criterion) {
    let mut source = SampleSource::new();

    c.bench_function("sample_stream_fixed_cycle", |b| {
        b.iter(|| {
            source.reset();
            let mut sum = 0i64;
            for _ in 0..SAMPLE_COUNT {
                sum += source.next_fixed() as i64;
            }
            black_box(sum)
        })
    });
}

/// Round-trip conversion sweep across the unit interval
fn bench_fixed_point_conversion(c: &mut Criterion) {
    c.bench_function("fixed_point_round_trip", |b| {
        b.iter(|| {
            let mut sum = 0.0f32;
            for step in 0..1000 {
                let value = step as f32 / 1000.0;
                sum += from_fixed(to_fixed(black_box(value)));
            }
            black_box(sum)
        })
    });
}

criterion_group!(
    benches,
    bench_float_stream,
    bench_fixed_stream,
    bench_fixed_point_conversion
);
criterion_main!(benches);
