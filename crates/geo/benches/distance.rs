//! Benchmarks for geo crate calculations.

use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use geolocator_geo::{distance_between, moon_position, validate, GeoPoint, NORTH_POLE};

fn create_test_points(count: usize) -> Vec<GeoPoint> {
    (0..count)
        .map(|i| {
            // Spread points over a band around the equator
            let lat = -60.0 + (i as f64 * 0.37) % 120.0;
            let lon = -180.0 + (i as f64 * 0.73) % 360.0;
            GeoPoint::new(lat, lon)
        })
        .collect()
}

fn bench_single_distance(c: &mut Criterion) {
    let here = GeoPoint::new(10.543, 20.123);

    c.bench_function("distance_to_pole", |b| {
        b.iter(|| distance_between(black_box(&here), black_box(&NORTH_POLE)))
    });
}

fn bench_many_distances(c: &mut Criterion) {
    let mut group = c.benchmark_group("distances_to_pole");

    for size in [10, 100, 1000, 10000].iter() {
        let points = create_test_points(*size);

        group.bench_with_input(BenchmarkId::new("sequential", size), size, |b, _| {
            b.iter(|| {
                points
                    .iter()
                    .map(|p| distance_between(black_box(p), &NORTH_POLE))
                    .sum::<f64>()
            })
        });
    }

    group.finish();
}

fn bench_validation(c: &mut Criterion) {
    c.bench_function("validate_text", |b| {
        b.iter(|| validate(black_box("-100"), black_box("200")))
    });
}

fn bench_moon(c: &mut Criterion) {
    let at = Utc.with_ymd_and_hms(2024, 3, 15, 18, 30, 0).unwrap();
    let here = GeoPoint::new(10.543, 20.123);

    c.bench_function("moon_position", |b| {
        b.iter(|| moon_position(black_box(at), black_box(&here)))
    });
}

criterion_group!(
    benches,
    bench_single_distance,
    bench_many_distances,
    bench_validation,
    bench_moon
);
criterion_main!(benches);
