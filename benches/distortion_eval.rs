use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use nalgebra::Vector2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use warpfield::distortion::{distortion, distortion_jacobian};

/// Uniform random position inside a 30 mm field radius (micrometers).
#[inline]
fn rand_position(rng: &mut StdRng) -> Vector2<f64> {
    let r = 30_000.0 * rng.random::<f64>().sqrt();
    let theta = rng.random_range(0.0..std::f64::consts::TAU);
    Vector2::new(r * theta.cos(), r * theta.sin())
}

fn rand_coefficients(rng: &mut StdRng) -> Vec<f64> {
    (0..18).map(|_| rng.random_range(-1.0..1.0)).collect()
}

fn bench_sip_distortion(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0x5EED);
    let samples = 10_000usize;
    let sip_a = rand_coefficients(&mut rng);
    let sip_b = rand_coefficients(&mut rng);

    c.bench_function("distortion/sip_10k", |b| {
        b.iter_batched(
            || {
                (0..samples)
                    .map(|_| rand_position(&mut rng))
                    .collect::<Vec<_>>()
            },
            |xy| {
                let out = distortion(black_box(&sip_a), black_box(&sip_b), &xy).unwrap();
                black_box(out);
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_sip_jacobian(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);
    let samples = 10_000usize;

    c.bench_function("distortion/jacobian_10k", |b| {
        b.iter_batched(
            || {
                (0..samples)
                    .map(|_| rand_position(&mut rng))
                    .collect::<Vec<_>>()
            },
            |xy| {
                black_box(distortion_jacobian(black_box(&xy)));
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_sip_distortion, bench_sip_jacobian
);
criterion_main!(benches);
