//! Criterion benchmarks for the double-area routines.
//!
//! Compares the three dispatch paths (2D, 3D, 4D via edge lengths) on random
//! triangle soups, plus the edge-length kernel alone on needle inputs.
//! Results: by default under target/criterion.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dblarea::area::{double_area, double_area_from_edge_lengths};
use dblarea::rand::{draw_needle_lengths, draw_triangle_soup, TriangleSoupCfg};
use rand::{rngs::StdRng, SeedableRng};

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("double_area");
    for &m in &[1_000usize, 10_000, 100_000] {
        for dim in [2usize, 3, 4] {
            let mut rng = StdRng::seed_from_u64(42 + dim as u64);
            let cfg = TriangleSoupCfg {
                dim,
                triangles: m,
                vertices: m / 2 + 3,
                scale: 1.0,
            };
            let (v, f) = draw_triangle_soup(&cfg, &mut rng);
            group.bench_with_input(BenchmarkId::new(format!("dim{}", dim), m), &m, |b, _| {
                b.iter(|| double_area(black_box(&v), black_box(&f)).unwrap())
            });
        }
    }
    group.finish();
}

fn bench_kernel(c: &mut Criterion) {
    let mut group = c.benchmark_group("edge_lengths_kernel");
    for &m in &[1_000usize, 100_000] {
        let mut rng = StdRng::seed_from_u64(7);
        let l = draw_needle_lengths(m, &mut rng);
        group.bench_with_input(BenchmarkId::new("needles", m), &m, |b, _| {
            b.iter(|| double_area_from_edge_lengths(black_box(&l)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_dispatch, bench_kernel);
criterion_main!(benches);
