// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Benchmarks of the sampling and point-spread function pipeline.
 */

use std::sync::Arc;

use criterion::*;

use uv_sampling::*;

/// A spiral of antennas, a bit like a real array layout.
fn spiral(num_antennas: usize) -> Vec<Antenna> {
    (0..num_antennas)
        .map(|i| {
            let r = 5.0 * (i as f64).sqrt();
            let theta = i as f64 * 2.4;
            Antenna::new(r * theta.cos(), r * theta.sin())
        })
        .collect()
}

fn sampling(c: &mut Criterion) {
    let antennas = spiral(128);
    let baselines = Baselines::from_antennas(&antennas).unwrap();
    c.bench_function("baselines 128 antennas", |b| {
        b.iter(|| Baselines::from_antennas(black_box(&antennas)).unwrap())
    });

    for size in [128, 512] {
        c.bench_function(&format!("rasterise 128 antennas {size}x{size}"), |b| {
            b.iter(|| SamplingGrid::from_baselines(black_box(&baselines), size, size))
        });
    }
}

fn psf(c: &mut Criterion) {
    let antennas = spiral(128);
    let baselines = Baselines::from_antennas(&antennas).unwrap();

    for size in [128, 512] {
        let grid = SamplingGrid::from_baselines(&baselines, size, size);
        let mut solver = PsfSolver::new();
        // Prime the plan cache.
        solver.solve(&grid);
        let mut out = ndarray::Array2::zeros((size, size));
        c.bench_function(&format!("psf {size}x{size}"), |b| {
            b.iter(|| solver.solve_into(black_box(&grid), out.view_mut()))
        });
    }
}

fn pipeline(c: &mut Criterion) {
    let antennas = spiral(64);
    let interferometer = Interferometer::new(
        InterferometryConfig::default(),
        Arc::new(UpdateScheduler::new()),
    )
    .unwrap();
    c.bench_function("compute and drain 64 antennas 128x128", |b| {
        b.iter(|| {
            interferometer.compute(black_box(&antennas));
            interferometer.drain_all(&mut |u: ImageUpdate| {
                black_box(u);
            });
        })
    });
}

criterion_group!(benches, sampling, psf, pipeline);
criterion_main!(benches);
