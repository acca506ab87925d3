use criterion::{black_box, criterion_group, criterion_main, Criterion};
use forge_core::{solve, SolverConfig};
use forge_rules::{Grid, Model, ModelOptions};

fn overlapping_model() -> Model {
    let exemplar = Grid::from_rows(&[
        vec![0, 0, 0, 0],
        vec![0, 1, 1, 0],
        vec![0, 1, 1, 0],
        vec![0, 0, 0, 0],
    ])
    .unwrap();
    let options = ModelOptions {
        rotation: true,
        ..ModelOptions::default()
    };
    Model::overlapping(&exemplar, 2, &options).unwrap()
}

fn tiled_model() -> Model {
    let exemplar = Grid::from_fn(3, 3, 3, |x, y, z| i32::from((x + y + z) % 2 == 0));
    Model::tiled(&exemplar, 1, &ModelOptions::default()).unwrap()
}

fn bench_solve(c: &mut Criterion) {
    let overlapping = overlapping_model();
    c.bench_function("overlapping 16x16", |b| {
        b.iter(|| {
            let config = SolverConfig::builder().seed(7).build();
            black_box(solve(&overlapping, (16, 16, 1), &config))
        });
    });

    let tiled = tiled_model();
    c.bench_function("tiled 6x4x6", |b| {
        b.iter(|| {
            let config = SolverConfig::builder().seed(7).build();
            black_box(solve(&tiled, (6, 4, 6), &config))
        });
    });
}

criterion_group!(benches, bench_solve);
criterion_main!(benches);
