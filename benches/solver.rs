use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use scalesat::scale::{combinations, Coverage, PuzzleConfig, ScaleModel};
use scalesat::solver::SearchParams;

fn benchmark_enumeration(c: &mut Criterion) {
    let mut group = c.benchmark_group("enumerate");
    group.sample_size(10);

    // The classic puzzle, every solution
    let model = ScaleModel::build(&PuzzleConfig::default()).unwrap();
    group.bench_function("legacy-1-40", |b| {
        b.iter(|| {
            let enumeration = model.enumerate(black_box(&SearchParams::new()), |_| {});
            assert_eq!(enumeration.solution_count(), 18);
            enumeration
        })
    });

    for max_value in [10, 13] {
        let config = PuzzleConfig::new(1, max_value, 3).with_coverage(Coverage::Full);
        let model = ScaleModel::build(&config).unwrap();
        group.bench_function(BenchmarkId::new("full-3-weights", max_value), |b| {
            b.iter(|| model.enumerate(black_box(&SearchParams::new()), |_| {}))
        });
    }

    group.finish();
}

fn benchmark_first_solution(c: &mut Criterion) {
    let mut group = c.benchmark_group("first_solution");

    for weight_count in [3, 4] {
        let config = PuzzleConfig::new(1, 13, weight_count).with_coverage(Coverage::Positive);
        let model = ScaleModel::build(&config).unwrap();
        group.bench_function(BenchmarkId::new("positive-1-13", weight_count), |b| {
            b.iter(|| model.enumerate(black_box(&SearchParams::first_solution()), |_| {}))
        });
    }

    group.finish();
}

fn benchmark_model_building(c: &mut Criterion) {
    let mut group = c.benchmark_group("building");

    group.bench_function("combinations-full-8", |b| {
        b.iter(|| combinations(black_box(8), Coverage::Full).unwrap())
    });
    group.bench_function("model-legacy-1-40", |b| {
        b.iter(|| ScaleModel::build(black_box(&PuzzleConfig::default())).unwrap())
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_enumeration,
    benchmark_first_solution,
    benchmark_model_building
);
criterion_main!(benches);
