use criterion::{black_box, criterion_group, criterion_main, Criterion};
use release_planner::features::build_vocabulary;
use release_planner::genres::GenreSource;
use release_planner::pipeline::load_and_join;
use release_planner::sweep::{predict_grid, predict_months};
use release_planner::trainer::train;
use release_planner::DEFAULT_BUDGET_OPTIONS;
use std::time::Duration;

pub fn planner_benchmarks(c: &mut Criterion) {
    let joined = load_and_join(
        "resources/movies.csv",
        "resources/movies_metadata.csv",
        "resources/links.csv",
        GenreSource::PreferStructured,
    )
    .unwrap();
    let vocab = build_vocabulary(&joined.rows);

    c.bench_function("Join & Clean", |b| {
        b.iter(|| {
            load_and_join(
                black_box("resources/movies.csv"),
                black_box("resources/movies_metadata.csv"),
                black_box("resources/links.csv"),
                GenreSource::PreferStructured,
            )
            .unwrap()
        })
    });

    let mut training = c.benchmark_group("train_model");
    training.warm_up_time(Duration::from_secs(5));
    training.sample_size(20);
    training.bench_function("train_default", |b| {
        b.iter(|| train(black_box(&joined.rows), black_box(&vocab), 42).unwrap())
    });
    training.finish();

    let model = train(&joined.rows, &vocab, 42).unwrap();
    c.bench_function("Predict Months", |b| {
        b.iter(|| predict_months(&model, &vocab, black_box(&["Comedy", "Drama"]), black_box(20e6)).unwrap())
    });
    c.bench_function("Predict Grid", |b| {
        b.iter(|| predict_grid(&model, &vocab, black_box(vocab.names()), black_box(&DEFAULT_BUDGET_OPTIONS)).unwrap())
    });
}

criterion_group!(benches, planner_benchmarks);
criterion_main!(benches);
