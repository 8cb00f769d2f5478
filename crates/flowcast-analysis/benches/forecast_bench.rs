use criterion::{criterion_group, criterion_main, Criterion};

use flowcast_analysis::forecast::{
    forecast_backlog, simulate_sprint, BacklogForecastInput, MonteCarloEngine, SampleSet,
    SeededRandom, SprintSimulationInput,
};

fn samples() -> SampleSet {
    SampleSet::from_durations(&[1.0, 1.5, 2.0, 2.5, 3.0, 3.0, 4.0, 5.0, 6.5, 8.0, 10.0, 14.0])
        .unwrap()
}

fn bench_sprint_10k_trials(c: &mut Criterion) {
    let samples = samples();
    let input = SprintSimulationInput::default();

    c.bench_function("simulate_sprint_10k_trials", |b| {
        b.iter(|| simulate_sprint(&samples, &input, &mut SeededRandom::new(42)));
    });
}

fn bench_backlog_10k_trials(c: &mut Criterion) {
    let samples = samples();
    let input = BacklogForecastInput::new(40);

    c.bench_function("forecast_backlog_40_items_10k_trials", |b| {
        b.iter(|| forecast_backlog(&samples, &input, &mut SeededRandom::new(42)));
    });
}

fn bench_backlog_parallel(c: &mut Criterion) {
    let samples = samples();
    let engine = MonteCarloEngine::default().with_seed(42).with_parallel(true);
    let input = engine.backlog_input(40);

    c.bench_function("forecast_backlog_40_items_parallel", |b| {
        b.iter(|| engine.forecast_backlog(&samples, &input));
    });
}

criterion_group!(
    benches,
    bench_sprint_10k_trials,
    bench_backlog_10k_trials,
    bench_backlog_parallel
);
criterion_main!(benches);
