use chrono::{Duration, NaiveDateTime};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mesonet_processor::analyzers::DailyAnalyzer;
use mesonet_processor::models::{ObservationRow, QaRule, QaRules, Reading, RunWindow, Variable};
use mesonet_processor::processors::{DayPartitioner, GridReconciler, QaFlagger, WindChillCalculator};

// Synthetic raw records with a gap every few hundred samples
fn create_raw_rows(days: i64) -> (Vec<ObservationRow>, RunWindow) {
    let start = NaiveDateTime::parse_from_str("2021-01-01 00:00", "%Y-%m-%d %H:%M").unwrap();
    let end = start + Duration::days(days) - Duration::minutes(5);

    let rows = (0..days * 288)
        .filter(|i| i % 397 != 0)
        .map(|i| {
            let mut row = ObservationRow::absent(start + Duration::minutes(5 * i));
            let phase = (i % 288) as f64 / 288.0 * std::f64::consts::TAU;
            row.set(Variable::AirTemperature, Reading::Present(5.0 - 8.0 * phase.cos()));
            row.set(Variable::RelativeHumidity, Reading::Present(70.0 + 20.0 * phase.sin()));
            row.set(Variable::WindSpeed, Reading::Present((i % 13) as f64 * 0.7));
            row.set(Variable::Rainfall, Reading::Present((i % 288) as f64 * 0.01));
            row.raw_backed = true;
            row
        })
        .collect();

    (rows, RunWindow::new(start, end).unwrap())
}

fn qa_rules() -> QaRules {
    QaRules::new()
        .with_rule(Variable::AirTemperature, QaRule::new(-30.0, 10.0).unwrap())
        .with_rule(Variable::WindSpeed, QaRule::new(0.0, 75.0).unwrap())
        .with_rule(Variable::WindChill, QaRule::new(-40.0, 15.0).unwrap())
}

fn benchmark_reconcile(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile");

    for days in [1, 7, 31] {
        let (rows, window) = create_raw_rows(days);
        group.bench_with_input(BenchmarkId::new("grid", days), &days, |b, _| {
            b.iter(|| GridReconciler::new().reconcile(black_box(&rows), black_box(&window)))
        });
    }

    group.finish();
}

fn benchmark_qa_and_wind_chill(c: &mut Criterion) {
    let (rows, window) = create_raw_rows(31);
    let (series, _) = GridReconciler::new().reconcile(&rows, &window);
    let flagger = QaFlagger::new(qa_rules());

    c.bench_function("qa_flag_month", |b| {
        b.iter(|| {
            let mut series = series.clone();
            flagger.apply(black_box(&mut series))
        })
    });

    c.bench_function("wind_chill_month", |b| {
        b.iter(|| {
            let mut series = series.clone();
            WindChillCalculator::new().derive_and_flag(black_box(&mut series), &flagger)
        })
    });
}

fn benchmark_daily_statistics(c: &mut Criterion) {
    let (rows, window) = create_raw_rows(31);
    let (mut series, _) = GridReconciler::new().reconcile(&rows, &window);
    let flagger = QaFlagger::new(qa_rules());
    flagger.apply(&mut series);
    WindChillCalculator::new().derive_and_flag(&mut series, &flagger);

    let partitioner = DayPartitioner::new();
    let analyzer = DailyAnalyzer::new();

    c.bench_function("daily_statistics_month", |b| {
        b.iter(|| {
            partitioner
                .partition(black_box(&window), black_box(&series))
                .iter()
                .map(|view| analyzer.analyze(view))
                .collect::<Vec<_>>()
        })
    });
}

criterion_group!(
    benches,
    benchmark_reconcile,
    benchmark_qa_and_wind_chill,
    benchmark_daily_statistics
);
criterion_main!(benches);
