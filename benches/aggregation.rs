use criterion::{Criterion, black_box, criterion_group, criterion_main};
use zone_energy::{Dataset, Measurement, Period, aggregate};

/// A month of minute readings
fn month_of_minutes() -> Dataset {
    let mut measurements = Vec::with_capacity(31 * 24 * 60);
    for day in 1..=31i64 {
        for hour in 0..24i64 {
            for minute in 0..60i64 {
                let reading = (day * hour + minute) as f64 * 0.01;
                measurements.push(Measurement::new(
                    [2023, 1, day, hour, minute, 0],
                    [reading, reading * 2.0, reading * 0.5, 1.0],
                ));
            }
        }
    }
    Dataset::new(measurements)
}

fn bench_aggregation(c: &mut Criterion) {
    let dataset = month_of_minutes();

    let mut group = c.benchmark_group("aggregate");
    for period in [Period::Hour, Period::Day, Period::HourOfDay] {
        group.bench_function(period.name(), |b| {
            b.iter(|| aggregate(black_box(&dataset), period))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_aggregation);
criterion_main!(benches);
