use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use formula_frame::{DataFrame, PivotValues, Row, Value};
use std::time::Duration;

fn bench_rows() -> usize {
    std::env::var("FORMULA_FRAME_BENCH_ROWS")
        .ok()
        .and_then(|v| v.replace('_', "").parse::<usize>().ok())
        .filter(|&v| (10_000..=2_000_000).contains(&v))
        .unwrap_or(100_000)
}

fn build_frame(rows: usize) -> DataFrame {
    let regions = ["north", "south", "east", "west"];
    DataFrame::new((0..rows).map(|i| {
        Row::new()
            .with("id", i)
            .with("region", regions[i % regions.len()])
            .with("amount", ((i * 37) % 1_000) as f64)
    }))
}

fn pipeline(frame: &DataFrame) -> DataFrame {
    frame
        .filter(|row| row.value("amount") > Value::from(250.0))
        .map(|row, _| {
            let amount = row.value("amount").as_number().unwrap_or(0.0);
            row.with("taxed", amount * 1.2)
        })
        .order_by(|row| row.value("region"))
        .then_by_descending(|row| row.value("taxed"))
        .into_frame()
}

fn bench_lazy_pipeline(c: &mut Criterion) {
    let rows = bench_rows();
    let frame = build_frame(rows);

    let mut group = c.benchmark_group("lazy_pipeline");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(10));
    group.throughput(Throughput::Elements(rows as u64));

    // The sort still reads every filtered row before the head is taken.
    group.bench_with_input(BenchmarkId::new("compose_and_head", rows), &rows, |b, _| {
        b.iter(|| {
            let head = pipeline(&frame).head(10).to_vec();
            black_box(head);
        })
    });

    group.bench_with_input(BenchmarkId::new("bake", rows), &rows, |b, _| {
        b.iter(|| {
            let baked = pipeline(&frame).bake();
            black_box(baked.count());
        })
    });

    let values = PivotValues::new().column("taxed", |s| Value::from(s.sum()));
    group.bench_with_input(BenchmarkId::new("pivot_baked", rows), &rows, |b, _| {
        let baked = pipeline(&frame).bake();
        b.iter(|| {
            let pivoted = baked.pivot(&["region"], &values).unwrap();
            black_box(pivoted.to_rows());
        })
    });

    group.finish();
}

criterion_group!(benches, bench_lazy_pipeline);
criterion_main!(benches);
