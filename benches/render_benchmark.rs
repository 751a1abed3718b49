#![allow(clippy::expect_used, clippy::unwrap_used, missing_docs)]
//! Benchmark for frame rendering.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use trueno_termplot::prelude::*;

fn sine(size: usize) -> Vec<f64> {
    (0..size).map(|i| (i as f64 * 0.01).sin() * 100.0).collect()
}

fn render_scatter_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_scatter");

    for size in [100, 1_000, 10_000, 100_000] {
        let series = MultiSeries::from_ys(sine(size)).expect("series should build");
        let options = PlotOptions::new();

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| render(black_box(&series), black_box(&options)).expect("render should succeed"));
        });
    }

    group.finish();
}

fn render_lines_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_lines");

    for set in [CharacterSet::Ascii, CharacterSet::Block, CharacterSet::Braille] {
        let series = MultiSeries::from_ys(vec![sine(10_000), sine(5_000)]).expect("series should build");
        let options = PlotOptions::new().lines(true).color(true).character_set(set).dimensions(120, 40);

        group.bench_with_input(BenchmarkId::from_parameter(format!("{set:?}")), &set, |b, _| {
            b.iter(|| render(black_box(&series), black_box(&options)).expect("render should succeed"));
        });
    }

    group.finish();
}

fn histogram_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("histogram");

    for size in [1_000, 100_000] {
        let values = sine(size);
        let histogram = Histogram::new().bins(BinStrategy::Sturges);
        let options = PlotOptions::new();

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                histogram
                    .render(black_box(values.clone()), black_box(&options))
                    .expect("histogram should render")
            });
        });
    }

    group.finish();
}

fn interactive_step_benchmark(c: &mut Criterion) {
    let series = MultiSeries::from_ys(sine(10_000)).expect("series should build");
    let options = PlotOptions::new().lines(true);

    c.bench_function("interactive_pan_zoom", |b| {
        b.iter(|| {
            let mut keys = ScriptedKeys::from_chars("hhlljjkkuunnrq");
            let mut sink = MemorySink::new();
            run_interactive(black_box(&series), &options, &mut keys, &mut sink)
                .expect("loop should finish");
            sink
        });
    });
}

criterion_group!(
    benches,
    render_scatter_benchmark,
    render_lines_benchmark,
    histogram_benchmark,
    interactive_step_benchmark
);
criterion_main!(benches);
