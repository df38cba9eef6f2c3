use chart_core::drawing::{Drawing, DrawingPoint, Scope, Shape};
use chart_core::geometry::PointF;
use chart_core::series::{Candle, CandleSeries};
use chart_core::types::ChartLayout;
use chart_core::view::ViewBounds;
use chart_core::{hit_test, CoordinateTransform};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn gen_series(n: usize) -> CandleSeries {
    let v = (0..n)
        .map(|i| {
            let c = 100.0 + (i as f64 * 0.05).sin() * 10.0;
            Candle { time: i as i64 * 60, open: c - 0.2, high: c + 1.0, low: c - 1.0, close: c, volume: 500.0 }
        })
        .collect();
    CandleSeries::from_sorted(v)
}

fn gen_drawings(n: usize, len: usize) -> Vec<Drawing> {
    let scope = Scope::new("BENCH", "1m");
    (0..n)
        .map(|i| {
            let t0 = ((i * 37) % len) as i64 * 60;
            let t1 = ((i * 53 + 11) % len) as i64 * 60;
            let p0 = DrawingPoint::new(95.0 + (i % 10) as f64, t0);
            let p1 = DrawingPoint::new(105.0 - (i % 7) as f64, t1);
            let shape = match i % 3 {
                0 => Shape::HorizontalLine { at: p0 },
                1 => Shape::Trendline { from: p0, to: p1 },
                _ => Shape::Rectangle { a: p0, b: p1 },
            };
            Drawing::new(shape, "#3b82f6", scope.clone())
        })
        .collect()
}

fn bench_hit(c: &mut Criterion) {
    let mut group = c.benchmark_group("hit_test");
    let layout = ChartLayout::default();
    let series = gen_series(5_000);
    let t = CoordinateTransform::new(layout, &series, ViewBounds::new(1_000, 1_499));
    for &n in &[10usize, 100, 1_000] {
        let drawings = gen_drawings(n, series.len());
        let refs: Vec<&Drawing> = drawings.iter().collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &refs, |b, refs| {
            // empty corner of the plot so every drawing is tested
            b.iter(|| black_box(hit_test(black_box(PointF::new(15.0, 15.0)), refs, &t)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_hit);
criterion_main!(benches);
