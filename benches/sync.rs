//! Benchmarks for column layout and scroll propagation.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::cast_precision_loss
)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use gridscroll::{
    ColumnDescriptor, ColumnLayoutEngine, FixedSide, GridConfig, GridScroll, ManualScheduler,
    MeasuredRows, MemoryPane, PaneId, ScrollConfig, ScrollRequest, ScrollX, ViewportMetrics,
};

fn columns(count: usize) -> Vec<ColumnDescriptor> {
    (0..count)
        .map(|i| {
            let column = ColumnDescriptor::new(format!("c{i}")).with_width(80.0);
            if i < 3 {
                column.fixed(FixedSide::Left)
            } else if i + 2 >= count {
                column.fixed(FixedSide::Right)
            } else {
                column
            }
        })
        .collect()
}

/// Layout of wide grids with fixed columns on both sides
fn bench_column_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("column_layout");
    let scroll = ScrollConfig::new(Some(ScrollX::Auto), Some(400.0));
    let metrics = ViewportMetrics::new(1200.0, 400.0, 80_000.0, 4000.0);
    for count in [10, 100, 1000] {
        let cols = columns(count);
        let engine = ColumnLayoutEngine::new();
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &cols, |b, cols| {
            b.iter(|| engine.compute(black_box(cols), &scroll, Some(&metrics)))
        });
    }
    group.finish();
}

/// A burst of native scroll events collapsing into one frame
fn bench_scroll_burst(c: &mut Criterion) {
    let scheduler = ManualScheduler::new();
    let config = GridConfig::new(
        columns(50),
        ScrollConfig::new(Some(ScrollX::Auto), Some(400.0)),
    );
    let (grid, _handle) = GridScroll::mount(config, Box::new(scheduler)).expect("mount");
    for (id, _) in grid.arrangement().panes() {
        grid.register_pane(id, MemoryPane::new());
    }
    grid.observe_viewport(1200.0, 400.0);
    grid.observe_content(4000.0, 40_000.0);
    grid.run_frame();

    let mut left = 0.0;
    c.bench_function("scroll_burst_10", |b| {
        b.iter(|| {
            for _ in 0..10 {
                left = (left + 7.0) % 2800.0;
                grid.on_pane_scroll(PaneId::Body, black_box(left), 0.0);
            }
            grid.run_frame()
        })
    });
}

/// Resolving `scrollTo({ key })` against many measured rows
fn bench_scroll_to_key(c: &mut Criterion) {
    let config = GridConfig::new(columns(10), ScrollConfig::new(None, Some(400.0)));
    let (grid, handle) =
        GridScroll::mount(config, Box::new(ManualScheduler::new())).expect("mount");
    grid.register_pane(PaneId::Body, MemoryPane::new());
    grid.set_rows(MeasuredRows::uniform((0..10_000).map(|i| format!("r{i}")), 40.0));
    grid.observe_viewport(1000.0, 400.0);
    grid.observe_content(1000.0, 400_000.0);
    grid.run_frame();

    let mut i = 0usize;
    c.bench_function("scroll_to_key_10k", |b| {
        b.iter(|| {
            i = (i + 997) % 10_000;
            handle.scroll_to(&ScrollRequest::key(format!("r{i}")))
        })
    });
}

criterion_group!(
    benches,
    bench_column_layout,
    bench_scroll_burst,
    bench_scroll_to_key
);
criterion_main!(benches);
