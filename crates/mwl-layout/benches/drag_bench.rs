//! Benchmarks for the per-frame drag path and rebuild reconciliation.
//!
//! Run with: cargo bench -p mwl-layout

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use mwl_layout::solve::realize;
use mwl_layout::{
    DividerNeighbors, DragFrame, Region, ResizeSession, TrackDefaults, TrackReconciler, TrackSet,
    grid_template,
};
use std::hint::black_box;

/// `n` children alternating fixed, percent, flex and auto sizes.
fn make_regions(n: usize) -> Vec<Region> {
    (0..n)
        .map(|i| {
            let region = Region::keyed(format!("panel-{i}"));
            match i % 4 {
                0 => region.with_size(120u32),
                1 => region.with_size("10%").with_min_size(40),
                2 => region.with_fill().with_min_size(20),
                _ => region.with_size("2*"),
            }
        })
        .collect()
}

fn bench_drag_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("resize/drag_frame");

    for n in [3, 10, 50] {
        let tracks = TrackSet::build(&make_regions(n), TrackDefaults::SPLIT);
        let pixels = realize(&tracks, 4000);
        let divider = DividerNeighbors::new(1, 2);
        group.bench_with_input(BenchmarkId::new("drag", n), &n, |b, _| {
            b.iter_batched(
                || ResizeSession::start(&tracks, &pixels, divider, 4000).expect("start"),
                |mut session| {
                    for delta in (-60..60).step_by(3) {
                        let outcome = session.drag(black_box(delta));
                        black_box(DragFrame::from_outcome(&outcome, session.working_pixels()));
                    }
                    session
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_finish(c: &mut Criterion) {
    let mut group = c.benchmark_group("resize/finish");

    for n in [3, 10, 50] {
        let tracks = TrackSet::build(&make_regions(n), TrackDefaults::SPLIT);
        let pixels = realize(&tracks, 4000);
        group.bench_with_input(BenchmarkId::new("gcd_reencode", n), &n, |b, _| {
            b.iter_batched(
                || {
                    let mut session =
                        ResizeSession::start(&tracks, &pixels, DividerNeighbors::new(1, 2), 4000)
                            .expect("start");
                    session.drag(35);
                    session
                },
                |session| black_box(session.finish()),
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_rebuild(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile/rebuild");

    for n in [3, 10, 50] {
        let regions = make_regions(n);
        let mut reconciler = TrackReconciler::new(TrackSet::build(&regions, TrackDefaults::SPLIT));
        group.bench_with_input(BenchmarkId::new("unchanged", n), &regions, |b, regions| {
            b.iter(|| {
                black_box(reconciler.reconcile(TrackSet::build(regions, TrackDefaults::SPLIT)))
            })
        });
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("template/render");

    for n in [3, 10, 50] {
        let tracks = TrackSet::build(&make_regions(n), TrackDefaults::SPLIT);
        group.bench_with_input(BenchmarkId::new("grid_template", n), &tracks, |b, tracks| {
            b.iter(|| black_box(grid_template(tracks)))
        });
        group.bench_with_input(BenchmarkId::new("realize", n), &tracks, |b, tracks| {
            b.iter(|| black_box(realize(tracks, black_box(4000))))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_drag_frame, bench_finish, bench_rebuild, bench_render);

criterion_main!(benches);
