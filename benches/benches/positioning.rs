// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Rect, Size};
use understory_floating::{AutoPlacement, Placement, PositionOptions, Strategy, compute_position};

const VIEWPORT: Rect = Rect::new(0.0, 0.0, 1280.0, 800.0);

fn references() -> Vec<Rect> {
    // A grid of anchors, many of them close enough to an edge to flip or shift.
    let mut out = Vec::new();
    for iy in 0..16 {
        for ix in 0..16 {
            let x = f64::from(ix) * 80.0;
            let y = f64::from(iy) * 50.0;
            out.push(Rect::new(x, y, x + 64.0, y + 24.0));
        }
    }
    out
}

fn bench_compute_position(c: &mut Criterion) {
    let mut group = c.benchmark_group("floating/compute_position");
    let refs = references();
    let size = Size::new(220.0, 180.0);

    let cases = [
        ("plain", PositionOptions::new(Placement::BottomStart)),
        (
            "flip_shift",
            PositionOptions::new(Placement::BottomStart)
                .with_offset(4.0, 0.0)
                .with_flip(8.0)
                .with_shift(8.0),
        ),
        (
            "auto_corners",
            PositionOptions::new(Placement::BottomStart)
                .with_strategy(Strategy::Fixed)
                .with_auto_placement(AutoPlacement::corners()),
        ),
        (
            "auto_all",
            PositionOptions::new(Placement::Bottom).with_auto_placement(AutoPlacement::new(
                Placement::ALL.iter().copied(),
            )),
        ),
    ];

    for (name, options) in &cases {
        group.bench_with_input(BenchmarkId::new(*name, refs.len()), options, |b, options| {
            b.iter(|| {
                for r in &refs {
                    let placed = compute_position(*r, size, VIEWPORT, options);
                    let _ = black_box(placed);
                }
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_compute_position);
criterion_main!(benches);
