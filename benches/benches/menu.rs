// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Rect, Size};
use understory_floating::{AnchorRef, FloatingEnv, FrameId, TrackerId};
use understory_menu::{
    ItemFilter, ListenerId, ListenerKind, ListenerTarget, MenuEnv, MenuKey, MenuTree, SelectMode,
};

/// Host that answers geometry queries and runs frames immediately after the fact.
#[derive(Default)]
struct Env {
    next: u64,
    frames: Vec<FrameId>,
}

impl FloatingEnv<u32> for Env {
    fn anchor_rect(&self, _element: &u32) -> Option<Rect> {
        Some(Rect::new(20.0, 20.0, 120.0, 44.0))
    }

    fn floating_size(&self, _panel: &u32) -> Size {
        Size::new(200.0, 300.0)
    }

    fn viewport(&self) -> Rect {
        Rect::new(0.0, 0.0, 1280.0, 800.0)
    }

    fn request_frame(&mut self) -> FrameId {
        self.next += 1;
        self.frames.push(FrameId(self.next));
        FrameId(self.next)
    }

    fn cancel_frame(&mut self, frame: FrameId) {
        self.frames.retain(|f| *f != frame);
    }

    fn start_auto_update(&mut self, _panel: &u32, _anchor: &AnchorRef<u32>) -> TrackerId {
        self.next += 1;
        TrackerId(self.next)
    }

    fn stop_auto_update(&mut self, _tracker: TrackerId) {}
}

impl MenuEnv<u32> for Env {
    fn add_listener(&mut self, _target: ListenerTarget<u32>, _kind: ListenerKind) -> ListenerId {
        self.next += 1;
        ListenerId(self.next)
    }

    fn remove_listener(&mut self, _listener: ListenerId) {}

    fn focus(&mut self, _element: &u32) {}
}

fn flush(tree: &mut MenuTree<u32>, env: &mut Env) {
    let mut out = Vec::new();
    while !env.frames.is_empty() {
        for frame in core::mem::take(&mut env.frames) {
            tree.on_frame(frame, env, &mut out);
        }
    }
}

/// Root menu 0 with `len` items keyed `1..=len`; every eighth item disabled.
fn wide(len: u32, mode: SelectMode) -> MenuTree<u32> {
    let mut tree = MenuTree::default();
    tree.add_menu(0, mode).unwrap();
    for i in 1..=len {
        tree.add_item(0, i, format!("item {i}")).unwrap();
        if i % 8 == 0 {
            tree.set_disabled(i, true).unwrap();
        }
    }
    tree
}

/// A chain of `depth` nested submenus, each with `width` items.
fn deep(depth: u32, width: u32) -> MenuTree<u32> {
    let mut tree = MenuTree::default();
    let mut next = 1_000;
    for level in 0..depth {
        tree.add_menu(level, SelectMode::Multiple).unwrap();
        for _ in 0..width {
            next += 1;
            tree.add_item(level, next, "x").unwrap();
            tree.set_checked(next, true).unwrap();
        }
        if level > 0 {
            // Hang this level under the first item of the previous one.
            let parent = tree.items(level - 1, ItemFilter::All)[0];
            tree.set_submenu(parent, level).unwrap();
        }
    }
    tree
}

fn bench_key_traversal(c: &mut Criterion) {
    let mut group = c.benchmark_group("menu/key_down");
    for len in [16_u32, 128, 1_024] {
        let mut env = Env::default();
        let mut tree = wide(len, SelectMode::None);
        tree.show_menu(0, Some(AnchorRef::Element(9_999)), false, &mut env)
            .unwrap();
        flush(&mut tree, &mut env);
        let mut out = Vec::new();

        group.bench_with_input(BenchmarkId::new("arrow_down_cycle", len), &len, |b, len| {
            b.iter(|| {
                for _ in 0..*len {
                    tree.key_down(0, MenuKey::ArrowDown, 0, &mut env, &mut out);
                }
                black_box(tree.focused());
            });
        });
    }
    group.finish();
}

fn bench_single_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("menu/activate_single");
    for len in [16_u32, 128, 1_024] {
        let mut env = Env::default();
        let mut tree = wide(len, SelectMode::Single);
        let mut out = Vec::new();

        group.bench_with_input(BenchmarkId::new("activate", len), &len, |b, len| {
            let mut i = 0;
            b.iter(|| {
                i = i % len + 1;
                out.clear();
                black_box(tree.activate(i, &mut env, &mut out));
            });
        });
    }
    group.finish();
}

fn bench_clear_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("menu/clear_all");
    for depth in [2_u32, 8, 32] {
        group.bench_with_input(BenchmarkId::new("nested", depth), &depth, |b, depth| {
            b.iter_batched(
                || deep(*depth, 16),
                |mut tree| {
                    tree.clear_all(0);
                    black_box(tree);
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_key_traversal, bench_single_select, bench_clear_all);
criterion_main!(benches);
