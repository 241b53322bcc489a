// Copyright 2026 The Stepgraph Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Benchmarks for the analysis pipeline and the layout tick.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use stepgraph_engine::layout::{Layout, LayoutConfig, LayoutSimulator, Position, Rect};
use stepgraph_engine::{Graph, analyze};

/// `clusters` rings of `ring` nodes, each ring feeding the next.
fn clustered_graph(clusters: usize, ring: usize) -> Graph {
    let n = clusters * ring;
    let mut edges = Vec::with_capacity(n + clusters);
    for c in 0..clusters {
        let base = c * ring;
        for i in 0..ring {
            edges.push((base + i + 1, base + (i + 1) % ring + 1));
        }
        if c + 1 < clusters {
            edges.push((base + 1, base + ring + 1));
        }
    }
    Graph::from_edges(n, &edges).unwrap()
}

fn bench_analyze(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze");
    for clusters in [10, 100, 1000] {
        let g = clustered_graph(clusters, 8);
        group.bench_with_input(BenchmarkId::from_parameter(g.node_count()), &g, |b, g| {
            b.iter(|| analyze(black_box(g)));
        });
    }
    group.finish();
}

fn bench_layout_tick(c: &mut Criterion) {
    let viewport = Rect::centered(Position::ZERO, 800.0, 600.0);
    let mut group = c.benchmark_group("layout_tick");
    for clusters in [2, 8, 32] {
        let g = clustered_graph(clusters, 8);
        group.bench_with_input(BenchmarkId::from_parameter(g.node_count()), &g, |b, g| {
            let mut sim =
                LayoutSimulator::new(g, &Layout::new(), viewport, LayoutConfig::default()).unwrap();
            b.iter(|| {
                if !sim.tick(g, 1.0) {
                    sim.restart();
                }
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_analyze, bench_layout_tick);
criterion_main!(benches);
