// Copyright 2025 the Snowflake Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use snowflake_layout::{CorrectionPolicy, LayoutConfig, Snowflake, TreeNode};

/// A complete tree with `fanout` children per node, `depth` levels below the root,
/// every interior node initially expanded.
fn gen_tree(fanout: usize, depth: usize, label: &str) -> TreeNode {
    let node = TreeNode::new(label, 80.0, 20.0);
    if depth == 0 {
        return node;
    }
    node.expanded().with_children(
        (0..fanout).map(|i| gen_tree(fanout, depth - 1, &format!("{label}.{i}"))),
    )
}

fn count(fanout: usize, depth: usize) -> u64 {
    (0..=depth).map(|d| (fanout as u64).pow(d as u32)).sum()
}

fn bench_settle_expanded(c: &mut Criterion) {
    let mut group = c.benchmark_group("settle_expanded");
    for &(fanout, depth) in &[(3usize, 3usize), (4, 3), (3, 5)] {
        let tree = gen_tree(fanout, depth, "n");
        group.throughput(Throughput::Elements(count(fanout, depth)));
        for policy in [CorrectionPolicy::LastInChain, CorrectionPolicy::EveryAncestor] {
            let config = LayoutConfig {
                correction: policy,
                ..LayoutConfig::default()
            };
            group.bench_function(format!("f{fanout}_d{depth}_{policy:?}"), |b| {
                b.iter_batched(
                    || Snowflake::new(tree.clone(), config.clone()),
                    |mut flake| {
                        let settlement = flake.settle();
                        black_box(settlement.passes);
                    },
                    BatchSize::SmallInput,
                )
            });
        }
    }
    group.finish();
}

fn bench_toggle_leaf(c: &mut Criterion) {
    let mut group = c.benchmark_group("toggle_leaf");
    let tree = gen_tree(4, 3, "n");
    let mut flake = Snowflake::new(tree, LayoutConfig::default());
    flake.settle();
    let leaf = *flake
        .positions()
        .iter()
        .rev()
        .find(|&&id| flake.children(id).is_empty() && !flake.is_active(id))
        .expect("tree has collapsed leaves");
    group.bench_function("activate_settle_deactivate_settle", |b| {
        b.iter(|| {
            flake.toggle_active(leaf, Some(true));
            let on = flake.settle();
            flake.toggle_active(leaf, Some(false));
            let off = flake.settle();
            black_box((on.passes, off.passes));
        })
    });
    group.finish();
}

fn bench_collisions(c: &mut Criterion) {
    let mut group = c.benchmark_group("collisions");
    let tree = gen_tree(3, 5, "n");
    let mut flake = Snowflake::new(tree, LayoutConfig::default());
    flake.settle();
    let positions = flake.positions();
    group.throughput(Throughput::Elements(positions.len() as u64));
    group.bench_function("all_positions", |b| {
        b.iter(|| {
            let hits: usize = positions
                .iter()
                .map(|&id| flake.collisions(id).iter().filter(|r| r.has_intersect()).count())
                .sum();
            black_box(hits);
        })
    });
    group.bench_function("snapshot", |b| {
        b.iter(|| black_box(flake.snapshot().len()))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_settle_expanded,
    bench_toggle_leaf,
    bench_collisions,
);
criterion_main!(benches);
