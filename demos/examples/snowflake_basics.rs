// Copyright 2025 the Snowflake Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Snowflake basics.
//!
//! Build a small tree, expand a grandchild that escapes its parent's wedge, settle,
//! and print where everything ended up.
//!
//! Run:
//! - `cargo run -p snowflake_demos --example snowflake_basics`

use kurbo::Vec2;
use snowflake_layout::{LayoutConfig, PaintNode, Snowflake, TreeNode};

fn node(id: &str) -> TreeNode {
    TreeNode::new(id, 80.0, 20.0).with_title(id.to_uppercase())
}

fn main() {
    let tree = node("root").with_children([
        node("a"),
        node("b").with_children([node("b0"), node("b1"), node("b2"), node("b3")]),
        node("c"),
    ]);
    let mut flake = Snowflake::new(tree, LayoutConfig::default());
    flake.settle();

    // Expand "b", then its last child. The child's edge leaves b's wedge.
    let b = flake.find("b")[0];
    flake.set_active(b, true);
    flake.settle();
    let b3 = flake.find("b3")[0];
    flake.set_active(b3, true);

    for record in flake.collisions(b3) {
        println!(
            "b3 vs {:?}: clockwise {:?}, anticlockwise {:?}",
            flake.tree_id(record.ancestor),
            record.clockwise,
            record.anticlockwise
        );
    }

    let settlement = flake.settle();
    println!(
        "settled in {} passes, {} corrections, converged: {}",
        settlement.passes,
        settlement.corrections.len(),
        settlement.converged
    );
    for (key, distance) in flake.ledger(b) {
        println!("ledger {:?} = {distance:.3}", flake.pair_key(key));
    }

    // Paint with the view panned so the root sits at (400, 300).
    let pan = Vec2::new(-400.0, -300.0);
    flake.paint(pan, &mut |n: &PaintNode<'_>| {
        let indent = "  ".repeat(n.depth);
        println!(
            "{indent}{} ({}) r={} at ({:.1}, {:.1})",
            n.title,
            if n.active { "open" } else { "closed" },
            n.radius,
            n.origin.x,
            n.origin.y
        );
    });
}
