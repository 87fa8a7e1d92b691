// Copyright 2025 the Snowflake Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Load a tree and layout configuration from JSON, then walk it with structured logs.
//!
//! Set `RUST_LOG=debug` to see every collision and ledger write.
//!
//! Run:
//! - `cargo run -p snowflake_demos --example snowflake_json`

use std::error::Error;

use snowflake_layout::{LayoutConfig, NodeStatus, Snowflake, TracingDiagnostics, TreeNode};
use tracing_subscriber::EnvFilter;

const TREE: &str = include_str!("../data/taxonomy.json");

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let tree: TreeNode = serde_json::from_str(TREE)?;
    // Missing fields fall back to the defaults.
    let config: LayoutConfig =
        serde_json::from_str(r#"{ "min_line_distance": 90.0, "root_spread": "Full" }"#)?;
    let mut flake = Snowflake::with_diagnostics(tree, config, TracingDiagnostics);
    let settlement = flake.settle();
    tracing::info!(
        passes = settlement.passes,
        corrections = settlement.corrections.len(),
        "initial layout"
    );

    // Open every collapsed node with children, one at a time, until none are left.
    loop {
        let next = flake.positions().into_iter().find(|&id| {
            flake.status(id) == Some(NodeStatus::Inactive)
                && flake
                    .tree_id(id)
                    .is_some_and(|t| matches!(t, "plants" | "mammals"))
        });
        let Some(id) = next else {
            break;
        };
        flake.set_active(id, true);
        let settlement = flake.settle();
        tracing::info!(
            node = flake.tree_id(id),
            passes = settlement.passes,
            converged = settlement.converged,
            ledger = flake.ledger_len(),
            "expanded"
        );
    }

    for id in flake.positions() {
        let origin = flake.origin(id).ok_or("position vanished")?;
        println!(
            "{:>10} depth {} at ({:8.1}, {:8.1})",
            flake.title(id).unwrap_or_default(),
            flake.depth(id).unwrap_or_default(),
            origin.x,
            origin.y
        );
    }
    Ok(())
}
