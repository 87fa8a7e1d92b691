// Copyright 2025 the Snowflake Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Snowflake Layout: a radial, collision-aware layout for expandable trees.
//!
//! A snowflake diagram puts the root at the origin and fans each expanded node's children
//! out around it. Every child owns an angular slice of the plane (its wedge), opening
//! away from the edge it hangs from. When an expanded descendant drifts outside an
//! ancestor's wedge, the ancestor is pushed further from its own parent until the
//! descendant's connecting line clears the wedge again.
//!
//! - Positions are generational handles into an arena. The same tree node may be shown
//!   at several positions, each with its own activity flag and ledger.
//! - Collision corrections are stored in a distance ledger keyed by
//!   (ancestor, descendant) pairs and cleared when the descendant collapses.
//! - Mutations are batched: [`Snowflake::toggle_active`] only marks positions pending,
//!   and [`Snowflake::settle`] runs collision passes until the ledger stops changing or
//!   the pass budget runs out.
//!
//! ## Not a renderer
//!
//! This crate draws nothing. [`Snowflake::paint`] hands each position's resolved
//! geometry to a [`PaintSink`], and panning is applied there. Input handling, debug
//! overlays and tree loading stay with the caller.
//!
//! ## API overview
//!
//! - [`Snowflake`]: the layout. Owns the input tree, the position arena and the ledger.
//! - [`TreeNode`]: one node of the static input tree.
//! - [`LayoutConfig`]: separation, probe length, pass budget and policies.
//! - [`PositionId`]: generational handle of a reachable position.
//! - [`Wedge`]: angular placement of a position.
//! - [`CollisionRecord`]: result of testing one descendant against one ancestor.
//! - [`Settlement`]: summary of a [`Snowflake::settle`] call.
//! - [`Diagnostics`]: hook receiving [`DiagnosticEvent`]s.
//!
//! ## Minimal usage
//!
//! ```
//! use snowflake_layout::{LayoutConfig, Snowflake, TreeNode};
//!
//! let tree = TreeNode::new("root", 80.0, 20.0).with_children([
//!     TreeNode::new("a", 80.0, 20.0),
//!     TreeNode::new("b", 80.0, 20.0).with_children([TreeNode::new("b0", 80.0, 20.0)]),
//!     TreeNode::new("c", 80.0, 20.0),
//! ]);
//! let mut flake = Snowflake::new(tree, LayoutConfig::default());
//!
//! // Expand "b" and resolve collisions.
//! let b = flake.find("b")[0];
//! assert!(flake.toggle_active(b, None));
//! let settlement = flake.settle();
//! assert!(settlement.converged);
//!
//! // Expanded nodes keep the minimum separation beyond both radii.
//! let distance = flake.offset(b).unwrap().hypot();
//! assert!((distance - (80.0 + 80.0 + 120.0)).abs() < 1e-9);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod boundary;
mod collision;
mod diagnostics;
mod ledger;
mod offset;
mod paint;
mod settle;
mod snapshot;
mod tree;
mod types;
mod wedge;

pub use boundary::BoundarySide;
pub use collision::{CollisionRecord, required_distance};
#[cfg(feature = "tracing")]
pub use diagnostics::TracingDiagnostics;
pub use diagnostics::{DiagnosticEvent, Diagnostics, EventLog, NoopDiagnostics};
pub use ledger::PairKey;
pub use paint::{PaintNode, PaintSink};
pub use settle::{Correction, Settlement};
pub use snapshot::{Placement, Snapshot};
pub use tree::Snowflake;
pub use types::{CorrectionPolicy, LayoutConfig, NodeStatus, PositionId, RootSpread, TreeNode};
pub use wedge::{Wedge, slot_width};
