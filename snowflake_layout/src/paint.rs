// Copyright 2025 the Snowflake Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hand-off of resolved geometry to a renderer.

use kurbo::{Line, Point, Vec2};

use crate::Snowflake;
use crate::diagnostics::Diagnostics;
use crate::types::PositionId;

/// Everything a renderer needs to draw one position.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PaintNode<'a> {
    /// The position.
    pub position: PositionId,
    /// Caller id of the tree node.
    pub id: &'a str,
    /// Display title.
    pub title: &'a str,
    /// Whether the position is expanded.
    pub active: bool,
    /// Current radius.
    pub radius: f64,
    /// Offset from the parent's origin.
    pub offset: Vec2,
    /// Absolute position with the pan already subtracted.
    pub origin: Point,
    /// Line from this position back to its parent, in this position's frame.
    /// Zero length for the root.
    pub guide: Line,
    /// Number of edges to the root.
    pub depth: usize,
}

/// Receiver of [`PaintNode`]s.
pub trait PaintSink {
    /// Draw one position.
    fn paint(&mut self, node: &PaintNode<'_>);
}

impl<F: FnMut(&PaintNode<'_>)> PaintSink for F {
    fn paint(&mut self, node: &PaintNode<'_>) {
        self(node);
    }
}

impl<D: Diagnostics> Snowflake<D> {
    /// Emit every reachable position to `sink` in pre-order, translated by `-pan`.
    ///
    /// Panning is purely presentational and never changes the layout.
    pub fn paint(&self, pan: Vec2, sink: &mut impl PaintSink) {
        let snapshot = self.snapshot();
        for position in self.positions() {
            let Some(placement) = snapshot.get(position) else {
                continue;
            };
            let node = PaintNode {
                position,
                id: self.tree_id(position).unwrap_or_default(),
                title: self.title(position).unwrap_or_default(),
                active: self.is_active(position),
                radius: placement.radius,
                offset: placement.offset,
                origin: placement.origin - pan,
                guide: Line::new(Point::ZERO, Point::ZERO - placement.offset),
                depth: self.depth(position).unwrap_or_default(),
            };
            sink.paint(&node);
        }
    }
}
