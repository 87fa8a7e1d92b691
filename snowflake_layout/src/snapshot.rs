// Copyright 2025 the Snowflake Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Immutable per-pass view of resolved geometry.

use alloc::vec::Vec;
use kurbo::{Point, Vec2};

use crate::types::PositionId;

/// Resolved geometry of one position.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Placement {
    /// Offset from the parent's origin.
    pub offset: Vec2,
    /// Absolute position: the sum of offsets from the root.
    pub origin: Point,
    /// Current radius.
    pub radius: f64,
}

impl Placement {
    /// Absolute position of the parent, i.e. the origin of this position's frame
    /// before its own offset is applied.
    pub fn parent_origin(&self) -> Point {
        self.origin - self.offset
    }
}

/// Placements of every reachable position, resolved top-down from the root.
///
/// Taken by [`Snowflake::snapshot`](crate::Snowflake::snapshot). It does not track
/// later changes to the layout.
#[derive(Clone, Debug, Default)]
pub struct Snapshot {
    slots: Vec<Option<(u32, Placement)>>,
    len: usize,
}

impl Snapshot {
    pub(crate) fn with_slots(slots: usize) -> Self {
        let mut out = Self::default();
        out.slots.resize(slots, None);
        out
    }

    pub(crate) fn insert(&mut self, id: PositionId, placement: Placement) {
        if self.slots.len() <= id.idx() {
            self.slots.resize(id.idx() + 1, None);
        }
        if self.slots[id.idx()].replace((id.1, placement)).is_none() {
            self.len += 1;
        }
    }

    /// Placement of `id`, if it was reachable when the snapshot was taken.
    pub fn get(&self, id: PositionId) -> Option<&Placement> {
        match self.slots.get(id.idx())? {
            Some((generation, placement)) if *generation == id.1 => Some(placement),
            _ => None,
        }
    }

    /// Number of placements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if nothing was placed.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
