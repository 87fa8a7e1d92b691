// Copyright 2025 the Snowflake Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collision detection between a position's connecting lines and its ancestors' wedges.
//!
//! For a position `N` and an ancestor `A`, the connecting line runs from `N`'s origin to
//! `A`'s origin. If it crosses one of `A`'s boundary rays, `N` has drifted out of the
//! slice of the plane reserved for `A`'s subtree and `A` needs to move further out.
//! Everything here is expressed in `N`'s own frame and is a pure function of a
//! [`Snapshot`].

use alloc::vec::Vec;
use kurbo::{Line, Point};
use snowflake_geometry::{angle_between, direction, segment_intersect, sin_degrees, translate};

use crate::Snowflake;
use crate::boundary::{BoundarySide, boundaries};
use crate::diagnostics::Diagnostics;
use crate::snapshot::{Placement, Snapshot};
use crate::types::{CorrectionPolicy, PositionId};
use crate::wedge::Wedge;

/// Below this, `sin(angle_difference / 2)` is treated as zero and no distance is derived.
const MIN_HALF_WEDGE_SINE: f64 = 1e-9;

/// Outcome of testing one (descendant, ancestor) pair.
#[derive(Clone, Debug, PartialEq)]
pub struct CollisionRecord {
    /// The position whose connecting line was tested.
    pub descendant: PositionId,
    /// The ancestor whose wedge boundaries were tested.
    pub ancestor: PositionId,
    /// From the descendant's origin to the ancestor's origin, in the descendant's frame.
    pub connecting: Line,
    /// The ancestor's `[clockwise, anticlockwise]` rays, in the descendant's frame.
    pub boundaries: [Line; 2],
    /// Crossing with the clockwise ray.
    pub clockwise: Option<Point>,
    /// Crossing with the anticlockwise ray.
    pub anticlockwise: Option<Point>,
}

impl CollisionRecord {
    /// True if the connecting line crosses either boundary ray.
    pub fn has_intersect(&self) -> bool {
        self.clockwise.is_some() || self.anticlockwise.is_some()
    }

    /// The crossed side and crossing point, preferring the clockwise ray.
    pub fn hit(&self) -> Option<(BoundarySide, Point)> {
        self.clockwise
            .map(|p| (BoundarySide::Clockwise, p))
            .or_else(|| self.anticlockwise.map(|p| (BoundarySide::Anticlockwise, p)))
    }

    /// The crossed ray, preferring the clockwise one.
    pub fn intersecting_ray(&self) -> Option<Line> {
        self.hit().map(|(side, _)| self.boundaries[side.index()])
    }
}

/// Test the connecting line from `descendant` to `ancestor` against the ancestor's wedge.
pub(crate) fn detect_against(
    descendant: PositionId,
    own: &Placement,
    ancestor: PositionId,
    theirs: &Placement,
    their_wedge: &Wedge,
    probe_length: f64,
) -> CollisionRecord {
    // Moves points from the ancestor's frame into the descendant's.
    let shift = theirs.origin - own.origin;
    let connecting = Line::new(Point::ZERO, shift.to_point());
    let rays =
        boundaries(their_wedge, theirs.offset, probe_length).map(|line| translate(line, shift));
    CollisionRecord {
        descendant,
        ancestor,
        connecting,
        boundaries: rays,
        clockwise: segment_intersect(connecting, rays[0]),
        anticlockwise: segment_intersect(connecting, rays[1]),
    }
}

/// Records chosen for correction under `policy`.
pub(crate) fn select(
    records: &[CollisionRecord],
    policy: CorrectionPolicy,
) -> Vec<&CollisionRecord> {
    let mut colliding = records.iter().filter(|r| r.has_intersect());
    match policy {
        CorrectionPolicy::LastInChain => colliding.last().into_iter().collect(),
        CorrectionPolicy::FirstInChain => colliding.next().into_iter().collect(),
        CorrectionPolicy::EveryAncestor => colliding.collect(),
    }
}

/// Extra separation the ancestor needs so the descendant's line clears its wedge.
///
/// Uses the law of sines on the triangle formed by the connecting line, the crossed
/// boundary ray, and the correction:
/// `|connecting| / sin(angle_difference / 2) * sin(180 - angle(connecting, ray))`.
/// Returns `None` if the record has no crossing or the wedge is degenerate.
pub fn required_distance(record: &CollisionRecord, angle_difference: f64) -> Option<f64> {
    let ray = record.intersecting_ray()?;
    let connecting = direction(record.connecting);
    let angle_of_intersection = 180.0 - angle_between(connecting, direction(ray));
    let half_wedge_sine = sin_degrees(angle_difference / 2.0);
    if half_wedge_sine.abs() < MIN_HALF_WEDGE_SINE {
        return None;
    }
    Some((connecting.hypot() / half_wedge_sine * sin_degrees(angle_of_intersection)).abs())
}

impl<D: Diagnostics> Snowflake<D> {
    /// Collision records for `id` against each ancestor, ordered from the parent outward.
    ///
    /// There is one record per ancestor except the root. Below the root the list is one
    /// shorter than [`ancestors`](Self::ancestors), and it is empty for the root and its
    /// children. The root's wedge is the whole plane and has no boundary, so no record
    /// is built for it. Returns an empty list for stale ids. Repeated calls on an
    /// unchanged layout agree exactly.
    pub fn collisions(&self, id: PositionId) -> Vec<CollisionRecord> {
        if !self.is_alive(id) {
            return Vec::new();
        }
        self.detect(&self.snapshot(), id)
    }

    pub(crate) fn detect(&self, snapshot: &Snapshot, id: PositionId) -> Vec<CollisionRecord> {
        let Some(own) = snapshot.get(id) else {
            return Vec::new();
        };
        self.ancestors(id)
            .into_iter()
            .filter(|&ancestor| ancestor != self.root())
            .filter_map(|ancestor| {
                let theirs = snapshot.get(ancestor)?;
                let wedge = self.position(ancestor).wedge;
                Some(detect_against(
                    id,
                    own,
                    ancestor,
                    theirs,
                    &wedge,
                    self.config().probe_length,
                ))
            })
            .collect()
    }
}
