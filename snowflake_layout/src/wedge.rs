// Copyright 2025 the Snowflake Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Angular partition: which slice of the circle each child occupies.
//!
//! A node with `n` children splits the circle into `n + 1` equal slots. Slot `0` points
//! back along the edge the node hangs from and stays empty; children take slots
//! `1..=n` in order. Each child's cone opens opposite its parent's incoming direction,
//! so absolute placement is fully determined by the shape of the tree.

use crate::types::RootSpread;

/// Angular placement of one position, in degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Wedge {
    /// Direction the parent's frame is rotated by.
    pub starting_angle: f64,
    /// Angle of this position within the parent's frame.
    pub angle: f64,
    /// Angular width of the slice allotted to this position's subtree.
    pub angle_difference: f64,
}

impl Wedge {
    /// The root's placement: no rotation and the whole circle.
    pub const ROOT: Self = Self {
        starting_angle: 0.0,
        angle: 0.0,
        angle_difference: 360.0,
    };

    /// Absolute direction of the edge from the parent to this position.
    pub fn effective_angle(&self) -> f64 {
        self.starting_angle + self.angle
    }

    /// Wedge of child `index` out of `count` siblings under a parent with wedge `self`.
    pub fn child(&self, index: usize, count: usize) -> Self {
        let d = slot_width(count);
        Self {
            starting_angle: (self.starting_angle + 180.0 + self.angle) % 360.0,
            angle: d * (index + 1) as f64,
            angle_difference: d,
        }
    }

    /// Wedge of child `index` out of `count` siblings directly under the root.
    pub fn root_child(index: usize, count: usize, spread: RootSpread) -> Self {
        match spread {
            RootSpread::Reserved => Self::ROOT.child(index, count),
            RootSpread::Full => {
                let d = 360.0 / count as f64;
                Self {
                    starting_angle: 0.0,
                    angle: d * index as f64,
                    angle_difference: d,
                }
            }
        }
    }
}

/// Width of each child slot for a node with `count` children.
pub fn slot_width(count: usize) -> f64 {
    360.0 / (count + 1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    const EPS: f64 = 1e-9;

    fn children(parent: Wedge, count: usize) -> Vec<Wedge> {
        (0..count).map(|i| parent.child(i, count)).collect()
    }

    #[test]
    fn children_take_slots_after_the_incoming_edge() {
        let kids = children(Wedge::ROOT, 3);
        let angles: Vec<f64> = kids.iter().map(|w| w.angle).collect();
        assert_eq!(angles, [90.0, 180.0, 270.0]);
        assert!(kids.iter().all(|w| w.angle_difference == 90.0));
        assert!(kids.iter().all(|w| w.starting_angle == 180.0));
    }

    #[test]
    fn sector_widths_sum_to_all_but_one_slot() {
        for k in 0..8_usize {
            let total: f64 = children(Wedge::ROOT, k)
                .iter()
                .map(|w| w.angle_difference)
                .sum();
            let expected = k as f64 * 360.0 / (k + 1) as f64;
            assert!((total - expected).abs() < EPS, "k = {k}: {total}");
        }
        assert!(children(Wedge::ROOT, 0).is_empty());
    }

    #[test]
    fn grandchildren_open_away_from_the_parent() {
        let parent = Wedge::ROOT.child(1, 3);
        assert_eq!(parent.effective_angle(), 360.0);
        let kid = parent.child(3, 4);
        // starting angle wraps: 180 + 180 + 180 = 540 -> 180
        assert_eq!(kid.starting_angle, 180.0);
        assert_eq!(kid.angle, 288.0);
        assert_eq!(kid.angle_difference, 72.0);
        assert_eq!(kid.effective_angle() % 360.0, 108.0);
    }

    #[test]
    fn full_root_spread_uses_the_whole_circle() {
        let kids: Vec<Wedge> = (0..4)
            .map(|i| Wedge::root_child(i, 4, RootSpread::Full))
            .collect();
        let angles: Vec<f64> = kids.iter().map(|w| w.angle).collect();
        assert_eq!(angles, [0.0, 90.0, 180.0, 270.0]);
        assert!(kids.iter().all(|w| w.starting_angle == 0.0));
        assert_eq!(
            Wedge::root_child(0, 4, RootSpread::Reserved),
            Wedge::ROOT.child(0, 4)
        );
    }
}
