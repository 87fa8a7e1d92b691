// Copyright 2025 the Snowflake Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Edge rays of a position's wedge.

use kurbo::{Line, Point, Vec2};
use snowflake_geometry::ray;

use crate::wedge::Wedge;

/// Which edge of a wedge a boundary ray traces.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum BoundarySide {
    /// The edge at `effective_angle + angle_difference / 2`, clockwise on a y-down canvas.
    Clockwise,
    /// The edge at `effective_angle - angle_difference / 2`.
    Anticlockwise,
}

impl BoundarySide {
    /// Index of this side in a `[Line; 2]` boundary pair.
    pub const fn index(self) -> usize {
        match self {
            Self::Clockwise => 0,
            Self::Anticlockwise => 1,
        }
    }
}

/// Boundary rays of a wedge in the position's own frame.
///
/// Both rays start at the parent's origin (`-offset`) and run `probe_length` along
/// the two wedge edges. The result is ordered `[clockwise, anticlockwise]`.
pub(crate) fn boundaries(wedge: &Wedge, offset: Vec2, probe_length: f64) -> [Line; 2] {
    let start = Point::ZERO - offset;
    let angle = wedge.effective_angle();
    let half = wedge.angle_difference / 2.0;
    [
        ray(start, angle + half, probe_length),
        ray(start, angle - half, probe_length),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use snowflake_geometry::{angle_between, direction};

    const EPS: f64 = 1e-9;

    #[test]
    fn rays_start_at_the_parent_and_span_the_wedge() {
        let wedge = Wedge::ROOT.child(1, 3); // pointing along +x, 90 degrees wide
        let offset = Vec2::new(280.0, 0.0);
        let [cw, acw] = boundaries(&wedge, offset, 1000.0);

        assert_eq!(cw.p0, Point::new(-280.0, 0.0));
        assert_eq!(acw.p0, Point::new(-280.0, 0.0));
        assert!((direction(cw).hypot() - 1000.0).abs() < EPS);
        assert!((angle_between(direction(cw), direction(acw)) - 90.0).abs() < EPS);

        // Clockwise edge bends towards +y.
        assert!(direction(cw).y > 0.0, "got {cw:?}");
        assert!(direction(acw).y < 0.0, "got {acw:?}");
    }

    #[test]
    fn side_indices_match_pair_order() {
        assert_eq!(BoundarySide::Clockwise.index(), 0);
        assert_eq!(BoundarySide::Anticlockwise.index(), 1);
    }
}
