// Copyright 2025 the Snowflake Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Snowflake Geometry: the small geometry kernel behind radial diagram collision tests.
//!
//! It works directly on [`kurbo`] types: [`Point`] for positions, [`Vec2`] for offsets and
//! directions, and [`Line`] for ordered point pairs (segments and long probe rays).
//!
//! - [`segment_intersect`] finds the crossing of two segments with fixed tolerances
//!   for parallel lines and near-endpoint contacts.
//! - [`angle_between`] measures the unsigned angle between two vectors in degrees.
//! - [`polar`], [`ray`], [`translate`] and [`direction`] are the handful of helpers the
//!   layout crate needs to move lines between local frames.
//!
//! All angles at this API are in degrees, matching how wedges are described by callers.
//! Degenerate inputs never fault: they resolve to "no intersection".
//!
//! # Example
//!
//! ```rust
//! use kurbo::{Line, Point};
//! use snowflake_geometry::segment_intersect;
//!
//! let a = Line::new((0.0, 0.0), (10.0, 10.0));
//! let b = Line::new((0.0, 10.0), (10.0, 0.0));
//! assert_eq!(segment_intersect(a, b), Some(Point::new(5.0, 5.0)));
//!
//! // Parallel segments never intersect.
//! let c = Line::new((0.0, 1.0), (10.0, 11.0));
//! assert_eq!(segment_intersect(a, c), None);
//! ```
//!
//! This crate is `no_std`.

#![no_std]

use kurbo::{Line, Point, Vec2};

/// Cross-product magnitude below which two directions are treated as parallel.
pub const PARALLEL_TOLERANCE: f64 = 0.001;

/// Fraction of the first segment at either end inside which a crossing is ignored.
///
/// Segments that share a vertex would otherwise report a crossing at that vertex.
pub const ENDPOINT_MARGIN: f64 = 0.001;

/// Intersect segment `a` with line `b`.
///
/// Returns `None` when:
/// - either input has zero length,
/// - the directions are parallel within [`PARALLEL_TOLERANCE`],
/// - the crossing parameter `t` along `a` is not strictly inside
///   `(ENDPOINT_MARGIN, 1 - ENDPOINT_MARGIN)`.
///
/// Only the parameter along `a` is bounded. `b` is expected to be a long probe ray,
/// so it is treated as extending through its two points.
pub fn segment_intersect(a: Line, b: Line) -> Option<Point> {
    if a.p0 == a.p1 || b.p0 == b.p1 {
        return None;
    }
    let da = direction(a);
    let db = direction(b);

    let denominator = da.cross(db);
    if denominator.abs() < PARALLEL_TOLERANCE {
        return None;
    }

    let t = db.cross(a.p0 - b.p0) / denominator;
    // Written as a positive range check so NaN is rejected too.
    if !(t > ENDPOINT_MARGIN && t < 1.0 - ENDPOINT_MARGIN) {
        return None;
    }
    Some(a.p0 + da * t)
}

/// Unsigned angle between `v1` and `v2` in degrees, in `[0, 180]`.
///
/// Equivalent to `acos(dot / (|v1| |v2|))`, evaluated through `atan2` so that nearly
/// parallel vectors do not lose precision. Returns `0` if either vector is zero.
pub fn angle_between(v1: Vec2, v2: Vec2) -> f64 {
    Vec2::new(v1.dot(v2), v1.cross(v2).abs())
        .atan2()
        .to_degrees()
}

/// Sine of an angle given in degrees.
pub fn sin_degrees(angle: f64) -> f64 {
    Vec2::from_angle(angle.to_radians()).y
}

/// Vector of `length` pointing at `angle` degrees.
///
/// Angles grow from the positive x axis towards the positive y axis, which reads as
/// clockwise on a y-down canvas.
pub fn polar(angle: f64, length: f64) -> Vec2 {
    Vec2::from_angle(angle.to_radians()) * length
}

/// A line from `origin` reaching `length` units at `angle` degrees.
pub fn ray(origin: Point, angle: f64, length: f64) -> Line {
    Line::new(origin, origin + polar(angle, length))
}

/// Move both ends of `line` by `offset`.
pub fn translate(line: Line, offset: Vec2) -> Line {
    Line::new(line.p0 + offset, line.p1 + offset)
}

/// The vector from the first to the second point of `line`.
pub fn direction(line: Line) -> Vec2 {
    line.p1 - line.p0
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn zero_length_segment_has_no_intersection() {
        let a = Line::new((0.0, 0.0), (0.0, 0.0));
        let b = Line::new((1.0, 1.0), (2.0, 2.0));
        assert_eq!(segment_intersect(a, b), None);
        assert_eq!(segment_intersect(b, a), None);
    }

    #[test]
    fn parallel_segments_have_no_intersection() {
        let a = Line::new((0.0, 0.0), (10.0, 0.0));
        let b = Line::new((0.0, 1.0), (10.0, 1.0));
        assert_eq!(segment_intersect(a, b), None);
    }

    #[test]
    fn crossing_diagonals_meet_in_the_middle() {
        let a = Line::new((0.0, 0.0), (10.0, 10.0));
        let b = Line::new((0.0, 10.0), (10.0, 0.0));
        let p = segment_intersect(a, b).expect("diagonals cross");
        assert!((p.x - 5.0).abs() < EPS, "x was {}", p.x);
        assert!((p.y - 5.0).abs() < EPS, "y was {}", p.y);
    }

    #[test]
    fn nearly_parallel_within_tolerance_is_rejected() {
        // cross product of directions is 0.0005
        let a = Line::new((0.0, 0.0), (1.0, 0.0));
        let b = Line::new((0.0, 1.0), (1.0, 1.0005));
        assert_eq!(segment_intersect(a, b), None);
    }

    #[test]
    fn shared_vertex_is_not_a_crossing() {
        let a = Line::new((0.0, 0.0), (10.0, 0.0));
        let b = Line::new((0.0, -5.0), (0.0, 5.0));
        assert_eq!(segment_intersect(a, b), None, "t = 0 is excluded");
        let c = Line::new((10.0, -5.0), (10.0, 5.0));
        assert_eq!(segment_intersect(a, c), None, "t = 1 is excluded");
        let near_end = Line::new((9.995, -5.0), (9.995, 5.0));
        assert_eq!(segment_intersect(a, near_end), None, "t = 0.9995 is excluded");
        let inside = Line::new((9.9, -5.0), (9.9, 5.0));
        assert!(segment_intersect(a, inside).is_some());
    }

    #[test]
    fn second_line_is_unbounded() {
        // `b` stops short of `a` but its extension crosses it.
        let a = Line::new((0.0, 0.0), (10.0, 0.0));
        let b = Line::new((5.0, 5.0), (5.0, 1.0));
        let p = segment_intersect(a, b).expect("extension of b crosses a");
        assert!((p.x - 5.0).abs() < EPS && p.y.abs() < EPS, "got {p:?}");
    }

    #[test]
    fn angle_between_right_angle_and_opposites() {
        let x = Vec2::new(3.0, 0.0);
        let y = Vec2::new(0.0, 2.0);
        assert!((angle_between(x, y) - 90.0).abs() < EPS);
        assert!((angle_between(x, -x) - 180.0).abs() < EPS);
        assert!(angle_between(x, x * 4.0).abs() < EPS);
        assert!((angle_between(x, Vec2::new(1.0, -1.0)) - 45.0).abs() < EPS);
        assert_eq!(angle_between(Vec2::ZERO, y), 0.0);
    }

    #[test]
    fn polar_and_ray_follow_degrees() {
        let v = polar(90.0, 2.0);
        assert!(v.x.abs() < EPS && (v.y - 2.0).abs() < EPS, "got {v:?}");
        let r = ray(Point::new(1.0, 1.0), 180.0, 3.0);
        assert_eq!(r.p0, Point::new(1.0, 1.0));
        assert!((r.p1.x + 2.0).abs() < EPS && (r.p1.y - 1.0).abs() < EPS);
        assert!((sin_degrees(30.0) - 0.5).abs() < EPS);
    }

    #[test]
    fn translate_keeps_direction() {
        let l = Line::new((0.0, 0.0), (1.0, 2.0));
        let moved = translate(l, Vec2::new(-3.0, 4.0));
        assert_eq!(moved.p0, Point::new(-3.0, 4.0));
        assert_eq!(direction(moved), direction(l));
    }
}
