// Copyright 2025 the Snowflake Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Offset of a position relative to its parent.

use kurbo::Vec2;
use snowflake_geometry::polar;

use crate::wedge::Wedge;

/// Extra distance an active position keeps from its parent, beyond both radii.
///
/// Collapsed positions keep none. Expanded positions keep the largest ledger entry,
/// but never less than `min_line_distance`.
pub(crate) fn required_separation(
    active: bool,
    ledger_max: Option<f64>,
    min_line_distance: f64,
) -> f64 {
    if !active {
        return 0.0;
    }
    ledger_max.map_or(min_line_distance, |max| max.max(min_line_distance))
}

/// Offset from the parent's origin to this position's origin.
///
/// An expanded position sits `own + parent + separation` away along its wedge
/// direction. A collapsed one sits at `parent` distance, i.e. its own radius is
/// cancelled and it nests against the parent's rim.
pub(crate) fn resolve_offset(
    wedge: &Wedge,
    own_radius: f64,
    parent_radius: f64,
    active: bool,
    separation: f64,
) -> Vec2 {
    let extension = if active { separation } else { -own_radius };
    let total = own_radius + parent_radius + extension;
    polar(wedge.effective_angle(), total)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn separation_is_zero_when_collapsed() {
        assert_eq!(required_separation(false, Some(500.0), 120.0), 0.0);
        assert_eq!(required_separation(false, None, 120.0), 0.0);
    }

    #[test]
    fn separation_never_drops_below_minimum() {
        assert_eq!(required_separation(true, None, 120.0), 120.0);
        assert_eq!(required_separation(true, Some(30.0), 120.0), 120.0);
        assert_eq!(required_separation(true, Some(300.0), 120.0), 300.0);
    }

    #[test]
    fn separation_is_monotone_in_ledger_values() {
        let mut last = required_separation(true, None, 120.0);
        for step in 0..40 {
            let value = f64::from(step) * 10.0;
            let next = required_separation(true, Some(value), 120.0);
            assert!(next >= last, "{next} < {last} at {value}");
            last = next;
        }
    }

    #[test]
    fn active_offset_adds_radii_and_separation() {
        let wedge = Wedge::ROOT.child(0, 3); // effective angle 270
        let offset = resolve_offset(&wedge, 80.0, 80.0, true, 120.0);
        assert!(offset.x.abs() < EPS, "got {offset:?}");
        assert!((offset.y + 280.0).abs() < EPS, "got {offset:?}");
    }

    #[test]
    fn collapsed_offset_nests_on_the_parent_rim() {
        let wedge = Wedge::ROOT.child(1, 3); // effective angle 360
        let offset = resolve_offset(&wedge, 20.0, 80.0, false, 0.0);
        assert!((offset.x - 80.0).abs() < EPS, "got {offset:?}");
        assert!(offset.y.abs() < 1e-6, "got {offset:?}");
    }
}
