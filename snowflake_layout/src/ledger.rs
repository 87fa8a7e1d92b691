// Copyright 2025 the Snowflake Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The distance ledger: extra separation ancestors must keep to clear collisions.
//!
//! Each entry is owned by one (ancestor, descendant) pair of positions. The descendant
//! wrote it after its connecting line crossed the ancestor's wedge boundary, and the
//! entry lives until that descendant collapses or is discarded. An ancestor's
//! separation is the maximum of its entries.

use alloc::collections::BTreeMap;

use crate::types::PositionId;

/// Key of one ledger entry.
///
/// Keys are positional, so duplicated subtrees with equal tree ids never share an
/// entry. Ordering is by ancestor first, which keeps one ancestor's entries adjacent.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct PairKey {
    /// The position whose separation grows.
    pub ancestor: PositionId,
    /// The position whose connecting line crossed the ancestor's wedge.
    pub descendant: PositionId,
}

impl PairKey {
    /// Key for `descendant`'s entry in `ancestor`'s ledger.
    pub fn new(descendant: PositionId, ancestor: PositionId) -> Self {
        Self {
            ancestor,
            descendant,
        }
    }

    fn first_of(ancestor: PositionId) -> Self {
        Self::new(PositionId::new(0, 0), ancestor)
    }

    fn last_of(ancestor: PositionId) -> Self {
        Self::new(PositionId::new(u32::MAX, u32::MAX), ancestor)
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Ledger {
    entries: BTreeMap<PairKey, f64>,
}

impl Ledger {
    pub(crate) fn get(&self, key: PairKey) -> Option<f64> {
        self.entries.get(&key).copied()
    }

    /// Store `distance` under `key`. Returns `false` if an entry within `tolerance`
    /// was already present, in which case nothing changes.
    pub(crate) fn write(&mut self, key: PairKey, distance: f64, tolerance: f64) -> bool {
        debug_assert!(distance.is_finite(), "ledger distances must be finite");
        match self.entries.get_mut(&key) {
            Some(existing) if (*existing - distance).abs() <= tolerance => false,
            Some(existing) => {
                *existing = distance;
                true
            }
            None => {
                self.entries.insert(key, distance);
                true
            }
        }
    }

    pub(crate) fn remove(&mut self, key: PairKey) -> Option<f64> {
        self.entries.remove(&key)
    }

    /// Entries recorded against `ancestor`, ordered by descendant.
    pub(crate) fn entries_for(
        &self,
        ancestor: PositionId,
    ) -> impl Iterator<Item = (PairKey, f64)> + '_ {
        self.entries
            .range(PairKey::first_of(ancestor)..=PairKey::last_of(ancestor))
            .map(|(k, v)| (*k, *v))
    }

    pub(crate) fn max_for(&self, ancestor: PositionId) -> Option<f64> {
        self.entries_for(ancestor)
            .map(|(_, v)| v)
            .reduce(f64::max)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn id(slot: u32) -> PositionId {
        PositionId::new(slot, 1)
    }

    #[test]
    fn write_reports_changes_only() {
        let mut ledger = Ledger::default();
        let key = PairKey::new(id(5), id(1));
        assert!(ledger.write(key, 200.0, 1e-6));
        assert!(!ledger.write(key, 200.0 + 1e-9, 1e-6), "within tolerance");
        assert!(ledger.write(key, 210.0, 1e-6));
        assert_eq!(ledger.get(key), Some(210.0));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn entries_are_grouped_by_ancestor() {
        let mut ledger = Ledger::default();
        ledger.write(PairKey::new(id(7), id(2)), 150.0, 0.0);
        ledger.write(PairKey::new(id(4), id(1)), 300.0, 0.0);
        ledger.write(PairKey::new(id(9), id(1)), 250.0, 0.0);
        ledger.write(PairKey::new(id(3), id(0)), 999.0, 0.0);

        let of_one: Vec<_> = ledger
            .entries_for(id(1))
            .map(|(k, v)| (k.descendant, v))
            .collect();
        assert_eq!(of_one, [(id(4), 300.0), (id(9), 250.0)]);
        assert_eq!(ledger.max_for(id(1)), Some(300.0));
        assert_eq!(ledger.max_for(id(2)), Some(150.0));
        assert_eq!(ledger.max_for(id(6)), None);
    }

    #[test]
    fn removing_the_largest_entry_lowers_the_max() {
        let mut ledger = Ledger::default();
        let big = PairKey::new(id(4), id(1));
        let small = PairKey::new(id(9), id(1));
        ledger.write(big, 300.0, 0.0);
        ledger.write(small, 250.0, 0.0);
        assert_eq!(ledger.remove(big), Some(300.0));
        assert_eq!(ledger.max_for(id(1)), Some(250.0));
        assert_eq!(ledger.remove(big), None);
        ledger.remove(small);
        assert_eq!(ledger.max_for(id(1)), None);
    }
}
