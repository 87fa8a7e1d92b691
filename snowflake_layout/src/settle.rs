// Copyright 2025 the Snowflake Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Settling: repeated collision passes until the ledger stops changing.

use alloc::vec::Vec;

use crate::Snowflake;
use crate::collision::{required_distance, select};
use crate::diagnostics::{DiagnosticEvent, Diagnostics};
use crate::ledger::PairKey;
use crate::types::{PositionFlags, PositionId};

/// One ledger write that changed a value.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Correction {
    /// The written entry.
    pub key: PairKey,
    /// The new distance.
    pub distance: f64,
    /// Zero-based pass in which it was written.
    pub pass: usize,
}

/// Summary of one [`Snowflake::settle`] call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Settlement {
    /// Passes run.
    pub passes: usize,
    /// Collision checks performed, summed over passes.
    pub checked: usize,
    /// Ledger writes that changed a value, in order.
    pub corrections: Vec<Correction>,
    /// Whether the worklist emptied before the pass budget ran out.
    pub converged: bool,
}

impl Settlement {
    /// True if no ledger entry changed.
    pub fn is_quiet(&self) -> bool {
        self.corrections.is_empty()
    }
}

impl<D: Diagnostics> Snowflake<D> {
    /// Run collision passes until no position is pending.
    ///
    /// Each pass takes a [`snapshot`](Self::snapshot), checks every pending position
    /// once (shallowest first), then applies the collected ledger writes. A write that
    /// changes a value marks the ancestor's subtree pending for the next pass; a write
    /// within [`LayoutConfig::ledger_tolerance`](crate::LayoutConfig::ledger_tolerance)
    /// of the stored value changes nothing.
    ///
    /// Collapsed positions that are still reachable are checked like any other and can
    /// write ledger entries. Such an entry stays while its writer is reachable and
    /// collapsed. It is removed when an ancestor collapse discards the writer, or when
    /// the writer is expanded and then collapsed again.
    ///
    /// Stops after [`LayoutConfig::max_passes`](crate::LayoutConfig::max_passes) passes
    /// with `converged == false`, leaving the remaining positions pending for the
    /// next call.
    pub fn settle(&mut self) -> Settlement {
        let mut out = Settlement::default();
        loop {
            let pending = self.pending_positions();
            if pending.is_empty() {
                out.converged = true;
                break;
            }
            if out.passes >= self.config().max_passes {
                if self.diagnostics.enabled() {
                    let event = DiagnosticEvent::Unsettled {
                        passes: out.passes,
                        pending: pending.len(),
                    };
                    self.diagnostics.record(&event);
                }
                break;
            }
            self.run_pass(&pending, &mut out);
        }
        if !out.corrections.is_empty() {
            self.epoch = self.epoch.wrapping_add(1);
        }
        out
    }

    fn run_pass(&mut self, pending: &[PositionId], out: &mut Settlement) {
        let pass = out.passes;
        for &id in pending {
            self.position_mut(id).flags.remove(PositionFlags::PENDING);
        }
        let snapshot = self.snapshot();
        let policy = self.config().correction;

        let mut writes = Vec::new();
        for &id in pending {
            let records = self.detect(&snapshot, id);
            for record in select(&records, policy) {
                let angle_difference = self.position(record.ancestor).wedge.angle_difference;
                let Some(distance) = required_distance(record, angle_difference) else {
                    continue;
                };
                writes.push((PairKey::new(record.descendant, record.ancestor), distance));
                if self.diagnostics.enabled() {
                    if let Some((side, point)) = record.hit() {
                        let event = DiagnosticEvent::Collision {
                            descendant: record.descendant,
                            ancestor: record.ancestor,
                            side,
                            point,
                        };
                        self.diagnostics.record(&event);
                    }
                }
            }
        }

        let tolerance = self.config().ledger_tolerance;
        let mut corrections = 0;
        for (key, distance) in writes {
            if !self.ledger.write(key, distance, tolerance) {
                continue;
            }
            corrections += 1;
            out.corrections.push(Correction {
                key,
                distance,
                pass,
            });
            if self.diagnostics.enabled() {
                let event = DiagnosticEvent::LedgerWritten {
                    pair_key: self.pair_key_string(key),
                    descendant: key.descendant,
                    ancestor: key.ancestor,
                    distance,
                };
                self.diagnostics.record(&event);
            }
            self.invalidate_subtree(key.ancestor);
        }

        out.passes += 1;
        out.checked += pending.len();
        if self.diagnostics.enabled() {
            let event = DiagnosticEvent::PassCompleted {
                pass,
                checked: pending.len(),
                corrections,
            };
            self.diagnostics.record(&event);
        }
    }
}
