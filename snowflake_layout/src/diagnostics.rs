// Copyright 2025 the Snowflake Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Diagnostics hook for observing activation, collisions, and ledger traffic.
//!
//! The layout never prints. Instead it reports [`DiagnosticEvent`]s to a [`Diagnostics`]
//! implementation injected at construction:
//!
//! - [`NoopDiagnostics`] (the default) discards everything and tells the layout not to
//!   build events at all.
//! - [`EventLog`] keeps events in memory, handy for tests and debug overlays.
//! - `TracingDiagnostics` (feature `tracing`) forwards events to `tracing`.
//!
//! Reporting never changes control flow.

use alloc::string::String;
use alloc::vec::Vec;
use kurbo::Point;

use crate::boundary::BoundarySide;
use crate::types::PositionId;

/// Something the layout did.
#[derive(Clone, Debug, PartialEq)]
pub enum DiagnosticEvent {
    /// A position was expanded and its children became reachable.
    Activated {
        /// The position.
        position: PositionId,
        /// Its tree id.
        id: String,
    },
    /// A position was collapsed.
    Deactivated {
        /// The position.
        position: PositionId,
        /// Its tree id.
        id: String,
    },
    /// A position stopped being reachable and its slot was freed.
    Discarded {
        /// The now stale position.
        position: PositionId,
        /// Its tree id.
        id: String,
    },
    /// A connecting line crossed an ancestor's wedge and was selected for correction.
    Collision {
        /// The position whose line crossed.
        descendant: PositionId,
        /// The ancestor whose wedge was crossed.
        ancestor: PositionId,
        /// The crossed edge.
        side: BoundarySide,
        /// Crossing point in the descendant's frame.
        point: Point,
    },
    /// A ledger entry was added or changed.
    LedgerWritten {
        /// `"{descendant id}_{ancestor id}"`.
        pair_key: String,
        /// Writer.
        descendant: PositionId,
        /// Owner of the ledger.
        ancestor: PositionId,
        /// New extra separation.
        distance: f64,
    },
    /// A ledger entry was removed because its writer collapsed or was discarded.
    LedgerCleared {
        /// `"{descendant id}_{ancestor id}"`.
        pair_key: String,
        /// Writer.
        descendant: PositionId,
        /// Owner of the ledger.
        ancestor: PositionId,
        /// The removed distance.
        distance: f64,
    },
    /// One settling pass finished.
    PassCompleted {
        /// Zero-based pass number within the current settle.
        pass: usize,
        /// Positions checked in this pass.
        checked: usize,
        /// Ledger writes that changed a value.
        corrections: usize,
    },
    /// Settling hit the pass budget with work still pending.
    Unsettled {
        /// Passes run.
        passes: usize,
        /// Positions still waiting for a check.
        pending: usize,
    },
}

/// Receiver of [`DiagnosticEvent`]s.
pub trait Diagnostics {
    /// Whether events should be built at all. Defaults to `true`.
    fn enabled(&self) -> bool {
        true
    }

    /// Observe one event.
    fn record(&mut self, event: &DiagnosticEvent);
}

impl<D: Diagnostics + ?Sized> Diagnostics for &mut D {
    fn enabled(&self) -> bool {
        (**self).enabled()
    }

    fn record(&mut self, event: &DiagnosticEvent) {
        (**self).record(event);
    }
}

/// Discards all events.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopDiagnostics;

impl Diagnostics for NoopDiagnostics {
    fn enabled(&self) -> bool {
        false
    }

    fn record(&mut self, _event: &DiagnosticEvent) {}
}

/// Keeps every event in order.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Vec<DiagnosticEvent>,
}

impl EventLog {
    /// An empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Events recorded so far, oldest first.
    pub fn events(&self) -> &[DiagnosticEvent] {
        &self.events
    }

    /// Remove and return all recorded events.
    pub fn take(&mut self) -> Vec<DiagnosticEvent> {
        core::mem::take(&mut self.events)
    }
}

impl Diagnostics for EventLog {
    fn record(&mut self, event: &DiagnosticEvent) {
        self.events.push(event.clone());
    }
}

/// Forwards events to `tracing`.
///
/// Per-pass traffic is logged at `debug`, exhausting the pass budget at `warn`.
/// Events are built only when `debug` is enabled, so a `warn`-only subscriber pays
/// nothing for the per-pass traffic it would drop.
#[cfg(feature = "tracing")]
#[derive(Copy, Clone, Debug, Default)]
pub struct TracingDiagnostics;

#[cfg(feature = "tracing")]
impl Diagnostics for TracingDiagnostics {
    fn enabled(&self) -> bool {
        tracing::enabled!(tracing::Level::DEBUG)
    }

    fn record(&mut self, event: &DiagnosticEvent) {
        match event {
            DiagnosticEvent::Activated { position, id } => {
                tracing::debug!(?position, id = id.as_str(), "snowflake.activate");
            }
            DiagnosticEvent::Deactivated { position, id } => {
                tracing::debug!(?position, id = id.as_str(), "snowflake.deactivate");
            }
            DiagnosticEvent::Discarded { position, id } => {
                tracing::trace!(?position, id = id.as_str(), "snowflake.discard");
            }
            DiagnosticEvent::Collision {
                descendant,
                ancestor,
                side,
                point,
            } => {
                tracing::debug!(
                    ?descendant,
                    ?ancestor,
                    ?side,
                    x = point.x,
                    y = point.y,
                    "snowflake.collision"
                );
            }
            DiagnosticEvent::LedgerWritten {
                pair_key, distance, ..
            } => {
                tracing::debug!(pair_key = pair_key.as_str(), distance, "snowflake.ledger.write");
            }
            DiagnosticEvent::LedgerCleared {
                pair_key, distance, ..
            } => {
                tracing::debug!(pair_key = pair_key.as_str(), distance, "snowflake.ledger.clear");
            }
            DiagnosticEvent::PassCompleted {
                pass,
                checked,
                corrections,
            } => {
                tracing::debug!(pass, checked, corrections, "snowflake.settle.pass");
            }
            DiagnosticEvent::Unsettled { passes, pending } => {
                tracing::warn!(passes, pending, "snowflake.settle.unsettled");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_is_disabled_and_log_is_enabled() {
        assert!(!NoopDiagnostics.enabled());
        assert!(EventLog::new().enabled());
    }

    #[test]
    fn log_keeps_order_and_can_be_drained() {
        let mut log = EventLog::new();
        let first = DiagnosticEvent::PassCompleted {
            pass: 0,
            checked: 3,
            corrections: 1,
        };
        let second = DiagnosticEvent::Unsettled {
            passes: 1,
            pending: 2,
        };
        fn feed<D: Diagnostics>(mut sink: D, event: &DiagnosticEvent) {
            if sink.enabled() {
                sink.record(event);
            }
        }
        feed(&mut log, &first);
        feed(&mut log, &second);
        assert_eq!(log.events(), [first.clone(), second.clone()]);
        assert_eq!(log.take(), [first, second]);
        assert!(log.events().is_empty());
    }

    #[cfg(feature = "tracing")]
    #[test]
    fn tracing_backend_is_off_without_a_debug_subscriber() {
        // No subscriber is installed in unit tests.
        assert!(!TracingDiagnostics.enabled());
    }
}
