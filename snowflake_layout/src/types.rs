// Copyright 2025 the Snowflake Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the layout: position identifiers, input trees, configuration, and status.

use alloc::string::String;
use alloc::vec::Vec;

/// Identifier for a live node position in a [`Snowflake`](crate::Snowflake).
///
/// A position is one place in the expanded diagram. The same [`TreeNode`] data may
/// appear at several places, and each place gets its own position with its own
/// activity flag and ledger.
///
/// This is a small, copyable handle made of a slot index and a generation counter.
///
/// ## Semantics
///
/// - When a parent activates, each child position is allocated a slot; a fresh slot
///   starts at generation `1`.
/// - When an ancestor collapses, the slot is freed and any `PositionId` that pointed
///   to it becomes stale.
/// - On reuse of a freed slot its generation is incremented, producing a new, distinct
///   `PositionId`. Stale ids never alias a different live position.
///
/// Use [`Snowflake::is_alive`](crate::Snowflake::is_alive) to check liveness.
/// The derived ordering (slot, then generation) is only used for deterministic
/// iteration and map keys.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct PositionId(pub(crate) u32, pub(crate) u32);

impl PositionId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Per-position state bits.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub(crate) struct PositionFlags: u8 {
        /// The position is expanded: its children are reachable and it keeps its
        /// minimum separation from its parent.
        const ACTIVE  = 0b0000_0001;
        /// The position's absolute geometry or ledger changed since it was last checked
        /// for collisions.
        const PENDING = 0b0000_0010;
    }
}

/// One node of the static input tree.
///
/// Supplied once per session and never mutated by the layout. Validation (positive
/// radii, no cycles) is the caller's responsibility.
///
/// With the `serde` feature, radii may be given either flat (`activeRadius`,
/// `inactiveRadius`) or nested under `options`, and children under either `children`
/// or `nodes`. Serialization always writes the flat form.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", try_from = "TreeNodeRepr"))]
pub struct TreeNode {
    /// Caller identifier. Not required to be unique across the tree.
    pub id: String,
    /// Display title, passed through to painting.
    pub title: String,
    /// Radius while expanded.
    pub active_radius: f64,
    /// Radius while collapsed.
    pub inactive_radius: f64,
    /// Whether the node starts expanded when it first becomes reachable.
    pub active: bool,
    /// Ordered children; empty for a leaf.
    pub children: Vec<TreeNode>,
}

/// Accepted input shape of a [`TreeNode`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct TreeNodeRepr {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    active_radius: Option<f64>,
    #[serde(default)]
    inactive_radius: Option<f64>,
    #[serde(default)]
    options: Option<RadiusOptions>,
    #[serde(default)]
    active: bool,
    #[serde(default, alias = "nodes")]
    children: Vec<TreeNode>,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct RadiusOptions {
    active_radius: f64,
    inactive_radius: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<TreeNodeRepr> for TreeNode {
    type Error = &'static str;

    fn try_from(repr: TreeNodeRepr) -> Result<Self, Self::Error> {
        let nested = repr.options.as_ref();
        // Flat fields win over `options`.
        let active_radius = repr
            .active_radius
            .or(nested.map(|o| o.active_radius))
            .ok_or("missing activeRadius")?;
        let inactive_radius = repr
            .inactive_radius
            .or(nested.map(|o| o.inactive_radius))
            .ok_or("missing inactiveRadius")?;
        Ok(Self {
            id: repr.id,
            title: repr.title,
            active_radius,
            inactive_radius,
            active: repr.active,
            children: repr.children,
        })
    }
}

impl TreeNode {
    /// A collapsed leaf with the given radii and an empty title.
    pub fn new(id: impl Into<String>, active_radius: f64, inactive_radius: f64) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            active_radius,
            inactive_radius,
            active: false,
            children: Vec::new(),
        }
    }

    /// Set the display title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Replace the children.
    pub fn with_children(mut self, children: impl IntoIterator<Item = Self>) -> Self {
        self.children = children.into_iter().collect();
        self
    }

    /// Mark the node as initially expanded.
    pub fn expanded(mut self) -> Self {
        self.active = true;
        self
    }

    /// True if the node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// How the root distributes its own children around the circle.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RootSpread {
    /// Same rule as every other node: `k` children share `k + 1` slots and slot `0`
    /// stays empty.
    #[default]
    Reserved,
    /// The root has no incoming edge, so its `k` children share the full circle
    /// starting at angle `0`.
    Full,
}

/// Which colliding ancestors of a position get a ledger correction per settling pass.
///
/// Collision records are ordered from the immediate parent outward.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CorrectionPolicy {
    /// Only the last colliding record, i.e. the outermost colliding ancestor.
    #[default]
    LastInChain,
    /// Only the first colliding record, i.e. the nearest colliding ancestor.
    FirstInChain,
    /// Every colliding record.
    EveryAncestor,
}

/// Layout parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LayoutConfig {
    /// Minimum extra distance between an active node and its parent, beyond both radii.
    pub min_line_distance: f64,
    /// Length of wedge boundary rays used in collision tests. Should exceed any
    /// distance in the diagram by a wide margin.
    pub probe_length: f64,
    /// Upper bound on detection passes per [`Snowflake::settle`](crate::Snowflake::settle).
    pub max_passes: usize,
    /// Ledger writes closer than this to the stored value are not corrections.
    pub ledger_tolerance: f64,
    /// Radius reported for the root position regardless of its state, if set.
    pub root_radius: Option<f64>,
    /// Angular distribution of the root's children.
    pub root_spread: RootSpread,
    /// Which colliding ancestors are corrected per pass.
    pub correction: CorrectionPolicy,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_line_distance: 120.0,
            probe_length: 10_000.0,
            max_passes: 64,
            ledger_tolerance: 1e-6,
            root_radius: None,
            root_spread: RootSpread::Reserved,
            correction: CorrectionPolicy::LastInChain,
        }
    }
}

/// Settling state of a position.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum NodeStatus {
    /// Collapsed.
    Inactive,
    /// Expanded, with geometry or ledger changes not yet checked for collisions.
    Settling,
    /// Expanded, and the last check found nothing new to correct.
    Stable,
}
