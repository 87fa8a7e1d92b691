// Copyright 2025 the Snowflake Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core layout implementation: source arena, position arena, lifecycle, and queries.

use alloc::format;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use kurbo::{Line, Point, Vec2};

use crate::boundary::boundaries;
use crate::diagnostics::{DiagnosticEvent, Diagnostics, NoopDiagnostics};
use crate::ledger::{Ledger, PairKey};
use crate::offset::{required_separation, resolve_offset};
use crate::snapshot::{Placement, Snapshot};
use crate::types::{LayoutConfig, NodeStatus, PositionFlags, PositionId, TreeNode};
use crate::wedge::Wedge;

/// Immutable copy of one input node, with children as indices into the source arena.
#[derive(Clone, Debug)]
struct SourceNode {
    id: String,
    title: String,
    active_radius: f64,
    inactive_radius: f64,
    initially_active: bool,
    children: Vec<usize>,
}

/// Move `node` and its subtree into `out`, returning the index of `node`.
fn flatten(node: TreeNode, out: &mut Vec<SourceNode>) -> usize {
    let TreeNode {
        id,
        title,
        active_radius,
        inactive_radius,
        active,
        children,
    } = node;
    debug_assert!(
        active_radius.is_finite() && inactive_radius.is_finite(),
        "radii must be finite"
    );
    let index = out.len();
    out.push(SourceNode {
        id,
        title,
        active_radius,
        inactive_radius,
        initially_active: active,
        children: Vec::new(),
    });
    let children = children
        .into_iter()
        .map(|child| flatten(child, out))
        .collect();
    out[index].children = children;
    index
}

#[derive(Clone, Debug)]
pub(crate) struct Position {
    generation: u32,
    source: usize,
    parent: Option<PositionId>,
    children: Vec<PositionId>,
    depth: usize,
    pub(crate) wedge: Wedge,
    pub(crate) flags: PositionFlags,
}

/// A radial snowflake layout over a static tree.
///
/// Holds the input tree, one position per reachable place in the expanded diagram,
/// and the distance ledger. Mutations ([`toggle_active`](Self::toggle_active)) only
/// mark positions as pending; [`settle`](Self::settle) runs the collision passes.
pub struct Snowflake<D: Diagnostics = NoopDiagnostics> {
    config: LayoutConfig,
    sources: Vec<SourceNode>,
    positions: Vec<Option<Position>>, // slots
    generations: Vec<u32>,            // last generation per slot (persists across frees)
    free_list: Vec<usize>,
    root: PositionId,
    pub(crate) ledger: Ledger,
    pub(crate) epoch: u64,
    pub(crate) diagnostics: D,
}

impl<D: Diagnostics> core::fmt::Debug for Snowflake<D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.positions.len();
        let alive = self.positions.iter().filter(|p| p.is_some()).count();
        f.debug_struct("Snowflake")
            .field("sources", &self.sources.len())
            .field("positions_total", &total)
            .field("positions_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("ledger_entries", &self.ledger.len())
            .field("epoch", &self.epoch)
            .finish_non_exhaustive()
    }
}

impl Snowflake {
    /// Lay out `tree` with the given configuration and no diagnostics.
    pub fn new(tree: TreeNode, config: LayoutConfig) -> Self {
        Self::with_diagnostics(tree, config, NoopDiagnostics)
    }
}

impl<D: Diagnostics> Snowflake<D> {
    /// Lay out `tree`, reporting to `diagnostics`.
    ///
    /// The root position is always active. Every node marked
    /// [`active`](TreeNode::active) that is reachable through active ancestors is
    /// expanded too. All created positions start pending; call
    /// [`settle`](Self::settle) to resolve collisions.
    pub fn with_diagnostics(tree: TreeNode, config: LayoutConfig, diagnostics: D) -> Self {
        let mut sources = Vec::new();
        let root_source = flatten(tree, &mut sources);
        let mut flake = Self {
            config,
            sources,
            positions: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            root: PositionId::new(0, 0),
            ledger: Ledger::default(),
            epoch: 0,
            diagnostics,
        };
        flake.root = flake.allocate(
            root_source,
            None,
            0,
            Wedge::ROOT,
            PositionFlags::ACTIVE | PositionFlags::PENDING,
        );
        flake.spawn_children(flake.root);
        flake
    }

    // --- lifecycle ---

    /// Set or flip the active state of `id`.
    ///
    /// With `Some(state)` the position is set to that state, with `None` it is
    /// flipped. Returns `true` if the state changed; stale ids and requests for the
    /// current state are no-ops.
    ///
    /// Activating spawns the children as new positions. Deactivating discards every
    /// descendant and removes the ledger entries this position and its descendants
    /// wrote. Both mark the affected positions pending.
    pub fn toggle_active(&mut self, id: PositionId, state: Option<bool>) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        let current = self.position(id).flags.contains(PositionFlags::ACTIVE);
        let target = state.unwrap_or(!current);
        if target == current {
            return false;
        }
        if target {
            self.activate(id);
        } else {
            self.deactivate(id);
        }
        self.epoch = self.epoch.wrapping_add(1);
        true
    }

    /// Shorthand for [`toggle_active(id, Some(active))`](Self::toggle_active).
    pub fn set_active(&mut self, id: PositionId, active: bool) -> bool {
        self.toggle_active(id, Some(active))
    }

    fn activate(&mut self, id: PositionId) {
        self.position_mut(id).flags.insert(PositionFlags::ACTIVE);
        self.spawn_children(id);
        self.invalidate_subtree(id);
        if self.diagnostics.enabled() {
            let event = DiagnosticEvent::Activated {
                position: id,
                id: self.source(id).id.clone(),
            };
            self.diagnostics.record(&event);
        }
    }

    fn deactivate(&mut self, id: PositionId) {
        self.position_mut(id).flags.remove(PositionFlags::ACTIVE);
        let mut touched = Vec::new();
        let children = core::mem::take(&mut self.position_mut(id).children);
        for child in children {
            self.discard(child, &mut touched);
        }
        self.clear_contributions(id, &mut touched);
        touched.sort_unstable();
        touched.dedup();
        for ancestor in touched {
            self.invalidate_subtree(ancestor);
        }
        self.invalidate_subtree(id);
        if self.diagnostics.enabled() {
            let event = DiagnosticEvent::Deactivated {
                position: id,
                id: self.source(id).id.clone(),
            };
            self.diagnostics.record(&event);
        }
    }

    /// Free `id` and its subtree, children first, collecting ancestors whose ledger
    /// lost an entry.
    fn discard(&mut self, id: PositionId, touched: &mut Vec<PositionId>) {
        let children = core::mem::take(&mut self.position_mut(id).children);
        for child in children {
            self.discard(child, touched);
        }
        self.clear_contributions(id, touched);
        if self.diagnostics.enabled() {
            let event = DiagnosticEvent::Discarded {
                position: id,
                id: self.source(id).id.clone(),
            };
            self.diagnostics.record(&event);
        }
        if let Some(parent) = self.position(id).parent {
            self.position_mut(parent).children.retain(|c| *c != id);
        }
        self.positions[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Remove every entry `id` wrote into an ancestor's ledger.
    fn clear_contributions(&mut self, id: PositionId, touched: &mut Vec<PositionId>) {
        for ancestor in self.ancestors(id) {
            let key = PairKey::new(id, ancestor);
            let Some(distance) = self.ledger.remove(key) else {
                continue;
            };
            touched.push(ancestor);
            if self.diagnostics.enabled() {
                let event = DiagnosticEvent::LedgerCleared {
                    pair_key: self.pair_key_string(key),
                    descendant: id,
                    ancestor,
                    distance,
                };
                self.diagnostics.record(&event);
            }
        }
    }

    fn spawn_children(&mut self, id: PositionId) {
        let (source, wedge, depth) = {
            let p = self.position(id);
            (p.source, p.wedge, p.depth)
        };
        let kids = self.sources[source].children.clone();
        let count = kids.len();
        for (index, kid) in kids.into_iter().enumerate() {
            let child_wedge = if id == self.root {
                Wedge::root_child(index, count, self.config.root_spread)
            } else {
                wedge.child(index, count)
            };
            let mut flags = PositionFlags::PENDING;
            if self.sources[kid].initially_active {
                flags |= PositionFlags::ACTIVE;
            }
            let child = self.allocate(kid, Some(id), depth + 1, child_wedge, flags);
            if flags.contains(PositionFlags::ACTIVE) {
                self.spawn_children(child);
            }
        }
    }

    fn allocate(
        &mut self,
        source: usize,
        parent: Option<PositionId>,
        depth: usize,
        wedge: Wedge,
        flags: PositionFlags,
    ) -> PositionId {
        let make = |generation| Position {
            generation,
            source,
            parent,
            children: Vec::new(),
            depth,
            wedge,
            flags,
        };
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.positions[idx] = Some(make(generation));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "PositionId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.positions.push(Some(make(generation)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "PositionId uses 32-bit indices by design."
            )]
            ((self.positions.len() - 1) as u32, generation)
        };
        let id = PositionId::new(idx, generation);
        if let Some(p) = parent {
            self.position_mut(p).children.push(id);
        }
        id
    }

    /// Mark `id` and all of its descendants pending.
    pub(crate) fn invalidate_subtree(&mut self, id: PositionId) {
        if !self.is_alive(id) {
            return;
        }
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            let p = self.position_mut(next);
            p.flags.insert(PositionFlags::PENDING);
            stack.extend_from_slice(&p.children);
        }
    }

    /// Pending positions ordered by depth, then id.
    pub(crate) fn pending_positions(&self) -> Vec<PositionId> {
        let mut pending: Vec<(usize, PositionId)> = self
            .positions
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| {
                let p = slot.as_ref()?;
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "PositionId uses 32-bit indices by design."
                )]
                let id = PositionId::new(i as u32, p.generation);
                p.flags
                    .contains(PositionFlags::PENDING)
                    .then_some((p.depth, id))
            })
            .collect();
        pending.sort_unstable();
        pending.into_iter().map(|(_, id)| id).collect()
    }

    // --- internals ---

    /// Access a position; panics if `id` is stale.
    pub(crate) fn position(&self, id: PositionId) -> &Position {
        self.positions[id.idx()]
            .as_ref()
            .expect("dangling PositionId")
    }

    /// Access a position mutably; panics if `id` is stale.
    pub(crate) fn position_mut(&mut self, id: PositionId) -> &mut Position {
        self.positions[id.idx()]
            .as_mut()
            .expect("dangling PositionId")
    }

    fn position_opt(&self, id: PositionId) -> Option<&Position> {
        let p = self.positions.get(id.idx())?.as_ref()?;
        (p.generation == id.1).then_some(p)
    }

    fn source(&self, id: PositionId) -> &SourceNode {
        &self.sources[self.position(id).source]
    }

    fn radius_of(&self, id: PositionId) -> f64 {
        if id == self.root {
            if let Some(radius) = self.config.root_radius {
                return radius;
            }
        }
        let p = self.position(id);
        let source = &self.sources[p.source];
        if p.flags.contains(PositionFlags::ACTIVE) {
            source.active_radius
        } else {
            source.inactive_radius
        }
    }

    fn separation_of(&self, id: PositionId) -> f64 {
        let active = self.position(id).flags.contains(PositionFlags::ACTIVE);
        required_separation(
            active,
            self.ledger.max_for(id),
            self.config.min_line_distance,
        )
    }

    fn offset_of(&self, id: PositionId) -> Vec2 {
        let p = self.position(id);
        let Some(parent) = p.parent else {
            return Vec2::ZERO;
        };
        resolve_offset(
            &p.wedge,
            self.radius_of(id),
            self.radius_of(parent),
            p.flags.contains(PositionFlags::ACTIVE),
            self.separation_of(id),
        )
    }

    pub(crate) fn pair_key_string(&self, key: PairKey) -> String {
        format!(
            "{}_{}",
            self.source(key.descendant).id,
            self.source(key.ancestor).id
        )
    }

    // --- queries ---

    /// Returns true if `id` refers to a reachable position.
    ///
    /// See [`PositionId`] for the generational semantics.
    pub fn is_alive(&self, id: PositionId) -> bool {
        self.position_opt(id).is_some()
    }

    /// The root position. It is never discarded.
    pub fn root(&self) -> PositionId {
        self.root
    }

    /// The configuration this layout was built with.
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Caller id of the tree node shown at `id`.
    pub fn tree_id(&self, id: PositionId) -> Option<&str> {
        self.position_opt(id)
            .map(|p| self.sources[p.source].id.as_str())
    }

    /// Display title of the tree node shown at `id`.
    pub fn title(&self, id: PositionId) -> Option<&str> {
        self.position_opt(id)
            .map(|p| self.sources[p.source].title.as_str())
    }

    /// Whether `id` is expanded. `false` for stale ids.
    pub fn is_active(&self, id: PositionId) -> bool {
        self.position_opt(id)
            .is_some_and(|p| p.flags.contains(PositionFlags::ACTIVE))
    }

    /// Settling state of `id`.
    pub fn status(&self, id: PositionId) -> Option<NodeStatus> {
        let p = self.position_opt(id)?;
        Some(if !p.flags.contains(PositionFlags::ACTIVE) {
            NodeStatus::Inactive
        } else if p.flags.contains(PositionFlags::PENDING) {
            NodeStatus::Settling
        } else {
            NodeStatus::Stable
        })
    }

    /// Parent position; `None` for the root and stale ids.
    pub fn parent(&self, id: PositionId) -> Option<PositionId> {
        self.position_opt(id)?.parent
    }

    /// Child positions in tree order. Empty for collapsed positions and stale ids.
    pub fn children(&self, id: PositionId) -> &[PositionId] {
        self.position_opt(id)
            .map(|p| p.children.as_slice())
            .unwrap_or_default()
    }

    /// Number of edges between `id` and the root.
    pub fn depth(&self, id: PositionId) -> Option<usize> {
        self.position_opt(id).map(|p| p.depth)
    }

    /// Angular placement of `id`.
    pub fn wedge(&self, id: PositionId) -> Option<Wedge> {
        self.position_opt(id).map(|p| p.wedge)
    }

    /// Ancestors of `id`, from the parent up to and including the root.
    pub fn ancestors(&self, id: PositionId) -> Vec<PositionId> {
        let mut out = Vec::new();
        let mut cursor = self.parent(id);
        while let Some(ancestor) = cursor {
            out.push(ancestor);
            cursor = self.position(ancestor).parent;
        }
        out
    }

    /// All reachable positions in pre-order.
    pub fn positions(&self) -> Vec<PositionId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.position(id).children.iter().rev());
        }
        out
    }

    /// Reachable positions showing the tree node `tree_id`, in pre-order.
    ///
    /// Tree ids need not be unique, so this may return several positions.
    pub fn find(&self, tree_id: &str) -> Vec<PositionId> {
        self.positions()
            .into_iter()
            .filter(|&id| self.source(id).id == tree_id)
            .collect()
    }

    /// Current radius of `id`: the active or inactive radius of its tree node, or
    /// [`LayoutConfig::root_radius`] for the root when set.
    pub fn radius(&self, id: PositionId) -> Option<f64> {
        self.is_alive(id).then(|| self.radius_of(id))
    }

    /// Extra distance `id` keeps from its parent beyond both radii.
    pub fn separation(&self, id: PositionId) -> Option<f64> {
        self.is_alive(id).then(|| self.separation_of(id))
    }

    /// Offset of `id` from its parent's origin. Zero for the root.
    pub fn offset(&self, id: PositionId) -> Option<Vec2> {
        self.is_alive(id).then(|| self.offset_of(id))
    }

    /// Absolute position of `id`, relative to the root.
    pub fn origin(&self, id: PositionId) -> Option<Point> {
        if !self.is_alive(id) {
            return None;
        }
        let mut origin = Point::ZERO + self.offset_of(id);
        for ancestor in self.ancestors(id) {
            origin += self.offset_of(ancestor);
        }
        Some(origin)
    }

    /// Resolve the placement of every reachable position, top-down from the root.
    pub fn snapshot(&self) -> Snapshot {
        let mut snapshot = Snapshot::with_slots(self.positions.len());
        let mut stack = vec![(self.root, Point::ZERO)];
        while let Some((id, parent_origin)) = stack.pop() {
            let offset = self.offset_of(id);
            let origin = parent_origin + offset;
            snapshot.insert(
                id,
                Placement {
                    offset,
                    origin,
                    radius: self.radius_of(id),
                },
            );
            for &child in self.position(id).children.iter().rev() {
                stack.push((child, origin));
            }
        }
        snapshot
    }

    /// Boundary rays `[clockwise, anticlockwise]` of `id`'s wedge in its own frame,
    /// each `probe_length` long and starting at the parent's origin.
    ///
    /// `None` for the root, whose wedge is the whole plane.
    pub fn boundaries(&self, id: PositionId, probe_length: f64) -> Option<[Line; 2]> {
        let p = self.position_opt(id)?;
        p.parent?;
        Some(boundaries(&p.wedge, self.offset_of(id), probe_length))
    }

    /// Ledger entries recorded against `id`, as `(key, distance)` ordered by writer.
    pub fn ledger(&self, id: PositionId) -> Vec<(PairKey, f64)> {
        if !self.is_alive(id) {
            return Vec::new();
        }
        self.ledger.entries_for(id).collect()
    }

    /// Display form of a ledger key: `"{descendant tree id}_{ancestor tree id}"`.
    pub fn pair_key(&self, key: PairKey) -> Option<String> {
        (self.is_alive(key.descendant) && self.is_alive(key.ancestor))
            .then(|| self.pair_key_string(key))
    }

    /// Total number of ledger entries.
    pub fn ledger_len(&self) -> usize {
        self.ledger.len()
    }

    /// Number of positions waiting for a collision check.
    pub fn pending_count(&self) -> usize {
        self.positions
            .iter()
            .flatten()
            .filter(|p| p.flags.contains(PositionFlags::PENDING))
            .count()
    }

    /// Counter bumped whenever a state change or correction may have moved positions.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// The diagnostics sink.
    pub fn diagnostics(&self) -> &D {
        &self.diagnostics
    }

    /// The diagnostics sink, mutably.
    pub fn diagnostics_mut(&mut self) -> &mut D {
        &mut self.diagnostics
    }
}
