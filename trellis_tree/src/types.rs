// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the component tree: node identifiers and hook subscriber ids.

use std::fmt;

/// Identifier for a mounted component in the tree.
///
/// This is a small, copyable handle that stays stable while the component is mounted but becomes
/// invalid once it unmounts.
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On mount, a fresh slot is allocated with generation `1`.
/// - On unmount, the slot is freed; any existing `NodeId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `NodeId`.
///
/// Two occurrences of the same component type therefore always carry different ids, and a stale
/// id never aliases a later mount. Use [`Tree::is_alive`](crate::Tree::is_alive) to check liveness.
///
/// `u32` is ample for practical lifetimes; behavior on generation overflow is unspecified.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn generation(self) -> u32 {
        self.1
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.0, self.1)
    }
}

/// Position of a registration within its owning component.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum HookSlot {
    /// The n-th method-style lifecycle handler a component declares.
    Method(u32),
    /// The n-th [`use_page_event`](crate::Scope::use_page_event) call of a render.
    Hook(u32),
}

/// Registry subscriber key for a hook: owning node plus slot.
///
/// Re-rendering a component reproduces the same ids in the same order, which is what lets the
/// registry replace handlers in place instead of appending.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct HookId {
    /// Component that owns the registration.
    pub node: NodeId,
    /// Slot within that component.
    pub slot: HookSlot,
}
