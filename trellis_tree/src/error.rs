// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree errors.

use thiserror::Error;

use crate::types::NodeId;

/// Errors from tree operations.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum TreeError {
    /// The tree already has a root; unmount it first.
    #[error("tree already has a mounted root {root}")]
    AlreadyMounted {
        /// The existing root.
        root: NodeId,
    },
    /// The node was unmounted (or its slot was reused).
    #[error("node {node} is not mounted")]
    StaleNode {
        /// The stale id.
        node: NodeId,
    },
    /// The component is borrowed by a running handler and cannot render.
    #[error("component `{name}` at {node} is busy")]
    Busy {
        /// The busy node.
        node: NodeId,
        /// Its display name.
        name: &'static str,
    },
}
