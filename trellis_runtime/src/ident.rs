// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Page identity allocation.

use core::fmt;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;
use thiserror::Error;
use tracing::{error, trace};

/// Identity of one page instance: a normalized path and its occurrence number.
///
/// The first instance of a path gets `0`, the next `1`, and so on until the allocator is reset.
#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct PageId {
    path: Arc<str>,
    seq: u32,
}

impl PageId {
    /// The normalized page path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Occurrence number of this path.
    pub fn seq(&self) -> u32 {
        self.seq
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.path, self.seq)
    }
}

/// Normalize a page path: `\` becomes `/`, leading `/` and `./` are stripped, and so is the file
/// extension of the last segment.
///
/// ```
/// use trellis_runtime::normalize_path;
///
/// assert_eq!(normalize_path("/pages/index/index.js"), "pages/index/index");
/// assert_eq!(normalize_path(r".\pages\me"), "pages/me");
/// ```
pub fn normalize_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    let mut rest = path.as_str();
    loop {
        if let Some(r) = rest.strip_prefix("./") {
            rest = r;
        } else if let Some(r) = rest.strip_prefix('/') {
            rest = r;
        } else {
            break;
        }
    }
    let last = rest.rfind('/').map_or(0, |i| i + 1);
    match rest[last..].rfind('.') {
        Some(dot) if dot > 0 => rest[..last + dot].to_owned(),
        _ => rest.to_owned(),
    }
}

/// Errors from [`PageIdAllocator`].
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum AllocatorError {
    /// `reset` was called while pages were still live.
    #[error("cannot reset page ids while {} page(s) are live", .live.len())]
    LivePages {
        /// The live pages, sorted.
        live: Vec<PageId>,
    },
}

#[derive(Debug, Default)]
struct State {
    counters: HashMap<String, u32>,
    live: HashSet<PageId>,
}

/// Hands out [`PageId`]s.
///
/// Clones share state. Allocation is safe from any thread; pages themselves are not.
#[derive(Clone, Debug, Default)]
pub struct PageIdAllocator {
    state: Arc<Mutex<State>>,
}

impl PageIdAllocator {
    /// A fresh allocator.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide allocator.
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<PageIdAllocator> = OnceLock::new();
        GLOBAL.get_or_init(Self::new)
    }

    /// Allocate the next identity for `path` and mark it live.
    pub fn allocate(&self, path: &str) -> PageId {
        let path = normalize_path(path);
        let mut state = self.state.lock();
        let counter = state.counters.entry(path.clone()).or_insert(0);
        let id = PageId {
            path: path.into(),
            seq: *counter,
        };
        *counter += 1;
        state.live.insert(id.clone());
        trace!(page = %id, "allocate page id");
        id
    }

    /// Mark `id` as no longer live. Returns false if it was not live.
    pub fn release(&self, id: &PageId) -> bool {
        let released = self.state.lock().live.remove(id);
        trace!(page = %id, released, "release page id");
        released
    }

    /// Returns true if `id` is live.
    pub fn is_live(&self, id: &PageId) -> bool {
        self.state.lock().live.contains(id)
    }

    /// Number of live pages.
    pub fn live(&self) -> usize {
        self.state.lock().live.len()
    }

    /// Restart every path's numbering at zero.
    ///
    /// Only valid with no live pages; otherwise nothing is cleared and the live pages are
    /// reported.
    pub fn reset(&self) -> Result<(), AllocatorError> {
        let mut state = self.state.lock();
        if !state.live.is_empty() {
            let mut live: Vec<_> = state.live.iter().cloned().collect();
            live.sort();
            error!(live = live.len(), first = %live[0], "page id reset with live pages");
            return Err(AllocatorError::LivePages { live });
        }
        state.counters.clear();
        trace!("page ids reset");
        Ok(())
    }
}
