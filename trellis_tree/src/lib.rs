// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=trellis_tree --heading-base-level=0

//! Trellis Tree: a minimal component tree whose components subscribe to page events.
//!
//! This crate is the rendering capability the Trellis runtime consumes.
//! It mounts a tree of [`Component`]s, runs their mount and unmount callbacks in a fixed order,
//! and binds the hooks they call during render to an [`EventRegistry`](trellis_registry::EventRegistry)
//! owned by someone else (the page instance).
//!
//! ## Not a reconciler
//!
//! There is no diffing. A re-render matches returned children against mounted children by
//! position and component type: a match keeps the mounted child as is, a mismatch replaces it.
//! That is enough to keep hook identity stable across re-renders, which is all the runtime needs.
//!
//! ## API overview
//!
//! - [`Tree`]: mounts, re-renders, flushes scheduled updates and unmounts components.
//! - [`Component`]: render plus lifecycle callbacks; optional method-style page event handlers.
//! - [`Element`]: an unmounted component as returned from a render.
//! - [`Scope`]: the render context; [`Scope::use_page_event`] is the hook binding.
//! - [`NodeId`] / [`HookId`]: generational node handles and the registry subscriber keys built on them.
//! - [`HookTarget`]: the registry and synonym groups a tree operation writes hooks into.
//!
//! ## Ordering
//!
//! - Mount: `will_mount`, render (hooks register), children mount, `did_mount`. Parents start first
//!   and finish last.
//! - Unmount: `will_unmount` on the parent, then its children, then the parent's registrations are
//!   removed. Every registration is gone before [`Tree::unmount`] returns.
//! - Hooks registered during a render keep their registry slot across re-renders.
//!
//! ## Example
//!
//! ```rust
//! use serde_json::Value;
//! use trellis_registry::{EventRegistry, Synonyms};
//! use trellis_tree::{Component, Element, HookTarget, Scope, Tree};
//!
//! struct Greeter;
//!
//! impl Component for Greeter {
//!     fn render(&mut self, cx: &mut Scope<'_>) -> Vec<Element> {
//!         cx.use_page_event("onShow", |_| Ok(Some(Value::from("hello"))));
//!         vec![Element::text("text", "hi")]
//!     }
//! }
//!
//! let mut registry = EventRegistry::new();
//! let synonyms = Synonyms::new();
//! let mut tree = Tree::new();
//!
//! let mut hooks = HookTarget::new(&mut registry, &synonyms);
//! tree.mount(Element::new(Greeter), &mut hooks).unwrap();
//! assert_eq!(tree.len(), 2);
//!
//! let out = registry.dispatch("onShow", &Value::Null).unwrap();
//! assert_eq!(out, vec![Some(Value::from("hello"))]);
//!
//! let mut hooks = HookTarget::new(&mut registry, &synonyms);
//! tree.unmount(&mut hooks);
//! assert!(registry.is_empty());
//! ```

mod component;
mod error;
mod scope;
mod tree;
mod types;

pub use component::{Component, Element, Host};
pub use error::TreeError;
pub use scope::{HookTarget, Scope, Updater};
pub use tree::Tree;
pub use types::{HookId, HookSlot, NodeId};
