// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=trellis_runtime --heading-base-level=0

//! Trellis Runtime: host-shaped page and app objects backed by a component tree.
//!
//! ## Overview
//!
//! A mini-program host drives pages by calling named methods (`onLoad`, `onShow`, `onUnload`, …)
//! on a config object. This crate builds those config objects from a root component and routes
//! each host call into the page's event registry, so any component at any depth can subscribe to
//! page events through [`Scope::use_page_event`](trellis_tree::Scope::use_page_event).
//!
//! ## Pieces
//!
//! - [`Runtime`]: options, synonym groups, plugin pipelines and the page id allocator.
//!   [`Runtime::create_page_config`] and [`Runtime::create_app_config`] build host configs.
//! - [`Page`]: the host object of one page. Mounts the tree on `onLoad`, dispatches every other
//!   call, and tears everything down on `onUnload`. See [`PagePhase`] for the state machine.
//! - [`App`]: the host object of the app; code subscribes to app events directly.
//! - [`PluginDriver`]: ordered [`HostConfig`] transforms per [`ConfigKind`].
//!   [`PlatformAdapter`] bundles a platform's synonym groups and transforms.
//! - [`PageIdAllocator`]: distinct [`PageId`]s per page instance.
//! - [`RuntimeOptions`]: declared events, synonym groups and [`ResultMerge`] policies, loadable
//!   from JSON.
//! - [`testing::HostPage`]: one method per host gesture, for tests and demos.
//!
//! ## Dispatch
//!
//! A host call resolves to a logical event. The event is expanded into its synonym names and
//! each name is dispatched in declaration order; every subscriber runs even if an earlier one
//! fails. Re-renders scheduled by handlers are flushed before the call returns, and the results
//! are folded into one value by the event's [`ResultMerge`] policy.
//!
//! ## Example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use serde_json::{Value, json};
//! use trellis_runtime::{Page, Runtime};
//! use trellis_tree::{Component, Element, Scope};
//!
//! struct Share {
//!     log: Rc<RefCell<Vec<String>>>,
//! }
//!
//! impl Component for Share {
//!     fn render(&mut self, cx: &mut Scope<'_>) -> Vec<Element> {
//!         let log = self.log.clone();
//!         cx.use_page_event("onShareAppMessage", move |payload| {
//!             log.borrow_mut().push(payload["from"].to_string());
//!             Ok(Some(json!({ "title": "hello" })))
//!         });
//!         Vec::new()
//!     }
//! }
//!
//! let runtime = Runtime::default();
//! let log = Rc::new(RefCell::new(Vec::new()));
//! let shared = log.clone();
//! let config = runtime.create_page_config("pages/index", move |_| {
//!     Element::new(Share { log: shared.clone() })
//! });
//!
//! let mut page = Page::new(config, &runtime);
//! page.invoke("onLoad", json!({})).unwrap();
//! let out = page.invoke("onShareAppMessage", json!({ "from": "menu" })).unwrap();
//! assert_eq!(out, Some(json!({ "title": "hello" })));
//! assert_eq!(*log.borrow(), [r#""menu""#]);
//!
//! page.invoke("onUnload", Value::Null).unwrap();
//! assert!(page.invoke("onShow", Value::Null).is_err());
//! ```

mod app;
mod config;
mod ident;
mod lifecycle;
mod merge;
mod options;
mod page;
mod plugin;
mod runtime;

pub mod testing;

pub use app::{
    App, AppConfig, AppError, AppSubscriber, clear_global_app, global_app, set_global_app,
};
pub use config::{ConfigKind, HostConfig, HostMethod};
pub use ident::{AllocatorError, PageId, PageIdAllocator, normalize_path};
pub use lifecycle::{PageEvent, PagePhase, PhaseSet};
pub use merge::ResultMerge;
pub use options::{OptionsError, RuntimeOptions};
pub use page::{Page, PageConfig, PageError, PageProps, RootFactory};
pub use plugin::{PlatformAdapter, PluginDriver, PluginDriverBuilder, Transform};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeError};
