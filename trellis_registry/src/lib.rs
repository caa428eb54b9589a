// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=trellis_registry --heading-base-level=0

//! Trellis Registry: an ordered event subscription registry.
//!
//! ## Overview
//!
//! An [`EventRegistry`] maps an event name to an ordered list of subscribers.
//! Each subscriber is identified by a caller-chosen key `S` (for example a node id plus a hook slot),
//! and carries a [`Handler`] that receives a JSON payload and may return a result.
//!
//! The registry is the leaf building block of Trellis: the component tree registers hooks into it,
//! and page and app instances dispatch host lifecycle calls through it.
//!
//! ## Ordering
//!
//! - Handlers for one event run in registration order.
//! - Subscribing an existing `(event, subscriber)` pair replaces the handler in its original slot.
//! - Unsubscribing removes one entry without reordering the remaining ones.
//!
//! ## Dispatch
//!
//! [`EventRegistry::dispatch`] runs every handler for an event and collects their results in order.
//! A failing handler does not stop the rest; all failures are reported together in a
//! [`DispatchError`] once every handler ran, each tagged with its subscriber.
//! Dispatching an event nobody subscribed to is a no-op that yields an empty result list.
//!
//! When handlers may write back into the registry (for example by scheduling a re-render that
//! re-registers hooks), take a snapshot with [`EventRegistry::listeners`] and run it with
//! [`dispatch_listeners`] so no borrow of the registry is held while handlers execute.
//!
//! ## Synonyms
//!
//! Some hosts report one logical event under several method names.
//! [`Synonyms`] records those groups as declared by platform adapters.
//! The registry itself treats every name independently; expanding a logical event into its
//! names is the caller's job (see [`Synonyms::expand`]).
//!
//! ## Example
//!
//! ```rust
//! use serde_json::json;
//! use trellis_registry::{EventRegistry, Subscribed, handler};
//!
//! let mut registry: EventRegistry<u32> = EventRegistry::new();
//! registry.subscribe("onShow", 1, handler(|_| Ok(Some(json!("first")))));
//! registry.subscribe("onShow", 2, handler(|_| Ok(None)));
//!
//! // Replacing keeps the slot.
//! let outcome = registry.subscribe("onShow", 1, handler(|_| Ok(Some(json!("again")))));
//! assert_eq!(outcome, Subscribed::Replaced);
//!
//! let results = registry.dispatch("onShow", &json!({})).unwrap();
//! assert_eq!(results, vec![Some(json!("again")), None]);
//!
//! // Unknown events dispatch to nobody.
//! assert!(registry.dispatch("onResize", &json!({})).unwrap().is_empty());
//! ```

mod error;
mod registry;
mod synonyms;
mod types;

pub use error::{DispatchError, Failure, HandlerError};
pub use registry::{EventRegistry, dispatch_listeners};
pub use synonyms::{SynonymGroup, Synonyms};
pub use types::{Handler, HandlerResult, Listener, Subscribed, handler};
