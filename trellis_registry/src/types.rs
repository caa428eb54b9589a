// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Handler and listener types shared by the registry and its callers.

use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::error::HandlerError;

/// Result of running a single handler.
///
/// `Ok(None)` is a handler that returned nothing.
pub type HandlerResult = Result<Option<Value>, HandlerError>;

/// A subscriber callback.
///
/// Handlers are reference counted so a dispatch can snapshot the listener list
/// and release the registry before any handler runs.
pub type Handler = Rc<dyn Fn(&Value) -> HandlerResult>;

/// Wrap a closure as a [`Handler`].
pub fn handler<F>(f: F) -> Handler
where
    F: Fn(&Value) -> HandlerResult + 'static,
{
    Rc::new(f)
}

/// Outcome of [`EventRegistry::subscribe`](crate::EventRegistry::subscribe).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Subscribed {
    /// The subscriber was new for this event and was appended at the end.
    Appended,
    /// The subscriber already had an entry; its handler was replaced in place.
    Replaced,
}

/// One registered subscriber of an event.
#[derive(Clone)]
pub struct Listener<S> {
    /// Subscriber key.
    pub subscriber: S,
    /// Callback invoked on dispatch.
    pub handler: Handler,
}

impl<S: fmt::Debug> fmt::Debug for Listener<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("subscriber", &self.subscriber)
            .finish_non_exhaustive()
    }
}
