// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Registry implementation: subscription bookkeeping and ordered dispatch.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;
use tracing::{debug, trace};

use crate::error::{DispatchError, Failure};
use crate::types::{Handler, Listener, Subscribed};

/// Ordered mapping from event name to subscribers.
///
/// ## Usage
///
/// - [`EventRegistry::subscribe`] appends a subscriber, or replaces the handler in place when
///   the subscriber is already registered for that event.
/// - [`EventRegistry::unsubscribe`] removes one entry; [`EventRegistry::unsubscribe_where`]
///   removes every entry of a set of subscribers (for example everything owned by an unmounted node).
/// - [`EventRegistry::dispatch`] runs the handlers in order and collects their results.
///
/// Subscriber keys are compared with `Eq`; keep them small and `Copy`.
pub struct EventRegistry<S> {
    events: HashMap<String, Vec<Listener<S>>>,
}

impl<S> Default for EventRegistry<S> {
    fn default() -> Self {
        Self {
            events: HashMap::new(),
        }
    }
}

impl<S: fmt::Debug> fmt::Debug for EventRegistry<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<(&str, usize)> = self
            .events
            .iter()
            .map(|(name, list)| (name.as_str(), list.len()))
            .collect();
        names.sort_unstable();
        f.debug_struct("EventRegistry")
            .field("events", &names)
            .finish()
    }
}

impl<S: Copy + Eq + fmt::Debug> EventRegistry<S> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `event` under `subscriber`.
    ///
    /// A subscriber already present for `event` keeps its slot and only has its handler replaced,
    /// so re-registering on every render does not perturb dispatch order.
    pub fn subscribe(&mut self, event: &str, subscriber: S, handler: Handler) -> Subscribed {
        if let Some(list) = self.events.get_mut(event) {
            if let Some(slot) = list.iter_mut().find(|l| l.subscriber == subscriber) {
                slot.handler = handler;
                trace!(event, ?subscriber, "subscriber replaced");
                return Subscribed::Replaced;
            }
            list.push(Listener {
                subscriber,
                handler,
            });
        } else {
            self.events.insert(
                event.to_owned(),
                vec![Listener {
                    subscriber,
                    handler,
                }],
            );
        }
        trace!(event, ?subscriber, "subscriber appended");
        Subscribed::Appended
    }

    /// Remove `subscriber` from `event`.
    ///
    /// Returns whether an entry was removed. Removing an absent entry is a no-op.
    pub fn unsubscribe(&mut self, event: &str, subscriber: S) -> bool {
        let Some(list) = self.events.get_mut(event) else {
            return false;
        };
        let Some(pos) = list.iter().position(|l| l.subscriber == subscriber) else {
            return false;
        };
        // `Vec::remove` shifts; relative order of the rest is kept.
        list.remove(pos);
        if list.is_empty() {
            self.events.remove(event);
        }
        trace!(event, ?subscriber, "subscriber removed");
        true
    }

    /// Remove every entry, across all events, whose subscriber matches `pred`.
    ///
    /// Returns the number of removed entries.
    pub fn unsubscribe_where(&mut self, mut pred: impl FnMut(&S) -> bool) -> usize {
        let mut removed = 0;
        self.events.retain(|_, list| {
            let before = list.len();
            list.retain(|l| !pred(&l.subscriber));
            removed += before - list.len();
            !list.is_empty()
        });
        removed
    }

    /// Returns true if `subscriber` is registered for `event`.
    pub fn contains(&self, event: &str, subscriber: S) -> bool {
        self.events
            .get(event)
            .is_some_and(|list| list.iter().any(|l| l.subscriber == subscriber))
    }

    /// Number of subscribers for `event`.
    pub fn subscriber_count(&self, event: &str) -> usize {
        self.events.get(event).map_or(0, Vec::len)
    }

    /// Subscriber keys for `event`, in dispatch order.
    pub fn subscribers(&self, event: &str) -> Vec<S> {
        self.events
            .get(event)
            .map(|list| list.iter().map(|l| l.subscriber).collect())
            .unwrap_or_default()
    }

    /// Snapshot of the listeners for `event`, in dispatch order.
    ///
    /// Pair with [`dispatch_listeners`] when handlers may write back into this registry.
    pub fn listeners(&self, event: &str) -> Vec<Listener<S>> {
        self.events.get(event).cloned().unwrap_or_default()
    }

    /// Iterate the names of events that currently have subscribers (unordered).
    pub fn events(&self) -> impl Iterator<Item = &str> + '_ {
        self.events.keys().map(String::as_str)
    }

    /// Total number of entries across all events.
    pub fn len(&self) -> usize {
        self.events.values().map(Vec::len).sum()
    }

    /// Returns true if no event has subscribers.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drop every subscription.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Run every handler for `event` in registration order.
    ///
    /// See [`dispatch_listeners`] for the failure semantics.
    pub fn dispatch(
        &self,
        event: &str,
        payload: &Value,
    ) -> Result<Vec<Option<Value>>, DispatchError<S>> {
        let listeners = self.events.get(event).map_or(&[][..], Vec::as_slice);
        dispatch_listeners(event, listeners, payload)
    }
}

/// Run `listeners` in order with `payload` and collect their results.
///
/// A failing handler never prevents the remaining ones from running.
/// If any failed, the returned [`DispatchError`] lists each failure with its subscriber
/// and carries the results of the handlers that succeeded.
pub fn dispatch_listeners<S: Copy + fmt::Debug>(
    event: &str,
    listeners: &[Listener<S>],
    payload: &Value,
) -> Result<Vec<Option<Value>>, DispatchError<S>> {
    debug!(event, listeners = listeners.len(), "dispatch");
    let mut results = Vec::with_capacity(listeners.len());
    let mut failures = Vec::new();
    for l in listeners {
        match (l.handler)(payload) {
            Ok(value) => results.push(value),
            Err(error) => {
                debug!(event, subscriber = ?l.subscriber, %error, "handler failed");
                failures.push(Failure {
                    subscriber: l.subscriber,
                    error,
                });
            }
        }
    }
    if failures.is_empty() {
        Ok(results)
    } else {
        Err(DispatchError {
            event: event.to_owned(),
            failures,
            results,
        })
    }
}
