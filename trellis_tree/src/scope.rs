// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render scope: the hook binding between components and a page's event registry.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use serde_json::Value;
use trellis_registry::{EventRegistry, Handler, HandlerResult, Synonyms};

use crate::types::{HookId, HookSlot, NodeId};

/// Where hooks registered by a tree operation go.
///
/// Every tree operation that may render or unmount takes one of these, so the registry stays owned
/// by the page instance rather than by the tree.
pub struct HookTarget<'a> {
    /// Registry receiving the subscriptions.
    pub registry: &'a mut EventRegistry<HookId>,
    /// Synonym groups used to expand one hook into its host names.
    pub synonyms: &'a Synonyms,
}

impl<'a> HookTarget<'a> {
    /// Bundle a registry and its synonym groups.
    pub fn new(registry: &'a mut EventRegistry<HookId>, synonyms: &'a Synonyms) -> Self {
        Self { registry, synonyms }
    }
}

impl fmt::Debug for HookTarget<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookTarget")
            .field("registry", &self.registry)
            .field("synonyms", &self.synonyms)
            .finish()
    }
}

pub(crate) type UpdateQueue = Rc<RefCell<Vec<NodeId>>>;

/// Context handed to [`Component::render`](crate::Component::render).
///
/// A `Scope` exists only while the tree renders one component, so hooks cannot be called
/// outside an active render.
pub struct Scope<'a> {
    node: NodeId,
    next_hook: u32,
    registry: &'a mut EventRegistry<HookId>,
    synonyms: &'a Synonyms,
    queue: &'a UpdateQueue,
    pub(crate) registered: Vec<(String, HookId)>,
}

impl<'a> Scope<'a> {
    pub(crate) fn new(node: NodeId, hooks: &'a mut HookTarget<'_>, queue: &'a UpdateQueue) -> Self {
        Self {
            node,
            next_hook: 0,
            registry: &mut *hooks.registry,
            synonyms: hooks.synonyms,
            queue,
            registered: Vec::new(),
        }
    }

    /// The component being rendered.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Subscribe `f` to the page event `event` for as long as this component stays mounted.
    ///
    /// The subscription is made under every synonym name declared for `event`, so one call can
    /// receive the same logical event from several host methods.
    /// Calling this again on a later render, in the same position, replaces the handler in place:
    /// the closure always sees current captured state and dispatch order does not change.
    pub fn use_page_event<F>(&mut self, event: &str, f: F)
    where
        F: Fn(&Value) -> HandlerResult + 'static,
    {
        let id = HookId {
            node: self.node,
            slot: HookSlot::Hook(self.next_hook),
        };
        self.next_hook += 1;
        let handler: Handler = Rc::new(f);
        let synonyms = self.synonyms;
        for name in synonyms.expand(event) {
            self.registry.subscribe(name, id, handler.clone());
            self.registered.push((name.to_owned(), id));
        }
    }

    /// A handle that schedules a re-render of this component.
    pub fn updater(&self) -> Updater {
        Updater {
            node: self.node,
            queue: Rc::downgrade(self.queue),
        }
    }
}

impl fmt::Debug for Scope<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("node", &self.node)
            .field("next_hook", &self.next_hook)
            .finish_non_exhaustive()
    }
}

/// Schedules re-renders of one component.
///
/// Scheduled re-renders run on the next [`Tree::flush`](crate::Tree::flush); the runtime flushes at
/// the end of every dispatch. Scheduling after the tree is dropped is a no-op.
#[derive(Clone, Debug)]
pub struct Updater {
    node: NodeId,
    queue: Weak<RefCell<Vec<NodeId>>>,
}

impl Updater {
    /// Queue a re-render.
    pub fn schedule(&self) {
        if let Some(queue) = self.queue.upgrade() {
            queue.borrow_mut().push(self.node);
        }
    }

    /// The component this updater re-renders.
    pub fn node(&self) -> NodeId {
        self.node
    }
}
