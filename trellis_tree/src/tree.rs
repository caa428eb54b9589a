// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: mounting, re-rendering, unmounting, queries.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde_json::Value;
use tracing::{debug, trace, warn};
use trellis_registry::{Handler, HandlerError};

use crate::component::{Component, ComponentCell, Element};
use crate::error::TreeError;
use crate::scope::{HookTarget, Scope, UpdateQueue};
use crate::types::{HookId, HookSlot, NodeId};

/// Re-render passes one [`Tree::flush`] runs before giving up on a component that keeps
/// scheduling itself.
const MAX_FLUSH_PASSES: usize = 32;

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

/// A mounted component tree.
pub struct Tree {
    nodes: Vec<Option<Node>>, // slots
    generations: Vec<u32>,    // last generation per slot (persists across frees)
    free_list: Vec<usize>,
    root: Option<NodeId>,
    pending: UpdateQueue,
}

impl std::fmt::Debug for Tree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Tree")
            .field("root", &self.root)
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("pending", &self.pending.borrow().len())
            .finish()
    }
}

struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    component: ComponentCell,
    type_id: TypeId,
    name: &'static str,
    // Every (host name, subscriber) this node registered, methods first.
    hooks: Vec<(String, HookId)>,
}

impl Tree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            root: None,
            pending: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Mount `element` as the root of this tree.
    ///
    /// Mount-time callbacks of every component fire before this returns, and every hook the
    /// components register during their first render is in `hooks.registry`.
    pub fn mount(
        &mut self,
        element: Element,
        hooks: &mut HookTarget<'_>,
    ) -> Result<NodeId, TreeError> {
        if let Some(root) = self.root {
            return Err(TreeError::AlreadyMounted { root });
        }
        let root = self.mount_node(None, element, hooks);
        self.root = Some(root);
        debug!(%root, nodes = self.len(), "tree mounted");
        Ok(root)
    }

    /// Unmount the whole tree.
    ///
    /// Unmount-time callbacks fire parent before children, and every registration owned by the
    /// tree is removed from `hooks.registry` before this returns. Returns the number of unmounted
    /// components.
    pub fn unmount(&mut self, hooks: &mut HookTarget<'_>) -> usize {
        let Some(root) = self.root.take() else {
            return 0;
        };
        let removed = self.remove_node(root, hooks);
        self.pending.borrow_mut().clear();
        debug!(%root, removed, "tree unmounted");
        removed
    }

    /// Render `id` again.
    ///
    /// Hooks called in the same position replace their previous handlers in place; hooks no longer
    /// called are unsubscribed. Children are matched by position and component type: a match keeps
    /// the mounted child, anything else unmounts the old child and mounts the new one.
    ///
    /// A kept child keeps its existing component instance. The freshly returned [`Element`] for
    /// that position is dropped, so state passed through it does not reach the child; share state
    /// through an `Rc` or unmount and remount the child instead.
    pub fn rerender(&mut self, id: NodeId, hooks: &mut HookTarget<'_>) -> Result<(), TreeError> {
        if !self.is_alive(id) {
            return Err(TreeError::StaleNode { node: id });
        }
        let (children, registered) = self.render_node(id, hooks)?;

        let stale: Vec<(String, HookId)> = self
            .node(id)
            .hooks
            .iter()
            .filter(|(name, hook)| {
                matches!(hook.slot, HookSlot::Hook(_))
                    && !registered.iter().any(|(n, h)| n == name && h == hook)
            })
            .cloned()
            .collect();
        for (name, hook) in &stale {
            hooks.registry.unsubscribe(name, *hook);
        }
        let node = self.node_mut(id);
        node.hooks
            .retain(|(_, hook)| matches!(hook.slot, HookSlot::Method(_)));
        node.hooks.extend(registered);

        let old_children = self.node(id).children.clone();
        let mut kept = Vec::with_capacity(children.len());
        let new_len = children.len();
        for (i, element) in children.into_iter().enumerate() {
            match old_children.get(i) {
                Some(&old) if self.node(old).type_id == element.type_id => {
                    trace!(
                        node = %old,
                        name = element.name,
                        "kept mounted child, new element dropped"
                    );
                    kept.push(old);
                }
                Some(&old) => {
                    self.remove_node(old, hooks);
                    kept.push(self.mount_node(Some(id), element, hooks));
                }
                None => kept.push(self.mount_node(Some(id), element, hooks)),
            }
        }
        for &old in old_children.iter().skip(new_len) {
            self.remove_node(old, hooks);
        }
        self.node_mut(id).children = kept;
        trace!(node = %id, stale = stale.len(), "rerendered");
        Ok(())
    }

    /// Run every re-render scheduled through an [`Updater`](crate::Updater).
    ///
    /// Re-renders scheduled while flushing run in a later pass of the same call.
    /// Returns the number of re-renders performed.
    pub fn flush(&mut self, hooks: &mut HookTarget<'_>) -> usize {
        let mut count = 0;
        for _ in 0..MAX_FLUSH_PASSES {
            let batch = std::mem::take(&mut *self.pending.borrow_mut());
            if batch.is_empty() {
                return count;
            }
            let mut seen: Vec<NodeId> = Vec::with_capacity(batch.len());
            for id in batch {
                if seen.contains(&id) || !self.is_alive(id) {
                    continue;
                }
                seen.push(id);
                match self.rerender(id, hooks) {
                    Ok(()) => count += 1,
                    Err(error) => warn!(node = %id, %error, "scheduled rerender skipped"),
                }
            }
        }
        let left = self.pending.borrow().len();
        if left > 0 {
            warn!(left, "flush stopped with re-renders still scheduled");
        }
        count
    }

    /// The root component, if mounted.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Returns true if `id` refers to a mounted component.
    ///
    /// A `NodeId` is live if its slot exists and its generation matches the generation stored in
    /// that slot. See [`NodeId`] for the generational semantics.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .is_some_and(|n| n.generation == id.generation())
    }

    /// Number of mounted components.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// Returns true if nothing is mounted.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Parent of `id`, if live and not the root.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id)?.parent
    }

    /// Children of `id` in render order; empty if `id` is stale.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.node_opt(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Display name of the component at `id`.
    pub fn name_of(&self, id: NodeId) -> Option<&'static str> {
        self.node_opt(id).map(|n| n.name)
    }

    /// Subscribers `id` currently owns, with the host name each is registered under.
    pub fn hooks_of(&self, id: NodeId) -> &[(String, HookId)] {
        self.node_opt(id).map_or(&[], |n| n.hooks.as_slice())
    }

    /// Path from the root to `id` (inclusive); empty if `id` is stale.
    pub fn path_to_root(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cur = Some(id);
        while let Some(n) = cur {
            let Some(node) = self.node_opt(n) else {
                break;
            };
            out.push(n);
            cur = node.parent;
        }
        out.reverse();
        out
    }

    /// Mounted components of type `C`, in depth-first render order.
    pub fn find<C: Component>(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        if let Some(root) = self.root {
            self.collect_of_type(root, TypeId::of::<C>(), &mut out);
        }
        out
    }

    /// Run `f` on the component at `id` if it is live, of type `C`, and not borrowed elsewhere.
    pub fn with_component<C: Component, R>(
        &self,
        id: NodeId,
        f: impl FnOnce(&mut C) -> R,
    ) -> Option<R> {
        let node = self.node_opt(id)?;
        let mut guard = node.component.try_borrow_mut().ok()?;
        let any: &mut dyn Any = &mut *guard;
        any.downcast_mut::<C>().map(f)
    }

    // --- internals ---

    fn mount_node(
        &mut self,
        parent: Option<NodeId>,
        element: Element,
        hooks: &mut HookTarget<'_>,
    ) -> NodeId {
        let Element {
            component,
            type_id,
            name,
        } = element;
        let id = self.insert(parent, component.clone(), type_id, name);

        component.borrow_mut().will_mount();

        let methods = component.borrow().page_methods();
        let mut method_hooks = Vec::new();
        for (n, &event) in methods.iter().enumerate() {
            #[allow(
                clippy::cast_possible_truncation,
                reason = "A component declares a handful of methods."
            )]
            let hook = HookId {
                node: id,
                slot: HookSlot::Method(n as u32),
            };
            let handler = method_handler(Rc::downgrade(&component), event);
            for host_name in hooks.synonyms.expand(event) {
                hooks.registry.subscribe(host_name, hook, handler.clone());
                method_hooks.push((host_name.to_owned(), hook));
            }
        }
        self.node_mut(id).hooks = method_hooks;

        // A fresh component is never borrowed, so rendering cannot fail here.
        if let Ok((children, registered)) = self.render_node(id, hooks) {
            self.node_mut(id).hooks.extend(registered);
            for child in children {
                self.mount_node(Some(id), child, hooks);
            }
        }

        component.borrow_mut().did_mount();
        trace!(node = %id, name, "mounted");
        id
    }

    fn render_node(
        &self,
        id: NodeId,
        hooks: &mut HookTarget<'_>,
    ) -> Result<(Vec<Element>, Vec<(String, HookId)>), TreeError> {
        let node = self.node(id);
        let component = node.component.clone();
        let name = node.name;
        let mut guard = component
            .try_borrow_mut()
            .map_err(|_| TreeError::Busy { node: id, name })?;
        let mut cx = Scope::new(id, hooks, &self.pending);
        let children = guard.render(&mut cx);
        Ok((children, cx.registered))
    }

    fn remove_node(&mut self, id: NodeId, hooks: &mut HookTarget<'_>) -> usize {
        if !self.is_alive(id) {
            return 0;
        }
        let component = self.node(id).component.clone();
        match component.try_borrow_mut() {
            Ok(mut c) => c.will_unmount(),
            Err(_) => warn!(node = %id, "component busy during unmount; will_unmount skipped"),
        }
        let children = self.node(id).children.clone();
        let mut removed = 1;
        for child in children {
            removed += self.remove_node(child, hooks);
        }
        hooks.registry.unsubscribe_where(|h| h.node == id);
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
        trace!(node = %id, "unmounted");
        removed
    }

    fn insert(
        &mut self,
        parent: Option<NodeId>,
        component: ComponentCell,
        type_id: TypeId,
        name: &'static str,
    ) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(None);
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        let id = NodeId::new(idx, generation);
        self.nodes[id.idx()] = Some(Node {
            generation,
            parent: None,
            children: Vec::new(),
            component,
            type_id,
            name,
            hooks: Vec::new(),
        });
        if let Some(p) = parent {
            self.link_parent(id, p);
        }
        id
    }

    fn collect_of_type(&self, id: NodeId, type_id: TypeId, out: &mut Vec<NodeId>) {
        let node = self.node(id);
        if node.type_id == type_id {
            out.push(id);
        }
        for &child in &node.children {
            self.collect_of_type(child, type_id, out);
        }
    }

    fn node_opt(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.generation()).then_some(n)
    }

    /// Panics if `id` is stale; callers check liveness first.
    fn node(&self, id: NodeId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }

    fn link_parent(&mut self, id: NodeId, parent: NodeId) {
        self.node_mut(parent).children.push(id);
        self.node_mut(id).parent = Some(parent);
    }

    fn unlink_parent(&mut self, id: NodeId, parent: NodeId) {
        if let Some(p) = self.nodes[parent.idx()].as_mut() {
            p.children.retain(|c| *c != id);
        }
        self.node_mut(id).parent = None;
    }
}

/// Route a registry dispatch to [`Component::on_page_event`] on a live instance.
fn method_handler(component: Weak<RefCell<dyn Component>>, event: &'static str) -> Handler {
    Rc::new(move |payload: &Value| {
        let Some(component) = component.upgrade() else {
            return Ok(None);
        };
        let Ok(mut c) = component.try_borrow_mut() else {
            return Err(HandlerError::new(format!(
                "component is busy and cannot handle `{event}`"
            )));
        };
        c.on_page_event(event, payload)
    })
}
