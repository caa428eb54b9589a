// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Components and elements.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde_json::Value;
use trellis_registry::HandlerResult;

use crate::scope::Scope;

/// A node of the component tree.
///
/// Two authoring styles are supported and observe identical dispatch ordering:
///
/// - Hook style: call [`Scope::use_page_event`] from [`render`](Self::render).
/// - Method style: list event names in [`page_methods`](Self::page_methods) and handle them in
///   [`on_page_event`](Self::on_page_event). These are registered once when the component mounts.
///
/// The mount-time and unmount-time callbacks bracket everything else: [`will_mount`](Self::will_mount)
/// runs before the first render, [`did_mount`](Self::did_mount) after every child mounted, and
/// [`will_unmount`](Self::will_unmount) before any child unmounts.
pub trait Component: Any {
    /// Produce this component's children and register its hooks.
    fn render(&mut self, cx: &mut Scope<'_>) -> Vec<Element>;

    /// Called once before the first render.
    fn will_mount(&mut self) {}

    /// Called once after this component and all of its children mounted.
    fn did_mount(&mut self) {}

    /// Called once before this component and its children unmount.
    fn will_unmount(&mut self) {}

    /// Page events handled by [`on_page_event`](Self::on_page_event).
    fn page_methods(&self) -> &'static [&'static str] {
        &[]
    }

    /// Handle a page event listed in [`page_methods`](Self::page_methods).
    fn on_page_event(&mut self, event: &str, payload: &Value) -> HandlerResult {
        let _ = (event, payload);
        Ok(None)
    }

    /// Display name used in logs and debug output.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Shared handle to a component instance.
pub(crate) type ComponentCell = Rc<RefCell<dyn Component>>;

/// An unmounted component, as returned from [`Component::render`].
pub struct Element {
    pub(crate) component: ComponentCell,
    pub(crate) type_id: TypeId,
    pub(crate) name: &'static str,
}

impl Element {
    /// Wrap a component instance.
    pub fn new<C: Component>(component: C) -> Self {
        let name = component.name();
        Self {
            component: Rc::new(RefCell::new(component)),
            type_id: TypeId::of::<C>(),
            name,
        }
    }

    /// A childless host node such as `view`.
    pub fn host(tag: &'static str) -> Self {
        Self::new(Host { tag, text: None })
    }

    /// A host node carrying text content.
    pub fn text(tag: &'static str, text: impl Into<String>) -> Self {
        Self::new(Host {
            tag,
            text: Some(text.into()),
        })
    }

    /// Display name of the wrapped component.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl<C: Component> From<C> for Element {
    fn from(component: C) -> Self {
        Self::new(component)
    }
}

/// A leaf node rendered natively by the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Host {
    /// Host tag, e.g. `view` or `text`.
    pub tag: &'static str,
    /// Optional text content.
    pub text: Option<String>,
}

impl Component for Host {
    fn render(&mut self, _cx: &mut Scope<'_>) -> Vec<Element> {
        Vec::new()
    }

    fn name(&self) -> &'static str {
        self.tag
    }
}
