// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host-shaped configuration objects.

use core::fmt;

use indexmap::IndexMap;
use serde_json::{Map, Value};
use trellis_registry::Handler;

/// Which pipeline a [`HostConfig`] belongs to.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ConfigKind {
    /// A page config.
    Page,
    /// The app config.
    App,
}

impl fmt::Display for ConfigKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Page => "page",
            Self::App => "app",
        })
    }
}

/// What a host method does when the host calls it.
#[derive(Clone)]
pub enum HostMethod {
    /// Dispatch the named logical event through the registry.
    Dispatch(String),
    /// Run an adapter-provided function instead of a dispatch.
    Custom(Handler),
}

impl HostMethod {
    /// A method dispatching `event`.
    pub fn dispatch(event: impl Into<String>) -> Self {
        Self::Dispatch(event.into())
    }

    /// The logical event this method dispatches, if it dispatches one.
    pub fn event(&self) -> Option<&str> {
        match self {
            Self::Dispatch(event) => Some(event),
            Self::Custom(_) => None,
        }
    }
}

impl fmt::Debug for HostMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dispatch(event) => f.debug_tuple("Dispatch").field(event).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// A host config: named methods the host may call, plus static data.
///
/// Method order is preserved; it is the order the host sees them in.
#[derive(Clone, Debug)]
pub struct HostConfig {
    kind: ConfigKind,
    methods: IndexMap<String, HostMethod>,
    data: Map<String, Value>,
}

impl HostConfig {
    /// An empty config of `kind`.
    pub fn new(kind: ConfigKind) -> Self {
        Self {
            kind,
            methods: IndexMap::new(),
            data: Map::new(),
        }
    }

    /// Which pipeline this config belongs to.
    pub fn kind(&self) -> ConfigKind {
        self.kind
    }

    /// Add or replace a method. Returns the previous method under `name`.
    ///
    /// A replaced method keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, method: HostMethod) -> Option<HostMethod> {
        self.methods.insert(name.into(), method)
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_method(mut self, name: impl Into<String>, method: HostMethod) -> Self {
        self.insert(name, method);
        self
    }

    /// Remove a method, keeping the order of the others.
    pub fn remove(&mut self, name: &str) -> Option<HostMethod> {
        self.methods.shift_remove(name)
    }

    /// Move the method under `from` to the key `to`, in place.
    ///
    /// Any method already under `to` is dropped. Returns false if `from` does not exist.
    pub fn rename(&mut self, from: &str, to: impl Into<String>) -> bool {
        let Some((mut index, _, method)) = self.methods.shift_remove_full(from) else {
            return false;
        };
        let to = to.into();
        if let Some((at, _, _)) = self.methods.shift_remove_full(&to) {
            if at < index {
                index -= 1;
            }
        }
        self.methods.shift_insert(index, to, method);
        true
    }

    /// Expose the method under `existing` under `alias` as well.
    ///
    /// Returns false if `existing` does not exist.
    pub fn alias(&mut self, existing: &str, alias: impl Into<String>) -> bool {
        let Some(method) = self.methods.get(existing).cloned() else {
            return false;
        };
        self.methods.insert(alias.into(), method);
        true
    }

    /// The method under `name`.
    pub fn method(&self, name: &str) -> Option<&HostMethod> {
        self.methods.get(name)
    }

    /// Returns true if the host may call `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// Methods in host order.
    pub fn methods(&self) -> impl Iterator<Item = (&str, &HostMethod)> + '_ {
        self.methods.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Method names in host order.
    pub fn method_names(&self) -> Vec<&str> {
        self.methods.keys().map(String::as_str).collect()
    }

    /// Number of methods.
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Returns true if there are no methods.
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Static data handed to the host with the config.
    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Mutable access to the static data.
    pub fn data_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.data
    }
}
