// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Synonym groups: one logical event reported under several host names.
//!
//! ## Usage
//!
//! Platform adapters declare, per logical event, the host names that report it.
//! Declaring the same event twice (for example once per adapter) appends the new names to the
//! existing group, so the group's order is the adapters' registration order.
//!
//! ```
//! use trellis_registry::{SynonymGroup, Synonyms};
//!
//! let mut synonyms = Synonyms::new();
//! synonyms.declare(SynonymGroup::new("onTabItemTap", ["onTabItemTap"]));
//! synonyms.declare(SynonymGroup::new("onTabItemTap", ["events.onTabItemTap"]));
//!
//! assert_eq!(synonyms.expand("onTabItemTap"), ["onTabItemTap", "events.onTabItemTap"]);
//! // A member name resolves to its whole group.
//! assert_eq!(synonyms.expand("events.onTabItemTap").len(), 2);
//! // Undeclared events expand to themselves.
//! assert_eq!(synonyms.expand("onShow"), ["onShow"]);
//! ```

use std::collections::HashMap;

use tracing::warn;

/// Host names that report one logical event.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SynonymGroup {
    event: String,
    names: Vec<String>,
}

impl SynonymGroup {
    /// Create a group for `event` reported under `names`.
    ///
    /// Repeated names are dropped. An empty `names` list is treated as `[event]`.
    pub fn new<I, N>(event: impl Into<String>, names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        let event = event.into();
        let mut group = Self {
            event,
            names: Vec::new(),
        };
        for name in names {
            group.push_name(name.into());
        }
        if group.names.is_empty() {
            group.names.push(group.event.clone());
        }
        group
    }

    /// The logical event name.
    pub fn event(&self) -> &str {
        &self.event
    }

    /// Host names in declaration order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    fn push_name(&mut self, name: String) -> bool {
        if self.names.contains(&name) {
            warn!(event = %self.event, name = %name, "duplicate synonym ignored");
            return false;
        }
        self.names.push(name);
        true
    }
}

/// Collection of [`SynonymGroup`]s, indexed by event and by member name.
#[derive(Clone, Debug, Default)]
pub struct Synonyms {
    groups: Vec<SynonymGroup>,
    by_event: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
}

impl Synonyms {
    /// Create an empty set; every event expands to itself.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a group, merging into an existing group for the same event.
    ///
    /// A name already claimed by a different event is skipped with a warning.
    pub fn declare(&mut self, group: SynonymGroup) -> &mut Self {
        let idx = match self.by_event.get(&group.event) {
            Some(&idx) => idx,
            None => {
                self.groups.push(SynonymGroup {
                    event: group.event.clone(),
                    names: Vec::new(),
                });
                let idx = self.groups.len() - 1;
                self.by_event.insert(group.event.clone(), idx);
                idx
            }
        };
        for name in group.names {
            if let Some(&owner) = self.by_name.get(&name)
                && owner != idx
            {
                warn!(
                    event = %group.event,
                    name = %name,
                    claimed_by = %self.groups[owner].event,
                    "synonym already claimed by another event"
                );
                continue;
            }
            if self.groups[idx].push_name(name.clone()) {
                self.by_name.insert(name, idx);
            }
        }
        self
    }

    /// Builder-style [`declare`](Self::declare).
    pub fn with(mut self, group: SynonymGroup) -> Self {
        self.declare(group);
        self
    }

    /// The group `event` belongs to, by logical event or by member name.
    pub fn group(&self, event: &str) -> Option<&SynonymGroup> {
        let idx = self
            .by_event
            .get(event)
            .or_else(|| self.by_name.get(event))?;
        self.groups.get(*idx)
    }

    /// Host names for `event` in declaration order, or `[event]` when no group is declared.
    pub fn expand<'a>(&'a self, event: &'a str) -> Vec<&'a str> {
        match self.group(event) {
            Some(group) => group.names.iter().map(String::as_str).collect(),
            None => vec![event],
        }
    }

    /// The logical event a host name reports, or the name itself when undeclared.
    pub fn canonical<'a>(&'a self, name: &'a str) -> &'a str {
        self.group(name).map_or(name, SynonymGroup::event)
    }

    /// Iterate the declared groups in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &SynonymGroup> + '_ {
        self.groups.iter()
    }

    /// Returns true if no group is declared.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl FromIterator<SynonymGroup> for Synonyms {
    fn from_iter<T: IntoIterator<Item = SynonymGroup>>(iter: T) -> Self {
        let mut out = Self::new();
        for group in iter {
            out.declare(group);
        }
        out
    }
}
