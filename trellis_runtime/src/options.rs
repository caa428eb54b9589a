// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Runtime options: declared events, synonym groups and result merging.

use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;
use trellis_registry::{SynonymGroup, Synonyms};

use crate::ident::normalize_path;
use crate::merge::ResultMerge;

/// Errors raised while loading [`RuntimeOptions`].
#[derive(Debug, Error)]
pub enum OptionsError {
    /// The JSON did not parse or did not match the expected shape.
    #[error("invalid runtime options: {0}")]
    Json(#[from] serde_json::Error),
    /// An event appears twice in one list.
    #[error("event `{event}` is declared twice in {list}")]
    DuplicateEvent {
        /// Which list, e.g. `appEvents` or `pageEvents[pages/index]`.
        list: String,
        /// The repeated event.
        event: String,
    },
    /// A synonym group lists no names.
    #[error("synonym group for `{event}` is empty")]
    EmptySynonymGroup {
        /// The logical event.
        event: String,
    },
}

/// Configuration of a [`Runtime`](crate::Runtime).
///
/// Loads from JSON with camel-cased keys:
///
/// ```
/// use trellis_runtime::{ResultMerge, RuntimeOptions};
///
/// let options = RuntimeOptions::from_json(r#"{
///     "appEvents": ["onLaunch", "onShow", "onHide"],
///     "pageEvents": { "pages/index": ["onShow", "onShareAppMessage"] },
///     "synonyms": { "onResize": ["onResize", "events.onResize"] },
///     "merge": "first-non-empty",
///     "mergeOverrides": { "onShareAppMessage": "merge-objects" }
/// }"#).unwrap();
///
/// assert_eq!(options.app_events.len(), 3);
/// assert_eq!(options.merge_for("onShareAppMessage"), ResultMerge::MergeObjects);
/// assert_eq!(options.merge_for("onShow"), ResultMerge::FirstNonEmpty);
/// ```
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RuntimeOptions {
    /// App events that get a host method on the app config.
    pub app_events: Vec<String>,
    /// Page path to the page events its config exposes.
    ///
    /// Paths are normalized on lookup. A path not listed here exposes every known page event.
    pub page_events: IndexMap<String, Vec<String>>,
    /// Logical event to the host names it is dispatched under.
    pub synonyms: IndexMap<String, Vec<String>>,
    /// Default result merge policy.
    pub merge: ResultMerge,
    /// Per-event merge policies.
    pub merge_overrides: IndexMap<String, ResultMerge>,
}

impl RuntimeOptions {
    /// Empty options: no app events, every page event on every page, no synonyms.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate options from JSON.
    pub fn from_json(json: &str) -> Result<Self, OptionsError> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Check the lists for duplicates and the synonym groups for emptiness.
    pub fn validate(&self) -> Result<(), OptionsError> {
        check_unique("appEvents", &self.app_events)?;
        for (path, events) in &self.page_events {
            check_unique(&format!("pageEvents[{path}]"), events)?;
        }
        for (event, names) in &self.synonyms {
            if names.is_empty() {
                return Err(OptionsError::EmptySynonymGroup {
                    event: event.clone(),
                });
            }
        }
        Ok(())
    }

    /// Declare the app events.
    pub fn with_app_events<I, E>(mut self, events: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<String>,
    {
        self.app_events = events.into_iter().map(Into::into).collect();
        self
    }

    /// Declare the page events of `path`.
    pub fn with_page_events<I, E>(mut self, path: &str, events: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<String>,
    {
        self.page_events.insert(
            normalize_path(path),
            events.into_iter().map(Into::into).collect(),
        );
        self
    }

    /// Declare the host names of `event`.
    pub fn with_synonyms<I, N>(mut self, event: &str, names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        self.synonyms.insert(
            event.to_owned(),
            names.into_iter().map(Into::into).collect(),
        );
        self
    }

    /// Set the default merge policy.
    pub fn with_merge(mut self, merge: ResultMerge) -> Self {
        self.merge = merge;
        self
    }

    /// Set the merge policy of one event.
    pub fn with_merge_override(mut self, event: &str, merge: ResultMerge) -> Self {
        self.merge_overrides.insert(event.to_owned(), merge);
        self
    }

    /// Merge policy for `event`.
    pub fn merge_for(&self, event: &str) -> ResultMerge {
        self.merge_overrides
            .get(event)
            .copied()
            .unwrap_or(self.merge)
    }

    /// Events declared for `path`, or `None` if the path is not listed.
    pub fn page_events_for(&self, path: &str) -> Option<&[String]> {
        let path = normalize_path(path);
        self.page_events
            .iter()
            .find(|(p, _)| normalize_path(p) == path)
            .map(|(_, events)| events.as_slice())
    }

    /// The synonym groups as declared here.
    pub fn synonym_groups(&self) -> Synonyms {
        self.synonyms
            .iter()
            .map(|(event, names)| SynonymGroup::new(event.clone(), names.iter().cloned()))
            .collect()
    }
}

fn check_unique(list: &str, events: &[String]) -> Result<(), OptionsError> {
    for (i, event) in events.iter().enumerate() {
        if events[..i].contains(event) {
            return Err(OptionsError::DuplicateEvent {
                list: list.to_owned(),
                event: event.clone(),
            });
        }
    }
    Ok(())
}
