// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Folding subscriber results into the single value returned to the host.

use serde::Deserialize;
use serde_json::{Map, Value};

/// How the results of one dispatch become the host's return value.
///
/// A result is empty when the handler returned nothing or `null`.
/// An empty object `{}` is not empty: it is a deliberate answer.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResultMerge {
    /// The first non-empty result in dispatch order.
    #[default]
    FirstNonEmpty,
    /// The last non-empty result in dispatch order.
    Last,
    /// Shallow-merge every object result, later keys winning.
    ///
    /// Falls back to [`FirstNonEmpty`](Self::FirstNonEmpty) when no result is an object.
    MergeObjects,
}

impl ResultMerge {
    /// Fold `results` according to this policy.
    pub fn merge(self, results: Vec<Option<Value>>) -> Option<Value> {
        let mut non_empty = results.into_iter().flatten().filter(|v| !v.is_null());
        match self {
            Self::FirstNonEmpty => non_empty.next(),
            Self::Last => non_empty.last(),
            Self::MergeObjects => {
                let mut merged: Option<Map<String, Value>> = None;
                let mut first = None;
                for value in non_empty {
                    match value {
                        Value::Object(map) => merged.get_or_insert_with(Map::new).extend(map),
                        other => {
                            first.get_or_insert(other);
                        }
                    }
                }
                merged.map(Value::Object).or(first)
            }
        }
    }
}
