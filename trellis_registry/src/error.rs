// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Handler failures and batched dispatch errors.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// Error returned by a handler.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("{message}")]
pub struct HandlerError {
    message: String,
}

impl HandlerError {
    /// Create an error carrying `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for HandlerError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for HandlerError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// A handler failure tagged with the subscriber that produced it.
#[derive(Clone, Debug, PartialEq)]
pub struct Failure<S> {
    /// Subscriber whose handler failed.
    pub subscriber: S,
    /// The handler's error.
    pub error: HandlerError,
}

/// One or more handlers failed while dispatching an event.
///
/// Every handler still ran; `results` holds the values returned by the
/// handlers that succeeded, in dispatch order.
#[derive(Clone, Debug, PartialEq, Error)]
#[error("{} of the handlers for `{event}` failed", .failures.len())]
pub struct DispatchError<S: fmt::Debug> {
    /// Event that was dispatched.
    pub event: String,
    /// Failures in dispatch order.
    pub failures: Vec<Failure<S>>,
    /// Results of the handlers that succeeded, in dispatch order.
    pub results: Vec<Option<Value>>,
}

impl<S: fmt::Debug> DispatchError<S> {
    /// Fold another batch of failures for a synonym of the same logical event into this one.
    pub fn absorb(&mut self, other: Self) {
        self.failures.extend(other.failures);
        self.results.extend(other.results);
    }

    /// Combine the per-name outcomes of one logical event, in dispatch order.
    ///
    /// Results of names that dispatched cleanly are kept alongside the partial results of
    /// failing names, so a returned error still carries every successful result.
    pub fn collect<I>(event: &str, outcomes: I) -> Result<Vec<Option<Value>>, Self>
    where
        I: IntoIterator<Item = Result<Vec<Option<Value>>, Self>>,
    {
        let mut results = Vec::new();
        let mut failures = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(out) => results.extend(out),
                Err(err) => {
                    failures.extend(err.failures);
                    results.extend(err.results);
                }
            }
        }
        if failures.is_empty() {
            Ok(results)
        } else {
            Err(Self {
                event: event.to_owned(),
                failures,
                results,
            })
        }
    }
}
