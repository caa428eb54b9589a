// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The app object and the per-thread global app.

use core::fmt;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, trace, warn};
use trellis_registry::{
    DispatchError, EventRegistry, Handler, HandlerError, HandlerResult, Synonyms,
    dispatch_listeners,
};

use crate::config::{HostConfig, HostMethod};
use crate::options::RuntimeOptions;
use crate::runtime::Runtime;

/// The app config as produced by [`Runtime::create_app_config`].
#[derive(Clone, Debug)]
pub struct AppConfig {
    host: HostConfig,
}

impl AppConfig {
    pub(crate) fn new(host: HostConfig) -> Self {
        Self { host }
    }

    /// Methods the host may call on the app.
    pub fn host(&self) -> &HostConfig {
        &self.host
    }
}

/// Subscriber id handed out by [`App::subscribe`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct AppSubscriber(u64);

/// Errors returned by [`App::invoke`].
#[derive(Debug, Error)]
pub enum AppError {
    /// The app config has no such method.
    #[error("app has no method `{method}`")]
    UnknownMethod {
        /// Requested method.
        method: String,
    },
    /// One or more subscribers failed. Every subscriber still ran.
    #[error("dispatching app event `{event}` failed")]
    Handlers {
        /// The logical event.
        event: String,
        /// Collected failures.
        #[source]
        source: DispatchError<AppSubscriber>,
    },
    /// An adapter-provided method failed.
    #[error("app method `{method}` failed")]
    Custom {
        /// The method.
        method: String,
        /// The method's error.
        #[source]
        source: HandlerError,
    },
}

/// The app as the host sees it.
///
/// Unlike pages there is no component tree: code subscribes to app events directly.
/// Subscriptions may be added and removed from inside handlers.
pub struct App {
    config: AppConfig,
    options: Arc<RuntimeOptions>,
    synonyms: Arc<Synonyms>,
    registry: RefCell<EventRegistry<AppSubscriber>>,
    next: Cell<u64>,
}

impl App {
    /// Create the app object for `config`.
    pub fn new(config: AppConfig, runtime: &Runtime) -> Self {
        Self {
            config,
            options: runtime.shared_options(),
            synonyms: runtime.shared_synonyms(),
            registry: RefCell::new(EventRegistry::new()),
            next: Cell::new(0),
        }
    }

    /// The config this app was built from.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Subscribe `f` to the app event `event` under each of its synonym names.
    pub fn subscribe<F>(&self, event: &str, f: F) -> AppSubscriber
    where
        F: Fn(&Value) -> HandlerResult + 'static,
    {
        let id = AppSubscriber(self.next.get());
        self.next.set(id.0 + 1);
        let handler: Handler = Rc::new(f);
        let mut registry = self.registry.borrow_mut();
        for name in self.synonyms.expand(event) {
            registry.subscribe(name, id, handler.clone());
        }
        trace!(event, subscriber = id.0, "app subscribe");
        id
    }

    /// Remove `id` from `event` and its synonym names. Returns false if it was not subscribed.
    pub fn unsubscribe(&self, event: &str, id: AppSubscriber) -> bool {
        let mut registry = self.registry.borrow_mut();
        let mut removed = false;
        for name in self.synonyms.expand(event) {
            removed |= registry.unsubscribe(name, id);
        }
        removed
    }

    /// Number of subscribers under the host name `name`.
    pub fn subscriber_count(&self, name: &str) -> usize {
        self.registry.borrow().subscriber_count(name)
    }

    /// Call the host method `method` with `payload`.
    pub fn invoke(&self, method: &str, payload: Value) -> Result<Option<Value>, AppError> {
        let Some(target) = self.config.host.method(method).cloned() else {
            return Err(AppError::UnknownMethod {
                method: method.to_owned(),
            });
        };
        let event = match target {
            HostMethod::Custom(f) => {
                return f(&payload).map_err(|source| AppError::Custom {
                    method: method.to_owned(),
                    source,
                });
            }
            HostMethod::Dispatch(event) => event,
        };

        let outcome = DispatchError::collect(
            &event,
            self.synonyms.expand(&event).into_iter().map(|name| {
                // Snapshot so handlers may subscribe or unsubscribe.
                let listeners = self.registry.borrow().listeners(name);
                dispatch_listeners(name, &listeners, &payload)
            }),
        );
        debug!(event = %event, method, "app dispatch done");
        match outcome {
            Ok(results) => Ok(self.options.merge_for(&event).merge(results)),
            Err(source) => Err(AppError::Handlers { event, source }),
        }
    }
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

thread_local! {
    static GLOBAL_APP: RefCell<Option<Rc<App>>> = const { RefCell::new(None) };
}

/// Make `app` this thread's global app, returning the previous one.
pub fn set_global_app(app: Rc<App>) -> Option<Rc<App>> {
    let previous = GLOBAL_APP.with(|slot| slot.borrow_mut().replace(app));
    if previous.is_some() {
        warn!("global app replaced");
    }
    previous
}

/// This thread's global app.
pub fn global_app() -> Option<Rc<App>> {
    GLOBAL_APP.with(|slot| slot.borrow().clone())
}

/// Remove this thread's global app.
pub fn clear_global_app() -> Option<Rc<App>> {
    GLOBAL_APP.with(|slot| slot.borrow_mut().take())
}
