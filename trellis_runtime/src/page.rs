// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pages: the host-facing object built from a [`PageConfig`].

use core::fmt;
use std::rc::Rc;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use trellis_registry::{DispatchError, EventRegistry, HandlerError, Synonyms, dispatch_listeners};
use trellis_tree::{Element, HookId, HookTarget, NodeId, Tree, TreeError};

use crate::config::{HostConfig, HostMethod};
use crate::ident::{PageId, PageIdAllocator};
use crate::lifecycle::{PageEvent, PagePhase, PhaseSet};
use crate::options::RuntimeOptions;
use crate::runtime::Runtime;

/// Props handed to a page's root factory on `onLoad`.
#[derive(Clone, Debug, PartialEq)]
pub struct PageProps {
    /// The route query passed to `onLoad`.
    pub query: Value,
    /// Identity of the page instance being loaded.
    pub page_id: PageId,
}

/// Builds the root element of a page.
pub type RootFactory = Rc<dyn Fn(&PageProps) -> Element>;

/// A page config as produced by [`Runtime::create_page_config`].
#[derive(Clone)]
pub struct PageConfig {
    path: String,
    root: RootFactory,
    host: HostConfig,
}

impl PageConfig {
    pub(crate) fn new(path: String, root: RootFactory, host: HostConfig) -> Self {
        Self { path, root, host }
    }

    /// Normalized page path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Methods the host may call on this page.
    pub fn host(&self) -> &HostConfig {
        &self.host
    }
}

impl fmt::Debug for PageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageConfig")
            .field("path", &self.path)
            .field("host", &self.host)
            .finish_non_exhaustive()
    }
}

/// Errors returned by [`Page::invoke`].
#[derive(Debug, Error)]
pub enum PageError {
    /// The page config has no such method.
    #[error("page `{path}` has no method `{method}`")]
    UnknownMethod {
        /// Page path.
        path: String,
        /// Requested method.
        method: String,
    },
    /// A lifecycle method arrived before `onLoad`.
    #[error("`{method}` called on page `{path}` before onLoad")]
    NotLoaded {
        /// Page path.
        path: String,
        /// Requested method.
        method: String,
    },
    /// `onLoad` arrived twice.
    #[error("page `{page}` is already loaded")]
    AlreadyLoaded {
        /// The loaded page.
        page: PageId,
    },
    /// A method arrived after `onUnload`.
    #[error("`{method}` called on unloaded page `{path}`")]
    Unloaded {
        /// Page path.
        path: String,
        /// Requested method.
        method: String,
    },
    /// One or more subscribers failed. Every subscriber still ran.
    #[error("dispatching `{event}` on page `{page}` failed")]
    Handlers {
        /// The page.
        page: PageId,
        /// The logical event.
        event: String,
        /// Collected failures.
        #[source]
        source: DispatchError<HookId>,
    },
    /// An adapter-provided method failed.
    #[error("method `{method}` of page `{path}` failed")]
    Custom {
        /// Page path.
        path: String,
        /// The method.
        method: String,
        /// The method's error.
        #[source]
        source: HandlerError,
    },
    /// The component tree rejected an operation.
    #[error(transparent)]
    Tree(#[from] TreeError),
}

struct PageInstance {
    id: PageId,
    tree: Tree,
    registry: EventRegistry<HookId>,
    query: Value,
}

/// A page as the host sees it.
///
/// Every host call goes through [`invoke`](Self::invoke). The page mounts its component tree on
/// `onLoad`, routes every other lifecycle call into the tree's registry, and tears everything
/// down on `onUnload`. After that the page rejects every call.
pub struct Page {
    config: PageConfig,
    options: Arc<RuntimeOptions>,
    synonyms: Arc<Synonyms>,
    ids: PageIdAllocator,
    phase: PagePhase,
    ready: bool,
    last_id: Option<PageId>,
    instance: Option<PageInstance>,
}

impl Page {
    /// Create the host object for `config`. Nothing mounts until `onLoad`.
    pub fn new(config: PageConfig, runtime: &Runtime) -> Self {
        Self {
            config,
            options: runtime.shared_options(),
            synonyms: runtime.shared_synonyms(),
            ids: runtime.ids().clone(),
            phase: PagePhase::Unmounted,
            ready: false,
            last_id: None,
            instance: None,
        }
    }

    /// Call the host method `method` with `payload`.
    ///
    /// Returns the subscribers' results folded by the configured merge policy.
    pub fn invoke(&mut self, method: &str, payload: Value) -> Result<Option<Value>, PageError> {
        if self.phase == PagePhase::Unloaded {
            error!(path = %self.config.path, method, "host call on an unloaded page");
            return Err(PageError::Unloaded {
                path: self.config.path.clone(),
                method: method.to_owned(),
            });
        }
        let Some(target) = self.config.host.method(method).cloned() else {
            return Err(PageError::UnknownMethod {
                path: self.config.path.clone(),
                method: method.to_owned(),
            });
        };
        match target {
            HostMethod::Custom(f) => f(&payload).map_err(|source| PageError::Custom {
                path: self.config.path.clone(),
                method: method.to_owned(),
                source,
            }),
            HostMethod::Dispatch(event) => self.dispatch(method, &event, payload),
        }
    }

    fn dispatch(
        &mut self,
        method: &str,
        event: &str,
        payload: Value,
    ) -> Result<Option<Value>, PageError> {
        let lifecycle = PageEvent::from_event_name(event);
        let allowed = lifecycle.map_or(PhaseSet::LIVE, PageEvent::allowed);
        if !allowed.contains(self.phase.flag()) {
            return Err(match &self.instance {
                Some(instance) => PageError::AlreadyLoaded {
                    page: instance.id.clone(),
                },
                None => {
                    warn!(path = %self.config.path, method, "host call before onLoad");
                    PageError::NotLoaded {
                        path: self.config.path.clone(),
                        method: method.to_owned(),
                    }
                }
            });
        }
        match lifecycle {
            Some(PageEvent::Load) => self.load(payload),
            Some(PageEvent::Unload) => self.unload(payload),
            Some(other) => {
                self.transition(other);
                self.run(event, &payload)
            }
            None => self.run(event, &payload),
        }
    }

    fn load(&mut self, query: Value) -> Result<Option<Value>, PageError> {
        let id = self.ids.allocate(&self.config.path);
        let props = PageProps {
            query: query.clone(),
            page_id: id.clone(),
        };
        let element = (self.config.root)(&props);

        let mut registry = EventRegistry::new();
        let mut tree = Tree::new();
        let mounted = {
            let mut hooks = HookTarget::new(&mut registry, &self.synonyms);
            tree.mount(element, &mut hooks)
        };
        if let Err(err) = mounted {
            self.ids.release(&id);
            return Err(err.into());
        }
        info!(page = %id, nodes = tree.len(), hooks = registry.len(), "page loaded");

        self.instance = Some(PageInstance {
            id,
            tree,
            registry,
            query: query.clone(),
        });
        self.phase = PagePhase::Loaded;
        self.run(PageEvent::Load.event_name(), &query)
    }

    fn unload(&mut self, payload: Value) -> Result<Option<Value>, PageError> {
        if self.instance.is_none() {
            warn!(path = %self.config.path, "onUnload before onLoad");
            self.phase = PagePhase::Unloaded;
            return Ok(None);
        }
        let result = self.run(PageEvent::Unload.event_name(), &payload);
        if let Some(mut instance) = self.instance.take() {
            let removed = {
                let mut hooks = HookTarget::new(&mut instance.registry, &self.synonyms);
                instance.tree.unmount(&mut hooks)
            };
            instance.registry.clear();
            self.ids.release(&instance.id);
            info!(page = %instance.id, removed, "page unloaded");
            self.last_id = Some(instance.id);
        }
        self.phase = PagePhase::Unloaded;
        result
    }

    fn transition(&mut self, event: PageEvent) {
        if event == PageEvent::Ready {
            self.ready = true;
        }
        let next = event.next_phase(self.phase);
        if next != self.phase {
            debug!(path = %self.config.path, from = ?self.phase, to = ?next, "page phase");
            self.phase = next;
        }
    }

    /// Dispatch `event` under each of its host names, flush re-renders, merge the results.
    fn run(&mut self, event: &str, payload: &Value) -> Result<Option<Value>, PageError> {
        let synonyms = &*self.synonyms;
        let Some(instance) = self.instance.as_mut() else {
            return Ok(None);
        };

        let outcomes: Vec<_> = host_names(synonyms, event)
            .into_iter()
            .map(|name| {
                let listeners = instance.registry.listeners(name);
                dispatch_listeners(name, &listeners, payload)
            })
            .collect();
        let outcome = DispatchError::collect(event, outcomes);

        let rerendered = {
            let mut hooks = HookTarget::new(&mut instance.registry, synonyms);
            instance.tree.flush(&mut hooks)
        };
        debug!(page = %instance.id, event, rerendered, "page dispatch done");

        match outcome {
            Ok(results) => Ok(self.options.merge_for(event).merge(results)),
            Err(source) => Err(PageError::Handlers {
                page: instance.id.clone(),
                event: event.to_owned(),
                source,
            }),
        }
    }

    /// Re-render `node` now, outside of any dispatch.
    pub fn force_update(&mut self, node: NodeId) -> Result<(), PageError> {
        let Some(instance) = self.instance.as_mut() else {
            return Err(PageError::NotLoaded {
                path: self.config.path.clone(),
                method: "force_update".to_owned(),
            });
        };
        let mut hooks = HookTarget::new(&mut instance.registry, &self.synonyms);
        instance.tree.rerender(node, &mut hooks)?;
        instance.tree.flush(&mut hooks);
        Ok(())
    }

    /// The config this page was built from.
    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> PagePhase {
        self.phase
    }

    /// Returns true once the host reported `onReady`.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Identity of the current instance, or of the last one after unload.
    pub fn id(&self) -> Option<&PageId> {
        self.instance
            .as_ref()
            .map(|i| &i.id)
            .or(self.last_id.as_ref())
    }

    /// The mounted root component.
    pub fn root(&self) -> Option<NodeId> {
        self.instance.as_ref().and_then(|i| i.tree.root())
    }

    /// The query `onLoad` was called with.
    pub fn query(&self) -> Option<&Value> {
        self.instance.as_ref().map(|i| &i.query)
    }

    /// The mounted component tree.
    pub fn tree(&self) -> Option<&Tree> {
        self.instance.as_ref().map(|i| &i.tree)
    }

    /// The page's event registry.
    pub fn registry(&self) -> Option<&EventRegistry<HookId>> {
        self.instance.as_ref().map(|i| &i.registry)
    }
}

/// Registry names a page event is dispatched under.
///
/// The synonyms of `event` come first. A lifecycle event whose host method differs from its
/// registry name (`unload` and `onUnload`) is also dispatched under the host method's synonyms.
fn host_names<'a>(synonyms: &'a Synonyms, event: &'a str) -> Vec<&'a str> {
    let mut names = synonyms.expand(event);
    let host = PageEvent::from_event_name(event).map(PageEvent::host_method);
    if let Some(host) = host.filter(|&host| host != event) {
        for name in synonyms.expand(host) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    names
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("path", &self.config.path)
            .field("phase", &self.phase)
            .field("ready", &self.ready)
            .field("id", &self.id())
            .finish_non_exhaustive()
    }
}

impl Drop for Page {
    fn drop(&mut self) {
        if let Some(instance) = self.instance.take() {
            self.ids.release(&instance.id);
            debug!(page = %instance.id, "page dropped without onUnload");
        }
    }
}
