// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The shared runtime: options, synonym groups, plugin pipelines and the page id allocator.

use std::rc::Rc;
use std::sync::{Arc, OnceLock};

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};
use trellis_registry::{SynonymGroup, Synonyms};
use trellis_tree::Element;

use crate::app::AppConfig;
use crate::config::{ConfigKind, HostConfig, HostMethod};
use crate::ident::{PageIdAllocator, normalize_path};
use crate::lifecycle::PageEvent;
use crate::options::RuntimeOptions;
use crate::page::{PageConfig, PageProps};
use crate::plugin::{PlatformAdapter, PluginDriver, PluginDriverBuilder};

/// Errors from installing the process-wide runtime.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum RuntimeError {
    /// [`Runtime::install`] was called twice.
    #[error("a runtime is already installed")]
    AlreadyInstalled,
}

static INSTALLED: OnceLock<Runtime> = OnceLock::new();

/// Everything page and app builders share.
///
/// Cheap to clone and safe to share between threads. Pages and apps built from it are not.
#[derive(Clone, Debug)]
pub struct Runtime {
    options: Arc<RuntimeOptions>,
    synonyms: Arc<Synonyms>,
    plugins: Arc<PluginDriver>,
    ids: PageIdAllocator,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Runtime {
    /// A runtime with `options`, no plugins and a fresh allocator.
    pub fn new(options: RuntimeOptions) -> Self {
        Self::builder().options(options).build()
    }

    /// Start building a runtime.
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::default()
    }

    /// Make this the process-wide runtime.
    pub fn install(self) -> Result<&'static Self, RuntimeError> {
        let mut fresh = false;
        let installed = INSTALLED.get_or_init(|| {
            fresh = true;
            self
        });
        if fresh {
            info!("runtime installed");
            Ok(installed)
        } else {
            Err(RuntimeError::AlreadyInstalled)
        }
    }

    /// The process-wide runtime, if one was installed.
    pub fn get() -> Option<&'static Self> {
        INSTALLED.get()
    }

    /// The options this runtime was built with.
    pub fn options(&self) -> &RuntimeOptions {
        &self.options
    }

    /// Synonym groups from the options and every registered adapter.
    pub fn synonyms(&self) -> &Synonyms {
        &self.synonyms
    }

    /// The plugin pipelines.
    pub fn plugins(&self) -> &PluginDriver {
        &self.plugins
    }

    /// The page id allocator.
    pub fn ids(&self) -> &PageIdAllocator {
        &self.ids
    }

    pub(crate) fn shared_options(&self) -> Arc<RuntimeOptions> {
        self.options.clone()
    }

    pub(crate) fn shared_synonyms(&self) -> Arc<Synonyms> {
        self.synonyms.clone()
    }

    /// Build the config of the page at `path`, rendered by `root`.
    ///
    /// `onLoad` and `onUnload` are always exposed. Other page events are exposed when the options
    /// declare them for `path`, or all of them when `path` is not listed. Each exposed event is
    /// also exposed under its synonym names. The result then runs through the page pipeline.
    pub fn create_page_config<F>(&self, path: &str, root: F) -> PageConfig
    where
        F: Fn(&PageProps) -> Element + 'static,
    {
        let path = normalize_path(path);
        let declared = self.options.page_events_for(&path);

        let mut host = HostConfig::new(ConfigKind::Page);
        host.data_mut()
            .insert("path".to_owned(), Value::from(path.as_str()));
        for event in PageEvent::ALL {
            let listed = declared
                .is_none_or(|names| names.iter().any(|n| PageEvent::lookup(n) == Some(event)));
            if event.is_core() || listed {
                self.expose(&mut host, event.host_method(), event.event_name());
            }
        }
        for custom in declared
            .unwrap_or_default()
            .iter()
            .filter(|n| PageEvent::lookup(n).is_none())
        {
            self.expose(&mut host, custom, custom);
        }

        let host = self.plugins.run(ConfigKind::Page, host);
        debug!(path = %path, methods = host.len(), "page config created");
        PageConfig::new(path, Rc::new(root), host)
    }

    /// Build the app config: one method per declared app event and its synonyms, run through the
    /// app pipeline.
    pub fn create_app_config(&self) -> AppConfig {
        let mut host = HostConfig::new(ConfigKind::App);
        for event in &self.options.app_events {
            self.expose(&mut host, event, event);
        }
        let host = self.plugins.run(ConfigKind::App, host);
        debug!(methods = host.len(), "app config created");
        AppConfig::new(host)
    }

    fn expose(&self, host: &mut HostConfig, method: &str, event: &str) {
        host.insert(method, HostMethod::dispatch(event));
        if let Some(group) = self.synonyms.group(event) {
            for name in group.names() {
                if !host.contains(name) {
                    host.insert(name.as_str(), HostMethod::dispatch(event));
                }
            }
        }
    }
}

/// Builder for [`Runtime`].
#[derive(Debug, Default)]
pub struct RuntimeBuilder {
    options: RuntimeOptions,
    synonyms: Vec<SynonymGroup>,
    plugins: PluginDriverBuilder,
    ids: Option<PageIdAllocator>,
}

impl RuntimeBuilder {
    /// Use `options`.
    pub fn options(mut self, options: RuntimeOptions) -> Self {
        self.options = options;
        self
    }

    /// Declare a synonym group on top of the ones in the options.
    pub fn synonyms(mut self, group: SynonymGroup) -> Self {
        self.synonyms.push(group);
        self
    }

    /// Append a page config transform.
    pub fn page_plugin<F>(mut self, f: F) -> Self
    where
        F: Fn(HostConfig) -> HostConfig + Send + Sync + 'static,
    {
        self.plugins = self.plugins.page(f);
        self
    }

    /// Append an app config transform.
    pub fn app_plugin<F>(mut self, f: F) -> Self
    where
        F: Fn(HostConfig) -> HostConfig + Send + Sync + 'static,
    {
        self.plugins = self.plugins.app(f);
        self
    }

    /// Register a platform adapter: its synonym groups and both of its transforms.
    pub fn adapter<A: PlatformAdapter>(mut self, adapter: A) -> Self {
        let groups = adapter.synonyms();
        info!(
            adapter = adapter.name(),
            synonyms = groups.len(),
            "platform adapter registered"
        );
        self.synonyms.extend(groups);
        self.plugins = self.plugins.adapter(Arc::new(adapter));
        self
    }

    /// Allocate page ids from `ids` instead of a fresh allocator.
    ///
    /// Pass [`PageIdAllocator::global`] to share ids with the rest of the process.
    pub fn allocator(mut self, ids: PageIdAllocator) -> Self {
        self.ids = Some(ids);
        self
    }

    /// Build the runtime.
    pub fn build(self) -> Runtime {
        let mut synonyms = self.options.synonym_groups();
        for group in self.synonyms {
            synonyms.declare(group);
        }
        Runtime {
            options: Arc::new(self.options),
            synonyms: Arc::new(synonyms),
            plugins: Arc::new(self.plugins.build()),
            ids: self.ids.unwrap_or_default(),
        }
    }
}
