// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Plugin pipeline for host configs.

use core::fmt;
use std::sync::Arc;

use tracing::debug;
use trellis_registry::SynonymGroup;

use crate::config::{ConfigKind, HostConfig};

/// A host config transform.
pub type Transform = Box<dyn Fn(HostConfig) -> HostConfig + Send + Sync>;

/// Ordered config transforms, one pipeline per [`ConfigKind`].
///
/// Built once through [`PluginDriver::builder`]; there is no way to remove or reorder
/// a transform afterwards.
#[derive(Default)]
pub struct PluginDriver {
    page: Vec<Transform>,
    app: Vec<Transform>,
}

impl PluginDriver {
    /// A driver with no transforms.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start building a driver.
    pub fn builder() -> PluginDriverBuilder {
        PluginDriverBuilder::default()
    }

    /// Fold `draft` through the transforms registered for `kind`, in registration order.
    pub fn run(&self, kind: ConfigKind, draft: HostConfig) -> HostConfig {
        let transforms = self.transforms(kind);
        let before = draft.len();
        let out = transforms.iter().fold(draft, |config, t| t(config));
        debug!(
            %kind,
            transforms = transforms.len(),
            before,
            after = out.len(),
            "config pipeline"
        );
        out
    }

    /// Number of transforms registered for `kind`.
    pub fn len(&self, kind: ConfigKind) -> usize {
        self.transforms(kind).len()
    }

    /// Returns true if no transform is registered for either kind.
    pub fn is_empty(&self) -> bool {
        self.page.is_empty() && self.app.is_empty()
    }

    fn transforms(&self, kind: ConfigKind) -> &[Transform] {
        match kind {
            ConfigKind::Page => &self.page,
            ConfigKind::App => &self.app,
        }
    }
}

impl fmt::Debug for PluginDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginDriver")
            .field("page", &self.page.len())
            .field("app", &self.app.len())
            .finish()
    }
}

/// Builder for [`PluginDriver`].
#[derive(Default)]
pub struct PluginDriverBuilder {
    driver: PluginDriver,
}

impl PluginDriverBuilder {
    /// Append a page config transform.
    pub fn page<F>(mut self, f: F) -> Self
    where
        F: Fn(HostConfig) -> HostConfig + Send + Sync + 'static,
    {
        self.driver.page.push(Box::new(f));
        self
    }

    /// Append an app config transform.
    pub fn app<F>(mut self, f: F) -> Self
    where
        F: Fn(HostConfig) -> HostConfig + Send + Sync + 'static,
    {
        self.driver.app.push(Box::new(f));
        self
    }

    /// Append both transforms of a platform adapter.
    pub fn adapter<A: PlatformAdapter>(self, adapter: Arc<A>) -> Self {
        let page = adapter.clone();
        self.page(move |c| page.page_config(c))
            .app(move |c| adapter.app_config(c))
    }

    /// Freeze the pipelines.
    pub fn build(self) -> PluginDriver {
        self.driver
    }
}

impl fmt::Debug for PluginDriverBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginDriverBuilder")
            .field("driver", &self.driver)
            .finish()
    }
}

/// A target platform's contribution to the runtime.
///
/// Adapters declare which host method names carry a logical event and may reshape the host
/// configs before the host sees them.
pub trait PlatformAdapter: Send + Sync + 'static {
    /// Adapter name, for logs.
    fn name(&self) -> &'static str;

    /// Synonym groups this platform needs.
    fn synonyms(&self) -> Vec<SynonymGroup> {
        Vec::new()
    }

    /// Reshape a page config.
    fn page_config(&self, config: HostConfig) -> HostConfig {
        config
    }

    /// Reshape the app config.
    fn app_config(&self, config: HostConfig) -> HostConfig {
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HostMethod;

    fn draft(kind: ConfigKind) -> HostConfig {
        HostConfig::new(kind).with_method("onLoad", HostMethod::dispatch("onLoad"))
    }

    #[test]
    fn transforms_run_in_order() {
        let driver = PluginDriver::builder()
            .page(|mut c| {
                c.insert("a", HostMethod::dispatch("a"));
                c
            })
            .page(|mut c| {
                c.rename("a", "b");
                c
            })
            .app(|mut c| {
                c.remove("onLoad");
                c
            })
            .build();

        assert_eq!(driver.len(ConfigKind::Page), 2);
        let page = driver.run(ConfigKind::Page, draft(ConfigKind::Page));
        assert_eq!(page.method_names(), ["onLoad", "b"]);

        let app = driver.run(ConfigKind::App, draft(ConfigKind::App));
        assert!(app.is_empty());
    }

    #[test]
    fn empty_driver_is_identity() {
        let driver = PluginDriver::new();
        assert!(driver.is_empty());
        let out = driver.run(ConfigKind::Page, draft(ConfigKind::Page));
        assert_eq!(out.method_names(), ["onLoad"]);
    }

    struct Prefixed;

    impl PlatformAdapter for Prefixed {
        fn name(&self) -> &'static str {
            "prefixed"
        }

        fn page_config(&self, mut config: HostConfig) -> HostConfig {
            config.alias("onLoad", "events.onLoad");
            config
        }
    }

    #[test]
    fn adapter_registers_both_pipelines() {
        let driver = PluginDriver::builder().adapter(Arc::new(Prefixed)).build();
        assert_eq!(driver.len(ConfigKind::Page), 1);
        assert_eq!(driver.len(ConfigKind::App), 1);
        let page = driver.run(ConfigKind::Page, draft(ConfigKind::Page));
        assert_eq!(page.method_names(), ["onLoad", "events.onLoad"]);
        let app = driver.run(ConfigKind::App, draft(ConfigKind::App));
        assert_eq!(app.method_names(), ["onLoad"]);
    }
}
