// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![allow(dead_code, reason = "Each test binary uses a different subset.")]

use std::cell::RefCell;
use std::rc::Rc;

use trellis_registry::SynonymGroup;
use trellis_runtime::testing::HostPage;
use trellis_runtime::{Page, PageProps, PlatformAdapter, Runtime, RuntimeOptions};
use trellis_tree::Element;

pub type Log = Rc<RefCell<Vec<String>>>;

pub fn log() -> Log {
    Log::default()
}

pub fn push(log: &Log, entry: impl Into<String>) {
    log.borrow_mut().push(entry.into());
}

pub fn entries(log: &Log) -> Vec<String> {
    log.borrow().clone()
}

pub const TEST_PAGE: &str = "pages/test/index";
pub const ONLY_SHOW_PAGE: &str = "pages/test/only/onshow";

/// Options shaped like a real mini-program project.
pub fn options() -> RuntimeOptions {
    RuntimeOptions::from_json(
        r#"{
            "appEvents": [
                "onLaunch",
                "onShow",
                "onHide",
                "onShareAppMessage",
                "onPageNotFound",
                "onError",
                "onUnhandledRejection",
                "onThemeChange"
            ],
            "pageEvents": {
                "pages/test/only/onshow": ["onShow"],
                "pages/test/index": [
                    "onShow",
                    "onHide",
                    "onPullDownRefresh",
                    "onPullIntercept",
                    "onReachBottom",
                    "onPageScroll",
                    "onShareAppMessage",
                    "onTitleClick",
                    "onOptionMenuClick",
                    "onPopMenuClick",
                    "onReady",
                    "onResize",
                    "onTabItemTap",
                    "beforeTabItemTap",
                    "onKeyboardHeight",
                    "onBack"
                ]
            }
        }"#,
    )
    .expect("test options are valid")
}

/// A platform whose tab and resize events also arrive under an `events.` prefix.
pub struct Prefixed;

impl PlatformAdapter for Prefixed {
    fn name(&self) -> &'static str {
        "prefixed"
    }

    fn synonyms(&self) -> Vec<SynonymGroup> {
        ["onTabItemTap", "onResize"]
            .into_iter()
            .map(|event| SynonymGroup::new(event, [event.to_owned(), format!("events.{event}")]))
            .collect()
    }
}

/// One platform, every event under one name.
pub fn single_platform() -> Runtime {
    Runtime::new(options())
}

/// Two platforms at once: tab and resize events have two host names.
pub fn dual_platform() -> Runtime {
    Runtime::builder().options(options()).adapter(Prefixed).build()
}

pub fn open<F>(runtime: &Runtime, path: &str, root: F) -> HostPage
where
    F: Fn(&PageProps) -> Element + 'static,
{
    let config = runtime.create_page_config(path, root);
    HostPage::new(Page::new(config, runtime))
}
