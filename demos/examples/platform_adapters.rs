// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Two platform adapters active at once.
//!
//! One platform reports tab taps as `onTabItemTap`, the other as `events.onTabItemTap`.
//! The adapter declares both names as synonyms, so one hook receives the tap whichever name
//! the host uses. A second adapter renames the share method the way its host expects.
//!
//! Run:
//! - `cargo run -p trellis_demos --example platform_adapters`

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::{Value, json};
use tracing::info;
use tracing_subscriber::EnvFilter;
use trellis_registry::SynonymGroup;
use trellis_runtime::{HostConfig, Page, PlatformAdapter, Runtime};
use trellis_tree::{Component, Element, Scope};

/// Reports tab and resize events under an extra `events.` prefix.
struct Prefixed;

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

/// Calls the share method `onShare`.
struct ShortShare;

impl PlatformAdapter for ShortShare {
    fn name(&self) -> &'static str {
        "short-share"
    }

    fn page_config(&self, mut config: HostConfig) -> HostConfig {
        config.rename("onShareAppMessage", "onShare");
        config
    }
}

struct Tabs {
    taps: Rc<RefCell<Vec<Value>>>,
}

impl Component for Tabs {
    fn render(&mut self, cx: &mut Scope<'_>) -> Vec<Element> {
        let taps = self.taps.clone();
        cx.use_page_event("onTabItemTap", move |payload| {
            taps.borrow_mut().push(payload.clone());
            Ok(None)
        });
        cx.use_page_event("onShareAppMessage", |_| Ok(Some(json!({ "title": "tabs" }))));
        vec![Element::host("tab-bar")]
    }
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let runtime = Runtime::builder().adapter(Prefixed).adapter(ShortShare).build();
    let taps = Rc::new(RefCell::new(Vec::new()));
    let shared = taps.clone();
    let config = runtime.create_page_config("pages/tabs", move |_| {
        Element::new(Tabs {
            taps: shared.clone(),
        })
    });

    println!("== Host methods ==");
    for (name, method) in config.host().methods() {
        println!("  {name:<24} -> {method:?}");
    }

    let mut page = Page::new(config, &runtime);
    page.invoke("onLoad", json!({})).unwrap();
    page.invoke("onTabItemTap", json!({ "index": 1 })).unwrap();
    page.invoke("events.onTabItemTap", json!({ "index": 2 })).unwrap();
    let share = page.invoke("onShare", Value::Null).unwrap();
    info!(taps = taps.borrow().len(), "tab taps delivered");
    page.invoke("onUnload", Value::Null).unwrap();

    println!("== Taps seen by the hook ==");
    for tap in taps.borrow().iter() {
        println!("  {tap}");
    }
    println!("== Share ==\n  {}", share.unwrap_or(Value::Null));

    // Each host call reaches the hook once per synonym name.
    assert_eq!(taps.borrow().len(), 4);
}
