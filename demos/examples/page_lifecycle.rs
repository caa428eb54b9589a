// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A page session driven the way a host drives it.
//!
//! A root component renders a list and a share button. The list subscribes to page events
//! with hooks; the button handles them as methods. Both see every event in the same order.
//!
//! Run:
//! - `cargo run -p trellis_demos --example page_lifecycle`
//! - `RUST_LOG=trellis=debug cargo run -p trellis_demos --example page_lifecycle` for dispatch logs

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::{Value, json};
use tracing::info;
use tracing_subscriber::EnvFilter;
use trellis_registry::HandlerResult;
use trellis_runtime::testing::HostPage;
use trellis_runtime::{Page, PageProps, Runtime, RuntimeOptions};
use trellis_tree::{Component, Element, Scope};

type Log = Rc<RefCell<Vec<String>>>;

struct Feed {
    log: Log,
    items: Rc<RefCell<Vec<String>>>,
}

impl Component for Feed {
    fn render(&mut self, cx: &mut Scope<'_>) -> Vec<Element> {
        let (log, items, updater) = (self.log.clone(), self.items.clone(), cx.updater());
        cx.use_page_event("onReachBottom", move |_| {
            let next = format!("item {}", items.borrow().len());
            log.borrow_mut().push(format!("feed: load {next}"));
            items.borrow_mut().push(next);
            updater.schedule();
            Ok(None)
        });
        let log = self.log.clone();
        cx.use_page_event("onPullDownRefresh", move |_| {
            log.borrow_mut().push("feed: refresh".to_owned());
            Ok(None)
        });
        self.items
            .borrow()
            .iter()
            .map(|item| Element::text("text", item.clone()))
            .collect()
    }
}

struct ShareButton {
    log: Log,
}

impl Component for ShareButton {
    fn render(&mut self, _cx: &mut Scope<'_>) -> Vec<Element> {
        vec![Element::text("button", "share")]
    }

    fn page_methods(&self) -> &'static [&'static str] {
        &["onShareAppMessage", "onHide"]
    }

    fn on_page_event(&mut self, event: &str, payload: &Value) -> HandlerResult {
        self.log
            .borrow_mut()
            .push(format!("button: {event} {payload}"));
        match event {
            "onShareAppMessage" => Ok(Some(json!({
                "title": "Trellis feed",
                "path": "/pages/feed",
            }))),
            _ => Ok(None),
        }
    }
}

struct FeedPage {
    log: Log,
    title: String,
}

impl Component for FeedPage {
    fn render(&mut self, cx: &mut Scope<'_>) -> Vec<Element> {
        let (log, title) = (self.log.clone(), self.title.clone());
        cx.use_page_event("onShow", move |_| {
            log.borrow_mut().push(format!("page: show {title}"));
            Ok(None)
        });
        vec![
            Element::new(Feed {
                log: self.log.clone(),
                items: Rc::default(),
            }),
            Element::new(ShareButton {
                log: self.log.clone(),
            }),
        ]
    }

    fn did_mount(&mut self) {
        self.log.borrow_mut().push("page: mounted".to_owned());
    }

    fn will_unmount(&mut self) {
        self.log.borrow_mut().push("page: unmounting".to_owned());
    }
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let runtime = Runtime::new(RuntimeOptions::new().with_page_events(
        "pages/feed",
        [
            "onShow",
            "onHide",
            "onPullDownRefresh",
            "onReachBottom",
            "onShareAppMessage",
        ],
    ));
    let log: Log = Rc::default();
    let shared = log.clone();
    let config = runtime.create_page_config("/pages/feed.js", move |props: &PageProps| {
        Element::new(FeedPage {
            log: shared.clone(),
            title: props.query["title"].as_str().unwrap_or("untitled").to_owned(),
        })
    });
    println!("== Host methods ==\n  {:?}", config.host().method_names());

    let mut page = HostPage::new(Page::new(config, &runtime));
    page.load_with(json!({ "title": "news" })).unwrap();
    page.reach_bottom().unwrap();
    page.reach_bottom().unwrap();
    page.pull_down_refresh().unwrap();
    let share = page.share_app_message().unwrap();
    page.hide().unwrap();

    let tree = page.page().tree().unwrap();
    info!(nodes = tree.len(), "feed hidden");
    println!("== Mounted nodes ==\n  {}", tree.len());
    page.unload().unwrap();

    println!("== Share answer ==\n  {}", share.unwrap_or(Value::Null));
    println!("== Log ==");
    for entry in log.borrow().iter() {
        println!("  {entry}");
    }
    assert!(page.show().is_err());
}
