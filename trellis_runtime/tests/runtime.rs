// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Apps, page identities, plugins and merge policies seen from the host.

mod support;

use std::rc::Rc;

use serde_json::{Value, json};
use support::{Log, TEST_PAGE, entries, log, open, options, push, single_platform};
use trellis_runtime::{
    AllocatorError, App, HostMethod, Page, PageIdAllocator, ResultMerge, Runtime, RuntimeError,
    clear_global_app, global_app, set_global_app,
};
use trellis_tree::{Component, Element, Scope};

struct Blank;

impl Component for Blank {
    fn render(&mut self, _cx: &mut Scope<'_>) -> Vec<Element> {
        vec![Element::text("view", "foo")]
    }
}

#[test]
fn page_ids_are_distinct_and_reset_reproducibly() {
    let runtime = single_platform();
    let mut first = open(&runtime, TEST_PAGE, |_| Element::new(Blank));
    let mut second = open(&runtime, TEST_PAGE, |_| Element::new(Blank));
    first.load().unwrap();
    second.load().unwrap();

    let a = first.page().id().cloned().unwrap();
    let b = second.page().id().cloned().unwrap();
    assert_ne!(a, b);
    assert_eq!(runtime.ids().live(), 2);

    first.unload().unwrap();
    second.unload().unwrap();
    runtime.ids().reset().unwrap();

    let mut again = open(&runtime, TEST_PAGE, |_| Element::new(Blank));
    again.load().unwrap();
    assert_eq!(again.page().id(), Some(&a));
}

#[test]
fn reset_with_live_pages_is_refused() {
    let runtime = single_platform();
    let mut page = open(&runtime, TEST_PAGE, |_| Element::new(Blank));
    page.load().unwrap();

    let err = runtime.ids().reset().unwrap_err();
    let AllocatorError::LivePages { live } = err;
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].to_string(), "pages/test/index#0");

    // Nothing was cleared: the next instance still gets a fresh number.
    let mut next = open(&runtime, TEST_PAGE, |_| Element::new(Blank));
    next.load().unwrap();
    assert_eq!(next.page().id().map(|id| id.seq()), Some(1));
}

#[test]
fn runtimes_can_share_an_allocator() {
    let ids = PageIdAllocator::new();
    let one = Runtime::builder().options(options()).allocator(ids.clone()).build();
    let two = Runtime::builder().options(options()).allocator(ids.clone()).build();
    let mut a = open(&one, TEST_PAGE, |_| Element::new(Blank));
    let mut b = open(&two, TEST_PAGE, |_| Element::new(Blank));
    a.load().unwrap();
    b.load().unwrap();
    assert_ne!(a.page().id(), b.page().id());
    assert_eq!(ids.live(), 2);
}

#[test]
fn page_plugins_reshape_what_the_host_calls() {
    let runtime = Runtime::builder()
        .options(options())
        .page_plugin(|mut config| {
            config.rename("onShow", "onAppear");
            config
        })
        .page_plugin(|mut config| {
            let path = config.data()["path"].clone();
            config.insert(
                "getPath",
                HostMethod::Custom(trellis_registry::handler(move |_| Ok(Some(path.clone())))),
            );
            config
        })
        .build();

    let log = log();
    let shared = log.clone();
    let mut page = open(&runtime, TEST_PAGE, move |_| {
        Element::new(Shows {
            log: shared.clone(),
        })
    });
    let page = page.page_mut();
    page.invoke("onLoad", json!({})).unwrap();
    assert!(page.invoke("onShow", Value::Null).is_err());
    page.invoke("onAppear", Value::Null).unwrap();
    assert_eq!(entries(&log), ["onShow"]);
    assert_eq!(
        page.invoke("getPath", Value::Null).unwrap(),
        Some(json!("pages/test/index"))
    );
}

struct Shows {
    log: Log,
}

impl Component for Shows {
    fn render(&mut self, cx: &mut Scope<'_>) -> Vec<Element> {
        let log = self.log.clone();
        cx.use_page_event("onShow", move |_| {
            push(&log, "onShow");
            Ok(None)
        });
        Vec::new()
    }
}

struct Sharers;

impl Component for Sharers {
    fn render(&mut self, cx: &mut Scope<'_>) -> Vec<Element> {
        cx.use_page_event("onShareAppMessage", |_| Ok(Some(json!({ "title": "a" }))));
        cx.use_page_event("onShareAppMessage", |_| {
            Ok(Some(json!({ "path": "/pages/test/index" })))
        });
        Vec::new()
    }
}

#[test]
fn merge_policy_is_configurable_per_event() {
    let runtime = Runtime::new(
        options().with_merge_override("onShareAppMessage", ResultMerge::MergeObjects),
    );
    let mut page = open(&runtime, TEST_PAGE, |_| Element::new(Sharers));
    page.load().unwrap();
    assert_eq!(
        page.share_app_message().unwrap(),
        Some(json!({ "title": "a", "path": "/pages/test/index" }))
    );

    let runtime = Runtime::new(options().with_merge(ResultMerge::Last));
    let mut page = open(&runtime, TEST_PAGE, |_| Element::new(Sharers));
    page.load().unwrap();
    assert_eq!(
        page.share_app_message().unwrap(),
        Some(json!({ "path": "/pages/test/index" }))
    );
}

#[test]
fn app_is_reachable_from_page_handlers() {
    struct Greets {
        log: Log,
    }

    impl Component for Greets {
        fn render(&mut self, cx: &mut Scope<'_>) -> Vec<Element> {
            let log = self.log.clone();
            cx.use_page_event("onShow", move |_| {
                let launched = global_app()
                    .and_then(|app| app.invoke("onShow", json!({ "from": "page" })).ok())
                    .is_some();
                push(&log, format!("page onShow, app reached: {launched}"));
                Ok(None)
            });
            Vec::new()
        }
    }

    let runtime = single_platform();
    let app = Rc::new(App::new(runtime.create_app_config(), &runtime));
    let log = log();
    {
        let log = log.clone();
        app.subscribe("onLaunch", move |_| {
            push(&log, "app onLaunch");
            Ok(None)
        });
    }
    {
        let log = log.clone();
        app.subscribe("onShow", move |payload| {
            push(&log, format!("app onShow from {}", payload["from"]));
            Ok(None)
        });
    }
    app.invoke("onLaunch", json!({})).unwrap();
    set_global_app(app.clone());

    let shared = log.clone();
    let mut page = open(&runtime, TEST_PAGE, move |_| {
        Element::new(Greets {
            log: shared.clone(),
        })
    });
    page.load().unwrap();
    clear_global_app();

    assert_eq!(
        entries(&log),
        [
            "app onLaunch",
            r#"app onShow from "page""#,
            "page onShow, app reached: true",
        ]
    );
}

#[test]
fn app_config_lists_declared_events() {
    let runtime = single_platform();
    let config = runtime.create_app_config();
    assert_eq!(config.host().len(), 8);
    assert!(config.host().contains("onUnhandledRejection"));
}

#[test]
fn pages_built_from_an_installed_runtime() {
    let installed = single_platform().install().unwrap();
    assert!(matches!(
        single_platform().install(),
        Err(RuntimeError::AlreadyInstalled)
    ));
    let runtime = Runtime::get().unwrap();
    assert!(std::ptr::eq(installed, runtime));

    let config = runtime.create_page_config(TEST_PAGE, |_| Element::new(Blank));
    let mut page = Page::new(config, runtime);
    page.invoke("onLoad", Value::Null).unwrap();
    page.invoke("onUnload", Value::Null).unwrap();
}
