// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Page event hooks in nested and re-rendering components.

mod support;

use std::cell::Cell;
use std::rc::Rc;

use serde_json::{Value, json};
use support::{Log, ONLY_SHOW_PAGE, TEST_PAGE, entries, log, open, push, single_platform};
use trellis_runtime::PageError;
use trellis_tree::{Component, Element, Scope, Updater};

/// Logs `onShow` and renders nothing.
struct Foo {
    log: Log,
}

impl Component for Foo {
    fn render(&mut self, cx: &mut Scope<'_>) -> Vec<Element> {
        let log = self.log.clone();
        cx.use_page_event("onShow", move |_| {
            push(&log, "onShow");
            Ok(None)
        });
        vec![Element::text("view", "foo")]
    }
}

/// Renders a [`Foo`].
struct Bar {
    log: Log,
}

impl Component for Bar {
    fn render(&mut self, _cx: &mut Scope<'_>) -> Vec<Element> {
        vec![Element::new(Foo {
            log: self.log.clone(),
        })]
    }
}

#[test]
fn hooks_work_in_nested_components() {
    let runtime = single_platform();
    let log = log();
    let shared = log.clone();
    let mut page = open(&runtime, TEST_PAGE, move |_| {
        Element::new(Bar {
            log: shared.clone(),
        })
    });
    page.load().unwrap();
    assert_eq!(entries(&log), ["onShow"]);
}

#[test]
fn sibling_instances_subscribe_separately() {
    struct Twins {
        log: Log,
    }

    impl Component for Twins {
        fn render(&mut self, _cx: &mut Scope<'_>) -> Vec<Element> {
            (0..2)
                .map(|_| {
                    Element::new(Foo {
                        log: self.log.clone(),
                    })
                })
                .collect()
        }
    }

    let runtime = single_platform();
    let log = log();
    let shared = log.clone();
    let mut page = open(&runtime, TEST_PAGE, move |_| {
        Element::new(Twins {
            log: shared.clone(),
        })
    });
    page.load().unwrap();
    assert_eq!(entries(&log), ["onShow", "onShow"]);
    let registry = page.page().registry().unwrap();
    assert_eq!(registry.subscriber_count("onShow"), 2);
}

/// Counts its renders and subscribes to two events.
struct Refreshing {
    log: Log,
    renders: Rc<Cell<u32>>,
}

impl Component for Refreshing {
    fn render(&mut self, cx: &mut Scope<'_>) -> Vec<Element> {
        self.renders.set(self.renders.get() + 1);
        let log = self.log.clone();
        cx.use_page_event("onShow", move |_| {
            push(&log, "onShow");
            Ok(None)
        });
        let log = self.log.clone();
        cx.use_page_event("onShareAppMessage", move |_| {
            push(&log, "onShareAppMessage");
            Ok(None)
        });
        vec![Element::text("view", "foo")]
    }
}

#[test]
fn hooks_register_once_across_rerenders() {
    let runtime = single_platform();
    let log = log();
    let renders = Rc::new(Cell::new(0));
    let (shared, counter) = (log.clone(), renders.clone());
    let mut page = open(&runtime, TEST_PAGE, move |_| {
        Element::new(Refreshing {
            log: shared.clone(),
            renders: counter.clone(),
        })
    });
    page.load().unwrap();

    let root = page.page().root().unwrap();
    page.page_mut().force_update(root).unwrap();
    page.page_mut().force_update(root).unwrap();
    page.share_app_message().unwrap();

    assert_eq!(renders.get(), 3);
    assert_eq!(entries(&log), ["onShow", "onShareAppMessage"]);
    let registry = page.page().registry().unwrap();
    assert_eq!(registry.subscriber_count("onShow"), 1);
    assert_eq!(registry.subscriber_count("onShareAppMessage"), 1);
}

/// Shows a [`Foo`] until the page is hidden.
struct Toggle {
    log: Log,
    visible: Rc<Cell<bool>>,
}

impl Component for Toggle {
    fn render(&mut self, cx: &mut Scope<'_>) -> Vec<Element> {
        let updater: Updater = cx.updater();
        let visible = self.visible.clone();
        cx.use_page_event("onHide", move |_| {
            visible.set(false);
            updater.schedule();
            Ok(None)
        });
        if self.visible.get() {
            vec![Element::new(Foo {
                log: self.log.clone(),
            })]
        } else {
            Vec::new()
        }
    }
}

#[test]
fn unmounted_children_stop_receiving_events() {
    let runtime = single_platform();
    let log = log();
    let shared = log.clone();
    let mut page = open(&runtime, TEST_PAGE, move |_| {
        Element::new(Toggle {
            log: shared.clone(),
            visible: Rc::new(Cell::new(true)),
        })
    });
    page.load().unwrap();
    assert_eq!(entries(&log), ["onShow"]);

    // The re-render scheduled by the handler runs before `hide` returns.
    page.hide().unwrap();
    assert_eq!(page.page().tree().unwrap().find::<Foo>().len(), 0);
    assert_eq!(page.page().registry().unwrap().subscriber_count("onShow"), 0);

    page.show().unwrap();
    assert_eq!(entries(&log), ["onShow"]);
}

#[test]
fn undeclared_events_are_not_exposed() {
    let runtime = single_platform();
    let log = log();
    let shared = log.clone();
    let mut page = open(&runtime, ONLY_SHOW_PAGE, move |_| {
        Element::new(Foo {
            log: shared.clone(),
        })
    });
    assert_eq!(
        page.page().config().host().method_names(),
        ["onLoad", "onShow", "onUnload"]
    );
    page.load().unwrap();
    let err = page.hide().unwrap_err();
    assert!(
        matches!(err, PageError::UnknownMethod { ref method, .. } if method == "onHide"),
        "unexpected {err:?}"
    );
    assert_eq!(entries(&log), ["onShow"]);
}

#[test]
fn root_receives_page_props() {
    struct Props;

    impl Component for Props {
        fn render(&mut self, _cx: &mut Scope<'_>) -> Vec<Element> {
            Vec::new()
        }
    }

    let runtime = single_platform();
    let log = log();
    let shared = log.clone();
    let mut page = open(&runtime, TEST_PAGE, move |props| {
        push(&shared, format!("{} {}", props.page_id, props.query["id"]));
        Element::new(Props)
    });
    page.load_with(json!({ "id": 42 })).unwrap();
    assert_eq!(entries(&log), ["pages/test/index#0 42"]);
    assert_eq!(page.page().query().map(|q| &q["id"]), Some(&Value::from(42)));
    assert_eq!(page.page().tree().unwrap().find::<Props>().len(), 1);
}
