// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! App events and the global app.
//!
//! Options are loaded from JSON. The app is installed as this thread's global app so page
//! handlers can reach it.
//!
//! Run:
//! - `cargo run -p trellis_demos --example app_events`

use std::rc::Rc;

use serde_json::{Value, json};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use trellis_runtime::{App, Page, Runtime, RuntimeOptions, global_app, set_global_app};
use trellis_tree::{Component, Element, Scope};

const OPTIONS: &str = r#"{
    "appEvents": ["onLaunch", "onShow", "onHide", "onError"],
    "pageEvents": { "pages/index": ["onShow"] }
}"#;

struct Index;

impl Component for Index {
    fn render(&mut self, cx: &mut Scope<'_>) -> Vec<Element> {
        cx.use_page_event("onShow", |_| {
            if let Some(app) = global_app() {
                app.invoke("onError", json!({ "message": "page asked for help" }))
                    .map_err(|e| e.to_string())?;
            }
            Ok(None)
        });
        Vec::new()
    }
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let options = RuntimeOptions::from_json(OPTIONS).unwrap();
    let runtime = Runtime::new(options).install().unwrap();

    let app = Rc::new(App::new(runtime.create_app_config(), runtime));
    println!("== App methods ==\n  {:?}", app.config().host().method_names());
    app.subscribe("onLaunch", |payload| {
        println!("  launched with {payload}");
        Ok(None)
    });
    app.subscribe("onError", |payload| {
        warn!(detail = %payload["message"], "app reported an error");
        Ok(None)
    });
    set_global_app(app.clone());

    println!("== Session ==");
    app.invoke("onLaunch", json!({ "scene": 1001 })).unwrap();
    let config = runtime.create_page_config("pages/index", |_| Element::new(Index));
    let mut page = Page::new(config, runtime);
    page.invoke("onLoad", json!({})).unwrap();
    page.invoke("onShow", Value::Null).unwrap();
    page.invoke("onUnload", Value::Null).unwrap();

    info!(live = runtime.ids().live(), "session finished");
    assert_eq!(runtime.ids().live(), 0);
}
