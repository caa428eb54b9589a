// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use serde_json::{Value, json};
use trellis_runtime::testing::HostPage;
use trellis_runtime::{Page, Runtime};
use trellis_tree::{Component, Element, Scope};

/// A node with `fanout` children, `depth` levels deep, each subscribing to two events.
struct Branch {
    depth: u32,
    fanout: u32,
}

impl Component for Branch {
    fn render(&mut self, cx: &mut Scope<'_>) -> Vec<Element> {
        cx.use_page_event("onShow", |_| Ok(None));
        cx.use_page_event("onPageScroll", |p| Ok(Some(p.clone())));
        if self.depth == 0 {
            return vec![Element::text("text", "leaf")];
        }
        (0..self.fanout)
            .map(|_| {
                Element::new(Self {
                    depth: self.depth - 1,
                    fanout: self.fanout,
                })
            })
            .collect()
    }
}

fn page(runtime: &Runtime, depth: u32, fanout: u32) -> HostPage {
    let config = runtime.create_page_config("pages/bench", move |_| {
        Element::new(Branch { depth, fanout })
    });
    HostPage::new(Page::new(config, runtime))
}

fn bench_session(c: &mut Criterion) {
    let runtime = Runtime::default();
    let mut group = c.benchmark_group("page");
    for &(depth, fanout) in &[(2u32, 4u32), (4, 4)] {
        group.bench_function(format!("load_unload_d{depth}_f{fanout}"), |b| {
            b.iter_batched(
                || page(&runtime, depth, fanout),
                |mut page| {
                    page.load().unwrap();
                    page.unload().unwrap();
                    black_box(page)
                },
                BatchSize::SmallInput,
            );
        });

        let mut loaded = page(&runtime, depth, fanout);
        loaded.load().unwrap();
        let scroll = json!({ "scrollTop": 300 });
        group.bench_function(format!("scroll_d{depth}_f{fanout}"), |b| {
            b.iter(|| {
                black_box(
                    loaded
                        .page_mut()
                        .invoke("onPageScroll", scroll.clone())
                        .unwrap(),
                )
            });
        });
        group.bench_function(format!("rerender_root_d{depth}_f{fanout}"), |b| {
            let root = loaded.page().root().unwrap();
            b.iter(|| loaded.page_mut().force_update(root).unwrap());
        });
        loaded.page_mut().invoke("onUnload", Value::Null).unwrap();
    }
    group.finish();
}

criterion_group!(benches, bench_session);
criterion_main!(benches);
