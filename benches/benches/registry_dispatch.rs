// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use serde_json::{Value, json};
use trellis_registry::{EventRegistry, SynonymGroup, Synonyms, dispatch_listeners, handler};

const EVENTS: &[&str] = &[
    "onLoad",
    "onShow",
    "onHide",
    "onPageScroll",
    "onReachBottom",
    "onShareAppMessage",
];

fn filled(subscribers: u32) -> EventRegistry<u32> {
    let mut registry = EventRegistry::new();
    for s in 0..subscribers {
        for &event in EVENTS {
            registry.subscribe(event, s, handler(move |_| Ok(Some(Value::from(s)))));
        }
    }
    registry
}

fn bench_subscribe(c: &mut Criterion) {
    let mut group = c.benchmark_group("subscribe");
    for &n in &[16u32, 128, 1024] {
        group.throughput(Throughput::Elements(u64::from(n) * EVENTS.len() as u64));
        group.bench_function(format!("fresh_n{n}"), |b| {
            b.iter(|| black_box(filled(n)));
        });
        group.bench_function(format!("replace_in_place_n{n}"), |b| {
            b.iter_batched(
                || filled(n),
                |mut registry| {
                    for s in 0..n {
                        registry.subscribe("onShow", s, handler(|_| Ok(None)));
                    }
                    black_box(registry.len());
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");
    let payload = json!({ "scrollTop": 120 });
    for &n in &[16u32, 128, 1024] {
        let registry = filled(n);
        group.throughput(Throughput::Elements(u64::from(n)));
        group.bench_function(format!("direct_n{n}"), |b| {
            b.iter(|| black_box(registry.dispatch("onPageScroll", &payload)));
        });
        group.bench_function(format!("snapshot_n{n}"), |b| {
            b.iter(|| {
                let listeners = registry.listeners("onPageScroll");
                black_box(dispatch_listeners("onPageScroll", &listeners, &payload))
            });
        });
    }
    group.finish();
}

fn bench_synonyms(c: &mut Criterion) {
    let synonyms = Synonyms::new()
        .with(SynonymGroup::new(
            "onTabItemTap",
            ["onTabItemTap", "events.onTabItemTap"],
        ))
        .with(SynonymGroup::new("onResize", ["onResize", "events.onResize"]));
    c.bench_function("synonyms/expand_declared", |b| {
        b.iter(|| black_box(synonyms.expand(black_box("onTabItemTap"))));
    });
    c.bench_function("synonyms/expand_plain", |b| {
        b.iter(|| black_box(synonyms.expand(black_box("onShow"))));
    });
}

fn bench_unsubscribe(c: &mut Criterion) {
    c.bench_function("unsubscribe_where/half_of_1024", |b| {
        b.iter_batched(
            || filled(1024),
            |mut registry| black_box(registry.unsubscribe_where(|s| s % 2 == 0)),
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    benches,
    bench_subscribe,
    bench_dispatch,
    bench_synonyms,
    bench_unsubscribe
);
criterion_main!(benches);
