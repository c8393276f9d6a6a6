#![allow(dead_code)]

use memfuse_core::{LayerResult, MemoryItem, MemoryLayer, RoutingResult};
use proptest::prelude::*;

/// Small shared vocabulary so generated items overlap with each other and
/// with the query often enough to exercise dedup and ranking.
const VOCAB: &[&str] = &[
    "auth", "jwt", "token", "refresh", "session", "login", "cache", "pool", "database", "timeout",
    "retry", "graph", "vector", "user", "prefers", "dark", "mode", "deploy", "release", "notes",
];

pub fn arb_text(max_words: usize) -> impl Strategy<Value = String> + Clone {
    prop::collection::vec(prop::sample::select(VOCAB), 0..=max_words)
        .prop_map(|words| words.join(" "))
}

pub fn arb_layer() -> impl Strategy<Value = MemoryLayer> + Clone {
    prop::sample::select(MemoryLayer::ALL.to_vec())
}

pub fn arb_item() -> impl Strategy<Value = MemoryItem> + Clone {
    (
        arb_text(12),
        prop::option::of(0_i64..1_000),
        prop_oneof![Just(1.0_f32), 0.0_f32..=1.0],
    )
        .prop_map(|(content, timestamp, weight)| {
            let item = MemoryItem::new(content).with_layer_weight(weight);
            match timestamp {
                Some(ts) => item.with_timestamp(ts),
                None => item,
            }
        })
}

pub fn arb_layer_result() -> impl Strategy<Value = LayerResult> + Clone {
    (
        arb_layer(),
        prop::collection::vec(arb_item(), 0..8),
        prop::option::of(0.0_f32..=1.0),
        0_u8..10,
    )
        .prop_map(|(layer, items, weight, fate)| {
            let result = match fate {
                0 => LayerResult::failed(layer, "backend unavailable"),
                1 => LayerResult {
                    items: None,
                    ..LayerResult::ok(layer, Vec::new())
                },
                _ => LayerResult::ok(layer, items),
            };
            match weight {
                Some(w) => result.with_weight(w),
                None => result,
            }
        })
}

pub fn arb_routing() -> impl Strategy<Value = RoutingResult> + Clone {
    (arb_text(6), prop::collection::vec(arb_layer_result(), 0..6)).prop_map(|(query, layers)| {
        layers
            .into_iter()
            .fold(RoutingResult::new(query), RoutingResult::with_layer)
    })
}

/// A routing result with `count` distinct items of at least `tokens`
/// estimated tokens each, spread over two layers.
pub fn large_items(count: usize, tokens: usize) -> RoutingResult {
    let items: Vec<MemoryItem> = (0..count)
        .map(|i| {
            // "item000 " is 8 chars, two tokens.
            let body = format!("item{i:03} ").repeat(tokens / 2);
            MemoryItem::new(format!("auth token {body}"))
        })
        .collect();
    let (a, b) = items.split_at(count / 2);
    RoutingResult::new("auth token")
        .with_layer(LayerResult::ok(MemoryLayer::Project, a.to_vec()))
        .with_layer(LayerResult::ok(MemoryLayer::Vector, b.to_vec()))
}
