//! End-to-end fusion over realistic routing results.

use std::time::{Duration, Instant};

use memfuse_core::{
    Classification, FusionOptionsPatch, LayerResult, LayerWeights, MemoryItem, MemoryLayer,
    QueryType, RoutingResult,
};
use memfuse_fusion::{FusionEngine, ResultMerger, cosine_similarity};

#[path = "generators.rs"]
mod generators;

const QUERY: &str = "Continue working on authentication feature";

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn authentication_routing() -> RoutingResult {
    let mut routing = RoutingResult::new(QUERY)
        .with_layer(
            LayerResult::ok(
                MemoryLayer::Session,
                vec![
                    MemoryItem::new("Working on JWT authentication feature for the login flow")
                        .with_timestamp(1_700_000_300_000),
                    MemoryItem::new("Added refresh token rotation to the authentication service")
                        .with_timestamp(1_700_000_200_000),
                ],
            )
            .with_weight(0.95)
            .with_time(3),
        )
        .with_layer(
            LayerResult::ok(
                MemoryLayer::Project,
                vec![
                    MemoryItem::new("Authentication uses JWT tokens signed with RS256"),
                    MemoryItem::new("The feature flag auth_v2 gates the new login page"),
                ],
            )
            .with_weight(0.85)
            .with_time(7),
        )
        .with_layer(
            LayerResult::ok(
                MemoryLayer::Vector,
                vec![MemoryItem::new(
                    "Authentication feature design notes: token expiry and session handling",
                )],
            )
            .with_weight(0.6)
            .with_time(12),
        );

    routing.classification = Classification {
        query: QUERY.into(),
        query_type: QueryType::Contextual,
        confidence: 0.8,
        layers: vec![MemoryLayer::Session, MemoryLayer::Project, MemoryLayer::Vector],
        weights: LayerWeights::default()
            .with(MemoryLayer::Session, 0.95)
            .with(MemoryLayer::Project, 0.85)
            .with(MemoryLayer::Vector, 0.6),
        reasoning: "continuation of ongoing work".into(),
    };
    routing
}

// ---------------------------------------------------------------------------
// Scenario
// ---------------------------------------------------------------------------

#[test]
fn authentication_scenario() {
    let routing = authentication_routing();
    let options = FusionOptionsPatch::default().max_tokens(10_000).min_score(0.3);

    let started = Instant::now();
    let fused = FusionEngine::new().fuse(&routing, &options);
    let elapsed = started.elapsed();

    assert!(!fused.items.is_empty());
    for pair in fused.items.windows(2) {
        assert!(pair[0].score >= pair[1].score, "{pair:?}");
    }
    assert!(fused.items.iter().all(|i| i.score >= 0.3));
    assert!(fused.stats.deduplicated_items <= fused.stats.total_items);
    assert!(fused.stats.estimated_tokens <= 10_000);
    assert_eq!(fused.stats.total_items, 5);
    assert!(elapsed < Duration::from_millis(100), "took {elapsed:?}");
}

#[test]
fn most_relevant_session_item_ranks_first() {
    let fused = FusionEngine::new().fuse(&authentication_routing(), &FusionOptionsPatch::default());
    assert_eq!(fused.items[0].layer, Some(MemoryLayer::Session));
    assert!(fused.items[0].content.starts_with("Working on JWT"));
}

#[test]
fn cross_layer_verbatim_duplicate_is_collapsed() {
    let shared = "User prefers dark mode in every editor";
    let routing = RoutingResult::new("dark mode preference")
        .with_layer(LayerResult::ok(
            MemoryLayer::User,
            vec![MemoryItem::new(shared), MemoryItem::new("Prefers tabs over spaces")],
        ))
        .with_layer(LayerResult::ok(
            MemoryLayer::Vector,
            vec![MemoryItem::new(shared).with_timestamp(5)],
        ));

    let fused = FusionEngine::new().fuse(&routing, &FusionOptionsPatch::default());
    assert!(fused.stats.deduplicated_items < fused.stats.total_items);
    assert_eq!(fused.items.iter().filter(|i| i.content == shared).count(), 1);

    // The merger never deduplicates.
    let merged = ResultMerger::new().merge(&routing, &FusionOptionsPatch::default());
    assert_eq!(merged.items.iter().filter(|i| i.content == shared).count(), 2);
}

#[test]
fn weight_sensitivity_for_identical_content() {
    let routing = RoutingResult::new("JWT validation").with_layer(LayerResult::ok(
        MemoryLayer::Project,
        vec![
            MemoryItem::new("JWT validation lives in middleware").with_layer_weight(0.5),
            MemoryItem::new("JWT validation lives in middleware").with_layer_weight(1.0),
        ],
    ));
    let merged = ResultMerger::new().merge(&routing, &FusionOptionsPatch::default());
    assert_eq!(merged.items.len(), 2);
    assert!(merged.items[0].score > merged.items[1].score);
}

#[test]
fn budget_with_oversized_items() {
    // Six items of ~2500 tokens against a 1000-token budget.
    let routing = generators::large_items(6, 2500);
    let options = FusionOptionsPatch::default().max_tokens(1000);

    let fused = FusionEngine::new().fuse(&routing, &options);
    assert_eq!(fused.items.len(), 1);
    assert!(fused.stats.estimated_tokens > 1000);

    let merged = ResultMerger::new().merge(&routing, &options);
    assert_eq!(merged.items.len(), 1);
}

#[test]
fn budget_with_fitting_items() {
    // Ten items of ~100 tokens against a 1000-token budget.
    let routing = generators::large_items(10, 100);
    let fused = FusionEngine::new().fuse(&routing, &FusionOptionsPatch::default().max_tokens(1000));
    assert!(fused.stats.estimated_tokens <= 1000, "{:?}", fused.stats);
    assert!(fused.items.len() > 1);
    assert!(fused.items.len() < 10);
}

#[test]
fn cosine_similarity_sanity() {
    let base = "JWT is a token format";
    let near = cosine_similarity(base, "JWT is a token format for authentication");
    let far = cosine_similarity(base, "OAuth is completely different");
    assert!(near > 0.5);
    assert!(near > far);
}

#[test]
fn fused_result_serializes_to_wire_shape() {
    let fused = FusionEngine::new().fuse(&authentication_routing(), &FusionOptionsPatch::default());
    let json = fused.to_json().expect("encode");
    let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
    assert!(value["stats"]["totalItems"].is_u64());
    assert!(value["stats"]["deduplicatedItems"].is_u64());
    assert_eq!(value["items"][0]["layer"], "session");
}

#[test]
fn routing_result_from_router_json() {
    let json = r#"{
        "query": "why does login time out",
        "classification": {
            "query": "why does login time out",
            "type": "troubleshooting",
            "confidence": 0.7,
            "layers": ["project", "graph"],
            "weights": {"project": 0.9, "graph": 0.4},
            "reasoning": "error report"
        },
        "results": [
            {"layer": "project", "items": [{"content": "Login times out after 30 seconds under load", "layerWeight": 0.9}], "time": 4},
            {"layer": "graph", "items": null, "time": 0, "error": "graph store offline"}
        ],
        "stats": {"totalTime": 6, "layersQueried": 2, "cacheHit": false}
    }"#;

    let routing = RoutingResult::from_json(json).expect("decode");
    let fused = FusionEngine::new().fuse(&routing, &FusionOptionsPatch::default());
    assert_eq!(fused.stats.total_items, 1);
    assert_eq!(fused.items[0].layer, Some(MemoryLayer::Project));
}
