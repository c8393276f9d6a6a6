#![no_main]

use libfuzzer_sys::fuzz_target;
use memfuse_core::{FusionOptionsPatch, RoutingResult};
use memfuse_fusion::{FusionEngine, ResultMerger, estimate_tokens};

fuzz_target!(|data: &[u8]| {
    let Ok(routing) = serde_json::from_slice::<RoutingResult>(data) else {
        return;
    };

    let budget = (data.len() % 64) as i64;
    let options = FusionOptionsPatch::default()
        .max_tokens(budget)
        .min_score((data.len() % 5) as f32 / 10.0);

    let fused = FusionEngine::new().fuse(&routing, &options);
    let merged = ResultMerger::new().merge(&routing, &options);

    for result in [&fused, &merged] {
        assert!(result.stats.deduplicated_items <= result.stats.total_items);
        assert!(result.items.len() <= result.stats.deduplicated_items);
        for pair in result.items.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        for item in &result.items {
            assert!((0.0..=1.0).contains(&item.score));
            assert!(item.layer.is_some());
        }
        let chars: usize = result.items.iter().map(|i| i.char_len()).sum();
        assert_eq!(result.stats.estimated_tokens, estimate_tokens(chars));
        assert!(result.stats.estimated_tokens <= budget as usize || result.items.len() == 1);
    }
    assert_eq!(fused.stats.total_items, merged.stats.total_items);
});
