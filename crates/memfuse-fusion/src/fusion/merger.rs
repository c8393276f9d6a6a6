//! Merge without deduplication.
//!
//! [`ResultMerger`] scores, filters, ranks, and truncates. It is the cheap
//! path for callers that already guarantee disjoint layers; the full
//! pipeline lives in [`FusionEngine`](super::FusionEngine).

use std::time::Instant;

use memfuse_core::{FusedResult, FusionOptions, FusionOptionsPatch, FusionStats, RoutingResult};
use tracing::{debug, instrument};

use super::budget::{filter_min_score, rank, score_layers, truncate_to_budget};
use crate::relevance::RelevanceScorer;

#[derive(Debug, Clone, Copy, Default)]
pub struct ResultMerger {
    scorer: RelevanceScorer,
    defaults: FusionOptions,
}

impl ResultMerger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merger whose unset options fall back to `defaults` instead of the
    /// built-in values.
    #[must_use]
    pub const fn with_defaults(defaults: FusionOptions) -> Self {
        Self {
            scorer: RelevanceScorer::new(),
            defaults,
        }
    }

    #[must_use]
    pub const fn defaults(&self) -> FusionOptions {
        self.defaults
    }

    /// Score, filter by `min_score`, rank, and fit the result into the token
    /// budget.
    ///
    /// Never fails. `stats.deduplicated_items` equals `stats.total_items`
    /// because no deduplication happens here.
    #[instrument(skip_all, fields(query_len = routing.query.len(), layers = routing.results.len()))]
    pub fn merge(&self, routing: &RoutingResult, options: &FusionOptionsPatch) -> FusedResult {
        let started = Instant::now();
        let options = self.defaults.apply(options);

        let scored = score_layers(&self.scorer, routing);
        let total_items = scored.candidates.len();

        let mut candidates = scored.candidates;
        filter_min_score(&mut candidates, options.min_score);
        rank(&mut candidates);

        let (items, estimated_tokens) = truncate_to_budget(
            candidates.into_iter().map(|c| c.item),
            options.max_tokens,
        );

        debug!(
            layers_used = scored.layers_used,
            layers_skipped = scored.layers_skipped,
            total_items,
            kept = items.len(),
            estimated_tokens,
            "merge complete"
        );

        FusedResult {
            items,
            stats: FusionStats {
                total_items,
                deduplicated_items: total_items,
                estimated_tokens,
                fusion_time: elapsed_ms(started),
            },
        }
    }
}

pub(crate) fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
