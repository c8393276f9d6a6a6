//! The full fusion pipeline.
//!
//! ```text
//! RoutingResult
//!   -> score every usable layer (RelevanceScorer x layer weight)
//!   -> drop items below min_score
//!   -> collapse near-duplicates (SemanticDeduplicator)
//!   -> rank (score, recency, layer order, item order)
//!   -> truncate to the token budget
//!   -> FusedResult
//! ```
//!
//! A [`FusionEngine`] owns its default options; per-call patches are merged
//! over them and never mutate them. `fuse` takes `&self`, so one engine can
//! serve concurrent callers.

use std::time::Instant;

use memfuse_core::config::EffectiveConfig;
use memfuse_core::{FusedResult, FusionOptions, FusionOptionsPatch, FusionStats, RoutingResult};
use tracing::{info, instrument, trace};

use super::budget::{Candidate, filter_min_score, rank, score_layers, truncate_to_budget};
use super::merger::elapsed_ms;
use crate::dedup::SemanticDeduplicator;
use crate::relevance::RelevanceScorer;

/// Emit at `info` when verbose, `trace` otherwise.
macro_rules! stage {
    ($verbose:expr, $($arg:tt)+) => {
        if $verbose {
            info!($($arg)+);
        } else {
            trace!($($arg)+);
        }
    };
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FusionEngine {
    scorer: RelevanceScorer,
    defaults: FusionOptions,
    verbose: bool,
}

impl FusionEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine configured from a resolved config file stack.
    #[must_use]
    pub const fn from_config(config: EffectiveConfig) -> Self {
        Self {
            scorer: RelevanceScorer::new(),
            defaults: config.options,
            verbose: config.verbose,
        }
    }

    /// Merge `patch` into this engine's defaults. Affects later calls only.
    pub fn set_defaults(&mut self, patch: &FusionOptionsPatch) {
        self.defaults = self.defaults.apply(patch);
    }

    #[must_use]
    pub const fn defaults(&self) -> FusionOptions {
        self.defaults
    }

    /// Raise per-stage diagnostics from `trace` to `info`. Output is never
    /// affected.
    pub const fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    #[must_use]
    pub const fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Fuse a routing result into a ranked, deduplicated, budgeted list.
    ///
    /// Never fails: errored layers are skipped, empty input gives an empty
    /// result, and out-of-range options are clamped.
    #[instrument(skip_all, fields(query_len = routing.query.len(), layers = routing.results.len()))]
    pub fn fuse(&self, routing: &RoutingResult, options: &FusionOptionsPatch) -> FusedResult {
        let started = Instant::now();
        let options = self.defaults.apply(options);
        let verbose = self.verbose;

        let scored = score_layers(&self.scorer, routing);
        let total_items = scored.candidates.len();
        stage!(
            verbose,
            layers_used = scored.layers_used,
            layers_skipped = scored.layers_skipped,
            total_items,
            "scored"
        );

        let mut candidates = scored.candidates;
        filter_min_score(&mut candidates, options.min_score);
        stage!(
            verbose,
            min_score = options.min_score,
            remaining = candidates.len(),
            "filtered"
        );

        let mut candidates = collapse(candidates, options.dedup_threshold);
        let deduplicated_items = candidates.len();
        stage!(
            verbose,
            threshold = options.dedup_threshold,
            remaining = deduplicated_items,
            "deduplicated"
        );

        rank(&mut candidates);
        let (items, estimated_tokens) = truncate_to_budget(
            candidates.into_iter().map(|c| c.item),
            options.max_tokens,
        );

        let fusion_time = elapsed_ms(started);
        stage!(
            verbose,
            kept = items.len(),
            estimated_tokens,
            max_tokens = options.max_tokens,
            fusion_time_ms = fusion_time,
            "fused"
        );

        FusedResult {
            items,
            stats: FusionStats {
                total_items,
                deduplicated_items,
                estimated_tokens,
                fusion_time,
            },
        }
    }
}

/// Keep one candidate per near-duplicate group, preserving each
/// representative's origin for ranking.
fn collapse(candidates: Vec<Candidate>, threshold: f32) -> Vec<Candidate> {
    if candidates.len() < 2 {
        return candidates;
    }
    let dedup = SemanticDeduplicator::new(threshold);
    let items: Vec<_> = candidates.iter().map(|c| c.item.clone()).collect();
    let keep = dedup.representatives(&items);

    let mut slots: Vec<Option<Candidate>> = candidates.into_iter().map(Some).collect();
    keep.into_iter()
        .filter_map(|idx| slots.get_mut(idx).and_then(Option::take))
        .collect()
}
