//! Scoring of routed layers, ranking, and token-budget truncation.
//!
//! These are the stages [`ResultMerger`](super::ResultMerger) and
//! [`FusionEngine`](super::FusionEngine) share. Only the engine inserts a
//! deduplication pass between them.

use std::cmp::Ordering;

use memfuse_core::{RoutingResult, ScoredItem};
use tracing::debug;

use crate::relevance::{RelevanceScorer, TermVector};

/// Characters per estimated token.
pub const CHARS_PER_TOKEN: usize = 4;

/// `ceil(chars / 4)`.
///
/// ```
/// use memfuse_fusion::fusion::estimate_tokens;
///
/// assert_eq!(estimate_tokens(0), 0);
/// assert_eq!(estimate_tokens(1), 1);
/// assert_eq!(estimate_tokens(8), 2);
/// assert_eq!(estimate_tokens(9), 3);
/// ```
#[must_use]
pub const fn estimate_tokens(chars: usize) -> usize {
    chars.div_ceil(CHARS_PER_TOKEN)
}

/// Where a candidate came from: its layer's position in the routing result
/// and its own position inside that layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Origin {
    pub layer_index: usize,
    pub item_index: usize,
}

#[derive(Debug, Clone)]
pub struct Candidate {
    pub item: ScoredItem,
    pub origin: Origin,
}

/// Scored candidates plus per-call layer accounting.
#[derive(Debug, Default)]
pub struct ScoredLayers {
    pub candidates: Vec<Candidate>,
    pub layers_used: usize,
    pub layers_skipped: usize,
}

/// Score every usable layer's items against the query, apply the layer
/// multiplier, and stamp provenance.
///
/// Layers with an error or without items are skipped and logged; they never
/// fail the call.
#[must_use]
pub fn score_layers(scorer: &RelevanceScorer, routing: &RoutingResult) -> ScoredLayers {
    let query = TermVector::from_text(&routing.query);
    let mut out = ScoredLayers::default();

    for (layer_index, layer) in routing.results.iter().enumerate() {
        let Some(items) = layer.usable_items() else {
            debug!(
                layer = %layer.layer,
                error = layer.error.as_deref().unwrap_or("no items"),
                "skipping layer"
            );
            out.layers_skipped += 1;
            continue;
        };
        out.layers_used += 1;

        let factor = layer.effective_weight();
        for (item_index, item) in items.iter().enumerate() {
            let Some(mut scored) = scorer.score_item(&query, item) else {
                continue;
            };
            scored.score = (scored.score * factor).clamp(0.0, 1.0);
            scored.layer = Some(layer.layer);
            out.candidates.push(Candidate {
                item: scored,
                origin: Origin {
                    layer_index,
                    item_index,
                },
            });
        }
    }

    out
}

/// Drop candidates scoring below `min_score`.
pub fn filter_min_score(candidates: &mut Vec<Candidate>, min_score: f32) {
    candidates.retain(|c| c.item.score >= min_score);
}

/// Total order used for every fused list: score descending, then newest
/// timestamp (missing timestamps last), then layer declaration order, then
/// position inside the layer.
fn compare(a: &Candidate, b: &Candidate) -> Ordering {
    b.item
        .score
        .total_cmp(&a.item.score)
        .then_with(|| b.item.timestamp.cmp(&a.item.timestamp))
        .then_with(|| a.origin.cmp(&b.origin))
}

pub fn rank(candidates: &mut [Candidate]) {
    candidates.sort_by(compare);
}

/// Greedily keep ranked items while `ceil(total_chars / 4) <= max_tokens`.
///
/// Stops at the first item that would overflow. If that is the very first
/// item, it is returned alone so relevant content is never reduced to
/// nothing by the budget.
///
/// Returns the kept items and their token estimate.
#[must_use]
pub fn truncate_to_budget(
    ranked: impl IntoIterator<Item = ScoredItem>,
    max_tokens: usize,
) -> (Vec<ScoredItem>, usize) {
    let mut kept = Vec::new();
    let mut chars = 0_usize;

    for item in ranked {
        let next = chars + item.char_len();
        if estimate_tokens(next) > max_tokens {
            if kept.is_empty() {
                debug!(
                    tokens = estimate_tokens(next),
                    max_tokens, "single item exceeds budget; keeping it alone"
                );
                chars = next;
                kept.push(item);
            }
            break;
        }
        chars = next;
        kept.push(item);
    }

    (kept, estimate_tokens(chars))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
