//! Relevance scoring of raw memory items against a query.
//!
//! ```text
//! score = clamp01(SIMILARITY_SHARE * cosine(query, content) + PRIOR_SHARE * layer_weight)
//! ```
//!
//! The blend is additive so that for identical content a higher item weight
//! always yields a strictly higher score, including when the content shares
//! no terms with the query.

use memfuse_core::{MemoryItem, ScoredItem};

use super::similarity::{TermVector, cosine_similarity};

/// Share of the score contributed by textual similarity.
pub const SIMILARITY_SHARE: f32 = 0.8;
/// Share of the score contributed by the item's own weight.
pub const PRIOR_SHARE: f32 = 0.2;

/// Combine textual similarity and an item weight into a score in `[0, 1]`.
///
/// Both inputs are clamped into `[0, 1]` first. A NaN weight counts as the
/// default `1.0`; a NaN similarity counts as `0.0`.
#[must_use]
pub fn blend(similarity: f32, item_weight: f32) -> f32 {
    let similarity = if similarity.is_nan() {
        0.0
    } else {
        similarity.clamp(0.0, 1.0)
    };
    let weight = if item_weight.is_nan() {
        1.0
    } else {
        item_weight.clamp(0.0, 1.0)
    };
    SIMILARITY_SHARE
        .mul_add(similarity, PRIOR_SHARE * weight)
        .clamp(0.0, 1.0)
}

/// Scores memory items against a query.
///
/// Stateless; one instance can be shared across threads and calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelevanceScorer;

#[allow(clippy::unused_self)]
impl RelevanceScorer {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Pairwise text similarity, exposed for callers that need the raw signal.
    #[must_use]
    pub fn cosine_similarity(&self, a: &str, b: &str) -> f32 {
        cosine_similarity(a, b)
    }

    /// Score every non-blank item against `query`.
    ///
    /// Output order follows input order with blank items removed. `layer` is
    /// left unset on every result.
    #[must_use]
    pub fn score(&self, query: &str, items: &[MemoryItem]) -> Vec<ScoredItem> {
        if items.is_empty() {
            return Vec::new();
        }
        let query = TermVector::from_text(query);
        items
            .iter()
            .filter_map(|item| self.score_item(&query, item))
            .collect()
    }

    /// Score one item against an already-vectorized query.
    ///
    /// Returns `None` for blank content.
    #[must_use]
    pub fn score_item(&self, query: &TermVector, item: &MemoryItem) -> Option<ScoredItem> {
        if item.is_blank() {
            return None;
        }
        let similarity = query.cosine(&TermVector::from_text(&item.content));
        Some(ScoredItem {
            content: item.content.clone(),
            score: blend(similarity, item.layer_weight),
            timestamp: item.timestamp,
            layer: None,
            metadata: item.metadata.clone(),
        })
    }
}
