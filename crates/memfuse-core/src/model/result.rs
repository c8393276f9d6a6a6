use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::ScoredItem;
use crate::error::ErrorCode;

/// Aggregate counters for one fusion call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FusionStats {
    /// Scored items across all healthy layers, before any filtering.
    pub total_items: usize,
    /// Items left after the score filter and deduplication.
    pub deduplicated_items: usize,
    /// `ceil(chars / 4)` over the returned items.
    pub estimated_tokens: usize,
    /// Wall-clock milliseconds spent in the call.
    pub fusion_time: u64,
}

/// Ranked, deduplicated, budgeted output of a fusion call.
///
/// `items` is sorted by score, highest first. An empty `items` list is a
/// normal outcome, not an error.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FusedResult {
    pub items: Vec<ScoredItem>,
    pub stats: FusionStats,
}

impl FusedResult {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Encode as the JSON shape prompt assembly consumes.
    ///
    /// # Errors
    ///
    /// Returns an error if a metadata value cannot be serialized.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).with_context(|| {
            let code = ErrorCode::ResultEncodeFailed;
            code.annotate(code.message())
        })
    }
}
