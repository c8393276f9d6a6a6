use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::MemoryLayer;

/// Free-form per-item metadata carried through fusion untouched.
pub type Metadata = BTreeMap<String, serde_json::Value>;

const fn default_layer_weight() -> f32 {
    1.0
}

/// A raw candidate returned by one memory layer.
///
/// Owned by the layer that produced it; fusion only ever reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryItem {
    pub content: String,

    /// Milliseconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,

    /// Item-level prior in `[0, 1]`. Defaults to `1.0`.
    #[serde(default = "default_layer_weight")]
    pub layer_weight: f32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl MemoryItem {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            timestamp: None,
            layer_weight: default_layer_weight(),
            metadata: None,
        }
    }

    #[must_use]
    pub const fn with_timestamp(mut self, timestamp_ms: i64) -> Self {
        self.timestamp = Some(timestamp_ms);
        self
    }

    #[must_use]
    pub const fn with_layer_weight(mut self, weight: f32) -> Self {
        self.layer_weight = weight;
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata
            .get_or_insert_with(Metadata::new)
            .insert(key.into(), value);
        self
    }

    /// `true` when the content is empty or whitespace-only.
    ///
    /// Blank items are never scored.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// A candidate after relevance scoring.
///
/// Created fresh per fusion call; `layer` is stamped by the merger or the
/// engine, never by the scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredItem {
    pub content: String,

    /// Relevance in `[0, 1]`.
    pub score: f32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<MemoryLayer>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl ScoredItem {
    /// Length of `content` in Unicode scalar values, the unit of the token
    /// estimate.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }
}
