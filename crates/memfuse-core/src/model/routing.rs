use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::{LayerWeights, MemoryItem, MemoryLayer, QueryType};
use crate::error::ErrorCode;

/// What one layer returned for the query.
///
/// A layer with `error` set, or with no `items`, is skipped by fusion. It
/// never turns into an error for the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerResult {
    pub layer: MemoryLayer,

    #[serde(default)]
    pub items: Option<Vec<MemoryItem>>,

    /// Milliseconds the layer query took. Informational.
    #[serde(default)]
    pub time: u64,

    /// Layer-level multiplier applied after relevance scoring. Defaults to `1.0`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LayerResult {
    pub fn ok(layer: MemoryLayer, items: Vec<MemoryItem>) -> Self {
        Self {
            layer,
            items: Some(items),
            time: 0,
            weight: None,
            error: None,
        }
    }

    pub fn failed(layer: MemoryLayer, error: impl Into<String>) -> Self {
        Self {
            layer,
            items: None,
            time: 0,
            weight: None,
            error: Some(error.into()),
        }
    }

    #[must_use]
    pub const fn with_weight(mut self, weight: f32) -> Self {
        self.weight = Some(weight);
        self
    }

    #[must_use]
    pub const fn with_time(mut self, time_ms: u64) -> Self {
        self.time = time_ms;
        self
    }

    /// Items eligible for fusion, or `None` when the layer must be skipped.
    #[must_use]
    pub fn usable_items(&self) -> Option<&[MemoryItem]> {
        if self.error.is_some() {
            return None;
        }
        self.items.as_deref()
    }

    /// The layer multiplier in `[0, 1]`, `1.0` when unset. NaN collapses to
    /// `0.0`.
    #[must_use]
    pub fn effective_weight(&self) -> f32 {
        match self.weight {
            None => 1.0,
            Some(w) if w.is_nan() => 0.0,
            Some(w) => w.clamp(0.0, 1.0),
        }
    }
}

/// Classifier output. Read-only for fusion.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub query: String,
    #[serde(rename = "type", default)]
    pub query_type: QueryType,
    #[serde(default)]
    pub confidence: f32,
    #[serde(default)]
    pub layers: Vec<MemoryLayer>,
    #[serde(default)]
    pub weights: LayerWeights,
    #[serde(default)]
    pub reasoning: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingStats {
    #[serde(default)]
    pub total_time: u64,
    #[serde(default)]
    pub layers_queried: usize,
    #[serde(default)]
    pub cache_hit: bool,
}

/// The router's complete answer: the single input to fusion.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingResult {
    pub query: String,
    #[serde(default)]
    pub classification: Classification,
    #[serde(default)]
    pub results: Vec<LayerResult>,
    #[serde(default)]
    pub stats: RoutingStats,
}

impl RoutingResult {
    /// A routing result with a general classification and no layers yet.
    pub fn new(query: impl Into<String>) -> Self {
        let query = query.into();
        Self {
            classification: Classification {
                query: query.clone(),
                ..Classification::default()
            },
            query,
            results: Vec::new(),
            stats: RoutingStats::default(),
        }
    }

    /// Append a layer result, keeping `stats.layers_queried` in step.
    #[must_use]
    pub fn with_layer(mut self, result: LayerResult) -> Self {
        self.results.push(result);
        self.stats.layers_queried = self.results.len();
        self
    }

    /// Decode the router's JSON wire shape.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is not a valid routing result.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).with_context(|| {
            let code = ErrorCode::RoutingDecodeFailed;
            code.annotate(code.message())
        })
    }
}
