//! Options that bound a single fusion call.
//!
//! [`FusionOptions`] is always fully resolved and in range. Callers express
//! overrides as a [`FusionOptionsPatch`] (every field optional) which is
//! merged over a base with [`FusionOptions::apply`]. Out-of-range values are
//! clamped rather than rejected; [`FusionOptions::validate`] exists for
//! callers that prefer a hard error.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;

/// Default token budget for the fused answer set.
pub const DEFAULT_MAX_TOKENS: usize = 10_000;
/// Default minimum score; `0.0` keeps everything.
pub const DEFAULT_MIN_SCORE: f32 = 0.0;
/// Default cosine similarity at which two items count as near-duplicates.
pub const DEFAULT_DEDUP_THRESHOLD: f32 = 0.85;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FusionOptions {
    /// Upper bound on `ceil(chars / 4)` over the returned items.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    /// Items scoring below this are dropped before deduplication.
    #[serde(default = "default_min_score")]
    pub min_score: f32,

    /// Pairwise cosine similarity, in `(0, 1]`, at or above which items merge.
    #[serde(default = "default_dedup_threshold")]
    pub dedup_threshold: f32,
}

impl Default for FusionOptions {
    fn default() -> Self {
        Self {
            max_tokens: default_max_tokens(),
            min_score: default_min_score(),
            dedup_threshold: default_dedup_threshold(),
        }
    }
}

const fn default_max_tokens() -> usize {
    DEFAULT_MAX_TOKENS
}

const fn default_min_score() -> f32 {
    DEFAULT_MIN_SCORE
}

const fn default_dedup_threshold() -> f32 {
    DEFAULT_DEDUP_THRESHOLD
}

/// A partial [`FusionOptions`]: unset fields inherit from the base.
///
/// `max_tokens` is signed so that a negative request from config or a
/// caller can be represented and clamped instead of failing to parse.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct FusionOptionsPatch {
    #[serde(alias = "maxTokens")]
    pub max_tokens: Option<i64>,
    #[serde(alias = "minScore")]
    pub min_score: Option<f32>,
    #[serde(alias = "dedupThreshold")]
    pub dedup_threshold: Option<f32>,
}

impl FusionOptionsPatch {
    #[must_use]
    pub const fn max_tokens(mut self, max_tokens: i64) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    #[must_use]
    pub const fn min_score(mut self, min_score: f32) -> Self {
        self.min_score = Some(min_score);
        self
    }

    #[must_use]
    pub const fn dedup_threshold(mut self, threshold: f32) -> Self {
        self.dedup_threshold = Some(threshold);
        self
    }

    /// Layer `over` on top of `self`; fields set in `over` win.
    #[must_use]
    pub fn overlay(self, over: Self) -> Self {
        Self {
            max_tokens: over.max_tokens.or(self.max_tokens),
            min_score: over.min_score.or(self.min_score),
            dedup_threshold: over.dedup_threshold.or(self.dedup_threshold),
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.max_tokens.is_none() && self.min_score.is_none() && self.dedup_threshold.is_none()
    }
}

impl From<FusionOptions> for FusionOptionsPatch {
    fn from(options: FusionOptions) -> Self {
        Self {
            max_tokens: Some(i64::try_from(options.max_tokens).unwrap_or(i64::MAX)),
            min_score: Some(options.min_score),
            dedup_threshold: Some(options.dedup_threshold),
        }
    }
}

impl FusionOptions {
    /// Merge `patch` over `self`, clamping every field into range.
    #[must_use]
    pub fn apply(&self, patch: &FusionOptionsPatch) -> Self {
        let max_tokens = match patch.max_tokens {
            None => self.max_tokens,
            Some(requested) => usize::try_from(requested).unwrap_or_else(|_| {
                warn!(requested, "negative max_tokens clamped to 0");
                0
            }),
        };

        Self {
            max_tokens,
            min_score: patch
                .min_score
                .map_or(self.min_score, clamp_min_score),
            dedup_threshold: patch
                .dedup_threshold
                .map_or(self.dedup_threshold, clamp_dedup_threshold),
        }
    }

    /// Strictly check every field, for callers that want rejection over
    /// clamping.
    ///
    /// # Errors
    ///
    /// Returns the first out-of-range field as a [`ConfigError`].
    pub fn validate(patch: &FusionOptionsPatch) -> Result<(), ConfigError> {
        if let Some(t) = patch.dedup_threshold.filter(|t| !(*t > 0.0 && *t <= 1.0)) {
            return Err(ConfigError::DedupThreshold(t));
        }
        if let Some(s) = patch.min_score.filter(|s| !(0.0..=1.0).contains(s)) {
            return Err(ConfigError::MinScore(s));
        }
        if let Some(m) = patch.max_tokens.filter(|m| *m < 0) {
            return Err(ConfigError::MaxTokens(m));
        }
        Ok(())
    }
}

fn clamp_min_score(requested: f32) -> f32 {
    if requested.is_nan() {
        warn!("min_score NaN replaced with {DEFAULT_MIN_SCORE}");
        return DEFAULT_MIN_SCORE;
    }
    let clamped = requested.clamp(0.0, 1.0);
    if (clamped - requested).abs() > f32::EPSILON {
        warn!(requested, clamped, "min_score clamped into [0, 1]");
    }
    clamped
}

fn clamp_dedup_threshold(requested: f32) -> f32 {
    if requested.is_nan() || requested <= 0.0 {
        warn!(
            requested,
            "dedup_threshold outside (0, 1]; using default {DEFAULT_DEDUP_THRESHOLD}"
        );
        return DEFAULT_DEDUP_THRESHOLD;
    }
    if requested > 1.0 {
        warn!(requested, "dedup_threshold clamped to 1.0");
        return 1.0;
    }
    requested
}
