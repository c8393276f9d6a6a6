//! Bag-of-words text similarity.
//!
//! Text is lowercased and split on every non-alphanumeric character. Each
//! text becomes a term-frequency vector; similarity is the cosine of two such
//! vectors over their union vocabulary.
//!
//! Counts and dot products stay in integer space until the final division,
//! so `cosine(a, b)` and `cosine(b, a)` are bit-for-bit equal.

use std::collections::HashMap;

/// Lowercase `text` and split it on non-alphanumeric boundaries, dropping
/// empty tokens.
///
/// ```
/// use memfuse_fusion::relevance::tokenize;
///
/// assert_eq!(tokenize("JWT-based Auth, v2!"), ["jwt", "based", "auth", "v2"]);
/// ```
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Term-frequency vector of one text, with its squared norm precomputed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TermVector {
    counts: HashMap<String, u64>,
    norm_sq: u64,
}

impl TermVector {
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let mut counts: HashMap<String, u64> = HashMap::new();
        for token in tokenize(text) {
            *counts.entry(token).or_default() += 1;
        }
        let norm_sq = counts.values().map(|c| c * c).sum();
        Self { counts, norm_sq }
    }

    /// `true` when the text had no tokens at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.norm_sq == 0
    }

    /// Number of distinct terms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[must_use]
    pub fn frequency(&self, term: &str) -> u64 {
        self.counts.get(term).copied().unwrap_or(0)
    }

    /// Cosine similarity in `[0, 1]`; `0.0` if either vector is empty.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn cosine(&self, other: &Self) -> f32 {
        if self.is_empty() || other.is_empty() {
            return 0.0;
        }

        let (small, large) = if self.counts.len() <= other.counts.len() {
            (&self.counts, &other.counts)
        } else {
            (&other.counts, &self.counts)
        };

        let dot: u64 = small
            .iter()
            .filter_map(|(term, a)| large.get(term).map(|b| a * b))
            .sum();
        if dot == 0 {
            return 0.0;
        }

        let denom = (self.norm_sq as f64 * other.norm_sq as f64).sqrt();
        ((dot as f64 / denom) as f32).clamp(0.0, 1.0)
    }
}

/// Cosine similarity of the term-frequency vectors of `a` and `b`.
///
/// ```
/// use memfuse_fusion::relevance::cosine_similarity;
///
/// let base = "JWT is a token format";
/// let near = cosine_similarity(base, "JWT is a token format for authentication");
/// let far = cosine_similarity(base, "OAuth is completely different");
/// assert!(near > 0.5);
/// assert!(near > far);
/// ```
#[must_use]
pub fn cosine_similarity(a: &str, b: &str) -> f32 {
    TermVector::from_text(a).cosine(&TermVector::from_text(b))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
