//! Near-duplicate collapse across memory layers.
//!
//! # Overview
//!
//! Two scored items are near-duplicates when the cosine similarity of their
//! content reaches the configured threshold. Groups are the transitive
//! closure of that relation (single linkage), built with a union-find:
//!
//! 1. Items whose normalized token streams hash to the same `blake3`
//!    fingerprint are merged without a similarity computation. Content with
//!    no tokens has no fingerprint; its cosine to anything is `0`, so it
//!    always stays a singleton.
//! 2. Every remaining pair in different groups is compared once.
//!
//! Each group collapses to its best member: highest score, then latest
//! timestamp, then earliest position in the input.

use std::cmp::Ordering;
use std::collections::HashMap;

use memfuse_core::ScoredItem;
use memfuse_core::options::DEFAULT_DEDUP_THRESHOLD;
use petgraph::unionfind::UnionFind;
use tracing::{trace, warn};

use crate::relevance::{TermVector, tokenize};

/// Collapses near-duplicate [`ScoredItem`]s to one representative each.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SemanticDeduplicator {
    threshold: f32,
}

impl Default for SemanticDeduplicator {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_DEDUP_THRESHOLD,
        }
    }
}

impl SemanticDeduplicator {
    /// Deduplicator with the given threshold, clamped into `(0, 1]`.
    #[must_use]
    pub fn new(threshold: f32) -> Self {
        let mut dedup = Self::default();
        dedup.set_threshold(threshold);
        dedup
    }

    /// Values above `1.0` clamp to `1.0`; NaN and values `<= 0` keep the
    /// default.
    pub fn set_threshold(&mut self, threshold: f32) {
        self.threshold = if threshold.is_nan() || threshold <= 0.0 {
            warn!(threshold, "dedup threshold outside (0, 1]; using default");
            DEFAULT_DEDUP_THRESHOLD
        } else {
            threshold.min(1.0)
        };
    }

    #[must_use]
    pub const fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Partition `items` into near-duplicate groups, singletons included.
    ///
    /// Groups are ordered by their earliest member; members keep input order.
    #[must_use]
    pub fn group_all(&self, items: &[ScoredItem]) -> Vec<Vec<ScoredItem>> {
        self.cluster(items)
            .into_iter()
            .map(|group| group.into_iter().map(|idx| items[idx].clone()).collect())
            .collect()
    }

    /// Only the groups that actually contain duplicates (two or more members).
    #[must_use]
    pub fn find_duplicate_groups(&self, items: &[ScoredItem]) -> Vec<Vec<ScoredItem>> {
        self.cluster(items)
            .into_iter()
            .filter(|group| group.len() > 1)
            .map(|group| group.into_iter().map(|idx| items[idx].clone()).collect())
            .collect()
    }

    /// Keep one representative per group.
    ///
    /// Output length never exceeds input length. Order is not meaningful;
    /// rank the result before presenting it.
    #[must_use]
    pub fn deduplicate(&self, items: &[ScoredItem]) -> Vec<ScoredItem> {
        self.representatives(items)
            .into_iter()
            .map(|idx| items[idx].clone())
            .collect()
    }

    /// Indices into `items` of the member kept from each group, in group
    /// order.
    #[must_use]
    pub fn representatives(&self, items: &[ScoredItem]) -> Vec<usize> {
        self.cluster(items)
            .into_iter()
            .filter_map(|group| {
                group
                    .into_iter()
                    .reduce(|best, idx| match prefer(&items[idx], &items[best]) {
                        Ordering::Greater => idx,
                        _ => best,
                    })
            })
            .collect()
    }

    fn cluster(&self, items: &[ScoredItem]) -> Vec<Vec<usize>> {
        let n = items.len();
        if n == 0 {
            return Vec::new();
        }

        let mut sets: UnionFind<usize> = UnionFind::new(n);

        let mut seen: HashMap<blake3::Hash, usize> = HashMap::with_capacity(n);
        for (idx, item) in items.iter().enumerate() {
            let Some(print) = fingerprint(&item.content) else {
                continue;
            };
            if let Some(&first) = seen.get(&print) {
                sets.union(first, idx);
            } else {
                seen.insert(print, idx);
            }
        }

        let vectors: Vec<TermVector> = items
            .iter()
            .map(|item| TermVector::from_text(&item.content))
            .collect();

        let mut comparisons = 0_usize;
        for i in 0..n {
            for j in (i + 1)..n {
                if sets.equiv(i, j) {
                    continue;
                }
                comparisons += 1;
                if vectors[i].cosine(&vectors[j]) >= self.threshold {
                    sets.union(i, j);
                }
            }
        }

        let mut slot_of_root: HashMap<usize, usize> = HashMap::new();
        let mut groups: Vec<Vec<usize>> = Vec::new();
        for idx in 0..n {
            let root = sets.find(idx);
            let slot = *slot_of_root.entry(root).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[slot].push(idx);
        }

        trace!(
            items = n,
            groups = groups.len(),
            comparisons,
            threshold = self.threshold,
            "dedup clustering complete"
        );
        groups
    }
}

/// `Greater` when `a` should be kept over `b`. Ties on score fall to the
/// later timestamp; full ties return `Equal` so the earlier index wins.
fn prefer(a: &ScoredItem, b: &ScoredItem) -> Ordering {
    a.score
        .total_cmp(&b.score)
        .then_with(|| a.timestamp.cmp(&b.timestamp))
}

/// `None` when `content` has no tokens.
fn fingerprint(content: &str) -> Option<blake3::Hash> {
    let tokens = tokenize(content);
    if tokens.is_empty() {
        return None;
    }
    let mut hasher = blake3::Hasher::new();
    for token in tokens {
        hasher.update(token.as_bytes());
        hasher.update(b"\0");
    }
    Some(hasher.finalize())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
