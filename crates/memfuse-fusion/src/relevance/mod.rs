//! Relevance of free text to a query.
//!
//! [`similarity`] holds the tokenizer and the term-frequency cosine primitive;
//! [`scorer`] turns raw [`MemoryItem`](memfuse_core::MemoryItem)s into
//! [`ScoredItem`](memfuse_core::ScoredItem)s.

pub mod scorer;
pub mod similarity;

pub use scorer::{PRIOR_SHARE, RelevanceScorer, SIMILARITY_SHARE, blend};
pub use similarity::{TermVector, cosine_similarity, tokenize};
