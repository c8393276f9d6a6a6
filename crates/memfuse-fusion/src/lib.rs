#![forbid(unsafe_code)]
//! memfuse-fusion library.
//!
//! Fuses the per-layer results of a routed memory query into one ranked,
//! deduplicated list that fits a token budget.
//!
//! - [`relevance`]: tokenizer, term-frequency cosine, and [`RelevanceScorer`].
//! - [`dedup`]: single-linkage near-duplicate collapse.
//! - [`fusion`]: [`ResultMerger`] (no dedup) and [`FusionEngine`] (full
//!   pipeline).
//!
//! ```
//! use memfuse_core::{FusionOptionsPatch, LayerResult, MemoryItem, MemoryLayer, RoutingResult};
//! use memfuse_fusion::FusionEngine;
//!
//! let routing = RoutingResult::new("refresh token rotation")
//!     .with_layer(LayerResult::ok(
//!         MemoryLayer::Session,
//!         vec![MemoryItem::new("Refresh tokens rotate on every use")],
//!     ))
//!     .with_layer(LayerResult::failed(MemoryLayer::Graph, "timeout"));
//!
//! let fused = FusionEngine::new().fuse(&routing, &FusionOptionsPatch::default());
//! assert_eq!(fused.items.len(), 1);
//! assert_eq!(fused.items[0].layer, Some(MemoryLayer::Session));
//! ```
//!
//! # Conventions
//!
//! - **Errors**: fusion never fails; bad layers are skipped and logged.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `debug!`, `trace!`).

pub mod dedup;
pub mod fusion;
pub mod relevance;

pub use dedup::SemanticDeduplicator;
pub use fusion::{FusionEngine, ResultMerger, estimate_tokens, truncate_to_budget};
pub use relevance::{RelevanceScorer, cosine_similarity};
