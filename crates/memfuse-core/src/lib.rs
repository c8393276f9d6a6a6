#![forbid(unsafe_code)]
//! memfuse-core library.
//!
//! Shared vocabulary for the fusion pipeline: memory layers, per-layer
//! results handed over by the router, scored/fused output, and the
//! [`FusionOptions`](options::FusionOptions) that bound a fusion call.
//!
//! # Conventions
//!
//! - **Errors**: fusion itself is infallible; loaders return `anyhow::Result`,
//!   strict validation returns [`error::ConfigError`].
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `debug!`, `trace!`).

pub mod config;
pub mod error;
pub mod model;
pub mod options;

pub use model::{
    Classification, FusedResult, FusionStats, LayerResult, LayerWeights, MemoryItem, MemoryLayer,
    Metadata, QueryType, RoutingResult, RoutingStats, ScoredItem,
};
pub use options::{FusionOptions, FusionOptionsPatch};
