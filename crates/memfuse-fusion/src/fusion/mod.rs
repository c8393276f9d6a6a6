//! Turning a [`RoutingResult`](memfuse_core::RoutingResult) into a
//! [`FusedResult`](memfuse_core::FusedResult).

mod budget;
pub mod engine;
pub mod merger;

pub use budget::{CHARS_PER_TOKEN, estimate_tokens, truncate_to_budget};
pub use engine::FusionEngine;
pub use merger::ResultMerger;
