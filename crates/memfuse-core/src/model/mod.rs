//! Data model exchanged between the router, the layer queriers, and the
//! fusion pipeline.
//!
//! Every value here lives for one fusion call. Inputs are borrowed and
//! never mutated; outputs are freshly allocated.

mod item;
mod layer;
mod result;
mod routing;

pub use item::{MemoryItem, Metadata, ScoredItem};
pub use layer::{LayerWeights, MemoryLayer, ParseEnumError, QueryType};
pub use result::{FusedResult, FusionStats};
pub use routing::{Classification, LayerResult, RoutingResult, RoutingStats};
