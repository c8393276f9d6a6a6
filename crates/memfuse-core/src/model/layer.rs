use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The independent memory sources a query can be dispatched to.
///
/// A layer only records provenance. It never owns items; the fusion
/// pipeline uses it for weighting, filtering, and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryLayer {
    Session,
    Project,
    User,
    Vector,
    Graph,
    Governance,
}

impl MemoryLayer {
    /// Every layer, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Session,
        Self::Project,
        Self::User,
        Self::Vector,
        Self::Graph,
        Self::Governance,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Session => "session",
            Self::Project => "project",
            Self::User => "user",
            Self::Vector => "vector",
            Self::Graph => "graph",
            Self::Governance => "governance",
        }
    }
}

/// Query intent as decided by the upstream classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryType {
    Factual,
    Procedural,
    Conceptual,
    Troubleshooting,
    Contextual,
    #[default]
    General,
}

impl QueryType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Factual => "factual",
            Self::Procedural => "procedural",
            Self::Conceptual => "conceptual",
            Self::Troubleshooting => "troubleshooting",
            Self::Contextual => "contextual",
            Self::General => "general",
        }
    }
}

/// Error returned when parsing an enum value from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub expected: &'static str,
    pub got: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: '{}'", self.expected, self.got)
    }
}

impl std::error::Error for ParseEnumError {}

impl fmt::Display for MemoryLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn normalize(input: &str) -> String {
    input.trim().to_ascii_lowercase()
}

impl FromStr for MemoryLayer {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        Self::ALL
            .into_iter()
            .find(|layer| layer.as_str() == normalized)
            .ok_or_else(|| ParseEnumError {
                expected: "memory layer",
                got: s.to_string(),
            })
    }
}

impl FromStr for QueryType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        match normalized.as_str() {
            "factual" => Ok(Self::Factual),
            "procedural" => Ok(Self::Procedural),
            "conceptual" => Ok(Self::Conceptual),
            "troubleshooting" => Ok(Self::Troubleshooting),
            "contextual" => Ok(Self::Contextual),
            "general" => Ok(Self::General),
            _ => Err(ParseEnumError {
                expected: "query type",
                got: s.to_string(),
            }),
        }
    }
}

/// One weight per [`MemoryLayer`].
///
/// A record rather than a map so that every layer always has an entry.
/// Unset layers weigh `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerWeights {
    pub session: f32,
    pub project: f32,
    pub user: f32,
    pub vector: f32,
    pub graph: f32,
    pub governance: f32,
}

impl LayerWeights {
    #[must_use]
    pub const fn get(&self, layer: MemoryLayer) -> f32 {
        match layer {
            MemoryLayer::Session => self.session,
            MemoryLayer::Project => self.project,
            MemoryLayer::User => self.user,
            MemoryLayer::Vector => self.vector,
            MemoryLayer::Graph => self.graph,
            MemoryLayer::Governance => self.governance,
        }
    }

    pub const fn set(&mut self, layer: MemoryLayer, weight: f32) {
        let slot = match layer {
            MemoryLayer::Session => &mut self.session,
            MemoryLayer::Project => &mut self.project,
            MemoryLayer::User => &mut self.user,
            MemoryLayer::Vector => &mut self.vector,
            MemoryLayer::Graph => &mut self.graph,
            MemoryLayer::Governance => &mut self.governance,
        };
        *slot = weight;
    }

    /// Builder-style [`set`](Self::set).
    #[must_use]
    pub const fn with(mut self, layer: MemoryLayer, weight: f32) -> Self {
        self.set(layer, weight);
        self
    }

    /// `(layer, weight)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (MemoryLayer, f32)> + '_ {
        MemoryLayer::ALL.into_iter().map(|layer| (layer, self.get(layer)))
    }
}
