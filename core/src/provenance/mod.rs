use uuid::Uuid;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod naming;
pub use naming::*;

pub mod generator;
pub use generator::IdGenerator;

/// Opaque handle of an entity living in the host document (sketch, text, profile, body, edge).
/// We wrap Uuid to keep handles strongly typed across the adapter boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    /// Generate a new random EntityId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an ID from a specific UUID (useful for restoration).
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Create a deterministic ID based on a string seed (e.g. "Sketch1").
    pub fn new_deterministic(seed: &str) -> Self {
        let uuid = Uuid::new_v5(&Uuid::NAMESPACE_OID, seed.as_bytes());
        Self(uuid)
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The two generators that share the regeneration machinery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolKind {
    /// Numbered labels spaced along an axis.
    Sequence,
    /// Honeycomb of hexagonal cutouts.
    Honeycomb,
}

impl ToolKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sequence => "PatternedCount",
            Self::Honeycomb => "HexPattern",
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Marker that distinguishes tool-created entities from user geometry.
///
/// The tag is derived from the tool name alone, so every run (and every process)
/// of the same tool produces the same tag. That is what lets a later run find
/// the output of an earlier one without holding any in-memory references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProvenanceTag(pub Uuid);

impl ProvenanceTag {
    pub fn for_tool(tool: ToolKind) -> Self {
        let seed = format!("{}:{}", ATTRIBUTE_GROUP, tool.name());
        Self(Uuid::new_v5(&Uuid::NAMESPACE_OID, seed.as_bytes()))
    }
}

impl fmt::Display for ProvenanceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
