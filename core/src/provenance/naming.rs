use serde::{Deserialize, Serialize};
use std::fmt;
use super::{ProvenanceTag, ToolKind};

/// Attribute group under which adapters store provenance on host entities.
pub const ATTRIBUTE_GROUP: &str = "pattern-core";

/// Back-reference from a generated entity to the plan element that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Origin {
    Segment { index: u32 },
    Cell { row: u32, col: u32 },
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Segment { index } => write!(f, "segment {}", index),
            Self::Cell { row, col } => write!(f, "hex cell (row {}, col {})", row, col),
        }
    }
}

/// Full provenance record attached to every tool-created entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    pub tag: ProvenanceTag,
    pub tool: ToolKind,
    pub origin: Origin,
}

impl Provenance {
    pub fn new(tool: ToolKind, origin: Origin) -> Self {
        Self {
            tag: ProvenanceTag::for_tool(tool),
            tool,
            origin,
        }
    }

    /// Encode as the attribute value stored on the host entity.
    pub fn to_attribute(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode the attribute value read back from a host entity.
    pub fn decode(value: Option<&str>) -> TagState {
        match value {
            None => TagState::Untagged,
            Some(raw) => match serde_json::from_str::<Provenance>(raw) {
                Ok(p) => TagState::Tagged(p),
                Err(e) => TagState::Unreadable(e.to_string()),
            },
        }
    }
}

/// What an entity's provenance attribute says about it.
#[derive(Debug, Clone, PartialEq)]
pub enum TagState {
    /// No attribute: user-authored geometry.
    Untagged,
    Tagged(Provenance),
    /// An attribute exists in our group but cannot be decoded.
    Unreadable(String),
}

impl TagState {
    pub fn is_tagged_with(&self, tag: &ProvenanceTag) -> bool {
        matches!(self, TagState::Tagged(p) if p.tag == *tag)
    }
}

/// Deterministic name for the cut body of a numbered segment (e.g. `num#7`).
pub fn segment_body_name(prefix: &str, label: &str) -> String {
    format!("{}{}", prefix, label)
}

/// Deterministic name for the cut body of a hexagon cell (e.g. `hex#cut-0-3`).
pub fn cell_body_name(prefix: &str, row: u32, col: u32) -> String {
    format!("{}cut-{}-{}", prefix, row, col)
}
