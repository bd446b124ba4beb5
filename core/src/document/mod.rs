//! Host document abstraction.
//!
//! The layout core never touches a CAD document directly. Everything it needs
//! (reading the selection and template, listing tagged output, creating text,
//! profiles and cut bodies) goes through the [`Document`] trait, so a host
//! add-in and the in-memory test document are interchangeable.

pub mod memory;

pub use memory::{EntityData, FailPoint, MemoryDocument, MemoryEntity};

use crate::geometry::{Point2, Rect};
use crate::layout::{HexProfile, ProfileRegion};
use crate::params::ParameterStore;
use crate::provenance::EntityId;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Adapter primitive that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocOp {
    ReadTexts,
    ReadFace,
    ListScope,
    Delete,
    CreateText,
    UpdateText,
    ReadProfiles,
    CreateHexProfile,
    ExtrudeCut,
    RenameBody,
    Transaction,
}

impl fmt::Display for DocOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::ReadTexts => "read sketch texts",
            Self::ReadFace => "read face",
            Self::ListScope => "list scope",
            Self::Delete => "delete entity",
            Self::CreateText => "create text",
            Self::UpdateText => "update text",
            Self::ReadProfiles => "read text profiles",
            Self::CreateHexProfile => "create hex profile",
            Self::ExtrudeCut => "extrude cut",
            Self::RenameBody => "rename body",
            Self::Transaction => "transaction",
        };
        f.write_str(s)
    }
}

/// Errors reported by a document adapter.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("{op}: {message}")]
pub struct DocError {
    pub op: DocOp,
    pub message: String,
}

impl DocError {
    pub fn new(op: DocOp, message: impl Into<String>) -> Self {
        Self { op, message: message.into() }
    }
}

/// Result type for adapter primitives.
pub type DocResult<T> = Result<T, DocError>;

/// What the user had selected when the action was invoked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Selection {
    #[default]
    Nothing,
    Sketch(EntityId),
    Edge(EntityId),
    /// A single entity of a kind neither tool accepts (face, body, ...).
    Other(String),
    Multiple(usize),
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nothing => write!(f, "nothing selected"),
            Self::Sketch(_) => write!(f, "a sketch"),
            Self::Edge(_) => write!(f, "an edge"),
            Self::Other(kind) => write!(f, "a {}", kind),
            Self::Multiple(n) => write!(f, "{} entities", n),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TextAlignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Styling of a sketch text. Opaque to the layout: copied verbatim from the template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font: String,
    pub height: f64,
    /// Radians
    pub rotation: f64,
    pub alignment: TextAlignment,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font: "Arial".to_string(),
            height: 5.0,
            rotation: 0.0,
            alignment: TextAlignment::default(),
        }
    }
}

/// A text entity as read from a sketch.
#[derive(Debug, Clone, PartialEq)]
pub struct TextEntity {
    pub handle: EntityId,
    pub label: String,
    pub position: Point2,
    pub style: TextStyle,
    /// Raw provenance attribute, if any.
    pub attribute: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Text,
    Profile,
    Body,
    Other,
}

/// Any entity found inside a sweep scope, with its raw provenance attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopedEntity {
    pub handle: EntityId,
    pub kind: EntityKind,
    pub attribute: Option<String>,
}

/// A planar face reached from a selected edge, in sketch coordinates of that face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceRegion {
    /// Face (or owning body) used as the sweep scope.
    pub face: EntityId,
    /// Parametric extent of the face.
    pub rect: Rect,
    pub edge_start: Point2,
    pub edge_end: Point2,
}

/// How far a cut goes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CutExtent {
    /// Fixed depth into the body, mm
    Depth(f64),
    /// Through the whole body
    ThroughAll,
}

/// Operations the layout core needs from a host document.
///
/// Implementations are single-threaded: a run owns the document for its whole
/// duration and wraps every mutation in one transaction.
pub trait Document {
    /// User parameter store of the document.
    fn parameters(&self) -> &ParameterStore;

    /// Active selection at invocation time.
    fn active_selection(&self) -> Selection;

    /// All text entities of a sketch, in creation order.
    fn sketch_texts(&self, sketch: EntityId) -> DocResult<Vec<TextEntity>>;

    /// Planar face adjacent to an edge. `None` if the edge has no planar face.
    fn face_region(&self, edge: EntityId) -> DocResult<Option<FaceRegion>>;

    /// Every entity that lives inside a scope (sketch or face).
    fn scope_entities(&self, scope: EntityId) -> DocResult<Vec<ScopedEntity>>;

    fn delete_entity(&mut self, handle: EntityId) -> DocResult<()>;

    /// Create a text cloned from `style`, tagged with the given provenance attribute.
    fn create_text(
        &mut self,
        sketch: EntityId,
        style: &TextStyle,
        label: &str,
        position: Point2,
        provenance: &str,
    ) -> DocResult<EntityId>;

    /// Replace the content of an existing text in place, keeping its style and position.
    fn update_text(&mut self, text: EntityId, label: &str) -> DocResult<()>;

    /// Closed profiles produced by a text's glyphs.
    fn text_profiles(&self, text: EntityId) -> DocResult<Vec<ProfileRegion>>;

    fn create_hex_profile(
        &mut self,
        scope: EntityId,
        profile: &HexProfile,
        provenance: &str,
    ) -> DocResult<EntityId>;

    /// Extrude the given profiles as a cut, producing one new body.
    fn extrude_cut(
        &mut self,
        scope: EntityId,
        profiles: &[EntityId],
        extent: CutExtent,
        provenance: &str,
    ) -> DocResult<EntityId>;

    fn rename_body(&mut self, body: EntityId, name: &str) -> DocResult<()>;

    fn begin_transaction(&mut self) -> DocResult<()>;

    fn commit_transaction(&mut self) -> DocResult<()>;

    /// Restore the document to its state at `begin_transaction`.
    fn rollback_transaction(&mut self) -> DocResult<()>;
}
