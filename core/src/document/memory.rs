//! In-memory [`Document`] used by tests and by hosts that want a dry run.

use super::{
    CutExtent, DocError, DocOp, DocResult, Document, EntityKind, FaceRegion, ScopedEntity,
    Selection, TextEntity, TextStyle,
};
use crate::geometry::{Point2, Rect, Vector2};
use crate::layout::{HexProfile, ProfileRegion};
use crate::params::ParameterStore;
use crate::provenance::{EntityId, IdGenerator};
use std::cell::RefCell;
use std::collections::HashMap;

/// Payload of an entity held by [`MemoryDocument`].
#[derive(Debug, Clone, PartialEq)]
pub enum EntityData {
    Sketch { name: String },
    Text { label: String, position: Point2, style: TextStyle },
    HexProfile(HexProfile),
    Body { name: String, profiles: Vec<EntityId>, extent: CutExtent },
    Face { rect: Rect },
    /// `face` is `None` for an edge that bounds no planar face.
    Edge { face: Option<EntityId>, start: Point2, end: Point2 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryEntity {
    pub handle: EntityId,
    /// Sketch or face the entity lives in.
    pub scope: Option<EntityId>,
    pub data: EntityData,
    pub attribute: Option<String>,
}

impl MemoryEntity {
    fn kind(&self) -> EntityKind {
        match self.data {
            EntityData::Text { .. } => EntityKind::Text,
            EntityData::HexProfile(_) => EntityKind::Profile,
            EntityData::Body { .. } => EntityKind::Body,
            _ => EntityKind::Other,
        }
    }
}

/// Make the `nth` (zero-based) call of `op` fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailPoint {
    pub op: DocOp,
    pub nth: usize,
}

impl FailPoint {
    pub fn new(op: DocOp, nth: usize) -> Self {
        Self { op, nth }
    }
}

/// A document held entirely in memory.
///
/// Transactions are a single level deep and roll back by restoring a snapshot
/// of the entity list taken at `begin_transaction`.
#[derive(Debug)]
pub struct MemoryDocument {
    ids: IdGenerator,
    parameters: ParameterStore,
    entities: Vec<MemoryEntity>,
    selection: Selection,
    snapshot: Option<Vec<MemoryEntity>>,
    fail_point: Option<FailPoint>,
    calls: RefCell<HashMap<DocOp, usize>>,
    commits: usize,
    rollbacks: usize,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self {
            ids: IdGenerator::new("MemoryDocument"),
            parameters: ParameterStore::new(),
            entities: Vec::new(),
            selection: Selection::Nothing,
            snapshot: None,
            fail_point: None,
            calls: RefCell::new(HashMap::new()),
            commits: 0,
            rollbacks: 0,
        }
    }

    pub fn parameters_mut(&mut self) -> &mut ParameterStore {
        &mut self.parameters
    }

    pub fn select(&mut self, selection: Selection) {
        self.selection = selection;
    }

    /// Arm a failure. Call counters restart from zero.
    pub fn fail_on(&mut self, point: FailPoint) {
        self.fail_point = Some(point);
        self.calls.borrow_mut().clear();
    }

    pub fn clear_failure(&mut self) {
        self.fail_point = None;
    }

    pub fn add_sketch(&mut self, name: &str) -> EntityId {
        self.push(None, EntityData::Sketch { name: name.to_string() }, None)
    }

    /// Add a user-authored text with the default style.
    pub fn add_text(&mut self, sketch: EntityId, label: &str, position: Point2) -> EntityId {
        self.add_styled_text(sketch, label, position, TextStyle::default())
    }

    pub fn add_styled_text(
        &mut self,
        sketch: EntityId,
        label: &str,
        position: Point2,
        style: TextStyle,
    ) -> EntityId {
        let data = EntityData::Text { label: label.to_string(), position, style };
        self.push(Some(sketch), data, None)
    }

    /// Add a text with an arbitrary raw attribute.
    pub fn add_tagged_text(
        &mut self,
        sketch: EntityId,
        label: &str,
        position: Point2,
        attribute: &str,
    ) -> EntityId {
        let data = EntityData::Text {
            label: label.to_string(),
            position,
            style: TextStyle::default(),
        };
        self.push(Some(sketch), data, Some(attribute.to_string()))
    }

    pub fn add_face(&mut self, rect: Rect) -> EntityId {
        self.push(None, EntityData::Face { rect }, None)
    }

    pub fn add_edge(&mut self, face: EntityId, start: Point2, end: Point2) -> EntityId {
        self.push(Some(face), EntityData::Edge { face: Some(face), start, end }, None)
    }

    /// An edge with no planar face next to it (e.g. on a cylinder).
    pub fn add_curved_edge(&mut self) -> EntityId {
        let data = EntityData::Edge {
            face: None,
            start: Point2::origin(),
            end: Point2::new(1.0, 0.0),
        };
        self.push(None, data, None)
    }

    /// Add a rectangular face and its four edges: bottom, right, top, left.
    pub fn add_face_with_edges(&mut self, rect: Rect) -> (EntityId, [EntityId; 4]) {
        let face = self.add_face(rect);
        let (lo, hi) = (rect.min, rect.max);
        let corners = [lo, Point2::new(hi.x, lo.y), hi, Point2::new(lo.x, hi.y)];
        let edges = [
            self.add_edge(face, corners[0], corners[1]),
            self.add_edge(face, corners[1], corners[2]),
            self.add_edge(face, corners[2], corners[3]),
            self.add_edge(face, corners[3], corners[0]),
        ];
        (face, edges)
    }

    /// A user-made body in a scope, untagged.
    pub fn add_body(&mut self, scope: EntityId, name: &str) -> EntityId {
        let data = EntityData::Body {
            name: name.to_string(),
            profiles: Vec::new(),
            extent: CutExtent::ThroughAll,
        };
        self.push(Some(scope), data, None)
    }

    pub fn entities(&self) -> &[MemoryEntity] {
        &self.entities
    }

    pub fn entity(&self, handle: EntityId) -> Option<&MemoryEntity> {
        self.entities.iter().find(|e| e.handle == handle)
    }

    /// Texts of a sketch in creation order.
    pub fn texts(&self, sketch: EntityId) -> Vec<TextEntity> {
        self.entities
            .iter()
            .filter(|e| e.scope == Some(sketch))
            .filter_map(as_text)
            .collect()
    }

    /// Names of every body in a scope, in creation order.
    pub fn body_names(&self, scope: EntityId) -> Vec<String> {
        self.entities
            .iter()
            .filter(|e| e.scope == Some(scope))
            .filter_map(|e| match &e.data {
                EntityData::Body { name, .. } => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn hex_profiles(&self, scope: EntityId) -> Vec<HexProfile> {
        self.entities
            .iter()
            .filter(|e| e.scope == Some(scope))
            .filter_map(|e| match &e.data {
                EntityData::HexProfile(p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    pub fn in_transaction(&self) -> bool {
        self.snapshot.is_some()
    }

    pub fn commits(&self) -> usize {
        self.commits
    }

    pub fn rollbacks(&self) -> usize {
        self.rollbacks
    }

    fn push(&mut self, scope: Option<EntityId>, data: EntityData, attribute: Option<String>) -> EntityId {
        let handle = self.ids.next_id();
        self.entities.push(MemoryEntity { handle, scope, data, attribute });
        handle
    }

    fn check(&self, op: DocOp) -> DocResult<()> {
        let mut calls = self.calls.borrow_mut();
        let count = calls.entry(op).or_insert(0);
        let nth = *count;
        *count += 1;
        match self.fail_point {
            Some(point) if point.op == op && point.nth == nth => {
                Err(DocError::new(op, "injected failure"))
            }
            _ => Ok(()),
        }
    }

    fn find(&self, op: DocOp, handle: EntityId) -> DocResult<&MemoryEntity> {
        self.entity(handle)
            .ok_or_else(|| DocError::new(op, format!("no entity {}", handle)))
    }

    fn find_mut(&mut self, op: DocOp, handle: EntityId) -> DocResult<&mut MemoryEntity> {
        self.entities
            .iter_mut()
            .find(|e| e.handle == handle)
            .ok_or_else(|| DocError::new(op, format!("no entity {}", handle)))
    }

    fn require_scope(&self, op: DocOp, scope: EntityId) -> DocResult<()> {
        match self.find(op, scope)?.data {
            EntityData::Sketch { .. } | EntityData::Face { .. } => Ok(()),
            _ => Err(DocError::new(op, format!("{} is not a sketch or face", scope))),
        }
    }
}

fn as_text(entity: &MemoryEntity) -> Option<TextEntity> {
    match &entity.data {
        EntityData::Text { label, position, style } => Some(TextEntity {
            handle: entity.handle,
            label: label.clone(),
            position: *position,
            style: style.clone(),
            attribute: entity.attribute.clone(),
        }),
        _ => None,
    }
}

/// Number of enclosed counters a glyph produces as extra profiles.
fn counters(c: char) -> usize {
    match c {
        '8' | 'B' => 2,
        '0' | '4' | '6' | '9' | 'A' | 'D' | 'O' | 'P' | 'Q' | 'R' | 'a' | 'b' | 'd' | 'e' | 'g' | 'o' | 'p' | 'q' => 1,
        _ => 0,
    }
}

/// Box-shaped glyph outlines: one outer profile per visible character plus one
/// strictly-inside profile per counter. Rotation is ignored.
fn glyph_profiles(handle: EntityId, label: &str, position: Point2, style: &TextStyle) -> Vec<ProfileRegion> {
    let h = style.height;
    let advance = 0.6 * h;
    let mut profiles = Vec::new();

    for (i, c) in label.chars().enumerate() {
        if c.is_whitespace() {
            continue;
        }
        let origin = position + Vector2::new(i as f64 * advance, 0.0);
        let at = |x0: f64, y0: f64, x1: f64, y1: f64| {
            Rect::new(origin + Vector2::new(x0 * h, y0 * h), origin + Vector2::new(x1 * h, y1 * h))
        };
        let mut boxes = vec![at(0.0, 0.0, 0.5, 1.0)];
        match counters(c) {
            1 => boxes.push(at(0.1, 0.2, 0.4, 0.8)),
            2 => {
                boxes.push(at(0.1, 0.55, 0.4, 0.9));
                boxes.push(at(0.1, 0.1, 0.4, 0.45));
            }
            _ => {}
        }
        for (k, bounds) in boxes.into_iter().enumerate() {
            let seed = format!("{}/glyph/{}/{}", handle, i, k);
            profiles.push(ProfileRegion { handle: EntityId::new_deterministic(&seed), bounds });
        }
    }
    profiles
}

impl Document for MemoryDocument {
    fn parameters(&self) -> &ParameterStore {
        &self.parameters
    }

    fn active_selection(&self) -> Selection {
        self.selection.clone()
    }

    fn sketch_texts(&self, sketch: EntityId) -> DocResult<Vec<TextEntity>> {
        self.check(DocOp::ReadTexts)?;
        match self.find(DocOp::ReadTexts, sketch)?.data {
            EntityData::Sketch { .. } => Ok(self.texts(sketch)),
            _ => Err(DocError::new(DocOp::ReadTexts, format!("{} is not a sketch", sketch))),
        }
    }

    fn face_region(&self, edge: EntityId) -> DocResult<Option<FaceRegion>> {
        self.check(DocOp::ReadFace)?;
        let (face, start, end) = match self.find(DocOp::ReadFace, edge)?.data {
            EntityData::Edge { face, start, end } => (face, start, end),
            _ => return Err(DocError::new(DocOp::ReadFace, format!("{} is not an edge", edge))),
        };
        let Some(face) = face else {
            return Ok(None);
        };
        match self.find(DocOp::ReadFace, face)?.data {
            EntityData::Face { rect } => Ok(Some(FaceRegion {
                face,
                rect,
                edge_start: start,
                edge_end: end,
            })),
            _ => Ok(None),
        }
    }

    fn scope_entities(&self, scope: EntityId) -> DocResult<Vec<ScopedEntity>> {
        self.check(DocOp::ListScope)?;
        self.require_scope(DocOp::ListScope, scope)?;
        Ok(self
            .entities
            .iter()
            .filter(|e| e.scope == Some(scope))
            .map(|e| ScopedEntity {
                handle: e.handle,
                kind: e.kind(),
                attribute: e.attribute.clone(),
            })
            .collect())
    }

    fn delete_entity(&mut self, handle: EntityId) -> DocResult<()> {
        self.check(DocOp::Delete)?;
        let before = self.entities.len();
        self.entities.retain(|e| e.handle != handle);
        if self.entities.len() == before {
            return Err(DocError::new(DocOp::Delete, format!("no entity {}", handle)));
        }
        Ok(())
    }

    fn create_text(
        &mut self,
        sketch: EntityId,
        style: &TextStyle,
        label: &str,
        position: Point2,
        provenance: &str,
    ) -> DocResult<EntityId> {
        self.check(DocOp::CreateText)?;
        if !matches!(self.find(DocOp::CreateText, sketch)?.data, EntityData::Sketch { .. }) {
            return Err(DocError::new(DocOp::CreateText, format!("{} is not a sketch", sketch)));
        }
        let data = EntityData::Text {
            label: label.to_string(),
            position,
            style: style.clone(),
        };
        Ok(self.push(Some(sketch), data, Some(provenance.to_string())))
    }

    fn update_text(&mut self, text: EntityId, new_label: &str) -> DocResult<()> {
        self.check(DocOp::UpdateText)?;
        match &mut self.find_mut(DocOp::UpdateText, text)?.data {
            EntityData::Text { label, .. } => {
                *label = new_label.to_string();
                Ok(())
            }
            _ => Err(DocError::new(DocOp::UpdateText, format!("{} is not a text", text))),
        }
    }

    fn text_profiles(&self, text: EntityId) -> DocResult<Vec<ProfileRegion>> {
        self.check(DocOp::ReadProfiles)?;
        match &self.find(DocOp::ReadProfiles, text)?.data {
            EntityData::Text { label, position, style } => {
                Ok(glyph_profiles(text, label, *position, style))
            }
            _ => Err(DocError::new(DocOp::ReadProfiles, format!("{} is not a text", text))),
        }
    }

    fn create_hex_profile(
        &mut self,
        scope: EntityId,
        profile: &HexProfile,
        provenance: &str,
    ) -> DocResult<EntityId> {
        self.check(DocOp::CreateHexProfile)?;
        self.require_scope(DocOp::CreateHexProfile, scope)?;
        if !(profile.radius.is_finite() && profile.radius > 0.0) {
            return Err(DocError::new(DocOp::CreateHexProfile, "hexagon radius must be positive"));
        }
        Ok(self.push(Some(scope), EntityData::HexProfile(*profile), Some(provenance.to_string())))
    }

    fn extrude_cut(
        &mut self,
        scope: EntityId,
        profiles: &[EntityId],
        extent: CutExtent,
        provenance: &str,
    ) -> DocResult<EntityId> {
        self.check(DocOp::ExtrudeCut)?;
        self.require_scope(DocOp::ExtrudeCut, scope)?;
        if profiles.is_empty() {
            return Err(DocError::new(DocOp::ExtrudeCut, "no profiles to cut"));
        }
        if let CutExtent::Depth(depth) = extent {
            if !(depth.is_finite() && depth > 0.0) {
                return Err(DocError::new(DocOp::ExtrudeCut, format!("invalid cut depth {}", depth)));
            }
        }
        let name = format!("Body{}", self.ids.issued() + 1);
        let data = EntityData::Body {
            name,
            profiles: profiles.to_vec(),
            extent,
        };
        Ok(self.push(Some(scope), data, Some(provenance.to_string())))
    }

    fn rename_body(&mut self, body: EntityId, new_name: &str) -> DocResult<()> {
        self.check(DocOp::RenameBody)?;
        match &mut self.find_mut(DocOp::RenameBody, body)?.data {
            EntityData::Body { name, .. } => {
                *name = new_name.to_string();
                Ok(())
            }
            _ => Err(DocError::new(DocOp::RenameBody, format!("{} is not a body", body))),
        }
    }

    fn begin_transaction(&mut self) -> DocResult<()> {
        self.check(DocOp::Transaction)?;
        if self.snapshot.is_some() {
            return Err(DocError::new(DocOp::Transaction, "a transaction is already open"));
        }
        self.snapshot = Some(self.entities.clone());
        Ok(())
    }

    fn commit_transaction(&mut self) -> DocResult<()> {
        self.check(DocOp::Transaction)?;
        match self.snapshot.take() {
            Some(_) => {
                self.commits += 1;
                Ok(())
            }
            None => Err(DocError::new(DocOp::Transaction, "no open transaction")),
        }
    }

    fn rollback_transaction(&mut self) -> DocResult<()> {
        match self.snapshot.take() {
            Some(entities) => {
                self.entities = entities;
                self.rollbacks += 1;
                Ok(())
            }
            None => Err(DocError::new(DocOp::Transaction, "no open transaction")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::filter_outer_profiles;

    #[test]
    fn test_rollback_restores_snapshot() {
        let mut doc = MemoryDocument::new();
        let sketch = doc.add_sketch("Sketch1");
        let text = doc.add_text(sketch, "1", Point2::origin());

        doc.begin_transaction().unwrap();
        doc.update_text(text, "2").unwrap();
        doc.delete_entity(text).unwrap();
        assert!(doc.texts(sketch).is_empty());
        doc.rollback_transaction().unwrap();

        let texts = doc.texts(sketch);
        assert_eq!(texts.len(), 1);
        assert_eq!(texts[0].label, "1");
        assert!(!doc.in_transaction());
        assert_eq!(doc.rollbacks(), 1);
    }

    #[test]
    fn test_nested_transaction_rejected() {
        let mut doc = MemoryDocument::new();
        doc.begin_transaction().unwrap();
        assert!(doc.begin_transaction().is_err());
        doc.commit_transaction().unwrap();
        assert!(doc.commit_transaction().is_err());
        assert_eq!(doc.commits(), 1);
    }

    #[test]
    fn test_fail_point_hits_nth_call() {
        let mut doc = MemoryDocument::new();
        let sketch = doc.add_sketch("Sketch1");
        doc.fail_on(FailPoint::new(DocOp::CreateText, 1));

        let style = TextStyle::default();
        assert!(doc.create_text(sketch, &style, "a", Point2::origin(), "{}").is_ok());
        let err = doc.create_text(sketch, &style, "b", Point2::origin(), "{}").unwrap_err();
        assert_eq!(err.op, DocOp::CreateText);
        assert!(doc.create_text(sketch, &style, "c", Point2::origin(), "{}").is_ok());
    }

    #[test]
    fn test_face_region_from_edge() {
        let mut doc = MemoryDocument::new();
        let rect = Rect::new(Point2::origin(), Point2::new(30.0, 20.0));
        let (face, edges) = doc.add_face_with_edges(rect);

        let region = doc.face_region(edges[1]).unwrap().unwrap();
        assert_eq!(region.face, face);
        assert_eq!(region.edge_start, Point2::new(30.0, 0.0));
        assert_eq!(region.edge_end, Point2::new(30.0, 20.0));

        let curved = doc.add_curved_edge();
        assert_eq!(doc.face_region(curved).unwrap(), None);
        assert!(doc.face_region(face).is_err());
    }

    #[test]
    fn test_glyph_profiles_have_counters() {
        let mut doc = MemoryDocument::new();
        let sketch = doc.add_sketch("Sketch1");
        let text = doc.add_text(sketch, "1 08", Point2::origin());

        let profiles = doc.text_profiles(text).unwrap();
        // "1" -> 1, "0" -> 2, "8" -> 3
        assert_eq!(profiles.len(), 6);
        assert_eq!(filter_outer_profiles(&profiles).len(), 3);
    }

    #[test]
    fn test_extrude_cut_validation() {
        let mut doc = MemoryDocument::new();
        let sketch = doc.add_sketch("Sketch1");
        let text = doc.add_text(sketch, "1", Point2::origin());
        let profile = doc.text_profiles(text).unwrap()[0].handle;

        assert!(doc.extrude_cut(sketch, &[], CutExtent::ThroughAll, "{}").is_err());
        assert!(doc.extrude_cut(sketch, &[profile], CutExtent::Depth(0.0), "{}").is_err());
        assert!(doc.extrude_cut(text, &[profile], CutExtent::ThroughAll, "{}").is_err());

        let body = doc.extrude_cut(sketch, &[profile], CutExtent::Depth(1.0), "{}").unwrap();
        doc.rename_body(body, "num#1").unwrap();
        assert_eq!(doc.body_names(sketch), vec!["num#1".to_string()]);
    }
}
