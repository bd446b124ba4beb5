use crate::document::{DocResult, Document, EntityKind};
use crate::provenance::{EntityId, Origin, Provenance, ProvenanceTag, TagState, ToolKind};
use tracing::{debug, warn};

/// Tags one tool's output and sweeps it away on the next run.
///
/// Holds nothing between runs: the tag is a pure function of the tool, so a
/// fresh tracker recognises output written by any earlier process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegenerationTracker {
    tool: ToolKind,
    tag: ProvenanceTag,
}

impl RegenerationTracker {
    pub fn new(tool: ToolKind) -> Self {
        Self {
            tool,
            tag: ProvenanceTag::for_tool(tool),
        }
    }

    pub fn provenance(&self, origin: Origin) -> Provenance {
        Provenance::new(self.tool, origin)
    }

    /// Attribute value to attach to the entity produced for `origin`.
    pub fn attribute(&self, origin: Origin) -> Result<String, serde_json::Error> {
        self.provenance(origin).to_attribute()
    }

    /// Delete every entity in `scope` carrying this tool's tag.
    ///
    /// Bodies go before profiles and texts so nothing is deleted while a
    /// dependent feature still references it. `protected` is never deleted,
    /// whatever its attribute says. Returns the number of entities removed.
    pub fn sweep<D: Document + ?Sized>(
        &self,
        doc: &mut D,
        scope: EntityId,
        protected: Option<EntityId>,
    ) -> DocResult<usize> {
        let mut doomed = Vec::new();
        for entity in doc.scope_entities(scope)? {
            if Some(entity.handle) == protected {
                continue;
            }
            match Provenance::decode(entity.attribute.as_deref()) {
                state if state.is_tagged_with(&self.tag) => doomed.push((entity.kind, entity.handle)),
                TagState::Unreadable(reason) => {
                    warn!("Leaving {} in place: unreadable provenance ({})", entity.handle, reason);
                }
                TagState::Tagged(other) => {
                    debug!("Skipping {} tagged by {}", entity.handle, other.tool.name());
                }
                TagState::Untagged => {}
            }
        }

        doomed.sort_by_key(|(kind, _)| delete_rank(*kind));
        for (_, handle) in &doomed {
            doc.delete_entity(*handle)?;
        }

        debug!("{} swept {} entities from {}", self.tool.name(), doomed.len(), scope);
        Ok(doomed.len())
    }
}

fn delete_rank(kind: EntityKind) -> u8 {
    match kind {
        EntityKind::Body => 0,
        EntityKind::Profile => 1,
        EntityKind::Text => 2,
        EntityKind::Other => 3,
    }
}
