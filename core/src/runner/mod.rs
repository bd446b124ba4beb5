//! Tool actions: read parameters, plan, sweep, realise, all in one transaction.
//!
//! Each entry point is the whole zero-argument action a host menu item invokes.
//! Either the run completes and commits, or the transaction is rolled back and
//! the error is returned; the document never holds a half-regenerated layout.

pub mod honeycomb;
pub mod sequence;

pub use honeycomb::run_honeycomb;
pub use sequence::run_sequence;

use crate::document::{DocError, DocOp, Document};
use crate::error::{PatternError, PatternResult};
use crate::layout::Degenerate;
use crate::provenance::{Origin, ToolKind};
use crate::regen::RegenerationTracker;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    /// The plan was realised in full.
    Placed,
    /// Completed with nothing created.
    NothingToPlace(Degenerate),
}

/// What a completed run did to the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub tool: ToolKind,
    pub outcome: RunOutcome,
    /// Entities swept from the previous run
    pub removed: usize,
    /// Plan elements realised (segments or hexagon cells)
    pub placed: usize,
    /// Entities created by this run
    pub created: usize,
    /// Names of the cut bodies, in creation order
    pub bodies: Vec<String>,
    /// Solved hexagon radius, mm
    pub radius: Option<f64>,
    pub logs: Vec<String>,
}

impl RunReport {
    pub fn new(tool: ToolKind) -> Self {
        Self {
            tool,
            outcome: RunOutcome::Placed,
            removed: 0,
            placed: 0,
            created: 0,
            bodies: Vec::new(),
            radius: None,
            logs: Vec::new(),
        }
    }

    /// One line for the host's message box.
    pub fn summary(&self) -> String {
        match (self.tool, self.outcome) {
            (ToolKind::Honeycomb, RunOutcome::Placed) => format!(
                "Created {} hexagon cuts. Hex radius: {:.2} mm",
                self.bodies.len(),
                self.radius.unwrap_or(0.0)
            ),
            (ToolKind::Honeycomb, RunOutcome::NothingToPlace(Degenerate::NonPositiveRadius)) => {
                "No hexagons fit in the selected face: the margins use up the whole edge.".to_string()
            }
            (ToolKind::Honeycomb, RunOutcome::NothingToPlace(_)) => {
                "No hexagons fit in the selected face.".to_string()
            }
            (ToolKind::Sequence, RunOutcome::NothingToPlace(_)) => "Nothing to number.".to_string(),
            (ToolKind::Sequence, RunOutcome::Placed) if self.bodies.is_empty() => {
                format!("Placed {} numbered segments.", self.placed)
            }
            (ToolKind::Sequence, RunOutcome::Placed) => format!(
                "Placed {} numbered segments and cut {} bodies.",
                self.placed,
                self.bodies.len()
            ),
        }
    }
}

/// Map an adapter failure, naming the plan element being realised.
pub(crate) fn host_err(target: Option<Origin>) -> impl FnOnce(DocError) -> PatternError {
    move |err| PatternError::host(err, target)
}

/// Provenance attribute for the entity about to be created by `op`.
pub(crate) fn attribute_for(tracker: &RegenerationTracker, origin: Origin, op: DocOp) -> PatternResult<String> {
    tracker.attribute(origin).map_err(|e| {
        PatternError::host(DocError::new(op, format!("cannot encode provenance: {}", e)), Some(origin))
    })
}

/// Run `body` inside one document transaction.
///
/// Commits on success. On any error (including a failed commit) the
/// transaction is rolled back and the original error is returned.
pub(crate) fn in_transaction<D, T, F>(doc: &mut D, body: F) -> PatternResult<T>
where
    D: Document + ?Sized,
    F: FnOnce(&mut D) -> PatternResult<T>,
{
    doc.begin_transaction().map_err(host_err(None))?;
    let result = body(&mut *doc).and_then(|value| {
        doc.commit_transaction().map_err(host_err(None))?;
        Ok(value)
    });
    if result.is_err() {
        if let Err(e) = doc.rollback_transaction() {
            warn!("Rollback failed: {}", e);
        }
    }
    result
}
