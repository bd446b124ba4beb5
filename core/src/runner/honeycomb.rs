use super::{attribute_for, host_err, in_transaction, RunOutcome, RunReport};
use crate::config::ToolConfig;
use crate::document::{CutExtent, DocOp, Document, Selection};
use crate::error::{PatternError, PatternResult};
use crate::layout::{honeycomb, BoundingRegion};
use crate::params::HoneycombParams;
use crate::provenance::{cell_body_name, ToolKind};
use crate::regen::RegenerationTracker;
use tracing::{debug, info};

/// Cut a honeycomb of hexagons through the face next to the selected edge.
///
/// The hexagon size is solved so that the configured column count spans the
/// edge. Each in-bounds cell gets its own profile and through-all cut body.
/// A layout with nothing to place still sweeps the previous run's output.
pub fn run_honeycomb<D: Document + ?Sized>(doc: &mut D, config: &ToolConfig) -> PatternResult<RunReport> {
    let names = &config.honeycomb;

    let edge = match doc.active_selection() {
        Selection::Edge(id) => id,
        other => {
            return Err(PatternError::UnsupportedGeometry(format!(
                "select one straight edge of a planar face (selection is {})",
                other
            )))
        }
    };

    let params = HoneycombParams::read(doc.parameters(), names)?;
    let face = doc
        .face_region(edge)
        .map_err(host_err(None))?
        .ok_or_else(|| {
            PatternError::UnsupportedGeometry("the selected edge does not bound a planar face".to_string())
        })?;
    let (region, edge_length) = BoundingRegion::from_face(&face)?;
    let layout = honeycomb::generate(&region, edge_length, &params)?;
    info!(
        "Honeycomb: {} columns, margin {} mm, edge {:.3} mm -> radius {:.3} mm, {} cells",
        params.column_count,
        params.margin,
        edge_length,
        layout.radius,
        layout.cells.len()
    );

    let tracker = RegenerationTracker::new(ToolKind::Honeycomb);
    let mut report = RunReport::new(ToolKind::Honeycomb);
    report.radius = Some(layout.radius);

    in_transaction(doc, |doc| {
        report.removed = tracker.sweep(doc, face.face, None).map_err(host_err(None))?;
        if report.removed > 0 {
            report.logs.push(format!("Removed {} entities from the previous run", report.removed));
        }

        if let Some(reason) = layout.degenerate {
            report.outcome = RunOutcome::NothingToPlace(reason);
            report.logs.push(format!("Nothing to place: {:?}", reason));
            return Ok(());
        }

        for cell in &layout.cells {
            let origin = cell.origin();
            let attribute = attribute_for(&tracker, origin, DocOp::CreateHexProfile)?;
            let profile = doc
                .create_hex_profile(face.face, &layout.profile(cell), &attribute)
                .map_err(host_err(Some(origin)))?;
            let body = doc
                .extrude_cut(face.face, &[profile], CutExtent::ThroughAll, &attribute)
                .map_err(host_err(Some(origin)))?;
            let name = cell_body_name(&names.body_prefix, cell.row, cell.col);
            doc.rename_body(body, &name).map_err(host_err(Some(origin)))?;
            debug!("Cell ({}, {}) at {:?} -> {}", cell.row, cell.col, cell.center, name);

            report.created += 2;
            report.bodies.push(name);
        }
        report.placed = layout.cells.len();
        report.logs.push(format!(
            "Cut {} hexagons of radius {:.3} mm",
            layout.cells.len(),
            layout.radius
        ));
        Ok(())
    })?;

    info!("{}", report.summary());
    Ok(report)
}
