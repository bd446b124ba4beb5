use super::{attribute_for, host_err, in_transaction, RunReport};
use crate::config::ToolConfig;
use crate::document::{CutExtent, DocError, DocOp, Document, Selection};
use crate::error::{PatternError, PatternResult};
use crate::layout::{cut_directives, filter_outer_profiles, sequence};
use crate::params::SequenceParams;
use crate::provenance::{EntityId, Origin, ToolKind};
use crate::regen::{select_template, RegenerationTracker};
use tracing::{debug, info};

/// Number the selected sketch's template text into a sequence of labels.
///
/// The template is retextured in place as segment 0; every other segment is a
/// new tagged text. With a cut depth set, each label's outer glyph profiles
/// are cut into a body named after the label.
pub fn run_sequence<D: Document + ?Sized>(doc: &mut D, config: &ToolConfig) -> PatternResult<RunReport> {
    let names = &config.sequence;

    let sketch = match doc.active_selection() {
        Selection::Sketch(id) => id,
        other => {
            return Err(PatternError::NoTemplateFound(format!(
                "select the sketch holding the template text (selection is {})",
                other
            )))
        }
    };

    let params = SequenceParams::read(doc.parameters(), names)?;
    info!(
        "Sequence: {} segments from {} every {} mm toward {}",
        params.segment_count, params.start_number, params.segment_pitch, params.direction
    );

    let texts = doc.sketch_texts(sketch).map_err(host_err(None))?;
    let template = select_template(sketch, &texts)?;
    let segments = sequence::generate(&template, &params);
    let cuts = cut_directives(&segments, &params, &names.body_prefix);

    let tracker = RegenerationTracker::new(ToolKind::Sequence);
    let mut report = RunReport::new(ToolKind::Sequence);

    in_transaction(doc, |doc| {
        report.removed = tracker
            .sweep(doc, sketch, Some(template.handle))
            .map_err(host_err(None))?;
        if report.removed > 0 {
            report.logs.push(format!("Removed {} entities from the previous run", report.removed));
        }

        let mut handles: Vec<EntityId> = Vec::with_capacity(segments.len());
        for segment in &segments {
            let origin = segment.origin();
            let handle = if segment.is_template() {
                doc.update_text(template.handle, &segment.label)
                    .map_err(host_err(Some(origin)))?;
                template.handle
            } else {
                let attribute = attribute_for(&tracker, origin, DocOp::CreateText)?;
                let handle = doc
                    .create_text(sketch, &template.style, &segment.label, segment.position, &attribute)
                    .map_err(host_err(Some(origin)))?;
                report.created += 1;
                handle
            };
            debug!("Segment {} -> '{}' at {:?}", segment.index, segment.label, segment.position);
            handles.push(handle);
        }
        report.placed = segments.len();
        report.logs.push(format!(
            "Numbered {} segments starting at ({:.3}, {:.3})",
            segments.len(),
            template.position.x,
            template.position.y
        ));

        for (cut, text) in cuts.iter().zip(&handles) {
            let origin = Origin::Segment { index: cut.index };
            let profiles = doc.text_profiles(*text).map_err(host_err(Some(origin)))?;
            let outer: Vec<EntityId> = filter_outer_profiles(&profiles).iter().map(|p| p.handle).collect();
            if outer.is_empty() {
                return Err(PatternError::host(
                    DocError::new(DocOp::ReadProfiles, "label has no closed profiles"),
                    Some(origin),
                ));
            }

            let attribute = attribute_for(&tracker, origin, DocOp::ExtrudeCut)?;
            let body = doc
                .extrude_cut(sketch, &outer, CutExtent::Depth(cut.depth), &attribute)
                .map_err(host_err(Some(origin)))?;
            report.created += 1;
            doc.rename_body(body, &cut.body_name).map_err(host_err(Some(origin)))?;
            report.bodies.push(cut.body_name.clone());
        }
        if !report.bodies.is_empty() {
            report.logs.push(format!("Cut {} label bodies", report.bodies.len()));
        }
        Ok(())
    })?;

    info!("{}", report.summary());
    Ok(report)
}
