use crate::document::TextEntity;
use crate::error::{PatternError, PatternResult};
use crate::layout::TemplateEntity;
use crate::provenance::{EntityId, Provenance, TagState};

/// Pick the single user-authored text of a sketch as the sequence template.
///
/// Texts tagged by any tool are previous output and are ignored. A text with an
/// attribute we cannot decode might be either, so the run refuses to guess.
pub fn select_template(sketch: EntityId, texts: &[TextEntity]) -> PatternResult<TemplateEntity> {
    let mut untagged = Vec::new();
    for text in texts {
        match Provenance::decode(text.attribute.as_deref()) {
            TagState::Untagged => untagged.push(text),
            TagState::Tagged(_) => {}
            TagState::Unreadable(reason) => {
                return Err(PatternError::AmbiguousTemplate(format!(
                    "text '{}' carries an unreadable provenance attribute ({})",
                    text.label, reason
                )));
            }
        }
    }

    match untagged.as_slice() {
        [template] => Ok(TemplateEntity::from_text(sketch, template)),
        [] => Err(PatternError::NoTemplateFound(
            "the selected sketch contains no user text".to_string(),
        )),
        many => Err(PatternError::NoTemplateFound(format!(
            "the selected sketch must contain exactly one user text, found {}",
            many.len()
        ))),
    }
}
