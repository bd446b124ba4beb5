use crate::document::{TextEntity, TextStyle};
use crate::geometry::Point2;
use crate::params::SequenceParams;
use crate::provenance::{segment_body_name, EntityId, Origin};
use serde::{Deserialize, Serialize};

/// The user-authored text that anchors segment 0 and supplies the style of all others.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateEntity {
    pub handle: EntityId,
    /// Owning sketch; also the sweep scope of the sequence tool.
    pub sketch: EntityId,
    pub label: String,
    pub position: Point2,
    pub style: TextStyle,
}

impl TemplateEntity {
    pub fn from_text(sketch: EntityId, text: &TextEntity) -> Self {
        Self {
            handle: text.handle,
            sketch,
            label: text.label.clone(),
            position: text.position,
            style: text.style.clone(),
        }
    }
}

/// One numbered element of the sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub index: u32,
    pub label: String,
    pub position: Point2,
}

impl Segment {
    /// Segment 0 is carried by the template itself and is updated, not created.
    pub fn is_template(&self) -> bool {
        self.index == 0
    }

    pub fn origin(&self) -> Origin {
        Origin::Segment { index: self.index }
    }
}

/// Host default integer-to-text rendering. Padding is a template concern.
pub fn format_label(number: i64) -> String {
    number.to_string()
}

/// Compute every segment, in ascending index order.
///
/// Segment 0 sits exactly on the template position; segment `i` is offset by
/// `i * pitch` along the direction's unit vector.
pub fn generate(template: &TemplateEntity, params: &SequenceParams) -> Vec<Segment> {
    let step = params.direction.unit_vector();
    (0..params.segment_count)
        .map(|index| {
            let position = if index == 0 {
                template.position
            } else {
                template.position + step * (params.segment_pitch * index as f64)
            };
            Segment {
                index,
                label: format_label(params.start_number.saturating_add(index as i64)),
                position,
            }
        })
        .collect()
}

/// A per-segment extrude-cut request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutDirective {
    pub index: u32,
    pub depth: f64,
    pub body_name: String,
}

/// Cut directives for every segment, or none when no cut depth is set.
pub fn cut_directives(segments: &[Segment], params: &SequenceParams, body_prefix: &str) -> Vec<CutDirective> {
    let Some(depth) = params.cut_depth else {
        return Vec::new();
    };
    segments
        .iter()
        .map(|s| CutDirective {
            index: s.index,
            depth,
            body_name: segment_body_name(body_prefix, &s.label),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ApproxEq;
    use crate::params::Direction;

    fn template_at(x: f64, y: f64) -> TemplateEntity {
        TemplateEntity {
            handle: EntityId::new_deterministic("template"),
            sketch: EntityId::new_deterministic("sketch"),
            label: "0".to_string(),
            position: Point2::new(x, y),
            style: TextStyle::default(),
        }
    }

    #[test]
    fn test_three_segments_plus_x() {
        let params = SequenceParams::new(3, 6.0, 7, Direction::PlusX, None).unwrap();
        let segments = generate(&template_at(0.0, 0.0), &params);

        let expected = [("7", 0.0), ("8", 6.0), ("9", 12.0)];
        assert_eq!(segments.len(), 3);
        for (i, (seg, (label, x))) in segments.iter().zip(expected).enumerate() {
            assert_eq!(seg.index, i as u32);
            assert_eq!(seg.label, label);
            assert_eq!(seg.position, Point2::new(x, 0.0));
        }
    }

    #[test]
    fn test_segment_zero_is_exactly_the_template() {
        let template = template_at(0.1 + 0.2, -7.3);
        for direction in [Direction::PlusX, Direction::MinusX, Direction::PlusY, Direction::MinusY] {
            let params = SequenceParams::new(4, 2.5, 0, direction, None).unwrap();
            let segments = generate(&template, &params);
            assert_eq!(segments[0].position, template.position);
            assert!(segments[0].is_template());
            assert!(!segments[1].is_template());
        }
    }

    #[test]
    fn test_offsets_are_pitch_multiples() {
        let template = template_at(3.0, 4.0);
        let params = SequenceParams::new(10, 1.7, -3, Direction::MinusY, None).unwrap();
        let segments = generate(&template, &params);

        for seg in &segments {
            let offset = seg.position - template.position;
            let expected = Direction::MinusY.unit_vector() * (1.7 * seg.index as f64);
            assert!(offset.approx_eq(&expected), "segment {}", seg.index);
        }
        assert_eq!(segments[0].label, "-3");
        assert_eq!(segments[9].label, "6");
    }

    #[test]
    fn test_directions() {
        let template = template_at(0.0, 0.0);
        let cases = [
            (Direction::PlusX, Point2::new(12.0, 0.0)),
            (Direction::MinusX, Point2::new(-12.0, 0.0)),
            (Direction::PlusY, Point2::new(0.0, 12.0)),
            (Direction::MinusY, Point2::new(0.0, -12.0)),
        ];
        for (direction, last) in cases {
            let params = SequenceParams::new(3, 6.0, 0, direction, None).unwrap();
            let segments = generate(&template, &params);
            assert!(segments[2].position.approx_eq(&last), "{direction}");
        }
    }

    #[test]
    fn test_single_segment() {
        let params = SequenceParams::new(1, 6.0, 42, Direction::PlusX, None).unwrap();
        let segments = generate(&template_at(1.0, 1.0), &params);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].label, "42");
    }

    #[test]
    fn test_generation_is_repeatable() {
        let template = template_at(2.0, 2.0);
        let params = SequenceParams::new(25, 0.3, 100, Direction::PlusY, Some(0.5)).unwrap();
        assert_eq!(generate(&template, &params), generate(&template, &params));
    }

    #[test]
    fn test_cut_directives() {
        let template = template_at(0.0, 0.0);
        let no_cut = SequenceParams::new(3, 6.0, 7, Direction::PlusX, None).unwrap();
        assert!(cut_directives(&generate(&template, &no_cut), &no_cut, "num#").is_empty());

        let with_cut = SequenceParams::new(3, 6.0, 7, Direction::PlusX, Some(0.4)).unwrap();
        let cuts = cut_directives(&generate(&template, &with_cut), &with_cut, "num#");
        let names: Vec<&str> = cuts.iter().map(|c| c.body_name.as_str()).collect();
        assert_eq!(names, ["num#7", "num#8", "num#9"]);
        assert!(cuts.iter().all(|c| c.depth == 0.4));
    }

    #[test]
    fn test_label_formatting_has_no_padding() {
        assert_eq!(format_label(7), "7");
        assert_eq!(format_label(-12), "-12");
        assert_eq!(format_label(0), "0");
    }
}
