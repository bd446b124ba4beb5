use super::honeycomb::*;
use crate::document::FaceRegion;
use crate::error::PatternError;
use crate::geometry::{ApproxEq, Axis, Point2, Rect, EPSILON};
use crate::params::{HexOrientation, HoneycombParams, MAX_COLUMNS};
use crate::provenance::EntityId;

fn rect(w: f64, h: f64) -> Rect {
    Rect::new(Point2::origin(), Point2::new(w, h))
}

fn flat(columns: i64, margin: f64) -> HoneycombParams {
    HoneycombParams::new(columns, margin, HexOrientation::FlatTop).unwrap()
}

fn assert_all_inside(layout: &HoneycombLayout) {
    for cell in &layout.cells {
        let bounds = layout.cell_bounds(cell);
        assert!(
            layout.region.rect.contains_rect(&bounds, EPSILON),
            "cell ({}, {}) bounds {:?} escape {:?}",
            cell.row,
            cell.col,
            bounds,
            layout.region.rect
        );
    }
}

#[test]
fn test_radius_solves_packing_equation() {
    for columns in 1..12 {
        for margin in [0.0, 0.25, 1.0, 2.5] {
            let edge = 40.0;
            let m = CellMetrics::solve(HexOrientation::FlatTop, edge, columns, margin);
            let n = columns as f64;
            if m.radius > 0.0 {
                let spanned = n * 2.0 * m.radius + (n - 1.0) * margin;
                assert!(spanned.approx_eq(&edge), "n={columns} m={margin}");
            }
        }
    }
}

#[test]
fn test_example_first_row_centres() {
    // 30 mm edge, 5 columns, 1 mm margin -> r = 2.6, column pitch 2r + m = 6.2
    let region = BoundingRegion::new(rect(30.0, 20.0));
    let layout = generate(&region, 30.0, &flat(5, 1.0)).unwrap();

    assert!(layout.radius.approx_eq(&2.6));
    assert!(layout.metrics.column_pitch.approx_eq(&6.2));
    assert!(layout.degenerate.is_none());

    let row0: Vec<f64> = layout.cells.iter().filter(|c| c.row == 0).map(|c| c.center.x).collect();
    let expected = [2.6, 8.8, 15.0, 21.2, 27.4];
    assert_eq!(row0.len(), expected.len());
    for (x, e) in row0.iter().zip(expected) {
        assert!(x.approx_eq(&e), "{x} != {e}");
    }
}

#[test]
fn test_rows_alternate_and_clip() {
    let region = BoundingRegion::new(rect(30.0, 20.0));
    let layout = generate(&region, 30.0, &flat(5, 1.0)).unwrap();
    let r = layout.radius;

    let row1: Vec<&HexCell> = layout.cells.iter().filter(|c| c.row == 1).collect();
    // Odd rows shift by r + margin/2, so the last column no longer fits.
    assert_eq!(row1.len(), 4);
    assert!(row1[0].center.x.approx_eq(&(r + r + 0.5)));

    let row0_y = layout.cells[0].center.y;
    assert!((row1[0].center.y - row0_y).approx_eq(&(1.5 * r)));
    assert!(row0_y.approx_eq(&(3f64.sqrt() / 2.0 * r)));

    // Rows 0..=3 fit in 20 mm, row 4 would reach 20.1 mm.
    assert_eq!(layout.cells.iter().map(|c| c.row).max(), Some(3));
    assert_eq!(layout.cells.len(), 5 + 4 + 5 + 4);
    assert_all_inside(&layout);
}

#[test]
fn test_row_major_order() {
    let region = BoundingRegion::new(rect(50.0, 50.0));
    let layout = generate(&region, 50.0, &flat(6, 0.5)).unwrap();
    let keys: Vec<(u32, u32)> = layout.cells.iter().map(|c| (c.row, c.col)).collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
}

#[test]
fn test_degenerate_margin_is_empty_not_error() {
    let region = BoundingRegion::new(rect(10.0, 10.0));
    let layout = generate(&region, 10.0, &flat(3, 10.0)).unwrap();
    assert!(layout.radius <= 0.0);
    assert!(layout.is_empty());
    assert_eq!(layout.degenerate, Some(Degenerate::NonPositiveRadius));
}

#[test]
fn test_nothing_fits_short_region() {
    // Cells are ~8.66 mm tall, region only 2 mm.
    let region = BoundingRegion::new(rect(20.0, 2.0));
    let layout = generate(&region, 20.0, &flat(2, 0.0)).unwrap();
    assert!(layout.radius > 0.0);
    assert!(layout.is_empty());
    assert_eq!(layout.degenerate, Some(Degenerate::NothingFits));
}

#[test]
fn test_single_column_keeps_even_rows() {
    // One column fills the width exactly: odd rows are clipped but even rows continue.
    let region = BoundingRegion::new(rect(10.0, 30.0));
    let layout = generate(&region, 10.0, &flat(1, 0.0)).unwrap();
    assert!(layout.cells.iter().all(|c| c.row % 2 == 0));
    assert!(layout.cells.len() >= 2);
    assert_all_inside(&layout);
}

#[test]
fn test_invalid_inputs_error() {
    let region = BoundingRegion::new(rect(10.0, 10.0));
    let bad = HoneycombParams { column_count: 0, margin: 1.0, orientation: HexOrientation::FlatTop };
    assert!(matches!(generate(&region, 10.0, &bad), Err(PatternError::InvalidParameters(_))));

    let negative = HoneycombParams { column_count: 3, margin: -1.0, orientation: HexOrientation::FlatTop };
    assert!(matches!(generate(&region, 10.0, &negative), Err(PatternError::InvalidParameters(_))));

    let too_many = HoneycombParams { column_count: MAX_COLUMNS + 1, margin: 0.0, orientation: HexOrientation::FlatTop };
    assert!(matches!(generate(&region, 10.0, &too_many), Err(PatternError::InvalidParameters(_))));

    let empty = BoundingRegion::new(rect(10.0, 0.0));
    assert!(matches!(generate(&empty, 10.0, &flat(3, 0.0)), Err(PatternError::UnsupportedGeometry(_))));
}

#[test]
fn test_invalid_input_error_names_no_configured_parameter() {
    let region = BoundingRegion::new(rect(10.0, 10.0));
    let bad = HoneycombParams { column_count: 0, margin: 1.0, orientation: HexOrientation::FlatTop };
    let message = generate(&region, 10.0, &bad).unwrap_err().to_string();
    assert!(message.contains("column count"), "{message}");
    assert!(!message.contains("hexNumX"), "{message}");
}

#[test]
fn test_pointy_top_metrics() {
    let m = CellMetrics::solve(HexOrientation::PointyTop, 10.0, 5, 0.0);
    assert!(m.width.approx_eq(&2.0));
    assert!((m.radius * 3f64.sqrt()).approx_eq(&2.0));
    assert!(m.height.approx_eq(&(2.0 * m.radius)));
    assert!(m.odd_row_offset.approx_eq(&1.0));

    let with_margin = CellMetrics::solve(HexOrientation::PointyTop, 10.0, 3, 0.1);
    let expected_pitch = 1.5 * with_margin.radius + 0.1 * 3f64.sqrt() / 2.0;
    assert!(with_margin.row_pitch.approx_eq(&expected_pitch));
}

#[test]
fn test_pointy_top_first_row_count() {
    let region = BoundingRegion::new(rect(100.0, 30.0));
    let params = HoneycombParams::new(5, 0.0, HexOrientation::PointyTop).unwrap();
    let layout = generate(&region, 100.0, &params).unwrap();
    assert_eq!(layout.cells.iter().filter(|c| c.row == 0).count(), 5);
    assert_all_inside(&layout);
}

#[test]
fn test_vertices_match_bounds() {
    let region = BoundingRegion::new(rect(30.0, 20.0));
    for orientation in [HexOrientation::FlatTop, HexOrientation::PointyTop] {
        let params = HoneycombParams::new(5, 1.0, orientation).unwrap();
        let layout = generate(&region, 30.0, &params).unwrap();
        let cell = layout.cells[0];

        let mut hull = Rect::empty();
        for v in layout.vertices(&cell) {
            assert!((v - cell.center).norm().approx_eq(&cell.radius));
            hull.extend(&v);
        }
        let bounds = layout.cell_bounds(&cell);
        assert!(hull.min.approx_eq(&bounds.min), "{orientation:?}");
        assert!(hull.max.approx_eq(&bounds.max), "{orientation:?}");
    }
}

#[test]
fn test_frame_along_y_from_max_side() {
    let base = generate(&BoundingRegion::new(rect(30.0, 20.0)), 30.0, &flat(5, 1.0)).unwrap();

    let frame = EdgeFrame { axis: Axis::Y, rows_from: Side::Max };
    let rotated_region = BoundingRegion::with_frame(rect(20.0, 30.0), frame);
    let rotated = generate(&rotated_region, 30.0, &flat(5, 1.0)).unwrap();

    assert_eq!(base.cells.len(), rotated.cells.len());
    for (a, b) in base.cells.iter().zip(&rotated.cells) {
        assert_eq!((a.row, a.col), (b.row, b.col));
        // u maps to y, v is measured down from x = 20.
        assert!(b.center.y.approx_eq(&a.center.x));
        assert!(b.center.x.approx_eq(&(20.0 - a.center.y)));
    }
    assert_all_inside(&rotated);
}

#[test]
fn test_region_offset_from_origin() {
    let region = BoundingRegion::new(Rect::new(Point2::new(-15.0, -10.0), Point2::new(15.0, 10.0)));
    let layout = generate(&region, 30.0, &flat(5, 1.0)).unwrap();
    assert!(layout.cells[0].center.x.approx_eq(&(-15.0 + 2.6)));
    assert_all_inside(&layout);
}

#[test]
fn test_generation_is_repeatable() {
    let region = BoundingRegion::new(rect(37.0, 23.0));
    let params = flat(7, 0.3);
    assert_eq!(generate(&region, 37.0, &params).unwrap(), generate(&region, 37.0, &params).unwrap());
}

fn face(rect: Rect, start: Point2, end: Point2) -> FaceRegion {
    FaceRegion { face: EntityId::new_deterministic("face"), rect, edge_start: start, edge_end: end }
}

#[test]
fn test_region_from_bottom_edge() {
    let f = face(rect(30.0, 20.0), Point2::new(0.0, 0.0), Point2::new(30.0, 0.0));
    let (region, length) = BoundingRegion::from_face(&f).unwrap();
    assert!(length.approx_eq(&30.0));
    assert_eq!(region.frame, EdgeFrame { axis: Axis::X, rows_from: Side::Min });
}

#[test]
fn test_slightly_long_edge_keeps_all_columns() {
    // Within the span tolerance, but longer than the face.
    let f = face(rect(30.0, 20.0), Point2::new(0.0, 0.0), Point2::new(30.00001, 0.0));
    let (region, length) = BoundingRegion::from_face(&f).unwrap();
    assert!(length.approx_eq(&30.0));

    let layout = generate(&region, length, &flat(5, 1.0)).unwrap();
    assert_eq!(layout.cells.iter().filter(|c| c.row == 0).count(), 5);
    assert_all_inside(&layout);
}

#[test]
fn test_region_from_right_edge() {
    let f = face(rect(30.0, 20.0), Point2::new(30.0, 20.0), Point2::new(30.0, 0.0));
    let (region, length) = BoundingRegion::from_face(&f).unwrap();
    assert!(length.approx_eq(&20.0));
    assert_eq!(region.frame, EdgeFrame { axis: Axis::Y, rows_from: Side::Max });
}

#[test]
fn test_region_rejects_unusable_edges() {
    let r = rect(30.0, 20.0);
    let diagonal = face(r, Point2::new(0.0, 0.0), Point2::new(30.0, 20.0));
    let short = face(r, Point2::new(0.0, 0.0), Point2::new(10.0, 0.0));
    let point = face(r, Point2::new(0.0, 0.0), Point2::new(0.0, 0.0));
    let flat_face = face(rect(30.0, 0.0), Point2::new(0.0, 0.0), Point2::new(30.0, 0.0));

    for f in [diagonal, short, point, flat_face] {
        assert!(matches!(BoundingRegion::from_face(&f), Err(PatternError::UnsupportedGeometry(_))));
    }
}
