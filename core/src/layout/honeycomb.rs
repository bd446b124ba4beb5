//! Honeycomb tiling of hexagons sized to fit a column count across an edge.
//!
//! The layout is solved in an edge-local frame: `u` runs along the selected
//! edge from the region's minimum, `v` runs across it starting at the side the
//! edge lies on. Cells are then mapped into region (sketch) coordinates.

use crate::document::FaceRegion;
use crate::error::{PatternError, PatternResult};
use crate::geometry::{Axis, Point2, Rect, Vector2, EPSILON};
use crate::params::{HexOrientation, HoneycombParams, ParamError, MAX_COLUMNS};
use crate::provenance::Origin;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Slack allowed when testing a cell's bounding box against the region.
const FIT_TOLERANCE: f64 = 1e-9;

/// Hard cap on enumerated rows, whatever the region and cell sizes.
const MAX_ROWS: u64 = 100_000;

/// Edge direction must match a region axis to within this (sine of the angle).
const PARALLEL_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Side {
    #[default]
    Min,
    Max,
}

/// Which region axis the selected edge follows and which side rows grow from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct EdgeFrame {
    pub axis: Axis,
    pub rows_from: Side,
}

/// Rectangle cells are clipped against, plus the frame of the selected edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingRegion {
    pub rect: Rect,
    pub frame: EdgeFrame,
}

impl BoundingRegion {
    pub fn new(rect: Rect) -> Self {
        Self { rect, frame: EdgeFrame::default() }
    }

    pub fn with_frame(rect: Rect, frame: EdgeFrame) -> Self {
        Self { rect, frame }
    }

    /// Interpret a face reached from a selected edge.
    ///
    /// Returns the region and the face extent along the edge. The edge must be
    /// parallel to a side of the face rectangle and span it completely.
    pub fn from_face(face: &FaceRegion) -> PatternResult<(Self, f64)> {
        if !face.rect.is_valid() {
            return Err(PatternError::UnsupportedGeometry(
                "face has no usable rectangular extent".to_string(),
            ));
        }

        let edge = face.edge_end - face.edge_start;
        let length = edge.norm();
        if !(length.is_finite() && length > EPSILON) {
            return Err(PatternError::UnsupportedGeometry("selected edge has zero length".to_string()));
        }
        let dir = edge / length;

        let axis = if dir.y.abs() < PARALLEL_TOLERANCE {
            Axis::X
        } else if dir.x.abs() < PARALLEL_TOLERANCE {
            Axis::Y
        } else {
            return Err(PatternError::UnsupportedGeometry(
                "selected edge is not parallel to a side of the face".to_string(),
            ));
        };

        let extent = face.rect.extent(axis);
        if (length - extent).abs() > EPSILON * extent.max(1.0) {
            return Err(PatternError::UnsupportedGeometry(format!(
                "selected edge ({:.4} mm) does not span the face ({:.4} mm)",
                length, extent
            )));
        }

        let mid = nalgebra::center(&face.edge_start, &face.edge_end);
        let center = face.rect.center();
        let rows_from = match axis {
            Axis::X if mid.y > center.y => Side::Max,
            Axis::Y if mid.x > center.x => Side::Max,
            _ => Side::Min,
        };

        Ok((Self::with_frame(face.rect, EdgeFrame { axis, rows_from }), extent))
    }

    fn along(&self) -> f64 {
        self.rect.extent(self.frame.axis)
    }

    fn across(&self) -> f64 {
        self.rect.extent(self.frame.axis.other())
    }

    /// Map an edge-local point into region coordinates.
    fn to_region(&self, u: f64, v: f64) -> Point2 {
        let across = match (self.frame.axis, self.frame.rows_from) {
            (Axis::X, Side::Min) => self.rect.min.y + v,
            (Axis::X, Side::Max) => self.rect.max.y - v,
            (Axis::Y, Side::Min) => self.rect.min.x + v,
            (Axis::Y, Side::Max) => self.rect.max.x - v,
        };
        match self.frame.axis {
            Axis::X => Point2::new(self.rect.min.x + u, across),
            Axis::Y => Point2::new(across, self.rect.min.y + u),
        }
    }

    /// Map an edge-local offset into region coordinates.
    fn offset_to_region(&self, du: f64, dv: f64) -> Vector2 {
        let dv = match self.frame.rows_from {
            Side::Min => dv,
            Side::Max => -dv,
        };
        match self.frame.axis {
            Axis::X => Vector2::new(du, dv),
            Axis::Y => Vector2::new(dv, du),
        }
    }
}

/// Solved cell dimensions, all in the edge-local frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellMetrics {
    /// Circumradius
    pub radius: f64,
    /// Extent along the edge
    pub width: f64,
    /// Extent across the edge
    pub height: f64,
    pub column_pitch: f64,
    pub row_pitch: f64,
    /// Along-edge shift of odd rows
    pub odd_row_offset: f64,
}

impl CellMetrics {
    /// Solve `column_count` cell widths plus `column_count - 1` margins == `edge_length`.
    pub fn solve(orientation: HexOrientation, edge_length: f64, column_count: u32, margin: f64) -> Self {
        let n = column_count as f64;
        let width = (edge_length - (n - 1.0) * margin) / n;
        let sqrt3 = 3f64.sqrt();
        match orientation {
            HexOrientation::FlatTop => {
                let radius = width / 2.0;
                Self {
                    radius,
                    width,
                    height: sqrt3 * radius,
                    column_pitch: width + margin,
                    row_pitch: 1.5 * radius,
                    odd_row_offset: radius + margin / 2.0,
                }
            }
            HexOrientation::PointyTop => {
                let radius = width / sqrt3;
                let column_pitch = width + margin;
                Self {
                    radius,
                    width,
                    height: 2.0 * radius,
                    column_pitch,
                    row_pitch: 1.5 * radius + margin * sqrt3 / 2.0,
                    odd_row_offset: column_pitch / 2.0,
                }
            }
        }
    }
}

/// One hexagon of the tiling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HexCell {
    pub row: u32,
    pub col: u32,
    pub center: Point2,
    pub radius: f64,
}

impl HexCell {
    pub fn origin(&self) -> Origin {
        Origin::Cell { row: self.row, col: self.col }
    }
}

/// Geometry handed to the document to draw one hexagon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HexProfile {
    pub center: Point2,
    pub radius: f64,
    pub orientation: HexOrientation,
    pub vertices: [Point2; 6],
}

/// Why a honeycomb run has nothing to place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Degenerate {
    /// Margins consume the whole edge.
    NonPositiveRadius,
    /// Cells have a size but not even one fits in the region.
    NothingFits,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoneycombLayout {
    pub radius: f64,
    pub orientation: HexOrientation,
    pub region: BoundingRegion,
    pub metrics: CellMetrics,
    /// Row-major: increasing row, then increasing column.
    pub cells: Vec<HexCell>,
    pub degenerate: Option<Degenerate>,
}

impl HoneycombLayout {
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Axis-aligned bounds of a cell's hexagon in region coordinates.
    pub fn cell_bounds(&self, cell: &HexCell) -> Rect {
        let (w, h) = (self.metrics.width, self.metrics.height);
        match self.region.frame.axis {
            Axis::X => Rect::centered(cell.center, w, h),
            Axis::Y => Rect::centered(cell.center, h, w),
        }
    }

    /// Hexagon vertices in region coordinates, counter-clockwise in the edge frame.
    pub fn vertices(&self, cell: &HexCell) -> [Point2; 6] {
        let start = match self.orientation {
            HexOrientation::FlatTop => 0.0,
            HexOrientation::PointyTop => PI / 2.0,
        };
        std::array::from_fn(|k| {
            let angle = start + k as f64 * PI / 3.0;
            let offset = self
                .region
                .offset_to_region(cell.radius * angle.cos(), cell.radius * angle.sin());
            cell.center + offset
        })
    }

    pub fn profile(&self, cell: &HexCell) -> HexProfile {
        HexProfile {
            center: cell.center,
            radius: cell.radius,
            orientation: self.orientation,
            vertices: self.vertices(cell),
        }
    }
}

/// Compute radius and every in-bounds cell.
///
/// A cell is kept only if its whole bounding box lies inside the region.
/// A non-positive radius or an empty result is reported through
/// [`HoneycombLayout::degenerate`], not as an error.
pub fn generate(
    region: &BoundingRegion,
    edge_length: f64,
    params: &HoneycombParams,
) -> PatternResult<HoneycombLayout> {
    if params.column_count < 1 || params.column_count > MAX_COLUMNS {
        return Err(ParamError::OutOfRange {
            name: "column count".to_string(),
            value: params.column_count as f64,
            requirement: "must be between 1 and 10000",
        }
        .into());
    }
    if !(params.margin.is_finite() && params.margin >= 0.0) {
        return Err(ParamError::OutOfRange {
            name: "margin".to_string(),
            value: params.margin,
            requirement: "must be a non-negative length",
        }
        .into());
    }
    if !region.rect.is_valid() {
        return Err(PatternError::UnsupportedGeometry("bounding region is empty".to_string()));
    }
    if !edge_length.is_finite() {
        return Err(PatternError::UnsupportedGeometry("edge length is not finite".to_string()));
    }

    let metrics = CellMetrics::solve(params.orientation, edge_length, params.column_count, params.margin);
    let mut layout = HoneycombLayout {
        radius: metrics.radius,
        orientation: params.orientation,
        region: *region,
        metrics,
        cells: Vec::new(),
        degenerate: None,
    };

    if metrics.radius <= 0.0 {
        layout.degenerate = Some(Degenerate::NonPositiveRadius);
        return Ok(layout);
    }

    let along = region.along();
    let across = region.across();
    let half_w = metrics.width / 2.0;
    let half_h = metrics.height / 2.0;

    let max_cols = ((along + params.margin) / metrics.column_pitch).floor() as u64 + 1;
    let max_cols = max_cols.min(params.column_count as u64);
    let max_rows = ((across / metrics.row_pitch).ceil() as u64).saturating_add(2).min(MAX_ROWS);

    let fits = |u: f64, v: f64| {
        u - half_w >= -FIT_TOLERANCE
            && u + half_w <= along + FIT_TOLERANCE
            && v - half_h >= -FIT_TOLERANCE
            && v + half_h <= across + FIT_TOLERANCE
    };

    let mut empty_rows = 0;
    for row in 0..max_rows {
        let v = half_h + row as f64 * metrics.row_pitch;
        let shift = if row % 2 == 1 { metrics.odd_row_offset } else { 0.0 };
        let before = layout.cells.len();

        for col in 0..max_cols {
            let u = half_w + shift + col as f64 * metrics.column_pitch;
            if fits(u, v) {
                layout.cells.push(HexCell {
                    row: row as u32,
                    col: col as u32,
                    center: region.to_region(u, v),
                    radius: metrics.radius,
                });
            }
        }

        if layout.cells.len() == before {
            empty_rows += 1;
            if empty_rows >= 2 {
                break;
            }
        } else {
            empty_rows = 0;
        }
    }

    if layout.cells.is_empty() {
        layout.degenerate = Some(Degenerate::NothingFits);
    }
    Ok(layout)
}
