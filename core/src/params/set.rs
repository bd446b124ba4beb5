//! Validated parameter snapshots for one run of each tool.

use super::reader::{
    is_truthy, read_integer, read_length, read_optional_length, read_optional_text, ParamError,
};
use super::types::ParameterStore;
use crate::config::{HoneycombConfig, SequenceConfig};
use crate::geometry::Vector2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Axis direction along which segments are spaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Direction {
    #[default]
    PlusX,
    MinusX,
    PlusY,
    MinusY,
}

impl Direction {
    /// Parse an already cleaned direction text ("+X", "-Y", ...). "X" alone means "+X".
    pub fn parse(cleaned: &str) -> Option<Self> {
        match cleaned {
            "+X" | "X" => Some(Self::PlusX),
            "-X" => Some(Self::MinusX),
            "+Y" | "Y" => Some(Self::PlusY),
            "-Y" => Some(Self::MinusY),
            _ => None,
        }
    }

    pub fn unit_vector(&self) -> Vector2 {
        match self {
            Self::PlusX => Vector2::new(1.0, 0.0),
            Self::MinusX => Vector2::new(-1.0, 0.0),
            Self::PlusY => Vector2::new(0.0, 1.0),
            Self::MinusY => Vector2::new(0.0, -1.0),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::PlusX => "+X",
            Self::MinusX => "-X",
            Self::PlusY => "+Y",
            Self::MinusY => "-Y",
        };
        f.write_str(s)
    }
}

/// Hexagon orientation relative to the selected edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum HexOrientation {
    /// Flat edges top and bottom, vertices pointing along the edge.
    #[default]
    FlatTop,
    /// Vertices top and bottom, flat edges facing along the edge.
    PointyTop,
}

/// Parameters of the numbered sequence tool
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SequenceParams {
    pub segment_count: u32,
    /// Distance between consecutive segments, mm
    pub segment_pitch: f64,
    pub start_number: i64,
    pub direction: Direction,
    /// Depth of the optional per-segment cut, mm
    pub cut_depth: Option<f64>,
}

impl SequenceParams {
    /// Build and validate a parameter set directly (names in errors are the default parameter names).
    pub fn new(
        segment_count: i64,
        segment_pitch: f64,
        start_number: i64,
        direction: Direction,
        cut_depth: Option<f64>,
    ) -> Result<Self, ParamError> {
        Self::validated(
            segment_count,
            segment_pitch,
            start_number,
            direction,
            cut_depth,
            &SequenceConfig::default(),
        )
    }

    /// Read from the host parameter store in a single coercion + validation pass.
    pub fn read(store: &ParameterStore, names: &SequenceConfig) -> Result<Self, ParamError> {
        let count = read_integer(store, &names.count)?;
        let pitch = read_length(store, &names.pitch)?;
        let start = read_integer(store, &names.start)?;
        let direction = match read_optional_text(store, &names.direction) {
            None => Direction::default(),
            Some(text) => Direction::parse(&text).ok_or_else(|| ParamError::Unrecognized {
                name: names.direction.clone(),
                text,
                expected: "one of +X, -X, +Y, -Y",
            })?,
        };
        let cut_depth = read_optional_length(store, &names.cut_depth)?;
        Self::validated(count, pitch, start, direction, cut_depth, names)
    }

    fn validated(
        segment_count: i64,
        segment_pitch: f64,
        start_number: i64,
        direction: Direction,
        cut_depth: Option<f64>,
        names: &SequenceConfig,
    ) -> Result<Self, ParamError> {
        if segment_count < 1 || segment_count > u32::MAX as i64 {
            return Err(ParamError::OutOfRange {
                name: names.count.clone(),
                value: segment_count as f64,
                requirement: "must be a positive integer",
            });
        }
        if !(segment_pitch.is_finite() && segment_pitch > 0.0) {
            return Err(ParamError::OutOfRange {
                name: names.pitch.clone(),
                value: segment_pitch,
                requirement: "must be a positive length",
            });
        }
        if start_number.checked_add(segment_count - 1).is_none() {
            return Err(ParamError::OutOfRange {
                name: names.start.clone(),
                value: start_number as f64,
                requirement: "last label would overflow",
            });
        }
        if let Some(depth) = cut_depth {
            if !(depth.is_finite() && depth > 0.0) {
                return Err(ParamError::OutOfRange {
                    name: names.cut_depth.clone(),
                    value: depth,
                    requirement: "must be a positive length when set",
                });
            }
        }
        Ok(Self {
            segment_count: segment_count as u32,
            segment_pitch,
            start_number,
            direction,
            cut_depth,
        })
    }
}

/// Upper bound on the honeycomb column count.
pub const MAX_COLUMNS: u32 = 10_000;

/// Parameters of the honeycomb tool
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoneycombParams {
    /// Target number of hexagons across the selected edge
    pub column_count: u32,
    /// Gap between adjacent hexagons, mm
    pub margin: f64,
    pub orientation: HexOrientation,
}

impl HoneycombParams {
    pub fn new(column_count: i64, margin: f64, orientation: HexOrientation) -> Result<Self, ParamError> {
        Self::validated(column_count, margin, orientation, &HoneycombConfig::default())
    }

    pub fn read(store: &ParameterStore, names: &HoneycombConfig) -> Result<Self, ParamError> {
        let columns = read_integer(store, &names.columns)?;
        let margin = read_length(store, &names.margin)?;
        let orientation = match read_optional_text(store, &names.pointy_top) {
            Some(text) if is_truthy(&text) => HexOrientation::PointyTop,
            _ => HexOrientation::FlatTop,
        };
        Self::validated(columns, margin, orientation, names)
    }

    fn validated(
        column_count: i64,
        margin: f64,
        orientation: HexOrientation,
        names: &HoneycombConfig,
    ) -> Result<Self, ParamError> {
        if column_count < 1 {
            return Err(ParamError::OutOfRange {
                name: names.columns.clone(),
                value: column_count as f64,
                requirement: "must be at least 1",
            });
        }
        if column_count > MAX_COLUMNS as i64 {
            return Err(ParamError::OutOfRange {
                name: names.columns.clone(),
                value: column_count as f64,
                requirement: "must be at most 10000",
            });
        }
        if !(margin.is_finite() && margin >= 0.0) {
            return Err(ParamError::OutOfRange {
                name: names.margin.clone(),
                value: margin,
                requirement: "must be a non-negative length",
            });
        }
        Ok(Self {
            column_count: column_count as u32,
            margin,
            orientation,
        })
    }
}
