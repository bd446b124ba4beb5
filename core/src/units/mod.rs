use serde::{Deserialize, Serialize};
use std::fmt;

/// Length units a host may store parameters in. The layout core works in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LengthUnit {
    #[default]
    Millimeter,
    Centimeter,
    Meter,
    Inch,
    Foot,
}

impl LengthUnit {
    pub fn to_mm(&self, value: f64) -> f64 {
        match self {
            Self::Millimeter => value,
            Self::Centimeter => value * 10.0,
            Self::Meter => value * 1000.0,
            Self::Inch => value * 25.4,
            Self::Foot => value * 304.8,
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Millimeter => write!(f, "mm"),
            Self::Centimeter => write!(f, "cm"),
            Self::Meter => write!(f, "m"),
            Self::Inch => write!(f, "in"),
            Self::Foot => write!(f, "ft"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_mm_factors() {
        assert_eq!(LengthUnit::Millimeter.to_mm(2.5), 2.5);
        assert!((LengthUnit::Meter.to_mm(0.002) - 2.0).abs() < 1e-12);
        assert!((LengthUnit::Inch.to_mm(1.0) - 25.4).abs() < 1e-12);
        assert!((LengthUnit::Foot.to_mm(0.5) - 152.4).abs() < 1e-12);
    }

    #[test]
    fn test_host_internal_centimetres() {
        // Hosts commonly store lengths in centimetres internally.
        assert!((LengthUnit::Centimeter.to_mm(0.05) - 0.5).abs() < 1e-12);
    }
}
