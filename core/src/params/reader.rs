//! Typed reads from the parameter store with explicit coercion.

use super::types::{Parameter, ParameterStore, Unit};
use std::fmt;
use thiserror::Error;

/// What a parameter is expected to hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Integer,
    Length,
    Text,
}

impl ParamKind {
    fn hint(&self) -> &'static str {
        match self {
            Self::Integer => "Create it as a unitless integer user parameter.",
            Self::Length => "Create it with a length unit (e.g. 0.5 mm).",
            Self::Text => "Create it as a text user parameter.",
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer => write!(f, "a unitless integer"),
            Self::Length => write!(f, "a length"),
            Self::Text => write!(f, "text"),
        }
    }
}

/// Parameter read / validation failure
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParamError {
    #[error("Missing user parameter \"{name}\". {}", .expected.hint())]
    Missing { name: String, expected: ParamKind },

    #[error("Parameter \"{name}\" must be {expected}, found {found}")]
    WrongKind { name: String, expected: ParamKind, found: Unit },

    #[error("Parameter \"{name}\" has no evaluated value")]
    NotEvaluated { name: String },

    #[error("Parameter \"{name}\" = {value} is out of range: {requirement}")]
    OutOfRange { name: String, value: f64, requirement: &'static str },

    #[error("Parameter \"{name}\" has unrecognized value '{text}' (expected {expected})")]
    Unrecognized { name: String, text: String, expected: &'static str },

    #[error("Parameter \"{0}\" already exists")]
    Duplicate(String),
}

/// Normalise a text parameter: trim whitespace, strip surrounding quotes, upper-case.
pub fn clean_text(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c| c == '\'' || c == '"')
        .trim()
        .to_uppercase()
}

fn lookup<'a>(
    store: &'a ParameterStore,
    name: &str,
    expected: ParamKind,
) -> Result<&'a Parameter, ParamError> {
    store.get_by_name(name).ok_or_else(|| ParamError::Missing {
        name: name.to_string(),
        expected,
    })
}

fn evaluated(parameter: &Parameter) -> Result<f64, ParamError> {
    match parameter.value {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(ParamError::NotEvaluated { name: parameter.name.clone() }),
    }
}

/// Largest magnitude an f64 can hold while still representing every integer exactly.
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// Read a unitless integer; the host value is rounded to the nearest integer.
pub fn read_integer(store: &ParameterStore, name: &str) -> Result<i64, ParamError> {
    let parameter = lookup(store, name, ParamKind::Integer)?;
    if parameter.unit != Unit::Dimensionless {
        return Err(ParamError::WrongKind {
            name: name.to_string(),
            expected: ParamKind::Integer,
            found: parameter.unit,
        });
    }
    let value = evaluated(parameter)?.round();
    if value.abs() > MAX_EXACT_INT {
        return Err(ParamError::OutOfRange {
            name: name.to_string(),
            value,
            requirement: "integer magnitude too large",
        });
    }
    Ok(value as i64)
}

/// Read a length, converted to millimetres.
pub fn read_length(store: &ParameterStore, name: &str) -> Result<f64, ParamError> {
    let parameter = lookup(store, name, ParamKind::Length)?;
    length_of(parameter)
}

/// Read a length that may be absent.
pub fn read_optional_length(store: &ParameterStore, name: &str) -> Result<Option<f64>, ParamError> {
    store.get_by_name(name).map(length_of).transpose()
}

fn length_of(parameter: &Parameter) -> Result<f64, ParamError> {
    match parameter.unit {
        Unit::Length(unit) => Ok(unit.to_mm(evaluated(parameter)?)),
        other => Err(ParamError::WrongKind {
            name: parameter.name.clone(),
            expected: ParamKind::Length,
            found: other,
        }),
    }
}

/// Read the cleaned expression text of an optional parameter.
pub fn read_optional_text(store: &ParameterStore, name: &str) -> Option<String> {
    store.get_by_name(name).map(|p| clean_text(&p.expression))
}

/// Interpret a cleaned flag text the way users type booleans.
pub fn is_truthy(cleaned: &str) -> bool {
    matches!(cleaned, "TRUE" | "YES" | "1")
}
