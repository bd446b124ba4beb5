//! Core types for the user parameter store.

use super::reader::ParamError;
use crate::provenance::EntityId;
use crate::units::LengthUnit;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Unit of a stored parameter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum Unit {
    #[default]
    Dimensionless,
    Length(LengthUnit),
    /// Free text; only the expression is meaningful
    Text,
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dimensionless => write!(f, "unitless"),
            Self::Length(lu) => write!(f, "{}", lu),
            Self::Text => write!(f, "text"),
        }
    }
}

/// A named user parameter as the host stores it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub id: EntityId,
    /// Parameter name (case-sensitive, must be unique)
    pub name: String,
    /// Text as typed by the user, e.g. `6 mm` or `'+X'`
    pub expression: String,
    pub unit: Unit,
    /// None for text parameters or when the host failed to evaluate it.
    pub value: Option<f64>,
}

impl Parameter {
    /// Create a numeric parameter with an already evaluated value
    pub fn number(name: &str, value: f64, unit: Unit) -> Self {
        let expression = match unit {
            Unit::Length(lu) => format!("{} {}", value, lu),
            _ => value.to_string(),
        };
        Self {
            id: EntityId::new(),
            name: name.to_string(),
            expression,
            unit,
            value: Some(value),
        }
    }

    /// Create a text parameter
    pub fn text(name: &str, text: &str) -> Self {
        Self {
            id: EntityId::new(),
            name: name.to_string(),
            expression: text.to_string(),
            unit: Unit::Text,
            value: None,
        }
    }
}

/// Container for all user parameters of a document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterStore {
    /// Parameters indexed by ID
    parameters: HashMap<EntityId, Parameter>,
    /// Fast lookup by name
    by_name: HashMap<String, EntityId>,
}

impl ParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter to the store
    pub fn add(&mut self, parameter: Parameter) -> Result<EntityId, ParamError> {
        if self.by_name.contains_key(&parameter.name) {
            return Err(ParamError::Duplicate(parameter.name));
        }

        let id = parameter.id;
        self.by_name.insert(parameter.name.clone(), id);
        self.parameters.insert(id, parameter);
        Ok(id)
    }

    /// Insert or replace a parameter by name; a replaced parameter keeps its ID
    pub fn set(&mut self, mut parameter: Parameter) -> EntityId {
        if let Some(&existing) = self.by_name.get(&parameter.name) {
            parameter.id = existing;
            self.parameters.insert(existing, parameter);
            existing
        } else {
            let id = parameter.id;
            self.by_name.insert(parameter.name.clone(), id);
            self.parameters.insert(id, parameter);
            id
        }
    }

    pub fn get_by_name(&self, name: &str) -> Option<&Parameter> {
        self.by_name.get(name).and_then(|id| self.parameters.get(id))
    }
}
