//! Error taxonomy of a tool run.

use crate::document::{DocError, DocOp};
use crate::params::ParamError;
use crate::provenance::Origin;
use thiserror::Error;

/// Every way a run can abort. A run that aborts leaves the document as it was.
///
/// "Nothing to place" is deliberately absent: a degenerate honeycomb completes
/// normally and is reported through [`crate::runner::RunOutcome`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PatternError {
    #[error("Invalid parameters: {0}")]
    InvalidParameters(#[from] ParamError),

    #[error("No template found: {0}")]
    NoTemplateFound(String),

    #[error("Ambiguous template: {0}")]
    AmbiguousTemplate(String),

    #[error("Unsupported geometry: {0}")]
    UnsupportedGeometry(String),

    #[error("{op} failed{}: {message}", target_suffix(.target))]
    HostOperationFailed {
        op: DocOp,
        target: Option<Origin>,
        message: String,
    },
}

impl PatternError {
    /// Wrap an adapter failure, recording which plan element it was realising.
    pub fn host(err: DocError, target: Option<Origin>) -> Self {
        Self::HostOperationFailed {
            op: err.op,
            target,
            message: err.message,
        }
    }

    /// Short machine-readable code, e.g. for host message boxes or logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidParameters(_) => "invalid_parameters",
            Self::NoTemplateFound(_) => "no_template_found",
            Self::AmbiguousTemplate(_) => "ambiguous_template",
            Self::UnsupportedGeometry(_) => "unsupported_geometry",
            Self::HostOperationFailed { .. } => "host_operation_failed",
        }
    }
}

fn target_suffix(target: &Option<Origin>) -> String {
    match target {
        Some(origin) => format!(" for {}", origin),
        None => String::new(),
    }
}

pub type PatternResult<T> = Result<T, PatternError>;
