//! User parameter store and typed parameter sets.
//!
//! Parameters live in the host document as named entries with an expression,
//! a host-evaluated value and a unit. Each tool reads them once per run:
//! - explicit coercion (integers rounded, lengths converted to mm, text cleaned)
//! - a single validation pass; any failure rejects the whole set

pub mod types;
pub mod reader;
pub mod set;


pub use types::{Parameter, ParameterStore, Unit};
pub use reader::{clean_text, ParamError, ParamKind};
pub use set::{Direction, HexOrientation, HoneycombParams, SequenceParams, MAX_COLUMNS};
