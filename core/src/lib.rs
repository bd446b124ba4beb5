pub mod config;
pub mod document;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod params;
pub mod provenance;
pub mod regen;
pub mod runner;
pub mod units;

pub use config::ToolConfig;
pub use document::{Document, MemoryDocument};
pub use error::{PatternError, PatternResult};
pub use runner::{run_honeycomb, run_sequence, RunOutcome, RunReport};

pub fn version() -> &'static str {
    "0.1.0"
}
