//! Pure layout computation.
//!
//! Given validated parameters and the reference geometry read from the
//! document, these functions return the complete plan for a run. They hold no
//! state and never look at what a previous run produced.

pub mod sequence;
pub mod honeycomb;
pub mod profiles;

#[cfg(test)]
mod tests_honeycomb;

pub use sequence::{cut_directives, format_label, CutDirective, Segment, TemplateEntity};
pub use honeycomb::{
    BoundingRegion, CellMetrics, Degenerate, EdgeFrame, HexCell, HexProfile, HoneycombLayout, Side,
};
pub use profiles::{filter_outer_profiles, ProfileRegion};
