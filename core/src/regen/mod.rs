//! Tag-and-sweep regeneration.
//!
//! Every entity a tool creates carries that tool's provenance tag. A run first
//! deletes everything in its scope bearing the tag, then recreates from the
//! current plan, so nothing from a previous run can survive a parameter change
//! and untagged user geometry is never touched.

pub mod template;
pub mod tracker;

pub use template::select_template;
pub use tracker::RegenerationTracker;
