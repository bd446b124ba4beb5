use crate::geometry::Rect;
use crate::provenance::EntityId;
use serde::{Deserialize, Serialize};

/// A closed profile produced by text glyphs, with its sketch-space bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileRegion {
    pub handle: EntityId,
    pub bounds: Rect,
}

/// Drop profiles that sit strictly inside another profile's bounds.
///
/// Glyphs such as `0`, `6` and `8` yield their counters as separate profiles;
/// cutting those as well would leave the islands standing. Order of the
/// remaining profiles is preserved.
pub fn filter_outer_profiles(profiles: &[ProfileRegion]) -> Vec<ProfileRegion> {
    profiles
        .iter()
        .enumerate()
        .filter(|(i, candidate)| {
            !profiles
                .iter()
                .enumerate()
                .any(|(j, other)| *i != j && other.bounds.strictly_contains_rect(&candidate.bounds))
        })
        .map(|(_, p)| *p)
        .collect()
}
