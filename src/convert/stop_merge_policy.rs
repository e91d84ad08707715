use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Enumerates alternative ways to map GTFS stops onto output stop
/// facilities. Listed in evaluation priority order per stop.
#[derive(Serialize, Deserialize, Debug, ValueEnum, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StopMergePolicy {
    /// one facility per GTFS stop id; keeps per-platform granularity
    #[default]
    DoNotMerge,
    /// the first stop seen at a rounded coordinate wins; later stops at
    /// the same coordinate alias to it
    MergeAtSameCoordinate,
    /// stops with a parent station alias to the parent's facility; parent
    /// stations are never aliased further
    MergeToParentStation,
    /// stops with a parent alias to a facility per parent station and
    /// combination of route types serving the stop; stops without a parent
    /// keep their own id
    MergeToParentAndRouteTypes,
}
