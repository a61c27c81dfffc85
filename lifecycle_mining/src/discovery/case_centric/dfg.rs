//! Discover [`DirectlyFollowsGraph`]s and [`ConcurrencyGraph`]s from lifecycle data

use crate::core::event_data::lifecycle::LifecycleLog;
use crate::core::process_models::case_centric::{ConcurrencyGraph, DirectlyFollowsGraph};

/// Discover a [`DirectlyFollowsGraph`] from a [`LifecycleLog`]
///
/// The log is repaired first, so unmatched start or complete events are
/// treated as atomic activities.
pub fn discover_dfg(log: &LifecycleLog) -> DirectlyFollowsGraph {
    DirectlyFollowsGraph::create_from_log(&log.repaired())
}

/// Discover a [`ConcurrencyGraph`] from a [`LifecycleLog`]
///
/// The log is repaired first (see [`discover_dfg`]).
pub fn discover_ccg(log: &LifecycleLog) -> ConcurrencyGraph {
    ConcurrencyGraph::create_from_log(&log.repaired())
}
