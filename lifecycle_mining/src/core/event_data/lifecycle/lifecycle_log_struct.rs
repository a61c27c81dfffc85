use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

use super::activity::{Activity, Lifecycle};
use super::trace_repair::repair_trace;

///
/// A trace: ordered sequence of lifecycle events ([`Activity`] occurrences)
///
/// Traces may be inconsistent (unmatched start/complete events) until they
/// are repaired (see [`Trace::repaired`]).
///
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trace {
    /// Case identifier this trace was recorded for (if known)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_id: Option<u64>,
    /// Lifecycle events of this trace
    pub events: Vec<Activity>,
}

impl Trace {
    /// Create a new [`Trace`] from events
    pub fn new(events: Vec<Activity>) -> Self {
        Self {
            case_id: None,
            events,
        }
    }

    /// The trace consisting of the silent start/complete pair only
    pub fn silent() -> Self {
        Self::new(Activity::silent_pair())
    }

    /// Returns `true` if the trace consists of exactly the silent pair
    pub fn is_silent(&self) -> bool {
        self.events.len() == 2
            && self.events[0].is_silent()
            && self.events[0].is_start()
            && self.events[1].is_silent()
            && self.events[1].is_complete()
    }

    /// Number of lifecycle events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` if the trace contains no events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Repaired copy of this trace (see [`repair_trace`])
    pub fn repaired(&self) -> Self {
        repair_trace(self)
    }

    /// Collapsed (marker-erased) activities occurring in this trace
    pub fn activities(&self) -> BTreeSet<Activity> {
        self.events.iter().map(Activity::as_default).collect()
    }

    ///
    /// Position of the complete event matching the start event at `start_index`
    ///
    /// Nested instances of the same label are matched innermost first.
    /// Returns `None` if the event at `start_index` is not a start event or
    /// if it is never completed (i.e., the activity is atomic).
    ///
    pub fn matching_complete(&self, start_index: usize) -> Option<usize> {
        let start = self.events.get(start_index)?;
        if !start.is_start() {
            return None;
        }
        let mut depth = 0usize;
        for (i, e) in self.events.iter().enumerate().skip(start_index + 1) {
            if e.label != start.label {
                continue;
            }
            match e.lifecycle {
                Lifecycle::Start => depth += 1,
                Lifecycle::Complete if depth == 0 => return Some(i),
                Lifecycle::Complete => depth -= 1,
                Lifecycle::Default => {}
            }
        }
        None
    }

    ///
    /// Start and end activities of this trace
    ///
    /// Start activities are all activities started before the first complete
    /// event. End activities are all activities completed after the last
    /// start event, excluding activities that are already start activities.
    ///
    pub fn start_end_activities(&self) -> (Vec<Activity>, Vec<Activity>) {
        let mut starts: Vec<Activity> = Vec::new();
        for e in self.events.iter().take_while(|e| !e.is_complete()) {
            let activity = e.as_default();
            if !starts.contains(&activity) {
                starts.push(activity);
            }
        }
        let mut ends: Vec<Activity> = Vec::new();
        for e in self.events.iter().rev().take_while(|e| !e.is_start()) {
            let activity = e.as_default();
            if !starts.contains(&activity) && !ends.contains(&activity) {
                ends.push(activity);
            }
        }
        (starts, ends)
    }
}

impl From<Vec<Activity>> for Trace {
    fn from(events: Vec<Activity>) -> Self {
        Self::new(events)
    }
}

///
/// Event log of lifecycle [`Trace`]s
///
/// The order of traces is irrelevant to discovery; the order of events within
/// a trace is significant.
///
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleLog {
    /// Traces
    pub traces: Vec<Trace>,
}

impl LifecycleLog {
    /// Create a new [`LifecycleLog`] from traces
    pub fn new(traces: Vec<Trace>) -> Self {
        Self { traces }
    }

    /// Copy of this log with every trace repaired
    pub fn repaired(&self) -> Self {
        Self {
            traces: self.traces.iter().map(Trace::repaired).collect(),
        }
    }

    /// Returns `true` if the log has no traces
    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }

    /// Collapsed activity alphabet of the log, in label order
    pub fn activities(&self) -> BTreeSet<Activity> {
        self.traces
            .iter()
            .flat_map(|t| t.events.iter().map(Activity::as_default))
            .collect()
    }

    /// Returns `true` if some trace is the silent pair
    pub fn contains_silent_trace(&self) -> bool {
        self.traces.iter().any(Trace::is_silent)
    }

    /// Copy of this log without silent (or empty) traces
    pub fn without_silent_traces(&self) -> Self {
        Self {
            traces: self
                .traces
                .iter()
                .filter(|t| !t.is_silent() && !t.is_empty())
                .cloned()
                .collect(),
        }
    }

    ///
    /// Start and end activities common to all traces
    ///
    /// See [`Trace::start_end_activities`]. For an empty log both sets are empty.
    ///
    pub fn common_start_end_activities(&self) -> (HashSet<Activity>, HashSet<Activity>) {
        let mut per_trace = self.traces.iter().map(Trace::start_end_activities);
        let Some((first_starts, first_ends)) = per_trace.next() else {
            return (HashSet::new(), HashSet::new());
        };
        let mut starts: HashSet<Activity> = first_starts.into_iter().collect();
        let mut ends: HashSet<Activity> = first_ends.into_iter().collect();
        for (s, e) in per_trace {
            starts.retain(|a| s.contains(a));
            ends.retain(|a| e.contains(a));
        }
        (starts, ends)
    }
}

impl From<Vec<Trace>> for LifecycleLog {
    fn from(traces: Vec<Trace>) -> Self {
        Self::new(traces)
    }
}
