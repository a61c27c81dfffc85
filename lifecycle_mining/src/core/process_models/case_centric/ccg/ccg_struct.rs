use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

use crate::core::event_data::lifecycle::{Activity, LifecycleLog, Trace};

///
/// A concurrency graph over collapsed [`Activity`]s
///
/// An (undirected) edge `{a, b}` exists iff the lifespans of `a` and `b`
/// overlap in at least one trace, i.e., some event of `b` occurs strictly
/// between a start of `a` and its matching complete. Activities without a
/// completed instance are atomic and never overlap anything.
///
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcurrencyGraph {
    /// Activities
    pub activities: BTreeSet<Activity>,
    /// Concurrency edges, stored with the smaller activity first
    pub edges: HashSet<(Activity, Activity)>,
}

impl ConcurrencyGraph {
    /// Create new [`ConcurrencyGraph`] without activities or edges
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct a [`ConcurrencyGraph`] from a (repaired) [`LifecycleLog`]
    pub fn create_from_log(log: &LifecycleLog) -> Self {
        let mut result = Self {
            activities: log.activities(),
            edges: HashSet::new(),
        };
        log.traces.iter().for_each(|t| result.add_trace(t));
        result
    }

    fn add_trace(&mut self, trace: &Trace) {
        for (i, event) in trace.events.iter().enumerate() {
            let Some(m) = trace.matching_complete(i) else {
                continue;
            };
            for other in &trace.events[i + 1..m] {
                self.add_edge(event, other);
            }
        }
    }

    /// Add an edge `{a, b}` (collapsed to default activities, no self-edges)
    pub fn add_edge(&mut self, a: &Activity, b: &Activity) {
        let (a, b) = (a.as_default(), b.as_default());
        if a == b {
            return;
        }
        self.activities.insert(a.clone());
        self.activities.insert(b.clone());
        self.edges.insert(normalized(a, b));
    }

    /// Returns `true` if `a` and `b` overlap in some trace
    pub fn is_concurrent(&self, a: &Activity, b: &Activity) -> bool {
        a != b && self.edges.contains(&normalized(a.clone(), b.clone()))
    }

    /// Returns `true` if every activity of `pa` is concurrent to every activity of `pb`
    pub fn are_concurrent<'a, I, J>(&self, pa: I, pb: J) -> bool
    where
        I: IntoIterator<Item = &'a Activity>,
        J: IntoIterator<Item = &'a Activity> + Clone,
    {
        pa.into_iter()
            .all(|a| pb.clone().into_iter().all(|b| self.is_concurrent(a, b)))
    }
}

fn normalized(a: Activity, b: Activity) -> (Activity, Activity) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event_data::lifecycle::Lifecycle;
    use crate::utils::test_utils::{events, pairs};

    fn d(label: &str) -> Activity {
        Activity::new(label, Lifecycle::Default)
    }

    fn ccg_of(traces: Vec<Trace>) -> ConcurrencyGraph {
        ConcurrencyGraph::create_from_log(&LifecycleLog::new(traces).repaired())
    }

    #[test]
    fn overlap_is_symmetric() {
        let ccg = ccg_of(vec![events("a+ b+ a- b-")]);
        assert!(ccg.is_concurrent(&d("a"), &d("b")));
        assert!(ccg.is_concurrent(&d("b"), &d("a")));
        assert_eq!(ccg.edges.len(), 1);
        assert!(!ccg.is_concurrent(&d("a"), &d("a")));
    }

    #[test]
    fn sequential_instances_do_not_overlap() {
        let ccg = ccg_of(vec![pairs("a b c"), pairs("c b a")]);
        assert!(ccg.edges.is_empty());
        assert_eq!(ccg.activities.len(), 3);
    }

    #[test]
    fn atomic_activities_cannot_be_overlapped() {
        // the orphan complete of b becomes an atomic step right before it
        let ccg = ccg_of(vec![events("a+ a- b-"), events("c+ c-")]);
        assert!(!ccg.is_concurrent(&d("a"), &d("b")));
        let ccg = ccg_of(vec![events("a+ b- a-")]);
        assert!(ccg.is_concurrent(&d("a"), &d("b")));
    }

    #[test]
    fn block_concurrency() {
        let ccg = ccg_of(vec![events("a+ b+ c+ a- b- c-")]);
        let left = [d("a")];
        let right = [d("b"), d("c")];
        assert!(ccg.are_concurrent(left.iter(), right.iter()));
        let ccg = ccg_of(vec![events("a+ b+ a- b- c+ c-")]);
        assert!(!ccg.are_concurrent(left.iter(), right.iter()));
    }
}
