use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use std::collections::{BTreeSet, HashMap, HashSet};

use crate::core::event_data::lifecycle::{Activity, Lifecycle, LifecycleLog, Trace};

///
/// A directly-follows graph over collapsed (marker-erased) [`Activity`]s
///
/// Relations are derived from lifecycle traces: an activity is followed by
/// everything that happens while it is running, and by the activities that
/// start right after it completes. Each relation is annotated with the number
/// of times it was observed; a pair is never stored twice.
///
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectlyFollowsGraph {
    /// Activities
    pub activities: BTreeSet<Activity>,
    /// Directly-follows relations
    #[serde_as(as = "Vec<(_, _)>")]
    pub directly_follows_relations: HashMap<(Activity, Activity), u32>,
}

impl DirectlyFollowsGraph {
    /// Create new [`DirectlyFollowsGraph`] with no activities and directly-follows relations.
    pub fn new() -> Self {
        Self::default()
    }

    ///
    /// Construct a [`DirectlyFollowsGraph`] from a (repaired) [`LifecycleLog`]
    ///
    /// For a start event of `a`, every event strictly between it and its
    /// matching complete yields `a -> b`; if `b` is started and completed
    /// within that window, `b -> a` is added as well. For a complete event of
    /// `a`, every following start event yields `a -> b` until the complete
    /// event of an activity already started in this forward scan is reached.
    ///
    pub fn create_from_log(log: &LifecycleLog) -> Self {
        let mut result = Self::new();
        log.activities()
            .into_iter()
            .for_each(|a| result.add_activity(a));
        log.traces.iter().for_each(|t| result.add_trace(t));
        result
    }

    fn add_trace(&mut self, trace: &Trace) {
        let events = &trace.events;
        for (i, event) in events.iter().enumerate() {
            let a = event.as_default();
            match event.lifecycle {
                Lifecycle::Start => {
                    let Some(m) = trace.matching_complete(i) else {
                        continue;
                    };
                    for j in (i + 1)..m {
                        let b = events[j].as_default();
                        self.add_df_relation(a.clone(), b.clone(), 1);
                        let nested =
                            events[j].is_start() && trace.matching_complete(j).is_some_and(|k| k < m);
                        if nested {
                            self.add_df_relation(b, a.clone(), 1);
                        }
                    }
                }
                Lifecycle::Complete => {
                    let mut started: HashSet<&str> = HashSet::new();
                    for next in &events[i + 1..] {
                        if next.is_start() {
                            self.add_df_relation(a.clone(), next.as_default(), 1);
                            started.insert(next.label.as_str());
                        } else if next.is_complete() && started.contains(next.label.as_str()) {
                            break;
                        }
                    }
                }
                Lifecycle::Default => {}
            }
        }
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Add an activity (collapsed to its default view)
    pub fn add_activity(&mut self, activity: Activity) {
        self.activities.insert(activity.as_default());
    }

    ///
    /// Add a directly-follows relation with a frequency.
    ///
    /// Both activities are collapsed to their default view. Self-relations
    /// carry no ordering information and are ignored.
    ///
    pub fn add_df_relation(&mut self, from: Activity, to: Activity, frequency: u32) {
        let (from, to) = (from.as_default(), to.as_default());
        if from == to {
            return;
        }
        self.activities.insert(from.clone());
        self.activities.insert(to.clone());
        *self
            .directly_follows_relations
            .entry((from, to))
            .or_default() += frequency;
    }

    /// Number of distinct directly-follows relations
    pub fn len(&self) -> usize {
        self.directly_follows_relations.len()
    }

    /// Returns `true` if the graph has no directly-follows relations
    pub fn is_empty(&self) -> bool {
        self.directly_follows_relations.is_empty()
    }

    /// Literal membership of the relation `a -> b`
    pub fn directly_reaches(&self, a: &Activity, b: &Activity) -> bool {
        self.directly_follows_relations
            .contains_key(&(a.clone(), b.clone()))
    }

    /// Iterate over all directly-follows relations
    pub fn relations(&self) -> impl Iterator<Item = (&Activity, &Activity)> {
        self.directly_follows_relations.keys().map(|(a, b)| (a, b))
    }

    /// Activities `x` with a relation `x -> b`
    pub fn predecessors<'a>(&'a self, b: &'a Activity) -> impl Iterator<Item = &'a Activity> {
        self.relations()
            .filter_map(move |(from, to)| (to == b).then_some(from))
    }

    /// Activities `x` with a relation `a -> x`
    pub fn successors<'a>(&'a self, a: &'a Activity) -> impl Iterator<Item = &'a Activity> {
        self.relations()
            .filter_map(move |(from, to)| (from == a).then_some(to))
    }

    /// Creates a [`DiGraph`] with one node per activity and one edge per relation.
    pub fn to_graph(&self) -> (DiGraph<Activity, u32>, HashMap<Activity, NodeIndex>) {
        let mut graph = DiGraph::new();
        let mut nodes: HashMap<Activity, NodeIndex> = HashMap::new();
        for a in &self.activities {
            nodes.insert(a.clone(), graph.add_node(a.clone()));
        }
        for ((from, to), freq) in &self.directly_follows_relations {
            graph.add_edge(nodes[from], nodes[to], *freq);
        }
        (graph, nodes)
    }

    /// Transitive closure of the graph, for repeated [`Reachability::reaches`] queries
    pub fn reachability(&self) -> Reachability {
        let (graph, nodes) = self.to_graph();
        let reachable = nodes
            .iter()
            .map(|(a, start)| {
                let mut dfs = Dfs::new(&graph, *start);
                let mut targets = HashSet::new();
                while let Some(n) = dfs.next(&graph) {
                    targets.insert(graph[n].clone());
                }
                (a.clone(), targets)
            })
            .collect();
        Reachability { reachable }
    }
}

///
/// Precomputed reachability of a [`DirectlyFollowsGraph`]
///
#[derive(Debug, Clone, Default)]
pub struct Reachability {
    reachable: HashMap<Activity, HashSet<Activity>>,
}

impl Reachability {
    /// Returns `true` if `b` can be reached from `a` (every activity reaches itself)
    pub fn reaches(&self, a: &Activity, b: &Activity) -> bool {
        a == b || self.reachable.get(a).is_some_and(|r| r.contains(b))
    }
}
