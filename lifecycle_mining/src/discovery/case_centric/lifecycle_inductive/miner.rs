use tracing::info;

use crate::core::event_data::lifecycle::LifecycleLog;
use crate::core::process_models::case_centric::{
    ConcurrencyGraph, DirectlyFollowsGraph, LifecycleNet, ProcessTree,
};

use super::config::LifecycleMinerConfig;
use super::mining::{base_case, mine};
use super::net_synthesis::synthesize_net;

/// Expression returned by [`LifecycleInductiveMiner::process_tree_expression`] before discovery
pub const NO_PROCESS_TREE: &str = "No process tree available: run discover() first";

///
/// Lifecycle inductive miner for one [`LifecycleLog`]
///
/// Construction repairs the log, derives its directly-follows and
/// concurrency graphs and checks whether the log is already minimal.
/// [`LifecycleInductiveMiner::discover`] then runs the recursive cut
/// detection. The graphs of the log are the root graphs shared by the
/// whole recursion.
///
#[derive(Debug, Clone)]
pub struct LifecycleInductiveMiner {
    log: LifecycleLog,
    config: LifecycleMinerConfig,
    dfg: DirectlyFollowsGraph,
    ccg: ConcurrencyGraph,
    base_case: Option<ProcessTree>,
    process_tree: Option<ProcessTree>,
}

impl LifecycleInductiveMiner {
    /// Create a miner with the default [`LifecycleMinerConfig`]
    pub fn new(log: &LifecycleLog) -> Self {
        Self::with_config(log, LifecycleMinerConfig::default())
    }

    /// Create a miner with the given [`LifecycleMinerConfig`]
    pub fn with_config(log: &LifecycleLog, config: LifecycleMinerConfig) -> Self {
        let log = log.repaired();
        let dfg = DirectlyFollowsGraph::create_from_log(&log);
        let ccg = ConcurrencyGraph::create_from_log(&log);
        let base_case = base_case(&log);
        Self {
            log,
            config,
            dfg,
            ccg,
            base_case,
            process_tree: None,
        }
    }

    /// Repaired log
    pub fn log(&self) -> &LifecycleLog {
        &self.log
    }

    /// Algorithm parameters
    pub fn config(&self) -> &LifecycleMinerConfig {
        &self.config
    }

    /// Directly-follows graph of the (repaired) log
    pub fn dfg(&self) -> &DirectlyFollowsGraph {
        &self.dfg
    }

    /// Concurrency graph of the (repaired) log
    pub fn ccg(&self) -> &ConcurrencyGraph {
        &self.ccg
    }

    /// Returns `true` if the log is minimal (a single leaf)
    pub fn is_base_case(&self) -> bool {
        self.base_case.is_some()
    }

    /// Run cut detection (once) and return the discovered [`ProcessTree`]
    pub fn discover(&mut self) -> &ProcessTree {
        let tree = match self.process_tree.take() {
            Some(tree) => tree,
            None => {
                let tree = match &self.base_case {
                    Some(leaf) => leaf.clone(),
                    None => mine(&self.log, &self.dfg, &self.config),
                };
                info!(
                    "Discovered process tree of depth {} over {} activities",
                    tree.depth(),
                    tree.activities().len()
                );
                tree
            }
        };
        self.process_tree.insert(tree)
    }

    /// Returns `true` once [`LifecycleInductiveMiner::discover`] was run
    pub fn is_discovered(&self) -> bool {
        self.process_tree.is_some()
    }

    /// Discovered [`ProcessTree`] (`None` before discovery)
    pub fn process_tree(&self) -> Option<&ProcessTree> {
        self.process_tree.as_ref()
    }

    ///
    /// Textual expression of the discovered tree
    ///
    /// Before discovery, a diagnostic text ([`NO_PROCESS_TREE`]) is returned instead.
    ///
    pub fn process_tree_expression(&self) -> String {
        self.process_tree
            .as_ref()
            .map_or_else(|| NO_PROCESS_TREE.to_string(), ProcessTree::to_string)
    }

    /// Net of the discovered tree (`None` before discovery)
    pub fn petri_net(&self) -> Option<LifecycleNet> {
        self.process_tree
            .as_ref()
            .map(|tree| synthesize_net(tree, self.config.reduce_net))
    }
}
