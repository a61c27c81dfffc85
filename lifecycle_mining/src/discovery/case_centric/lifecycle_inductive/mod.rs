//! Lifecycle Inductive Miner
//!
//! Discovers a [`ProcessTree`](crate::core::process_models::case_centric::ProcessTree)
//! from a log of start/complete events by recursively splitting the log along
//! sequence, interleaving, parallel, exclusive-choice and loop cuts, falling
//! back to a flower model if no cut applies. The tree can be turned into a
//! [`LifecycleNet`](crate::core::process_models::case_centric::LifecycleNet).
//!
//! Use [`LifecycleInductiveMiner`] to keep the intermediate graphs around, or
//! [`discover_process_tree`] / [`discover_lifecycle_net`] for one-shot
//! discovery.

/// Algorithm parameters
pub mod config;
pub mod cuts;
/// Miner holding a log together with its graphs and discovered tree
pub mod miner;
/// Recursive decomposition of a log into a process tree
pub mod mining;
/// Process tree to net conversion
pub mod net_synthesis;
/// Partitions of an activity alphabet
pub mod partition;
pub mod sublogs;

#[doc(inline)]
pub use config::LifecycleMinerConfig;
#[doc(inline)]
pub use miner::LifecycleInductiveMiner;
#[doc(inline)]
pub use mining::discover_process_tree;
#[doc(inline)]
pub use net_synthesis::{discover_lifecycle_net, synthesize_net};
