#![warn(
    clippy::doc_markdown,
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs
)]

#![doc = include_str!("../README.md")]

pub mod core;

pub mod discovery;

/// Util module with smaller helper functions, structs or enums
#[cfg(test)]
pub(crate) mod utils;

#[doc(inline)]
pub use crate::core::{
    Activity, ConcurrencyGraph, DirectlyFollowsGraph, Lifecycle, LifecycleLog, LifecycleNet,
    ProcessTree, Trace,
};

#[doc(inline)]
pub use crate::core::io::{Exportable, Importable};

#[doc(inline)]
pub use discovery::case_centric::lifecycle_inductive::{
    discover_lifecycle_net, discover_process_tree, synthesize_net, LifecycleInductiveMiner,
    LifecycleMinerConfig,
};

#[doc(inline)]
pub use discovery::case_centric::dfg::{discover_ccg, discover_dfg};
