//! Core modules for lifecycle mining

pub use chrono;
pub mod event_data;

/// IO Traits
pub mod io;

pub mod process_models;

pub use event_data::lifecycle::{Activity, Lifecycle, LifecycleLog, Trace};
pub use process_models::case_centric::{
    ConcurrencyGraph, DirectlyFollowsGraph, LifecycleNet, ProcessTree,
};
