//! Event Data
//!
//! Fundamental structs and adjacent utilities for process data
pub mod lifecycle;

#[doc(inline)]
pub use lifecycle::LifecycleLog;
