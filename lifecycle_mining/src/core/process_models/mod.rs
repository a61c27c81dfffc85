//! Process Models
//!
//! Structs for the process model types produced by lifecycle discovery
pub mod case_centric;

/// IO errors shared by the process model types
pub mod io;
