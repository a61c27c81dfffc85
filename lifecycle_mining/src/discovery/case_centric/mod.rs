//! Case-centric process discovery
pub mod dfg;
pub mod lifecycle_inductive;
