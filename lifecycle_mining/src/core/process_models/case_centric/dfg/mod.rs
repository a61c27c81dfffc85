//! Directly-follows graph over lifecycle activities
pub(crate) mod dfg_struct;

#[doc(inline)]
pub use dfg_struct::{DirectlyFollowsGraph, Reachability};
