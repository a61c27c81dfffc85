//! Case-centric process models and relation graphs
pub mod ccg;
pub mod dfg;
pub mod petri_net;
pub mod process_tree;

#[doc(inline)]
pub use ccg::ConcurrencyGraph;
#[doc(inline)]
pub use dfg::DirectlyFollowsGraph;
#[doc(inline)]
pub use petri_net::LifecycleNet;
#[doc(inline)]
pub use process_tree::ProcessTree;
