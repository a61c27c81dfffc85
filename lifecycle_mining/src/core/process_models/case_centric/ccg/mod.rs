//! Concurrency graph over lifecycle activities
pub(crate) mod ccg_struct;

#[doc(inline)]
pub use ccg_struct::ConcurrencyGraph;
