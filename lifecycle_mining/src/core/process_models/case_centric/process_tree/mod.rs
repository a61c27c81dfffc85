//! Process trees discovered from lifecycle logs
pub mod io;
pub(crate) mod process_tree_struct;

#[doc(inline)]
pub use process_tree_struct::{CutType, ProcessTree};
