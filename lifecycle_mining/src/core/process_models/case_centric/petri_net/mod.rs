//! Nets synthesized from lifecycle process trees
pub(crate) mod petri_net_struct;
pub use petri_net_struct::*;
pub mod io;
pub mod reduction;

#[doc(inline)]
pub use reduction::ReductionSkip;
