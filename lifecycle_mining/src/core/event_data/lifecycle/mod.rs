//! Lifecycle Event Data
//!
//! Event logs whose events mark the start or completion of an activity
//! instance.
pub mod activity;
pub mod io;
#[doc(hidden)]
pub(crate) mod lifecycle_log_struct;
pub mod record_ingest;
pub mod trace_repair;

#[doc(inline)]
pub use activity::{Activity, Lifecycle, SILENT_LABEL};
#[doc(inline)]
pub use lifecycle_log_struct::*;
