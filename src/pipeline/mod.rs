//! Pipeline entry points for queue operations.
//!
//! - `merge`: Fold fetched posts into the backlog and advance the watermark
//! - `emit`: Pick the record to surface and the backlog to keep
//! - `run_once`: Read state, fetch, merge, emit, persist

pub mod emit;
pub mod merge;
pub mod run;

pub use emit::{Emission, emit};
pub use merge::{Merged, merge};
pub use run::{RunReport, run_once};
