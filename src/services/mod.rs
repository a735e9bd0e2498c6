//! Service layer for the post queue.
//!
//! - Post fetching (`SearchClient`, behind the `PostSource` trait)

mod search;

pub use search::{PostSource, SearchClient};
