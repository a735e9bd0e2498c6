// src/models/mod.rs

//! Domain models for the post queue.

mod config;
mod post;

// Re-export all public types
pub use config::{Config, QueueConfig, QueueMode, SearchConfig, StorageConfig};
pub use post::{FIELD_SEPARATOR, Post, SearchResponse, SearchResult};
