// src/lib.rs

//! Post queue library: surfaces one unseen search result per run.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
