//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Storage (LocalStorage on web, JSON files natively)
//! - Wall-clock time
//! - JS bindings for the web renderer

pub mod storage;
pub mod time;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use storage::{KeyValueStore, default_store};
pub use time::now_ms;
