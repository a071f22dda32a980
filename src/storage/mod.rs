//! Storage Layer
//!
//! Profile and group store seams, the in-memory store, and JSON config.

pub mod config;
pub mod memory;
pub mod store;

pub use config::*;
pub use memory::InMemoryStore;
pub use store::{GroupStore, ProfileStore};
