//! itemshelf-core: shared types, errors, and configuration.
//!
//! This crate is the foundational dependency for the other itemshelf crates,
//! providing the catalog item model, a unified error type, and the
//! application configuration.

pub mod config;
pub mod error;
pub mod item;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, Result};
pub use item::{Item, ItemId, NewItem};
