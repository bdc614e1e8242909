//! itemshelf-db: item persistence layer.
//!
//! This crate provides the [`repository::ItemRepository`] abstraction with
//! two interchangeable backends: a flat JSON file and SQLite (with connection
//! pooling, embedded migrations, and query modules for either category
//! layout).
//!
//! # Modules
//!
//! - `migrations` - Embedded schema for the normalized and denormalized layouts
//! - `pool` - Connection pool management
//! - `models` - Row mapping into item models
//! - `queries` - Database query operations
//! - `repository` - The item store trait and its backends
//!
//! # Example
//!
//! ```no_run
//! use itemshelf_core::config::CategoryLayout;
//! use itemshelf_core::NewItem;
//! use itemshelf_db::pool::init_pool;
//! use itemshelf_db::repository::{ItemRepository, SqlItemRepository};
//!
//! let pool = init_pool("db/mercari.sqlite3", CategoryLayout::Normalized).unwrap();
//! let repo = SqlItemRepository::new(pool, CategoryLayout::Normalized);
//!
//! let item = repo.insert(&NewItem::new("jacket", "fashion", "abc.jpg")).unwrap();
//! println!("Stored item {}", item.id);
//! ```

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
pub mod repository;
