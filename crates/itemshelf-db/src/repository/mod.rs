//! The [`ItemRepository`] trait and its backends.
//!
//! Handlers only see `Arc<dyn ItemRepository>`; [`open`] picks the backend
//! named by the storage configuration.

mod json;
mod sql;

pub use json::JsonItemRepository;
pub use sql::SqlItemRepository;

use std::sync::Arc;

use itemshelf_core::config::{StorageBackend, StorageConfig};
use itemshelf_core::{Item, ItemId, NewItem, Result};

use crate::pool::init_pool;

/// A store of catalog items.
///
/// Implementations must be safe to share across threads (`Send + Sync`).
/// They provide no isolation between concurrent callers.
pub trait ItemRepository: Send + Sync {
    /// Human-readable name identifying this backend.
    fn name(&self) -> &'static str;

    /// Persist `item` and return it with its assigned ID.
    fn insert(&self, item: &NewItem) -> Result<Item>;

    /// Return every stored item in the backend's natural order.
    fn get_items(&self) -> Result<Vec<Item>>;

    /// Look up one item by its stored ID.
    fn get_item(&self, id: ItemId) -> Result<Option<Item>>;
}

/// Open the item store described by `config`.
///
/// Creates missing parent directories, seeds an empty JSON file for the
/// JSON backend, and runs migrations for the SQLite backend.
pub fn open(config: &StorageConfig) -> Result<Arc<dyn ItemRepository>> {
    match config.backend {
        StorageBackend::Json => {
            let path = &config.items_json_path;
            create_parent_dir(path)?;
            let repo = JsonItemRepository::new(path.clone());
            if repo.create_if_missing()? {
                tracing::info!("Created empty item file at {}", path.display());
            }
            Ok(Arc::new(repo))
        }
        StorageBackend::Sqlite => {
            let path = &config.db_path;
            create_parent_dir(path)?;
            let existed = path.exists();
            let pool = init_pool(&path.to_string_lossy(), config.category_layout)?;
            if existed {
                tracing::info!("Database opened (existing) at {}", path.display());
            } else {
                tracing::info!("Database created (new) at {}", path.display());
            }
            Ok(Arc::new(SqlItemRepository::new(pool, config.category_layout)))
        }
    }
}

fn create_parent_dir(path: &std::path::Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
            tracing::info!("Created directory {}", parent.display());
        }
    }
    Ok(())
}
