//! Application context shared by all route handlers via Axum state.

use std::sync::Arc;

use itemshelf_core::config::Config;
use itemshelf_core::Result;
use itemshelf_db::repository::{self, ItemRepository};

use crate::images::ImageStore;

/// Application context shared by all request handlers (via Axum state).
///
/// This is cheaply cloneable because it only holds `Arc`s.
#[derive(Clone)]
pub struct AppContext {
    /// Immutable application configuration snapshot.
    pub config: Arc<Config>,
    /// Item store selected by `storage.backend`.
    pub items: Arc<dyn ItemRepository>,
    /// Content-addressed image storage.
    pub images: Arc<ImageStore>,
}

impl AppContext {
    /// Open the configured item store and image directory.
    pub fn from_config(config: Config) -> Result<Self> {
        let items = repository::open(&config.storage)?;
        let images = ImageStore::new(config.images.dir.clone(), config.images.default_image.clone());
        images.ensure_dir()?;

        Ok(Self {
            config: Arc::new(config),
            items,
            images: Arc::new(images),
        })
    }
}
