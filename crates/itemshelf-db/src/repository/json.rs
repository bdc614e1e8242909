//! Item store backed by a single JSON array file.

use std::path::{Path, PathBuf};

use itemshelf_core::{Error, Item, ItemId, NewItem, Result};

use super::ItemRepository;

/// Stores all items as one JSON array, rewritten in full on every insert.
///
/// There is no locking around the read-modify-write cycle: concurrent
/// inserts race and the last writer wins.
#[derive(Debug, Clone)]
pub struct JsonItemRepository {
    path: PathBuf,
}

impl JsonItemRepository {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write an empty array if the file does not exist yet.
    ///
    /// Returns `true` if the file was created.
    pub fn create_if_missing(&self) -> Result<bool> {
        if self.path.exists() {
            return Ok(false);
        }
        self.save_items(&[])?;
        Ok(true)
    }

    /// Read every item from the file. Fails if it is missing or malformed.
    fn load_items(&self) -> Result<Vec<Item>> {
        let content = std::fs::read_to_string(&self.path)?;
        let items: Vec<Item> = serde_json::from_str(&content)?;
        Ok(items)
    }

    /// Replace the file contents with `items` (create or truncate).
    fn save_items(&self, items: &[Item]) -> Result<()> {
        let json = serde_json::to_string_pretty(items)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

impl ItemRepository for JsonItemRepository {
    fn name(&self) -> &'static str {
        "json"
    }

    fn insert(&self, item: &NewItem) -> Result<Item> {
        let mut items = self.load_items()?;

        let next_id = items
            .iter()
            .map(|i| i.id.get())
            .max()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or_else(|| Error::Internal(format!("item ids exhausted in {}", self.path.display())))?;
        let stored = item.clone().into_item(ItemId::new(next_id));
        items.push(stored.clone());

        self.save_items(&items)?;
        tracing::debug!(path = %self.path.display(), count = items.len(), "Rewrote item file");
        Ok(stored)
    }

    fn get_items(&self) -> Result<Vec<Item>> {
        self.load_items()
    }

    fn get_item(&self, id: ItemId) -> Result<Option<Item>> {
        Ok(self.load_items()?.into_iter().find(|i| i.id == id))
    }
}
