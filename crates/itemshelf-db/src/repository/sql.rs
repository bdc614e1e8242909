//! Item store backed by SQLite.

use itemshelf_core::config::CategoryLayout;
use itemshelf_core::{Item, ItemId, NewItem, Result};

use super::ItemRepository;
use crate::pool::{get_conn, DbPool};
use crate::queries::items;

/// SQLite item store for either category layout.
///
/// No explicit transactions are used; connection safety is left to the
/// pool and the driver.
#[derive(Clone)]
pub struct SqlItemRepository {
    pool: DbPool,
    layout: CategoryLayout,
}

impl SqlItemRepository {
    /// `pool` must have been migrated with the same `layout`.
    pub fn new(pool: DbPool, layout: CategoryLayout) -> Self {
        Self { pool, layout }
    }

    pub fn layout(&self) -> CategoryLayout {
        self.layout
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

impl ItemRepository for SqlItemRepository {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn insert(&self, item: &NewItem) -> Result<Item> {
        let conn = get_conn(&self.pool)?;
        items::insert_item(&conn, self.layout, item)
    }

    fn get_items(&self) -> Result<Vec<Item>> {
        let conn = get_conn(&self.pool)?;
        items::list_items(&conn, self.layout)
    }

    fn get_item(&self, id: ItemId) -> Result<Option<Item>> {
        let conn = get_conn(&self.pool)?;
        items::get_item_by_id(&conn, self.layout, id)
    }
}
