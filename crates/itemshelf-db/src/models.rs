//! Row mapping from SQLite results to item models.

use itemshelf_core::{Item, ItemId};

/// Build an [`Item`] from a row shaped `(id, name, category, image_name)`.
///
/// Both layouts select into this shape; the normalized layout joins the
/// category name in from `categories`.
pub fn item_from_row(row: &rusqlite::Row) -> rusqlite::Result<Item> {
    Ok(Item {
        id: ItemId::new(row.get(0)?),
        name: row.get(1)?,
        category: row.get(2)?,
        image_name: row.get(3)?,
    })
}
