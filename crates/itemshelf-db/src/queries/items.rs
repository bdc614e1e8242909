//! Item database queries.
//!
//! Every function takes the [`CategoryLayout`] the database was migrated
//! with and issues the matching SQL.

use itemshelf_core::config::CategoryLayout;
use itemshelf_core::{Error, Item, ItemId, NewItem, Result};
use rusqlite::{Connection, OptionalExtension};

use crate::models::item_from_row;
use crate::queries::categories;

const SELECT_NORMALIZED: &str = "SELECT i.id, i.name, c.name AS category, i.image_name
     FROM items i
     JOIN categories c ON i.category_id = c.id";

const SELECT_DENORMALIZED: &str = "SELECT id, name, category, image_name FROM items";

/// Insert an item and return it with its assigned ID.
///
/// In the normalized layout the category is looked up or created first, as
/// a separate statement.
pub fn insert_item(conn: &Connection, layout: CategoryLayout, item: &NewItem) -> Result<Item> {
    match layout {
        CategoryLayout::Normalized => {
            let category_id = categories::get_or_create(conn, &item.category)?;
            conn.execute(
                "INSERT INTO items (name, category_id, image_name)
                 VALUES (:name, :category_id, :image_name)",
                rusqlite::named_params! {
                    ":name": &item.name,
                    ":category_id": category_id,
                    ":image_name": &item.image_name,
                },
            )
            .map_err(|e| Error::database(e.to_string()))?;
        }
        CategoryLayout::Denormalized => {
            conn.execute(
                "INSERT INTO items (name, category, image_name)
                 VALUES (:name, :category, :image_name)",
                rusqlite::named_params! {
                    ":name": &item.name,
                    ":category": &item.category,
                    ":image_name": &item.image_name,
                },
            )
            .map_err(|e| Error::database(e.to_string()))?;
        }
    }

    let id = ItemId::new(conn.last_insert_rowid());
    Ok(item.clone().into_item(id))
}

/// List every item ordered by ID.
pub fn list_items(conn: &Connection, layout: CategoryLayout) -> Result<Vec<Item>> {
    let sql = match layout {
        CategoryLayout::Normalized => format!("{SELECT_NORMALIZED} ORDER BY i.id"),
        CategoryLayout::Denormalized => format!("{SELECT_DENORMALIZED} ORDER BY id"),
    };

    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([], item_from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// Get an item by its stored ID.
pub fn get_item_by_id(conn: &Connection, layout: CategoryLayout, id: ItemId) -> Result<Option<Item>> {
    let sql = match layout {
        CategoryLayout::Normalized => format!("{SELECT_NORMALIZED} WHERE i.id = :id"),
        CategoryLayout::Denormalized => format!("{SELECT_DENORMALIZED} WHERE id = :id"),
    };

    conn.query_row(
        &sql,
        rusqlite::named_params! { ":id": id.get() },
        item_from_row,
    )
    .optional()
    .map_err(|e| Error::database(e.to_string()))
}
