//! Category operations for the normalized layout.

use itemshelf_core::{Error, Result};
use rusqlite::{Connection, OptionalExtension};

/// Look up a category by name, inserting it if it does not exist yet.
///
/// The lookup and the insert are separate statements with no surrounding
/// transaction. When several rows share a name, the oldest one wins.
pub fn get_or_create(conn: &Connection, name: &str) -> Result<i64> {
    if let Some(id) = find_by_name(conn, name)? {
        return Ok(id);
    }

    conn.execute(
        "INSERT INTO categories (name) VALUES (:name)",
        rusqlite::named_params! { ":name": name },
    )
    .map_err(|e| Error::database(e.to_string()))?;

    let id = conn.last_insert_rowid();
    tracing::debug!(category = name, id, "Created category");
    Ok(id)
}

/// Find the ID of the oldest category with the given name.
pub fn find_by_name(conn: &Connection, name: &str) -> Result<Option<i64>> {
    conn.query_row(
        "SELECT id FROM categories WHERE name = :name ORDER BY id LIMIT 1",
        rusqlite::named_params! { ":name": name },
        |row| row.get(0),
    )
    .optional()
    .map_err(|e| Error::database(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::init_memory_pool;
    use itemshelf_core::config::CategoryLayout;

    #[test]
    fn test_get_or_create_reuses_existing() {
        let pool = init_memory_pool(CategoryLayout::Normalized).unwrap();
        let conn = pool.get().unwrap();

        let fashion = get_or_create(&conn, "fashion").unwrap();
        let phone = get_or_create(&conn, "phone").unwrap();
        assert_ne!(fashion, phone);
        assert_eq!(get_or_create(&conn, "fashion").unwrap(), fashion);

        assert_eq!(find_by_name(&conn, "phone").unwrap(), Some(phone));
    }

    #[test]
    fn test_find_by_name_prefers_oldest_duplicate() {
        let pool = init_memory_pool(CategoryLayout::Normalized).unwrap();
        let conn = pool.get().unwrap();

        conn.execute_batch(
            "INSERT INTO categories (name) VALUES ('fashion');
             INSERT INTO categories (name) VALUES ('fashion');",
        )
        .unwrap();

        assert_eq!(find_by_name(&conn, "fashion").unwrap(), Some(1));
        assert_eq!(find_by_name(&conn, "books").unwrap(), None);
    }
}
