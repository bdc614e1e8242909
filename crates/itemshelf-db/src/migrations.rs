//! Embedded SQL migrations and runner.
//!
//! Each [`CategoryLayout`] has its own ordered migration list. A
//! `schema_migrations` table records which versions have been applied and
//! for which layout, so a database created with one layout is never
//! silently opened with the other.

use itemshelf_core::config::CategoryLayout;
use itemshelf_core::{Error, Result};
use rusqlite::{Connection, OptionalExtension};

/// V1 (normalized): items reference a separate categories table.
///
/// `categories.name` is indexed but not unique: the lookup-or-insert on the
/// write path is not transactional, and duplicate rows are tolerated.
const V1_NORMALIZED: &str = r#"
CREATE TABLE categories (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL
);

CREATE INDEX idx_categories_name ON categories(name);

CREATE TABLE items (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    category_id INTEGER NOT NULL REFERENCES categories(id),
    image_name  TEXT NOT NULL
);

CREATE INDEX idx_items_category ON items(category_id);
"#;

/// V1 (denormalized): the category name lives on the item row.
const V1_DENORMALIZED: &str = r#"
CREATE TABLE items (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    name       TEXT NOT NULL,
    category   TEXT NOT NULL,
    image_name TEXT NOT NULL
);
"#;

const NORMALIZED_MIGRATIONS: &[(i64, &str)] = &[(1, V1_NORMALIZED)];

const DENORMALIZED_MIGRATIONS: &[(i64, &str)] = &[(1, V1_DENORMALIZED)];

fn migrations_for(layout: CategoryLayout) -> &'static [(i64, &'static str)] {
    match layout {
        CategoryLayout::Normalized => NORMALIZED_MIGRATIONS,
        CategoryLayout::Denormalized => DENORMALIZED_MIGRATIONS,
    }
}

/// Run all pending migrations for `layout` on `conn`.
///
/// Fails with [`Error::Validation`] if the database was previously migrated
/// with a different layout.
pub fn run_migrations(conn: &Connection, layout: CategoryLayout) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version    INTEGER NOT NULL,
            layout     TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (version, layout)
        )",
    )
    .map_err(|e| Error::database(format!("Failed to create schema_migrations: {e}")))?;

    let existing: Option<String> = conn
        .query_row(
            "SELECT layout FROM schema_migrations WHERE layout != ?1 LIMIT 1",
            [layout.as_str()],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| Error::database(e.to_string()))?;

    if let Some(existing) = existing {
        return Err(Error::validation(format!(
            "database uses the {existing} category layout, but {} was requested",
            layout.as_str()
        )));
    }

    for &(version, sql) in migrations_for(layout) {
        let already: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM schema_migrations WHERE version = ?1 AND layout = ?2",
                rusqlite::params![version, layout.as_str()],
                |row| row.get(0),
            )
            .map_err(|e| Error::database(e.to_string()))?;

        if already {
            continue;
        }

        let tx = conn
            .unchecked_transaction()
            .map_err(|e| Error::database(e.to_string()))?;

        tx.execute_batch(sql)
            .map_err(|e| Error::database(format!("Migration V{version} failed: {e}")))?;

        tx.execute(
            "INSERT INTO schema_migrations (version, layout) VALUES (?1, ?2)",
            rusqlite::params![version, layout.as_str()],
        )
        .map_err(|e| Error::database(e.to_string()))?;

        tx.commit().map_err(|e| Error::database(e.to_string()))?;

        tracing::debug!("Applied {} migration V{version}", layout.as_str());
    }

    Ok(())
}
