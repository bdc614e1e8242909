//! Connection pool management for SQLite via r2d2.

use std::sync::atomic::{AtomicU64, Ordering};

use itemshelf_core::config::CategoryLayout;
use itemshelf_core::{Error, Result};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::migrations;

/// Type alias for the database connection pool.
pub type DbPool = Pool<SqliteConnectionManager>;

/// Type alias for a pooled database connection.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Connections per pool.
const MAX_CONNECTIONS: u32 = 4;

/// Open (or create) the SQLite file at `db_path` and migrate it for `layout`.
///
/// Every new connection enables foreign keys and WAL journaling.
pub fn init_pool(db_path: &str, layout: CategoryLayout) -> Result<DbPool> {
    let manager = SqliteConnectionManager::file(db_path).with_init(|conn| {
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;",
        )
    });
    migrated_pool(manager, layout)
}

/// Open a private in-memory database migrated for `layout`.
///
/// Each call gets its own shared-cache database name, so connections within
/// the pool see the same data while separate pools stay isolated.
pub fn init_memory_pool(layout: CategoryLayout) -> Result<DbPool> {
    static NEXT_DB: AtomicU64 = AtomicU64::new(0);
    let n = NEXT_DB.fetch_add(1, Ordering::Relaxed);
    let uri = format!("file:itemshelf_memdb_{n}?mode=memory&cache=shared");

    let manager = SqliteConnectionManager::file(uri)
        .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));
    migrated_pool(manager, layout)
}

fn migrated_pool(manager: SqliteConnectionManager, layout: CategoryLayout) -> Result<DbPool> {
    let pool = Pool::builder()
        .max_size(MAX_CONNECTIONS)
        .build(manager)
        .map_err(|e| Error::database(format!("Failed to create connection pool: {e}")))?;

    let conn = get_conn(&pool)?;
    migrations::run_migrations(&conn, layout)?;
    tracing::debug!(layout = layout.as_str(), "Schema ready");

    Ok(pool)
}

/// Convenience helper to get a connection from the pool.
pub fn get_conn(pool: &DbPool) -> Result<PooledConnection> {
    pool.get()
        .map_err(|e| Error::database(format!("Failed to get connection from pool: {e}")))
}
