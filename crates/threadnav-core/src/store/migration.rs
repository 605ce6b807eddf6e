use rusqlite::{Connection, OptionalExtension, params};

use crate::error::RepositoryError;
use crate::repository::RepositoryResult;

use super::SqliteNavigationStore;

const SCHEMA_VERSION: &str = "1";

const MIGRATION_SCHEMA_SQL: &str = r"
    PRAGMA journal_mode = WAL;
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS navigators (
        id TEXT PRIMARY KEY,
        chat_id TEXT NOT NULL UNIQUE,
        chat_title TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS nav_entries (
        id TEXT PRIMARY KEY,
        navigator_id TEXT NOT NULL,
        chat_id TEXT NOT NULL,
        assistant_message_id TEXT NOT NULL UNIQUE,
        user_message_id TEXT NOT NULL,
        label TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        FOREIGN KEY (navigator_id) REFERENCES navigators(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS nav_sections (
        id TEXT PRIMARY KEY,
        navigator_id TEXT NOT NULL,
        parent_id TEXT,
        assistant_message_id TEXT NOT NULL,
        label TEXT NOT NULL,
        anchor TEXT NOT NULL,
        level INTEGER NOT NULL CHECK(level IN (2, 3)),
        order_index INTEGER NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        FOREIGN KEY (navigator_id) REFERENCES navigators(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS system_kv (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_nav_entries_navigator_created
    ON nav_entries(navigator_id, created_at);
    CREATE INDEX IF NOT EXISTS idx_nav_sections_navigator_reply_order
    ON nav_sections(navigator_id, assistant_message_id, order_index);
";

impl SqliteNavigationStore {
    pub fn migrate(&self) -> RepositoryResult<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| RepositoryError::poisoned("sqlite"))?;
        conn.execute_batch(MIGRATION_SCHEMA_SQL)?;
        ensure_schema_version(&conn)?;
        drop(conn);
        Ok(())
    }
}

fn ensure_schema_version(conn: &Connection) -> RepositoryResult<()> {
    let stored = conn
        .query_row(
            "SELECT value FROM system_kv WHERE key = 'schema_version'",
            [],
            |row| row.get::<_, String>(0),
        )
        .optional()?;
    match stored.as_deref() {
        None => {
            conn.execute(
                "INSERT INTO system_kv(key, value) VALUES ('schema_version', ?1)",
                params![SCHEMA_VERSION],
            )?;
            Ok(())
        }
        Some(SCHEMA_VERSION) => Ok(()),
        Some(other) => Err(RepositoryError::Conflict(format!(
            "unsupported navigation schema version {other}; expected {SCHEMA_VERSION}"
        ))),
    }
}
