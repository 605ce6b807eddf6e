use std::path::Path;
#[cfg(unix)]
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, params};

use crate::error::RepositoryError;
use crate::models::{NavEntry, NavSection, Navigator};
use crate::repository::{NavigationRepository, RepositoryResult};

mod migration;

/// SQLite-backed [`NavigationRepository`].
#[derive(Clone)]
pub struct SqliteNavigationStore {
    conn: Arc<Mutex<Connection>>,
}

impl std::fmt::Debug for SqliteNavigationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteNavigationStore")
            .finish_non_exhaustive()
    }
}

impl SqliteNavigationStore {
    fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> RepositoryResult<T>,
    ) -> RepositoryResult<T> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| RepositoryError::poisoned("sqlite"))?;
        f(&conn)
    }

    fn with_tx<T>(
        &self,
        f: impl FnOnce(&rusqlite::Transaction<'_>) -> RepositoryResult<T>,
    ) -> RepositoryResult<T> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|_| RepositoryError::poisoned("sqlite"))?;
        let tx = conn.transaction()?;
        let value = f(&tx)?;
        tx.commit()?;
        drop(conn);
        Ok(value)
    }

    pub fn open(path: impl AsRef<Path>) -> RepositoryResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.migrate()?;
        #[cfg(unix)]
        harden_sqlite_permissions(path)?;
        Ok(store)
    }

    pub fn open_in_memory() -> RepositoryResult<Self> {
        let store = Self {
            conn: Arc::new(Mutex::new(Connection::open_in_memory()?)),
        };
        store.migrate()?;
        Ok(store)
    }
}

impl NavigationRepository for SqliteNavigationStore {
    fn create_navigator(&self, navigator: &Navigator) -> RepositoryResult<()> {
        self.with_conn(|conn| {
            conn.execute(
                r"
                INSERT INTO navigators(id, chat_id, chat_title, updated_at)
                VALUES (?1, ?2, ?3, ?4)
                ",
                params![
                    navigator.id,
                    navigator.chat_id,
                    navigator.chat_title,
                    format_timestamp(navigator.updated_at)
                ],
            )
            .map_err(|err| {
                classify_constraint(err, || {
                    format!("navigator already exists for chat {}", navigator.chat_id)
                })
            })?;
            Ok(())
        })
    }

    fn get_navigator_by_chat_id(&self, chat_id: &str) -> RepositoryResult<Option<Navigator>> {
        self.with_conn(|conn| {
            let navigator = conn
                .query_row(
                    r"
                    SELECT id, chat_id, chat_title, updated_at
                    FROM navigators
                    WHERE chat_id = ?1
                    ",
                    params![chat_id],
                    |row| {
                        Ok(Navigator {
                            id: row.get(0)?,
                            chat_id: row.get(1)?,
                            chat_title: row.get(2)?,
                            updated_at: read_timestamp(row, 3)?,
                        })
                    },
                )
                .optional()?;
            Ok(navigator)
        })
    }

    fn list_entries(&self, navigator_id: &str) -> RepositoryResult<Vec<NavEntry>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                r"
                SELECT id, navigator_id, chat_id, assistant_message_id, user_message_id,
                       label, created_at, updated_at
                FROM nav_entries
                WHERE navigator_id = ?1
                ORDER BY created_at ASC, rowid ASC
                ",
            )?;
            let rows = stmt.query_map(params![navigator_id], |row| {
                Ok(NavEntry {
                    id: row.get(0)?,
                    navigator_id: row.get(1)?,
                    chat_id: row.get(2)?,
                    assistant_message_id: row.get(3)?,
                    user_message_id: row.get(4)?,
                    label: row.get(5)?,
                    created_at: read_timestamp(row, 6)?,
                    updated_at: read_timestamp(row, 7)?,
                })
            })?;

            let mut out = Vec::new();
            for row in rows {
                out.push(row?);
            }
            Ok(out)
        })
    }

    fn list_sections(&self, navigator_id: &str) -> RepositoryResult<Vec<NavSection>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                r"
                SELECT id, navigator_id, parent_id, assistant_message_id, label, anchor,
                       level, order_index, created_at, updated_at
                FROM nav_sections
                WHERE navigator_id = ?1
                ORDER BY assistant_message_id ASC, order_index ASC
                ",
            )?;
            let rows = stmt.query_map(params![navigator_id], |row| {
                Ok(NavSection {
                    id: row.get(0)?,
                    navigator_id: row.get(1)?,
                    parent_id: row.get(2)?,
                    assistant_message_id: row.get(3)?,
                    label: row.get(4)?,
                    anchor: row.get(5)?,
                    level: row.get(6)?,
                    order_index: row.get(7)?,
                    created_at: read_timestamp(row, 8)?,
                    updated_at: read_timestamp(row, 9)?,
                })
            })?;

            let mut out = Vec::new();
            for row in rows {
                out.push(row?);
            }
            Ok(out)
        })
    }

    fn insert_entry(&self, entry: &NavEntry) -> RepositoryResult<()> {
        self.with_tx(|tx| {
            tx.execute(
                r"
                INSERT INTO nav_entries(
                    id, navigator_id, chat_id, assistant_message_id, user_message_id,
                    label, created_at, updated_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                ",
                params![
                    entry.id,
                    entry.navigator_id,
                    entry.chat_id,
                    entry.assistant_message_id,
                    entry.user_message_id,
                    entry.label,
                    format_timestamp(entry.created_at),
                    format_timestamp(entry.updated_at)
                ],
            )
            .map_err(|err| {
                if is_foreign_key_violation(&err) {
                    return RepositoryError::MissingNavigator(entry.navigator_id.clone());
                }
                classify_constraint(err, || {
                    format!(
                        "entry already exists for assistant message {}",
                        entry.assistant_message_id
                    )
                })
            })?;
            tx.execute(
                "UPDATE navigators SET updated_at = ?2 WHERE id = ?1",
                params![entry.navigator_id, format_timestamp(entry.updated_at)],
            )?;
            Ok(())
        })
    }

    fn batch_insert_sections(&self, sections: &[NavSection]) -> RepositoryResult<()> {
        if sections.is_empty() {
            return Ok(());
        }
        self.with_tx(|tx| {
            let mut stmt = tx.prepare(
                r"
                INSERT INTO nav_sections(
                    id, navigator_id, parent_id, assistant_message_id, label, anchor,
                    level, order_index, created_at, updated_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                ",
            )?;
            for section in sections {
                stmt.execute(params![
                    section.id,
                    section.navigator_id,
                    section.parent_id,
                    section.assistant_message_id,
                    section.label,
                    section.anchor,
                    section.level,
                    section.order_index,
                    format_timestamp(section.created_at),
                    format_timestamp(section.updated_at)
                ])
                .map_err(|source| RepositoryError::BatchInsert {
                    failed_section_id: section.id.clone(),
                    source,
                })?;
            }
            Ok(())
        })
    }
}

fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn read_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|value| value.with_timezone(&Utc))
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err)))
}

fn is_foreign_key_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
    )
}

fn classify_constraint(err: rusqlite::Error, conflict: impl FnOnce() -> String) -> RepositoryError {
    let duplicate = matches!(
        &err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation
                && matches!(
                    failure.extended_code,
                    rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                        | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                )
    );
    if duplicate {
        RepositoryError::Conflict(conflict())
    } else {
        RepositoryError::Sqlite(err)
    }
}

#[cfg(unix)]
fn harden_sqlite_permissions(path: &Path) -> RepositoryResult<()> {
    use std::os::unix::fs::PermissionsExt;

    for suffix in ["", "-wal", "-shm"] {
        let mut os = path.as_os_str().to_os_string();
        os.push(suffix);
        let candidate = PathBuf::from(os);
        if candidate.exists() {
            std::fs::set_permissions(candidate, std::fs::Permissions::from_mode(0o600))?;
        }
    }
    Ok(())
}
