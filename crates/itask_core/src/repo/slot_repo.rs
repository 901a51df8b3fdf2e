//! Durable key-value slot contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide read/overwrite/remove access to named storage slots.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - A slot holds exactly one text value; writes replace it whole.
//! - Repositories refuse connections whose schema is not fully migrated.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

const SLOTS_TABLE: &str = "storage_slots";
const SLOTS_REQUIRED_COLUMNS: &[&str] = &["key", "value", "updated_at"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for slot persistence.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    Encode(serde_json::Error),
    /// Slot holds something other than UTF-8 text.
    CorruptValue {
        key: String,
        column_type: &'static str,
    },
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode snapshot: {err}"),
            Self::CorruptValue { key, column_type } => {
                write!(f, "slot `{key}` holds unreadable {column_type} data")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it through open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for named durable slots.
pub trait SlotRepository {
    /// Returns the slot value, or `None` when the slot was never written.
    ///
    /// A value that is not UTF-8 text yields `CorruptValue`.
    fn read_slot(&self, key: &str) -> RepoResult<Option<String>>;
    /// Creates or overwrites the slot.
    fn write_slot(&self, key: &str, value: &str) -> RepoResult<()>;
    /// Deletes the slot. Returns whether a value was present.
    fn remove_slot(&self, key: &str) -> RepoResult<bool>;
}

impl<R: SlotRepository + ?Sized> SlotRepository for &R {
    fn read_slot(&self, key: &str) -> RepoResult<Option<String>> {
        (**self).read_slot(key)
    }

    fn write_slot(&self, key: &str, value: &str) -> RepoResult<()> {
        (**self).write_slot(key, value)
    }

    fn remove_slot(&self, key: &str) -> RepoResult<bool> {
        (**self).remove_slot(key)
    }
}

/// SQLite-backed slot repository.
pub struct SqliteSlotRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSlotRepository<'conn> {
    /// Wraps a connection opened through `open_db`/`open_db_in_memory`.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` on schema drift.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let expected_version = latest_version();
        let actual_version = current_user_version(conn)?;
        if actual_version < expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        ensure_slots_schema(conn)?;
        Ok(Self { conn })
    }
}

impl SlotRepository for SqliteSlotRepository<'_> {
    fn read_slot(&self, key: &str) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM storage_slots WHERE key = ?1;",
                [key],
                |row| Ok(decode_slot_value(row.get_ref(0)?)),
            )
            .optional()?;

        match value {
            None => Ok(None),
            Some(Ok(text)) => Ok(Some(text)),
            Some(Err(column_type)) => Err(RepoError::CorruptValue {
                key: key.to_string(),
                column_type,
            }),
        }
    }

    fn write_slot(&self, key: &str, value: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO storage_slots (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove_slot(&self, key: &str) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM storage_slots WHERE key = ?1;", [key])?;
        Ok(changed > 0)
    }
}

fn decode_slot_value(value: ValueRef<'_>) -> Result<String, &'static str> {
    match value {
        ValueRef::Text(bytes) => String::from_utf8(bytes.to_vec()).map_err(|_| "non-utf8 text"),
        ValueRef::Blob(_) => Err("blob"),
        ValueRef::Integer(_) => Err("integer"),
        ValueRef::Real(_) => Err("real"),
        ValueRef::Null => Err("null"),
    }
}

fn ensure_slots_schema(conn: &Connection) -> RepoResult<()> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let columns = stmt
        .query_map([SLOTS_TABLE], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    if columns.is_empty() {
        return Err(RepoError::MissingRequiredTable(SLOTS_TABLE));
    }

    for &required in SLOTS_REQUIRED_COLUMNS {
        if !columns.iter().any(|column| column == required) {
            return Err(RepoError::MissingRequiredColumn {
                table: SLOTS_TABLE,
                column: required,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{RepoError, SlotRepository, SqliteSlotRepository};
    use crate::db::open_db_in_memory;

    #[test]
    fn write_overwrites_and_remove_reports_presence() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteSlotRepository::try_new(&conn).unwrap();

        assert_eq!(repo.read_slot("todos").unwrap(), None);
        repo.write_slot("todos", "[]").unwrap();
        repo.write_slot("todos", "[1]").unwrap();
        assert_eq!(repo.read_slot("todos").unwrap().as_deref(), Some("[1]"));

        assert!(repo.remove_slot("todos").unwrap());
        assert!(!repo.remove_slot("todos").unwrap());
        assert_eq!(repo.read_slot("todos").unwrap(), None);
    }

    #[test]
    fn slots_are_isolated_by_key() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteSlotRepository::try_new(&conn).unwrap();

        repo.write_slot("a", "first").unwrap();
        repo.write_slot("b", "second").unwrap();
        repo.remove_slot("a").unwrap();

        assert_eq!(repo.read_slot("b").unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn non_text_values_are_reported_as_corrupt() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteSlotRepository::try_new(&conn).unwrap();
        conn.execute_batch(
            "INSERT INTO storage_slots (key, value) VALUES ('bad_utf8', CAST(x'ff5b5d' AS TEXT));
             INSERT INTO storage_slots (key, value) VALUES ('blob', x'5b5d');",
        )
        .unwrap();

        assert!(matches!(
            repo.read_slot("bad_utf8"),
            Err(RepoError::CorruptValue { column_type: "non-utf8 text", .. })
        ));
        assert!(matches!(
            repo.read_slot("blob"),
            Err(RepoError::CorruptValue { column_type: "blob", .. })
        ));
    }
}
