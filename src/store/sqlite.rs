//! SQLite-backed query executor.

use std::path::{Path, PathBuf};

use rusqlite::types::ValueRef;
use rusqlite::{params_from_iter, Connection, OpenFlags};
use tracing::{debug, info};

use super::QueryExecutor;
use crate::core::{Cell, Record, NODE_COLUMNS, NODE_TABLE, PATH_COLUMNS, PATH_TABLE};
use crate::util::{Error, Result};

/// Read-only handle on a ray database file.
///
/// Opened once at startup and closed once at shutdown; node and path
/// lookups borrow it for the duration of a single query.
pub struct SqliteStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl SqliteStore {
    /// Open an existing database read-only.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }

        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(path, flags).map_err(|source| Error::Connection {
            path: path.to_path_buf(),
            source,
        })?;

        info!(path = %path.display(), "opened ray database");
        Ok(Self { conn, path: Some(path.to_path_buf()) })
    }

    /// Empty in-memory database, mostly useful for tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::Connection {
            path: PathBuf::from(":memory:"),
            source,
        })?;
        Ok(Self { conn, path: None })
    }

    /// Wrap an already open connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn, path: None }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// File the store was opened from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Close the connection, reporting any error SQLite raises on close.
    pub fn close(self) -> Result<()> {
        let path = self.path;
        self.conn.close().map_err(|(_, e)| Error::Query(e))?;
        if let Some(path) = path {
            info!(path = %path.display(), "closed ray database");
        }
        Ok(())
    }

    /// Column names of `table` in creation order; empty if the table is missing.
    pub fn table_columns(&self, table: &str) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT name FROM pragma_table_info(?1) ORDER BY cid")?;
        let names = stmt
            .query_map([table], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(names)
    }

    /// Check that both tables exist with the column counts the row codec expects.
    ///
    /// Names are not compared: decoding is positional and recorders have
    /// used different spellings for the same layout.
    pub fn verify_schema(&self) -> Result<()> {
        for (table, expected) in [(NODE_TABLE, NODE_COLUMNS.len()), (PATH_TABLE, PATH_COLUMNS.len())] {
            let columns = self.table_columns(table)?;
            if columns.len() != expected {
                return Err(Error::SchemaMismatch {
                    table,
                    expected: format!("{} columns", expected),
                    actual: if columns.is_empty() {
                        "missing table".to_string()
                    } else {
                        format!("{} columns", columns.len())
                    },
                });
            }
        }
        Ok(())
    }
}

impl QueryExecutor for SqliteStore {
    fn query(&self, sql: &str, params: &[i64]) -> Result<Vec<Record>> {
        debug!(sql, ?params, "query");
        let mut stmt = self.conn.prepare_cached(sql)?;
        let width = stmt.column_count();

        let mut rows = stmt.query(params_from_iter(params.iter()))?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut record = Vec::with_capacity(width);
            for i in 0..width {
                record.push(cell_from(row.get_ref(i)?));
            }
            out.push(record);
        }
        Ok(out)
    }
}

fn cell_from(value: ValueRef<'_>) -> Cell {
    match value {
        ValueRef::Null => Cell::Null,
        ValueRef::Integer(v) => Cell::Integer(v),
        ValueRef::Real(v) => Cell::Real(v),
        ValueRef::Text(t) => Cell::Text(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Cell::Blob(b.to_vec()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixture_store;

    #[test]
    fn test_open_missing_file() {
        let err = SqliteStore::open("/definitely/not/here.db").err().unwrap();
        assert!(matches!(err, Error::FileNotFound(_)));
    }

    #[test]
    fn test_query_converts_cells() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .connection()
            .execute_batch(
                "CREATE TABLE t (a, b, c, d);
                 INSERT INTO t VALUES (1, 2.5, 'x y', NULL);",
            )
            .unwrap();

        let rows = store.query("SELECT * FROM t WHERE a = ?1", &[1]).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0],
            vec![Cell::Integer(1), Cell::Real(2.5), Cell::Text("x y".into()), Cell::Null]
        );
        assert!(store.query("SELECT * FROM t WHERE a = ?1", &[2]).unwrap().is_empty());
    }

    #[test]
    fn test_bad_sql_is_query_error() {
        let store = SqliteStore::open_in_memory().unwrap();
        let err = store.query("SELECT * FROM nowhere", &[]).unwrap_err();
        assert!(matches!(err, Error::Query(_)));
    }

    #[test]
    fn test_verify_schema() {
        let store = fixture_store(&[], &[]);
        store.verify_schema().unwrap();
        assert_eq!(store.table_columns("path").unwrap(), PATH_COLUMNS.to_vec());

        let empty = SqliteStore::open_in_memory().unwrap();
        match empty.verify_schema() {
            Err(Error::SchemaMismatch { table, actual, .. }) => {
                assert_eq!(table, "node");
                assert_eq!(actual, "missing table");
            }
            other => panic!("expected schema mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_close() {
        let store = fixture_store(&[], &[]);
        store.close().unwrap();
    }
}
