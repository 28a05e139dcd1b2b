//! Error types for the ray-path inspector.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for inspector operations.
///
/// Lookups that find nothing are not errors: a missing node is `None`
/// and a pixel without paths yields an empty list.
#[derive(Error, Debug)]
pub enum Error {
    /// Database file does not exist
    #[error("Database not found: {0}")]
    FileNotFound(PathBuf),

    /// Database exists but could not be opened
    #[error("Failed to open database {path}: {source}")]
    Connection {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// A query could not be prepared or executed
    #[error("Query failed: {0}")]
    Query(#[from] rusqlite::Error),

    /// Store-level failure reported by a non-SQLite executor
    #[error("Store unavailable: {0}")]
    Store(String),

    /// A result row has the wrong number of cells
    #[error("Table '{table}': expected {expected} columns, got {actual}")]
    ColumnCount {
        table: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A cell could not be converted to the type its slot requires
    #[error("Table '{table}', row {row}, field {field}: {reason}")]
    Decode {
        table: &'static str,
        row: usize,
        field: usize,
        reason: String,
    },

    /// A token in a path's id list is not an integer
    #[error("Malformed node id in path: '{token}'")]
    MalformedNodeId { token: String },

    /// Node index past the end of a path
    #[error("Node index {index} out of bounds (count: {count})")]
    NodeIndexOutOfRange { index: usize, count: usize },

    /// Table layout does not match the recorder's schema
    #[error("Schema mismatch in table '{table}': expected {expected}, got {actual}")]
    SchemaMismatch {
        table: &'static str,
        expected: String,
        actual: String,
    },
}

impl Error {
    /// Create a store error from a message.
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// True for failures of the store itself (open, prepare, execute).
    ///
    /// The viewer reports these as "store unavailable" instead of exiting.
    pub fn is_store_failure(&self) -> bool {
        matches!(
            self,
            Self::FileNotFound(_) | Self::Connection { .. } | Self::Query(_) | Self::Store(_)
        )
    }
}

/// Result type alias for inspector operations.
pub type Result<T> = std::result::Result<T, Error>;
