//! Read access to the recorded ray database.
//!
//! The database engine is reached only through [`QueryExecutor`]: run one
//! parameterized statement, get back untyped rows. [`SqliteStore`] is the
//! SQLite implementation; [`NodeStore`] and [`PathStore`] turn rows into
//! [`RayNode`](crate::core::RayNode)s and [`RayPath`](crate::core::RayPath)s.

mod nodes;
mod paths;
mod sqlite;

pub use nodes::*;
pub use paths::*;
pub use sqlite::*;

use parking_lot::Mutex;

use crate::core::Record;
use crate::util::Result;

/// Executes one read-only statement and returns every result row.
///
/// Positional parameters are bound as `?1`, `?2`, ... in order.
pub trait QueryExecutor {
    fn query(&self, sql: &str, params: &[i64]) -> Result<Vec<Record>>;
}

impl<E: QueryExecutor + ?Sized> QueryExecutor for &E {
    fn query(&self, sql: &str, params: &[i64]) -> Result<Vec<Record>> {
        (**self).query(sql, params)
    }
}

impl<E: QueryExecutor + ?Sized> QueryExecutor for Box<E> {
    fn query(&self, sql: &str, params: &[i64]) -> Result<Vec<Record>> {
        (**self).query(sql, params)
    }
}

/// Serializes access to a connection that is not `Sync`.
impl<E: QueryExecutor> QueryExecutor for Mutex<E> {
    fn query(&self, sql: &str, params: &[i64]) -> Result<Vec<Record>> {
        self.lock().query(sql, params)
    }
}
