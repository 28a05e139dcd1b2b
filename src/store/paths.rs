//! Per-pixel scans of the path table.

use tracing::debug;

use super::QueryExecutor;
use crate::core::RayPath;
use crate::util::Result;

const SELECT_PATHS: &str = "SELECT * FROM path WHERE row = ?1 AND col = ?2";

/// Lists the [`RayPath`]s recorded for a pixel.
pub struct PathStore<'a, E: ?Sized> {
    exec: &'a E,
}

impl<E: ?Sized> Clone for PathStore<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: ?Sized> Copy for PathStore<'_, E> {}

impl<'a, E: QueryExecutor + ?Sized> PathStore<'a, E> {
    /// Scans through `exec`.
    pub fn new(exec: &'a E) -> Self {
        Self { exec }
    }

    /// All paths for pixel (`row`, `col`) in the store's scan order.
    ///
    /// A pixel without recorded paths yields an empty list.
    pub fn select_paths(&self, row: i32, col: i32) -> Result<Vec<RayPath>> {
        let rows = self.exec.query(SELECT_PATHS, &[i64::from(row), i64::from(col)])?;
        debug!(row, col, count = rows.len(), "selected paths");
        rows.iter()
            .enumerate()
            .map(|(i, record)| RayPath::decode(record, i))
            .collect()
    }
}
