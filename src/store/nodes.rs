//! Point lookups in the node table.

use tracing::{debug, warn};

use super::QueryExecutor;
use crate::core::RayNode;
use crate::util::Result;

const SELECT_NODE: &str = "SELECT * FROM node WHERE id = ?1";

/// Resolves single [`RayNode`]s by id.
pub struct NodeStore<'a, E: ?Sized> {
    exec: &'a E,
}

impl<E: ?Sized> Clone for NodeStore<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: ?Sized> Copy for NodeStore<'_, E> {}

impl<'a, E: QueryExecutor + ?Sized> NodeStore<'a, E> {
    /// Lookups through `exec`.
    pub fn new(exec: &'a E) -> Self {
        Self { exec }
    }

    /// Fetch the node with `id`, or `None` if the table has no such row.
    pub fn get_node(&self, id: i64) -> Result<Option<RayNode>> {
        let rows = self.exec.query(SELECT_NODE, &[id])?;
        match rows.first() {
            Some(record) => RayNode::decode(record, 0)
                .inspect_err(|e| warn!(id, error = %e, "undecodable node row"))
                .map(Some),
            None => {
                debug!(id, "node not found");
                Ok(None)
            }
        }
    }
}
