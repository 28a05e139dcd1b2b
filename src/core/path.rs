//! Ray paths: the ordered list of node ids recorded for one pixel.

use serde::Serialize;

use super::record::{Record, RowCursor};
use crate::util::{Error, Result};

/// Name of the path table.
pub const PATH_TABLE: &str = "path";

/// Columns of the path table, in creation order.
pub const PATH_COLUMNS: [&str; 4] = ["row", "col", "node_cnt", "node_ids"];

/// One light path traced through a screen pixel.
///
/// Holds node ids only; nodes are resolved one at a time through
/// [`NodeStore`](crate::store::NodeStore).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RayPath {
    pub row: i32,
    pub col: i32,
    /// Declared node count. Not checked against `path_node_ids`.
    pub node_cnt: usize,
    /// Node ids in traversal order.
    pub path_node_ids: Vec<i64>,
}

impl RayPath {
    /// Decode one row of the path table.
    pub fn decode(record: &Record, row: usize) -> Result<Self> {
        let mut cur = RowCursor::new(PATH_TABLE, row, record, PATH_COLUMNS.len())?;
        let pixel_row = cur.i32()?;
        let pixel_col = cur.i32()?;
        let node_cnt = cur.count()?;
        let path_node_ids = parse_node_ids(&cur.text()?)?;
        cur.finish()?;

        Ok(Self { row: pixel_row, col: pixel_col, node_cnt, path_node_ids })
    }

    /// Declared number of nodes.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.node_cnt
    }

    /// Id of the node at `idx`, failing on an index past either the
    /// declared count or the stored id list.
    pub fn node_id(&self, idx: usize) -> Result<i64> {
        self.get_node_id(idx).ok_or(Error::NodeIndexOutOfRange {
            index: idx,
            count: self.node_cnt.min(self.path_node_ids.len()),
        })
    }

    /// Id of the node at `idx`, or `None` when out of range.
    pub fn get_node_id(&self, idx: usize) -> Option<i64> {
        if idx >= self.node_cnt {
            return None;
        }
        self.path_node_ids.get(idx).copied()
    }

    /// True when the declared count matches the stored id list.
    pub fn is_consistent(&self) -> bool {
        self.node_cnt == self.path_node_ids.len()
    }
}

/// Split a space-separated id list into ids, keeping their order.
///
/// Empty tokens (leading, trailing or doubled spaces) are skipped.
/// A token that is not an integer fails the whole list.
pub fn parse_node_ids(text: &str) -> Result<Vec<i64>> {
    tokens(text)
        .map(|t| t.parse().map_err(|_| Error::MalformedNodeId { token: t.to_string() }))
        .collect()
}

/// Best-effort variant of [`parse_node_ids`].
///
/// Each token contributes its leading integer (`"12ab"` is 12), and a
/// token with no leading integer becomes 0.
pub fn parse_node_ids_lossy(text: &str) -> Vec<i64> {
    tokens(text).map(leading_integer).collect()
}

fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(' ').map(str::trim).filter(|t| !t.is_empty())
}

fn leading_integer(token: &str) -> i64 {
    let (negative, digits) = match token.as_bytes().first() {
        Some(b'-') => (true, &token[1..]),
        Some(b'+') => (false, &token[1..]),
        _ => (false, token),
    };

    let mut value: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        let d = i64::from(b - b'0');
        value = match value.checked_mul(10).and_then(|v| {
            if negative { v.checked_sub(d) } else { v.checked_add(d) }
        }) {
            Some(v) => v,
            None => return if negative { i64::MIN } else { i64::MAX },
        };
    }
    value
}
