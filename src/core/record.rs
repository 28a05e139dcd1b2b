//! Untyped result rows and the positional cursor used to decode them.
//!
//! The recorder writes fixed-layout tables, so rows are decoded by
//! position rather than by column name. [`RowCursor`] checks the cell
//! count before anything is read and reports the exact field index when
//! a cell has the wrong type.

use std::borrow::Cow;

use crate::util::{Error, Result, Vec3};

/// A single untyped value returned by a query executor.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Cell {
    fn kind(&self) -> &'static str {
        match self {
            Cell::Null => "NULL",
            Cell::Integer(_) => "integer",
            Cell::Real(_) => "real",
            Cell::Text(_) => "text",
            Cell::Blob(_) => "blob",
        }
    }
}

impl From<i64> for Cell {
    fn from(v: i64) -> Self {
        Cell::Integer(v)
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Cell::Real(v)
    }
}

impl From<&str> for Cell {
    fn from(v: &str) -> Self {
        Cell::Text(v.to_string())
    }
}

/// One result row, cells in table column order.
pub type Record = Vec<Cell>;

/// Cursor over one row that consumes cells left to right.
///
/// Scalars and flags take one slot, vectors take three.
pub struct RowCursor<'a> {
    table: &'static str,
    row: usize,
    cells: &'a [Cell],
    pos: usize,
}

impl<'a> RowCursor<'a> {
    /// Wrap `cells`, failing if the row does not have exactly `expected` cells.
    pub fn new(table: &'static str, row: usize, cells: &'a [Cell], expected: usize) -> Result<Self> {
        if cells.len() != expected {
            return Err(Error::ColumnCount { table, expected, actual: cells.len() });
        }
        Ok(Self { table, row, cells, pos: 0 })
    }

    /// Index of the next cell to be consumed.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    fn error(&self, field: usize, reason: impl Into<String>) -> Error {
        Error::Decode { table: self.table, row: self.row, field, reason: reason.into() }
    }

    fn next_cell(&mut self) -> Result<(usize, &'a Cell)> {
        let field = self.pos;
        let cells = self.cells;
        let cell = cells
            .get(field)
            .ok_or_else(|| self.error(field, "row exhausted"))?;
        self.pos += 1;
        Ok((field, cell))
    }

    /// Consume a 64-bit integer.
    pub fn i64(&mut self) -> Result<i64> {
        let (field, cell) = self.next_cell()?;
        match cell {
            Cell::Integer(v) => Ok(*v),
            // 2^63 is exact in f64; anything at or past it would saturate
            Cell::Real(v) if v.fract() == 0.0 && (-9.223372036854776e18..9.223372036854776e18).contains(v) => {
                Ok(*v as i64)
            }
            Cell::Real(v) => Err(self.error(field, format!("{} is not an integer", v))),
            Cell::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| self.error(field, format!("'{}' is not an integer", s))),
            other => Err(self.error(field, format!("expected integer, got {}", other.kind()))),
        }
    }

    /// Consume a non-negative integer used as a count.
    pub fn count(&mut self) -> Result<usize> {
        let field = self.pos;
        let v = self.i64()?;
        usize::try_from(v).map_err(|_| self.error(field, format!("negative count {}", v)))
    }

    /// Consume a 32-bit integer.
    pub fn i32(&mut self) -> Result<i32> {
        let field = self.pos;
        let v = self.i64()?;
        i32::try_from(v).map_err(|_| self.error(field, format!("{} does not fit in i32", v)))
    }

    /// Consume a float.
    pub fn f32(&mut self) -> Result<f32> {
        let (field, cell) = self.next_cell()?;
        match cell {
            Cell::Real(v) => Ok(*v as f32),
            Cell::Integer(v) => Ok(*v as f32),
            Cell::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| self.error(field, format!("'{}' is not a number", s))),
            other => Err(self.error(field, format!("expected number, got {}", other.kind()))),
        }
    }

    /// Consume a flag stored as 0/1.
    pub fn bool(&mut self) -> Result<bool> {
        let (field, cell) = self.next_cell()?;
        match cell {
            Cell::Integer(v) => Ok(*v != 0),
            Cell::Real(v) => Ok(*v != 0.0),
            Cell::Text(s) => match s.trim() {
                "0" | "false" => Ok(false),
                "1" | "true" => Ok(true),
                _ => Err(self.error(field, format!("'{}' is not a flag", s))),
            },
            other => Err(self.error(field, format!("expected flag, got {}", other.kind()))),
        }
    }

    /// Consume three floats as a vector.
    pub fn vec3(&mut self) -> Result<Vec3> {
        Ok(Vec3::new(self.f32()?, self.f32()?, self.f32()?))
    }

    /// Consume three slots holding a point that is only defined when `defined` is set.
    ///
    /// Undefined points are skipped without looking at the cells.
    pub fn point_if(&mut self, defined: bool) -> Result<Option<Vec3>> {
        if defined {
            return self.vec3().map(Some);
        }
        self.skip(3)?;
        Ok(None)
    }

    /// Consume a text cell. Integer cells are rendered as text.
    pub fn text(&mut self) -> Result<Cow<'a, str>> {
        let (field, cell) = self.next_cell()?;
        match cell {
            Cell::Text(s) => Ok(Cow::Borrowed(s.as_str())),
            Cell::Integer(v) => Ok(Cow::Owned(v.to_string())),
            Cell::Null => Ok(Cow::Borrowed("")),
            other => Err(self.error(field, format!("expected text, got {}", other.kind()))),
        }
    }

    /// Skip `n` slots.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        for _ in 0..n {
            self.next_cell()?;
        }
        Ok(())
    }

    /// Check that every cell was consumed.
    pub fn finish(self) -> Result<()> {
        if self.pos != self.cells.len() {
            return Err(self.error(self.pos, format!("{} cells left unread", self.cells.len() - self.pos)));
        }
        Ok(())
    }
}
