//! Recorded light-transport data and its row codec.
//!
//! - [`RayNode`] - one scattering event, decoded from the `node` table
//! - [`RayPath`] - node ids of one pixel's path, decoded from the `path` table
//! - [`RowCursor`] - positional decoding of untyped rows

mod node;
mod path;
mod record;

pub use node::*;
pub use path::*;
pub use record::*;
