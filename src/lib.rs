//! # Raypath
//!
//! Inspector for light paths recorded by an offline path tracer.
//!
//! The tracer stores, per screen pixel, one row per traced path in a `path`
//! table and one row per scattering event in a `node` table of a SQLite
//! database. This crate reads those tables back and rebuilds every path as
//! 3D line segments for interactive debugging.
//!
//! ## Modules
//!
//! - [`util`] - Errors and math types
//! - [`core`] - `RayNode` / `RayPath` and positional row decoding
//! - [`store`] - Query executor seam, SQLite store, node and path lookups
//! - [`geom`] - Segment reconstruction and display transform
//! - [`inspect`] - Inspection session and selection state machine
//!
//! ## Example
//!
//! ```ignore
//! use raypath::prelude::*;
//!
//! let inspector = Inspector::open("rays.db", InspectorConfig::default())?;
//! let mut selection = SelectionController::new();
//!
//! selection.set_pixel(&inspector, 256, 300)?;
//! selection.choose_path(&inspector, 0)?;
//! if let Some(geom) = selection.geometry() {
//!     let segments = inspector.display_transform().apply_all(&geom.segments);
//!     println!("{} segments", segments.len());
//! }
//! ```

pub mod util;
pub mod core;
pub mod store;
pub mod geom;
pub mod inspect;

// Interactive viewer (optional, enabled with "viewer" feature)
#[cfg(feature = "viewer")]
pub mod viewer;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use util::{Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{Error, Result, Vec3};
    pub use crate::core::{RayNode, RayPath, parse_node_ids};
    pub use crate::store::{QueryExecutor, SqliteStore, NodeStore, PathStore};
    pub use crate::geom::{Segment, PathGeometry, PathGeometryBuilder, DisplayTransform};
    pub use crate::inspect::{Inspector, InspectorConfig, SelectionController, SelectionState, Transition};
}
