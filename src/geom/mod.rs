//! Ray geometry: reconstructed segments and their display transform.
//!
//! - [`PathGeometryBuilder`] - path -> ordered [`Segment`]s
//! - [`DisplayTransform`] - uniform scale applied before drawing
//! - [`axis_gizmo`] - reference axes

mod builder;
mod segment;
mod transform;

pub use builder::*;
pub use segment::*;
pub use transform::*;
