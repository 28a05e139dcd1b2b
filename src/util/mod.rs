//! Utility types shared across the inspector.
//!
//! - [`Error`] / [`Result`] - Error handling
//! - Math type re-exports from glam and [`BBox3f`]

mod error;
mod math;

pub use error::*;
pub use math::*;
