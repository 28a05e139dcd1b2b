//! Line segments handed to the renderer.

use bytemuck::{Pod, Zeroable};
use serde::Serialize;

use crate::util::{BBox3f, Vec3};

/// One straight piece of a reconstructed ray.
///
/// Laid out as two consecutive points so a segment slice can be uploaded
/// directly as a line-list vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, Serialize)]
#[repr(C)]
pub struct Segment {
    pub start: Vec3,
    pub end: Vec3,
}

impl Segment {
    #[inline]
    pub const fn new(start: Vec3, end: Vec3) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }
}

/// Segments reconstructed from one path.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PathGeometry {
    /// Segments in emission order, node after node.
    pub segments: Vec<Segment>,
    /// Ids of nodes the store could not resolve; they contribute no segments.
    pub skipped: Vec<i64>,
}

impl PathGeometry {
    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segment endpoints as a flat line-list.
    pub fn vertices(&self) -> &[Vec3] {
        bytemuck::cast_slice(&self.segments)
    }

    pub fn bounds(&self) -> BBox3f {
        BBox3f::from_points(self.vertices())
    }
}

/// Reference axes drawn next to the rays, as (segment, rgb colour) pairs.
pub fn axis_gizmo(length: f32) -> [(Segment, [f32; 3]); 3] {
    [
        (Segment::new(Vec3::ZERO, Vec3::X * length), [1.0, 0.0, 0.0]),
        (Segment::new(Vec3::ZERO, Vec3::Y * length), [0.0, 1.0, 0.0]),
        (Segment::new(Vec3::ZERO, Vec3::Z * length), [0.0, 0.0, 1.0]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertices_view() {
        let geom = PathGeometry {
            segments: vec![
                Segment::new(Vec3::ZERO, Vec3::X),
                Segment::new(Vec3::Y, Vec3::new(0.0, 2.0, -1.0)),
            ],
            skipped: Vec::new(),
        };
        assert_eq!(geom.vertices(), &[Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::new(0.0, 2.0, -1.0)]);

        let b = geom.bounds();
        assert_eq!(b.min, Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(b.max, Vec3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn test_empty_geometry_bounds() {
        assert!(PathGeometry::default().bounds().is_empty());
    }

    #[test]
    fn test_axis_gizmo() {
        let axes = axis_gizmo(10.0);
        assert_eq!(axes[1].0.end, Vec3::new(0.0, 10.0, 0.0));
        assert_eq!(axes[2].1, [0.0, 0.0, 1.0]);
        assert!(axes.iter().all(|(s, _)| s.length() == 10.0));
    }
}
