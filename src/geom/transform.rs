//! Display-space transform applied to reconstructed geometry before drawing.

use serde::{Deserialize, Serialize};

use super::Segment;
use crate::util::{Mat4, Vec3};

/// Uniform scale the debug scene is drawn at.
pub const DEFAULT_DISPLAY_SCALE: f32 = 0.01;

/// Model transform for ray geometry.
///
/// The recorded scene is in renderer world units; the debug scene is
/// shrunk so rays and reference meshes line up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayTransform {
    matrix: Mat4,
}

impl DisplayTransform {
    pub const IDENTITY: Self = Self { matrix: Mat4::IDENTITY };

    /// Uniform scale about the origin.
    pub fn scale(factor: f32) -> Self {
        Self { matrix: Mat4::from_scale(Vec3::splat(factor)) }
    }

    pub fn from_matrix(matrix: Mat4) -> Self {
        Self { matrix }
    }

    #[inline]
    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    #[inline]
    pub fn apply_point(&self, p: Vec3) -> Vec3 {
        self.matrix.transform_point3(p)
    }

    #[inline]
    pub fn apply(&self, s: &Segment) -> Segment {
        Segment::new(self.apply_point(s.start), self.apply_point(s.end))
    }

    pub fn apply_all(&self, segments: &[Segment]) -> Vec<Segment> {
        segments.iter().map(|s| self.apply(s)).collect()
    }
}

impl Default for DisplayTransform {
    fn default() -> Self {
        Self::scale(DEFAULT_DISPLAY_SCALE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scale() {
        let t = DisplayTransform::default();
        let s = t.apply(&Segment::new(Vec3::new(100.0, 0.0, -200.0), Vec3::new(0.0, 550.0, 0.0)));
        assert!(s.start.abs_diff_eq(Vec3::new(1.0, 0.0, -2.0), 1e-6));
        assert!(s.end.abs_diff_eq(Vec3::new(0.0, 5.5, 0.0), 1e-6));
    }

    #[test]
    fn test_override() {
        let segs = [Segment::new(Vec3::ONE, Vec3::splat(2.0))];
        assert_eq!(DisplayTransform::IDENTITY.apply_all(&segs), segs.to_vec());
        assert_eq!(DisplayTransform::scale(2.0).apply_all(&segs)[0].end, Vec3::splat(4.0));

        let shifted = DisplayTransform::from_matrix(Mat4::from_translation(Vec3::X));
        assert_eq!(shifted.apply_point(Vec3::ZERO), Vec3::X);
    }
}
