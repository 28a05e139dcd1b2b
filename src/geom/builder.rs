//! Reconstruction of a recorded path as line segments.

use tracing::warn;

use super::{PathGeometry, Segment};
use crate::core::{RayNode, RayPath};
use crate::store::{NodeStore, QueryExecutor};
use crate::util::Result;

/// Length given to rays that never hit anything.
pub const RAY_LENGTH_NO_INTER: f32 = 500.0;

/// Turns [`RayPath`]s into [`PathGeometry`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathGeometryBuilder {
    /// Length of synthesized segments for missed rays
    pub ray_length: f32,
}

impl Default for PathGeometryBuilder {
    fn default() -> Self {
        Self { ray_length: RAY_LENGTH_NO_INTER }
    }
}

impl PathGeometryBuilder {
    pub fn new(ray_length: f32) -> Self {
        Self { ray_length }
    }

    /// Resolve every node of `path` and concatenate their segments in path order.
    ///
    /// Ids the store does not know are skipped and listed in
    /// [`PathGeometry::skipped`]. Store and decode failures abort the build.
    #[tracing::instrument(level = "debug", skip_all, fields(row = path.row, col = path.col, nodes = path.path_node_ids.len()))]
    pub fn build<E>(&self, nodes: NodeStore<'_, E>, path: &RayPath) -> Result<PathGeometry>
    where
        E: QueryExecutor + ?Sized,
    {
        let mut geom = PathGeometry {
            segments: Vec::with_capacity(path.path_node_ids.len() * 3),
            skipped: Vec::new(),
        };

        for &id in &path.path_node_ids {
            match nodes.get_node(id)? {
                Some(node) => self.node_segments(&node, &mut geom.segments),
                None => {
                    warn!(id, "path references a missing node, skipping");
                    geom.skipped.push(id);
                }
            }
        }

        Ok(geom)
    }

    /// Append the segments of one node.
    ///
    /// A missed outgoing ray yields a single segment pointing back along
    /// `-wo`. Otherwise the outgoing ray is followed by the light-sample
    /// and object-sample rays from the hit point, each ending at its hit or
    /// extended by `ray_length` along its direction.
    pub fn node_segments(&self, node: &RayNode, out: &mut Vec<Segment>) {
        let Some(hit) = node.pos_inter else {
            out.push(Segment::new(node.pos_out, node.pos_out - node.wo * self.ray_length));
            return;
        };
        out.push(Segment::new(node.pos_out, hit));

        let light_end = node.pos_in_light.unwrap_or(hit + node.wi_light * self.ray_length);
        out.push(Segment::new(hit, light_end));

        let obj_end = node.pos_in_obj.unwrap_or(hit + node.wi_obj * self.ray_length);
        out.push(Segment::new(hit, obj_end));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{escaped_node, fixture_store, hit_node, path};
    use crate::util::Vec3;

    fn segments_of(node: &RayNode) -> Vec<Segment> {
        let mut out = Vec::new();
        PathGeometryBuilder::default().node_segments(node, &mut out);
        out
    }

    #[test]
    fn test_escaped_ray() {
        let node = escaped_node(1, Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.0, 0.0, 1.0));
        let segs = segments_of(&node);
        assert_eq!(segs, vec![Segment::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(1.0, 2.0, -497.0))]);
    }

    #[test]
    fn test_light_hit_object_miss() {
        let pos_out = Vec3::new(0.0, 0.0, 0.0);
        let hit = Vec3::new(0.0, 10.0, 0.0);
        let lamp = Vec3::new(5.0, 20.0, 0.0);
        let node = hit_node(2, pos_out, hit, Some(lamp), None);

        let segs = segments_of(&node);
        assert_eq!(segs.len(), 3);
        assert_eq!(segs[0], Segment::new(pos_out, hit));
        assert_eq!(segs[1], Segment::new(hit, lamp));
        assert_eq!(segs[2], Segment::new(hit, hit + node.wi_obj * 500.0));
    }

    #[test]
    fn test_light_miss_object_hit() {
        let hit = Vec3::new(1.0, 1.0, 1.0);
        let wall = Vec3::new(-3.0, 1.0, 1.0);
        let node = hit_node(3, Vec3::ZERO, hit, None, Some(wall));

        let segs = segments_of(&node);
        assert_eq!(segs[1], Segment::new(hit, hit + node.wi_light * 500.0));
        assert_eq!(segs[2], Segment::new(hit, wall));
    }

    #[test]
    fn test_custom_ray_length() {
        let node = escaped_node(1, Vec3::ZERO, Vec3::X);
        let mut out = Vec::new();
        PathGeometryBuilder::new(2.0).node_segments(&node, &mut out);
        assert_eq!(out[0].end, Vec3::new(-2.0, 0.0, 0.0));
    }

    #[test]
    fn test_build_concatenates_in_path_order() {
        let a = hit_node(10, Vec3::ZERO, Vec3::Y, Some(Vec3::new(0.0, 5.0, 0.0)), None);
        let b = hit_node(11, Vec3::Y, Vec3::X, None, Some(Vec3::Z));
        let c = escaped_node(12, Vec3::X, Vec3::NEG_Z);
        let store = fixture_store(&[a.clone(), b.clone(), c.clone()], &[]);

        // traversal order differs from id order
        let p = path(0, 0, &[12, 10, 11]);
        let geom = PathGeometryBuilder::default().build(NodeStore::new(&store), &p).unwrap();

        let mut expected = segments_of(&c);
        expected.extend(segments_of(&a));
        expected.extend(segments_of(&b));
        assert_eq!(geom.segments.len(), 1 + 3 + 3);
        assert_eq!(geom.segments, expected);
        assert!(geom.skipped.is_empty());
    }

    #[test]
    fn test_missing_node_is_skipped() {
        let a = escaped_node(1, Vec3::ZERO, Vec3::X);
        let store = fixture_store(&[a], &[]);
        let p = path(0, 0, &[1, 99, 1]);

        let geom = PathGeometryBuilder::default().build(NodeStore::new(&store), &p).unwrap();
        assert_eq!(geom.len(), 2);
        assert_eq!(geom.skipped, vec![99]);
    }
}
