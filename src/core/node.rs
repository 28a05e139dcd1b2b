//! Ray nodes: one scattering event along a recorded light path.

use std::fmt::Write;

use serde::Serialize;

use super::record::{Record, RowCursor};
use crate::util::{Result, Vec3};

/// Name of the node table.
pub const NODE_TABLE: &str = "node";

/// Columns of the node table, in creation order.
///
/// Decoding is positional: [`RayNode::decode`] consumes cells in exactly
/// this order, so any change to the recorder's table layout must be
/// mirrored here.
#[rustfmt::skip]
pub const NODE_COLUMNS: [&str; 36] = [
    "id",
    "Lo_x", "Lo_y", "Lo_z",
    "wo_x", "wo_y", "wo_z",
    "pos_out_x", "pos_out_y", "pos_out_z",
    "inter_happened",
    "pos_inter_x", "pos_inter_y", "pos_inter_z",
    "Li_light_x", "Li_light_y", "Li_light_z",
    "wi_light_x", "wi_light_y", "wi_light_z",
    "inter_light_happened",
    "pos_in_light_x", "pos_in_light_y", "pos_in_light_z",
    "Li_obj_x", "Li_obj_y", "Li_obj_z",
    "wi_obj_x", "wi_obj_y", "wi_obj_z",
    "inter_obj_happened",
    "pos_in_obj_x", "pos_in_obj_y", "pos_in_obj_z",
    "RR",
    "is_obj_emission",
];

/// One vertex of a traced path.
///
/// Hit positions are only present when the matching ray actually hit
/// something; the recorder leaves the cells of a missed hit undefined.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RayNode {
    pub id: i64,

    /// Outgoing radiance
    pub lo: Vec3,
    /// Outgoing ray direction
    pub wo: Vec3,
    /// Origin of the outgoing ray
    pub pos_out: Vec3,
    /// Hit point of the outgoing ray
    pub pos_inter: Option<Vec3>,

    /// Radiance arriving from light sampling
    pub li_light: Vec3,
    /// Direction toward the sampled light
    pub wi_light: Vec3,
    /// Point on the light, if the shadow ray reached it
    pub pos_in_light: Option<Vec3>,

    /// Radiance arriving from BSDF sampling
    pub li_obj: Vec3,
    /// Direction of the BSDF-sampled ray
    pub wi_obj: Vec3,
    /// Hit point of the BSDF-sampled ray
    pub pos_in_obj: Option<Vec3>,

    /// Russian-roulette survival probability
    pub rr: f32,
    /// Whether the surface hit by BSDF sampling is emissive
    pub is_obj_emission: bool,
}

impl RayNode {
    /// Decode one row of the node table.
    pub fn decode(record: &Record, row: usize) -> Result<Self> {
        let mut cur = RowCursor::new(NODE_TABLE, row, record, NODE_COLUMNS.len())?;

        let id = cur.i64()?;

        let lo = cur.vec3()?;
        let wo = cur.vec3()?;
        let pos_out = cur.vec3()?;
        let inter_happened = cur.bool()?;
        let pos_inter = cur.point_if(inter_happened)?;

        let li_light = cur.vec3()?;
        let wi_light = cur.vec3()?;
        let inter_light_happened = cur.bool()?;
        let pos_in_light = cur.point_if(inter_light_happened)?;

        let li_obj = cur.vec3()?;
        let wi_obj = cur.vec3()?;
        let inter_obj_happened = cur.bool()?;
        let pos_in_obj = cur.point_if(inter_obj_happened)?;

        let rr = cur.f32()?;
        let is_obj_emission = cur.bool()?;
        cur.finish()?;

        Ok(Self {
            id,
            lo,
            wo,
            pos_out,
            pos_inter,
            li_light,
            wi_light,
            pos_in_light,
            li_obj,
            wi_obj,
            pos_in_obj,
            rr,
            is_obj_emission,
        })
    }

    /// The outgoing ray hit a surface.
    #[inline]
    pub fn inter_happened(&self) -> bool {
        self.pos_inter.is_some()
    }

    /// The light-sample ray reached the light.
    #[inline]
    pub fn inter_light_happened(&self) -> bool {
        self.pos_in_light.is_some()
    }

    /// The BSDF-sample ray hit an object.
    #[inline]
    pub fn inter_obj_happened(&self) -> bool {
        self.pos_in_obj.is_some()
    }

    /// Human-readable dump of every field, grouped by outgoing ray,
    /// light sample and object sample.
    pub fn detail(&self) -> String {
        let mut s = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(s, "id: {}", self.id);
        let _ = writeln!(s, "is inter: {}", self.inter_happened());
        let _ = writeln!(s, "Lo:        {}", fmt_vec3(self.lo));
        let _ = writeln!(s, "wo:        {}", fmt_vec3(self.wo));
        let _ = writeln!(s, "pos_out:   {}", fmt_vec3(self.pos_out));
        let _ = writeln!(s, "pos_inter: {}", fmt_point(self.pos_inter));
        s.push('\n');

        let _ = writeln!(s, "inter_with_light: {}", self.inter_light_happened());
        let _ = writeln!(s, "Li_light:     {}", fmt_vec3(self.li_light));
        let _ = writeln!(s, "wi_light:     {}", fmt_vec3(self.wi_light));
        let _ = writeln!(s, "pos_in_light: {}", fmt_point(self.pos_in_light));
        s.push('\n');

        let _ = writeln!(s, "inter_with_obj: {}", self.inter_obj_happened());
        let _ = writeln!(s, "Li_obj:     {}", fmt_vec3(self.li_obj));
        let _ = writeln!(s, "wi_obj:     {}", fmt_vec3(self.wi_obj));
        let _ = writeln!(s, "pos_in_obj: {}", fmt_point(self.pos_in_obj));
        let _ = writeln!(s, "RR: {}", self.rr);
        let _ = write!(s, "is_obj_emission: {}", self.is_obj_emission);
        s
    }
}

fn fmt_vec3(v: Vec3) -> String {
    format!("({:>7.3}, {:>7.3}, {:>7.3})", v.x, v.y, v.z)
}

fn fmt_point(p: Option<Vec3>) -> String {
    p.map(fmt_vec3).unwrap_or_else(|| "-".to_string())
}
