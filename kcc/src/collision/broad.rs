use rapier3d::parry::{
    bounding_volume::{Aabb, BoundingVolume},
    shape::Shape,
};

use super::types::{Iso, Vec3};

/// Compute a swept AABB for an unrotated `shape` moving from `start` to `end`.
///
/// The resulting AABB is inflated by `margin` to conservatively include near misses.
pub fn swept_shape_aabb(shape: &dyn Shape, start: Vec3, end: Vec3, margin: f32) -> Aabb {
    let aabb_start = shape.compute_aabb(&Iso::translation(start.x, start.y, start.z));
    let aabb_end = shape.compute_aabb(&Iso::translation(end.x, end.y, end.z));

    let swept = aabb_start.merged(&aabb_end);
    if margin > 0.0 {
        swept.loosened(margin)
    } else {
        swept
    }
}

/// Test two AABBs for overlap, treating touching boxes as overlapping.
#[inline]
pub fn aabbs_overlap(a: &Aabb, b: &Aabb) -> bool {
    !(a.maxs.x < b.mins.x
        || a.mins.x > b.maxs.x
        || a.maxs.y < b.mins.y
        || a.mins.y > b.maxs.y
        || a.maxs.z < b.mins.z
        || a.mins.z > b.maxs.z)
}
