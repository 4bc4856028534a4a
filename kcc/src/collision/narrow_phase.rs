use rapier3d::parry::{
    query::{self, ShapeCastOptions},
    shape::{Shape, ShapeType},
};

use super::types::{Iso, Vec3};

/// World-space result of casting a moving shape against one static-in-time shape.
#[derive(Clone, Copy, Debug)]
pub struct CastHit {
    /// World-space witness point on the target shape.
    pub point: Vec3,
    /// World-space outward normal of the target shape (faces the moving shape).
    pub normal: Vec3,
    /// Fraction (0..1) of `vel` travelled when contact happens.
    pub fraction: f32,
}

/// World-space contact between two shapes, expressed the way [`super::Collision`] wants it.
#[derive(Clone, Copy, Debug)]
pub struct ContactPoint {
    pub point1: Vec3,
    pub point2: Vec3,
    /// Outward normal of the second shape, i.e. pointing from shape 2 toward shape 1.
    pub normal2: Vec3,
    /// Signed distance; negative when penetrating.
    pub dist: f32,
}

/// Cast a moving, unrotated shape from `start` by `vel` against `target` at `target_iso`.
///
/// - Only hits within the full translation (`fraction <= 1`) are reported.
/// - Shapes that start out penetrating and are moving apart are not reported, so a body
///   resting in contact can still slide away from what it touches.
/// - Unsupported shape pairs are reported as no hit.
pub fn cast_shape(
    start: Vec3,
    vel: Vec3,
    moving: &dyn Shape,
    target_iso: &Iso,
    target: &dyn Shape,
) -> Option<CastHit> {
    let moving_iso = Iso::translation(start.x, start.y, start.z);

    // parry 0.25: build options from the maximum time of impact and pass them by value.
    let mut opts = ShapeCastOptions::with_max_time_of_impact(1.0);
    opts.stop_at_penetration = false;

    match query::cast_shapes(
        &moving_iso,
        &vel,
        moving,
        target_iso,
        &Vec3::zeros(),
        target,
        opts,
    ) {
        Ok(Some(hit)) => {
            // Witnesses and normals come back in each shape's local space.
            let point = target_iso * hit.witness2;
            let normal = target_iso.rotation * hit.normal2.into_inner();
            Some(CastHit {
                point: point.coords,
                normal,
                fraction: hit.time_of_impact,
            })
        }
        Ok(None) => None,
        Err(_) => {
            log::trace!("shape cast unsupported for this shape pair");
            None
        }
    }
}

/// Closest contact between two posed shapes within `prediction`, if any.
///
/// parry reports contact points and normals in world space already.
/// Half-spaces are always queried as the first shape: with a half-space second,
/// parry measures the pair from the wrong side and reports a plane far below the
/// other shape as penetrating it.
pub fn contact(
    iso1: &Iso,
    shape1: &dyn Shape,
    iso2: &Iso,
    shape2: &dyn Shape,
    prediction: f32,
) -> Option<ContactPoint> {
    let swapped = shape2.shape_type() == ShapeType::HalfSpace
        && shape1.shape_type() != ShapeType::HalfSpace;

    let result = if swapped {
        query::contact(iso2, shape2, iso1, shape1, prediction)
    } else {
        query::contact(iso1, shape1, iso2, shape2, prediction)
    };

    match result {
        Ok(Some(c)) if swapped => Some(ContactPoint {
            point1: c.point2.coords,
            point2: c.point1.coords,
            normal2: c.normal1.into_inner(),
            dist: c.dist,
        }),
        Ok(Some(c)) => Some(ContactPoint {
            point1: c.point1.coords,
            point2: c.point2.coords,
            normal2: c.normal2.into_inner(),
            dist: c.dist,
        }),
        Ok(None) => None,
        Err(_) => {
            log::trace!("contact query unsupported for this shape pair");
            None
        }
    }
}
