/*!
Core collision types and math aliases shared by the collision submodules and
the character controller.

This module intentionally contains no algorithms. It defines the data exchanged
between a [`super::PhysicsWorld`] implementation and its callers:
- sweep results ([`RayHit`])
- contact manifolds ([`Collision`])
- body classification ([`BodyKind`], [`DynamicBody`])

Handles are generic: every world picks its own opaque body handle type.
*/

use nalgebra as na;

/// Common math aliases for clarity and consistency.
pub type Vec3 = na::Vector3<f32>;
pub type Iso = na::Isometry3<f32>;

/// Result of a convex sweep against a single body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit<B> {
    /// The body that was hit by the sweep.
    pub body: B,
    /// World-space point at which the swept shape touched `body`.
    pub hit_point_worldspace: Vec3,
    /// World-space surface normal of `body` at the hit point, facing the swept shape.
    pub hit_normal_worldspace: Vec3,
    /// Fraction in [0, 1] of the sweep (start to end) at which the hit occurred.
    pub hit_fraction: f32,
}

/// One contact point between two bodies.
///
/// Sign conventions
/// - `normal_on_b` points from `object_b` toward `object_a`.
/// - `distance` is signed; negative means the bodies overlap by that amount.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Collision<B> {
    pub object_a: B,
    pub object_b: B,
    /// World-space contact point on `object_a`.
    pub contact_point_on_a: Vec3,
    /// World-space contact point on `object_b`.
    pub contact_point_on_b: Vec3,
    pub normal_on_b: Vec3,
    pub distance: f32,
}

/// What a body handle refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyKind {
    /// Immovable geometry.
    Static,
    /// Simulated rigid body affected by forces.
    Dynamic,
    /// Collision-only object excluded from dynamics (character silhouettes).
    Ghost,
}

/// A body handle known to refer to a dynamic body.
///
/// Obtained from [`super::PhysicsWorld::as_dynamic_body`]; force and impulse
/// operations only accept this wrapper.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DynamicBody<B>(pub B);

impl<B: Copy> DynamicBody<B> {
    #[inline]
    pub fn handle(&self) -> B {
        self.0
    }
}
