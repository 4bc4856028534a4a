use std::fmt::Debug;

use super::types::{BodyKind, Collision, DynamicBody, RayHit, Vec3};
use crate::bitmask_flags::CollisionGroups;

/// The physics world the character controller runs against.
///
/// The controller never owns the world. Every controller operation that needs
/// it takes it by reference, so one world can be shared by any number of
/// controllers and all physics-touching calls are serialized by the borrow
/// checker.
///
/// Implementations
/// - [`crate::rapier_world::RapierWorld`] backs this with rapier3d.
/// - Tests or other engines can provide their own; "no hit" is an empty result,
///   never an error.
pub trait PhysicsWorld {
    /// Opaque handle to any body in the world.
    type Body: Copy + Eq + Debug;
    /// Opaque handle to a collision shape usable in sweeps and ghost objects.
    type Shape: Clone;

    /// Create an upright cylinder shape from its half extents `(radius, half_height, radius)`.
    fn create_cylinder_shape(&mut self, half_extents: Vec3) -> Self::Shape;

    /// Create a collision-only body, unaffected by gravity or forces.
    fn create_ghost_object(&mut self, name: &str, shape: &Self::Shape, position: Vec3)
    -> Self::Body;

    /// Remove a ghost object created by [`Self::create_ghost_object`].
    fn destroy_ghost_object(&mut self, ghost: Self::Body);

    fn set_filter_group(&mut self, body: Self::Body, group: CollisionGroups);
    fn set_filter_mask(&mut self, body: Self::Body, mask: CollisionGroups);

    /// Enable or disable collision response for a body. A body without contact
    /// response still exists but does not block or push anything.
    fn set_contact_response(&mut self, body: Self::Body, enabled: bool);
    fn has_contact_response(&self, body: Self::Body) -> bool;

    fn body_kind(&self, body: Self::Body) -> BodyKind;

    /// Narrow a body handle to a dynamic body, if it is one.
    fn as_dynamic_body(&self, body: Self::Body) -> Option<DynamicBody<Self::Body>> {
        (self.body_kind(body) == BodyKind::Dynamic).then_some(DynamicBody(body))
    }

    /// World-space position: the centre of mass for dynamic bodies, the origin otherwise.
    fn position(&self, body: Self::Body) -> Vec3;

    /// Place a ghost object. Takes effect for queries immediately.
    fn set_position(&mut self, ghost: Self::Body, position: Vec3);

    /// Sweep `shape` (unrotated) linearly from `start` to `end` and append every hit
    /// against bodies whose group passes `filter_mask` to `out`. Order is unspecified.
    fn convex_sweep(
        &self,
        shape: &Self::Shape,
        start: Vec3,
        end: Vec3,
        filter_mask: CollisionGroups,
        out: &mut Vec<RayHit<Self::Body>>,
    );

    /// Append up-to-date contacts between `ghost` and every body it touches to `out`,
    /// independent of the last simulation step. `ghost` is always `object_a`.
    fn calculate_collisions_for(&self, ghost: Self::Body, out: &mut Vec<Collision<Self::Body>>);

    fn velocity(&self, body: DynamicBody<Self::Body>) -> Vec3;
    fn angular_velocity(&self, body: DynamicBody<Self::Body>) -> Vec3;
    fn mass(&self, body: DynamicBody<Self::Body>) -> f32;

    /// Apply `force` (N) at `relative_position` from the centre of mass, for the next step.
    fn apply_force(&mut self, body: DynamicBody<Self::Body>, force: Vec3, relative_position: Vec3);

    /// Apply `force` (N) at the centre of mass, for the next step.
    fn apply_central_force(&mut self, body: DynamicBody<Self::Body>, force: Vec3);

    /// Apply `impulse` (N·s) at `relative_position` from the centre of mass, immediately.
    fn apply_impulse(
        &mut self,
        body: DynamicBody<Self::Body>,
        impulse: Vec3,
        relative_position: Vec3,
    );
}
