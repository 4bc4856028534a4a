//! Rapier-backed physics world for character controllers.
//!
//! This module provides [`RapierWorld`], a [`PhysicsWorld`] implementation holding a full
//! rapier3d simulation (static geometry, dynamic bodies) plus the collision-only ghost
//! objects the character controllers use as their silhouettes.
//!
//! Notes
//! - Immediate queries: sweeps and contact queries read collider poses directly, so ghost
//!   objects moved by a controller are visible to the next query without a world step.
//! - Forces applied through the trait act for exactly one
//!   [`RapierWorld::step`] and are cleared afterwards.
//! - Filter groups/masks live in the collider `user_data`.

// Re-export Rapier so downstream crates can use Rapier macros/types
// without needing to depend on `rapier3d` directly.
pub use rapier3d;

use rapier3d::na::{Translation3, UnitQuaternion};
use rapier3d::parry::{shape::Shape, utils::hashmap::HashMap};
use rapier3d::prelude::*;

use crate::{
    bitmask_flags::{CollisionGroup, CollisionGroups, needs_collision},
    collision::{
        BodyKind, Collision, DynamicBody, PhysicsWorld, RayHit, Vec3, broad, narrow_phase,
    },
    constants::CONTACT_PREDICTION,
};

/// Definition of a body to insert into a [`RapierWorld`].
///
/// Conventions
/// - Units are meters.
/// - Rotation is a unit quaternion.
/// - For planes, the normal is pose-derived: `normal = rotation * +Y`.
#[derive(Clone, Debug)]
pub struct BodyDef {
    /// World-space translation.
    pub translation: Vector<f32>,
    /// World-space rotation (unit quaternion).
    pub rotation: UnitQuaternion<f32>,
    /// Collider shape parameters.
    pub shape: ColliderShapeDef,
}

impl BodyDef {
    pub fn new(shape: ColliderShapeDef, translation: Vector<f32>) -> Self {
        Self {
            translation,
            rotation: UnitQuaternion::identity(),
            shape,
        }
    }

    pub fn with_rotation(mut self, rotation: UnitQuaternion<f32>) -> Self {
        self.rotation = rotation;
        self
    }

    fn isometry(&self) -> Isometry<f32> {
        Isometry::from_parts(Translation3::from(self.translation), self.rotation)
    }
}

/// Supported collider shapes.
#[derive(Clone, Debug)]
pub enum ColliderShapeDef {
    /// Infinite plane (half-space).
    ///
    /// The plane normal is derived from the pose as `rotation * +Y`, and the plane passes
    /// through `translation + normal * offset_along_normal`.
    Plane {
        /// Offset along the plane normal (meters).
        offset_along_normal: f32,
    },

    /// Oriented cuboid with given half-extents (meters).
    Cuboid { half_extents: Vector<f32> },

    /// Sphere/ball (meters).
    Sphere { radius: f32 },

    /// Y-aligned capsule (meters).
    CapsuleY { radius: f32, half_height: f32 },

    /// Y-aligned cylinder (meters).
    CylinderY { radius: f32, half_height: f32 },
}

/// Build a Rapier collider builder from a `BodyDef`.
///
/// The pose lives on the parent rigid-body, so the collider gets an identity local
/// transform, except for planes which are shifted along their local normal.
pub fn collider_from_def(def: &BodyDef) -> ColliderBuilder {
    match &def.shape {
        ColliderShapeDef::Plane {
            offset_along_normal,
        } => ColliderBuilder::new(SharedShape::halfspace(Vector::y_axis()))
            .translation(Vector::y() * *offset_along_normal),

        ColliderShapeDef::Cuboid { half_extents } => {
            ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
        }

        ColliderShapeDef::Sphere { radius } => ColliderBuilder::ball(*radius),

        ColliderShapeDef::CapsuleY {
            radius,
            half_height,
        } => ColliderBuilder::capsule_y(*half_height, *radius),

        ColliderShapeDef::CylinderY {
            radius,
            half_height,
        } => ColliderBuilder::cylinder(*half_height, *radius),
    }
}

/// Marks `user_data` as carrying a filter, so an explicit empty filter is not read as unset.
const FILTER_PRESENT_BIT: u128 = 1 << 64;

fn pack_filter(group: CollisionGroups, mask: CollisionGroups) -> u128 {
    FILTER_PRESENT_BIT | ((group.bits as u128) << 32) | mask.bits as u128
}

fn unpack_filter(user_data: u128) -> (CollisionGroups, CollisionGroups) {
    if user_data & FILTER_PRESENT_BIT == 0 {
        return (
            CollisionGroups::from_flags(&[CollisionGroup::Default]),
            CollisionGroups::all(),
        );
    }
    (
        CollisionGroups::new((user_data >> 32) as u32),
        CollisionGroups::new(user_data as u32),
    )
}

/// A rapier3d simulation that character controllers can query and push.
pub struct RapierWorld {
    pub gravity: Vector<f32>,
    pub integration_parameters: IntegrationParameters,
    pub bodies: RigidBodySet,
    pub colliders: ColliderSet,
    physics_pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: BroadPhaseBvh,
    narrow_phase: NarrowPhase,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    ghost_names: HashMap<ColliderHandle, String>,
}

impl RapierWorld {
    pub fn new(gravity: Vector<f32>) -> Self {
        Self {
            gravity,
            integration_parameters: IntegrationParameters::default(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            physics_pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: BroadPhaseBvh::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            ghost_names: HashMap::default(),
        }
    }

    /// Insert immovable geometry as a fixed rigid-body + attached collider.
    pub fn add_static(&mut self, def: &BodyDef) -> ColliderHandle {
        let rb = RigidBodyBuilder::fixed().pose(def.isometry()).build();
        let rb_handle = self.bodies.insert(rb);

        let collider = collider_from_def(def)
            .user_data(pack_filter(
                CollisionGroups::from_flags(&[CollisionGroup::Static]),
                CollisionGroups::all(),
            ))
            .build();
        self.colliders
            .insert_with_parent(collider, rb_handle, &mut self.bodies)
    }

    /// Insert a simulated rigid body whose mass follows from `density`.
    pub fn add_dynamic(&mut self, def: &BodyDef, density: f32) -> ColliderHandle {
        let rb = RigidBodyBuilder::dynamic().pose(def.isometry()).build();
        let rb_handle = self.bodies.insert(rb);

        let collider = collider_from_def(def)
            .density(density)
            .user_data(pack_filter(
                CollisionGroups::from_flags(&[CollisionGroup::Default]),
                CollisionGroups::all(),
            ))
            .build();
        self.colliders
            .insert_with_parent(collider, rb_handle, &mut self.bodies)
    }

    /// Advance the simulation by `dt` seconds, then clear all user forces.
    ///
    /// Call this before updating the character controllers of the same tick.
    pub fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;

        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            &(),
            &(),
        );

        for (_, rb) in self.bodies.iter_mut() {
            rb.reset_forces(false);
        }
    }

    /// Name given to a ghost object at creation.
    pub fn ghost_name(&self, ghost: ColliderHandle) -> Option<&str> {
        self.ghost_names.get(&ghost).map(String::as_str)
    }

    fn parent_body(&self, body: ColliderHandle) -> Option<&RigidBody> {
        let parent = self.colliders.get(body)?.parent()?;
        self.bodies.get(parent)
    }

    fn parent_body_mut(&mut self, body: ColliderHandle) -> Option<&mut RigidBody> {
        let parent = self.colliders.get(body)?.parent()?;
        self.bodies.get_mut(parent)
    }

    fn update_filter(
        &mut self,
        body: ColliderHandle,
        f: impl FnOnce(&mut CollisionGroups, &mut CollisionGroups),
    ) {
        let Some(collider) = self.colliders.get_mut(body) else {
            log::warn!("set filter on missing collider {body:?}");
            return;
        };
        let (mut group, mut mask) = unpack_filter(collider.user_data);
        f(&mut group, &mut mask);
        collider.user_data = pack_filter(group, mask);
    }
}

impl PhysicsWorld for RapierWorld {
    type Body = ColliderHandle;
    type Shape = SharedShape;

    fn create_cylinder_shape(&mut self, half_extents: Vec3) -> SharedShape {
        SharedShape::cylinder(half_extents.y, half_extents.x)
    }

    fn create_ghost_object(
        &mut self,
        name: &str,
        shape: &SharedShape,
        position: Vec3,
    ) -> ColliderHandle {
        let collider = ColliderBuilder::new(shape.clone())
            .translation(position)
            .user_data(pack_filter(
                CollisionGroups::from_flags(&[CollisionGroup::Default]),
                CollisionGroups::all(),
            ))
            .build();
        let handle = self.colliders.insert(collider);
        self.ghost_names.insert(handle, name.to_owned());
        handle
    }

    fn destroy_ghost_object(&mut self, ghost: ColliderHandle) {
        self.ghost_names.remove(&ghost);
        if self
            .colliders
            .remove(ghost, &mut self.islands, &mut self.bodies, false)
            .is_none()
        {
            log::warn!("destroying missing ghost object {ghost:?}");
        }
    }

    fn set_filter_group(&mut self, body: ColliderHandle, group: CollisionGroups) {
        self.update_filter(body, |g, _| *g = group);
    }

    fn set_filter_mask(&mut self, body: ColliderHandle, mask: CollisionGroups) {
        self.update_filter(body, |_, m| *m = mask);
    }

    fn set_contact_response(&mut self, body: ColliderHandle, enabled: bool) {
        match self.colliders.get_mut(body) {
            Some(collider) => collider.set_sensor(!enabled),
            None => log::warn!("set contact response on missing collider {body:?}"),
        }
    }

    fn has_contact_response(&self, body: ColliderHandle) -> bool {
        self.colliders
            .get(body)
            .is_some_and(|collider| !collider.is_sensor())
    }

    fn body_kind(&self, body: ColliderHandle) -> BodyKind {
        if self.ghost_names.contains_key(&body) {
            return BodyKind::Ghost;
        }
        match self.parent_body(body) {
            Some(rb) if rb.is_dynamic() => BodyKind::Dynamic,
            _ => BodyKind::Static,
        }
    }

    fn position(&self, body: ColliderHandle) -> Vec3 {
        if let Some(rb) = self.parent_body(body) {
            if rb.is_dynamic() {
                return rb.center_of_mass().coords;
            }
        }
        match self.colliders.get(body) {
            Some(collider) => *collider.translation(),
            None => {
                log::warn!("position of missing collider {body:?}");
                Vec3::zeros()
            }
        }
    }

    fn set_position(&mut self, ghost: ColliderHandle, position: Vec3) {
        match self.colliders.get_mut(ghost) {
            Some(collider) => collider.set_translation(position),
            None => log::warn!("set position on missing collider {ghost:?}"),
        }
    }

    fn convex_sweep(
        &self,
        shape: &SharedShape,
        start: Vec3,
        end: Vec3,
        filter_mask: CollisionGroups,
        out: &mut Vec<RayHit<ColliderHandle>>,
    ) {
        let moving: &dyn Shape = &**shape;
        let vel = end - start;
        let swept = broad::swept_shape_aabb(moving, start, end, 0.0);

        for (handle, collider) in self.colliders.iter() {
            if !collider.is_enabled() {
                continue;
            }
            let (group, _) = unpack_filter(collider.user_data);
            if !group.intersects(filter_mask) {
                continue;
            }
            if !broad::aabbs_overlap(&swept, &collider.compute_aabb()) {
                continue;
            }

            if let Some(hit) =
                narrow_phase::cast_shape(start, vel, moving, collider.position(), collider.shape())
            {
                out.push(RayHit {
                    body: handle,
                    hit_point_worldspace: hit.point,
                    hit_normal_worldspace: hit.normal,
                    hit_fraction: hit.fraction,
                });
            }
        }
    }

    fn calculate_collisions_for(
        &self,
        ghost: ColliderHandle,
        out: &mut Vec<Collision<ColliderHandle>>,
    ) {
        let Some(ghost_collider) = self.colliders.get(ghost) else {
            log::warn!("collisions for missing ghost object {ghost:?}");
            return;
        };
        let (ghost_group, ghost_mask) = unpack_filter(ghost_collider.user_data);
        let ghost_aabb = ghost_collider.compute_aabb();

        for (handle, other) in self.colliders.iter() {
            if handle == ghost || !other.is_enabled() || other.is_sensor() {
                continue;
            }
            let (other_group, other_mask) = unpack_filter(other.user_data);
            if !needs_collision(ghost_group, ghost_mask, other_group, other_mask) {
                continue;
            }
            if !broad::aabbs_overlap(&ghost_aabb, &other.compute_aabb()) {
                continue;
            }

            if let Some(c) = narrow_phase::contact(
                ghost_collider.position(),
                ghost_collider.shape(),
                other.position(),
                other.shape(),
                CONTACT_PREDICTION,
            ) {
                out.push(Collision {
                    object_a: ghost,
                    object_b: handle,
                    contact_point_on_a: c.point1,
                    contact_point_on_b: c.point2,
                    normal_on_b: c.normal2,
                    distance: c.dist,
                });
            }
        }
    }

    fn velocity(&self, body: DynamicBody<ColliderHandle>) -> Vec3 {
        self.parent_body(body.handle())
            .map(|rb| *rb.linvel())
            .unwrap_or_else(Vec3::zeros)
    }

    fn angular_velocity(&self, body: DynamicBody<ColliderHandle>) -> Vec3 {
        self.parent_body(body.handle())
            .map(|rb| *rb.angvel())
            .unwrap_or_else(Vec3::zeros)
    }

    fn mass(&self, body: DynamicBody<ColliderHandle>) -> f32 {
        self.parent_body(body.handle())
            .map(|rb| rb.mass())
            .unwrap_or(0.0)
    }

    fn apply_force(
        &mut self,
        body: DynamicBody<ColliderHandle>,
        force: Vec3,
        relative_position: Vec3,
    ) {
        if let Some(rb) = self.parent_body_mut(body.handle()) {
            let point = Point::from(rb.center_of_mass().coords + relative_position);
            rb.add_force_at_point(force, point, true);
        }
    }

    fn apply_central_force(&mut self, body: DynamicBody<ColliderHandle>, force: Vec3) {
        if let Some(rb) = self.parent_body_mut(body.handle()) {
            rb.add_force(force, true);
        }
    }

    fn apply_impulse(
        &mut self,
        body: DynamicBody<ColliderHandle>,
        impulse: Vec3,
        relative_position: Vec3,
    ) {
        if let Some(rb) = self.parent_body_mut(body.handle()) {
            let point = Point::from(rb.center_of_mass().coords + relative_position);
            rb.apply_impulse_at_point(impulse, point, true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ground_world() -> (RapierWorld, ColliderHandle) {
        let mut world = RapierWorld::new(vector![0.0, -9.81, 0.0]);
        let ground = world.add_static(&BodyDef::new(
            ColliderShapeDef::Plane {
                offset_along_normal: 0.0,
            },
            Vector::zeros(),
        ));
        (world, ground)
    }

    #[test]
    fn filter_round_trips_through_user_data() {
        let group = CollisionGroups::from_flags(&[CollisionGroup::Character]);
        let mask = CollisionGroups::all().without(CollisionGroup::Character);
        let (g, m) = unpack_filter(pack_filter(group, mask));
        assert_eq!(g, group);
        assert_eq!(m, mask);

        let (g, m) = unpack_filter(0);
        assert!(g.has(CollisionGroup::Default));
        assert_eq!(m, CollisionGroups::all());
    }

    #[test]
    fn sweep_down_hits_plane() {
        let (mut world, ground) = ground_world();
        let shape = world.create_cylinder_shape(Vec3::new(0.4, 0.5, 0.4));

        let mut hits = Vec::new();
        world.convex_sweep(
            &shape,
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, -1.0, 0.0),
            CollisionGroups::all(),
            &mut hits,
        );

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].body, ground);
        assert!((hits[0].hit_fraction - 0.25).abs() < 1.0e-4);
        assert!(hits[0].hit_normal_worldspace.y > 0.99);
        assert_eq!(world.body_kind(ground), BodyKind::Static);
    }

    #[test]
    fn sweep_respects_filter_mask() {
        let (mut world, _) = ground_world();
        let shape = world.create_cylinder_shape(Vec3::new(0.4, 0.5, 0.4));

        let mut hits = Vec::new();
        world.convex_sweep(
            &shape,
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, -1.0, 0.0),
            CollisionGroups::from_flags(&[CollisionGroup::Debris]),
            &mut hits,
        );
        assert!(hits.is_empty());
    }

    #[test]
    fn ghost_objects_move_immediately_and_report_contacts() {
        let (mut world, ground) = ground_world();
        let shape = world.create_cylinder_shape(Vec3::new(0.4, 0.5, 0.4));
        let ghost = world.create_ghost_object("ghost", &shape, Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(world.body_kind(ghost), BodyKind::Ghost);
        assert_eq!(world.ghost_name(ghost), Some("ghost"));

        let mut collisions = Vec::new();
        world.calculate_collisions_for(ghost, &mut collisions);
        assert!(collisions.is_empty());

        // Sink the ghost 0.1 into the ground.
        world.set_position(ghost, Vec3::new(0.0, 0.4, 0.0));
        assert!((world.position(ghost).y - 0.4).abs() < 1.0e-6);

        world.calculate_collisions_for(ghost, &mut collisions);
        assert_eq!(collisions.len(), 1);
        let c = collisions[0];
        assert_eq!(c.object_a, ghost);
        assert_eq!(c.object_b, ground);
        assert!((c.distance + 0.1).abs() < 1.0e-3);
        assert!(c.normal_on_b.y > 0.99);
    }

    #[test]
    fn disabling_contact_response_hides_from_contacts() {
        let (mut world, _) = ground_world();
        let shape = world.create_cylinder_shape(Vec3::new(0.4, 0.5, 0.4));
        let a = world.create_ghost_object("a", &shape, Vec3::new(0.0, 0.4, 0.0));
        let b = world.create_ghost_object("b", &shape, Vec3::new(0.0, 0.4, 0.0));
        world.set_contact_response(b, false);
        assert!(world.has_contact_response(a));
        assert!(!world.has_contact_response(b));

        let mut collisions = Vec::new();
        world.calculate_collisions_for(a, &mut collisions);
        assert!(collisions.iter().all(|c| c.object_b != b));

        world.destroy_ghost_object(b);
        assert!(world.ghost_name(b).is_none());
    }

    #[test]
    fn forces_act_for_one_step() {
        let mut world = RapierWorld::new(Vector::zeros());
        let crate_box = world.add_dynamic(
            &BodyDef::new(
                ColliderShapeDef::Cuboid {
                    half_extents: vector![0.5, 0.5, 0.5],
                },
                vector![0.0, 5.0, 0.0],
            ),
            1.0,
        );
        let body = world
            .as_dynamic_body(crate_box)
            .expect("box is dynamic");
        assert!((world.mass(body) - 1.0).abs() < 1.0e-3);

        world.apply_central_force(body, Vec3::new(60.0, 0.0, 0.0));
        world.step(1.0 / 60.0);
        let v1 = world.velocity(body).x;
        assert!(v1 > 0.5);

        // Without a new force the velocity stays (no gravity, no contact).
        world.step(1.0 / 60.0);
        let v2 = world.velocity(body).x;
        assert!((v2 - v1).abs() < 1.0e-3);
    }
}
