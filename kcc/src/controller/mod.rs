/*!
Kinematic character controller.

A [`CharacterController`] moves a vertical cylinder through a [`PhysicsWorld`]
using shape sweeps and contact queries instead of the dynamics solver. The host
accumulates input with [`CharacterController::move_by`] and
[`CharacterController::jump`], then calls [`CharacterController::update`] once
per tick, after stepping the world.

Each update runs the same phases in order:
1. gravity integration
2. step-up (rising, blocked by ceilings)
3. horizontal sweep-and-slide (and pushing dynamic bodies)
4. step-down (ground clamp, stairs, standing on dynamic bodies, steep slopes)
5. penetration recovery

Submodules
- settings: body dimensions and movement tunables
- debug:    optional sink for sweep hits and applied forces
- ghosts:   the standing/crouching ghost pair
- sweep:    filtered sweep test shared by all phases
- kinematic: step-up and horizontal phases
- ground:   step-down phase
- recovery: penetration recovery
*/

pub mod debug;
mod ghosts;
mod ground;
mod kinematic;
mod recovery;
pub mod settings;
mod state;
mod sweep;


use std::mem;

pub use debug::{DebugSink, ForceKind, NoDebugSink};
pub use ghosts::Stance;
pub use settings::{BodyDimensions, MovementSettings, Settings};

use self::{
    ghosts::{GhostBody, GhostPair},
    state::KinematicState,
};
use crate::{
    bitmask_flags::{CollisionGroup, CollisionGroups},
    collision::{Collision, PhysicsWorld, RayHit, Vec3},
    constants::WORLD_UP,
    error::ConfigError,
    utils::{lerp, lerp_vec, normalize_or_zero},
};

/// A kinematic character in a [`PhysicsWorld`] it does not own.
///
/// The two ghost bodies live in the world for as long as the controller does;
/// remove them with [`Self::destroy`].
pub struct CharacterController<W: PhysicsWorld> {
    name: String,
    dimensions: BodyDimensions,
    movement: MovementSettings,
    ghosts: GhostPair<W::Body, W::Shape>,
    state: KinematicState,
    // Scratch buffers reused across queries.
    ray_hits: Vec<RayHit<W::Body>>,
    collisions: Vec<Collision<W::Body>>,
    debug: Box<dyn DebugSink>,
}

impl<W: PhysicsWorld> CharacterController<W> {
    /// Create the standing and crouching ghost bodies in `world`, standing at the origin.
    pub fn new(world: &mut W, name: &str, settings: Settings) -> Result<Self, ConfigError> {
        let dimensions = settings.dimensions;
        dimensions.validate()?;

        let standing = Self::create_ghost(world, name, &dimensions, Stance::Standing);
        let crouching = Self::create_ghost(
            world,
            &format!("{name}_crouching"),
            &dimensions,
            Stance::Crouching,
        );
        let ghosts = GhostPair::new(standing, crouching);

        let position = world.position(ghosts.active().body);
        let controller = Self {
            name: name.to_owned(),
            dimensions,
            movement: settings.movement,
            ghosts,
            state: KinematicState::new(position, dimensions.standing_height),
            ray_hits: Vec::new(),
            collisions: Vec::new(),
            debug: Box::new(NoDebugSink),
        };
        controller.sync_inactive_ghost(world);

        log::debug!(
            "created character controller `{}` (radius {}, heights {}/{})",
            controller.name,
            dimensions.radius,
            dimensions.standing_height,
            dimensions.crouching_height
        );
        Ok(controller)
    }

    fn create_ghost(
        world: &mut W,
        name: &str,
        dimensions: &BodyDimensions,
        stance: Stance,
    ) -> GhostBody<W::Body, W::Shape> {
        let body_height = dimensions.height(stance) - dimensions.step_height(stance);
        let shape = world.create_cylinder_shape(Vec3::new(
            dimensions.radius,
            body_height * 0.5,
            dimensions.radius,
        ));
        let body = world.create_ghost_object(name, &shape, Vec3::zeros());

        world.set_filter_group(body, CollisionGroups::from_flags(&[CollisionGroup::Character]));
        world.set_filter_mask(body, CollisionGroups::all().without(CollisionGroup::Character));
        world.set_contact_response(body, stance == Stance::Standing);

        GhostBody { body, shape }
    }

    /// Remove both ghost bodies from `world`.
    pub fn destroy(self, world: &mut W) {
        for body in self.ghosts.bodies() {
            world.destroy_ghost_object(body);
        }
        log::debug!("destroyed character controller `{}`", self.name);
    }

    // --- Input ---

    /// Add `velocity` (m/s) to the motion requested for the next update.
    pub fn move_by(&mut self, velocity: Vec3) {
        let state = &mut self.state;
        state.desired_velocity += velocity;

        let direction = normalize_or_zero(state.desired_direction + velocity);
        if direction != Vec3::zeros() {
            state.desired_direction = direction;
        }
    }

    /// Jump with `velocity` (m/s). Takes effect at the end of the next update.
    ///
    /// A dynamic body under the character is pushed down by the opposite impulse right away.
    pub fn jump(&mut self, world: &mut W, velocity: f32) {
        if velocity.is_nan() || velocity <= 0.0 {
            return;
        }
        self.state.jump_velocity += velocity;

        let start = self.state.current_position;
        let end = start - WORLD_UP * (2.0 * self.step_height());
        let cos = self.movement.max_slope_cosine();
        let Some(hit) = self.character_sweep_test(world, start, end, WORLD_UP, cos) else {
            return;
        };
        let Some(body) = world.as_dynamic_body(hit.body) else {
            return;
        };

        let impulse = -WORLD_UP * (velocity * self.movement.mass);
        let relative_position = hit.hit_point_worldspace - world.position(body.handle());
        world.apply_impulse(body, impulse, relative_position);
        self.debug
            .force(hit.hit_point_worldspace, impulse, ForceKind::Jump);
        log::trace!("`{}` jumped off {:?}", self.name, hit.body);
    }

    /// Skip gravity for the next update only.
    pub fn set_ignore_gravity(&mut self) {
        self.state.ignore_gravity = true;
    }

    // --- Placement ---

    /// Place the feet at `position`, ignoring collisions.
    pub fn set_position(&mut self, world: &mut W, position: Vec3) {
        let centre = position - WORLD_UP * self.feet_offset();
        self.state.current_position = centre;
        // No interpolation from the old position.
        self.state.last_position = centre;

        world.set_position(self.ghosts.active().body, centre);
        self.sync_inactive_ghost(world);
    }

    /// Feet position, interpolated between the last two updates by `interpolate` in [0, 1].
    pub fn position(&self, interpolate: f32) -> Vec3 {
        let centre = lerp_vec(
            self.state.last_position,
            self.state.current_position,
            interpolate,
        );
        centre + WORLD_UP * self.feet_offset()
    }

    /// Switch stance. Returns whether it changed.
    ///
    /// Standing up fails if a ceiling is closer than the height difference. Feet stay put.
    pub fn set_is_standing(&mut self, world: &mut W, is_standing: bool) -> bool {
        let stance = Stance::from_standing(is_standing);
        if stance == self.ghosts.stance() {
            return false;
        }

        if stance == Stance::Standing {
            let rise = self.dimensions.standing_height - self.dimensions.crouching_height;
            let start = self.state.current_position;
            let end = start + WORLD_UP * rise;
            if let Some(hit) = self.character_sweep_test(world, start, end, -WORLD_UP, 0.0) {
                log::debug!(
                    "`{}` cannot stand up, blocked by {:?} at {:?}",
                    self.name,
                    hit.body,
                    hit.hit_point_worldspace
                );
                return false;
            }
        }

        self.change_stance(world, stance);
        true
    }

    fn change_stance(&mut self, world: &mut W, stance: Stance) {
        let old = self.ghosts.stance();
        let shift = WORLD_UP
            * (self.dimensions.feet_offset(old) - self.dimensions.feet_offset(stance));

        world.set_contact_response(self.ghosts.get(old).body, false);
        world.set_contact_response(self.ghosts.get(stance).body, true);
        self.ghosts.set_stance(stance);

        self.state.current_position += shift;
        self.state.last_position += shift;
        world.set_position(self.ghosts.active().body, self.state.current_position);
        self.sync_inactive_ghost(world);

        log::debug!("`{}` is now {:?}", self.name, stance);
    }

    /// Re-read the position from the active body, zero all motion and stand up
    /// without checking for a ceiling.
    pub fn reset(&mut self, world: &mut W) {
        let position = world.position(self.ghosts.active().body);
        self.state.current_position = position;
        if self.ghosts.stance() != Stance::Standing {
            self.change_stance(world, Stance::Standing);
        }
        self.state
            .reset(self.state.current_position, self.dimensions.standing_height);
        log::debug!("reset character controller `{}`", self.name);
    }

    // --- Update ---

    /// Advance the character by one tick of `time_step` seconds.
    ///
    /// Call once per tick, after stepping the world.
    pub fn update(&mut self, world: &mut W, time_step: f32) {
        if time_step.is_nan() || time_step <= 0.0 {
            log::warn!("`{}` ignoring update with time step {time_step}", self.name);
            return;
        }

        let active = self.ghosts.active().body;
        let state = &mut self.state;
        state.time_step = time_step;
        state.last_position = state.current_position;
        state.current_position = world.position(active);
        state.was_on_ground = state.is_on_ground;
        let surface_velocity = mem::take(&mut state.velocity_added_by_moving_surface);

        let damping = self.movement.damping_factor(time_step);
        state.desired_velocity *= damping;
        state.vertical_velocity *= damping;

        let gravity_step = if mem::take(&mut state.ignore_gravity) {
            0.0
        } else {
            -self.movement.gravity * time_step
        };
        state.vertical_velocity += gravity_step;
        state.vertical_velocity = state.vertical_velocity.max(-self.movement.max_fall_speed);

        self.step_up(world);
        let horizontal = (self.state.desired_velocity
            + surface_velocity
            + self.state.slope_slide_velocity)
            * time_step;
        self.horizontal_step(world, horizontal);
        let found_floor = self.step_down(world);
        self.recover_from_penetration(world);

        let state = &mut self.state;
        if state.vertical_velocity < 0.0 {
            // Gravity must not build up while something holds the character.
            let observed =
                (state.current_position - state.last_position).dot(&WORLD_UP) / time_step;
            state.vertical_velocity = state.vertical_velocity.max(observed.min(0.0));
        }

        if state.jump_velocity > 0.0 {
            if found_floor {
                // Leaving the floor this tick, so the launch feels this tick's gravity.
                state.vertical_velocity = gravity_step;
            }
            state.vertical_velocity += state.jump_velocity;
            state.jump_velocity = 0.0;
        }

        state.desired_velocity = Vec3::zeros();
        state.desired_direction = Vec3::zeros();

        let height = self.dimensions.height(self.ghosts.stance());
        state.last_height_interpolated = state.current_height_interpolated;
        state.current_height_interpolated = lerp(
            state.current_height_interpolated,
            height,
            self.movement.vertical_interpolation_factor,
        );

        self.sync_inactive_ghost(world);
    }

    /// Keep the inactive ghost at the same feet position as the active one.
    fn sync_inactive_ghost(&self, world: &mut W) {
        let stance = self.ghosts.stance();
        let offset = self.dimensions.feet_offset(stance)
            - self.dimensions.feet_offset(stance.other());
        world.set_position(
            self.ghosts.inactive().body,
            self.state.current_position + WORLD_UP * offset,
        );
    }

    // --- Accessors ---

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `[standing, crouching]` ghost bodies.
    pub fn ghost_bodies(&self) -> [W::Body; 2] {
        self.ghosts.bodies()
    }

    /// The ghost body with contact response.
    pub fn active_body(&self) -> W::Body {
        self.ghosts.active().body
    }

    pub fn stance(&self) -> Stance {
        self.ghosts.stance()
    }

    pub fn is_standing(&self) -> bool {
        self.ghosts.stance() == Stance::Standing
    }

    pub fn is_on_ground(&self) -> bool {
        self.state.is_on_ground
    }

    pub fn vertical_velocity(&self) -> f32 {
        self.state.vertical_velocity
    }

    /// Velocity over the last update; zero before the first one.
    pub fn velocity(&self) -> Vec3 {
        if self.state.time_step > 0.0 {
            (self.state.current_position - self.state.last_position) / self.state.time_step
        } else {
            Vec3::zeros()
        }
    }

    /// Velocity of the dynamic body the character stood on during the last update.
    pub fn velocity_added_by_moving_surface(&self) -> Vec3 {
        self.state.velocity_added_by_moving_surface
    }

    pub fn current_height(&self) -> f32 {
        self.dimensions.height(self.ghosts.stance())
    }

    /// Height eased toward [`Self::current_height`], interpolated between the last two updates.
    pub fn current_height_smooth(&self, interpolate: f32) -> f32 {
        lerp(
            self.state.last_height_interpolated,
            self.state.current_height_interpolated,
            interpolate,
        )
    }

    /// Offset from the active body centre to the feet along `WORLD_UP`.
    pub fn feet_offset(&self) -> f32 {
        self.dimensions.feet_offset(self.ghosts.stance())
    }

    pub fn step_height(&self) -> f32 {
        self.dimensions.step_height(self.ghosts.stance())
    }

    pub fn dimensions(&self) -> &BodyDimensions {
        &self.dimensions
    }

    pub fn movement(&self) -> &MovementSettings {
        &self.movement
    }

    pub fn movement_mut(&mut self) -> &mut MovementSettings {
        &mut self.movement
    }

    pub fn set_debug_sink(&mut self, sink: Box<dyn DebugSink>) {
        self.debug = sink;
    }
}
