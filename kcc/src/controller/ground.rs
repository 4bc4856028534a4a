use super::{CharacterController, ForceKind};
use crate::{
    collision::{PhysicsWorld, RayHit, Vec3},
    constants::{SWEEP_SKIN, WORLD_UP},
    utils::{lerp_vec, normalize_or_zero, perpendicular_component},
};

impl<W: PhysicsWorld> CharacterController<W> {
    /// Clamp to the floor below, or fall. Returns whether a walkable floor was found.
    ///
    /// The body hovers `step_height` above its feet, so the downward sweep always
    /// covers that gap on top of this tick's fall.
    pub(super) fn step_down(&mut self, world: &mut W) -> bool {
        let time_step = self.state.time_step;
        let fall = -self.state.vertical_velocity.min(0.0) * time_step;

        if !self.movement.collision_enabled {
            self.state.current_position -= WORLD_UP * fall;
            world.set_position(self.ghosts.active().body, self.state.current_position);
            self.state.is_on_ground = false;
            return false;
        }

        let step_height = self.step_height();
        let cos = self.movement.max_slope_cosine();
        let start = self.state.current_position;

        let mut drop = fall + step_height;
        let mut floor = self.floor_sweep(world, start, drop, cos);

        // Follow descending stairs and ledges while walking on the ground.
        let retry_drop = 2.0 * step_height;
        if floor.is_none()
            && self.state.was_on_ground
            && self.state.jump_velocity <= 0.0
            && self.state.vertical_velocity <= 0.0
            && retry_drop > drop
        {
            drop = retry_drop;
            floor = self.floor_sweep(world, start, drop, cos);
        }

        match floor {
            Some((hit, sweep_length)) => {
                let target = start - WORLD_UP * sweep_length;
                let floor_position =
                    lerp_vec(start, target, hit.hit_fraction) + WORLD_UP * step_height;

                self.state.current_position = if self.state.was_on_ground {
                    lerp_vec(
                        start,
                        floor_position,
                        self.movement.vertical_interpolation_factor,
                    )
                } else {
                    floor_position
                };

                self.stand_on(world, hit);
                self.state.vertical_velocity = 0.0;
                self.state.slope_slide_velocity = Vec3::zeros();
                log::trace!("`{}` on floor {:?}", self.name, hit.body);
            }
            None => {
                self.state.current_position = start - WORLD_UP * fall;
            }
        }

        let found_floor = floor.is_some();
        self.state.is_on_ground = found_floor && self.state.jump_velocity <= 0.0;
        world.set_position(self.ghosts.active().body, self.state.current_position);

        if !self.state.is_on_ground {
            self.slide_down_steep_slope(world);
        }
        found_floor
    }

    /// Sweep `drop` (plus skin) down from `start`, accepting walkable floors only.
    ///
    /// Returns the hit and the length actually swept.
    fn floor_sweep(
        &mut self,
        world: &W,
        start: Vec3,
        drop: f32,
        max_slope_cosine: f32,
    ) -> Option<(RayHit<W::Body>, f32)> {
        let sweep_length = drop + SWEEP_SKIN;
        let end = start - WORLD_UP * sweep_length;
        self.character_sweep_test(world, start, end, WORLD_UP, max_slope_cosine)
            .map(|hit| (hit, sweep_length))
    }

    /// Load a dynamic floor with the character's weight and ride along with it.
    fn stand_on(&mut self, world: &mut W, hit: RayHit<W::Body>) {
        let Some(body) = world.as_dynamic_body(hit.body) else {
            return;
        };

        let mass = self.movement.mass;
        let point = hit.hit_point_worldspace;
        let relative_position = point - world.position(body.handle());

        if self.state.was_on_ground {
            // Central, so the body does not slowly spin out from under the character.
            let force = -WORLD_UP * (mass * self.movement.gravity.max(0.0));
            world.apply_central_force(body, force);
            self.debug.force(point, force, ForceKind::Weight);
        } else {
            let point_velocity = world.velocity(body)
                + world.angular_velocity(body).cross(&relative_position);
            let closing_speed =
                (self.state.vertical_velocity - point_velocity.dot(&WORLD_UP)).min(0.0);
            let impulse = WORLD_UP * (closing_speed * mass);
            world.apply_impulse(body, impulse, relative_position);
            self.debug.force(point, impulse, ForceKind::Landing);
        }

        self.state.velocity_added_by_moving_surface =
            world.velocity(body) + world.angular_velocity(body).cross(&relative_position);
    }

    /// Accelerate downhill while over a surface too steep to stand on.
    fn slide_down_steep_slope(&mut self, world: &W) {
        let start = self.state.current_position;
        let below = start - WORLD_UP * (2.0 * self.step_height() + SWEEP_SKIN);

        // Any upward-facing surface; walkable ones were already handled as floors.
        let steep = self
            .character_sweep_test(world, start, below, WORLD_UP, 0.0)
            .map(|hit| hit.hit_normal_worldspace)
            .filter(|normal| WORLD_UP.dot(normal) < self.movement.max_slope_cosine());

        let Some(normal) = steep else {
            self.state.slope_slide_velocity = Vec3::zeros();
            return;
        };

        // Horizontal part of the normal points downhill.
        let downhill = normalize_or_zero(perpendicular_component(normal, WORLD_UP));
        self.state.slope_slide_velocity +=
            downhill * (self.movement.slide_down_acceleration * self.state.time_step);
    }
}
