use super::{CharacterController, ForceKind};
use crate::{
    collision::{PhysicsWorld, Vec3},
    constants::{
        MAX_SLIDE_ITERATIONS, MIN_MOVE_SQ, MIN_SLIDE_FRACTION, PUSH_PROBE_DISTANCE, SWEEP_SKIN,
        WORLD_UP,
    },
    utils::{normalize_or_zero, slide_target},
};

impl<W: PhysicsWorld> CharacterController<W> {
    /// Rise by the positive part of the vertical velocity, stopping at ceilings.
    pub(super) fn step_up(&mut self, world: &mut W) {
        let rise = self.state.vertical_velocity.max(0.0) * self.state.time_step;
        if rise <= 0.0 {
            return;
        }

        let start = self.state.current_position;
        let target = start + WORLD_UP * rise;

        if !self.movement.collision_enabled {
            self.state.current_position = target;
            world.set_position(self.ghosts.active().body, target);
            return;
        }

        let cos = self.movement.max_slope_cosine();
        match self.character_sweep_test(world, start, target, -WORLD_UP, cos) {
            Some(hit) => {
                let travel = (rise * hit.hit_fraction - SWEEP_SKIN).max(0.0);
                self.state.current_position = start + WORLD_UP * travel;
                self.state.vertical_velocity = 0.0;
                world.set_position(self.ghosts.active().body, self.state.current_position);

                log::trace!("`{}` hit ceiling {:?}", self.name, hit.body);
                self.recover_from_penetration(world);
            }
            None => {
                self.state.current_position = target;
                world.set_position(self.ghosts.active().body, target);
            }
        }
    }

    /// Move by `step`, sliding along whatever blocks the way.
    ///
    /// Dynamic bodies just ahead along the desired direction get pushed first.
    pub(super) fn horizontal_step(&mut self, world: &mut W, step: Vec3) {
        if step.norm_squared() <= MIN_MOVE_SQ {
            return;
        }

        let start = self.state.current_position;
        let mut target = start + step;

        if !self.movement.collision_enabled {
            self.state.current_position = target;
            world.set_position(self.ghosts.active().body, target);
            return;
        }

        self.push_bodies_ahead(world);

        // Slides that turn back against this direction end the loop.
        let reference_direction = if self.state.desired_direction != Vec3::zeros() {
            self.state.desired_direction
        } else {
            normalize_or_zero(step)
        };

        let mut current = start;
        let mut fraction = 1.0;
        let mut iterations = 0;

        for _ in 0..MAX_SLIDE_ITERATIONS {
            if fraction <= MIN_SLIDE_FRACTION {
                break;
            }
            iterations += 1;

            let movement = target - current;
            let length = movement.norm();
            let direction = movement / length;

            // Only surfaces facing against the movement block it.
            let Some(hit) = self.character_sweep_test(world, current, target, -direction, 0.0)
            else {
                current = target;
                break;
            };

            fraction -= hit.hit_fraction;
            current += direction * (length * hit.hit_fraction - SWEEP_SKIN).max(0.0);
            target = slide_target(current, target, hit.hit_normal_worldspace);

            let remaining = target - current;
            if remaining.norm_squared() <= MIN_MOVE_SQ
                || remaining.dot(&reference_direction) <= 0.0
            {
                break;
            }
        }

        log::trace!(
            "`{}` horizontal step moved {:.4} of {:.4} m in {iterations} iteration(s)",
            self.name,
            (current - start).norm(),
            step.norm()
        );

        self.state.current_position = current;
        world.set_position(self.ghosts.active().body, current);
    }

    fn push_bodies_ahead(&mut self, world: &mut W) {
        let direction = self.state.desired_direction;
        if direction == Vec3::zeros() {
            return;
        }

        let start = self.state.current_position;
        let end = start + direction * PUSH_PROBE_DISTANCE;
        let Some(hit) = self.character_sweep_test(world, start, end, WORLD_UP, -1.0) else {
            return;
        };
        let Some(body) = world.as_dynamic_body(hit.body) else {
            return;
        };

        let force = direction * self.movement.push_force;
        let relative_position = hit.hit_point_worldspace - world.position(body.handle());
        world.apply_force(body, force, relative_position);
        self.debug
            .force(hit.hit_point_worldspace, force, ForceKind::Push);
    }
}
