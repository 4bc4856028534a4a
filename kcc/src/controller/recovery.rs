use super::{CharacterController, ForceKind};
use crate::{
    collision::{Collision, PhysicsWorld, Vec3},
    constants::PENETRATION_RECOVERY_ITERATIONS,
};

/// Offset that moves the character out of `collision`, or zero if it is not penetrating.
fn recovery_offset<B>(collision: &Collision<B>, other_is_b: bool) -> Vec3 {
    if collision.distance >= 0.0 {
        return Vec3::zeros();
    }
    // `normal_on_b` points toward A; flip it when the character is B.
    let sign = if other_is_b { -1.0 } else { 1.0 };
    collision.normal_on_b * (sign * collision.distance)
}

impl<W: PhysicsWorld> CharacterController<W> {
    /// Move the active body out of everything it overlaps.
    pub(super) fn recover_from_penetration(&mut self, world: &mut W) {
        if !self.movement.collision_enabled {
            return;
        }

        let active = self.ghosts.active().body;
        let mut iterations = 0;

        for _ in 0..PENETRATION_RECOVERY_ITERATIONS {
            self.state.current_position = world.position(active);

            // Earlier iterations moved the body, so contacts are re-queried every time.
            self.collisions.clear();
            world.calculate_collisions_for(active, &mut self.collisions);

            let mut correction = Vec3::zeros();
            let mut penetrations = 0u32;

            for collision in &self.collisions {
                let other_is_b = collision.object_a == active;
                let offset = recovery_offset(collision, other_is_b);
                if offset == Vec3::zeros() {
                    continue;
                }
                penetrations += 1;
                correction += offset;

                // Something moving into the character would otherwise press it
                // through static geometry a little more every tick.
                let other = if other_is_b {
                    collision.object_b
                } else {
                    collision.object_a
                };
                let Some(body) = world.as_dynamic_body(other) else {
                    continue;
                };
                if world.velocity(body).dot(&offset) <= 0.0 {
                    continue;
                }

                let contact_point = if other_is_b {
                    collision.contact_point_on_b
                } else {
                    collision.contact_point_on_a
                };
                let relative_position = contact_point - world.position(body.handle());
                let impulse = -offset / self.state.time_step * world.mass(body);
                world.apply_impulse(body, impulse, relative_position);
                self.debug.force(contact_point, impulse, ForceKind::PushBack);
            }

            if penetrations == 0 {
                break;
            }
            iterations += 1;

            self.state.current_position += correction / penetrations as f32;
            world.set_position(active, self.state.current_position);
        }

        if iterations > 0 {
            log::trace!(
                "`{}` recovered from penetration in {iterations} iteration(s)",
                self.name
            );
        }
    }
}
