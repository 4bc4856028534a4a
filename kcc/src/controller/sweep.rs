use super::CharacterController;
use crate::{
    bitmask_flags::CollisionGroups,
    collision::{PhysicsWorld, RayHit, Vec3},
    constants::MIN_MOVE_SQ,
};

impl<W: PhysicsWorld> CharacterController<W> {
    /// Sweep the active shape from `start` to `end` and return the closest accepted hit.
    ///
    /// Rejected hits:
    /// - the controller's own ghost bodies
    /// - bodies without contact response
    /// - surfaces whose normal makes `dot(up, normal) < max_surface_angle_cosine`
    pub(super) fn character_sweep_test(
        &mut self,
        world: &W,
        start: Vec3,
        end: Vec3,
        up: Vec3,
        max_surface_angle_cosine: f32,
    ) -> Option<RayHit<W::Body>> {
        if (end - start).norm_squared() <= MIN_MOVE_SQ {
            return None;
        }

        self.ray_hits.clear();
        world.convex_sweep(
            &self.ghosts.active().shape,
            start,
            end,
            CollisionGroups::all(),
            &mut self.ray_hits,
        );

        let mut closest: Option<RayHit<W::Body>> = None;
        for hit in &self.ray_hits {
            if self.ghosts.contains(hit.body) {
                continue;
            }

            let accepted = world.has_contact_response(hit.body)
                && up.dot(&hit.hit_normal_worldspace) >= max_surface_angle_cosine;
            self.debug
                .sweep_hit(hit.hit_point_worldspace, hit.hit_normal_worldspace, accepted);

            if accepted && closest.is_none_or(|c| hit.hit_fraction < c.hit_fraction) {
                closest = Some(*hit);
            }
        }
        closest
    }
}
