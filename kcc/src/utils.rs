use crate::{collision::Vec3, constants::NORMALIZE_EPS_SQ};

/// Normalize `v`, or return zero if it is too short to have a direction.
#[inline]
pub fn normalize_or_zero(v: Vec3) -> Vec3 {
    let len_sq = v.norm_squared();
    if len_sq > NORMALIZE_EPS_SQ {
        v / len_sq.sqrt()
    } else {
        Vec3::zeros()
    }
}

/// Component of `direction` along the unit vector `normal`.
#[inline]
pub fn parallel_component(direction: Vec3, normal: Vec3) -> Vec3 {
    normal * direction.dot(&normal)
}

/// Component of `direction` orthogonal to the unit vector `normal`.
#[inline]
pub fn perpendicular_component(direction: Vec3, normal: Vec3) -> Vec3 {
    direction - parallel_component(direction, normal)
}

/// Mirror `direction` about the plane with unit normal `normal`.
#[inline]
pub fn reflect(direction: Vec3, normal: Vec3) -> Vec3 {
    direction - normal * (2.0 * direction.dot(&normal))
}

/// Redirect the movement `current -> target` along a surface with unit normal `hit_normal`.
///
/// The movement direction is reflected off the surface and its normal component removed,
/// keeping the original movement length. Returns the new target.
pub fn slide_target(current: Vec3, target: Vec3, hit_normal: Vec3) -> Vec3 {
    let movement = target - current;
    let movement_length = movement.norm();
    if movement_length * movement_length <= NORMALIZE_EPS_SQ {
        return target;
    }

    let movement_direction = movement / movement_length;
    let reflect_direction = normalize_or_zero(reflect(movement_direction, hit_normal));
    let perpendicular_direction = perpendicular_component(reflect_direction, hit_normal);
    current + perpendicular_direction * movement_length
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
pub fn lerp_vec(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_or_zero_handles_zero() {
        assert_eq!(normalize_or_zero(Vec3::zeros()), Vec3::zeros());
        let n = normalize_or_zero(Vec3::new(3.0, 0.0, 4.0));
        assert!((n.norm() - 1.0).abs() < 1.0e-6);
    }

    #[test]
    fn components_sum_to_input() {
        let d = Vec3::new(1.0, 2.0, 3.0);
        let n = Vec3::new(0.0, 1.0, 0.0);
        let sum = parallel_component(d, n) + perpendicular_component(d, n);
        assert!((sum - d).norm() < 1.0e-6);
        assert!(perpendicular_component(d, n).dot(&n).abs() < 1.0e-6);
    }

    #[test]
    fn slide_removes_motion_into_wall() {
        // Moving diagonally (+x, +z) into a wall whose normal faces -z.
        let current = Vec3::zeros();
        let target = Vec3::new(1.0, 0.0, 1.0);
        let normal = Vec3::new(0.0, 0.0, -1.0);

        let slid = slide_target(current, target, normal);
        assert!(slid.z.abs() < 1.0e-6);
        assert!((slid.x - 1.0).abs() < 1.0e-5);
    }

    #[test]
    fn head_on_slide_stops() {
        let slid = slide_target(
            Vec3::zeros(),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, -1.0),
        );
        assert!(slid.norm() < 1.0e-6);
    }

    #[test]
    fn lerp_endpoints() {
        assert_eq!(lerp(2.0, 4.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 4.0, 1.0), 4.0);
        assert_eq!(lerp_vec(Vec3::zeros(), Vec3::x(), 0.5), Vec3::new(0.5, 0.0, 0.0));
    }
}
