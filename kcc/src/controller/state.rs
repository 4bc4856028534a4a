use crate::collision::Vec3;

/// Mutable per-tick state of a controller.
///
/// Positions are body centres, not feet. Velocity is never stored; it is derived
/// from `current_position - last_position` over the last `time_step`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct KinematicState {
    pub current_position: Vec3,
    pub last_position: Vec3,

    pub vertical_velocity: f32,
    /// Applied to `vertical_velocity` at the end of the next update.
    pub jump_velocity: f32,

    /// Sum of `move_by` calls since the last update.
    pub desired_velocity: Vec3,
    pub desired_direction: Vec3,

    pub is_on_ground: bool,
    pub was_on_ground: bool,
    /// Skip gravity on the next update only.
    pub ignore_gravity: bool,

    pub last_height_interpolated: f32,
    pub current_height_interpolated: f32,

    /// Velocity of the dynamic body stood upon during the last update.
    pub velocity_added_by_moving_surface: Vec3,
    /// Horizontal velocity gained sliding down an over-steep slope.
    pub slope_slide_velocity: Vec3,

    /// Zero until the first update.
    pub time_step: f32,
}

impl KinematicState {
    pub fn new(position: Vec3, height: f32) -> Self {
        Self {
            current_position: position,
            last_position: position,
            vertical_velocity: 0.0,
            jump_velocity: 0.0,
            desired_velocity: Vec3::zeros(),
            desired_direction: Vec3::zeros(),
            is_on_ground: false,
            was_on_ground: false,
            ignore_gravity: false,
            last_height_interpolated: height,
            current_height_interpolated: height,
            velocity_added_by_moving_surface: Vec3::zeros(),
            slope_slide_velocity: Vec3::zeros(),
            time_step: 0.0,
        }
    }

    /// Zero all motion and reset both positions to `position`.
    pub fn reset(&mut self, position: Vec3, height: f32) {
        let time_step = self.time_step;
        *self = Self::new(position, height);
        self.time_step = time_step;
    }
}
