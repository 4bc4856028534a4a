/*!
Per-controller configuration.

Two groups of settings:
- [`BodyDimensions`]: the shape of the standing and crouching bodies. Fixed at
  construction because the ghost shapes are built from them.
- [`MovementSettings`]: tunables read on every update; change them at any time
  through [`super::CharacterController::movement_mut`].

Defaults come from [`crate::constants`].
*/

use super::Stance;
use crate::{
    constants::{
        DEFAULT_GRAVITY, DEFAULT_MASS, DEFAULT_MAX_FALL_SPEED, DEFAULT_MAX_SLOPE,
        DEFAULT_PUSH_FORCE, DEFAULT_SLIDE_DOWN_ACCELERATION,
        DEFAULT_VERTICAL_INTERPOLATION_FACTOR,
    },
    error::ConfigError,
};

/// Body dimensions for both stances (meters).
///
/// The collision cylinder of a stance spans `height - step_height` and hovers
/// `step_height` above the ground, so the character can walk over anything lower.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyDimensions {
    pub radius: f32,
    pub standing_height: f32,
    pub crouching_height: f32,
    pub standing_step_height: f32,
    pub crouching_step_height: f32,
}

impl Default for BodyDimensions {
    fn default() -> Self {
        Self {
            radius: 0.4,
            standing_height: 1.8,
            crouching_height: 0.9,
            standing_step_height: 0.3,
            crouching_step_height: 0.15,
        }
    }
}

impl BodyDimensions {
    #[inline]
    pub fn height(&self, stance: Stance) -> f32 {
        match stance {
            Stance::Standing => self.standing_height,
            Stance::Crouching => self.crouching_height,
        }
    }

    #[inline]
    pub fn step_height(&self, stance: Stance) -> f32 {
        match stance {
            Stance::Standing => self.standing_step_height,
            Stance::Crouching => self.crouching_step_height,
        }
    }

    /// Vertical offset from the body centre to the feet for `stance` (negative).
    #[inline]
    pub fn feet_offset(&self, stance: Stance) -> f32 {
        let step = self.step_height(stance);
        let body_height = self.height(stance) - step;
        -(step + body_height * 0.5)
    }

    /// Reject dimensions no body can be built from.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("radius", self.radius),
            ("standing_height", self.standing_height),
            ("crouching_height", self.crouching_height),
        ];
        for (name, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::NonPositiveDimension { name, value });
            }
        }

        for stance in [Stance::Standing, Stance::Crouching] {
            let step_height = self.step_height(stance);
            if step_height.is_nan() || step_height < 0.0 {
                return Err(ConfigError::NegativeStepHeight { stance, step_height });
            }
            let height = self.height(stance);
            if step_height >= height {
                return Err(ConfigError::StepHeightTooLarge {
                    stance,
                    step_height,
                    height,
                });
            }
        }

        if self.crouching_height > self.standing_height {
            return Err(ConfigError::CrouchingTallerThanStanding {
                crouching_height: self.crouching_height,
                standing_height: self.standing_height,
            });
        }

        Ok(())
    }
}

/// Movement tunables.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MovementSettings {
    /// Steepest walkable slope (radians).
    pub max_slope: f32,
    /// Acceleration along over-steep slopes (m/s^2).
    pub slide_down_acceleration: f32,
    /// Gravity magnitude (m/s^2), applied along `-WORLD_UP`.
    pub gravity: f32,
    /// Force applied to dynamic bodies walked into (N).
    pub push_force: f32,
    /// Terminal fall speed (m/s).
    pub max_fall_speed: f32,
    /// Character mass (kg), used for forces on stood-upon and jumped-off bodies.
    pub mass: f32,
    /// Per-tick blend toward the floor height and the target body height, in (0, 1].
    pub vertical_interpolation_factor: f32,
    /// Fraction of velocity lost per second, in [0, 1].
    pub linear_damping: f32,
    /// When false the character moves freely through geometry.
    pub collision_enabled: bool,
}

impl Default for MovementSettings {
    fn default() -> Self {
        Self {
            max_slope: DEFAULT_MAX_SLOPE,
            slide_down_acceleration: DEFAULT_SLIDE_DOWN_ACCELERATION,
            gravity: DEFAULT_GRAVITY,
            push_force: DEFAULT_PUSH_FORCE,
            max_fall_speed: DEFAULT_MAX_FALL_SPEED,
            mass: DEFAULT_MASS,
            vertical_interpolation_factor: DEFAULT_VERTICAL_INTERPOLATION_FACTOR,
            linear_damping: 0.0,
            collision_enabled: true,
        }
    }
}

impl MovementSettings {
    #[inline]
    pub fn max_slope_cosine(&self) -> f32 {
        self.max_slope.cos()
    }

    /// Velocity scale for one tick of `time_step` seconds.
    #[inline]
    pub fn damping_factor(&self, time_step: f32) -> f32 {
        (1.0 - self.linear_damping.clamp(0.0, 1.0)).powf(time_step)
    }
}

/// Everything needed to build a controller.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Settings {
    pub dimensions: BodyDimensions,
    pub movement: MovementSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_dimensions_are_valid() {
        assert_eq!(BodyDimensions::default().validate(), Ok(()));
    }

    #[test]
    fn step_height_must_be_below_height() {
        let dims = BodyDimensions {
            crouching_height: 0.5,
            crouching_step_height: 0.5,
            ..Default::default()
        };
        assert_eq!(
            dims.validate(),
            Err(ConfigError::StepHeightTooLarge {
                stance: Stance::Crouching,
                step_height: 0.5,
                height: 0.5,
            })
        );

        let dims = BodyDimensions {
            standing_step_height: 2.0,
            ..Default::default()
        };
        assert!(matches!(
            dims.validate(),
            Err(ConfigError::StepHeightTooLarge {
                stance: Stance::Standing,
                ..
            })
        ));
    }

    #[test]
    fn non_positive_and_nan_dimensions_are_rejected() {
        let dims = BodyDimensions {
            radius: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            dims.validate(),
            Err(ConfigError::NonPositiveDimension { name: "radius", .. })
        ));

        let dims = BodyDimensions {
            standing_height: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(
            dims.validate(),
            Err(ConfigError::NonPositiveDimension {
                name: "standing_height",
                ..
            })
        ));

        let dims = BodyDimensions {
            standing_step_height: -0.1,
            ..Default::default()
        };
        assert!(matches!(
            dims.validate(),
            Err(ConfigError::NegativeStepHeight { .. })
        ));

        let dims = BodyDimensions {
            crouching_step_height: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(
            dims.validate(),
            Err(ConfigError::NegativeStepHeight {
                stance: Stance::Crouching,
                ..
            })
        ));
    }

    #[test]
    fn crouching_cannot_exceed_standing() {
        let dims = BodyDimensions {
            crouching_height: 2.0,
            ..Default::default()
        };
        assert!(matches!(
            dims.validate(),
            Err(ConfigError::CrouchingTallerThanStanding { .. })
        ));
    }

    #[test]
    fn feet_offset_reaches_below_the_floating_body() {
        let dims = BodyDimensions::default();
        // Body spans 1.5 m and hovers 0.3 m up: centre sits 1.05 m above the feet.
        assert!((dims.feet_offset(Stance::Standing) + 1.05).abs() < 1.0e-6);
        // 0.75 m body hovering 0.15 m up.
        assert!((dims.feet_offset(Stance::Crouching) + 0.525).abs() < 1.0e-6);
    }

    #[test]
    fn damping_factor_bounds() {
        let mut movement = MovementSettings::default();
        assert_eq!(movement.damping_factor(1.0 / 60.0), 1.0);
        movement.linear_damping = 2.0;
        assert_eq!(movement.damping_factor(1.0 / 60.0), 0.0);
        assert!((MovementSettings::default().max_slope_cosine() - 0.70710677).abs() < 1.0e-6);
    }
}
