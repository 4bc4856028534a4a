use thiserror::Error;

use crate::controller::Stance;

/// Invalid controller configuration. Raised at construction and never clamped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{stance:?} step height {step_height} must be less than its height {height}")]
    StepHeightTooLarge {
        stance: Stance,
        step_height: f32,
        height: f32,
    },

    #[error("{stance:?} step height must not be negative, got {step_height}")]
    NegativeStepHeight { stance: Stance, step_height: f32 },

    #[error("`{name}` must be positive, got {value}")]
    NonPositiveDimension { name: &'static str, value: f32 },

    #[error("crouching height {crouching_height} exceeds standing height {standing_height}")]
    CrouchingTallerThanStanding {
        crouching_height: f32,
        standing_height: f32,
    },
}
