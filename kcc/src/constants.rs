/*!
Controller-wide constants and default tunables.

Notes
- Distances are in meters, time in seconds, mass in kilograms.
- The world is Y-up, the same convention rapier uses for its Y-aligned shapes.
- Per-controller values live in [`crate::controller::settings`]; the defaults
  there are taken from this module.
*/

use crate::collision::Vec3;

/// Unit vector pointing "up" in world space.
pub const WORLD_UP: Vec3 = Vec3::new(0.0, 1.0, 0.0);

/// Maximum number of penetration recovery iterations per call.
pub const PENETRATION_RECOVERY_ITERATIONS: usize = 5;

/// Maximum number of sweep-and-slide iterations in the horizontal step.
pub const MAX_SLIDE_ITERATIONS: usize = 10;

/// The slide loop stops once the accumulated remaining fraction drops below this.
pub const MIN_SLIDE_FRACTION: f32 = 0.01;

/// Separation kept from an obstacle after a blocked horizontal sweep (meters).
/// Too large creates visible gaps; too small makes the next sweep start in contact.
pub const SWEEP_SKIN: f32 = 0.01;

/// Squared movement below which a displacement is treated as zero (m^2).
pub const MIN_MOVE_SQ: f32 = 1.0e-8;

/// Length-squared threshold for treating a vector as zero when normalizing.
pub const NORMALIZE_EPS_SQ: f32 = 1.0e-12;

/// How far ahead along the desired direction to look for dynamic bodies to push (meters).
pub const PUSH_PROBE_DISTANCE: f32 = 0.2;

/// Contact prediction distance used when querying manifolds for penetration recovery.
pub const CONTACT_PREDICTION: f32 = 0.0;

/// Default gravity magnitude (m/s^2).
pub const DEFAULT_GRAVITY: f32 = 9.8;

/// Terminal velocity of a sky diver (m/s).
pub const DEFAULT_MAX_FALL_SPEED: f32 = 55.0;

/// Default max walkable slope (radians), 45 degrees.
pub const DEFAULT_MAX_SLOPE: f32 = std::f32::consts::FRAC_PI_4;

/// Default mass of the character (kg), used for forces on bodies it touches.
pub const DEFAULT_MASS: f32 = 70.0;

/// Default force applied to dynamic bodies the character walks into (N).
pub const DEFAULT_PUSH_FORCE: f32 = 200.0;

/// Default acceleration along over-steep slopes (m/s^2).
pub const DEFAULT_SLIDE_DOWN_ACCELERATION: f32 = 5.0;

/// Default blend factor for vertical position and height smoothing, in (0, 1].
pub const DEFAULT_VERTICAL_INTERPOLATION_FACTOR: f32 = 0.5;
