pub mod bitmask_flags;
pub mod collision;
pub mod constants;
pub mod controller;
pub mod error;
pub mod rapier_world;
pub mod utils;

pub use bitmask_flags::{CollisionGroup, CollisionGroups};
pub use collision::{BodyKind, Collision, DynamicBody, PhysicsWorld, RayHit, Vec3};
pub use constants::WORLD_UP;
pub use controller::{
    BodyDimensions, CharacterController, DebugSink, ForceKind, MovementSettings, NoDebugSink,
    Settings, Stance,
};
pub use error::ConfigError;
pub use rapier_world::{BodyDef, ColliderShapeDef, RapierWorld, collider_from_def};
