/*!
Collision root module.

The character controller only talks to the world through the [`PhysicsWorld`]
trait defined here. The remaining submodules are the parry-based building
blocks the rapier-backed world uses to answer those queries:

- types:        shared data types (RayHit, Collision, BodyKind, math aliases)
- world:        the `PhysicsWorld` trait
- broad:        broad-phase helpers (swept AABBs, overlap tests)
- narrow_phase: thin wrappers over parry queries (shape casts, contacts)
*/

pub mod broad;
pub mod narrow_phase;
pub mod types;
pub mod world;

// Re-export commonly used types.
pub use types::{BodyKind, Collision, DynamicBody, Iso, RayHit, Vec3};
pub use world::PhysicsWorld;
