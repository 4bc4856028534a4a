use crate::collision::Vec3;

/// Why the controller applied a force or impulse to a dynamic body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ForceKind {
    /// Walking into the body.
    Push,
    /// Resting weight on a stood-upon body.
    Weight,
    /// Landing on the body.
    Landing,
    /// Jumping off the body.
    Jump,
    /// Pushing back against a body that moves into the character.
    PushBack,
}

/// Receiver for controller debug events, e.g. to draw them.
///
/// Every method defaults to a no-op.
pub trait DebugSink {
    /// A sweep hit, after filtering. `accepted` is false for hits the controller ignores.
    fn sweep_hit(&mut self, _point: Vec3, _normal: Vec3, _accepted: bool) {}

    /// A force or impulse applied at world-space `point`.
    fn force(&mut self, _point: Vec3, _vector: Vec3, _kind: ForceKind) {}
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDebugSink;

impl DebugSink for NoDebugSink {}
