// Physics collaborator: the contract the simulation talks to, and a rapier2d
// implementation of it

pub mod body;
pub mod collision;
pub mod shape;
mod world;

pub use body::{BodyKind, Facing, KinematicBody};
pub use collision::{CollisionLayer, CollisionTag, ContactEvent, ContactKind, ContactReport};
pub use shape::{BodyShape, ColliderDesc, ColliderShape};
pub use world::PhysicsWorld;

/// Unique identifier for anything that owns a physics body
pub type EntityId = u32;

/// External physics integrator
///
/// Each tick the level writes every body, steps once, then reads every body
/// back. Reading returns the grounded state and the contacts the body was
/// part of during the step; contacts are handed out once and dropped at the
/// next step if nobody read them.
pub trait PhysicsBackend {
    /// Register an entity's body and colliders
    fn insert(&mut self, id: EntityId, body: &KinematicBody, shape: &BodyShape);

    /// Forget an entity; unknown ids are ignored
    fn remove(&mut self, id: EntityId);

    /// Push game-side velocity, position changes and layer to the simulation
    fn write_body(&mut self, id: EntityId, body: &KinematicBody);

    /// Advance the simulation by `dt` seconds
    fn step(&mut self, dt: f32);

    /// Pull integrated position/velocity into `body` and report contacts
    fn read_body(&mut self, id: EntityId, body: &mut KinematicBody) -> ContactReport;
}
