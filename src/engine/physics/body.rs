use glam::Vec2;

use super::collision::CollisionLayer;
use crate::core::math::clamp;

/// Which way a body is looking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// How the physics collaborator integrates a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyKind {
    /// Velocity is simulated (gravity, collisions)
    Dynamic,
    /// Position is driven by game code, physics only follows it
    Scripted,
    /// Never moves
    Fixed,
}

/// Position, velocity and facing of one simulated entity
///
/// Actors write velocity and intent; the physics collaborator integrates
/// position and reports `grounded` back once per tick.
#[derive(Debug, Clone, PartialEq)]
pub struct KinematicBody {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Set by the physics collaborator each tick
    pub grounded: bool,
    facing: Facing,
    intent: f32,
    kind: BodyKind,
    layer: CollisionLayer,
}

impl KinematicBody {
    pub fn new(position: Vec2, kind: BodyKind, layer: CollisionLayer) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            grounded: false,
            facing: Facing::Right,
            intent: 0.0,
            kind,
            layer,
        }
    }

    /// Simulated body on the given layer
    pub fn dynamic(position: Vec2, layer: CollisionLayer) -> Self {
        Self::new(position, BodyKind::Dynamic, layer)
    }

    /// Record the desired horizontal direction for this tick
    pub fn set_intent(&mut self, horizontal: f32) {
        self.intent = clamp(horizontal, -1.0, 1.0);
    }

    /// Horizontal intent recorded this tick
    pub fn intent(&self) -> f32 {
        self.intent
    }

    /// Set vertical velocity to a fixed upward value
    pub fn apply_vertical_impulse(&mut self, velocity: f32) {
        self.velocity.y = velocity;
    }

    /// Flip facing to match horizontal velocity; zero velocity keeps facing
    pub fn update_facing(&mut self) {
        self.face_toward(self.velocity.x);
    }

    /// Flip facing only when `direction` strictly disagrees with it
    pub fn face_toward(&mut self, direction: f32) {
        if direction > 0.0 && self.facing == Facing::Left {
            self.facing = Facing::Right;
        } else if direction < 0.0 && self.facing == Facing::Right {
            self.facing = Facing::Left;
        }
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    /// Stop all motion
    pub fn halt(&mut self) {
        self.velocity = Vec2::ZERO;
        self.intent = 0.0;
    }

    /// Move instantly and stop
    pub fn teleport(&mut self, position: Vec2) {
        self.position = position;
        self.halt();
    }

    pub fn kind(&self) -> BodyKind {
        self.kind
    }

    /// Hand the body to game code (`Scripted`) or back to the simulation
    pub fn set_kind(&mut self, kind: BodyKind) {
        self.kind = kind;
    }

    pub fn layer(&self) -> CollisionLayer {
        self.layer
    }

    /// Move the body's colliders to another layer
    pub fn set_layer(&mut self, layer: CollisionLayer) {
        self.layer = layer;
    }

    /// Whether the body is moving up (and should pass through one-way ledges)
    pub fn is_rising(&self) -> bool {
        self.velocity.y > 0.0
    }
}
