use glam::Vec2;
use rapier2d::prelude::*;

use super::body::{BodyKind, KinematicBody};
use super::collision::{CollisionLayer, CollisionTag};

/// Geometry of one collider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderShape {
    /// Axis-aligned box given by half extents
    Box { half_width: f32, half_height: f32 },
    /// Vertical capsule (good for characters)
    Capsule { half_height: f32, radius: f32 },
}

impl ColliderShape {
    /// Distance from the collider center to its lowest point
    pub fn half_height(&self) -> f32 {
        match *self {
            ColliderShape::Box { half_height, .. } => half_height,
            ColliderShape::Capsule { half_height, radius } => half_height + radius,
        }
    }
}

/// One collider attached to an entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColliderDesc {
    pub shape: ColliderShape,
    /// Offset from the body origin
    pub offset: Vec2,
    pub tag: CollisionTag,
    /// Sensors report trigger contacts and never block
    pub sensor: bool,
}

impl ColliderDesc {
    pub fn solid(shape: ColliderShape, tag: CollisionTag) -> Self {
        Self {
            shape,
            offset: Vec2::ZERO,
            tag,
            sensor: false,
        }
    }

    pub fn sensor(shape: ColliderShape, tag: CollisionTag) -> Self {
        Self {
            sensor: true,
            ..Self::solid(shape, tag)
        }
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    /// Lowest point of this collider relative to the body origin
    pub fn bottom(&self) -> f32 {
        self.offset.y - self.shape.half_height()
    }
}

/// All colliders of one entity
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BodyShape {
    pub colliders: Vec<ColliderDesc>,
}

impl BodyShape {
    pub fn new(colliders: Vec<ColliderDesc>) -> Self {
        Self { colliders }
    }

    /// A single box
    pub fn solid_box(size: Vec2, tag: CollisionTag) -> Self {
        Self::new(vec![ColliderDesc::solid(
            ColliderShape::Box {
                half_width: size.x / 2.0,
                half_height: size.y / 2.0,
            },
            tag,
        )])
    }

    /// A single sensor box
    pub fn sensor_box(size: Vec2, tag: CollisionTag) -> Self {
        Self::new(vec![ColliderDesc::sensor(
            ColliderShape::Box {
                half_width: size.x / 2.0,
                half_height: size.y / 2.0,
            },
            tag,
        )])
    }

    /// Distance from the body origin down to its feet, ignoring sensors
    pub fn feet_depth(&self) -> f32 {
        self.colliders
            .iter()
            .filter(|collider| !collider.sensor)
            .map(|collider| -collider.bottom())
            .fold(0.0, f32::max)
    }
}

/// Common entity shapes
pub mod presets {
    use super::*;

    /// Capsule sized to the character
    pub fn player(width: f32, height: f32) -> BodyShape {
        let radius = width / 2.0;
        let half_height = (height / 2.0) - radius; // Subtract radius to get capsule half-height

        BodyShape::new(vec![ColliderDesc::solid(
            ColliderShape::Capsule {
                half_height,
                radius,
            },
            CollisionTag::Player,
        )])
    }

    /// Solid body, a slightly larger attack trigger, and a stun point on top
    pub fn enemy(width: f32, height: f32) -> BodyShape {
        let half_width = width / 2.0;
        let half_height = height / 2.0;

        BodyShape::new(vec![
            ColliderDesc::solid(
                ColliderShape::Box {
                    half_width,
                    half_height,
                },
                CollisionTag::Enemy,
            ),
            ColliderDesc::sensor(
                ColliderShape::Box {
                    half_width: half_width + 0.1,
                    half_height: half_height * 0.8,
                },
                CollisionTag::Enemy,
            ),
            ColliderDesc::solid(
                ColliderShape::Box {
                    half_width: half_width * 0.8,
                    half_height: 0.1,
                },
                CollisionTag::EnemyStunPoint,
            )
            .with_offset(Vec2::new(0.0, half_height + 0.1)),
        ])
    }
}

/// rapier body type for a body kind
pub(crate) fn rigid_body_type(kind: BodyKind) -> RigidBodyType {
    match kind {
        BodyKind::Dynamic => RigidBodyType::Dynamic,
        BodyKind::Scripted => RigidBodyType::KinematicPositionBased,
        BodyKind::Fixed => RigidBodyType::Fixed,
    }
}

/// Build the rapier rigid body mirroring a game body
pub(crate) fn build_rigid_body(body: &KinematicBody) -> RigidBody {
    let mut rigid_body = RigidBodyBuilder::new(rigid_body_type(body.kind()))
        .translation(vector![body.position.x, body.position.y])
        .linvel(vector![body.velocity.x, body.velocity.y])
        .lock_rotations()
        .can_sleep(false)
        .build();

    if body.kind() == BodyKind::Dynamic {
        rigid_body.set_linear_damping(0.0);
    }

    rigid_body
}

/// Build one rapier collider for the given layer
pub(crate) fn build_collider(desc: &ColliderDesc, layer: CollisionLayer) -> Collider {
    let builder = match desc.shape {
        ColliderShape::Box {
            half_width,
            half_height,
        } => ColliderBuilder::cuboid(half_width, half_height),
        ColliderShape::Capsule {
            half_height,
            radius,
        } => ColliderBuilder::capsule_y(half_height, radius),
    };

    builder
        .translation(vector![desc.offset.x, desc.offset.y])
        .collision_groups(layer.to_interaction_groups())
        .sensor(desc.sensor)
        .friction(0.0) // No friction for smooth movement
        .restitution(0.0) // No bounce
        .density(1.0)
        .active_events(ActiveEvents::COLLISION_EVENTS)
        .build()
}
