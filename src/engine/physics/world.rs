use rapier2d::prelude::*;
use std::collections::HashMap;

use super::body::{BodyKind, KinematicBody};
use super::collision::{
    CollisionEventQueue, CollisionLayer, CollisionTag, ContactEvent, ContactKind, ContactReport,
};
use super::shape::{build_collider, build_rigid_body, rigid_body_type, BodyShape};
use super::{EntityId, PhysicsBackend};

/// Ground probe starts this far above the feet
const GROUND_PROBE_LIFT: Real = 0.1;

/// Ground probe length
const GROUND_PROBE_LENGTH: Real = 0.2;

/// Per-entity bookkeeping on the rapier side
#[derive(Debug)]
struct EntityEntry {
    body: RigidBodyHandle,
    colliders: Vec<ColliderHandle>,
    feet_depth: Real,
    /// Layer and rising flag last pushed to the colliders
    applied_groups: (CollisionLayer, bool),
    /// Body kind last pushed to the rigid body
    applied_kind: BodyKind,
}

/// rapier2d-backed physics collaborator
pub struct PhysicsWorld {
    /// Gravity vector (default: -9.81 m/s² in y-axis)
    gravity: Vector<Real>,

    /// Integration parameters for the physics simulation
    integration_parameters: IntegrationParameters,

    /// Physics pipeline handles collision detection and solving
    physics_pipeline: PhysicsPipeline,

    /// Island manager for sleeping bodies
    island_manager: IslandManager,

    /// Broad phase collision detection
    broad_phase: DefaultBroadPhase,

    /// Narrow phase collision detection
    narrow_phase: NarrowPhase,

    /// Impulse joint set
    impulse_joint_set: ImpulseJointSet,

    /// Multibody joint set
    multibody_joint_set: MultibodyJointSet,

    /// CCD solver for fast-moving objects
    ccd_solver: CCDSolver,

    /// Query pipeline for ground probes
    query_pipeline: QueryPipeline,

    /// Rigid body set
    rigid_body_set: RigidBodySet,

    /// Collider set
    collider_set: ColliderSet,

    /// Collision event handler
    collision_event_queue: CollisionEventQueue,

    /// Game entities living in this world
    entities: HashMap<EntityId, EntityEntry>,

    /// Which entity and tag each collider belongs to
    collider_owner: HashMap<ColliderHandle, (EntityId, CollisionTag)>,

    /// Contacts gathered by the last step, not yet read
    pending: HashMap<EntityId, Vec<ContactEvent>>,
}

impl PhysicsWorld {
    /// Create a new physics world with default settings
    pub fn new() -> Self {
        Self::with_gravity(-9.81)
    }

    /// Create a new physics world with custom vertical gravity
    pub fn with_gravity(gravity_y: Real) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        // Fixed timestep of 1/60 seconds (60 FPS)
        integration_parameters.dt = 1.0 / 60.0;

        Self {
            gravity: vector![0.0, gravity_y],
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            collision_event_queue: CollisionEventQueue::new(),
            entities: HashMap::new(),
            collider_owner: HashMap::new(),
            pending: HashMap::new(),
        }
    }

    /// Whether an entity is present
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Number of entities present
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    fn probe_ground(&self, entry: &EntityEntry) -> bool {
        let Some(body) = self.rigid_body_set.get(entry.body) else {
            return false;
        };

        let position = body.translation();

        // Cast a ray downward from just above the feet
        let ray = Ray::new(
            point![position.x, position.y - entry.feet_depth + GROUND_PROBE_LIFT],
            vector![0.0, -1.0],
        );
        let filter = QueryFilter::default()
            .exclude_sensors()
            .exclude_rigid_body(entry.body)
            .groups(InteractionGroups::new(Group::ALL, CollisionLayer::ground_mask()));

        self.query_pipeline
            .cast_ray(
                &self.rigid_body_set,
                &self.collider_set,
                &ray,
                GROUND_PROBE_LENGTH,
                true,
                filter,
            )
            .is_some()
    }

    /// Turn this step's rapier contacts into per-entity contact lists
    fn dispatch_contacts(&mut self) {
        // Contacts nobody read since the last step are stale
        self.pending.clear();

        for raw in self.collision_event_queue.drain() {
            let (Some(&(id1, tag1)), Some(&(id2, tag2))) = (
                self.collider_owner.get(&raw.collider1),
                self.collider_owner.get(&raw.collider2),
            ) else {
                continue;
            };

            if id1 == id2 {
                continue;
            }

            let kind = ContactKind::new(raw.started, raw.sensor);
            self.pending
                .entry(id1)
                .or_default()
                .push(ContactEvent::new(id2, tag2, kind));
            self.pending
                .entry(id2)
                .or_default()
                .push(ContactEvent::new(id1, tag1, kind));
        }
    }
}

impl PhysicsBackend for PhysicsWorld {
    fn insert(&mut self, id: EntityId, body: &KinematicBody, shape: &BodyShape) {
        if self.entities.contains_key(&id) {
            log::warn!("Entity {} inserted twice, replacing its physics body", id);
            self.remove(id);
        }

        let handle = self.rigid_body_set.insert(build_rigid_body(body));

        let mut colliders = Vec::with_capacity(shape.colliders.len());
        for desc in &shape.colliders {
            let collider = build_collider(desc, body.layer());
            let collider_handle =
                self.collider_set
                    .insert_with_parent(collider, handle, &mut self.rigid_body_set);
            self.collider_owner.insert(collider_handle, (id, desc.tag));
            colliders.push(collider_handle);
        }

        self.entities.insert(
            id,
            EntityEntry {
                body: handle,
                colliders,
                feet_depth: shape.feet_depth(),
                applied_groups: (body.layer(), false),
                applied_kind: body.kind(),
            },
        );
    }

    fn remove(&mut self, id: EntityId) {
        let Some(entry) = self.entities.remove(&id) else {
            return;
        };

        for collider in &entry.colliders {
            self.collider_owner.remove(collider);
        }
        self.pending.remove(&id);

        self.rigid_body_set.remove(
            entry.body,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true, // remove attached colliders
        );
    }

    fn write_body(&mut self, id: EntityId, body: &KinematicBody) {
        let Some(entry) = self.entities.get_mut(&id) else {
            return;
        };

        let groups = (body.layer(), body.kind() == BodyKind::Dynamic && body.is_rising());
        if entry.applied_groups != groups {
            let interaction = if groups.1 {
                groups.0.rising_interaction_groups()
            } else {
                groups.0.to_interaction_groups()
            };
            for handle in &entry.colliders {
                if let Some(collider) = self.collider_set.get_mut(*handle) {
                    collider.set_collision_groups(interaction);
                }
            }
            entry.applied_groups = groups;
        }

        let Some(rigid_body) = self.rigid_body_set.get_mut(entry.body) else {
            return;
        };

        // Game code froze or released the body
        if entry.applied_kind != body.kind() {
            rigid_body.set_body_type(rigid_body_type(body.kind()), true);
            entry.applied_kind = body.kind();
        }

        let target = vector![body.position.x, body.position.y];
        match body.kind() {
            BodyKind::Dynamic => {
                // Game code moved the body (respawn, riding a platform)
                if (rigid_body.translation() - target).norm_squared() > 1e-10 {
                    rigid_body.set_translation(target, true);
                }
                rigid_body.set_linvel(vector![body.velocity.x, body.velocity.y], true);
            }
            BodyKind::Scripted => rigid_body.set_next_kinematic_translation(target),
            BodyKind::Fixed => {}
        }
    }

    fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;

        let event_handler = &self.collision_event_queue;

        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            event_handler,
        );

        self.dispatch_contacts();
    }

    fn read_body(&mut self, id: EntityId, body: &mut KinematicBody) -> ContactReport {
        let Some(entry) = self.entities.get(&id) else {
            return ContactReport::default();
        };

        if let Some(rigid_body) = self.rigid_body_set.get(entry.body) {
            let translation = rigid_body.translation();
            body.position = glam::Vec2::new(translation.x, translation.y);
            if body.kind() == BodyKind::Dynamic {
                let linvel = rigid_body.linvel();
                body.velocity = glam::Vec2::new(linvel.x, linvel.y);
            }
        }

        let grounded = body.kind() == BodyKind::Dynamic && self.probe_ground(entry);
        body.grounded = grounded;

        ContactReport {
            grounded,
            events: self.pending.remove(&id).unwrap_or_default(),
        }
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}
