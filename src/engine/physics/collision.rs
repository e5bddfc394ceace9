use rapier2d::prelude::*;
use std::sync::Mutex;

use super::EntityId;

/// What a collider represents to game logic
///
/// Contacts carry the tag of the collider that was touched, so a single
/// entity can expose several tags (an enemy has a body, an attack trigger
/// and a stun point on its head).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionTag {
    Player,
    /// Enemy body and its attack trigger
    Enemy,
    /// The spot on an enemy that stuns it when the player lands on it
    EnemyStunPoint,
    /// Solid platform that moves along a path and carries riders
    MovingPlatform,
    /// Solid static level geometry
    Ground,
    /// Ledge that can be jumped through from below
    OneWayPlatform,
    /// Kills the player, optionally removes anything else
    DeathZone,
    Coin,
    Victory,
}

/// How two colliders touched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactKind {
    /// Two solid colliders started touching
    CollisionEnter,
    /// Two solid colliders stopped touching
    CollisionExit,
    /// A sensor started overlapping
    TriggerEnter,
    /// A sensor stopped overlapping
    TriggerExit,
}

impl ContactKind {
    pub fn new(started: bool, sensor: bool) -> Self {
        match (started, sensor) {
            (true, false) => ContactKind::CollisionEnter,
            (false, false) => ContactKind::CollisionExit,
            (true, true) => ContactKind::TriggerEnter,
            (false, true) => ContactKind::TriggerExit,
        }
    }

    pub fn is_enter(self) -> bool {
        matches!(self, ContactKind::CollisionEnter | ContactKind::TriggerEnter)
    }
}

/// A contact seen from one participant's side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactEvent {
    /// The entity that was touched
    pub other: EntityId,
    /// Tag of the collider that was touched
    pub tag: CollisionTag,
    pub kind: ContactKind,
}

impl ContactEvent {
    pub fn new(other: EntityId, tag: CollisionTag, kind: ContactKind) -> Self {
        Self { other, tag, kind }
    }
}

/// Everything the physics collaborator learned about one body this tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactReport {
    pub grounded: bool,
    pub events: Vec<ContactEvent>,
}

/// Collision layers for filtering what objects can collide with each other
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionLayer {
    /// Default layer - interacts with everything
    Default = 0b0000_0001,

    /// The player character
    Player = 0b0000_0010,

    /// Enemies that can attack and be stunned
    Enemy = 0b0000_0100,

    /// Enemies while stunned - the player passes through them
    StunnedEnemy = 0b0000_1000,

    /// Solid static and moving geometry
    Ground = 0b0001_0000,

    /// Ledges the player can jump up through
    OneWayPlatform = 0b0010_0000,

    /// Death zones
    Hazard = 0b0100_0000,

    /// Coins and the victory flag
    Pickup = 0b1000_0000,
}

impl CollisionLayer {
    fn bits(layers: &[CollisionLayer]) -> Group {
        Group::from_bits_truncate(layers.iter().fold(0, |acc, layer| acc | *layer as u32))
    }

    /// Convert to rapier2d's InteractionGroups
    pub fn to_interaction_groups(self) -> InteractionGroups {
        use CollisionLayer::*;

        let memberships = Group::from_bits_truncate(self as u32);

        let filter = match self {
            Player => Self::bits(&[Ground, OneWayPlatform, Enemy, Hazard, Pickup]),
            Enemy => Self::bits(&[Player, Enemy, Ground, OneWayPlatform, Hazard]),
            // No player in the filter: a stunned enemy can't hurt or block
            StunnedEnemy => Self::bits(&[Ground, OneWayPlatform, Hazard]),
            Ground => Group::ALL,
            OneWayPlatform => Self::bits(&[Player, Enemy, StunnedEnemy]),
            Hazard => Self::bits(&[Player, Enemy, StunnedEnemy]),
            Pickup => Self::bits(&[Player]),
            Default => Group::ALL,
        };

        InteractionGroups::new(memberships, filter)
    }

    /// Groups for a body moving upward: one-way platforms are dropped from
    /// the filter so the body passes through them from below
    pub fn rising_interaction_groups(self) -> InteractionGroups {
        let groups = self.to_interaction_groups();
        let one_way = Group::from_bits_truncate(CollisionLayer::OneWayPlatform as u32);
        InteractionGroups::new(groups.memberships, groups.filter & !one_way)
    }

    /// Layers that count as floor for grounded checks
    pub fn ground_mask() -> Group {
        Self::bits(&[CollisionLayer::Ground, CollisionLayer::OneWayPlatform])
    }
}

/// Raw rapier contact recorded during a step
#[derive(Debug, Clone, Copy)]
pub(crate) struct RawContact {
    pub collider1: ColliderHandle,
    pub collider2: ColliderHandle,
    pub started: bool,
    pub sensor: bool,
}

/// Queue for storing collision events during physics step
pub(crate) struct CollisionEventQueue {
    events: Mutex<Vec<RawContact>>,
}

impl CollisionEventQueue {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::with_capacity(32)), // Pre-allocate for common case
        }
    }

    /// Take all events recorded since the last drain
    pub fn drain(&self) -> Vec<RawContact> {
        self.events
            .lock()
            .map(|mut events| std::mem::take(&mut *events))
            .unwrap_or_default()
    }

    fn push(&self, event: RawContact) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl Default for CollisionEventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHandler for CollisionEventQueue {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: rapier2d::prelude::CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        let (collider1, collider2, flags, started) = match event {
            rapier2d::prelude::CollisionEvent::Started(h1, h2, flags) => (h1, h2, flags, true),
            rapier2d::prelude::CollisionEvent::Stopped(h1, h2, flags) => (h1, h2, flags, false),
        };

        self.push(RawContact {
            collider1,
            collider2,
            started,
            sensor: flags.contains(CollisionEventFlags::SENSOR),
        });
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}
