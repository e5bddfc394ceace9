// Level: owns the physics collaborator, actors, platforms, pickups and the
// session, and runs one tick end to end

use glam::Vec2;
use std::sync::Arc;

use crate::engine::game_loop::Tick;
use crate::engine::input::Intent;
use crate::engine::physics::{
    BodyKind, BodyShape, CollisionLayer, CollisionTag, ContactEvent, ContactKind, EntityId,
    KinematicBody, PhysicsBackend,
};
use crate::game::characters::{Enemy, EnemyStats, Player, PlayerStats};
use crate::game::config::{vec2, ConfigError, LevelConfig};
use crate::game::events::{EventQueue, GameEvent};
use crate::game::path::WaypointPath;
use crate::game::platform::{MovingPlatform, PlatformStats};
use crate::game::session::GameSession;

/// Coin trigger size
const COIN_SIZE: Vec2 = Vec2::new(0.5, 0.5);

/// Victory flag trigger size
const VICTORY_SIZE: Vec2 = Vec2::new(1.0, 2.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupKind {
    Coin { value: u32 },
    Victory,
}

/// A coin or the victory flag; taken at most once
#[derive(Debug, Clone)]
pub struct Pickup {
    pub id: EntityId,
    pub kind: PickupKind,
    pub position: Vec2,
    pub taken: bool,
}

#[derive(Debug, Clone)]
pub struct DeathZone {
    pub id: EntityId,
    /// Remove enemies that touch the zone
    pub destroy_non_player: bool,
}

/// Everything in one running level
#[derive(Debug)]
pub struct Level<P: PhysicsBackend> {
    physics: P,
    player: Player,
    enemies: Vec<Enemy>,
    platforms: Vec<MovingPlatform>,
    pickups: Vec<Pickup>,
    death_zones: Vec<DeathZone>,
    /// Static ground and one-way ledges
    geometry: Vec<EntityId>,
    session: GameSession,
    next_id: EntityId,
}

impl<P: PhysicsBackend> Level<P> {
    /// Create an empty level holding only the player
    pub fn new(
        mut physics: P,
        player_stats: PlayerStats,
        spawn: Vec2,
        start_lives: i32,
    ) -> Result<Self, ConfigError> {
        if start_lives < 1 {
            return Err(ConfigError::InvalidStat {
                field: "start_lives",
                reason: format!("must be at least 1, got {}", start_lives),
            });
        }

        let player = Player::new(1, player_stats, spawn)?;
        physics.insert(player.id(), player.body(), &player.shape());

        Ok(Self {
            physics,
            player,
            enemies: Vec::new(),
            platforms: Vec::new(),
            pickups: Vec::new(),
            death_zones: Vec::new(),
            geometry: Vec::new(),
            session: GameSession::new(start_lives, spawn),
            next_id: 2,
        })
    }

    /// Build a level from its description
    pub fn from_config(config: &LevelConfig, physics: P) -> Result<Self, ConfigError> {
        config.validate()?;

        let paths = config.build_paths();
        let lookup = |name: &str| {
            paths
                .get(name)
                .cloned()
                .ok_or_else(|| ConfigError::UnknownPath(name.to_string()))
        };

        let mut level = Self::new(
            physics,
            config.player.clone(),
            vec2(config.player_spawn),
            config.start_lives,
        )?;

        for ground in &config.ground {
            level.add_ground(vec2(ground.position), vec2(ground.size));
        }

        for ledge in &config.one_way_platforms {
            level.add_one_way_platform(vec2(ledge.position), vec2(ledge.size));
        }

        for platform in &config.platforms {
            let path = lookup(&platform.path)?;
            level.add_platform(platform.stats.clone(), vec2(platform.position), path)?;
        }

        for enemy in &config.enemies {
            let path = match &enemy.path {
                Some(name) => lookup(name)?,
                None => Arc::new(WaypointPath::empty()),
            };
            level.add_enemy(enemy.stats.clone(), vec2(enemy.spawn), path)?;
        }

        for zone in &config.death_zones {
            level.add_death_zone(vec2(zone.position), vec2(zone.size), zone.destroy_non_player);
        }

        for coin in &config.coins {
            level.add_coin(vec2(coin.position), coin.value);
        }

        if let Some(position) = config.victory {
            level.add_victory(vec2(position));
        }

        log::info!(
            "Level '{}' built: {} enemies, {} platforms, {} pickups",
            config.name,
            level.enemies.len(),
            level.platforms.len(),
            level.pickups.len()
        );

        Ok(level)
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn add_fixed(&mut self, position: Vec2, layer: CollisionLayer, shape: &BodyShape) -> EntityId {
        let id = self.allocate_id();
        let body = KinematicBody::new(position, BodyKind::Fixed, layer);
        self.physics.insert(id, &body, shape);
        id
    }

    /// Solid static box
    pub fn add_ground(&mut self, position: Vec2, size: Vec2) -> EntityId {
        let shape = BodyShape::solid_box(size, CollisionTag::Ground);
        let id = self.add_fixed(position, CollisionLayer::Ground, &shape);
        self.geometry.push(id);
        id
    }

    /// Ledge that bodies can jump up through
    pub fn add_one_way_platform(&mut self, position: Vec2, size: Vec2) -> EntityId {
        let shape = BodyShape::solid_box(size, CollisionTag::OneWayPlatform);
        let id = self.add_fixed(position, CollisionLayer::OneWayPlatform, &shape);
        self.geometry.push(id);
        id
    }

    pub fn add_death_zone(&mut self, position: Vec2, size: Vec2, destroy_non_player: bool) -> EntityId {
        let shape = BodyShape::sensor_box(size, CollisionTag::DeathZone);
        let id = self.add_fixed(position, CollisionLayer::Hazard, &shape);
        self.death_zones.push(DeathZone {
            id,
            destroy_non_player,
        });
        id
    }

    pub fn add_coin(&mut self, position: Vec2, value: u32) -> EntityId {
        let shape = BodyShape::sensor_box(COIN_SIZE, CollisionTag::Coin);
        let id = self.add_fixed(position, CollisionLayer::Pickup, &shape);
        self.pickups.push(Pickup {
            id,
            kind: PickupKind::Coin { value },
            position,
            taken: false,
        });
        id
    }

    pub fn add_victory(&mut self, position: Vec2) -> EntityId {
        let shape = BodyShape::sensor_box(VICTORY_SIZE, CollisionTag::Victory);
        let id = self.add_fixed(position, CollisionLayer::Pickup, &shape);
        self.pickups.push(Pickup {
            id,
            kind: PickupKind::Victory,
            position,
            taken: false,
        });
        id
    }

    pub fn add_enemy(
        &mut self,
        stats: EnemyStats,
        spawn: Vec2,
        path: Arc<WaypointPath>,
    ) -> Result<EntityId, ConfigError> {
        let id = self.allocate_id();
        let enemy = Enemy::new(id, stats, spawn, path)?;
        self.physics.insert(id, enemy.body(), &enemy.shape());
        self.enemies.push(enemy);
        Ok(id)
    }

    pub fn add_platform(
        &mut self,
        stats: PlatformStats,
        position: Vec2,
        path: Arc<WaypointPath>,
    ) -> Result<EntityId, ConfigError> {
        let id = self.allocate_id();
        let platform = MovingPlatform::new(id, stats, position, path)?;
        self.physics.insert(id, platform.body(), &platform.shape());
        self.platforms.push(platform);
        Ok(id)
    }

    /// Run one fixed tick and return everything that happened, in order
    pub fn tick(&mut self, tick: Tick, intent: &Intent) -> Vec<GameEvent> {
        let mut events = EventQueue::new();

        // Platforms first so riders start the tick where the platform left them
        for platform in &mut self.platforms {
            let delta = platform.tick(tick);
            if delta == Vec2::ZERO {
                continue;
            }

            let id = platform.id();
            if self.player.riding() == Some(id) {
                self.player.body_mut().position += delta;
            }
            for enemy in &mut self.enemies {
                if enemy.riding() == Some(id) {
                    enemy.body_mut().position += delta;
                }
            }
        }

        self.player.tick(intent, tick, &mut events);
        for enemy in &mut self.enemies {
            enemy.tick(tick, &mut events);
        }

        self.physics.write_body(self.player.id(), self.player.body());
        for enemy in &self.enemies {
            self.physics.write_body(enemy.id(), enemy.body());
        }
        for platform in &self.platforms {
            self.physics.write_body(platform.id(), platform.body());
        }

        self.physics.step(tick.dt);

        let player_id = self.player.id();
        let player_contacts = self.physics.read_body(player_id, self.player.body_mut()).events;

        let mut enemy_contacts = Vec::with_capacity(self.enemies.len());
        for enemy in &mut self.enemies {
            let report = self.physics.read_body(enemy.id(), enemy.body_mut());
            enemy_contacts.push((enemy.id(), report.events));
        }

        for platform in &mut self.platforms {
            self.physics.read_body(platform.id(), platform.body_mut());
        }

        for contact in player_contacts {
            self.route_player_contact(contact, tick.now, &mut events);
        }

        for (enemy_id, contacts) in enemy_contacts {
            for contact in contacts {
                self.route_enemy_contact(enemy_id, contact);
            }
        }

        self.settle(tick.now, events)
    }

    fn route_player_contact(&mut self, contact: ContactEvent, now: f32, events: &mut EventQueue) {
        match (contact.tag, contact.kind) {
            (CollisionTag::Enemy, ContactKind::TriggerEnter) => {
                if let Some(enemy) = self.enemies.iter_mut().find(|e| e.id() == contact.other) {
                    enemy.attack(&mut self.player, now, events);
                }
            }
            (CollisionTag::EnemyStunPoint, ContactKind::CollisionEnter) => {
                if self.player.is_move_locked() {
                    return;
                }
                if let Some(enemy) = self.enemies.iter_mut().find(|e| e.id() == contact.other) {
                    if !enemy.is_stunned() {
                        enemy.stunned(now, events);
                        self.player.enemy_bounce(events);
                    }
                }
            }
            (CollisionTag::DeathZone, ContactKind::TriggerEnter) => {
                self.player.fall_death(now, events);
            }
            (CollisionTag::Coin | CollisionTag::Victory, ContactKind::TriggerEnter) => {
                self.take_pickup(contact.other, events);
            }
            (CollisionTag::MovingPlatform, ContactKind::CollisionEnter) => {
                self.player.set_riding(Some(contact.other));
            }
            (CollisionTag::MovingPlatform, ContactKind::CollisionExit) => {
                if self.player.riding() == Some(contact.other) {
                    self.player.set_riding(None);
                }
            }
            _ => {}
        }
    }

    fn route_enemy_contact(&mut self, enemy_id: EntityId, contact: ContactEvent) {
        match (contact.tag, contact.kind) {
            (CollisionTag::DeathZone, ContactKind::TriggerEnter) => {
                let destroys = self
                    .death_zones
                    .iter()
                    .any(|zone| zone.id == contact.other && zone.destroy_non_player);
                if destroys {
                    self.despawn_enemy(enemy_id);
                }
            }
            (CollisionTag::MovingPlatform, ContactKind::CollisionEnter) => {
                if let Some(enemy) = self.enemy_mut(enemy_id) {
                    enemy.set_riding(Some(contact.other));
                }
            }
            (CollisionTag::MovingPlatform, ContactKind::CollisionExit) => {
                if let Some(enemy) = self.enemy_mut(enemy_id) {
                    if enemy.riding() == Some(contact.other) {
                        enemy.set_riding(None);
                    }
                }
            }
            _ => {}
        }
    }

    fn take_pickup(&mut self, id: EntityId, events: &mut EventQueue) {
        if self.player.is_move_locked() {
            return;
        }

        let Some(pickup) = self.pickups.iter_mut().find(|p| p.id == id && !p.taken) else {
            return;
        };

        pickup.taken = true;
        self.physics.remove(id);
        log::debug!("Pickup {} taken: {:?}", id, pickup.kind);

        match pickup.kind {
            PickupKind::Coin { value } => self.player.collect_coin(value, events),
            PickupKind::Victory => self.player.victory(events),
        }
    }

    fn despawn_enemy(&mut self, id: EntityId) {
        let Some(index) = self.enemies.iter().position(|e| e.id() == id) else {
            return;
        };
        self.enemies.remove(index);
        self.physics.remove(id);
        log::debug!("Enemy {} fell out of the level", id);
    }

    /// Hand the tick's events to the session until nothing new is raised
    fn settle(&mut self, now: f32, mut events: EventQueue) -> Vec<GameEvent> {
        let mut output = Vec::with_capacity(events.len());
        let mut batch = events.drain();

        while !batch.is_empty() {
            let mut follow_up = EventQueue::new();
            for event in batch {
                self.session
                    .handle(event, &mut self.player, now, &mut follow_up);
                output.push(event);
            }
            batch = follow_up.drain();
        }

        output
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id() == id)
    }

    pub fn enemy_mut(&mut self, id: EntityId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|e| e.id() == id)
    }

    pub fn platforms(&self) -> &[MovingPlatform] {
        &self.platforms
    }

    pub fn platform(&self, id: EntityId) -> Option<&MovingPlatform> {
        self.platforms.iter().find(|p| p.id() == id)
    }

    pub fn pickups(&self) -> &[Pickup] {
        &self.pickups
    }

    pub fn pickup(&self, id: EntityId) -> Option<&Pickup> {
        self.pickups.iter().find(|p| p.id == id)
    }

    pub fn death_zones(&self) -> &[DeathZone] {
        &self.death_zones
    }

    pub fn geometry(&self) -> &[EntityId] {
        &self.geometry
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    pub fn physics(&self) -> &P {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut P {
        &mut self.physics
    }
}
