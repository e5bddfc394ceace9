// Player actor: movement, jumping, health and the death/victory lock

use glam::Vec2;

use super::state::{PlayerState, StateMachine};
use super::stats::PlayerStats;
use crate::engine::game_loop::Tick;
use crate::engine::input::Intent;
use crate::engine::physics::shape::presets;
use crate::engine::physics::{BodyKind, BodyShape, CollisionLayer, EntityId, KinematicBody};
use crate::game::config::ConfigError;
use crate::game::events::{Cue, EventQueue, GameEvent};

/// The player-controlled character
#[derive(Debug)]
pub struct Player {
    /// Unique identifier
    id: EntityId,
    stats: PlayerStats,
    body: KinematicBody,
    state_machine: StateMachine<PlayerState>,

    /// Current health, 0..=max_health
    health: i32,
    /// Refilled by any grounded tick, spent by an airborne jump
    can_double_jump: bool,
    /// When the death delay runs out; cleared once `LifeLost` is raised
    death_deadline: Option<f32>,
    /// Moving platform the player is standing on
    riding: Option<EntityId>,
}

impl Player {
    pub fn new(id: EntityId, stats: PlayerStats, spawn: Vec2) -> Result<Self, ConfigError> {
        stats.validate()?;

        Ok(Self {
            id,
            health: stats.max_health,
            stats,
            body: KinematicBody::dynamic(spawn, CollisionLayer::Player),
            state_machine: StateMachine::new(PlayerState::Active),
            can_double_jump: true,
            death_deadline: None,
            riding: None,
        })
    }

    /// Colliders for the physics collaborator
    pub fn shape(&self) -> BodyShape {
        presets::player(self.stats.width, self.stats.height)
    }

    /// Consume this tick's intent
    pub fn tick(&mut self, intent: &Intent, tick: Tick, events: &mut EventQueue) {
        match self.state_machine.state() {
            PlayerState::Dying => {
                if let Some(deadline) = self.death_deadline {
                    if tick.now >= deadline {
                        self.death_deadline = None;
                        log::info!("Player {} lost a life", self.id);
                        events.push(GameEvent::LifeLost);
                    }
                }
                return;
            }
            PlayerState::Victorious => return,
            PlayerState::Active => {}
        }

        self.body.set_intent(intent.horizontal);

        if self.body.grounded {
            self.can_double_jump = true;
        }

        if intent.jump_pressed {
            if self.body.grounded {
                self.do_jump(events);
            } else if self.can_double_jump {
                self.can_double_jump = false;
                self.do_jump(events);
            }
        }

        // Letting go early cuts the jump short
        if intent.jump_released && self.body.velocity.y > 0.0 {
            self.body.velocity.y = 0.0;
        }

        self.body.velocity.x = self.body.intent() * self.stats.move_speed;
        self.body.update_facing();
    }

    fn do_jump(&mut self, events: &mut EventQueue) {
        self.body.velocity.y = 0.0;
        self.body.apply_vertical_impulse(self.stats.jump_velocity);
        events.cue(self.id, Cue::Jump);
    }

    /// Stop and take the body away from gravity until respawn
    fn freeze(&mut self) {
        self.body.halt();
        self.body.set_kind(BodyKind::Scripted);
        self.riding = None;
    }

    fn begin_dying(&mut self, now: f32) {
        self.freeze();
        self.state_machine.transition(PlayerState::Dying);
        self.death_deadline = Some(now + self.stats.death_delay);
    }

    /// Take damage; ignored while dying or celebrating
    pub fn apply_damage(&mut self, amount: i32, now: f32, events: &mut EventQueue) {
        if self.is_move_locked() || amount <= 0 {
            return;
        }

        self.health = (self.health - amount).max(0);
        log::debug!("Player {} took {} damage, health {}", self.id, amount, self.health);

        if self.health == 0 {
            events.cue(self.id, Cue::Death);
            self.begin_dying(now);
        }
    }

    /// Die from falling out of the level
    pub fn fall_death(&mut self, now: f32, events: &mut EventQueue) {
        if self.is_move_locked() {
            return;
        }

        self.health = 0;
        events.cue(self.id, Cue::FallDeath);
        self.begin_dying(now);
    }

    /// Reach the level exit
    pub fn victory(&mut self, events: &mut EventQueue) {
        if self.is_move_locked() {
            return;
        }

        self.freeze();
        self.state_machine.transition(PlayerState::Victorious);
        events.cue(self.id, Cue::Victory);
        events.push(GameEvent::LevelCompleted);
    }

    /// Start a fresh life at `position`, whatever the current state
    pub fn respawn(&mut self, position: Vec2, events: &mut EventQueue) {
        self.health = self.stats.max_health;
        self.death_deadline = None;
        self.riding = None;
        self.state_machine.force_transition(PlayerState::Active);
        self.body.teleport(position);
        self.body.set_kind(BodyKind::Dynamic);
        events.cue(self.id, Cue::Respawn);
    }

    /// Launch upward after landing on an enemy's head
    pub fn enemy_bounce(&mut self, events: &mut EventQueue) {
        if self.is_move_locked() {
            return;
        }
        self.do_jump(events);
    }

    /// Pick up a coin worth `value`
    pub fn collect_coin(&mut self, value: u32, events: &mut EventQueue) {
        if self.is_move_locked() {
            return;
        }
        events.cue(self.id, Cue::Coin);
        events.push(GameEvent::ScoreGained(value));
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn stats(&self) -> &PlayerStats {
        &self.stats
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn state(&self) -> PlayerState {
        self.state_machine.state()
    }

    pub fn is_move_locked(&self) -> bool {
        self.state_machine.state().is_move_locked()
    }

    pub fn can_double_jump(&self) -> bool {
        self.can_double_jump
    }

    pub fn body(&self) -> &KinematicBody {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut KinematicBody {
        &mut self.body
    }

    pub fn position(&self) -> Vec2 {
        self.body.position
    }

    pub fn riding(&self) -> Option<EntityId> {
        self.riding
    }

    pub fn set_riding(&mut self, platform: Option<EntityId>) {
        self.riding = platform;
    }
}
