// Patrolling enemy: walks a waypoint path, hurts the player on contact,
// can be stunned by a stomp

use glam::Vec2;
use std::sync::Arc;

use super::player::Player;
use super::state::{EnemyState, StateMachine};
use super::stats::EnemyStats;
use crate::engine::game_loop::Tick;
use crate::engine::physics::shape::presets;
use crate::engine::physics::{BodyShape, CollisionLayer, EntityId, KinematicBody};
use crate::game::config::ConfigError;
use crate::game::events::{Cue, EventQueue, GameEvent};
use crate::game::path::{WaypointCursor, WaypointPath};

/// Horizontal distance at which a waypoint counts as reached
pub const ARRIVAL_EPSILON: f32 = 0.05;

#[derive(Debug)]
pub struct Enemy {
    id: EntityId,
    stats: EnemyStats,
    body: KinematicBody,
    state_machine: StateMachine<EnemyState>,
    path: Arc<WaypointPath>,
    cursor: WaypointCursor,

    /// No walking before this time (waypoint wait or attack pause)
    resume_at: f32,
    stun_deadline: Option<f32>,
    riding: Option<EntityId>,
}

impl Enemy {
    pub fn new(
        id: EntityId,
        stats: EnemyStats,
        spawn: Vec2,
        path: Arc<WaypointPath>,
    ) -> Result<Self, ConfigError> {
        stats.validate()?;

        if path.is_empty() {
            log::warn!("Enemy {} has no waypoints and will stand still", id);
        }

        Ok(Self {
            id,
            stats,
            body: KinematicBody::dynamic(spawn, CollisionLayer::Enemy),
            state_machine: StateMachine::new(EnemyState::Patrolling),
            path,
            cursor: WaypointCursor::new(),
            resume_at: 0.0,
            stun_deadline: None,
            riding: None,
        })
    }

    /// Colliders for the physics collaborator
    pub fn shape(&self) -> BodyShape {
        presets::enemy(self.stats.width, self.stats.height)
    }

    /// Advance timers and patrol
    pub fn tick(&mut self, tick: Tick, events: &mut EventQueue) {
        match self.state_machine.state() {
            EnemyState::Stunned => {
                match self.stun_deadline {
                    Some(deadline) if tick.now >= deadline => self.stand(events),
                    _ => self.body.velocity.x = 0.0,
                }
                return;
            }
            EnemyState::Attacking => {
                if tick.now < self.resume_at {
                    self.body.velocity.x = 0.0;
                    return;
                }
                self.state_machine.transition(EnemyState::Patrolling);
            }
            EnemyState::Patrolling => {}
        }

        if tick.now < self.resume_at {
            self.body.velocity.x = 0.0;
            return;
        }

        self.patrol(tick);
    }

    fn patrol(&mut self, tick: Tick) {
        let Some(target) = self.cursor.target(&self.path) else {
            self.body.velocity.x = 0.0;
            return;
        };

        let dx = target.x - self.body.position.x;
        if dx.abs() <= ARRIVAL_EPSILON {
            self.body.velocity.x = 0.0;
            self.cursor.advance(&self.path);
            self.resume_at = tick.now + self.stats.wait_at_waypoint;
            log::debug!(
                "Enemy {} reached waypoint, next index {} (halted: {})",
                self.id,
                self.cursor.index(),
                self.cursor.is_halted()
            );
            return;
        }

        // Never step past the waypoint in one tick
        let speed = if tick.dt > 0.0 {
            self.stats.move_speed.min(dx.abs() / tick.dt)
        } else {
            self.stats.move_speed
        };
        self.body.velocity.x = dx.signum() * speed;
        self.body.update_facing();
    }

    /// Hit the player on contact; returns whether an attack happened
    pub fn attack(&mut self, player: &mut Player, now: f32, events: &mut EventQueue) -> bool {
        if !self.state_machine.state().can_attack() || player.is_move_locked() {
            return false;
        }

        self.body
            .face_toward(player.position().x - self.body.position.x);
        self.body.halt();
        events.cue(self.id, Cue::Attack);
        player.apply_damage(self.stats.damage, now, events);

        self.resume_at = now + self.stats.stunned_time;
        self.state_machine.transition(EnemyState::Attacking);
        true
    }

    /// Knock the enemy out; repeated calls while stunned do nothing
    pub fn stunned(&mut self, now: f32, events: &mut EventQueue) {
        if self.state_machine.state() == EnemyState::Stunned {
            return;
        }

        self.body.halt();
        self.body.set_layer(CollisionLayer::StunnedEnemy);
        events.cue(self.id, Cue::Stunned);
        events.push(GameEvent::EnemyStunned(self.id));

        self.stun_deadline = Some(now + self.stats.stunned_time);
        self.state_machine.transition(EnemyState::Stunned);
    }

    fn stand(&mut self, events: &mut EventQueue) {
        self.stun_deadline = None;
        self.body.set_layer(CollisionLayer::Enemy);
        events.cue(self.id, Cue::Stand);
        self.state_machine.transition(EnemyState::Patrolling);
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn stats(&self) -> &EnemyStats {
        &self.stats
    }

    pub fn state(&self) -> EnemyState {
        self.state_machine.state()
    }

    pub fn is_stunned(&self) -> bool {
        self.state_machine.state() == EnemyState::Stunned
    }

    pub fn stun_deadline(&self) -> Option<f32> {
        self.stun_deadline
    }

    pub fn cursor(&self) -> &WaypointCursor {
        &self.cursor
    }

    pub fn path(&self) -> &Arc<WaypointPath> {
        &self.path
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::physics::Facing;
    use crate::game::characters::stats::PlayerStats;

    const DT: f32 = 1.0 / 60.0;

    fn enemy_on(points: Vec<Vec2>, looping: bool) -> Enemy {
        let path = Arc::new(WaypointPath::new(points, looping));
        Enemy::new(10, EnemyStats::default(), Vec2::ZERO, path).expect("valid stats")
    }

    fn player_at(x: f32) -> Player {
        Player::new(1, PlayerStats::default(), Vec2::new(x, 0.0)).expect("valid stats")
    }

    /// Run `ticks` ticks, integrating velocity by hand
    fn run(enemy: &mut Enemy, start: u64, ticks: u64, events: &mut EventQueue) -> u64 {
        for i in start..start + ticks {
            enemy.tick(Tick::new(i, DT), events);
            let velocity = enemy.body().velocity;
            enemy.body_mut().position += velocity * DT;
        }
        start + ticks
    }

    #[test]
    fn test_empty_path_stays_idle() {
        let mut enemy = enemy_on(Vec::new(), true);
        let mut events = EventQueue::new();
        run(&mut enemy, 1, 60, &mut events);
        assert_eq!(enemy.position(), Vec2::ZERO);
        assert_eq!(enemy.body().velocity.x, 0.0);
    }

    #[test]
    fn test_walks_toward_waypoint_and_faces_it() {
        let mut enemy = enemy_on(vec![Vec2::new(-3.0, 0.0)], true);
        let mut events = EventQueue::new();

        enemy.tick(Tick::new(1, DT), &mut events);
        assert_eq!(enemy.body().velocity.x, -enemy.stats().move_speed);
        assert_eq!(enemy.body().facing(), Facing::Left);
    }

    #[test]
    fn test_arrival_arms_wait() {
        let mut enemy = enemy_on(vec![Vec2::new(0.03, 0.0), Vec2::new(5.0, 0.0)], false);
        let mut events = EventQueue::new();

        enemy.tick(Tick::at(1.0, DT), &mut events);
        assert_eq!(enemy.cursor().index(), 1);
        assert_eq!(enemy.body().velocity.x, 0.0);

        // Waiting one second at the waypoint
        enemy.tick(Tick::at(1.5, DT), &mut events);
        assert_eq!(enemy.body().velocity.x, 0.0);

        enemy.tick(Tick::at(2.0, DT), &mut events);
        assert!(enemy.body().velocity.x > 0.0);
    }

    #[test]
    fn test_looping_patrol_wraps() {
        let mut enemy = enemy_on(vec![Vec2::new(1.0, 0.0), Vec2::new(-1.0, 0.0)], true);
        let mut events = EventQueue::new();

        // Each leg takes under a second of walking plus one second of waiting
        let mut next = 1;
        for _ in 0..5 {
            next = run(&mut enemy, next, 150, &mut events);
        }
        let arrivals = enemy.cursor().arrivals();
        assert!(arrivals >= 4);
        assert_eq!(enemy.cursor().index() as u64, arrivals % 2);
        assert!(!enemy.cursor().is_halted());
    }

    #[test]
    fn test_non_looping_patrol_stops_for_good() {
        let mut enemy = enemy_on(vec![Vec2::new(1.0, 0.0), Vec2::new(2.0, 0.0)], false);
        let mut events = EventQueue::new();

        let next = run(&mut enemy, 1, 600, &mut events);
        assert_eq!(enemy.cursor().arrivals(), 2);
        assert!(enemy.cursor().is_halted());
        assert_eq!(enemy.cursor().index(), 1);
        assert!((enemy.position().x - 2.0).abs() <= ARRIVAL_EPSILON);

        run(&mut enemy, next, 600, &mut events);
        assert_eq!(enemy.cursor().arrivals(), 2);
        assert_eq!(enemy.body().velocity.x, 0.0);
    }

    #[test]
    fn test_stun_idempotent() {
        let mut enemy = enemy_on(vec![Vec2::new(5.0, 0.0)], true);
        let mut events = EventQueue::new();

        enemy.stunned(1.0, &mut events);
        let deadline = enemy.stun_deadline();
        let layer = enemy.body().layer();

        enemy.stunned(2.0, &mut events);
        assert_eq!(enemy.stun_deadline(), deadline);
        assert_eq!(enemy.body().layer(), layer);
        assert_eq!(events.count(GameEvent::EnemyStunned(10)), 1);
        assert_eq!(events.count(GameEvent::Cue { source: 10, cue: Cue::Stunned }), 1);
    }

    #[test]
    fn test_stun_lasts_stunned_time() {
        let mut enemy = enemy_on(vec![Vec2::new(5.0, 0.0)], true);
        let mut events = EventQueue::new();

        enemy.stunned(1.0, &mut events);
        assert_eq!(enemy.body().layer(), CollisionLayer::StunnedEnemy);
        assert_eq!(enemy.body().velocity, Vec2::ZERO);

        enemy.tick(Tick::at(3.9, DT), &mut events);
        assert!(enemy.is_stunned());
        assert_eq!(enemy.body().velocity.x, 0.0);

        enemy.tick(Tick::at(4.0, DT), &mut events);
        assert!(!enemy.is_stunned());
        assert_eq!(enemy.state(), EnemyState::Patrolling);
        assert_eq!(enemy.body().layer(), CollisionLayer::Enemy);
        assert!(events.has_cue(10, Cue::Stand));
    }

    #[test]
    fn test_attack_damages_and_pauses() {
        let mut enemy = enemy_on(vec![Vec2::new(5.0, 0.0)], true);
        let mut player = player_at(-1.0);
        let mut events = EventQueue::new();

        assert!(enemy.attack(&mut player, 2.0, &mut events));
        assert_eq!(enemy.state(), EnemyState::Attacking);
        assert_eq!(enemy.body().facing(), Facing::Left);
        assert_eq!(player.health(), 0);
        assert!(player.is_move_locked());
        assert!(events.has_cue(10, Cue::Attack));

        enemy.tick(Tick::at(4.9, DT), &mut events);
        assert_eq!(enemy.body().velocity.x, 0.0);
        assert_eq!(enemy.state(), EnemyState::Attacking);

        enemy.tick(Tick::at(5.0, DT), &mut events);
        assert_eq!(enemy.state(), EnemyState::Patrolling);
        assert!(enemy.body().velocity.x > 0.0);
    }

    #[test]
    fn test_no_attack_when_stunned_or_player_locked() {
        let mut enemy = enemy_on(vec![Vec2::new(5.0, 0.0)], true);
        let mut events = EventQueue::new();

        let mut player = player_at(1.0);
        enemy.stunned(0.0, &mut events);
        assert!(!enemy.attack(&mut player, 0.5, &mut events));
        assert_eq!(player.health(), 1);

        let mut other = enemy_on(vec![Vec2::new(5.0, 0.0)], true);
        player.victory(&mut events);
        assert!(!other.attack(&mut player, 0.5, &mut events));
        assert_eq!(other.state(), EnemyState::Patrolling);
    }

    #[test]
    fn test_stun_interrupts_attack() {
        let mut enemy = enemy_on(vec![Vec2::new(5.0, 0.0)], true);
        let mut player = player_at(1.0);
        let mut events = EventQueue::new();

        enemy.attack(&mut player, 0.0, &mut events);
        enemy.stunned(0.5, &mut events);
        assert_eq!(enemy.state(), EnemyState::Stunned);
        assert!(!enemy.state().can_attack());
    }
}
