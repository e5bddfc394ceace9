// Score, lives and level outcome

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::game::characters::Player;
use crate::game::events::{EventQueue, GameEvent};

/// Seconds of fanfare between reaching the exit and unloading the level
pub const LEVEL_EXIT_DELAY: f32 = 3.5;

/// Default number of lives per game
pub const START_LIVES: i32 = 3;

/// Where the current game stands
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionStatus {
    Playing,
    /// The exit was reached; the host should load the next level at `unload_at`
    LevelComplete { unload_at: f32 },
    /// No lives left
    GameOver,
}

/// Values worth persisting between levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub score: u32,
    pub highscore: u32,
    pub lives: i32,
}

/// Consumes actor events and decides what happens to the game
#[derive(Debug)]
pub struct GameSession {
    start_lives: i32,
    lives: i32,
    score: u32,
    highscore: u32,
    spawn_point: Vec2,
    status: SessionStatus,
}

impl GameSession {
    pub fn new(start_lives: i32, spawn_point: Vec2) -> Self {
        Self {
            start_lives,
            lives: start_lives,
            score: 0,
            highscore: 0,
            spawn_point,
            status: SessionStatus::Playing,
        }
    }

    /// Continue a game from persisted values
    ///
    /// A snapshot with no lives left starts over with `start_lives`.
    pub fn resume(start_lives: i32, spawn_point: Vec2, snapshot: SessionSnapshot) -> Self {
        let mut session = Self::new(start_lives, spawn_point);
        session.score = snapshot.score;
        session.highscore = snapshot.highscore.max(snapshot.score);
        if snapshot.lives > 0 {
            session.lives = snapshot.lives;
        }
        session
    }

    /// React to one event; may respawn the player and raise more events
    pub fn handle(
        &mut self,
        event: GameEvent,
        player: &mut Player,
        now: f32,
        events: &mut EventQueue,
    ) {
        match event {
            GameEvent::ScoreGained(amount) => self.add_points(amount),
            GameEvent::LifeLost => self.lose_life(player, events),
            GameEvent::LevelCompleted => self.complete_level(now),
            GameEvent::EnemyStunned(_) | GameEvent::Cue { .. } => {}
        }
    }

    /// Increase score, dragging the highscore along
    pub fn add_points(&mut self, amount: u32) {
        self.score = self.score.saturating_add(amount);
        if self.score > self.highscore {
            self.highscore = self.score;
        }
    }

    fn lose_life(&mut self, player: &mut Player, events: &mut EventQueue) {
        if self.status == SessionStatus::GameOver {
            return;
        }

        self.lives -= 1;
        if self.lives <= 0 {
            log::info!("Game over with score {}", self.score);
            self.status = SessionStatus::GameOver;
        } else {
            log::info!("{} lives left, respawning", self.lives);
            player.respawn(self.spawn_point, events);
        }
    }

    fn complete_level(&mut self, now: f32) {
        if self.status != SessionStatus::Playing {
            return;
        }
        log::info!("Level complete with score {}", self.score);
        self.status = SessionStatus::LevelComplete {
            unload_at: now + LEVEL_EXIT_DELAY,
        };
    }

    /// Whether the host should unload the level now
    pub fn ready_to_unload(&self, now: f32) -> bool {
        match self.status {
            SessionStatus::LevelComplete { unload_at } => now >= unload_at,
            SessionStatus::GameOver => true,
            SessionStatus::Playing => false,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            score: self.score,
            highscore: self.highscore,
            lives: self.lives,
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn lives(&self) -> i32 {
        self.lives
    }

    pub fn start_lives(&self) -> i32 {
        self.start_lives
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn highscore(&self) -> u32 {
        self.highscore
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::characters::stats::PlayerStats;
    use crate::game::characters::PlayerState;
    use crate::game::events::Cue;

    fn player() -> Player {
        Player::new(1, PlayerStats::default(), Vec2::new(9.0, 9.0)).expect("valid stats")
    }

    #[test]
    fn test_score_and_highscore() {
        let mut session = GameSession::new(3, Vec2::ZERO);
        let mut player = player();
        let mut events = EventQueue::new();

        session.handle(GameEvent::ScoreGained(5), &mut player, 0.0, &mut events);
        session.handle(GameEvent::ScoreGained(2), &mut player, 0.0, &mut events);
        assert_eq!(session.score(), 7);
        assert_eq!(session.highscore(), 7);
    }

    #[test]
    fn test_resume_keeps_highscore() {
        let snapshot = SessionSnapshot {
            score: 3,
            highscore: 10,
            lives: 2,
        };
        let mut session = GameSession::resume(3, Vec2::ZERO, snapshot);
        session.add_points(4);
        assert_eq!(session.score(), 7);
        assert_eq!(session.highscore(), 10);
        assert_eq!(session.lives(), 2);
    }

    #[test]
    fn test_resume_with_no_lives_starts_over() {
        let snapshot = SessionSnapshot {
            score: 0,
            highscore: 0,
            lives: 0,
        };
        let session = GameSession::resume(3, Vec2::ZERO, snapshot);
        assert_eq!(session.lives(), 3);
    }

    #[test]
    fn test_life_lost_respawns_until_game_over() {
        let spawn = Vec2::new(1.0, 2.0);
        let mut session = GameSession::new(2, spawn);
        let mut player = player();
        let mut events = EventQueue::new();

        player.fall_death(0.0, &mut events);
        session.handle(GameEvent::LifeLost, &mut player, 2.0, &mut events);
        assert_eq!(session.lives(), 1);
        assert_eq!(player.state(), PlayerState::Active);
        assert_eq!(player.position(), spawn);
        assert!(events.has_cue(1, Cue::Respawn));

        player.fall_death(3.0, &mut events);
        session.handle(GameEvent::LifeLost, &mut player, 5.0, &mut events);
        assert_eq!(session.lives(), 0);
        assert_eq!(session.status(), SessionStatus::GameOver);
        assert_eq!(player.state(), PlayerState::Dying);
        assert!(session.ready_to_unload(5.0));
    }

    #[test]
    fn test_level_complete_waits_before_unload() {
        let mut session = GameSession::new(3, Vec2::ZERO);
        let mut player = player();
        let mut events = EventQueue::new();

        session.handle(GameEvent::LevelCompleted, &mut player, 10.0, &mut events);
        assert_eq!(
            session.status(),
            SessionStatus::LevelComplete { unload_at: 13.5 }
        );
        assert!(!session.ready_to_unload(13.0));
        assert!(session.ready_to_unload(13.5));
    }

    #[test]
    fn test_snapshot_round_trips_through_ron() {
        let mut session = GameSession::new(3, Vec2::ZERO);
        session.add_points(12);
        let text = ron::to_string(&session.snapshot()).expect("serialize");
        let back: SessionSnapshot = ron::from_str(&text).expect("deserialize");
        assert_eq!(back, session.snapshot());
    }
}
