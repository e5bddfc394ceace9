// Outward events for the session, audio and animation collaborators

use crate::engine::physics::EntityId;

/// One-shot feedback for audio/animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Jump,
    /// Killed by damage
    Death,
    /// Fell into a death zone
    FallDeath,
    Victory,
    Respawn,
    Coin,
    Attack,
    Stunned,
    Stand,
}

impl Cue {
    /// Name of the animation/sound trigger for this cue
    pub fn trigger_name(&self) -> &'static str {
        match self {
            Cue::Jump => "jump",
            Cue::Death => "death",
            Cue::FallDeath => "fall",
            Cue::Victory => "victory",
            Cue::Respawn => "respawn",
            Cue::Coin => "coin",
            Cue::Attack => "attack",
            Cue::Stunned => "stunned",
            Cue::Stand => "stand",
        }
    }
}

/// Something that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    ScoreGained(u32),
    /// The player's death delay ran out
    LifeLost,
    LevelCompleted,
    EnemyStunned(EntityId),
    Cue { source: EntityId, cue: Cue },
}

/// Events raised during one tick, in order
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Shorthand for a cue event
    pub fn cue(&mut self, source: EntityId, cue: Cue) {
        log::debug!("Entity {} cue: {}", source, cue.trigger_name());
        self.push(GameEvent::Cue { source, cue });
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }

    /// Whether a given cue from a given source was raised
    pub fn has_cue(&self, source: EntityId, cue: Cue) -> bool {
        self.events
            .iter()
            .any(|event| *event == GameEvent::Cue { source, cue })
    }

    /// Number of events equal to `event`
    pub fn count(&self, event: GameEvent) -> usize {
        self.events.iter().filter(|e| **e == event).count()
    }

    /// Take all events, leaving the queue empty
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
