// Actors
//
// This module contains the two actor kinds that live in a level:
// - Player and Enemy state machines
// - Their tuning stats
// - The shared state tracker

pub mod enemy;
pub mod player;
pub mod state;
pub mod stats;

// Re-export commonly used types
pub use enemy::Enemy;
pub use player::Player;
pub use state::{EnemyState, PlayerState, StateMachine};
pub use stats::{EnemyStats, PlayerStats};
