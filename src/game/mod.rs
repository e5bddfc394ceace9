// Game rules: actors, platforms, pickups and the session that scores them

pub mod characters;
pub mod config;
pub mod events;
pub mod level;
pub mod path;
pub mod platform;
pub mod session;
