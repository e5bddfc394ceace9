//! Level description files and construction-time errors.

use glam::Vec2;
use ron::extensions::Extensions;
use ron::Options;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::game::characters::stats::{EnemyStats, PlayerStats};
use crate::game::path::WaypointPath;
use crate::game::platform::PlatformStats;
use crate::game::session::START_LIVES;

/// Problems found while loading or building a level
///
/// These surface once, before the first tick; the running simulation never
/// returns errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse level file: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("Unknown waypoint path: {0}")]
    UnknownPath(String),

    #[error("Invalid {field}: {reason}")]
    InvalidStat { field: &'static str, reason: String },
}

/// A named waypoint path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathConfig {
    pub points: Vec<(f32, f32)>,
    #[serde(default = "default_looping")]
    pub looping: bool,
}

/// Axis-aligned box of level geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxConfig {
    /// Center
    pub position: (f32, f32),
    pub size: (f32, f32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyConfig {
    pub spawn: (f32, f32),
    /// Name of a path in `paths`; no path means the enemy stands still
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub stats: EnemyStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformConfig {
    pub position: (f32, f32),
    pub path: String,
    #[serde(default)]
    pub stats: PlatformStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeathZoneConfig {
    pub position: (f32, f32),
    pub size: (f32, f32),
    /// Remove enemies that fall in
    #[serde(default = "default_destroy_non_player")]
    pub destroy_non_player: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinConfig {
    pub position: (f32, f32),
    #[serde(default = "default_coin_value")]
    pub value: u32,
}

/// Everything needed to build a level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    #[serde(default)]
    pub name: String,
    /// Vertical gravity for the physics collaborator
    #[serde(default = "default_gravity")]
    pub gravity: f32,
    #[serde(default = "default_start_lives")]
    pub start_lives: i32,

    pub player_spawn: (f32, f32),
    #[serde(default)]
    pub player: PlayerStats,

    #[serde(default)]
    pub paths: BTreeMap<String, PathConfig>,
    #[serde(default)]
    pub ground: Vec<BoxConfig>,
    #[serde(default)]
    pub one_way_platforms: Vec<BoxConfig>,
    #[serde(default)]
    pub platforms: Vec<PlatformConfig>,
    #[serde(default)]
    pub enemies: Vec<EnemyConfig>,
    #[serde(default)]
    pub death_zones: Vec<DeathZoneConfig>,
    #[serde(default)]
    pub coins: Vec<CoinConfig>,
    #[serde(default)]
    pub victory: Option<(f32, f32)>,
}

fn default_looping() -> bool {
    true
}

fn default_destroy_non_player() -> bool {
    true
}

fn default_coin_value() -> u32 {
    1
}

fn default_gravity() -> f32 {
    -30.0
}

fn default_start_lives() -> i32 {
    START_LIVES
}

/// Create RON options with extensions enabled for more flexible parsing.
fn ron_options() -> Options {
    Options::default().with_default_extension(Extensions::IMPLICIT_SOME)
}

pub(crate) fn vec2((x, y): (f32, f32)) -> Vec2 {
    Vec2::new(x, y)
}

impl LevelConfig {
    /// Parse a level from RON text
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        let config: LevelConfig = ron_options().from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a level from a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config = Self::from_ron(&text)?;
        log::info!("Loaded level '{}' from {}", config.name, path.display());
        Ok(config)
    }

    /// Check stats and path references
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.start_lives < 1 {
            return Err(ConfigError::InvalidStat {
                field: "start_lives",
                reason: format!("must be at least 1, got {}", self.start_lives),
            });
        }

        self.player.validate()?;

        for enemy in &self.enemies {
            enemy.stats.validate()?;
            if let Some(name) = &enemy.path {
                self.require_path(name)?;
            }
        }

        for platform in &self.platforms {
            platform.stats.validate()?;
            self.require_path(&platform.path)?;
        }

        Ok(())
    }

    fn require_path(&self, name: &str) -> Result<(), ConfigError> {
        if self.paths.contains_key(name) {
            Ok(())
        } else {
            Err(ConfigError::UnknownPath(name.to_string()))
        }
    }

    /// Build every named path once so followers can share them
    pub fn build_paths(&self) -> BTreeMap<String, Arc<WaypointPath>> {
        self.paths
            .iter()
            .map(|(name, path)| {
                let points = path.points.iter().copied().map(vec2).collect();
                (name.clone(), Arc::new(WaypointPath::new(points, path.looping)))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"(
        player_spawn: (0.0, 2.0),
    )"#;

    const FULL: &str = r#"(
        name: "test",
        start_lives: 2,
        player_spawn: (0.0, 2.0),
        player: (move_speed: 5.0),
        paths: {
            "patrol": (points: [(2.0, 1.0), (6.0, 1.0)]),
            "lift": (points: [(10.0, 0.0), (10.0, 5.0)], looping: false),
        },
        ground: [(position: (0.0, 0.0), size: (40.0, 1.0))],
        enemies: [(spawn: (4.0, 1.0), path: "patrol")],
        platforms: [(position: (10.0, 0.0), path: "lift")],
        death_zones: [(position: (0.0, -10.0), size: (100.0, 1.0))],
        coins: [(position: (3.0, 3.0), value: 5)],
        victory: (20.0, 1.0),
    )"#;

    #[test]
    fn test_minimal_level_uses_defaults() {
        let config = LevelConfig::from_ron(MINIMAL).expect("minimal level");
        assert_eq!(config.start_lives, START_LIVES);
        assert_eq!(config.player, PlayerStats::default());
        assert!(config.enemies.is_empty());
        assert_eq!(config.victory, None);
    }

    #[test]
    fn test_full_level() {
        let config = LevelConfig::from_ron(FULL).expect("full level");
        assert_eq!(config.start_lives, 2);
        assert_eq!(config.player.move_speed, 5.0);
        // Fields not given keep their defaults
        assert_eq!(config.player.max_health, 1);
        assert_eq!(config.enemies[0].path.as_deref(), Some("patrol"));
        assert_eq!(config.coins[0].value, 5);
        assert!(config.death_zones[0].destroy_non_player);
        assert_eq!(config.victory, Some((20.0, 1.0)));

        let paths = config.build_paths();
        assert!(paths["patrol"].is_looping());
        assert!(!paths["lift"].is_looping());
        assert_eq!(paths["lift"].get(1), Some(Vec2::new(10.0, 5.0)));
    }

    #[test]
    fn test_unknown_path_rejected() {
        let text = r#"(
            player_spawn: (0.0, 0.0),
            enemies: [(spawn: (1.0, 1.0), path: "nowhere")],
        )"#;
        assert!(matches!(
            LevelConfig::from_ron(text),
            Err(ConfigError::UnknownPath(name)) if name == "nowhere"
        ));
    }

    #[test]
    fn test_bad_stats_rejected() {
        let text = r#"(
            player_spawn: (0.0, 0.0),
            start_lives: 0,
        )"#;
        assert!(matches!(
            LevelConfig::from_ron(text),
            Err(ConfigError::InvalidStat { field: "start_lives", .. })
        ));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            LevelConfig::from_ron("(player_spawn: oops)"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            LevelConfig::load("does/not/exist.ron"),
            Err(ConfigError::Io(_))
        ));
    }
}
