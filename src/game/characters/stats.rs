// Actor tuning values
//
// Every actor of a kind shares one set of stats; a level file may override
// any field, missing fields fall back to the constants below.

use serde::{Deserialize, Serialize};

use crate::game::config::ConfigError;

/// Player tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerStats {
    /// Horizontal speed at full axis (units/second)
    pub move_speed: f32,
    /// Upward velocity set by a jump
    pub jump_velocity: f32,
    /// Hits the player can take per life
    pub max_health: i32,
    /// Seconds between death and the life being consumed
    pub death_delay: f32,

    // Dimensions (for physics collider)
    pub width: f32,
    pub height: f32,
}

/// Default player tuning
pub const PLAYER_STATS: PlayerStats = PlayerStats {
    move_speed: 3.0,
    jump_velocity: 12.0,
    max_health: 1,
    death_delay: 2.0,
    width: 1.0,
    height: 2.0,
};

impl Default for PlayerStats {
    fn default() -> Self {
        PLAYER_STATS
    }
}

impl PlayerStats {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("player.move_speed", self.move_speed)?;
        positive("player.jump_velocity", self.jump_velocity)?;
        non_negative("player.death_delay", self.death_delay)?;
        positive("player.width", self.width)?;
        positive("player.height", self.height)?;
        if self.max_health < 1 {
            return Err(ConfigError::InvalidStat {
                field: "player.max_health",
                reason: format!("must be at least 1, got {}", self.max_health),
            });
        }
        Ok(())
    }
}

/// Enemy tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyStats {
    /// Patrol speed (units/second)
    pub move_speed: f32,
    /// Damage dealt to the player per attack
    pub damage: i32,
    /// Seconds spent stunned, and paused after an attack
    pub stunned_time: f32,
    /// Seconds to wait at each waypoint
    pub wait_at_waypoint: f32,

    pub width: f32,
    pub height: f32,
}

/// Default enemy tuning
pub const ENEMY_STATS: EnemyStats = EnemyStats {
    move_speed: 4.0,
    // Enough to kill the player outright
    damage: 10,
    stunned_time: 3.0,
    wait_at_waypoint: 1.0,
    width: 1.0,
    height: 1.0,
};

impl Default for EnemyStats {
    fn default() -> Self {
        ENEMY_STATS
    }
}

impl EnemyStats {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("enemy.move_speed", self.move_speed)?;
        non_negative("enemy.stunned_time", self.stunned_time)?;
        non_negative("enemy.wait_at_waypoint", self.wait_at_waypoint)?;
        positive("enemy.width", self.width)?;
        positive("enemy.height", self.height)?;
        if self.damage < 0 {
            return Err(ConfigError::InvalidStat {
                field: "enemy.damage",
                reason: format!("must not be negative, got {}", self.damage),
            });
        }
        Ok(())
    }
}

pub(crate) fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidStat {
            field,
            reason: format!("must be positive, got {}", value),
        })
    }
}

pub(crate) fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidStat {
            field,
            reason: format!("must not be negative, got {}", value),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_stats() {
        let player = PlayerStats::default();
        assert_eq!(player.max_health, 1);
        assert_eq!(player.death_delay, 2.0);

        let enemy = EnemyStats::default();
        assert_eq!(enemy.stunned_time, 3.0);
        assert_eq!(enemy.wait_at_waypoint, 1.0);
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(PlayerStats::default().validate().is_ok());
        assert!(EnemyStats::default().validate().is_ok());
    }

    #[test]
    fn test_zero_health_rejected() {
        let stats = PlayerStats {
            max_health: 0,
            ..PlayerStats::default()
        };
        assert!(matches!(
            stats.validate(),
            Err(ConfigError::InvalidStat {
                field: "player.max_health",
                ..
            })
        ));
    }

    #[test]
    fn test_negative_stun_rejected() {
        let stats = EnemyStats {
            stunned_time: -1.0,
            ..EnemyStats::default()
        };
        assert!(stats.validate().is_err());
    }

    #[test]
    fn test_nan_speed_rejected() {
        let stats = PlayerStats {
            move_speed: f32::NAN,
            ..PlayerStats::default()
        };
        assert!(stats.validate().is_err());
    }
}
