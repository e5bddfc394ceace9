// Moving platform driver

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::core::math::move_towards;
use crate::engine::game_loop::Tick;
use crate::engine::physics::{BodyKind, BodyShape, CollisionLayer, CollisionTag, EntityId, KinematicBody};
use crate::game::characters::stats::{non_negative, positive};
use crate::game::config::ConfigError;
use crate::game::path::{WaypointCursor, WaypointPath};

/// Platform tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformStats {
    /// Travel speed (units/second)
    pub move_speed: f32,
    /// Seconds to wait at each waypoint
    pub wait_at_waypoint: f32,
    /// Distance at which a waypoint counts as reached
    pub arrival_epsilon: f32,

    pub width: f32,
    pub height: f32,
}

/// Default platform tuning
pub const PLATFORM_STATS: PlatformStats = PlatformStats {
    move_speed: 5.0,
    wait_at_waypoint: 1.0,
    arrival_epsilon: 1e-4,
    width: 3.0,
    height: 0.5,
};

impl Default for PlatformStats {
    fn default() -> Self {
        PLATFORM_STATS
    }
}

impl PlatformStats {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("platform.move_speed", self.move_speed)?;
        non_negative("platform.wait_at_waypoint", self.wait_at_waypoint)?;
        non_negative("platform.arrival_epsilon", self.arrival_epsilon)?;
        positive("platform.width", self.width)?;
        positive("platform.height", self.height)?;
        Ok(())
    }
}

/// A solid platform that travels a waypoint path at constant speed
#[derive(Debug)]
pub struct MovingPlatform {
    id: EntityId,
    stats: PlatformStats,
    body: KinematicBody,
    path: Arc<WaypointPath>,
    cursor: WaypointCursor,
    resume_at: f32,
}

impl MovingPlatform {
    pub fn new(
        id: EntityId,
        stats: PlatformStats,
        position: Vec2,
        path: Arc<WaypointPath>,
    ) -> Result<Self, ConfigError> {
        stats.validate()?;

        if path.is_empty() {
            log::warn!("Platform {} has no waypoints and will not move", id);
        }

        Ok(Self {
            id,
            stats,
            body: KinematicBody::new(position, BodyKind::Scripted, CollisionLayer::Ground),
            path,
            cursor: WaypointCursor::new(),
            resume_at: 0.0,
        })
    }

    /// Colliders for the physics collaborator
    pub fn shape(&self) -> BodyShape {
        BodyShape::solid_box(
            Vec2::new(self.stats.width, self.stats.height),
            CollisionTag::MovingPlatform,
        )
    }

    /// Move along the path; returns how far the platform moved this tick
    pub fn tick(&mut self, tick: Tick) -> Vec2 {
        if tick.now < self.resume_at {
            self.body.velocity = Vec2::ZERO;
            return Vec2::ZERO;
        }

        let Some(target) = self.cursor.target(&self.path) else {
            self.body.velocity = Vec2::ZERO;
            return Vec2::ZERO;
        };

        let start = self.body.position;
        let mut next = move_towards(start, target, self.stats.move_speed * tick.dt);

        if next.distance(target) <= self.stats.arrival_epsilon {
            next = target;
            self.cursor.advance(&self.path);
            self.resume_at = tick.now + self.stats.wait_at_waypoint;
            log::debug!(
                "Platform {} reached waypoint, next index {} (halted: {})",
                self.id,
                self.cursor.index(),
                self.cursor.is_halted()
            );
        }

        let delta = next - start;
        self.body.position = next;
        self.body.velocity = if tick.dt > 0.0 {
            delta / tick.dt
        } else {
            Vec2::ZERO
        };
        delta
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn stats(&self) -> &PlatformStats {
        &self.stats
    }

    pub fn cursor(&self) -> &WaypointCursor {
        &self.cursor
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const DT: f32 = 1.0 / 60.0;

    fn platform(points: Vec<Vec2>, looping: bool) -> MovingPlatform {
        MovingPlatform::new(
            20,
            PlatformStats::default(),
            Vec2::ZERO,
            Arc::new(WaypointPath::new(points, looping)),
        )
        .expect("valid stats")
    }

    fn run(platform: &mut MovingPlatform, start: u64, ticks: u64) -> u64 {
        for i in start..start + ticks {
            platform.tick(Tick::new(i, DT));
        }
        start + ticks
    }

    #[test]
    fn test_moves_at_constant_speed() {
        let mut platform = platform(vec![Vec2::new(10.0, 0.0)], true);
        let delta = platform.tick(Tick::new(1, DT));
        assert_relative_eq!(delta.x, platform.stats().move_speed * DT);
        assert_relative_eq!(platform.body().velocity.x, platform.stats().move_speed);
    }

    #[test]
    fn test_empty_path_never_moves() {
        let mut platform = platform(Vec::new(), false);
        assert_eq!(platform.tick(Tick::new(1, DT)), Vec2::ZERO);
        assert_eq!(platform.position(), Vec2::ZERO);
    }

    #[test]
    fn test_lands_exactly_and_waits() {
        let mut platform = platform(vec![Vec2::new(0.05, 0.0), Vec2::new(0.0, 0.0)], true);

        platform.tick(Tick::at(1.0, DT));
        assert_eq!(platform.position(), Vec2::new(0.05, 0.0));
        assert_eq!(platform.cursor().index(), 1);

        assert_eq!(platform.tick(Tick::at(1.5, DT)), Vec2::ZERO);
        assert_ne!(platform.tick(Tick::at(2.0, DT)), Vec2::ZERO);
    }

    #[test]
    fn test_non_looping_two_waypoints_stop() {
        let mut platform = platform(vec![Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0)], false);

        let next = run(&mut platform, 1, 600);
        assert_eq!(platform.cursor().arrivals(), 2);
        assert!(platform.cursor().is_halted());
        assert_eq!(platform.position(), Vec2::new(1.0, 1.0));

        run(&mut platform, next, 600);
        assert_eq!(platform.cursor().arrivals(), 2);
        assert_eq!(platform.position(), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_looping_wraps_to_first() {
        let mut platform = platform(vec![Vec2::new(1.0, 0.0), Vec2::ZERO], true);
        run(&mut platform, 1, 600);
        let arrivals = platform.cursor().arrivals();
        assert!(arrivals >= 4);
        assert_eq!(platform.cursor().index() as u64, arrivals % 2);
    }

    #[test]
    fn test_invalid_stats() {
        let stats = PlatformStats {
            move_speed: 0.0,
            ..PlatformStats::default()
        };
        let result = MovingPlatform::new(1, stats, Vec2::ZERO, Arc::new(WaypointPath::empty()));
        assert!(result.is_err());
    }
}
