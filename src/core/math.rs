// Math utilities and helper functions

use glam::Vec2;

/// Clamp a value between min and max
pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Move `current` toward `target` by at most `max_delta`, landing exactly on
/// `target` when it is within reach
pub fn move_towards(current: Vec2, target: Vec2, max_delta: f32) -> Vec2 {
    let to_target = target - current;
    let distance = to_target.length();
    if distance <= max_delta || distance == 0.0 {
        target
    } else {
        current + to_target / distance * max_delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(5.0, 0.0, 10.0), 5.0);
        assert_eq!(clamp(-5.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp(15.0, 0.0, 10.0), 10.0);
    }

    #[test]
    fn test_move_towards_partial_step() {
        let next = move_towards(Vec2::ZERO, Vec2::new(10.0, 0.0), 2.5);
        assert_eq!(next, Vec2::new(2.5, 0.0));
    }

    #[test]
    fn test_move_towards_lands_on_target() {
        let target = Vec2::new(1.0, 1.0);
        assert_eq!(move_towards(Vec2::new(0.9, 1.0), target, 0.5), target);
        assert_eq!(move_towards(target, target, 0.5), target);
    }

    #[test]
    fn test_move_towards_zero_step_stays() {
        let start = Vec2::new(3.0, -2.0);
        assert_eq!(move_towards(start, Vec2::new(5.0, 5.0), 0.0), start);
    }
}
