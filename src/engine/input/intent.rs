// Per-tick intent derived from whatever device the host reads

use crate::core::math::clamp;

/// Dead zone below which a horizontal axis reads as zero
const AXIS_DEAD_ZONE: f32 = 0.1;

/// What an actor wants to do this tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Intent {
    /// Horizontal axis in [-1, 1]
    pub horizontal: f32,
    /// Jump went down this tick
    pub jump_pressed: bool,
    /// Jump came up this tick
    pub jump_released: bool,
}

impl Intent {
    /// Build an intent, clamping the axis to [-1, 1]
    pub fn new(horizontal: f32, jump_pressed: bool, jump_released: bool) -> Self {
        Self {
            horizontal: clamp(horizontal, -1.0, 1.0),
            jump_pressed,
            jump_released,
        }
    }

    /// No input at all
    pub fn idle() -> Self {
        Self::default()
    }

    /// Hold a direction without touching jump
    pub fn run(horizontal: f32) -> Self {
        Self::new(horizontal, false, false)
    }

    /// Press jump this tick
    pub fn jump() -> Self {
        Self::new(0.0, true, false)
    }

    /// Release jump this tick
    pub fn release() -> Self {
        Self::new(0.0, false, true)
    }
}

/// Turns held-button samples into press/release edges
///
/// Hosts that only know "is jump held right now" feed one sample per tick
/// and get back an [`Intent`] with the edges filled in.
#[derive(Debug, Default)]
pub struct IntentTracker {
    jump_held: bool,
}

impl IntentTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sample the device state for this tick
    pub fn sample(&mut self, horizontal: f32, jump_held: bool) -> Intent {
        let jump_pressed = jump_held && !self.jump_held;
        let jump_released = !jump_held && self.jump_held;
        self.jump_held = jump_held;

        let horizontal = if horizontal.abs() < AXIS_DEAD_ZONE {
            0.0
        } else {
            horizontal
        };

        Intent::new(horizontal, jump_pressed, jump_released)
    }

    /// Forget held state (e.g. after respawn or when the window loses focus)
    pub fn reset(&mut self) {
        self.jump_held = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_clamps_axis() {
        assert_eq!(Intent::run(3.0).horizontal, 1.0);
        assert_eq!(Intent::run(-7.5).horizontal, -1.0);
        assert_eq!(Intent::run(0.25).horizontal, 0.25);
    }

    #[test]
    fn test_idle_intent() {
        let intent = Intent::idle();
        assert_eq!(intent.horizontal, 0.0);
        assert!(!intent.jump_pressed);
        assert!(!intent.jump_released);
    }

    #[test]
    fn test_tracker_press_hold_release() {
        let mut tracker = IntentTracker::new();

        let press = tracker.sample(0.0, true);
        assert!(press.jump_pressed);
        assert!(!press.jump_released);

        let hold = tracker.sample(0.0, true);
        assert!(!hold.jump_pressed);
        assert!(!hold.jump_released);

        let release = tracker.sample(0.0, false);
        assert!(!release.jump_pressed);
        assert!(release.jump_released);
    }

    #[test]
    fn test_tracker_dead_zone() {
        let mut tracker = IntentTracker::new();
        assert_eq!(tracker.sample(0.05, false).horizontal, 0.0);
        assert_eq!(tracker.sample(-0.5, false).horizontal, -0.5);
    }

    #[test]
    fn test_jump_held_across_reset_is_a_new_press() {
        let mut tracker = IntentTracker::new();
        assert!(tracker.sample(0.0, true).jump_pressed);
        assert!(!tracker.sample(0.0, true).jump_pressed);

        tracker.reset();
        let after = tracker.sample(0.0, true);
        assert!(after.jump_pressed);
        assert!(!after.jump_released);
    }
}
