// Input abstraction
//
// The simulation never sees a device API. Hosts translate whatever they read
// (keyboard, gamepad, replay file, AI) into one `Intent` per actor per tick.
//
// ## Usage Example
//
// ```rust
// use rusted_platformer::engine::input::IntentTracker;
//
// let mut tracker = IntentTracker::new();
// // Each tick, sample the held state of the device
// let intent = tracker.sample(axis, jump_button_down);
// level.tick(tick, &intent);
// ```

pub mod intent;

pub use intent::{Intent, IntentTracker};
