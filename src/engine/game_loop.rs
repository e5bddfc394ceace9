/// Fixed-tick simulation clock
///
/// The host feeds measured frame times in; the loop turns them into a
/// sequence of fixed-size ticks. Every actor deadline (death delay, stun,
/// waypoint wait) is compared against [`Tick::now`], so the simulation is
/// fully deterministic for a given sequence of frame times.
use std::time::Duration;

/// Target simulation rate (60 updates per second)
pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;
const FIXED_TIMESTEP_DURATION: Duration = Duration::from_micros(16_667); // ~1/60 second

/// Maximum number of simulation steps per frame to prevent spiral of death
const MAX_PHYSICS_STEPS: u32 = 5;

/// One discrete simulation step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    /// 1-based tick counter
    pub index: u64,
    /// Simulation time at the end of this tick, in seconds
    pub now: f32,
    /// Length of this tick, in seconds
    pub dt: f32,
}

impl Tick {
    /// Build the `index`-th tick of a clock running at `dt`
    pub fn new(index: u64, dt: f32) -> Self {
        Self {
            index,
            now: elapsed(index, dt),
            dt,
        }
    }

    /// Build a tick at an explicit simulation time
    pub fn at(now: f32, dt: f32) -> Self {
        Self { index: 0, now, dt }
    }
}

/// Time after `index` ticks of `dt`, computed in f64
fn elapsed(index: u64, dt: f32) -> f32 {
    (index as f64 * dt as f64) as f32
}

/// Game loop timing state
#[derive(Debug)]
pub struct GameLoop {
    /// Accumulated time for fixed timestep updates
    accumulator: Duration,

    /// Whether the game is paused
    paused: bool,

    /// Current frame number
    frame_count: u64,

    /// Total updates executed
    update_count: u64,
}

impl GameLoop {
    /// Create a new game loop
    pub fn new() -> Self {
        Self {
            accumulator: Duration::ZERO,
            paused: false,
            frame_count: 0,
            update_count: 0,
        }
    }

    /// Begin a new frame that took `frame_time`, returns the fixed ticks to run
    pub fn begin_frame(&mut self, frame_time: Duration) -> Vec<Tick> {
        self.frame_count += 1;

        // If paused, don't accumulate time for updates
        if self.paused {
            return Vec::new();
        }

        self.accumulator = self.accumulator.saturating_add(frame_time);

        let mut ticks = Vec::with_capacity(MAX_PHYSICS_STEPS as usize);
        while self.accumulator >= FIXED_TIMESTEP_DURATION && ticks.len() < MAX_PHYSICS_STEPS as usize
        {
            self.accumulator -= FIXED_TIMESTEP_DURATION;
            self.update_count += 1;
            ticks.push(Tick::new(self.update_count, FIXED_TIMESTEP));
        }

        if ticks.len() == MAX_PHYSICS_STEPS as usize && self.accumulator >= FIXED_TIMESTEP_DURATION {
            log::debug!(
                "Frame {} dropped {:?} of simulation backlog",
                self.frame_count,
                self.accumulator
            );
            self.accumulator = Duration::ZERO;
        }

        ticks
    }

    /// Current simulation time in seconds
    pub fn now(&self) -> f32 {
        elapsed(self.update_count, FIXED_TIMESTEP)
    }

    /// Get total number of updates executed
    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    /// Check if game is paused
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Pause the game
    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            log::info!("Game paused");
        }
    }

    /// Resume the game
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            // Reset accumulator to prevent update burst
            self.accumulator = Duration::ZERO;
            log::info!("Game resumed");
        }
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new()
    }
}
