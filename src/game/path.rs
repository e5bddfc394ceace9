// Waypoint paths shared by patrolling enemies and moving platforms

use glam::Vec2;

/// Ordered list of target positions
///
/// Paths are read-only once built and are shared through `Arc` by every
/// enemy or platform that follows them; each follower keeps its own
/// [`WaypointCursor`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WaypointPath {
    points: Vec<Vec2>,
    looping: bool,
}

impl WaypointPath {
    pub fn new(points: Vec<Vec2>, looping: bool) -> Self {
        Self { points, looping }
    }

    /// A path with no waypoints; followers stay idle
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn get(&self, index: usize) -> Option<Vec2> {
        self.points.get(index).copied()
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }
}

/// A follower's position along a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WaypointCursor {
    index: usize,
    halted: bool,
    arrivals: u64,
}

impl WaypointCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the current target
    pub fn index(&self) -> usize {
        self.index
    }

    /// The end of a non-looping path was reached
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Number of waypoints reached so far
    pub fn arrivals(&self) -> u64 {
        self.arrivals
    }

    /// Current target, or `None` when the path is empty or finished
    pub fn target(&self, path: &WaypointPath) -> Option<Vec2> {
        if self.halted {
            return None;
        }
        path.get(self.index)
    }

    /// Record arrival at the current target and pick the next one
    ///
    /// Looping paths wrap to 0; otherwise the cursor stays on the last
    /// index and halts for good.
    pub fn advance(&mut self, path: &WaypointPath) {
        if self.halted || path.is_empty() {
            return;
        }

        self.arrivals += 1;
        if self.index + 1 < path.len() {
            self.index += 1;
        } else if path.is_looping() {
            self.index = 0;
        } else {
            self.halted = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(len: usize, looping: bool) -> WaypointPath {
        WaypointPath::new(
            (0..len).map(|i| Vec2::new(i as f32, 0.0)).collect(),
            looping,
        )
    }

    #[test]
    fn test_empty_path_has_no_target() {
        let path = WaypointPath::empty();
        let mut cursor = WaypointCursor::new();
        assert_eq!(cursor.target(&path), None);
        cursor.advance(&path);
        assert_eq!(cursor.index(), 0);
        assert_eq!(cursor.arrivals(), 0);
    }

    #[test]
    fn test_looping_index_is_arrivals_mod_len() {
        let path = path(3, true);
        let mut cursor = WaypointCursor::new();
        for n in 1..=10u64 {
            cursor.advance(&path);
            assert_eq!(cursor.index() as u64, n % 3);
            assert!(!cursor.is_halted());
        }
    }

    #[test]
    fn test_non_looping_halts_on_last() {
        let path = path(2, false);
        let mut cursor = WaypointCursor::new();

        cursor.advance(&path);
        assert_eq!(cursor.index(), 1);
        assert!(!cursor.is_halted());

        cursor.advance(&path);
        assert_eq!(cursor.index(), 1);
        assert!(cursor.is_halted());
        assert_eq!(cursor.target(&path), None);

        // A third arrival never happens
        cursor.advance(&path);
        assert_eq!(cursor.arrivals(), 2);
        assert_eq!(cursor.index(), 1);
    }

    #[test]
    fn test_single_point_looping_stays_on_zero() {
        let path = path(1, true);
        let mut cursor = WaypointCursor::new();
        cursor.advance(&path);
        assert_eq!(cursor.index(), 0);
        assert_eq!(cursor.target(&path), Some(Vec2::ZERO));
    }
}
