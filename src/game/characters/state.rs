// Actor states and the machine that tracks them

/// Player life cycle
///
/// Ground/air/run are not separate states: they follow from the body's
/// grounded flag and velocity while `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlayerState {
    /// Responds to intents
    #[default]
    Active,
    /// Frozen, waiting for the death delay to run out
    Dying,
    /// Frozen at the level exit
    Victorious,
}

impl PlayerState {
    /// Whether intents and damage are ignored
    pub fn is_move_locked(&self) -> bool {
        matches!(self, Self::Dying | Self::Victorious)
    }
}

/// Enemy behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EnemyState {
    /// Walking the patrol path (or waiting at a waypoint)
    #[default]
    Patrolling,
    /// Standing still after hitting the player
    Attacking,
    /// Knocked out, harmless and passable
    Stunned,
}

impl EnemyState {
    /// Check if touching the enemy hurts
    pub fn can_attack(&self) -> bool {
        !matches!(self, Self::Stunned)
    }
}

/// Holds the current state and guards transitions
#[derive(Debug, Clone)]
pub struct StateMachine<S: Copy + PartialEq> {
    current_state: S,
}

impl<S: Copy + PartialEq + Default> Default for StateMachine<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S: Copy + PartialEq> StateMachine<S> {
    pub fn new(initial: S) -> Self {
        Self {
            current_state: initial,
        }
    }

    /// Get the current state
    pub fn state(&self) -> S {
        self.current_state
    }

    /// Transition to a new state; returns false if already there
    pub fn transition(&mut self, new_state: S) -> bool {
        if self.current_state == new_state {
            return false;
        }
        self.current_state = new_state;
        true
    }

    /// Enter `new_state` whatever the current one is
    pub fn force_transition(&mut self, new_state: S) {
        self.current_state = new_state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let sm: StateMachine<PlayerState> = StateMachine::default();
        assert_eq!(sm.state(), PlayerState::Active);
    }

    #[test]
    fn test_state_transition() {
        let mut sm = StateMachine::new(EnemyState::Patrolling);
        assert!(sm.transition(EnemyState::Stunned));
        assert_eq!(sm.state(), EnemyState::Stunned);
    }

    #[test]
    fn test_same_state_transition_is_noop() {
        let mut sm = StateMachine::new(EnemyState::Stunned);
        assert!(!sm.transition(EnemyState::Stunned));
        assert_eq!(sm.state(), EnemyState::Stunned);
    }

    #[test]
    fn test_force_transition_leaves_locked_state() {
        let mut sm = StateMachine::new(PlayerState::Dying);
        sm.force_transition(PlayerState::Active);
        assert_eq!(sm.state(), PlayerState::Active);
    }

    #[test]
    fn test_move_lock_states() {
        assert!(!PlayerState::Active.is_move_locked());
        assert!(PlayerState::Dying.is_move_locked());
        assert!(PlayerState::Victorious.is_move_locked());
    }

    #[test]
    fn test_enemy_can_attack_unless_stunned() {
        assert!(EnemyState::Patrolling.can_attack());
        assert!(EnemyState::Attacking.can_attack());
        assert!(!EnemyState::Stunned.can_attack());
    }
}
