//! Win/lose state machine
//!
//! Two phases. Any game logic can end the round with a message; only the
//! restart key brings it back. The runtime does the actual reset work.

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    /// Simulation, input and overlap checks all run
    #[default]
    Running,
    /// Simulation halted, overlay shown, waiting for the restart key
    GameOver,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameState {
    phase: GamePhase,
    message: String,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Message shown on the game-over screen (empty while running)
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Enter GameOver. Calling again while already over replaces the message.
    pub fn declare_game_over(&mut self, message: impl Into<String>) {
        self.phase = GamePhase::GameOver;
        self.message = message.into();
    }

    /// GameOver -> Running. Returns false (and does nothing) while running.
    pub fn restart(&mut self) -> bool {
        if self.phase != GamePhase::GameOver {
            return false;
        }
        self.phase = GamePhase::Running;
        self.message.clear();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_running() {
        let state = GameState::new();
        assert!(state.is_running());
        assert_eq!(state.message(), "");
    }

    #[test]
    fn test_game_over_then_restart() {
        let mut state = GameState::new();
        state.declare_game_over("You Lose!");
        assert_eq!(state.phase(), GamePhase::GameOver);
        assert_eq!(state.message(), "You Lose!");

        assert!(state.restart());
        assert!(state.is_running());
        assert_eq!(state.message(), "");
    }

    #[test]
    fn test_restart_while_running_is_noop() {
        let mut state = GameState::new();
        assert!(!state.restart());
        assert!(state.is_running());
    }

    #[test]
    fn test_second_declaration_replaces_message() {
        let mut state = GameState::new();
        state.declare_game_over("first");
        state.declare_game_over("second");
        assert!(state.is_game_over());
        assert_eq!(state.message(), "second");
    }
}
