use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum GameError {
    /// Invalid input received
    InvalidInput(String),
    /// Game is not in a valid state for the operation
    InvalidState(String),
}

impl std::fmt::Display for GameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            GameError::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
        }
    }
}

impl std::error::Error for GameError {}

/// A tick-driven game that a runner can pace and feed input to.
///
/// The runner owns the clock: it calls `tick` at `tick_rate` and forwards
/// external input as it arrives. The game itself never blocks.
pub trait Game {
    type Input;
    type Event;

    fn tick(&mut self) -> Vec<Self::Event>;
    fn handle_input(&mut self, input: Self::Input) -> Result<(), GameError>;
    fn tick_rate(&self) -> Duration;
    fn is_over(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GameError::InvalidInput("bad direction".to_string());
        assert_eq!(err.to_string(), "Invalid input: bad direction");

        let err = GameError::InvalidState("no match in progress".to_string());
        assert_eq!(err.to_string(), "Invalid state: no match in progress");
    }
}
