//! Registry error types.

use thiserror::Error;

use super::models::GameId;
use crate::game::GameError;

/// Registry errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Unknown or terminated game
    #[error("Game {0} not found")]
    NotFound(GameId),

    /// Termination secret or owner mismatch
    #[error("User not authorized")]
    Unauthorized,

    /// Roster already full
    #[error("Game is full ({capacity} players)")]
    Capacity { capacity: usize },

    /// Username already seated
    #[error("Player {0} already added")]
    DuplicatePlayer(String),

    /// Username not seated in the game
    #[error("Player {0} is not in this game")]
    PlayerNotFound(String),

    /// Rejected game parameters
    #[error("Invalid game configuration: {0}")]
    InvalidConfig(String),

    /// Engine error
    #[error(transparent)]
    Game(#[from] GameError),
}

impl RegistryError {
    /// Get a client-safe error message
    ///
    /// Game ids are redacted from not-found errors, and engine errors use
    /// their own client messages.
    pub fn client_message(&self) -> String {
        match self {
            RegistryError::NotFound(_) => "Game not found".to_string(),
            RegistryError::Game(e) => e.client_message(),
            _ => self.to_string(),
        }
    }
}

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_client_message_hides_id() {
        let id = GameId::new();
        let err = RegistryError::NotFound(id);
        assert!(err.to_string().contains(&id.to_string()));
        assert_eq!(err.client_message(), "Game not found");
    }

    #[test]
    fn test_game_error_converts() {
        let err: RegistryError = GameError::NoCards { player: 1 }.into();
        assert_eq!(err, RegistryError::Game(GameError::NoCards { player: 1 }));
        assert_eq!(err.client_message(), "No more cards, you lose!");
    }

    #[test]
    fn test_capacity_message() {
        let err = RegistryError::Capacity { capacity: 4 };
        assert_eq!(err.client_message(), "Game is full (4 players)");
    }
}
