//! Game engine error types.

use thiserror::Error;

/// Engine errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// The player has no cards left to play
    #[error("Player {player} has no cards left")]
    NoCards { player: usize },

    /// The main stack ran out while dealing
    #[error("Main stack is empty")]
    EmptyStack,

    /// Player index outside the table
    #[error("Invalid player index {player} (game has {num_players} players)")]
    InvalidPlayer { player: usize, num_players: usize },

    /// Explicit stacks do not add up to whole decks
    #[error("Card count mismatch: expected {expected}, got {actual}")]
    CardCountMismatch { expected: usize, actual: usize },

    /// More decks than one game supports
    #[error("Too many decks: {num_decks} (at most {max})")]
    TooManyDecks { num_decks: usize, max: usize },

    /// Rank outside ace..=king
    #[error("Invalid card rank {rank}")]
    InvalidRank { rank: u8 },
}

impl GameError {
    /// Get a message suitable for showing to a player
    pub fn client_message(&self) -> String {
        match self {
            GameError::NoCards { .. } => "No more cards, you lose!".to_string(),
            // Invariant violations are not the player's business
            GameError::EmptyStack | GameError::CardCountMismatch { .. } => {
                "Internal game error".to_string()
            }
            GameError::InvalidPlayer { .. }
            | GameError::TooManyDecks { .. }
            | GameError::InvalidRank { .. } => self.to_string(),
        }
    }
}

/// Result type for engine operations
pub type GameResult<T> = Result<T, GameError>;
