//! Command-line game configuration.
//!
//! Consolidates flag and environment variable reads and provides validated
//! configuration.

use slapjack::{
    RegistryConfig,
    game::constants::{CARDS_PER_DECK, MAX_DECKS},
};

/// Complete hot-seat game configuration
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Number of seats; prompted for when unset
    pub num_players: Option<usize>,
    /// Number of decks; prompted for when unset
    pub num_decks: Option<usize>,
    /// Owner of every game created, seated as player 0
    pub owner: String,
    /// Registry settings
    pub registry: RegistryConfig,
}

impl CliConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `players_override` - Optional player count (from CLI args)
    /// * `decks_override` - Optional deck count (from CLI args)
    /// * `owner_override` - Optional owner name (from CLI args)
    ///
    /// Expected environment variables:
    /// - `SLAPJACK_PLAYERS`: Player count
    /// - `SLAPJACK_DECKS`: Deck count
    /// - `SLAPJACK_OWNER`: Owner name (default: player0)
    /// - plus everything read by [`RegistryConfig::from_env`]
    pub fn from_env(
        players_override: Option<usize>,
        decks_override: Option<usize>,
        owner_override: Option<String>,
    ) -> Self {
        let num_players = players_override.or_else(|| parse_env("SLAPJACK_PLAYERS"));
        let num_decks = decks_override.or_else(|| parse_env("SLAPJACK_DECKS"));
        let owner = owner_override
            .or_else(|| std::env::var("SLAPJACK_OWNER").ok())
            .unwrap_or_else(|| "player0".to_string());

        Self {
            num_players,
            num_decks,
            owner,
            registry: RegistryConfig::from_env(),
        }
    }

    /// Validate configuration after loading
    ///
    /// # Returns
    ///
    /// * `Result<(), ConfigError>` - Success or validation error
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.owner.trim().is_empty() {
            return Err(ConfigError::Invalid {
                var: "SLAPJACK_OWNER".to_string(),
                reason: "Must not be empty".to_string(),
            });
        }

        if let Some(num_decks) = self.num_decks {
            validate_decks(num_decks)?;
        }

        if let Some(num_players) = self.num_players {
            validate_players(num_players, self.num_decks.unwrap_or(1))?;

            // Other seats are named player1.., so the owner must not take one
            if (1..num_players).any(|idx| seat_name(&self.owner, idx) == self.owner) {
                return Err(ConfigError::Invalid {
                    var: "SLAPJACK_OWNER".to_string(),
                    reason: format!("'{}' is reserved for another seat", self.owner),
                });
            }
        }

        Ok(())
    }
}

/// Username seated at `idx`; seat 0 belongs to the owner
pub fn seat_name(owner: &str, idx: usize) -> String {
    if idx == 0 {
        owner.to_string()
    } else {
        format!("player{idx}")
    }
}

/// Check a deck count
pub fn validate_decks(num_decks: usize) -> Result<(), ConfigError> {
    if num_decks == 0 {
        return Err(ConfigError::Invalid {
            var: "SLAPJACK_DECKS".to_string(),
            reason: "Must be at least 1".to_string(),
        });
    }
    if num_decks > MAX_DECKS {
        return Err(ConfigError::Invalid {
            var: "SLAPJACK_DECKS".to_string(),
            reason: format!("Must be at most {MAX_DECKS}"),
        });
    }
    Ok(())
}

/// Check a player count against the cards available to deal
pub fn validate_players(num_players: usize, num_decks: usize) -> Result<(), ConfigError> {
    if num_players < 2 {
        return Err(ConfigError::Invalid {
            var: "SLAPJACK_PLAYERS".to_string(),
            reason: "Must be at least 2".to_string(),
        });
    }

    // Every player must be dealt at least one card
    let max_players = num_decks.saturating_mul(CARDS_PER_DECK);
    if num_players > max_players {
        return Err(ConfigError::Invalid {
            var: "SLAPJACK_PLAYERS".to_string(),
            reason: format!("Must be at most {max_players} with {num_decks} deck(s)"),
        });
    }

    Ok(())
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse an optional environment variable
fn parse_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
