//! Registry data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::game::{Card, SlapOutcome};

/// Opaque game identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(Uuid);

impl GameId {
    /// Generate a fresh random id
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GameId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for GameId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Secret handed to a game's owner at creation; required to terminate the
/// game. Comparison runs in constant time.
#[derive(Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TerminationSecret(String);

impl TerminationSecret {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Check a candidate secret byte-for-byte
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        self.0.as_bytes().ct_eq(candidate.as_bytes()).into()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for TerminationSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TerminationSecret(<redacted>)")
    }
}

/// Returned to the creator of a game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedGame {
    pub id: GameId,
    pub termination_secret: TerminationSecret,
    pub owner: String,
}

/// Game record snapshot. The termination secret is never included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameInfo {
    pub id: GameId,
    pub owner: String,
    pub num_players: usize,
    pub num_decks: usize,
    pub players: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl GameInfo {
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.players.len() >= self.num_players
    }
}

/// Entry in the game listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub id: GameId,
    pub num_players: usize,
}

/// A move a seated player can make
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerAction {
    Draw,
    Slap,
}

impl fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerAction::Draw => write!(f, "draw"),
            PlayerAction::Slap => write!(f, "slap"),
        }
    }
}

/// What a player action did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ActionOutcome {
    /// The player had nothing left; nothing changed
    OutOfCards,
    /// The player's top card went face up on the main stack
    Played { card: Card },
    /// The slap was resolved
    Slapped(SlapOutcome),
    /// The player slapped holding a single card, which went face down onto
    /// the main stack
    LastCardForfeited { card: Card },
}

impl fmt::Display for ActionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionOutcome::OutOfCards | ActionOutcome::LastCardForfeited { .. } => {
                write!(f, "No more cards, you lose!")
            }
            ActionOutcome::Played { card } => write!(f, "Played down a {card}"),
            ActionOutcome::Slapped(SlapOutcome::Won { .. }) => {
                write!(f, "SLAPJACK! Take the pile.")
            }
            ActionOutcome::Slapped(SlapOutcome::Penalized { cards }) => {
                write!(f, "Can't slap that, lose {cards} cards.")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Suit;

    #[test]
    fn test_game_id_round_trips_through_text() {
        let id = GameId::new();
        let text = id.to_string();
        assert_eq!(text.len(), 36);
        assert_eq!(text.parse::<GameId>().unwrap(), id);
        assert!("not-a-game".parse::<GameId>().is_err());
    }

    #[test]
    fn test_game_ids_are_unique() {
        assert_ne!(GameId::new(), GameId::new());
    }

    #[test]
    fn test_secret_matches_exactly() {
        let secret = TerminationSecret::generate();
        assert_eq!(secret.as_str().len(), 36);
        assert!(secret.matches(secret.as_str()));
        assert!(!secret.matches(""));
        assert!(!secret.matches(&secret.as_str()[..35]));
        assert!(!secret.matches(&secret.as_str().to_uppercase()));
    }

    #[test]
    fn test_secret_debug_is_redacted() {
        let secret = TerminationSecret::generate();
        let debug = format!("{secret:?}");
        assert!(!debug.contains(secret.as_str()));
    }

    #[test]
    fn test_action_outcome_messages() {
        let card = Card::new(7, Suit::Heart).unwrap();
        assert_eq!(
            ActionOutcome::Played { card }.to_string(),
            "Played down a 7♥"
        );
        assert_eq!(
            ActionOutcome::Slapped(SlapOutcome::Penalized { cards: 2 }).to_string(),
            "Can't slap that, lose 2 cards."
        );
        assert!(
            ActionOutcome::Slapped(SlapOutcome::Won { cards: 4 })
                .to_string()
                .starts_with("SLAPJACK")
        );
    }
}
