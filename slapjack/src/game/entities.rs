use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{
    constants::{ACE, CARDS_PER_DECK, JACK, KING, QUEEN},
    errors::GameError,
};

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Suit {
    Spade,
    Heart,
    Club,
    Diamond,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spade, Suit::Heart, Suit::Club, Suit::Diamond];
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Spade => "♠",
            Self::Heart => "♥",
            Self::Club => "♣",
            Self::Diamond => "♦",
        };
        write!(f, "{repr}")
    }
}

/// Card ranks run from 1 (ace) to 13 (king).
pub type Rank = u8;

/// A playing card. Cards are plain values: once built they never change,
/// and two cards are equal when both rank and suit match.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(try_from = "RawCard")]
pub struct Card {
    rank: Rank,
    suit: Suit,
}

/// Wire form of a card before its rank is checked.
#[derive(Deserialize)]
struct RawCard {
    rank: Rank,
    suit: Suit,
}

impl TryFrom<RawCard> for Card {
    type Error = GameError;

    fn try_from(raw: RawCard) -> Result<Self, Self::Error> {
        Card::new(raw.rank, raw.suit).ok_or(GameError::InvalidRank { rank: raw.rank })
    }
}

impl Card {
    /// Build a card, rejecting ranks outside `1..=13`.
    #[must_use]
    pub fn new(rank: Rank, suit: Suit) -> Option<Self> {
        (ACE..=KING).contains(&rank).then_some(Self { rank, suit })
    }

    #[must_use]
    pub fn rank(&self) -> Rank {
        self.rank
    }

    #[must_use]
    pub fn suit(&self) -> Suit {
        self.suit
    }

    /// Jacks can always be slapped.
    #[must_use]
    pub fn is_jack(&self) -> bool {
        self.rank == JACK
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.rank {
            ACE => write!(f, "A{}", self.suit),
            JACK => write!(f, "J{}", self.suit),
            QUEEN => write!(f, "Q{}", self.suit),
            KING => write!(f, "K{}", self.suit),
            v => write!(f, "{v}{}", self.suit),
        }
    }
}

/// Build `num_decks` full decks and shuffle them together.
#[must_use]
pub fn build_stack(num_decks: usize) -> Vec<Card> {
    build_stack_with_rng(num_decks, &mut rand::rng())
}

/// Same as [`build_stack`] but draws randomness from `rng`, so seeded
/// callers get a reproducible order.
///
/// `num_decks` is expected to be at most
/// [`MAX_DECKS`](super::constants::MAX_DECKS); the registry rejects larger
/// games before building anything.
pub fn build_stack_with_rng<R: Rng + ?Sized>(num_decks: usize, rng: &mut R) -> Vec<Card> {
    let capacity = num_decks.checked_mul(CARDS_PER_DECK).unwrap_or(0);
    let mut cards = Vec::with_capacity(capacity);
    for _ in 0..num_decks {
        for suit in Suit::ALL {
            cards.extend((ACE..=KING).map(|rank| Card { rank, suit }));
        }
    }
    cards.shuffle(rng);
    cards
}

/// Whether a player still holds cards at the time of the query.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Standing {
    Win,
    Lose,
}

impl fmt::Display for Standing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Standing::Win => write!(f, "WIN"),
            Standing::Lose => write!(f, "LOSE"),
        }
    }
}

/// Result of a slap.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum SlapOutcome {
    /// The slap was legal and the player took `cards` from the main stack.
    Won { cards: usize },
    /// The slap was illegal and the player gave up `cards` (at most two).
    Penalized { cards: usize },
}

impl SlapOutcome {
    #[must_use]
    pub fn won(&self) -> bool {
        matches!(self, SlapOutcome::Won { .. })
    }

    /// Number of cards that changed hands.
    #[must_use]
    pub fn cards(&self) -> usize {
        match self {
            SlapOutcome::Won { cards } | SlapOutcome::Penalized { cards } => *cards,
        }
    }
}

/// Engine lifecycle. There is no finished phase; callers decide when a game
/// is over.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    Uninitialized,
    InPlay,
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GamePhase::Uninitialized => write!(f, "uninitialized"),
            GamePhase::InPlay => write!(f, "in_play"),
        }
    }
}

/// Point-in-time copy of every stack and both face cards.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GameSnapshot {
    pub phase: GamePhase,
    pub num_decks: usize,
    pub main_stack: Vec<Card>,
    pub player_stacks: Vec<Vec<Card>>,
    pub current_card: Option<Card>,
    pub previous_card: Option<Card>,
}

impl GameSnapshot {
    #[must_use]
    pub fn total_cards(&self) -> usize {
        self.main_stack.len() + self.player_stacks.iter().map(Vec::len).sum::<usize>()
    }
}
