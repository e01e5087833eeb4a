use super::entities::Rank;

pub const ACE: Rank = 1;
pub const JACK: Rank = 11;
pub const QUEEN: Rank = 12;
pub const KING: Rank = 13;

pub const CARDS_PER_DECK: usize = 52;

/// Most decks a single game may shuffle together.
pub const MAX_DECKS: usize = 64;

/// Cards an illegal slap costs the slapper.
pub const SLAP_PENALTY: usize = 2;
