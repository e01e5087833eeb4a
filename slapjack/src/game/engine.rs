//! The Slapjack engine: one main stack, one stack per player, and the two
//! most recent face-up cards.

use rand::seq::SliceRandom;

use super::{
    constants::{CARDS_PER_DECK, MAX_DECKS, SLAP_PENALTY},
    entities::{Card, GamePhase, GameSnapshot, SlapOutcome, Standing, build_stack},
    errors::{GameError, GameResult},
};

/// A single game of Slapjack.
///
/// The engine is a plain owned value with no interior locking. Shared access
/// goes through [`crate::registry::GameHandle`], which serializes every call
/// on the game's actor.
///
/// The top of every stack is the back of its vector. Every operation keeps
/// the total number of cards equal to `num_decks * 52`, including operations
/// that fail.
#[derive(Debug, Clone)]
pub struct Slapjack {
    num_decks: usize,
    num_players: usize,
    main_stack: Vec<Card>,
    player_stacks: Vec<Vec<Card>>,
    current_card: Option<Card>,
    previous_card: Option<Card>,
    phase: GamePhase,
}

impl Slapjack {
    /// Create a game with a freshly shuffled main stack and empty player
    /// stacks.
    ///
    /// Callers keep `num_decks` within [`MAX_DECKS`]; the registry validates
    /// this before creating a game.
    #[must_use]
    pub fn new(num_decks: usize, num_players: usize) -> Self {
        Self {
            num_decks,
            num_players,
            main_stack: build_stack(num_decks),
            player_stacks: vec![Vec::new(); num_players],
            current_card: None,
            previous_card: None,
            phase: GamePhase::Uninitialized,
        }
    }

    /// Rebuild a position from explicit stacks (top card last).
    ///
    /// # Errors
    ///
    /// Returns `TooManyDecks` above [`MAX_DECKS`], and `CardCountMismatch` if
    /// the stacks do not hold exactly `num_decks * 52` cards.
    pub fn from_stacks(
        num_decks: usize,
        main_stack: Vec<Card>,
        player_stacks: Vec<Vec<Card>>,
    ) -> GameResult<Self> {
        if num_decks > MAX_DECKS {
            return Err(GameError::TooManyDecks {
                num_decks,
                max: MAX_DECKS,
            });
        }

        let expected = num_decks * CARDS_PER_DECK;
        let actual = main_stack.len() + player_stacks.iter().map(Vec::len).sum::<usize>();
        if expected != actual {
            return Err(GameError::CardCountMismatch { expected, actual });
        }

        let phase = if player_stacks.iter().any(|stack| !stack.is_empty()) {
            GamePhase::InPlay
        } else {
            GamePhase::Uninitialized
        };

        Ok(Self {
            num_decks,
            num_players: player_stacks.len(),
            main_stack,
            player_stacks,
            current_card: None,
            previous_card: None,
            phase,
        })
    }

    /// Deal `floor(num_decks * 52 / num_players)` cards to every player, one
    /// player at a time. The remainder stays on the main stack.
    ///
    /// # Errors
    ///
    /// Returns `EmptyStack` if the main stack cannot cover the whole deal.
    /// Nothing moves in that case.
    pub fn deal_initial(&mut self) -> GameResult<()> {
        let per_player = self.cards_per_player();
        if self.main_stack.len() < per_player * self.num_players {
            return Err(GameError::EmptyStack);
        }

        for stack in &mut self.player_stacks {
            for _ in 0..per_player {
                let card = self.main_stack.pop().ok_or(GameError::EmptyStack)?;
                stack.push(card);
            }
        }

        self.phase = GamePhase::InPlay;
        log::debug!(
            "Dealt {} cards to each of {} players, {} left on the main stack",
            per_player,
            self.num_players,
            self.main_stack.len()
        );
        Ok(())
    }

    /// Play the top card of a player's stack onto the main stack.
    ///
    /// A `silent` draw leaves the face-up cards alone; it is used when a
    /// player forfeits a card without playing it.
    ///
    /// # Errors
    ///
    /// `InvalidPlayer` for an unknown index, `NoCards` if the player's stack
    /// is empty.
    pub fn draw_card(&mut self, player_idx: usize, silent: bool) -> GameResult<Card> {
        let card = self
            .stack_mut(player_idx)?
            .pop()
            .ok_or(GameError::NoCards { player: player_idx })?;
        self.main_stack.push(card);

        if !silent {
            self.previous_card = self.current_card.replace(card);
        }
        Ok(card)
    }

    /// A jack can always be slapped; any other card only when it matches the
    /// rank of the card played just before it.
    #[must_use]
    pub fn is_slappable(&self) -> bool {
        match (self.current_card, self.previous_card) {
            (Some(current), _) if current.is_jack() => true,
            (Some(current), Some(previous)) => current.rank() == previous.rank(),
            _ => false,
        }
    }

    /// Resolve a slap by `player_idx`.
    ///
    /// A legal slap moves the whole main stack onto the player's stack,
    /// shuffles it, and clears both face-up cards. An illegal slap moves the
    /// player's top two cards (or whatever is left) onto the main stack.
    ///
    /// # Errors
    ///
    /// `InvalidPlayer` for an unknown index, `NoCards` if the player has
    /// nothing left to slap with.
    pub fn resolve_slap(&mut self, player_idx: usize) -> GameResult<SlapOutcome> {
        let slappable = self.is_slappable();
        let stack = self.stack_mut(player_idx)?;
        if stack.is_empty() {
            return Err(GameError::NoCards { player: player_idx });
        }

        if slappable {
            let cards = self.main_stack.len();
            let stack = &mut self.player_stacks[player_idx];
            stack.append(&mut self.main_stack);
            stack.shuffle(&mut rand::rng());
            self.current_card = None;
            self.previous_card = None;
            log::debug!("Player {} took the pile of {} cards", player_idx, cards);
            Ok(SlapOutcome::Won { cards })
        } else {
            let cards = stack.len().min(SLAP_PENALTY);
            let split = stack.len() - cards;
            let mut penalty = stack.split_off(split);
            penalty.reverse();
            self.main_stack.append(&mut penalty);
            log::debug!("Player {} slapped wrongly and lost {} cards", player_idx, cards);
            Ok(SlapOutcome::Penalized { cards })
        }
    }

    /// Number of cards a player holds.
    ///
    /// # Errors
    ///
    /// `InvalidPlayer` for an unknown index.
    pub fn player_stack_size(&self, player_idx: usize) -> GameResult<usize> {
        self.player_stack(player_idx).map(<[Card]>::len)
    }

    /// A player's stack, bottom first.
    ///
    /// # Errors
    ///
    /// `InvalidPlayer` for an unknown index.
    pub fn player_stack(&self, player_idx: usize) -> GameResult<&[Card]> {
        self.player_stacks
            .get(player_idx)
            .map(Vec::as_slice)
            .ok_or(GameError::InvalidPlayer {
                player: player_idx,
                num_players: self.num_players,
            })
    }

    /// Number of cards on the main stack.
    #[must_use]
    pub fn main_stack_size(&self) -> usize {
        self.main_stack.len()
    }

    /// Main stack contents, top card last.
    #[must_use]
    pub fn main_stack(&self) -> &[Card] {
        &self.main_stack
    }

    /// Most recent face-up card, if any.
    #[must_use]
    pub fn current_card(&self) -> Option<Card> {
        self.current_card
    }

    /// Face-up card played just before the current one.
    #[must_use]
    pub fn previous_card(&self) -> Option<Card> {
        self.previous_card
    }

    /// Player capacity.
    #[must_use]
    pub fn num_players(&self) -> usize {
        self.num_players
    }

    /// Decks shuffled into this game.
    #[must_use]
    pub fn num_decks(&self) -> usize {
        self.num_decks
    }

    /// Whether the initial deal has happened.
    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Cards across every stack.
    #[must_use]
    pub fn total_cards(&self) -> usize {
        self.main_stack.len() + self.player_stacks.iter().map(Vec::len).sum::<usize>()
    }

    /// `Win` for every player still holding cards, `Lose` for the rest.
    /// Several players can be winning at once.
    #[must_use]
    pub fn compute_winners(&self) -> Vec<Standing> {
        self.player_stacks
            .iter()
            .map(|stack| {
                if stack.is_empty() {
                    Standing::Lose
                } else {
                    Standing::Win
                }
            })
            .collect()
    }

    /// Indices of the players currently winning.
    #[must_use]
    pub fn winners(&self) -> Vec<usize> {
        self.compute_winners()
            .into_iter()
            .enumerate()
            .filter(|(_, standing)| *standing == Standing::Win)
            .map(|(idx, _)| idx)
            .collect()
    }

    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            phase: self.phase,
            num_decks: self.num_decks,
            main_stack: self.main_stack.clone(),
            player_stacks: self.player_stacks.clone(),
            current_card: self.current_card,
            previous_card: self.previous_card,
        }
    }

    fn cards_per_player(&self) -> usize {
        self.num_decks
            .saturating_mul(CARDS_PER_DECK)
            .checked_div(self.num_players)
            .unwrap_or(0)
    }

    fn stack_mut(&mut self, player_idx: usize) -> GameResult<&mut Vec<Card>> {
        let num_players = self.num_players;
        self.player_stacks
            .get_mut(player_idx)
            .ok_or(GameError::InvalidPlayer {
                player: player_idx,
                num_players,
            })
    }
}
