//! Game actor message types.

use serde::Serialize;
use tokio::sync::{mpsc, oneshot};

use super::{
    errors::RegistryResult,
    models::{ActionOutcome, PlayerAction},
};
use crate::game::{Card, GameResult, GameSnapshot, SlapOutcome, Standing};

/// Messages that can be sent to a GameActor
#[derive(Debug)]
pub enum GameMessage {
    /// Seat a player
    AddPlayer {
        username: String,
        response: oneshot::Sender<RegistryResult<usize>>,
    },

    /// Get the roster in seating order
    GetPlayers {
        response: oneshot::Sender<Vec<String>>,
    },

    /// Look up a player's seat
    PlayerIndex {
        username: String,
        response: oneshot::Sender<RegistryResult<usize>>,
    },

    /// Deal the initial stacks
    DealInitial {
        response: oneshot::Sender<GameResult<()>>,
    },

    /// Play (or silently forfeit) a player's top card
    DrawCard {
        player_idx: usize,
        silent: bool,
        response: oneshot::Sender<GameResult<Card>>,
    },

    /// Check the slap rule
    IsSlappable { response: oneshot::Sender<bool> },

    /// Resolve a slap
    ResolveSlap {
        player_idx: usize,
        response: oneshot::Sender<GameResult<SlapOutcome>>,
    },

    /// Size of one player's stack
    PlayerStackSize {
        player_idx: usize,
        response: oneshot::Sender<GameResult<usize>>,
    },

    /// Size of the main stack
    MainStackSize { response: oneshot::Sender<usize> },

    /// Most recent face-up card
    CurrentCard {
        response: oneshot::Sender<Option<Card>>,
    },

    /// Face-up card before the current one
    PreviousCard {
        response: oneshot::Sender<Option<Card>>,
    },

    /// Win/lose standing per player
    ComputeWinners {
        response: oneshot::Sender<Vec<Standing>>,
    },

    /// Copy of every stack
    Snapshot {
        response: oneshot::Sender<GameSnapshot>,
    },

    /// Draw or slap on behalf of a seated player
    PlayerAction {
        username: String,
        action: PlayerAction,
        response: oneshot::Sender<RegistryResult<ActionOutcome>>,
    },

    /// Subscribe to game events
    Subscribe {
        subscriber: String,
        response: oneshot::Sender<mpsc::Receiver<GameEvent>>,
    },

    /// Unsubscribe from game events
    Unsubscribe { subscriber: String },
}

/// Notification sent to subscribers when the game changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    /// A player took a seat
    PlayerJoined { username: String, player_idx: usize },
    /// Initial stacks were dealt
    Dealt,
    /// A card was played face up
    CardPlayed { player_idx: usize, card: Card },
    /// A player took the main stack
    PileWon { player_idx: usize, cards: usize },
    /// A player lost cards to the main stack
    Penalized { player_idx: usize, cards: usize },
    /// The game was terminated by its owner
    Terminated,
}
