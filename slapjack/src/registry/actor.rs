//! Game actor implementation with async message handling.

use super::{
    config::RegistryConfig,
    errors::{RegistryError, RegistryResult},
    messages::{GameEvent, GameMessage},
    models::{ActionOutcome, GameId, PlayerAction},
};
use crate::game::{Card, GameResult, GameSnapshot, SlapOutcome, Slapjack, Standing};
use std::collections::HashMap;
use tokio::sync::{mpsc, oneshot};

/// Game actor handle for sending messages
///
/// Every call is queued on the game's inbox and answered by its actor, so
/// calls on the same game never interleave. Once the game is terminated all
/// calls fail with `NotFound`.
#[derive(Debug, Clone)]
pub struct GameHandle {
    sender: mpsc::Sender<GameMessage>,
    game_id: GameId,
    num_players: usize,
}

impl GameHandle {
    /// Create a new game handle
    pub fn new(sender: mpsc::Sender<GameMessage>, game_id: GameId, num_players: usize) -> Self {
        Self {
            sender,
            game_id,
            num_players,
        }
    }

    /// Get game ID
    pub fn game_id(&self) -> GameId {
        self.game_id
    }

    /// Get player capacity
    pub fn num_players(&self) -> usize {
        self.num_players
    }

    /// Whether the actor has stopped
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Send a message to the game
    pub async fn send(&self, message: GameMessage) -> RegistryResult<()> {
        self.sender
            .send(message)
            .await
            .map_err(|_| RegistryError::NotFound(self.game_id))
    }

    /// Send a message and wait for the actor's reply
    async fn request<T>(
        &self,
        message: impl FnOnce(oneshot::Sender<T>) -> GameMessage,
    ) -> RegistryResult<T> {
        let (tx, rx) = oneshot::channel();
        self.send(message(tx)).await?;
        rx.await.map_err(|_| RegistryError::NotFound(self.game_id))
    }

    /// Seat a player and return their 0-based index
    pub async fn add_player(&self, username: &str) -> RegistryResult<usize> {
        let username = username.to_string();
        self.request(|response| GameMessage::AddPlayer { username, response })
            .await?
    }

    /// Roster in seating order
    pub async fn players(&self) -> RegistryResult<Vec<String>> {
        self.request(|response| GameMessage::GetPlayers { response })
            .await
    }

    pub async fn player_index(&self, username: &str) -> RegistryResult<usize> {
        let username = username.to_string();
        self.request(|response| GameMessage::PlayerIndex { username, response })
            .await?
    }

    pub async fn deal_initial(&self) -> RegistryResult<()> {
        Ok(self
            .request(|response| GameMessage::DealInitial { response })
            .await??)
    }

    pub async fn draw_card(&self, player_idx: usize, silent: bool) -> RegistryResult<Card> {
        Ok(self
            .request(|response| GameMessage::DrawCard {
                player_idx,
                silent,
                response,
            })
            .await??)
    }

    pub async fn is_slappable(&self) -> RegistryResult<bool> {
        self.request(|response| GameMessage::IsSlappable { response })
            .await
    }

    pub async fn resolve_slap(&self, player_idx: usize) -> RegistryResult<SlapOutcome> {
        Ok(self
            .request(|response| GameMessage::ResolveSlap {
                player_idx,
                response,
            })
            .await??)
    }

    pub async fn player_stack_size(&self, player_idx: usize) -> RegistryResult<usize> {
        Ok(self
            .request(|response| GameMessage::PlayerStackSize {
                player_idx,
                response,
            })
            .await??)
    }

    pub async fn main_stack_size(&self) -> RegistryResult<usize> {
        self.request(|response| GameMessage::MainStackSize { response })
            .await
    }

    pub async fn current_card(&self) -> RegistryResult<Option<Card>> {
        self.request(|response| GameMessage::CurrentCard { response })
            .await
    }

    pub async fn previous_card(&self) -> RegistryResult<Option<Card>> {
        self.request(|response| GameMessage::PreviousCard { response })
            .await
    }

    pub async fn compute_winners(&self) -> RegistryResult<Vec<Standing>> {
        self.request(|response| GameMessage::ComputeWinners { response })
            .await
    }

    /// Indices of the players currently holding cards
    pub async fn winners(&self) -> RegistryResult<Vec<usize>> {
        let standings = self.compute_winners().await?;
        Ok(standings
            .into_iter()
            .enumerate()
            .filter(|(_, standing)| *standing == Standing::Win)
            .map(|(idx, _)| idx)
            .collect())
    }

    /// Consistent copy of every stack
    pub async fn snapshot(&self) -> RegistryResult<GameSnapshot> {
        self.request(|response| GameMessage::Snapshot { response })
            .await
    }

    /// Draw or slap on behalf of a seated player
    pub async fn act(&self, username: &str, action: PlayerAction) -> RegistryResult<ActionOutcome> {
        let username = username.to_string();
        self.request(|response| GameMessage::PlayerAction {
            username,
            action,
            response,
        })
        .await?
    }

    /// Receive events for this game until unsubscribed or terminated
    pub async fn subscribe(&self, subscriber: &str) -> RegistryResult<mpsc::Receiver<GameEvent>> {
        let subscriber = subscriber.to_string();
        self.request(|response| GameMessage::Subscribe {
            subscriber,
            response,
        })
        .await
    }

    pub async fn unsubscribe(&self, subscriber: &str) -> RegistryResult<()> {
        self.send(GameMessage::Unsubscribe {
            subscriber: subscriber.to_string(),
        })
        .await
    }
}

/// Game actor owning a single game's engine and roster
pub struct GameActor {
    /// Game ID
    id: GameId,

    /// Engine state
    engine: Slapjack,

    /// Seated usernames, index = player index
    players: Vec<String>,

    /// Message inbox
    inbox: mpsc::Receiver<GameMessage>,

    /// Fired by the registry when the game is terminated
    shutdown: oneshot::Receiver<()>,

    /// Subscribers for game events
    subscribers: HashMap<String, mpsc::Sender<GameEvent>>,

    subscriber_capacity: usize,
}

impl GameActor {
    /// Create a new game actor
    ///
    /// # Returns
    ///
    /// * `(GameActor, GameHandle, oneshot::Sender<()>)` - Actor, handle for
    ///   sending messages, and the shutdown trigger
    pub fn new(
        id: GameId,
        engine: Slapjack,
        config: &RegistryConfig,
    ) -> (Self, GameHandle, oneshot::Sender<()>) {
        let (sender, inbox) = mpsc::channel(config.inbox_capacity.max(1));
        let (shutdown_tx, shutdown) = oneshot::channel();
        let handle = GameHandle::new(sender, id, engine.num_players());

        let actor = Self {
            id,
            engine,
            players: Vec::new(),
            inbox,
            shutdown,
            subscribers: HashMap::new(),
            subscriber_capacity: config.subscriber_capacity.max(1),
        };

        (actor, handle, shutdown_tx)
    }

    /// Run the game actor event loop
    ///
    /// Stops when the shutdown trigger fires (or is dropped), or when every
    /// handle is gone.
    pub async fn run(mut self) {
        log::info!(
            "Game {} starting ({} players, {} decks)",
            self.id,
            self.engine.num_players(),
            self.engine.num_decks()
        );

        loop {
            tokio::select! {
                message = self.inbox.recv() => match message {
                    Some(message) => self.handle_message(message),
                    None => break,
                },

                _ = &mut self.shutdown => {
                    self.notify(GameEvent::Terminated);
                    break;
                }
            }
        }

        log::info!("Game {} closed", self.id);
    }

    /// Handle a game message
    fn handle_message(&mut self, message: GameMessage) {
        match message {
            GameMessage::AddPlayer { username, response } => {
                let result = self.handle_add_player(username);
                let _ = response.send(result);
            }

            GameMessage::GetPlayers { response } => {
                let _ = response.send(self.players.clone());
            }

            GameMessage::PlayerIndex { username, response } => {
                let _ = response.send(self.player_index(&username));
            }

            GameMessage::DealInitial { response } => {
                let result = self.engine.deal_initial();
                if result.is_ok() {
                    log::info!("Game {} dealt", self.id);
                    self.notify(GameEvent::Dealt);
                }
                let _ = response.send(result);
            }

            GameMessage::DrawCard {
                player_idx,
                silent,
                response,
            } => {
                let result = self.handle_draw(player_idx, silent);
                let _ = response.send(result);
            }

            GameMessage::IsSlappable { response } => {
                let _ = response.send(self.engine.is_slappable());
            }

            GameMessage::ResolveSlap {
                player_idx,
                response,
            } => {
                let result = self.handle_slap(player_idx);
                let _ = response.send(result);
            }

            GameMessage::PlayerStackSize {
                player_idx,
                response,
            } => {
                let _ = response.send(self.engine.player_stack_size(player_idx));
            }

            GameMessage::MainStackSize { response } => {
                let _ = response.send(self.engine.main_stack_size());
            }

            GameMessage::CurrentCard { response } => {
                let _ = response.send(self.engine.current_card());
            }

            GameMessage::PreviousCard { response } => {
                let _ = response.send(self.engine.previous_card());
            }

            GameMessage::ComputeWinners { response } => {
                let _ = response.send(self.engine.compute_winners());
            }

            GameMessage::Snapshot { response } => {
                let _ = response.send(self.engine.snapshot());
            }

            GameMessage::PlayerAction {
                username,
                action,
                response,
            } => {
                let result = self.handle_action(&username, action);
                let _ = response.send(result);
            }

            GameMessage::Subscribe {
                subscriber,
                response,
            } => {
                let (tx, rx) = mpsc::channel(self.subscriber_capacity);
                log::debug!("{} subscribed to game {} events", subscriber, self.id);
                self.subscribers.insert(subscriber, tx);
                let _ = response.send(rx);
            }

            GameMessage::Unsubscribe { subscriber } => {
                self.subscribers.remove(&subscriber);
                log::debug!("{} unsubscribed from game {} events", subscriber, self.id);
            }
        }
    }

    /// Broadcast an event to all subscribers
    fn notify(&mut self, event: GameEvent) {
        let id = self.id;
        self.subscribers
            .retain(|subscriber, sender| match sender.try_send(event.clone()) {
                Ok(_) => true,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    log::warn!(
                        "Subscriber {} of game {} is lagging, dropping event",
                        subscriber,
                        id
                    );
                    true
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    log::debug!("Subscriber {} of game {} disconnected", subscriber, id);
                    false
                }
            });
    }

    fn handle_add_player(&mut self, username: String) -> RegistryResult<usize> {
        let capacity = self.engine.num_players();
        if self.players.len() >= capacity {
            return Err(RegistryError::Capacity { capacity });
        }
        if self.players.contains(&username) {
            return Err(RegistryError::DuplicatePlayer(username));
        }

        self.players.push(username.clone());
        let player_idx = self.players.len() - 1;
        log::info!(
            "{} joined game {} as player {}",
            username,
            self.id,
            player_idx
        );
        self.notify(GameEvent::PlayerJoined {
            username,
            player_idx,
        });
        Ok(player_idx)
    }

    fn player_index(&self, username: &str) -> RegistryResult<usize> {
        self.players
            .iter()
            .position(|p| p == username)
            .ok_or_else(|| RegistryError::PlayerNotFound(username.to_string()))
    }

    fn handle_draw(&mut self, player_idx: usize, silent: bool) -> GameResult<Card> {
        let card = self.engine.draw_card(player_idx, silent)?;
        if silent {
            self.notify(GameEvent::Penalized {
                player_idx,
                cards: 1,
            });
        } else {
            self.notify(GameEvent::CardPlayed { player_idx, card });
        }
        Ok(card)
    }

    fn handle_slap(&mut self, player_idx: usize) -> GameResult<SlapOutcome> {
        let outcome = self.engine.resolve_slap(player_idx)?;
        let event = match outcome {
            SlapOutcome::Won { cards } => GameEvent::PileWon { player_idx, cards },
            SlapOutcome::Penalized { cards } => GameEvent::Penalized { player_idx, cards },
        };
        self.notify(event);
        Ok(outcome)
    }

    /// Apply a player's move in one step
    fn handle_action(
        &mut self,
        username: &str,
        action: PlayerAction,
    ) -> RegistryResult<ActionOutcome> {
        let player_idx = self.player_index(username)?;
        let held = self.engine.player_stack_size(player_idx)?;
        if held == 0 {
            return Ok(ActionOutcome::OutOfCards);
        }

        let outcome = match action {
            PlayerAction::Draw => ActionOutcome::Played {
                card: self.handle_draw(player_idx, false)?,
            },
            // A last card can't pay a slap penalty, so it is forfeited instead
            PlayerAction::Slap if held == 1 => ActionOutcome::LastCardForfeited {
                card: self.handle_draw(player_idx, true)?,
            },
            PlayerAction::Slap => ActionOutcome::Slapped(self.handle_slap(player_idx)?),
        };

        log::debug!(
            "Game {}: {} chose to {}: {}",
            self.id,
            username,
            action,
            outcome
        );
        Ok(outcome)
    }
}
