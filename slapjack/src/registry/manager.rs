//! Game registry for spawning, finding, and terminating game actors.

use super::{
    actor::{GameActor, GameHandle},
    config::RegistryConfig,
    errors::{RegistryError, RegistryResult},
    models::{
        ActionOutcome, CreatedGame, GameId, GameInfo, GameSummary, PlayerAction,
        TerminationSecret,
    },
};
use crate::game::{
    Slapjack,
    constants::{CARDS_PER_DECK, MAX_DECKS},
};
use chrono::{DateTime, Utc};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{RwLock, oneshot};

/// Registry-side record of a running game. The roster lives in the actor.
struct GameEntry {
    handle: GameHandle,
    owner: String,
    num_decks: usize,
    termination_secret: TerminationSecret,
    created_at: DateTime<Utc>,
    shutdown: oneshot::Sender<()>,
}

/// Registry of every running game
///
/// Cloning is cheap; clones share the same games.
#[derive(Clone)]
pub struct GameRegistry {
    /// Registry configuration
    config: RegistryConfig,

    /// Active games
    games: Arc<RwLock<HashMap<GameId, GameEntry>>>,
}

impl GameRegistry {
    /// Create a new, empty registry
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            games: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Create and spawn a new game
    ///
    /// The owner is not seated automatically; call [`Self::add_player`] to
    /// enroll them.
    ///
    /// # Arguments
    ///
    /// * `num_players` - Player capacity
    /// * `num_decks` - Number of 52-card decks shuffled together
    /// * `owner` - Username allowed to terminate the game
    ///
    /// # Returns
    ///
    /// * `RegistryResult<CreatedGame>` - Game id, termination secret, and owner
    pub async fn create_game(
        &self,
        num_players: usize,
        num_decks: usize,
        owner: &str,
    ) -> RegistryResult<CreatedGame> {
        validate_new_game(num_players, num_decks, owner)?;
        self.simulate_query().await;

        let id = GameId::new();
        let termination_secret = TerminationSecret::generate();
        let (actor, handle, shutdown) =
            GameActor::new(id, Slapjack::new(num_decks, num_players), &self.config);

        let entry = GameEntry {
            handle,
            owner: owner.to_string(),
            num_decks,
            termination_secret: termination_secret.clone(),
            created_at: Utc::now(),
            shutdown,
        };

        let mut games = self.games.write().await;
        games.insert(id, entry);
        drop(games);

        tokio::spawn(actor.run());

        log::info!("Created game {} for {}", id, owner);

        Ok(CreatedGame {
            id,
            termination_secret,
            owner: owner.to_string(),
        })
    }

    /// Get the record of a game
    ///
    /// # Returns
    ///
    /// * `RegistryResult<GameInfo>` - Snapshot of the record, or `NotFound`
    pub async fn get_game_info(&self, id: GameId) -> RegistryResult<GameInfo> {
        self.simulate_query().await;

        let games = self.games.read().await;
        let entry = games.get(&id).ok_or(RegistryError::NotFound(id))?;
        let handle = entry.handle.clone();
        let mut info = GameInfo {
            id,
            owner: entry.owner.clone(),
            num_players: handle.num_players(),
            num_decks: entry.num_decks,
            players: Vec::new(),
            created_at: entry.created_at,
        };
        drop(games);

        info.players = handle.players().await?;
        Ok(info)
    }

    /// Get a game handle
    ///
    /// # Returns
    ///
    /// * `Option<GameHandle>` - Handle if the game exists
    pub async fn get_game(&self, id: GameId) -> Option<GameHandle> {
        self.simulate_query().await;
        self.lookup(id).await
    }

    /// Seat a player in a game
    ///
    /// # Returns
    ///
    /// * `RegistryResult<usize>` - The player's 0-based index
    pub async fn add_player(&self, id: GameId, username: &str) -> RegistryResult<usize> {
        self.simulate_query().await;
        let handle = self.lookup(id).await.ok_or(RegistryError::NotFound(id))?;
        handle.add_player(username).await
    }

    /// Find a seated player's index
    pub async fn player_index(&self, id: GameId, username: &str) -> RegistryResult<usize> {
        self.simulate_query().await;
        let handle = self.lookup(id).await.ok_or(RegistryError::NotFound(id))?;
        handle.player_index(username).await
    }

    /// Draw or slap on behalf of a seated player
    pub async fn player_action(
        &self,
        id: GameId,
        username: &str,
        action: PlayerAction,
    ) -> RegistryResult<ActionOutcome> {
        self.simulate_query().await;
        let handle = self.lookup(id).await.ok_or(RegistryError::NotFound(id))?;
        handle.act(username, action).await
    }

    /// Terminate a game
    ///
    /// Both the termination secret and the requester must match the game's
    /// record. On success the game is removed and its actor stopped before
    /// the registry lock is released.
    ///
    /// # Arguments
    ///
    /// * `id` - Game ID
    /// * `termination_secret` - Secret returned by [`Self::create_game`]
    /// * `requester` - Username asking for termination
    pub async fn delete_game(
        &self,
        id: GameId,
        termination_secret: &str,
        requester: &str,
    ) -> RegistryResult<()> {
        self.simulate_query().await;

        let mut games = self.games.write().await;
        let entry = games.get(&id).ok_or(RegistryError::NotFound(id))?;

        let secret_ok = entry.termination_secret.matches(termination_secret);
        let owner_ok = entry.owner == requester;
        if !(secret_ok && owner_ok) {
            log::warn!("Rejected termination of game {} by {}", id, requester);
            return Err(RegistryError::Unauthorized);
        }

        if let Some(entry) = games.remove(&id) {
            // The actor may already be gone; nothing to do then
            let _ = entry.shutdown.send(());
        }
        drop(games);

        log::info!("Terminated game {}", id);
        Ok(())
    }

    /// List all active games
    ///
    /// # Returns
    ///
    /// * `Vec<GameSummary>` - Id and player capacity of every game
    pub async fn list_games(&self) -> Vec<GameSummary> {
        self.simulate_query().await;

        let games = self.games.read().await;
        games
            .iter()
            .map(|(id, entry)| GameSummary {
                id: *id,
                num_players: entry.handle.num_players(),
            })
            .collect()
    }

    /// Get active game count
    pub async fn active_game_count(&self) -> usize {
        let games = self.games.read().await;
        games.len()
    }

    async fn lookup(&self, id: GameId) -> Option<GameHandle> {
        let games = self.games.read().await;
        games.get(&id).map(|entry| entry.handle.clone())
    }

    async fn simulate_query(&self) {
        if !self.config.query_delay.is_zero() {
            tokio::time::sleep(self.config.query_delay).await;
        }
    }
}

impl Default for GameRegistry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

fn validate_new_game(num_players: usize, num_decks: usize, owner: &str) -> RegistryResult<()> {
    if num_players == 0 {
        return Err(RegistryError::InvalidConfig(
            "Number of players must be at least 1".to_string(),
        ));
    }

    if num_decks == 0 {
        return Err(RegistryError::InvalidConfig(
            "Number of decks must be at least 1".to_string(),
        ));
    }

    if num_decks > MAX_DECKS {
        return Err(RegistryError::InvalidConfig(format!(
            "Number of decks must be at most {MAX_DECKS}"
        )));
    }

    // Every player must be dealt at least one card
    let max_players = num_decks
        .checked_mul(CARDS_PER_DECK)
        .ok_or_else(|| RegistryError::InvalidConfig("Too many decks".to_string()))?;
    if num_players > max_players {
        return Err(RegistryError::InvalidConfig(format!(
            "Number of players must be at most {max_players} with {num_decks} deck(s)"
        )));
    }

    if owner.trim().is_empty() {
        return Err(RegistryError::InvalidConfig(
            "Owner username must not be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_new_game() {
        assert!(validate_new_game(2, 1, "anthony").is_ok());
        assert!(matches!(
            validate_new_game(0, 1, "anthony"),
            Err(RegistryError::InvalidConfig(_))
        ));
        assert!(matches!(
            validate_new_game(2, 0, "anthony"),
            Err(RegistryError::InvalidConfig(_))
        ));
        assert!(matches!(
            validate_new_game(2, 1, "  "),
            Err(RegistryError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_new_game_upper_bounds() {
        assert!(validate_new_game(52, 1, "anthony").is_ok());
        assert!(validate_new_game(2, MAX_DECKS, "anthony").is_ok());
        assert!(matches!(
            validate_new_game(53, 1, "anthony"),
            Err(RegistryError::InvalidConfig(_))
        ));
        assert!(matches!(
            validate_new_game(2, MAX_DECKS + 1, "anthony"),
            Err(RegistryError::InvalidConfig(_))
        ));
        assert!(matches!(
            validate_new_game(usize::MAX, usize::MAX / 8, "anthony"),
            Err(RegistryError::InvalidConfig(_))
        ));
    }

    #[tokio::test]
    async fn test_create_game_starts_with_empty_roster() {
        let registry = GameRegistry::new(RegistryConfig::immediate());
        let created = registry.create_game(2, 1, "anthony").await.unwrap();
        assert_eq!(created.owner, "anthony");

        let info = registry.get_game_info(created.id).await.unwrap();
        assert!(info.players.is_empty());
        assert_eq!(info.owner, "anthony");
        assert_eq!(info.num_players, 2);
        assert_eq!(info.num_decks, 1);
        assert_eq!(registry.active_game_count().await, 1);
    }

    #[tokio::test]
    async fn test_unknown_game() {
        let registry = GameRegistry::new(RegistryConfig::immediate());
        let id = GameId::new();
        assert!(registry.get_game(id).await.is_none());
        assert_eq!(
            registry.get_game_info(id).await.unwrap_err(),
            RegistryError::NotFound(id)
        );
        assert_eq!(
            registry.add_player(id, "anthony").await.unwrap_err(),
            RegistryError::NotFound(id)
        );
        assert_eq!(
            registry.delete_game(id, "secret", "anthony").await.unwrap_err(),
            RegistryError::NotFound(id)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_delay_is_applied() {
        let registry = GameRegistry::new(RegistryConfig::default());
        let start = tokio::time::Instant::now();
        registry.list_games().await;
        assert!(start.elapsed() >= RegistryConfig::default().query_delay);
    }
}
