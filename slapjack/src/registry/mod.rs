//! Game registry providing many concurrent games with an async actor model.
//!
//! This module implements:
//! - GameActor: Async actor owning a single game's engine and roster
//! - GameRegistry: Maps game ids to running actors, enforces ownership
//! - Message-based communication with tokio channels
//! - Change notifications for subscribers
//!
//! ## Architecture
//!
//! Each game runs in a separate Tokio task with an mpsc message inbox. All
//! operations on one game, including roster changes, are processed one at a
//! time by its actor, so concurrent callers never see a half-applied move.
//! The registry only holds handles and the immutable parts of each record.
//!
//! ## Example
//!
//! ```
//! use slapjack::registry::{GameRegistry, RegistryConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), slapjack::registry::RegistryError> {
//! let registry = GameRegistry::new(RegistryConfig::immediate());
//! let created = registry.create_game(2, 1, "anthony").await?;
//! registry.add_player(created.id, "anthony").await?;
//!
//! let game = registry.get_game(created.id).await.expect("just created");
//! game.deal_initial().await?;
//! assert_eq!(game.player_stack_size(0).await?, 26);
//! # Ok(())
//! # }
//! ```

pub mod actor;
pub mod config;
pub mod errors;
pub mod manager;
pub mod messages;
pub mod models;

pub use actor::{GameActor, GameHandle};
pub use config::RegistryConfig;
pub use errors::{RegistryError, RegistryResult};
pub use manager::GameRegistry;
pub use messages::{GameEvent, GameMessage};
pub use models::{
    ActionOutcome, CreatedGame, GameId, GameInfo, GameSummary, PlayerAction, TerminationSecret,
};
