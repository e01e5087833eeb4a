//! # Slapjack
//!
//! A multiplayer Slapjack engine with a registry that runs many games
//! concurrently.
//!
//! ## Rules
//!
//! Every player starts with an equal share of the shuffled decks. Players
//! take turns playing their top card face up onto the main stack. When the
//! top card is a jack, or matches the rank of the card just below it, the
//! first player to slap takes the whole main stack. A wrong slap costs the
//! slapper two cards. A player with no cards left is out.
//!
//! ## Core Modules
//!
//! - [`game`]: Cards, deck construction, and the `Slapjack` engine
//! - [`registry`]: Actor-per-game registry with ownership and capacity rules
//!
//! ## Example
//!
//! ```
//! use slapjack::Slapjack;
//!
//! let mut game = Slapjack::new(1, 2);
//! game.deal_initial().unwrap();
//! let card = game.draw_card(0, false).unwrap();
//! assert_eq!(game.current_card(), Some(card));
//! ```

/// Cards, stacks, and the game engine.
pub mod game;
pub use game::{Card, GameError, Slapjack, Suit};

/// Game registry and per-game actors.
pub mod registry;
pub use registry::{GameHandle, GameRegistry, RegistryConfig, RegistryError};
