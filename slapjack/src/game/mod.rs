//! Slapjack game engine - cards, stacks, and slap resolution.
//!
//! This module provides the single-game building blocks:
//! - Card and suit values with deck construction and shuffling
//! - The `Slapjack` engine that deals, draws, and resolves slaps
//! - Engine error types

pub mod constants;
pub mod engine;
pub mod entities;
pub mod errors;

pub use engine::Slapjack;
pub use entities::{
    Card, GamePhase, GameSnapshot, Rank, SlapOutcome, Standing, Suit, build_stack,
    build_stack_with_rng,
};
pub use errors::{GameError, GameResult};
