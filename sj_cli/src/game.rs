//! Hot-seat game loop.
//!
//! Every player shares one terminal. Seats take turns in order; on their
//! turn a player types `d` to draw or `s` to slap. A seat that comes up with
//! no cards is out for the rest of the round.

use std::io::Write;

use anyhow::{Context, Result, anyhow};
use slapjack::{
    GameRegistry,
    game::Standing,
    registry::{ActionOutcome, PlayerAction},
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::{config::seat_name, logging};

pub const WELCOME: &str = "Welcome to Slapjack!";
const START: &str = "Starting game...";
const INSTRUCTIONS: &str = "Type d to draw or s to slap.";
pub const PLAY_AGAIN: &str = "Type y to play another game: ";

/// Result of one round
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundResult {
    pub standings: Vec<Standing>,
    pub turns: usize,
}

/// Parse one line of player input
pub fn parse_action(line: &str) -> Option<PlayerAction> {
    match line.trim() {
        "d" | "D" => Some(PlayerAction::Draw),
        "s" | "S" => Some(PlayerAction::Slap),
        _ => None,
    }
}

/// Read one line, `None` at end of input
pub async fn read_line<R>(input: &mut R) -> Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .await
        .context("failed to read input")?;
    Ok((read > 0).then_some(line))
}

/// Prompt until the line parses, `None` at end of input
pub async fn prompt<R, W, T>(
    input: &mut R,
    out: &mut W,
    question: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Option<T>>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    loop {
        write!(out, "{question}")?;
        out.flush()?;
        let Some(line) = read_line(input).await? else {
            return Ok(None);
        };
        if let Some(value) = parse(&line) {
            return Ok(Some(value));
        }
    }
}

/// Play one round from deal to final standings
///
/// The game is created through `registry`, owned by `owner` (seat 0), and
/// terminated once the round is over. Running out of input ends the round
/// early with the standings at that point.
pub async fn play_round<R, W>(
    registry: &GameRegistry,
    owner: &str,
    num_players: usize,
    num_decks: usize,
    input: &mut R,
    out: &mut W,
) -> Result<RoundResult>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let created = registry.create_game(num_players, num_decks, owner).await?;
    let game = registry
        .get_game(created.id)
        .await
        .ok_or_else(|| anyhow!("game {} vanished after creation", created.id))?;

    let seats: Vec<String> = (0..num_players).map(|idx| seat_name(owner, idx)).collect();
    for seat in &seats {
        registry.add_player(created.id, seat).await?;
    }

    writeln!(out, "{START}")?;
    game.deal_initial().await?;

    let mut done = vec![false; num_players];
    let mut turns = 0;
    'round: while done.iter().filter(|d| !**d).count() > 1 {
        for (idx, seat) in seats.iter().enumerate() {
            if done[idx] {
                continue;
            }
            if done.iter().filter(|d| !**d).count() <= 1 {
                break 'round;
            }

            let question = format!("{seat}: {INSTRUCTIONS} ");
            let Some(action) = prompt(input, out, &question, parse_action).await? else {
                log::info!("Input closed, ending game {} early", created.id);
                break 'round;
            };
            turns += 1;

            let outcome = registry.player_action(created.id, seat, action).await?;
            if matches!(outcome, ActionOutcome::OutOfCards) {
                done[idx] = true;
            }
            writeln!(out, "{seat}: {outcome}")?;

            match game.current_card().await? {
                Some(card) => writeln!(out, "Face up: {card}")?,
                None => writeln!(out, "Face up: nothing")?,
            }
        }
    }

    let standings = game.compute_winners().await?;
    let summary: Vec<String> = seats
        .iter()
        .zip(&standings)
        .map(|(seat, standing)| format!("{seat} {standing}"))
        .collect();
    writeln!(out, "Final winners: {}", summary.join(", "))?;

    let winners = game.winners().await?;
    logging::log_round_finished(&created.id.to_string(), turns, &winners);

    registry
        .delete_game(created.id, created.termination_secret.as_str(), owner)
        .await?;

    Ok(RoundResult { standings, turns })
}

#[cfg(test)]
mod tests {
    use super::*;
    use slapjack::RegistryConfig;

    fn registry() -> GameRegistry {
        GameRegistry::new(RegistryConfig::immediate())
    }

    #[test]
    fn test_parse_action() {
        assert_eq!(parse_action("d\n"), Some(PlayerAction::Draw));
        assert_eq!(parse_action(" s "), Some(PlayerAction::Slap));
        assert_eq!(parse_action("a"), None);
        assert_eq!(parse_action(""), None);
    }

    #[tokio::test]
    async fn test_prompt_repeats_until_valid() {
        let mut input: &[u8] = b"x\n\n4\n";
        let mut out = Vec::new();
        let value = prompt(&mut input, &mut out, "How many? ", |l| {
            l.trim().parse::<usize>().ok()
        })
        .await
        .unwrap();
        assert_eq!(value, Some(4));
        assert_eq!(String::from_utf8(out).unwrap().matches("How many? ").count(), 3);
    }

    #[tokio::test]
    async fn test_prompt_end_of_input() {
        let mut input: &[u8] = b"x\n";
        let mut out = Vec::new();
        let value = prompt(&mut input, &mut out, "? ", parse_action).await.unwrap();
        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn test_round_ends_early_when_input_closes() {
        let registry = registry();
        let mut input: &[u8] = b"d\nd\nq\n";
        let mut out = Vec::new();

        let result = play_round(&registry, "anthony", 2, 1, &mut input, &mut out)
            .await
            .unwrap();
        assert_eq!(result.turns, 2);
        assert_eq!(result.standings, vec![Standing::Win, Standing::Win]);

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Starting game..."));
        assert!(text.contains("anthony: Played down a"));
        assert!(text.contains("player1: Played down a"));
        assert!(text.contains("Final winners: anthony WIN, player1 WIN"));

        // The round cleans up after itself
        assert_eq!(registry.active_game_count().await, 0);
    }

    #[tokio::test]
    async fn test_round_ends_when_one_seat_remains() {
        let registry = registry();
        // Draw only: nobody slaps, so both seats run dry and the round stops
        // once the first one is marked out
        let script = "d\n".repeat(200);
        let mut input = script.as_bytes();
        let mut out = Vec::new();

        let result = play_round(&registry, "anthony", 2, 1, &mut input, &mut out)
            .await
            .unwrap();
        assert_eq!(result.standings, vec![Standing::Lose, Standing::Lose]);
        assert_eq!(result.turns, 53);

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("anthony: No more cards, you lose!"));
    }
}
