/// Property-based tests for stack building and card conservation
///
/// These tests drive the engine with random deck counts, player counts and
/// move sequences, and check that every card stays accounted for.
use proptest::prelude::*;
use slapjack::game::{Card, GameError, Slapjack, build_stack};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy)]
enum Move {
    Draw(usize),
    Silent(usize),
    Slap(usize),
}

fn move_strategy(num_players: usize) -> impl Strategy<Value = Move> {
    prop_oneof![
        3 => (0..num_players).prop_map(Move::Draw),
        1 => (0..num_players).prop_map(Move::Silent),
        2 => (0..num_players).prop_map(Move::Slap),
    ]
}

// Deck count, player count, and a move sequence for that many players
fn game_strategy() -> impl Strategy<Value = (usize, usize, Vec<Move>)> {
    (1usize..=3, 1usize..=6).prop_flat_map(|(num_decks, num_players)| {
        (
            Just(num_decks),
            Just(num_players),
            prop::collection::vec(move_strategy(num_players), 0..300),
        )
    })
}

fn card_counts(game: &Slapjack) -> HashMap<Card, usize> {
    let snapshot = game.snapshot();
    let mut counts = HashMap::new();
    for card in snapshot
        .main_stack
        .iter()
        .chain(snapshot.player_stacks.iter().flatten())
    {
        *counts.entry(*card).or_insert(0) += 1;
    }
    counts
}

proptest! {
    #[test]
    fn test_build_stack_holds_each_card_once_per_deck(num_decks in 1usize..=8) {
        let stack = build_stack(num_decks);
        prop_assert_eq!(stack.len(), num_decks * 52);

        let mut counts: HashMap<Card, usize> = HashMap::new();
        for card in &stack {
            *counts.entry(*card).or_insert(0) += 1;
        }
        prop_assert_eq!(counts.len(), 52);
        prop_assert!(counts.values().all(|n| *n == num_decks));
        prop_assert_eq!(stack.iter().filter(|c| c.is_jack()).count(), 4 * num_decks);
    }

    #[test]
    fn test_random_play_conserves_cards((num_decks, num_players, moves) in game_strategy()) {
        let mut game = Slapjack::new(num_decks, num_players);
        game.deal_initial().unwrap();
        let initial = card_counts(&game);

        for mv in moves {
            let result = match mv {
                Move::Draw(idx) => game.draw_card(idx, false).map(|_| ()),
                Move::Silent(idx) => game.draw_card(idx, true).map(|_| ()),
                Move::Slap(idx) => game.resolve_slap(idx).map(|_| ()),
            };
            match result {
                Ok(()) | Err(GameError::NoCards { .. }) => {}
                Err(e) => prop_assert!(false, "unexpected error: {}", e),
            }
            prop_assert_eq!(game.total_cards(), num_decks * 52);
        }

        prop_assert_eq!(card_counts(&game), initial);
    }

    #[test]
    fn test_previous_card_only_with_current(
        (num_decks, num_players, moves) in game_strategy()
    ) {
        let mut game = Slapjack::new(num_decks, num_players);
        game.deal_initial().unwrap();

        for mv in moves {
            let _ = match mv {
                Move::Draw(idx) => game.draw_card(idx, false).map(|_| ()),
                Move::Silent(idx) => game.draw_card(idx, true).map(|_| ()),
                Move::Slap(idx) => game.resolve_slap(idx).map(|_| ()),
            };
            if game.previous_card().is_some() {
                prop_assert!(game.current_card().is_some());
            }
            if game.current_card().is_none() {
                prop_assert!(!game.is_slappable());
            }
        }
    }
}
