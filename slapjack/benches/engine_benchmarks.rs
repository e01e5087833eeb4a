use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use slapjack::{
    GameRegistry, RegistryConfig, Slapjack,
    game::{GameError, build_stack},
};

/// Helper to create a dealt game
fn setup_dealt_game(num_decks: usize, num_players: usize) -> Slapjack {
    let mut game = Slapjack::new(num_decks, num_players);
    game.deal_initial().unwrap();
    game
}

/// Benchmark building and shuffling the main stack
fn bench_build_stack(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_stack");

    for num_decks in [1, 2, 8].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_decks", num_decks)),
            num_decks,
            |b, &n| {
                b.iter(|| build_stack(n));
            },
        );
    }

    group.finish();
}

/// Benchmark the initial deal
fn bench_deal_initial(c: &mut Criterion) {
    let mut group = c.benchmark_group("deal_initial");

    for num_players in [2, 4, 8].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_players", num_players)),
            num_players,
            |b, &n| {
                b.iter_batched(
                    || Slapjack::new(2, n),
                    |mut game| {
                        game.deal_initial().unwrap();
                        game
                    },
                    criterion::BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

/// Benchmark a round of draws followed by a slap
fn bench_draw_and_slap(c: &mut Criterion) {
    c.bench_function("draw_and_slap_4_players", |b| {
        b.iter_batched(
            || setup_dealt_game(1, 4),
            |mut game| {
                for idx in 0..4 {
                    game.draw_card(idx, false).unwrap();
                }
                match game.resolve_slap(0) {
                    Ok(_) | Err(GameError::NoCards { .. }) => {}
                    Err(e) => panic!("{e}"),
                }
                game
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

/// Benchmark a request answered by a game actor
fn bench_actor_round_trip(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let registry = GameRegistry::new(RegistryConfig::immediate());
    let game = runtime.block_on(async {
        let created = registry.create_game(2, 1, "bench").await.unwrap();
        registry.get_game(created.id).await.unwrap()
    });

    c.bench_function("actor_main_stack_size", |b| {
        b.iter(|| runtime.block_on(game.main_stack_size()).unwrap());
    });
}

criterion_group!(
    engine_operations,
    bench_build_stack,
    bench_deal_initial,
    bench_draw_and_slap,
);

criterion_group!(registry_operations, bench_actor_round_trip);

criterion_main!(engine_operations, registry_operations);
