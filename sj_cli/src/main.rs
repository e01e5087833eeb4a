//! Hot-seat terminal Slapjack.
//!
//! Creates games through a `GameRegistry` and lets every player take turns
//! at the same keyboard.

mod config;
mod game;
mod logging;

use std::io::Write;

use anyhow::Error;
use ctrlc::set_handler;
use log::info;
use pico_args::Arguments;
use slapjack::GameRegistry;
use tokio::io::BufReader;

use config::{CliConfig, validate_decks, validate_players};

const HELP: &str = "\
Play Slapjack with everyone at one keyboard

USAGE:
  sj_cli [OPTIONS]

OPTIONS:
  --players    N           Number of players           [default: env SLAPJACK_PLAYERS or prompt]
  --decks      N           Number of decks             [default: env SLAPJACK_DECKS or prompt]
  --owner      NAME        Owner of each game, seat 0  [default: env SLAPJACK_OWNER or player0]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  SLAPJACK_QUERY_DELAY_MS  Simulated registry latency  [default: 50]
  RUST_LOG                 Log filter                  [default: warn,slapjack=info,sj_cli=info]
  (A .env file in the working directory is loaded first)
";

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let config = CliConfig::from_env(
        pargs.opt_value_from_str("--players")?,
        pargs.opt_value_from_str("--decks")?,
        pargs.opt_value_from_str("--owner")?,
    );
    config.validate()?;

    // Catching signals for exit.
    set_handler(|| std::process::exit(0))?;

    logging::init();
    info!(
        "Starting hot-seat Slapjack (query delay {:?})",
        config.registry.query_delay
    );

    let registry = GameRegistry::new(config.registry.clone());
    let mut input = BufReader::new(tokio::io::stdin());
    let mut out = std::io::stdout();

    loop {
        writeln!(out, "{}", game::WELCOME)?;

        let num_decks = match config.num_decks {
            Some(n) => n,
            None => {
                let question = "How many decks? ";
                let parse = |line: &str| {
                    line.trim()
                        .parse::<usize>()
                        .ok()
                        .filter(|&n| validate_decks(n).is_ok())
                };
                match game::prompt(&mut input, &mut out, question, parse).await? {
                    Some(n) => n,
                    None => break,
                }
            }
        };

        let num_players = match config.num_players {
            Some(n) => n,
            None => {
                let question = "How many players? ";
                let parse = |line: &str| {
                    line.trim()
                        .parse::<usize>()
                        .ok()
                        .filter(|&n| validate_players(n, num_decks).is_ok())
                };
                match game::prompt(&mut input, &mut out, question, parse).await? {
                    Some(n) => n,
                    None => break,
                }
            }
        };

        game::play_round(
            &registry,
            &config.owner,
            num_players,
            num_decks,
            &mut input,
            &mut out,
        )
        .await?;

        let again = game::prompt(&mut input, &mut out, game::PLAY_AGAIN, |line| {
            Some(line.trim() == "y")
        })
        .await?;
        if again != Some(true) {
            break;
        }
    }

    info!("Goodbye");
    Ok(())
}
