//! Structured logging configuration.
//!
//! Library records emitted through `log` are forwarded into the same
//! subscriber.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "warn,slapjack=info,sj_cli=info";

/// Initialize structured logging
///
/// Logs go to stderr so they never interleave with the game prompts on
/// stdout. Levels are configurable via the `RUST_LOG` env var.
pub fn init() {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt_layer)
        .init();

    tracing::debug!("Structured logging initialized");
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Log the end of a round with structured fields
pub fn log_round_finished(game_id: &str, turns: usize, winners: &[usize]) {
    tracing::info!(
        game_id = game_id,
        turns = turns,
        winners = ?winners,
        "Round finished"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        io,
        sync::{Arc, Mutex},
    };

    /// Log sink shared between the subscriber and the test
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    fn test_default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }

    #[test]
    fn test_log_round_finished_records_fields() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            log_round_finished("game-1", 12, &[0, 2]);
        });

        let text = captured.text();
        assert!(text.contains("INFO"));
        assert!(text.contains("Round finished"));
        assert!(text.contains("game-1"));
        assert!(text.contains("turns=12"));
        assert!(text.contains("winners=[0, 2]"));
    }
}
