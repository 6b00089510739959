//! Reads one JSON activity per line (from a file argument or stdin), runs each
//! through [`CounterBot`] and prints the replies as JSON lines.
//!
//! ```text
//! echo '{"type":"message","channelId":"cli","recipient":{"id":"bot"},"conversation":{"id":"c1"},"from":{"id":"u1"},"text":"hi"}' \
//!   | cargo run --bin turn-counter
//! ```

use anyhow::{Context, Result};
use teams_ai::{Activity, CancellationToken, TurnContext};
use teams_example::{config::Config, logging::init_logging, storage::build_storage, CounterBot};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    init_logging(&config.logging);
    tracing::info!("Starting turn-counter bot");

    let storage = build_storage(&config).await?;
    let bot = CounterBot::new(storage, config.state.clone());

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown requested");
            shutdown.cancel();
        }
    });

    let input: Box<dyn AsyncRead + Unpin + Send> = match std::env::args().nth(1) {
        Some(path) => Box::new(
            tokio::fs::File::open(&path)
                .await
                .with_context(|| format!("Failed to open {}", path))?,
        ),
        None => Box::new(tokio::io::stdin()),
    };
    let mut lines = BufReader::new(input).lines();

    loop {
        let line = tokio::select! {
            _ = cancel.cancelled() => break,
            line = lines.next_line() => line?,
        };
        let Some(line) = line else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let activity: Activity = match serde_json::from_str(line) {
            Ok(activity) => activity,
            Err(e) => {
                tracing::warn!("Skipping malformed activity: {}", e);
                continue;
            }
        };

        let mut ctx = TurnContext::new(activity);
        match bot.on_turn(&mut ctx, &cancel).await {
            Ok(summary) => {
                tracing::debug!(written = ?summary.written, deleted = ?summary.deleted, "Turn complete");
            }
            Err(e) => {
                tracing::error!("Turn failed: {}", e);
                continue;
            }
        }

        for reply in ctx.responses() {
            println!("{}", serde_json::to_string(reply)?);
        }
    }

    tracing::info!("Input closed, exiting");
    Ok(())
}
