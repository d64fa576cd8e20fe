use anyhow::Result;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use strike_board::config::Config;
use strike_board::db::SnapshotStore;
use strike_board::session::{command::HELP, ScorerSession};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "strike_board=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting strike-board");

    // Load configuration
    let config = Config::from_env()?;
    info!("Configuration loaded");

    // Initialize database
    let store = SnapshotStore::new(&config.database_url, &config.snapshot_key).await?;

    let mut session = ScorerSession::new(store, config);

    // Resume straight into scoring when a match was saved
    match session.resume().await? {
        Some(scoreboard) => println!("{}", scoreboard),
        None => println!("{}", HELP),
    }

    let input = BufReader::new(tokio::io::stdin());

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        _ = session.run(input) => {}
    }

    info!("Shutting down strike-board");
    Ok(())
}
