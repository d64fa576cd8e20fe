use std::env;

use anyhow::{bail, Result};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use strike_board::config::Config;
use strike_board::db::SnapshotStore;
use strike_board::engine::MatchEngine;
use strike_board::models::{InningsTally, MatchState};
use strike_board::session::render;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "audit_snapshot=info,strike_board=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = env::args().collect();
    let fix = args.iter().any(|arg| arg == "--fix");

    let config = Config::from_env()?;
    let store = SnapshotStore::new(&config.database_url, &config.snapshot_key).await?;

    let Some(saved) = store.load().await? else {
        info!("No saved match to audit");
        return Ok(());
    };

    info!(
        "Auditing {} vs {} ({} balls)",
        saved.config.team_a,
        saved.config.team_b,
        saved.ball_history.len()
    );

    let mut engine = MatchEngine::new();
    engine.resume(saved.clone());
    engine.recalculate_match_state()?;

    let Some(replayed) = engine.state() else {
        bail!("Engine lost the resumed match");
    };

    let drift = compare(&saved, replayed);
    println!("{}", render::render_view(&engine.view()?));

    if drift.is_empty() {
        info!("Snapshot counters match the ball history");
        return Ok(());
    }

    for line in &drift {
        warn!("{}", line);
    }

    if fix {
        store.save(replayed).await?;
        info!("Saved recomputed counters");
        Ok(())
    } else {
        bail!(
            "{} counter(s) differ from the ball history (rerun with --fix to repair)",
            drift.len()
        );
    }
}

/// Describe every tally that differs between the stored and replayed state
fn compare(saved: &MatchState, replayed: &MatchState) -> Vec<String> {
    let mut drift = Vec::new();

    let pairs = [
        ("first innings", saved.first_innings, replayed.first_innings),
        ("current innings", saved.current, replayed.current),
    ];

    for (name, stored, recomputed) in pairs {
        if stored != recomputed {
            drift.push(format!(
                "{}: stored {} replayed {}",
                name,
                summarize(&stored),
                summarize(&recomputed)
            ));
        }
    }

    drift
}

fn summarize(tally: &InningsTally) -> String {
    format!("{}/{} ({})", tally.score, tally.wickets, tally.overs_display())
}
