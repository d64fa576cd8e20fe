use std::env;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database path
    pub database_url: String,

    /// Key the match snapshot is stored under
    pub snapshot_key: String,

    /// Overs per innings when `start` omits them
    pub default_overs: u32,

    /// Automatic runs for a wide when `start` omits them
    pub default_wide_extra: u32,

    /// Automatic runs for a no-ball when `start` omits them
    pub default_no_ball_extra: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Config {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:data/strike_board.db".to_string()),

            snapshot_key: env::var("SNAPSHOT_KEY").unwrap_or_else(|_| "strike_board".to_string()),

            default_overs: env::var("DEFAULT_OVERS")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .context("DEFAULT_OVERS must be a valid number")?,

            default_wide_extra: env::var("DEFAULT_WIDE_EXTRA")
                .unwrap_or_else(|_| "1".to_string())
                .parse()
                .context("DEFAULT_WIDE_EXTRA must be a valid number")?,

            default_no_ball_extra: env::var("DEFAULT_NO_BALL_EXTRA")
                .unwrap_or_else(|_| "1".to_string())
                .parse()
                .context("DEFAULT_NO_BALL_EXTRA must be a valid number")?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite:data/strike_board.db".to_string(),
            snapshot_key: "strike_board".to_string(),
            default_overs: 20,
            default_wide_extra: 1,
            default_no_ball_extra: 1,
        }
    }
}
