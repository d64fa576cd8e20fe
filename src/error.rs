use thiserror::Error;

use crate::models::BallId;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ScoringError {
    /// Bad input from the scorer; nothing was changed
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Cannot edit first innings ball {ball_id} once second innings has started")]
    IllegalEdit { ball_id: BallId },

    #[error("Ball not found: {ball_id}")]
    BallNotFound { ball_id: BallId },

    #[error("No match in progress")]
    NoActiveMatch,

    /// Unreadable snapshot; callers treat this as "no saved match"
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<serde_json::Error> for ScoringError {
    fn from(err: serde_json::Error) -> Self {
        ScoringError::Storage(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ScoringError>;
