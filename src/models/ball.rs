use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ScoringError;

/// Ball identifier (creation time in milliseconds, forced monotonic)
pub type BallId = i64;

/// Which of the two innings a ball belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Innings {
    First,
    Second,
}

impl Innings {
    /// Short ordinal used in history labels
    pub fn ordinal(&self) -> &'static str {
        match self {
            Innings::First => "1st",
            Innings::Second => "2nd",
        }
    }
}

/// Extra kind attached to a delivery
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ExtraType {
    #[default]
    None,
    Wide,
    NoBall,
}

impl ExtraType {
    pub fn is_extra(&self) -> bool {
        !matches!(self, ExtraType::None)
    }

    /// Wides and no-balls are not legal deliveries
    pub fn is_legal_delivery(&self) -> bool {
        !self.is_extra()
    }

    /// Scoreboard code ("WD", "NB")
    pub fn code(&self) -> &'static str {
        match self {
            ExtraType::None => "",
            ExtraType::Wide => "WD",
            ExtraType::NoBall => "NB",
        }
    }

    /// Human-readable name used in the history list
    pub fn label(&self) -> &'static str {
        match self {
            ExtraType::None => "",
            ExtraType::Wide => "Wide",
            ExtraType::NoBall => "No Ball",
        }
    }
}

impl FromStr for ExtraType {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "" => Ok(ExtraType::None),
            "wide" | "wd" => Ok(ExtraType::Wide),
            "noball" | "no-ball" | "no_ball" | "nb" => Ok(ExtraType::NoBall),
            other => Err(ScoringError::Validation(format!(
                "Unknown extra type: {}",
                other
            ))),
        }
    }
}

/// A single recorded delivery
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BallEvent {
    /// Unique ball identifier
    pub id: BallId,

    /// Innings the ball was bowled in
    pub innings: Innings,

    /// Completed overs when the ball was recorded (0-based)
    pub over: u32,

    /// Legal ball number within the over when recorded (1-based)
    pub ball: u32,

    /// Runs off the bat; `None` means no run value was entered
    pub runs: Option<u32>,

    /// Wide / no-ball marker
    pub extra_type: ExtraType,

    /// Whether a wicket fell on this ball
    pub is_wicket: bool,

    /// Free-text scorer note
    pub notes: Option<String>,

    /// When the ball was recorded
    pub timestamp: DateTime<Utc>,
}

impl BallEvent {
    pub fn runs_or_zero(&self) -> u32 {
        self.runs.unwrap_or(0)
    }

    pub fn is_legal(&self) -> bool {
        self.extra_type.is_legal_delivery()
    }

    /// Innings/over label, e.g. "1st 3.2"
    pub fn label(&self) -> String {
        format!("{} {}.{}", self.innings.ordinal(), self.over, self.ball)
    }

    /// History description, e.g. "No Ball + 2 runs + Wicket (run out)"
    pub fn describe(&self) -> String {
        let runs = self.runs_or_zero();
        let extra = self.extra_type.label();

        let mut details = match (self.is_wicket, self.extra_type.is_extra()) {
            (true, true) if runs > 0 => format!("{} + {} runs + Wicket", extra, runs),
            (true, true) => format!("{} + Wicket", extra),
            (true, false) => "Wicket".to_string(),
            (false, true) => format!("{} + {} runs", extra, runs),
            (false, false) => format!("{} runs", runs),
        };

        if let Some(notes) = self.notes.as_deref().filter(|n| !n.is_empty()) {
            details.push_str(&format!(" ({})", notes));
        }

        details
    }

    /// Field values for re-entry after an edit
    pub fn to_draft(&self) -> BallDraft {
        BallDraft {
            runs: self.runs,
            extra_type: self.extra_type,
            is_wicket: self.is_wicket,
            notes: self.notes.clone().unwrap_or_default(),
        }
    }
}

/// Ball fields handed back to the scorer for correction
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BallDraft {
    pub runs: Option<u32>,
    pub extra_type: ExtraType,
    pub is_wicket: bool,
    pub notes: String,
}
