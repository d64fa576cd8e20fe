use serde::{Deserialize, Serialize};

use super::ball::{BallEvent, BallId, Innings};
use super::result::MatchResult;

/// Everything a host needs to draw the scoreboard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplayView {
    pub batting_team: String,
    pub innings: Innings,
    pub score: u32,
    pub wickets: u32,
    /// "O.B"
    pub overs: String,
    /// Chase figures, second innings only
    pub target: Option<TargetView>,
    /// Balls of the active over in bowled order, padded to six legal slots
    pub current_over: Vec<BallIndicator>,
    /// Most recent first
    pub history: Vec<HistoryEntry>,
    pub is_match_complete: bool,
    pub result: Option<MatchResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TargetView {
    pub target: u32,
    /// Goes negative when the winning hit overshoots
    pub runs_needed: i64,
    pub balls_left: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorKind {
    Runs,
    Wicket,
    Extra,
    Empty,
}

/// One slot in the current-over strip
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BallIndicator {
    pub text: String,
    pub kind: IndicatorKind,
}

impl BallIndicator {
    pub fn for_ball(ball: &BallEvent) -> Self {
        let runs = ball.runs_or_zero();
        let code = ball.extra_type.code();

        let (text, kind) = match (ball.is_wicket, ball.extra_type.is_extra()) {
            (true, true) if runs > 0 => (format!("{}{}/W", runs, code), IndicatorKind::Wicket),
            (true, true) => (format!("W/{}", code), IndicatorKind::Wicket),
            (true, false) => ("W".to_string(), IndicatorKind::Wicket),
            (false, true) if runs > 0 => (format!("{}{}", runs, code), IndicatorKind::Extra),
            (false, true) => (code.to_string(), IndicatorKind::Extra),
            (false, false) => (runs.to_string(), IndicatorKind::Runs),
        };

        Self { text, kind }
    }

    pub fn empty() -> Self {
        Self {
            text: "•".to_string(),
            kind: IndicatorKind::Empty,
        }
    }
}

/// A row in the ball history list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryEntry {
    pub ball_id: BallId,
    pub innings: Innings,
    /// e.g. "2nd 4.3"
    pub label: String,
    pub description: String,
    /// Edit and delete are both governed by this flag
    pub editable: bool,
}
