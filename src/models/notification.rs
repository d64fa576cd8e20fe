use serde::{Deserialize, Serialize};

use super::match_state::MatchState;
use super::result::MatchResult;

/// Events the engine pushes to the host
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum MatchNotification {
    /// First innings just ended; the host must hold ball entry until acknowledged
    InningsBreak(InningsBreak),
    /// The last recorded ball decided the match
    MatchComplete(MatchResult),
}

/// Summary shown between the innings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InningsBreak {
    pub batting_first: String,
    pub chasing_team: String,
    pub first_innings_score: u32,
    pub first_innings_wickets: u32,
    pub target: u32,
    pub overs_available: u32,
    /// Runs per over needed, rounded to 2 decimals
    pub required_run_rate: f64,
}

impl InningsBreak {
    /// Built from a state whose first innings has just been archived
    pub fn from_state(state: &MatchState) -> Self {
        let target = state.first_innings.score + 1;
        let overs = state.config.overs_per_innings;

        Self {
            batting_first: state.config.team_a.clone(),
            chasing_team: state.config.team_b.clone(),
            first_innings_score: state.first_innings.score,
            first_innings_wickets: state.first_innings.wickets,
            target,
            overs_available: overs,
            required_run_rate: round2(target as f64 / overs as f64),
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
