use serde::{Deserialize, Serialize};

use super::ball::Innings;
use super::match_state::{InningsTally, MatchState, MAX_WICKETS};

/// How the match was decided
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum MatchOutcome {
    /// Side batting first defended its total
    TeamAWon { runs: u32 },
    /// Chasing side reached the target
    TeamBWon { wickets: u32 },
    Tied,
}

/// Final result of a completed match
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchResult {
    pub team_a: String,
    pub team_b: String,
    pub team_a_score: u32,
    pub team_a_wickets: u32,
    pub team_b_score: u32,
    pub team_b_wickets: u32,
    pub outcome: MatchOutcome,
}

impl MatchResult {
    /// Team A always bats first, whichever innings is current
    pub fn from_state(state: &MatchState) -> Self {
        let (team_a, team_b) = match state.current_innings {
            Innings::First => (state.current, InningsTally::default()),
            Innings::Second => (state.first_innings, state.current),
        };

        let outcome = if team_a.score > team_b.score {
            MatchOutcome::TeamAWon {
                runs: team_a.score - team_b.score,
            }
        } else if team_b.score > team_a.score {
            MatchOutcome::TeamBWon {
                wickets: MAX_WICKETS.saturating_sub(team_b.wickets),
            }
        } else {
            MatchOutcome::Tied
        };

        Self {
            team_a: state.config.team_a.clone(),
            team_b: state.config.team_b.clone(),
            team_a_score: team_a.score,
            team_a_wickets: team_a.wickets,
            team_b_score: team_b.score,
            team_b_wickets: team_b.wickets,
            outcome,
        }
    }

    pub fn winner(&self) -> Option<&str> {
        match self.outcome {
            MatchOutcome::TeamAWon { .. } => Some(&self.team_a),
            MatchOutcome::TeamBWon { .. } => Some(&self.team_b),
            MatchOutcome::Tied => None,
        }
    }

    /// e.g. "Lions Wins!"
    pub fn headline(&self) -> String {
        match self.winner() {
            Some(team) => format!("{} Wins!", team),
            None => "Match Tied!".to_string(),
        }
    }

    /// e.g. "Tigers won by 7 wickets"
    pub fn message(&self) -> String {
        match self.outcome {
            MatchOutcome::TeamAWon { runs } => format!("{} won by {} runs", self.team_a, runs),
            MatchOutcome::TeamBWon { wickets } => {
                format!("{} won by {} wickets", self.team_b, wickets)
            }
            MatchOutcome::Tied => "Both teams scored the same number of runs".to_string(),
        }
    }
}
