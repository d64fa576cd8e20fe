use serde::{Deserialize, Serialize};

use super::ball::{BallEvent, BallId, ExtraType, Innings};

/// Legal deliveries in an over
pub const BALLS_PER_OVER: u32 = 6;

/// Wickets that end an innings
pub const MAX_WICKETS: u32 = 10;

/// Match setup, fixed once the match starts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchConfig {
    /// Team batting first
    pub team_a: String,

    /// Team batting second
    pub team_b: String,

    /// Overs available to each side
    pub overs_per_innings: u32,

    /// Runs awarded automatically for a wide
    pub wide_extra_runs: u32,

    /// Runs awarded automatically for a no-ball
    pub no_ball_extra_runs: u32,
}

impl MatchConfig {
    /// Automatic runs for the given extra kind
    pub fn extra_runs(&self, extra_type: ExtraType) -> u32 {
        match extra_type {
            ExtraType::None => 0,
            ExtraType::Wide => self.wide_extra_runs,
            ExtraType::NoBall => self.no_ball_extra_runs,
        }
    }

    pub fn batting_team(&self, innings: Innings) -> &str {
        match innings {
            Innings::First => &self.team_a,
            Innings::Second => &self.team_b,
        }
    }

    /// A snapshot is only resumable when both teams are named
    pub fn has_teams(&self) -> bool {
        !self.team_a.trim().is_empty() && !self.team_b.trim().is_empty()
    }
}

/// Running figures for one innings
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct InningsTally {
    pub score: u32,
    pub wickets: u32,
    /// Completed overs
    pub overs: u32,
    /// Legal balls in the current over (0-5)
    pub balls: u32,
}

impl InningsTally {
    /// Score after adding the delivery, `None` when it would not fit in a `u32`
    pub fn score_with(&self, ball: &BallEvent, config: &MatchConfig) -> Option<u32> {
        self.score
            .checked_add(ball.runs_or_zero())?
            .checked_add(config.extra_runs(ball.extra_type))
    }

    /// Add one delivery to the tally
    pub fn apply(&mut self, ball: &BallEvent, config: &MatchConfig) {
        self.score = self
            .score
            .saturating_add(ball.runs_or_zero())
            .saturating_add(config.extra_runs(ball.extra_type));

        if ball.is_wicket {
            self.wickets += 1;
        }

        if ball.is_legal() {
            self.balls += 1;
            if self.balls >= BALLS_PER_OVER {
                self.overs += self.balls / BALLS_PER_OVER;
                self.balls %= BALLS_PER_OVER;
            }
        }
    }

    /// Rebuild a tally from deliveries in bowled order
    pub fn replay<'a, I>(balls: I, config: &MatchConfig) -> Self
    where
        I: IntoIterator<Item = &'a BallEvent>,
    {
        let mut tally = Self::default();
        for ball in balls {
            tally.apply(ball, config);
        }
        tally
    }

    pub fn legal_balls(&self) -> u32 {
        self.overs * BALLS_PER_OVER + self.balls
    }

    /// Overs in "O.B" form
    pub fn overs_display(&self) -> String {
        format!("{}.{}", self.overs, self.balls)
    }

    /// All out or overs exhausted
    pub fn is_finished(&self, overs_per_innings: u32) -> bool {
        self.wickets >= MAX_WICKETS || self.overs >= overs_per_innings
    }
}

/// Complete state of the match in progress
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchState {
    pub config: MatchConfig,

    /// Innings currently being scored
    pub current_innings: Innings,

    /// Archived first-innings figures (meaningful once the second innings starts)
    pub first_innings: InningsTally,

    /// Figures for the current innings
    pub current: InningsTally,

    /// Every ball of both innings, most recent first
    pub ball_history: Vec<BallEvent>,

    pub is_match_complete: bool,
}

impl MatchState {
    pub fn new(config: MatchConfig) -> Self {
        Self {
            config,
            current_innings: Innings::First,
            first_innings: InningsTally::default(),
            current: InningsTally::default(),
            ball_history: Vec::new(),
            is_match_complete: false,
        }
    }

    pub fn batting_team(&self) -> &str {
        self.config.batting_team(self.current_innings)
    }

    /// Runs the chasing side needs, only defined in the second innings
    pub fn target(&self) -> Option<u32> {
        match self.current_innings {
            Innings::First => None,
            Innings::Second => Some(self.first_innings.score.saturating_add(1)),
        }
    }

    /// Balls of one innings in the order they were bowled
    pub fn innings_balls(&self, innings: Innings) -> impl Iterator<Item = &BallEvent> + '_ {
        self.ball_history
            .iter()
            .rev()
            .filter(move |ball| ball.innings == innings)
    }

    /// First-innings balls are read-only once the chase has begun
    pub fn is_frozen(&self, ball: &BallEvent) -> bool {
        self.current_innings == Innings::Second && ball.innings == Innings::First
    }

    /// Highest ball id recorded so far
    pub fn last_ball_id(&self) -> Option<BallId> {
        self.ball_history.iter().map(|ball| ball.id).max()
    }
}
