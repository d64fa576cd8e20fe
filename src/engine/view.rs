use crate::models::{
    BallIndicator, DisplayView, HistoryEntry, MatchResult, MatchState, TargetView,
    BALLS_PER_OVER,
};

/// Derive the scoreboard from match state
pub fn build_view(state: &MatchState) -> DisplayView {
    let target = state.target().map(|target| {
        let overs_left = state
            .config
            .overs_per_innings
            .saturating_sub(state.current.overs);

        TargetView {
            target,
            runs_needed: target as i64 - state.current.score as i64,
            balls_left: (overs_left * BALLS_PER_OVER).saturating_sub(state.current.balls),
        }
    });

    let history = state
        .ball_history
        .iter()
        .map(|ball| HistoryEntry {
            ball_id: ball.id,
            innings: ball.innings,
            label: ball.label(),
            description: ball.describe(),
            editable: !state.is_frozen(ball),
        })
        .collect();

    DisplayView {
        batting_team: state.batting_team().to_string(),
        innings: state.current_innings,
        score: state.current.score,
        wickets: state.current.wickets,
        overs: state.current.overs_display(),
        target,
        current_over: current_over(state),
        history,
        is_match_complete: state.is_match_complete,
        result: state
            .is_match_complete
            .then(|| MatchResult::from_state(state)),
    }
}

/// Indicators for the active over, padded with empties up to six legal balls
pub fn current_over(state: &MatchState) -> Vec<BallIndicator> {
    let balls: Vec<_> = state
        .innings_balls(state.current_innings)
        .filter(|ball| ball.over == state.current.overs)
        .collect();

    let legal = balls.iter().filter(|ball| ball.is_legal()).count() as u32;

    let mut indicators: Vec<BallIndicator> =
        balls.into_iter().map(BallIndicator::for_ball).collect();
    for _ in legal..BALLS_PER_OVER {
        indicators.push(BallIndicator::empty());
    }

    indicators
}
