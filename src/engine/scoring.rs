//! Per-ball scoring rules shared by live recording and full recompute.

use tracing::{debug, info};

use crate::models::{BallEvent, Innings, InningsBreak, InningsTally, MatchState};

/// Apply a freshly recorded ball to the current innings and push it onto history
pub fn apply_ball(state: &mut MatchState, ball: BallEvent) {
    state.current.apply(&ball, &state.config);
    state.ball_history.insert(0, ball);
}

/// End the first innings or the match once wickets or overs run out.
///
/// Returns the innings break summary when the chase is about to begin.
pub fn check_innings_end(state: &mut MatchState) -> Option<InningsBreak> {
    if !state.current.is_finished(state.config.overs_per_innings) {
        return None;
    }

    match state.current_innings {
        Innings::First => {
            state.first_innings = state.current;
            state.current = InningsTally::default();
            state.current_innings = Innings::Second;

            let summary = InningsBreak::from_state(state);
            info!(
                "Innings break | {} {}/{} | {} need {} from {} overs",
                summary.batting_first,
                summary.first_innings_score,
                summary.first_innings_wickets,
                summary.chasing_team,
                summary.target,
                summary.overs_available,
            );
            Some(summary)
        }
        Innings::Second => {
            state.is_match_complete = true;
            None
        }
    }
}

/// Chasing side has passed the target
pub fn check_win_condition(state: &mut MatchState) {
    if let Some(target) = state.target() {
        if state.current.score >= target {
            state.is_match_complete = true;
        }
    }
}

/// Rebuild every counter from ball history.
///
/// Never moves the innings forward and never sets the completion flag.
pub fn recalculate(state: &mut MatchState) {
    if state.current_innings == Innings::Second {
        state.first_innings =
            InningsTally::replay(state.innings_balls(Innings::First), &state.config);
    }

    state.current = InningsTally::replay(
        state.innings_balls(state.current_innings),
        &state.config,
    );

    debug!(
        "Recalculated {} innings: {}/{} ({})",
        state.current_innings.ordinal(),
        state.current.score,
        state.current.wickets,
        state.current.overs_display(),
    );
}

/// Re-derive completion after balls were removed.
///
/// Removing balls can only lower the figures, so this may reopen a finished
/// match but never closes one.
pub fn rederive_completion(state: &mut MatchState) {
    if !state.is_match_complete || state.current_innings == Innings::First {
        return;
    }

    let innings_over = state.current.is_finished(state.config.overs_per_innings);
    let target_reached = state
        .target()
        .is_some_and(|target| state.current.score >= target);

    if !innings_over && !target_reached {
        info!("Match reopened after ball removal");
        state.is_match_complete = false;
    }
}
