use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::{Result, ScoringError};
use crate::models::{
    BallDraft, BallEvent, BallId, DisplayView, ExtraType, Innings, MatchConfig,
    MatchNotification, MatchResult, MatchState,
};

use super::scoring;
use super::view;

/// Ball removed by `edit_ball`, waiting for its corrected replacement
#[derive(Debug, Clone)]
struct PendingEdit {
    ball: BallEvent,
}

/// Owns the match in progress and applies every scoring rule
pub struct MatchEngine {
    state: Option<MatchState>,
    pending_edit: Option<PendingEdit>,
    notifier: Option<mpsc::UnboundedSender<MatchNotification>>,
    last_ball_id: BallId,
}

impl MatchEngine {
    /// Create an engine with no match loaded
    pub fn new() -> Self {
        Self {
            state: None,
            pending_edit: None,
            notifier: None,
            last_ball_id: 0,
        }
    }

    /// Create an engine that pushes innings-break and result notifications
    pub fn with_notifier(notifier: mpsc::UnboundedSender<MatchNotification>) -> Self {
        Self {
            notifier: Some(notifier),
            ..Self::new()
        }
    }

    pub fn state(&self) -> Option<&MatchState> {
        self.state.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.state.is_some()
    }

    pub fn has_pending_edit(&self) -> bool {
        self.pending_edit.is_some()
    }

    /// Load a saved match as-is; its counters are trusted
    pub fn resume(&mut self, state: MatchState) {
        info!(
            "Resuming {} vs {} ({} innings, {} balls recorded)",
            state.config.team_a,
            state.config.team_b,
            state.current_innings.ordinal(),
            state.ball_history.len()
        );

        self.last_ball_id = state.last_ball_id().unwrap_or(0);
        self.pending_edit = None;
        self.state = Some(state);
    }

    /// Drop the current match entirely
    pub fn reset(&mut self) {
        self.state = None;
        self.pending_edit = None;
        self.last_ball_id = 0;
    }

    /// Start a fresh match, discarding whatever was loaded
    pub fn start_match(
        &mut self,
        team_a: &str,
        team_b: &str,
        overs_per_innings: u32,
        wide_extra_runs: u32,
        no_ball_extra_runs: u32,
    ) -> Result<&MatchState> {
        let team_a = team_a.trim();
        let team_b = team_b.trim();

        if team_a.is_empty() || team_b.is_empty() {
            return Err(ScoringError::Validation(
                "Please enter both team names".to_string(),
            ));
        }

        if overs_per_innings == 0 {
            return Err(ScoringError::Validation(
                "Overs per innings must be at least 1".to_string(),
            ));
        }

        let config = MatchConfig {
            team_a: team_a.to_string(),
            team_b: team_b.to_string(),
            overs_per_innings,
            wide_extra_runs,
            no_ball_extra_runs,
        };

        info!(
            "Starting match: {} vs {} ({} overs, wide +{}, no-ball +{})",
            config.team_a, config.team_b, overs_per_innings, wide_extra_runs, no_ball_extra_runs
        );

        self.reset();
        Ok(&*self.state.insert(MatchState::new(config)))
    }

    /// Record one delivery for the batting side
    pub fn record_ball(
        &mut self,
        runs: Option<u32>,
        extra_type: ExtraType,
        is_wicket: bool,
        notes: &str,
    ) -> Result<BallEvent> {
        let state = self.state.as_mut().ok_or(ScoringError::NoActiveMatch)?;

        if state.is_match_complete {
            return Err(ScoringError::Validation(
                "Match is already complete".to_string(),
            ));
        }

        if extra_type == ExtraType::None && !is_wicket && runs.is_none() {
            return Err(ScoringError::Validation(
                "Please select runs, extra, or wicket".to_string(),
            ));
        }

        let notes = notes.trim();
        let ball = BallEvent {
            id: next_ball_id(&mut self.last_ball_id),
            innings: state.current_innings,
            over: state.current.overs,
            ball: state.current.balls + 1,
            runs,
            extra_type,
            is_wicket,
            notes: (!notes.is_empty()).then(|| notes.to_string()),
            timestamp: Utc::now(),
        };

        if state.current.score_with(&ball, &state.config).is_none() {
            return Err(ScoringError::Validation(format!(
                "{} runs is more than the scoreboard can hold",
                ball.runs_or_zero()
            )));
        }

        scoring::apply_ball(state, ball.clone());

        debug!(
            "Ball {} | {} | {} {}/{} ({})",
            ball.id,
            ball.describe(),
            state.batting_team(),
            state.current.score,
            state.current.wickets,
            state.current.overs_display(),
        );

        let mut notifications = Vec::new();

        if let Some(summary) = scoring::check_innings_end(state) {
            notifications.push(MatchNotification::InningsBreak(summary));
        }
        scoring::check_win_condition(state);

        if state.is_match_complete {
            let result = MatchResult::from_state(state);
            info!("Match complete: {}", result.message());
            notifications.push(MatchNotification::MatchComplete(result));
        }

        if let Some(edit) = self.pending_edit.take() {
            debug!("Ball {} replaced by ball {}", edit.ball.id, ball.id);
        }

        for notification in notifications {
            self.notify(notification);
        }

        Ok(ball)
    }

    /// Remove a ball and hand back its fields for corrected re-entry.
    ///
    /// The removed ball stays recoverable through `cancel_edit` until the next
    /// ball is recorded.
    pub fn edit_ball(&mut self, ball_id: BallId) -> Result<BallDraft> {
        if let Some(edit) = &self.pending_edit {
            return Err(ScoringError::Validation(format!(
                "Ball {} is still being edited; record its replacement or cancel first",
                edit.ball.id
            )));
        }

        let state = self.state.as_mut().ok_or(ScoringError::NoActiveMatch)?;

        let position = state
            .ball_history
            .iter()
            .position(|ball| ball.id == ball_id)
            .ok_or(ScoringError::BallNotFound { ball_id })?;

        if state.is_frozen(&state.ball_history[position]) {
            return Err(ScoringError::IllegalEdit { ball_id });
        }

        let ball = state.ball_history.remove(position);
        scoring::recalculate(state);
        scoring::rederive_completion(state);

        info!("Editing ball {} ({})", ball.id, ball.label());

        let draft = ball.to_draft();
        self.pending_edit = Some(PendingEdit { ball });
        Ok(draft)
    }

    /// Put back the ball taken out by `edit_ball`.
    ///
    /// Returns the restored ball id, or `None` when no edit was pending.
    pub fn cancel_edit(&mut self) -> Result<Option<BallId>> {
        let state = self.state.as_mut().ok_or(ScoringError::NoActiveMatch)?;

        let Some(edit) = self.pending_edit.take() else {
            return Ok(None);
        };

        // History is newest first and ids only grow, so slot back in by id
        let ball_id = edit.ball.id;
        let position = state
            .ball_history
            .iter()
            .position(|ball| ball.id < ball_id)
            .unwrap_or(state.ball_history.len());
        state.ball_history.insert(position, edit.ball);
        scoring::recalculate(state);

        // The restored ball may be the one that decided the match
        let was_complete = state.is_match_complete;
        if state.current_innings == Innings::Second {
            if state.current.is_finished(state.config.overs_per_innings) {
                state.is_match_complete = true;
            }
            scoring::check_win_condition(state);
        }

        let result = (!was_complete && state.is_match_complete)
            .then(|| MatchResult::from_state(state));

        info!("Edit cancelled, ball {} restored", ball_id);

        if let Some(result) = result {
            info!("Match complete: {}", result.message());
            self.notify(MatchNotification::MatchComplete(result));
        }

        Ok(Some(ball_id))
    }

    /// Delete a ball and recompute. Returns `false` when no such ball exists.
    ///
    /// Refused while an edit is pending, since the ball under edit is absent
    /// from history until it is replaced or restored.
    pub fn delete_ball(&mut self, ball_id: BallId) -> Result<bool> {
        if let Some(edit) = &self.pending_edit {
            return Err(ScoringError::Validation(format!(
                "Ball {} is still being edited; record its replacement or cancel first",
                edit.ball.id
            )));
        }

        let state = self.state.as_mut().ok_or(ScoringError::NoActiveMatch)?;

        let Some(position) = state.ball_history.iter().position(|b| b.id == ball_id) else {
            warn!("Delete ignored, ball {} not found", ball_id);
            return Ok(false);
        };

        if state.is_frozen(&state.ball_history[position]) {
            return Err(ScoringError::IllegalEdit { ball_id });
        }

        let ball = state.ball_history.remove(position);
        scoring::recalculate(state);
        scoring::rederive_completion(state);

        info!("Deleted ball {} ({}: {})", ball.id, ball.label(), ball.describe());
        Ok(true)
    }

    /// Rebuild all counters from ball history
    pub fn recalculate_match_state(&mut self) -> Result<()> {
        let state = self.state.as_mut().ok_or(ScoringError::NoActiveMatch)?;
        scoring::recalculate(state);
        Ok(())
    }

    /// Scoreboard for the current state
    pub fn view(&self) -> Result<DisplayView> {
        let state = self.state.as_ref().ok_or(ScoringError::NoActiveMatch)?;
        Ok(view::build_view(state))
    }

    /// Result computed from both innings' figures
    pub fn match_result(&self) -> Result<MatchResult> {
        let state = self.state.as_ref().ok_or(ScoringError::NoActiveMatch)?;
        Ok(MatchResult::from_state(state))
    }

    fn notify(&self, notification: MatchNotification) {
        if let Some(tx) = &self.notifier {
            if let Err(e) = tx.send(notification) {
                warn!("Failed to send match notification: {}", e);
            }
        }
    }
}

impl Default for MatchEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Millisecond timestamp, bumped past the previous id when the clock hasn't moved
fn next_ball_id(last: &mut BallId) -> BallId {
    let id = Utc::now().timestamp_millis().max(*last + 1);
    *last = id;
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IndicatorKind, MatchOutcome};

    fn engine(overs: u32) -> MatchEngine {
        let mut engine = MatchEngine::new();
        engine.start_match("Lions", "Tigers", overs, 1, 1).unwrap();
        engine
    }

    fn runs(engine: &mut MatchEngine, runs: u32) -> BallEvent {
        engine
            .record_ball(Some(runs), ExtraType::None, false, "")
            .unwrap()
    }

    fn state(engine: &MatchEngine) -> &MatchState {
        engine.state().unwrap()
    }

    #[test]
    fn test_start_match_validates_teams() {
        let mut engine = MatchEngine::new();
        assert!(matches!(
            engine.start_match("  ", "Tigers", 20, 1, 1),
            Err(ScoringError::Validation(_))
        ));
        assert!(matches!(
            engine.start_match("Lions", "Tigers", 0, 1, 1),
            Err(ScoringError::Validation(_))
        ));
        assert!(!engine.is_active());

        let state = engine.start_match(" Lions ", "Tigers", 20, 1, 1).unwrap();
        assert_eq!(state.config.team_a, "Lions");
        assert_eq!(state.current_innings, Innings::First);
        assert!(state.ball_history.is_empty());
    }

    #[test]
    fn test_start_match_discards_previous() {
        let mut engine = engine(20);
        runs(&mut engine, 4);

        engine.start_match("Eagles", "Hawks", 10, 2, 2).unwrap();
        assert_eq!(state(&engine).current.score, 0);
        assert!(state(&engine).ball_history.is_empty());
        assert_eq!(state(&engine).config.team_a, "Eagles");
    }

    #[test]
    fn test_record_requires_selection() {
        let mut engine = engine(20);
        let err = engine
            .record_ball(None, ExtraType::None, false, "")
            .unwrap_err();
        assert!(matches!(err, ScoringError::Validation(_)));
        assert!(state(&engine).ball_history.is_empty());

        // Dot ball, wicket without runs and a bare wide are all accepted
        engine.record_ball(Some(0), ExtraType::None, false, "").unwrap();
        engine.record_ball(None, ExtraType::None, true, "").unwrap();
        engine.record_ball(None, ExtraType::Wide, false, "").unwrap();
        assert_eq!(state(&engine).ball_history.len(), 3);
        assert_eq!(state(&engine).current.score, 1);
        assert_eq!(state(&engine).current.wickets, 1);
    }

    #[test]
    fn test_record_without_match() {
        let mut engine = MatchEngine::new();
        assert_eq!(
            engine
                .record_ball(Some(1), ExtraType::None, false, "")
                .unwrap_err(),
            ScoringError::NoActiveMatch
        );
    }

    #[test]
    fn test_ball_numbers_and_ids() {
        let mut engine = engine(20);
        let first = runs(&mut engine, 1);
        let wide = engine
            .record_ball(Some(0), ExtraType::Wide, false, " fired down leg ")
            .unwrap();
        let second = runs(&mut engine, 2);

        assert_eq!((first.over, first.ball), (0, 1));
        assert_eq!((wide.over, wide.ball), (0, 2));
        assert_eq!((second.over, second.ball), (0, 2));
        assert!(first.id < wide.id && wide.id < second.id);
        assert_eq!(wide.notes.as_deref(), Some("fired down leg"));
        assert_eq!(first.notes, None);

        // Most recent first
        assert_eq!(state(&engine).ball_history[0].id, second.id);
    }

    #[test]
    fn test_wides_never_advance_the_over() {
        let mut engine = MatchEngine::new();
        engine.start_match("Lions", "Tigers", 20, 2, 1).unwrap();
        for _ in 0..6 {
            engine.record_ball(None, ExtraType::Wide, false, "").unwrap();
        }

        let state = state(&engine);
        assert_eq!(state.current.balls, 0);
        assert_eq!(state.current.overs, 0);
        assert_eq!(state.current.score, 12);
    }

    #[test]
    fn test_legal_ball_count_matches_history() {
        let mut engine = engine(20);
        let extras = [
            ExtraType::None,
            ExtraType::Wide,
            ExtraType::None,
            ExtraType::NoBall,
            ExtraType::None,
            ExtraType::None,
            ExtraType::None,
            ExtraType::None,
            ExtraType::Wide,
            ExtraType::None,
        ];
        for extra in extras {
            engine.record_ball(Some(1), extra, false, "").unwrap();
        }

        let state = state(&engine);
        let legal = state
            .innings_balls(Innings::First)
            .filter(|b| b.is_legal())
            .count() as u32;
        assert_eq!(state.current.overs * 6 + state.current.balls, legal);
        assert_eq!(state.current.overs_display(), "1.1");
    }

    #[test]
    fn test_innings_break_after_overs() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut engine = MatchEngine::with_notifier(tx);
        engine.start_match("Lions", "Tigers", 2, 1, 1).unwrap();

        for i in 0..11 {
            runs(&mut engine, i % 3);
            assert_eq!(state(&engine).current_innings, Innings::First);
        }
        assert!(rx.try_recv().is_err());

        runs(&mut engine, 4);
        let state = state(&engine);
        assert_eq!(state.current_innings, Innings::Second);
        assert_eq!(state.first_innings.score, 14);
        assert_eq!(state.current.score, 0);
        assert_eq!(state.current.overs_display(), "0.0");

        match rx.try_recv().unwrap() {
            MatchNotification::InningsBreak(summary) => {
                assert_eq!(summary.target, 15);
                assert_eq!(summary.overs_available, 2);
                assert_eq!(summary.required_run_rate, 7.5);
            }
            other => panic!("unexpected notification: {:?}", other),
        }
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_innings_break_on_all_out() {
        let mut engine = engine(20);
        runs(&mut engine, 6);
        for _ in 0..10 {
            engine.record_ball(None, ExtraType::None, true, "").unwrap();
        }

        let state = state(&engine);
        assert_eq!(state.current_innings, Innings::Second);
        assert_eq!(state.first_innings.score, 6);
        assert_eq!(state.first_innings.wickets, 10);
        assert_eq!(state.first_innings.overs_display(), "1.5");
    }

    #[test]
    fn test_target_reached_with_overs_left() {
        let mut engine = engine(20);
        {
            let state = engine.state.as_mut().unwrap();
            state.current_innings = Innings::Second;
            state.first_innings.score = 150;
            state.current.score = 147;
            state.current.overs = 10;
            state.current.balls = 2;
        }

        runs(&mut engine, 4);
        assert!(state(&engine).is_match_complete);
        assert_eq!(state(&engine).current.overs_display(), "10.3");

        let result = engine.match_result().unwrap();
        assert_eq!(result.outcome, MatchOutcome::TeamBWon { wickets: 10 });
    }

    #[test]
    fn test_example_match() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut engine = MatchEngine::with_notifier(tx);
        engine.start_match("Lions", "Tigers", 1, 1, 1).unwrap();

        for _ in 0..6 {
            runs(&mut engine, 1);
        }
        assert_eq!(state(&engine).current_innings, Innings::Second);
        assert_eq!(state(&engine).first_innings.score, 6);
        assert!(matches!(
            rx.try_recv().unwrap(),
            MatchNotification::InningsBreak(_)
        ));

        for _ in 0..3 {
            runs(&mut engine, 2);
            assert!(!state(&engine).is_match_complete);
        }
        runs(&mut engine, 2);
        assert!(state(&engine).is_match_complete);
        assert_eq!(state(&engine).current.score, 8);

        match rx.try_recv().unwrap() {
            MatchNotification::MatchComplete(result) => {
                assert_eq!(result.message(), "Tigers won by 10 wickets");
            }
            other => panic!("unexpected notification: {:?}", other),
        }

        let err = runs_err(&mut engine);
        assert!(matches!(err, ScoringError::Validation(_)));
    }

    fn runs_err(engine: &mut MatchEngine) -> ScoringError {
        engine
            .record_ball(Some(1), ExtraType::None, false, "")
            .unwrap_err()
    }

    #[test]
    fn test_second_innings_all_out_defends_total() {
        let mut engine = engine(5);
        for _ in 0..30 {
            runs(&mut engine, 1);
        }
        assert_eq!(state(&engine).first_innings.score, 30);

        runs(&mut engine, 4);
        for _ in 0..10 {
            engine.record_ball(None, ExtraType::None, true, "").unwrap();
        }

        assert!(state(&engine).is_match_complete);
        let result = engine.match_result().unwrap();
        assert_eq!(result.outcome, MatchOutcome::TeamAWon { runs: 26 });
    }

    #[test]
    fn test_delete_then_redo_restores_counters() {
        let mut engine = engine(20);
        runs(&mut engine, 1);
        engine.record_ball(Some(2), ExtraType::NoBall, false, "").unwrap();
        let last = engine
            .record_ball(Some(1), ExtraType::None, true, "caught")
            .unwrap();
        let before = state(&engine).current;

        assert!(engine.delete_ball(last.id).unwrap());
        assert_ne!(state(&engine).current, before);

        engine
            .record_ball(Some(1), ExtraType::None, true, "caught")
            .unwrap();
        assert_eq!(state(&engine).current, before);
    }

    #[test]
    fn test_delete_unknown_ball_is_noop() {
        let mut engine = engine(20);
        runs(&mut engine, 3);
        assert!(!engine.delete_ball(42).unwrap());
        assert_eq!(state(&engine).current.score, 3);
    }

    #[test]
    fn test_recalculate_is_idempotent() {
        let mut engine = engine(3);
        for i in 0..20 {
            let extra = if i % 5 == 0 { ExtraType::Wide } else { ExtraType::None };
            engine.record_ball(Some(i % 4), extra, i % 7 == 0, "").unwrap();
        }
        let live = state(&engine).clone();

        engine.recalculate_match_state().unwrap();
        let once = state(&engine).clone();
        engine.recalculate_match_state().unwrap();

        assert_eq!(state(&engine), &once);
        assert_eq!(once.current, live.current);
        assert_eq!(once.first_innings, live.first_innings);
    }

    #[test]
    fn test_first_innings_frozen_in_chase() {
        let mut engine = engine(1);
        let opener = runs(&mut engine, 4);
        for _ in 0..5 {
            runs(&mut engine, 1);
        }
        assert_eq!(state(&engine).current_innings, Innings::Second);

        assert_eq!(
            engine.delete_ball(opener.id).unwrap_err(),
            ScoringError::IllegalEdit { ball_id: opener.id }
        );
        assert_eq!(
            engine.edit_ball(opener.id).unwrap_err(),
            ScoringError::IllegalEdit { ball_id: opener.id }
        );
        assert_eq!(state(&engine).first_innings.score, 9);
        assert_eq!(state(&engine).ball_history.len(), 6);

        let view = engine.view().unwrap();
        assert!(view.history.iter().all(|entry| !entry.editable));

        let chase = runs(&mut engine, 2);
        let view = engine.view().unwrap();
        assert!(view.history[0].editable);
        assert_eq!(view.history[0].ball_id, chase.id);
    }

    #[test]
    fn test_edit_returns_draft_and_removes_ball() {
        let mut engine = engine(20);
        runs(&mut engine, 1);
        let ball = engine
            .record_ball(Some(2), ExtraType::NoBall, true, "run out")
            .unwrap();

        let draft = engine.edit_ball(ball.id).unwrap();
        assert_eq!(draft.runs, Some(2));
        assert_eq!(draft.extra_type, ExtraType::NoBall);
        assert!(draft.is_wicket);
        assert_eq!(draft.notes, "run out");
        assert!(engine.has_pending_edit());
        assert_eq!(state(&engine).current.score, 1);
        assert_eq!(state(&engine).current.wickets, 0);

        // A second edit must wait for the first to settle
        assert!(matches!(
            engine.edit_ball(ball.id),
            Err(ScoringError::Validation(_))
        ));

        engine
            .record_ball(Some(3), ExtraType::NoBall, true, "run out")
            .unwrap();
        assert!(!engine.has_pending_edit());
        assert_eq!(state(&engine).current.score, 5);
        assert_eq!(engine.cancel_edit().unwrap(), None);
    }

    #[test]
    fn test_edit_unknown_ball() {
        let mut engine = engine(20);
        assert_eq!(
            engine.edit_ball(7).unwrap_err(),
            ScoringError::BallNotFound { ball_id: 7 }
        );
    }

    #[test]
    fn test_cancel_edit_restores_ball() {
        let mut engine = engine(20);
        let a = runs(&mut engine, 1);
        let b = runs(&mut engine, 4);
        let c = runs(&mut engine, 2);
        let before = state(&engine).clone();

        engine.edit_ball(b.id).unwrap();
        assert_eq!(state(&engine).current.score, 3);

        assert_eq!(engine.cancel_edit().unwrap(), Some(b.id));
        assert_eq!(state(&engine), &before);

        let ids: Vec<BallId> = state(&engine).ball_history.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![c.id, b.id, a.id]);
    }

    #[test]
    fn test_delete_refused_while_editing() {
        let mut engine = engine(20);
        let a = runs(&mut engine, 1);
        let b = runs(&mut engine, 4);
        let c = runs(&mut engine, 2);
        let before = state(&engine).clone();

        engine.edit_ball(b.id).unwrap();
        assert!(matches!(
            engine.delete_ball(c.id),
            Err(ScoringError::Validation(_))
        ));
        assert_eq!(state(&engine).ball_history.len(), 2);

        assert_eq!(engine.cancel_edit().unwrap(), Some(b.id));
        assert_eq!(state(&engine), &before);

        let ids: Vec<BallId> = state(&engine).ball_history.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![c.id, b.id, a.id]);

        let view = engine.view().unwrap();
        let strip: Vec<&str> = view.current_over.iter().map(|i| i.text.as_str()).collect();
        assert_eq!(strip, vec!["1", "4", "2", "•", "•", "•"]);

        // Deleting works again once the edit is settled
        assert!(engine.delete_ball(c.id).unwrap());
    }

    #[test]
    fn test_cancel_edit_restores_oldest_ball() {
        let mut engine = engine(20);
        let a = runs(&mut engine, 1);
        let b = runs(&mut engine, 2);

        engine.edit_ball(a.id).unwrap();
        engine.cancel_edit().unwrap();

        let ids: Vec<BallId> = state(&engine).ball_history.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![b.id, a.id]);
    }

    #[test]
    fn test_oversized_runs_rejected() {
        let mut engine = engine(20);
        runs(&mut engine, 4);
        let before = state(&engine).clone();

        let err = engine
            .record_ball(Some(u32::MAX), ExtraType::Wide, false, "")
            .unwrap_err();
        assert!(matches!(err, ScoringError::Validation(_)));
        assert_eq!(state(&engine), &before);

        runs(&mut engine, 1);
        assert_eq!(state(&engine).current.score, 5);
    }

    #[test]
    fn test_deleting_winning_ball_reopens_match() {
        let mut engine = engine(1);
        for _ in 0..6 {
            runs(&mut engine, 1);
        }
        runs(&mut engine, 4);
        let winner = runs(&mut engine, 4);
        assert!(state(&engine).is_match_complete);

        engine.delete_ball(winner.id).unwrap();
        assert!(!state(&engine).is_match_complete);
        assert_eq!(state(&engine).current.score, 4);

        let draft_ball = runs(&mut engine, 3);
        assert!(state(&engine).is_match_complete);
        assert_eq!(draft_ball.over, 0);
    }

    #[test]
    fn test_cancel_edit_of_winning_ball_recloses_match() {
        let mut engine = engine(1);
        for _ in 0..6 {
            runs(&mut engine, 1);
        }
        let winner = runs(&mut engine, 7);
        assert!(state(&engine).is_match_complete);

        engine.edit_ball(winner.id).unwrap();
        assert!(!state(&engine).is_match_complete);

        engine.cancel_edit().unwrap();
        assert!(state(&engine).is_match_complete);
    }

    #[test]
    fn test_cancel_edit_announces_result_again() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut engine = MatchEngine::with_notifier(tx);
        engine.start_match("Lions", "Tigers", 1, 1, 1).unwrap();
        for _ in 0..6 {
            runs(&mut engine, 1);
        }
        let winner = runs(&mut engine, 7);

        assert!(matches!(
            rx.try_recv().unwrap(),
            MatchNotification::InningsBreak(_)
        ));
        assert!(matches!(
            rx.try_recv().unwrap(),
            MatchNotification::MatchComplete(_)
        ));

        engine.edit_ball(winner.id).unwrap();
        assert!(rx.try_recv().is_err());

        engine.cancel_edit().unwrap();
        match rx.try_recv().unwrap() {
            MatchNotification::MatchComplete(result) => {
                assert_eq!(result.message(), "Tigers won by 10 wickets");
            }
            other => panic!("unexpected notification: {:?}", other),
        }
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_cancel_edit_mid_match_sends_nothing() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut engine = MatchEngine::with_notifier(tx);
        engine.start_match("Lions", "Tigers", 20, 1, 1).unwrap();
        let ball = runs(&mut engine, 2);

        engine.edit_ball(ball.id).unwrap();
        engine.cancel_edit().unwrap();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_view_second_innings() {
        let mut engine = engine(2);
        for _ in 0..12 {
            runs(&mut engine, 1);
        }
        runs(&mut engine, 4);
        engine.record_ball(None, ExtraType::Wide, false, "").unwrap();

        let view = engine.view().unwrap();
        assert_eq!(view.batting_team, "Tigers");
        assert_eq!(view.score, 5);
        assert_eq!(view.overs, "0.1");

        let target = view.target.unwrap();
        assert_eq!(target.target, 13);
        assert_eq!(target.runs_needed, 8);
        assert_eq!(target.balls_left, 11);

        let texts: Vec<&str> = view.current_over.iter().map(|i| i.text.as_str()).collect();
        assert_eq!(texts, vec!["4", "WD", "•", "•", "•", "•", "•"]);
        assert!(view.result.is_none());
    }

    #[test]
    fn test_view_first_innings_has_no_target() {
        let mut engine = engine(20);
        runs(&mut engine, 2);
        let view = engine.view().unwrap();
        assert_eq!(view.batting_team, "Lions");
        assert!(view.target.is_none());
        assert_eq!(view.history[0].label, "1st 0.1");
        assert_eq!(view.history[0].description, "2 runs");
    }

    #[test]
    fn test_current_over_after_delete() {
        let mut engine = engine(20);
        for _ in 0..6 {
            runs(&mut engine, 1);
        }
        runs(&mut engine, 4);
        let middle = engine
            .record_ball(None, ExtraType::NoBall, false, "")
            .unwrap();
        engine.record_ball(None, ExtraType::None, true, "").unwrap();

        engine.delete_ball(middle.id).unwrap();
        let view = engine.view().unwrap();

        let shown: Vec<(&str, IndicatorKind)> = view
            .current_over
            .iter()
            .map(|i| (i.text.as_str(), i.kind))
            .collect();
        assert_eq!(
            shown,
            vec![
                ("4", IndicatorKind::Runs),
                ("W", IndicatorKind::Wicket),
                ("•", IndicatorKind::Empty),
                ("•", IndicatorKind::Empty),
                ("•", IndicatorKind::Empty),
                ("•", IndicatorKind::Empty),
            ]
        );
        assert_eq!(view.overs, "1.2");
    }

    #[test]
    fn test_view_reports_result_when_complete() {
        let mut engine = engine(1);
        for _ in 0..6 {
            runs(&mut engine, 0);
        }
        runs(&mut engine, 1);

        let view = engine.view().unwrap();
        assert!(view.is_match_complete);
        assert_eq!(
            view.result.unwrap().outcome,
            MatchOutcome::TeamBWon { wickets: 10 }
        );
    }

    #[test]
    fn test_resume_continues_ids() {
        let mut engine = engine(20);
        let ball = runs(&mut engine, 1);
        let saved = state(&engine).clone();

        let mut restored = MatchEngine::new();
        restored.resume(saved);
        let next = runs(&mut restored, 1);
        assert!(next.id > ball.id);
        assert_eq!(restored.state().unwrap().current.score, 2);
    }
}
