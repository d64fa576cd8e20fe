use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::db::SnapshotStore;
use crate::engine::MatchEngine;
use crate::error::ScoringError;
use crate::models::{Innings, InningsBreak, MatchNotification, MatchState};

use super::command::{BallInput, Command, HELP};
use super::render;

/// What the session loop should do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Output(String),
    Quit,
}

/// Terminal scoring session: one command in, one engine call, one snapshot out
pub struct ScorerSession {
    engine: MatchEngine,
    store: SnapshotStore,
    config: Config,
    notifications: mpsc::UnboundedReceiver<MatchNotification>,
    /// Ball entry is held until the scorer acknowledges the innings break
    awaiting_break_ack: bool,
}

impl ScorerSession {
    /// Create a new session around a fresh engine
    pub fn new(store: SnapshotStore, config: Config) -> Self {
        let (tx, notifications) = mpsc::unbounded_channel();

        Self {
            engine: MatchEngine::with_notifier(tx),
            store,
            config,
            notifications,
            awaiting_break_ack: false,
        }
    }

    pub fn engine(&self) -> &MatchEngine {
        &self.engine
    }

    pub fn is_awaiting_break_ack(&self) -> bool {
        self.awaiting_break_ack
    }

    /// Load the saved match, if any. Returns the scoreboard to show on resume.
    pub async fn resume(&mut self) -> Result<Option<String>> {
        match self.store.load().await? {
            Some(state) => {
                // A restart during the innings break still needs the acknowledgement
                self.awaiting_break_ack = at_innings_break(&state);
                let summary = self
                    .awaiting_break_ack
                    .then(|| InningsBreak::from_state(&state));

                self.engine.resume(state);

                let mut text = self.render_current();
                if let Some(summary) = summary {
                    text.push_str(&render::render_innings_break(&summary));
                }
                Ok(Some(text))
            }
            None => {
                info!("No saved match found");
                Ok(None)
            }
        }
    }

    /// Run the session loop until input ends or the scorer quits
    pub async fn run<R>(mut self, input: R)
    where
        R: AsyncBufRead + Unpin,
    {
        info!("Scoring session started");

        let mut lines = input.lines();

        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    error!("Failed to read input: {}", e);
                    break;
                }
            };

            match self.handle_line(&line).await {
                Reply::Output(text) => println!("{}", text),
                Reply::Quit => break,
            }
        }

        info!("Scoring session ended");
    }

    /// Parse and apply one line of input
    pub async fn handle_line(&mut self, line: &str) -> Reply {
        let command = match Command::parse(line) {
            Ok(command) => command,
            Err(e) => return Reply::Output(e.to_string()),
        };

        match self.handle(command).await {
            Ok(reply) => reply,
            Err(e) => Reply::Output(e.to_string()),
        }
    }

    async fn handle(&mut self, command: Command) -> Result<Reply, ScoringError> {
        let text = match command {
            Command::Start {
                team_a,
                team_b,
                overs,
                wide_extra,
                no_ball_extra,
            } => {
                self.engine.start_match(
                    &team_a,
                    &team_b,
                    overs.unwrap_or(self.config.default_overs),
                    wide_extra.unwrap_or(self.config.default_wide_extra),
                    no_ball_extra.unwrap_or(self.config.default_no_ball_extra),
                )?;
                self.awaiting_break_ack = false;
                self.drain_notifications();

                if let Err(e) = self.store.clear().await {
                    error!("Failed to clear previous snapshots: {}", e);
                }
                self.persist().await;
                self.render_current()
            }
            Command::Ball(input) => self.record(input).await?,
            Command::Edit(ball_id) => {
                let draft = self.engine.edit_ball(ball_id)?;
                // Snapshot keeps the original ball until the replacement is recorded
                format!(
                    "{}\nRe-enter ball {} (or `cancel`): {}",
                    self.render_current(),
                    ball_id,
                    render::render_draft(&draft)
                )
            }
            Command::Cancel => match self.engine.cancel_edit()? {
                Some(ball_id) => {
                    // A restored winning ball re-announces the result, already on the scoreboard
                    self.drain_notifications();
                    self.persist().await;
                    format!("Ball {} restored\n{}", ball_id, self.render_current())
                }
                None => "Nothing to cancel".to_string(),
            },
            Command::Delete(ball_id) => {
                if self.engine.delete_ball(ball_id)? {
                    self.persist().await;
                }
                self.render_current()
            }
            Command::Continue => {
                self.engine.view()?;
                self.awaiting_break_ack = false;
                self.render_current()
            }
            Command::Show => self.render_current(),
            Command::New => {
                self.engine.reset();
                self.awaiting_break_ack = false;
                if let Err(e) = self.store.clear().await {
                    error!("Failed to clear snapshots: {}", e);
                }
                "Match cleared. Use `start` to set up a new match.".to_string()
            }
            Command::Help => HELP.to_string(),
            Command::Quit => return Ok(Reply::Quit),
        };

        Ok(Reply::Output(text))
    }

    async fn record(&mut self, input: BallInput) -> Result<String, ScoringError> {
        if self.awaiting_break_ack {
            return Err(ScoringError::Validation(
                "Innings break: type `continue` to start the second innings".to_string(),
            ));
        }

        self.engine.record_ball(
            input.runs,
            input.extra_type,
            input.is_wicket,
            &input.notes,
        )?;
        self.persist().await;

        let mut text = self.render_current();
        for notification in self.drain_notifications() {
            match notification {
                MatchNotification::InningsBreak(summary) => {
                    self.awaiting_break_ack = true;
                    text.push_str(&render::render_innings_break(&summary));
                }
                // The scoreboard already carries the result
                MatchNotification::MatchComplete(_) => {}
            }
        }

        Ok(text)
    }

    fn drain_notifications(&mut self) -> Vec<MatchNotification> {
        let mut drained = Vec::new();
        while let Ok(notification) = self.notifications.try_recv() {
            drained.push(notification);
        }
        drained
    }

    async fn persist(&self) {
        let Some(state) = self.engine.state() else {
            return;
        };

        if let Err(e) = self.store.save(state).await {
            warn!("Failed to save snapshot: {}", e);
        }
    }

    fn render_current(&self) -> String {
        match self.engine.view() {
            Ok(view) => render::render_view(&view),
            Err(_) => "No match in progress. Use `start` to set one up.".to_string(),
        }
    }
}

/// Chase has not started and the match is still live
fn at_innings_break(state: &MatchState) -> bool {
    state.current_innings == Innings::Second
        && !state.is_match_complete
        && state.innings_balls(Innings::Second).next().is_none()
}
