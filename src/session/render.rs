//! Plain-text rendering of engine output for the terminal host.

use std::fmt::Write;

use crate::models::{BallDraft, DisplayView, InningsBreak, MatchResult};

/// Scoreboard, current over and ball history
pub fn render_view(view: &DisplayView) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{} Batting ({} innings)",
        view.batting_team,
        view.innings.ordinal()
    );
    let _ = writeln!(out, "  {}/{}  Overs: {}", view.score, view.wickets, view.overs);

    if let Some(target) = &view.target {
        let _ = writeln!(
            out,
            "  Target: {}  Need: {}  Balls left: {}",
            target.target,
            target.runs_needed.max(0),
            target.balls_left
        );
    }

    let strip: Vec<&str> = view.current_over.iter().map(|i| i.text.as_str()).collect();
    let _ = writeln!(out, "  This over: {}", strip.join(" "));

    if !view.history.is_empty() {
        let _ = writeln!(out, "History:");
        for entry in &view.history {
            let lock = if entry.editable { "" } else { "  [locked]" };
            let _ = writeln!(
                out,
                "  #{} {:<9} {}{}",
                entry.ball_id, entry.label, entry.description, lock
            );
        }
    }

    if let Some(result) = &view.result {
        out.push_str(&render_result(result));
    }

    out
}

pub fn render_innings_break(summary: &InningsBreak) -> String {
    format!(
        "=== Innings Break ===\n\
         {} Score: {}/{}\n\
         Target for {}: {} runs\n\
         Overs Available: {} overs\n\
         Required Run Rate: {:.2} runs/over\n\
         {} needs {} runs to win. Type `continue` to start the second innings.\n",
        summary.batting_first,
        summary.first_innings_score,
        summary.first_innings_wickets,
        summary.chasing_team,
        summary.target,
        summary.overs_available,
        summary.required_run_rate,
        summary.chasing_team,
        summary.target,
    )
}

pub fn render_result(result: &MatchResult) -> String {
    format!(
        "=== {} ===\n{} {}/{}, {} {}/{}\n{}\n",
        result.headline(),
        result.team_a,
        result.team_a_score,
        result.team_a_wickets,
        result.team_b,
        result.team_b_score,
        result.team_b_wickets,
        result.message()
    )
}

/// Fields of a ball pulled out for editing, as a ready-to-type command
pub fn render_draft(draft: &BallDraft) -> String {
    let mut parts = vec!["ball".to_string()];
    if let Some(runs) = draft.runs {
        parts.push(runs.to_string());
    }
    match draft.extra_type.code() {
        "" => {}
        code => parts.push(code.to_lowercase()),
    }
    if draft.is_wicket {
        parts.push("w".to_string());
    }
    if !draft.notes.is_empty() {
        parts.push(format!("# {}", draft.notes));
    }
    parts.join(" ")
}
