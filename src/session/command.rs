use crate::error::{Result, ScoringError};
use crate::models::{BallId, ExtraType};

/// One line typed by the scorer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `start <team a> | <team b> [| overs [| wide extra [| no-ball extra]]]`
    Start {
        team_a: String,
        team_b: String,
        overs: Option<u32>,
        wide_extra: Option<u32>,
        no_ball_extra: Option<u32>,
    },
    /// `ball [runs] [wd|nb] [w] [# note]`, or a bare run count
    Ball(BallInput),
    Edit(BallId),
    Delete(BallId),
    /// Abandon a pending edit and restore the original ball
    Cancel,
    /// Acknowledge the innings break
    Continue,
    Show,
    /// Clear the match and its saved snapshot
    New,
    Help,
    Quit,
}

/// Ball fields as entered, validated later by the engine
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BallInput {
    pub runs: Option<u32>,
    pub extra_type: ExtraType,
    pub is_wicket: bool,
    pub notes: String,
}

pub const HELP: &str = "\
Commands:
  start <team a> | <team b> [| overs [| wide extra [| no-ball extra]]]
  ball [runs] [wd|nb] [w] [# note]   (or just the runs, e.g. `4`)
  edit <ball id>      remove a ball and show its fields for re-entry
  cancel              restore the ball being edited
  delete <ball id>
  continue            start the second innings after the break
  show | new | help | quit";

impl Command {
    pub fn parse(line: &str) -> Result<Command> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_lowercase().as_str() {
            "start" => parse_start(rest),
            "ball" | "b" => Ok(Command::Ball(parse_ball(rest)?)),
            "edit" | "e" => Ok(Command::Edit(parse_ball_id(rest)?)),
            "delete" | "del" | "d" => Ok(Command::Delete(parse_ball_id(rest)?)),
            "cancel" => Ok(Command::Cancel),
            "continue" | "c" => Ok(Command::Continue),
            "show" | "s" | "" => Ok(Command::Show),
            "new" => Ok(Command::New),
            "help" | "h" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            _ if word.parse::<u32>().is_ok() => Ok(Command::Ball(parse_ball(line)?)),
            other => Err(ScoringError::Validation(format!(
                "Unknown command: {} (type `help`)",
                other
            ))),
        }
    }
}

fn parse_start(rest: &str) -> Result<Command> {
    let parts: Vec<&str> = rest.split('|').map(str::trim).collect();
    if parts.len() < 2 || parts.len() > 5 {
        return Err(ScoringError::Validation(
            "Usage: start <team a> | <team b> [| overs [| wide extra [| no-ball extra]]]"
                .to_string(),
        ));
    }

    let number = |index: usize, name: &str| -> Result<Option<u32>> {
        match parts.get(index).filter(|p| !p.is_empty()) {
            Some(value) => value.parse::<u32>().map(Some).map_err(|_| {
                ScoringError::Validation(format!("{} must be a whole number, got {}", name, value))
            }),
            None => Ok(None),
        }
    };

    Ok(Command::Start {
        team_a: parts[0].to_string(),
        team_b: parts[1].to_string(),
        overs: number(2, "Overs")?,
        wide_extra: number(3, "Wide extra")?,
        no_ball_extra: number(4, "No-ball extra")?,
    })
}

fn parse_ball(rest: &str) -> Result<BallInput> {
    let (fields, notes) = match rest.split_once('#') {
        Some((fields, notes)) => (fields, notes.trim()),
        None => (rest, ""),
    };

    let mut input = BallInput {
        notes: notes.to_string(),
        ..Default::default()
    };

    for token in fields.split_whitespace() {
        let lower = token.to_lowercase();
        if let Ok(runs) = lower.parse::<u32>() {
            if input.runs.replace(runs).is_some() {
                return Err(ScoringError::Validation(
                    "Runs entered more than once".to_string(),
                ));
            }
        } else if lower == "w" || lower == "wicket" || lower == "out" {
            input.is_wicket = true;
        } else {
            let extra: ExtraType = lower.parse()?;
            if input.extra_type.is_extra() && extra != input.extra_type {
                return Err(ScoringError::Validation(
                    "A ball can be a wide or a no-ball, not both".to_string(),
                ));
            }
            input.extra_type = extra;
        }
    }

    Ok(input)
}

fn parse_ball_id(rest: &str) -> Result<BallId> {
    rest.parse()
        .map_err(|_| ScoringError::Validation(format!("Invalid ball id: {}", rest)))
}
