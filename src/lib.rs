pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod models;
pub mod session;

pub use engine::MatchEngine;
pub use error::{Result, ScoringError};
