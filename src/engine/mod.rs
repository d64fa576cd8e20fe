pub mod match_engine;
pub mod scoring;
pub mod view;

pub use match_engine::MatchEngine;
