pub mod command;
pub mod render;
pub mod scorer;

pub use command::{BallInput, Command};
pub use scorer::{Reply, ScorerSession};
