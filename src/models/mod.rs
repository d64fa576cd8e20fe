pub mod ball;
pub mod match_state;
pub mod notification;
pub mod result;
pub mod view;

pub use ball::{BallDraft, BallEvent, BallId, ExtraType, Innings};
pub use match_state::{InningsTally, MatchConfig, MatchState, BALLS_PER_OVER, MAX_WICKETS};
pub use notification::{InningsBreak, MatchNotification};
pub use result::{MatchOutcome, MatchResult};
pub use view::{BallIndicator, DisplayView, HistoryEntry, IndicatorKind, TargetView};
