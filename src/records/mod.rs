pub mod types;

pub use types::{MatchMetadata, MedalTimes, PayoutAssignment, ScoreRecord, NO_TEAM};
