mod combine;
mod placement;
pub mod selector;
pub mod strategy;

pub use selector::{mode_by_name, select, select_many, ModeSelector, TimeAttackRule, VARIANTS};
pub use strategy::{Column, Mode, ScoreColumns, Strategy, TieMap, DEFAULT_AUTHOR_PENALTY_MS};
