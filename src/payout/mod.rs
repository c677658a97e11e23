pub mod calculator;

pub use calculator::{compute_payouts, total_paid};
