pub mod config;
pub mod ingest;
pub mod modes;
pub mod output;
pub mod payout;
pub mod ranking;
pub mod records;
pub mod stderr_buffer;
