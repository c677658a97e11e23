pub mod pipeline;

pub use pipeline::{rank, rank_with, Standings};
