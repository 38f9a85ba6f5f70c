//! Funding rate merge and settlement logic

pub mod merger;
pub mod settlement;

pub use merger::{interval_mismatches, merge_funding_intervals, merge_funding_rates};
pub use settlement::{filter_at, quotes_at, resolve_next_settlement};
