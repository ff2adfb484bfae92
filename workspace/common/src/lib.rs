//! Shared converter helpers used across the workspace.
//!
//! Money amounts are rounded exactly once, at the input boundary. Aggregation
//! code downstream operates on already-rounded values and never re-rounds.

mod converters;

pub use converters::{round_amount, same_month, yearly_to_monthly};
