//! Move valuation.
//!
//! Each candidate point is valued from its reasons in four steps: the
//! reason list is sorted, redundant reasons are flagged, territorial and
//! then strategic values are estimated, and finally everything is
//! combined with follow-up, shape and threat adjustments.

mod combine;
pub mod discard;
mod strategy;
pub mod tables;
mod territory;

pub use combine::move_connects_strings;
pub use discard::{DiscardCondition, DiscardRule, DISCARD_RULES};
pub use tables::{connection_value, dragon_safety};
