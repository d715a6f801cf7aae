//! Colours, reading results and the status categories attached to worms
//! and dragons.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stone colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Black,
    White,
}

impl Color {
    pub fn other(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// Whether a score estimate (positive favours White) has this colour
    /// in the lead.
    pub fn is_ahead(self, score: f32) -> bool {
        match self {
            Color::White => score > 0.0,
            Color::Black => score < 0.0,
        }
    }

    /// Whether a score estimate has this colour behind.
    pub fn is_behind(self, score: f32) -> bool {
        self.other().is_ahead(score)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Black => write!(f, "black"),
            Color::White => write!(f, "white"),
        }
    }
}

/// Result code of a tactical or life-and-death reading.
///
/// Ordered from worst to best for the side that asked, so "meets or
/// exceeds" comparisons use `>=`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    #[default]
    Fail,
    BadKo,
    GoodKo,
    Win,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        self != Outcome::Fail
    }
}

/// Life status reported by the pattern matcher and owl reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Dead,
    #[default]
    Alive,
    Critical,
    Unknown,
    Unchecked,
}

/// Strategic safety category of a dragon.
///
/// The declaration order indexes the coefficient tables in
/// [`crate::eval::tables`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Safety {
    Dead,
    #[default]
    Alive,
    Critical,
    Inessential,
    TacticallyDead,
    Weak,
    WeaklyAlive,
    AliveInSeki,
    StronglyAlive,
    Invincible,
}

impl Safety {
    pub fn index(self) -> usize {
        self as usize
    }

    /// Strongly alive or invincible.
    pub fn is_strong(self) -> bool {
        matches!(self, Safety::StronglyAlive | Safety::Invincible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_order_matches_strength() {
        assert!(Outcome::Fail < Outcome::BadKo);
        assert!(Outcome::BadKo < Outcome::GoodKo);
        assert!(Outcome::GoodKo < Outcome::Win);
        assert!(!Outcome::Fail.is_success());
        assert!(Outcome::BadKo.is_success());
    }

    #[test]
    fn score_sign_favours_white() {
        assert!(Color::White.is_ahead(3.0));
        assert!(Color::Black.is_behind(3.0));
        assert!(Color::Black.is_ahead(-0.5));
        assert!(!Color::White.is_ahead(0.0));
        assert!(!Color::White.is_behind(0.0));
    }

    #[test]
    fn safety_indices_follow_declaration() {
        assert_eq!(Safety::Dead.index(), 0);
        assert_eq!(Safety::Inessential.index(), 3);
        assert_eq!(Safety::Invincible.index(), 9);
    }
}
