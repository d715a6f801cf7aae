//! Faults raised while collecting and reviewing move reasons.
//!
//! None of these are expected during normal play: a full table means the
//! capacities do not fit the board, and the rest point at a bug in whoever
//! registered the reason.

use thiserror::Error;

use super::kind::ReasonKind;
use crate::board::Point;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReasonError {
    #[error("{table} table is full ({capacity} entries)")]
    TableFull {
        table: &'static str,
        capacity: usize,
    },

    #[error("reason list for {point} is full ({capacity} reasons)")]
    ReasonListFull { point: Point, capacity: usize },

    #[error("reason table is full ({capacity} reasons)")]
    ReasonTableFull { capacity: usize },

    #[error("point {0} is off the board")]
    OffBoard(Point),

    #[error("cyclic point redistribution from {from} to {to}")]
    CyclicReplacement { from: Point, to: Point },

    #[error("redistribution from {from} to {to} conflicts with existing rule to {existing}")]
    ConflictingReplacement {
        from: Point,
        to: Point,
        existing: Point,
    },

    #[error("cannot connect dragons of different colors at {0} and {1}")]
    MixedColors(Point, Point),

    #[error("{kind} reason registered with the wrong kind of subject")]
    SubjectMismatch { kind: ReasonKind },
}
