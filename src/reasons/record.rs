//! Reason records and the per-point move record.

use super::kind::{ReasonKind, Subject};
use crate::board::MAX_BOARD;

/// Upper bound for `max_value` and `max_territory` before any limit is set.
pub const HUGE_MOVE_VALUE: f32 = 10.0 * MAX_BOARD as f32 * MAX_BOARD as f32;

/// Redundancy flags of a reason. Valuation skips flagged reasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Redundancy(u8);

impl Redundancy {
    pub const NONE: Redundancy = Redundancy(0);
    /// Ignored by territorial valuation.
    pub const TERRITORY: Redundancy = Redundancy(1);
    /// Ignored by strategical valuation.
    pub const STRATEGY: Redundancy = Redundancy(2);
    /// Ignored by both.
    pub const BOTH: Redundancy = Redundancy(3);

    pub fn contains(self, other: Redundancy) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn intersects(self, other: Redundancy) -> bool {
        self.0 & other.0 != 0
    }

    pub fn insert(&mut self, other: Redundancy) {
        self.0 |= other.0;
    }
}

/// One observation about a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reason {
    pub kind: ReasonKind,
    pub subject: Subject,
    pub redundancy: Redundancy,
}

/// Handle into the session's reason table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReasonId(pub u32);

/// Everything known about one candidate point.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveRecord {
    pub reasons: Vec<ReasonId>,
    /// Value after combination, before redistribution.
    pub value: f32,
    /// Value after redistribution; the selection loop reads this.
    pub final_value: f32,
    /// Follow-up value held back for ko threat re-evaluation.
    pub additional_ko_value: f32,
    pub territorial_value: f32,
    pub strategical_value: f32,
    pub secondary_value: f32,
    pub followup_value: f32,
    pub reverse_followup_value: f32,
    pub maxpos_shape: f32,
    pub numpos_shape: u32,
    pub maxneg_shape: f32,
    pub numneg_shape: u32,
    pub min_value: f32,
    pub max_value: f32,
    pub min_territory: f32,
    pub max_territory: f32,
    pub move_safety: bool,
    pub worthwhile_threat: bool,
    pub random_number: f32,
}

impl MoveRecord {
    pub fn new(random_number: f32) -> Self {
        MoveRecord {
            reasons: Vec::new(),
            value: 0.0,
            final_value: 0.0,
            additional_ko_value: 0.0,
            territorial_value: 0.0,
            strategical_value: 0.0,
            secondary_value: 0.0,
            followup_value: 0.0,
            reverse_followup_value: 0.0,
            maxpos_shape: 0.0,
            numpos_shape: 0,
            maxneg_shape: 0.0,
            numneg_shape: 0,
            min_value: 0.0,
            max_value: HUGE_MOVE_VALUE,
            min_territory: 0.0,
            max_territory: HUGE_MOVE_VALUE,
            move_safety: false,
            worthwhile_threat: false,
            random_number,
        }
    }

    /// Multiplier from the collected shape values: 1.05 raised to the
    /// largest positive minus the largest negative contribution, with one
    /// extra step per additional contribution of either sign.
    pub fn shape_factor(&self) -> f32 {
        let mut exponent = self.maxpos_shape - self.maxneg_shape;
        if self.numpos_shape > 1 {
            exponent += (self.numpos_shape - 1) as f32;
        }
        if self.numneg_shape > 1 {
            exponent -= (self.numneg_shape - 1) as f32;
        }
        1.05f32.powf(exponent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redundancy_flags_combine() {
        let mut flags = Redundancy::NONE;
        assert!(!flags.intersects(Redundancy::TERRITORY));
        flags.insert(Redundancy::TERRITORY);
        assert!(flags.contains(Redundancy::TERRITORY));
        assert!(!flags.contains(Redundancy::BOTH));
        flags.insert(Redundancy::STRATEGY);
        assert_eq!(flags, Redundancy::BOTH);
    }

    #[test]
    fn shape_factor_counts_extra_contributions() {
        let mut record = MoveRecord::new(0.5);
        assert_eq!(record.shape_factor(), 1.0);
        record.maxpos_shape = 3.0;
        record.numpos_shape = 2;
        assert!((record.shape_factor() - 1.05f32.powi(4)).abs() < 1e-5);
        record.maxneg_shape = 1.0;
        record.numneg_shape = 3;
        assert!((record.shape_factor() - 1.05f32.powi(1)).abs() < 1e-5);
    }
}
