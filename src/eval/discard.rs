//! Marking reasons that duplicate other reasons at the same point.
//!
//! A reason flagged here is skipped by the territorial and/or strategic
//! valuation so that the same stones are not paid for twice. The rules
//! only read the reason tables; flags are or-ed, so the order in which
//! rules fire does not matter.

use log::debug;

use crate::board::{Point, Safety};
use crate::oracle::BoardView;
use crate::reasons::{ReasonKind, Redundancy, Subject};
use crate::session::Session;

use ReasonKind::*;

/// Test applied to each reason a rule covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardCondition {
    /// An owl move is known for the dragon containing the worm.
    OwlMoveVsWorm,
    /// An owl move is known for the dragon.
    OwlMoveKnown,
    /// The dragon is one worm and a tactical move is known for it.
    TacticalVsWholeDragon,
    /// A tactical move is known for either worm of the pair.
    TacticalVsEitherWorm,
    InessentialWorm,
    InessentialDragon,
}

/// One redundancy rule.
#[derive(Debug, Clone, Copy)]
pub struct DiscardRule {
    pub kinds: &'static [ReasonKind],
    pub condition: DiscardCondition,
    pub flags: Redundancy,
    pub trace: &'static str,
}

const WORM_KINDS: &[ReasonKind] = &[
    Attack,
    AttackGoodKo,
    AttackBadKo,
    AttackThreat,
    Defend,
    DefendGoodKo,
    DefendBadKo,
    DefendThreat,
];

pub const DISCARD_RULES: [DiscardRule; 6] = [
    DiscardRule {
        kinds: WORM_KINDS,
        condition: DiscardCondition::OwlMoveVsWorm,
        flags: Redundancy::TERRITORY,
        trace: "(threat of) attack/defense (owl attack/defense as well)",
    },
    DiscardRule {
        kinds: &[Semeai, SemeaiThreat],
        condition: DiscardCondition::OwlMoveKnown,
        flags: Redundancy::BOTH,
        trace: "(threat to) win semeai (owl move as well)",
    },
    DiscardRule {
        kinds: &[Semeai, SemeaiThreat],
        condition: DiscardCondition::TacticalVsWholeDragon,
        flags: Redundancy::BOTH,
        trace: "(threat to) win semeai (tactical move as well)",
    },
    DiscardRule {
        kinds: &[AttackEither, DefendBoth],
        condition: DiscardCondition::TacticalVsEitherWorm,
        flags: Redundancy::BOTH,
        trace: "attack either/defend both (direct attack/defense as well)",
    },
    DiscardRule {
        kinds: WORM_KINDS,
        condition: DiscardCondition::InessentialWorm,
        flags: Redundancy::TERRITORY,
        trace: "attack/defense (inessential)",
    },
    DiscardRule {
        kinds: &[
            OwlAttack,
            OwlAttackGoodKo,
            OwlAttackBadKo,
            OwlAttackThreat,
            OwlDefend,
            OwlDefendGoodKo,
            OwlDefendBadKo,
            UncertainOwlDefense,
        ],
        condition: DiscardCondition::InessentialDragon,
        flags: Redundancy::BOTH,
        trace: "(uncertain) owl attack/defense (inessential)",
    },
];

impl DiscardCondition {
    fn holds<B: BoardView + ?Sized>(
        self,
        session: &Session,
        board: &B,
        pos: Point,
        subject: Subject,
    ) -> bool {
        let registry = session.registry();
        match (self, subject) {
            (DiscardCondition::OwlMoveVsWorm, Subject::Worm(w)) => {
                session.owl_move_vs_worm_known(board, pos, w)
            }
            (DiscardCondition::OwlMoveKnown, Subject::Dragon(d)) => {
                session.owl_move_known(pos, Some(d))
            }
            (DiscardCondition::TacticalVsWholeDragon, Subject::Dragon(d)) => {
                session.tactical_move_vs_whole_dragon_known(board, pos, d)
            }
            (DiscardCondition::TacticalVsEitherWorm, Subject::WormPair(pair)) => {
                session.tactical_move_vs_either_worm_known(pos, pair)
            }
            (DiscardCondition::InessentialWorm, Subject::Worm(w)) => {
                let aa = registry.worm_origin(w);
                board.dragon(aa).safety == Safety::Inessential || board.worm(aa).inessential
            }
            (DiscardCondition::InessentialDragon, Subject::Dragon(d)) => {
                board.dragon(registry.dragon_origin(d)).safety == Safety::Inessential
            }
            _ => false,
        }
    }
}

impl Session {
    /// Applies every rule to every reason at `pos`.
    pub fn discard_redundant_move_reasons<B: BoardView + ?Sized>(&mut self, board: &B, pos: Point) {
        let ids = self.record(pos).reasons.clone();
        for rule in &DISCARD_RULES {
            for &id in &ids {
                let reason = *self.reason(id);
                if !rule.kinds.contains(&reason.kind)
                    || !rule.condition.holds(self, board, pos, reason.subject)
                {
                    continue;
                }
                debug!("  {pos}: 0.0 - {} [{}]", rule.trace, reason.kind);
                self.reasons[id.0 as usize].redundancy.insert(rule.flags);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rules_cover_only_matching_subjects() {
        for rule in &DISCARD_RULES {
            let class = rule.kinds[0].subject_class();
            assert!(rule.kinds.iter().all(|k| k.subject_class() == class));
        }
    }

    #[test]
    fn owl_rules_make_reasons_fully_redundant() {
        let owl = DISCARD_RULES
            .iter()
            .find(|r| r.condition == DiscardCondition::InessentialDragon)
            .map(|r| r.flags);
        assert_eq!(owl, Some(Redundancy::BOTH));
    }
}
