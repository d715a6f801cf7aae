//! Human readable listing of the reasons behind a move.

use super::kind::{ReasonKind, Subject};
use super::record::Reason;
use crate::board::{Outcome, Point};
use crate::oracle::BoardView;
use crate::session::Session;

impl Session {
    /// One line describing `reason` as played at `pos`.
    pub fn describe_reason<B: BoardView + ?Sized>(
        &self,
        board: &B,
        pos: Point,
        reason: &Reason,
    ) -> String {
        use ReasonKind::*;
        let registry = &self.registry;
        match (reason.kind, reason.subject) {
            (Attack | AttackGoodKo | AttackBadKo, Subject::Worm(w)) => {
                let aa = registry.worm_origin(w);
                let defenseless = if board.worm(aa).defense_code == Outcome::Fail {
                    " (defenseless)"
                } else {
                    ""
                };
                let ko = match reason.kind {
                    AttackGoodKo => " with good ko",
                    AttackBadKo => " with bad ko",
                    _ => "",
                };
                format!("Move at {pos} attacks {aa}{defenseless}{ko}")
            }
            (Defend | DefendGoodKo | DefendBadKo, Subject::Worm(w)) => {
                let ko = match reason.kind {
                    DefendGoodKo => " with good ko",
                    DefendBadKo => " with bad ko",
                    _ => "",
                };
                format!("Move at {pos} defends {}{ko}", registry.worm_origin(w))
            }
            (AttackThreat, Subject::Worm(w)) => {
                format!("Move at {pos} threatens to attack {}", registry.worm_origin(w))
            }
            (DefendThreat, Subject::Worm(w)) => {
                format!("Move at {pos} threatens to defend {}", registry.worm_origin(w))
            }
            (Connect | Cut, Subject::Connection(c)) => {
                let (a, b) = registry.connection_dragons(c);
                let verb = if reason.kind == Connect { "connects" } else { "cuts" };
                format!(
                    "Move at {pos} {verb} {} and {}",
                    registry.dragon_origin(a),
                    registry.dragon_origin(b)
                )
            }
            (Antisuji, _) => format!("Move at {pos} is an antisuji"),
            (Semeai, Subject::Dragon(d)) => {
                format!("Move at {pos} wins semeai for {}", registry.dragon_origin(d))
            }
            (SemeaiThreat, Subject::Dragon(d)) => format!(
                "Move at {pos} threatens to win semeai for {}",
                registry.dragon_origin(d)
            ),
            (VitalEye, Subject::Eye(e)) => {
                let (eye, color) = registry.eye_key(e);
                match board.eye_dragon(eye, color) {
                    Some(dragon) => format!(
                        "Move at {pos} vital eye point for dragon {dragon} (eye {eye})"
                    ),
                    None => format!("Move at {pos} vital eye point for {color} eye {eye}"),
                }
            }
            (AttackEither | DefendBoth, Subject::WormPair(pair)) => {
                let (a, b) = registry.worm_pair_members(pair);
                let (a, b) = (registry.worm_origin(a), registry.worm_origin(b));
                if reason.kind == AttackEither {
                    format!("Move at {pos} attacks either {a} or {b}")
                } else {
                    format!("Move at {pos} defends both {a} and {b}")
                }
            }
            (
                OwlAttack | OwlAttackGoodKo | OwlAttackBadKo | OwlDefend | OwlDefendGoodKo
                | OwlDefendBadKo,
                Subject::Dragon(d),
            ) => {
                let verb = if reason.kind.is_owl_attack() {
                    "owl-attacks"
                } else {
                    "owl-defends"
                };
                let ko = match reason.kind {
                    OwlAttackGoodKo | OwlDefendGoodKo => " with good ko",
                    OwlAttackBadKo | OwlDefendBadKo => " with bad ko",
                    _ => "",
                };
                format!("Move at {pos} {verb} {}{ko}", registry.dragon_origin(d))
            }
            (OwlAttackThreat, Subject::Dragon(d)) => format!(
                "Move at {pos} owl-threatens to attack {}",
                registry.dragon_origin(d)
            ),
            (OwlDefenseThreat, Subject::Dragon(d)) => format!(
                "Move at {pos} owl-threatens to defend {}",
                registry.dragon_origin(d)
            ),
            (OwlPreventThreat, Subject::Dragon(d)) => format!(
                "Move at {pos} owl-prevents a threat to attack or defend {}",
                registry.dragon_origin(d)
            ),
            (UncertainOwlAttack, Subject::Dragon(d)) => format!(
                "Move at {pos} might owl-attack {} (uncertain)",
                registry.dragon_origin(d)
            ),
            (UncertainOwlDefense, Subject::Dragon(d)) => format!(
                "Move at {pos} might owl-defend {} (uncertain)",
                registry.dragon_origin(d)
            ),
            (BlockTerritory, _) => format!("Move at {pos} blocks territory"),
            (ExpandTerritory, _) => format!("Move at {pos} expands territory"),
            (ExpandMoyo, _) => format!("Move at {pos} expands moyo"),
            (StrategicAttack, Subject::Dragon(d)) => format!(
                "Move at {pos} strategically attacks {}",
                registry.dragon_origin(d)
            ),
            (StrategicDefend, Subject::Dragon(d)) => format!(
                "Move at {pos} strategically defends {}",
                registry.dragon_origin(d)
            ),
            (MyAtariAtari, _) => format!("Move at {pos} captures something"),
            (YourAtariAtari, _) => {
                format!("Move at {pos} defends threat to capture something")
            }
            (kind, subject) => format!("Move at {pos}: {kind} {subject:?}"),
        }
    }

    /// Every reason at `pos`, plus a warning line when the move was found
    /// unsafe.
    pub fn list_move_reasons<B: BoardView + ?Sized>(&self, board: &B, pos: Point) -> Vec<String> {
        let mut lines: Vec<String> = self
            .reasons_at(pos)
            .map(|r| self.describe_reason(board, pos, r))
            .collect();
        let record = self.record(pos);
        if !record.reasons.is_empty() && !record.move_safety {
            lines.push(format!("Move at {pos} strategically or tactically unsafe"));
        }
        lines
    }
}
