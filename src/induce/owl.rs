use log::trace;

use crate::board::{Color, Point, Safety, Status};
use crate::oracle::{BoardView, Oracle};
use crate::reasons::{ReasonError, ReasonKind, Subject};
use crate::session::Session;

impl Session {
    fn owl_attack_known_for<B: BoardView + ?Sized>(&self, board: &B, pos: Point, dd: Point) -> bool {
        self.registry
            .find_dragon(board.dragon(dd).origin)
            .is_some_and(|d| self.owl_attack_known(pos, Some(d)))
    }

    fn owl_defense_known_for<B: BoardView + ?Sized>(&self, board: &B, pos: Point, dd: Point) -> bool {
        self.registry
            .find_dragon(board.dragon(dd).origin)
            .is_some_and(|d| self.owl_defense_known(pos, Some(d)))
    }

    /// Tests strategic, tactical, vital eye and connection moves on owl
    /// critical dragons and upgrades them to owl reasons when the owl
    /// reader agrees.
    pub fn find_more_owl_attack_and_defense_moves<O: Oracle + ?Sized>(
        &mut self,
        oracle: &mut O,
        color: Color,
    ) -> Result<(), ReasonError> {
        use ReasonKind::*;
        for pos in self.size.points() {
            for reason in self.reason_snapshot(pos) {
                let targets: [Option<Point>; 2] = match (reason.kind, reason.subject) {
                    (StrategicAttack | StrategicDefend, Subject::Dragon(d)) => {
                        [Some(self.registry.dragon_origin(d)), None]
                    }
                    (
                        Attack | AttackGoodKo | AttackBadKo | Defend | DefendGoodKo | DefendBadKo,
                        Subject::Worm(w),
                    ) => [Some(self.registry.worm_origin(w)), None],
                    (VitalEye, Subject::Eye(e)) => {
                        let (eye, ecolor) = self.registry.eye_key(e);
                        match oracle.eye_dragon(eye, ecolor) {
                            Some(dd) => [Some(dd), None],
                            None => continue,
                        }
                    }
                    (Connect, Subject::Connection(c)) => {
                        let (a, b) = self.registry.connection_dragons(c);
                        [
                            Some(self.registry.dragon_origin(a)),
                            Some(self.registry.dragon_origin(b)),
                        ]
                    }
                    _ => continue,
                };

                for dd in targets.into_iter().flatten() {
                    let dragon = oracle.dragon(dd);
                    if dragon.safety == Safety::Inessential || dragon.owl_status != Status::Critical
                    {
                        continue;
                    }
                    let stone = oracle.color_at(dd);
                    let attacking = matches!(
                        reason.kind,
                        StrategicAttack | Attack | AttackGoodKo | AttackBadKo
                    ) || (reason.kind == VitalEye && stone == Some(color.other()));
                    let defending = matches!(
                        reason.kind,
                        StrategicDefend | Connect | Defend | DefendGoodKo | DefendBadKo
                    ) || (reason.kind == VitalEye && stone == Some(color));

                    if attacking && !self.owl_attack_known_for(&*oracle, pos, dd) {
                        let acode = oracle.owl_does_attack(pos, dd);
                        if acode >= dragon.owl_attack_code {
                            self.add_owl_attack_move(&*oracle, pos, dd, acode)?;
                            trace!("Move at {pos} owl attacks {dd}, result {acode:?}");
                        }
                    }
                    if defending && !self.owl_defense_known_for(&*oracle, pos, dd) {
                        let dcode = oracle.owl_does_defend(pos, dd);
                        if dcode >= dragon.owl_defense_code {
                            self.add_owl_defense_move(&*oracle, pos, dd, dcode)?;
                            trace!("Move at {pos} owl defends {dd}, result {dcode:?}");
                        }
                    }
                }
            }
        }

        // Owl moves against one critical dragon may also work on an
        // adjacent critical dragon.
        for pos in self.size.points() {
            let Some(stone) = oracle.color_at(pos) else {
                continue;
            };
            let dragon = oracle.dragon(pos);
            if dragon.origin != pos || dragon.owl_status != Status::Critical {
                continue;
            }
            for pos2 in self.size.points() {
                if oracle.color_at(pos2).is_some() {
                    continue;
                }
                let worth_trying = self.reasons_at(pos2).any(|r| {
                    (r.kind.is_owl_attack() || r.kind.is_owl_defense())
                        && matches!(r.subject, Subject::Dragon(d)
                            if oracle.are_neighbor_dragons(self.registry.dragon_origin(d), pos))
                });
                if !worth_trying {
                    continue;
                }
                if stone == color {
                    if !self.owl_defense_known_for(&*oracle, pos2, pos) {
                        let dcode = oracle.owl_does_defend(pos2, pos);
                        if dcode >= dragon.owl_defense_code {
                            self.add_owl_defense_move(&*oracle, pos2, pos, dcode)?;
                        }
                    }
                } else if !self.owl_attack_known_for(&*oracle, pos2, pos) {
                    let acode = oracle.owl_does_attack(pos2, pos);
                    if acode >= dragon.owl_attack_code {
                        self.add_owl_attack_move(&*oracle, pos2, pos, acode)?;
                    }
                }
            }
        }
        Ok(())
    }
}
