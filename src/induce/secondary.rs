use log::trace;

use crate::board::{Color, Outcome, Point, Safety, Status};
use crate::oracle::Oracle;
use crate::reasons::{ReasonError, ReasonKind, Subject};
use crate::session::Session;

impl Session {
    /// Any move that captures or rescues a worm also connects or cuts the
    /// dragons around it. Owl attacks count as strategic defense of the
    /// attacked dragon's tactically safe neighbours.
    pub fn induce_secondary_move_reasons<O: Oracle + ?Sized>(
        &mut self,
        oracle: &mut O,
        color: Color,
    ) -> Result<(), ReasonError> {
        for pos in self.size.points() {
            for reason in self.reason_snapshot(pos) {
                match (reason.kind, reason.subject) {
                    (ReasonKind::Attack | ReasonKind::Defend, Subject::Worm(w)) => {
                        let aa = self.registry.worm_origin(w);
                        self.induce_around_worm(oracle, pos, aa, reason.kind)?;
                    }
                    (ReasonKind::OwlAttack, Subject::Dragon(d)) => {
                        let aa = self.registry.dragon_origin(d);
                        for bb in oracle.dragon_neighbors(aa) {
                            if oracle.dragon(bb).color == color
                                && oracle.worm(bb).attack_code == Outcome::Fail
                            {
                                self.add_strategical_defense_move(&*oracle, pos, bb)?;
                            }
                        }
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    fn induce_around_worm<O: Oracle + ?Sized>(
        &mut self,
        oracle: &mut O,
        pos: Point,
        aa: Point,
        kind: ReasonKind,
    ) -> Result<(), ReasonError> {
        let worm = oracle.worm(aa);
        let dragon = oracle.dragon(aa);
        if worm.defense_code == Outcome::Fail || dragon.safety == Safety::Inessential {
            return Ok(());
        }
        // Running away with a worm whose dragon cannot live does not cut.
        if kind == ReasonKind::Defend
            && dragon.matcher_status != Status::Alive
            && !oracle.owl_does_defend(pos, aa).is_success()
        {
            return Ok(());
        }

        // An unstable worm amalgamated into a larger dragon only touches
        // the strings it is in contact with.
        let around: Vec<Point> = if dragon.size == worm.size {
            oracle.dragon_neighbors(aa)
        } else {
            oracle
                .chain_links(aa)
                .into_iter()
                .map(|adj| oracle.dragon(adj).origin)
                .collect()
        };
        let enemies: Vec<Point> = around
            .into_iter()
            .filter(|&d| oracle.dragon(d).color != dragon.color)
            .collect();

        let mut biggest = 0;
        let mut dd = None;
        for &d in &enemies {
            let size = oracle.dragon(d).size;
            if size > biggest {
                biggest = size;
                dd = Some(oracle.dragon(d).origin);
            }
        }
        let Some(dd) = dd else {
            return Ok(());
        };

        for ee in enemies {
            let ee = oracle.dragon(ee).origin;
            if ee == dd {
                continue;
            }
            if kind == ReasonKind::Defend {
                trace!("{pos}: defense of {aa} cuts {dd} from {ee}");
                self.add_cut_move(&*oracle, pos, dd, ee)?;
                continue;
            }
            // Capturing a dead worm between two strong dragons only
            // loses points.
            if dragon.matcher_status == Status::Dead
                && oracle.dragon(dd).safety.is_strong()
                && oracle.dragon(ee).safety.is_strong()
            {
                continue;
            }
            let dd_ok = oracle.worm(dd).attack_code == Outcome::Fail || oracle.does_defend(pos, dd);
            let ee_ok = oracle.worm(ee).attack_code == Outcome::Fail || oracle.does_defend(pos, ee);
            if dd_ok && ee_ok {
                trace!("{pos}: capture of {aa} connects {dd} and {ee}");
                self.add_connection_move(&*oracle, pos, dd, ee)?;
            }
        }
        Ok(())
    }
}
