//! Move safety classification.
//!
//! A move is safe when some reason establishes that the stone will not
//! simply be lost. Safety comes in two strengths: general safety (the
//! stone may generate influence) and tactical safety (no need to ask the
//! blunder checker). Each reason kind maps to one [`SafetyRule`].

use crate::board::{Color, Point, Status};
use crate::oracle::Oracle;
use crate::reasons::{ReasonKind, Subject};
use crate::session::Session;

/// How a reason kind contributes to the safety of its move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SafetyRule {
    /// Contributes nothing on its own.
    Distrust,
    /// General and tactical safety.
    Full,
    /// General safety only.
    TerritoryOnly,
    /// Safe if the captured group is big or our neighbour survives.
    CaptureCheck,
    /// Safe if the defended dragon is, or becomes, alive.
    DefenseCheck,
    /// Safe if either side of the connection is alive.
    ConnectionCheck,
}

impl SafetyRule {
    pub fn for_kind(kind: ReasonKind) -> SafetyRule {
        use ReasonKind::*;
        match kind {
            Semeai | AttackEither | DefendBoth | OwlDefend | OwlDefendGoodKo | OwlDefendBadKo
            | MyAtariAtari => SafetyRule::Full,
            BlockTerritory | ExpandTerritory | ExpandMoyo => SafetyRule::TerritoryOnly,
            Attack | AttackGoodKo | AttackBadKo | OwlAttack | OwlAttackGoodKo | OwlAttackBadKo => {
                SafetyRule::CaptureCheck
            }
            Defend | DefendGoodKo | DefendBadKo => SafetyRule::DefenseCheck,
            Connect => SafetyRule::ConnectionCheck,
            _ => SafetyRule::Distrust,
        }
    }
}

/// Captures at least this big are always safe.
const SAFE_CAPTURE_SIZE: f32 = 8.0;

#[derive(Debug, Default, Clone, Copy)]
struct Verdict {
    general: bool,
    tactical: bool,
}

impl Verdict {
    fn full(&mut self) {
        self.general = true;
        self.tactical = true;
    }
}

impl Session {
    /// Sets `move_safety` for every point.
    pub fn examine_move_safety<O: Oracle + ?Sized>(&mut self, oracle: &mut O, color: Color) {
        for pos in self.size.points() {
            let mut verdict = Verdict::default();
            let mut checked_move = None;
            for reason in self.reason_snapshot(pos) {
                match SafetyRule::for_kind(reason.kind) {
                    SafetyRule::Distrust => {}
                    SafetyRule::Full => verdict.full(),
                    SafetyRule::TerritoryOnly => verdict.general = true,
                    SafetyRule::CaptureCheck => {
                        self.check_capture(oracle, pos, color, reason.subject, &mut verdict)
                    }
                    SafetyRule::DefenseCheck => {
                        if let Subject::Worm(w) = reason.subject {
                            let aa = self.registry.worm_origin(w);
                            if oracle.dragon(aa).matcher_status == Status::Alive
                                || oracle.owl_does_defend(pos, aa).is_success()
                            {
                                verdict.general = true;
                            }
                        }
                    }
                    SafetyRule::ConnectionCheck => {
                        if let Subject::Connection(c) = reason.subject {
                            let (a, b) = self.registry.connection_dragons(c);
                            let aa = self.registry.dragon_origin(a);
                            let bb = self.registry.dragon_origin(b);
                            let (da, db) = (oracle.dragon(aa), oracle.dragon(bb));
                            let unchecked_alive = |s: Status, owl: Status| {
                                owl == Status::Unchecked && s == Status::Alive
                            };
                            if da.owl_status == Status::Alive
                                || db.owl_status == Status::Alive
                                || unchecked_alive(da.status, da.owl_status)
                                || unchecked_alive(db.status, db.owl_status)
                                || oracle.owl_connection_defends(pos, aa, bb)
                            {
                                verdict.full();
                            }
                        }
                    }
                }
                if verdict.general
                    && (verdict.tactical || *checked_move.get_or_insert_with(|| {
                        oracle.safe_move(pos, color).is_success()
                    }))
                {
                    break;
                }
            }
            let safe = verdict.general
                && (verdict.tactical
                    || checked_move
                        .unwrap_or_else(|| oracle.safe_move(pos, color).is_success()));
            self.record_mut(pos).move_safety = safe;
        }
    }

    fn check_capture<O: Oracle + ?Sized>(
        &self,
        oracle: &mut O,
        pos: Point,
        color: Color,
        subject: Subject,
        verdict: &mut Verdict,
    ) {
        let mut bb = None;
        let neighbours = match subject {
            Subject::Worm(w) => {
                let aa = self.registry.worm_origin(w);
                if oracle.worm(aa).effective_size >= SAFE_CAPTURE_SIZE {
                    verdict.full();
                    return;
                }
                let mut seen: Vec<Point> = Vec::new();
                for adj in oracle.chain_links(aa) {
                    if oracle.color_at(adj) != Some(color) {
                        continue;
                    }
                    let origin = oracle.dragon(adj).origin;
                    if !seen.contains(&origin) {
                        seen.push(origin);
                        bb = Some(adj);
                    }
                }
                seen.len()
            }
            Subject::Dragon(d) => {
                let aa = self.registry.dragon_origin(d);
                if oracle.dragon(aa).effective_size >= SAFE_CAPTURE_SIZE {
                    verdict.full();
                    return;
                }
                let mut count = 0;
                for adj in oracle.dragon_neighbors(aa) {
                    let neighbour = oracle.dragon(adj);
                    if neighbour.color == color {
                        count += 1;
                        bb = Some(neighbour.origin);
                        if neighbour.matcher_status == Status::Alive {
                            verdict.full();
                        }
                    }
                }
                count
            }
            _ => return,
        };

        // Several friendly neighbours: the connection reasons decide.
        if neighbours > 1 {
            return;
        }
        if let Some(own) = self
            .size
            .neighbors(pos)
            .find(|&n| oracle.color_at(n) == Some(color))
        {
            bb = Some(own);
        }
        match bb {
            None => verdict.full(),
            Some(bb) => {
                if oracle.dragon(bb).matcher_status == Status::Alive
                    || oracle.owl_does_defend(pos, bb).is_success()
                {
                    verdict.full();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cuts_and_threats_are_distrusted() {
        for kind in [
            ReasonKind::Cut,
            ReasonKind::AttackThreat,
            ReasonKind::DefendThreat,
            ReasonKind::Antisuji,
            ReasonKind::StrategicDefend,
        ] {
            assert_eq!(SafetyRule::for_kind(kind), SafetyRule::Distrust);
        }
    }

    #[test]
    fn ko_variants_share_rules() {
        assert_eq!(
            SafetyRule::for_kind(ReasonKind::AttackBadKo),
            SafetyRule::CaptureCheck
        );
        assert_eq!(
            SafetyRule::for_kind(ReasonKind::OwlAttackGoodKo),
            SafetyRule::CaptureCheck
        );
        assert_eq!(
            SafetyRule::for_kind(ReasonKind::OwlDefendBadKo),
            SafetyRule::Full
        );
        assert_eq!(
            SafetyRule::for_kind(ReasonKind::DefendGoodKo),
            SafetyRule::DefenseCheck
        );
    }
}
