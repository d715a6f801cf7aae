//! Strategic value of a move: its effect on the safety of dragons.

use log::{debug, trace};

use super::tables::{connection_value, dragon_safety, CAUTIOUS_MARGIN};
use crate::board::{Color, Outcome, Point, Safety, Status};
use crate::oracle::Oracle;
use crate::reasons::{DragonId, ReasonKind, Redundancy, Subject};
use crate::session::Session;

impl Session {
    /// Sets `strategical_value` of `pos`. Must run after the territorial
    /// valuation of the same point.
    pub fn estimate_strategical_value<O: Oracle + ?Sized>(
        &mut self,
        oracle: &mut O,
        pos: Point,
        color: Color,
        score: f32,
    ) {
        use ReasonKind::*;
        let record = self.record(pos);
        let move_safety = record.move_safety;
        let territorial_value = record.territorial_value;
        let doing_scoring = self.config.doing_scoring;
        let mut tot_value = 0.0f32;
        let mut dragon_value = vec![0.0f32; self.registry.dragon_count()];

        for reason in self.reason_snapshot(pos) {
            if reason.redundancy.contains(Redundancy::STRATEGY) {
                continue;
            }
            let kind = reason.kind;
            match (kind, reason.subject) {
                (
                    Attack | AttackGoodKo | AttackBadKo | Defend | DefendGoodKo | DefendBadKo,
                    Subject::Worm(w),
                ) => {
                    let aa = self.registry.worm_origin(w);
                    let worm = oracle.worm(aa);
                    if worm.defense_code == Outcome::Fail || !move_safety {
                        continue;
                    }
                    if worm.cutstone2 > 1 {
                        let this_value = 10.0 * (worm.cutstone2 - 1) as f32;
                        trace!("  {pos}: {this_value} - {aa} cutstone");
                        tot_value += this_value;
                    }
                    if oracle.dragon(aa).safety == Safety::Inessential || worm.inessential {
                        continue;
                    }
                    let lunches: Vec<DragonId> = self
                        .registry
                        .lunches()
                        .iter()
                        .filter(|l| l.food == w)
                        .map(|l| l.eater)
                        .collect();
                    for eater in lunches {
                        let bb = self.registry.dragon_origin(eater);
                        let dragon = oracle.dragon(bb);
                        let mut this_value =
                            dragon.effective_size * (1.0 - dragon_safety(&dragon, false));
                        if dragon.matcher_status != Status::Dead
                            && dragon.size == oracle.worm(bb).size
                            && self.tactical_known_at(&*oracle, pos, bb)
                        {
                            this_value = 0.0;
                        }
                        if oracle.worm(bb).attack_code.is_success() && !oracle.does_defend(pos, bb)
                        {
                            this_value = 0.0;
                        }
                        let slot = &mut dragon_value[eater.index()];
                        *slot = slot.max(this_value);
                    }
                }

                (AttackEither | DefendBoth, Subject::WormPair(pair)) => {
                    let (w1, w2) = self.registry.worm_pair_members(pair);
                    let aa = self.registry.worm_origin(w1);
                    let bb = self.registry.worm_origin(w2);
                    if oracle.dragon(aa).matcher_status == Status::Dead
                        && oracle.dragon(bb).matcher_status == Status::Dead
                    {
                        continue;
                    }
                    let this_value = if kind == AttackEither {
                        if self.reason_known(pos, MyAtariAtari, None) {
                            continue;
                        }
                        let aa_value = adjusted_worm_attack_value(oracle, pos, aa);
                        let bb_value = adjusted_worm_attack_value(oracle, pos, bb);
                        let value = aa_value.min(bb_value);
                        trace!("  {pos}: {value} - attacks either {aa} ({aa_value}) or {bb} ({bb_value})");
                        value
                    } else {
                        if self.reason_known(pos, YourAtariAtari, None) {
                            continue;
                        }
                        let value = 2.0
                            * oracle
                                .worm(aa)
                                .effective_size
                                .min(oracle.worm(bb).effective_size);
                        trace!("  {pos}: {value} - defends both {aa} and {bb}");
                        value
                    };
                    tot_value += this_value;
                }

                (Connect | Cut, Subject::Connection(c)) => {
                    if (kind == Connect || doing_scoring) && !move_safety {
                        continue;
                    }
                    let (d1, d2) = self.registry.connection_dragons(c);
                    let aa = self.registry.dragon_origin(d1);
                    let bb = self.registry.dragon_origin(d2);
                    let margin = if color.is_ahead(score) && score.abs() > CAUTIOUS_MARGIN {
                        score.abs()
                    } else {
                        0.0
                    };
                    let ab = connection_value(
                        &*oracle,
                        aa,
                        bb,
                        pos,
                        margin,
                        territorial_value,
                        doing_scoring,
                    );
                    let ba = connection_value(
                        &*oracle,
                        bb,
                        aa,
                        pos,
                        margin,
                        territorial_value,
                        doing_scoring,
                    );
                    let slot = &mut dragon_value[d1.index()];
                    *slot = slot.max(ab);
                    let slot = &mut dragon_value[d2.index()];
                    *slot = slot.max(ba);
                }

                (StrategicAttack | StrategicDefend, Subject::Dragon(d)) => {
                    let aa = self.registry.dragon_origin(d);
                    let dragon = oracle.dragon(aa);
                    let mut this_value =
                        0.75 * dragon.effective_size * (1.0 - dragon_safety(&dragon, true));
                    if kind == StrategicAttack
                        && self.critical_neighbour_undefended(&*oracle, pos, aa, color)
                    {
                        this_value = 0.0;
                    }
                    let slot = &mut dragon_value[d.index()];
                    *slot = slot.max(this_value);
                }

                (UncertainOwlDefense, Subject::Dragon(d)) => {
                    let aa = self.registry.dragon_origin(d);
                    if oracle
                        .dragon_neighbors(aa)
                        .into_iter()
                        .any(|adj| oracle.dragon(adj).matcher_status == Status::Critical)
                    {
                        continue;
                    }
                    let this_value = if color.is_behind(score) {
                        0.0
                    } else {
                        (2.0 * oracle.dragon(aa).effective_size).min((score / 2.0).abs())
                    };
                    let slot = &mut dragon_value[d.index()];
                    *slot = slot.max(this_value);
                }

                (VitalEye, Subject::Eye(e)) => {
                    let (eye, ecolor) = self.registry.eye_key(e);
                    if let Some(bb) = oracle.eye_dragon(eye, ecolor) {
                        debug!("  {pos}: 0.0 - vital for {bb}");
                    }
                }

                _ => {}
            }
        }

        for (index, &value) in dragon_value.iter().enumerate() {
            if value == 0.0 {
                continue;
            }
            let id = DragonId(index as u32);
            let aa = self.registry.dragon_origin(id);
            let dragon = oracle.dragon(aa);
            if dragon.matcher_status != Status::Dead
                && dragon.size == oracle.worm(aa).size
                && self.tactical_known_at(&*oracle, pos, aa)
            {
                continue;
            }
            // Owl and semeai reasons already paid for the dragon as
            // territory; only a larger strategic effect counts.
            if self.owl_move_known(pos, Some(id))
                || self.reason_known(pos, Semeai, Some(Subject::Dragon(id)))
            {
                let excess = value - 2.0 * dragon.effective_size;
                if excess > 0.0 {
                    trace!("  {pos}: {excess} - strategic bonus for {aa}");
                    tot_value += excess;
                }
                continue;
            }
            trace!("  {pos}: {value} - strategic effect on {aa}");
            tot_value += value;
        }

        self.record_mut(pos).strategical_value = tot_value;
    }
}

/// Value of capturing the worm at `ww` with `pos`, adjusted for its
/// neighbours: the largest dead dragon it holds in is added if some
/// neighbour is alive or critical, and the largest attackable neighbour
/// that `pos` does not defend is subtracted.
fn adjusted_worm_attack_value<O: Oracle + ?Sized>(oracle: &mut O, pos: Point, ww: Point) -> f32 {
    let mut has_live_neighbour = false;
    let mut up = 0.0f32;
    let mut down = 0.0f32;
    for adj in oracle.chain_links(ww) {
        let dragon = oracle.dragon(adj);
        if matches!(dragon.matcher_status, Status::Alive | Status::Critical) {
            has_live_neighbour = true;
        }
        if dragon.matcher_status == Status::Dead {
            up = up.max(2.0 * dragon.effective_size);
        }
        let worm = oracle.worm(adj);
        if worm.attack_code.is_success()
            && 2.0 * worm.effective_size > down
            && !oracle.does_defend(pos, adj)
        {
            down = 2.0 * worm.effective_size;
        }
    }
    let mut value = 2.0 * oracle.worm(ww).effective_size;
    if has_live_neighbour {
        value += up;
    }
    value - down
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sandbox::{Sandbox, Scenario};

    fn pt(s: &str) -> Point {
        s.parse().unwrap()
    }

    /// A critical white dragon at D4-E4 that F4 cuts from a strongly alive
    /// white stone at G4.
    fn cut_from_strong_friend() -> (Sandbox, Session) {
        let scenario = Scenario::from_json(
            r#"{
                "board": [".......", ".......", ".......", "..XOO.O",
                          ".......", ".......", "......."],
                "to_move": "black",
                "dragons": [
                    { "stones": ["D4", "E4"], "matcher_status": "critical",
                      "safety": "critical", "effective_size": 5.0 },
                    { "stones": ["G4"], "safety": "strongly_alive" }
                ],
                "observations": [
                    { "reason": "cut", "at": "F4", "a": "D4", "b": "G4" }
                ]
            }"#,
        )
        .unwrap();
        scenario.build().unwrap()
    }

    fn strategical(board: &mut Sandbox, session: &mut Session) -> f32 {
        session.estimate_strategical_value(board, pt("F4"), Color::Black, 0.0);
        session.record(pt("F4")).strategical_value
    }

    #[test]
    fn cut_is_worth_the_weak_side() {
        let (mut board, mut session) = cut_from_strong_friend();
        // 1.08 of twice the critical dragon; the strong side gains nothing.
        let value = strategical(&mut board, &mut session);
        assert!((value - 10.8).abs() < 1e-4, "value {value}");
    }

    #[test]
    fn owl_attack_leaves_only_the_excess() {
        let (mut board, mut session) = cut_from_strong_friend();
        session
            .add_owl_attack_move(&board, pt("F4"), pt("E4"), Outcome::Win)
            .unwrap();
        let value = strategical(&mut board, &mut session);
        // The owl kill already pays 2 * 5 as territory.
        assert!((value - 0.8).abs() < 1e-4, "value {value}");
    }

    #[test]
    fn semeai_leaves_only_the_excess() {
        let (mut board, mut session) = cut_from_strong_friend();
        session.add_semeai_move(&board, pt("F4"), pt("D4")).unwrap();
        let value = strategical(&mut board, &mut session);
        assert!((value - 0.8).abs() < 1e-4, "value {value}");
    }

    #[test]
    fn tactical_move_on_single_string_dragon_replaces_its_value() {
        let (mut board, mut session) = cut_from_strong_friend();
        session
            .add_attack_move(&board, pt("F4"), pt("D4"), Outcome::Win)
            .unwrap();
        assert_eq!(strategical(&mut board, &mut session), 0.0);
    }

    #[test]
    fn strategy_redundant_reasons_are_skipped() {
        let (mut board, mut session) = cut_from_strong_friend();
        let id = session.record(pt("F4")).reasons[0];
        session.reasons[id.0 as usize].redundancy = Redundancy::STRATEGY;
        assert_eq!(strategical(&mut board, &mut session), 0.0);
    }
}
