//! Territorial value of a move: points gained on the board.

use log::{debug, trace};

use crate::board::{Color, Outcome, Point, Safety, Status, StoneMark, StoneMarks};
use crate::oracle::{BoardView, Oracle, Trial};
use crate::reasons::{ReasonKind, Redundancy, Subject};
use crate::session::Session;

impl Session {
    /// Sets `territorial_value` of `pos` and adds to its
    /// `secondary_value`. May raise the follow-up values.
    pub fn estimate_territorial_value<O: Oracle + ?Sized>(
        &mut self,
        oracle: &mut O,
        pos: Point,
        color: Color,
        score: f32,
    ) {
        use ReasonKind::*;
        let doing_scoring = self.config.doing_scoring;
        let move_safety = self.record(pos).move_safety;
        let mut tot_value = 0.0f32;
        let mut secondary_value = 0.0f32;
        let mut does_block = false;
        let mut marks = StoneMarks::new(self.size);

        for reason in self.reason_snapshot(pos) {
            if reason.redundancy.contains(Redundancy::TERRITORY) {
                continue;
            }
            let kind = reason.kind;
            match (kind, reason.subject) {
                (Attack | AttackGoodKo | AttackBadKo | Defend | DefendGoodKo | DefendBadKo,
                 Subject::Worm(w)) => {
                    let aa = self.registry.worm_origin(w);
                    let worm = oracle.worm(aa);
                    let attack = kind.is_tactical_attack();
                    if attack && worm.defense_code == Outcome::Fail {
                        debug!("  {pos}: {} (secondary) - attack on {aa} (defenseless)",
                            worm.effective_size);
                        secondary_value += worm.effective_size;
                        continue;
                    }
                    if !move_safety {
                        debug!("  {pos}: 0.0 - {kind} of {aa} (unsafe move)");
                        continue;
                    }
                    let this_value = 2.0 * worm.effective_size;
                    if oracle.dragon(aa).matcher_status == Status::Dead {
                        debug!("  {pos}: {} (secondary) - {kind} of {aa} (dead)",
                            0.2 * this_value);
                        secondary_value += 0.2 * this_value;
                        continue;
                    }
                    let mark = if attack { StoneMark::Captured } else { StoneMark::Saved };
                    for p in self.size.points() {
                        if oracle.same_string(p, aa) {
                            marks.set(p, mark);
                        }
                    }
                    trace!("  {pos}: {kind} of worm {aa}");
                    let discount = this_value * kind.ko_discount();
                    if discount > 0.0 {
                        trace!("  {pos}: -{discount} - {kind} of worm {aa} only with ko");
                    }
                    tot_value -= discount;
                    does_block = true;
                }

                (AttackThreat, Subject::Worm(w)) => {
                    let aa = self.registry.worm_origin(w);
                    if oracle.color_at(aa) == Some(color)
                        || oracle.dragon(aa).matcher_status == Status::Dead
                    {
                        continue;
                    }
                    if let Some(value) = threat_followup(oracle, pos, aa, color) {
                        if value > 0.0 {
                            trace!("  {pos}: {value} (followup) - threatens to capture {aa}");
                            self.raise_followup(pos, value);
                        }
                    }
                }

                (DefendThreat, Subject::Worm(w)) => {
                    let aa = self.registry.worm_origin(w);
                    if oracle.color_at(aa) != Some(color)
                        || oracle.dragon(aa).matcher_status == Status::Dead
                    {
                        continue;
                    }
                    let value = 2.0 * oracle.worm(aa).effective_size;
                    trace!("  {pos}: {value} (followup) - threatens to defend {aa}");
                    self.raise_followup(pos, value);
                }

                (Connect | Cut | StrategicAttack | StrategicDefend | BlockTerritory
                 | ExpandTerritory | ExpandMoyo, _) => does_block = true,

                (Semeai, Subject::Dragon(d)) => {
                    let aa = self.registry.dragon_origin(d);
                    let this_value = 2.0 * oracle.dragon(aa).effective_size;
                    trace!("  {pos}: {this_value} - semeai involving {aa}");
                    tot_value += this_value;
                }

                (SemeaiThreat, Subject::Dragon(d)) => {
                    let aa = self.registry.dragon_origin(d);
                    let value = 2.0 * oracle.dragon(aa).effective_size;
                    trace!("  {pos}: {value} (followup) - threatens to win semeai for {aa}");
                    self.raise_followup(pos, value);
                }

                (OwlAttack | OwlAttackGoodKo | OwlAttackBadKo | OwlDefend | OwlDefendGoodKo
                 | OwlDefendBadKo, Subject::Dragon(d)) => {
                    let aa = self.registry.dragon_origin(d);
                    let dragon = oracle.dragon(aa);
                    // The owl reader misses that capturing a lone ko stone
                    // is conditional.
                    if dragon.size == 1 && oracle.is_ko_point(aa) {
                        trace!("  {pos}: -0.5 - penalty for ko stone {aa}");
                        tot_value -= 0.5;
                        continue;
                    }
                    let mark = if kind.is_owl_attack() {
                        StoneMark::Captured
                    } else {
                        StoneMark::Saved
                    };
                    for p in self.size.points() {
                        if oracle.color_at(p).is_some() && oracle.same_dragon(p, aa) {
                            marks.set(p, mark);
                        }
                    }
                    trace!("  {pos}: {kind} of {aa}");
                    tot_value -= 2.0 * dragon.effective_size * kind.ko_discount();
                    does_block = true;
                }

                (OwlAttackThreat, Subject::Dragon(d)) => {
                    let aa = self.registry.dragon_origin(d);
                    let dragon = oracle.dragon(aa);
                    if dragon.matcher_status == Status::Dead {
                        debug!("  {pos}: 0.0 - threatens to owl attack {aa} (dead)");
                        continue;
                    }
                    if self.critical_neighbour_undefended(&*oracle, pos, aa, color) {
                        continue;
                    }
                    let value = 2.0 * dragon.effective_size;
                    trace!("  {pos}: {value} (followup) - threatens to owl attack {aa}");
                    self.raise_followup(pos, value);
                }

                (OwlDefenseThreat, Subject::Dragon(d)) => {
                    let aa = self.registry.dragon_origin(d);
                    let value = 2.0 * oracle.dragon(aa).effective_size;
                    trace!("  {pos}: {value} (followup) - threatens to owl defend {aa}");
                    self.raise_followup(pos, value);
                }

                (OwlPreventThreat, Subject::Dragon(d)) => {
                    let aa = self.registry.dragon_origin(d);
                    let effective_size = oracle.dragon(aa).effective_size;
                    let last_in_dragon = oracle
                        .last_move()
                        .is_some_and(|last| oracle.same_dragon(last, aa));
                    if !doing_scoring && last_in_dragon {
                        let this_value = 1.5 * effective_size;
                        trace!("  {pos}: {this_value} - attack last move played, although it seems dead");
                        tot_value += this_value;
                    } else if !doing_scoring && color.is_ahead(score) {
                        let half_board = (self.size.get() / 2) as f32;
                        let this_value = (0.9 * effective_size)
                            .min((score / 2.0).abs() - half_board - 1.0)
                            .max(0.0);
                        trace!("  {pos}: {this_value} - attack {aa}, although it seems dead, as we are ahead");
                        tot_value += this_value;
                    } else {
                        let value = 2.0 * effective_size;
                        trace!("  {pos}: {value} (reverse followup) - prevent threat against {aa}");
                        let record = self.record_mut(pos);
                        record.reverse_followup_value = record.reverse_followup_value.max(value);
                    }
                }

                (MyAtariAtari, Subject::Size(size)) => {
                    let this_value = 2.0 * size as f32 + 3.0;
                    if oracle.territory_color(pos) == Some(color.other()) {
                        does_block = true;
                    }
                    trace!("  {pos}: {this_value} - combination attack kills one of several worms");
                    tot_value += this_value;
                }

                (YourAtariAtari, Subject::Size(size)) => {
                    let mut this_value = 2.0 * size as f32 + 3.0;
                    if oracle.territory_color(pos) == Some(color) {
                        this_value += 7.0;
                    }
                    trace!("  {pos}: {this_value} - defends against combination attack on several worms");
                    tot_value += this_value;
                }

                _ => {}
            }
        }

        marks.set(
            pos,
            if move_safety {
                StoneMark::Saved
            } else {
                StoneMark::Captured
            },
        );
        if does_block {
            let delta = oracle.delta_territory(pos, color, &marks);
            if delta != 0.0 {
                trace!("  {pos}: {delta} - change in territory");
            } else {
                debug!("  {pos}: 0.0 - block or expand territory");
            }
            tot_value += delta;
        }

        let record = self.record(pos);
        if record.min_territory > 0.0 && tot_value < record.min_territory {
            tot_value = record.min_territory;
            trace!("  {pos}:   {tot_value} - revised to meet minimum territory value");
        }
        if tot_value > record.max_territory {
            tot_value = record.max_territory;
            trace!("  {pos}:   {tot_value} - revised to meet maximum territory value");
        }

        // Playing inside enemy territory is assumed to be a sacrifice.
        if tot_value > 1.0 && oracle.safe_move(pos, color) != Outcome::Win {
            trace!("  {pos}:   -1 - unsafe move, assumed sacrifice");
            tot_value -= 1.0;
        }

        let record = self.record_mut(pos);
        record.territorial_value = tot_value;
        record.secondary_value += secondary_value;
    }

    fn raise_followup(&mut self, pos: Point, value: f32) {
        let record = self.record_mut(pos);
        record.followup_value = record.followup_value.max(value);
    }

    /// Some own dragon next to `aa` is critical, matters, and is not owl
    /// defended by `pos`. Attacking `aa` is then likely a mistake.
    pub(crate) fn critical_neighbour_undefended<B: BoardView + ?Sized>(
        &self,
        board: &B,
        pos: Point,
        aa: Point,
        color: Color,
    ) -> bool {
        board.dragon_neighbors(aa).into_iter().any(|adj| {
            let neighbour = board.dragon(adj);
            neighbour.color == color
                && neighbour.matcher_status == Status::Critical
                && neighbour.safety != Safety::Inessential
                && !self
                    .registry
                    .find_dragon(neighbour.origin)
                    .is_some_and(|d| self.owl_defense_known(pos, Some(d)))
        })
    }
}

/// Follow-up value of threatening to capture `aa`: twice its size, plus
/// the biggest dead own dragon it holds in, minus the biggest own worm the
/// opponent could capture in reply. `None` when `pos` cannot be played.
fn threat_followup<O: Oracle + ?Sized>(
    oracle: &mut O,
    pos: Point,
    aa: Point,
    color: Color,
) -> Option<f32> {
    let mut trial = Trial::play(oracle, pos, color)?;
    let mut adjusted = 2.0 * trial.worm(aa).effective_size;
    let links = if trial.color_at(aa).is_some() {
        trial.chain_links(aa)
    } else {
        Vec::new()
    };
    let mut up = 0.0f32;
    let mut down = 0.0f32;
    for adj in links {
        if trial.same_string(pos, adj) {
            continue;
        }
        let dragon = trial.dragon(adj);
        if dragon.color != color {
            continue;
        }
        if dragon.matcher_status == Status::Dead {
            up = up.max(2.0 * dragon.effective_size);
        }
        if trial.attack(adj).is_success() {
            down = down.max(2.0 * trial.worm(adj).effective_size);
        }
    }
    adjusted += up - down;
    Some(adjusted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sandbox::{Sandbox, Scenario};

    fn pt(s: &str) -> Point {
        s.parse().unwrap()
    }

    fn two_captures() -> Scenario {
        Scenario::from_json(include_str!("../../tests/data/two_captures.json")).unwrap()
    }

    fn territorial(scenario: &Scenario, at: &str) -> (f32, f32) {
        let (mut board, mut session): (Sandbox, Session) = scenario.build().unwrap();
        session.examine_move_safety(&mut board, Color::Black);
        session.estimate_territorial_value(&mut board, pt(at), Color::Black, 0.0);
        let record = session.record(pt(at));
        (record.territorial_value, record.secondary_value)
    }

    #[test]
    fn capture_is_twice_the_effective_size() {
        let scenario = two_captures();
        assert_eq!(territorial(&scenario, "C1"), (2.0, 0.0));
        assert_eq!(territorial(&scenario, "G1"), (6.0, 0.0));
    }

    #[test]
    fn defenseless_string_is_only_secondary() {
        let mut scenario = two_captures();
        scenario.worms[1].defense = Outcome::Fail;
        scenario.worms[1].defense_point = None;
        assert_eq!(territorial(&scenario, "G1"), (0.0, 3.0));
    }

    #[test]
    fn capture_of_dead_string_is_secondary() {
        let mut scenario = two_captures();
        scenario.dragons.push(crate::sandbox::DragonSpec {
            stones: vec![pt("G2")],
            matcher_status: Status::Dead,
            ..Default::default()
        });
        assert_eq!(territorial(&scenario, "G1"), (0.0, 0.2 * 6.0));
    }

    #[test]
    fn ko_capture_is_discounted() {
        let mut scenario = two_captures();
        scenario.observations[1] = crate::sandbox::Observation::Attack {
            at: pt("G1"),
            worm: pt("G2"),
            code: Outcome::GoodKo,
        };
        let (value, _) = territorial(&scenario, "G1");
        assert!((value - 0.7 * 6.0).abs() < 1e-4, "value {value}");
    }

    #[test]
    fn minimum_territory_is_met() {
        let (mut board, mut session) = two_captures().build().unwrap();
        session.set_minimum_territorial_value(pt("E5"), 4.5).unwrap();
        session.estimate_territorial_value(&mut board, pt("E5"), Color::Black, 0.0);
        assert_eq!(session.record(pt("E5")).territorial_value, 4.5);
    }
}
