//! Combining the territorial, strategic and auxiliary values of a point
//! into one number.

use log::trace;

use crate::board::{Color, Point};
use crate::oracle::{BoardView, Oracle};
use crate::reasons::ReasonKind;
use crate::session::Session;

/// Lower bound of the base for the connects-strings bonus.
const CONNECT_BASE_MIN: f32 = 1.0;
/// Upper bound of the base for the connects-strings bonus.
const CONNECT_BASE_MAX: f32 = 5.0;

impl Session {
    /// Whether `pos` carries an antisuji reason and must not be played.
    pub fn is_antisuji_move(&self, pos: Point) -> bool {
        self.reason_known(pos, ReasonKind::Antisuji, None)
    }

    /// Full value of playing `pos` for `color`.
    ///
    /// `pure_threat_value` is what a move that only threatens something is
    /// worth; `score` is the current estimate, positive when White leads.
    pub fn value_move_reasons<O: Oracle + ?Sized>(
        &mut self,
        oracle: &mut O,
        pos: Point,
        color: Color,
        pure_threat_value: f32,
        score: f32,
    ) -> f32 {
        if self.is_antisuji_move(pos) {
            return 0.0;
        }

        if !self.record(pos).reasons.is_empty() || self.record(pos).min_territory > 0.0 {
            self.sort_reasons(pos);
            self.discard_redundant_move_reasons(&*oracle, pos);
            self.estimate_territorial_value(oracle, pos, color, score);
            self.estimate_strategical_value(oracle, pos, color, score);
        }

        let record = self.record(pos);
        let mut tot_value = record.territorial_value + record.strategical_value;
        let shape_factor = record.shape_factor();
        let followup = record.followup_value;
        let reverse = record.reverse_followup_value;
        let additional_ko_value;

        if tot_value > 0.0 {
            if tot_value >= 0.5 || reverse >= 1.0 {
                // Gote, reverse sente and sente, in that order.
                let contribution = (0.5 * followup + 0.5 * reverse)
                    .min(tot_value + followup)
                    .min(1.1 * tot_value + reverse);
                if contribution != 0.0 {
                    trace!("  {pos}: {contribution} - added due to followup ({followup}) and reverse followup values ({reverse})");
                }
                tot_value += contribution;
                additional_ko_value = (followup + reverse - contribution).max(0.0);
            } else {
                additional_ko_value = shape_factor * (followup + reverse);
            }

            let secondary = self.record(pos).secondary_value;
            if secondary != 0.0 {
                trace!("  {pos}: {} - secondary", 0.05 * secondary);
            }
            tot_value += 0.05 * secondary;

            let record = self.record(pos);
            if record.numpos_shape + record.numneg_shape > 0 {
                let old_value = tot_value;
                tot_value *= shape_factor;
                trace!(
                    "  {pos}: {} - shape (shape values +{:.2}({}) -{:.2}({}), shape factor {:.3})",
                    tot_value - old_value,
                    record.maxpos_shape,
                    record.numpos_shape,
                    record.maxneg_shape,
                    record.numneg_shape,
                    shape_factor
                );
            }

            let c = move_connects_strings(&*oracle, pos, color);
            if c > 0 {
                let factor = 1.02f32.powi(c as i32) - 1.0;
                let base = tot_value.clamp(CONNECT_BASE_MIN, CONNECT_BASE_MAX);
                trace!("  {pos}: {} - connects strings (connect value {c}, shape factor {factor:.3})",
                    base * factor);
                tot_value += base * factor;
            }
        } else {
            additional_ko_value = shape_factor * (followup + followup.min(reverse));
        }
        self.record_mut(pos).additional_ko_value = additional_ko_value;

        if pure_threat_value > 0.0
            && self.record(pos).worthwhile_threat
            && tot_value <= pure_threat_value
            && oracle.color_at(pos).is_none()
            && additional_ko_value > 0.0
            && oracle.is_legal(pos, color)
            && self.confirm_move_safety(oracle, pos, color, 0)
        {
            let mut new_value = pure_threat_value.min(tot_value + 0.25 * additional_ko_value);
            // Moves with value of their own stay ahead of pure threats.
            new_value *= 1.0 - 0.1 * (pure_threat_value - tot_value) / pure_threat_value;
            if new_value > tot_value {
                trace!("  {pos}: {} - carry out threat or defend against threat",
                    new_value - tot_value);
                tot_value = new_value;
            }
        }

        let record = self.record_mut(pos);
        if record.min_value > record.max_value {
            record.max_value = record.min_value;
        }
        // Tie-break between moves sharing a small minimum value.
        if record.min_value < 25.0 {
            record.min_value += tot_value / 200.0;
        }
        if record.min_value > 0.0 && tot_value < record.min_value {
            tot_value = record.min_value;
            trace!("  {pos}:   {tot_value} - minimum accepted value");
        }
        if tot_value > record.max_value {
            tot_value = record.max_value;
            trace!("  {pos}:   {tot_value} - maximum accepted value");
        }

        if tot_value > 0.0 || record.territorial_value > 0.0 || record.strategical_value > 0.0 {
            trace!("Move generation values {pos} to {tot_value}");
        }
        tot_value
    }

    /// Asks the referee whether `mv` loses no more than `allowed_loss`
    /// stones, given everything the move is supposed to save.
    pub fn confirm_move_safety<O: Oracle + ?Sized>(
        &self,
        oracle: &mut O,
        mv: Point,
        color: Color,
        allowed_loss: i32,
    ) -> bool {
        let saved_dragons = self.saved_dragons(&*oracle, mv);
        let saved_worms = self.saved_worms(&*oracle, mv);
        oracle.confirm_safety(mv, color, allowed_loss, &saved_dragons, &saved_worms)
    }
}

/// Number of distinct own strings solidly joined by `pos`, plus a bonus
/// for short-of-liberty strings of either colour next to it.
pub fn move_connects_strings<B: BoardView + ?Sized>(board: &B, pos: Point, color: Color) -> u32 {
    let mut strings: Vec<Point> = Vec::with_capacity(4);
    for n in board.size().neighbors(pos) {
        if board.color_at(n).is_none() {
            continue;
        }
        let origin = board.string_origin(n);
        if !strings.contains(&origin) {
            strings.push(origin);
        }
    }

    let mut own_strings = 0;
    let mut fewlibs = 0;
    for s in strings {
        let libs = board.liberties(s);
        if board.color_at(s) == Some(color) {
            own_strings += 1;
            if board.approx_liberties_after(pos, color) >= libs {
                if libs <= 4 {
                    fewlibs += 1;
                }
                if libs <= 2 {
                    fewlibs += 1;
                }
            }
        } else {
            if libs <= 2 {
                fewlibs += 1;
            }
            if libs <= 1 {
                fewlibs += 1;
            }
        }
    }

    fewlibs = fewlibs.min(4);
    if fewlibs == 0 && own_strings == 1 {
        own_strings = 0;
    }
    own_strings + fewlibs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Outcome;
    use crate::reasons::Redundancy;
    use crate::sandbox::{Sandbox, Scenario};

    fn pt(s: &str) -> Point {
        s.parse().unwrap()
    }

    /// Both captures, with the owl reader also killing the G2 string.
    fn captures_with_owl() -> (Sandbox, Session) {
        let scenario =
            Scenario::from_json(include_str!("../../tests/data/two_captures.json")).unwrap();
        let (mut board, mut session) = scenario.build().unwrap();
        session
            .add_owl_attack_move(&board, pt("G1"), pt("G2"), Outcome::Win)
            .unwrap();
        session.examine_move_safety(&mut board, Color::Black);
        (board, session)
    }

    fn valued(discard: bool) -> (f32, bool) {
        let (mut board, mut session) = captures_with_owl();
        let pos = pt("G1");
        session.sort_reasons(pos);
        if discard {
            session.discard_redundant_move_reasons(&board, pos);
        }
        session.estimate_territorial_value(&mut board, pos, Color::Black, 0.0);
        session.estimate_strategical_value(&mut board, pos, Color::Black, 0.0);
        let record = session.record(pos);
        let attack_flagged = session.reasons_at(pos).any(|r| {
            r.kind == ReasonKind::Attack && r.redundancy.contains(Redundancy::TERRITORY)
        });
        (record.territorial_value + record.strategical_value, attack_flagged)
    }

    #[test]
    fn discarding_never_raises_the_value() {
        let (kept, flagged_without) = valued(false);
        let (discarded, flagged_with) = valued(true);
        assert!(!flagged_without);
        assert!(flagged_with);
        assert!(discarded <= kept, "{discarded} > {kept}");
        // The owl kill still pays for the string once.
        assert_eq!(discarded, 6.0);
    }

    #[test]
    fn flagging_any_single_reason_never_raises_the_value() {
        let pos = pt("G1");
        let (mut board, mut session) = captures_with_owl();
        let full = session.value_move_reasons(&mut board, pos, Color::Black, 0.0, 0.0);
        let count = session.record(pos).reasons.len();
        assert_eq!(count, 2);
        for k in 0..count {
            let (mut board, mut session) = captures_with_owl();
            let id = session.record(pos).reasons[k];
            session.reasons[id.0 as usize].redundancy = Redundancy::BOTH;
            let value = session.value_move_reasons(&mut board, pos, Color::Black, 0.0, 0.0);
            assert!(value <= full, "reason {k}: {value} > {full}");
        }
    }

    #[test]
    fn taking_a_string_in_atari_earns_the_connection_bonus() {
        let (mut board, mut session) = captures_with_owl();
        let pos = pt("C1");
        assert_eq!(move_connects_strings(&board, pos, Color::Black), 2);
        let value = session.value_move_reasons(&mut board, pos, Color::Black, 0.0, 0.0);
        let expected = 2.0 + 2.0 * (1.02f32.powi(2) - 1.0);
        assert!((value - expected).abs() < 1e-4, "value {value}");
    }

    #[test]
    fn antisuji_points_are_worthless() {
        let (mut board, mut session) = captures_with_owl();
        session.add_antisuji_move(pt("C1")).unwrap();
        assert!(session.is_antisuji_move(pt("C1")));
        assert_eq!(
            session.value_move_reasons(&mut board, pt("C1"), Color::Black, 0.0, 0.0),
            0.0
        );
    }
}
