//! Final scoring and move selection.
//!
//! [`Session::review_move_reasons`] runs the whole review: induction,
//! safety, valuation of every point, redistribution along the
//! replacement map, and a selection loop that rejects illegal ko
//! captures and blunders until a playable move is found.

use log::{debug, log_enabled, trace, Level};
use serde::Serialize;

use crate::board::{Color, Point, PointSet};
use crate::oracle::Oracle;
use crate::reasons::ReasonError;
use crate::session::Session;

/// Level above which reasons are upgraded with owl reading.
const OWL_UPGRADE_LEVEL: u32 = 5;

/// Number of moves listed in the top-moves trace.
const TOP_MOVES: usize = 10;

/// The chosen move and its value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Decision {
    pub point: Point,
    pub value: f32,
}

impl Session {
    /// Reviews every reason collected this cycle and picks the move to
    /// play for `color`, or `None` when nothing is worth playing.
    pub fn review_move_reasons<O: Oracle + ?Sized>(
        &mut self,
        oracle: &mut O,
        color: Color,
        pure_threat_value: f32,
        score: f32,
    ) -> Result<Option<Decision>, ReasonError> {
        debug!("Looking for additional attack and defense moves");
        self.find_more_attack_and_defense_moves(oracle, color)?;
        if self.config.level > OWL_UPGRADE_LEVEL {
            debug!("Trying to upgrade strategical attack and defense moves");
            self.find_more_owl_attack_and_defense_moves(oracle, color)?;
        }
        self.induce_secondary_move_reasons(oracle, color)?;
        self.examine_move_safety(oracle, color);

        if log_enabled!(Level::Debug) {
            for p in self.size.points() {
                for line in self.list_move_reasons(&*oracle, p) {
                    debug!("{line}");
                }
            }
        }

        self.value_moves(oracle, color, pure_threat_value, score);
        self.redistribute_points();
        self.log_top_moves();

        let mut rejected = PointSet::new(self.size);
        let mut ko_values_added = false;
        loop {
            let Some((best_move, bestval)) = self.best_candidate(oracle, color, &rejected) else {
                return Ok(None);
            };

            let allowed_loss = if ko_values_added {
                let base = (bestval - self.record(best_move).additional_ko_value) as i32;
                base / 2 - 1
            } else {
                (bestval / 2.0 - 1.0) as i32
            };

            if oracle.is_illegal_ko_capture(best_move, color) {
                trace!("Move at {best_move} would be an illegal ko capture.");
                self.reevaluate_ko_threats();
                self.redistribute_points();
                ko_values_added = true;
                self.zero(best_move);
                rejected.insert(best_move);
                self.log_top_moves();
                continue;
            }
            if !self.confirm_move_safety(oracle, best_move, color, allowed_loss) {
                trace!("Move at {best_move} would be a blunder.");
                self.zero(best_move);
                rejected.insert(best_move);
                continue;
            }
            return Ok(Some(Decision {
                point: best_move,
                value: bestval,
            }));
        }
    }

    /// Highest final value among points not yet rejected. Exact ties go to
    /// the first point in diagram order. Illegal points found on the way
    /// are zeroed.
    fn best_candidate<O: Oracle + ?Sized>(
        &mut self,
        oracle: &mut O,
        color: Color,
        rejected: &PointSet,
    ) -> Option<(Point, f32)> {
        let mut best: Option<(Point, f32)> = None;
        for p in self.size.points_from_top() {
            let value = self.record(p).final_value;
            let bestval = best.map_or(0.0, |(_, v)| v);
            if value == 0.0 || rejected.contains(p) || value <= bestval {
                continue;
            }
            if oracle.is_legal(p, color) || oracle.is_illegal_ko_capture(p, color) {
                best = Some((p, value));
            } else {
                trace!("Move at {p} would be suicide.");
                self.zero(p);
            }
        }
        best
    }

    /// Values every point and adds the tie-break number to playable ones.
    pub fn value_moves<O: Oracle + ?Sized>(
        &mut self,
        oracle: &mut O,
        color: Color,
        pure_threat_value: f32,
        score: f32,
    ) {
        trace!("Move valuation:");
        for pos in self.size.points() {
            let mut value = self.value_move_reasons(oracle, pos, color, pure_threat_value, score);
            if value != 0.0 {
                if oracle.is_legal(pos, color) || oracle.is_illegal_ko_capture(pos, color) {
                    value += 0.01 * self.record(pos).random_number;
                } else {
                    trace!("Move at {pos} wasn't legal.");
                    value = 0.0;
                }
            }
            self.record_mut(pos).value = value;
        }
    }

    /// Copies values to final values, then moves the final value of every
    /// replaced point to its replacement.
    pub fn redistribute_points(&mut self) {
        for record in &mut self.moves {
            record.final_value = record.value;
        }
        let rules: Vec<(Point, Point)> = self.replacement.iter().collect();
        for (from, to) in rules {
            trace!("Redistributing points from {from} to {to}.");
            let value = self.record(from).final_value;
            let target = self.record_mut(to);
            if target.final_value < value {
                target.final_value = value;
            }
            self.record_mut(from).final_value = 0.0;
        }
    }

    /// Adds the banked ko value of every point to its value.
    pub fn reevaluate_ko_threats(&mut self) {
        trace!("Reevaluating ko threats.");
        for (index, record) in self.moves.iter_mut().enumerate() {
            if record.additional_ko_value > 0.0 {
                trace!(
                    "{}: {} + {} = {}",
                    self.size.point(index),
                    record.value,
                    record.additional_ko_value,
                    record.value + record.additional_ko_value
                );
                record.value += record.additional_ko_value;
            }
        }
    }

    /// Up to `n` points with positive final value, best first. Ties keep
    /// diagram order, top row first.
    pub fn top_moves(&self, n: usize) -> Vec<Decision> {
        let mut moves: Vec<Decision> = self
            .size
            .points_from_top()
            .map(|p| Decision {
                point: p,
                value: self.record(p).final_value,
            })
            .filter(|d| d.value > 0.0)
            .collect();
        moves.sort_by(|a, b| b.value.total_cmp(&a.value));
        moves.truncate(n);
        moves
    }

    fn log_top_moves(&self) {
        if !log_enabled!(Level::Trace) {
            return;
        }
        trace!("Top moves:");
        for (k, d) in self.top_moves(TOP_MOVES).iter().enumerate() {
            trace!("{}. {} {}", k + 1, d.point, d.value);
        }
    }

    fn zero(&mut self, p: Point) {
        let record = self.record_mut(p);
        record.value = 0.0;
        record.final_value = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sandbox::Scenario;

    fn empty_board() -> (crate::Sandbox, Session) {
        let scenario = Scenario::from_json(
            r#"{ "board": [".....", ".....", ".....", ".....", "....."], "to_move": "black" }"#,
        )
        .unwrap();
        scenario.build().unwrap()
    }

    fn set_final(session: &mut Session, at: &str, value: f32) {
        let p: Point = at.parse().unwrap();
        session.record_mut(p).final_value = value;
    }

    #[test]
    fn exact_ties_go_to_the_upper_left_point() {
        let (mut board, mut session) = empty_board();
        set_final(&mut session, "A1", 3.0);
        set_final(&mut session, "E5", 3.0);
        set_final(&mut session, "B5", 3.0);
        set_final(&mut session, "C3", 2.0);
        let rejected = PointSet::new(session.size);
        let best = session.best_candidate(&mut board, Color::Black, &rejected);
        let b5: Point = "B5".parse().unwrap();
        assert_eq!(best, Some((b5, 3.0)));
    }

    #[test]
    fn rejected_points_are_skipped() {
        let (mut board, mut session) = empty_board();
        set_final(&mut session, "B5", 3.0);
        set_final(&mut session, "A1", 3.0);
        let mut rejected = PointSet::new(session.size);
        rejected.insert("B5".parse().unwrap());
        let best = session.best_candidate(&mut board, Color::Black, &rejected);
        let a1: Point = "A1".parse().unwrap();
        assert_eq!(best, Some((a1, 3.0)));
    }

    #[test]
    fn top_moves_list_ties_in_diagram_order() {
        let (_, mut session) = empty_board();
        set_final(&mut session, "A1", 2.0);
        set_final(&mut session, "D4", 2.0);
        set_final(&mut session, "C2", 5.0);
        let points: Vec<String> = session
            .top_moves(3)
            .iter()
            .map(|d| d.point.to_string())
            .collect();
        assert_eq!(points, ["C2", "D4", "A1"]);
    }
}
