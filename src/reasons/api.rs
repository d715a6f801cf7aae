//! Registering and querying move reasons.
//!
//! Analysers call the `add_*` methods with any stone of the affected
//! string or dragon; the board view resolves it to its origin before the
//! object is interned. Everything here only touches the session tables.

use super::error::ReasonError;
use super::kind::{DragonId, ReasonKind, Subject, WormId, WormPairId};
use super::record::{Reason, ReasonId, Redundancy};
use crate::board::{Color, Outcome, Point, PointSet};
use crate::oracle::BoardView;
use crate::session::Session;

impl Session {
    fn check_on_board(&self, p: Point) -> Result<(), ReasonError> {
        if self.size.contains(p) {
            Ok(())
        } else {
            Err(ReasonError::OffBoard(p))
        }
    }

    /// Adds a reason at `pos` unless the same kind and subject is already
    /// listed there.
    pub fn add_reason(
        &mut self,
        pos: Point,
        kind: ReasonKind,
        subject: Subject,
    ) -> Result<(), ReasonError> {
        self.check_on_board(pos)?;
        if kind.subject_class() != subject.class() {
            return Err(ReasonError::SubjectMismatch { kind });
        }
        if self
            .reasons_at(pos)
            .any(|r| r.kind == kind && r.subject == subject)
        {
            return Ok(());
        }
        let capacity = self.config.max_reasons_per_move;
        if self.record(pos).reasons.len() >= capacity {
            return Err(ReasonError::ReasonListFull { point: pos, capacity });
        }
        if self.reasons.len() >= self.config.max_move_reasons {
            return Err(ReasonError::ReasonTableFull {
                capacity: self.config.max_move_reasons,
            });
        }
        let id = ReasonId(self.reasons.len() as u32);
        self.reasons.push(Reason {
            kind,
            subject,
            redundancy: Redundancy::NONE,
        });
        self.record_mut(pos).reasons.push(id);
        Ok(())
    }

    /// Removes a reason from `pos` if present. The last reason in the list
    /// takes its slot.
    pub fn remove_reason(
        &mut self,
        pos: Point,
        kind: ReasonKind,
        subject: Subject,
    ) -> Result<(), ReasonError> {
        self.check_on_board(pos)?;
        let found = self
            .record(pos)
            .reasons
            .iter()
            .position(|&id| {
                let r = self.reason(id);
                r.kind == kind && r.subject == subject
            });
        if let Some(k) = found {
            self.record_mut(pos).reasons.swap_remove(k);
        }
        Ok(())
    }

    /// Whether a reason of `kind` is listed at `pos`. `None` matches any
    /// subject.
    ///
    /// # Panics
    ///
    /// Panics if `pos` lies off the board.
    pub fn reason_known(&self, pos: Point, kind: ReasonKind, subject: Option<Subject>) -> bool {
        self.reasons_at(pos)
            .any(|r| r.kind == kind && subject.map_or(true, |s| r.subject == s))
    }

    fn any_known(&self, pos: Point, kinds: &[ReasonKind], subject: Option<Subject>) -> bool {
        kinds.iter().any(|&k| self.reason_known(pos, k, subject))
    }

    /// Any tactical attack on the worm, ko results included.
    pub fn attack_known(&self, pos: Point, worm: Option<WormId>) -> bool {
        self.any_known(pos, &ReasonKind::TACTICAL_ATTACKS, worm.map(Subject::Worm))
    }

    /// Any tactical defense of the worm, ko results included.
    pub fn defense_known(&self, pos: Point, worm: Option<WormId>) -> bool {
        self.any_known(pos, &ReasonKind::TACTICAL_DEFENSES, worm.map(Subject::Worm))
    }

    pub fn owl_attack_known(&self, pos: Point, dragon: Option<DragonId>) -> bool {
        self.any_known(pos, &ReasonKind::OWL_ATTACKS, dragon.map(Subject::Dragon))
    }

    pub fn owl_defense_known(&self, pos: Point, dragon: Option<DragonId>) -> bool {
        self.any_known(pos, &ReasonKind::OWL_DEFENSES, dragon.map(Subject::Dragon))
    }

    pub fn owl_move_known(&self, pos: Point, dragon: Option<DragonId>) -> bool {
        self.owl_attack_known(pos, dragon) || self.owl_defense_known(pos, dragon)
    }

    /// Tactical attack or defense of either worm of the pair.
    pub fn tactical_move_vs_either_worm_known(&self, pos: Point, pair: WormPairId) -> bool {
        let (a, b) = self.registry.worm_pair_members(pair);
        [a, b]
            .into_iter()
            .any(|w| self.attack_known(pos, Some(w)) || self.defense_known(pos, Some(w)))
    }

    /// The dragon is a single worm and `pos` attacks or defends it
    /// tactically.
    pub fn tactical_move_vs_whole_dragon_known<B: BoardView + ?Sized>(
        &self,
        board: &B,
        pos: Point,
        dragon: DragonId,
    ) -> bool {
        let aa = self.registry.dragon_origin(dragon);
        board.worm(aa).size == board.dragon(aa).size && self.tactical_known_at(board, pos, aa)
    }

    /// Owl attack or defense of the dragon the worm belongs to.
    pub fn owl_move_vs_worm_known<B: BoardView + ?Sized>(
        &self,
        board: &B,
        pos: Point,
        worm: WormId,
    ) -> bool {
        let origin = board.dragon(self.registry.worm_origin(worm)).origin;
        match self.registry.find_dragon(origin) {
            Some(d) => self.owl_move_known(pos, Some(d)),
            None => false,
        }
    }

    /// Tactical attack or defense of the worm at `stone`, if that worm has
    /// been interned. Lookup only.
    pub(crate) fn tactical_known_at<B: BoardView + ?Sized>(
        &self,
        board: &B,
        pos: Point,
        stone: Point,
    ) -> bool {
        match self.registry.find_worm(board.worm(stone).origin) {
            Some(w) => self.attack_known(pos, Some(w)) || self.defense_known(pos, Some(w)),
            None => false,
        }
    }

    fn worm_id<B: BoardView + ?Sized>(
        &mut self,
        board: &B,
        stone: Point,
    ) -> Result<WormId, ReasonError> {
        self.check_on_board(stone)?;
        let origin = board.worm(stone).origin;
        self.registry.worm(origin)
    }

    fn worm_subject<B: BoardView + ?Sized>(
        &mut self,
        board: &B,
        stone: Point,
    ) -> Result<Subject, ReasonError> {
        Ok(Subject::Worm(self.worm_id(board, stone)?))
    }

    fn dragon_id<B: BoardView + ?Sized>(
        &mut self,
        board: &B,
        stone: Point,
    ) -> Result<DragonId, ReasonError> {
        self.check_on_board(stone)?;
        let origin = board.dragon(stone).origin;
        self.registry.dragon(origin)
    }

    fn dragon_subject<B: BoardView + ?Sized>(
        &mut self,
        board: &B,
        stone: Point,
    ) -> Result<Subject, ReasonError> {
        Ok(Subject::Dragon(self.dragon_id(board, stone)?))
    }

    fn add_coded(
        &mut self,
        pos: Point,
        kinds: [ReasonKind; 3],
        subject: Subject,
        code: Outcome,
    ) -> Result<(), ReasonError> {
        let kind = match code {
            Outcome::Win => kinds[0],
            Outcome::GoodKo => kinds[1],
            Outcome::BadKo => kinds[2],
            Outcome::Fail => return Ok(()),
        };
        self.add_reason(pos, kind, subject)
    }

    /// `pos` captures the worm at `worm` with the given result.
    pub fn add_attack_move<B: BoardView + ?Sized>(
        &mut self,
        board: &B,
        pos: Point,
        worm: Point,
        code: Outcome,
    ) -> Result<(), ReasonError> {
        let subject = self.worm_subject(board, worm)?;
        self.add_coded(pos, ReasonKind::TACTICAL_ATTACKS, subject, code)
    }

    /// `pos` saves the worm at `worm` with the given result.
    pub fn add_defense_move<B: BoardView + ?Sized>(
        &mut self,
        board: &B,
        pos: Point,
        worm: Point,
        code: Outcome,
    ) -> Result<(), ReasonError> {
        let subject = self.worm_subject(board, worm)?;
        self.add_coded(pos, ReasonKind::TACTICAL_DEFENSES, subject, code)
    }

    /// `pos` threatens to capture the worm at `worm`.
    pub fn add_attack_threat_move<B: BoardView + ?Sized>(
        &mut self,
        board: &B,
        pos: Point,
        worm: Point,
    ) -> Result<(), ReasonError> {
        let subject = self.worm_subject(board, worm)?;
        self.add_reason(pos, ReasonKind::AttackThreat, subject)
    }

    pub fn remove_attack_threat_move<B: BoardView + ?Sized>(
        &mut self,
        board: &B,
        pos: Point,
        worm: Point,
    ) -> Result<(), ReasonError> {
        match self.registry.find_worm(board.worm(worm).origin) {
            Some(w) => self.remove_reason(pos, ReasonKind::AttackThreat, Subject::Worm(w)),
            None => self.check_on_board(pos),
        }
    }

    /// `pos` threatens to save the worm at `worm`.
    pub fn add_defense_threat_move<B: BoardView + ?Sized>(
        &mut self,
        board: &B,
        pos: Point,
        worm: Point,
    ) -> Result<(), ReasonError> {
        let subject = self.worm_subject(board, worm)?;
        self.add_reason(pos, ReasonKind::DefendThreat, subject)
    }

    fn connection_subject<B: BoardView + ?Sized>(
        &mut self,
        board: &B,
        a: Point,
        b: Point,
    ) -> Result<Option<Subject>, ReasonError> {
        if board.dragon(a).color != board.dragon(b).color {
            return Err(ReasonError::MixedColors(a, b));
        }
        let da = self.dragon_id(board, a)?;
        let db = self.dragon_id(board, b)?;
        if da == db {
            return Ok(None);
        }
        Ok(Some(Subject::Connection(self.registry.connection(da, db)?)))
    }

    /// `pos` connects the dragons at `a` and `b`.
    pub fn add_connection_move<B: BoardView + ?Sized>(
        &mut self,
        board: &B,
        pos: Point,
        a: Point,
        b: Point,
    ) -> Result<(), ReasonError> {
        match self.connection_subject(board, a, b)? {
            Some(subject) => self.add_reason(pos, ReasonKind::Connect, subject),
            None => Ok(()),
        }
    }

    /// `pos` cuts the dragons at `a` and `b`. Ignored when either stone
    /// belongs to a worm that is already tactically lost.
    pub fn add_cut_move<B: BoardView + ?Sized>(
        &mut self,
        board: &B,
        pos: Point,
        a: Point,
        b: Point,
    ) -> Result<(), ReasonError> {
        let Some(subject) = self.connection_subject(board, a, b)? else {
            return Ok(());
        };
        if is_captured(board, a) || is_captured(board, b) {
            return Ok(());
        }
        self.add_reason(pos, ReasonKind::Cut, subject)
    }

    /// `pos` must not be played.
    pub fn add_antisuji_move(&mut self, pos: Point) -> Result<(), ReasonError> {
        self.add_reason(pos, ReasonKind::Antisuji, Subject::Nothing)
    }

    /// `pos` wins the semeai for or against the dragon at `dragon`.
    pub fn add_semeai_move<B: BoardView + ?Sized>(
        &mut self,
        board: &B,
        pos: Point,
        dragon: Point,
    ) -> Result<(), ReasonError> {
        let subject = self.dragon_subject(board, dragon)?;
        self.add_reason(pos, ReasonKind::Semeai, subject)
    }

    /// Given two moves in a row, `pos` would win the semeai.
    pub fn add_semeai_threat<B: BoardView + ?Sized>(
        &mut self,
        board: &B,
        pos: Point,
        dragon: Point,
    ) -> Result<(), ReasonError> {
        let subject = self.dragon_subject(board, dragon)?;
        self.add_reason(pos, ReasonKind::SemeaiThreat, subject)
    }

    /// `pos` is the vital point of the `color` eye space containing `eye`.
    pub fn add_vital_eye_move<B: BoardView + ?Sized>(
        &mut self,
        board: &B,
        pos: Point,
        eye: Point,
        color: Color,
    ) -> Result<(), ReasonError> {
        self.check_on_board(eye)?;
        let origin = board.eye_origin(eye, color);
        let id = self.registry.eye(origin, color)?;
        self.add_reason(pos, ReasonKind::VitalEye, Subject::Eye(id))
    }

    /// `pos` captures one of two enemy worms. Rejected when they are the
    /// same worm or either is already lost.
    pub fn add_attack_either_move<B: BoardView + ?Sized>(
        &mut self,
        board: &B,
        pos: Point,
        a: Point,
        b: Point,
    ) -> Result<(), ReasonError> {
        self.check_on_board(a)?;
        self.check_on_board(b)?;
        if board.worm(a).origin == board.worm(b).origin {
            return Ok(());
        }
        if is_captured(board, a) || is_captured(board, b) {
            return Ok(());
        }
        let wa = self.worm_id(board, a)?;
        let wb = self.worm_id(board, b)?;
        let pair = self.registry.worm_pair(wa, wb)?;
        self.add_reason(pos, ReasonKind::AttackEither, Subject::WormPair(pair))
    }

    /// `pos` defends two own worms at once.
    pub fn add_defend_both_move<B: BoardView + ?Sized>(
        &mut self,
        board: &B,
        pos: Point,
        a: Point,
        b: Point,
    ) -> Result<(), ReasonError> {
        let wa = self.worm_id(board, a)?;
        let wb = self.worm_id(board, b)?;
        let pair = self.registry.worm_pair(wa, wb)?;
        self.add_reason(pos, ReasonKind::DefendBoth, Subject::WormPair(pair))
    }

    pub fn add_block_territory_move(&mut self, pos: Point) -> Result<(), ReasonError> {
        self.add_reason(pos, ReasonKind::BlockTerritory, Subject::Nothing)
    }

    pub fn add_expand_territory_move(&mut self, pos: Point) -> Result<(), ReasonError> {
        self.add_reason(pos, ReasonKind::ExpandTerritory, Subject::Nothing)
    }

    pub fn add_expand_moyo_move(&mut self, pos: Point) -> Result<(), ReasonError> {
        self.add_reason(pos, ReasonKind::ExpandMoyo, Subject::Nothing)
    }

    pub fn add_strategical_attack_move<B: BoardView + ?Sized>(
        &mut self,
        board: &B,
        pos: Point,
        dragon: Point,
    ) -> Result<(), ReasonError> {
        let subject = self.dragon_subject(board, dragon)?;
        self.add_reason(pos, ReasonKind::StrategicAttack, subject)
    }

    pub fn add_strategical_defense_move<B: BoardView + ?Sized>(
        &mut self,
        board: &B,
        pos: Point,
        dragon: Point,
    ) -> Result<(), ReasonError> {
        let subject = self.dragon_subject(board, dragon)?;
        self.add_reason(pos, ReasonKind::StrategicDefend, subject)
    }

    /// The owl reader kills the dragon at `dragon` by playing `pos`.
    pub fn add_owl_attack_move<B: BoardView + ?Sized>(
        &mut self,
        board: &B,
        pos: Point,
        dragon: Point,
        code: Outcome,
    ) -> Result<(), ReasonError> {
        let subject = self.dragon_subject(board, dragon)?;
        self.add_coded(pos, ReasonKind::OWL_ATTACKS, subject, code)
    }

    /// The owl reader saves the dragon at `dragon` by playing `pos`.
    pub fn add_owl_defense_move<B: BoardView + ?Sized>(
        &mut self,
        board: &B,
        pos: Point,
        dragon: Point,
        code: Outcome,
    ) -> Result<(), ReasonError> {
        let subject = self.dragon_subject(board, dragon)?;
        self.add_coded(pos, ReasonKind::OWL_DEFENSES, subject, code)
    }

    /// First of two moves that would kill the dragon. Also marks `pos` as
    /// a worthwhile pure threat.
    pub fn add_owl_attack_threat_move<B: BoardView + ?Sized>(
        &mut self,
        board: &B,
        pos: Point,
        dragon: Point,
    ) -> Result<(), ReasonError> {
        let subject = self.dragon_subject(board, dragon)?;
        self.add_reason(pos, ReasonKind::OwlAttackThreat, subject)?;
        self.add_worthwhile_threat_move(pos)
    }

    /// First of two moves that would save the dragon. Also marks `pos` as
    /// a worthwhile pure threat.
    pub fn add_owl_defense_threat_move<B: BoardView + ?Sized>(
        &mut self,
        board: &B,
        pos: Point,
        dragon: Point,
    ) -> Result<(), ReasonError> {
        let subject = self.dragon_subject(board, dragon)?;
        self.add_reason(pos, ReasonKind::OwlDefenseThreat, subject)?;
        self.add_worthwhile_threat_move(pos)
    }

    /// `pos` attacks a dragon whose defense could otherwise be threatened.
    pub fn add_owl_prevent_threat_move<B: BoardView + ?Sized>(
        &mut self,
        board: &B,
        pos: Point,
        dragon: Point,
    ) -> Result<(), ReasonError> {
        let subject = self.dragon_subject(board, dragon)?;
        self.add_reason(pos, ReasonKind::OwlPreventThreat, subject)
    }

    /// The owl reader judged the dragon alive or dead but was unsure, and
    /// `pos` might overturn the verdict against it.
    pub fn add_owl_uncertain_attack_move<B: BoardView + ?Sized>(
        &mut self,
        board: &B,
        pos: Point,
        dragon: Point,
    ) -> Result<(), ReasonError> {
        let subject = self.dragon_subject(board, dragon)?;
        self.add_reason(pos, ReasonKind::UncertainOwlAttack, subject)
    }

    /// As [`Session::add_owl_uncertain_attack_move`], for the defender.
    pub fn add_owl_uncertain_defense_move<B: BoardView + ?Sized>(
        &mut self,
        board: &B,
        pos: Point,
        dragon: Point,
    ) -> Result<(), ReasonError> {
        let subject = self.dragon_subject(board, dragon)?;
        self.add_reason(pos, ReasonKind::UncertainOwlDefense, subject)
    }

    /// `pos` starts a combination that captures one of several worms of
    /// total size `size`.
    pub fn add_my_atari_atari_move(&mut self, pos: Point, size: u32) -> Result<(), ReasonError> {
        self.add_reason(pos, ReasonKind::MyAtariAtari, Subject::Size(size))
    }

    /// `pos` defends against such a combination by the opponent.
    pub fn add_your_atari_atari_move(&mut self, pos: Point, size: u32) -> Result<(), ReasonError> {
        self.add_reason(pos, ReasonKind::YourAtariAtari, Subject::Size(size))
    }

    /// Records one shape contribution. Only the largest value of each sign
    /// and the number of contributions are kept.
    pub fn add_shape_value(&mut self, pos: Point, value: f32) -> Result<(), ReasonError> {
        self.check_on_board(pos)?;
        let record = self.record_mut(pos);
        if value > 0.0 {
            record.maxpos_shape = record.maxpos_shape.max(value);
            record.numpos_shape += 1;
        } else if value < 0.0 {
            record.maxneg_shape = record.maxneg_shape.max(-value);
            record.numneg_shape += 1;
        }
        Ok(())
    }

    pub fn add_worthwhile_threat_move(&mut self, pos: Point) -> Result<(), ReasonError> {
        self.check_on_board(pos)?;
        self.record_mut(pos).worthwhile_threat = true;
        Ok(())
    }

    /// Value of the free follow-up move; keeps the largest seen.
    pub fn add_followup_value(&mut self, pos: Point, value: f32) -> Result<(), ReasonError> {
        self.check_on_board(pos)?;
        let record = self.record_mut(pos);
        record.followup_value = record.followup_value.max(value);
        Ok(())
    }

    /// Value of denying the opponent's follow-up; keeps the largest seen.
    pub fn add_reverse_followup_value(&mut self, pos: Point, value: f32) -> Result<(), ReasonError> {
        self.check_on_board(pos)?;
        let record = self.record_mut(pos);
        record.reverse_followup_value = record.reverse_followup_value.max(value);
        Ok(())
    }

    pub fn set_minimum_move_value(&mut self, pos: Point, value: f32) -> Result<(), ReasonError> {
        self.check_on_board(pos)?;
        let record = self.record_mut(pos);
        record.min_value = record.min_value.max(value);
        Ok(())
    }

    pub fn set_maximum_move_value(&mut self, pos: Point, value: f32) -> Result<(), ReasonError> {
        self.check_on_board(pos)?;
        let record = self.record_mut(pos);
        record.max_value = record.max_value.min(value);
        Ok(())
    }

    pub fn set_minimum_territorial_value(
        &mut self,
        pos: Point,
        value: f32,
    ) -> Result<(), ReasonError> {
        self.check_on_board(pos)?;
        let record = self.record_mut(pos);
        record.min_territory = record.min_territory.max(value);
        Ok(())
    }

    pub fn set_maximum_territorial_value(
        &mut self,
        pos: Point,
        value: f32,
    ) -> Result<(), ReasonError> {
        self.check_on_board(pos)?;
        let record = self.record_mut(pos);
        record.max_territory = record.max_territory.min(value);
        Ok(())
    }

    /// Sends the value of `from` to `to`.
    pub fn add_replacement_move(&mut self, from: Point, to: Point) -> Result<(), ReasonError> {
        self.replacement.add(from, to)
    }

    /// Records that the dragon at `eater` can capture the worm at `food`.
    pub fn add_lunch<B: BoardView + ?Sized>(
        &mut self,
        board: &B,
        eater: Point,
        food: Point,
    ) -> Result<(), ReasonError> {
        let dragon = self.dragon_id(board, eater)?;
        let worm = self.worm_id(board, food)?;
        self.registry.add_lunch(dragon, worm)
    }

    pub fn remove_lunch<B: BoardView + ?Sized>(&mut self, board: &B, eater: Point, food: Point) {
        let dragon = self.registry.find_dragon(board.dragon(eater).origin);
        let worm = self.registry.find_worm(board.worm(food).origin);
        if let (Some(dragon), Some(worm)) = (dragon, worm) {
            self.registry.remove_lunch(dragon, worm);
        }
    }

    fn threatened_worms(&self, pos: Point, kind: ReasonKind) -> Vec<Point> {
        if !self.size.contains(pos) {
            return Vec::new();
        }
        self.reasons_at(pos)
            .filter(|r| r.kind == kind)
            .filter_map(|r| match r.subject {
                Subject::Worm(w) => Some(self.registry.worm_origin(w)),
                _ => None,
            })
            .collect()
    }

    /// Origins of the strings `pos` threatens to capture.
    pub fn attack_threats(&self, pos: Point) -> Vec<Point> {
        self.threatened_worms(pos, ReasonKind::AttackThreat)
    }

    /// Origins of the strings `pos` threatens to save.
    pub fn defense_threats(&self, pos: Point) -> Vec<Point> {
        self.threatened_worms(pos, ReasonKind::DefendThreat)
    }

    /// Stones of every string that `pos` tactically defends.
    pub fn saved_worms<B: BoardView + ?Sized>(&self, board: &B, pos: Point) -> PointSet {
        let mut saved = PointSet::new(self.size);
        let origins: Vec<Point> = self
            .reasons_at(pos)
            .filter(|r| r.kind.is_tactical_defense())
            .filter_map(|r| match r.subject {
                Subject::Worm(w) => Some(self.registry.worm_origin(w)),
                _ => None,
            })
            .collect();
        for p in self.size.points() {
            if board.color_at(p).is_some() && origins.contains(&board.worm(p).origin) {
                saved.insert(p);
            }
        }
        saved
    }

    /// Stones of every dragon that `pos` owl defends.
    pub fn saved_dragons<B: BoardView + ?Sized>(&self, board: &B, pos: Point) -> PointSet {
        let mut saved = PointSet::new(self.size);
        let origins: Vec<Point> = self
            .reasons_at(pos)
            .filter(|r| r.kind.is_owl_defense())
            .filter_map(|r| match r.subject {
                Subject::Dragon(d) => Some(self.registry.dragon_origin(d)),
                _ => None,
            })
            .collect();
        for p in self.size.points() {
            if board.color_at(p).is_some() && origins.contains(&board.dragon(p).origin) {
                saved.insert(p);
            }
        }
        saved
    }
}

/// Attackable with no defense at all.
fn is_captured<B: BoardView + ?Sized>(board: &B, stone: Point) -> bool {
    let worm = board.worm(stone);
    worm.attack_code.is_success() && !worm.defense_code.is_success()
}
