use log::trace;

use crate::board::{Color, Outcome, Point};
use crate::oracle::{Oracle, Trial};
use crate::reasons::{ReasonError, ReasonKind, WormId};
use crate::session::Session;

/// Reasons whose move is worth re-reading for extra tactical effects.
fn triggers_reading(kind: ReasonKind) -> bool {
    use ReasonKind::*;
    matches!(
        kind,
        Attack
            | AttackGoodKo
            | AttackBadKo
            | Defend
            | DefendGoodKo
            | DefendBadKo
            | Connect
            | Cut
            | AttackEither
            | DefendBoth
    )
}

impl Session {
    /// Plays every move that already attacks, defends, connects or cuts
    /// and checks whether it also settles some other unstable worm.
    pub fn find_more_attack_and_defense_moves<O: Oracle + ?Sized>(
        &mut self,
        oracle: &mut O,
        color: Color,
    ) -> Result<(), ReasonError> {
        let other = color.other();
        let mut unstable: Vec<(WormId, Point)> = Vec::new();
        for p in self.size.points() {
            if oracle.color_at(p).is_none() {
                continue;
            }
            let worm = oracle.worm(p);
            if worm.origin == p
                && worm.attack_code.is_success()
                && worm.defense_code.is_success()
            {
                unstable.push((self.registry.worm(p)?, p));
            }
        }
        if unstable.is_empty() {
            return Ok(());
        }

        for ii in self.size.points() {
            if !self.reasons_at(ii).any(|r| triggers_reading(r.kind)) {
                continue;
            }
            let Some(mut trial) = Trial::play(&mut *oracle, ii, color) else {
                continue;
            };
            for &(id, aa) in &unstable {
                match trial.color_at(aa) {
                    Some(c) if c == color => {
                        if !self.defense_known(ii, Some(id)) && trial.attack(aa) == Outcome::Fail
                        {
                            trace!("found extra point of defense of {aa} at {ii}");
                            self.add_defense_move(&*trial, ii, aa, Outcome::Win)?;
                        }
                    }
                    Some(_) => {
                        if self.attack_known(ii, Some(id))
                            || trial.find_defense(aa).is_success()
                        {
                            continue;
                        }
                        let mut attack_works = true;
                        if let Some(dp) = trial.worm(aa).defense_point {
                            if let Some(mut nested) = Trial::play(&mut *trial, dp, other) {
                                if nested.attack(aa) == Outcome::Fail {
                                    attack_works = false;
                                }
                            }
                        }
                        if attack_works {
                            trace!("found extra point of attack of {aa} at {ii}");
                            self.add_attack_move(&*trial, ii, aa, Outcome::Win)?;
                        }
                    }
                    None => {}
                }
            }
        }
        Ok(())
    }
}
