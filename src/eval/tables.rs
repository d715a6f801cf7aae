//! Coefficient tables and the safety based helpers built on them.
//!
//! Rows and columns follow the declaration order of [`Safety`].

use crate::board::{Point, Safety};
use crate::oracle::{BoardView, DragonInfo};

/// How safe a dragon of each category is, from 0 (dead) to 1.
pub const SAFETY_VALUES: [f32; 10] = [
    0.0, // dead
    0.9, // alive
    0.1, // critical
    1.0, // inessential
    0.0, // tactically dead
    0.4, // weak
    0.6, // weakly alive
    0.8, // alive in seki
    1.0, // strongly alive
    1.0, // invincible
];

/// Share of dragon A's value gained by connecting it to dragon B,
/// indexed `[safety of A][safety of B]`.
#[rustfmt::skip]
pub const IMPACT_VALUES: [[f32; 10]; 10] = [
    [0.0, 0.9,  0.0,  0.0, 0.0, 0.8,  0.85, 0.8,  0.95, 1.0 ],
    [0.0, 0.08, 0.05, 0.0, 0.0, 0.05, 0.07, 0.05, 0.09, 0.1 ],
    [0.0, 1.04, 0.85, 0.0, 0.0, 0.75, 0.9,  0.85, 1.08, 1.1 ],
    [0.0, 0.0,  0.0,  0.0, 0.0, 0.0,  0.0,  0.0,  0.0,  0.0 ],
    [0.0, 0.9,  0.0,  0.0, 0.0, 0.8,  0.85, 0.8,  0.95, 1.0 ],
    [0.1, 0.6,  0.25, 0.0, 0.0, 0.2,  0.25, 0.25, 0.65, 0.65],
    [0.0, 0.4,  0.3,  0.0, 0.0, 0.15, 0.2,  0.2,  0.45, 0.45],
    [0.0, 0.2,  0.15, 0.0, 0.0, 0.1,  0.15, 0.2,  0.25, 0.3 ],
    [0.0, 0.01, 0.01, 0.0, 0.0, 0.01, 0.01, 0.01, 0.01, 0.01],
    [0.0, 0.0,  0.0,  0.0, 0.0, 0.0,  0.0,  0.0,  0.0,  0.0 ],
];

/// As [`IMPACT_VALUES`], used when far enough ahead to value safety
/// over speed.
#[rustfmt::skip]
pub const CAUTIOUS_IMPACT_VALUES: [[f32; 10]; 10] = [
    [0.3, 0.9,  0.0,  0.0, 0.0, 0.8,  0.85, 0.8,  0.95, 1.0 ],
    [0.0, 0.2,  0.05, 0.0, 0.0, 0.1,  0.15, 0.10, 0.2,  0.2 ],
    [0.0, 1.04, 0.85, 0.0, 0.0, 0.75, 0.9,  0.85, 1.08, 1.1 ],
    [0.1, 0.6,  0.0,  0.0, 0.0, 0.3,  0.5,  0.5,  0.6,  0.6 ],
    [0.2, 0.9,  0.0,  0.0, 0.0, 0.8,  0.85, 0.8,  0.95, 1.0 ],
    [0.1, 0.6,  0.25, 0.0, 0.0, 0.2,  0.25, 0.25, 0.65, 0.65],
    [0.0, 0.4,  0.3,  0.0, 0.0, 0.2,  0.2,  0.2,  0.45, 0.45],
    [0.0, 0.2,  0.15, 0.0, 0.0, 0.1,  0.15, 0.2,  0.25, 0.3 ],
    [0.0, 0.02, 0.01, 0.0, 0.0, 0.01, 0.01, 0.01, 0.02, 0.02],
    [0.0, 0.0,  0.0,  0.0, 0.0, 0.0,  0.0,  0.0,  0.0,  0.0 ],
];

/// Lead above which only the cautious impact values are used.
pub const CAUTIOUS_MARGIN: f32 = 20.0;

/// Estimated safety of a dragon in `[0, 1]`.
///
/// With `ignore_dead`, dead and inessential dragons count as fully safe
/// so that nothing tries to run away with them. Weak dragons are refined
/// by escape route and surrounding moyo.
pub fn dragon_safety(dragon: &DragonInfo, ignore_dead: bool) -> f32 {
    let safety = dragon.safety;
    if ignore_dead
        && matches!(
            safety,
            Safety::Dead | Safety::Inessential | Safety::TacticallyDead
        )
    {
        return 1.0;
    }
    if matches!(safety, Safety::Weak | Safety::WeaklyAlive) {
        let (escape, moyo) = (dragon.escape_route, dragon.moyo);
        return if escape < 10 && moyo < 5 {
            0.1
        } else if escape < 15 && moyo < 5 {
            0.2
        } else if escape < 10 && moyo < 10 {
            0.3
        } else if escape < 5 && moyo < 15 {
            0.4
        } else if escape < 15 && moyo < 15 {
            0.7
        } else {
            0.9
        };
    }
    SAFETY_VALUES[safety.index()]
}

/// Strategic value for dragon `a` of being connected to dragon `b` by a
/// move at `tt`. Not symmetric.
///
/// `margin` is the lead of the side to move; between 0 and
/// [`CAUTIOUS_MARGIN`] the two impact tables are interpolated.
/// `territorial_value` is the already computed territorial value of the
/// move, used to refuse reinforcing moves in own territory when scoring.
pub fn connection_value<B: BoardView + ?Sized>(
    board: &B,
    a: Point,
    b: Point,
    tt: Point,
    margin: f32,
    territorial_value: f32,
    doing_scoring: bool,
) -> f32 {
    let (da, db) = (board.dragon(a), board.dragon(b));
    let safety1 = da.safety;
    let mut safety2 = db.safety;
    let genus1 = 2 * da.genus + da.heyes;
    let genus2 = 2 * db.genus + db.heyes;

    // Enough eye space between them to live together.
    if genus1 < 4
        && genus2 < 4
        && (genus1 + genus2 >= 4
            || (genus1 + genus2 >= 3 && (da.heye == Some(tt) || db.heye == Some(tt))))
    {
        safety2 = Safety::Alive;
    }

    if safety2 == Safety::Critical && genus2 == 0 && db.moyo == 0 {
        return 0.0;
    }

    if doing_scoring && territorial_value < 0.0 {
        if safety1 == Safety::Alive && safety2.is_strong() {
            return 0.0;
        }
        if safety1.is_strong() && (safety2 == Safety::Alive || safety2.is_strong()) {
            return 0.0;
        }
    }

    let plain = IMPACT_VALUES[safety1.index()][safety2.index()];
    let cautious = CAUTIOUS_IMPACT_VALUES[safety1.index()][safety2.index()];
    let mut impact = if doing_scoring || margin < 0.0 {
        plain
    } else if margin > CAUTIOUS_MARGIN {
        cautious
    } else {
        let w = margin / CAUTIOUS_MARGIN;
        w * cautious + (1.0 - w) * plain
    };

    if impact > 0.0 && safety1 == Safety::Inessential && board.is_self_atari(tt, da.color) {
        impact = 0.0;
    }

    impact * 2.0 * da.effective_size
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Color, Outcome, Status};

    fn dragon(safety: Safety) -> DragonInfo {
        DragonInfo {
            origin: Point::new(0, 0),
            color: Color::Black,
            size: 5,
            effective_size: 5.0,
            status: Status::Alive,
            matcher_status: Status::Alive,
            owl_status: Status::Alive,
            owl_attack_code: Outcome::Fail,
            owl_defense_code: Outcome::Fail,
            safety,
            escape_route: 0,
            moyo: 0,
            genus: 0,
            heyes: 0,
            heye: None,
        }
    }

    #[test]
    fn dead_dragons_count_as_safe_when_ignored() {
        assert_eq!(dragon_safety(&dragon(Safety::Dead), false), 0.0);
        assert_eq!(dragon_safety(&dragon(Safety::Dead), true), 1.0);
        assert_eq!(dragon_safety(&dragon(Safety::TacticallyDead), true), 1.0);
        assert_eq!(dragon_safety(&dragon(Safety::Critical), true), 0.1);
    }

    #[test]
    fn weak_dragons_refined_by_escape_and_moyo() {
        let mut weak = dragon(Safety::Weak);
        assert_eq!(dragon_safety(&weak, false), 0.1);
        weak.escape_route = 12;
        assert_eq!(dragon_safety(&weak, false), 0.2);
        weak.escape_route = 3;
        weak.moyo = 12;
        assert_eq!(dragon_safety(&weak, false), 0.4);
        weak.escape_route = 20;
        assert_eq!(dragon_safety(&weak, false), 0.9);
    }

    #[test]
    fn invincible_row_is_worthless() {
        assert!(IMPACT_VALUES[Safety::Invincible.index()]
            .iter()
            .all(|&v| v == 0.0));
        assert_eq!(
            CAUTIOUS_IMPACT_VALUES[Safety::Critical.index()][Safety::Invincible.index()],
            1.1
        );
    }
}
