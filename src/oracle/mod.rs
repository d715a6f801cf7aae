//! Interfaces to the analysers that surround move review.
//!
//! Board bookkeeping, tactical reading, owl (life-and-death) reading,
//! influence estimation and legality checks all live outside this crate.
//! Move review only talks to them through the traits below. Worm and
//! dragon data is the static analysis of the position at the start of the
//! cycle; everything else reflects the current board, including any trial
//! moves on the stack.

mod trial;

pub use trial::Trial;

use crate::board::{BoardSize, Color, Outcome, Point, PointSet, Safety, Status, StoneMarks};

/// Static data for one worm (a single string of stones).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WormInfo {
    pub origin: Point,
    pub color: Color,
    pub size: u32,
    pub effective_size: f32,
    pub attack_code: Outcome,
    pub attack_point: Option<Point>,
    pub defense_code: Outcome,
    pub defense_point: Option<Point>,
    /// Number of enemy dragons this string separates, plus one.
    pub cutstone2: u32,
    pub inessential: bool,
}

/// Static data for one dragon (a strategically connected group of worms).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragonInfo {
    pub origin: Point,
    pub color: Color,
    pub size: u32,
    pub effective_size: f32,
    pub status: Status,
    pub matcher_status: Status,
    pub owl_status: Status,
    pub owl_attack_code: Outcome,
    pub owl_defense_code: Outcome,
    pub safety: Safety,
    pub escape_route: i32,
    pub moyo: i32,
    pub genus: i32,
    pub heyes: i32,
    /// Half eye point that would give an extra eye, if any.
    pub heye: Option<Point>,
}

/// Read access to the board and its static analysis.
pub trait BoardView {
    fn size(&self) -> BoardSize;

    /// Stone at `p` on the current board.
    fn color_at(&self, p: Point) -> Option<Color>;

    /// Static worm data for the stone at `p`.
    fn worm(&self, p: Point) -> WormInfo;

    /// Static dragon data for the stone at `p`.
    fn dragon(&self, p: Point) -> DragonInfo;

    /// Origins of all dragons adjacent to the dragon at `p`, both colours.
    fn dragon_neighbors(&self, p: Point) -> Vec<Point>;

    /// Origin of the string through `p` on the current board.
    fn string_origin(&self, p: Point) -> Point;

    /// Origins of opposing strings in contact with the string at `p`.
    fn chain_links(&self, p: Point) -> Vec<Point>;

    fn liberties(&self, p: Point) -> usize;

    /// Liberties of the string formed by playing `mv`.
    fn approx_liberties_after(&self, mv: Point, color: Color) -> usize;

    fn is_self_atari(&self, mv: Point, color: Color) -> bool;

    /// Whether the stone at `p` can be captured by an immediate ko.
    fn is_ko_point(&self, p: Point) -> bool;

    fn last_move(&self) -> Option<Point>;

    /// Origin of the eye space of `color` containing `p`.
    fn eye_origin(&self, p: Point, color: Color) -> Point;

    /// Dragon owning the eye space with origin `eye`.
    fn eye_dragon(&self, eye: Point, color: Color) -> Option<Point>;

    fn same_string(&self, a: Point, b: Point) -> bool {
        self.color_at(a).is_some()
            && self.color_at(a) == self.color_at(b)
            && self.string_origin(a) == self.string_origin(b)
    }

    fn same_dragon(&self, a: Point, b: Point) -> bool {
        self.color_at(a).is_some()
            && self.color_at(b).is_some()
            && self.dragon(a).origin == self.dragon(b).origin
    }

    fn are_neighbor_dragons(&self, a: Point, b: Point) -> bool {
        let origin = self.dragon(a).origin;
        self.dragon_neighbors(b).contains(&origin)
    }
}

/// Tactical (single string) reading.
pub trait Tactics {
    fn attack(&mut self, worm: Point) -> Outcome;
    fn find_defense(&mut self, worm: Point) -> Outcome;
    fn does_defend(&mut self, mv: Point, worm: Point) -> bool;
}

/// Owl (life-and-death) reading.
pub trait LifeAndDeath {
    fn owl_does_attack(&mut self, mv: Point, dragon: Point) -> Outcome;
    fn owl_does_defend(&mut self, mv: Point, dragon: Point) -> Outcome;
    fn owl_connection_defends(&mut self, mv: Point, a: Point, b: Point) -> bool;
}

/// Stack of hypothetical moves. Use [`Trial`] rather than calling these
/// directly.
pub trait TrialMoves {
    fn try_move(&mut self, mv: Point, color: Color) -> bool;
    fn undo_move(&mut self);
}

/// Territory estimation.
pub trait Influence {
    /// Territory gained by `color` playing `mv` with the given stones
    /// assumed captured or saved.
    fn delta_territory(&mut self, mv: Point, color: Color, marks: &StoneMarks) -> f32;

    fn territory_color(&self, p: Point) -> Option<Color>;
}

/// Legality and blunder checks.
pub trait Referee {
    fn is_legal(&self, mv: Point, color: Color) -> bool;
    fn is_illegal_ko_capture(&self, mv: Point, color: Color) -> bool;
    fn safe_move(&mut self, mv: Point, color: Color) -> Outcome;

    /// Whether `mv` loses no more than `allowed_loss` stones, given the
    /// worms and dragons the move is supposed to save.
    fn confirm_safety(
        &mut self,
        mv: Point,
        color: Color,
        allowed_loss: i32,
        saved_dragons: &PointSet,
        saved_worms: &PointSet,
    ) -> bool;
}

/// Everything move review needs from the rest of the engine.
pub trait Oracle: BoardView + Tactics + LifeAndDeath + TrialMoves + Influence + Referee {}

impl<T> Oracle for T where T: BoardView + Tactics + LifeAndDeath + TrialMoves + Influence + Referee {}
