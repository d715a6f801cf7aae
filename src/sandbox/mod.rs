//! An in-memory engine behind the collaborator traits.
//!
//! The [`Sandbox`] keeps a real board (strings, liberties, captures,
//! suicide and simple ko) so trial moves behave as expected, computes the
//! static worm and dragon data once when built, and answers reading
//! questions from the script of a [`Scenario`]. It is what the tests, the
//! `review` binary and the benchmark run against.

pub mod batch;
pub mod scenario;

use thiserror::Error;

pub use batch::{review_all, write_jsonl};
pub use scenario::{DragonSpec, EyeSpec, Observation, Scenario, Script, WormSpec};

use crate::board::{
    BoardSize, Color, Outcome, Point, PointError, PointSet, StoneMark, StoneMarks,
};
use crate::config::ConfigError;
use crate::oracle::{
    BoardView, DragonInfo, Influence, LifeAndDeath, Referee, Tactics, TrialMoves, WormInfo,
};
use crate::reasons::ReasonError;

/// Errors while loading, building or reviewing a scenario.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("scenario json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot read scenario: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Point(#[from] PointError),

    #[error(transparent)]
    Reason(#[from] ReasonError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("board has more rows than the largest supported size")]
    BoardTooLarge,

    #[error("row {row} has {found} points, expected {expected}")]
    RowLength {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("invalid board character '{0}'")]
    BadCell(char),

    #[error("no stone at {0}")]
    NoStone(Point),

    #[error("dragon through {0} mixes stones of both colours")]
    MixedDragon(Point),
}

#[derive(Debug, Clone)]
struct Undo {
    stones: Vec<Option<Color>>,
    ko: Option<Point>,
}

/// Board, static analysis and scripted readings for one scenario.
#[derive(Debug, Clone)]
pub struct Sandbox {
    size: BoardSize,
    stones: Vec<Option<Color>>,
    ko: Option<Point>,
    history: Vec<Undo>,
    played: Vec<Point>,
    /// Worm index of every stone of the initial position.
    worm_of: Vec<Option<usize>>,
    worms: Vec<WormInfo>,
    dragon_of: Vec<Option<usize>>,
    dragons: Vec<DragonInfo>,
    dragon_adjacent: Vec<Vec<usize>>,
    eyes: Vec<(Color, Vec<Point>, Option<Point>)>,
    script: Script,
}

impl Sandbox {
    /// Parses the board and derives the static analysis of a scenario.
    pub fn from_scenario(scenario: &Scenario) -> Result<Self, ScenarioError> {
        let (size, stones) = scenario.parse_board()?;
        let mut sandbox = Sandbox {
            size,
            stones,
            ko: None,
            history: Vec::new(),
            played: Vec::new(),
            worm_of: vec![None; size.area()],
            worms: Vec::new(),
            dragon_of: vec![None; size.area()],
            dragons: Vec::new(),
            dragon_adjacent: Vec::new(),
            eyes: Vec::new(),
            script: scenario.script.clone(),
        };
        sandbox.find_worms(&scenario.worms)?;
        sandbox.find_dragons(&scenario.dragons)?;
        for eye in &scenario.eyes {
            let dragon = match eye.dragon {
                Some(stone) => Some(sandbox.static_dragon(stone)?.origin),
                None => None,
            };
            sandbox.eyes.push((eye.color, eye.points.clone(), dragon));
        }
        Ok(sandbox)
    }

    fn at(&self, p: Point) -> Option<Color> {
        if self.size.contains(p) {
            self.stones[self.size.index(p)]
        } else {
            None
        }
    }

    /// Stones of the string through `p` on the current board, row-major.
    fn string(&self, p: Point) -> Vec<Point> {
        let Some(color) = self.at(p) else {
            return Vec::new();
        };
        let mut seen = PointSet::new(self.size);
        let mut stack = vec![p];
        seen.insert(p);
        while let Some(q) = stack.pop() {
            for n in self.size.neighbors(q) {
                if !seen.contains(n) && self.at(n) == Some(color) {
                    seen.insert(n);
                    stack.push(n);
                }
            }
        }
        seen.iter().collect()
    }

    fn string_liberties(&self, string: &[Point]) -> PointSet {
        let mut libs = PointSet::new(self.size);
        for &q in string {
            for n in self.size.neighbors(q) {
                if self.at(n).is_none() {
                    libs.insert(n);
                }
            }
        }
        libs
    }

    fn find_worms(&mut self, specs: &[WormSpec]) -> Result<(), ScenarioError> {
        for p in self.size.points() {
            let Some(color) = self.at(p) else {
                continue;
            };
            if self.worm_of[self.size.index(p)].is_some() {
                continue;
            }
            let string = self.string(p);
            let index = self.worms.len();
            for &q in &string {
                self.worm_of[self.size.index(q)] = Some(index);
            }
            self.worms.push(WormInfo {
                origin: string[0],
                color,
                size: string.len() as u32,
                effective_size: string.len() as f32,
                attack_code: Outcome::Fail,
                attack_point: None,
                defense_code: Outcome::Fail,
                defense_point: None,
                cutstone2: 0,
                inessential: false,
            });
        }
        for spec in specs {
            let index = self.worm_index(spec.stone)?;
            let worm = &mut self.worms[index];
            worm.attack_code = spec.attack;
            worm.attack_point = spec.attack_point;
            worm.defense_code = spec.defense;
            worm.defense_point = spec.defense_point;
            if let Some(e) = spec.effective_size {
                worm.effective_size = e;
            }
            worm.cutstone2 = spec.cutstone2;
            worm.inessential = spec.inessential;
        }
        Ok(())
    }

    fn worm_index(&self, stone: Point) -> Result<usize, ScenarioError> {
        if !self.size.contains(stone) {
            return Err(ScenarioError::NoStone(stone));
        }
        self.worm_of[self.size.index(stone)].ok_or(ScenarioError::NoStone(stone))
    }

    fn find_dragons(&mut self, specs: &[DragonSpec]) -> Result<(), ScenarioError> {
        let mut dragon_of_worm: Vec<Option<usize>> = vec![None; self.worms.len()];
        let mut members: Vec<(Vec<usize>, Option<&DragonSpec>)> = Vec::new();
        for spec in specs {
            let mut worms = Vec::new();
            for &stone in &spec.stones {
                let w = self.worm_index(stone)?;
                if !worms.contains(&w) {
                    worms.push(w);
                }
            }
            let Some(&first) = worms.first() else {
                continue;
            };
            if worms
                .iter()
                .any(|&w| self.worms[w].color != self.worms[first].color)
            {
                return Err(ScenarioError::MixedDragon(self.worms[first].origin));
            }
            for &w in &worms {
                dragon_of_worm[w] = Some(members.len());
            }
            members.push((worms, Some(spec)));
        }
        for w in 0..self.worms.len() {
            if dragon_of_worm[w].is_none() {
                dragon_of_worm[w] = Some(members.len());
                members.push((vec![w], None));
            }
        }

        for (worms, spec) in &members {
            let origin = worms
                .iter()
                .map(|&w| self.worms[w].origin)
                .min()
                .unwrap_or(Point::new(0, 0));
            let first = &self.worms[worms[0]];
            let size = worms.iter().map(|&w| self.worms[w].size).sum();
            let effective: f32 = worms.iter().map(|&w| self.worms[w].effective_size).sum();
            let defaults = DragonSpec::default();
            let spec = spec.unwrap_or(&defaults);
            self.dragons.push(DragonInfo {
                origin,
                color: first.color,
                size,
                effective_size: spec.effective_size.unwrap_or(effective),
                status: spec.status,
                matcher_status: spec.matcher_status,
                owl_status: spec.owl_status,
                owl_attack_code: spec.owl_attack,
                owl_defense_code: spec.owl_defense,
                safety: spec.safety,
                escape_route: spec.escape_route,
                moyo: spec.moyo,
                genus: spec.genus,
                heyes: spec.heyes,
                heye: spec.heye,
            });
        }
        for p in self.size.points() {
            let index = self.size.index(p);
            if let Some(w) = self.worm_of[index] {
                self.dragon_of[index] = dragon_of_worm[w];
            }
        }

        // Dragons touch when stones are adjacent or share a liberty.
        self.dragon_adjacent = vec![Vec::new(); self.dragons.len()];
        for p in self.size.points() {
            let mut around: Vec<usize> = Vec::new();
            if let Some(d) = self.dragon_of[self.size.index(p)] {
                around.push(d);
            }
            for n in self.size.neighbors(p) {
                if let Some(d) = self.dragon_of[self.size.index(n)] {
                    if !around.contains(&d) {
                        around.push(d);
                    }
                }
            }
            let shared = self.at(p).is_none() || around.len() > 1;
            if !shared {
                continue;
            }
            for &a in &around {
                for &b in &around {
                    if a != b && !self.dragon_adjacent[a].contains(&b) {
                        self.dragon_adjacent[a].push(b);
                    }
                }
            }
        }
        for adjacent in &mut self.dragon_adjacent {
            adjacent.sort_by_key(|&d| self.dragons[d].origin);
        }
        Ok(())
    }

    fn static_dragon(&self, stone: Point) -> Result<&DragonInfo, ScenarioError> {
        let index = self
            .size
            .contains(stone)
            .then(|| self.dragon_of[self.size.index(stone)])
            .flatten()
            .ok_or(ScenarioError::NoStone(stone))?;
        Ok(&self.dragons[index])
    }

    fn fallback_worm(&self, p: Point) -> WormInfo {
        WormInfo {
            origin: p,
            color: Color::Black,
            size: 0,
            effective_size: 0.0,
            attack_code: Outcome::Fail,
            attack_point: None,
            defense_code: Outcome::Fail,
            defense_point: None,
            cutstone2: 0,
            inessential: false,
        }
    }

    fn fallback_dragon(&self, p: Point) -> DragonInfo {
        let worm = self.fallback_worm(p);
        DragonInfo {
            origin: p,
            color: worm.color,
            size: 0,
            effective_size: 0.0,
            status: Default::default(),
            matcher_status: Default::default(),
            owl_status: Default::default(),
            owl_attack_code: Outcome::Fail,
            owl_defense_code: Outcome::Fail,
            safety: Default::default(),
            escape_route: 0,
            moyo: 0,
            genus: 0,
            heyes: 0,
            heye: None,
        }
    }

    fn same_static_worm(&self, a: Point, b: Point) -> bool {
        self.size.contains(a)
            && self.size.contains(b)
            && self.worm_of[self.size.index(a)].is_some()
            && self.worm_of[self.size.index(a)] == self.worm_of[self.size.index(b)]
    }

    fn same_static_dragon(&self, a: Point, b: Point) -> bool {
        self.size.contains(a)
            && self.size.contains(b)
            && self.dragon_of[self.size.index(a)].is_some()
            && self.dragon_of[self.size.index(a)] == self.dragon_of[self.size.index(b)]
    }

    /// Places a stone and removes captured strings. Returns the captured
    /// stones, or `None` if the move is occupied or suicide. The board is
    /// left untouched on failure.
    fn place(&mut self, mv: Point, color: Color) -> Option<Vec<Point>> {
        if !self.size.contains(mv) || self.at(mv).is_some() {
            return None;
        }
        let saved = self.stones.clone();
        self.stones[self.size.index(mv)] = Some(color);
        let mut captured = Vec::new();
        for n in self.size.neighbors(mv) {
            if self.at(n) != Some(color.other()) {
                continue;
            }
            let string = self.string(n);
            if self.string_liberties(&string).is_empty() {
                for q in string {
                    self.stones[self.size.index(q)] = None;
                    captured.push(q);
                }
            }
        }
        let own = self.string(mv);
        if self.string_liberties(&own).is_empty() {
            self.stones = saved;
            return None;
        }
        Some(captured)
    }

    pub fn played(&self) -> &[Point] {
        &self.played
    }

    fn reading(&self, readings: &[scenario::Reading], worm: Point) -> Option<Outcome> {
        readings
            .iter()
            .find(|r| r.after == self.played && self.same_static_worm(r.worm, worm))
            .map(|r| r.result)
    }

    fn owl_reading(&self, readings: &[scenario::OwlReading], mv: Point, dragon: Point) -> Outcome {
        readings
            .iter()
            .find(|r| r.at == mv && self.same_static_dragon(r.dragon, dragon))
            .map_or(Outcome::Fail, |r| r.result)
    }
}

impl BoardView for Sandbox {
    fn size(&self) -> BoardSize {
        self.size
    }

    fn color_at(&self, p: Point) -> Option<Color> {
        self.at(p)
    }

    fn worm(&self, p: Point) -> WormInfo {
        match self.size.contains(p).then(|| self.worm_of[self.size.index(p)]).flatten() {
            Some(w) => self.worms[w],
            None => self.fallback_worm(p),
        }
    }

    fn dragon(&self, p: Point) -> DragonInfo {
        match self.size.contains(p).then(|| self.dragon_of[self.size.index(p)]).flatten() {
            Some(d) => self.dragons[d],
            None => self.fallback_dragon(p),
        }
    }

    fn dragon_neighbors(&self, p: Point) -> Vec<Point> {
        match self.size.contains(p).then(|| self.dragon_of[self.size.index(p)]).flatten() {
            Some(d) => self.dragon_adjacent[d]
                .iter()
                .map(|&e| self.dragons[e].origin)
                .collect(),
            None => Vec::new(),
        }
    }

    fn string_origin(&self, p: Point) -> Point {
        self.string(p).first().copied().unwrap_or(p)
    }

    fn chain_links(&self, p: Point) -> Vec<Point> {
        let Some(color) = self.at(p) else {
            return Vec::new();
        };
        let mut links = Vec::new();
        for q in self.string(p) {
            for n in self.size.neighbors(q) {
                if self.at(n) == Some(color.other()) {
                    let origin = self.string_origin(n);
                    if !links.contains(&origin) {
                        links.push(origin);
                    }
                }
            }
        }
        links.sort();
        links
    }

    fn liberties(&self, p: Point) -> usize {
        self.string_liberties(&self.string(p)).len()
    }

    fn approx_liberties_after(&self, mv: Point, color: Color) -> usize {
        let mut board = self.clone();
        match board.place(mv, color) {
            Some(_) => board.liberties(mv),
            None => 0,
        }
    }

    fn is_self_atari(&self, mv: Point, color: Color) -> bool {
        self.approx_liberties_after(mv, color) <= 1
    }

    fn is_ko_point(&self, p: Point) -> bool {
        self.script.ko_stones.contains(&p)
    }

    fn last_move(&self) -> Option<Point> {
        self.script.last_move
    }

    fn eye_origin(&self, p: Point, color: Color) -> Point {
        self.eyes
            .iter()
            .find(|(c, points, _)| *c == color && points.contains(&p))
            .and_then(|(_, points, _)| points.iter().min().copied())
            .unwrap_or(p)
    }

    fn eye_dragon(&self, eye: Point, color: Color) -> Option<Point> {
        self.eyes
            .iter()
            .find(|(c, points, _)| *c == color && points.contains(&eye))
            .and_then(|(_, _, dragon)| *dragon)
    }
}

impl Tactics for Sandbox {
    fn attack(&mut self, worm: Point) -> Outcome {
        if self.at(worm).is_none() {
            return Outcome::Fail;
        }
        self.reading(&self.script.attack, worm)
            .unwrap_or_else(|| self.worm(worm).attack_code)
    }

    fn find_defense(&mut self, worm: Point) -> Outcome {
        if self.at(worm).is_none() {
            return Outcome::Fail;
        }
        self.reading(&self.script.defense, worm)
            .unwrap_or_else(|| self.worm(worm).defense_code)
    }

    fn does_defend(&mut self, mv: Point, worm: Point) -> bool {
        self.script
            .does_defend
            .iter()
            .any(|d| d.at == mv && self.same_static_worm(d.worm, worm))
    }
}

impl LifeAndDeath for Sandbox {
    fn owl_does_attack(&mut self, mv: Point, dragon: Point) -> Outcome {
        self.owl_reading(&self.script.owl_attack, mv, dragon)
    }

    fn owl_does_defend(&mut self, mv: Point, dragon: Point) -> Outcome {
        self.owl_reading(&self.script.owl_defense, mv, dragon)
    }

    fn owl_connection_defends(&mut self, mv: Point, a: Point, b: Point) -> bool {
        self.script.owl_connection.iter().any(|c| {
            c.at == mv
                && ((self.same_static_dragon(c.a, a) && self.same_static_dragon(c.b, b))
                    || (self.same_static_dragon(c.a, b) && self.same_static_dragon(c.b, a)))
        })
    }
}

impl TrialMoves for Sandbox {
    fn try_move(&mut self, mv: Point, color: Color) -> bool {
        if self.ko == Some(mv) {
            return false;
        }
        let undo = Undo {
            stones: self.stones.clone(),
            ko: self.ko,
        };
        let Some(captured) = self.place(mv, color) else {
            return false;
        };
        self.ko = match captured.as_slice() {
            [single] if self.string(mv).len() == 1 && self.liberties(mv) == 1 => Some(*single),
            _ => None,
        };
        self.history.push(undo);
        self.played.push(mv);
        true
    }

    fn undo_move(&mut self) {
        if let Some(undo) = self.history.pop() {
            self.stones = undo.stones;
            self.ko = undo.ko;
            self.played.pop();
        }
    }
}

impl Influence for Sandbox {
    fn delta_territory(&mut self, mv: Point, color: Color, marks: &StoneMarks) -> f32 {
        let mut delta = 0.0;
        for (p, mark) in marks.iter() {
            let Some(stone) = self.at(p) else {
                continue;
            };
            let worm = self.worm(p);
            let counts = match mark {
                StoneMark::Captured => stone == color.other(),
                StoneMark::Saved => stone == color && worm.attack_code.is_success(),
            };
            if counts && worm.size > 0 {
                delta += 2.0 * worm.effective_size / worm.size as f32;
            }
        }
        delta
            + self
                .script
                .territory
                .iter()
                .filter(|t| t.at == mv)
                .map(|t| t.value)
                .sum::<f32>()
    }

    fn territory_color(&self, p: Point) -> Option<Color> {
        self.script
            .territory_color
            .iter()
            .find(|t| t.at == p)
            .map(|t| t.color)
    }
}

impl Referee for Sandbox {
    fn is_legal(&self, mv: Point, color: Color) -> bool {
        if self.ko == Some(mv) || self.script.illegal_ko.contains(&mv) {
            return false;
        }
        self.clone().place(mv, color).is_some()
    }

    fn is_illegal_ko_capture(&self, mv: Point, _color: Color) -> bool {
        self.at(mv).is_none() && self.script.illegal_ko.contains(&mv)
    }

    fn safe_move(&mut self, mv: Point, _color: Color) -> Outcome {
        self.script
            .safe_move
            .iter()
            .find(|s| s.at == mv)
            .map_or(Outcome::Win, |s| s.result)
    }

    fn confirm_safety(
        &mut self,
        mv: Point,
        _color: Color,
        allowed_loss: i32,
        _saved_dragons: &PointSet,
        _saved_worms: &PointSet,
    ) -> bool {
        let loss = self
            .script
            .blunders
            .iter()
            .find(|b| b.at == mv)
            .map_or(0, |b| b.loss);
        loss <= allowed_loss.max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::Trial;

    fn sandbox(rows: &[&str]) -> Sandbox {
        let scenario = Scenario {
            name: String::new(),
            board: rows.iter().map(|r| r.to_string()).collect(),
            to_move: Color::Black,
            worms: Vec::new(),
            dragons: Vec::new(),
            eyes: Vec::new(),
            script: Script::default(),
            observations: Vec::new(),
            pure_threat_value: 0.0,
            score: 0.0,
            config: Default::default(),
        };
        Sandbox::from_scenario(&scenario).unwrap()
    }

    fn pt(s: &str) -> Point {
        s.parse().unwrap()
    }

    #[test]
    fn strings_and_liberties() {
        let board = sandbox(&[".....", ".XX..", ".O...", ".....", "....."]);
        assert_eq!(board.string_origin(pt("C4")), pt("B4"));
        assert_eq!(board.liberties(pt("B4")), 5);
        assert_eq!(board.chain_links(pt("B3")), vec![pt("B4")]);
        assert_eq!(board.worm(pt("C4")).size, 2);
        assert_eq!(board.dragon_neighbors(pt("B3")), vec![pt("B4")]);
    }

    #[test]
    fn trial_capture_is_undone() {
        let mut board = sandbox(&[".....", ".....", "..X..", ".XOX.", "....."]);
        {
            let trial = Trial::play(&mut board, pt("C1"), Color::Black).unwrap();
            assert_eq!(trial.color_at(pt("C2")), None);
            assert_eq!(trial.played(), &[pt("C1")]);
        }
        assert_eq!(board.color_at(pt("C2")), Some(Color::White));
        assert!(board.played().is_empty());
    }

    #[test]
    fn suicide_is_illegal() {
        let board = sandbox(&["X.X..", ".X...", ".....", ".....", "....."]);
        assert!(!board.is_legal(pt("B5"), Color::White));
        assert!(board.is_legal(pt("B5"), Color::Black));
    }

    #[test]
    fn captured_stones_count_in_territory() {
        let mut board = sandbox(&[".....", ".....", "..X..", ".XOX.", "....."]);
        let mut marks = StoneMarks::new(board.size());
        marks.set(pt("C2"), StoneMark::Captured);
        assert_eq!(board.delta_territory(pt("C1"), Color::Black, &marks), 2.0);
    }
}
