//! Scenario files: a position, its static analysis, scripted reading
//! results and the reasons the analysers would have registered.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{Sandbox, ScenarioError};
use crate::board::{BoardSize, Color, Outcome, Point, Safety, Status};
use crate::config::ReviewConfig;
use crate::oracle::BoardView;
use crate::reasons::ReasonError;
use crate::select::Decision;
use crate::session::Session;

fn win() -> Outcome {
    Outcome::Win
}

/// Overrides for the static data of the worm through `stone`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WormSpec {
    pub stone: Point,
    #[serde(default)]
    pub attack: Outcome,
    #[serde(default)]
    pub attack_point: Option<Point>,
    #[serde(default)]
    pub defense: Outcome,
    #[serde(default)]
    pub defense_point: Option<Point>,
    #[serde(default)]
    pub effective_size: Option<f32>,
    #[serde(default)]
    pub cutstone2: u32,
    #[serde(default)]
    pub inessential: bool,
}

/// Groups the worms through `stones` into one dragon and sets its data.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DragonSpec {
    pub stones: Vec<Point>,
    pub status: Status,
    pub matcher_status: Status,
    pub owl_status: Status,
    pub owl_attack: Outcome,
    pub owl_defense: Outcome,
    pub safety: Safety,
    pub effective_size: Option<f32>,
    pub escape_route: i32,
    pub moyo: i32,
    pub genus: i32,
    pub heyes: i32,
    pub heye: Option<Point>,
}

/// An eye space of `color` owned by the dragon through `dragon`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EyeSpec {
    pub color: Color,
    pub points: Vec<Point>,
    #[serde(default)]
    pub dragon: Option<Point>,
}

/// Tactical reading result for `worm` after the trial moves in `after`
/// have been played, in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    #[serde(default)]
    pub after: Vec<Point>,
    pub worm: Point,
    pub result: Outcome,
}

/// Owl reading result for playing `at` against or for `dragon`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwlReading {
    pub at: Point,
    pub dragon: Point,
    #[serde(default = "win")]
    pub result: Outcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveOnWorm {
    pub at: Point,
    pub worm: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveOnPair {
    pub at: Point,
    pub a: Point,
    pub b: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointOutcome {
    pub at: Point,
    pub result: Outcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointValue {
    pub at: Point,
    pub value: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointLoss {
    pub at: Point,
    pub loss: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointColor {
    pub at: Point,
    pub color: Color,
}

/// Answers of the collaborators that cannot be derived from the board.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Script {
    /// Attack results; unlisted worms keep their static attack code.
    pub attack: Vec<Reading>,
    /// Defense results; unlisted worms keep their static defense code.
    pub defense: Vec<Reading>,
    pub does_defend: Vec<MoveOnWorm>,
    pub owl_attack: Vec<OwlReading>,
    pub owl_defense: Vec<OwlReading>,
    pub owl_connection: Vec<MoveOnPair>,
    /// Blunder checker results; unlisted moves are safe.
    pub safe_move: Vec<PointOutcome>,
    /// Stones lost by playing a move.
    pub blunders: Vec<PointLoss>,
    /// Territory gained by a move beyond captured and saved stones.
    pub territory: Vec<PointValue>,
    pub territory_color: Vec<PointColor>,
    pub ko_stones: Vec<Point>,
    /// Empty points whose capture is forbidden by the ko rule.
    pub illegal_ko: Vec<Point>,
    pub last_move: Option<Point>,
}

/// One call into the reason collection API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Observation {
    Attack {
        at: Point,
        worm: Point,
        #[serde(default = "win")]
        code: Outcome,
    },
    Defend {
        at: Point,
        worm: Point,
        #[serde(default = "win")]
        code: Outcome,
    },
    AttackThreat { at: Point, worm: Point },
    DefendThreat { at: Point, worm: Point },
    Connect { at: Point, a: Point, b: Point },
    Cut { at: Point, a: Point, b: Point },
    Antisuji { at: Point },
    Semeai { at: Point, dragon: Point },
    SemeaiThreat { at: Point, dragon: Point },
    VitalEye { at: Point, eye: Point, color: Color },
    AttackEither { at: Point, a: Point, b: Point },
    DefendBoth { at: Point, a: Point, b: Point },
    BlockTerritory { at: Point },
    ExpandTerritory { at: Point },
    ExpandMoyo { at: Point },
    StrategicAttack { at: Point, dragon: Point },
    StrategicDefend { at: Point, dragon: Point },
    OwlAttack {
        at: Point,
        dragon: Point,
        #[serde(default = "win")]
        code: Outcome,
    },
    OwlDefend {
        at: Point,
        dragon: Point,
        #[serde(default = "win")]
        code: Outcome,
    },
    OwlAttackThreat { at: Point, dragon: Point },
    OwlDefenseThreat { at: Point, dragon: Point },
    OwlPreventThreat { at: Point, dragon: Point },
    UncertainOwlAttack { at: Point, dragon: Point },
    UncertainOwlDefense { at: Point, dragon: Point },
    MyAtariAtari { at: Point, size: u32 },
    YourAtariAtari { at: Point, size: u32 },
    Shape { at: Point, value: f32 },
    WorthwhileThreat { at: Point },
    Followup { at: Point, value: f32 },
    ReverseFollowup { at: Point, value: f32 },
    MinValue { at: Point, value: f32 },
    MaxValue { at: Point, value: f32 },
    MinTerritory { at: Point, value: f32 },
    MaxTerritory { at: Point, value: f32 },
    Replace { from: Point, to: Point },
    Lunch { eater: Point, food: Point },
}

impl Observation {
    /// Registers the observation with `session`.
    pub fn apply<B: BoardView + ?Sized>(
        &self,
        session: &mut Session,
        board: &B,
    ) -> Result<(), ReasonError> {
        use Observation::*;
        match *self {
            Attack { at, worm, code } => session.add_attack_move(board, at, worm, code),
            Defend { at, worm, code } => session.add_defense_move(board, at, worm, code),
            AttackThreat { at, worm } => session.add_attack_threat_move(board, at, worm),
            DefendThreat { at, worm } => session.add_defense_threat_move(board, at, worm),
            Connect { at, a, b } => session.add_connection_move(board, at, a, b),
            Cut { at, a, b } => session.add_cut_move(board, at, a, b),
            Antisuji { at } => session.add_antisuji_move(at),
            Semeai { at, dragon } => session.add_semeai_move(board, at, dragon),
            SemeaiThreat { at, dragon } => session.add_semeai_threat(board, at, dragon),
            VitalEye { at, eye, color } => session.add_vital_eye_move(board, at, eye, color),
            AttackEither { at, a, b } => session.add_attack_either_move(board, at, a, b),
            DefendBoth { at, a, b } => session.add_defend_both_move(board, at, a, b),
            BlockTerritory { at } => session.add_block_territory_move(at),
            ExpandTerritory { at } => session.add_expand_territory_move(at),
            ExpandMoyo { at } => session.add_expand_moyo_move(at),
            StrategicAttack { at, dragon } => session.add_strategical_attack_move(board, at, dragon),
            StrategicDefend { at, dragon } => {
                session.add_strategical_defense_move(board, at, dragon)
            }
            OwlAttack { at, dragon, code } => session.add_owl_attack_move(board, at, dragon, code),
            OwlDefend { at, dragon, code } => session.add_owl_defense_move(board, at, dragon, code),
            OwlAttackThreat { at, dragon } => session.add_owl_attack_threat_move(board, at, dragon),
            OwlDefenseThreat { at, dragon } => {
                session.add_owl_defense_threat_move(board, at, dragon)
            }
            OwlPreventThreat { at, dragon } => {
                session.add_owl_prevent_threat_move(board, at, dragon)
            }
            UncertainOwlAttack { at, dragon } => {
                session.add_owl_uncertain_attack_move(board, at, dragon)
            }
            UncertainOwlDefense { at, dragon } => {
                session.add_owl_uncertain_defense_move(board, at, dragon)
            }
            MyAtariAtari { at, size } => session.add_my_atari_atari_move(at, size),
            YourAtariAtari { at, size } => session.add_your_atari_atari_move(at, size),
            Shape { at, value } => session.add_shape_value(at, value),
            WorthwhileThreat { at } => session.add_worthwhile_threat_move(at),
            Followup { at, value } => session.add_followup_value(at, value),
            ReverseFollowup { at, value } => session.add_reverse_followup_value(at, value),
            MinValue { at, value } => session.set_minimum_move_value(at, value),
            MaxValue { at, value } => session.set_maximum_move_value(at, value),
            MinTerritory { at, value } => session.set_minimum_territorial_value(at, value),
            MaxTerritory { at, value } => session.set_maximum_territorial_value(at, value),
            Replace { from, to } => session.add_replacement_move(from, to),
            Lunch { eater, food } => session.add_lunch(board, eater, food),
        }
    }
}

/// A complete review problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    /// Rows from the top of the board down: `X` black, `O` white, `.`
    /// empty.
    pub board: Vec<String>,
    pub to_move: Color,
    #[serde(default)]
    pub worms: Vec<WormSpec>,
    #[serde(default)]
    pub dragons: Vec<DragonSpec>,
    #[serde(default)]
    pub eyes: Vec<EyeSpec>,
    #[serde(default)]
    pub script: Script,
    #[serde(default)]
    pub observations: Vec<Observation>,
    #[serde(default)]
    pub pure_threat_value: f32,
    /// Score estimate, positive when White leads.
    #[serde(default)]
    pub score: f32,
    #[serde(default)]
    pub config: ReviewConfig,
}

impl Scenario {
    pub fn from_json(text: &str) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Board size and stones, indexed row-major from the bottom line.
    pub fn parse_board(&self) -> Result<(BoardSize, Vec<Option<Color>>), ScenarioError> {
        let n = u8::try_from(self.board.len()).map_err(|_| ScenarioError::BoardTooLarge)?;
        let size = BoardSize::new(n)?;
        let mut stones = vec![None; size.area()];
        for (k, line) in self.board.iter().enumerate() {
            let row = n as usize - 1 - k;
            let cells: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
            if cells.len() != n as usize {
                return Err(ScenarioError::RowLength {
                    row: k + 1,
                    expected: n as usize,
                    found: cells.len(),
                });
            }
            for (col, c) in cells.into_iter().enumerate() {
                let stone = match c {
                    'X' | 'x' => Some(Color::Black),
                    'O' | 'o' => Some(Color::White),
                    '.' | '+' => None,
                    other => return Err(ScenarioError::BadCell(other)),
                };
                stones[size.index(Point::new(row as u8, col as u8))] = stone;
            }
        }
        Ok((size, stones))
    }

    /// Sets up the collaborators and a session holding every observation.
    pub fn build(&self) -> Result<(Sandbox, Session), ScenarioError> {
        let sandbox = Sandbox::from_scenario(self)?;
        let mut session = Session::new(sandbox.size(), self.config.clone());
        for observation in &self.observations {
            observation.apply(&mut session, &sandbox)?;
        }
        Ok((sandbox, session))
    }

    /// Runs a full review of the scenario.
    pub fn review(&self) -> Result<Option<Decision>, ScenarioError> {
        let (mut sandbox, mut session) = self.build()?;
        let decision = session.review_move_reasons(
            &mut sandbox,
            self.to_move,
            self.pure_threat_value,
            self.score,
        )?;
        Ok(decision)
    }
}
