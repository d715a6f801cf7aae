use tesuji::oracle::BoardView;
use tesuji::reasons::{ReasonError, ReasonKind, Subject};
use tesuji::sandbox::scenario::{Observation, OwlReading, Reading};
use tesuji::{Color, Outcome, Point, Sandbox, Scenario, Session, Status};

fn pt(s: &str) -> Point {
    s.parse().unwrap()
}

fn owl_attack() -> Scenario {
    Scenario::from_json(include_str!("data/owl_attack.json")).unwrap()
}

fn two_captures() -> Scenario {
    Scenario::from_json(include_str!("data/two_captures.json")).unwrap()
}

fn empty_session() -> (Sandbox, Session) {
    let mut scenario = owl_attack();
    scenario.observations.clear();
    scenario.build().unwrap()
}

#[test]
fn same_reason_is_stored_once() {
    let (board, mut session) = empty_session();
    for _ in 0..3 {
        session
            .add_attack_move(&board, pt("F4"), pt("E4"), Outcome::Win)
            .unwrap();
    }
    assert_eq!(session.reasons_at(pt("F4")).count(), 1);
    assert!(session.attack_known(pt("F4"), None));
}

#[test]
fn failed_reading_adds_nothing() {
    let (board, mut session) = empty_session();
    session
        .add_defense_move(&board, pt("F4"), pt("D4"), Outcome::Fail)
        .unwrap();
    assert_eq!(session.reasons_at(pt("F4")).count(), 0);
}

#[test]
fn ko_results_get_their_own_kinds() {
    let (board, mut session) = empty_session();
    session
        .add_attack_move(&board, pt("F4"), pt("D4"), Outcome::GoodKo)
        .unwrap();
    session
        .add_owl_defense_move(&board, pt("F5"), pt("D4"), Outcome::BadKo)
        .unwrap();
    let kinds: Vec<ReasonKind> = session.reasons_at(pt("F4")).map(|r| r.kind).collect();
    assert_eq!(kinds, vec![ReasonKind::AttackGoodKo]);
    assert!(session.reason_known(pt("F5"), ReasonKind::OwlDefendBadKo, None));
}

#[test]
fn connection_ignores_argument_order() {
    let mut scenario = owl_attack();
    scenario.observations.clear();
    scenario.board[0] = "X.....X".to_string();
    let (board, mut session) = scenario.build().unwrap();
    session
        .add_connection_move(&board, pt("D7"), pt("A7"), pt("G7"))
        .unwrap();
    session
        .add_cut_move(&board, pt("D6"), pt("G7"), pt("A7"))
        .unwrap();
    let connect = session.reasons_at(pt("D7")).next().unwrap().subject;
    let cut = session.reasons_at(pt("D6")).next().unwrap().subject;
    assert!(matches!(connect, Subject::Connection(_)));
    assert_eq!(connect, cut);
}

#[test]
fn connection_within_one_dragon_is_ignored() {
    let (board, mut session) = empty_session();
    session
        .add_connection_move(&board, pt("F4"), pt("D4"), pt("E4"))
        .unwrap();
    assert_eq!(session.reasons_at(pt("F4")).count(), 0);
}

#[test]
fn connection_between_colours_is_an_error() {
    let (board, mut session) = empty_session();
    assert_eq!(
        session.add_connection_move(&board, pt("F4"), pt("C4"), pt("D4")),
        Err(ReasonError::MixedColors(pt("C4"), pt("D4")))
    );
}

#[test]
fn off_board_points_are_rejected() {
    let (_, mut session) = empty_session();
    let far = Point::new(8, 8);
    assert_eq!(
        session.add_antisuji_move(far),
        Err(ReasonError::OffBoard(far))
    );
    assert_eq!(
        session.add_followup_value(far, 3.0),
        Err(ReasonError::OffBoard(far))
    );
    assert_eq!(
        session.remove_reason(far, ReasonKind::Antisuji, Subject::Nothing),
        Err(ReasonError::OffBoard(far))
    );
}

#[test]
#[should_panic(expected = "off the board")]
fn querying_off_board_reasons_panics() {
    let (_, session) = empty_session();
    session.reason_known(Point::new(8, 8), ReasonKind::Antisuji, None);
}

#[test]
fn reason_list_capacity_is_enforced() {
    let mut scenario = owl_attack();
    scenario.observations.clear();
    scenario.config.max_reasons_per_move = 2;
    let (board, mut session) = scenario.build().unwrap();
    session.add_antisuji_move(pt("A1")).unwrap();
    session.add_block_territory_move(pt("A1")).unwrap();
    assert_eq!(
        session.add_expand_moyo_move(pt("A1")),
        Err(ReasonError::ReasonListFull {
            point: pt("A1"),
            capacity: 2
        })
    );
    // Repeating a stored reason is still fine.
    session.add_antisuji_move(pt("A1")).unwrap();
    session
        .add_owl_attack_move(&board, pt("A2"), pt("D4"), Outcome::Win)
        .unwrap();
}

#[test]
fn followup_and_limits_keep_the_extremes() {
    let (_, mut session) = empty_session();
    let p = pt("B2");
    session.add_followup_value(p, 3.0).unwrap();
    session.add_followup_value(p, 1.0).unwrap();
    session.set_minimum_move_value(p, 5.0).unwrap();
    session.set_minimum_move_value(p, 2.0).unwrap();
    session.set_maximum_move_value(p, 9.0).unwrap();
    session.set_maximum_move_value(p, 12.0).unwrap();
    let record = session.record(p);
    assert_eq!(record.followup_value, 3.0);
    assert_eq!(record.min_value, 5.0);
    assert_eq!(record.max_value, 9.0);
}

#[test]
fn replacement_cycles_are_rejected() {
    let (_, mut session) = empty_session();
    session.add_replacement_move(pt("A1"), pt("B1")).unwrap();
    session.add_replacement_move(pt("B1"), pt("C1")).unwrap();
    assert_eq!(session.replacement().get(pt("A1")), Some(pt("C1")));
    assert_eq!(
        session.add_replacement_move(pt("C1"), pt("A1")),
        Err(ReasonError::CyclicReplacement {
            from: pt("C1"),
            to: pt("A1")
        })
    );
}

#[test]
fn threats_and_saved_stones_are_listed() {
    let (board, mut session) = empty_session();
    session
        .add_attack_threat_move(&board, pt("F4"), pt("E4"))
        .unwrap();
    session
        .add_defense_threat_move(&board, pt("B4"), pt("C4"))
        .unwrap();
    session
        .add_defense_move(&board, pt("B4"), pt("C4"), Outcome::Win)
        .unwrap();
    session
        .add_owl_defense_move(&board, pt("F4"), pt("D4"), Outcome::Win)
        .unwrap();
    assert_eq!(session.attack_threats(pt("F4")), vec![pt("D4")]);
    assert_eq!(session.defense_threats(pt("B4")), vec![pt("C4")]);

    let worms = session.saved_worms(&board, pt("B4"));
    assert_eq!(worms.iter().collect::<Vec<_>>(), vec![pt("C4")]);
    let dragons = session.saved_dragons(&board, pt("F4"));
    assert_eq!(dragons.len(), 2);
    assert!(dragons.contains(pt("E4")));

    session
        .remove_attack_threat_move(&board, pt("F4"), pt("D4"))
        .unwrap();
    assert!(session.attack_threats(pt("F4")).is_empty());
}

#[test]
fn reasons_are_described() {
    let (board, mut session) = empty_session();
    session
        .add_owl_attack_move(&board, pt("F4"), pt("E4"), Outcome::Win)
        .unwrap();
    let lines = session.list_move_reasons(&board, pt("F4"));
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("Move at F4"));
    assert!(lines[1].contains("unsafe"));
}

#[test]
fn owl_attack_already_pays_for_strategic_attack() {
    let (mut board, mut session) = owl_attack().build().unwrap();
    session.examine_move_safety(&mut board, Color::Black);
    assert!(session.record(pt("F4")).move_safety);
    session.value_move_reasons(&mut board, pt("F4"), Color::Black, 0.0, 0.0);
    assert_eq!(session.record(pt("F4")).strategical_value, 0.0);
}

#[test]
fn strategic_attack_alone_counts() {
    let mut scenario = owl_attack();
    scenario
        .observations
        .retain(|o| !matches!(o, Observation::OwlAttack { .. }));
    let (mut board, mut session) = scenario.build().unwrap();
    session.examine_move_safety(&mut board, Color::Black);
    session.value_move_reasons(&mut board, pt("F4"), Color::Black, 0.0, 0.0);
    // 0.75 of the effective size times the missing safety of a critical dragon.
    let value = session.record(pt("F4")).strategical_value;
    assert!((value - 3.375).abs() < 1e-4, "value {value}");
    assert_eq!(board.color_at(pt("F4")), None);
}

#[test]
fn rereading_finds_a_second_capture() {
    let mut scenario = two_captures();
    scenario.script.defense.push(Reading {
        after: vec![pt("C1")],
        worm: pt("G2"),
        result: Outcome::Fail,
    });
    let (mut board, mut session) = scenario.build().unwrap();
    session
        .find_more_attack_and_defense_moves(&mut board, Color::Black)
        .unwrap();
    let g2 = session.registry().find_worm(pt("G2"));
    assert!(g2.is_some());
    assert!(session.attack_known(pt("C1"), g2));
    assert!(!session.attack_known(pt("G1"), session.registry().find_worm(pt("C2"))));
    assert!(board.played().is_empty());
}

#[test]
fn strategic_attack_is_upgraded_by_owl_reading() {
    let mut scenario = owl_attack();
    scenario
        .observations
        .retain(|o| !matches!(o, Observation::OwlAttack { .. }));
    scenario.dragons[0].owl_status = Status::Critical;
    scenario.script.owl_attack.push(OwlReading {
        at: pt("F4"),
        dragon: pt("E4"),
        result: Outcome::Win,
    });
    let (mut board, mut session) = scenario.build().unwrap();
    session
        .find_more_owl_attack_and_defense_moves(&mut board, Color::Black)
        .unwrap();
    assert!(session.reason_known(pt("F4"), ReasonKind::OwlAttack, None));
}

#[test]
fn owl_reading_below_stored_result_is_not_registered() {
    let mut scenario = owl_attack();
    scenario.observations.clear();
    scenario.observations.push(Observation::StrategicAttack {
        at: pt("F4"),
        dragon: pt("D4"),
    });
    scenario.dragons[0].owl_status = Status::Critical;
    scenario.dragons[0].owl_attack = Outcome::Win;
    scenario.script.owl_attack.push(OwlReading {
        at: pt("F4"),
        dragon: pt("D4"),
        result: Outcome::BadKo,
    });
    let (mut board, mut session) = scenario.build().unwrap();
    session
        .find_more_owl_attack_and_defense_moves(&mut board, Color::Black)
        .unwrap();
    assert!(!session.owl_attack_known(pt("F4"), None));
}

#[test]
fn capture_between_dragons_induces_connections() {
    let mut scenario = two_captures();
    scenario.dragons.clear();
    let (mut board, mut session) = scenario.build().unwrap();
    session
        .induce_secondary_move_reasons(&mut board, Color::Black)
        .unwrap();
    let connects = session
        .reasons_at(pt("C1"))
        .filter(|r| r.kind == ReasonKind::Connect)
        .count();
    assert_eq!(connects, 2);

    session.examine_move_safety(&mut board, Color::Black);
    assert!(session.record(pt("C1")).move_safety);
}

#[test]
fn capture_inside_one_dragon_induces_nothing() {
    let (mut board, mut session) = two_captures().build().unwrap();
    session
        .induce_secondary_move_reasons(&mut board, Color::Black)
        .unwrap();
    assert_eq!(session.reasons_at(pt("C1")).count(), 1);
}
