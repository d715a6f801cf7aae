use tesuji::sandbox::review_all;
use tesuji::sandbox::scenario::{Observation, PointLoss, PointValue};
use tesuji::{Color, Decision, Point, Scenario};

fn pt(s: &str) -> Point {
    s.parse().unwrap()
}

fn two_captures() -> Scenario {
    Scenario::from_json(include_str!("data/two_captures.json")).unwrap()
}

/// Drops the observations on `at`.
fn without(mut scenario: Scenario, at: &str) -> Scenario {
    let at = pt(at);
    scenario.observations.retain(|o| match o {
        Observation::Attack { at: p, .. } => *p != at,
        _ => true,
    });
    scenario
}

fn decision(scenario: &Scenario) -> Decision {
    scenario.review().unwrap().expect("a move should be chosen")
}

#[test]
fn capture_is_worth_twice_the_stones() {
    let scenario = without(two_captures(), "G1");
    let d = decision(&scenario);
    assert_eq!(d.point, pt("C1"));
    // 2 points of territory plus a small bonus for taking a string in atari.
    assert!(d.value > 2.08 && d.value < 2.1, "value {}", d.value);
}

#[test]
fn reviewed_captures_keep_territory_at_twice_the_size() {
    let (mut board, mut session) = two_captures().build().unwrap();
    session
        .review_move_reasons(&mut board, Color::Black, 0.0, 0.0)
        .unwrap();
    assert_eq!(session.record(pt("C1")).territorial_value, 2.0);
    assert_eq!(session.record(pt("G1")).territorial_value, 6.0);
}

#[test]
fn larger_capture_is_preferred() {
    let d = decision(&two_captures());
    assert_eq!(d.point, pt("G1"));
    assert!(d.value > 6.2 && d.value < 6.22, "value {}", d.value);
}

#[test]
fn antisuji_point_is_never_played() {
    let mut scenario = without(two_captures(), "G1");
    scenario
        .observations
        .push(Observation::Antisuji { at: pt("C1") });
    assert_eq!(scenario.review().unwrap(), None);
}

#[test]
fn capturing_a_defenseless_string_alone_is_not_a_move() {
    let mut scenario = without(two_captures(), "G1");
    scenario.worms[0].defense = tesuji::Outcome::Fail;
    scenario.worms[0].defense_point = None;
    assert_eq!(scenario.review().unwrap(), None);
}

#[test]
fn blunder_is_rejected_and_next_best_chosen() {
    let mut scenario = two_captures();
    scenario.script.blunders.push(PointLoss {
        at: pt("G1"),
        loss: 3,
    });
    assert_eq!(decision(&scenario).point, pt("C1"));
}

#[test]
fn small_loss_within_allowance_is_accepted() {
    let mut scenario = two_captures();
    scenario.script.blunders.push(PointLoss {
        at: pt("G1"),
        loss: 2,
    });
    assert_eq!(decision(&scenario).point, pt("G1"));
}

#[test]
fn every_move_a_blunder_means_pass() {
    let mut scenario = two_captures();
    for at in ["C1", "G1"] {
        scenario.script.blunders.push(PointLoss {
            at: pt(at),
            loss: 10,
        });
    }
    assert_eq!(scenario.review().unwrap(), None);
}

#[test]
fn illegal_ko_capture_turns_threats_into_candidates() {
    let mut scenario = two_captures();
    scenario.script.illegal_ko.push(pt("G1"));
    scenario.observations.push(Observation::Followup {
        at: pt("E5"),
        value: 4.0,
    });
    let d = decision(&scenario);
    assert_eq!(d.point, pt("E5"));
    assert_eq!(d.value, 4.0);
}

#[test]
fn illegal_ko_capture_without_threats_falls_back() {
    let mut scenario = two_captures();
    scenario.script.illegal_ko.push(pt("G1"));
    assert_eq!(decision(&scenario).point, pt("C1"));
}

#[test]
fn replaced_move_passes_its_value_on() {
    let mut scenario = without(two_captures(), "G1");
    let direct = decision(&scenario);
    scenario.observations.push(Observation::Replace {
        from: pt("C1"),
        to: pt("E5"),
    });
    let d = decision(&scenario);
    assert_eq!(d.point, pt("E5"));
    assert_eq!(d.value, direct.value);
}

#[test]
fn maximum_value_caps_a_move() {
    let mut scenario = two_captures();
    scenario.observations.push(Observation::MaxValue {
        at: pt("G1"),
        value: 1.0,
    });
    assert_eq!(decision(&scenario).point, pt("C1"));
}

#[test]
fn minimum_value_lifts_a_move() {
    let mut scenario = two_captures();
    scenario.observations.push(Observation::MinValue {
        at: pt("E5"),
        value: 30.0,
    });
    let d = decision(&scenario);
    assert_eq!(d.point, pt("E5"));
    assert!(d.value >= 30.0 && d.value < 30.01);
}

#[test]
fn scripted_territory_adds_to_blocking_moves() {
    let mut scenario = two_captures();
    scenario
        .observations
        .push(Observation::BlockTerritory { at: pt("E5") });
    scenario.script.territory.push(PointValue {
        at: pt("E5"),
        value: 9.0,
    });
    assert_eq!(decision(&scenario).point, pt("E5"));
}

#[test]
fn review_is_deterministic() {
    let scenario = two_captures();
    let first = scenario.review().unwrap();
    for _ in 0..3 {
        assert_eq!(scenario.review().unwrap(), first);
    }
}

#[test]
fn seed_only_moves_the_tie_break() {
    let mut scenario = without(two_captures(), "G1");
    let a = decision(&scenario);
    scenario.config.seed = 12345;
    let b = decision(&scenario);
    assert_eq!(a.point, b.point);
    assert!((a.value - b.value).abs() < 0.01);
}

#[test]
fn white_to_move_ignores_black_captures() {
    let mut scenario = two_captures();
    scenario.to_move = Color::White;
    let result = scenario.review().unwrap();
    assert_ne!(result.map(|d| d.point), Some(pt("G1")));
}

#[test]
fn batch_keeps_order_and_isolates_failures() {
    let good = two_captures();
    let small = without(two_captures(), "G1");
    let mut broken = two_captures();
    broken.board[0] = "..?......".to_string();

    let scenarios = vec![good, broken, small];
    let results = review_all(&scenarios, 2).unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().unwrap().unwrap().point, pt("G1"));
    assert!(results[1].is_err());
    assert_eq!(results[2].as_ref().unwrap().unwrap().point, pt("C1"));
}
