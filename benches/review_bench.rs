use criterion::{black_box, criterion_group, criterion_main, Criterion};

use tesuji::sandbox::review_all;
use tesuji::{Color, Point, Scenario};

const TWO_CAPTURES: &str = include_str!("../tests/data/two_captures.json");

fn scenario() -> Scenario {
    Scenario::from_json(TWO_CAPTURES).unwrap()
}

fn bench_review(c: &mut Criterion) {
    let scenario = scenario();
    c.bench_function("review_two_captures", |b| {
        b.iter(|| black_box(&scenario).review().unwrap())
    });
}

fn bench_value_moves(c: &mut Criterion) {
    let scenario = scenario();
    c.bench_function("value_moves_9x9", |b| {
        b.iter(|| {
            let (mut board, mut session) = scenario.build().unwrap();
            session.examine_move_safety(&mut board, Color::Black);
            session.value_moves(&mut board, Color::Black, 0.0, black_box(0.0));
            session.record(Point::new(0, 6)).value
        })
    });
}

fn bench_batch(c: &mut Criterion) {
    let scenarios: Vec<Scenario> = (0..32).map(|_| scenario()).collect();
    let mut group = c.benchmark_group("batch");
    group.sample_size(20);
    for threads in [1, 4] {
        group.bench_function(format!("review_32_scenarios_{threads}_threads"), |b| {
            b.iter(|| review_all(black_box(&scenarios), threads).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_review, bench_value_moves, bench_batch);
criterion_main!(benches);
