use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use holdem_engine::agents::RandomAgent;
use holdem_engine::cards::{parse_cards, Card};
use holdem_engine::config::TableConfig;
use holdem_engine::deck::SeededDeckSource;
use holdem_engine::evaluator::{evaluate, evaluate_five, evaluate_seven};
use holdem_engine::game::Table;

fn five(s: &str) -> [Card; 5] {
    let v = parse_cards(s).unwrap();
    [v[0], v[1], v[2], v[3], v[4]]
}

fn seven(s: &str) -> [Card; 7] {
    let v = parse_cards(s).unwrap();
    [v[0], v[1], v[2], v[3], v[4], v[5], v[6]]
}

fn bench_evaluate_five(c: &mut Criterion) {
    let mut g = c.benchmark_group("evaluate_five");
    for (name, hand) in [("high_card", "Ah Kd 7s 5c 2d"), ("full_house", "Qs Qh Qd 4c 4s"), ("royal", "As Ks Qs Js Ts")] {
        let cards = five(hand);
        g.bench_with_input(BenchmarkId::new(name, hand), &cards, |b, input| {
            b.iter(|| evaluate_five(black_box(input)))
        });
    }
    g.finish();
}

fn bench_evaluate_seven(c: &mut Criterion) {
    let mut g = c.benchmark_group("evaluate_seven");
    for (name, hand) in [
        ("flush_over_straight", "As Ah Ks Qs Js 9s 8d"),
        ("wheel", "Ac 2d 3h 4s 5c Kd Qh"),
        ("two_trips", "7c 7d 7h 3s 3c 3d 2h"),
    ] {
        let cards = seven(hand);
        g.bench_with_input(BenchmarkId::new(name, hand), &cards, |b, input| {
            b.iter(|| evaluate_seven(black_box(input)))
        });
    }
    g.finish();
    let six = parse_cards("Th Jh Qh Kh 2c 3d").unwrap();
    c.bench_function("evaluate_six", |b| b.iter(|| evaluate(black_box(&six))));
}

fn bench_table(c: &mut Criterion) {
    c.bench_function("play_100_hands_6max", |b| {
        b.iter(|| {
            let mut table = Table::new(TableConfig::default(), SeededDeckSource::new(9)).unwrap();
            for i in 0..6 {
                table.seat_player(format!("p{i}"), 200).unwrap();
            }
            table.run(&mut RandomAgent::new(3), black_box(100)).unwrap()
        })
    });
}

criterion_group!(benches, bench_evaluate_five, bench_evaluate_seven, bench_table);
criterion_main!(benches);
