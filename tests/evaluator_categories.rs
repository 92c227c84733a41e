use holdem_engine::cards::parse_cards;
use holdem_engine::evaluator::{evaluate, evaluate_five, Category, HandRank};

fn five(s: &str) -> HandRank {
    let v = parse_cards(s).expect("valid cards");
    evaluate_five(&[v[0], v[1], v[2], v[3], v[4]])
}

fn best(s: &str) -> HandRank {
    evaluate(&parse_cards(s).expect("valid cards")).expect("5 to 7 distinct cards")
}

#[test]
fn every_category_is_recognised_from_five_cards() {
    let cases = [
        ("As Ks Qs Js Ts", Category::RoyalFlush),
        ("9h 8h 7h 6h 5h", Category::StraightFlush),
        ("5d 4d 3d 2d Ad", Category::StraightFlush),
        ("9c 9d 9h 9s Ac", Category::FourOfAKind),
        ("3c 3d 3h Js Jc", Category::FullHouse),
        ("Kh Th 8h 6h 3h", Category::Flush),
        ("Ac 5c 4d 3h 2s", Category::Straight),
        ("Qc Qd Qh Ts 2c", Category::ThreeOfAKind),
        ("Jc Jd 9c 9h 2s", Category::TwoPair),
        ("Ah Ad Ts 9c 2d", Category::Pair),
        ("Ah Kd 7s 5c 2d", Category::HighCard),
    ];
    for (cards, expected) in cases {
        assert_eq!(five(cards).category, expected, "{cards}");
    }
}

#[test]
fn categories_order_by_strength() {
    let ladder = [
        "Ah Kd 7s 5c 2d",
        "2h 2d 3s 4c 6d",
        "2c 2d 3c 3h 4s",
        "2c 2d 2h 3s 4c",
        "Ac 2c 3d 4h 5s",
        "2h 4h 6h 8h Th",
        "2c 2d 2h 3s 3c",
        "2c 2d 2h 2s 3c",
        "5d 4d 3d 2d Ad",
        "As Ks Qs Js Ts",
    ];
    for pair in ladder.windows(2) {
        assert!(five(pair[1]) > five(pair[0]), "{} should beat {}", pair[1], pair[0]);
    }
}

#[test]
fn seven_cards_pick_the_strongest_category() {
    // flush and straight available: the flush wins
    assert_eq!(best("As Ah Ks Qs Js 9s 8d").category, Category::Flush);
    // two sets make a full house, higher set over
    let fh = best("7c 7d 7h 3s 3c 3d 2h");
    assert_eq!(fh.category, Category::FullHouse);
    assert_eq!(fh.tiebreak().map(|r| r.value()), [7, 7, 7, 3, 3]);
    // three pairs keep the best two plus the best kicker
    let tp = best("Kc Kd 9h 9s 4c 4d Qh");
    assert_eq!(tp.category, Category::TwoPair);
    assert_eq!(tp.tiebreak().map(|r| r.value()), [13, 13, 9, 9, 12]);
    // a straight flush hidden among seven cards
    assert_eq!(best("2h 3h 4h 5h 6h 6c 6d").category, Category::StraightFlush);
}

#[test]
fn six_card_inputs_are_supported() {
    let r = best("Th Jh Qh Kh 2c 3d");
    assert_eq!(r.category, Category::HighCard);
    assert_eq!(r.tiebreak().map(|r| r.value()), [13, 12, 11, 10, 3]);
}

#[test]
fn wheel_straight_plays_ace_low() {
    let r = best("Ah 2d 3c 4s 5h Kd 9c");
    assert_eq!(r.category, Category::Straight);
    assert_eq!(r.tiebreak().map(|r| r.value()), [5, 4, 3, 2, 14]);
    assert!(best("2d 3c 4s 5h 6h Kd 9c") > r);
}
