use holdem_engine::agents::ScriptedAgent;
use holdem_engine::cards::parse_cards;
use holdem_engine::config::TableConfig;
use holdem_engine::deck::{Deck, StackedDeckSource};
use holdem_engine::engine::Action;
use holdem_engine::game::{HandOutcome, HandState, Table};
use holdem_engine::player::PlayerId;
use holdem_engine::pot::{Award, PotId, PotLedger};

const A: PlayerId = PlayerId(0);
const B: PlayerId = PlayerId(1);
const C: PlayerId = PlayerId(2);

/// `top` first, then the rest of the deck in standard order.
fn stacked(top: &str) -> Deck {
    Deck::with_top(&parse_cards(top).expect("valid cards")).expect("unique cards")
}

fn table(stacks: &[u64], deck: Deck) -> Table<StackedDeckSource> {
    let config = TableConfig { small_blind: 5, big_blind: 10, max_seats: stacks.len(), min_buy_in: 1, ..TableConfig::default() };
    let mut t = Table::new(config, StackedDeckSource::new([deck])).expect("valid config");
    for (i, &s) in stacks.iter().enumerate() {
        t.seat_player(format!("P{i}"), s).expect("seat available");
    }
    t
}

#[test]
fn three_all_in_levels_build_layered_pots() {
    let mut ledger = PotLedger::new([A, B, C]);
    ledger.collect(A, 20);
    ledger.collect(B, 50);
    ledger.collect(C, 100);
    ledger.build_side_pots(&[A, B, C]).unwrap();

    let values: Vec<u64> = ledger.side_pots().iter().map(|p| p.value()).collect();
    assert_eq!(values, vec![60, 60]);
    assert_eq!(ledger.main_pot().value(), 50);
    assert_eq!(ledger.total(), 170);
    assert!(ledger.side_pots()[1].is_eligible(B));
    assert!(!ledger.side_pots()[1].is_eligible(A));
    assert_eq!(ledger.main_pot().eligible().iter().copied().collect::<Vec<_>>(), vec![C]);
}

#[test]
fn tied_hands_split_101_with_the_odd_chip_in_seat_order() {
    let mut ledger = PotLedger::new([A, B, C]);
    ledger.collect(A, 50);
    ledger.collect(B, 50);
    ledger.collect(C, 1);
    ledger.on_fold(C);
    let awards = ledger.distribute(&[vec![B, A]], 0, 3).unwrap();
    assert_eq!(
        awards,
        vec![Award { seat: A, amount: 51, pot: PotId::Main }, Award { seat: B, amount: 50, pot: PotId::Main }]
    );
}

#[test]
fn weaker_hand_collects_the_pot_the_winner_is_not_eligible_for() {
    let mut ledger = PotLedger::new([A, B, C]);
    ledger.collect(A, 20);
    ledger.collect(B, 100);
    ledger.collect(C, 100);
    ledger.build_side_pots(&[A]).unwrap();
    // A best, then C, then B
    let awards = ledger.distribute(&[vec![A], vec![C], vec![B]], 1, 3).unwrap();
    // side pots settle first
    assert_eq!(awards[0], Award { seat: A, amount: 60, pot: PotId::Side(0) });
    assert_eq!(awards[1], Award { seat: C, amount: 160, pot: PotId::Main });
}

#[test]
fn table_pays_each_layer_to_the_best_eligible_hand() {
    // deal order starts at seat 1: P1 KK, P2 QQ, P0 AA
    let deck = stacked("Kc Qc Ac Kd Qd Ad 2h 3c 7d 9s 4h Jh 5c 8s");
    let mut t = table(&[20, 50, 100], deck);
    let mut agent = ScriptedAgent::new([Action::AllIn, Action::AllIn, Action::AllIn]);
    let summary = t.play_hand(&mut agent).unwrap();

    assert_eq!(summary.outcome, HandOutcome::Showdown);
    assert!(summary.early_finish);
    assert_eq!(summary.won(A), 60);
    assert_eq!(summary.won(B), 60);
    assert_eq!(summary.won(C), 50);
    assert_eq!(summary.final_stacks, vec![(A, 60), (B, 60), (C, 50)]);
    assert!(summary.busted.is_empty());
}

#[test]
fn single_all_in_called_with_a_fold_is_one_pot() {
    // P1 (A in the worked example) holds aces and shoves 30; P2 calls; the button folds
    let deck = stacked("As Kc 2c Ad Kd 3d 4h 7s 8d 9c 5h Jd 6s Qs");
    let mut t = table(&[100, 30, 100], deck);
    let mut agent = ScriptedAgent::new([Action::Fold, Action::AllIn, Action::Call]);

    let mut guard = 0;
    while t.state() != HandState::EarlyFinish {
        t.advance(&mut agent).unwrap();
        guard += 1;
        assert!(guard < 20, "hand never closed its betting");
    }
    assert_eq!(t.hand().ledger().main_pot().value(), 60);
    assert!(t.hand().ledger().side_pots().is_empty());
    assert!(t.hand().board().is_empty());

    let summary = t.play_hand(&mut agent).unwrap();
    assert!(summary.early_finish);
    assert_eq!(summary.board.len(), 5);
    assert_eq!(summary.awards, vec![Award { seat: B, amount: 60, pot: PotId::Main }]);
    assert_eq!(summary.final_stacks, vec![(A, 100), (B, 60), (C, 70)]);
}
