use holdem_engine::agents::{PassiveAgent, ScriptedAgent};
use holdem_engine::config::TableConfig;
use holdem_engine::deck::StackedDeckSource;
use holdem_engine::engine::{Action, ActionError, Street};
use holdem_engine::game::{HandOutcome, HandState, Table};
use holdem_engine::history::HandHistoryVerb;
use holdem_engine::player::PlayerId;

fn table(stacks: &[u64]) -> Table<StackedDeckSource> {
    let config = TableConfig { small_blind: 5, big_blind: 10, max_seats: stacks.len(), min_buy_in: 1, ..TableConfig::default() };
    let mut t = Table::new(config, StackedDeckSource::default()).expect("valid config");
    for (i, &s) in stacks.iter().enumerate() {
        t.seat_player(format!("P{i}"), s).expect("seat available");
    }
    t
}

/// Advance until the first preflop decision is pending.
fn deal(t: &mut Table<StackedDeckSource>) {
    while t.state() != HandState::Preflop {
        t.advance(&mut PassiveAgent).unwrap();
    }
}

#[test]
fn round_with_two_matched_bets_and_a_fold_completes() {
    let mut t = table(&[100, 100, 100]);
    deal(&mut t);
    let mut agent = ScriptedAgent::new([Action::Raise(20), Action::Fold, Action::Call]);
    for _ in 0..3 {
        t.advance(&mut agent).unwrap();
    }
    assert_eq!(t.state(), HandState::Flop);
    assert_eq!(t.hand().board().len(), 3);
    assert_eq!(t.hand().ledger().total(), 45);
    // seat 1 folded, so seat 2 opens the flop
    assert_eq!(t.current_actor(), Some(PlayerId(2)));
    let view = t.decision_view().unwrap();
    assert_eq!((view.bet_to_match, view.min_raise_to), (0, 10));
    assert_eq!(view.active_players, vec![PlayerId(0), PlayerId(2)]);
}

#[test]
fn raise_below_minimum_is_rejected_and_asked_again() {
    let mut t = table(&[100, 100]);
    deal(&mut t);
    let mut agent = ScriptedAgent::new([Action::Raise(15), Action::Bet(30), Action::Raise(20)]);
    t.advance(&mut agent).unwrap();
    assert_eq!(
        agent.rejections(),
        &[
            (PlayerId(0), ActionError::BelowMinimum { min: 20, got: 15 }),
            (PlayerId(0), ActionError::BetFacingBet { current: 10 }),
        ]
    );
    let view = t.decision_view().unwrap();
    assert_eq!(view.seat, PlayerId(1));
    assert_eq!((view.bet_to_match, view.to_call, view.min_raise_to), (20, 10, 30));
}

#[test]
fn short_all_in_does_not_raise_the_minimum_raise() {
    let mut t = table(&[100, 25, 100]);
    deal(&mut t);
    // button raises to 40; the small blind can only call 25 all-in
    let mut agent = ScriptedAgent::new([Action::Raise(40), Action::Call]);
    t.advance(&mut agent).unwrap();
    t.advance(&mut agent).unwrap();
    let view = t.decision_view().unwrap();
    assert_eq!(view.seat, PlayerId(2));
    assert_eq!((view.bet_to_match, view.min_raise_to), (40, 70));
    assert_eq!(view.pots, vec![75]);
}

#[test]
fn all_in_player_stays_eligible_for_the_pot_it_covered() {
    let mut t = table(&[100, 25, 100]);
    deal(&mut t);
    let mut agent = ScriptedAgent::new([Action::Raise(40), Action::Call, Action::Call]);
    for _ in 0..3 {
        t.advance(&mut agent).unwrap();
    }
    assert_eq!(t.state(), HandState::Flop);
    let view = t.decision_view().unwrap();
    // seat 1 is all-in, so seat 2 opens the flop
    assert_eq!(view.seat, PlayerId(2));
    assert_eq!(view.pots, vec![30, 75]);
    assert_eq!(
        view.pot_eligibility,
        vec![(30, vec![PlayerId(0), PlayerId(2)]), (75, vec![PlayerId(0), PlayerId(1), PlayerId(2)])]
    );
    assert_eq!(view.eligible_players, vec![PlayerId(0), PlayerId(1), PlayerId(2)]);
}

#[test]
fn fold_on_the_flop_ends_the_hand_without_more_cards() {
    let mut t = table(&[100, 100]);
    let mut agent = ScriptedAgent::new([Action::Call, Action::Check, Action::Bet(20), Action::Fold]);
    let summary = t.play_hand(&mut agent).unwrap();
    assert_eq!(summary.outcome, HandOutcome::HiddenEnd);
    assert!(!summary.early_finish);
    assert_eq!(summary.board.len(), 3);
    assert!(summary.tie_groups.is_empty());
    assert_eq!(summary.won(PlayerId(1)), 40);
    let last = summary.history.entries().last().unwrap();
    assert_eq!((last.seat, last.street, last.verb, last.amount), (PlayerId(1), Street::Flop, HandHistoryVerb::Uncontested, Some(40)));
}

#[test]
fn checked_down_hand_reaches_showdown_with_a_full_board() {
    let mut t = table(&[100, 100, 100]);
    let summary = t.play_hand(&mut PassiveAgent).unwrap();
    assert_eq!(summary.outcome, HandOutcome::Showdown);
    assert_eq!(summary.board.len(), 5);
    assert!(!summary.tie_groups.is_empty());
    let shown: usize = summary.tie_groups.iter().map(|g| g.players.len()).sum();
    assert_eq!(shown, 3);
    assert_eq!(summary.awards.iter().map(|a| a.amount).sum::<u64>(), 30);
}

#[test]
fn missed_decision_facing_a_bet_folds() {
    let mut t = table(&[100, 100]);
    let mut agent = ScriptedAgent::from_decisions([None]);
    let summary = t.play_hand(&mut agent).unwrap();
    assert_eq!(summary.outcome, HandOutcome::HiddenEnd);
    assert_eq!(summary.final_stack(PlayerId(0)), Some(95));
    assert_eq!(summary.final_stack(PlayerId(1)), Some(105));
}

#[test]
fn big_blind_gets_the_option_after_limps() {
    let mut t = table(&[100, 100, 100]);
    deal(&mut t);
    let mut agent = ScriptedAgent::new([Action::Call, Action::Call]);
    t.advance(&mut agent).unwrap();
    t.advance(&mut agent).unwrap();
    assert_eq!(t.state(), HandState::Preflop);
    let view = t.decision_view().unwrap();
    assert_eq!(view.seat, PlayerId(2));
    assert!(view.can_check());
    assert!(view.can_raise());
}

/// Everyone limps, so seat 1 opens the flop of a three-handed hand.
fn limped_to_the_flop(t: &mut Table<StackedDeckSource>, agent: &mut ScriptedAgent) {
    deal(t);
    for _ in 0..3 {
        t.advance(agent).unwrap();
    }
    assert_eq!(t.state(), HandState::Flop);
    assert_eq!(t.current_actor(), Some(PlayerId(1)));
}

#[test]
fn sitting_out_facing_a_bet_still_has_to_answer() {
    let mut t = table(&[100, 100, 100]);
    let mut agent = ScriptedAgent::from_decisions([
        Some(Action::Call),
        Some(Action::Call),
        Some(Action::Check),
        Some(Action::Bet(20)),
        None,
        Some(Action::Call),
    ]);
    limped_to_the_flop(&mut t, &mut agent);
    assert!(t.set_sitting_out(PlayerId(2), true));

    t.advance(&mut agent).unwrap();
    assert_eq!(t.state(), HandState::Flop);
    assert_eq!(t.current_actor(), Some(PlayerId(2)));
    assert_eq!(t.decision_view().unwrap().to_call, 20);

    // the missed decision folds seat 2 instead of skipping it
    t.advance(&mut agent).unwrap();
    assert_eq!(t.state(), HandState::Flop);
    let away = t.player(PlayerId(2)).unwrap();
    assert!(away.is_folded());
    assert!(!t.hand().ledger().main_pot().is_eligible(PlayerId(2)));

    t.advance(&mut agent).unwrap();
    assert_eq!(t.state(), HandState::Turn);

    let summary = t.play_hand(&mut PassiveAgent).unwrap();
    assert_eq!(summary.won(PlayerId(2)), 0);
    assert_eq!(summary.final_stack(PlayerId(2)), Some(90));
    assert_eq!(summary.awards.iter().map(|a| a.amount).sum::<u64>(), 70);
    assert!(summary
        .history
        .entries()
        .iter()
        .any(|e| (e.seat, e.street, e.verb) == (PlayerId(2), Street::Flop, HandHistoryVerb::Fold)));
    assert_eq!(t.total_chips(), 300);

    // the sit-out applies from the next hand
    t.advance(&mut PassiveAgent).unwrap();
    assert!(!t.player(PlayerId(2)).unwrap().is_live());
}

#[test]
fn sitting_out_player_who_calls_plays_the_hand_out() {
    let mut t = table(&[100, 100, 100]);
    let mut agent = ScriptedAgent::new([Action::Call, Action::Call, Action::Check, Action::Bet(20), Action::Call]);
    limped_to_the_flop(&mut t, &mut agent);
    t.set_sitting_out(PlayerId(2), true);
    t.advance(&mut agent).unwrap();
    t.advance(&mut agent).unwrap();
    assert_eq!(t.state(), HandState::Flop);
    assert_eq!(t.current_actor(), Some(PlayerId(0)));
    assert_eq!(t.player(PlayerId(2)).unwrap().total_bet(), 30);
}
