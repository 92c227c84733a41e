use crate::player::{Player, PlayerId, Wager};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
pub enum Street {
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
}

impl Street {
    /// Community cards dealt when this street opens.
    pub const fn cards_dealt(self) -> usize {
        match self {
            Street::Flop => 3,
            Street::Turn | Street::River => 1,
            Street::Preflop | Street::Showdown => 0,
        }
    }

    pub const fn next(self) -> Option<Street> {
        match self {
            Street::Preflop => Some(Street::Flop),
            Street::Flop => Some(Street::Turn),
            Street::Turn => Some(Street::River),
            Street::River => Some(Street::Showdown),
            Street::Showdown => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Street::Preflop => "Preflop",
            Street::Flop => "Flop",
            Street::Turn => "Turn",
            Street::River => "River",
            Street::Showdown => "Showdown",
        }
    }
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A decision by the acting player.
///
/// `Bet` and `Raise` carry the total the player's street bet is brought to,
/// not the increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Fold,
    Check,
    Call,
    Bet(u64),
    Raise(u64),
    AllIn,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Fold => f.write_str("fold"),
            Action::Check => f.write_str("check"),
            Action::Call => f.write_str("call"),
            Action::Bet(to) => write!(f, "bet {to}"),
            Action::Raise(to) => write!(f, "raise to {to}"),
            Action::AllIn => f.write_str("all-in"),
        }
    }
}

/// Illegal decisions. Never fatal: the decision source is asked again.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ActionError {
    #[error("not {got}'s turn (expected {expected:?})")]
    NotYourTurn { expected: Option<PlayerId>, got: PlayerId },
    #[error("cannot check facing a bet: {to_call} to call")]
    CheckFacingBet { to_call: u64 },
    #[error("betting is not allowed when facing a bet of {current}")]
    BetFacingBet { current: u64 },
    #[error("raising is not allowed without a bet")]
    RaiseWithoutBet,
    #[error("amount too small: min {min}, got {got}")]
    BelowMinimum { min: u64, got: u64 },
    #[error("target must exceed current bet: current {current}, target {target}")]
    TargetNotAboveCurrent { current: u64, target: u64 },
    #[error("{0} cannot act")]
    PlayerCannotAct(PlayerId),
    #[error("hand is not in a betting round")]
    HandNotInBetting,
}

/// Outcome of an accepted action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Applied {
    pub seat: PlayerId,
    /// What was actually done; a short call or an oversized bet is reported as `AllIn`.
    pub action: Action,
    pub wager: Wager,
    /// Whether the action lifted `bet_to_match`.
    pub raised: bool,
}

/// Turn order and bet-to-match convergence for one street.
#[derive(Debug, Clone)]
pub struct BettingRound {
    street: Street,
    bet_to_match: u64,
    last_raise_size: u64,
    big_blind: u64,
    current: Option<PlayerId>,
}

impl BettingRound {
    /// Preflop: blinds are already posted. Action starts left of the big blind and
    /// the price is the nominal big blind even if it was posted short.
    pub fn preflop(seats: &[Option<Player>], big_blind: u64, bb_seat: usize) -> Self {
        let mut round = Self {
            street: Street::Preflop,
            bet_to_match: big_blind,
            last_raise_size: big_blind,
            big_blind,
            current: None,
        };
        round.current = round.next_to_act(seats, bb_seat);
        round
    }

    /// Flop, turn or river: action starts left of the button. Callers reset
    /// street bets before opening the round.
    pub fn postflop(street: Street, seats: &[Option<Player>], big_blind: u64, button: usize) -> Self {
        let bet_to_match = live(seats).map(|p| p.round_bet).max().unwrap_or(0);
        let mut round = Self { street, bet_to_match, last_raise_size: big_blind, big_blind, current: None };
        round.current = round.next_to_act(seats, button);
        round
    }

    pub fn street(&self) -> Street {
        self.street
    }

    pub fn bet_to_match(&self) -> u64 {
        self.bet_to_match
    }

    pub fn last_raise_size(&self) -> u64 {
        self.last_raise_size
    }

    /// Seat whose decision is pending; `None` once the round is complete.
    pub fn current(&self) -> Option<PlayerId> {
        self.current
    }

    /// Smallest legal `Bet`/`Raise` target (an all-in for less is always allowed).
    pub fn min_raise_to(&self) -> u64 {
        if self.bet_to_match == 0 {
            self.big_blind
        } else {
            self.bet_to_match + self.last_raise_size
        }
    }

    /// The round is over when no live player who can still wager owes a decision.
    pub fn is_complete(&self, seats: &[Option<Player>]) -> bool {
        if live(seats).count() <= 1 {
            return true;
        }
        let actors: Vec<&Player> = live(seats).filter(|p| !p.all_in).collect();
        match actors.as_slice() {
            [] => true,
            // a lone actor still owes a decision only when facing an unmatched bet
            [p] => p.round_bet >= self.bet_to_match,
            _ => actors.iter().all(|p| p.round_bet == self.bet_to_match && p.has_acted),
        }
    }

    /// Validate and apply `action` for `seat`, then move the turn pointer.
    pub fn apply(
        &mut self,
        seats: &mut [Option<Player>],
        seat: PlayerId,
        action: Action,
    ) -> Result<Applied, ActionError> {
        if self.current != Some(seat) {
            return Err(ActionError::NotYourTurn { expected: self.current, got: seat });
        }
        let bet_to_match = self.bet_to_match;
        let min_raise_to = self.min_raise_to();
        let big_blind = self.big_blind;
        let player = seats
            .get_mut(seat.0)
            .and_then(Option::as_mut)
            .filter(|p| p.can_act())
            .ok_or(ActionError::PlayerCannotAct(seat))?;

        let max_total = player.round_bet + player.stack;
        let (action, wager) = match action {
            Action::Fold => {
                player.fold();
                (Action::Fold, Wager::NONE)
            }
            Action::Check => (Action::Check, player.check(bet_to_match)?),
            Action::Call if player.to_call(bet_to_match) == 0 => {
                (Action::Check, player.check(bet_to_match)?)
            }
            Action::Call => {
                let w = player.call(bet_to_match);
                (if w.all_in { Action::AllIn } else { Action::Call }, w)
            }
            Action::Bet(to) => {
                if bet_to_match > 0 {
                    return Err(ActionError::BetFacingBet { current: bet_to_match });
                }
                if to >= max_total {
                    (Action::AllIn, player.all_in())
                } else if to < big_blind || to <= player.round_bet {
                    return Err(ActionError::BelowMinimum { min: big_blind, got: to });
                } else {
                    (Action::Bet(to), player.bet(to - player.round_bet))
                }
            }
            Action::Raise(to) => {
                if bet_to_match == 0 {
                    return Err(ActionError::RaiseWithoutBet);
                }
                if to <= bet_to_match {
                    return Err(ActionError::TargetNotAboveCurrent { current: bet_to_match, target: to });
                }
                if to >= max_total {
                    (Action::AllIn, player.all_in())
                } else if to < min_raise_to {
                    return Err(ActionError::BelowMinimum { min: min_raise_to, got: to });
                } else {
                    (Action::Raise(to), player.raise(to - player.round_bet))
                }
            }
            Action::AllIn => (Action::AllIn, player.all_in()),
        };

        let new_bet = player.round_bet;
        let raised = new_bet > self.bet_to_match;
        if raised {
            let increment = new_bet - self.bet_to_match;
            if increment >= self.last_raise_size {
                self.last_raise_size = increment;
            }
            self.bet_to_match = new_bet;
            // everyone else gets to respond to the new price
            for p in seats.iter_mut().flatten() {
                if p.id != seat && p.can_act() {
                    p.has_acted = false;
                }
            }
        }

        log::debug!("{} {}: {} ({} chips)", self.street, seat, action, wager.amount);

        self.current = if self.is_complete(seats) { None } else { self.next_to_act(seats, seat.0) };
        Ok(Applied { seat, action, wager, raised })
    }

    /// Next seat after `after` that can still wager and owes a decision.
    fn next_to_act(&self, seats: &[Option<Player>], after: usize) -> Option<PlayerId> {
        if self.is_complete(seats) {
            return None;
        }
        let n = seats.len();
        (1..=n)
            .map(|step| (after + step) % n)
            .filter_map(|i| seats[i].as_ref())
            .find(|p| p.can_act() && (!p.has_acted || p.round_bet < self.bet_to_match))
            .map(|p| p.id)
    }
}

/// Dealt-in, non-folded players in seat order.
pub(crate) fn live(seats: &[Option<Player>]) -> impl Iterator<Item = &Player> {
    seats.iter().flatten().filter(|p| p.is_live())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(stacks: &[u64]) -> Vec<Option<Player>> {
        stacks
            .iter()
            .enumerate()
            .map(|(i, &s)| {
                let mut p = Player::new(PlayerId(i), format!("P{i}"), s);
                p.start_hand();
                Some(p)
            })
            .collect()
    }

    fn post(seats: &mut [Option<Player>], seat: usize, amount: u64) {
        if let Some(p) = seats[seat].as_mut() {
            p.post_blind(amount);
        }
    }

    /// Button 0, SB 1, BB 2.
    fn three_handed(stacks: &[u64]) -> (Vec<Option<Player>>, BettingRound) {
        let mut seats = table(stacks);
        post(&mut seats, 1, 5);
        post(&mut seats, 2, 10);
        let round = BettingRound::preflop(&seats, 10, 2);
        (seats, round)
    }

    #[test]
    fn preflop_starts_left_of_big_blind() {
        let (_, round) = three_handed(&[100, 100, 100]);
        assert_eq!(round.current(), Some(PlayerId(0)));
        assert_eq!(round.bet_to_match(), 10);
        assert_eq!(round.min_raise_to(), 20);
    }

    #[test]
    fn big_blind_gets_the_option() {
        let (mut seats, mut round) = three_handed(&[100, 100, 100]);
        round.apply(&mut seats, PlayerId(0), Action::Call).unwrap();
        round.apply(&mut seats, PlayerId(1), Action::Call).unwrap();
        assert_eq!(round.current(), Some(PlayerId(2)));
        round.apply(&mut seats, PlayerId(2), Action::Check).unwrap();
        assert_eq!(round.current(), None);
        assert!(round.is_complete(&seats));
    }

    #[test]
    fn raise_reopens_action_for_everyone_else() {
        let (mut seats, mut round) = three_handed(&[100, 100, 100]);
        round.apply(&mut seats, PlayerId(0), Action::Call).unwrap();
        round.apply(&mut seats, PlayerId(1), Action::Call).unwrap();
        let applied = round.apply(&mut seats, PlayerId(2), Action::Raise(30)).unwrap();
        assert!(applied.raised);
        assert_eq!(round.last_raise_size(), 20);
        assert!(!seats[0].as_ref().unwrap().has_acted());
        assert!(!seats[1].as_ref().unwrap().has_acted());
        assert_eq!(round.current(), Some(PlayerId(0)));
    }

    #[test]
    fn illegal_actions_are_rejected_without_side_effects() {
        let (mut seats, mut round) = three_handed(&[100, 100, 100]);
        assert_eq!(
            round.apply(&mut seats, PlayerId(1), Action::Call),
            Err(ActionError::NotYourTurn { expected: Some(PlayerId(0)), got: PlayerId(1) })
        );
        assert_eq!(
            round.apply(&mut seats, PlayerId(0), Action::Check),
            Err(ActionError::CheckFacingBet { to_call: 10 })
        );
        assert_eq!(
            round.apply(&mut seats, PlayerId(0), Action::Bet(20)),
            Err(ActionError::BetFacingBet { current: 10 })
        );
        assert_eq!(
            round.apply(&mut seats, PlayerId(0), Action::Raise(15)),
            Err(ActionError::BelowMinimum { min: 20, got: 15 })
        );
        assert_eq!(
            round.apply(&mut seats, PlayerId(0), Action::Raise(10)),
            Err(ActionError::TargetNotAboveCurrent { current: 10, target: 10 })
        );
        assert_eq!(seats[0].as_ref().unwrap().stack(), 100);
        assert_eq!(round.current(), Some(PlayerId(0)));
    }

    #[test]
    fn oversized_raise_is_all_in() {
        let (mut seats, mut round) = three_handed(&[60, 100, 100]);
        let applied = round.apply(&mut seats, PlayerId(0), Action::Raise(500)).unwrap();
        assert_eq!(applied.action, Action::AllIn);
        assert_eq!(applied.wager, Wager { amount: 60, all_in: true });
        assert_eq!(round.bet_to_match(), 60);
    }

    #[test]
    fn short_all_in_does_not_grow_the_min_raise() {
        let (mut seats, mut round) = three_handed(&[15, 100, 100]);
        round.apply(&mut seats, PlayerId(0), Action::AllIn).unwrap();
        assert_eq!(round.bet_to_match(), 15);
        assert_eq!(round.last_raise_size(), 10);
        assert_eq!(round.min_raise_to(), 25);
    }

    #[test]
    fn postflop_bets_must_reach_the_big_blind() {
        let mut seats = table(&[100, 100, 100]);
        let mut round = BettingRound::postflop(Street::Flop, &seats, 10, 0);
        assert_eq!(round.current(), Some(PlayerId(1)));
        assert_eq!(
            round.apply(&mut seats, PlayerId(1), Action::Raise(20)),
            Err(ActionError::RaiseWithoutBet)
        );
        assert_eq!(
            round.apply(&mut seats, PlayerId(1), Action::Bet(5)),
            Err(ActionError::BelowMinimum { min: 10, got: 5 })
        );
        round.apply(&mut seats, PlayerId(1), Action::Bet(10)).unwrap();
        assert_eq!(round.current(), Some(PlayerId(2)));
    }

    #[test]
    fn sitting_out_mid_street_still_owes_a_decision() {
        let mut seats = table(&[100, 100, 100]);
        let mut round = BettingRound::postflop(Street::Flop, &seats, 10, 0);
        round.apply(&mut seats, PlayerId(1), Action::Bet(20)).unwrap();
        if let Some(p) = seats[2].as_mut() {
            p.set_sitting_out(true);
        }
        assert_eq!(round.current(), Some(PlayerId(2)));
        assert!(!round.is_complete(&seats));
        round.apply(&mut seats, PlayerId(2), Action::Call).unwrap();
        assert_eq!(round.current(), Some(PlayerId(0)));
    }

    #[test]
    fn call_with_nothing_owed_is_a_check() {
        let mut seats = table(&[100, 100]);
        let mut round = BettingRound::postflop(Street::Turn, &seats, 10, 0);
        let applied = round.apply(&mut seats, PlayerId(1), Action::Call).unwrap();
        assert_eq!(applied.action, Action::Check);
    }

    #[test]
    fn matched_round_with_a_folded_player_completes() {
        // round bets {20, 20, 0 folded}, everyone has acted
        let mut seats = table(&[100, 100, 100]);
        for (i, p) in seats.iter_mut().enumerate() {
            let p = p.as_mut().unwrap();
            if i < 2 {
                p.post_blind(20);
            } else {
                p.fold();
            }
            p.has_acted = true;
        }
        let round = BettingRound {
            street: Street::Flop,
            bet_to_match: 20,
            last_raise_size: 20,
            big_blind: 10,
            current: None,
        };
        assert!(round.is_complete(&seats));
        assert_eq!(round.bet_to_match(), 20);
    }

    #[test]
    fn lone_actor_must_answer_an_all_in() {
        let (mut seats, mut round) = three_handed(&[30, 100, 100]);
        round.apply(&mut seats, PlayerId(0), Action::AllIn).unwrap();
        round.apply(&mut seats, PlayerId(1), Action::Fold).unwrap();
        assert_eq!(round.current(), Some(PlayerId(2)));
        round.apply(&mut seats, PlayerId(2), Action::Call).unwrap();
        assert_eq!(round.current(), None);
        assert_eq!(seats[2].as_ref().unwrap().round_bet(), 30);
    }

    #[test]
    fn fold_to_one_player_ends_the_round() {
        let (mut seats, mut round) = three_handed(&[100, 100, 100]);
        round.apply(&mut seats, PlayerId(0), Action::Fold).unwrap();
        round.apply(&mut seats, PlayerId(1), Action::Fold).unwrap();
        assert_eq!(round.current(), None);
        assert_eq!(live(&seats).count(), 1);
    }
}
