// Decision boundary between the hand state machine and whoever chooses actions
// (scripted agents, bots, a human front end). The engine builds a read-only
// view, asks for an `Action`, validates it, and re-asks on rejection.

pub use crate::betting::{Action, ActionError, Street};

use crate::cards::Card;
use crate::hand::HoleCards;
use crate::player::PlayerId;

/// Public state plus the acting player's private cards at a decision point.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct DecisionView {
    pub seat: PlayerId,
    pub street: Street,
    pub bet_to_match: u64,
    pub to_call: u64,
    /// Smallest legal `Bet`/`Raise` target.
    pub min_raise_to: u64,
    /// Street total reached by going all-in.
    pub max_raise_to: u64,
    pub round_bet: u64,
    pub stack: u64,
    pub big_blind: u64,
    pub hole: Option<HoleCards>,
    pub board: Vec<Card>,
    /// Main pot first, then side pots in creation order.
    pub pots: Vec<u64>,
    /// Live (non-folded) players.
    pub active_players: Vec<PlayerId>,
    /// Players who can still win at least one pot.
    pub eligible_players: Vec<PlayerId>,
    /// Value and eligible players of each pot, in the same order as `pots`.
    pub pot_eligibility: Vec<(u64, Vec<PlayerId>)>,
    pub stacks: Vec<(PlayerId, u64)>,
}

impl DecisionView {
    pub fn can_check(&self) -> bool {
        self.to_call == 0
    }

    /// Opening bet allowed (no bet yet this street).
    pub fn can_bet(&self) -> bool {
        self.bet_to_match == 0 && self.stack > 0
    }

    /// A raise is possible when the stack reaches past the current price.
    pub fn can_raise(&self) -> bool {
        self.bet_to_match > 0 && self.max_raise_to > self.bet_to_match
    }

    pub fn pot_total(&self) -> u64 {
        self.pots.iter().sum()
    }

    /// What the engine plays when no valid decision arrives.
    pub fn default_action(&self) -> Action {
        if self.can_check() {
            Action::Check
        } else {
            Action::Fold
        }
    }
}

/// Supplies actions for seats at decision points.
pub trait DecisionSource {
    /// `None` means the source timed out or disconnected; the engine then plays
    /// [`DecisionView::default_action`].
    fn decide(&mut self, view: &DecisionView) -> Option<Action>;

    /// Called when a returned action was illegal, before asking again.
    fn rejected(&mut self, _seat: PlayerId, _err: &ActionError) {}
}

impl<T: DecisionSource + ?Sized> DecisionSource for Box<T> {
    fn decide(&mut self, view: &DecisionView) -> Option<Action> {
        (**self).decide(view)
    }

    fn rejected(&mut self, seat: PlayerId, err: &ActionError) {
        (**self).rejected(seat, err)
    }
}

impl<T: DecisionSource + ?Sized> DecisionSource for &mut T {
    fn decide(&mut self, view: &DecisionView) -> Option<Action> {
        (**self).decide(view)
    }

    fn rejected(&mut self, seat: PlayerId, err: &ActionError) {
        (**self).rejected(seat, err)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn view(bet_to_match: u64, round_bet: u64, stack: u64) -> DecisionView {
        DecisionView {
            seat: PlayerId(0),
            street: Street::Flop,
            bet_to_match,
            to_call: bet_to_match.saturating_sub(round_bet),
            min_raise_to: if bet_to_match == 0 { 10 } else { bet_to_match * 2 },
            max_raise_to: round_bet + stack,
            round_bet,
            stack,
            big_blind: 10,
            hole: None,
            board: Vec::new(),
            pots: vec![30],
            active_players: vec![PlayerId(0), PlayerId(1)],
            eligible_players: vec![PlayerId(0), PlayerId(1)],
            pot_eligibility: vec![(30, vec![PlayerId(0), PlayerId(1)])],
            stacks: vec![(PlayerId(0), stack), (PlayerId(1), 100)],
        }
    }

    #[test]
    fn default_is_check_when_free_else_fold() {
        assert_eq!(view(0, 0, 100).default_action(), Action::Check);
        assert_eq!(view(20, 0, 100).default_action(), Action::Fold);
        assert_eq!(view(20, 20, 100).default_action(), Action::Check);
    }

    #[test]
    fn raise_needs_chips_beyond_the_price() {
        assert!(view(20, 0, 100).can_raise());
        assert!(!view(20, 0, 20).can_raise());
        assert!(view(0, 0, 5).can_bet());
        assert!(!view(20, 0, 100).can_bet());
    }
}
