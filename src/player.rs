use crate::betting::ActionError;
use crate::hand::HoleCards;
use std::fmt;

/// Stable integer handle for a seated player; equal to the seat index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlayerId(pub usize);

impl PlayerId {
    pub const fn seat(self) -> usize {
        self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seat {}", self.0)
    }
}

/// Chips moved from a stack toward the pot by one operation.
///
/// Wagering more than the stack is never an error: the wager shrinks to the
/// remaining stack and `all_in` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Wager {
    pub amount: u64,
    pub all_in: bool,
}

impl Wager {
    pub const NONE: Wager = Wager { amount: 0, all_in: false };
}

/// Per-hand betting state of one seated player.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Player {
    pub(crate) id: PlayerId,
    pub(crate) name: String,
    pub(crate) stack: u64,
    pub(crate) round_bet: u64,
    pub(crate) total_bet: u64,
    pub(crate) folded: bool,
    pub(crate) all_in: bool,
    pub(crate) has_acted: bool,
    pub(crate) eligible_for_pot: bool,
    pub(crate) sitting_out: bool,
    pub(crate) dealt_in: bool,
    pub(crate) hole: Option<HoleCards>,
    hand_start_stack: u64,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>, stack: u64) -> Self {
        Self {
            id,
            name: name.into(),
            stack,
            round_bet: 0,
            total_bet: 0,
            folded: false,
            all_in: false,
            has_acted: false,
            eligible_for_pot: false,
            sitting_out: false,
            dealt_in: false,
            hole: None,
            hand_start_stack: stack,
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Chips not yet wagered.
    pub fn stack(&self) -> u64 {
        self.stack
    }

    /// Chips committed on the current street.
    pub fn round_bet(&self) -> u64 {
        self.round_bet
    }

    /// Chips committed over the whole hand, antes included.
    pub fn total_bet(&self) -> u64 {
        self.total_bet
    }

    pub fn is_folded(&self) -> bool {
        self.folded
    }

    pub fn is_all_in(&self) -> bool {
        self.all_in
    }

    pub fn has_acted(&self) -> bool {
        self.has_acted
    }

    pub fn is_eligible_for_pot(&self) -> bool {
        self.eligible_for_pot
    }

    pub fn is_sitting_out(&self) -> bool {
        self.sitting_out
    }

    pub fn hole(&self) -> Option<HoleCards> {
        self.hole
    }

    /// Stack at the start of the current hand.
    pub fn hand_start_stack(&self) -> u64 {
        self.hand_start_stack
    }

    pub fn set_sitting_out(&mut self, sitting_out: bool) {
        self.sitting_out = sitting_out;
    }

    /// Dealt into the current hand and not folded.
    pub fn is_live(&self) -> bool {
        self.dealt_in && !self.folded
    }

    /// Live and still holding chips to wager.
    pub fn can_act(&self) -> bool {
        self.is_live() && !self.all_in
    }

    pub fn to_call(&self, bet_to_match: u64) -> u64 {
        bet_to_match.saturating_sub(self.round_bet)
    }

    /// `stack + total_bet` must equal the stack the hand started with.
    pub fn chips_conserved(&self) -> bool {
        self.stack + self.total_bet == self.hand_start_stack
    }

    /// Clear per-hand state. Returns whether the player is dealt in.
    pub(crate) fn start_hand(&mut self) -> bool {
        self.round_bet = 0;
        self.total_bet = 0;
        self.folded = false;
        self.all_in = false;
        self.has_acted = false;
        self.hole = None;
        self.hand_start_stack = self.stack;
        self.dealt_in = self.stack > 0 && !self.sitting_out;
        self.eligible_for_pot = self.dealt_in;
        self.dealt_in
    }

    /// Drop all per-hand state once the hand is settled.
    pub(crate) fn end_hand(&mut self) {
        self.round_bet = 0;
        self.total_bet = 0;
        self.folded = false;
        self.all_in = false;
        self.has_acted = false;
        self.eligible_for_pot = false;
        self.dealt_in = false;
        self.hole = None;
        self.hand_start_stack = self.stack;
    }

    /// Clear per-street state.
    pub(crate) fn start_round(&mut self) {
        self.round_bet = 0;
        self.has_acted = false;
    }

    /// Leave the hand. Pot eligibility is withdrawn by the ledger, not here.
    pub fn fold(&mut self) {
        self.hole = None;
        self.folded = true;
        self.eligible_for_pot = false;
        self.has_acted = true;
    }

    pub fn check(&mut self, bet_to_match: u64) -> Result<Wager, ActionError> {
        if self.round_bet != bet_to_match {
            return Err(ActionError::CheckFacingBet { to_call: self.to_call(bet_to_match) });
        }
        self.has_acted = true;
        Ok(Wager::NONE)
    }

    /// Open the betting by `delta` chips; a delta covering the stack goes all-in.
    pub fn bet(&mut self, delta: u64) -> Wager {
        self.has_acted = true;
        if delta >= self.stack {
            return self.all_in();
        }
        self.wager(delta)
    }

    /// Raise by putting in `delta` more chips this street.
    pub fn raise(&mut self, delta: u64) -> Wager {
        self.bet(delta)
    }

    /// Match `bet_to_match`, or call all-in for less when short.
    pub fn call(&mut self, bet_to_match: u64) -> Wager {
        self.has_acted = true;
        let owed = self.to_call(bet_to_match);
        self.wager(owed)
    }

    /// Push the entire stack. The returned amount is this player's all-in increment.
    pub fn all_in(&mut self) -> Wager {
        self.has_acted = true;
        self.wager(self.stack)
    }

    /// Forced bet that counts toward the street (blinds).
    pub(crate) fn post_blind(&mut self, amount: u64) -> Wager {
        self.wager(amount)
    }

    /// Forced bet that counts toward the hand but not the street.
    pub(crate) fn post_ante(&mut self, amount: u64) -> Wager {
        let pay = amount.min(self.stack);
        self.stack -= pay;
        self.total_bet += pay;
        if self.stack == 0 && self.dealt_in {
            self.all_in = true;
        }
        Wager { amount: pay, all_in: self.all_in }
    }

    pub(crate) fn award(&mut self, amount: u64) {
        self.stack += amount;
    }

    fn wager(&mut self, amount: u64) -> Wager {
        let pay = amount.min(self.stack);
        self.stack -= pay;
        self.round_bet += pay;
        self.total_bet += pay;
        if self.stack == 0 {
            self.all_in = true;
        }
        Wager { amount: pay, all_in: self.all_in }
    }
}
