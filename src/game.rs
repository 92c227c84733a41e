use crate::betting::{live, Action, ActionError, Applied, BettingRound, Street};
use crate::cards::Card;
use crate::config::{ConfigError, TableConfig};
use crate::deck::{Deck, DeckError, DeckSource, SecureDeckSource};
use crate::engine::{DecisionSource, DecisionView};
use crate::evaluator::EvalError;
use crate::hand::{Board, HandError, HoleCards};
use crate::history::{HandHistory, HandHistoryVerb, Position};
use crate::player::{Player, PlayerId};
use crate::pot::{Award, PotAccountingError, PotId, PotLedger};
use crate::showdown::{evaluate_showdown, group_seats, TieGroup};
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::fmt;

/// Failures that abort a hand. Rejected player actions never surface here;
/// they are reported to the [`DecisionSource`] and re-requested.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum EngineError {
    #[error(transparent)]
    Deck(#[from] DeckError),
    #[error("pot accounting failed: {0}")]
    PotAccounting(#[from] PotAccountingError),
    #[error("showdown evaluation failed: {0}")]
    Evaluation(#[from] EvalError),
    #[error("invalid deal: {0}")]
    Deal(#[from] HandError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("forced action was rejected: {0}")]
    ForcedAction(#[from] ActionError),
    #[error("need at least 2 players with chips, have {0}")]
    NotEnoughPlayers(usize),
    #[error("table is full ({0} seats)")]
    TableFull(usize),
    #[error("buy-in {amount} outside {min}..={max}")]
    BuyIn { amount: u64, min: u64, max: u64 },
    #[error("invalid game state: {0}")]
    InvalidState(&'static str),
}

/// Phases of one hand. `Setup` doubles as the idle state between hands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum HandState {
    Setup,
    DealHoleCards,
    Preflop,
    Flop,
    Turn,
    River,
    /// Betting is closed with several players live; the board runs out.
    EarlyFinish,
    Showdown,
    /// Everyone but one player folded.
    HiddenEnd,
    Payout,
    Reset,
    /// Fewer than two players with chips remain.
    GameOver,
}

impl HandState {
    fn for_street(street: Street) -> Self {
        match street {
            Street::Preflop => HandState::Preflop,
            Street::Flop => HandState::Flop,
            Street::Turn => HandState::Turn,
            Street::River => HandState::River,
            Street::Showdown => HandState::Showdown,
        }
    }

    /// Whether players are being asked for decisions.
    pub fn is_betting(self) -> bool {
        matches!(self, HandState::Preflop | HandState::Flop | HandState::Turn | HandState::River)
    }
}

impl fmt::Display for HandState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// How a hand was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandOutcome {
    Showdown,
    /// Won without showing cards.
    HiddenEnd,
}

/// Everything a caller needs to know about a finished hand.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct HandSummary {
    pub hand_number: u64,
    pub button: PlayerId,
    pub outcome: HandOutcome,
    /// The board ran out after betting closed early.
    pub early_finish: bool,
    pub board: Board,
    pub awards: Vec<Award>,
    /// Empty unless the hand reached showdown.
    pub tie_groups: Vec<TieGroup>,
    pub history: HandHistory,
    /// Stacks after payout, before busted players leave.
    pub final_stacks: Vec<(PlayerId, u64)>,
    pub busted: Vec<PlayerId>,
}

impl HandSummary {
    /// Chips `seat` collected across all pots.
    pub fn won(&self, seat: PlayerId) -> u64 {
        self.awards.iter().filter(|a| a.seat == seat).map(|a| a.amount).sum()
    }

    pub fn final_stack(&self, seat: PlayerId) -> Option<u64> {
        self.final_stacks.iter().find(|(id, _)| *id == seat).map(|&(_, s)| s)
    }

    pub fn winners(&self) -> Vec<PlayerId> {
        let mut seats: Vec<PlayerId> = self.awards.iter().map(|a| a.seat).collect();
        seats.sort();
        seats.dedup();
        seats
    }
}

/// Per-hand state, rebuilt at every `Setup`.
#[derive(Debug, Clone)]
pub struct HandContext {
    deck: Deck,
    board: Board,
    ledger: PotLedger,
    history: HandHistory,
    round: Option<BettingRound>,
    street: Street,
    small_blind_seat: Option<usize>,
    big_blind_seat: Option<usize>,
    outcome: Option<HandOutcome>,
    early_finish: bool,
    tie_groups: Vec<TieGroup>,
    awards: Vec<Award>,
    chips_at_start: u64,
    paid: bool,
}

impl Default for HandContext {
    fn default() -> Self {
        Self {
            deck: Deck::default(),
            board: Board::new(),
            ledger: PotLedger::default(),
            history: HandHistory::new(),
            round: None,
            street: Street::Preflop,
            small_blind_seat: None,
            big_blind_seat: None,
            outcome: None,
            early_finish: false,
            tie_groups: Vec::new(),
            awards: Vec::new(),
            chips_at_start: 0,
            paid: false,
        }
    }
}

impl HandContext {
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn ledger(&self) -> &PotLedger {
        &self.ledger
    }

    pub fn history(&self) -> &HandHistory {
        &self.history
    }

    /// The open betting round, if any.
    pub fn round(&self) -> Option<&BettingRound> {
        self.round.as_ref()
    }

    pub fn street(&self) -> Street {
        self.street
    }

    pub fn small_blind_seat(&self) -> Option<PlayerId> {
        self.small_blind_seat.map(PlayerId)
    }

    pub fn big_blind_seat(&self) -> Option<PlayerId> {
        self.big_blind_seat.map(PlayerId)
    }

    /// Cards left in the deck.
    pub fn deck_remaining(&self) -> usize {
        self.deck.len()
    }
}

/// A cash table: seats, button, and the state machine that plays hands.
///
/// ```
/// use holdem_engine::agents::PassiveAgent;
/// use holdem_engine::config::TableConfig;
/// use holdem_engine::deck::SeededDeckSource;
/// use holdem_engine::game::Table;
///
/// let mut table = Table::new(TableConfig::default(), SeededDeckSource::new(7)).unwrap();
/// table.seat_player("alice", 100).unwrap();
/// table.seat_player("bob", 100).unwrap();
/// let summary = table.play_hand(&mut PassiveAgent).unwrap();
/// assert_eq!(summary.final_stacks.iter().map(|(_, s)| s).sum::<u64>(), 200);
/// ```
#[derive(Debug, Clone)]
pub struct Table<D: DeckSource = SecureDeckSource> {
    config: TableConfig,
    deck_source: D,
    seats: Vec<Option<Player>>,
    button: Option<usize>,
    hand_number: u64,
    state: HandState,
    hand: HandContext,
    last_summary: Option<HandSummary>,
}

impl<D: DeckSource> Table<D> {
    pub fn new(config: TableConfig, deck_source: D) -> Result<Self, EngineError> {
        config.validate()?;
        let mut seats = Vec::with_capacity(config.max_seats);
        seats.resize_with(config.max_seats, || None);
        Ok(Self {
            config,
            deck_source,
            seats,
            button: None,
            hand_number: 0,
            state: HandState::Setup,
            hand: HandContext::default(),
            last_summary: None,
        })
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Returns all seats, empty ones included
    pub fn seats(&self) -> &[Option<Player>] {
        &self.seats
    }

    /// Returns the seated players in seat order
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.seats.iter().flatten()
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.seats.get(id.0).and_then(Option::as_ref)
    }

    pub fn button(&self) -> Option<PlayerId> {
        self.button.map(PlayerId)
    }

    pub fn state(&self) -> HandState {
        self.state
    }

    /// Number of hands started so far.
    pub fn hand_number(&self) -> u64 {
        self.hand_number
    }

    /// State of the hand in progress, or of the last one once it is reset.
    pub fn hand(&self) -> &HandContext {
        &self.hand
    }

    pub fn last_summary(&self) -> Option<&HandSummary> {
        self.last_summary.as_ref()
    }

    pub fn last_history(&self) -> Option<&HandHistory> {
        self.last_summary.as_ref().map(|s| &s.history)
    }

    /// Sum of every seated stack plus chips in the pot.
    pub fn total_chips(&self) -> u64 {
        self.players().map(|p| p.stack).sum::<u64>() + self.hand.ledger.total()
    }

    /// Players who will be dealt into the next hand.
    pub fn ready_players(&self) -> usize {
        self.players().filter(|p| p.stack > 0 && !p.sitting_out).count()
    }

    /// Seat a new player in the first empty seat. Players seated mid-hand
    /// wait for the next one.
    pub fn seat_player(&mut self, name: impl Into<String>, buy_in: u64) -> Result<PlayerId, EngineError> {
        let (min, max) = (self.config.min_buy_in_chips(), self.config.max_buy_in_chips());
        if !(min..=max).contains(&buy_in) {
            return Err(EngineError::BuyIn { amount: buy_in, min, max });
        }
        let seat = self
            .seats
            .iter()
            .position(Option::is_none)
            .ok_or(EngineError::TableFull(self.seats.len()))?;
        let id = PlayerId(seat);
        let player = Player::new(id, name, buy_in);
        info!("{} sits down at {id} with {buy_in}", player.name);
        self.seats[seat] = Some(player);
        if self.state == HandState::GameOver && self.ready_players() >= 2 {
            self.state = HandState::Setup;
        }
        Ok(id)
    }

    /// Remove a player between hands, returning their final state.
    pub fn remove_player(&mut self, id: PlayerId) -> Option<Player> {
        if !matches!(self.state, HandState::Setup | HandState::GameOver) {
            return None;
        }
        let player = self.seats.get_mut(id.0)?.take()?;
        info!("{} leaves {id} with {}", player.name, player.stack);
        Some(player)
    }

    /// Sit a player out from the next hand on. A player already dealt in
    /// keeps answering decisions until the current hand ends. Returns
    /// whether the seat exists.
    pub fn set_sitting_out(&mut self, id: PlayerId, sitting_out: bool) -> bool {
        match self.seats.get_mut(id.0).and_then(Option::as_mut) {
            Some(p) => {
                p.set_sitting_out(sitting_out);
                true
            }
            None => false,
        }
    }

    /// Seat whose decision is pending.
    pub fn current_actor(&self) -> Option<PlayerId> {
        self.hand.round.as_ref().and_then(BettingRound::current)
    }

    /// What the pending actor sees.
    pub fn decision_view(&self) -> Option<DecisionView> {
        let round = self.hand.round.as_ref()?;
        let seat = round.current()?;
        self.view_for(round, seat)
    }

    /// Play hands until `max_hands` are done or too few players remain.
    pub fn run<S: DecisionSource + ?Sized>(
        &mut self,
        source: &mut S,
        max_hands: usize,
    ) -> Result<Vec<HandSummary>, EngineError> {
        let mut summaries = Vec::new();
        while summaries.len() < max_hands && self.state != HandState::GameOver && self.ready_players() >= 2 {
            summaries.push(self.play_hand(source)?);
        }
        Ok(summaries)
    }

    /// Play one complete hand. On error the hand is aborted and every
    /// contribution returned before the error is propagated.
    pub fn play_hand<S: DecisionSource + ?Sized>(&mut self, source: &mut S) -> Result<HandSummary, EngineError> {
        if self.state == HandState::GameOver {
            return Err(EngineError::NotEnoughPlayers(self.ready_players()));
        }
        loop {
            match self.advance(source) {
                Ok(HandState::Setup | HandState::GameOver) => break,
                Ok(_) => {}
                Err(err) => {
                    self.abort_hand(&err);
                    return Err(err);
                }
            }
        }
        self.last_summary.clone().ok_or(EngineError::InvalidState("hand finished without a summary"))
    }

    /// Run the current state's work and move to the next state. A betting
    /// state handles exactly one decision per call.
    pub fn advance<S: DecisionSource + ?Sized>(&mut self, source: &mut S) -> Result<HandState, EngineError> {
        let next = match self.state {
            HandState::Setup => self.setup()?,
            HandState::DealHoleCards => self.deal_hole_cards()?,
            HandState::Preflop | HandState::Flop | HandState::Turn | HandState::River => {
                self.betting_step(source)?
            }
            HandState::EarlyFinish => self.run_out_board()?,
            HandState::Showdown => self.showdown()?,
            HandState::HiddenEnd => {
                self.hand.outcome = Some(HandOutcome::HiddenEnd);
                HandState::Payout
            }
            HandState::Payout => self.payout()?,
            HandState::Reset => self.reset(),
            HandState::GameOver => HandState::GameOver,
        };
        if next != self.state {
            debug!("hand #{}: {} -> {}", self.hand_number, self.state, next);
        }
        self.state = next;
        Ok(next)
    }

    fn setup(&mut self) -> Result<HandState, EngineError> {
        let ready = self.ready_players();
        if ready < 2 {
            return Err(EngineError::NotEnoughPlayers(ready));
        }
        let button = match self.button {
            Some(b) if self.seats[b].as_ref().is_some_and(|p| p.stack > 0 && !p.sitting_out) => b,
            Some(b) => self
                .next_seat_from(b, |p| p.stack > 0 && !p.sitting_out)
                .ok_or(EngineError::NotEnoughPlayers(ready))?,
            None => self
                .seats
                .iter()
                .position(|s| s.as_ref().is_some_and(|p| p.stack > 0 && !p.sitting_out))
                .ok_or(EngineError::NotEnoughPlayers(ready))?,
        };
        self.button = Some(button);
        self.hand_number += 1;

        let mut dealt = Vec::new();
        for p in self.seats.iter_mut().flatten() {
            if p.start_hand() {
                dealt.push(p.id);
            }
        }
        let chips_at_start = self.players().map(|p| p.stack).sum();
        self.hand = HandContext {
            deck: self.deck_source.fresh_deck(),
            ledger: PotLedger::new(dealt.iter().copied()),
            chips_at_start,
            ..HandContext::default()
        };
        info!("hand #{}: button {}, {} players", self.hand_number, PlayerId(button), dealt.len());

        // registered from the seat left of the button round to the button itself
        let order: Vec<usize> = self
            .seat_order(button)
            .filter(|&i| self.seats[i].as_ref().is_some_and(|p| p.dealt_in))
            .collect();
        for (i, &seat) in order.iter().enumerate() {
            if let Some(p) = self.seats[seat].as_ref() {
                let position = Position::from_button_offset(i + 1, order.len());
                self.hand.history.add_seat(p.id, p.name.clone(), p.stack, position);
            }
        }

        if self.config.ante > 0 {
            for i in self.seat_order(button) {
                let Some(p) = self.seats[i].as_mut().filter(|p| p.dealt_in) else { continue };
                let w = p.post_ante(self.config.ante);
                self.hand.ledger.collect(p.id, w.amount);
                self.hand.history.record(p.id, Street::Preflop, HandHistoryVerb::Ante, Some(w.amount));
            }
        }

        // heads-up the button posts the small blind
        let sb = if dealt.len() == 2 {
            button
        } else {
            self.next_seat_from(button, |p| p.dealt_in).ok_or(EngineError::InvalidState("no small blind"))?
        };
        let bb = self.next_seat_from(sb, |p| p.dealt_in).ok_or(EngineError::InvalidState("no big blind"))?;
        self.post_blind(sb, self.config.small_blind, HandHistoryVerb::SmallBlind);
        self.post_blind(bb, self.config.big_blind, HandHistoryVerb::BigBlind);
        self.hand.small_blind_seat = Some(sb);
        self.hand.big_blind_seat = Some(bb);
        Ok(HandState::DealHoleCards)
    }

    fn post_blind(&mut self, seat: usize, amount: u64, verb: HandHistoryVerb) {
        let Some(p) = self.seats[seat].as_mut() else { return };
        let w = p.post_blind(amount);
        if w.amount > 0 {
            self.hand.ledger.collect(p.id, w.amount);
            self.hand.history.record(p.id, Street::Preflop, verb, Some(w.amount));
        }
    }

    fn deal_hole_cards(&mut self) -> Result<HandState, EngineError> {
        let button = self.button.ok_or(EngineError::InvalidState("no button"))?;
        let order: Vec<usize> = self
            .seat_order(button)
            .filter(|&i| self.seats[i].as_ref().is_some_and(|p| p.dealt_in))
            .collect();
        // one card at a time, two passes round the table
        let mut dealt: BTreeMap<usize, Vec<Card>> = BTreeMap::new();
        for _ in 0..2 {
            for &i in &order {
                let card = self.hand.deck.draw()?;
                dealt.entry(i).or_default().push(card);
            }
        }
        for (i, cards) in dealt {
            let hole = HoleCards::from_slice(&cards)?;
            if let Some(p) = self.seats[i].as_mut() {
                p.hole = Some(hole);
                self.hand.history.set_hole(p.id, hole);
            }
        }
        let bb = self.hand.big_blind_seat.ok_or(EngineError::InvalidState("no big blind"))?;
        self.hand.street = Street::Preflop;
        self.hand.round = Some(BettingRound::preflop(&self.seats, self.config.big_blind, bb));
        Ok(HandState::Preflop)
    }

    fn betting_step<S: DecisionSource + ?Sized>(&mut self, source: &mut S) -> Result<HandState, EngineError> {
        let Some(mut round) = self.hand.round.take() else { return self.close_round() };
        let Some(seat) = round.current() else { return self.close_round() };
        let applied = self.solicit(&mut round, seat, source)?;
        self.record_action(applied);
        let done = round.current().is_none();
        self.hand.round = Some(round);
        if done {
            self.close_round()
        } else {
            Ok(self.state)
        }
    }

    /// Ask `seat` for a decision until one is legal. After
    /// `max_invalid_actions` rejections, or on a missed decision, the
    /// default action is played for them.
    fn solicit<S: DecisionSource + ?Sized>(
        &mut self,
        round: &mut BettingRound,
        seat: PlayerId,
        source: &mut S,
    ) -> Result<Applied, EngineError> {
        let mut rejections = 0u32;
        loop {
            let view = self.view_for(round, seat).ok_or(EngineError::InvalidState("actor left the table"))?;
            let action = match source.decide(&view) {
                Some(action) => action,
                None => {
                    let fallback = view.default_action();
                    warn!("{seat} missed a decision; playing {fallback}");
                    fallback
                }
            };
            match round.apply(&mut self.seats, seat, action) {
                Ok(applied) => return Ok(applied),
                Err(err) => {
                    warn!("{seat} tried {action}: {err}");
                    source.rejected(seat, &err);
                    rejections += 1;
                    if rejections >= self.config.max_invalid_actions {
                        let fallback = view.default_action();
                        warn!("{seat} exhausted {rejections} attempts; forcing {fallback}");
                        return Ok(round.apply(&mut self.seats, seat, fallback)?);
                    }
                }
            }
        }
    }

    fn record_action(&mut self, applied: Applied) {
        let Applied { seat, action, wager, .. } = applied;
        self.hand.ledger.collect(seat, wager.amount);
        if action == Action::Fold {
            self.hand.ledger.on_fold(seat);
        }
        let amount = match action {
            Action::Fold | Action::Check => None,
            Action::Call => Some(wager.amount),
            Action::Bet(to) | Action::Raise(to) => Some(to),
            Action::AllIn => self.player(seat).map(|p| p.round_bet),
        };
        self.hand.history.record(seat, self.hand.street, HandHistoryVerb::for_action(action), amount);
    }

    fn all_in_players(&self) -> Vec<PlayerId> {
        live(&self.seats).filter(|p| p.all_in).map(|p| p.id).collect()
    }

    fn close_round(&mut self) -> Result<HandState, EngineError> {
        self.hand.round = None;
        let all_ins = self.all_in_players();
        self.hand.ledger.build_side_pots(&all_ins)?;
        info!("{} closed, pots {:?}", self.hand.street, self.hand.ledger.values());

        let live_count = live(&self.seats).count();
        if live_count <= 1 {
            return Ok(HandState::HiddenEnd);
        }
        for p in self.seats.iter_mut().flatten() {
            p.start_round();
        }
        let actors = live(&self.seats).filter(|p| !p.all_in).count();
        match self.hand.street.next() {
            None | Some(Street::Showdown) => Ok(HandState::Showdown),
            Some(_) if actors <= 1 => Ok(HandState::EarlyFinish),
            Some(next) => {
                self.deal_street(next)?;
                let button = self.button.ok_or(EngineError::InvalidState("no button"))?;
                self.hand.round = Some(BettingRound::postflop(next, &self.seats, self.config.big_blind, button));
                Ok(HandState::for_street(next))
            }
        }
    }

    fn deal_street(&mut self, street: Street) -> Result<(), EngineError> {
        self.hand.deck.burn()?;
        let cards = self.hand.deck.deal(street.cards_dealt())?;
        self.hand.board.extend(cards);
        self.hand.street = street;
        info!("{street}: {}", self.hand.board);
        Ok(())
    }

    fn run_out_board(&mut self) -> Result<HandState, EngineError> {
        self.hand.early_finish = true;
        while let Some(next) = self.hand.street.next().filter(|s| *s != Street::Showdown) {
            self.deal_street(next)?;
        }
        Ok(HandState::Showdown)
    }

    fn showdown(&mut self) -> Result<HandState, EngineError> {
        let contenders: Vec<(PlayerId, HoleCards)> =
            live(&self.seats).filter_map(|p| p.hole.map(|h| (p.id, h))).collect();
        let groups = evaluate_showdown(&self.hand.board, contenders)?;
        for group in &groups {
            let shown: Vec<String> = group
                .players
                .iter()
                .filter_map(|&id| self.player(id).and_then(Player::hole).map(|h| format!("{id} [{h}]")))
                .collect();
            info!("showdown: {} with {}", shown.join(", "), group.rank);
        }
        self.hand.tie_groups = groups;
        self.hand.outcome = Some(HandOutcome::Showdown);
        Ok(HandState::Payout)
    }

    fn payout(&mut self) -> Result<HandState, EngineError> {
        let street = self.hand.street;
        let awards = match self.hand.outcome {
            Some(HandOutcome::HiddenEnd) => {
                let winner = live(&self.seats)
                    .next()
                    .map(|p| p.id)
                    .ok_or(EngineError::InvalidState("no live player to pay"))?;
                let awards = self.hand.ledger.award_all(winner);
                let total = awards.iter().map(|a| a.amount).sum();
                self.hand.history.record(winner, street, HandHistoryVerb::Uncontested, Some(total));
                awards
            }
            Some(HandOutcome::Showdown) => {
                let all_ins = self.all_in_players();
                self.hand.ledger.build_side_pots(&all_ins)?;
                let button = self.button.ok_or(EngineError::InvalidState("no button"))?;
                let seat_count = self.seats.len();
                // odd chips go round from the first seat left of the button
                self.hand.ledger.distribute(&group_seats(&self.hand.tie_groups), (button + 1) % seat_count, seat_count)?
            }
            None => return Err(EngineError::InvalidState("payout before the hand was decided")),
        };

        let mut winners_per_pot: BTreeMap<PotId, usize> = BTreeMap::new();
        for a in &awards {
            *winners_per_pot.entry(a.pot).or_default() += 1;
        }
        for a in &awards {
            if let Some(p) = self.seats[a.seat.0].as_mut() {
                p.award(a.amount);
            }
            if self.hand.outcome == Some(HandOutcome::Showdown) {
                let verb = if winners_per_pot[&a.pot] > 1 { HandHistoryVerb::Split } else { HandHistoryVerb::Win };
                self.hand.history.record(a.seat, Street::Showdown, verb, Some(a.amount));
            }
            info!("{} wins {} from the {}", a.seat, a.amount, a.pot);
        }
        self.hand.paid = true;
        self.hand.awards = awards;

        let actual: u64 = self.players().map(|p| p.stack).sum();
        if actual != self.hand.chips_at_start {
            return Err(PotAccountingError { expected: self.hand.chips_at_start, actual }.into());
        }
        Ok(HandState::Reset)
    }

    fn reset(&mut self) -> HandState {
        let final_stacks: Vec<(PlayerId, u64)> = self.players().map(|p| (p.id, p.stack)).collect();
        for &(id, stack) in &final_stacks {
            self.hand.history.finalize(id, stack);
        }
        let mut busted = Vec::new();
        for slot in &mut self.seats {
            if slot.as_ref().is_some_and(|p| p.stack == 0) {
                if let Some(p) = slot.take() {
                    info!("{} busts out of {}", p.name, p.id);
                    busted.push(p.id);
                }
            }
        }
        for p in self.seats.iter_mut().flatten() {
            p.end_hand();
        }
        let button = self.button.unwrap_or(0);
        self.last_summary = Some(HandSummary {
            hand_number: self.hand_number,
            button: PlayerId(button),
            outcome: self.hand.outcome.unwrap_or(HandOutcome::HiddenEnd),
            early_finish: self.hand.early_finish,
            board: self.hand.board.clone(),
            awards: self.hand.awards.clone(),
            tie_groups: self.hand.tie_groups.clone(),
            history: self.hand.history.clone(),
            final_stacks,
            busted,
        });
        self.hand.round = None;

        if let Some(next) = self.next_seat_from(button, |p| p.stack > 0 && !p.sitting_out) {
            self.button = Some(next);
        }
        if self.players().filter(|p| p.stack > 0).count() < 2 {
            info!("game over after hand #{}", self.hand_number);
            HandState::GameOver
        } else {
            HandState::Setup
        }
    }

    /// Return every contribution and drop back to `Setup`.
    fn abort_hand(&mut self, err: &EngineError) {
        warn!("hand #{} aborted: {err}", self.hand_number);
        let refund = !self.hand.paid;
        for p in self.seats.iter_mut().flatten() {
            if refund {
                p.award(p.total_bet);
            }
            p.end_hand();
        }
        self.hand = HandContext::default();
        self.state = HandState::Setup;
    }

    fn view_for(&self, round: &BettingRound, seat: PlayerId) -> Option<DecisionView> {
        let player = self.player(seat)?;
        let bet_to_match = round.bet_to_match();
        let max_raise_to = player.round_bet + player.stack;
        Some(DecisionView {
            seat,
            street: round.street(),
            bet_to_match,
            to_call: player.to_call(bet_to_match).min(player.stack),
            min_raise_to: round.min_raise_to().min(max_raise_to),
            max_raise_to,
            round_bet: player.round_bet,
            stack: player.stack,
            big_blind: self.config.big_blind,
            hole: player.hole,
            board: self.hand.board.as_slice().to_vec(),
            pots: self.hand.ledger.values(),
            active_players: live(&self.seats).map(|p| p.id).collect(),
            eligible_players: self.hand.ledger.eligible_anywhere().into_iter().collect(),
            pot_eligibility: self.hand.ledger.pot_eligibility(),
            stacks: self.players().map(|p| (p.id, p.stack)).collect(),
        })
    }

    /// Every seat index after `start`, wrapping round to `start` itself.
    fn seat_order(&self, start: usize) -> impl Iterator<Item = usize> {
        let n = self.seats.len();
        (1..=n).map(move |step| (start + step) % n)
    }

    fn next_seat_from<F>(&self, start: usize, pred: F) -> Option<usize>
    where
        F: Fn(&Player) -> bool,
    {
        self.seat_order(start).find(|&i| self.seats[i].as_ref().is_some_and(&pred))
    }
}
