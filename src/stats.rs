//! Per-player statistics derived from finished hands.
//!
//! [`StatTracker`] is a pure observer: it replays a [`HandHistory`] after the
//! hand is settled and never touches table state. Totals are kept per player
//! name, both for the whole run and for the current session. Nothing is
//! persisted.

use crate::betting::Street;
use crate::game::HandSummary;
use crate::history::{HandHistory, HandHistoryVerb, Position};
use crate::player::PlayerId;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// How often a situation came up and how often the player took the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Counter {
    pub hits: u32,
    pub chances: u32,
}

impl Counter {
    fn tally(&mut self, hit: bool) {
        self.chances += 1;
        if hit {
            self.hits += 1;
        }
    }

    fn add(&mut self, other: Counter) {
        self.hits += other.hits;
        self.chances += other.chances;
    }

    /// Share of chances taken, in percent. `None` until the first chance.
    pub fn percent(&self) -> Option<f64> {
        (self.chances > 0).then(|| 100.0 * f64::from(self.hits) / f64::from(self.chances))
    }
}

impl fmt::Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.percent() {
            Some(p) => write!(f, "{p:.1}"),
            None => f.write_str("-"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[non_exhaustive]
pub struct PlayerStats {
    pub hands: u32,
    /// Put chips in preflop without being forced to.
    pub vpip: Counter,
    pub pfr: Counter,
    /// Unopened raise from the cutoff, button or small blind.
    pub steal: Counter,
    /// Called a raise preflop with no chips in yet.
    pub cold_call: Counter,
    pub three_bet: Counter,
    /// Opened, got re-raised, then folded.
    pub fold_to_three_bet: Counter,
    pub four_bet: Counter,
    /// Preflop aggressor bet the flop when checked to.
    pub cbet: Counter,
    pub fold_to_cbet: Counter,
    /// Led the flop into the preflop aggressor.
    pub donk_bet: Counter,
    /// Bet the turn again after a flop c-bet.
    pub double_barrel: Counter,
    pub went_to_showdown: Counter,
    pub won_at_showdown: Counter,
    /// Postflop bets and raises out of all postflop bets, raises, calls and folds.
    pub aggression: Counter,
}

impl PlayerStats {
    fn add(&mut self, other: &PlayerStats) {
        self.hands += other.hands;
        for (mine, theirs) in self.counters_mut().into_iter().zip(other.counters()) {
            mine.add(theirs);
        }
    }

    fn counters(&self) -> [Counter; 14] {
        [
            self.vpip,
            self.pfr,
            self.steal,
            self.cold_call,
            self.three_bet,
            self.fold_to_three_bet,
            self.four_bet,
            self.cbet,
            self.fold_to_cbet,
            self.donk_bet,
            self.double_barrel,
            self.went_to_showdown,
            self.won_at_showdown,
            self.aggression,
        ]
    }

    fn counters_mut(&mut self) -> [&mut Counter; 14] {
        [
            &mut self.vpip,
            &mut self.pfr,
            &mut self.steal,
            &mut self.cold_call,
            &mut self.three_bet,
            &mut self.fold_to_three_bet,
            &mut self.four_bet,
            &mut self.cbet,
            &mut self.fold_to_cbet,
            &mut self.donk_bet,
            &mut self.double_barrel,
            &mut self.went_to_showdown,
            &mut self.won_at_showdown,
            &mut self.aggression,
        ]
    }
}

impl fmt::Display for PlayerStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hands {} VPIP {} PFR {} 3B {} CB {} WTSD {} W$SD {} AF {}",
            self.hands,
            self.vpip,
            self.pfr,
            self.three_bet,
            self.cbet,
            self.went_to_showdown,
            self.won_at_showdown,
            self.aggression
        )
    }
}

/// Running statistics for every player seen so far.
#[derive(Debug, Clone, Default)]
pub struct StatTracker {
    overall: BTreeMap<String, PlayerStats>,
    session: BTreeMap<String, PlayerStats>,
}

impl StatTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, summary: &HandSummary) {
        self.observe_history(&summary.history);
    }

    /// Fold one finished hand into the totals. Seats missing from the
    /// history's seat records are ignored.
    pub fn observe_history(&mut self, history: &HandHistory) {
        let hand = tally_hand(history);
        log::debug!("stats: observed a hand with {} players", hand.len());
        for (seat, stats) in hand {
            let Some(record) = history.seat(seat) else { continue };
            self.overall.entry(record.name.clone()).or_default().add(&stats);
            self.session.entry(record.name.clone()).or_default().add(&stats);
        }
    }

    pub fn player(&self, name: &str) -> Option<&PlayerStats> {
        self.overall.get(name)
    }

    pub fn session(&self, name: &str) -> Option<&PlayerStats> {
        self.session.get(name)
    }

    /// Players by name with their overall totals.
    pub fn players(&self) -> impl Iterator<Item = (&str, &PlayerStats)> {
        self.overall.iter().map(|(name, stats)| (name.as_str(), stats))
    }

    pub fn start_new_session(&mut self) {
        self.session.clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Move {
    Fold,
    Check,
    Call,
    /// Any bet or raise, all-ins above the price included.
    Raise,
}

#[derive(Debug, Clone, Copy)]
struct Decision {
    seat: PlayerId,
    street: Street,
    kind: Move,
}

/// Replay the action entries, tracking street totals so all-ins can be
/// told apart from calls.
fn decisions(history: &HandHistory) -> Vec<Decision> {
    let mut out = Vec::new();
    let mut street = Street::Preflop;
    let mut bets: BTreeMap<PlayerId, u64> = BTreeMap::new();
    let mut to_match = 0u64;
    for e in history.entries() {
        if e.street != street {
            street = e.street;
            bets.clear();
            to_match = 0;
        }
        let amount = e.amount.unwrap_or(0);
        let before = bets.get(&e.seat).copied().unwrap_or(0);
        let kind = match e.verb {
            HandHistoryVerb::SmallBlind | HandHistoryVerb::BigBlind => {
                bets.insert(e.seat, before + amount);
                to_match = to_match.max(before + amount);
                continue;
            }
            HandHistoryVerb::Fold => Move::Fold,
            HandHistoryVerb::Check => Move::Check,
            HandHistoryVerb::Call => {
                bets.insert(e.seat, before + amount);
                Move::Call
            }
            HandHistoryVerb::Bet | HandHistoryVerb::RaiseTo => {
                bets.insert(e.seat, amount);
                Move::Raise
            }
            HandHistoryVerb::AllIn => {
                bets.insert(e.seat, amount);
                if amount > to_match {
                    Move::Raise
                } else {
                    Move::Call
                }
            }
            _ => continue,
        };
        out.push(Decision { seat: e.seat, street, kind });
        to_match = to_match.max(bets.get(&e.seat).copied().unwrap_or(0));
    }
    out
}

/// Statistics of a single hand for every registered seat.
fn tally_hand(history: &HandHistory) -> BTreeMap<PlayerId, PlayerStats> {
    let mut stats: BTreeMap<PlayerId, PlayerStats> =
        history.seats().iter().map(|r| (r.seat, PlayerStats { hands: 1, ..PlayerStats::default() })).collect();
    let position = |seat: PlayerId| history.seat(seat).map(|r| r.position);
    let decisions = decisions(history);

    // preflop
    let mut raises = 0u32;
    let mut limped = false;
    let mut opener = None;
    let mut aggressor = None;
    let mut acted = BTreeSet::new();
    let mut three_bet_chance = BTreeSet::new();
    let mut four_bet_chance = BTreeSet::new();
    let mut voluntary = BTreeSet::new();
    let mut raised = BTreeSet::new();
    let mut folded_preflop = BTreeSet::new();
    for d in decisions.iter().filter(|d| d.street == Street::Preflop) {
        let first = acted.insert(d.seat);
        let pos = position(d.seat);
        if let Some(s) = stats.get_mut(&d.seat) {
            if first && raises == 0 && !limped && pos.is_some_and(Position::is_steal_position) {
                s.steal.tally(d.kind == Move::Raise);
            }
            if first && raises >= 1 && !pos.is_some_and(Position::is_blind) {
                s.cold_call.tally(d.kind == Move::Call);
            }
            if raises == 1 && three_bet_chance.insert(d.seat) {
                s.three_bet.tally(d.kind == Move::Raise);
            }
            if raises == 2 && four_bet_chance.insert(d.seat) {
                s.four_bet.tally(d.kind == Move::Raise);
                if opener == Some(d.seat) {
                    s.fold_to_three_bet.tally(d.kind == Move::Fold);
                }
            }
        }
        match d.kind {
            Move::Raise => {
                if raises == 0 {
                    opener = Some(d.seat);
                }
                raises += 1;
                aggressor = Some(d.seat);
                voluntary.insert(d.seat);
                raised.insert(d.seat);
            }
            Move::Call => {
                limped |= raises == 0;
                voluntary.insert(d.seat);
            }
            Move::Fold => {
                folded_preflop.insert(d.seat);
            }
            Move::Check => {}
        }
    }
    for (seat, s) in stats.iter_mut() {
        s.vpip.tally(voluntary.contains(seat));
        s.pfr.tally(raised.contains(seat));
    }

    // flop and turn lines against the preflop aggressor
    let aggressor = aggressor.filter(|a| decisions.iter().any(|d| d.seat == *a && d.street == Street::Flop));
    if let Some(agg) = aggressor {
        let mut cbet_made = false;
        let mut bet_made = false;
        let mut aggressor_acted = false;
        let mut cbet_live = false;
        let mut faced_cbet = BTreeSet::new();
        for d in decisions.iter().filter(|d| d.street == Street::Flop) {
            let Some(s) = stats.get_mut(&d.seat) else { continue };
            if d.seat == agg {
                if !aggressor_acted && !bet_made {
                    s.cbet.tally(d.kind == Move::Raise);
                    cbet_made = d.kind == Move::Raise;
                    cbet_live = cbet_made;
                }
                aggressor_acted = true;
            } else {
                if !aggressor_acted && !bet_made {
                    s.donk_bet.tally(d.kind == Move::Raise);
                }
                if cbet_live && faced_cbet.insert(d.seat) {
                    s.fold_to_cbet.tally(d.kind == Move::Fold);
                }
                if d.kind == Move::Raise {
                    cbet_live = false;
                }
            }
            bet_made |= d.kind == Move::Raise;
        }

        if cbet_made {
            let turn = decisions.iter().filter(|d| d.street == Street::Turn);
            let mut bet_made = false;
            for d in turn {
                if d.seat == agg {
                    if !bet_made {
                        if let Some(s) = stats.get_mut(&agg) {
                            s.double_barrel.tally(d.kind == Move::Raise);
                        }
                    }
                    break;
                }
                bet_made |= d.kind == Move::Raise;
            }
        }
    }

    // postflop aggression
    for d in decisions.iter().filter(|d| d.street != Street::Preflop && d.kind != Move::Check) {
        if let Some(s) = stats.get_mut(&d.seat) {
            s.aggression.tally(d.kind == Move::Raise);
        }
    }

    // showdown, out of the hands where the flop was seen
    let folded: BTreeSet<PlayerId> = decisions.iter().filter(|d| d.kind == Move::Fold).map(|d| d.seat).collect();
    let winners: BTreeSet<PlayerId> = history
        .entries()
        .iter()
        .filter(|e| matches!(e.verb, HandHistoryVerb::Win | HandHistoryVerb::Split))
        .map(|e| e.seat)
        .collect();
    if history.entries().iter().any(|e| e.street > Street::Preflop) {
        for (seat, s) in stats.iter_mut() {
            if folded_preflop.contains(seat) {
                continue;
            }
            let showdown = !winners.is_empty() && !folded.contains(seat);
            s.went_to_showdown.tally(showdown);
            if showdown {
                s.won_at_showdown.tally(winners.contains(seat));
            }
        }
    }
    stats
}
