//! Agents: pluggable decision sources for seats.
//!
//! [`AgentTable`] assigns one source per seat so a table can mix scripted,
//! random, and external players; seats without an agent play passively.

use crate::engine::{Action, ActionError, DecisionSource, DecisionView};
use crate::player::PlayerId;
use core::fmt;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use std::collections::VecDeque;

/// Checks when free, otherwise calls. Never folds, never raises.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassiveAgent;

impl DecisionSource for PassiveAgent {
    fn decide(&mut self, view: &DecisionView) -> Option<Action> {
        Some(if view.can_check() { Action::Check } else { Action::Call })
    }
}

/// Replays a fixed list of decisions in the order they are requested,
/// then falls back to passive play. `None` entries simulate a timeout.
#[derive(Debug, Clone, Default)]
pub struct ScriptedAgent {
    script: VecDeque<Option<Action>>,
    rejections: Vec<(PlayerId, ActionError)>,
}

impl ScriptedAgent {
    pub fn new<I: IntoIterator<Item = Action>>(actions: I) -> Self {
        Self::from_decisions(actions.into_iter().map(Some))
    }

    pub fn from_decisions<I: IntoIterator<Item = Option<Action>>>(decisions: I) -> Self {
        Self { script: decisions.into_iter().collect(), rejections: Vec::new() }
    }

    pub fn push(&mut self, action: Action) {
        self.script.push_back(Some(action));
    }

    /// Queue a missed decision.
    pub fn push_timeout(&mut self) {
        self.script.push_back(None);
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    /// Every rejection reported by the engine, oldest first.
    pub fn rejections(&self) -> &[(PlayerId, ActionError)] {
        &self.rejections
    }
}

impl DecisionSource for ScriptedAgent {
    fn decide(&mut self, view: &DecisionView) -> Option<Action> {
        match self.script.pop_front() {
            Some(decision) => decision,
            None => PassiveAgent.decide(view),
        }
    }

    fn rejected(&mut self, seat: PlayerId, err: &ActionError) {
        self.rejections.push((seat, err.clone()));
    }
}

/// Chooses uniformly among the legal action kinds with a seeded ChaCha stream.
/// Bet and raise sizes are drawn between the minimum and the stack.
#[derive(Debug, Clone)]
pub struct RandomAgent {
    rng: ChaCha20Rng,
}

impl RandomAgent {
    pub fn new(seed: u64) -> Self {
        Self { rng: ChaCha20Rng::seed_from_u64(seed) }
    }

    fn sized(&mut self, min: u64, max: u64) -> u64 {
        if min >= max {
            max
        } else {
            self.rng.random_range(min..=max)
        }
    }
}

impl DecisionSource for RandomAgent {
    fn decide(&mut self, view: &DecisionView) -> Option<Action> {
        let mut options = vec![if view.can_check() { Action::Check } else { Action::Call }];
        if !view.can_check() {
            options.push(Action::Fold);
        }
        if view.can_bet() {
            options.push(Action::Bet(0));
        }
        if view.can_raise() {
            options.push(Action::Raise(0));
        }
        if view.stack > 0 && self.rng.random_bool(0.05) {
            return Some(Action::AllIn);
        }
        let pick = options[self.rng.random_range(0..options.len())];
        Some(match pick {
            Action::Bet(_) | Action::Raise(_) => {
                let to = self.sized(view.min_raise_to, view.max_raise_to);
                if view.can_bet() {
                    Action::Bet(to)
                } else {
                    Action::Raise(to)
                }
            }
            other => other,
        })
    }
}

/// One optional decision source per seat; empty seats play [`PassiveAgent`].
pub struct AgentTable {
    seats: Vec<Option<Box<dyn DecisionSource>>>,
}

impl fmt::Debug for AgentTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags: String = self.seats.iter().map(|a| if a.is_some() { 'A' } else { '-' }).collect();
        write!(f, "AgentTable({flags})")
    }
}

impl AgentTable {
    /// Create a table with `n` seats, all without agents.
    pub fn for_seats(n: usize) -> Self {
        let mut seats = Vec::with_capacity(n);
        seats.resize_with(n, || None);
        Self { seats }
    }

    /// Assign an agent to a seat (or remove when `None`).
    pub fn set_agent(&mut self, seat: PlayerId, agent: Option<Box<dyn DecisionSource>>) {
        if seat.0 >= self.seats.len() {
            self.seats.resize_with(seat.0 + 1, || None);
        }
        self.seats[seat.0] = agent;
    }

    pub fn has_agent(&self, seat: PlayerId) -> bool {
        self.seats.get(seat.0).map(|a| a.is_some()).unwrap_or(false)
    }

    /// Remove all agents.
    pub fn clear(&mut self) {
        for a in &mut self.seats {
            *a = None;
        }
    }
}

impl DecisionSource for AgentTable {
    fn decide(&mut self, view: &DecisionView) -> Option<Action> {
        match self.seats.get_mut(view.seat.0) {
            Some(Some(agent)) => agent.decide(view),
            _ => PassiveAgent.decide(view),
        }
    }

    fn rejected(&mut self, seat: PlayerId, err: &ActionError) {
        if let Some(Some(agent)) = self.seats.get_mut(seat.0) {
            agent.rejected(seat, err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tests::view;

    #[test]
    fn passive_checks_or_calls() {
        assert_eq!(PassiveAgent.decide(&view(0, 0, 100)), Some(Action::Check));
        assert_eq!(PassiveAgent.decide(&view(20, 0, 100)), Some(Action::Call));
    }

    #[test]
    fn scripted_replays_then_goes_passive() {
        let mut agent = ScriptedAgent::from_decisions([Some(Action::Bet(10)), None]);
        let v = view(0, 0, 100);
        assert_eq!(agent.decide(&v), Some(Action::Bet(10)));
        assert_eq!(agent.decide(&v), None);
        assert_eq!(agent.decide(&v), Some(Action::Check));
        agent.rejected(PlayerId(0), &ActionError::RaiseWithoutBet);
        assert_eq!(agent.rejections().len(), 1);
    }

    #[test]
    fn random_agent_only_picks_sensible_kinds() {
        let mut agent = RandomAgent::new(11);
        let facing = view(20, 0, 100);
        for _ in 0..200 {
            match agent.decide(&facing) {
                Some(Action::Check) | Some(Action::Bet(_)) => panic!("illegal kind when facing a bet"),
                Some(Action::Raise(to)) => assert!((40..=100).contains(&to)),
                Some(_) => {}
                None => panic!("random agent never times out"),
            }
        }
    }

    #[test]
    fn random_agent_is_reproducible() {
        let v = view(0, 0, 100);
        let mut a = RandomAgent::new(5);
        let mut b = RandomAgent::new(5);
        for _ in 0..50 {
            assert_eq!(a.decide(&v), b.decide(&v));
        }
    }

    #[test]
    fn table_dispatches_by_seat() {
        let mut table = AgentTable::for_seats(2);
        table.set_agent(PlayerId(0), Some(Box::new(ScriptedAgent::new([Action::Fold]))));
        assert!(table.has_agent(PlayerId(0)));
        assert!(!table.has_agent(PlayerId(1)));
        let mut facing = view(20, 0, 100);
        assert_eq!(table.decide(&facing), Some(Action::Fold));
        facing.seat = PlayerId(1);
        assert_eq!(table.decide(&facing), Some(Action::Call));
        assert_eq!(format!("{table:?}"), "AgentTable(A-)");
    }
}
