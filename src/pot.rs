//! Main pot, side pots and the chips each player has put into them.
//!
//! Side pots are carved off the bottom of the main pot as all-in levels are
//! reached: each carved pot holds one contribution layer and is shared by
//! everyone who reached that layer. The main pot keeps whatever sits above the
//! highest carved level, so its eligible set only ever shrinks.

use crate::player::PlayerId;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("pot accounting mismatch: expected {expected} chips, found {actual}")]
pub struct PotAccountingError {
    pub expected: u64,
    pub actual: u64,
}

/// Which pot an award came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PotId {
    Main,
    /// Index into [`PotLedger::side_pots`], in creation order.
    Side(usize),
}

impl fmt::Display for PotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PotId::Main => f.write_str("main pot"),
            PotId::Side(i) => write!(f, "side pot {}", i + 1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pot {
    value: u64,
    eligible: BTreeSet<PlayerId>,
    /// Contribution level this pot covers up to; 0 for the main pot.
    cap: u64,
}

impl Pot {
    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn eligible(&self) -> &BTreeSet<PlayerId> {
        &self.eligible
    }

    pub fn is_eligible(&self, id: PlayerId) -> bool {
        self.eligible.contains(&id)
    }

    pub fn cap(&self) -> u64 {
        self.cap
    }
}

/// Chips paid out of one pot to one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Award {
    pub seat: PlayerId,
    pub amount: u64,
    pub pot: PotId,
}

/// Owns pot values and pot eligibility for one hand.
#[derive(Debug, Clone, Default)]
pub struct PotLedger {
    main: Pot,
    sides: Vec<Pot>,
    contributions: BTreeMap<PlayerId, u64>,
    carved_level: u64,
}

impl PotLedger {
    /// Start a hand with every dealt-in player eligible for the main pot.
    pub fn new<I: IntoIterator<Item = PlayerId>>(players: I) -> Self {
        let eligible: BTreeSet<PlayerId> = players.into_iter().collect();
        Self { main: Pot { value: 0, eligible, cap: 0 }, ..Self::default() }
    }

    pub fn main_pot(&self) -> &Pot {
        &self.main
    }

    pub fn side_pots(&self) -> &[Pot] {
        &self.sides
    }

    pub fn pot(&self, id: PotId) -> Option<&Pot> {
        match id {
            PotId::Main => Some(&self.main),
            PotId::Side(i) => self.sides.get(i),
        }
    }

    /// Pot values, main pot first.
    pub fn values(&self) -> Vec<u64> {
        std::iter::once(self.main.value).chain(self.sides.iter().map(|p| p.value)).collect()
    }

    /// Each pot's value with the players who may win it, main pot first.
    pub fn pot_eligibility(&self) -> Vec<(u64, Vec<PlayerId>)> {
        std::iter::once(&self.main)
            .chain(&self.sides)
            .map(|p| (p.value, p.eligible.iter().copied().collect()))
            .collect()
    }

    /// Players who can still win at least one pot.
    pub fn eligible_anywhere(&self) -> BTreeSet<PlayerId> {
        std::iter::once(&self.main).chain(&self.sides).flat_map(|p| p.eligible.iter().copied()).collect()
    }

    /// Sum of all open pots.
    pub fn total(&self) -> u64 {
        self.main.value + self.sides.iter().map(|p| p.value).sum::<u64>()
    }

    pub fn contribution(&self, id: PlayerId) -> u64 {
        self.contributions.get(&id).copied().unwrap_or(0)
    }

    /// Sum of every chip collected this hand.
    pub fn total_contributed(&self) -> u64 {
        self.contributions.values().sum()
    }

    /// Add a wager to the main pot.
    pub fn collect(&mut self, id: PlayerId, amount: u64) {
        if amount == 0 {
            return;
        }
        *self.contributions.entry(id).or_insert(0) += amount;
        self.main.value += amount;
    }

    /// Remove a folded player from every pot. Their chips stay in.
    pub fn on_fold(&mut self, id: PlayerId) {
        self.main.eligible.remove(&id);
        for pot in &mut self.sides {
            pot.eligible.remove(&id);
        }
    }

    /// Carve a side pot for each distinct all-in level, lowest first.
    ///
    /// A level is only carved while some still-eligible player has put in more
    /// than it; otherwise the main pot already is that layer. Safe to call
    /// again as more all-ins appear.
    pub fn build_side_pots(&mut self, all_ins: &[PlayerId]) -> Result<(), PotAccountingError> {
        let mut levels: Vec<u64> = all_ins
            .iter()
            .map(|&id| self.contribution(id))
            .filter(|&c| c > self.carved_level)
            .collect();
        levels.sort_unstable();
        levels.dedup();

        for level in levels {
            let exceeds = self.main.eligible.iter().any(|&id| self.contribution(id) > level);
            if !exceeds {
                break;
            }
            let prev = self.carved_level;
            let layer: u64 =
                self.contributions.values().map(|&c| c.min(level) - c.min(prev)).sum::<u64>();
            let layer = layer.min(self.main.value);
            let eligible: BTreeSet<PlayerId> = self
                .main
                .eligible
                .iter()
                .copied()
                .filter(|&id| self.contribution(id) >= level)
                .collect();

            log::info!(
                "side pot {} carved at level {level}: {layer} chips, {} eligible",
                self.sides.len() + 1,
                eligible.len()
            );
            self.main.value -= layer;
            self.sides.push(Pot { value: layer, eligible, cap: level });
            let contributions = &self.contributions;
            self.main.eligible.retain(|id| contributions.get(id).copied().unwrap_or(0) > level);
            self.carved_level = level;
        }
        self.check_balance()
    }

    /// Pots must hold exactly what was collected.
    pub fn check_balance(&self) -> Result<(), PotAccountingError> {
        let expected = self.total_contributed();
        let actual = self.total();
        if expected != actual {
            return Err(PotAccountingError { expected, actual });
        }
        Ok(())
    }

    /// Pay every open pot, side pots first (newest to oldest), then the main pot.
    ///
    /// `tie_groups` runs best hand to worst. Each pot goes to the first group
    /// with an eligible member; a split remainder goes one chip at a time in seat
    /// order starting at `odd_chip_start`.
    pub fn distribute(
        &mut self,
        tie_groups: &[Vec<PlayerId>],
        odd_chip_start: usize,
        seat_count: usize,
    ) -> Result<Vec<Award>, PotAccountingError> {
        let expected = self.total();
        let order = |id: &PlayerId| (id.0 + seat_count - odd_chip_start % seat_count.max(1)) % seat_count.max(1);

        let ids: Vec<PotId> =
            (0..self.sides.len()).rev().map(PotId::Side).chain(std::iter::once(PotId::Main)).collect();
        let mut awards = Vec::new();
        for pot_id in ids {
            let pot = match pot_id {
                PotId::Main => &mut self.main,
                PotId::Side(i) => &mut self.sides[i],
            };
            if pot.value == 0 {
                continue;
            }
            let winners = tie_groups
                .iter()
                .map(|g| g.iter().copied().filter(|id| pot.eligible.contains(id)).collect::<Vec<_>>())
                .find(|w| !w.is_empty())
                // nobody left who may claim it: the best hand takes it
                .or_else(|| tie_groups.first().cloned())
                .unwrap_or_default();
            if winners.is_empty() {
                continue;
            }
            let mut winners = winners;
            winners.sort_by_key(order);
            let share = pot.value / winners.len() as u64;
            let remainder = (pot.value % winners.len() as u64) as usize;
            for (i, &seat) in winners.iter().enumerate() {
                let amount = share + u64::from(i < remainder);
                awards.push(Award { seat, amount, pot: pot_id });
            }
            log::info!("{pot_id} ({} chips) to {:?}", pot.value, winners);
            pot.value = 0;
        }

        let actual: u64 = awards.iter().map(|a| a.amount).sum();
        if actual != expected {
            return Err(PotAccountingError { expected, actual });
        }
        Ok(awards)
    }

    /// Uncontested hand: every pot goes to the last live player.
    pub fn award_all(&mut self, winner: PlayerId) -> Vec<Award> {
        let mut awards = Vec::new();
        if self.main.value > 0 {
            awards.push(Award { seat: winner, amount: self.main.value, pot: PotId::Main });
            self.main.value = 0;
        }
        for (i, pot) in self.sides.iter_mut().enumerate() {
            if pot.value > 0 {
                awards.push(Award { seat: winner, amount: pot.value, pot: PotId::Side(i) });
                pot.value = 0;
            }
        }
        awards
    }
}
