use super::rank_groups::RankGroups;
use super::straight_info::StraightInfo;
use super::suit_info::SuitInfo;
use crate::cards::{Card, Rank, Suit};
use crate::evaluator::{Category, HandRank, HandValue};

/// Pre-computed analysis of a 5-7 card set.
/// Built once and shared by all category detectors.
#[derive(Debug, Clone)]
pub struct HandAnalysis {
    /// Rank descending, then suit descending.
    pub sorted_cards: Vec<Card>,
    pub rank_groups: RankGroups,
    pub suit_info: SuitInfo,
    pub straight_info: StraightInfo,
    /// Straight found among the flush-suit cards only.
    pub straight_flush: StraightInfo,
}

impl HandAnalysis {
    pub fn new(cards: &[Card]) -> Self {
        let mut sorted_cards = cards.to_vec();
        sorted_cards.sort_by(|a, b| b.rank().cmp(&a.rank()).then(b.suit().cmp(&a.suit())));

        let mut rank_counts = [0u8; 15];
        for c in &sorted_cards {
            rank_counts[c.rank().value() as usize] += 1;
        }

        let rank_groups = RankGroups::from_counts(&rank_counts);
        let suit_info = SuitInfo::detect(&sorted_cards);
        let straight_info = StraightInfo::detect(sorted_cards.iter().map(|c| c.rank()));
        let straight_flush = match suit_info.flush_suit {
            Some(s) => StraightInfo::detect(
                sorted_cards.iter().filter(|c| c.suit() == s).map(|c| c.rank()),
            ),
            None => StraightInfo { top_rank: None },
        };

        Self { sorted_cards, rank_groups, suit_info, straight_info, straight_flush }
    }

    /// Take the best cards of each listed rank (matched groups first), then fill
    /// the remaining slots with the highest unused kickers.
    pub fn pick_groups(&self, groups: &[(Rank, usize)]) -> [Card; 5] {
        let mut picker = Picker::new(&self.sorted_cards);
        for &(rank, n) in groups {
            picker.take(n, |c| c.rank() == rank);
        }
        picker.finish()
    }

    /// The five cards of a straight run, optionally restricted to one suit.
    pub fn pick_run(&self, run: [Rank; 5], suit: Option<Suit>) -> [Card; 5] {
        let mut picker = Picker::new(&self.sorted_cards);
        for rank in run {
            picker.take(1, |c| c.rank() == rank && suit.map_or(true, |s| c.suit() == s));
        }
        picker.finish()
    }

    /// The five highest cards of one suit.
    pub fn pick_suit(&self, suit: Suit) -> [Card; 5] {
        let mut picker = Picker::new(&self.sorted_cards);
        picker.take(5, |c| c.suit() == suit);
        picker.finish()
    }

    /// Wrap the chosen cards into a comparable rank. Tiebreaks follow `best_five` order.
    pub fn build_rank(&self, category: Category, best_five: [Card; 5]) -> HandRank {
        let tiebreak = best_five.map(|c| c.rank());
        let value = HandValue::from_parts(category, &tiebreak);
        HandRank { category, best_five, value }
    }
}

struct Picker<'a> {
    cards: &'a [Card],
    used: Vec<bool>,
    out: Vec<Card>,
}

impl<'a> Picker<'a> {
    fn new(cards: &'a [Card]) -> Self {
        Self { cards, used: vec![false; cards.len()], out: Vec::with_capacity(5) }
    }

    fn take<F: Fn(Card) -> bool>(&mut self, n: usize, pred: F) {
        let mut taken = 0;
        for (i, &c) in self.cards.iter().enumerate() {
            if taken == n || self.out.len() == 5 {
                break;
            }
            if !self.used[i] && pred(c) {
                self.used[i] = true;
                self.out.push(c);
                taken += 1;
            }
        }
    }

    fn finish(mut self) -> [Card; 5] {
        let remaining = 5usize.saturating_sub(self.out.len());
        self.take(remaining, |_| true);
        // callers guarantee at least five input cards
        let last = self.out.last().copied().unwrap_or(Card::new(Rank::Two, Suit::Clubs));
        std::array::from_fn(|i| self.out.get(i).copied().unwrap_or(last))
    }
}
