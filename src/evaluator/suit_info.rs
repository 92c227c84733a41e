use crate::cards::{Card, Suit};

/// Suit multiplicities and the flush suit, if any suit holds five or more cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuitInfo {
    pub counts: [u8; 4],
    pub flush_suit: Option<Suit>,
}

impl SuitInfo {
    pub fn detect(cards: &[Card]) -> Self {
        let mut counts = [0u8; 4];
        for c in cards {
            counts[c.suit().index()] += 1;
        }
        // at most one suit can reach five with seven cards
        let flush_suit = Suit::ALL.iter().copied().find(|s| counts[s.index()] >= 5);
        SuitInfo { counts, flush_suit }
    }

    pub fn is_flush(&self) -> bool {
        self.flush_suit.is_some()
    }
}
