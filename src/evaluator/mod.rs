pub(crate) mod detector;
pub(crate) mod hand_analysis;
pub(crate) mod rank_groups;
pub(crate) mod straight_info;
pub(crate) mod suit_info;

use crate::cards::{Card, Rank};
use crate::hand::{validate_holdem, Board, HandError, HoleCards, BOARD_SIZE};
use core::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

/// Compact, comparable hand strength. Higher is better.
/// Encodes category and ranked tiebreakers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandValue(u64);

/// Poker hand category from weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
#[repr(u8)]
pub enum Category {
    HighCard = 0,
    Pair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
    RoyalFlush = 9,
}

impl Category {
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    pub const fn name(self) -> &'static str {
        match self {
            Category::HighCard => "high card",
            Category::Pair => "pair",
            Category::TwoPair => "two pair",
            Category::ThreeOfAKind => "three of a kind",
            Category::Straight => "straight",
            Category::Flush => "flush",
            Category::FullHouse => "full house",
            Category::FourOfAKind => "four of a kind",
            Category::StraightFlush => "straight flush",
            Category::RoyalFlush => "royal flush",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Category plus the five cards that justify it. `value` drives ordering,
/// so suits never break a tie.
#[derive(Debug, Clone, Copy)]
#[non_exhaustive]
pub struct HandRank {
    pub category: Category,
    /// Matched cards first, then kickers high to low. Straights run high to low with a wheel's Ace last.
    pub best_five: [Card; 5],
    value: HandValue,
}

impl Ord for HandRank {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl PartialOrd for HandRank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for HandRank {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for HandRank {}

impl HandRank {
    /// Return the packed comparable value for ordering/caching.
    pub const fn value(&self) -> HandValue {
        self.value
    }

    /// Ranks of `best_five` in comparison order.
    pub fn tiebreak(&self) -> [Rank; 5] {
        self.best_five.map(|c| c.rank())
    }
}

impl fmt::Display for HandRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cards: Vec<String> = self.best_five.iter().map(Card::to_string).collect();
        write!(f, "{} ({})", self.category, cards.join(" "))
    }
}

impl HandValue {
    /// Return the packed comparable value.
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Pack a category and five rank tiebreakers into a comparable value.
    /// Uses 6 bits per rank to be generous (supports up to 63).
    pub fn from_parts(category: Category, tiebreak: &[Rank; 5]) -> Self {
        // Layout (most significant -> least):
        // [ category (8 bits) | r0 (6) | r1 (6) | r2 (6) | r3 (6) | r4 (6) | 18 zero bits ]
        const CAT_SHIFT: u32 = 48;
        const RANK_STRIDE: u32 = 6;
        let mut v: u64 = (category as u64) << CAT_SHIFT;
        for (i, r) in tiebreak.iter().enumerate() {
            let offset = CAT_SHIFT - RANK_STRIDE * (i as u32 + 1);
            v |= (r.value() as u64) << offset;
        }
        HandValue(v)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EvalError {
    #[error("invalid hand: {0}")]
    InvalidHand(#[from] HandError),
    #[error("not enough cards to evaluate: {0} (need at least 5)")]
    NotEnoughCards(usize),
    #[error("too many cards to evaluate: {0} (at most 7)")]
    TooManyCards(usize),
    #[error("duplicate card: {0}")]
    DuplicateCard(Card),
}

/// Rank the best five-card hand among 5 to 7 distinct cards.
///
/// ```
/// use holdem_engine::cards::parse_cards;
/// use holdem_engine::evaluator::{evaluate, Category};
///
/// let cards = parse_cards("Ah 2d 3c 4s 5h Kd 9c").unwrap();
/// let rank = evaluate(&cards).unwrap();
/// assert_eq!(rank.category, Category::Straight);
/// assert_eq!(rank.to_string(), "straight (5h 4s 3c 2d Ah)");
/// ```
pub fn evaluate(cards: &[Card]) -> Result<HandRank, EvalError> {
    match cards.len() {
        n if n < 5 => return Err(EvalError::NotEnoughCards(n)),
        n if n > 7 => return Err(EvalError::TooManyCards(n)),
        _ => {}
    }
    let mut seen = HashSet::with_capacity(cards.len());
    if let Some(dup) = cards.iter().find(|c| !seen.insert(**c)) {
        return Err(EvalError::DuplicateCard(*dup));
    }
    Ok(rank_cards(cards))
}

/// Evaluate hole cards against the board dealt so far (flop onward).
///
/// ```
/// use holdem_engine::evaluator::{evaluate_holdem, Category};
/// use holdem_engine::hand::{Board, HoleCards};
///
/// let hole: HoleCards = "As Ah".parse().unwrap();
/// let board: Board = "Qc Jd 9h 3s 2c".parse().unwrap();
/// let rank = evaluate_holdem(&hole, &board).unwrap();
/// assert_eq!(rank.category, Category::Pair);
/// ```
pub fn evaluate_holdem(hole: &HoleCards, board: &Board) -> Result<HandRank, EvalError> {
    validate_holdem(hole, board)?;
    let total = board.len() + 2;
    if total < 5 {
        return Err(EvalError::NotEnoughCards(total));
    }
    let mut cards = Vec::with_capacity(2 + BOARD_SIZE);
    cards.extend_from_slice(&hole.as_array());
    cards.extend_from_slice(board.as_slice());
    Ok(rank_cards(&cards))
}

/// Evaluate exactly five cards. Inputs are assumed distinct.
pub fn evaluate_five(cards: &[Card; 5]) -> HandRank {
    rank_cards(cards)
}

/// Evaluate seven cards directly, without enumerating five-card subsets.
pub fn evaluate_seven(cards: &[Card; 7]) -> HandRank {
    rank_cards(cards)
}

/// Compare two Hold'em hands on a shared board.
pub fn compare_holdem(a: &HoleCards, b: &HoleCards, board: &Board) -> Result<Ordering, EvalError> {
    let ra = evaluate_holdem(a, board)?;
    let rb = evaluate_holdem(b, board)?;
    Ok(ra.cmp(&rb))
}

fn rank_cards(cards: &[Card]) -> HandRank {
    use detector::{CategoryDetector, HighCardDetector, DETECTORS};
    use hand_analysis::HandAnalysis;

    let analysis = HandAnalysis::new(cards);

    DETECTORS
        .iter()
        .find(|d| d.detect(&analysis))
        .map(|d| d.build_rank(&analysis))
        .unwrap_or_else(|| HighCardDetector.build_rank(&analysis))
}
