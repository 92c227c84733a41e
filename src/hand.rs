use crate::cards::{parse_cards, Card};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Community cards on a complete board.
pub const BOARD_SIZE: usize = 5;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HandError {
    #[error("duplicate cards in hole cards")]
    DuplicateHoleCards,
    #[error("too many board cards: {0}")]
    TooManyBoardCards(usize),
    #[error("duplicate cards on board")]
    DuplicateBoardCards,
    #[error("hole cards overlap with board")]
    Overlap,
    #[error("expected exactly two hole cards, got {0}")]
    HoleCount(usize),
    #[error("card parse error: {0}")]
    CardParse(String),
}

/// A player's two private cards.
///
/// ```
/// use holdem_engine::hand::HoleCards;
///
/// let hole: HoleCards = "As Ks".parse().unwrap();
/// assert_eq!(hole.as_array().len(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoleCards([Card; 2]);

impl HoleCards {
    pub fn try_new(a: Card, b: Card) -> Result<Self, HandError> {
        if a == b {
            return Err(HandError::DuplicateHoleCards);
        }
        Ok(Self([a, b]))
    }

    pub fn from_slice(cards: &[Card]) -> Result<Self, HandError> {
        match cards {
            [a, b] => Self::try_new(*a, *b),
            _ => Err(HandError::HoleCount(cards.len())),
        }
    }

    pub fn first(&self) -> Card {
        self.0[0]
    }

    pub fn second(&self) -> Card {
        self.0[1]
    }

    pub fn as_array(&self) -> [Card; 2] {
        self.0
    }

    pub fn contains(&self, card: Card) -> bool {
        self.0.contains(&card)
    }
}

impl FromStr for HoleCards {
    type Err = HandError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cards = parse_cards(s).map_err(|e| HandError::CardParse(e.to_string()))?;
        Self::from_slice(&cards)
    }
}

impl fmt::Display for HoleCards {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.0[0], self.0[1])
    }
}

/// Community cards: empty preflop, then 3, 4, 5.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    cards: Vec<Card>,
}

impl Board {
    pub fn new() -> Self {
        Self { cards: Vec::with_capacity(BOARD_SIZE) }
    }

    pub fn try_new(cards: Vec<Card>) -> Result<Self, HandError> {
        if cards.len() > BOARD_SIZE {
            return Err(HandError::TooManyBoardCards(cards.len()));
        }
        let set: HashSet<Card> = cards.iter().copied().collect();
        if set.len() != cards.len() {
            return Err(HandError::DuplicateBoardCards);
        }
        Ok(Self { cards })
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.cards.len() == BOARD_SIZE
    }

    /// Cards still to come before the river.
    pub fn missing(&self) -> usize {
        BOARD_SIZE.saturating_sub(self.cards.len())
    }

    pub fn as_slice(&self) -> &[Card] {
        &self.cards
    }

    pub(crate) fn extend<I>(&mut self, cards: I)
    where
        I: IntoIterator<Item = Card>,
    {
        self.cards.extend(cards);
    }
}

impl FromStr for Board {
    type Err = HandError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cards = parse_cards(s).map_err(|e| HandError::CardParse(e.to_string()))?;
        Board::try_new(cards)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.cards.iter().map(Card::to_string).collect();
        write!(f, "[{}]", parts.join(" "))
    }
}

/// Check that hole cards and board form a legal Hold'em position (0..=5 board cards, no repeats).
pub fn validate_holdem(hole: &HoleCards, board: &Board) -> Result<(), HandError> {
    if board.len() > BOARD_SIZE {
        return Err(HandError::TooManyBoardCards(board.len()));
    }
    let set: HashSet<Card> = board.as_slice().iter().copied().collect();
    if set.len() != board.len() {
        return Err(HandError::DuplicateBoardCards);
    }
    if hole.first() == hole.second() {
        return Err(HandError::DuplicateHoleCards);
    }
    if hole.as_array().iter().any(|c| set.contains(c)) {
        return Err(HandError::Overlap);
    }
    Ok(())
}
