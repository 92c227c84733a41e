use crate::cards::{Card, Rank, Suit};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DeckError {
    #[error("deck exhausted: requested {requested} cards, {remaining} remaining")]
    InsufficientCards { requested: usize, remaining: usize },
    #[error("a deck holds 52 cards, got {0}")]
    WrongSize(usize),
    #[error("duplicate card {0} in deck")]
    DuplicateCard(Card),
}

/// An ordered run of unique cards, consumed from the front as the hand is dealt.
#[derive(Debug, Clone, Default)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// All 52 cards in suit-major order.
    ///
    /// ```
    /// use holdem_engine::deck::Deck;
    ///
    /// let deck = Deck::standard();
    /// assert_eq!(deck.len(), 52);
    /// ```
    pub fn standard() -> Self {
        let cards = Suit::ALL
            .iter()
            .flat_map(|&s| Rank::ALL.iter().map(move |&r| Card::new(r, s)))
            .collect();
        Self { cards }
    }

    /// Build a deck with a fixed card order; the first card is dealt first.
    /// Used to stack decks for deterministic replays. The cards must be a
    /// permutation of the standard 52.
    pub fn from_cards(cards: Vec<Card>) -> Result<Self, DeckError> {
        if cards.len() != 52 {
            return Err(DeckError::WrongSize(cards.len()));
        }
        let mut seen = [[false; 13]; 4];
        for c in &cards {
            let slot = &mut seen[c.suit().index()][(c.rank().value() - 2) as usize];
            if *slot {
                return Err(DeckError::DuplicateCard(*c));
            }
            *slot = true;
        }
        Ok(Self { cards })
    }

    /// `top` dealt first, followed by the remaining cards in standard order.
    ///
    /// ```
    /// use holdem_engine::cards::parse_cards;
    /// use holdem_engine::deck::Deck;
    ///
    /// let mut deck = Deck::with_top(&parse_cards("As Kd").unwrap()).unwrap();
    /// assert_eq!(deck.len(), 52);
    /// assert_eq!(deck.draw().unwrap().to_string(), "As");
    /// ```
    pub fn with_top(top: &[Card]) -> Result<Self, DeckError> {
        let mut cards = top.to_vec();
        cards.extend(Deck::standard().cards.into_iter().filter(|c| !top.contains(c)));
        Self::from_cards(cards)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn as_slice(&self) -> &[Card] {
        &self.cards
    }

    /// Uniform Fisher-Yates shuffle driven by `rng`.
    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    /// Shuffle with a seeded ChaCha stream for reproducibility.
    pub fn shuffle_seeded(&mut self, seed: u64) {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        self.shuffle_with(&mut rng);
    }

    /// Remove and return the first `n` cards.
    pub fn deal(&mut self, n: usize) -> Result<Vec<Card>, DeckError> {
        if n > self.cards.len() {
            return Err(DeckError::InsufficientCards { requested: n, remaining: self.cards.len() });
        }
        Ok(self.cards.drain(..n).collect())
    }

    /// Deal a single card.
    pub fn draw(&mut self) -> Result<Card, DeckError> {
        if self.cards.is_empty() {
            return Err(DeckError::InsufficientCards { requested: 1, remaining: 0 });
        }
        Ok(self.cards.remove(0))
    }

    /// Discard the top card.
    pub fn burn(&mut self) -> Result<(), DeckError> {
        self.draw().map(|_| ())
    }
}

/// Supplies a freshly shuffled deck at the start of each hand.
pub trait DeckSource {
    fn fresh_deck(&mut self) -> Deck;
}

/// Production source: ChaCha20 keyed from the OS-seeded thread RNG.
/// Each table owns its own stream.
#[derive(Debug, Clone)]
pub struct SecureDeckSource {
    rng: ChaCha20Rng,
}

impl SecureDeckSource {
    pub fn new() -> Self {
        let mut seed = [0u8; 32];
        rand::rng().fill_bytes(&mut seed);
        Self { rng: ChaCha20Rng::from_seed(seed) }
    }
}

impl Default for SecureDeckSource {
    fn default() -> Self {
        Self::new()
    }
}

impl DeckSource for SecureDeckSource {
    fn fresh_deck(&mut self) -> Deck {
        let mut deck = Deck::standard();
        deck.shuffle_with(&mut self.rng);
        deck
    }
}

/// Reproducible source for simulations and tests.
#[derive(Debug, Clone)]
pub struct SeededDeckSource {
    rng: ChaCha20Rng,
}

impl SeededDeckSource {
    pub fn new(seed: u64) -> Self {
        Self { rng: ChaCha20Rng::seed_from_u64(seed) }
    }
}

impl DeckSource for SeededDeckSource {
    fn fresh_deck(&mut self) -> Deck {
        let mut deck = Deck::standard();
        deck.shuffle_with(&mut self.rng);
        deck
    }
}

/// Hands out pre-arranged decks in order, falling back to an unshuffled deck once drained.
#[derive(Debug, Clone, Default)]
pub struct StackedDeckSource {
    decks: std::collections::VecDeque<Deck>,
}

impl StackedDeckSource {
    pub fn new<I: IntoIterator<Item = Deck>>(decks: I) -> Self {
        Self { decks: decks.into_iter().collect() }
    }

    pub fn push(&mut self, deck: Deck) {
        self.decks.push_back(deck);
    }
}

impl DeckSource for StackedDeckSource {
    fn fresh_deck(&mut self) -> Deck {
        self.decks.pop_front().unwrap_or_else(Deck::standard)
    }
}
