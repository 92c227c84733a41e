//! holdem-engine: No-limit Texas Hold'em cash game rules engine
//!
//! Goals:
//! - Exact chip accounting: every hand conserves chips, side pots included
//! - Deterministic replays from a seeded or stacked deck
//! - No panics for invalid input; illegal actions are rejected and re-requested
//!
//! ## Quick start: evaluate a Hold'em hand
//! ```
//! use holdem_engine::cards::{Card, Rank, Suit};
//! use holdem_engine::evaluator::{evaluate_holdem, Category};
//! use holdem_engine::hand::{Board, HoleCards};
//!
//! let hole = HoleCards::try_new(
//!     Card::new(Rank::Ace, Suit::Spades),
//!     Card::new(Rank::Ace, Suit::Hearts),
//! ).unwrap();
//! let board = Board::try_new(vec![
//!     Card::new(Rank::King, Suit::Clubs),
//!     Card::new(Rank::Queen, Suit::Diamonds),
//!     Card::new(Rank::Jack, Suit::Hearts),
//!     Card::new(Rank::Three, Suit::Spades),
//!     Card::new(Rank::Two, Suit::Clubs),
//! ]).unwrap();
//!
//! let eval = evaluate_holdem(&hole, &board).unwrap();
//! assert_eq!(eval.category, Category::Pair);
//! ```
//!
//! ## Quick start: play hands at a table
//! ```
//! use holdem_engine::agents::RandomAgent;
//! use holdem_engine::config::TableConfig;
//! use holdem_engine::deck::SeededDeckSource;
//! use holdem_engine::game::Table;
//!
//! let mut table = Table::new(TableConfig::low(), SeededDeckSource::new(42)).unwrap();
//! for name in ["ann", "bo", "cy"] {
//!     table.seat_player(name, 100).unwrap();
//! }
//! let hands = table.run(&mut RandomAgent::new(1), 20).unwrap();
//! assert!(!hands.is_empty());
//! assert_eq!(table.total_chips(), 300);
//! ```
//!
//! ## Simulator
//! Play seeded hands from the command line with:
//! ```sh
//! cargo run --bin holdem-sim -- --players 6 --hands 100 --seed 7
//! ```

pub mod agents;
pub mod betting;
pub mod cards;
pub mod config;
pub mod deck;
pub mod engine;
pub mod evaluator;
pub mod game;
pub mod hand;
pub mod history;
pub mod player;
pub mod pot;
pub mod showdown;
pub mod stats;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
