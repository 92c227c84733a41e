use crate::betting::{Action, Street};
use crate::hand::HoleCards;
use crate::player::PlayerId;
use std::fmt;

/// Where a seat sits relative to the button for one hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Position {
    /// Heads-up the button also posts the small blind.
    Button,
    SmallBlind,
    BigBlind,
    Early,
    Middle,
    Cutoff,
}

impl Position {
    /// Position of the seat `offset` places left of the button when `dealt`
    /// players are in the hand. Seats between the big blind and the cutoff
    /// split into early and middle, early taking the extra seat.
    pub fn from_button_offset(offset: usize, dealt: usize) -> Position {
        let offset = offset % dealt.max(1);
        match (offset, dealt) {
            (0, _) => Position::Button,
            (1, 2) => Position::BigBlind,
            (1, _) => Position::SmallBlind,
            (2, _) => Position::BigBlind,
            (o, n) if o + 1 == n => Position::Cutoff,
            (o, n) => {
                let between = n - 4;
                if o - 3 < (between + 1) / 2 {
                    Position::Early
                } else {
                    Position::Middle
                }
            }
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Position::Button => "BTN",
            Position::SmallBlind => "SB",
            Position::BigBlind => "BB",
            Position::Early => "EP",
            Position::Middle => "MP",
            Position::Cutoff => "CO",
        }
    }

    /// Late enough that an unopened raise counts as a steal.
    pub fn is_steal_position(self) -> bool {
        matches!(self, Position::Cutoff | Position::Button | Position::SmallBlind)
    }

    pub fn is_blind(self) -> bool {
        matches!(self, Position::SmallBlind | Position::BigBlind)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One dealt-in player as the hand saw them.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct SeatRecord {
    pub seat: PlayerId,
    pub name: String,
    pub starting_stack: u64,
    pub position: Position,
    pub hole: Option<HoleCards>,
    /// Set once the hand is paid out.
    pub final_stack: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum HandHistoryVerb {
    Ante,
    SmallBlind,
    BigBlind,
    Fold,
    Check,
    Call,
    Bet,
    RaiseTo,
    AllIn,
    Uncontested,
    Win,
    Split,
}

impl HandHistoryVerb {
    pub fn label(self) -> &'static str {
        match self {
            HandHistoryVerb::Ante => "Ante",
            HandHistoryVerb::SmallBlind => "SB",
            HandHistoryVerb::BigBlind => "BB",
            HandHistoryVerb::Fold => "Fold",
            HandHistoryVerb::Check => "Check",
            HandHistoryVerb::Call => "Call",
            HandHistoryVerb::Bet => "Bet",
            HandHistoryVerb::RaiseTo => "Raise to",
            HandHistoryVerb::AllIn => "All-in",
            HandHistoryVerb::Uncontested => "Uncontested",
            HandHistoryVerb::Win => "Win",
            HandHistoryVerb::Split => "Split",
        }
    }

    /// History verb for an accepted action.
    pub fn for_action(action: Action) -> Self {
        match action {
            Action::Fold => HandHistoryVerb::Fold,
            Action::Check => HandHistoryVerb::Check,
            Action::Call => HandHistoryVerb::Call,
            Action::Bet(_) => HandHistoryVerb::Bet,
            Action::Raise(_) => HandHistoryVerb::RaiseTo,
            Action::AllIn => HandHistoryVerb::AllIn,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct HandHistoryEntry {
    pub seat: PlayerId,
    pub street: Street,
    pub verb: HandHistoryVerb,
    pub amount: Option<u64>,
}

impl fmt::Display for HandHistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.street, self.seat, self.verb.label())?;
        if let Some(amount) = self.amount {
            write!(f, " {amount}")?;
        }
        Ok(())
    }
}

/// Ordered log of one hand, plus who was dealt in and with what.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandHistory {
    entries: Vec<HandHistoryEntry>,
    seats: Vec<SeatRecord>,
}

impl HandHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a dealt-in player before any chips move.
    pub fn add_seat(&mut self, seat: PlayerId, name: impl Into<String>, starting_stack: u64, position: Position) {
        self.seats.push(SeatRecord {
            seat,
            name: name.into(),
            starting_stack,
            position,
            hole: None,
            final_stack: None,
        });
    }

    pub fn set_hole(&mut self, seat: PlayerId, hole: HoleCards) {
        if let Some(r) = self.seats.iter_mut().find(|r| r.seat == seat) {
            r.hole = Some(hole);
        }
    }

    pub fn finalize(&mut self, seat: PlayerId, final_stack: u64) {
        if let Some(r) = self.seats.iter_mut().find(|r| r.seat == seat) {
            r.final_stack = Some(final_stack);
        }
    }

    /// Dealt-in players in the order they were registered.
    pub fn seats(&self) -> &[SeatRecord] {
        &self.seats
    }

    pub fn seat(&self, seat: PlayerId) -> Option<&SeatRecord> {
        self.seats.iter().find(|r| r.seat == seat)
    }

    pub fn record(&mut self, seat: PlayerId, street: Street, verb: HandHistoryVerb, amount: Option<u64>) {
        let entry = HandHistoryEntry { seat, street, verb, amount };
        log::debug!("{entry}");
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[HandHistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The last `n` entries, oldest first.
    pub fn recent(&self, n: usize) -> &[HandHistoryEntry] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    /// Entries recorded for one seat.
    pub fn for_seat(&self, seat: PlayerId) -> impl Iterator<Item = &HandHistoryEntry> {
        self.entries.iter().filter(move |e| e.seat == seat)
    }
}
