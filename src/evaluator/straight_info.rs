use crate::cards::Rank;

/// Highest five-rank run present in a set of cards, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StraightInfo {
    pub top_rank: Option<Rank>,
}

impl StraightInfo {
    /// Detect the best straight among any number of ranks (duplicates allowed).
    /// The wheel (A-2-3-4-5) has Five as its top rank.
    pub fn detect<I>(ranks: I) -> Self
    where
        I: IntoIterator<Item = Rank>,
    {
        // present[1] doubles as the low ace
        let mut present = [false; 15];
        for r in ranks {
            present[r.value() as usize] = true;
        }
        present[1] = present[Rank::Ace.value() as usize];

        let top_rank = (5..=14u8)
            .rev()
            .find(|&top| (top - 4..=top).all(|v| present[v as usize]))
            .and_then(Rank::from_value);

        StraightInfo { top_rank }
    }

    pub fn is_straight(&self) -> bool {
        self.top_rank.is_some()
    }

    /// The five ranks of the run, high to low; the wheel ends with its Ace.
    pub fn run(&self) -> Option<[Rank; 5]> {
        let top = self.top_rank?.value();
        let mut out = [Rank::Ace; 5];
        for (i, slot) in out.iter_mut().enumerate() {
            let v = top - i as u8;
            *slot = Rank::from_value(v).unwrap_or(Rank::Ace);
        }
        Some(out)
    }
}
