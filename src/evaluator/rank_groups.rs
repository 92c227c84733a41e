use crate::cards::Rank;

/// Groups ranks by their frequency in a hand, sorted by (count desc, rank desc).
///
/// Example: AAAKQ groups as [(Ace, 3), (King, 1), (Queen, 1)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankGroups {
    groups: Vec<(Rank, u8)>,
}

impl RankGroups {
    /// Create RankGroups from a rank count array indexed by rank value (2-14).
    pub fn from_counts(rank_counts: &[u8; 15]) -> Self {
        let mut groups: Vec<(Rank, u8)> = Rank::ALL
            .iter()
            .copied()
            .map(|rank| (rank, rank_counts[rank.value() as usize]))
            .filter(|&(_, count)| count > 0)
            .collect();

        groups.sort_by(|a, b| b.1.cmp(&a.1).then(b.0.cmp(&a.0)));

        Self { groups }
    }

    /// Highest rank held four (or more) times.
    pub fn quad(&self) -> Option<Rank> {
        self.groups.iter().find(|(_, count)| *count >= 4).map(|(rank, _)| *rank)
    }

    /// Highest rank held exactly three times.
    pub fn trips(&self) -> Option<Rank> {
        self.groups.iter().find(|(_, count)| *count == 3).map(|(rank, _)| *rank)
    }

    /// All ranks held exactly twice, in descending order.
    pub fn pairs(&self) -> Vec<Rank> {
        self.groups.iter().filter(|(_, count)| *count == 2).map(|(rank, _)| *rank).collect()
    }

    /// Best (trips, pair) split. With seven cards the pair may come from a second set of trips.
    pub fn full_house(&self) -> Option<(Rank, Rank)> {
        let trips = self.trips()?;
        let pair = self
            .groups
            .iter()
            .filter(|(rank, count)| *rank != trips && *count >= 2)
            .map(|(rank, _)| *rank)
            .max()?;
        Some((trips, pair))
    }

    #[cfg(test)]
    pub fn groups(&self) -> &[(Rank, u8)] {
        &self.groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_counts(pairs: &[(u8, u8)]) -> [u8; 15] {
        let mut counts = [0u8; 15];
        for &(rank_val, count) in pairs {
            counts[rank_val as usize] = count;
        }
        counts
    }

    #[test]
    fn quad_wins_over_everything_else() {
        let groups = RankGroups::from_counts(&make_counts(&[(14, 4), (13, 3)]));
        assert_eq!(groups.quad(), Some(Rank::Ace));
        assert_eq!(groups.trips(), Some(Rank::King));
    }

    #[test]
    fn double_trips_make_a_full_house() {
        // 999 666 K
        let groups = RankGroups::from_counts(&make_counts(&[(9, 3), (6, 3), (13, 1)]));
        assert_eq!(groups.full_house(), Some((Rank::Nine, Rank::Six)));
    }

    #[test]
    fn full_house_takes_the_higher_pair() {
        // 777 KK 33
        let groups = RankGroups::from_counts(&make_counts(&[(7, 3), (13, 2), (3, 2)]));
        assert_eq!(groups.full_house(), Some((Rank::Seven, Rank::King)));
    }

    #[test]
    fn three_pairs_are_listed_high_to_low() {
        let groups = RankGroups::from_counts(&make_counts(&[(4, 2), (12, 2), (8, 2), (2, 1)]));
        assert_eq!(groups.pairs(), vec![Rank::Queen, Rank::Eight, Rank::Four]);
        assert_eq!(groups.full_house(), None);
    }

    #[test]
    fn sorting_by_count_then_rank() {
        let groups = RankGroups::from_counts(&make_counts(&[(5, 1), (14, 1), (10, 2)]));
        let ranks: Vec<Rank> = groups.groups().iter().map(|(r, _)| *r).collect();
        assert_eq!(ranks, vec![Rank::Ten, Rank::Ace, Rank::Five]);
    }
}
