use super::hand_analysis::HandAnalysis;
use crate::cards::Rank;
use crate::evaluator::{Category, HandRank};

/// Strategy pattern: each category detector knows how to detect and build its rank.
pub trait CategoryDetector {
    fn detect(&self, analysis: &HandAnalysis) -> bool;
    fn build_rank(&self, analysis: &HandAnalysis) -> HandRank;
}

// ============================================================================
// Detector Implementations (in priority order: highest to lowest)
// ============================================================================

/// Royal Flush: Ace-high straight flush
pub struct RoyalFlushDetector;

impl CategoryDetector for RoyalFlushDetector {
    fn detect(&self, analysis: &HandAnalysis) -> bool {
        analysis.straight_flush.top_rank == Some(Rank::Ace)
    }

    fn build_rank(&self, analysis: &HandAnalysis) -> HandRank {
        build_straight(analysis, Category::RoyalFlush, true)
    }
}

/// Straight Flush: Five consecutive ranks, all same suit
pub struct StraightFlushDetector;

impl CategoryDetector for StraightFlushDetector {
    fn detect(&self, analysis: &HandAnalysis) -> bool {
        analysis.straight_flush.is_straight()
    }

    fn build_rank(&self, analysis: &HandAnalysis) -> HandRank {
        build_straight(analysis, Category::StraightFlush, true)
    }
}

/// Four of a Kind: Four cards of the same rank
pub struct FourOfAKindDetector;

impl CategoryDetector for FourOfAKindDetector {
    fn detect(&self, analysis: &HandAnalysis) -> bool {
        analysis.rank_groups.quad().is_some()
    }

    fn build_rank(&self, analysis: &HandAnalysis) -> HandRank {
        let groups: Vec<(Rank, usize)> = analysis.rank_groups.quad().map(|q| (q, 4)).into_iter().collect();
        let five = analysis.pick_groups(&groups);
        analysis.build_rank(Category::FourOfAKind, five)
    }
}

/// Full House: Three of a kind plus a pair (or a second three of a kind)
pub struct FullHouseDetector;

impl CategoryDetector for FullHouseDetector {
    fn detect(&self, analysis: &HandAnalysis) -> bool {
        analysis.rank_groups.full_house().is_some()
    }

    fn build_rank(&self, analysis: &HandAnalysis) -> HandRank {
        let groups: Vec<(Rank, usize)> = analysis
            .rank_groups
            .full_house()
            .map(|(trips, pair)| vec![(trips, 3), (pair, 2)])
            .unwrap_or_default();
        let five = analysis.pick_groups(&groups);
        analysis.build_rank(Category::FullHouse, five)
    }
}

/// Flush: Five cards of the same suit
pub struct FlushDetector;

impl CategoryDetector for FlushDetector {
    fn detect(&self, analysis: &HandAnalysis) -> bool {
        analysis.suit_info.is_flush()
    }

    fn build_rank(&self, analysis: &HandAnalysis) -> HandRank {
        let five = match analysis.suit_info.flush_suit {
            Some(suit) => analysis.pick_suit(suit),
            None => analysis.pick_groups(&[]),
        };
        analysis.build_rank(Category::Flush, five)
    }
}

/// Straight: Five consecutive ranks
pub struct StraightDetector;

impl CategoryDetector for StraightDetector {
    fn detect(&self, analysis: &HandAnalysis) -> bool {
        analysis.straight_info.is_straight()
    }

    fn build_rank(&self, analysis: &HandAnalysis) -> HandRank {
        build_straight(analysis, Category::Straight, false)
    }
}

/// Three of a Kind: Three cards of the same rank
pub struct ThreeOfAKindDetector;

impl CategoryDetector for ThreeOfAKindDetector {
    fn detect(&self, analysis: &HandAnalysis) -> bool {
        analysis.rank_groups.trips().is_some()
    }

    fn build_rank(&self, analysis: &HandAnalysis) -> HandRank {
        let groups: Vec<(Rank, usize)> = analysis.rank_groups.trips().map(|t| (t, 3)).into_iter().collect();
        let five = analysis.pick_groups(&groups);
        analysis.build_rank(Category::ThreeOfAKind, five)
    }
}

/// Two Pair: the two highest pairs; a third pair can only play as the kicker
pub struct TwoPairDetector;

impl CategoryDetector for TwoPairDetector {
    fn detect(&self, analysis: &HandAnalysis) -> bool {
        analysis.rank_groups.pairs().len() >= 2
    }

    fn build_rank(&self, analysis: &HandAnalysis) -> HandRank {
        let groups: Vec<(Rank, usize)> =
            analysis.rank_groups.pairs().into_iter().take(2).map(|p| (p, 2)).collect();
        let five = analysis.pick_groups(&groups);
        analysis.build_rank(Category::TwoPair, five)
    }
}

/// One Pair: Two cards of the same rank
pub struct OnePairDetector;

impl CategoryDetector for OnePairDetector {
    fn detect(&self, analysis: &HandAnalysis) -> bool {
        analysis.rank_groups.pairs().len() == 1
    }

    fn build_rank(&self, analysis: &HandAnalysis) -> HandRank {
        let groups: Vec<(Rank, usize)> =
            analysis.rank_groups.pairs().into_iter().take(1).map(|p| (p, 2)).collect();
        let five = analysis.pick_groups(&groups);
        analysis.build_rank(Category::Pair, five)
    }
}

/// High Card: No matching ranks or sequences
pub struct HighCardDetector;

impl CategoryDetector for HighCardDetector {
    fn detect(&self, _analysis: &HandAnalysis) -> bool {
        true // Always matches as fallback
    }

    fn build_rank(&self, analysis: &HandAnalysis) -> HandRank {
        let five = analysis.pick_groups(&[]);
        analysis.build_rank(Category::HighCard, five)
    }
}

fn build_straight(analysis: &HandAnalysis, category: Category, suited: bool) -> HandRank {
    let (info, suit) = if suited {
        (analysis.straight_flush, analysis.suit_info.flush_suit)
    } else {
        (analysis.straight_info, None)
    };
    let five = match info.run() {
        Some(run) => analysis.pick_run(run, suit),
        None => analysis.pick_groups(&[]),
    };
    analysis.build_rank(category, five)
}

// ============================================================================
// Static detector list (in priority order)
// ============================================================================

pub const DETECTORS: [&dyn CategoryDetector; 10] = [
    &RoyalFlushDetector,
    &StraightFlushDetector,
    &FourOfAKindDetector,
    &FullHouseDetector,
    &FlushDetector,
    &StraightDetector,
    &ThreeOfAKindDetector,
    &TwoPairDetector,
    &OnePairDetector,
    &HighCardDetector,
];
