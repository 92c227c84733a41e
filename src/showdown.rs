use crate::evaluator::{evaluate_holdem, EvalError, HandRank};
use crate::hand::{Board, HoleCards};
use crate::player::PlayerId;

/// Players whose best hands compare exactly equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TieGroup {
    pub rank: HandRank,
    /// Seat order.
    pub players: Vec<PlayerId>,
}

/// Sort hands best first and merge equal ranks into tie groups.
pub fn rank_showdown(mut hands: Vec<(PlayerId, HandRank)>) -> Vec<TieGroup> {
    hands.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    let mut groups: Vec<TieGroup> = Vec::new();
    for (id, rank) in hands {
        match groups.last_mut() {
            Some(g) if g.rank == rank => g.players.push(id),
            _ => groups.push(TieGroup { rank, players: vec![id] }),
        }
    }
    groups
}

/// Evaluate every contender against the board.
pub fn evaluate_showdown<I>(board: &Board, contenders: I) -> Result<Vec<TieGroup>, EvalError>
where
    I: IntoIterator<Item = (PlayerId, HoleCards)>,
{
    let hands = contenders
        .into_iter()
        .map(|(id, hole)| evaluate_holdem(&hole, board).map(|rank| (id, rank)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rank_showdown(hands))
}

/// Seat lists in group order, the shape the pot ledger consumes.
pub fn group_seats(groups: &[TieGroup]) -> Vec<Vec<PlayerId>> {
    groups.iter().map(|g| g.players.clone()).collect()
}
