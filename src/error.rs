//! Error types for the rating core.
//!
//! One `#[derive(Error)]` type, one `#[error("...")]` message per failure
//! mode, propagated with `?` rather than panicking.

use thiserror::Error;

/// Fatal errors the core can return: input invalid, allocation failure, or
/// internal consistency. Non-convergence is deliberately absent here: it is
/// advisory and carried on [`crate::model::solver::SolveReport`] instead.
#[derive(Error, Debug, PartialEq)]
pub enum CoreError {
    #[error("game {index} references invalid competitor index {competitor} (n_players = {n_players})")]
    InvalidCompetitorIndex {
        index: usize,
        competitor: usize,
        n_players: usize
    },

    #[error("game {index} has white_index == black_index == {competitor}")]
    SelfPlay { index: usize, competitor: usize },

    #[error("anchor competitor index {0} is out of range")]
    UnknownAnchor(usize),

    #[error("prior references unknown competitor index {0}")]
    UnknownPriorCompetitor(usize),

    #[error("relative prior references unknown competitor index {0}")]
    UnknownRelativePriorCompetitor(usize),

    #[error("prior sigma {sigma} is at or below the floor {floor}")]
    SigmaTooSmall { sigma: f64, floor: f64 },

    #[error("failed to allocate the O(N^2) simulation accumulator for {n_players} competitors")]
    Allocation { n_players: usize },

    #[error("connectivity analyzer reached an internal inconsistency: {0}")]
    Internal(String)
}

pub type CoreResult<T> = Result<T, CoreError>;
