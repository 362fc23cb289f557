/// Outcome of a single game. Modeled as a sum type that must never alias
/// with the three-outcome probability triple produced by the
/// expected-score model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    WhiteWin,
    Draw,
    BlackWin,
    /// Skipped by all numerics but kept in the table; simulation rewrites
    /// outcomes in place but never resurrects a discarded game.
    Discard
}

/// A single recorded game. Invariant: `white != black`, and both are
/// valid indices into the competitor table — enforced at construction time
/// by `Context::try_new`.
#[derive(Debug, Clone, Copy)]
pub struct Game {
    pub white: usize,
    pub black: usize,
    pub outcome: Outcome
}

impl Game {
    pub fn new(white: usize, black: usize, outcome: Outcome) -> Self {
        Game { white, black, outcome }
    }
}
