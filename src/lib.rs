//! A maximum-likelihood pairwise rating engine: fits a single logistic
//! strength scale (plus an optional white-side advantage and draw-rate
//! parameter) to a table of game outcomes, via coordinate-descent rather
//! than a direct linear solve.

pub mod constants;
pub mod error;
pub mod model;
pub mod rng;
pub mod utils;

pub use error::{CoreError, CoreResult};
pub use model::run_pipeline;
pub use model::structures::{
    competitor::Competitor,
    config::RatingConfig,
    game::{Game, Outcome},
    prior::{Prior, RelativePrior},
    rating_result::RatingResult
};
