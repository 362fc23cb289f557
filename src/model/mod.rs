//! The rating core: aggregation, the expected-score model, the
//! convergence solver, the flagging/purge loop, the super-player
//! estimator, the white-advantage optimizer, the Monte Carlo simulation
//! driver, the connectivity analyzer, and the reporting projection —
//! wired together by [`run_pipeline`].

pub mod aggregator;
pub mod connectivity;
pub mod constants;
pub mod context;
pub mod expected_score;
pub mod flagging;
pub mod reporting;
pub mod simulation;
pub mod solver;
pub mod structures;
pub mod superplayer;
pub mod white_advantage;

use crate::error::CoreResult;
use crate::rng::RatingRng;
use context::{Context, Selectivity};
use structures::{competitor::Competitor, config::RatingConfig, game::Game, prior::{Prior, RelativePrior}, rating_result::RatingResult};

/// Runs the full pipeline end to end: build the context, classify and
/// purge degenerate competitors, solve for ratings, optionally refit the
/// white-advantage term and re-solve, estimate super-player ratings,
/// optionally run a Monte Carlo simulation for standard deviations,
/// analyze connectivity, and project the result.
pub fn run_pipeline<R: RatingRng>(
    competitors: Vec<Competitor>,
    games: Vec<Game>,
    priors: Vec<Option<Prior>>,
    relative_priors: Vec<RelativePrior>,
    config: RatingConfig,
    rng: &mut R
) -> CoreResult<RatingResult> {
    let mut ctx = Context::try_new(competitors, games, priors, relative_priors, config)?;

    flagging::set_super_players(&mut ctx);
    flagging::purge(&mut ctx);

    let mut report = solver::solve(&mut ctx);

    if ctx.config.adjust_white_advantage {
        white_advantage::optimize_white_advantage(&mut ctx);
        report = solver::solve(&mut ctx);
    }

    superplayer::estimate_super_players(&mut ctx);

    let simulation = if ctx.config.simulate >= 2 {
        Some(simulation::simulate(&ctx, ctx.config.simulate, rng)?)
    } else {
        None
    };

    let full_encounters = aggregator::build_encounters(&ctx, Selectivity::Full);
    let groups = connectivity::analyze_connectivity(ctx.n(), &full_encounters)?;

    Ok(reporting::build_rating_result(&ctx, &full_encounters, simulation.as_ref(), report.converged, groups))
}
