//! Monte Carlo simulation driver: re-derives the whole rating (resolved
//! encounters resampled from the fitted model, priors perturbed by their
//! stated uncertainty, solver re-run from scratch) some number of times,
//! and reports the spread of the results as per-competitor and pairwise
//! standard deviations.

use crate::error::CoreResult;
use crate::model::aggregator;
use crate::model::constants::SIGMA_FLOOR;
use crate::model::context::{Context, Selectivity};
use crate::model::flagging;
use crate::model::solver;
use crate::model::structures::game::Outcome;
use crate::model::structures::rating_result::TriangularMatrix;
use crate::rng::RatingRng;
use statrs::distribution::{ContinuousCDF, Normal};

/// Output of a simulation run: per-competitor rating sdev, the
/// pairwise-difference sdev matrix, and the sdevs of the two scalar model
/// parameters, all scaled by the requested confidence factor.
pub struct SimulationResult {
    pub rating_sdev: Vec<f64>,
    pub pairwise_sdev: TriangularMatrix,
    pub white_advantage_sdev: f64,
    pub draw_rate_sdev: f64
}

/// Converts a confidence percentage in `(50, 100)` to a z-factor via the
/// inverse standard normal CDF, e.g. `95.0` maps to roughly `1.96`.
pub fn confidence_to_z_factor(confidence_pct: f64) -> f64 {
    let p = 0.5 + confidence_pct.clamp(50.0, 100.0) / 200.0;
    Normal::new(0.0, 1.0).expect("standard normal is always constructible").inverse_cdf(p)
}

/// Runs `replicates` independent resamplings of the fitted model, solving
/// each from scratch, and returns the spread across the solved ratings.
/// `base` must already hold the converged ratings and white advantage the
/// replicates perturb around; it is left unmodified. Propagates
/// `CoreError::Allocation` if any replicate's `Context` fails to allocate —
/// the dominant O(N^2) cost is paid once per replicate, not once for the
/// whole run, so a transient allocation failure can surface on any of them.
pub fn simulate<R: RatingRng>(base: &Context, replicates: u32, rng: &mut R) -> CoreResult<SimulationResult> {
    let n = base.n();
    if replicates < 2 {
        return Ok(SimulationResult {
            rating_sdev: vec![0.0; n],
            pairwise_sdev: TriangularMatrix::zeros(n),
            white_advantage_sdev: 0.0,
            draw_rate_sdev: 0.0
        });
    }

    let mut rating_sum = vec![0.0; n];
    let mut rating_sum_sq = vec![0.0; n];
    let mut pair_sum = TriangularMatrix::zeros(n);
    let mut pair_sum_sq = TriangularMatrix::zeros(n);
    let mut wadv_sum = 0.0;
    let mut wadv_sum_sq = 0.0;

    for _ in 0..replicates {
        let replicate = resample(base, rng)?;
        wadv_sum += replicate.white_advantage;
        wadv_sum_sq += replicate.white_advantage * replicate.white_advantage;

        for j in 0..n {
            let r = replicate.competitors[j].rating;
            rating_sum[j] += r;
            rating_sum_sq[j] += r * r;
        }

        for i in 0..n {
            for j in 0..i {
                let d = replicate.competitors[i].rating - replicate.competitors[j].rating;
                *pair_sum.get_mut(i, j) += d;
                *pair_sum_sq.get_mut(i, j) += d * d;
            }
        }
    }

    let replicates_f = replicates as f64;
    let rating_sdev: Vec<f64> = (0..n).map(|j| sdev(rating_sum[j], rating_sum_sq[j], replicates_f)).collect();

    let mut pairwise_sdev = TriangularMatrix::zeros(n);
    for i in 0..n {
        for j in 0..i {
            let s = sdev(pair_sum.get(i, j), pair_sum_sq.get(i, j), replicates_f);
            *pairwise_sdev.get_mut(i, j) = s;
        }
    }

    Ok(SimulationResult {
        rating_sdev,
        pairwise_sdev,
        white_advantage_sdev: sdev(wadv_sum, wadv_sum_sq, replicates_f),
        draw_rate_sdev: 0.0
    })
}

fn sdev(sum: f64, sum_sq: f64, n: f64) -> f64 {
    let mean = sum / n;
    let variance = (sum_sq / n - mean * mean).max(0.0);
    variance.sqrt()
}

/// One replicate: rebuilds a fresh `Context` sharing `base`'s games and
/// config, resamples every game's outcome from the fitted model at
/// `base`'s converged ratings, perturbs any soft priors by a Gaussian draw
/// scaled by their sigma, then flags/purges/solves it from scratch.
/// Propagates `Context::try_new`'s error rather than panicking: the
/// replicate's own O(N^2) accumulator allocation can fail independently of
/// the one the original pipeline run already succeeded at.
fn resample<R: RatingRng>(base: &Context, rng: &mut R) -> CoreResult<Context> {
    let mut games = base.games.clone();
    for game in games.iter_mut() {
        if game.outcome == Outcome::Discard {
            continue;
        }
        let white_rating = base.competitors[game.white].rating + base.white_advantage;
        let black_rating = base.competitors[game.black].rating;
        let (pwin, pdraw, _plos) = base.score_model.predict3(white_rating - black_rating);
        game.outcome = resample_outcome(pwin, pdraw, rng);
    }

    let priors = base
        .priors
        .iter()
        .map(|p| {
            p.map(|prior| {
                if prior.is_hard() {
                    prior
                } else {
                    let mut perturbed = prior;
                    perturbed.value += rng.standard_normal() * prior.sigma;
                    perturbed
                }
            })
        })
        .collect();

    let relative_priors = base
        .relative_priors
        .iter()
        .map(|rp| {
            let mut rp = *rp;
            if rp.sigma > SIGMA_FLOOR {
                rp.delta += rng.standard_normal() * rp.sigma;
            }
            rp
        })
        .collect();

    let competitors = base.competitors.iter().map(|c| crate::model::structures::competitor::Competitor::new(c.name.clone())).collect();

    let mut ctx = Context::try_new(competitors, games, priors, relative_priors, base.config.clone())?;
    ctx.white_advantage = base.white_advantage;

    flagging::set_super_players(&mut ctx);
    flagging::purge(&mut ctx);
    aggregator::refresh(&mut ctx, Selectivity::NoFlagged);
    solver::solve(&mut ctx);

    if ctx.config.adjust_white_advantage {
        crate::model::white_advantage::optimize_white_advantage(&mut ctx);
        solver::solve(&mut ctx);
    }

    // Competitors still flagged after this replicate's solve (degenerate
    // even under the resampled outcomes) never received a gradient update;
    // report them at a fixed placeholder rather than super-player-estimate
    // a rating for every replicate.
    for c in ctx.competitors.iter_mut() {
        if c.flagged {
            c.rating = 0.0;
        }
    }

    Ok(ctx)
}

/// Samples a three-outcome draw from `(pwin, pdraw, 1 - pwin - pdraw)` as
/// two nested coin flips: first decisive-vs-draw, then white-vs-black
/// conditional on decisive.
fn resample_outcome<R: RatingRng>(pwin: f64, pdraw: f64, rng: &mut R) -> Outcome {
    if rng.bernoulli(pdraw) {
        return Outcome::Draw;
    }
    let decisive_total = (pwin + (1.0 - pwin - pdraw)).max(1e-12);
    if rng.bernoulli(pwin / decisive_total) {
        Outcome::WhiteWin
    } else {
        Outcome::BlackWin
    }
}
