//! Reporting projections: turns the raw `Context` state plus a completed
//! simulation into the sorted, display-ready `RatingResult`, filtering out
//! competitors below the configured minimum game count.

use crate::model::aggregator;
use crate::model::context::Context;
use crate::model::simulation::{confidence_to_z_factor, SimulationResult};
use crate::model::structures::encounter::Encounter;
use crate::model::structures::performance_type::PerformanceType;
use crate::model::structures::rating_result::{CompetitorResult, RatingResult};

/// Rounds `value` to `places` decimal digits — used so displayed ratings
/// and sdevs don't carry spurious floating-point noise.
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

/// The single-character symbol reporting tools conventionally show next
/// to a super-player's rating: `+` for a perfect scorer, `-` for a
/// perfect non-scorer, `?` for anyone whose record couldn't be classified
/// at all (no games played).
pub fn performance_symbol(performance_type: PerformanceType) -> Option<char> {
    match performance_type {
        PerformanceType::SuperWinner => Some('+'),
        PerformanceType::SuperLoser => Some('-'),
        PerformanceType::NoGames => Some('?'),
        PerformanceType::Normal => None
    }
}

/// Builds the final `RatingResult`, sorted by rating descending, with
/// competitors under `min_games_to_report` dropped from the per-competitor
/// list (the pairwise sdev matrix and groups are left intact — they are
/// indexed by the original competitor ids, not the filtered list).
pub fn build_rating_result(
    ctx: &Context,
    full_encounters: &[Encounter],
    simulation: Option<&SimulationResult>,
    converged: bool,
    groups: Vec<crate::model::structures::group::FinalGroup>
) -> RatingResult {
    let min_games = ctx.config.min_games_to_report;

    // `ctx.obtained`/`ctx.playedby` reflect whatever selectivity the solver
    // last refreshed them under (NOFLAGGED), which excludes every flagged
    // competitor's own games entirely — wrong for reporting, where a
    // super-player's real record still needs to be shown. Recompute from
    // the FULL encounter table instead.
    let (obtained, playedby) = aggregator::calc_obtained_playedby(full_encounters, ctx.n());

    // Raw sdevs from the simulation are per-replicate standard deviations;
    // the reported interval multiplies by the z-factor for the requested
    // confidence level.
    let z = confidence_to_z_factor(ctx.config.confidence_pct);

    let mut competitors: Vec<CompetitorResult> = ctx
        .competitors
        .iter()
        .enumerate()
        .filter(|(j, _)| min_games == 0 || playedby.get(*j).copied().unwrap_or(0.0) >= min_games as f64)
        .map(|(j, c)| CompetitorResult {
            name: c.name.clone(),
            rating: round_to(c.rating, 2),
            sdev: simulation.map(|s| round_to(s.rating_sdev[j] * z, 2)).unwrap_or(0.0),
            obtained: obtained.get(j).copied().unwrap_or(0.0),
            playedby: playedby.get(j).copied().unwrap_or(0.0) as u32,
            performance_type: c.performance_type,
            flagged: c.flagged
        })
        .collect();

    competitors.sort_by(|a, b| b.rating.partial_cmp(&a.rating).unwrap_or(std::cmp::Ordering::Equal));

    let pairwise_sdev = match simulation {
        Some(s) => {
            let mut scaled = crate::model::structures::rating_result::TriangularMatrix::zeros(ctx.n());
            for i in 0..ctx.n() {
                for j in 0..i {
                    *scaled.get_mut(i, j) = s.pairwise_sdev.get(i, j) * z;
                }
            }
            scaled
        }
        None => crate::model::structures::rating_result::TriangularMatrix::zeros(ctx.n())
    };

    RatingResult {
        competitors,
        white_advantage: round_to(ctx.white_advantage, 2),
        white_advantage_sdev: simulation.map(|s| round_to(s.white_advantage_sdev * z, 2)).unwrap_or(0.0),
        draw_rate: ctx.config.draw_rate_eq,
        draw_rate_sdev: simulation.map(|s| s.draw_rate_sdev * z).unwrap_or(0.0),
        pairwise_sdev,
        groups,
        converged
    }
}
