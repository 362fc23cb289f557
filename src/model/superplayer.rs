//! Super-player rating estimator: competitors excluded from the main
//! solver because every one of their games went the same way (a perfect
//! score or a perfect blank) still get a displayable rating, found by a
//! fixed-step search for the rating at which their whole sweep is a
//! coin-flip-probable event.

use crate::model::aggregator;
use crate::model::constants::{SUPERPLAYER_CONVERGENCE, SUPERPLAYER_MAX_ITERS, SUPERPLAYER_START, SUPERPLAYER_STEP};
use crate::model::context::{Context, Selectivity};
use crate::model::structures::performance_type::PerformanceType;

/// For every flagged `SuperWinner`/`SuperLoser` competitor, searches for the
/// rating that best explains their full (not NOFLAGGED) record against the
/// rest of the pool, holding every opponent's rating fixed.
///
/// Uses the FULL encounter table rather than NOFLAGGED: a super-player's
/// opponents are frequently other flagged competitors, and dropping those
/// rows would leave nothing to estimate against.
pub fn estimate_super_players(ctx: &mut Context) {
    let full_encounters = aggregator::build_encounters(ctx, Selectivity::Full);

    for j in 0..ctx.n() {
        let perf = ctx.competitors[j].performance_type;
        if perf != PerformanceType::SuperWinner && perf != PerformanceType::SuperLoser {
            continue;
        }

        let touching: Vec<&crate::model::structures::encounter::Encounter> = full_encounters
            .iter()
            .filter(|e| e.white == j || e.black == j)
            .collect();
        if touching.is_empty() {
            continue;
        }

        ctx.competitors[j].rating = search_rating(ctx, j, &touching);
    }
}

/// Fixed-step search with step halving. The target is not a likelihood
/// maximum — a perfect record's likelihood rises monotonically toward an
/// unbounded rating, with no interior maximum to find. Instead this solves
/// for the rating at which the cumulative probability of the observed
/// sweep is exactly one-half (`0.5 - P(r) = 0` for a super-winner,
/// `-0.5 + P(r) = 0` for a super-loser): a median-consistent, Laplace-style
/// estimate rather than an MLE. Starts at `SUPERPLAYER_START`, steps in the
/// direction the residual's sign indicates, and halves the step whenever a
/// step fails to shrink `|residual|`. Terminates once `|residual|` drops
/// below `SUPERPLAYER_CONVERGENCE` or after `SUPERPLAYER_MAX_ITERS`
/// iterations, whichever comes first.
fn search_rating(ctx: &Context, subject: usize, touching: &[&crate::model::structures::encounter::Encounter]) -> f64 {
    let is_winner = ctx.competitors[subject].performance_type == PerformanceType::SuperWinner;

    let mut rating = SUPERPLAYER_START;
    let mut step = SUPERPLAYER_STEP;
    let mut residual = sweep_residual(ctx, subject, rating, touching, is_winner);

    for _ in 0..SUPERPLAYER_MAX_ITERS {
        if residual.abs() < SUPERPLAYER_CONVERGENCE {
            break;
        }

        let candidate = rating + residual.signum() * step;
        let candidate_residual = sweep_residual(ctx, subject, candidate, touching, is_winner);

        if candidate_residual.abs() < residual.abs() {
            rating = candidate;
            residual = candidate_residual;
        } else {
            step *= 0.5;
        }
    }

    rating
}

/// `0.5 - P(r)` for a super-winner, `P(r) - 0.5` for a super-loser, where
/// `P(r) = Π P_outcome(r - opp_i ± wadv)^weight_i` is the cumulative
/// probability of `subject`'s entire sweep at candidate rating `r`, holding
/// every opponent's rating fixed. `P_outcome` is the three-outcome model's
/// `pwin` (super-winner) or `plos` (super-loser) component, consistent with
/// the encounter's wscore having landed entirely on one side.
fn sweep_residual(
    ctx: &Context,
    subject: usize,
    rating: f64,
    touching: &[&crate::model::structures::encounter::Encounter],
    is_winner: bool
) -> f64 {
    let p = sweep_probability(ctx, subject, rating, touching, is_winner);
    if is_winner {
        0.5 - p
    } else {
        p - 0.5
    }
}

/// Cumulative sweep probability, computed in log space (`cume` sums
/// `weight * ln(p)` rather than multiplying raw probabilities) so a long
/// sweep of close games can't underflow the running product to zero before
/// the final exponentiation.
fn sweep_probability(
    ctx: &Context,
    subject: usize,
    rating: f64,
    touching: &[&crate::model::structures::encounter::Encounter],
    is_winner: bool
) -> f64 {
    let mut cume = 0.0;

    for e in touching.iter() {
        let dr = if e.white == subject {
            rating + ctx.white_advantage - ctx.competitors[e.black].rating
        } else {
            rating - (ctx.competitors[e.white].rating + ctx.white_advantage)
        };

        let (pwin, _pdraw, plos) = ctx.score_model.predict3(dr);
        let p_outcome = (if is_winner { pwin } else { plos }).clamp(1e-300, 1.0);
        cume += e.played as f64 * p_outcome.ln();
    }

    cume.exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::flagging;
    use crate::model::structures::{competitor::Competitor, config::RatingConfig, game::{Game, Outcome}};

    fn ctx_for(games: Vec<Game>, n: usize) -> Context {
        let competitors = (0..n).map(|i| Competitor::new(format!("P{i}"))).collect();
        let config = RatingConfig::new(2000.0, 202.0, 0.5);
        Context::try_new(competitors, games, vec![None; n], vec![], config).unwrap()
    }

    #[test]
    fn super_winner_ends_up_above_the_field() {
        let games = vec![
            Game::new(0, 1, Outcome::WhiteWin),
            Game::new(0, 2, Outcome::WhiteWin),
            Game::new(1, 2, Outcome::Draw)
        ];
        let mut ctx = ctx_for(games, 3);
        flagging::set_super_players(&mut ctx);
        flagging::purge(&mut ctx);
        assert_eq!(ctx.competitors[0].performance_type, PerformanceType::SuperWinner);

        estimate_super_players(&mut ctx);
        assert!(ctx.competitors[0].rating > SUPERPLAYER_START);
    }

    #[test]
    fn super_loser_ends_up_below_the_field() {
        let games = vec![
            Game::new(1, 0, Outcome::WhiteWin),
            Game::new(2, 0, Outcome::WhiteWin),
            Game::new(1, 2, Outcome::Draw)
        ];
        let mut ctx = ctx_for(games, 3);
        flagging::set_super_players(&mut ctx);
        flagging::purge(&mut ctx);
        assert_eq!(ctx.competitors[0].performance_type, PerformanceType::SuperLoser);

        estimate_super_players(&mut ctx);
        assert!(ctx.competitors[0].rating < SUPERPLAYER_START);
    }

    #[test]
    fn normal_competitors_are_left_untouched() {
        let games = vec![Game::new(0, 1, Outcome::Draw), Game::new(1, 2, Outcome::Draw)];
        let mut ctx = ctx_for(games, 3);
        ctx.competitors[1].rating = 1234.5;
        flagging::set_super_players(&mut ctx);
        flagging::purge(&mut ctx);

        estimate_super_players(&mut ctx);
        assert_eq!(ctx.competitors[1].rating, 1234.5);
    }
}
