//! Encounter aggregator: folds raw games into a canonical per-pair table,
//! plus the two projections the solver needs every iteration.

use crate::model::context::{Context, Selectivity};
use crate::model::structures::encounter::Encounter;
use crate::model::structures::game::Outcome;
use itertools::Itertools;

/// Scans `games`, skips `Discard` (and, under `NoFlagged`, any game
/// touching a flagged competitor), emits one singleton encounter per
/// surviving game, then sorts and coalesces by `(white, black)`.
///
/// Idempotent for the same inputs; after return, `Σ encounters.played`
/// equals the count of non-skipped games, and at most one row exists per
/// ordered pair.
pub fn build_encounters(ctx: &Context, selectivity: Selectivity) -> Vec<Encounter> {
    let skip_flagged = selectivity == Selectivity::NoFlagged;

    let singletons = ctx.games.iter().filter_map(|g| {
        if g.outcome == Outcome::Discard {
            return None;
        }
        if skip_flagged && (ctx.competitors[g.white].flagged || ctx.competitors[g.black].flagged) {
            return None;
        }
        let (w, d, l) = match g.outcome {
            Outcome::WhiteWin => (1, 0, 0),
            Outcome::Draw => (0, 1, 0),
            Outcome::BlackWin => (0, 0, 1),
            Outcome::Discard => unreachable!()
        };
        Some(Encounter::singleton(g.white, g.black, w, d, l))
    });

    singletons
        .sorted_by_key(|e| (e.white, e.black))
        .coalesce(|mut acc, next| {
            if acc.white == next.white && acc.black == next.black {
                acc.merge(&next);
                Ok(acc)
            } else {
                Err((acc, next))
            }
        })
        .collect()
}

/// For each competitor `j`: `obtained[j]` and `playedby[j]` summed across
/// every encounter where `j` plays white or black.
pub fn calc_obtained_playedby(encounters: &[Encounter], n: usize) -> (Vec<f64>, Vec<f64>) {
    let mut obtained = vec![0.0; n];
    let mut playedby = vec![0.0; n];

    for e in encounters {
        obtained[e.white] += e.wscore;
        playedby[e.white] += e.played as f64;

        obtained[e.black] += e.played as f64 - e.wscore;
        playedby[e.black] += e.played as f64;
    }

    (obtained, playedby)
}

/// For each encounter, predicts the two-outcome score with the current
/// ratings and white advantage, accumulating into `expected`.
pub fn calc_expected(ctx: &Context, encounters: &[Encounter]) -> Vec<f64> {
    let mut expected = vec![0.0; ctx.n()];

    for e in encounters {
        let f = ctx
            .score_model
            .predict(ctx.competitors[e.white].rating + ctx.white_advantage, ctx.competitors[e.black].rating);
        expected[e.white] += e.played as f64 * f;
        expected[e.black] += e.played as f64 * (1.0 - f);
    }

    expected
}

/// Rebuilds `ctx.encounters`, `ctx.obtained`, `ctx.playedby`, and
/// `ctx.expected` in one pass, as the solver does at the start of every
/// call.
pub fn refresh(ctx: &mut Context, selectivity: Selectivity) {
    let encounters = build_encounters(ctx, selectivity);
    let (obtained, playedby) = calc_obtained_playedby(&encounters, ctx.n());
    let expected = calc_expected(ctx, &encounters);

    ctx.encounters = encounters;
    ctx.obtained = obtained;
    ctx.playedby = playedby;
    ctx.expected = expected;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::structures::{competitor::Competitor, config::RatingConfig, game::Game, prior::Prior};
    use approx::assert_abs_diff_eq;

    fn ctx_for(games: Vec<Game>, n: usize) -> Context {
        let competitors = (0..n).map(|i| Competitor::new(format!("P{i}"))).collect();
        let config = RatingConfig::new(2000.0, 202.0, 0.5);
        Context::try_new(competitors, games, vec![None; n], vec![], config).unwrap()
    }

    #[test]
    fn singleton_games_coalesce() {
        let games = vec![
            Game::new(0, 1, Outcome::WhiteWin),
            Game::new(0, 1, Outcome::Draw),
            Game::new(1, 0, Outcome::WhiteWin)
        ];
        let ctx = ctx_for(games, 2);
        let encounters = build_encounters(&ctx, Selectivity::Full);

        assert_eq!(encounters.len(), 2);
        let e01 = encounters.iter().find(|e| e.white == 0 && e.black == 1).unwrap();
        assert_eq!(e01.w, 1);
        assert_eq!(e01.d, 1);
        assert_eq!(e01.played, 2);
        assert_abs_diff_eq!(e01.wscore, 1.5);

        let e10 = encounters.iter().find(|e| e.white == 1 && e.black == 0).unwrap();
        assert_eq!(e10.w, 1);
        assert_eq!(e10.played, 1);
    }

    #[test]
    fn discard_is_skipped() {
        let games = vec![Game::new(0, 1, Outcome::Discard), Game::new(0, 1, Outcome::WhiteWin)];
        let ctx = ctx_for(games, 2);
        let encounters = build_encounters(&ctx, Selectivity::Full);
        assert_eq!(encounters.len(), 1);
        assert_eq!(encounters[0].played, 1);
    }

    #[test]
    fn no_flagged_skips_flagged_competitors() {
        let games = vec![Game::new(0, 1, Outcome::WhiteWin), Game::new(1, 2, Outcome::WhiteWin)];
        let mut ctx = ctx_for(games, 3);
        ctx.competitors[1].flagged = true;

        let encounters = build_encounters(&ctx, Selectivity::NoFlagged);
        assert!(encounters.is_empty());

        let encounters_full = build_encounters(&ctx, Selectivity::Full);
        assert_eq!(encounters_full.len(), 2);
    }

    #[test]
    fn obtained_in_range() {
        let games = vec![Game::new(0, 1, Outcome::WhiteWin), Game::new(1, 0, Outcome::Draw)];
        let ctx = ctx_for(games, 2);
        let encounters = build_encounters(&ctx, Selectivity::Full);
        let (obtained, playedby) = calc_obtained_playedby(&encounters, 2);

        for j in 0..2 {
            assert!(obtained[j] >= 0.0 && obtained[j] <= playedby[j]);
        }
    }

    #[test]
    fn prior_sigma_below_floor_is_rejected() {
        let config = RatingConfig::new(2000.0, 202.0, 0.5);
        let competitors = vec![Competitor::new("A"), Competitor::new("B")];
        let priors = vec![None, Some(Prior { value: 2000.0, sigma: 1e-9 })];
        let err = Context::try_new(competitors, vec![], priors, vec![], config).unwrap_err();
        assert!(matches!(err, crate::error::CoreError::SigmaTooSmall { .. }));
    }
}
