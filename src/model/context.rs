//! The `Context` object: every competitor/encounter array a pipeline run
//! needs, owned in one place and passed around by `&mut` reference rather
//! than kept as fixed-size global state.

use crate::error::{CoreError, CoreResult};
use crate::model::constants::SIGMA_FLOOR;
use crate::model::expected_score::ScoreModel;
use crate::model::structures::{
    competitor::Competitor,
    config::RatingConfig,
    encounter::Encounter,
    game::Game,
    prior::{Prior, RelativePrior}
};

/// Selectivity for encounter aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selectivity {
    /// All non-discarded games, regardless of flag state.
    Full,
    /// Skip any game touching a flagged competitor.
    NoFlagged
}

/// Owns every per-competitor and per-encounter array for one pipeline run.
/// Nothing here is global; everything is sized to `competitors.len()` and
/// `games.len()`.
pub struct Context {
    pub competitors: Vec<Competitor>,
    pub games: Vec<Game>,
    pub priors: Vec<Option<Prior>>,
    pub relative_priors: Vec<RelativePrior>,
    pub config: RatingConfig,
    pub white_advantage: f64,
    pub score_model: ScoreModel,

    /// Canonical encounter table, rebuilt by `aggregator::build_encounters`
    /// whenever the flag set or game outcomes change.
    pub encounters: Vec<Encounter>,
    /// Per-competitor observed score, keyed by competitor index.
    pub obtained: Vec<f64>,
    /// Per-competitor games played, keyed by competitor index.
    pub playedby: Vec<f64>,
    /// Per-competitor model-expected score, keyed by competitor index.
    pub expected: Vec<f64>
}

impl Context {
    /// Validates inputs and preflights the dominant allocation before
    /// touching anything else, so an out-of-memory condition is reported
    /// as an error rather than an abort.
    pub fn try_new(
        competitors: Vec<Competitor>,
        games: Vec<Game>,
        priors: Vec<Option<Prior>>,
        relative_priors: Vec<RelativePrior>,
        config: RatingConfig
    ) -> CoreResult<Self> {
        let n = competitors.len();

        // Allocate the dominant O(N^2) shape first. The simulation driver
        // owns the real triangular accumulator; here we just preflight that
        // a buffer of that size is obtainable before doing any other work.
        let pair_count = n.saturating_sub(1) * n / 2;
        let mut probe: Vec<f64> = Vec::new();
        probe
            .try_reserve_exact(pair_count)
            .map_err(|_| CoreError::Allocation { n_players: n })?;
        drop(probe);

        for (index, game) in games.iter().enumerate() {
            if game.white >= n {
                return Err(CoreError::InvalidCompetitorIndex {
                    index,
                    competitor: game.white,
                    n_players: n
                });
            }
            if game.black >= n {
                return Err(CoreError::InvalidCompetitorIndex {
                    index,
                    competitor: game.black,
                    n_players: n
                });
            }
            if game.white == game.black {
                return Err(CoreError::SelfPlay {
                    index,
                    competitor: game.white
                });
            }
        }

        if let Some(anchor) = config.anchor {
            if anchor >= n {
                return Err(CoreError::UnknownAnchor(anchor));
            }
        }

        for (index, prior) in priors.iter().enumerate() {
            if let Some(prior) = prior {
                if prior.sigma < 0.0 || (prior.sigma > 0.0 && prior.sigma < SIGMA_FLOOR) {
                    return Err(CoreError::SigmaTooSmall {
                        sigma: prior.sigma,
                        floor: SIGMA_FLOOR
                    });
                }
            }
            let _ = index;
        }
        if priors.len() != n && !priors.is_empty() {
            return Err(CoreError::UnknownPriorCompetitor(priors.len().min(n)));
        }

        for rp in &relative_priors {
            if rp.player_a >= n {
                return Err(CoreError::UnknownRelativePriorCompetitor(rp.player_a));
            }
            if rp.player_b >= n {
                return Err(CoreError::UnknownRelativePriorCompetitor(rp.player_b));
            }
            if rp.sigma < SIGMA_FLOOR {
                return Err(CoreError::SigmaTooSmall {
                    sigma: rp.sigma,
                    floor: SIGMA_FLOOR
                });
            }
        }

        let mut competitors = competitors;
        // Every competitor starts at the pool average; the solver then
        // adjusts non-flagged, non-fixed competitors away from it. Without
        // this, a perfectly balanced initial residual (e.g. an all-draws
        // round robin) would converge in zero iterations and leave ratings
        // at whatever placeholder value the caller constructed them with,
        // instead of the mean of non-flagged ratings equaling pool_average.
        for c in competitors.iter_mut() {
            c.rating = config.pool_average;
        }
        if let Some(anchor) = config.anchor {
            competitors[anchor].prefed = true;
        }
        for (i, prior) in priors.iter().enumerate() {
            if let Some(prior) = prior {
                if prior.is_hard() {
                    competitors[i].prefed = true;
                    competitors[i].rating = prior.value;
                }
            }
        }

        let white_advantage = config.white_advantage;
        let score_model = ScoreModel::new(config.rtng_at_76pct, config.draw_rate_eq);

        Ok(Context {
            competitors,
            games,
            priors,
            relative_priors,
            config,
            white_advantage,
            score_model,
            encounters: Vec::new(),
            obtained: vec![0.0; n],
            playedby: vec![0.0; n],
            expected: vec![0.0; n]
        })
    }

    pub fn n(&self) -> usize {
        self.competitors.len()
    }

    pub fn has_priors(&self) -> bool {
        self.priors.iter().any(Option::is_some) || !self.relative_priors.is_empty()
    }

    /// Mean rating over non-flagged competitors, used by the anchor-free
    /// renormalization step of the solver.
    pub fn mean_non_flagged_rating(&self) -> f64 {
        let (sum, count) = self
            .competitors
            .iter()
            .filter(|c| !c.flagged)
            .fold((0.0, 0usize), |(sum, count), c| (sum + c.rating, count + 1));
        if count == 0 {
            self.config.pool_average
        } else {
            sum / count as f64
        }
    }
}
