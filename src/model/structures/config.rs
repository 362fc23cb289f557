use serde::{Deserialize, Serialize};

/// The configuration knobs recognized by the core. Plain, serde-derived,
/// with a `Default` impl.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingConfig {
    /// Target mean rating for non-flagged, non-anchored competitors.
    pub pool_average: f64,
    /// Index of the competitor whose rating is held fixed, if any. Name
    /// resolution from a free-form label is an external collaborator's job;
    /// the core only ever sees a resolved index.
    pub anchor: Option<usize>,
    /// Initial (and, unless `adjust_white_advantage`, final) white-side
    /// rating bonus.
    pub white_advantage: f64,
    pub adjust_white_advantage: bool,
    /// Calibrates BETA: the rating gap that corresponds to a 76% win rate.
    pub rtng_at_76pct: f64,
    /// Draw probability between equally-rated opponents.
    pub draw_rate_eq: f64,
    /// Requested Monte Carlo replicate count. Values below 2 disable sdev
    /// computation entirely.
    pub simulate: u32,
    /// Confidence level in (50, 100), converted to a z-factor via the
    /// inverse Gaussian CDF.
    pub confidence_pct: f64,
    /// Competitors with fewer recorded games than this are filtered from
    /// the reporting projection, never from the solve itself.
    pub min_games_to_report: u32,
    /// Controls progress-bar output only; never affects `tracing` events.
    pub quiet: bool
}

impl RatingConfig {
    pub fn new(pool_average: f64, rtng_at_76pct: f64, draw_rate_eq: f64) -> Self {
        RatingConfig {
            pool_average,
            anchor: None,
            white_advantage: 0.0,
            adjust_white_advantage: false,
            rtng_at_76pct,
            draw_rate_eq,
            simulate: 0,
            confidence_pct: 95.0,
            min_games_to_report: 0,
            quiet: false
        }
    }
}

impl Default for RatingConfig {
    fn default() -> Self {
        let defaults = crate::constants::default_constants();
        RatingConfig {
            pool_average: defaults.pool_average,
            anchor: None,
            white_advantage: defaults.white_advantage,
            adjust_white_advantage: defaults.adjust_white_advantage,
            rtng_at_76pct: defaults.rtng_at_76pct,
            draw_rate_eq: defaults.draw_rate_eq,
            simulate: defaults.simulate,
            confidence_pct: defaults.confidence_pct,
            min_games_to_report: defaults.min_games_to_report,
            quiet: defaults.quiet
        }
    }
}
