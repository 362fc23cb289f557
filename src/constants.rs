//! Default values for the knobs described in the external interface.
//!
//! A small plain struct of defaults, built by a free function, consumed by
//! both the demo CLI and by tests that want a sane baseline configuration.

pub struct RatingDefaults {
    pub pool_average: f64,
    pub white_advantage: f64,
    pub adjust_white_advantage: bool,
    pub rtng_at_76pct: f64,
    pub draw_rate_eq: f64,
    pub simulate: u32,
    pub confidence_pct: f64,
    pub min_games_to_report: u32,
    pub quiet: bool
}

pub fn default_constants() -> RatingDefaults {
    RatingDefaults {
        pool_average: 2000.0,
        white_advantage: 0.0,
        adjust_white_advantage: false,
        rtng_at_76pct: 202.0,
        draw_rate_eq: 0.5,
        simulate: 0,
        confidence_pct: 95.0,
        min_games_to_report: 0,
        quiet: false
    }
}
