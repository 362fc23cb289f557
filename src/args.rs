use clap::Parser;

/// Command-line knobs for the demo binary. Mirrors `RatingConfig`, plus
/// the handful of settings that only make sense for a CLI run (an input
/// file path, a random seed).
#[derive(Parser, Clone, Debug)]
#[command(
    display_name = "ordo-core",
    author,
    long_about = "Fits pairwise ratings to a table of game outcomes"
)]
pub struct Args {
    /// Path to a game list. One line per game: `white black outcome`,
    /// where outcome is one of `W`, `D`, `B`, or `X` (discard).
    #[arg(short, long)]
    pub input: String,

    /// Target mean rating for non-flagged, non-anchored competitors.
    #[arg(long, default_value_t = 2000.0)]
    pub pool_average: f64,

    /// 0-based index of the competitor to hold fixed at `pool_average`.
    #[arg(long)]
    pub anchor: Option<usize>,

    /// Initial white-side rating bonus.
    #[arg(long, default_value_t = 0.0)]
    pub white_advantage: f64,

    /// Refit the white-advantage term instead of holding it fixed.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub adjust_white_advantage: bool,

    /// Monte Carlo replicate count. Values below 2 disable sdev output.
    #[arg(long, default_value_t = 0)]
    pub simulate: u32,

    /// Confidence level in (50, 100) used to scale the reported sdevs.
    #[arg(long, default_value_t = 95.0)]
    pub confidence_pct: f64,

    /// Competitors with fewer games than this are dropped from the report.
    #[arg(long, default_value_t = 0)]
    pub min_games_to_report: u32,

    /// Seed for the deterministic simulation RNG.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Suppress progress bars.
    #[arg(short, long, action = clap::ArgAction::SetTrue)]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(
        long,
        env = "RUST_LOG",
        default_value = "info",
        value_parser = ["trace", "debug", "info", "warn", "error"]
    )]
    pub log_level: String
}

impl Args {
    pub fn to_config(&self) -> ordo_core::RatingConfig {
        let defaults = ordo_core::constants::default_constants();
        ordo_core::RatingConfig {
            pool_average: self.pool_average,
            anchor: self.anchor,
            white_advantage: self.white_advantage,
            adjust_white_advantage: self.adjust_white_advantage,
            rtng_at_76pct: defaults.rtng_at_76pct,
            draw_rate_eq: defaults.draw_rate_eq,
            simulate: self.simulate,
            confidence_pct: self.confidence_pct,
            min_games_to_report: self.min_games_to_report,
            quiet: self.quiet
        }
    }
}
