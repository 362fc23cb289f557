//! Flagging / purge loop: competitors whose effective record is degenerate
//! (all-win or all-loss against the currently non-flagged pool) cannot
//! receive a finite gradient from the solver and are temporarily excluded
//! from it.

use crate::model::aggregator;
use crate::model::constants::FLAG_EPSILON;
use crate::model::context::{Context, Selectivity};
use crate::model::structures::performance_type::PerformanceType;

/// Tags each competitor's `performance_type` once, from the FULL-selectivity
/// encounter table: NOGAMES if they never played, SUPERLOSER if they never
/// scored, SUPERWINNER if they never failed to score, NORMAL otherwise.
/// Called once per pipeline run, before the purge loop.
pub fn set_super_players(ctx: &mut Context) {
    let encounters = aggregator::build_encounters(ctx, Selectivity::Full);
    let (obtained, playedby) = aggregator::calc_obtained_playedby(&encounters, ctx.n());

    for j in 0..ctx.n() {
        ctx.competitors[j].performance_type = if playedby[j] == 0.0 {
            PerformanceType::NoGames
        } else if obtained[j] < FLAG_EPSILON {
            PerformanceType::SuperLoser
        } else if playedby[j] - obtained[j] < FLAG_EPSILON {
            PerformanceType::SuperWinner
        } else {
            PerformanceType::Normal
        };
    }
}

/// Clears the transient `flagged` bit on every competitor, preserving
/// `performance_type` (used before each simulation replicate).
pub fn clear_flags(ctx: &mut Context) {
    for c in &mut ctx.competitors {
        c.flagged = false;
    }
}

/// Repeatedly rebuilds the NOFLAGGED encounter table and flags any
/// non-flagged competitor with a degenerate effective record, until a full
/// pass flags nothing.
pub fn purge(ctx: &mut Context) {
    loop {
        aggregator::refresh(ctx, Selectivity::NoFlagged);

        let mut flagged_any = false;
        for j in 0..ctx.n() {
            if ctx.competitors[j].flagged {
                continue;
            }
            let obtained = ctx.obtained[j];
            let playedby = ctx.playedby[j];
            if obtained < FLAG_EPSILON || (playedby - obtained) < FLAG_EPSILON {
                ctx.competitors[j].flagged = true;
                flagged_any = true;
            }
        }

        if !flagged_any {
            break;
        }
    }
}
