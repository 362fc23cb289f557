//! White-advantage optimizer: finds the additive rating bonus for the
//! white side that minimizes the sum-of-squared error between predicted
//! and observed score across every non-flagged encounter, by a three-point
//! bracket descent rather than a closed-form fit (the error surface isn't
//! quadratic once draws are folded in).

use crate::model::aggregator;
use crate::model::constants::{WADV_INITIAL_DELTA, WADV_MIN_DELTA, WADV_SAFETY_STOP};
use crate::model::context::{Context, Selectivity};

/// Repeatedly evaluates the SSE at `w - step`, `w`, `w + step` and walks
/// toward whichever neighbor is lower, halving `step` when neither
/// neighbor improves on the center. Stops once `step` drops below
/// `WADV_MIN_DELTA` or `|w|` would exceed `WADV_SAFETY_STOP`.
///
/// Leaves `ctx.white_advantage` at the optimum and `ctx.expected`
/// recomputed against it; does not touch competitor ratings.
pub fn optimize_white_advantage(ctx: &mut Context) {
    aggregator::refresh(ctx, Selectivity::NoFlagged);

    let mut w = ctx.white_advantage;
    let mut step = WADV_INITIAL_DELTA;
    let mut sse = sum_squared_error(ctx, w);

    while step.abs() >= WADV_MIN_DELTA {
        if (w + step).abs() > WADV_SAFETY_STOP && (w - step).abs() > WADV_SAFETY_STOP {
            break;
        }

        let up = sum_squared_error(ctx, w + step);
        let down = sum_squared_error(ctx, w - step);

        if up < sse && up <= down {
            w += step;
            sse = up;
        } else if down < sse {
            w -= step;
            sse = down;
        } else {
            step *= 0.5;
        }
    }

    ctx.white_advantage = w;
    ctx.expected = aggregator::calc_expected(ctx, &ctx.encounters);
}

/// Sum over every non-flagged encounter of `played * (wscore/played -
/// predict(white + w, black))^2`, i.e. the white-side prediction error.
fn sum_squared_error(ctx: &Context, w: f64) -> f64 {
    let mut total = 0.0;
    for e in &ctx.encounters {
        let observed = e.wscore / e.played as f64;
        let predicted = ctx.score_model.predict(ctx.competitors[e.white].rating + w, ctx.competitors[e.black].rating);
        let diff = observed - predicted;
        total += e.played as f64 * diff * diff;
    }
    total
}
