//! Tuning constants for the numeric core: hand-tuned scalars governing the
//! convergence solver, the flagging/purge loop, the super-player estimator,
//! the white-advantage optimizer, and the draw-concentration fit.

/// Outer phases of the convergence solver.
pub const OUTER_PHASES: u32 = 20;
/// Inner rounds per outer phase.
pub const INNER_ROUNDS: u32 = 10_000;
/// Initial coordinate-descent step size.
pub const INITIAL_DELTA: f64 = 200.0;
/// Initial damping coefficient.
pub const INITIAL_KAPPA: f64 = 0.05;
/// `delta` halves / `kappa` doubles once per outer phase.
pub const PHASE_HALVING_FACTOR: f64 = 2.0;
/// Within-phase slow damping amplifier applied to `kk` each inner round.
pub const KK_DECAY: f64 = 0.995;
/// Normalized-residual threshold that ends both loops early.
pub const RESIDUAL_CONVERGENCE: f64 = 1e-6;

/// Degenerate-record threshold used by the flagging/purge loop.
pub const FLAG_EPSILON: f64 = 1e-3;

/// Floor under which a prior's sigma is rejected as ill-specified.
pub const SIGMA_FLOOR: f64 = 1e-6;

/// Super-player estimator: starting point, step, iteration cap and
/// convergence threshold.
pub const SUPERPLAYER_START: f64 = 2000.0;
pub const SUPERPLAYER_STEP: f64 = 200.0;
pub const SUPERPLAYER_MAX_ITERS: u32 = 2000;
pub const SUPERPLAYER_CONVERGENCE: f64 = 1e-10;

/// White-advantage optimizer: initial bracket half-width, minimum
/// half-width before stopping, and the safety stop on `|w|`.
pub const WADV_INITIAL_DELTA: f64 = 100.0;
pub const WADV_MIN_DELTA: f64 = 0.01;
pub const WADV_SAFETY_STOP: f64 = 1000.0;

/// Closed-form draw-concentration fit constants.
pub const DRAW_CONCENTRATION_BASE: f64 = 0.5;
pub const DRAW_CONCENTRATION_SCALE: f64 = 1.23;
pub const DRAW_CONCENTRATION_DECAY: f64 = 175.0;
