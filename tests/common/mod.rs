use std::sync::Once;

use ordo_core::{Competitor, Game, Outcome};

static INIT: Once = Once::new();

/// Initializes the test-run tracing subscriber at WARN level, once per
/// process.
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_env_filter("warn").try_init();
    });
}

/// A named competitor, for tests that want readable names in assertion
/// failures rather than `P0`/`P1`.
#[allow(dead_code)]
pub fn competitor(name: &str) -> Competitor {
    Competitor::new(name)
}

/// Several named competitors at once, in the given order.
#[allow(dead_code)]
pub fn competitors(names: &[&str]) -> Vec<Competitor> {
    names.iter().map(|n| competitor(n)).collect()
}

/// A single game between two competitor indices.
#[allow(dead_code)]
pub fn game(white: usize, black: usize, outcome: Outcome) -> Game {
    Game::new(white, black, outcome)
}

/// A full round robin over `n` competitors where every pair meets exactly
/// once and draws — a degenerate-free baseline every rating sits at
/// `pool_average` for.
#[allow(dead_code)]
pub fn round_robin_draws(n: usize) -> Vec<Game> {
    let mut games = Vec::with_capacity(n * (n - 1) / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            games.push(Game::new(i, j, Outcome::Draw));
        }
    }
    games
}
