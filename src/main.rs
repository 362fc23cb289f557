mod args;

use std::fs;

use clap::Parser;
use indexmap::IndexMap;
use ordo_core::model::structures::{competitor::Competitor, game::{Game, Outcome}};
use ordo_core::rng::ChaChaRng;
use ordo_core::{model, utils};
use tracing_subscriber::EnvFilter;

use crate::args::Args;

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let contents = fs::read_to_string(&args.input).unwrap_or_else(|e| {
        tracing::error!(path = %args.input, error = %e, "failed to read input file");
        std::process::exit(1);
    });

    let (competitors, games) = parse_games(&contents);
    tracing::info!(n_competitors = competitors.len(), n_games = games.len(), "loaded game list");

    let bar = if args.quiet { None } else { Some(utils::progress_utils::progress_bar(games.len() as u64)) };
    if let Some(bar) = &bar {
        bar.finish_and_clear();
    }

    let config = args.to_config();
    let mut rng = ChaChaRng::from_seed(args.seed);

    match model::run_pipeline(competitors, games, vec![], vec![], config, &mut rng) {
        Ok(result) => print_result(&result),
        Err(e) => {
            tracing::error!(error = %e, "pipeline failed");
            std::process::exit(1);
        }
    }
}

/// Parses `white black outcome` lines (whitespace-separated, `#`-prefixed
/// comments and blank lines skipped) into a competitor table keyed by
/// first-seen order and a game list with resolved indices.
fn parse_games(contents: &str) -> (Vec<Competitor>, Vec<Game>) {
    // First-seen order matters (it's the order competitors land in the
    // table), so an insertion-ordered map replaces the usual `HashMap`.
    let mut index_of: IndexMap<String, usize> = IndexMap::new();
    let mut competitors = Vec::new();
    let mut games = Vec::new();

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut parts = line.split_whitespace();
        let (Some(white), Some(black), Some(outcome)) = (parts.next(), parts.next(), parts.next()) else {
            tracing::warn!(line, "skipping malformed line");
            continue;
        };

        let white_idx = *index_of.entry(white.to_string()).or_insert_with(|| {
            competitors.push(Competitor::new(white));
            competitors.len() - 1
        });
        let black_idx = *index_of.entry(black.to_string()).or_insert_with(|| {
            competitors.push(Competitor::new(black));
            competitors.len() - 1
        });

        let outcome = match outcome {
            "W" => Outcome::WhiteWin,
            "D" => Outcome::Draw,
            "B" => Outcome::BlackWin,
            "X" => Outcome::Discard,
            other => {
                tracing::warn!(outcome = other, line, "unknown outcome, skipping line");
                continue;
            }
        };

        games.push(Game::new(white_idx, black_idx, outcome));
    }

    (competitors, games)
}

fn print_result(result: &model::structures::rating_result::RatingResult) {
    println!("white advantage: {:.2} (+/- {:.2})", result.white_advantage, result.white_advantage_sdev);
    println!("converged: {}", result.converged);
    println!();

    for c in &result.competitors {
        let symbol = model::reporting::performance_symbol(c.performance_type).unwrap_or(' ');
        println!(
            "{:<24} {:>8.2} {} (+/- {:.2})  {:.1}/{}",
            c.name, c.rating, symbol, c.sdev, c.obtained, c.playedby
        );
    }

    if !result.groups.is_empty() {
        println!();
        println!("connected groups (strongest first):");
        for (i, group) in result.groups.iter().enumerate() {
            println!("  group {i}: {} competitor(s)", group.participants.len());
        }
    }
}
