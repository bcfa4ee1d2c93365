use std::error::Error;

use forkline_core::{Budget, GameState, Mcts, SearchConfig, Strategy};
use forkline_games::{Nim, NimHeuristic};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Self-play Nim with every move chosen by a fresh search.
///
/// Usage: `cargo run -p forkline-games --example nim_search -- [strategy] [iterations]`
/// where strategy is one of `ucb1`, `thompson_sampling`, `rave_ucb1`, `rave_thompson`.
/// Set `RUST_LOG=forkline_core=debug` to see the search's own logs.
fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let strategy: Strategy = match args.next() {
        Some(name) => serde_yaml::from_str(&name)?,
        None => Strategy::Ucb1,
    };
    let iterations = match args.next() {
        Some(count) => count.parse()?,
        None => 2_000,
    };

    let config = SearchConfig {
        strategy,
        amaf_enabled: matches!(strategy, Strategy::RaveUcb1 | Strategy::RaveThompson),
        budget: Budget::iterations(iterations),
        rollout_length: 30,
        ..SearchConfig::default()
    };
    let heuristic = NimHeuristic {
        position_weight: 0.5,
    };
    let mut mcts = Mcts::new(config, heuristic)?;

    let mut game = Nim::new(vec![3, 4, 5], 3);
    info!(heaps = ?game.heaps(), max_take = game.max_take(), ?strategy, "starting self-play");

    while !game.is_terminal() {
        let player = game.current_player();
        let outcome = mcts.search_with_metrics(&game)?;
        let chosen = outcome.action;
        game = game.apply_action(&chosen);

        info!(
            player = player.index(),
            heap = chosen.heap,
            take = chosen.take,
            heaps = ?game.heaps(),
            grundy_after = game.grundy(),
            iterations = outcome.metrics.iterations,
            nodes = outcome.metrics.node_count,
            "move played"
        );
    }

    if let Some(winner) = game.winner() {
        info!(winner = winner.index(), "game over");
    }
    Ok(())
}
