use std::cell::Cell;

use rand_chacha::ChaCha8Rng;

use crate::{
    ActionId, Budget, Mcts, Recommendation, SearchConfig, Strategy,
    tree::tests::fixtures::{Chain, chain_score},
};

const ALL_STRATEGIES: [Strategy; 4] = [
    Strategy::Ucb1,
    Strategy::ThompsonSampling,
    Strategy::RaveUcb1,
    Strategy::RaveThompson,
];

fn config(strategy: Strategy, iterations: u64) -> SearchConfig {
    SearchConfig {
        strategy,
        amaf_enabled: matches!(strategy, Strategy::RaveUcb1 | Strategy::RaveThompson),
        budget: Budget::iterations(iterations),
        rollout_length: 4,
        ..SearchConfig::default()
    }
}

#[test]
fn default_yaml_matches_default_config() {
    let parsed = SearchConfig::from_default_yaml().expect("bundled config parses");
    assert_eq!(parsed, SearchConfig::default());
}

#[test]
fn same_seed_reproduces_the_same_tree() {
    for strategy in ALL_STRATEGIES {
        let run = || {
            let mut mcts = Mcts::new(config(strategy, 120), chain_score).expect("valid config");
            let outcome = mcts
                .search_with_metrics(&Chain::new(6, 3, 2))
                .expect("search should succeed");
            let json = outcome.tree.snapshot().to_json().expect("snapshot serializes");
            (outcome.action, json)
        };
        assert_eq!(run(), run(), "{strategy:?} is not reproducible");
    }
}

#[test]
fn every_strategy_finds_the_better_single_move() {
    for strategy in ALL_STRATEGIES {
        for recommendation in [Recommendation::MostVisited, Recommendation::BestValue] {
            let config = SearchConfig {
                recommendation,
                ..config(strategy, 200)
            };
            let mut mcts = Mcts::new(config, chain_score).expect("valid config");
            let outcome = mcts
                .search_with_metrics(&Chain::new(1, 2, 1))
                .expect("search should succeed");

            assert_eq!(outcome.tree.strategy(), strategy);
            assert_eq!(outcome.action, 1, "{strategy:?} / {recommendation:?}");
        }
    }
}

#[test]
fn searcher_assumes_the_opponent_minimises() {
    // Opponent moves second; the root player still wants the larger first move.
    let mut mcts = Mcts::new(
        SearchConfig {
            recommendation: Recommendation::BestValue,
            ..config(Strategy::Ucb1, 400)
        },
        chain_score,
    )
    .expect("valid config");
    let outcome = mcts
        .search_with_metrics(&Chain::new(2, 3, 2))
        .expect("search should succeed");

    assert_eq!(outcome.action, 2);
    let root = outcome.tree.node(outcome.tree.root_id()).expect("root");
    let best = root.child(ActionId::from(2)).expect("expanded");
    // From the opponent's point of view the best reply adds nothing.
    let best_node = outcome.tree.node(best).expect("child");
    assert!(best_node.stats().mean() < 3.5);
}

#[test]
fn pruning_flags_weak_children_and_never_recommends_them() {
    let config = SearchConfig {
        pruning_enabled: true,
        prune_alpha: 0.0,
        min_retained: 1,
        prune_visit_threshold: 20,
        ..config(Strategy::Ucb1, 400)
    };
    let mut mcts = Mcts::new(config, chain_score).expect("valid config");
    let mut reported = 0;
    let outcome = mcts
        .run_with_hook(&Chain::new(6, 4, 1), |iteration| reported += iteration.pruned)
        .expect("search should succeed");

    let snapshot = outcome.tree.snapshot();
    let flagged = snapshot.nodes.iter().filter(|node| node.pruned).count();
    assert!(flagged > 0);
    assert_eq!(flagged, reported);

    let root = outcome.tree.node(outcome.tree.root_id()).expect("root");
    let chosen = root.child(outcome.action_id).expect("recommended child exists");
    assert!(!outcome.tree.node(chosen).expect("child").is_pruned());
}

#[test]
fn custom_rollout_policy_drives_simulations() {
    let calls = Cell::new(0usize);
    let greedy = |_: &Chain, actions: &[u32], _: &mut ChaCha8Rng| {
        calls.set(calls.get() + 1);
        ActionId::from(actions.len() - 1)
    };
    let mut mcts = Mcts::<Chain, _>::new(config(Strategy::Ucb1, 150), chain_score)
        .expect("valid config")
        .with_rollout_policy(greedy);
    let outcome = mcts
        .search_with_metrics(&Chain::new(10, 3, 1))
        .expect("search should succeed");

    assert_eq!(mcts.config().rollout_length, 4);
    assert_eq!(outcome.action, 2);
    assert_eq!(
        outcome.metrics.forward_model_calls,
        outcome.metrics.node_count as u64 - 1 + calls.get() as u64
    );
}
