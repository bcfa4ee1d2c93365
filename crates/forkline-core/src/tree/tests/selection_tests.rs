use std::collections::HashSet;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::{
    ActionId, NormalGamma, NormalGammaPrior, PlayerIndex, PruneParams, Recommendation,
    SearchConfig, SelectionMode, Strategy, Tree, rave_alpha, tree::tests::fixtures::Chain,
    ucb_bonus,
};

const PRIOR: NormalGammaPrior = NormalGammaPrior {
    alpha: 1.0,
    beta: 1.0,
    fallback_precision: 0.001,
};

/// Root with `branching` expanded children; child `i` is backed up `visits` times with result `i`.
fn seeded_root(strategy: Strategy, branching: u32, visits: usize) -> Tree<Chain> {
    let mut tree = Tree::new(&Chain::new(3, branching, 1), strategy, PRIOR);
    let root = tree.root_id();
    for action in 0..branching as usize {
        let child = tree.expand(root, ActionId::from(action)).expect("expand");
        for _ in 0..visits {
            tree.backpropagate(child, action as f64).expect("backup");
        }
    }
    tree
}

#[test]
fn ucb_exploration_bonus_decays_with_child_visits() {
    let mut previous = ucb_bonus(1.4, 100, 0, 1e-6);
    for visits in 1..200 {
        let bonus = ucb_bonus(1.4, 100, visits, 1e-6);
        assert!(bonus < previous, "bonus must shrink at {visits} visits");
        previous = bonus;
    }
}

#[test]
fn rave_weight_moves_from_amaf_to_primary() {
    assert_eq!(rave_alpha(50.0, 0), 1.0);
    assert_eq!(rave_alpha(50.0, 50), 0.0);
    assert_eq!(rave_alpha(50.0, 500), 0.0);

    let mut previous = 1.0;
    for visits in 1..50 {
        let alpha = rave_alpha(50.0, visits);
        assert!(alpha < previous && alpha > 0.0);
        previous = alpha;
    }
}

#[test]
fn thompson_draws_on_unvisited_posterior_are_finite() {
    let posterior = NormalGamma::new(PRIOR);
    let mut rng = ChaCha8Rng::seed_from_u64(3);

    assert_eq!(posterior.sample_precision(&mut rng), 0.001);
    for _ in 0..1000 {
        assert!(posterior.sample(&mut rng).is_finite());
    }
}

#[test]
fn normal_gamma_update_follows_conjugate_rule() {
    let mut posterior = NormalGamma::new(PRIOR);
    posterior.record(1.0);
    posterior.record(3.0);

    assert_eq!(posterior.visits(), 2);
    assert!((posterior.alpha() - 2.0).abs() < 1e-12);
    // First sample adds nothing to beta; second adds (1*1/2) * (3-1)^2 / 2 = 1.
    assert!((posterior.beta() - 2.0).abs() < 1e-12);
    assert!((posterior.mean() - 2.0).abs() < 1e-12);
}

#[test]
fn opponent_nodes_see_negated_values() {
    let config = SearchConfig::default();
    let selector = config.selector(PlayerIndex::from(0));
    let mut tree = Tree::new(&Chain::new(4, 3, 2), Strategy::Ucb1, PRIOR);
    let root = tree.root_id();
    let child = tree.expand(root, ActionId::from(0)).expect("expand");
    let grandchild = tree.expand(child, ActionId::from(2)).expect("expand");
    tree.backpropagate(grandchild, 5.0).expect("backup");

    let root_node = tree.node(root).expect("root");
    let child_node = tree.node(child).expect("child");
    let grandchild_node = tree.node(grandchild).expect("grandchild");

    assert_eq!(selector.exploit_value(root_node, child_node), 5.0);
    assert_eq!(selector.exploit_value(child_node, grandchild_node), -5.0);
}

#[test]
fn amaf_backup_credits_only_matching_siblings() {
    let mut tree = seeded_root(Strategy::RaveUcb1, 3, 1);
    let root = tree.root_id();
    let child_of = |tree: &Tree<Chain>, action: usize| {
        tree.node(root)
            .expect("root")
            .child(ActionId::from(action))
            .expect("expanded")
    };
    let selected = child_of(&tree, 0);

    let updated = tree
        .backpropagate_amaf(selected, &HashSet::from([2u32]), 1.5)
        .expect("amaf backup");
    assert_eq!(updated, 1);

    let amaf_visits: Vec<u64> = (0..3)
        .map(|action| {
            tree.node(child_of(&tree, action))
                .expect("child")
                .stats()
                .amaf_visits()
        })
        .collect();
    assert_eq!(amaf_visits, vec![0, 0, 1]);

    let credited = tree.node(child_of(&tree, 2)).expect("child");
    assert_eq!(credited.visits(), 1, "primary statistic is left alone");
    assert_eq!(credited.stats().amaf_mean(), Some(1.5));
}

#[test]
fn rave_explore_value_blends_amaf_and_primary() {
    let config = SearchConfig::default();
    let selector = config.selector(PlayerIndex::from(0));
    let mut tree = seeded_root(Strategy::RaveUcb1, 3, 4);
    let root_id = tree.root_id();
    let child_id = tree
        .node(root_id)
        .expect("root")
        .child(ActionId::from(1))
        .expect("expanded");
    let sibling = tree
        .node(root_id)
        .expect("root")
        .child(ActionId::from(0))
        .expect("expanded");
    for result in [3.0, 5.0] {
        tree.backpropagate_amaf(sibling, &HashSet::from([1u32]), result)
            .expect("amaf backup");
    }

    let root = tree.node(root_id).expect("root");
    let child = tree.node(child_id).expect("child");
    let stats = child.stats();
    assert_eq!(stats.amaf_visits(), 2);

    let k = selector.exploration_constant;
    let eps = selector.epsilon;
    let primary = stats.mean() + ucb_bonus(k, root.visits(), child.visits(), eps);
    let amaf = stats.amaf_mean().expect("rave statistic")
        + ucb_bonus(k, root.visits(), stats.amaf_visits(), eps);
    let weight = rave_alpha(selector.amaf_equivalence, child.visits());
    assert!(weight > 0.0 && weight < 1.0);

    let mut rng = ChaCha8Rng::seed_from_u64(9);
    let explore = selector.child_value(root, child, SelectionMode::Explore, &mut rng);
    let expected = weight * amaf + (1.0 - weight) * primary;
    assert!((explore - expected).abs() < 1e-12, "{explore} != {expected}");
    assert!((explore - primary).abs() > 1e-6, "AMAF must shift the value");
}

#[test]
fn exploit_mode_has_no_bonus_term() {
    let config = SearchConfig::default();
    let selector = config.selector(PlayerIndex::from(0));
    let tree = seeded_root(Strategy::Ucb1, 2, 3);
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    let root = tree.node(tree.root_id()).expect("root");
    let child = tree
        .node(root.child(ActionId::from(1)).expect("expanded"))
        .expect("child");

    let exploit = selector.child_value(root, child, SelectionMode::Exploit, &mut rng);
    let explore = selector.child_value(root, child, SelectionMode::Explore, &mut rng);
    assert_eq!(exploit, 1.0);
    assert!(explore > exploit);
}

#[test]
fn thompson_selection_prefers_the_stronger_child() {
    let config = SearchConfig::default();
    let selector = config.selector(PlayerIndex::from(0));
    let tree = seeded_root(Strategy::ThompsonSampling, 2, 20);
    let mut rng = ChaCha8Rng::seed_from_u64(11);

    let picks_best = (0..200)
        .filter(|_| {
            let (action, _) = tree
                .select_child(tree.root_id(), &selector, SelectionMode::Explore, &mut rng)
                .expect("selectable");
            action.index() == 1
        })
        .count();
    assert!(picks_best > 150);
}

#[test]
fn pruned_children_are_never_selected() {
    let config = SearchConfig::default();
    let selector = config.selector(PlayerIndex::from(0));
    let mut tree = seeded_root(Strategy::Ucb1, 4, 10);
    let params = PruneParams {
        alpha: 0.0,
        min_retained: 2,
        visit_threshold: 40,
    };

    let pruned = tree.prune(tree.root_id(), &params, &selector).expect("prune");
    assert_eq!(pruned, 2);
    assert_eq!(tree.prune(tree.root_id(), &params, &selector).expect("prune again"), 0);

    let root = tree.node(tree.root_id()).expect("root");
    for action in [0, 1] {
        let child = root.child(ActionId::from(action)).expect("expanded");
        assert!(tree.node(child).expect("child").is_pruned());
    }

    let mut rng = ChaCha8Rng::seed_from_u64(5);
    for _ in 0..100 {
        for mode in [SelectionMode::Explore, SelectionMode::Exploit] {
            let (action, _) = tree
                .select_child(tree.root_id(), &selector, mode, &mut rng)
                .expect("selectable");
            assert!(action.index() >= 2);
        }
        for recommendation in [Recommendation::MostVisited, Recommendation::BestValue] {
            let (action, _) = tree
                .recommend(&selector, recommendation, &mut rng)
                .expect("recommend")
                .expect("an action");
            assert!(action.index() >= 2);
        }
    }

    let by_visits = tree
        .best_root_action_by_visits()
        .expect("lookup")
        .expect("an action");
    assert!(by_visits.index() >= 2);
}

#[test]
fn pruning_waits_for_visit_threshold_and_full_expansion() {
    let config = SearchConfig::default();
    let selector = config.selector(PlayerIndex::from(0));
    let params = PruneParams {
        alpha: 0.0,
        min_retained: 1,
        visit_threshold: 100,
    };

    let mut thin = seeded_root(Strategy::Ucb1, 4, 10);
    assert_eq!(thin.prune(thin.root_id(), &params, &selector).expect("prune"), 0);

    let mut partial = Tree::new(&Chain::new(3, 4, 1), Strategy::Ucb1, PRIOR);
    let root = partial.root_id();
    let child = partial.expand(root, ActionId::from(3)).expect("expand");
    for _ in 0..200 {
        partial.backpropagate(child, 1.0).expect("backup");
    }
    assert_eq!(partial.prune(root, &params, &selector).expect("prune"), 0);
}

#[test]
fn retained_count_respects_minimum() {
    let params = PruneParams {
        alpha: 2.0,
        min_retained: 3,
        visit_threshold: 0,
    };
    assert_eq!(params.retained(1), 3);
    assert_eq!(params.retained(2), 3);
    // 2 * ln 20 = 5.99, truncated to 5
    assert_eq!(params.retained(20), 5);
    assert_eq!(params.retained(100), 9);
}
