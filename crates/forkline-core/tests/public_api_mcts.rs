use forkline_core::{
    Budget, GameState, Mcts, PlayerIndex, SearchConfig, SearchConfigError, Selector, Strategy,
};

/// One decision with fixed payoffs: action `i` ends the game worth `payoffs[i]`.
#[derive(Debug, Clone)]
struct Pick {
    payoffs: Vec<f64>,
    taken: Option<usize>,
}

impl GameState for Pick {
    type Action = usize;

    fn is_terminal(&self) -> bool {
        self.taken.is_some()
    }

    fn current_player(&self) -> PlayerIndex {
        PlayerIndex::from(0)
    }

    fn legal_actions(&self) -> Vec<usize> {
        if self.is_terminal() {
            Vec::new()
        } else {
            (0..self.payoffs.len()).collect()
        }
    }

    fn apply_action(&self, action: &usize) -> Self {
        Pick {
            payoffs: self.payoffs.clone(),
            taken: Some(*action),
        }
    }
}

fn payoff(state: &Pick, _player: PlayerIndex) -> f64 {
    state.taken.map_or(0.0, |idx| state.payoffs[idx])
}

#[test]
fn public_search_prefers_higher_value_root_action() {
    let root = Pick {
        payoffs: vec![1.0, 5.0, 2.0],
        taken: None,
    };
    for strategy in [Strategy::Ucb1, Strategy::ThompsonSampling] {
        let config = SearchConfig {
            strategy,
            budget: Budget::iterations(60),
            ..SearchConfig::default()
        };
        let mut mcts = Mcts::new(config.clone(), payoff).expect("valid config");
        let outcome = mcts.search_with_metrics(&root).expect("search should succeed");

        assert_eq!(outcome.action, 1);
        assert_eq!(outcome.metrics.iterations, 60);

        let selector = Selector {
            exploration_constant: config.exploration_constant,
            epsilon: config.epsilon,
            amaf_equivalence: config.amaf_equivalence,
            searcher: PlayerIndex::from(0),
        };
        let by_visits = outcome
            .tree
            .best_root_action_by_visits()
            .expect("root action lookup should succeed")
            .expect("an action should be available");
        let by_value = outcome
            .tree
            .best_root_action_by_value(&selector)
            .expect("root action lookup should succeed")
            .expect("an action should be available");

        assert_eq!(by_visits.index(), 1);
        assert_eq!(by_value.index(), 1);
    }
}

#[test]
fn public_default_yaml_config_parses() {
    let config = SearchConfig::from_default_yaml().expect("default yaml should parse");
    assert_eq!(config.strategy, Strategy::Ucb1);
    assert!(config.budget.limit > 0);
}

#[test]
fn public_config_survives_yaml_round_trip() {
    let config = SearchConfig {
        strategy: Strategy::RaveThompson,
        amaf_enabled: true,
        budget: Budget::time_ms(40),
        ..SearchConfig::default()
    };
    let yaml = config.to_yaml().expect("config serializes");
    assert_eq!(SearchConfig::from_yaml_str(&yaml).expect("config parses"), config);
}

#[test]
fn public_partial_yaml_falls_back_to_defaults() {
    let config = SearchConfig::from_yaml_str("strategy: rave_ucb1\nrollout_length: 0\n")
        .expect("partial yaml should parse");
    assert_eq!(config.strategy, Strategy::RaveUcb1);
    assert_eq!(config.rollout_length, 0);
    assert_eq!(config.budget, Budget::default());
}

#[test]
fn public_config_errors_are_typed() {
    let invalid = SearchConfig::from_yaml_str("epsilon: 0.0\n").expect_err("epsilon must be > 0");
    assert!(matches!(invalid, SearchConfigError::Invalid(_)));

    let malformed = SearchConfig::from_yaml_str("strategy: [").expect_err("not yaml");
    assert!(matches!(malformed, SearchConfigError::Yaml(_)));

    let missing = SearchConfig::from_yaml_path("does/not/exist.yaml").expect_err("no such file");
    assert!(matches!(missing, SearchConfigError::Io(_)));
}
