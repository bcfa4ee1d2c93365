use std::{marker::PhantomData, time::Duration};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::{debug, trace};

use crate::{
    game::{GameState, Heuristic},
    tree::{
        budget::BudgetController,
        config::{SearchConfig, SearchConfigError},
        error::TreeError,
        ids::{ActionId, NodeId, PlayerIndex},
        rollout::{RolloutParams, RolloutPolicy, UniformRollout, rollout},
        search_tree::Tree,
        selection::Selector,
    },
};

/// Failures that abort a search. Budget exhaustion is not one of them.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Config(#[from] SearchConfigError),

    #[error("heuristic returned non-finite value {value}")]
    NonFiniteHeuristic { value: f64 },

    #[error("root state has no legal actions")]
    NoLegalActions,

    #[error("root state is terminal")]
    TerminalRoot,

    #[error("search finished without a recommendable root action")]
    NoRecommendation,

    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// Per-iteration metrics emitted by the search.
#[derive(Debug, Clone, Copy)]
pub struct IterationMetrics {
    pub leaf: NodeId,
    pub leaf_depth: u64,
    pub leaf_is_new: bool,
    pub rollout_steps: usize,
    pub result: f64,
    pub amaf_updates: usize,
    pub pruned: usize,
}

/// Aggregate metrics for a complete search.
#[derive(Debug, Clone)]
pub struct SearchMetrics {
    pub iterations: u64,
    pub forward_model_calls: u64,
    pub node_count: usize,
    pub max_depth: u64,
    pub elapsed: Duration,
    pub result_sum: f64,
    pub mean_result: f64,
}

impl SearchMetrics {
    fn new() -> Self {
        SearchMetrics {
            iterations: 0,
            forward_model_calls: 0,
            node_count: 0,
            max_depth: 0,
            elapsed: Duration::ZERO,
            result_sum: 0.0,
            mean_result: 0.0,
        }
    }

    fn record(&mut self, metrics: &IterationMetrics) {
        self.iterations += 1;
        self.result_sum += metrics.result;
        self.mean_result = self.result_sum / self.iterations as f64;
    }
}

/// Everything a finished search leaves behind, including the tree for inspection.
#[derive(Debug, Clone)]
pub struct SearchOutcome<S: GameState> {
    pub action: S::Action,
    pub action_id: ActionId,
    pub metrics: SearchMetrics,
    pub tree: Tree<S>,
}

/// Monte Carlo tree search over a `GameState`, scored by a `Heuristic`.
///
/// Every call to `search` builds a private tree from scratch and reseeds its rng from the
/// config, so equal inputs give equal decisions.
pub struct Mcts<S, H, P = UniformRollout> {
    config: SearchConfig,
    heuristic: H,
    rollout_policy: P,
    _state: PhantomData<fn(&S)>,
}

impl<S, H> Mcts<S, H, UniformRollout>
where
    S: GameState,
    H: Heuristic<S>,
{
    /// Validate `config` and build a searcher using uniform random rollouts.
    pub fn new(config: SearchConfig, heuristic: H) -> Result<Self, SearchError> {
        config.validate()?;
        Ok(Mcts {
            config,
            heuristic,
            rollout_policy: UniformRollout,
            _state: PhantomData,
        })
    }
}

impl<S, H, P> Mcts<S, H, P>
where
    S: GameState,
    H: Heuristic<S>,
    P: RolloutPolicy<S>,
{
    /// Swap in a different rollout policy.
    pub fn with_rollout_policy<Q: RolloutPolicy<S>>(self, rollout_policy: Q) -> Mcts<S, H, Q> {
        Mcts {
            config: self.config,
            heuristic: self.heuristic,
            rollout_policy,
            _state: PhantomData,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Return the recommended action for the player to move in `root`.
    pub fn search(&mut self, root: &S) -> Result<S::Action, SearchError> {
        self.search_with_metrics(root).map(|outcome| outcome.action)
    }

    /// Like `search`, but also hand back metrics and the finished tree.
    pub fn search_with_metrics(&mut self, root: &S) -> Result<SearchOutcome<S>, SearchError> {
        self.run_with_hook(root, |_| {})
    }

    /// Run the search and invoke a callback after each completed iteration.
    pub fn run_with_hook<F>(&mut self, root: &S, mut on_iteration: F) -> Result<SearchOutcome<S>, SearchError>
    where
        F: FnMut(&IterationMetrics),
    {
        if root.is_terminal() {
            return Err(SearchError::TerminalRoot);
        }

        let mut tree = Tree::new(root, self.config.strategy, self.config.prior());
        if tree.node(tree.root_id())?.actions().is_empty() {
            return Err(SearchError::NoLegalActions);
        }

        let searcher = root.current_player();
        let selector = self.config.selector(searcher);
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.random_seed);
        let mut budget = BudgetController::new(self.config.budget, self.config.break_ms);
        let mut metrics = SearchMetrics::new();

        debug!(
            strategy = ?self.config.strategy,
            budget = ?self.config.budget,
            player = searcher.index(),
            "starting search"
        );

        loop {
            budget.begin_iteration();
            let iteration =
                self.iterate(&mut tree, &selector, searcher, &mut budget, &mut rng)?;
            budget.end_iteration();

            trace!(
                leaf = iteration.leaf.index(),
                depth = iteration.leaf_depth,
                new = iteration.leaf_is_new,
                result = iteration.result,
                "iteration complete"
            );
            on_iteration(&iteration);
            metrics.record(&iteration);

            if budget.is_exhausted() {
                break;
            }
        }

        let (action_id, action) = tree
            .recommend(&selector, self.config.recommendation, &mut rng)?
            .ok_or(SearchError::NoRecommendation)?;

        metrics.forward_model_calls = budget.forward_model_calls();
        metrics.node_count = tree.node_count();
        metrics.max_depth = tree.max_depth();
        metrics.elapsed = budget.elapsed();

        debug!(
            iterations = metrics.iterations,
            forward_model_calls = metrics.forward_model_calls,
            nodes = metrics.node_count,
            action = action_id.index(),
            "search finished"
        );

        Ok(SearchOutcome {
            action,
            action_id,
            metrics,
            tree,
        })
    }

    /// One complete iteration: descend and expand, roll out, evaluate, back up, prune.
    fn iterate(
        &mut self,
        tree: &mut Tree<S>,
        selector: &Selector,
        searcher: PlayerIndex,
        budget: &mut BudgetController,
        rng: &mut ChaCha8Rng,
    ) -> Result<IterationMetrics, SearchError> {
        let policy_result = tree.tree_policy(self.config.max_tree_depth, selector, rng)?;
        budget.charge_forward_model_calls(policy_result.forward_model_calls);

        let leaf = tree.node(policy_result.leaf)?;
        let leaf_depth = leaf.depth();
        let params = RolloutParams {
            rollout_length: self.config.rollout_length,
            track_amaf: self.config.amaf_enabled,
            searcher,
        };
        let (final_state, record) = rollout(leaf.state(), &mut self.rollout_policy, params, rng)?;
        budget.charge_forward_model_calls(record.steps as u64);

        let result = self.heuristic.evaluate(&final_state, searcher);
        if !result.is_finite() {
            return Err(SearchError::NonFiniteHeuristic { value: result });
        }

        let path = tree.backpropagate(policy_result.leaf, result)?;

        let amaf_updates = if self.config.amaf_enabled {
            tree.backpropagate_amaf(policy_result.leaf, &record.amaf_actions, result)?
        } else {
            0
        };

        let mut pruned = 0;
        if self.config.pruning_enabled {
            let params = self.config.prune_params();
            for node_id in path {
                pruned += tree.prune(node_id, &params, selector)?;
            }
        }

        Ok(IterationMetrics {
            leaf: policy_result.leaf,
            leaf_depth,
            leaf_is_new: policy_result.leaf_is_new,
            rollout_steps: record.steps,
            result,
            amaf_updates,
            pruned,
        })
    }
}
