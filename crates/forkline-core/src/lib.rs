mod game;
mod tree;

pub use game::{GameState, Heuristic};
pub use tree::budget::{Budget, BudgetController, BudgetKind};
pub use tree::config::{SearchConfig, SearchConfigError};
pub use tree::error::TreeError;
pub use tree::ids::{ActionId, NodeId, PlayerIndex};
pub use tree::mcts::{IterationMetrics, Mcts, SearchError, SearchMetrics, SearchOutcome};
pub use tree::node::Node;
pub use tree::prune::PruneParams;
pub use tree::rollout::{RolloutParams, RolloutPolicy, RolloutRecord, UniformRollout, rollout};
pub use tree::search_tree::{Tree, TreePolicyResult};
pub use tree::selection::{
    Recommendation, SelectionMode, Selector, Strategy, rave_alpha, ucb_bonus,
};
pub use tree::snapshot::{ChildSnapshot, NodeSnapshot, TreeSnapshot};
pub use tree::stats::{MeanStats, NormalGamma, NormalGammaPrior, Statistics};
