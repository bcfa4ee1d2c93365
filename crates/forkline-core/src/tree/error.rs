use thiserror::Error;

use crate::tree::ids::{ActionId, NodeId};

/// Invariant violations raised while building or reading the search tree.
/// Any of these means the engine itself is wrong, not the game it is searching.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// Attempted to access a node id that does not exist in the arena.
    #[error("missing node with id {}", node_id.index())]
    MissingNode { node_id: NodeId },

    /// Attempted to access an action slot that does not exist on a node.
    #[error("missing action {} on node {}", action_id.index(), node_id.index())]
    MissingAction {
        node_id: NodeId,
        action_id: ActionId,
    },

    /// Attempted to create a second child for an already expanded action.
    #[error("action {} on node {} is already expanded", action_id.index(), node_id.index())]
    AlreadyExpanded {
        node_id: NodeId,
        action_id: ActionId,
    },

    /// Tree policy could not select an action from a node.
    #[error("failed to select action on node {}", node_id.index())]
    ActionSelectionFailed { node_id: NodeId },

    /// Rollout policy returned an action outside `[0, num_actions)`.
    #[error(
        "rollout policy selected invalid action {} with {num_actions} actions",
        action_id.index()
    )]
    InvalidRolloutAction {
        action_id: ActionId,
        num_actions: usize,
    },
}
