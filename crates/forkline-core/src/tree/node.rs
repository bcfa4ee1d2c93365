use std::{collections::HashSet, hash::Hash};

use crate::{
    game::GameState,
    tree::{
        ids::{ActionId, NodeId, PlayerIndex},
        stats::Statistics,
    },
};

#[derive(Debug, Clone)]
/// Represents one (state, history) pair in the search tree.
///
/// The action list is fixed when the node is created. `children` runs parallel to it:
/// `None` means the action is known but not yet expanded, and a slot only ever
/// goes from `None` to `Some`.
pub struct Node<S: GameState> {
    state: S,
    depth: u64,
    parent: Option<(NodeId, ActionId)>,
    player_to_move: PlayerIndex,
    is_terminal: bool,
    actions: Vec<S::Action>,
    children: Vec<Option<NodeId>>,
    visits: u64,
    stats: Statistics,
    pruned: bool,
}

impl<S: GameState> Node<S> {
    /// Create a new Node owning `state`.
    /// Legal actions are read once here; terminal states get none.
    pub fn new(state: S, depth: u64, parent: Option<(NodeId, ActionId)>, stats: Statistics) -> Self {
        let is_terminal = state.is_terminal();
        let actions = if is_terminal {
            Vec::new()
        } else {
            dedup_actions(state.legal_actions())
        };
        let children = vec![None; actions.len()];

        Node {
            player_to_move: state.current_player(),
            state,
            depth,
            parent,
            is_terminal,
            actions,
            children,
            visits: 0,
            stats,
            pruned: false,
        }
    }

    /// Borrow the state snapshot owned by this node.
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Return the depth of a specific node
    pub fn depth(&self) -> u64 {
        self.depth
    }

    /// Return the parent of a given node and the action that led here
    pub fn parent(&self) -> Option<(NodeId, ActionId)> {
        self.parent
    }

    pub fn player_to_move(&self) -> PlayerIndex {
        self.player_to_move
    }

    /// Check function to see if a node is terminal
    pub fn is_terminal(&self) -> bool {
        self.is_terminal
    }

    /// The fixed list of actions known at this node.
    pub fn actions(&self) -> &[S::Action] {
        &self.actions
    }

    /// Using an action id, return the corresponding action
    pub fn action(&self, action_id: ActionId) -> Option<&S::Action> {
        self.actions.get(action_id.index())
    }

    /// Child created for `action_id`, `None` while the action is unexpanded.
    pub fn child(&self, action_id: ActionId) -> Option<NodeId> {
        self.children.get(action_id.index()).copied().flatten()
    }

    /// Iterate over `(ActionId, NodeId)` for every expanded action.
    pub fn expanded_children(&self) -> impl Iterator<Item = (ActionId, NodeId)> + '_ {
        self.children
            .iter()
            .enumerate()
            .filter_map(|(idx, child)| child.map(|id| (ActionId::from(idx), id)))
    }

    /// Actions that do not have a child yet.
    pub fn unexpanded_actions(&self) -> Vec<ActionId> {
        self.children
            .iter()
            .enumerate()
            .filter(|(_, child)| child.is_none())
            .map(|(idx, _)| ActionId::from(idx))
            .collect()
    }

    /// Helper to see if every known action has a child
    pub fn is_fully_expanded(&self) -> bool {
        self.children.iter().all(Option::is_some)
    }

    /// Register the child for an action.
    /// Returns `false` and leaves the node untouched if the slot is missing or already taken.
    pub(crate) fn attach_child(&mut self, action_id: ActionId, child: NodeId) -> bool {
        match self.children.get_mut(action_id.index()) {
            Some(slot @ None) => {
                *slot = Some(child);
                true
            }
            _ => false,
        }
    }

    /// Return the amount of backups that passed through this node
    pub fn visits(&self) -> u64 {
        self.visits
    }

    pub fn stats(&self) -> &Statistics {
        &self.stats
    }

    /// Backup step: one visit plus the result into the primary statistic.
    pub(crate) fn record(&mut self, result: f64) {
        self.visits += 1;
        self.stats.record(result);
    }

    pub(crate) fn record_amaf(&mut self, result: f64) -> bool {
        self.stats.record_amaf(result)
    }

    pub fn is_pruned(&self) -> bool {
        self.pruned
    }

    pub(crate) fn mark_pruned(&mut self) {
        self.pruned = true;
    }
}

/// Keep the first occurrence of every action, preserving order.
fn dedup_actions<A: Clone + Eq + Hash>(actions: Vec<A>) -> Vec<A> {
    let mut seen = HashSet::with_capacity(actions.len());
    actions
        .into_iter()
        .filter(|action| seen.insert(action.clone()))
        .collect()
}
