use rand::Rng;

use crate::{
    game::GameState,
    tree::{
        arena::Arena,
        error::TreeError,
        ids::{ActionId, NodeId},
        node::Node,
        selection::{Recommendation, SelectionMode, Selector, Strategy},
        stats::NormalGammaPrior,
    },
};

#[derive(Debug, Clone, Copy)]
/// Outcome of one descent through the tree.
pub struct TreePolicyResult {
    pub leaf: NodeId,      // node where rollout should start (often newly created)
    pub leaf_is_new: bool, // whether we just created this node
    pub forward_model_calls: u64,
}

#[derive(Debug, Clone)]
/// Owns the arena (root is always at index 0) and provides the tree operations.
/// Parent and child links are arena ids, so navigation is O(1) both ways.
pub struct Tree<S: GameState> {
    arena: Arena<Node<S>>,
    strategy: Strategy,
    prior: NormalGammaPrior,
}

impl<S: GameState> Tree<S> {
    /// Create a tree with a single root node owning a copy of `root_state`.
    pub fn new(root_state: &S, strategy: Strategy, prior: NormalGammaPrior) -> Self {
        let mut arena = Arena::new();
        let root = Node::new(root_state.clone(), 0, None, strategy.new_statistics(prior));
        let _ = arena.allocate(root);
        Tree {
            arena,
            strategy,
            prior,
        }
    }

    /// Return the root node id.
    pub fn root_id(&self) -> NodeId {
        NodeId::from(0)
    }

    /// Return how many nodes exist in the tree arena.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Return an immutable node handle.
    pub fn node(&self, node_id: NodeId) -> Result<&Node<S>, TreeError> {
        self.arena
            .get(node_id)
            .ok_or(TreeError::MissingNode { node_id })
    }

    /// Return a mutable node handle.
    pub(crate) fn node_mut(&mut self, node_id: NodeId) -> Result<&mut Node<S>, TreeError> {
        self.arena
            .get_mut(node_id)
            .ok_or(TreeError::MissingNode { node_id })
    }

    /// Iterate over every node with its id.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node<S>)> {
        self.arena.iter_ids()
    }

    /// Deepest node currently in the tree.
    pub fn max_depth(&self) -> u64 {
        (&self.arena)
            .into_iter()
            .map(Node::depth)
            .max()
            .unwrap_or(0)
    }

    /// Create the child for `action_id` by copying the parent state and applying the action.
    /// This is the only place the tree advances a state; it costs one forward-model call.
    pub fn expand(&mut self, node_id: NodeId, action_id: ActionId) -> Result<NodeId, TreeError> {
        let (next_state, depth) = {
            let node = self.node(node_id)?;
            if node.child(action_id).is_some() {
                return Err(TreeError::AlreadyExpanded { node_id, action_id });
            }
            let action = node
                .action(action_id)
                .ok_or(TreeError::MissingAction { node_id, action_id })?;
            (node.state().apply_action(action), node.depth() + 1)
        };

        let child = Node::new(
            next_state,
            depth,
            Some((node_id, action_id)),
            self.strategy.new_statistics(self.prior),
        );
        let child_id = self.arena.allocate(child);

        // The slot was checked above and nothing ran in between.
        if !self.node_mut(node_id)?.attach_child(action_id, child_id) {
            return Err(TreeError::AlreadyExpanded { node_id, action_id });
        }

        Ok(child_id)
    }

    /// Best unpruned child of `node_id` under `selector`.
    /// Ties go to the lower action index; the seeded noise keeps them rare.
    pub fn select_child<R: Rng + ?Sized>(
        &self,
        node_id: NodeId,
        selector: &Selector,
        mode: SelectionMode,
        rng: &mut R,
    ) -> Result<(ActionId, NodeId), TreeError> {
        let parent = self.node(node_id)?;
        let mut best: Option<(ActionId, NodeId, f64)> = None;

        for (action_id, child_id) in parent.expanded_children() {
            let child = self.node(child_id)?;
            if child.is_pruned() {
                continue;
            }

            let score = selector.child_value(parent, child, mode, rng) + selector.noise(rng);
            if best.is_none_or(|(_, _, best_score)| score > best_score) {
                best = Some((action_id, child_id, score));
            }
        }

        best.map(|(action_id, child_id, _)| (action_id, child_id))
            .ok_or(TreeError::ActionSelectionFailed { node_id })
    }

    /// Selection + expansion.
    ///
    /// Descends while the node is non-terminal and above `max_depth`. The first node with an
    /// unexpanded action gets one new child, picked uniformly among its unexpanded actions.
    pub fn tree_policy<R: Rng + ?Sized>(
        &mut self,
        max_depth: u64,
        selector: &Selector,
        rng: &mut R,
    ) -> Result<TreePolicyResult, TreeError> {
        let mut current = self.root_id();

        loop {
            let node = self.node(current)?;
            if node.is_terminal() || node.depth() >= max_depth || node.actions().is_empty() {
                return Ok(TreePolicyResult {
                    leaf: current,
                    leaf_is_new: false,
                    forward_model_calls: 0,
                });
            }

            let unexpanded = node.unexpanded_actions();
            if !unexpanded.is_empty() {
                let action_id = unexpanded[rng.gen_range(0..unexpanded.len())];
                let child_id = self.expand(current, action_id)?;
                return Ok(TreePolicyResult {
                    leaf: child_id,
                    leaf_is_new: true,
                    forward_model_calls: 1,
                });
            }

            let (_, child_id) = self.select_child(current, selector, SelectionMode::Explore, rng)?;
            current = child_id;
        }
    }

    /// Pick the action to play from the root. Never uses the exploration bonus.
    pub fn recommend<R: Rng + ?Sized>(
        &self,
        selector: &Selector,
        recommendation: Recommendation,
        rng: &mut R,
    ) -> Result<Option<(ActionId, S::Action)>, TreeError> {
        let root_id = self.root_id();
        let root = self.node(root_id)?;

        let action_id = match recommendation {
            Recommendation::BestValue => {
                match self.select_child(root_id, selector, SelectionMode::Exploit, rng) {
                    Ok((action_id, _)) => action_id,
                    Err(TreeError::ActionSelectionFailed { .. }) => return Ok(None),
                    Err(err) => return Err(err),
                }
            }
            Recommendation::MostVisited => {
                let mut best: Option<(ActionId, f64)> = None;
                for (action_id, child_id) in root.expanded_children() {
                    let child = self.node(child_id)?;
                    if child.is_pruned() {
                        continue;
                    }
                    let score = child.visits() as f64 + selector.noise(rng);
                    if best.is_none_or(|(_, best_score)| score > best_score) {
                        best = Some((action_id, score));
                    }
                }
                match best {
                    Some((action_id, _)) => action_id,
                    None => return Ok(None),
                }
            }
        };

        let action = root.action(action_id).cloned().ok_or(TreeError::MissingAction {
            node_id: root_id,
            action_id,
        })?;
        Ok(Some((action_id, action)))
    }

    /// Pick the root action with the highest visit count, ignoring pruned children.
    pub fn best_root_action_by_visits(&self) -> Result<Option<ActionId>, TreeError> {
        let root = self.node(self.root_id())?;
        let mut best: Option<(ActionId, u64)> = None;

        for (action_id, child_id) in root.expanded_children() {
            let child = self.node(child_id)?;
            if child.is_pruned() {
                continue;
            }
            let candidate = (action_id, child.visits());
            best = match best {
                Some((best_action, best_visits)) if best_visits >= candidate.1 => {
                    Some((best_action, best_visits))
                }
                _ => Some(candidate),
            };
        }

        Ok(best.map(|(action, _)| action))
    }

    /// Pick the root action with the highest mean for the player moving at the root.
    pub fn best_root_action_by_value(&self, selector: &Selector) -> Result<Option<ActionId>, TreeError> {
        let root = self.node(self.root_id())?;
        let mut best: Option<(ActionId, f64)> = None;

        for (action_id, child_id) in root.expanded_children() {
            let child = self.node(child_id)?;
            if child.is_pruned() {
                continue;
            }
            let value = selector.exploit_value(root, child);
            best = match best {
                Some((best_action, best_value)) if best_value >= value => {
                    Some((best_action, best_value))
                }
                _ => Some((action_id, value)),
            };
        }

        Ok(best.map(|(action, _)| action))
    }
}
