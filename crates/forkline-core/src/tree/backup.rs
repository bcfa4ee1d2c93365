use std::collections::HashSet;

use crate::{
    game::GameState,
    tree::{error::TreeError, ids::NodeId, search_tree::Tree},
};

impl<S: GameState> Tree<S> {
    /// Backpropagate one result from `leaf` up to and including the root.
    ///
    /// Iterative parent walk. Returns the touched nodes, leaf first.
    pub fn backpropagate(&mut self, leaf: NodeId, result: f64) -> Result<Vec<NodeId>, TreeError> {
        let mut path = Vec::new();
        let mut current = Some(leaf);

        while let Some(node_id) = current {
            let node = self.node_mut(node_id)?;
            node.record(result);
            path.push(node_id);
            current = node.parent().map(|(parent_id, _)| parent_id);
        }

        Ok(path)
    }

    /// AMAF backup: credit `result` to every expanded sibling of `leaf` whose action
    /// was also played during the rollout, whether or not it was the one selected.
    /// Returns how many AMAF statistics were updated.
    pub fn backpropagate_amaf(
        &mut self,
        leaf: NodeId,
        rollout_actions: &HashSet<S::Action>,
        result: f64,
    ) -> Result<usize, TreeError> {
        if rollout_actions.is_empty() {
            return Ok(0);
        }

        let Some((parent_id, _)) = self.node(leaf)?.parent() else {
            return Ok(0);
        };

        let siblings: Vec<NodeId> = {
            let parent = self.node(parent_id)?;
            parent
                .expanded_children()
                .filter(|(action_id, _)| {
                    parent
                        .action(*action_id)
                        .is_some_and(|action| rollout_actions.contains(action))
                })
                .map(|(_, child_id)| child_id)
                .collect()
        };

        let mut updated = 0;
        for sibling in siblings {
            if self.node_mut(sibling)?.record_amaf(result) {
                updated += 1;
            }
        }

        Ok(updated)
    }
}
