use tracing::debug;

use crate::{
    game::GameState,
    tree::{
        error::TreeError,
        ids::NodeId,
        search_tree::Tree,
        selection::Selector,
    },
};

/// Statistical pruning of dominated children.
#[derive(Debug, Clone, Copy)]
pub struct PruneParams {
    pub alpha: f64,
    pub min_retained: usize,
    pub visit_threshold: u64,
}

impl PruneParams {
    /// Children to keep out of `num_children`: `max(alpha * ln(n), min_retained)`,
    /// with the scaled term truncated toward zero.
    pub fn retained(&self, num_children: usize) -> usize {
        let scaled = (self.alpha * (num_children as f64).ln()).trunc();
        let scaled = if scaled.is_finite() && scaled > 0.0 {
            scaled as usize
        } else {
            0
        };
        scaled.max(self.min_retained)
    }
}

impl<S: GameState> Tree<S> {
    /// Flag the weakest children of `node_id` as pruned.
    ///
    /// Only runs once the node has `visit_threshold` visits and every action has a child,
    /// so rankings are never made on missing data. Children are ranked by their
    /// exploitation value for the player moving at `node_id`. Returns how many were flagged.
    pub fn prune(
        &mut self,
        node_id: NodeId,
        params: &PruneParams,
        selector: &Selector,
    ) -> Result<usize, TreeError> {
        let (num_children, mut ranked) = {
            let node = self.node(node_id)?;
            if node.visits() < params.visit_threshold || !node.is_fully_expanded() {
                return Ok(0);
            }

            let mut ranked = Vec::new();
            for (_, child_id) in node.expanded_children() {
                let child = self.node(child_id)?;
                if !child.is_pruned() {
                    let value = selector.exploit_value(node, child);
                    ranked.push((child_id, value));
                }
            }
            (node.actions().len(), ranked)
        };

        let keep = params.retained(num_children).max(1);
        if ranked.len() <= keep {
            return Ok(0);
        }

        ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
        let cut = ranked.len() - keep;
        for (child_id, _) in &ranked[..cut] {
            self.node_mut(*child_id)?.mark_pruned();
        }

        debug!(node = node_id.index(), pruned = cut, kept = keep, "pruned children");
        Ok(cut)
    }
}
