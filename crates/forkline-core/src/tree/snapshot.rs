use serde::Serialize;

use crate::{game::GameState, tree::search_tree::Tree};

pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize)]
pub struct TreeSnapshot {
    pub schema_version: u32,
    pub root_node_id: usize,
    pub node_count: usize,
    pub nodes: Vec<NodeSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeSnapshot {
    pub node_id: usize,
    pub depth: u64,
    pub is_terminal: bool,
    pub player_to_move: usize,
    pub parent_node_id: Option<usize>,
    pub parent_action_id: Option<usize>,
    pub visits: u64,
    pub mean: f64,
    pub amaf_visits: u64,
    pub amaf_mean: Option<f64>,
    pub pruned: bool,
    pub children: Vec<ChildSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChildSnapshot {
    pub action_id: usize,
    /// `Debug` rendering of the game action.
    pub action: String,
    pub child_node_id: Option<usize>,
}

impl TreeSnapshot {
    /// Render as pretty-printed JSON for dumps and debugging.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl<S: GameState> Tree<S> {
    /// Capture a serializable view of every node.
    pub fn snapshot(&self) -> TreeSnapshot {
        let nodes = self
            .nodes()
            .map(|(node_id, node)| NodeSnapshot {
                node_id: node_id.index(),
                depth: node.depth(),
                is_terminal: node.is_terminal(),
                player_to_move: node.player_to_move().index(),
                parent_node_id: node.parent().map(|(parent, _)| parent.index()),
                parent_action_id: node.parent().map(|(_, action)| action.index()),
                visits: node.visits(),
                mean: node.stats().mean(),
                amaf_visits: node.stats().amaf_visits(),
                amaf_mean: node.stats().amaf_mean(),
                pruned: node.is_pruned(),
                children: node
                    .actions()
                    .iter()
                    .enumerate()
                    .map(|(idx, action)| ChildSnapshot {
                        action_id: idx,
                        action: format!("{action:?}"),
                        child_node_id: node.child(idx.into()).map(|id| id.index()),
                    })
                    .collect(),
            })
            .collect();

        TreeSnapshot {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            root_node_id: self.root_id().index(),
            node_count: self.node_count(),
            nodes,
        }
    }
}
