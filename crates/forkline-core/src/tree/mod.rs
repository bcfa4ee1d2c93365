mod arena;
mod backup;
pub mod budget;
pub mod config;
pub mod error;
pub mod ids;
pub mod mcts;
pub mod node;
pub mod prune;
pub mod rollout;
pub mod search_tree;
pub mod selection;
pub mod snapshot;
pub mod stats;

#[cfg(test)]
mod tests;
