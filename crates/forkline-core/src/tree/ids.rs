/// A wraper for an integer index used to address nodes in the arena
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Get the value of the actual node without having to access and risk overiding the internal value
    pub fn index(&self) -> usize {
        self.0
    }
}

impl From<usize> for NodeId {
    /// Allow for explicit conversion from usize to NodeId
    fn from(value: usize) -> Self {
        NodeId(value)
    }
}

/// Seat of a participant in the game, as reported by the game state.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerIndex(usize);

impl PlayerIndex {
    /// Return the raw seat number.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl From<usize> for PlayerIndex {
    fn from(value: usize) -> Self {
        PlayerIndex(value)
    }
}

/// A wraper for an integer index into a node's fixed action list
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionId(usize);

impl ActionId {
    /// Get the value of the actual action without having to access and risk overiding the internal value
    pub fn index(&self) -> usize {
        self.0
    }
}

impl From<usize> for ActionId {
    /// Allow for explicit conversion from usize to ActionId
    fn from(value: usize) -> Self {
        ActionId(value)
    }
}
