use std::{fmt::Debug, hash::Hash};

use crate::tree::ids::PlayerIndex;

/// Snapshot of an external game that the search can copy and advance.
///
/// `Clone` is the deep copy: a cloned state must share no mutable data with
/// its source, since every tree node owns its own snapshot.
pub trait GameState: Clone {
    type Action: Clone + Eq + Hash + Debug;

    /// Return whether the game has ended in this state.
    fn is_terminal(&self) -> bool;

    /// Return the player who acts in this state.
    fn current_player(&self) -> PlayerIndex;

    /// Return the legal actions in this state.
    /// Order is preserved by the tree; repeated actions collapse to their first occurrence.
    fn legal_actions(&self) -> Vec<Self::Action>;

    /// Return the state reached by taking `action`. Must not mutate `self`.
    fn apply_action(&self, action: &Self::Action) -> Self;
}

/// Scores a state from the point of view of one player.
pub trait Heuristic<S> {
    /// Must return a finite value; anything else aborts the search.
    fn evaluate(&self, state: &S, player: PlayerIndex) -> f64;
}

impl<S, F> Heuristic<S> for F
where
    F: Fn(&S, PlayerIndex) -> f64,
{
    fn evaluate(&self, state: &S, player: PlayerIndex) -> f64 {
        self(state, player)
    }
}
