use std::sync::Arc;

use forkline_core::{GameState, Heuristic, PlayerIndex};

use crate::{CompiledGame, StateKey};

#[derive(Debug, Clone)]
/// Position in a compiled game. Clones share the game table and copy only the key.
pub struct TableState {
    game: Arc<CompiledGame>,
    key: StateKey,
}

impl TableState {
    /// Start position of `game`.
    pub fn start(game: Arc<CompiledGame>) -> Self {
        let key = game.start();
        Self { game, key }
    }

    /// Position `key` of `game`, if it exists.
    pub fn at(game: Arc<CompiledGame>, key: StateKey) -> Option<Self> {
        (key.index() < game.state_count()).then_some(Self { game, key })
    }

    pub fn key(&self) -> StateKey {
        self.key
    }

    pub fn game(&self) -> &Arc<CompiledGame> {
        &self.game
    }

    /// Original string id of this position.
    pub fn id(&self) -> &str {
        self.game.state_id(self.key).unwrap_or_default()
    }

    /// Payoff for `player` if this position is terminal.
    pub fn payoff(&self, player: usize) -> Option<f64> {
        if self.is_terminal() {
            self.game.payoff(self.key, player)
        } else {
            None
        }
    }
}

impl GameState for TableState {
    type Action = Arc<str>;

    fn is_terminal(&self) -> bool {
        self.game.is_terminal(self.key).unwrap_or(true)
    }

    fn current_player(&self) -> PlayerIndex {
        PlayerIndex::from(self.game.player(self.key).unwrap_or(0))
    }

    fn legal_actions(&self) -> Vec<Arc<str>> {
        self.game.actions(self.key).unwrap_or_default()
    }

    /// Unknown actions leave the position unchanged.
    fn apply_action(&self, action: &Arc<str>) -> Self {
        let key = self.game.next(self.key, action).unwrap_or(self.key);
        Self {
            game: Arc::clone(&self.game),
            key,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Scores terminal positions by their declared payoff and everything else as 0.
pub struct TableHeuristic;

impl Heuristic<TableState> for TableHeuristic {
    fn evaluate(&self, state: &TableState, player: PlayerIndex) -> f64 {
        state.payoff(player.index()).unwrap_or(0.0)
    }
}
