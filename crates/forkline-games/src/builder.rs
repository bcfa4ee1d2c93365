use std::sync::Arc;

use crate::{ActionSpec, CompiledGame, GameError, GameSpec, StateSpec};

#[derive(Debug, Clone, Default)]
/// Struct to build game trees
pub struct GameBuilder {
    start: Option<String>,
    players: usize,
    states: Vec<StateSpec>,
}

impl GameBuilder {
    /// Create a new GameBuilder for `players` players
    pub fn new(players: usize) -> Self {
        Self {
            players,
            ..Self::default()
        }
    }

    /// Define the start position of the game
    pub fn set_start(&mut self, state: impl Into<String>) -> &mut Self {
        self.start = Some(state.into());
        self
    }

    /// Add a decision state moved by `player`
    pub fn add_state(&mut self, id: impl Into<String>, player: usize) -> &mut Self {
        self.states.push(StateSpec {
            id: id.into(),
            player,
            terminal: Some(false),
            payoffs: None,
            actions: Some(Vec::new()),
        });
        self
    }

    /// Add a terminal state with one payoff per player
    pub fn add_terminal(&mut self, id: impl Into<String>, payoffs: Vec<f64>) -> &mut Self {
        self.states.push(StateSpec {
            id: id.into(),
            player: 0,
            terminal: Some(true),
            payoffs: Some(payoffs),
            actions: None,
        });
        self
    }

    /// Add a move from `state_id` to `next`
    pub fn add_action(
        &mut self,
        state_id: impl AsRef<str>,
        action_id: impl Into<String>,
        next: impl Into<String>,
    ) -> Result<&mut Self, GameError> {
        let state_id = state_id.as_ref();

        let state = self
            .states
            .iter_mut()
            .find(|s| s.id == state_id)
            .ok_or_else(|| GameError::BuilderUnknownState {
                state: state_id.to_string(),
            })?;

        state.actions.get_or_insert_with(Vec::new).push(ActionSpec {
            id: action_id.into(),
            next: next.into(),
        });

        Ok(self)
    }

    pub fn build_spec(self) -> Result<GameSpec, GameError> {
        let start = self.start.ok_or(GameError::MissingStart)?;
        let spec = GameSpec {
            version: Some(1),
            start,
            players: self.players,
            states: self.states,
        };
        spec.validate()?;
        Ok(spec)
    }

    pub fn compile(self) -> Result<Arc<CompiledGame>, GameError> {
        let spec = self.build_spec()?;
        spec.compile()
    }
}
