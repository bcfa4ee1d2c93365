use std::{collections::HashSet, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{CompiledGame, GameError};

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Serializable game-tree schema used for YAML IO and validation.
pub struct GameSpec {
    /// Schema version for future compatibility checks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    /// String id of the start state.
    pub start: String,
    /// Number of players; payoff vectors have one entry per player.
    pub players: usize,
    /// All state declarations in the game.
    pub states: Vec<StateSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// A single state declaration in the game schema.
pub struct StateSpec {
    /// Unique state id.
    pub id: String,
    /// Player to move (defaults to 0 if omitted).
    #[serde(default)]
    pub player: usize,
    /// Whether this state is terminal (defaults to `false` if omitted).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal: Option<bool>,
    /// Final score per player, terminal states only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payoffs: Option<Vec<f64>>,
    /// Moves available from this state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<ActionSpec>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// A named move and the state it leads to.
pub struct ActionSpec {
    pub id: String,
    pub next: String,
}

impl GameSpec {
    /// Validate ids, transitions, players and payoffs.
    pub fn validate(&self) -> Result<(), GameError> {
        if self.start.trim().is_empty() {
            return Err(GameError::MissingStart);
        }
        if self.players == 0 {
            return Err(GameError::InvalidPlayers {
                players: self.players,
            });
        }

        let mut ids = HashSet::with_capacity(self.states.len());
        for state in &self.states {
            if !ids.insert(state.id.as_str()) {
                return Err(GameError::DuplicateStateId {
                    id: state.id.clone(),
                });
            }
        }

        if !ids.contains(self.start.as_str()) {
            return Err(GameError::UnknownStartState {
                start: self.start.clone(),
            });
        }

        for state in &self.states {
            self.validate_state(state, &ids)?;
        }

        Ok(())
    }

    fn validate_state(&self, state: &StateSpec, ids: &HashSet<&str>) -> Result<(), GameError> {
        let terminal = state.terminal.unwrap_or(false);
        let actions = state.actions.as_deref().unwrap_or(&[]);

        if state.player >= self.players {
            return Err(GameError::PlayerOutOfRange {
                state: state.id.clone(),
                player: state.player,
                players: self.players,
            });
        }

        if terminal {
            if !actions.is_empty() {
                return Err(GameError::TerminalStateHasActions {
                    state: state.id.clone(),
                });
            }

            let payoffs = state.payoffs.as_deref().unwrap_or(&[]);
            if payoffs.len() != self.players {
                return Err(GameError::PayoffArity {
                    state: state.id.clone(),
                    expected: self.players,
                    got: payoffs.len(),
                });
            }
            if let Some((player, value)) = payoffs
                .iter()
                .copied()
                .enumerate()
                .find(|(_, value)| !value.is_finite())
            {
                return Err(GameError::InvalidPayoff {
                    state: state.id.clone(),
                    player,
                    value,
                });
            }
            return Ok(());
        }

        if state.payoffs.is_some() {
            return Err(GameError::PayoffsOnNonTerminal {
                state: state.id.clone(),
            });
        }
        if actions.is_empty() {
            return Err(GameError::NonTerminalWithoutActions {
                state: state.id.clone(),
            });
        }

        let mut action_ids = HashSet::with_capacity(actions.len());
        for action in actions {
            if !action_ids.insert(action.id.as_str()) {
                return Err(GameError::DuplicateActionId {
                    state: state.id.clone(),
                    action: action.id.clone(),
                });
            }

            if !ids.contains(action.next.as_str()) {
                return Err(GameError::UnknownNextState {
                    state: state.id.clone(),
                    action: action.id.clone(),
                    next: action.next.clone(),
                });
            }
        }

        Ok(())
    }

    /// Compile this spec into the shared runtime representation.
    pub fn compile(&self) -> Result<Arc<CompiledGame>, GameError> {
        CompiledGame::from_spec(self).map(Arc::new)
    }
}
