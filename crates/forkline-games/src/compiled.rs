use std::{collections::HashMap, sync::Arc};

use crate::{GameError, GameSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Dense index for states in a compiled game.
pub struct StateKey(usize);

impl StateKey {
    /// Return the underlying state index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for StateKey {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone)]
/// Runtime form of a game tree with resolved state references.
pub struct CompiledGame {
    start: StateKey,
    players: usize,
    states: Vec<StateRec>,
    state_ids: Vec<String>,
    state_id_to_key: HashMap<String, StateKey>,
}

#[derive(Debug, Clone)]
struct StateRec {
    player: usize,
    terminal: bool,
    payoffs: Vec<f64>,
    actions: Vec<ActionRec>,
}

#[derive(Debug, Clone)]
struct ActionRec {
    id: Arc<str>,
    next: StateKey,
}

impl CompiledGame {
    /// Validate and compile a spec into dense state records.
    pub(crate) fn from_spec(spec: &GameSpec) -> Result<Self, GameError> {
        spec.validate()?;

        let mut state_id_to_key = HashMap::with_capacity(spec.states.len());
        let mut state_ids = Vec::with_capacity(spec.states.len());

        for (idx, state) in spec.states.iter().enumerate() {
            state_id_to_key.insert(state.id.clone(), StateKey::from(idx));
            state_ids.push(state.id.clone());
        }

        let start = state_id_to_key.get(&spec.start).copied().ok_or_else(|| {
            GameError::UnknownStartState {
                start: spec.start.clone(),
            }
        })?;

        let mut states = Vec::with_capacity(spec.states.len());
        for state in &spec.states {
            let mut actions = Vec::new();
            for action in state.actions.as_deref().unwrap_or(&[]) {
                let next = state_id_to_key.get(&action.next).copied().ok_or_else(|| {
                    GameError::UnknownNextState {
                        state: state.id.clone(),
                        action: action.id.clone(),
                        next: action.next.clone(),
                    }
                })?;
                actions.push(ActionRec {
                    id: Arc::from(action.id.as_str()),
                    next,
                });
            }

            states.push(StateRec {
                player: state.player,
                terminal: state.terminal.unwrap_or(false),
                payoffs: state.payoffs.clone().unwrap_or_default(),
                actions,
            });
        }

        Ok(Self {
            start,
            players: spec.players,
            states,
            state_ids,
            state_id_to_key,
        })
    }

    /// Return the start state key.
    pub fn start(&self) -> StateKey {
        self.start
    }

    pub fn players(&self) -> usize {
        self.players
    }

    /// Return the number of compiled states.
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Check whether a state is terminal.
    pub fn is_terminal(&self, key: StateKey) -> Option<bool> {
        self.states.get(key.index()).map(|state| state.terminal)
    }

    /// Return the player to move in a state.
    pub fn player(&self, key: StateKey) -> Option<usize> {
        self.states.get(key.index()).map(|state| state.player)
    }

    /// Return the action ids available from a state, in declaration order.
    pub fn actions(&self, key: StateKey) -> Option<Vec<Arc<str>>> {
        self.states
            .get(key.index())
            .map(|state| state.actions.iter().map(|action| action.id.clone()).collect())
    }

    /// Follow `action` from `key`.
    pub fn next(&self, key: StateKey, action: &str) -> Option<StateKey> {
        self.states
            .get(key.index())?
            .actions
            .iter()
            .find(|rec| &*rec.id == action)
            .map(|rec| rec.next)
    }

    /// Payoff of a terminal state for `player`.
    pub fn payoff(&self, key: StateKey, player: usize) -> Option<f64> {
        self.states.get(key.index())?.payoffs.get(player).copied()
    }

    /// Convert a state key back to its original string id.
    pub fn state_id(&self, key: StateKey) -> Option<&str> {
        self.state_ids.get(key.index()).map(String::as_str)
    }

    /// Convert a string id into a compiled state key.
    pub fn state_key(&self, id: &str) -> Option<StateKey> {
        self.state_id_to_key.get(id).copied()
    }
}
