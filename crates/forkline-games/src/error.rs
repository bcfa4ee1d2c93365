use thiserror::Error;

#[derive(Debug, Error)]
/// Error type for game loading, validation, compilation, and builder operations.
pub enum GameError {
    #[error("failed to read YAML file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("missing start state")]
    MissingStart,

    #[error("a game needs at least one player, got {players}")]
    InvalidPlayers { players: usize },

    #[error("start state '{start}' does not exist")]
    UnknownStartState { start: String },

    #[error("duplicate state id '{id}'")]
    DuplicateStateId { id: String },

    #[error("duplicate action id '{action}' in state '{state}'")]
    DuplicateActionId { state: String, action: String },

    #[error("state '{state}' is moved by player {player}, but the game only has {players}")]
    PlayerOutOfRange {
        state: String,
        player: usize,
        players: usize,
    },

    #[error("state '{state}' is terminal and cannot declare actions")]
    TerminalStateHasActions { state: String },

    #[error("state '{state}' is not terminal but declares no actions")]
    NonTerminalWithoutActions { state: String },

    #[error("state '{state}' is not terminal and cannot declare payoffs")]
    PayoffsOnNonTerminal { state: String },

    #[error("action '{action}' in state '{state}' references unknown next state '{next}'")]
    UnknownNextState {
        state: String,
        action: String,
        next: String,
    },

    #[error("terminal state '{state}' needs {expected} payoffs, got {got}")]
    PayoffArity {
        state: String,
        expected: usize,
        got: usize,
    },

    #[error("invalid payoff in state '{state}' for player {player}: {value}")]
    InvalidPayoff {
        state: String,
        player: usize,
        value: f64,
    },

    #[error("builder referenced unknown state '{state}'")]
    BuilderUnknownState { state: String },
}
