mod builder;
mod compiled;
mod error;
mod io;
mod nim;
mod spec;
mod table;

pub use builder::GameBuilder;
pub use compiled::{CompiledGame, StateKey};
pub use error::GameError;
pub use io::{compile_yaml, compile_yaml_str, load_yaml, save_yaml, start_from_yaml};
pub use nim::{Nim, NimHeuristic, NimMove};
pub use spec::{ActionSpec, GameSpec, StateSpec};
pub use table::{TableHeuristic, TableState};
