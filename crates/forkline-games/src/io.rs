//! YAML persistence for table games.
//!
//! Files hold a `GameSpec`. Specs are validated before they are written, so a
//! file saved here always compiles into a game the search can play.

use std::{fs, path::Path, sync::Arc};

use crate::{CompiledGame, GameError, GameSpec, TableState};

/// Parse and compile a game from YAML text.
pub fn compile_yaml_str(yaml: &str) -> Result<Arc<CompiledGame>, GameError> {
    let spec: GameSpec = serde_yaml::from_str(yaml)?;
    spec.compile()
}

/// Read a game spec from disk without compiling it.
pub fn load_yaml(path: impl AsRef<Path>) -> Result<GameSpec, GameError> {
    let yaml = fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&yaml)?)
}

pub fn compile_yaml(path: impl AsRef<Path>) -> Result<Arc<CompiledGame>, GameError> {
    compile_yaml_str(&fs::read_to_string(path)?)
}

/// Compile the game stored at `path` and return its starting position.
pub fn start_from_yaml(path: impl AsRef<Path>) -> Result<TableState, GameError> {
    Ok(TableState::start(compile_yaml(path)?))
}

/// Write `spec` as YAML. Invalid specs are rejected and nothing is written.
pub fn save_yaml(path: impl AsRef<Path>, spec: &GameSpec) -> Result<(), GameError> {
    spec.validate()?;
    let yaml = serde_yaml::to_string(spec)?;
    fs::write(path, yaml)?;
    Ok(())
}
