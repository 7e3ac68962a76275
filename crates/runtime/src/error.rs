//! Error surface of the session layer.
//!
//! Core failures bubble up through [`RuntimeError`] so callers see a single
//! error type regardless of which layer refused the request.

use thiserror::Error;

use game_core::{ConfigError, EngineError, InvariantViolation, SpawnError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The submitted string is not the name of any command.
    #[error("unknown command {name:?}")]
    InvalidCommand { name: String },

    /// `tick` was called while a previous turn never finished resolving.
    /// The session is unrecoverable once this is observed.
    #[error("turn resolution is already in progress")]
    ReentrantTick,

    #[error("invalid session configuration")]
    Config(#[from] ConfigError),

    /// The generated map blueprint could not be realized into a state.
    #[error("initial state rejected")]
    InitialState(#[source] SpawnError),

    #[error("turn resolution failed")]
    Engine(#[from] EngineError),

    /// A consistency check failed after a turn resolved. The state can no
    /// longer be trusted and the session refuses further ticks.
    #[error("state invariant violated")]
    Invariant(#[source] InvariantViolation),
}
