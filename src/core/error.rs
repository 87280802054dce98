use thiserror::Error;

use crate::actor::component::Role;
use crate::core::types::ActorId;

/// Recoverable runtime failures, returned to the caller
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Spawn point not found: {0}")]
    SpawnPointNotFound(String),

    #[error("Spawn vetoed for actor {0}")]
    SpawnVetoed(ActorId),

    #[error("Actor {0} has been destroyed")]
    ActorDestroyed(ActorId),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Programming-contract violations. These are defects in how an actor was
/// assembled or driven and are raised as panics, never returned as `Err`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContractViolation {
    #[error("Stomping existing actor id {existing} with {attempted}")]
    IdentityAlreadySet { existing: ActorId, attempted: ActorId },

    #[error("Duplicate {0:?} component; at most one is allowed per actor")]
    DuplicateRole(Role),

    #[error("Actor used before initialize()")]
    NotInitialized,
}

impl ContractViolation {
    /// Abort the current operation with this violation
    #[track_caller]
    pub fn raise(self) -> ! {
        panic!("{}", self)
    }
}
