pub mod config;
pub mod error;
pub mod types;

pub use config::NpcConfig;
pub use error::{ContractViolation, Result, RuntimeError};
pub use types::{ActorId, ActorShape, Tick};
