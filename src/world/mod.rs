//! World placement: spawn points

pub mod spawn;

pub use spawn::{SpawnPoint, SpawnPointFile, SpawnPointProvider, SpawnPoints};
