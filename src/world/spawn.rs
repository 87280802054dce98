//! Spawn points and spawn-point lookup
//!
//! Spawn points are named locations used to place or re-place an actor.
//! They can be authored in TOML:
//!
//! ```toml
//! version = 1
//!
//! [[spawn_points]]
//! tag = "npc"
//! position = [4.0, 0.0, -2.0]
//! facing = [0.0, 0.0, 1.0]
//! ```

use std::cell::RefCell;
use std::path::Path;

use ahash::AHashMap;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::actor::Actor;
use crate::core::error::Result;

/// A named location an actor can be spawned or re-spawned at
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub tag: String,
    pub position: Vec3,
    /// Facing applied to the actor on (re-)spawn
    #[serde(default)]
    pub facing: Option<Vec3>,
}

impl SpawnPoint {
    pub fn new(tag: impl Into<String>, position: Vec3) -> Self {
        Self {
            tag: tag.into(),
            position,
            facing: None,
        }
    }

    pub fn with_facing(mut self, facing: Vec3) -> Self {
        self.facing = Some(facing);
        self
    }

    /// Spawn a freshly initialized actor here
    pub fn spawn(&self, actor: &mut Actor) -> bool {
        actor.on_spawn(Some(self))
    }

    /// Revive a previously despawned actor here
    pub fn respawn(&self, actor: &mut Actor) -> bool {
        actor.on_respawn(Some(self))
    }
}

/// Resolves a tag to a spawn point
pub trait SpawnPointProvider {
    fn spawn_point(&self, tag: &str) -> Option<SpawnPoint>;
}

/// Root structure for spawn point files
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SpawnPointFile {
    /// Schema version (currently 1)
    pub version: u32,
    #[serde(default)]
    pub spawn_points: Vec<SpawnPoint>,
}

/// Map-backed provider. Tags with several points hand them out round-robin.
#[derive(Debug, Default)]
pub struct SpawnPoints {
    by_tag: AHashMap<String, Vec<SpawnPoint>>,
    cursors: RefCell<AHashMap<String, usize>>,
}

impl SpawnPoints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, spawn_point: SpawnPoint) {
        self.by_tag
            .entry(spawn_point.tag.clone())
            .or_default()
            .push(spawn_point);
    }

    pub fn len(&self) -> usize {
        self.by_tag.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_tag.is_empty()
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: SpawnPointFile = toml::from_str(content)?;
        let mut points = Self::new();
        for spawn_point in file.spawn_points {
            points.add(spawn_point);
        }
        Ok(points)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

impl SpawnPointProvider for SpawnPoints {
    fn spawn_point(&self, tag: &str) -> Option<SpawnPoint> {
        let candidates = self.by_tag.get(tag)?;
        if candidates.is_empty() {
            return None;
        }

        let mut cursors = self.cursors.borrow_mut();
        let cursor = cursors.entry(tag.to_string()).or_insert(0);
        let spawn_point = candidates[*cursor % candidates.len()].clone();
        *cursor = (*cursor + 1) % candidates.len();
        Some(spawn_point)
    }
}
