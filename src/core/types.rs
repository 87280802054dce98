//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for actors
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActorId(pub Uuid);

impl ActorId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for ActorId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Simulation tick counter
pub type Tick = u64;

/// Read-only shape extents of an actor kind, used for proximity tests
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActorShape {
    pub height: f32,
    pub radius: f32,
}

impl ActorShape {
    pub fn new(height: f32, radius: f32) -> Self {
        Self { height, radius }
    }
}

impl Default for ActorShape {
    fn default() -> Self {
        Self {
            height: 2.0,
            radius: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_id_uniqueness() {
        let a = ActorId::new();
        let b = ActorId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_actor_id_display_is_uuid() {
        let uuid = Uuid::new_v4();
        let id = ActorId::from_uuid(uuid);
        assert_eq!(id.to_string(), uuid.to_string());
    }

    #[test]
    fn test_actor_id_hash() {
        use std::collections::HashMap;
        let id = ActorId::new();
        let mut map = HashMap::new();
        map.insert(id, "npc");
        assert_eq!(map.get(&ActorId::from_uuid(id.0)), Some(&"npc"));
    }
}
