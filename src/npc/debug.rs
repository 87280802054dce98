//! Read-only inspection of registry state for debug overlays

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::actor::LifecycleState;
use crate::core::types::ActorId;
use crate::npc::NpcRegistry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcSnapshot {
    pub id: ActorId,
    /// Movement position, if the NPC has a movement unit
    pub position: Option<Vec3>,
    pub is_moving: bool,
    pub spawned: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub npcs_immune: bool,
    pub debug_behavior: bool,
    pub stuck_check_seconds: f32,
    pub stuck_check_max_passes: u32,
    pub npcs: Vec<NpcSnapshot>,
}

impl RegistrySnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl NpcRegistry {
    /// Observational snapshot. Members that are mutably borrowed at the
    /// time of the call are skipped.
    pub fn debug_snapshot(&self) -> RegistrySnapshot {
        let mut npcs: Vec<NpcSnapshot> = self
            .members()
            .iter()
            .filter_map(|npc| {
                let npc = npc.try_borrow().ok()?;
                Some(NpcSnapshot {
                    id: npc.id()?,
                    position: npc.movement().map(|m| m.position()),
                    is_moving: npc.is_moving(),
                    spawned: npc.state() == LifecycleState::Spawned,
                })
            })
            .collect();
        npcs.sort_by_key(|npc| npc.id);

        RegistrySnapshot {
            npcs_immune: self.npcs_immune(),
            debug_behavior: self.debug_behavior(),
            stuck_check_seconds: self.stuck_check_seconds(),
            stuck_check_max_passes: self.stuck_check_max_passes(),
            npcs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{ActorBuilder, KinematicMovement};
    use crate::core::config::NpcConfig;
    use crate::core::types::ActorShape;
    use crate::world::spawn::SpawnPoints;
    use std::rc::Rc;

    #[test]
    fn test_snapshot_lists_members() {
        let registry = Rc::new(NpcRegistry::new(
            NpcConfig::default(),
            Rc::new(SpawnPoints::new()),
        ));
        let npc = ActorBuilder::new(ActorShape::default())
            .with_movement(KinematicMovement::new(Vec3::new(1.0, 0.0, 2.0)))
            .with_tracker(&registry)
            .build();
        let id = ActorId::new();
        npc.borrow_mut().initialize(id);
        npc.borrow_mut().on_spawn(None);
        registry.set_npcs_immune(true);

        let snapshot = registry.debug_snapshot();

        assert!(snapshot.npcs_immune);
        assert_eq!(snapshot.npcs.len(), 1);
        assert_eq!(snapshot.npcs[0].id, id);
        assert_eq!(snapshot.npcs[0].position, Some(Vec3::new(1.0, 0.0, 2.0)));
        assert!(snapshot.npcs[0].spawned);
        assert!(snapshot.to_json().expect("serializable").contains("npcs_immune"));
    }

    #[test]
    fn test_snapshot_skips_borrowed_members() {
        let registry = Rc::new(NpcRegistry::new(
            NpcConfig::default(),
            Rc::new(SpawnPoints::new()),
        ));
        let npc = ActorBuilder::new(ActorShape::default())
            .with_tracker(&registry)
            .build();
        npc.borrow_mut().initialize(ActorId::new());
        npc.borrow_mut().on_spawn(None);

        let _guard = npc.borrow_mut();
        assert!(registry.debug_snapshot().npcs.is_empty());
    }
}
