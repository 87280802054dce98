//! NPC registry: tracks every live NPC and issues bulk lifecycle commands
//!
//! The registry is shared as `Rc<NpcRegistry>`. Actors hold it weakly
//! through [`ActorTracker`], so membership changes happen through `&self`
//! and every method is safe to call while other members are despawning.

pub mod debug;
pub mod stuck;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use ahash::AHashMap;

use crate::actor::{ActorRef, ActorTracker};
use crate::core::config::NpcConfig;
use crate::core::error::{ContractViolation, Result, RuntimeError};
use crate::core::types::ActorId;
use crate::simulation::GameState;
use crate::world::spawn::SpawnPointProvider;

pub use debug::{NpcSnapshot, RegistrySnapshot};
pub use stuck::StuckChecker;

pub struct NpcRegistry {
    config: RefCell<NpcConfig>,
    members: RefCell<AHashMap<ActorId, ActorRef>>,
    spawn_points: Rc<dyn SpawnPointProvider>,
    coordinator: RefCell<Weak<GameState>>,
}

impl NpcRegistry {
    pub fn new(config: NpcConfig, spawn_points: Rc<dyn SpawnPointProvider>) -> Self {
        Self {
            config: RefCell::new(config),
            members: RefCell::new(AHashMap::new()),
            spawn_points,
            coordinator: RefCell::new(Weak::new()),
        }
    }

    /// Create a registry and register it with the game-state coordinator
    pub fn install(
        config: NpcConfig,
        spawn_points: Rc<dyn SpawnPointProvider>,
        game_state: &Rc<GameState>,
    ) -> Rc<Self> {
        let registry = Rc::new(Self::new(config, spawn_points));
        *registry.coordinator.borrow_mut() = Rc::downgrade(game_state);
        game_state.register_npc_registry(registry.clone());
        registry
    }

    /// Shutdown hook. The coordinator may already be gone.
    pub fn teardown(&self) {
        if let Some(game_state) = self.coordinator.borrow().upgrade() {
            game_state.unregister_npc_registry();
        }
    }

    // === CONFIG ===

    pub fn config(&self) -> NpcConfig {
        self.config.borrow().clone()
    }

    pub fn npcs_immune(&self) -> bool {
        self.config.borrow().npcs_immune
    }

    pub fn set_npcs_immune(&self, immune: bool) {
        self.config.borrow_mut().npcs_immune = immune;
    }

    pub fn debug_behavior(&self) -> bool {
        self.config.borrow().debug_behavior
    }

    pub fn set_debug_behavior(&self, debug: bool) {
        self.config.borrow_mut().debug_behavior = debug;
    }

    pub fn stuck_check_seconds(&self) -> f32 {
        self.config.borrow().stuck_check_seconds()
    }

    pub fn stuck_check_max_passes(&self) -> u32 {
        self.config.borrow().stuck_check_max_passes
    }

    pub fn stuck_min_progress(&self) -> f32 {
        self.config.borrow().stuck_min_progress
    }

    // === MEMBERSHIP ===

    pub fn len(&self) -> usize {
        self.members.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.borrow().is_empty()
    }

    pub fn contains(&self, id: ActorId) -> bool {
        self.members.borrow().contains_key(&id)
    }

    pub fn get(&self, id: ActorId) -> Option<ActorRef> {
        self.members.borrow().get(&id).cloned()
    }

    /// Snapshot of the current members, in no particular order
    pub fn members(&self) -> Vec<ActorRef> {
        self.members.borrow().values().cloned().collect()
    }

    pub fn ids(&self) -> Vec<ActorId> {
        self.members.borrow().keys().copied().collect()
    }

    #[track_caller]
    fn id_of(actor: &ActorRef) -> ActorId {
        match actor.borrow().id() {
            Some(id) => id,
            None => ContractViolation::NotInitialized.raise(),
        }
    }

    pub fn register_npc(&self, actor: &ActorRef) {
        let id = Self::id_of(actor);
        self.register(id, actor.clone());
    }

    pub fn unregister_npc(&self, actor: &ActorRef) {
        let id = Self::id_of(actor);
        self.unregister(id);
    }

    // === LIFECYCLE ===

    /// Re-spawn an NPC at a spawn point resolved from `tag`
    pub fn respawn_npc(&self, actor: &ActorRef, tag: &str) -> Result<()> {
        let id = Self::id_of(actor);
        tracing::info!("Respawning NPC {}", id);

        let Some(spawn_point) = self.spawn_points.spawn_point(tag) else {
            tracing::error!("Failed to get NPC spawnpoint for tag {}", tag);
            return Err(RuntimeError::SpawnPointNotFound(tag.to_string()));
        };

        let mut actor = actor.borrow_mut();
        if spawn_point.respawn(&mut actor) {
            Ok(())
        } else if actor.is_destroyed() {
            Err(RuntimeError::ActorDestroyed(id))
        } else {
            Err(RuntimeError::SpawnVetoed(id))
        }
    }

    /// Permanently destroy every tracked NPC. Returns how many were destroyed.
    pub fn despawn_all(&self) -> usize {
        // despawning unregisters, so iterate a snapshot
        let npcs: Vec<(ActorId, ActorRef)> = self
            .members
            .borrow()
            .iter()
            .map(|(id, actor)| (*id, actor.clone()))
            .collect();

        tracing::info!("Despawning {} NPCs...", npcs.len());

        for (id, npc) in &npcs {
            npc.borrow_mut().despawn(true);
            // members registered by hand may not report back to us
            self.unregister(*id);
        }

        npcs.len()
    }
}

impl ActorTracker for NpcRegistry {
    fn register(&self, id: ActorId, actor: ActorRef) {
        let mut members = self.members.borrow_mut();
        if !members.contains_key(&id) {
            members.insert(id, actor);
            tracing::info!("Registered NPC {}", id);
        }
    }

    fn unregister(&self, id: ActorId) {
        if self.members.borrow_mut().remove(&id).is_some() {
            tracing::info!("Unregistered NPC {}", id);
        }
    }

    fn enable_debug(&self) -> bool {
        self.config.borrow().enable_actor_debug
    }
}

impl std::fmt::Debug for NpcRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NpcRegistry")
            .field("config", &self.config.borrow())
            .field("members", &self.ids())
            .finish()
    }
}
