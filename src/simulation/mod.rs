//! Simulation root: game-state coordinator and the per-tick driver

pub mod tick;

use std::cell::RefCell;
use std::rc::Rc;

use crate::npc::NpcRegistry;

pub use tick::{run_simulation_tick, NpcSimulation, SimulationEvent};

/// Single point where the NPC registry registers itself at startup and
/// unregisters at shutdown
#[derive(Debug, Default)]
pub struct GameState {
    npc_registry: RefCell<Option<Rc<NpcRegistry>>>,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_npc_registry(&self, registry: Rc<NpcRegistry>) {
        let mut slot = self.npc_registry.borrow_mut();
        if slot.is_some() {
            tracing::warn!("Replacing existing NPC registry");
        }
        *slot = Some(registry);
    }

    pub fn unregister_npc_registry(&self) {
        self.npc_registry.borrow_mut().take();
    }

    pub fn npc_registry(&self) -> Option<Rc<NpcRegistry>> {
        self.npc_registry.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::NpcConfig;
    use crate::world::spawn::SpawnPoints;

    #[test]
    fn test_install_and_teardown() {
        let game_state = Rc::new(GameState::new());
        let registry = NpcRegistry::install(
            NpcConfig::default(),
            Rc::new(SpawnPoints::new()),
            &game_state,
        );

        let installed = game_state.npc_registry().expect("registered");
        assert!(Rc::ptr_eq(&installed, &registry));

        registry.teardown();
        assert!(game_state.npc_registry().is_none());
    }

    #[test]
    fn test_teardown_after_coordinator_dropped() {
        let game_state = Rc::new(GameState::new());
        let registry = NpcRegistry::install(
            NpcConfig::default(),
            Rc::new(SpawnPoints::new()),
            &game_state,
        );

        drop(game_state);
        registry.teardown();
    }
}
