//! Tick system - orchestrates NPC updates
//!
//! think -> movement state sync -> stuck check -> corrective re-spawn
//!
//! Everything runs on the caller's thread; every step completes before the
//! next one starts.

use std::rc::Rc;

use glam::Vec3;

use crate::core::types::{ActorId, Tick};
use crate::npc::{NpcRegistry, StuckChecker};

/// Velocities with a squared length below this count as standing still
const MOVING_EPSILON: f32 = 1.0e-6;

/// Events generated during a simulation tick
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationEvent {
    /// An NPC failed the stuck check too many times in a row
    Stuck { tick: Tick, id: ActorId },
    /// A stuck NPC was moved back to a spawn point
    Respawned { tick: Tick, id: ActorId },
    /// A stuck NPC could not be re-spawned
    RespawnFailed {
        tick: Tick,
        id: ActorId,
        reason: String,
    },
}

/// The state a tick operates on
pub struct NpcSimulation {
    pub current_tick: Tick,
    pub registry: Rc<NpcRegistry>,
    pub stuck_checker: StuckChecker,
    /// Spawn tag stuck NPCs are re-spawned at. `None` only reports them.
    pub respawn_tag: Option<String>,
}

impl NpcSimulation {
    pub fn new(registry: Rc<NpcRegistry>) -> Self {
        Self {
            current_tick: 0,
            registry,
            stuck_checker: StuckChecker::new(),
            respawn_tag: None,
        }
    }

    pub fn with_respawn_tag(mut self, tag: impl Into<String>) -> Self {
        self.respawn_tag = Some(tag.into());
        self
    }
}

/// Run a single simulation tick
///
/// Returns the events that occurred during this tick.
pub fn run_simulation_tick(sim: &mut NpcSimulation, dt: f32) -> Vec<SimulationEvent> {
    let mut events = Vec::new();

    for npc in sim.registry.members() {
        let mut npc = npc.borrow_mut();
        npc.think(dt);

        let velocity = npc.movement().map(|m| m.velocity()).unwrap_or(Vec3::ZERO);
        let moving = velocity.length_squared() > MOVING_EPSILON && npc.can_move();
        npc.set_moving(moving);
    }

    let stuck = sim.stuck_checker.update(&sim.registry, dt);
    for id in stuck {
        events.push(SimulationEvent::Stuck {
            tick: sim.current_tick,
            id,
        });

        let (Some(tag), Some(npc)) = (sim.respawn_tag.as_deref(), sim.registry.get(id)) else {
            continue;
        };
        match sim.registry.respawn_npc(&npc, tag) {
            Ok(()) => events.push(SimulationEvent::Respawned {
                tick: sim.current_tick,
                id,
            }),
            Err(e) => events.push(SimulationEvent::RespawnFailed {
                tick: sim.current_tick,
                id,
                reason: e.to_string(),
            }),
        }
    }

    sim.current_tick += 1;
    events
}
