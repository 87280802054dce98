//! Constant-velocity movement unit

use glam::Vec3;

use crate::actor::component::{Component, ComponentOwner, MovementComponent};
use crate::core::types::ActorId;
use crate::world::spawn::SpawnPoint;

/// Integrates `position += velocity * dt` every think. A blocked unit keeps
/// its velocity but never moves, which is what the stuck check looks for.
#[derive(Debug, Clone, Default)]
pub struct KinematicMovement {
    position: Vec3,
    velocity: Vec3,
    blocked: bool,
    owner: Option<ActorId>,
}

impl KinematicMovement {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn blocked(mut self) -> Self {
        self.blocked = true;
        self
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    pub fn owner(&self) -> Option<ActorId> {
        self.owner
    }
}

impl Component for KinematicMovement {
    fn initialize(&mut self, owner: &ComponentOwner) {
        self.owner = Some(owner.id);
    }

    fn on_think(&mut self, dt: f32) -> bool {
        if !self.blocked {
            self.position += self.velocity * dt;
        }
        false
    }

    fn on_spawn(&mut self, spawn_point: Option<&SpawnPoint>) -> bool {
        if let Some(spawn_point) = spawn_point {
            self.position = spawn_point.position;
        }
        false
    }

    fn on_respawn(&mut self, spawn_point: Option<&SpawnPoint>) -> bool {
        if let Some(spawn_point) = spawn_point {
            self.position = spawn_point.position;
        }
        self.velocity = Vec3::ZERO;
        self.blocked = false;
        false
    }
}

impl MovementComponent for KinematicMovement {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn teleport(&mut self, position: Vec3) {
        self.position = position;
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }
}
