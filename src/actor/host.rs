//! Spatial host objects backing actors in the scene

use glam::Vec3;

/// The scene object an actor lives on. Supplies a world position and
/// accepts activation and permanent-destruction commands.
pub trait SpatialHost {
    fn position(&self) -> Vec3;

    fn set_position(&mut self, position: Vec3);

    fn is_active(&self) -> bool;

    fn set_active(&mut self, active: bool);

    /// Permanently remove the object from the scene
    fn destroy(&mut self);

    fn is_destroyed(&self) -> bool;
}

/// In-memory scene node
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub position: Vec3,
    active: bool,
    destroyed: bool,
}

impl SceneNode {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            active: true,
            destroyed: false,
        }
    }
}

impl Default for SceneNode {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

impl SpatialHost for SceneNode {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn is_active(&self) -> bool {
        self.active && !self.destroyed
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn destroy(&mut self) {
        self.active = false;
        self.destroyed = true;
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}
