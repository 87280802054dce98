//! Actor components and capability roles
//!
//! Every unit attached to an actor is stored as an [`ActorComponent`], a sum
//! type over the roles the runtime recognises. Role-specific traits extend
//! the common [`Component`] hook set.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::actor::WeakActorRef;
use crate::core::types::{ActorId, ActorShape};
use crate::world::spawn::SpawnPoint;

/// Capability roles a component can fill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Behavior,
    Movement,
    ManualAnimator,
    Generic,
}

impl Role {
    /// Singleton roles may be filled by at most one unit per actor
    pub fn is_singleton(&self) -> bool {
        matches!(self, Role::Behavior | Role::Movement)
    }
}

/// Back-reference handed to every component when its actor initializes
#[derive(Debug, Clone)]
pub struct ComponentOwner {
    pub id: ActorId,
    pub name: String,
    pub shape: ActorShape,
    /// Handle to the owning actor. The actor is mutably borrowed while it
    /// fans hooks out, so only upgrade this outside of a hook.
    pub handle: WeakActorRef,
}

/// Hooks shared by every behavior unit.
///
/// Hooks returning `bool` report "handled": returning `true` stops the
/// fan-out so later units never see the call.
pub trait Component {
    fn initialize(&mut self, _owner: &ComponentOwner) {}

    fn on_think(&mut self, _dt: f32) -> bool {
        false
    }

    fn on_set_facing(&mut self, _facing: Vec3) -> bool {
        false
    }

    /// Veto a spawn or re-spawn before it happens
    fn accepts_spawn(&self, _spawn_point: Option<&SpawnPoint>) -> bool {
        true
    }

    fn on_spawn(&mut self, _spawn_point: Option<&SpawnPoint>) -> bool {
        false
    }

    fn on_respawn(&mut self, _spawn_point: Option<&SpawnPoint>) -> bool {
        false
    }

    fn on_despawn(&mut self) -> bool {
        false
    }

    fn on_move_state_changed(&mut self) -> bool {
        false
    }
}

/// Decision-making unit
pub trait BehaviorComponent: Component {
    fn can_move(&self) -> bool {
        true
    }
}

/// Unit that owns the actor's simulated position
pub trait MovementComponent: Component {
    fn position(&self) -> Vec3;

    fn teleport(&mut self, position: Vec3);

    fn velocity(&self) -> Vec3 {
        Vec3::ZERO
    }

    fn set_velocity(&mut self, _velocity: Vec3) {}
}

/// Unit that drives animation by hand instead of through an animator graph
pub trait ManualAnimatorComponent: Component {
    fn is_animating(&self) -> bool;
}

/// A unit attached to an actor, tagged with its role
pub enum ActorComponent {
    Behavior(Box<dyn BehaviorComponent>),
    Movement(Box<dyn MovementComponent>),
    ManualAnimator(Box<dyn ManualAnimatorComponent>),
    Generic(Box<dyn Component>),
}

macro_rules! dispatch {
    ($self:expr, $unit:ident => $call:expr) => {
        match $self {
            ActorComponent::Behavior($unit) => $call,
            ActorComponent::Movement($unit) => $call,
            ActorComponent::ManualAnimator($unit) => $call,
            ActorComponent::Generic($unit) => $call,
        }
    };
}

impl ActorComponent {
    pub fn behavior(unit: impl BehaviorComponent + 'static) -> Self {
        ActorComponent::Behavior(Box::new(unit))
    }

    pub fn movement(unit: impl MovementComponent + 'static) -> Self {
        ActorComponent::Movement(Box::new(unit))
    }

    pub fn manual_animator(unit: impl ManualAnimatorComponent + 'static) -> Self {
        ActorComponent::ManualAnimator(Box::new(unit))
    }

    pub fn generic(unit: impl Component + 'static) -> Self {
        ActorComponent::Generic(Box::new(unit))
    }

    pub fn role(&self) -> Role {
        match self {
            ActorComponent::Behavior(_) => Role::Behavior,
            ActorComponent::Movement(_) => Role::Movement,
            ActorComponent::ManualAnimator(_) => Role::ManualAnimator,
            ActorComponent::Generic(_) => Role::Generic,
        }
    }

    pub fn initialize(&mut self, owner: &ComponentOwner) {
        dispatch!(self, unit => unit.initialize(owner))
    }

    pub fn on_think(&mut self, dt: f32) -> bool {
        dispatch!(self, unit => unit.on_think(dt))
    }

    pub fn on_set_facing(&mut self, facing: Vec3) -> bool {
        dispatch!(self, unit => unit.on_set_facing(facing))
    }

    pub fn accepts_spawn(&self, spawn_point: Option<&SpawnPoint>) -> bool {
        dispatch!(self, unit => unit.accepts_spawn(spawn_point))
    }

    pub fn on_spawn(&mut self, spawn_point: Option<&SpawnPoint>) -> bool {
        dispatch!(self, unit => unit.on_spawn(spawn_point))
    }

    pub fn on_respawn(&mut self, spawn_point: Option<&SpawnPoint>) -> bool {
        dispatch!(self, unit => unit.on_respawn(spawn_point))
    }

    pub fn on_despawn(&mut self) -> bool {
        dispatch!(self, unit => unit.on_despawn())
    }

    pub fn on_move_state_changed(&mut self) -> bool {
        dispatch!(self, unit => unit.on_move_state_changed())
    }
}

impl std::fmt::Debug for ActorComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ActorComponent::{:?}", self.role())
    }
}

/// Typed view of one role, used for capability lookups
pub trait Capability {
    const ROLE: Role;
    type Unit: ?Sized;

    fn view(component: &ActorComponent) -> Option<&Self::Unit>;
    fn view_mut(component: &mut ActorComponent) -> Option<&mut Self::Unit>;
}

macro_rules! capability {
    ($marker:ident, $variant:ident, $unit:ty) => {
        /// Capability marker for the role of the same name
        pub struct $marker;

        impl Capability for $marker {
            const ROLE: Role = Role::$variant;
            type Unit = $unit;

            fn view(component: &ActorComponent) -> Option<&Self::Unit> {
                match component {
                    ActorComponent::$variant(unit) => Some(&**unit),
                    _ => None,
                }
            }

            fn view_mut(component: &mut ActorComponent) -> Option<&mut Self::Unit> {
                match component {
                    ActorComponent::$variant(unit) => Some(&mut **unit),
                    _ => None,
                }
            }
        }
    };
}

capability!(Behavior, Behavior, dyn BehaviorComponent);
capability!(Movement, Movement, dyn MovementComponent);
capability!(ManualAnimator, ManualAnimator, dyn ManualAnimatorComponent);
capability!(Generic, Generic, dyn Component);
