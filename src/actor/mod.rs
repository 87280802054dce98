//! Actors: composable simulated entities
//!
//! An [`Actor`] is built inert by [`ActorBuilder`], bound to an identity by
//! [`Actor::initialize`], and then driven through its spawn lifecycle:
//!
//! ```text
//! Uninitialized -> Initialized -> Spawned <-> Despawned
//!                                    \           /
//!                                     Destroyed (terminal)
//! ```
//!
//! Every hook fans out to the actor's [`ComponentSet`] in attachment order.
//! Actors are shared as [`ActorRef`] handles; the tracker they register with
//! is held weakly so teardown order does not matter.

pub mod component;
pub mod component_set;
pub mod events;
pub mod host;
pub mod kinematic;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use glam::Vec3;
use serde_json::Value;

use crate::core::error::ContractViolation;
use crate::core::types::{ActorId, ActorShape};
use crate::world::spawn::SpawnPoint;

pub use component::{
    ActorComponent, Behavior, BehaviorComponent, Capability, Component, ComponentOwner, Generic,
    ManualAnimator, ManualAnimatorComponent, Movement, MovementComponent, Role,
};
pub use component_set::ComponentSet;
pub use events::{EventQueue, EventSink, ScriptEvent, TracingEventSink};
pub use host::{SceneNode, SpatialHost};
pub use kinematic::KinematicMovement;

pub type ActorRef = Rc<RefCell<Actor>>;
pub type WeakActorRef = Weak<RefCell<Actor>>;

/// Registry an actor reports to when it spawns and despawns
pub trait ActorTracker {
    fn register(&self, id: ActorId, actor: ActorRef);

    fn unregister(&self, id: ActorId);

    /// Log actor initialization
    fn enable_debug(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    Initialized,
    Spawned,
    Despawned,
    Destroyed,
}

pub struct Actor {
    id: Option<ActorId>,
    name: String,
    shape: ActorShape,
    is_local: bool,
    model: Option<String>,
    components: ComponentSet,
    facing: Vec3,
    is_moving: bool,
    state: LifecycleState,
    host: Box<dyn SpatialHost>,
    tracker: Option<Weak<dyn ActorTracker>>,
    events: Option<Rc<dyn EventSink>>,
    this: WeakActorRef,
}

impl Actor {
    pub fn id(&self) -> Option<ActorId> {
        self.id
    }

    #[track_caller]
    fn expect_id(&self) -> ActorId {
        match self.id {
            Some(id) => id,
            None => ContractViolation::NotInitialized.raise(),
        }
    }

    /// Display name, derived from the identity
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> ActorShape {
        self.shape
    }

    pub fn height(&self) -> f32 {
        self.shape.height
    }

    pub fn radius(&self) -> f32 {
        self.shape.radius
    }

    /// Whether this simulation instance owns the actor
    pub fn is_local_actor(&self) -> bool {
        self.is_local
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    pub fn set_model(&mut self, model: Option<String>) {
        self.model = model;
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn is_spawned(&self) -> bool {
        self.state == LifecycleState::Spawned
    }

    pub fn is_destroyed(&self) -> bool {
        self.state == LifecycleState::Destroyed
    }

    pub fn facing_direction(&self) -> Vec3 {
        self.facing
    }

    pub fn host(&self) -> &dyn SpatialHost {
        self.host.as_ref()
    }

    pub fn host_mut(&mut self) -> &mut dyn SpatialHost {
        self.host.as_mut()
    }

    /// Handle to this actor, if it is still alive
    pub fn handle(&self) -> Option<ActorRef> {
        self.this.upgrade()
    }

    pub fn tracker(&self) -> Option<Rc<dyn ActorTracker>> {
        self.tracker.as_ref().and_then(Weak::upgrade)
    }

    pub fn set_tracker(&mut self, tracker: Option<Weak<dyn ActorTracker>>) {
        self.tracker = tracker;
    }

    // === COMPONENTS ===

    pub fn components(&self) -> &ComponentSet {
        &self.components
    }

    pub fn has_component<R: Capability>(&self) -> bool {
        self.components.has::<R>()
    }

    pub fn get_component<R: Capability>(&self) -> Option<&R::Unit> {
        self.components.get::<R>()
    }

    pub fn get_component_mut<R: Capability>(&mut self) -> Option<&mut R::Unit> {
        self.components.get_mut::<R>()
    }

    pub fn get_components<'a, R: Capability>(&'a self, out: &mut Vec<&'a R::Unit>) {
        self.components.get_all::<R>(out)
    }

    pub fn run_on_components<F>(&mut self, f: F) -> bool
    where
        F: FnMut(&mut ActorComponent) -> bool,
    {
        self.components.run_until(f)
    }

    pub fn behavior(&self) -> Option<&dyn BehaviorComponent> {
        self.components.get::<Behavior>()
    }

    pub fn movement(&self) -> Option<&dyn MovementComponent> {
        self.components.get::<Movement>()
    }

    pub fn movement_mut(&mut self) -> Option<&mut (dyn MovementComponent + 'static)> {
        self.components.get_mut::<Movement>()
    }

    pub fn manual_animator(&self) -> Option<&dyn ManualAnimatorComponent> {
        self.components.get::<ManualAnimator>()
    }

    // === LIFECYCLE ===

    /// Bind identity and initialize every component in attachment order
    #[track_caller]
    pub fn initialize(&mut self, id: ActorId) {
        if let Some(existing) = self.id {
            ContractViolation::IdentityAlreadySet {
                existing,
                attempted: id,
            }
            .raise();
        }

        if self.tracker().is_some_and(|tracker| tracker.enable_debug()) {
            tracing::debug!("Initializing actor {}", id);
        }

        self.id = Some(id);
        self.name = id.to_string();
        self.state = LifecycleState::Initialized;

        let owner = ComponentOwner {
            id,
            name: self.name.clone(),
            shape: self.shape,
            handle: self.this.clone(),
        };
        self.components.run_until(|c| {
            c.initialize(&owner);
            false
        });
    }

    /// Explicit exit hook for the host. Unregisters if the tracker is
    /// still around.
    pub fn teardown(&mut self) {
        if let Some(id) = self.id {
            if let Some(tracker) = self.tracker() {
                tracker.unregister(id);
            }
        }
    }

    pub fn think(&mut self, dt: f32) {
        self.components.run_until(|c| c.on_think(dt));
    }

    /// Ignores directions that cannot be normalized (zero length)
    pub fn set_facing(&mut self, direction: Vec3) {
        let Some(facing) = direction.try_normalize() else {
            return;
        };

        self.facing = facing;
        self.components.run_until(|c| c.on_set_facing(facing));
    }

    pub fn is_moving(&self) -> bool {
        self.is_moving
    }

    pub fn set_moving(&mut self, is_moving: bool) {
        let changed = self.is_moving != is_moving;
        self.is_moving = is_moving;
        if changed {
            self.move_state_changed();
        }
    }

    /// Notify components of an external movement state change, e.g. to
    /// force the idle/moving transition after a teleport
    pub fn move_state_changed(&mut self) {
        self.components.run_until(|c| c.on_move_state_changed());
    }

    /// True iff every behavior unit allows movement
    pub fn can_move(&self) -> bool {
        let mut behaviors = Vec::new();
        self.components.get_all::<Behavior>(&mut behaviors);
        behaviors.iter().all(|b| b.can_move())
    }

    /// Movement position if the actor has a movement unit, else the host's
    pub fn position(&self) -> Vec3 {
        match self.movement() {
            Some(movement) => movement.position(),
            None => self.host.position(),
        }
    }

    // TODO: factor height in separately from radius (cylinder test)
    /// Planar (XZ) overlap test against a circle at `other_position`
    pub fn collides(&self, other_position: Vec3, other_radius: f32) -> bool {
        let offset = other_position - self.position();
        let planar_sq = offset.x * offset.x + offset.z * offset.z;

        let r = other_radius + self.radius();
        planar_sq < r * r
    }

    pub fn collides_with(&self, other: &Actor) -> bool {
        self.collides(other.position(), other.radius())
    }

    /// Broadcast a named event to script listeners on this actor
    pub fn trigger_script_event(&self, name: &str, args: &[Value]) {
        if let Some(events) = &self.events {
            events.emit(self.expect_id(), name, args);
        }
    }

    fn accepts_spawn(&self, spawn_point: Option<&SpawnPoint>) -> bool {
        self.components.iter().all(|c| c.accepts_spawn(spawn_point))
    }

    fn place_at(&mut self, spawn_point: Option<&SpawnPoint>) {
        if let Some(spawn_point) = spawn_point {
            self.host.set_position(spawn_point.position);
            if let Some(facing) = spawn_point.facing {
                self.set_facing(facing);
            }
        }
        self.host.set_active(true);
    }

    fn register(&self, id: ActorId) {
        match (self.tracker(), self.handle()) {
            (Some(tracker), Some(handle)) => tracker.register(id, handle),
            (None, _) => tracing::debug!("Actor {} spawned without a tracker", id),
            (_, None) => tracing::warn!("Actor {} has no live handle to register", id),
        }
    }

    #[track_caller]
    pub fn on_spawn(&mut self, spawn_point: Option<&SpawnPoint>) -> bool {
        let id = self.expect_id();
        if self.is_destroyed() {
            tracing::warn!("Refusing to spawn destroyed actor {}", id);
            return false;
        }
        if !self.accepts_spawn(spawn_point) {
            tracing::warn!("Spawn of actor {} vetoed by a component", id);
            return false;
        }

        self.place_at(spawn_point);
        self.register(id);
        self.state = LifecycleState::Spawned;

        self.components.run_until(|c| c.on_spawn(spawn_point));

        true
    }

    #[track_caller]
    pub fn on_respawn(&mut self, spawn_point: Option<&SpawnPoint>) -> bool {
        let id = self.expect_id();
        if self.is_destroyed() {
            tracing::warn!("Refusing to re-spawn destroyed actor {}", id);
            return false;
        }
        if !self.accepts_spawn(spawn_point) {
            tracing::warn!("Re-spawn of actor {} vetoed by a component", id);
            return false;
        }

        self.place_at(spawn_point);
        self.register(id);
        self.state = LifecycleState::Spawned;

        self.components.run_until(|c| c.on_respawn(spawn_point));

        true
    }

    /// Despawn the actor. `destroy` removes the host object permanently,
    /// which may cut off effects started by the despawn hooks; otherwise the
    /// host is only deactivated and the actor can be re-spawned later.
    pub fn despawn(&mut self, destroy: bool) {
        if self.is_destroyed() {
            return;
        }

        self.on_despawn();

        if destroy {
            tracing::warn!("Destroying actor {}", self.name);
            self.host.destroy();
            self.state = LifecycleState::Destroyed;
        } else {
            self.host.set_active(false);
            self.state = LifecycleState::Despawned;
        }
    }

    pub fn on_despawn(&mut self) {
        self.components.run_until(|c| c.on_despawn());

        if let Some(id) = self.id {
            if let Some(tracker) = self.tracker() {
                tracker.unregister(id);
            }
        }
    }
}

impl std::fmt::Debug for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Actor")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("facing", &self.facing)
            .field("is_moving", &self.is_moving)
            .field("components", &self.components)
            .finish()
    }
}

/// Builds inert actors
pub struct ActorBuilder {
    shape: ActorShape,
    components: Vec<ActorComponent>,
    host: Option<Box<dyn SpatialHost>>,
    tracker: Option<Weak<dyn ActorTracker>>,
    events: Option<Rc<dyn EventSink>>,
    is_local: bool,
    model: Option<String>,
}

impl ActorBuilder {
    pub fn new(shape: ActorShape) -> Self {
        Self {
            shape,
            components: Vec::new(),
            host: None,
            tracker: None,
            events: None,
            is_local: true,
            model: None,
        }
    }

    pub fn with_component(mut self, component: ActorComponent) -> Self {
        self.components.push(component);
        self
    }

    pub fn with_behavior(self, unit: impl BehaviorComponent + 'static) -> Self {
        self.with_component(ActorComponent::behavior(unit))
    }

    pub fn with_movement(self, unit: impl MovementComponent + 'static) -> Self {
        self.with_component(ActorComponent::movement(unit))
    }

    pub fn with_manual_animator(self, unit: impl ManualAnimatorComponent + 'static) -> Self {
        self.with_component(ActorComponent::manual_animator(unit))
    }

    pub fn with_generic(self, unit: impl Component + 'static) -> Self {
        self.with_component(ActorComponent::generic(unit))
    }

    pub fn with_host(mut self, host: impl SpatialHost + 'static) -> Self {
        self.host = Some(Box::new(host));
        self
    }

    pub fn with_tracker<T: ActorTracker + 'static>(mut self, tracker: &Rc<T>) -> Self {
        let weak: Weak<T> = Rc::downgrade(tracker);
        self.tracker = Some(weak);
        self
    }

    pub fn with_event_sink(mut self, events: Rc<dyn EventSink>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Mark the actor as owned by a remote peer
    pub fn remote(mut self) -> Self {
        self.is_local = false;
        self
    }

    /// Panics if two units claim the same singleton role
    #[track_caller]
    pub fn build(self) -> ActorRef {
        let components = ComponentSet::new(self.components);
        let host = self
            .host
            .unwrap_or_else(|| Box::new(host::SceneNode::default()));

        Rc::new_cyclic(|this| {
            RefCell::new(Actor {
                id: None,
                name: String::new(),
                shape: self.shape,
                is_local: self.is_local,
                model: self.model,
                components,
                facing: Vec3::X,
                is_moving: false,
                state: LifecycleState::Uninitialized,
                host,
                tracker: self.tracker,
                events: self.events,
                this: this.clone(),
            })
        })
    }
}
