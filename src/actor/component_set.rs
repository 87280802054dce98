//! Ordered component storage with a role index built at attachment time

use ahash::AHashMap;

use crate::actor::component::{ActorComponent, Capability, Role};
use crate::core::error::ContractViolation;

/// The fixed, ordered list of units owned by one actor.
///
/// Membership never changes after construction. Fan-out always walks the
/// units in attachment order; the role index only accelerates lookups.
#[derive(Debug, Default)]
pub struct ComponentSet {
    units: Vec<ActorComponent>,
    index: AHashMap<Role, Vec<usize>>,
}

impl ComponentSet {
    /// Build a set, rejecting a second unit in any singleton role
    pub fn try_new(units: Vec<ActorComponent>) -> Result<Self, ContractViolation> {
        let mut index: AHashMap<Role, Vec<usize>> = AHashMap::new();
        for (i, unit) in units.iter().enumerate() {
            let role = unit.role();
            let slots = index.entry(role).or_default();
            if role.is_singleton() && !slots.is_empty() {
                return Err(ContractViolation::DuplicateRole(role));
            }
            slots.push(i);
        }

        Ok(Self { units, index })
    }

    /// Build a set, panicking on a duplicate singleton role
    #[track_caller]
    pub fn new(units: Vec<ActorComponent>) -> Self {
        match Self::try_new(units) {
            Ok(set) => set,
            Err(violation) => violation.raise(),
        }
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    fn slots(&self, role: Role) -> &[usize] {
        self.index.get(&role).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of units filling the role
    pub fn count<R: Capability>(&self) -> usize {
        self.slots(R::ROLE).len()
    }

    /// True iff exactly one unit fills the role
    pub fn has<R: Capability>(&self) -> bool {
        self.count::<R>() == 1
    }

    /// First unit filling the role, in attachment order
    pub fn get<R: Capability>(&self) -> Option<&R::Unit> {
        let &i = self.slots(R::ROLE).first()?;
        R::view(&self.units[i])
    }

    pub fn get_mut<R: Capability>(&mut self) -> Option<&mut R::Unit> {
        let &i = self.slots(R::ROLE).first()?;
        R::view_mut(&mut self.units[i])
    }

    /// Clear `out`, then append every unit filling the role in attachment order
    pub fn get_all<'a, R: Capability>(&'a self, out: &mut Vec<&'a R::Unit>) {
        out.clear();
        for &i in self.slots(R::ROLE) {
            if let Some(unit) = R::view(&self.units[i]) {
                out.push(unit);
            }
        }
    }

    /// Run `f` on each unit in attachment order, stopping at the first unit
    /// for which it returns `true`. Returns whether any unit handled the call.
    pub fn run_until<F>(&mut self, mut f: F) -> bool
    where
        F: FnMut(&mut ActorComponent) -> bool,
    {
        for unit in self.units.iter_mut() {
            if f(unit) {
                return true;
            }
        }
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActorComponent> {
        self.units.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::component::{
        Behavior, BehaviorComponent, Component, Generic, ManualAnimator, ManualAnimatorComponent,
        Movement, MovementComponent,
    };
    use glam::Vec3;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Tagged {
        tag: &'static str,
        log: Rc<RefCell<Vec<&'static str>>>,
        handles: bool,
    }

    impl Component for Tagged {
        fn on_think(&mut self, _dt: f32) -> bool {
            self.log.borrow_mut().push(self.tag);
            self.handles
        }
    }

    struct Brain;
    impl Component for Brain {}
    impl BehaviorComponent for Brain {}

    struct Walker(Vec3);
    impl Component for Walker {}
    impl MovementComponent for Walker {
        fn position(&self) -> Vec3 {
            self.0
        }
        fn teleport(&mut self, position: Vec3) {
            self.0 = position;
        }
    }

    struct Puppet(bool);
    impl Component for Puppet {}
    impl ManualAnimatorComponent for Puppet {
        fn is_animating(&self) -> bool {
            self.0
        }
    }

    fn tagged(
        tag: &'static str,
        log: &Rc<RefCell<Vec<&'static str>>>,
        handles: bool,
    ) -> ActorComponent {
        ActorComponent::generic(Tagged {
            tag,
            log: log.clone(),
            handles,
        })
    }

    #[test]
    fn test_lookup_by_role() {
        let set = ComponentSet::new(vec![
            ActorComponent::behavior(Brain),
            ActorComponent::movement(Walker(Vec3::new(1.0, 0.0, 2.0))),
        ]);

        assert!(set.has::<Behavior>());
        assert!(set.has::<Movement>());
        assert!(!set.has::<ManualAnimator>());
        assert_eq!(set.get::<Movement>().map(|m| m.position()), Some(Vec3::new(1.0, 0.0, 2.0)));
        assert!(set.get::<Generic>().is_none());
    }

    #[test]
    fn test_has_requires_exactly_one() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let set = ComponentSet::new(vec![tagged("a", &log, false), tagged("b", &log, false)]);

        assert_eq!(set.count::<Generic>(), 2);
        assert!(!set.has::<Generic>());
        assert!(set.get::<Generic>().is_some());
    }

    #[test]
    fn test_get_all_clears_and_preserves_order() {
        let set = ComponentSet::new(vec![
            ActorComponent::manual_animator(Puppet(true)),
            ActorComponent::behavior(Brain),
            ActorComponent::manual_animator(Puppet(false)),
            ActorComponent::manual_animator(Puppet(false)),
            ActorComponent::manual_animator(Puppet(true)),
        ]);

        let mut out = Vec::new();
        set.get_all::<ManualAnimator>(&mut out);
        let animating: Vec<bool> = out.iter().map(|p| p.is_animating()).collect();
        assert_eq!(animating, vec![true, false, false, true]);
        assert!(set.get::<ManualAnimator>().is_some_and(|p| p.is_animating()));

        let mut behaviors = Vec::new();
        set.get_all::<Behavior>(&mut behaviors);
        assert_eq!(behaviors.len(), 1);
        set.get_all::<Behavior>(&mut behaviors);
        assert_eq!(behaviors.len(), 1);
    }

    #[test]
    fn test_run_until_stops_at_first_handler() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut set = ComponentSet::new(vec![
            tagged("first", &log, false),
            tagged("second", &log, true),
            tagged("third", &log, false),
        ]);

        let handled = set.run_until(|c| c.on_think(0.016));

        assert!(handled);
        assert_eq!(*log.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn test_run_until_visits_all_when_unhandled() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut set = ComponentSet::new(vec![tagged("a", &log, false), tagged("b", &log, false)]);

        assert!(!set.run_until(|c| c.on_think(0.016)));
        assert_eq!(*log.borrow(), vec!["a", "b"]);
    }

    #[test]
    fn test_duplicate_movement_rejected() {
        let result = ComponentSet::try_new(vec![
            ActorComponent::movement(Walker(Vec3::ZERO)),
            ActorComponent::movement(Walker(Vec3::ONE)),
        ]);
        assert_eq!(result.err(), Some(ContractViolation::DuplicateRole(Role::Movement)));
    }

    #[test]
    #[should_panic(expected = "Duplicate Behavior component")]
    fn test_duplicate_behavior_panics() {
        ComponentSet::new(vec![ActorComponent::behavior(Brain), ActorComponent::behavior(Brain)]);
    }

    #[test]
    fn test_empty_set() {
        let set = ComponentSet::default();
        assert!(set.is_empty());
        assert!(!set.has::<Movement>());
        assert!(set.get::<Behavior>().is_none());
    }
}
