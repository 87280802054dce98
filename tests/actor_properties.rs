//! Property tests for actor invariants

use std::cell::Cell;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;

use glam::Vec3;
use npc_runtime::actor::component::{Component, ComponentOwner};
use npc_runtime::actor::{ActorBuilder, ActorRef, ActorTracker, SceneNode};
use npc_runtime::core::config::NpcConfig;
use npc_runtime::core::types::{ActorId, ActorShape};
use npc_runtime::npc::NpcRegistry;
use npc_runtime::world::spawn::SpawnPoints;
use proptest::prelude::*;

/// Counts move-state notifications
struct MoveStateCounter {
    calls: Rc<Cell<usize>>,
}

impl Component for MoveStateCounter {
    fn initialize(&mut self, _owner: &ComponentOwner) {}

    fn on_move_state_changed(&mut self) -> bool {
        self.calls.set(self.calls.get() + 1);
        false
    }
}

fn actor_at(position: Vec3, radius: f32) -> ActorRef {
    let actor = ActorBuilder::new(ActorShape::new(2.0, radius))
        .with_host(SceneNode::new(position))
        .build();
    actor.borrow_mut().initialize(ActorId::new());
    actor
}

fn coord() -> impl Strategy<Value = f32> {
    -100.0f32..100.0
}

proptest! {
    #[test]
    fn initialize_twice_keeps_first_id(_seed in 0u8..8) {
        let actor = ActorBuilder::new(ActorShape::default()).build();
        let first = ActorId::new();
        actor.borrow_mut().initialize(first);

        let result = catch_unwind(AssertUnwindSafe(|| {
            actor.borrow_mut().initialize(ActorId::new());
        }));

        prop_assert!(result.is_err());
        prop_assert_eq!(actor.borrow().id(), Some(first));
    }

    #[test]
    fn facing_is_normalized(
        x in coord(), y in coord(), z in coord(),
        scale in prop::sample::select(vec![1.0e-6f32, 1.0e-4, 1.0e-2, 1.0]),
    ) {
        let direction = Vec3::new(x, y, z) * scale;
        prop_assume!(direction.length_squared() > 1.0e-30);

        let actor = actor_at(Vec3::ZERO, 0.5);
        actor.borrow_mut().set_facing(direction);

        let facing = actor.borrow().facing_direction();
        prop_assert!(facing.abs_diff_eq(direction.normalize(), 1.0e-5));
    }

    #[test]
    fn zero_facing_is_ignored(x in coord(), y in coord(), z in coord()) {
        let direction = Vec3::new(x, y, z);
        prop_assume!(direction.length_squared() > 1.0e-30);

        let actor = actor_at(Vec3::ZERO, 0.5);
        actor.borrow_mut().set_facing(direction);
        let before = actor.borrow().facing_direction();

        actor.borrow_mut().set_facing(Vec3::ZERO);
        prop_assert_eq!(actor.borrow().facing_direction(), before);
    }

    #[test]
    fn move_state_hook_fires_once_per_flip(flags in prop::collection::vec(any::<bool>(), 0..32)) {
        let calls = Rc::new(Cell::new(0));
        let actor = ActorBuilder::new(ActorShape::default())
            .with_generic(MoveStateCounter { calls: calls.clone() })
            .build();
        actor.borrow_mut().initialize(ActorId::new());

        let mut current = false;
        let mut flips = 0;
        for flag in flags {
            if flag != current {
                flips += 1;
                current = flag;
            }
            actor.borrow_mut().set_moving(flag);
        }

        prop_assert_eq!(calls.get(), flips);
        prop_assert_eq!(actor.borrow().is_moving(), current);
    }

    #[test]
    fn collides_matches_planar_distance(
        ax in coord(), ay in coord(), az in coord(),
        bx in coord(), by in coord(), bz in coord(),
        ra in 0.0f32..20.0, rb in 0.0f32..20.0,
    ) {
        let a = actor_at(Vec3::new(ax, ay, az), ra);
        let b = actor_at(Vec3::new(bx, by, bz), rb);

        let dx = bx - ax;
        let dz = bz - az;
        let r = rb + ra;
        let expected = dx * dx + dz * dz < r * r;

        prop_assert_eq!(a.borrow().collides_with(&b.borrow()), expected);
        prop_assert_eq!(b.borrow().collides_with(&a.borrow()), expected);
    }

    #[test]
    fn register_is_idempotent(repeats in 1usize..6) {
        let registry = Rc::new(NpcRegistry::new(NpcConfig::default(), Rc::new(SpawnPoints::new())));
        let actor = ActorBuilder::new(ActorShape::default()).with_tracker(&registry).build();
        let id = ActorId::new();
        actor.borrow_mut().initialize(id);

        for _ in 0..repeats {
            registry.register(id, actor.clone());
        }
        prop_assert_eq!(registry.len(), 1);

        for _ in 0..repeats {
            actor.borrow_mut().on_spawn(None);
        }
        prop_assert_eq!(registry.len(), 1);
    }
}
