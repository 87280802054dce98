//! Periodic liveness sampling for tracked NPCs
//!
//! Every `stuck_check_seconds` the checker samples each NPC with a movement
//! unit. A sample fails when the NPC claims to be moving but covered less
//! than `stuck_min_progress` since the previous sample. After
//! `stuck_check_max_passes` consecutive failures the NPC is reported stuck
//! and its counter starts over. What to do about it is up to the caller.

use ahash::{AHashMap, AHashSet};
use glam::Vec3;

use crate::core::types::ActorId;
use crate::npc::NpcRegistry;

#[derive(Debug, Clone, Copy)]
struct Sample {
    last_position: Vec3,
    failed_passes: u32,
}

#[derive(Debug, Default)]
pub struct StuckChecker {
    elapsed: f32,
    samples: AHashMap<ActorId, Sample>,
}

impl StuckChecker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the timer and sample once the interval has elapsed.
    /// Returns the NPCs found stuck on this pass.
    pub fn update(&mut self, registry: &NpcRegistry, dt: f32) -> Vec<ActorId> {
        let interval = registry.stuck_check_seconds();
        self.elapsed += dt;
        if self.elapsed < interval {
            return Vec::new();
        }
        // carry the overshoot so the cadence does not drift; at most one
        // sample per update, so the carry never exceeds one interval
        self.elapsed = (self.elapsed - interval).min(interval);

        self.sample(registry)
    }

    /// Run one sampling pass immediately
    pub fn sample(&mut self, registry: &NpcRegistry) -> Vec<ActorId> {
        let max_passes = registry.stuck_check_max_passes();
        let min_progress_sq = registry.stuck_min_progress().powi(2);

        let mut seen = AHashSet::new();
        let mut stuck = Vec::new();

        for npc in registry.members() {
            let Ok(npc) = npc.try_borrow() else {
                continue;
            };
            let Some(id) = npc.id() else {
                continue;
            };
            let Some(movement) = npc.movement() else {
                continue;
            };
            seen.insert(id);

            let position = movement.position();
            let Some(sample) = self.samples.get_mut(&id) else {
                self.samples.insert(
                    id,
                    Sample {
                        last_position: position,
                        failed_passes: 0,
                    },
                );
                continue;
            };

            let progressed = position.distance_squared(sample.last_position) >= min_progress_sq;
            sample.last_position = position;

            if !npc.is_moving() || progressed {
                sample.failed_passes = 0;
                continue;
            }

            sample.failed_passes += 1;
            if sample.failed_passes >= max_passes {
                tracing::warn!(
                    "NPC {} stuck after {} failed passes at {:?}",
                    id,
                    sample.failed_passes,
                    position
                );
                sample.failed_passes = 0;
                stuck.push(id);
            }
        }

        self.samples.retain(|id, _| seen.contains(id));
        stuck
    }

    /// Consecutive failed passes recorded for an NPC
    pub fn failed_passes(&self, id: ActorId) -> u32 {
        self.samples.get(&id).map_or(0, |s| s.failed_passes)
    }

    pub fn tracked(&self) -> usize {
        self.samples.len()
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.samples.clear();
    }
}
