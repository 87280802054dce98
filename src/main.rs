//! NPC Sim - Entry Point
//!
//! Headless driver for the NPC runtime. Spawns a population of kinematic
//! NPCs, runs simulation ticks, reports stuck NPCs and prints the registry
//! debug snapshot before shutting everything down.

use std::path::PathBuf;
use std::rc::Rc;

use clap::Parser;
use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use npc_runtime::actor::{ActorBuilder, ActorRef, KinematicMovement, SceneNode, TracingEventSink};
use npc_runtime::core::config::NpcConfig;
use npc_runtime::core::error::Result;
use npc_runtime::core::types::{ActorId, ActorShape};
use npc_runtime::npc::NpcRegistry;
use npc_runtime::simulation::{run_simulation_tick, GameState, NpcSimulation, SimulationEvent};
use npc_runtime::world::spawn::{SpawnPoint, SpawnPoints};

const SPAWN_TAG: &str = "npc";
const WORLD_SIZE: f32 = 50.0;

/// Headless NPC simulation
#[derive(Parser, Debug)]
#[command(name = "npc_sim")]
#[command(about = "Run NPCs through the actor runtime and report stuck ones")]
struct Args {
    /// NPC configuration (TOML). Defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Spawn point file (TOML). A ring of points is generated when omitted.
    #[arg(long)]
    spawn_points: Option<PathBuf>,

    /// Number of NPCs to spawn
    #[arg(long, default_value_t = 20)]
    npcs: usize,

    /// Number of ticks to run
    #[arg(long, default_value_t = 200)]
    ticks: u64,

    /// Seconds per tick
    #[arg(long, default_value_t = 0.1)]
    dt: f32,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Fraction of NPCs whose movement is blocked from the start
    #[arg(long, default_value_t = 0.2)]
    blocked: f64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("npc_runtime=debug")
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => NpcConfig::load(path)?,
        None => NpcConfig::default(),
    };
    let spawn_points = match &args.spawn_points {
        Some(path) => SpawnPoints::load(path)?,
        None => default_spawn_points(),
    };

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    tracing::info!("NPC sim starting (seed {})...", seed);

    let game_state = Rc::new(GameState::new());
    let registry = NpcRegistry::install(config, Rc::new(spawn_points), &game_state);

    let npcs = spawn_population(&registry, &args, &mut rng);
    tracing::info!("Spawned {} NPCs", npcs.len());

    let mut sim = NpcSimulation::new(registry.clone()).with_respawn_tag(SPAWN_TAG);
    let mut stuck_count = 0;
    for _ in 0..args.ticks {
        for event in run_simulation_tick(&mut sim, args.dt) {
            match event {
                SimulationEvent::Stuck { tick, id } => {
                    stuck_count += 1;
                    println!("[tick {}] NPC {} stuck", tick, id);
                }
                SimulationEvent::Respawned { tick, id } => {
                    println!("[tick {}] NPC {} re-spawned", tick, id);
                }
                SimulationEvent::RespawnFailed { tick, id, reason } => {
                    println!("[tick {}] NPC {} could not be re-spawned: {}", tick, id, reason);
                }
            }
        }
    }

    println!();
    println!(
        "--- Tick {} | NPCs: {} | Stuck reports: {} ---",
        sim.current_tick,
        registry.len(),
        stuck_count
    );
    match registry.debug_snapshot().to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => tracing::error!("Failed to serialize debug snapshot: {}", e),
    }

    let destroyed = registry.despawn_all();
    registry.teardown();

    println!("\nGoodbye! Destroyed {} NPCs.", destroyed);
    Ok(())
}

/// A ring of spawn points around the origin, all sharing one tag
fn default_spawn_points() -> SpawnPoints {
    let mut points = SpawnPoints::new();
    for i in 0..8 {
        let angle = i as f32 * std::f32::consts::TAU / 8.0;
        let position = Vec3::new(angle.cos(), 0.0, angle.sin()) * (WORLD_SIZE / 4.0);
        points.add(SpawnPoint::new(SPAWN_TAG, position).with_facing(-position));
    }
    points
}

fn spawn_population(registry: &Rc<NpcRegistry>, args: &Args, rng: &mut ChaCha8Rng) -> Vec<ActorRef> {
    let events = Rc::new(TracingEventSink);
    let mut npcs = Vec::with_capacity(args.npcs);

    for _ in 0..args.npcs {
        let position = Vec3::new(
            rng.gen_range(-WORLD_SIZE..WORLD_SIZE),
            0.0,
            rng.gen_range(-WORLD_SIZE..WORLD_SIZE),
        );
        let velocity = Vec3::new(rng.gen_range(-2.0..2.0), 0.0, rng.gen_range(-2.0..2.0));

        let mut movement = KinematicMovement::new(position).with_velocity(velocity);
        if rng.gen_bool(args.blocked.clamp(0.0, 1.0)) {
            movement = movement.blocked();
        }

        let npc = ActorBuilder::new(ActorShape::default())
            .with_movement(movement)
            .with_host(SceneNode::new(position))
            .with_tracker(registry)
            .with_event_sink(events.clone())
            .build();

        let id = ActorId::new();
        npc.borrow_mut().initialize(id);
        if npc.borrow_mut().on_spawn(None) {
            npc.borrow().trigger_script_event("spawned", &[serde_json::json!(id.to_string())]);
            npcs.push(npc);
        }
    }

    npcs
}
