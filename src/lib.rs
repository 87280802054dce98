//! NPC Runtime - actor/component framework and NPC registry for real-time simulation

pub mod actor;
pub mod core;
pub mod npc;
pub mod simulation;
pub mod world;
