//! Headless simulation for the DUNEFIRE arena shooter.
//!
//! `GameSession` owns all runtime state and advances it one frame at a
//! time. Scene, input and HUD are injected through the traits in
//! `collaborators`, so a session runs the same under a renderer, a
//! headless runner or a test.

pub mod collaborators;
pub mod enemy;
pub mod engine;
pub mod event_bus;
pub mod hazards;
pub mod input;
pub mod objective;
pub mod player;
pub mod pool;
pub mod scheduler;
pub mod score;
pub mod spatial;
pub mod systems;
pub mod weapon;
pub mod world_setup;

pub use dunefire_core as core;
pub use engine::GameSession;

#[cfg(test)]
mod tests;
