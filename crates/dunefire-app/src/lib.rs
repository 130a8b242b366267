//! DUNEFIRE headless runner.
//!
//! Runs a `GameSession` on its own thread at a fixed frame rate, drives
//! it with scripted or forwarded input and reports through the log.

pub mod autopilot;
pub mod error;
pub mod game_loop;
pub mod hud_log;
pub mod state;

pub use dunefire_core as core;
pub use error::AppError;
