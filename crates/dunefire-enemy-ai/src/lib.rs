//! Enemy AI for DUNEFIRE.
//!
//! Implements the per-enemy behaviour state machine and the
//! archetype-driven stat profiles.

pub mod fsm;
pub mod profiles;

pub use dunefire_core as core;
