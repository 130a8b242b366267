//! Per-tick systems.
//!
//! Systems are free functions over the state they touch, borrowed
//! explicitly from the session. They own no state of their own except
//! the spawn director's cadence bookkeeping.

pub mod combat;
pub mod enemies;
pub mod snapshot;
pub mod spawner;
