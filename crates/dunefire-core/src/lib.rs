//! Core types and definitions for the DUNEFIRE arena shooter.
//!
//! This crate defines the vocabulary shared across all other crates:
//! math types, control input, events, snapshots, configuration and
//! tuning constants. It has no dependency on any runtime, renderer or
//! windowing framework.

pub mod components;
pub mod config;
pub mod constants;
pub mod control;
pub mod enums;
pub mod events;
pub mod state;
pub mod types;

pub use glam;
