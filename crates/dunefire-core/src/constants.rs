//! Simulation constants and tuning parameters.
//!
//! Units are meters, seconds and radians. World space is right-handed
//! with Y up; the player faces -Z at yaw 0.

/// Largest frame delta the session will integrate in one tick (seconds).
/// Longer stalls (backgrounded tab, debugger) are absorbed, not simulated.
pub const MAX_FRAME_DT: f32 = 0.1;

/// Nominal frame rate used by the headless runner (Hz).
pub const TARGET_FPS: u32 = 60;

// --- Arena ---

/// Half-width of the square arena. Players and enemies stay within |x|,|z| <= this.
pub const ARENA_HALF_WIDTH: f32 = 48.0;

/// Ground plane height.
pub const GROUND_LEVEL: f32 = 0.0;

/// Player spawn point (feet position).
pub const PLAYER_SPAWN: [f32; 3] = [0.0, GROUND_LEVEL, 30.0];

/// Crashed aircraft wreck centre; enemies crawl out of here.
pub const WRECK_CENTER: [f32; 3] = [0.0, GROUND_LEVEL, -28.0];

/// Radius around the wreck on which spawn points are scattered.
pub const WRECK_SPAWN_RADIUS: f32 = 7.0;

/// Number of spawn points placed around the wreck.
pub const WRECK_SPAWN_POINTS: usize = 6;

// --- Player ---

pub const PLAYER_MAX_HEALTH: f32 = 100.0;

pub const PLAYER_WALK_SPEED: f32 = 6.0;

pub const PLAYER_SPRINT_SPEED: f32 = 10.0;

/// Vertical velocity applied on jump.
pub const PLAYER_JUMP_SPEED: f32 = 8.0;

/// Downward acceleration while airborne (m/s²).
pub const GRAVITY: f32 = 24.0;

/// Eye height above the feet, used as the hit-scan origin.
pub const PLAYER_EYE_HEIGHT: f32 = 1.7;

/// Minimum time between two applied hits on the player (seconds).
pub const PLAYER_DAMAGE_COOLDOWN_SECS: f64 = 0.5;

/// Margin kept from ±π/2 so the view never flips over the pole.
pub const PITCH_EPSILON: f32 = 0.01;

// --- Weapon ---

pub const MAGAZINE_CAPACITY: u32 = 12;

pub const STARTING_RESERVE: u32 = 60;

/// Minimum interval between two successful shots (seconds).
pub const FIRE_INTERVAL_SECS: f64 = 0.15;

pub const RELOAD_DURATION_SECS: f64 = 1.5;

pub const WEAPON_DAMAGE: f32 = 25.0;

/// Maximum hit-scan distance.
pub const WEAPON_RANGE: f32 = 120.0;

/// Recoil set on each shot; decays linearly to zero.
pub const RECOIL_MAX: f32 = 1.0;

/// Recoil decay per second.
pub const RECOIL_DECAY_RATE: f32 = 6.0;

// --- Enemies ---

/// Duration of the cosmetic death sequence before the slot returns to the pool.
pub const DEATH_SEQUENCE_SECS: f64 = 1.2;

/// Delay between a spawn being scheduled and the enemy emerging from the wreck.
pub const SPAWN_DELAY_SECS: f64 = 0.8;

/// Default cadence between spawn attempts.
pub const SPAWN_INTERVAL_SECS: f64 = 2.0;

/// Default cap on simultaneously alive enemies.
pub const MAX_ALIVE_ENEMIES: u32 = 6;

// --- Hazards ---

/// Landmine trigger radius.
pub const LANDMINE_RADIUS: f32 = 1.5;

pub const LANDMINE_DAMAGE: f32 = 35.0;

/// Mines are never placed closer than this to the player spawn or bonus item.
pub const LANDMINE_CLEARANCE: f32 = 6.0;

// --- Objectives ---

/// Distance from the bonus item within which it is collected.
pub const BONUS_PICKUP_RADIUS: f32 = 2.0;

/// Health restored when the bonus item is collected.
pub const BONUS_HEAL: f32 = 50.0;

/// Bonus room position (behind the access gate).
pub const BONUS_ITEM_POSITION: [f32; 3] = [40.0, GROUND_LEVEL, 40.0];

/// Access gate in front of the bonus room.
pub const BONUS_AREA_ENTRY: [f32; 3] = [34.0, GROUND_LEVEL, 34.0];

/// How long the level-complete message is held before the next level loads.
pub const LEVEL_TRANSITION_SECS: f64 = 3.0;

/// How long transient HUD messages stay up.
pub const MESSAGE_DURATION_SECS: f64 = 2.5;

// --- Wager ---

pub const DEFAULT_STAKE: u32 = 100;

pub const WIN_MULTIPLIER: f32 = 2.0;

/// Extra multiplier per cleared level on top of the win multiplier.
pub const PER_LEVEL_BONUS: f32 = 0.25;
