//! Tests for the actors, the pool, the delay queue, the objective machine
//! and whole-session behaviour.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use dunefire_core::components::{Hazard, HazardSite};
use dunefire_core::config::{mix, GameConfig, LevelConfig, PlayerTuning, WeaponTuning};
use dunefire_core::constants::*;
use dunefire_core::control::{ActionTrigger, ControlVector, Key, LookDelta, MouseButton, MoveAxes, RawInput};
use dunefire_core::enums::*;
use dunefire_core::events::{EventTopic, GameEvent, HudNotice};
use dunefire_core::types::{planar_distance, BoundingSphere, HitScan};

use crate::collaborators::{ArenaWorld, ControlSource, Hud};
use crate::enemy::{DamageOutcome, Enemy, EnemyInit};
use crate::engine::GameSession;
use crate::event_bus::EventBus;
use crate::hazards::HazardRegistry;
use crate::input::InputAdapter;
use crate::objective::{ObjectiveInputs, ObjectiveMachine};
use crate::player::PlayerController;
use crate::pool::{ActorPool, PoolError, PoolHandle};
use crate::scheduler::{DeferredAction, DelayQueue};
use crate::spatial::{BruteForceQuery, HitTarget, SpatialQuery, UniformGridQuery};
use crate::weapon::Weapon;
use crate::world_setup::ArenaLayout;

// ---- Test doubles ----

#[derive(Default)]
struct ControlScript {
    axes: MoveAxes,
    look: LookDelta,
    sprint: bool,
    jump: bool,
    captured: bool,
    triggers: Vec<ActionTrigger>,
}

/// Controls driven directly by the test through a shared handle.
#[derive(Clone, Default)]
struct ScriptedControls(Rc<RefCell<ControlScript>>);

impl ScriptedControls {
    fn captured() -> Self {
        let controls = Self::default();
        controls.0.borrow_mut().captured = true;
        controls
    }

    fn press(&self, trigger: ActionTrigger) {
        self.0.borrow_mut().triggers.push(trigger);
    }

    fn walk(&self, forward: f32) {
        self.0.borrow_mut().axes = MoveAxes::new(forward, 0.0);
    }
}

impl ControlSource for ScriptedControls {
    fn movement_vector(&self) -> MoveAxes {
        self.0.borrow().axes
    }

    fn take_look_delta(&mut self) -> LookDelta {
        std::mem::take(&mut self.0.borrow_mut().look)
    }

    fn is_sprinting(&self) -> bool {
        self.0.borrow().sprint
    }

    fn is_jumping(&self) -> bool {
        self.0.borrow().jump
    }

    fn is_pointer_capture_active(&self) -> bool {
        self.0.borrow().captured
    }

    fn drain_triggers(&mut self) -> Vec<ActionTrigger> {
        std::mem::take(&mut self.0.borrow_mut().triggers)
    }
}

#[derive(Clone, Default)]
struct RecordingHud(Rc<RefCell<Vec<HudNotice>>>);

impl Hud for RecordingHud {
    fn notify(&mut self, notice: HudNotice) {
        self.0.borrow_mut().push(notice);
    }
}

/// Hand-placed arena.
struct TestArena {
    spawn_points: Vec<Vec3>,
    bonus_home: Vec3,
    bonus_item: Option<Vec3>,
    gate_open: bool,
    sites: Vec<HazardSite>,
}

impl TestArena {
    fn new(spawn_point: Vec3, bonus_item: Vec3) -> Self {
        Self {
            spawn_points: vec![spawn_point],
            bonus_home: bonus_item,
            bonus_item: Some(bonus_item),
            gate_open: false,
            sites: Vec::new(),
        }
    }
}

impl ArenaWorld for TestArena {
    fn spawn_points(&self) -> &[Vec3] {
        &self.spawn_points
    }

    fn bonus_area_entry(&self) -> Vec3 {
        self.bonus_home
    }

    fn bonus_item_position(&self) -> Option<Vec3> {
        self.bonus_item
    }

    fn open_access_gate(&mut self) {
        self.gate_open = true;
    }

    fn close_access_gate(&mut self) {
        self.gate_open = false;
    }

    fn is_gate_open(&self) -> bool {
        self.gate_open
    }

    fn remove_bonus_item(&mut self) {
        self.bonus_item = None;
    }

    fn restore_bonus_item(&mut self) {
        self.bonus_item = Some(self.bonus_home);
    }

    fn hazard_sites(&mut self, _count: usize) -> Vec<HazardSite> {
        self.sites.clone()
    }
}

fn player_spawn() -> Vec3 {
    Vec3::from_array(PLAYER_SPAWN)
}

fn quota_config(levels: &[u32]) -> GameConfig {
    GameConfig {
        levels: levels
            .iter()
            .map(|&enemies| LevelConfig {
                landmines: 0,
                ..LevelConfig::quota("Test", enemies, Archetype::Base)
            })
            .collect(),
        ..Default::default()
    }
}

fn session_with(
    config: GameConfig,
    arena: TestArena,
    controls: &ScriptedControls,
    hud: &RecordingHud,
) -> GameSession {
    GameSession::new(
        config,
        Box::new(arena),
        Box::new(controls.clone()),
        Box::new(hud.clone()),
    )
    .expect("test config is valid")
}

/// Record the `to` side of every PhaseChanged event.
fn record_phases(session: &mut GameSession) -> Rc<RefCell<Vec<ObjectivePhase>>> {
    let phases = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&phases);
    session.subscribe(
        EventTopic::Objective,
        Box::new(move |event: &GameEvent| {
            if let GameEvent::PhaseChanged { to, .. } = event {
                sink.borrow_mut().push(*to);
            }
        }),
    );
    phases
}

fn spawn_init(position: Vec3, archetype: Archetype) -> EnemyInit {
    EnemyInit {
        position,
        archetype,
        death_sequence_secs: DEATH_SEQUENCE_SECS,
    }
}

// ---- Actor pool ----

#[test]
fn test_pool_sets_stay_disjoint() {
    let mut pool: ActorPool<Enemy> = ActorPool::new();
    let a = pool.acquire(spawn_init(Vec3::ZERO, Archetype::Base)).unwrap();
    let b = pool.acquire(spawn_init(Vec3::X, Archetype::Base)).unwrap();
    let c = pool.acquire(spawn_init(Vec3::Z, Archetype::Base)).unwrap();
    assert_eq!(pool.constructed(), 3);

    assert!(pool.release(b));
    assert!(!pool.release(b), "Double release must be a no-op");

    let in_use: Vec<u32> = pool.in_use_slots().collect();
    assert_eq!(in_use, vec![a.slot, c.slot]);
    assert_eq!(pool.available_slots(), &[b.slot]);
    assert_eq!(
        pool.in_use_count() + pool.available_count(),
        pool.constructed(),
        "Every constructed instance is in exactly one set"
    );

    let d = pool.acquire(spawn_init(Vec3::Y, Archetype::Fast)).unwrap();
    assert_eq!(d.slot, b.slot, "Released slot should be reused first");
    assert_eq!(pool.constructed(), 3, "Reuse must not construct");
    assert_eq!(pool.available_count(), 0);
}

#[test]
fn test_pool_available_is_lifo() {
    let mut pool: ActorPool<Enemy> = ActorPool::new();
    let a = pool.acquire(spawn_init(Vec3::ZERO, Archetype::Base)).unwrap();
    let b = pool.acquire(spawn_init(Vec3::ZERO, Archetype::Base)).unwrap();
    pool.release(a);
    pool.release(b);
    let next = pool.acquire(spawn_init(Vec3::ZERO, Archetype::Base)).unwrap();
    assert_eq!(next.slot, b.slot, "Most recently released slot comes back first");
}

#[test]
fn test_pool_rejects_stale_handles() {
    let mut pool: ActorPool<Enemy> = ActorPool::new();
    let first = pool.acquire(spawn_init(Vec3::ZERO, Archetype::Base)).unwrap();
    pool.release(first);
    let second = pool.acquire(spawn_init(Vec3::X, Archetype::Fast)).unwrap();

    assert_eq!(first.slot, second.slot);
    assert_ne!(first.life, second.life);
    assert!(pool.get(first).is_none(), "Old life must not resolve");
    assert!(!pool.release(first), "Stale release must not free the new occupant");
    assert!(pool.is_in_use(second));
}

#[test]
fn test_pool_release_keeps_final_state() {
    let mut pool: ActorPool<Enemy> = ActorPool::new();
    let handle = pool.acquire(spawn_init(Vec3::new(3.0, 0.0, 4.0), Archetype::Base)).unwrap();
    pool.get_mut(handle).unwrap().take_damage(1000.0);
    pool.release(handle);

    let enemy = pool.get(handle).expect("inspectable until reacquired");
    assert!(!enemy.is_alive());
    assert_eq!(enemy.position(), Vec3::new(3.0, 0.0, 4.0));
}

#[test]
fn test_pool_capacity_limit() {
    let mut pool: ActorPool<Enemy> = ActorPool::with_capacity_limit(2);
    let a = pool.acquire(spawn_init(Vec3::ZERO, Archetype::Base)).unwrap();
    pool.acquire(spawn_init(Vec3::ZERO, Archetype::Base)).unwrap();
    assert_eq!(
        pool.acquire(spawn_init(Vec3::ZERO, Archetype::Base)),
        Err(PoolError::Exhausted { capacity: 2 })
    );
    pool.release(a);
    assert!(pool.acquire(spawn_init(Vec3::ZERO, Archetype::Base)).is_ok());
}

#[test]
fn test_pool_release_all() {
    let mut pool: ActorPool<Enemy> = ActorPool::new();
    for _ in 0..4 {
        pool.acquire(spawn_init(Vec3::ZERO, Archetype::Base)).unwrap();
    }
    pool.release_all();
    assert_eq!(pool.in_use_count(), 0);
    assert_eq!(pool.available_count(), 4);
    let next = pool.acquire(spawn_init(Vec3::ZERO, Archetype::Base)).unwrap();
    assert_eq!(next.slot, 0);
}

#[test]
fn test_pool_partition_holds_over_random_sequences() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);
    let mut pool: ActorPool<Enemy> = ActorPool::new();
    let mut live: Vec<PoolHandle> = Vec::new();
    let mut retired: Vec<PoolHandle> = Vec::new();

    for step in 0..2000 {
        match rng.gen_range(0..20) {
            0..=10 => {
                let handle = pool.acquire(spawn_init(Vec3::ZERO, Archetype::Base)).unwrap();
                assert!(!live.contains(&handle), "step {step}: handle issued twice");
                live.push(handle);
            }
            11..=16 if !live.is_empty() => {
                let handle = live.swap_remove(rng.gen_range(0..live.len()));
                assert!(pool.release(handle), "step {step}: live handle refused");
                retired.push(handle);
            }
            17..=18 if !retired.is_empty() => {
                let stale = retired[rng.gen_range(0..retired.len())];
                assert!(!pool.release(stale), "step {step}: stale handle released a slot");
            }
            19 => {
                pool.release_all();
                retired.append(&mut live);
            }
            _ => {}
        }

        let in_use: Vec<u32> = pool.in_use_slots().collect();
        let available = pool.available_slots();
        assert_eq!(in_use.len(), live.len(), "step {step}: in-use count drifted");
        assert!(
            in_use.iter().all(|slot| !available.contains(slot)),
            "step {step}: a slot is both in use and available"
        );
        let mut all: Vec<u32> = in_use.iter().chain(available).copied().collect();
        all.sort_unstable();
        let expected: Vec<u32> = (0..pool.constructed() as u32).collect();
        assert_eq!(all, expected, "step {step}: in use and available must cover every slot once");
        for handle in &live {
            assert!(pool.is_in_use(*handle));
        }
    }
}

// ---- Enemy actor ----

#[test]
fn test_reinit_leaves_nothing_from_previous_life() {
    let mut pool: ActorPool<Enemy> = ActorPool::new();
    let tank = pool
        .acquire(spawn_init(Vec3::new(5.0, 0.0, 5.0), Archetype::Slow))
        .unwrap();
    {
        let enemy = pool.get_mut(tank).unwrap();
        assert_eq!(enemy.take_damage(100.0), DamageOutcome::Wounded);
        enemy.advance(0.016, Vec3::new(5.0, 0.0, 6.0), ARENA_HALF_WIDTH);
        assert_eq!(enemy.mode(), EnemyMode::Attacking);
        assert!(enemy.can_attack(3.0));
        assert_eq!(enemy.take_damage(100.0), DamageOutcome::Killed);
        assert!(enemy.death_timer() > 0.0);
    }
    pool.release(tank);

    let runner_pos = Vec3::new(-3.0, 0.0, -3.0);
    let runner = pool.acquire(spawn_init(runner_pos, Archetype::Fast)).unwrap();
    assert_eq!(runner.slot, tank.slot, "Same instance reused");

    let enemy = pool.get(runner).unwrap();
    assert_eq!(enemy.archetype(), Archetype::Fast);
    assert_eq!(enemy.health(), 30.0, "Runner health, not leftover tank health");
    assert!(enemy.is_alive());
    assert_eq!(enemy.mode(), EnemyMode::Pursuing);
    assert_eq!(enemy.last_attack_at(), None, "Attack clock must reset");
    assert_eq!(enemy.velocity(), Vec3::ZERO);
    assert_eq!(enemy.position(), runner_pos);
    assert_eq!(enemy.death_timer(), 0.0);
    assert_eq!(enemy.profile().speed, 5.5);
    assert_eq!(enemy.handle(), runner);
}

#[test]
fn test_enemy_attacks_once_per_cooldown() {
    let mut enemy = Enemy::spawned_at_origin(Archetype::Base);
    enemy.advance(0.016, Vec3::new(0.0, 0.0, 1.0), ARENA_HALF_WIDTH);
    assert_eq!(enemy.mode(), EnemyMode::Attacking);
    assert_eq!(enemy.velocity(), Vec3::ZERO, "Attacking enemies hold position");

    assert!(enemy.can_attack(0.0), "First strike is immediate");
    assert!(!enemy.can_attack(0.0), "Second ask in the same instant fails");
    assert!(!enemy.can_attack(0.5));
    assert!(enemy.can_attack(1.0), "Base cooldown is 1 s");
}

#[test]
fn test_enemy_pursues_at_archetype_speed() {
    let mut enemy = Enemy::spawned_at_origin(Archetype::Fast);
    enemy.advance(1.0, Vec3::new(0.0, 0.0, -20.0), ARENA_HALF_WIDTH);
    assert_eq!(enemy.mode(), EnemyMode::Pursuing);
    assert!((enemy.position().z + 5.5).abs() < 1e-4, "Moved 5.5 m toward -Z");
    assert!(enemy.facing_yaw().abs() < 1e-4, "Facing -Z is yaw 0");
    assert!(!enemy.can_attack(0.0), "Pursuing enemies cannot attack");
}

#[test]
fn test_enemy_death_is_immediate_and_terminal() {
    let mut enemy = Enemy::spawned_at_origin(Archetype::Base);
    assert_eq!(enemy.take_damage(25.0), DamageOutcome::Wounded);
    assert_eq!(enemy.take_damage(25.0), DamageOutcome::Killed);
    assert!(!enemy.is_alive(), "Alive flips on the lethal hit, not after the animation");
    assert_eq!(enemy.mode(), EnemyMode::Dead);
    assert_eq!(enemy.take_damage(25.0), DamageOutcome::Ignored);

    enemy.advance(0.6, Vec3::new(0.0, 0.0, 1.0), ARENA_HALF_WIDTH);
    assert_eq!(enemy.mode(), EnemyMode::Dead, "Dead is terminal");
    assert!(!enemy.can_attack(10.0));
    assert!((enemy.view().death_progress - 0.5).abs() < 1e-4);
}

#[test]
fn test_hit_sphere_tops_out_at_body_height() {
    for archetype in Archetype::ALL {
        let enemy = Enemy::spawned_at_origin(archetype);
        let profile = dunefire_enemy_ai::profiles::get_profile(archetype);
        let sphere = enemy.bounding_sphere();
        assert_eq!(sphere.radius, profile.hit_radius);
        assert!(
            (sphere.center.y + sphere.radius - profile.body_height).abs() < 1e-6,
            "{archetype:?} sphere should reach the top of the body"
        );
    }
}

// ---- Player controller ----

fn fresh_player() -> PlayerController {
    PlayerController::new(PlayerTuning::default(), ARENA_HALF_WIDTH)
}

fn forward(amount: f32) -> ControlVector {
    ControlVector::new(MoveAxes::new(amount, 0.0), LookDelta::default(), false, false)
}

#[test]
fn test_player_damage_cooldown() {
    let mut player = fresh_player();
    assert!(player.take_damage(10.0, 1.0));
    assert!(!player.take_damage(10.0, 1.2), "Inside the 0.5 s window");
    assert_eq!(player.health(), 90.0);
    assert!(player.take_damage(10.0, 1.5), "Window elapsed");
    assert_eq!(player.health(), 80.0);
}

#[test]
fn test_player_health_floors_at_zero() {
    let mut player = fresh_player();
    assert!(player.take_damage(250.0, 0.0));
    assert_eq!(player.health(), 0.0);
    assert!(!player.is_alive());
    assert!(!player.take_damage(10.0, 5.0), "Dead players take no damage");

    let before = player.position();
    player.advance(0.1, &forward(1.0));
    assert_eq!(player.position(), before, "Dead players do not move");
}

#[test]
fn test_player_walks_along_facing() {
    let mut player = fresh_player();
    player.advance(0.5, &forward(1.0));
    let expected = player_spawn() + Vec3::new(0.0, 0.0, -3.0);
    assert!(player.position().distance(expected) < 1e-4, "Yaw 0 walks toward -Z");

    let mut sprinter = fresh_player();
    sprinter.advance(
        0.5,
        &ControlVector::new(MoveAxes::new(1.0, 1.0), LookDelta::default(), true, false),
    );
    let moved = planar_distance(player_spawn(), sprinter.position());
    assert!((moved - 5.0).abs() < 1e-4, "Diagonal input is normalised to sprint speed");
}

#[test]
fn test_player_clamped_to_arena() {
    let mut player = fresh_player();
    for _ in 0..200 {
        player.advance(0.1, &forward(1.0));
    }
    assert_eq!(player.position().z, -ARENA_HALF_WIDTH);
}

#[test]
fn test_player_pitch_clamped() {
    let mut player = fresh_player();
    let look_up = ControlVector::new(
        MoveAxes::default(),
        LookDelta {
            yaw: 0.0,
            pitch: -10.0,
        },
        false,
        false,
    );
    player.advance(0.016, &look_up);
    assert!((player.pitch() - (std::f32::consts::FRAC_PI_2 - PITCH_EPSILON)).abs() < 1e-6);
    assert!(player.aim_direction().y > 0.99);
}

#[test]
fn test_player_jump_and_land() {
    let mut player = fresh_player();
    let jump = ControlVector::new(MoveAxes::default(), LookDelta::default(), false, true);
    player.advance(0.016, &jump);
    assert!(!player.is_grounded());
    assert!(player.position().y > 0.0);

    for _ in 0..120 {
        player.advance(0.016, &ControlVector::default());
    }
    assert!(player.is_grounded());
    assert_eq!(player.position().y, GROUND_LEVEL);
    assert_eq!(player.velocity().y, 0.0);
}

#[test]
fn test_player_heal_capped() {
    let mut player = fresh_player();
    player.take_damage(30.0, 0.0);
    assert_eq!(player.heal(BONUS_HEAL), 30.0);
    assert_eq!(player.health(), PLAYER_MAX_HEALTH);
}

// ---- Weapon ----

fn weapon() -> Weapon {
    Weapon::new(WeaponTuning::default())
}

#[test]
fn test_fire_rate_gating() {
    let mut weapon = weapon();
    assert!(weapon.try_fire(0.0, Vec3::ZERO, Vec3::NEG_Z).is_some());
    assert!(weapon.try_fire(0.1, Vec3::ZERO, Vec3::NEG_Z).is_none(), "Interval is 0.15 s");
    assert!(weapon.try_fire(0.15, Vec3::ZERO, Vec3::NEG_Z).is_some());
    assert_eq!(weapon.ammo(), MAGAZINE_CAPACITY - 2);
    assert_eq!(weapon.shots_fired(), 2);
}

#[test]
fn test_reload_arithmetic() {
    let mut weapon = weapon();
    weapon.set_rounds(3, 60);
    let ticket = weapon.try_reload(1.0).expect("reload starts");
    assert_eq!(ticket.duration_secs, RELOAD_DURATION_SECS);
    assert!(weapon.try_fire(1.1, Vec3::ZERO, Vec3::NEG_Z).is_none(), "No firing mid-reload");
    assert!(weapon.try_reload(1.2).is_none(), "Already reloading");
    assert!(weapon.finish_reload());
    assert_eq!((weapon.ammo(), weapon.reserve()), (12, 51));

    weapon.set_rounds(3, 5);
    weapon.try_reload(3.0).expect("reload starts");
    weapon.finish_reload();
    assert_eq!((weapon.ammo(), weapon.reserve()), (8, 0));
}

#[test]
fn test_reload_noops() {
    let mut weapon = weapon();
    assert!(weapon.try_reload(0.0).is_none(), "Full magazine");
    weapon.set_rounds(5, 0);
    assert!(weapon.try_reload(0.0).is_none(), "Empty reserve");
    assert!(!weapon.finish_reload(), "Nothing to finish");
}

#[test]
fn test_cancel_reload_moves_nothing() {
    let mut weapon = weapon();
    weapon.set_rounds(0, 20);
    assert!(weapon.wants_auto_reload());
    weapon.try_reload(0.0).unwrap();
    assert!(weapon.cancel_reload());
    assert!(!weapon.finish_reload());
    assert_eq!((weapon.ammo(), weapon.reserve()), (0, 20));
}

#[test]
fn test_recoil_decays_linearly() {
    let mut weapon = weapon();
    weapon.try_fire(0.0, Vec3::ZERO, Vec3::NEG_Z);
    assert_eq!(weapon.recoil(), RECOIL_MAX);
    weapon.advance(0.1);
    assert!((weapon.recoil() - 0.4).abs() < 1e-5);
    weapon.advance(1.0);
    assert_eq!(weapon.recoil(), 0.0);
}

// ---- Hazards ----

fn mine_at(position: Vec3) -> HazardSite {
    HazardSite {
        position,
        trigger_radius: LANDMINE_RADIUS,
        damage: LANDMINE_DAMAGE,
    }
}

#[test]
fn test_hazard_fires_once() {
    let mut hazards = HazardRegistry::new([mine_at(Vec3::ZERO)]);
    assert_eq!(hazards.check_collision(Vec3::new(1.0, 0.0, 0.0)), LANDMINE_DAMAGE);
    assert_eq!(hazards.check_collision(Vec3::new(1.0, 0.0, 0.0)), 0.0, "One-shot");
    assert_eq!(hazards.armed_count(), 0);

    hazards.reset();
    assert_eq!(hazards.check_collision(Vec3::ZERO), LANDMINE_DAMAGE, "Re-armed by reset");
}

#[test]
fn test_hazard_radius_is_strict() {
    let mut hazards = HazardRegistry::new([mine_at(Vec3::ZERO)]);
    assert_eq!(hazards.check_collision(Vec3::new(LANDMINE_RADIUS, 0.0, 0.0)), 0.0);
    assert_eq!(hazards.armed_count(), 1);
}

#[test]
fn test_hazard_registration_order() {
    let mut hazards = HazardRegistry::default();
    hazards.register(Hazard {
        position: Vec3::ZERO,
        trigger_radius: 2.0,
        damage: 10.0,
        triggered: false,
    });
    hazards.register(Hazard {
        position: Vec3::new(0.5, 0.0, 0.0),
        trigger_radius: 2.0,
        damage: 20.0,
        triggered: false,
    });
    let hit = hazards.trigger_at(Vec3::new(0.25, 0.0, 0.0)).unwrap();
    assert_eq!((hit.index, hit.damage), (0, 10.0), "First registered wins");
    let hit = hazards.trigger_at(Vec3::new(0.25, 0.0, 0.0)).unwrap();
    assert_eq!(hit.index, 1, "Only one hazard per check");
}

// ---- Objective machine ----

fn inputs() -> ObjectiveInputs {
    ObjectiveInputs {
        player_health: 100.0,
        player_position: Vec3::ZERO,
        quota: Some(8),
        issued: 0,
        alive: 0,
        bonus_item: Some(Vec3::new(30.0, 0.0, 30.0)),
        level_elapsed_secs: 0.0,
        survival_secs: None,
    }
}

#[test]
fn test_objective_transition_order() {
    let mut machine = ObjectiveMachine::new(1);

    let mut frame = inputs();
    frame.issued = 8;
    frame.alive = 1;
    assert!(machine.step(&frame).is_empty(), "One still alive");

    frame.alive = 0;
    let taken: Vec<_> = machine.step(&frame).iter().map(|t| t.to).collect();
    assert_eq!(
        taken,
        vec![ObjectivePhase::ObjectiveComplete, ObjectivePhase::BonusAccessible]
    );

    assert!(machine.step(&frame).is_empty(), "Player not at the item yet");

    frame.player_position = Vec3::new(29.0, 0.0, 30.0);
    let taken: Vec<_> = machine.step(&frame).iter().map(|t| t.to).collect();
    assert_eq!(taken, vec![ObjectivePhase::LevelComplete, ObjectivePhase::Won]);
    assert!(machine.step(&frame).is_empty(), "Won is terminal");
}

#[test]
fn test_objective_not_complete_before_quota_issued() {
    let mut machine = ObjectiveMachine::new(1);
    let mut frame = inputs();
    frame.issued = 7;
    assert!(machine.step(&frame).is_empty());
    assert_eq!(machine.phase(), ObjectivePhase::Active);
}

#[test]
fn test_objective_reentry_is_noop() {
    let mut machine = ObjectiveMachine::new(2);
    assert!(machine.transition(ObjectivePhase::Active).is_none());
    assert!(machine.transition(ObjectivePhase::BonusAccessible).is_some());
    assert!(machine.transition(ObjectivePhase::BonusAccessible).is_none());
}

#[test]
fn test_objective_lost_from_bonus_phase() {
    let mut machine = ObjectiveMachine::new(1);
    machine.transition(ObjectivePhase::BonusAccessible);
    let mut frame = inputs();
    frame.player_health = 0.0;
    let taken = machine.step(&frame);
    assert_eq!(taken.len(), 1);
    assert_eq!(taken[0].from, ObjectivePhase::BonusAccessible);
    assert_eq!(taken[0].to, ObjectivePhase::Lost);
}

#[test]
fn test_objective_survival_and_level_advance() {
    let mut machine = ObjectiveMachine::new(2);
    let mut frame = inputs();
    frame.quota = None;
    frame.survival_secs = Some(60.0);
    frame.alive = 4;
    frame.level_elapsed_secs = 59.9;
    assert!(machine.step(&frame).is_empty());

    frame.level_elapsed_secs = 60.0;
    let taken = machine.step(&frame);
    assert_eq!(taken.len(), 1, "Not the last level, so no Won yet");
    assert_eq!(taken[0].to, ObjectivePhase::LevelComplete);

    let next = machine.advance_level().expect("advances");
    assert_eq!((next.level, next.to), (1, ObjectivePhase::Active));
    assert!(machine.is_last_level());
    assert!(machine.advance_level().is_none(), "Only from LevelComplete");
}

// ---- Delay queue ----

#[test]
fn test_delay_queue_order_and_cancel() {
    let mut queue = DelayQueue::new();
    queue.schedule(0.0, 2.0, DeferredAction::AdvanceLevel);
    queue.schedule(0.0, 1.0, DeferredAction::FinishReload);
    let cancelled = queue.schedule(0.0, 1.0, DeferredAction::ClearMessage);
    queue.schedule(0.5, 0.5, DeferredAction::SpawnEnemy {
        archetype: Archetype::Fast,
        point: 2,
    });

    assert!(queue.drain_due(0.9).is_empty());
    assert!(queue.cancel(cancelled));
    assert!(!queue.cancel(cancelled), "Cancel is one-shot");

    assert_eq!(
        queue.drain_due(1.0),
        vec![
            DeferredAction::FinishReload,
            DeferredAction::SpawnEnemy {
                archetype: Archetype::Fast,
                point: 2
            },
        ],
        "Same due time keeps scheduling order"
    );
    assert_eq!(queue.drain_due(5.0), vec![DeferredAction::AdvanceLevel]);
    assert!(queue.is_empty());
}

#[test]
fn test_delay_queue_discards_stale_generation() {
    let mut queue = DelayQueue::new();
    queue.schedule(0.0, 1.0, DeferredAction::FinishReload);
    queue.bump_generation();
    queue.schedule(0.0, 1.0, DeferredAction::ClearMessage);

    assert_eq!(queue.drain_due(1.0), vec![DeferredAction::ClearMessage]);
    assert_eq!(queue.discarded(), 1);
}

// ---- Event bus ----

#[test]
fn test_event_bus_ordering_and_unsubscribe() {
    let log = Rc::new(RefCell::new(Vec::<String>::new()));
    let mut bus = EventBus::new();

    let first_log = Rc::clone(&log);
    let first = bus.subscribe(
        EventTopic::Combat,
        Box::new(move |event: &GameEvent| {
            if let GameEvent::EnemyKilled { slot, .. } = event {
                first_log.borrow_mut().push(format!("a{slot}"));
            }
        }),
    );
    let second_log = Rc::clone(&log);
    bus.subscribe(
        EventTopic::Combat,
        Box::new(move |event: &GameEvent| {
            if let GameEvent::EnemyKilled { slot, .. } = event {
                second_log.borrow_mut().push(format!("b{slot}"));
            }
        }),
    );

    let killed = |slot| GameEvent::EnemyKilled {
        slot,
        archetype: Archetype::Base,
        score_value: 100,
    };
    bus.publish(killed(1));
    bus.publish(GameEvent::ShotFired { hit_slot: None });
    bus.publish(killed(2));
    assert!(log.borrow().is_empty(), "Publishing only queues");

    let delivered = bus.dispatch();
    assert_eq!(delivered.len(), 3, "Dispatch hands back every event");
    assert_eq!(*log.borrow(), vec!["a1", "b1", "a2", "b2"]);

    assert!(bus.unsubscribe(first).is_some());
    assert!(bus.unsubscribe(first).is_none());
    bus.publish(killed(3));
    bus.dispatch();
    assert_eq!(log.borrow().last().map(String::as_str), Some("b3"));
    assert_eq!(log.borrow().len(), 5);
    assert_eq!(bus.subscriber_count(EventTopic::Combat), 1);
}

// ---- Spatial query ----

fn target(slot: u32, center: Vec3, radius: f32) -> HitTarget {
    HitTarget {
        handle: PoolHandle { slot, life: 1 },
        sphere: BoundingSphere::new(center, radius),
    }
}

#[test]
fn test_brute_force_nearest_and_range() {
    let targets = [
        target(0, Vec3::new(0.0, 0.0, -10.0), 0.5),
        target(1, Vec3::new(0.0, 0.0, -5.0), 0.5),
        target(2, Vec3::new(3.0, 0.0, -2.0), 0.5),
    ];
    let ray = HitScan::new(Vec3::ZERO, Vec3::NEG_Z);

    let hit = BruteForceQuery::new(100.0).nearest_hit(&ray, &targets).unwrap();
    assert_eq!(hit.handle.slot, 1);
    assert!((hit.distance - 4.5).abs() < 1e-5);

    assert!(BruteForceQuery::new(4.0).nearest_hit(&ray, &targets).is_none());
}

#[test]
fn test_grid_query_matches_brute_force() {
    let mut targets = Vec::new();
    let mut slot = 0;
    for i in 0..10 {
        for j in 0..10 {
            let center = Vec3::new(i as f32 * 3.7 - 18.0, 1.0, j as f32 * 4.3 - 20.0);
            targets.push(target(slot, center, 0.8));
            slot += 1;
        }
    }
    let brute = BruteForceQuery::new(60.0);
    let grid = UniformGridQuery::new(4.0, 60.0);
    let origin = Vec3::new(0.3, 1.0, 0.2);
    for k in 0..40 {
        let angle = k as f32 * 0.157;
        let ray = HitScan::new(origin, Vec3::new(angle.cos(), 0.02, angle.sin()));
        let expected = brute.nearest_hit(&ray, &targets).map(|h| h.handle);
        let actual = grid.nearest_hit(&ray, &targets).map(|h| h.handle);
        assert_eq!(actual, expected, "Grid disagrees at angle {angle}");
    }
}

#[test]
fn test_grid_query_unbounded_range_terminates() {
    let grid = UniformGridQuery::new(4.0, f32::INFINITY);
    let targets = [target(0, Vec3::new(0.0, 1.0, -10.0), 0.5)];

    let miss = HitScan::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, 0.0, 0.3));
    assert!(grid.nearest_hit(&miss, &targets).is_none());

    let away = HitScan::new(Vec3::new(0.0, 1.0, 0.0), Vec3::Z);
    assert!(grid.nearest_hit(&away, &targets).is_none());

    let toward = HitScan::new(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Z);
    let hit = grid.nearest_hit(&toward, &targets).expect("target dead ahead");
    assert!((hit.distance - 9.5).abs() < 1e-4);
}

// ---- Input adapter ----

#[test]
fn test_input_adapter_keys_and_look() {
    let (tx, mut input) = InputAdapter::channel();
    for event in [
        RawInput::PointerCapture { active: true },
        RawInput::KeyDown { key: Key::Forward },
        RawInput::KeyDown { key: Key::Left },
        RawInput::MouseMove { dx: 100.0, dy: -50.0 },
        RawInput::KeyDown { key: Key::Reload },
        RawInput::KeyDown { key: Key::Reload },
        RawInput::MouseDown {
            button: MouseButton::Primary,
        },
    ] {
        tx.send(event).unwrap();
    }
    input.pump();

    assert_eq!(input.movement_vector(), MoveAxes::new(1.0, -1.0));
    let look = input.take_look_delta();
    assert!((look.yaw - 0.2).abs() < 1e-6);
    assert!((look.pitch + 0.1).abs() < 1e-6);
    assert_eq!(input.take_look_delta(), LookDelta::default(), "Consumed once");
    assert_eq!(
        input.drain_triggers(),
        vec![ActionTrigger::Reload, ActionTrigger::Fire],
        "Key repeat does not queue a second reload"
    );
    assert!(input.drain_triggers().is_empty());
}

#[test]
fn test_input_adapter_ignores_uncaptured() {
    let (tx, mut input) = InputAdapter::channel();
    tx.send(RawInput::KeyDown { key: Key::Forward }).unwrap();
    tx.send(RawInput::MouseDown {
        button: MouseButton::Primary,
    })
    .unwrap();
    input.pump();
    assert!(!input.is_pointer_capture_active());
    assert_eq!(input.movement_vector(), MoveAxes::default());
    assert!(input.drain_triggers().is_empty());

    tx.send(RawInput::PointerCapture { active: true }).unwrap();
    tx.send(RawInput::KeyDown { key: Key::Sprint }).unwrap();
    tx.send(RawInput::PointerCapture { active: false }).unwrap();
    input.pump();
    assert!(!input.is_sprinting(), "Losing capture releases held keys");
}

// ---- Arena layout ----

#[test]
fn test_arena_layout_deterministic() {
    let mut a = ArenaLayout::new(7, ARENA_HALF_WIDTH, player_spawn());
    let mut b = ArenaLayout::new(7, ARENA_HALF_WIDTH, player_spawn());
    assert_eq!(a.spawn_points(), b.spawn_points());
    assert_eq!(a.hazard_sites(8), b.hazard_sites(8));
    assert_eq!(a.spawn_points().len(), WRECK_SPAWN_POINTS);
}

#[test]
fn test_arena_mines_keep_clear() {
    let mut arena = ArenaLayout::new(99, ARENA_HALF_WIDTH, player_spawn());
    let sites = arena.hazard_sites(12);
    assert!(!sites.is_empty());
    assert!(sites.len() <= 12);
    let bonus = arena.bonus_item_position().unwrap();
    for site in &sites {
        assert!(planar_distance(site.position, player_spawn()) >= LANDMINE_CLEARANCE);
        assert!(planar_distance(site.position, bonus) >= LANDMINE_CLEARANCE);
        assert!(site.position.x.abs() <= ARENA_HALF_WIDTH);
        assert!(site.position.z.abs() <= ARENA_HALF_WIDTH);
    }
}

#[test]
fn test_arena_gate_and_bonus_item() {
    let mut arena = ArenaLayout::new(1, ARENA_HALF_WIDTH, player_spawn());
    assert!(!arena.is_gate_open());
    arena.open_access_gate();
    assert!(arena.is_gate_open());
    arena.remove_bonus_item();
    assert!(arena.bonus_item_position().is_none());
    arena.restore_bonus_item();
    assert_eq!(
        arena.bonus_item_position(),
        Some(Vec3::from_array(BONUS_ITEM_POSITION))
    );
}

#[test]
fn test_arena_reset_restores_original_layout() {
    let mut arena = ArenaLayout::new(9, ARENA_HALF_WIDTH, player_spawn());
    let first = arena.hazard_sites(8);
    let second = arena.hazard_sites(8);
    assert_ne!(first, second, "Each level draws a fresh layout");

    arena.open_access_gate();
    arena.remove_bonus_item();
    arena.reset();
    assert_eq!(arena.hazard_sites(8), first);
    assert!(!arena.is_gate_open());
    assert!(arena.bonus_item_position().is_some());
}

// ---- Session lifecycle ----

#[test]
fn test_update_before_start_is_noop() {
    let controls = ScriptedControls::captured();
    let hud = RecordingHud::default();
    let mut session = session_with(
        quota_config(&[1]),
        TestArena::new(Vec3::new(0.0, 0.0, -40.0), Vec3::new(40.0, 0.0, 40.0)),
        &controls,
        &hud,
    );
    session.update(0.1);
    assert_eq!(session.status(), SessionStatus::Idle);
    assert_eq!(session.time().tick, 0);

    session.start();
    session.start();
    assert_eq!(session.status(), SessionStatus::Running);
    let started = hud
        .0
        .borrow()
        .iter()
        .filter(|n| matches!(n, HudNotice::PhaseChanged { .. }))
        .count();
    assert_eq!(started, 1, "Second start is ignored");
}

#[test]
fn test_frame_dt_is_clamped() {
    let controls = ScriptedControls::captured();
    let hud = RecordingHud::default();
    let mut session = session_with(
        quota_config(&[1]),
        TestArena::new(Vec3::new(0.0, 0.0, -40.0), Vec3::new(40.0, 0.0, 40.0)),
        &controls,
        &hud,
    );
    session.start();
    session.update(5.0);
    assert!((session.time().elapsed_secs - MAX_FRAME_DT as f64).abs() < 1e-6);
    session.update(-1.0);
    assert!((session.time().elapsed_secs - MAX_FRAME_DT as f64).abs() < 1e-6);
}

#[test]
fn test_stale_spawn_discarded_after_restart() {
    let controls = ScriptedControls::captured();
    let hud = RecordingHud::default();
    let mut session = session_with(
        quota_config(&[3]),
        TestArena::new(Vec3::new(0.0, 0.0, -40.0), Vec3::new(40.0, 0.0, 40.0)),
        &controls,
        &hud,
    );
    session.start();
    for _ in 0..5 {
        session.update(0.1);
    }
    assert_eq!(session.enemies().in_use_count(), 0, "Spawn still emerging");

    session.restart();
    assert_eq!(session.time().tick, 0);
    for _ in 0..10 {
        session.update(0.1);
    }
    assert_eq!(
        session.enemies().in_use_count(),
        1,
        "Only the spawn scheduled after the restart may emerge"
    );
    assert!(session.scheduler().discarded() >= 1);
}

#[test]
fn test_restart_cancels_reload() {
    let controls = ScriptedControls::captured();
    let hud = RecordingHud::default();
    let mut session = session_with(
        quota_config(&[3]),
        TestArena::new(Vec3::new(0.0, 0.0, -40.0), Vec3::new(40.0, 0.0, 40.0)),
        &controls,
        &hud,
    );
    session.start();
    session.weapon_mut().set_rounds(4, 60);
    controls.press(ActionTrigger::Reload);
    session.update(0.05);
    assert!(session.weapon().is_reloading());

    session.restart();
    assert!(!session.weapon().is_reloading());
    assert_eq!(session.weapon().ammo(), MAGAZINE_CAPACITY);
    assert_eq!(session.weapon().reserve(), STARTING_RESERVE);
    assert_eq!(session.status(), SessionStatus::Running);
    assert_eq!(session.phase(), ObjectivePhase::Active);
}

#[test]
fn test_controls_ignored_without_pointer_capture() {
    let controls = ScriptedControls::default();
    let hud = RecordingHud::default();
    let mut session = session_with(
        quota_config(&[1]),
        TestArena::new(Vec3::new(0.0, 0.0, -40.0), Vec3::new(40.0, 0.0, 40.0)),
        &controls,
        &hud,
    );
    session.start();
    controls.walk(1.0);
    controls.press(ActionTrigger::Fire);
    session.update(0.1);
    assert_eq!(session.weapon().shots_fired(), 0);
    assert_eq!(session.player().position(), player_spawn());
    assert!(
        controls.0.borrow().triggers.is_empty(),
        "Triggers are drained even when ignored"
    );
}

// ---- Whole-session behaviour ----

#[test]
fn test_kill_then_collect_bonus_wins() {
    let controls = ScriptedControls::captured();
    let hud = RecordingHud::default();
    let arena = TestArena::new(
        player_spawn() + Vec3::new(0.0, 0.0, -12.0),
        player_spawn() + Vec3::new(0.0, 0.0, 1.0),
    );
    let mut session = session_with(quota_config(&[1]), arena, &controls, &hud);
    let phases = record_phases(&mut session);
    session.start();

    for _ in 0..200 {
        controls.press(ActionTrigger::Fire);
        session.update(0.05);
        if session.status() == SessionStatus::Finished {
            break;
        }
    }

    assert_eq!(session.phase(), ObjectivePhase::Won);
    assert_eq!(
        *phases.borrow(),
        vec![
            ObjectivePhase::ObjectiveComplete,
            ObjectivePhase::BonusAccessible,
            ObjectivePhase::LevelComplete,
            ObjectivePhase::Won,
        ]
    );
    assert!(session.world().is_gate_open());
    assert!(session.world().bonus_item_position().is_none(), "Item removed on pickup");

    let summary = session.summary().expect("finished sessions have a summary");
    assert_eq!(summary.outcome, GameOutcome::Won);
    assert_eq!(summary.kills, 1);
    assert_eq!(summary.score, 100);
    assert_eq!(summary.levels_cleared, 1);
    assert_eq!(summary.payout, 225, "100 x (2.0 + 0.25 x 1)");
    assert!(hud
        .0
        .borrow()
        .iter()
        .any(|n| matches!(n, HudNotice::GameOver { .. })));
}

#[test]
fn test_level_transition_is_deferred() {
    let controls = ScriptedControls::captured();
    let hud = RecordingHud::default();
    let arena = TestArena::new(
        player_spawn() + Vec3::new(0.0, 0.0, -12.0),
        player_spawn() + Vec3::new(0.0, 0.0, 1.0),
    );
    let mut session = session_with(quota_config(&[1, 1]), arena, &controls, &hud);
    session.start();

    let mut completed_at = None;
    for _ in 0..400 {
        controls.press(ActionTrigger::Fire);
        session.update(0.05);
        if completed_at.is_none() && session.phase() == ObjectivePhase::LevelComplete {
            completed_at = Some(session.time().elapsed_secs);
        }
        if session.level() == 1 {
            break;
        }
    }

    let completed_at = completed_at.expect("first level completes");
    assert_eq!(session.level(), 1);
    assert_eq!(session.phase(), ObjectivePhase::Active);
    assert!(
        session.time().elapsed_secs - completed_at >= LEVEL_TRANSITION_SECS - 0.06,
        "Next level waits for the transition delay"
    );
    assert!(!session.world().is_gate_open(), "Gate closes for the new level");
    assert!(session.world().bonus_item_position().is_some(), "Item restored");
    assert_eq!(session.score().levels_cleared, 1);
}

#[test]
fn test_player_overrun_is_lost() {
    let controls = ScriptedControls::default();
    let hud = RecordingHud::default();
    let config = GameConfig {
        player: PlayerTuning {
            max_health: 20.0,
            ..Default::default()
        },
        ..quota_config(&[3])
    };
    let arena = TestArena::new(
        player_spawn() + Vec3::new(0.0, 0.0, -1.5),
        Vec3::new(40.0, 0.0, 40.0),
    );
    let mut session = session_with(config, arena, &controls, &hud);
    session.start();
    for _ in 0..100 {
        session.update(0.05);
    }

    assert_eq!(session.status(), SessionStatus::Finished);
    assert_eq!(session.phase(), ObjectivePhase::Lost);
    assert!(!session.player().is_alive());
    let summary = session.summary().unwrap();
    assert_eq!(summary.outcome, GameOutcome::Lost);
    assert_eq!(summary.payout, 0, "Losing pays nothing");

    let tick = session.time().tick;
    session.update(0.05);
    assert_eq!(session.time().tick, tick, "Finished sessions do not tick");
}

#[test]
fn test_survival_level_completes_on_timer() {
    let controls = ScriptedControls::default();
    let hud = RecordingHud::default();
    let config = GameConfig {
        levels: vec![LevelConfig {
            landmines: 0,
            ..LevelConfig::survival("Hold", 3.0, mix(&[(Archetype::Base, 1)]))
        }],
        ..Default::default()
    };
    let arena = TestArena::new(Vec3::new(0.0, 0.0, -40.0), Vec3::new(40.0, 0.0, 40.0));
    let mut session = session_with(config, arena, &controls, &hud);
    session.start();
    for _ in 0..70 {
        session.update(0.05);
    }

    assert_eq!(session.phase(), ObjectivePhase::Won);
    assert_eq!(session.enemies().in_use_count(), 0, "Survivors leave with the level");
    let summary = session.summary().unwrap();
    assert_eq!(summary.levels_cleared, 1);
    assert_eq!(summary.payout, 225);
    assert!(hud.0.borrow().iter().any(|n| matches!(
        n,
        HudNotice::TimerTick {
            seconds: 3,
            counting_down: true
        }
    )));
}

#[test]
fn test_landmine_hurts_player_once() {
    let controls = ScriptedControls::captured();
    let hud = RecordingHud::default();
    let mut arena = TestArena::new(Vec3::new(0.0, 0.0, -40.0), Vec3::new(40.0, 0.0, 40.0));
    arena.sites = vec![mine_at(player_spawn() + Vec3::new(0.0, 0.0, -3.0))];
    let mut session = session_with(quota_config(&[1]), arena, &controls, &hud);
    session.start();
    controls.walk(1.0);
    for _ in 0..20 {
        session.update(0.05);
    }

    assert_eq!(session.player().health(), PLAYER_MAX_HEALTH - LANDMINE_DAMAGE);
    assert_eq!(session.hazards().armed_count(), 0);
    assert!(hud.0.borrow().iter().any(|n| *n
        == HudNotice::HealthChanged {
            health: PLAYER_MAX_HEALTH - LANDMINE_DAMAGE,
            max: PLAYER_MAX_HEALTH,
        }));
}

#[test]
fn test_rearmed_hazards_after_restart() {
    let controls = ScriptedControls::captured();
    let hud = RecordingHud::default();
    let mut arena = TestArena::new(Vec3::new(0.0, 0.0, -40.0), Vec3::new(40.0, 0.0, 40.0));
    arena.sites = vec![mine_at(Vec3::new(10.0, 0.0, 10.0))];
    let mut session = session_with(quota_config(&[1]), arena, &controls, &hud);
    session.start();
    session.hazards_mut().trigger_at(Vec3::new(10.0, 0.0, 10.0));
    assert_eq!(session.hazards().armed_count(), 0);
    session.restart();
    assert_eq!(session.hazards().armed_count(), 1);
}

#[test]
fn test_restart_replays_arena_layout() {
    let config = GameConfig {
        seed: 9,
        ..Default::default()
    };
    let mut session = GameSession::with_arena(
        config,
        Box::new(crate::collaborators::IdleControls),
        Box::new(crate::collaborators::NullHud),
    )
    .unwrap();
    let mines = |session: &GameSession| -> Vec<Vec3> {
        session.hazards().hazards().iter().map(|h| h.position).collect()
    };

    session.start();
    let first = mines(&session);
    assert!(!first.is_empty());
    for _ in 0..120 {
        session.update(1.0 / 60.0);
    }
    session.restart();
    assert_eq!(mines(&session), first, "Restart must not inherit the old arena's RNG");
    assert_eq!(session.world().spawn_points().len(), WRECK_SPAWN_POINTS);
}

#[test]
fn test_same_seed_same_session() {
    let run = |seed: u64| {
        let config = GameConfig {
            seed,
            ..Default::default()
        };
        let mut session = GameSession::with_arena(
            config,
            Box::new(crate::collaborators::IdleControls),
            Box::new(crate::collaborators::NullHud),
        )
        .unwrap();
        session.start();
        for _ in 0..300 {
            session.update(1.0 / 60.0);
        }
        serde_json::to_string(&session.snapshot()).unwrap()
    };
    assert_eq!(run(5), run(5), "Snapshots diverged with the same seed");
}
