//! Game session: the core of the game.
//!
//! `GameSession` owns every piece of runtime state (player, weapon, enemy
//! pool, hazards, objective machine, delay queue, event bus, score) and
//! drives them in a fixed order once per frame. Collaborators outside the
//! core (scene, input, HUD) are injected as trait objects. Completely
//! headless, so whole sessions run deterministically in tests.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use dunefire_core::config::{ConfigError, GameConfig, LevelConfig, Progression};
use dunefire_core::constants::{BONUS_HEAL, MESSAGE_DURATION_SECS};
use dunefire_core::control::{ActionTrigger, ControlVector};
use dunefire_core::enums::{Archetype, DamageSource, GameOutcome, ObjectivePhase, SessionStatus};
use dunefire_core::events::{EventTopic, GameEvent, HudNotice};
use dunefire_core::state::{GameSummary, SessionSnapshot};
use dunefire_core::types::SimTime;

use crate::collaborators::{ArenaWorld, ControlSource, Hud};
use crate::enemy::{DamageOutcome, Enemy, EnemyInit};
use crate::event_bus::{EventBus, Subscriber, SubscriptionId};
use crate::hazards::HazardRegistry;
use crate::objective::{ObjectiveInputs, ObjectiveMachine, PhaseTransition};
use crate::player::PlayerController;
use crate::pool::{ActorPool, PoolHandle};
use crate::scheduler::{DeferredAction, DelayQueue, TimerId};
use crate::score::ScoreKeeper;
use crate::spatial::{BruteForceQuery, SpatialQuery};
use crate::systems::snapshot::{build_snapshot, SnapshotSources};
use crate::systems::spawner::SpawnDirector;
use crate::systems::{combat, enemies};
use crate::weapon::Weapon;
use crate::world_setup::ArenaLayout;

/// Last values pushed to the HUD, so only changes are sent.
#[derive(Debug, Default)]
struct HudState {
    health: Option<f32>,
    ammo: Option<(u32, u32, bool)>,
    kills: Option<u32>,
    score: Option<u32>,
    timer: Option<(u32, bool)>,
}

pub struct GameSession {
    config: GameConfig,
    status: SessionStatus,
    time: SimTime,
    rng: ChaCha8Rng,
    player: PlayerController,
    weapon: Weapon,
    reload_timer: Option<TimerId>,
    enemies: ActorPool<Enemy>,
    hazards: HazardRegistry,
    objective: ObjectiveMachine,
    spawner: SpawnDirector,
    scheduler: DelayQueue,
    bus: EventBus,
    score: ScoreKeeper,
    query: Box<dyn SpatialQuery>,
    world: Box<dyn ArenaWorld>,
    controls: Box<dyn ControlSource>,
    hud: Box<dyn Hud>,
    level_started_at: f64,
    message: Option<String>,
    message_timer: Option<TimerId>,
    hud_state: HudState,
    outcome: Option<GameOutcome>,
    summary: Option<GameSummary>,
}

impl GameSession {
    /// Build an idle session. Call `start()` to begin the first level.
    pub fn new(
        config: GameConfig,
        world: Box<dyn ArenaWorld>,
        controls: Box<dyn ControlSource>,
        hud: Box<dyn Hud>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let enemies = match config.pool_capacity {
            Some(capacity) => ActorPool::with_capacity_limit(capacity),
            None => ActorPool::new(),
        };
        Ok(Self {
            status: SessionStatus::Idle,
            time: SimTime::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            player: PlayerController::new(config.player.clone(), config.arena_half_width),
            weapon: Weapon::new(config.weapon.clone()),
            reload_timer: None,
            enemies,
            hazards: HazardRegistry::default(),
            objective: ObjectiveMachine::new(config.levels.len()),
            spawner: SpawnDirector::default(),
            scheduler: DelayQueue::new(),
            bus: EventBus::new(),
            score: ScoreKeeper::default(),
            query: Box::new(BruteForceQuery::new(config.weapon.range)),
            world,
            controls,
            hud,
            level_started_at: 0.0,
            message: None,
            message_timer: None,
            hud_state: HudState::default(),
            outcome: None,
            summary: None,
            config,
        })
    }

    /// Session on the procedural arena generated from the config seed.
    pub fn with_arena(
        config: GameConfig,
        controls: Box<dyn ControlSource>,
        hud: Box<dyn Hud>,
    ) -> Result<Self, ConfigError> {
        let world = ArenaLayout::new(config.seed, config.arena_half_width, config.player.spawn);
        Self::new(config, Box::new(world), controls, hud)
    }

    /// Replace the ray resolver (brute force by default).
    pub fn with_spatial_query(mut self, query: Box<dyn SpatialQuery>) -> Self {
        self.query = query;
        self
    }

    // ---- Lifecycle ----

    /// Begin the first level. Only acts on an idle session.
    pub fn start(&mut self) {
        if self.status != SessionStatus::Idle {
            debug!(status = ?self.status, "start ignored");
            return;
        }
        info!(
            seed = self.config.seed,
            levels = self.config.levels.len(),
            "session started"
        );
        self.status = SessionStatus::Running;
        self.begin_level();
        self.announce_phase();
    }

    /// Tear everything down and begin again from the first level. Deferred
    /// actions scheduled before the restart are invalidated.
    pub fn restart(&mut self) {
        let generation = self.scheduler.bump_generation();
        if let Some(id) = self.reload_timer.take() {
            self.scheduler.cancel(id);
        }
        if let Some(id) = self.message_timer.take() {
            self.scheduler.cancel(id);
        }
        self.weapon.cancel_reload();
        self.weapon.reset();
        self.enemies.release_all();
        self.player.reset();
        self.bus.clear();
        self.score.reset();
        self.objective.reset();
        self.spawner = SpawnDirector::default();
        self.time = SimTime::default();
        self.rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        self.world.reset();
        self.message = None;
        self.hud_state = HudState::default();
        self.outcome = None;
        self.summary = None;
        self.status = SessionStatus::Running;
        info!(generation, "session restarted");
        self.begin_level();
        self.announce_phase();
    }

    /// Advance one frame. Does nothing unless running. `dt` is clamped to
    /// `[0, max_frame_dt]`.
    pub fn update(&mut self, dt: f32) {
        if self.status != SessionStatus::Running {
            return;
        }
        let dt = if dt.is_finite() {
            dt.clamp(0.0, self.config.max_frame_dt)
        } else {
            0.0
        };
        self.time.advance(dt);
        let now = self.time.now();

        for action in self.scheduler.drain_due(now) {
            self.apply_deferred(action);
        }

        let (control, triggers) = self.read_controls();
        self.player.advance(dt, &control);

        for trigger in triggers {
            match trigger {
                ActionTrigger::Fire => self.fire(now),
                ActionTrigger::Reload => self.begin_reload(now),
            }
        }
        if self.weapon.wants_auto_reload() {
            self.begin_reload(now);
        }
        self.weapon.advance(dt);

        self.run_enemies(dt, now);
        self.run_hazards(now);
        if self.objective.phase() == ObjectivePhase::Active {
            self.run_spawner(now);
        }
        self.run_objective(now);

        self.dispatch_events();
        self.finish_if_over();
        self.refresh_hud();
    }

    /// Everything the renderer needs for this frame.
    pub fn snapshot(&self) -> SessionSnapshot {
        let level = self.current_level();
        let alive = enemies::alive_count(&self.enemies);
        let quota_remaining = level
            .quota_total()
            .map(|quota| quota.saturating_sub(self.spawner.issued()) + alive);
        build_snapshot(&SnapshotSources {
            time: self.time,
            status: self.status,
            phase: self.objective.phase(),
            level: self.objective.level(),
            level_name: &level.name,
            player: &self.player,
            weapon: &self.weapon,
            enemies: &self.enemies,
            hazards: &self.hazards,
            score: &self.score,
            quota_remaining,
            enemies_alive: alive,
            stake: self.config.wager.stake,
            world: self.world.as_ref(),
            message: self.message.as_deref(),
        })
    }

    // ---- Event bus ----

    pub fn subscribe(&mut self, topic: EventTopic, subscriber: Box<dyn Subscriber>) -> SubscriptionId {
        self.bus.subscribe(topic, subscriber)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> Option<Box<dyn Subscriber>> {
        self.bus.unsubscribe(id)
    }

    // ---- Accessors ----

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn phase(&self) -> ObjectivePhase {
        self.objective.phase()
    }

    pub fn level(&self) -> usize {
        self.objective.level()
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn player(&self) -> &PlayerController {
        &self.player
    }

    pub fn weapon(&self) -> &Weapon {
        &self.weapon
    }

    pub fn enemies(&self) -> &ActorPool<Enemy> {
        &self.enemies
    }

    pub fn hazards(&self) -> &HazardRegistry {
        &self.hazards
    }

    pub fn scheduler(&self) -> &DelayQueue {
        &self.scheduler
    }

    pub fn score(&self) -> &ScoreKeeper {
        &self.score
    }

    pub fn world(&self) -> &dyn ArenaWorld {
        self.world.as_ref()
    }

    /// Final summary once the session is finished.
    pub fn summary(&self) -> Option<&GameSummary> {
        self.summary.as_ref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    #[cfg(test)]
    pub(crate) fn weapon_mut(&mut self) -> &mut Weapon {
        &mut self.weapon
    }

    #[cfg(test)]
    pub(crate) fn hazards_mut(&mut self) -> &mut HazardRegistry {
        &mut self.hazards
    }

    // ---- Tick stages ----

    fn current_level(&self) -> &LevelConfig {
        &self.config.levels[self.objective.level()]
    }

    /// Control vector and triggers for this tick. Everything is drained
    /// even when pointer capture is off, so nothing queued while
    /// uncaptured leaks into a later tick.
    fn read_controls(&mut self) -> (ControlVector, Vec<ActionTrigger>) {
        self.controls.pump();
        let look = self.controls.take_look_delta();
        let triggers = self.controls.drain_triggers();
        if !self.controls.is_pointer_capture_active() {
            return (ControlVector::default(), Vec::new());
        }
        let control = ControlVector::new(
            self.controls.movement_vector(),
            look,
            self.controls.is_sprinting(),
            self.controls.is_jumping(),
        );
        (control, triggers)
    }

    fn fire(&mut self, now: f64) {
        let origin = self.player.eye_position();
        let direction = self.player.aim_direction();
        let Some(ray) = self.weapon.try_fire(now, origin, direction) else {
            return;
        };
        let result = combat::resolve_shot(
            &ray,
            self.weapon.damage(),
            &mut self.enemies,
            self.query.as_ref(),
        );
        self.bus.publish(GameEvent::ShotFired {
            hit_slot: result.map(|(hit, _)| hit.handle.slot),
        });
        if let Some((hit, DamageOutcome::Killed)) = result {
            self.on_enemy_killed(hit.handle, now);
        }
    }

    fn on_enemy_killed(&mut self, handle: PoolHandle, now: f64) {
        let Some(enemy) = self.enemies.get(handle) else {
            return;
        };
        let archetype = enemy.archetype();
        let score_value = enemy.profile().score_value;
        debug!(slot = handle.slot, ?archetype, "enemy killed");
        self.bus.publish(GameEvent::EnemyKilled {
            slot: handle.slot,
            archetype,
            score_value,
        });
        self.scheduler.schedule(
            now,
            self.config.death_sequence_secs,
            DeferredAction::FinishDeath { enemy: handle },
        );
    }

    fn begin_reload(&mut self, now: f64) {
        let Some(ticket) = self.weapon.try_reload(now) else {
            return;
        };
        self.reload_timer = Some(self.scheduler.schedule(
            now,
            ticket.duration_secs,
            DeferredAction::FinishReload,
        ));
        self.bus.publish(GameEvent::ReloadStarted {
            duration_secs: ticket.duration_secs,
        });
    }

    fn run_enemies(&mut self, dt: f32, now: f64) {
        let attacks = enemies::run(
            &mut self.enemies,
            self.player.position(),
            dt,
            now,
            self.config.arena_half_width,
        );
        for attack in attacks {
            self.damage_player(attack.damage, DamageSource::Enemy(attack.archetype), now);
        }
    }

    fn run_hazards(&mut self, now: f64) {
        if !self.player.is_alive() {
            return;
        }
        if let Some(hit) = self.hazards.trigger_at(self.player.position()) {
            debug!(index = hit.index, damage = hit.damage, "landmine triggered");
            self.bus.publish(GameEvent::HazardTriggered {
                index: hit.index,
                damage: hit.damage,
            });
            self.damage_player(hit.damage, DamageSource::Landmine, now);
        }
    }

    /// Route damage through the player's cooldown gate.
    fn damage_player(&mut self, amount: f32, source: DamageSource, now: f64) {
        if self.player.take_damage(amount, now) {
            self.bus.publish(GameEvent::PlayerDamaged {
                amount,
                remaining: self.player.health(),
                source,
            });
        }
    }

    fn run_spawner(&mut self, now: f64) {
        let alive = enemies::alive_count(&self.enemies);
        let level = &self.config.levels[self.objective.level()];
        self.spawner.run(
            now,
            level,
            alive,
            self.world.spawn_points().len(),
            &mut self.rng,
            &mut self.scheduler,
        );
    }

    fn spawn_enemy(&mut self, archetype: Archetype, point: usize) {
        if self.objective.phase() != ObjectivePhase::Active {
            self.spawner.on_spawn_resolved(false);
            return;
        }
        let points = self.world.spawn_points();
        let Some(&position) = points.get(point).or_else(|| points.first()) else {
            self.spawner.on_spawn_resolved(false);
            return;
        };
        let init = EnemyInit {
            position,
            archetype,
            death_sequence_secs: self.config.death_sequence_secs,
        };
        match self.enemies.acquire(init) {
            Ok(handle) => {
                self.spawner.on_spawn_resolved(true);
                debug!(slot = handle.slot, ?archetype, "enemy spawned");
                self.bus.publish(GameEvent::EnemySpawned {
                    slot: handle.slot,
                    archetype,
                    position,
                });
            }
            Err(err) => {
                warn!(%err, ?archetype, "spawn deferred");
                self.spawner.on_spawn_resolved(false);
            }
        }
    }

    fn run_objective(&mut self, now: f64) {
        let level = self.current_level();
        let survival_secs = match level.progression {
            Progression::Survival { duration_secs } => Some(duration_secs),
            Progression::Quota { .. } => None,
        };
        let inputs = ObjectiveInputs {
            player_health: self.player.health(),
            player_position: self.player.position(),
            quota: level.quota_total(),
            issued: self.spawner.issued(),
            alive: enemies::alive_count(&self.enemies),
            bonus_item: self.world.bonus_item_position(),
            level_elapsed_secs: now - self.level_started_at,
            survival_secs,
        };
        for transition in self.objective.step(&inputs) {
            self.apply_transition(transition);
        }
    }

    fn apply_transition(&mut self, transition: PhaseTransition) {
        let PhaseTransition { level, from, to } = transition;
        info!(level, ?from, ?to, "phase changed");
        self.bus.publish(GameEvent::PhaseChanged { level, from, to });
        self.hud.notify(HudNotice::PhaseChanged { level, phase: to });

        match to {
            ObjectivePhase::ObjectiveComplete => {
                self.bus.publish(GameEvent::ObjectiveComplete { level });
                self.show_message("Objective complete");
            }
            ObjectivePhase::BonusAccessible => {
                self.world.open_access_gate();
                let entry = self.world.bonus_area_entry();
                info!(?entry, "access gate open");
                self.show_message("Access gate open");
            }
            ObjectivePhase::LevelComplete => {
                if from == ObjectivePhase::BonusAccessible {
                    self.world.remove_bonus_item();
                    let healed = self.player.heal(BONUS_HEAL);
                    debug!(healed, "bonus item collected");
                    self.bus.publish(GameEvent::ItemCollected { level });
                }
                // Whatever is still standing leaves with the level.
                self.enemies.release_all();
                if !self.objective.is_last_level() {
                    self.scheduler.schedule(
                        self.time.now(),
                        self.config.level_transition_secs,
                        DeferredAction::AdvanceLevel,
                    );
                    self.show_message("Level complete");
                }
            }
            ObjectivePhase::Active => self.begin_level(),
            ObjectivePhase::Won => self.outcome = Some(GameOutcome::Won),
            ObjectivePhase::Lost => self.outcome = Some(GameOutcome::Lost),
        }
    }

    fn apply_deferred(&mut self, action: DeferredAction) {
        match action {
            DeferredAction::FinishReload => {
                self.reload_timer = None;
                if self.weapon.finish_reload() {
                    self.bus.publish(GameEvent::ReloadFinished {
                        ammo: self.weapon.ammo(),
                        reserve: self.weapon.reserve(),
                    });
                }
            }
            DeferredAction::FinishDeath { enemy } => {
                if self.enemies.release(enemy) {
                    debug!(slot = enemy.slot, "enemy returned to pool");
                }
            }
            DeferredAction::SpawnEnemy { archetype, point } => self.spawn_enemy(archetype, point),
            DeferredAction::AdvanceLevel => {
                if let Some(transition) = self.objective.advance_level() {
                    self.apply_transition(transition);
                }
            }
            DeferredAction::ClearMessage => {
                self.message_timer = None;
                self.message = None;
                self.hud.notify(HudNotice::ClearMessage);
            }
        }
    }

    /// Load the objective machine's current level: traps, gate, bonus item
    /// and spawn cadence.
    fn begin_level(&mut self) {
        let index = self.objective.level();
        let now = self.time.now();
        let (landmines, name) = {
            let level = self.current_level();
            (level.landmines, level.name.clone())
        };
        let sites = self.world.hazard_sites(landmines);
        self.hazards.rebuild(sites);
        self.world.close_access_gate();
        self.world.restore_bonus_item();
        self.enemies.release_all();
        self.spawner.reset(now);
        self.level_started_at = now;
        info!(level = index, name = %name, hazards = self.hazards.len(), "level started");
        self.bus.publish(GameEvent::LevelStarted { level: index });
        self.show_message(name);
    }

    fn announce_phase(&mut self) {
        self.hud.notify(HudNotice::PhaseChanged {
            level: self.objective.level(),
            phase: self.objective.phase(),
        });
    }

    fn show_message(&mut self, text: impl Into<String>) {
        let text = text.into();
        if let Some(id) = self.message_timer.take() {
            self.scheduler.cancel(id);
        }
        self.hud.notify(HudNotice::Message { text: text.clone() });
        self.message = Some(text);
        self.message_timer = Some(self.scheduler.schedule(
            self.time.now(),
            MESSAGE_DURATION_SECS,
            DeferredAction::ClearMessage,
        ));
    }

    fn dispatch_events(&mut self) {
        for event in self.bus.dispatch() {
            self.score.on_event(&event);
        }
    }

    fn finish_if_over(&mut self) {
        let Some(outcome) = self.outcome.take() else {
            return;
        };
        self.status = SessionStatus::Finished;
        let summary = self
            .score
            .summary(outcome, self.time.now(), &self.config.wager);
        info!(
            ?outcome,
            kills = summary.kills,
            score = summary.score,
            payout = summary.payout,
            "game over"
        );
        self.bus.publish(GameEvent::GameOver { outcome });
        self.dispatch_events();
        self.hud.notify(HudNotice::GameOver {
            summary: summary.clone(),
        });
        self.summary = Some(summary);
    }

    /// Push changed HUD values.
    fn refresh_hud(&mut self) {
        let health = self.player.health();
        if self.hud_state.health != Some(health) {
            self.hud_state.health = Some(health);
            self.hud.notify(HudNotice::HealthChanged {
                health,
                max: self.player.max_health(),
            });
        }

        let ammo = (
            self.weapon.ammo(),
            self.weapon.reserve(),
            self.weapon.is_reloading(),
        );
        if self.hud_state.ammo != Some(ammo) {
            self.hud_state.ammo = Some(ammo);
            self.hud.notify(HudNotice::AmmoChanged {
                ammo: ammo.0,
                reserve: ammo.1,
                reloading: ammo.2,
            });
        }

        if self.hud_state.kills != Some(self.score.kills) {
            self.hud_state.kills = Some(self.score.kills);
            self.hud.notify(HudNotice::KillsChanged {
                kills: self.score.kills,
            });
        }
        if self.hud_state.score != Some(self.score.score) {
            self.hud_state.score = Some(self.score.score);
            self.hud.notify(HudNotice::ScoreChanged {
                score: self.score.score,
            });
        }

        let timer = self.level_timer();
        if self.hud_state.timer != Some(timer) {
            self.hud_state.timer = Some(timer);
            self.hud.notify(HudNotice::TimerTick {
                seconds: timer.0,
                counting_down: timer.1,
            });
        }
    }

    /// Whole seconds for the HUD clock: remaining on timed levels,
    /// elapsed otherwise.
    fn level_timer(&self) -> (u32, bool) {
        let level = self.current_level();
        let elapsed = (self.time.now() - self.level_started_at).max(0.0);
        let limit = match level.progression {
            Progression::Survival { duration_secs } => Some(duration_secs),
            Progression::Quota { .. } => level.time_limit_secs,
        };
        match limit {
            Some(limit) => ((limit - elapsed).max(0.0).ceil() as u32, true),
            None => (elapsed.floor() as u32, false),
        }
    }
}
