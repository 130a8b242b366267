//! Snapshot system: gathers the visible session state into a
//! `SessionSnapshot`. Read-only.

use dunefire_core::enums::{ObjectivePhase, SessionStatus};
use dunefire_core::state::{EnemyView, ScoreView, SessionSnapshot};
use dunefire_core::types::SimTime;

use crate::collaborators::ArenaWorld;
use crate::enemy::Enemy;
use crate::hazards::HazardRegistry;
use crate::player::PlayerController;
use crate::pool::ActorPool;
use crate::score::ScoreKeeper;
use crate::weapon::Weapon;

/// Borrowed session state a snapshot is built from.
pub struct SnapshotSources<'a> {
    pub time: SimTime,
    pub status: SessionStatus,
    pub phase: ObjectivePhase,
    pub level: usize,
    pub level_name: &'a str,
    pub player: &'a PlayerController,
    pub weapon: &'a Weapon,
    pub enemies: &'a ActorPool<Enemy>,
    pub hazards: &'a HazardRegistry,
    pub score: &'a ScoreKeeper,
    pub quota_remaining: Option<u32>,
    pub enemies_alive: u32,
    pub stake: u32,
    pub world: &'a dyn ArenaWorld,
    pub message: Option<&'a str>,
}

pub fn build_snapshot(src: &SnapshotSources<'_>) -> SessionSnapshot {
    SessionSnapshot {
        time: src.time,
        status: src.status,
        phase: src.phase,
        level: src.level,
        level_name: src.level_name.to_owned(),
        player: src.player.view(),
        weapon: src.weapon.view(),
        enemies: build_enemies(src.enemies),
        hazards: src.hazards.views(),
        score: ScoreView {
            kills: src.score.kills,
            score: src.score.score,
            shots_fired: src.score.shots_fired,
            shots_hit: src.score.shots_hit,
            levels_cleared: src.score.levels_cleared,
            quota_remaining: src.quota_remaining,
            enemies_alive: src.enemies_alive,
            stake: src.stake,
        },
        gate_open: src.world.is_gate_open(),
        bonus_entry: src.world.bonus_area_entry(),
        bonus_item: src.world.bonus_item_position(),
        message: src.message.map(str::to_owned),
    }
}

/// In-use enemies, dying ones included, sorted by slot.
fn build_enemies(enemies: &ActorPool<Enemy>) -> Vec<EnemyView> {
    let mut views: Vec<EnemyView> = enemies.iter_in_use().map(|(_, e)| e.view()).collect();
    views.sort_by_key(|v| v.slot);
    views
}
