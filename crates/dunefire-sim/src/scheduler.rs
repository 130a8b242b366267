//! Delay queue for deferred game actions.
//!
//! Everything that waits in the simulation (reload completion, the death
//! sequence, spawn emergence, level transitions, banner timeouts) is an
//! entry here, keyed on virtual time and drained at the start of each tick.
//! Entries are stamped with the session generation at scheduling time;
//! after `bump_generation` they are discarded instead of applied.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

use tracing::debug;

use dunefire_core::enums::Archetype;

use crate::pool::PoolHandle;

/// Slack for comparing accumulated f64 frame times.
pub const TIME_EPSILON: f64 = 1e-9;

/// Something the session does later.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeferredAction {
    /// Move rounds from reserve into the magazine.
    FinishReload,
    /// Death sequence over; return the enemy to the pool.
    FinishDeath { enemy: PoolHandle },
    /// An enemy emerges at spawn point `point`.
    SpawnEnemy { archetype: Archetype, point: usize },
    /// Leave LevelComplete for the next level.
    AdvanceLevel,
    /// Take down the current HUD banner.
    ClearMessage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Entry {
    fire_at: f64,
    seq: u64,
    generation: u64,
    action: DeferredAction,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    // Reversed: BinaryHeap is a max-heap and we want the earliest entry,
    // with scheduling order breaking ties.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .fire_at
            .total_cmp(&self.fire_at)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[derive(Debug, Default)]
pub struct DelayQueue {
    heap: BinaryHeap<Entry>,
    /// Sequence numbers still pending (not cancelled, not drained).
    live: HashSet<u64>,
    next_seq: u64,
    generation: u64,
    discarded: u64,
}

impl DelayQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `action` once `delay` seconds of virtual time have passed.
    pub fn schedule(&mut self, now: f64, delay: f64, action: DeferredAction) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Entry {
            fire_at: now + delay.max(0.0),
            seq,
            generation: self.generation,
            action,
        });
        self.live.insert(seq);
        TimerId(seq)
    }

    /// Cancel a pending action. Returns false if it already ran, was
    /// already cancelled, or never existed.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.live.remove(&id.0)
    }

    /// Pop every action due at `now`, in due-time order. Cancelled entries
    /// are skipped and entries from an older generation are dropped.
    pub fn drain_due(&mut self, now: f64) -> Vec<DeferredAction> {
        let mut due = Vec::new();
        while let Some(entry) = self.heap.peek() {
            if entry.fire_at > now + TIME_EPSILON {
                break;
            }
            let Some(entry) = self.heap.pop() else {
                break;
            };
            if !self.live.remove(&entry.seq) {
                continue;
            }
            if entry.generation != self.generation {
                self.discarded += 1;
                debug!(
                    action = ?entry.action,
                    scheduled_generation = entry.generation,
                    current_generation = self.generation,
                    "discarding stale deferred action"
                );
                continue;
            }
            due.push(entry.action);
        }
        due
    }

    /// Invalidate everything scheduled so far.
    pub fn bump_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Pending entries, stale ones included.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Stale entries dropped so far.
    pub fn discarded(&self) -> u64 {
        self.discarded
    }
}
