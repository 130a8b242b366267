//! Reusable actor pool.
//!
//! Every constructed instance is in exactly one of two sets: `available`
//! or `in_use`. Acquiring reinitialises an instance in place instead of
//! allocating a new one, so enemies cycle through a fixed set of slots.
//!
//! Handles are generational: each acquire bumps the slot's life counter,
//! so a handle held across a release/acquire cycle no longer resolves to
//! the new occupant.

use std::collections::BTreeSet;

use thiserror::Error;

/// An actor that can live in an `ActorPool`.
pub trait Poolable {
    /// Arguments for (re)initialisation.
    type Init;

    /// Construct a blank instance. It is always `reinit`ed before use.
    fn blank() -> Self;

    /// Overwrite every field that influences behaviour. Nothing from a
    /// previous life may survive this call.
    fn reinit(&mut self, handle: PoolHandle, init: Self::Init);
}

/// Generational reference to a pool slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolHandle {
    pub slot: u32,
    pub life: u32,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PoolError {
    #[error("actor pool exhausted: all {capacity} slots in use")]
    Exhausted { capacity: usize },
}

pub struct ActorPool<T> {
    slots: Vec<T>,
    lives: Vec<u32>,
    /// LIFO: the most recently released slot is reused first.
    available: Vec<u32>,
    in_use: BTreeSet<u32>,
    /// Hard ceiling on constructed instances; `None` grows without bound.
    capacity: Option<usize>,
}

impl<T: Poolable> ActorPool<T> {
    /// An unbounded pool that grows on demand.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            lives: Vec::new(),
            available: Vec::new(),
            in_use: BTreeSet::new(),
            capacity: None,
        }
    }

    /// A pool that refuses to construct more than `capacity` instances.
    pub fn with_capacity_limit(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            lives: Vec::with_capacity(capacity),
            capacity: Some(capacity),
            ..Self::new()
        }
    }

    /// Take an instance (reusing a released one if possible), reinitialise
    /// it with `init` and mark it in use.
    pub fn acquire(&mut self, init: T::Init) -> Result<PoolHandle, PoolError> {
        let slot = match self.available.pop() {
            Some(slot) => slot,
            None => {
                if let Some(capacity) = self.capacity {
                    if self.slots.len() >= capacity {
                        return Err(PoolError::Exhausted { capacity });
                    }
                }
                self.slots.push(T::blank());
                self.lives.push(0);
                (self.slots.len() - 1) as u32
            }
        };

        let idx = slot as usize;
        self.lives[idx] = self.lives[idx].wrapping_add(1);
        let handle = PoolHandle {
            slot,
            life: self.lives[idx],
        };
        self.slots[idx].reinit(handle, init);
        self.in_use.insert(slot);
        Ok(handle)
    }

    /// Return an instance to the available set. Fields are left untouched
    /// so the final state stays inspectable until the slot is reacquired.
    /// Returns false (and does nothing) if the handle is stale or the
    /// instance is not in use.
    pub fn release(&mut self, handle: PoolHandle) -> bool {
        if !self.is_in_use(handle) {
            return false;
        }
        self.in_use.remove(&handle.slot);
        self.available.push(handle.slot);
        true
    }

    /// Release every in-use instance (session teardown).
    pub fn release_all(&mut self) {
        // Ascending order, so the lowest slot is the last pushed and the
        // first reacquired.
        let slots: Vec<u32> = self.in_use.iter().rev().copied().collect();
        self.in_use.clear();
        self.available.extend(slots);
    }

    pub fn is_in_use(&self, handle: PoolHandle) -> bool {
        self.is_current(handle) && self.in_use.contains(&handle.slot)
    }

    /// Instance for a handle from its current life, in use or released.
    pub fn get(&self, handle: PoolHandle) -> Option<&T> {
        self.is_current(handle)
            .then(|| &self.slots[handle.slot as usize])
    }

    pub fn get_mut(&mut self, handle: PoolHandle) -> Option<&mut T> {
        if !self.is_current(handle) {
            return None;
        }
        self.slots.get_mut(handle.slot as usize)
    }

    /// In-use instances in slot order.
    pub fn iter_in_use(&self) -> impl Iterator<Item = (PoolHandle, &T)> {
        self.in_use.iter().map(move |&slot| {
            let idx = slot as usize;
            (
                PoolHandle {
                    slot,
                    life: self.lives[idx],
                },
                &self.slots[idx],
            )
        })
    }

    /// Mutable in-use instances in slot order.
    pub fn iter_in_use_mut(&mut self) -> impl Iterator<Item = (PoolHandle, &mut T)> {
        let in_use = &self.in_use;
        let lives = &self.lives;
        self.slots
            .iter_mut()
            .enumerate()
            .filter(move |(idx, _)| in_use.contains(&(*idx as u32)))
            .map(move |(idx, actor)| {
                (
                    PoolHandle {
                        slot: idx as u32,
                        life: lives[idx],
                    },
                    actor,
                )
            })
    }

    pub fn in_use_count(&self) -> usize {
        self.in_use.len()
    }

    pub fn available_count(&self) -> usize {
        self.available.len()
    }

    /// Number of instances ever constructed.
    pub fn constructed(&self) -> usize {
        self.slots.len()
    }

    pub fn capacity_limit(&self) -> Option<usize> {
        self.capacity
    }

    pub fn in_use_slots(&self) -> impl Iterator<Item = u32> + '_ {
        self.in_use.iter().copied()
    }

    pub fn available_slots(&self) -> &[u32] {
        &self.available
    }

    fn is_current(&self, handle: PoolHandle) -> bool {
        self.lives
            .get(handle.slot as usize)
            .is_some_and(|&life| life == handle.life)
    }
}

impl<T: Poolable> Default for ActorPool<T> {
    fn default() -> Self {
        Self::new()
    }
}
