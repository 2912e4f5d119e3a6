//! # Target Registry
//!
//! Sway and drift drive many scene objects at once. Hosts register each
//! object and get back a [`TargetId`]; the id stays valid until the object
//! is removed, and a stale id can never reach a slot that was reused.

/// Handle to one registered target.
///
/// Carries a generation so ids from removed targets fail the lookup
/// instead of aliasing whatever took over the slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TargetId {
    index: u32,
    generation: u32,
}

impl TargetId {
    /// Slot index, for logging.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Slot generation, for logging.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Generational slot map of per-target state.
pub struct TargetSet<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    len: usize,
}

impl<T> TargetSet<T> {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Registers a target, reusing a freed slot when one is available.
    pub fn register(&mut self, value: T) -> TargetId {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);
            return TargetId {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            value: Some(value),
        });
        TargetId {
            index,
            generation: 0,
        }
    }

    /// Removes a target, returning its state.
    ///
    /// `None` when the id is stale or was never issued. The slot's
    /// generation advances so the removed id stays dead.
    pub fn remove(&mut self, id: TargetId) -> Option<T> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation || slot.value.is_none() {
            return None;
        }
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.len -= 1;
        slot.value.take()
    }

    /// Looks up a live target.
    #[must_use]
    pub fn get(&self, id: TargetId) -> Option<&T> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.value.as_ref()
    }

    /// Looks up a live target mutably.
    pub fn get_mut(&mut self, id: TargetId) -> Option<&mut T> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.value.as_mut()
    }

    /// Iterates live targets in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (TargetId, &T)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.value.as_ref().map(|value| {
                (
                    TargetId {
                        index: index as u32,
                        generation: slot.generation,
                    },
                    value,
                )
            })
        })
    }

    /// Iterates live targets mutably in slot order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (TargetId, &mut T)> {
        self.slots.iter_mut().enumerate().filter_map(|(index, slot)| {
            let generation = slot.generation;
            slot.value.as_mut().map(move |value| {
                (
                    TargetId {
                        index: index as u32,
                        generation,
                    },
                    value,
                )
            })
        })
    }

    /// Number of live targets.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether no targets are registered.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<T> Default for TargetSet<T> {
    fn default() -> Self {
        Self::new()
    }
}
