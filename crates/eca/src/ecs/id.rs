//! # Identifiers — Handles Instead of References
//!
//! Components never hold a pointer to the entity or scene that owns them. They
//! hold ids: a [`SceneId`] naming the scene, and an [`EntityId`] naming a slot
//! in that scene's entity table. Resolving an id goes back through the owner,
//! so a handle can never dangle; at worst it goes stale.
//!
//! ## Generational Indices
//!
//! Entity slots are recycled once an entity is removed. Each slot carries a
//! **generation** that is bumped on removal, and an [`EntityId`] remembers the
//! generation it was issued with:
//!
//! ```text
//! EntityId { index: 3, generation: 0 }  ← "Player", removed
//! EntityId { index: 3, generation: 1 }  ← "Enemy", reuses slot 3
//! ```
//!
//! Looking up the old `Player` id fails because the generations differ, rather
//! than silently returning `Enemy`.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// Identifies one [`Scene`](super::scene::Scene) for the lifetime of the process.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct SceneId(u32);

impl SceneId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw value. Useful for diagnostics.
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scene#{}", self.0)
    }
}

/// A lightweight handle to an entity inside a [`Scene`](super::scene::Scene).
///
/// Issued by [`Scene::create_entity`](super::scene::Scene::create_entity) and
/// only meaningful for the scene that issued it.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl EntityId {
    /// Returns the slot index. Recycled after removal.
    pub fn index(self) -> u32 {
        self.index
    }

    /// Returns the generation of the slot at the time this id was issued.
    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({}v{})", self.index, self.generation)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// Issues and recycles [`EntityId`]s for one scene.
///
/// ```text
/// generations: [1, 0, 2]   ← current generation per slot
/// free:        [0]         ← slots whose entity was removed
/// ```
pub(crate) struct EntityAllocator {
    generations: Vec<u32>,
    free: Vec<u32>,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self {
            generations: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Hand out an id, reusing a freed slot when there is one.
    pub fn allocate(&mut self) -> EntityId {
        match self.free.pop() {
            Some(index) => EntityId {
                index,
                generation: self.generations[index as usize],
            },
            None => {
                let index = self.generations.len() as u32;
                self.generations.push(0);
                EntityId {
                    index,
                    generation: 0,
                }
            }
        }
    }

    /// Retire an id. Returns `false` if it was already stale.
    pub fn release(&mut self, id: EntityId) -> bool {
        if !self.is_current(id) {
            return false;
        }
        self.generations[id.index as usize] += 1;
        self.free.push(id.index);
        true
    }

    pub fn is_current(&self, id: EntityId) -> bool {
        self.generations
            .get(id.index as usize)
            .is_some_and(|&generation| generation == id.generation)
    }

    /// Number of slots ever handed out; the entity table is this long.
    pub fn slot_count(&self) -> usize {
        self.generations.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_ids_are_sequential() {
        let mut alloc = EntityAllocator::new();
        let a = alloc.allocate();
        let b = alloc.allocate();
        assert_eq!((a.index(), a.generation()), (0, 0));
        assert_eq!((b.index(), b.generation()), (1, 0));
        assert_eq!(alloc.slot_count(), 2);
    }

    #[test]
    fn released_slot_is_reused_with_new_generation() {
        let mut alloc = EntityAllocator::new();
        let a = alloc.allocate();
        assert!(alloc.release(a));
        let b = alloc.allocate();
        assert_eq!(b.index(), a.index());
        assert_eq!(b.generation(), 1);
        assert!(!alloc.is_current(a));
        assert!(alloc.is_current(b));
        assert_eq!(alloc.slot_count(), 1);
    }

    #[test]
    fn double_release_is_rejected() {
        let mut alloc = EntityAllocator::new();
        let a = alloc.allocate();
        assert!(alloc.release(a));
        assert!(!alloc.release(a));
    }

    #[test]
    fn unknown_index_is_not_current() {
        let alloc = EntityAllocator::new();
        assert!(!alloc.is_current(EntityId {
            index: 7,
            generation: 0
        }));
    }

    #[test]
    fn scene_ids_are_unique() {
        let a = SceneId::next();
        let b = SceneId::next();
        assert_ne!(a, b);
    }

    #[test]
    fn display_formats() {
        let id = EntityId {
            index: 4,
            generation: 2,
        };
        assert_eq!(id.to_string(), "4v2");
        assert_eq!(format!("{id:?}"), "EntityId(4v2)");
    }
}
