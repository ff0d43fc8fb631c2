//! # Scene — Owner of Entities
//!
//! The [`Scene`] owns every [`Entity`] it creates and is the only way to
//! create or remove one.
//!
//! ## Layout
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │ Scene                                                │
//! │                                                      │
//! │  allocator: EntityId issue/recycle                   │
//! │  slots:     Vec<Option<Entity>>  indexed by id.index │
//! │  order:     Vec<EntityId>        insertion order     │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! `slots` gives constant-time lookup by id; `order` gives the deterministic
//! iteration order used by lookups by name and by dispatch.
//!
//! ## Dispatch and Commands
//!
//! Scene-wide calls fan out to entities in insertion order. Components that
//! queued [`Commands`](super::commands::Commands) during the fan-out have them
//! applied once it finishes, so entities spawned by a call never receive that
//! same call.

use super::commands::Command;
use super::component::Component;
use super::dispatch::{DispatchError, Value};
use super::entity::Entity;
use super::id::{EntityAllocator, EntityId, SceneId};
use crate::config::{RemovalPolicy, SceneConfig};

#[cfg(feature = "diagnostics")]
use crate::diag::{Counters, SceneStats};

/// A container of entities. See the [module docs](self).
pub struct Scene {
    id: SceneId,
    config: SceneConfig,
    allocator: EntityAllocator,
    slots: Vec<Option<Entity>>,
    order: Vec<EntityId>,
    /// Commands left behind by removed entities.
    pending: Vec<Command>,
    #[cfg(feature = "diagnostics")]
    counters: Counters,
}

impl Scene {
    pub fn new() -> Self {
        Self::with_config(SceneConfig::default())
    }

    pub fn with_config(config: SceneConfig) -> Self {
        let id = SceneId::next();
        log::debug!("{id}: created ({:?})", config.removal);
        Self {
            id,
            config,
            allocator: EntityAllocator::new(),
            slots: Vec::new(),
            order: Vec::new(),
            pending: Vec::new(),
            #[cfg(feature = "diagnostics")]
            counters: Counters::default(),
        }
    }

    /// Process-unique id of this scene.
    pub fn id(&self) -> SceneId {
        self.id
    }

    /// Settings the scene was created with.
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    // ── Entities ─────────────────────────────────────────────────────

    /// Create an entity called `name` and append it to the scene.
    pub fn create_entity(&mut self, name: impl Into<String>) -> EntityId {
        let id = self.allocator.allocate();
        let entity = Entity::new(id, self.id, name.into(), self.config.hooks);
        log::debug!("{}: created entity {entity}", self.id);

        let index = id.index as usize;
        if self.slots.len() < self.allocator.slot_count() {
            self.slots.resize_with(self.allocator.slot_count(), || None);
        }
        debug_assert!(self.slots[index].is_none(), "slot {index} still occupied");
        self.slots[index] = Some(entity);
        self.order.push(id);

        #[cfg(feature = "diagnostics")]
        {
            self.counters.entities_created += 1;
        }
        id
    }

    /// Create an entity with the configured default name (`"New Entity"`).
    pub fn create_default_entity(&mut self) -> EntityId {
        let name = self.config.default_entity_name.clone();
        self.create_entity(name)
    }

    /// Take an entity out of the scene and hand it back.
    ///
    /// Returns `None` if `id` is not (or no longer) part of this scene. Under
    /// [`RemovalPolicy::Cascade`] every component is removed, with its
    /// `on_destroy` hook, before the entity is returned; under
    /// [`RemovalPolicy::Detach`] components come back untouched.
    ///
    /// Queued commands are applied afterwards either way, as by
    /// [`apply_commands`](Self::apply_commands): the entity's own, and
    /// anything those commands queue in turn.
    pub fn remove_entity(&mut self, id: EntityId) -> Option<Entity> {
        let entity = self.take_entity(id)?;
        self.apply_commands();
        Some(entity)
    }

    /// Remove every entity present when the call starts, honouring the
    /// removal policy.
    ///
    /// Queued commands are applied once all of them are gone, so entities
    /// spawned by `on_destroy` hooks (a respawn, say) survive the clear.
    pub fn clear(&mut self) {
        for id in self.order.clone() {
            self.take_entity(id);
        }
        self.apply_commands();
    }

    /// Detach `id` from the scene and park its queued commands in `pending`.
    fn take_entity(&mut self, id: EntityId) -> Option<Entity> {
        let mut entity = self.slots.get_mut(id.index as usize)?.take_if(|e| e.id() == id)?;
        self.order.retain(|&other| other != id);
        self.allocator.release(id);
        log::debug!("{}: removed entity {entity}", self.id);

        if self.config.removal == RemovalPolicy::Cascade {
            entity.destroy_components();
        }
        self.pending.extend(entity.take_commands());

        #[cfg(feature = "diagnostics")]
        {
            self.counters.entities_removed += 1;
        }
        Some(entity)
    }

    /// The entity behind `id`, or `None` if it was removed.
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.slots
            .get(id.index as usize)?
            .as_ref()
            .filter(|e| e.id() == id)
    }

    /// Mutable access to the entity behind `id`.
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.slots
            .get_mut(id.index as usize)?
            .as_mut()
            .filter(|e| e.id() == id)
    }

    /// Whether `id` still names a live entity of this scene.
    pub fn contains(&self, id: EntityId) -> bool {
        self.entity(id).is_some()
    }

    /// All entities, in insertion order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.order.iter().filter_map(|&id| self.entity(id))
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the scene has no entities.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Every entity whose name is exactly `name`, in insertion order.
    pub fn find_entities_with_name(&self, name: &str) -> Vec<EntityId> {
        self.entities()
            .filter(|e| e.name() == name)
            .map(Entity::id)
            .collect()
    }

    // ── Dispatch ─────────────────────────────────────────────────────

    /// [`call_component_with`](Self::call_component_with) with no arguments.
    pub fn call_component<T: Component>(&mut self, method: &str) -> Result<usize, DispatchError> {
        self.call_component_with::<T>(method, &[])
    }

    /// Send `method` to the `T` component of every entity. Entities without
    /// a `T` are skipped. Returns how many components handled the call.
    pub fn call_component_with<T: Component>(
        &mut self,
        method: &str,
        args: &[Value],
    ) -> Result<usize, DispatchError> {
        self.fan_out(|entity| entity.call_component_with::<T>(method, args))
    }

    /// [`broadcast_with`](Self::broadcast_with) with no arguments.
    pub fn broadcast(&mut self, method: &str) -> Result<usize, DispatchError> {
        self.broadcast_with(method, &[])
    }

    /// Send `method` to every component of every entity.
    pub fn broadcast_with(&mut self, method: &str, args: &[Value]) -> Result<usize, DispatchError> {
        self.fan_out(|entity| entity.broadcast_with(method, args))
    }

    fn fan_out(
        &mut self,
        mut dispatch: impl FnMut(&mut Entity) -> Result<usize, DispatchError>,
    ) -> Result<usize, DispatchError> {
        let targets = self.order.clone();
        let mut handled = 0;
        let mut failure = None;
        for id in targets {
            let Some(entity) = self.entity_mut(id) else {
                continue;
            };
            match dispatch(entity) {
                Ok(n) => handled += n,
                Err(err) => {
                    failure = Some(err);
                    break;
                }
            }
        }

        #[cfg(feature = "diagnostics")]
        {
            self.counters.dispatches += 1;
            self.counters.handled += handled as u64;
        }
        self.apply_commands();

        match failure {
            Some(err) => Err(err),
            None => Ok(handled),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Apply every command queued by components, starting with those left by
    /// removed entities, then entity by entity in insertion order, until none
    /// are left. Returns how many were applied.
    ///
    /// Scene-wide dispatch calls this itself; call it after dispatching
    /// through [`entity_mut`](Self::entity_mut) directly.
    pub fn apply_commands(&mut self) -> usize {
        let mut applied = 0;
        loop {
            let mut batch = std::mem::take(&mut self.pending);
            for i in 0..self.order.len() {
                let id = self.order[i];
                if let Some(entity) = self.entity_mut(id) {
                    batch.extend(entity.take_commands());
                }
            }
            if batch.is_empty() {
                break;
            }
            applied += batch.len();
            for command in batch {
                self.apply(command);
            }
        }

        #[cfg(feature = "diagnostics")]
        {
            self.counters.commands_applied += applied as u64;
        }
        applied
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::Create { name, setup } => {
                let id = self.create_entity(name);
                if let (Some(setup), Some(entity)) = (setup, self.entity_mut(id)) {
                    setup(entity);
                }
            }
            Command::Remove(id) => {
                if self.take_entity(id).is_none() {
                    log::trace!("{}: queued removal of {id} ignored, already gone", self.id);
                }
            }
        }
    }

    // ── Diagnostics ──────────────────────────────────────────────────

    /// Snapshot of the scene's size and activity since the last reset.
    #[cfg(feature = "diagnostics")]
    pub fn stats(&self) -> SceneStats {
        SceneStats::collect(self.entities(), &self.counters)
    }

    /// Zero the activity counters reported by [`stats`](Self::stats).
    #[cfg(feature = "diagnostics")]
    pub fn reset_stats(&mut self) {
        self.counters = Counters::default();
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
