//! Deferred scene operations.
//!
//! A running component only borrows its own entity, so it cannot create or
//! remove entities directly. It queues the request on [`Commands`] (via
//! [`ComponentCx::commands`](super::component::ComponentCx::commands)) and the
//! scene applies the queue once the current scene operation returns.

use std::fmt;

use super::entity::Entity;
use super::id::EntityId;

pub(crate) enum Command {
    Create {
        name: String,
        setup: Option<Box<dyn FnOnce(&mut Entity)>>,
    },
    Remove(EntityId),
}

/// A FIFO queue of scene operations.
#[derive(Default)]
pub struct Commands {
    queue: Vec<Command>,
}

impl Commands {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty entity.
    pub fn create_entity(&mut self, name: impl Into<String>) {
        self.queue.push(Command::Create {
            name: name.into(),
            setup: None,
        });
    }

    /// Create an entity and run `setup` on it, typically to attach components.
    pub fn create_entity_with(
        &mut self,
        name: impl Into<String>,
        setup: impl FnOnce(&mut Entity) + 'static,
    ) {
        self.queue.push(Command::Create {
            name: name.into(),
            setup: Some(Box::new(setup)),
        });
    }

    /// Remove an entity. Ignored if it is already gone when the queue runs.
    pub fn remove_entity(&mut self, id: EntityId) {
        self.queue.push(Command::Remove(id));
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub(crate) fn take(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.queue)
    }
}

impl fmt::Debug for Commands {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Commands")
            .field("pending", &self.queue.len())
            .finish()
    }
}
