//! # Component — Behaviour Attached to an Entity
//!
//! A component is any `'static` type implementing [`Component`]. All three
//! trait methods have no-op defaults, so a plain data component is just:
//!
//! ```ignore
//! #[derive(Default)]
//! struct Tag;
//! impl Component for Tag {}
//! ```
//!
//! ## Hooks and Handlers
//!
//! - [`on_create`](Component::on_create) runs right after the component has
//!   been registered on its entity.
//! - [`on_destroy`](Component::on_destroy) runs right before it is detached.
//! - [`handle`](Component::handle) receives named calls from
//!   [`Entity`] and [`Scene`](super::scene::Scene) dispatch.
//!
//! Each of them gets a [`ComponentCx`], the component's view of its owner.
//!
//! ## Borrowing
//!
//! While a component runs, it is taken out of its slot, so the context can
//! hand out `&mut` access to the rest of the entity without aliasing the
//! component itself. The slot keeps its place in the table; lookups of a
//! component that is currently running return `None`.

use std::any::Any;

use super::commands::Commands;
use super::dispatch::{Call, DispatchError, HandlerResult, Outcome, Value};
use super::entity::Entity;
use super::id::{EntityId, SceneId};

/// Object-safe access to [`Any`] for trait objects.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Per-entity behaviour. See the [module docs](self).
pub trait Component: AsAny {
    /// Called once, right after the component is attached.
    fn on_create(&mut self, _cx: &mut ComponentCx<'_>) {}

    /// Called once, right before the component is detached.
    fn on_destroy(&mut self, _cx: &mut ComponentCx<'_>) {}

    /// Answer a named call. Return [`Outcome::Unhandled`] for anything this
    /// component doesn't implement.
    fn handle(&mut self, _call: &Call<'_>, _cx: &mut ComponentCx<'_>) -> HandlerResult {
        Ok(Outcome::Unhandled)
    }
}

pub(crate) fn downcast_ref<T: Component>(component: &dyn Component) -> Option<&T> {
    component.as_any().downcast_ref::<T>()
}

pub(crate) fn downcast_mut<T: Component>(component: &mut dyn Component) -> Option<&mut T> {
    component.as_any_mut().downcast_mut::<T>()
}

/// Identifies one attachment of a component on one entity.
///
/// Keys are handed out by the entity in increasing order and never reused,
/// so removing a sibling does not change them.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct ComponentKey(pub(crate) u32);

/// A component's back-reference to its owners, assigned once at attach time.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ComponentLink {
    pub scene: SceneId,
    pub entity: EntityId,
    pub key: ComponentKey,
}

/// A component's view of the entity it is attached to.
///
/// Every accessor delegates to the owning [`Entity`]; the context itself only
/// carries the component's [`ComponentLink`].
pub struct ComponentCx<'a> {
    entity: &'a mut Entity,
    link: ComponentLink,
}

impl<'a> ComponentCx<'a> {
    pub(crate) fn new(entity: &'a mut Entity, link: ComponentLink) -> Self {
        Self { entity, link }
    }

    pub fn link(&self) -> ComponentLink {
        self.link
    }

    pub fn entity_id(&self) -> EntityId {
        self.link.entity
    }

    pub fn scene_id(&self) -> SceneId {
        self.link.scene
    }

    pub fn entity_name(&self) -> &str {
        self.entity.name()
    }

    pub fn entity(&self) -> &Entity {
        &*self.entity
    }

    pub fn entity_mut(&mut self) -> &mut Entity {
        &mut *self.entity
    }

    /// Attach a default-constructed sibling. `None` if one already exists.
    pub fn add_component<T: Component + Default>(&mut self) -> Option<&mut T> {
        self.entity.add_component::<T>()
    }

    /// Attach a pre-built sibling. `None` if one of that type already exists.
    pub fn attach_component<T: Component>(&mut self, component: T) -> Option<&mut T> {
        self.entity.attach_component(component)
    }

    pub fn get_component<T: Component>(&self) -> Option<&T> {
        self.entity.get_component::<T>()
    }

    pub fn get_component_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.entity.get_component_mut::<T>()
    }

    pub fn has_component<T: Component>(&self) -> bool {
        self.entity.has_component::<T>()
    }

    pub fn remove_component<T: Component>(&mut self) -> bool {
        self.entity.remove_component::<T>()
    }

    /// Dispatch a call to a sibling of type `T`.
    pub fn call_component<T: Component>(
        &mut self,
        method: &str,
        args: &[Value],
    ) -> Result<usize, DispatchError> {
        self.entity.call_component_with::<T>(method, args)
    }

    /// Queue scene-level work (spawning, removing entities).
    pub fn commands(&mut self) -> &mut Commands {
        self.entity.commands_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Speed(f32);
    impl Component for Speed {}

    struct Armor;
    impl Component for Armor {}

    #[test]
    fn downcast_through_trait_object() {
        let mut boxed: Box<dyn Component> = Box::new(Speed(2.0));
        assert!(downcast_ref::<Armor>(&*boxed).is_none());
        assert_eq!(downcast_ref::<Speed>(&*boxed).map(|s| s.0), Some(2.0));

        if let Some(speed) = downcast_mut::<Speed>(&mut *boxed) {
            speed.0 = 3.0;
        }
        assert_eq!(downcast_ref::<Speed>(&*boxed).map(|s| s.0), Some(3.0));
    }

    #[test]
    fn default_handler_ignores_calls() {
        use super::super::id::EntityAllocator;

        let mut alloc = EntityAllocator::new();
        let mut entity = Entity::new(
            alloc.allocate(),
            SceneId::next(),
            "probe".into(),
            Default::default(),
        );
        let link = ComponentLink {
            scene: entity.scene(),
            entity: entity.id(),
            key: ComponentKey(0),
        };
        let mut cx = ComponentCx::new(&mut entity, link);
        let mut armor = Armor;
        let outcome = armor.handle(&Call::new("Anything", &[]), &mut cx);
        assert_eq!(outcome, Ok(Outcome::Unhandled));
        assert_eq!(cx.entity_name(), "probe");
    }
}
