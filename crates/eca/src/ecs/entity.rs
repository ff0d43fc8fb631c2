//! # Entity — A Named Bag of Components
//!
//! An [`Entity`] owns at most one component per concrete type, kept in the
//! order they were attached. That order is also the dispatch order.
//!
//! ## Storage
//!
//! ```text
//! components: [ Slot { Health,  key 0 },
//!               Slot { Mover,   key 1 },
//!               Slot { Weapon,  key 3 } ]   ← key 2 was removed
//! ```
//!
//! Lookups by type are a linear scan over `TypeId`s. Entities carry a handful
//! of components, so this beats a map in practice and keeps ordering trivial.
//!
//! ## Running a Component
//!
//! To call into a component, its box is taken out of the slot (leaving
//! `None`) and handed a [`ComponentCx`] borrowing the rest of the entity.
//! When the call returns the box goes back into the slot found by key. Two
//! consequences:
//!
//! - A component is never re-entered. Dispatch to a running component is
//!   skipped and `get_component` for it returns `None`.
//! - If the running component was removed in the meantime, its slot is gone
//!   already; it gets its `on_destroy` as soon as the call returns.

use std::any::{TypeId, type_name};
use std::fmt;

use super::commands::{Command, Commands};
use super::component::{
    Component, ComponentCx, ComponentKey, ComponentLink, downcast_mut, downcast_ref,
};
use super::dispatch::{Call, DispatchError, Outcome, Value};
use super::id::{EntityId, SceneId};
use super::short_type_name;
use crate::config::HookPolicy;

struct ComponentSlot {
    type_id: TypeId,
    type_name: &'static str,
    key: ComponentKey,
    /// `None` while the component is running.
    value: Option<Box<dyn Component>>,
    /// Set while `on_destroy` runs; the slot is about to go away.
    destroying: bool,
}

/// A named container of components, owned by a [`Scene`](super::scene::Scene).
pub struct Entity {
    id: EntityId,
    scene: SceneId,
    name: String,
    hooks: HookPolicy,
    components: Vec<ComponentSlot>,
    next_key: u32,
    commands: Commands,
}

impl Entity {
    pub(crate) fn new(id: EntityId, scene: SceneId, name: String, hooks: HookPolicy) -> Self {
        Self {
            id,
            scene,
            name,
            hooks,
            components: Vec::new(),
            next_key: 0,
            commands: Commands::new(),
        }
    }

    /// Handle of this entity within its scene.
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// The scene that created this entity.
    pub fn scene(&self) -> SceneId {
        self.scene
    }

    /// Name given at creation. Not unique.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of attached components, including any that are running.
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Short type names of the attached components, in attach order.
    pub fn component_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.components
            .iter()
            .map(|slot| short_type_name(slot.type_name))
    }

    /// Whether a `T` is attached, running or not.
    pub fn has_component<T: Component>(&self) -> bool {
        self.position_of::<T>().is_some()
    }

    /// The back-reference assigned to the `T` component when it was attached.
    pub fn component_link<T: Component>(&self) -> Option<ComponentLink> {
        let pos = self.position_of::<T>()?;
        Some(self.link(self.components[pos].key))
    }

    /// Scene operations queued by components and not applied yet.
    pub fn pending_commands(&self) -> usize {
        self.commands.len()
    }

    // ── Attach / Detach ──────────────────────────────────────────────

    /// Attach a default-constructed `T`.
    ///
    /// Returns `None` if a `T` is already attached; the existing one is left
    /// alone.
    pub fn add_component<T: Component + Default>(&mut self) -> Option<&mut T> {
        if self.has_component::<T>() {
            self.reject_duplicate::<T>();
            return None;
        }
        self.attach_component(T::default())
    }

    /// Attach `component`, then fire its `on_create` hook.
    ///
    /// Returns `None` if a component of the same type is already attached
    /// (`component` is dropped), or if the hook removed the component again.
    pub fn attach_component<T: Component>(&mut self, component: T) -> Option<&mut T> {
        if self.has_component::<T>() {
            self.reject_duplicate::<T>();
            return None;
        }

        let key = self.allocate_key();
        self.components.push(ComponentSlot {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            key,
            value: Some(Box::new(component)),
            destroying: false,
        });
        log::trace!(
            "{self}: attached `{}`",
            short_type_name(type_name::<T>())
        );

        if self.hooks.fires_on_create() {
            self.run(key, |component, cx| component.on_create(cx));
        }
        self.component_by_key_mut::<T>(key)
    }

    /// The attached `T`, matched by exact type.
    pub fn get_component<T: Component>(&self) -> Option<&T> {
        let pos = self.position_of::<T>()?;
        self.components[pos]
            .value
            .as_deref()
            .and_then(downcast_ref::<T>)
    }

    /// Mutable access to the attached `T`.
    pub fn get_component_mut<T: Component>(&mut self) -> Option<&mut T> {
        let pos = self.position_of::<T>()?;
        self.components[pos]
            .value
            .as_deref_mut()
            .and_then(downcast_mut::<T>)
    }

    /// Fire `on_destroy` on the attached `T`, then detach and drop it.
    ///
    /// Returns `false` if there is no `T`, or if it is already being
    /// destroyed.
    pub fn remove_component<T: Component>(&mut self) -> bool {
        match self.position_of::<T>() {
            Some(pos) => {
                let key = self.components[pos].key;
                self.remove_key(key)
            }
            None => false,
        }
    }

    fn remove_key(&mut self, key: ComponentKey) -> bool {
        let Some(pos) = self.position_of_key(key) else {
            return false;
        };
        let slot = &mut self.components[pos];
        if slot.destroying {
            return false;
        }
        let name = slot.type_name;

        if slot.value.is_none() {
            // Running: `run` finishes it off once the call returns.
            self.components.remove(pos);
            log::trace!(
                "{self}: detached running `{}`",
                short_type_name(name)
            );
            return true;
        }

        if self.hooks.fires_on_destroy() {
            slot.destroying = true;
            self.run(key, |component, cx| component.on_destroy(cx));
        }
        if let Some(pos) = self.position_of_key(key) {
            self.components.remove(pos);
        }
        log::trace!("{self}: detached `{}`", short_type_name(name));
        true
    }

    /// Remove every component, firing `on_destroy` in attach order.
    pub(crate) fn destroy_components(&mut self) {
        loop {
            let keys: Vec<ComponentKey> = self.components.iter().map(|slot| slot.key).collect();
            if keys.is_empty() {
                break;
            }
            let mut removed = false;
            for key in keys {
                removed |= self.remove_key(key);
            }
            if !removed {
                debug_assert!(false, "{self}: components left that cannot be removed");
                break;
            }
        }
    }

    // ── Dispatch ─────────────────────────────────────────────────────

    /// [`call_component_with`](Self::call_component_with) with no arguments.
    pub fn call_component<T: Component>(&mut self, method: &str) -> Result<usize, DispatchError> {
        self.call_component_with::<T>(method, &[])
    }

    /// Send `method` to the attached `T`.
    ///
    /// Returns `Ok(1)` if it handled the call, `Ok(0)` if there is no `T` or
    /// it doesn't know `method`.
    pub fn call_component_with<T: Component>(
        &mut self,
        method: &str,
        args: &[Value],
    ) -> Result<usize, DispatchError> {
        match self.position_of::<T>() {
            Some(pos) => {
                let key = self.components[pos].key;
                self.dispatch_to(key, &Call::new(method, args))
            }
            None => Ok(0),
        }
    }

    /// [`broadcast_with`](Self::broadcast_with) with no arguments.
    pub fn broadcast(&mut self, method: &str) -> Result<usize, DispatchError> {
        self.broadcast_with(method, &[])
    }

    /// Send `method` to every component, in attach order.
    ///
    /// The recipients are fixed when the broadcast starts: components attached
    /// by a handler don't receive it, components removed by a handler are
    /// skipped. Stops at the first error. Returns how many components handled
    /// the call.
    pub fn broadcast_with(&mut self, method: &str, args: &[Value]) -> Result<usize, DispatchError> {
        let call = Call::new(method, args);
        let keys: Vec<ComponentKey> = self.components.iter().map(|slot| slot.key).collect();
        let mut handled = 0;
        for key in keys {
            handled += self.dispatch_to(key, &call)?;
        }
        Ok(handled)
    }

    fn dispatch_to(&mut self, key: ComponentKey, call: &Call<'_>) -> Result<usize, DispatchError> {
        match self.run(key, |component, cx| component.handle(call, cx)) {
            Some(Ok(Outcome::Handled)) => Ok(1),
            Some(Ok(Outcome::Unhandled)) | None => Ok(0),
            Some(Err(err)) => {
                log::debug!("{self}: `{}` failed: {err}", call.method());
                Err(err)
            }
        }
    }

    /// Take the component with `key` out of its slot, run `f` on it, and put
    /// it back. `None` if there is no such component or it is already running.
    fn run<R>(
        &mut self,
        key: ComponentKey,
        f: impl FnOnce(&mut dyn Component, &mut ComponentCx<'_>) -> R,
    ) -> Option<R> {
        let pos = self.position_of_key(key)?;
        let name = self.components[pos].type_name;
        let Some(mut component) = self.components[pos].value.take() else {
            log::trace!(
                "{self}: `{}` is already running, skipping",
                short_type_name(name)
            );
            return None;
        };

        let link = self.link(key);
        let result = f(&mut *component, &mut ComponentCx::new(self, link));

        match self.position_of_key(key) {
            Some(pos) => self.components[pos].value = Some(component),
            None => {
                if self.hooks.fires_on_destroy() {
                    component.on_destroy(&mut ComponentCx::new(self, link));
                }
                log::trace!(
                    "{self}: dropped `{}` after it was removed while running",
                    short_type_name(name)
                );
            }
        }
        Some(result)
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub(crate) fn commands_mut(&mut self) -> &mut Commands {
        &mut self.commands
    }

    pub(crate) fn take_commands(&mut self) -> Vec<Command> {
        self.commands.take()
    }

    // ── Lookup helpers ───────────────────────────────────────────────

    /// Next key not held by an attached component. Keys wrap around after
    /// `u32::MAX`; live ones are skipped.
    fn allocate_key(&mut self) -> ComponentKey {
        loop {
            let key = ComponentKey(self.next_key);
            self.next_key = self.next_key.wrapping_add(1);
            if self.position_of_key(key).is_none() {
                return key;
            }
        }
    }

    fn position_of<T: Component>(&self) -> Option<usize> {
        let type_id = TypeId::of::<T>();
        self.components
            .iter()
            .position(|slot| slot.type_id == type_id)
    }

    fn position_of_key(&self, key: ComponentKey) -> Option<usize> {
        self.components.iter().position(|slot| slot.key == key)
    }

    fn component_by_key_mut<T: Component>(&mut self, key: ComponentKey) -> Option<&mut T> {
        let pos = self.position_of_key(key)?;
        self.components[pos]
            .value
            .as_deref_mut()
            .and_then(downcast_mut::<T>)
    }

    fn link(&self, key: ComponentKey) -> ComponentLink {
        ComponentLink {
            scene: self.scene,
            entity: self.id,
            key,
        }
    }

    fn reject_duplicate<T: Component>(&self) {
        log::debug!(
            "{self}: `{}` is already attached, ignoring add",
            short_type_name(type_name::<T>())
        );
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" ({})", self.name, self.id)
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("scene", &self.scene)
            .field("name", &self.name)
            .field("components", &self.component_names().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::ecs::dispatch::HandlerResult;
    use crate::ecs::id::EntityAllocator;

    type Journal = Rc<RefCell<Vec<String>>>;

    fn entity_with(hooks: HookPolicy) -> Entity {
        let mut alloc = EntityAllocator::new();
        Entity::new(alloc.allocate(), SceneId::next(), "Test".into(), hooks)
    }

    fn entity() -> Entity {
        entity_with(HookPolicy {
            on_create: true,
            on_destroy: true,
        })
    }

    /// Records every hook and call it sees under `label`.
    struct Probe<const N: usize> {
        journal: Journal,
    }

    impl<const N: usize> Probe<N> {
        fn new(journal: &Journal) -> Self {
            Self {
                journal: journal.clone(),
            }
        }

        fn note(&self, event: &str) {
            self.journal.borrow_mut().push(format!("{N}:{event}"));
        }
    }

    impl<const N: usize> Component for Probe<N> {
        fn on_create(&mut self, _cx: &mut ComponentCx<'_>) {
            self.note("create");
        }

        fn on_destroy(&mut self, cx: &mut ComponentCx<'_>) {
            // Still attached while the hook runs.
            let attached = cx.entity().has_component::<Self>();
            self.note(if attached { "destroy(attached)" } else { "destroy" });
        }

        fn handle(&mut self, call: &Call<'_>, cx: &mut ComponentCx<'_>) -> HandlerResult {
            match call.method() {
                "Ping" => {
                    self.note("ping");
                    Ok(Outcome::Handled)
                }
                "RemoveSelf" => {
                    cx.remove_component::<Self>();
                    self.note("removed-self");
                    Ok(Outcome::Handled)
                }
                _ => Ok(Outcome::Unhandled),
            }
        }
    }

    #[derive(Default, Debug, PartialEq)]
    struct Counter(i64);

    impl Component for Counter {
        fn handle(&mut self, call: &Call<'_>, _cx: &mut ComponentCx<'_>) -> HandlerResult {
            match call.method() {
                "Add" => {
                    call.expect_arity(1)?;
                    self.0 += call.arg::<i64>(0)?;
                    Ok(Outcome::Handled)
                }
                _ => Ok(Outcome::Unhandled),
            }
        }
    }

    fn journal() -> Journal {
        Rc::new(RefCell::new(Vec::new()))
    }

    fn events(journal: &Journal) -> Vec<String> {
        journal.borrow().clone()
    }

    #[test]
    fn add_then_get_returns_same_instance() {
        let mut e = entity();
        e.add_component::<Counter>().unwrap().0 = 5;
        assert_eq!(e.get_component::<Counter>(), Some(&Counter(5)));
        assert_eq!(e.component_count(), 1);
    }

    #[test]
    fn duplicate_add_is_rejected_and_keeps_original() {
        let mut e = entity();
        e.attach_component(Counter(1));
        assert!(e.add_component::<Counter>().is_none());
        assert!(e.attach_component(Counter(2)).is_none());
        assert_eq!(e.get_component::<Counter>(), Some(&Counter(1)));
        assert_eq!(e.component_count(), 1);
    }

    #[test]
    fn remove_then_get_is_none() {
        let mut e = entity();
        e.add_component::<Counter>();
        assert!(e.remove_component::<Counter>());
        assert!(e.get_component::<Counter>().is_none());
        assert!(!e.remove_component::<Counter>());
    }

    #[test]
    #[cfg_attr(not(all(feature = "on-create-hook", feature = "on-destroy-hook")), ignore)]
    fn hooks_fire_around_attachment() {
        let log = journal();
        let mut e = entity();
        e.attach_component(Probe::<0>::new(&log));
        e.remove_component::<Probe<0>>();
        assert_eq!(events(&log), ["0:create", "0:destroy(attached)"]);
    }

    #[test]
    fn disabled_hooks_stay_silent() {
        let log = journal();
        let mut e = entity_with(HookPolicy {
            on_create: false,
            on_destroy: false,
        });
        e.attach_component(Probe::<0>::new(&log));
        e.remove_component::<Probe<0>>();
        assert!(events(&log).is_empty());
    }

    #[test]
    fn broadcast_reaches_each_component_once_in_order() {
        let log = journal();
        let mut e = entity();
        e.attach_component(Probe::<2>::new(&log));
        e.attach_component(Probe::<1>::new(&log));
        e.add_component::<Counter>();
        log.borrow_mut().clear();

        assert_eq!(e.broadcast("Ping"), Ok(2));
        assert_eq!(events(&log), ["2:ping", "1:ping"]);
    }

    #[test]
    fn unknown_method_is_a_no_op() {
        let mut e = entity();
        e.attach_component(Counter(3));
        for _ in 0..3 {
            assert_eq!(e.broadcast("Nothing"), Ok(0));
            assert_eq!(e.call_component::<Counter>("Nothing"), Ok(0));
        }
        assert_eq!(e.get_component::<Counter>(), Some(&Counter(3)));
    }

    #[test]
    fn typed_call_with_arguments() {
        let mut e = entity();
        e.add_component::<Counter>();
        assert_eq!(e.call_component_with::<Counter>("Add", &[Value::from(4)]), Ok(1));
        assert_eq!(e.get_component::<Counter>(), Some(&Counter(4)));
    }

    #[test]
    fn typed_call_to_missing_component_is_ignored() {
        let mut e = entity();
        assert_eq!(e.call_component_with::<Counter>("Add", &[Value::from(4)]), Ok(0));
    }

    #[test]
    fn argument_mismatch_propagates() {
        let mut e = entity();
        e.add_component::<Counter>();
        let err = e
            .call_component_with::<Counter>("Add", &[Value::from("four")])
            .unwrap_err();
        assert!(matches!(err, DispatchError::ArgumentType { index: 0, .. }));
        assert!(matches!(
            e.broadcast("Add"),
            Err(DispatchError::Arity { expected: 1, found: 0, .. })
        ));
        // The component survived the failed calls.
        assert_eq!(e.get_component::<Counter>(), Some(&Counter(0)));
    }

    #[test]
    #[cfg_attr(not(all(feature = "on-create-hook", feature = "on-destroy-hook")), ignore)]
    fn removing_self_while_running_destroys_after_return() {
        let log = journal();
        let mut e = entity();
        e.attach_component(Probe::<0>::new(&log));
        log.borrow_mut().clear();

        assert_eq!(e.call_component::<Probe<0>>("RemoveSelf"), Ok(1));
        assert_eq!(events(&log), ["0:removed-self", "0:destroy"]);
        assert!(!e.has_component::<Probe<0>>());
    }

    #[derive(Default)]
    struct Remover;

    impl Component for Remover {
        fn handle(&mut self, call: &Call<'_>, cx: &mut ComponentCx<'_>) -> HandlerResult {
            if call.method() == "Ping" {
                cx.remove_component::<Probe<1>>();
                cx.add_component::<Counter>();
            }
            Ok(Outcome::Unhandled)
        }
    }

    #[test]
    #[cfg_attr(not(all(feature = "on-create-hook", feature = "on-destroy-hook")), ignore)]
    fn broadcast_recipients_are_fixed_at_start() {
        let log = journal();
        let mut e = entity();
        e.attach_component(Probe::<0>::new(&log));
        e.add_component::<Remover>();
        e.attach_component(Probe::<1>::new(&log));
        log.borrow_mut().clear();

        assert_eq!(e.broadcast("Ping"), Ok(1));
        assert_eq!(events(&log), ["0:ping", "1:destroy(attached)"]);
        assert!(e.has_component::<Counter>());
    }

    struct Spawner;

    impl Component for Spawner {
        fn on_create(&mut self, cx: &mut ComponentCx<'_>) {
            cx.add_component::<Counter>().unwrap().0 = 100;
            // Not visible to itself while running.
            assert!(cx.get_component::<Spawner>().is_none());
        }
    }

    #[test]
    #[cfg_attr(not(all(feature = "on-create-hook", feature = "on-destroy-hook")), ignore)]
    fn on_create_can_attach_siblings() {
        let mut e = entity();
        assert!(e.attach_component(Spawner).is_some());
        assert_eq!(e.component_names().collect::<Vec<_>>(), ["Spawner", "Counter"]);
        assert_eq!(e.get_component::<Counter>(), Some(&Counter(100)));
    }

    #[test]
    fn links_point_back_to_owner() {
        let mut e = entity();
        e.add_component::<Counter>();
        e.add_component::<Remover>();
        let link = e.component_link::<Remover>().unwrap();
        assert_eq!(link.entity, e.id());
        assert_eq!(link.scene, e.scene());

        e.remove_component::<Counter>();
        assert_eq!(e.component_link::<Remover>(), Some(link));
    }

    #[test]
    fn component_keys_wrap_without_collisions() {
        let log = journal();
        let mut e = entity();
        e.add_component::<Counter>();
        e.next_key = u32::MAX;
        e.add_component::<Remover>();
        e.attach_component(Probe::<0>::new(&log));

        let keys = [
            e.component_link::<Counter>().unwrap().key,
            e.component_link::<Remover>().unwrap().key,
            e.component_link::<Probe<0>>().unwrap().key,
        ];
        assert_eq!(keys, [ComponentKey(0), ComponentKey(u32::MAX), ComponentKey(1)]);
        assert!(e.remove_component::<Remover>());
        assert!(e.has_component::<Counter>() && e.has_component::<Probe<0>>());
    }

    #[test]
    #[cfg_attr(not(all(feature = "on-create-hook", feature = "on-destroy-hook")), ignore)]
    fn destroy_components_fires_in_attach_order() {
        let log = journal();
        let mut e = entity();
        e.attach_component(Probe::<0>::new(&log));
        e.attach_component(Probe::<1>::new(&log));
        log.borrow_mut().clear();

        e.destroy_components();
        assert_eq!(e.component_count(), 0);
        assert_eq!(events(&log), ["0:destroy(attached)", "1:destroy(attached)"]);
    }
}
