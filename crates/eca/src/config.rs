//! Scene configuration.
//!
//! [`SceneConfig`] is passed to [`Scene::with_config`](crate::ecs::Scene::with_config).
//! The lifecycle hook switches also have cargo features (`on-create-hook`,
//! `on-destroy-hook`); a hook fires only when both allow it.
//!
//! ```ignore
//! let scene = Scene::with_config(
//!     SceneConfig::new()
//!         .removal(RemovalPolicy::Cascade)
//!         .on_create(false),
//! );
//! ```

/// Which lifecycle hooks fire automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HookPolicy {
    pub on_create: bool,
    pub on_destroy: bool,
}

impl HookPolicy {
    /// Whether `on_create` fires after attaching a component.
    pub fn fires_on_create(self) -> bool {
        cfg!(feature = "on-create-hook") && self.on_create
    }

    /// Whether `on_destroy` fires before detaching a component.
    pub fn fires_on_destroy(self) -> bool {
        cfg!(feature = "on-destroy-hook") && self.on_destroy
    }
}

impl Default for HookPolicy {
    fn default() -> Self {
        Self {
            on_create: cfg!(feature = "on-create-hook"),
            on_destroy: cfg!(feature = "on-destroy-hook"),
        }
    }
}

/// What happens to an entity's components when the entity leaves its scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RemovalPolicy {
    /// Components are handed back with the entity, untouched. Callers that
    /// need `on_destroy` must remove components before removing the entity.
    #[default]
    Detach,
    /// Every remaining component is removed, in insertion order, with its
    /// `on_destroy` hook, before the entity is handed back.
    Cascade,
}

/// Settings for a [`Scene`](crate::ecs::Scene).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneConfig {
    pub hooks: HookPolicy,
    pub removal: RemovalPolicy,
    /// Name given by [`Scene::create_default_entity`](crate::ecs::Scene::create_default_entity).
    pub default_entity_name: String,
}

/// Name used when an entity is created without one.
pub const DEFAULT_ENTITY_NAME: &str = "New Entity";

impl SceneConfig {
    /// Default settings: hooks per cargo features, `Detach` removal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace both hook switches at once.
    pub fn hooks(mut self, hooks: HookPolicy) -> Self {
        self.hooks = hooks;
        self
    }

    /// Switch automatic `on_create` on or off for this scene.
    pub fn on_create(mut self, enabled: bool) -> Self {
        self.hooks.on_create = enabled;
        self
    }

    /// Switch automatic `on_destroy` on or off for this scene.
    pub fn on_destroy(mut self, enabled: bool) -> Self {
        self.hooks.on_destroy = enabled;
        self
    }

    /// What `remove_entity` does with the entity's components.
    pub fn removal(mut self, policy: RemovalPolicy) -> Self {
        self.removal = policy;
        self
    }

    /// Name given to entities created without one.
    pub fn default_entity_name(mut self, name: impl Into<String>) -> Self {
        self.default_entity_name = name.into();
        self
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            hooks: HookPolicy::default(),
            removal: RemovalPolicy::default(),
            default_entity_name: DEFAULT_ENTITY_NAME.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_features() {
        let config = SceneConfig::default();
        assert_eq!(config.hooks.on_create, cfg!(feature = "on-create-hook"));
        assert_eq!(config.hooks.on_destroy, cfg!(feature = "on-destroy-hook"));
        assert_eq!(config.removal, RemovalPolicy::Detach);
        assert_eq!(config.default_entity_name, "New Entity");
    }

    #[test]
    fn runtime_switch_can_only_suppress() {
        let hooks = SceneConfig::new().on_create(false).hooks;
        assert!(!hooks.fires_on_create());

        let hooks = HookPolicy {
            on_create: true,
            on_destroy: true,
        };
        assert_eq!(hooks.fires_on_create(), cfg!(feature = "on-create-hook"));
        assert_eq!(hooks.fires_on_destroy(), cfg!(feature = "on-destroy-hook"));
    }

    #[test]
    fn builder_sets_fields() {
        let config = SceneConfig::new()
            .removal(RemovalPolicy::Cascade)
            .on_destroy(false)
            .default_entity_name("Unnamed");
        assert_eq!(config.removal, RemovalPolicy::Cascade);
        assert!(!config.hooks.on_destroy);
        assert_eq!(config.default_entity_name, "Unnamed");
    }
}
