//! Scene diagnostics.
//!
//! Enabled by the `diagnostics` feature flag. A [`Scene`](crate::ecs::Scene)
//! keeps a few activity counters and [`Scene::stats`](crate::ecs::Scene::stats)
//! folds them together with a walk over the live entities into a
//! [`SceneStats`] snapshot.

use std::collections::HashMap;
use std::fmt;

use crate::ecs::Entity;

/// Activity counters, reset by [`Scene::reset_stats`](crate::ecs::Scene::reset_stats).
#[derive(Debug, Default, Clone)]
pub(crate) struct Counters {
    pub entities_created: u64,
    pub entities_removed: u64,
    pub dispatches: u64,
    pub handled: u64,
    pub commands_applied: u64,
}

/// A point-in-time summary of one scene.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SceneStats {
    /// Entities currently in the scene.
    pub entity_count: usize,
    /// Components attached across all entities.
    pub component_count: usize,
    pub entities_created: u64,
    pub entities_removed: u64,
    /// Scene-wide dispatches (typed calls and broadcasts).
    pub dispatches: u64,
    /// Components that handled a scene-wide dispatch.
    pub handled: u64,
    pub commands_applied: u64,
    /// `(short type name, attached count)`, most common first.
    pub components_by_type: Vec<(&'static str, usize)>,
}

impl SceneStats {
    pub(crate) fn collect<'a>(
        entities: impl Iterator<Item = &'a Entity>,
        counters: &Counters,
    ) -> Self {
        let mut entity_count = 0;
        let mut by_type: HashMap<&'static str, usize> = HashMap::new();
        for entity in entities {
            entity_count += 1;
            for name in entity.component_names() {
                *by_type.entry(name).or_default() += 1;
            }
        }

        let mut components_by_type: Vec<_> = by_type.into_iter().collect();
        // Most common first, then by name for stability.
        components_by_type.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));

        Self {
            entity_count,
            component_count: components_by_type.iter().map(|(_, n)| n).sum(),
            entities_created: counters.entities_created,
            entities_removed: counters.entities_removed,
            dispatches: counters.dispatches,
            handled: counters.handled,
            commands_applied: counters.commands_applied,
            components_by_type,
        }
    }
}

impl fmt::Display for SceneStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} entities, {} components (+{} / -{} entities, {} dispatches, {} handled, {} commands)",
            self.entity_count,
            self.component_count,
            self.entities_created,
            self.entities_removed,
            self.dispatches,
            self.handled,
            self.commands_applied,
        )
    }
}
