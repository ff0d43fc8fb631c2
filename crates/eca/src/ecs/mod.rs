//! # Entity-Component Registry
//!
//! Entities are named bags of components; a scene owns the entities.
//! Behaviour lives in components and is reached through named calls, either
//! aimed at one component type or broadcast to all.
//!
//! ## Module Overview
//!
//! - [`id`] — Scene and entity handles
//! - [`component`] — The `Component` trait and a component's view of its owner
//! - [`dispatch`] — Call arguments, outcomes and errors
//! - [`entity`] — Ordered, one-per-type component storage
//! - [`scene`] — Entity ownership, lookup, scene-wide dispatch
//! - [`commands`] — Scene operations queued from inside components

pub mod commands;
pub mod component;
pub mod dispatch;
pub mod entity;
pub mod id;
pub mod scene;

pub use commands::Commands;
pub use component::{Component, ComponentCx, ComponentKey, ComponentLink};
pub use dispatch::{Call, DispatchError, FromValue, HandlerResult, Outcome, Value, ValueKind};
pub use entity::Entity;
pub use id::{EntityId, SceneId};
pub use scene::Scene;

/// Strip the module path from a type name (`game::units::Health` → `Health`).
/// Generic arguments are kept: `game::Probe<game::A>` → `Probe<game::A>`.
pub(crate) fn short_type_name(full: &'static str) -> &'static str {
    let base_end = full.find('<').unwrap_or(full.len());
    match full[..base_end].rfind("::") {
        Some(pos) => &full[pos + 2..],
        None => full,
    }
}
