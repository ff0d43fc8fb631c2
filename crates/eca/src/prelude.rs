//! `use eca::prelude::*` brings in everything needed to write components and
//! drive a scene.

pub use crate::config::{HookPolicy, RemovalPolicy, SceneConfig};
pub use crate::ecs::{
    Call, Commands, Component, ComponentCx, ComponentLink, DispatchError, Entity, EntityId,
    HandlerResult, Outcome, Scene, SceneId, Value,
};
pub use crate::math::{Vec2, Vec3};

#[cfg(feature = "diagnostics")]
pub use crate::diag::SceneStats;
