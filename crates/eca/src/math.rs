//! Math types.
//!
//! [glam](https://docs.rs/glam) vectors are re-exported so call arguments like
//! [`Value::Vec2`](crate::ecs::Value::Vec2) don't need a direct dependency.

pub use glam::{Vec2, Vec3};
