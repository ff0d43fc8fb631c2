//! # eca — Minimal Entity-Component Registry
//!
//! A [`Scene`](ecs::Scene) owns named [`Entity`](ecs::Entity) values; each
//! entity holds at most one [`Component`](ecs::Component) per type. Behaviour
//! is reached through named calls, either aimed at one component type or
//! broadcast to every component:
//!
//! ```
//! use eca::prelude::*;
//!
//! struct Health(i64);
//!
//! impl Component for Health {
//!     fn handle(&mut self, call: &Call<'_>, _cx: &mut ComponentCx<'_>) -> HandlerResult {
//!         match call.method() {
//!             "TakeDamage" => {
//!                 self.0 -= call.arg::<i64>(0)?;
//!                 Ok(Outcome::Handled)
//!             }
//!             _ => Ok(Outcome::Unhandled),
//!         }
//!     }
//! }
//!
//! let mut scene = Scene::new();
//! let player = scene.create_entity("Player");
//! scene.entity_mut(player).unwrap().attach_component(Health(100));
//! scene.call_component_with::<Health>("TakeDamage", &[Value::from(30)]).unwrap();
//! assert_eq!(scene.entity(player).unwrap().get_component::<Health>().unwrap().0, 70);
//! ```
//!
//! Start with `use eca::prelude::*`.

pub mod config;
pub mod ecs;
pub mod math;
pub mod prelude;

#[cfg(feature = "diagnostics")]
pub mod diag;
