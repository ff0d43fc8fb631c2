//! Lifecycle — prints every hook as components come and go.
//!
//! Shows `on_create` / `on_destroy` ordering, duplicate rejection, and the
//! difference between the `Detach` and `Cascade` removal policies.
//!
//! Run with: `cargo run -p eca --example lifecycle`
//! Compare:  `cargo run -p eca --example lifecycle --no-default-features`

use eca::prelude::*;

struct Loud(&'static str);

impl Component for Loud {
    fn on_create(&mut self, cx: &mut ComponentCx<'_>) {
        println!("  {} attached to {}", self.0, cx.entity_name());
    }

    fn on_destroy(&mut self, cx: &mut ComponentCx<'_>) {
        println!("  {} detached from {}", self.0, cx.entity_name());
    }
}

#[derive(Default)]
struct Companion;

impl Component for Companion {
    fn on_create(&mut self, cx: &mut ComponentCx<'_>) {
        // Components can manage their siblings through the context.
        if !cx.has_component::<Loud>() {
            cx.attach_component(Loud("companion's friend"));
        }
    }
}

fn run(policy: RemovalPolicy) {
    println!("{policy:?}:");
    let mut scene = Scene::with_config(SceneConfig::new().removal(policy));
    let id = scene.create_default_entity();

    if let Some(entity) = scene.entity_mut(id) {
        entity.attach_component(Loud("first"));
        if entity.attach_component(Loud("second")).is_none() {
            println!("  second Loud rejected, {} kept", entity.component_count());
        }
        entity.remove_component::<Loud>();
        entity.add_component::<Companion>();
        println!("  components: {:?}", entity.component_names().collect::<Vec<_>>());
    }

    if let Some(removed) = scene.remove_entity(id) {
        println!("  removed, {} component(s) left on it", removed.component_count());
    }
}

fn main() {
    env_logger::init();
    run(RemovalPolicy::Detach);
    run(RemovalPolicy::Cascade);
}
