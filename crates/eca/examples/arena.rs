//! Arena — a tiny fixed-step game loop on top of a scene.
//!
//! A ship drifts and fires bullets each tick; a few drones take damage from a
//! scene-wide `Hit` call and remove themselves when destroyed.
//!
//! Run with: `RUST_LOG=debug cargo run -p eca --example arena`

use eca::prelude::*;

// ── Components ───────────────────────────────────────────────────────────

#[derive(Default)]
struct Body {
    position: Vec2,
    velocity: Vec2,
}

impl Component for Body {
    fn handle(&mut self, call: &Call<'_>, _cx: &mut ComponentCx<'_>) -> HandlerResult {
        match call.method() {
            "Update" => {
                self.position += self.velocity * call.arg::<f32>(0)?;
                Ok(Outcome::Handled)
            }
            _ => Ok(Outcome::Unhandled),
        }
    }
}

#[derive(Default)]
struct Health(i64);

impl Component for Health {
    fn on_create(&mut self, _cx: &mut ComponentCx<'_>) {
        self.0 = 100;
    }

    fn on_destroy(&mut self, cx: &mut ComponentCx<'_>) {
        log::info!("{} destroyed with {} hp", cx.entity_name(), self.0);
    }

    fn handle(&mut self, call: &Call<'_>, cx: &mut ComponentCx<'_>) -> HandlerResult {
        match call.method() {
            "Hit" => {
                call.expect_arity(1)?;
                self.0 -= call.arg::<i64>(0)?;
                if self.0 <= 0 {
                    let id = cx.entity_id();
                    cx.commands().remove_entity(id);
                }
                Ok(Outcome::Handled)
            }
            _ => Ok(Outcome::Unhandled),
        }
    }
}

#[derive(Default)]
struct Cannon {
    cooldown: u32,
}

impl Component for Cannon {
    fn handle(&mut self, call: &Call<'_>, cx: &mut ComponentCx<'_>) -> HandlerResult {
        if call.method() != "Update" {
            return Ok(Outcome::Unhandled);
        }
        if self.cooldown > 0 {
            self.cooldown -= 1;
            return Ok(Outcome::Handled);
        }
        self.cooldown = 2;
        let origin = cx
            .get_component::<Body>()
            .map(|body| body.position)
            .unwrap_or(Vec2::ZERO);
        cx.commands().create_entity_with("Bullet", move |bullet| {
            bullet.attach_component(Body {
                position: origin,
                velocity: Vec2::new(0.0, 20.0),
            });
        });
        Ok(Outcome::Handled)
    }
}

fn main() {
    env_logger::init();

    let mut scene = Scene::with_config(SceneConfig::new().removal(RemovalPolicy::Cascade));

    let ship = scene.create_entity("Ship");
    if let Some(entity) = scene.entity_mut(ship) {
        entity.attach_component(Body {
            position: Vec2::ZERO,
            velocity: Vec2::new(1.0, 0.0),
        });
        entity.add_component::<Cannon>();
    }

    for i in 0..3 {
        let drone = scene.create_entity("Drone");
        if let Some(entity) = scene.entity_mut(drone) {
            entity.attach_component(Body {
                position: Vec2::new(i as f32 * 4.0, 30.0),
                velocity: Vec2::ZERO,
            });
            entity.add_component::<Health>();
        }
    }

    let dt = [Value::from(0.25f32)];
    for tick in 0..6 {
        if let Err(err) = scene.broadcast_with("Update", &dt) {
            log::error!("tick {tick}: {err}");
            return;
        }
        if tick % 2 == 1 {
            if let Err(err) = scene.call_component_with::<Health>("Hit", &[Value::from(45)]) {
                log::error!("tick {tick}: {err}");
                return;
            }
        }
        println!(
            "tick {tick}: {} bullets, {} drones",
            scene.find_entities_with_name("Bullet").len(),
            scene.find_entities_with_name("Drone").len(),
        );
    }

    if let Some(body) = scene.entity(ship).and_then(|e| e.get_component::<Body>()) {
        println!("ship ended at {}", body.position);
    }
    #[cfg(feature = "diagnostics")]
    println!("{}", scene.stats());
}
