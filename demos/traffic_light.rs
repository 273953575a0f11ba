//! Traffic Light State Machine
//!
//! This example demonstrates a cyclic schema with per-state request
//! handlers, a guarded transition, and enter hooks.
//!
//! Key concepts:
//! - Cyclic state transitions (states repeat)
//! - Per-state handling of the same request
//! - Guards cancelling a transition until the context allows it
//! - Enter hooks observing every committed transition
//!
//! Run with: cargo run --example traffic_light

use std::sync::Arc;

use persona::builder::{guarded_transition, simple_transition};
use persona::{state_id, Machine, SchemaBuilder, StateBuilder};

state_id! {
    enum Light {
        Proceed,
        Caution,
        Stop,
    }
}

#[derive(Debug, Default)]
struct Intersection {
    elapsed: u64,
    changes: u64,
}

fn main() {
    println!("=== Traffic Light State Machine ===\n");

    // Proceed waits out a minimum green time before it yields
    let schema = SchemaBuilder::<Light, Intersection>::new()
        .state(
            StateBuilder::new(Light::Proceed)
                .default()
                .handles("color", |_machine, _args| Ok("green".into()))
                .transition(guarded_transition(Light::Caution, "cycle", |i: &Intersection| {
                    i.elapsed >= 20
                })),
        )
        .unwrap()
        .state(
            StateBuilder::new(Light::Caution)
                .handles("color", |_machine, _args| Ok("yellow".into()))
                .on_enter(|i: &mut Intersection| i.changes += 1)
                .transition(simple_transition(Light::Stop, "cycle")),
        )
        .unwrap()
        .state(
            StateBuilder::new(Light::Stop)
                .handles("color", |_machine, _args| Ok("red".into()))
                .on_enter(|i: &mut Intersection| i.changes += 1)
                .transition(simple_transition(Light::Proceed, "cycle")),
        )
        .unwrap()
        .build()
        .unwrap();

    let mut light = Machine::new(Arc::new(schema), Intersection::default());
    println!("Initial state: {:?}", light.current_state());
    println!("Color: {}\n", color_of(&mut light));

    println!("Cycling at 10 seconds (guard holds the green):");
    light.context_mut().elapsed = 10;
    let moved = light.dispatch("cycle", &[]).unwrap();
    println!("  moved: {}, state: {:?}\n", moved, light.current_state());

    println!("Cycling at 25 seconds:");
    light.context_mut().elapsed = 25;
    let moved = light.dispatch("cycle", &[]).unwrap();
    println!("  moved: {}, state: {:?}", moved, light.current_state());
    println!("  Color: {}\n", color_of(&mut light));

    println!("Completing the cycle:");
    light.dispatch("cycle", &[]).unwrap();
    println!("  Color: {}", color_of(&mut light));
    light.dispatch("cycle", &[]).unwrap();
    println!("  Color: {}\n", color_of(&mut light));

    println!(
        "Committed changes observed by enter hooks: {}",
        light.context().changes
    );
    println!("Final state: {:?}", light.current_state());

    println!("\n=== Example Complete ===");
}

fn color_of(light: &mut Machine<Light, Intersection>) -> String {
    light
        .dispatch("color", &[])
        .unwrap()
        .as_str()
        .unwrap_or_default()
        .to_string()
}
