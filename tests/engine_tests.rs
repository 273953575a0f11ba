//! Integration tests for the state engine: dispatch, transitions,
//! filters, and hooks working together over one schema.

use std::sync::Arc;

use serde_json::{json, Value};

use persona::builder::{guarded_transition, simple_transition};
use persona::{
    state_id, FilterVerdict, Machine, Matcher, Schema, SchemaBuilder, StateBuilder, StateError,
    StateId,
};

state_id! {
    enum Light {
        Proceed,
        Caution,
        Stop,
        Flashing,
    }
}

#[derive(Debug, Default)]
struct TrafficLight {
    elapsed: u64,
    log: Vec<String>,
}

/// proceed -> caution -> stop -> proceed on "cycle", with a per-state
/// "color" request and a "honk" request only the stop state services.
fn traffic_schema() -> Schema<Light, TrafficLight> {
    SchemaBuilder::<Light, TrafficLight>::new()
        .state(
            StateBuilder::new(Light::Proceed)
                .default()
                .handles("color", |_machine, _args| Ok(json!("green")))
                .transition(simple_transition(Light::Caution, "cycle")),
        )
        .unwrap()
        .state(
            StateBuilder::new(Light::Caution)
                .handles("color", |_machine, _args| Ok(json!("yellow")))
                .transition(simple_transition(Light::Stop, "cycle")),
        )
        .unwrap()
        .state(
            StateBuilder::new(Light::Stop)
                .handles("color", |_machine, _args| Ok(json!("red")))
                .handles("honk", |_machine, _args| Ok(json!("beep")))
                .transition(simple_transition(Light::Proceed, "cycle")),
        )
        .unwrap()
        .build()
        .unwrap()
}

fn traffic_machine() -> Machine<Light, TrafficLight> {
    Machine::new(Arc::new(traffic_schema()), TrafficLight::default())
}

#[test]
fn default_state_is_active_before_any_transition() {
    let machine = traffic_machine();
    assert_eq!(machine.current_state(), Some(&Light::Proceed));
}

#[test]
fn three_cycles_walk_the_ring_back_to_proceed() {
    let mut machine = traffic_machine();

    let results: Vec<Value> = (0..3)
        .map(|_| machine.dispatch("cycle", &[]).unwrap())
        .collect();

    assert_eq!(results, vec![json!(true), json!(true), json!(true)]);
    assert_eq!(machine.current_state(), Some(&Light::Proceed));
}

#[test]
fn color_reflects_the_active_state() {
    let mut machine = traffic_machine();

    assert_eq!(machine.dispatch("color", &[]).unwrap(), json!("green"));
    machine.dispatch("cycle", &[]).unwrap();
    assert_eq!(machine.dispatch("color", &[]).unwrap(), json!("yellow"));
    machine.dispatch("cycle", &[]).unwrap();
    assert_eq!(machine.dispatch("color", &[]).unwrap(), json!("red"));
}

#[test]
fn transition_to_current_state_is_a_no_op() {
    let mut machine = traffic_machine();
    machine
        .on_exit(&Light::Proceed, |light| light.log.push("exit".into()))
        .unwrap();

    assert!(machine.transition(None, &Light::Proceed, &[]).unwrap());
    assert_eq!(machine.current_state(), Some(&Light::Proceed));
    assert!(machine.context().log.is_empty());
}

#[test]
fn unknown_target_state_is_fatal() {
    let mut machine = traffic_machine();

    let result = machine.transition(None, &Light::Flashing, &[]);
    assert!(matches!(
        result,
        Err(StateError::UnknownTargetState { target }) if target == "Flashing"
    ));
    assert_eq!(machine.current_state(), Some(&Light::Proceed));
}

#[test]
fn whitelist_blocks_undeclared_targets() {
    let mut machine = traffic_machine();

    let result = machine.transition(None, &Light::Stop, &[]);
    assert!(matches!(
        result,
        Err(StateError::TransitionNotAllowed { from, to }) if from == "Proceed" && to == "Stop"
    ));
    assert_eq!(machine.current_state(), Some(&Light::Proceed));
}

#[test]
fn empty_whitelist_allows_any_known_target() {
    let schema = SchemaBuilder::<Light, TrafficLight>::new()
        .state(StateBuilder::new(Light::Flashing).default())
        .unwrap()
        .state(StateBuilder::new(Light::Stop))
        .unwrap()
        .build()
        .unwrap();
    let mut machine = Machine::new(Arc::new(schema), TrafficLight::default());

    assert!(machine.transition(None, &Light::Stop, &[]).unwrap());
    assert_eq!(machine.current_state(), Some(&Light::Stop));
}

#[test]
fn exit_runs_before_enter_exactly_once() {
    let schema = SchemaBuilder::<Light, TrafficLight>::new()
        .state(
            StateBuilder::new(Light::Proceed)
                .default()
                .on_exit(|light: &mut TrafficLight| light.log.push("exit Proceed".into()))
                .transition(simple_transition(Light::Caution, "cycle")),
        )
        .unwrap()
        .state(
            StateBuilder::new(Light::Caution)
                .on_enter(|light: &mut TrafficLight| light.log.push("enter Caution".into())),
        )
        .unwrap()
        .build()
        .unwrap();
    let mut machine = Machine::new(Arc::new(schema), TrafficLight::default());

    machine.dispatch("cycle", &[]).unwrap();
    assert_eq!(machine.context().log, vec!["exit Proceed", "enter Caution"]);
}

#[test]
fn guard_cancels_until_satisfied() {
    let schema = SchemaBuilder::<Light, TrafficLight>::new()
        .state(
            StateBuilder::new(Light::Proceed)
                .default()
                .on_exit(|light: &mut TrafficLight| light.log.push("exit Proceed".into()))
                .transition(guarded_transition(Light::Caution, "cycle", |light: &TrafficLight| {
                    light.elapsed >= 20
                })),
        )
        .unwrap()
        .state(StateBuilder::new(Light::Caution))
        .unwrap()
        .build()
        .unwrap();
    let mut machine = Machine::new(Arc::new(schema), TrafficLight::default());

    machine.context_mut().elapsed = 19;
    assert_eq!(machine.dispatch("cycle", &[]).unwrap(), json!(false));
    assert_eq!(machine.current_state(), Some(&Light::Proceed));
    assert!(machine.context().log.is_empty());

    machine.context_mut().elapsed = 20;
    assert_eq!(machine.dispatch("cycle", &[]).unwrap(), json!(true));
    assert_eq!(machine.current_state(), Some(&Light::Caution));
    assert_eq!(machine.context().log, vec!["exit Proceed"]);
}

#[test]
fn cancelling_filter_stops_later_filters_and_hooks() {
    let schema = SchemaBuilder::<Light, TrafficLight>::new()
        .state(
            StateBuilder::new(Light::Proceed)
                .default()
                .on_exit(|light: &mut TrafficLight| light.log.push("exit Proceed".into()))
                .transition(simple_transition(Light::Caution, "cycle")),
        )
        .unwrap()
        .state(StateBuilder::new(Light::Caution))
        .unwrap()
        .request_filter(
            Matcher::Any,
            Matcher::Equal("cycle"),
            Matcher::NotNil,
            |light: &mut TrafficLight| {
                light.log.push("first filter".into());
                FilterVerdict::Cancel
            },
        )
        .request_filter(
            Matcher::Any,
            Matcher::Any,
            Matcher::Any,
            |light: &mut TrafficLight| {
                light.log.push("second filter".into());
                FilterVerdict::Continue
            },
        )
        .build()
        .unwrap();
    let mut machine = Machine::new(Arc::new(schema), TrafficLight::default());

    assert_eq!(machine.dispatch("cycle", &[]).unwrap(), json!(false));
    assert_eq!(machine.current_state(), Some(&Light::Proceed));
    // the dispatch-stage pass ran the Any filter once; the transition pass
    // ran the cancelling filter and never reached the one behind it
    assert_eq!(machine.context().log, vec!["second filter", "first filter"]);
}

#[test]
fn absent_target_pattern_selects_only_plain_dispatches() {
    let schema = SchemaBuilder::<Light, TrafficLight>::new()
        .state(
            StateBuilder::new(Light::Proceed)
                .default()
                .handles("color", |_machine, _args| Ok(json!("green")))
                .transition(simple_transition(Light::Caution, "cycle")),
        )
        .unwrap()
        .state(StateBuilder::new(Light::Caution))
        .unwrap()
        .request_filter(
            Matcher::NotNil,
            Matcher::NotNil,
            Matcher::Absent,
            |light: &mut TrafficLight| {
                light.log.push("dispatch seen".into());
                FilterVerdict::Continue
            },
        )
        .build()
        .unwrap();
    let mut machine = Machine::new(Arc::new(schema), TrafficLight::default());

    machine.dispatch("color", &[]).unwrap();
    assert_eq!(machine.context().log.len(), 1);

    // the dispatch pass matches, the transition pass does not
    machine.dispatch("cycle", &[]).unwrap();
    assert_eq!(machine.context().log.len(), 2);
    assert_eq!(machine.current_state(), Some(&Light::Caution));
}

#[test]
fn wrong_state_is_distinct_from_unknown_request() {
    let mut machine = traffic_machine();

    let result = machine.dispatch("honk", &[]);
    assert!(matches!(
        result,
        Err(StateError::WrongState { request: "honk", state }) if state == "Proceed"
    ));

    let result = machine.dispatch("warble", &[]);
    assert!(matches!(
        result,
        Err(StateError::UnknownRequest { request: "warble" })
    ));
}

#[test]
fn requests_are_reported_schema_wide() {
    let machine = traffic_machine();

    assert_eq!(
        machine.all_handled_requests(),
        &["color", "cycle", "honk"]
    );
    assert!(machine.can_handle("color"));
    assert!(machine.can_handle("cycle"));
    assert!(!machine.can_handle("honk"));
}

#[test]
fn schema_without_default_needs_a_transition_first() {
    let schema = SchemaBuilder::<Light, TrafficLight>::new()
        .state(StateBuilder::new(Light::Proceed).handles("color", |_machine, _args| {
            Ok(json!("green"))
        }))
        .unwrap()
        .build()
        .unwrap();
    let mut machine = Machine::new(Arc::new(schema), TrafficLight::default());

    assert_eq!(machine.current_state(), None);
    assert!(matches!(
        machine.dispatch("color", &[]),
        Err(StateError::NoCurrentState)
    ));
}

#[test]
fn instance_callbacks_do_not_leak_to_siblings() {
    let schema = Arc::new(traffic_schema());
    let mut first = Machine::new(Arc::clone(&schema), TrafficLight::default());
    let mut second = Machine::new(Arc::clone(&schema), TrafficLight::default());

    first
        .on_enter(&Light::Caution, |light| {
            light.log.push("instance enter".into())
        })
        .unwrap();

    first.dispatch("cycle", &[]).unwrap();
    second.dispatch("cycle", &[]).unwrap();

    assert_eq!(first.context().log, vec!["instance enter"]);
    assert!(second.context().log.is_empty());

    // machines created after the registration are also unaffected
    let mut third = Machine::new(Arc::clone(&schema), TrafficLight::default());
    third.dispatch("cycle", &[]).unwrap();
    assert!(third.context().log.is_empty());
}

#[test]
fn type_level_callbacks_run_before_instance_level() {
    let schema = SchemaBuilder::<Light, TrafficLight>::new()
        .state(
            StateBuilder::new(Light::Proceed)
                .default()
                .transition(simple_transition(Light::Caution, "cycle")),
        )
        .unwrap()
        .state(
            StateBuilder::new(Light::Caution)
                .on_enter(|light: &mut TrafficLight| light.log.push("type level".into())),
        )
        .unwrap()
        .build()
        .unwrap();
    let mut machine = Machine::new(Arc::new(schema), TrafficLight::default());

    machine
        .on_enter(&Light::Caution, |light| {
            light.log.push("instance level".into())
        })
        .unwrap();

    machine.dispatch("cycle", &[]).unwrap();
    assert_eq!(machine.context().log, vec!["type level", "instance level"]);
}

#[test]
fn reused_handle_registers_one_run() {
    let schema = SchemaBuilder::<Light, TrafficLight>::new()
        .state(
            StateBuilder::new(Light::Proceed)
                .default()
                .transition(simple_transition(Light::Caution, "cycle")),
        )
        .unwrap()
        .state(
            StateBuilder::new(Light::Caution)
                .on_enter(|light: &mut TrafficLight| light.log.push("anonymous".into()))
                .on_enter_named("flash", |light| light.log.push("flash".into()))
                .on_enter_named("flash", |light| light.log.push("flash again".into()))
                .on_enter(|light| light.log.push("last".into())),
        )
        .unwrap()
        .build()
        .unwrap();
    let mut machine = Machine::new(Arc::new(schema), TrafficLight::default());

    machine.dispatch("cycle", &[]).unwrap();
    assert_eq!(machine.context().log, vec!["anonymous", "flash", "last"]);
}

#[test]
fn handlers_can_transition_and_keep_working() {
    // a handler that transitions and then reports the state it landed in
    let schema = SchemaBuilder::<Light, TrafficLight>::new()
        .state(
            StateBuilder::new(Light::Proceed)
                .default()
                .handles("advance", |machine, args| {
                    let moved = machine.transition(Some("advance"), &Light::Caution, args)?;
                    Ok(json!({
                        "moved": moved,
                        "now": machine.current_state().map(|s| s.name().to_string()),
                    }))
                })
                .transition(persona::TransitionDef::new().to(Light::Caution)),
        )
        .unwrap()
        .state(StateBuilder::new(Light::Caution))
        .unwrap()
        .build()
        .unwrap();
    let mut machine = Machine::new(Arc::new(schema), TrafficLight::default());

    let result = machine.dispatch("advance", &[]).unwrap();
    assert_eq!(result, json!({ "moved": true, "now": "Caution" }));
}

#[test]
fn transition_arguments_reach_hook_events() {
    use persona::{Arity, EventArg};
    use std::sync::Mutex;

    let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    let schema = SchemaBuilder::<Light, TrafficLight>::new()
        .state(
            StateBuilder::new(Light::Proceed)
                .default()
                .transition(simple_transition(Light::Caution, "cycle")),
        )
        .unwrap()
        .state(StateBuilder::new(Light::Caution))
        .unwrap()
        .build()
        .unwrap();
    let mut machine = Machine::new(Arc::new(schema), TrafficLight::default());

    machine
        .add_callback(
            &Light::Caution,
            persona::engine::ON_ENTER,
            Some("watcher"),
            Arity::Variadic,
            move |args| {
                for arg in args {
                    if let EventArg::Value(value) = arg {
                        sink.lock().unwrap().push(value.to_string());
                    }
                }
            },
        )
        .unwrap();

    machine
        .transition(Some("cycle"), &Light::Caution, &[json!("dusk")])
        .unwrap();
    assert_eq!(*seen.lock().unwrap(), vec!["\"dusk\""]);
}
