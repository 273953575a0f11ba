//! Property-based tests for the engine's core invariants.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated inputs.

use std::sync::Arc;

use proptest::prelude::*;
use serde_json::{json, Value};

use persona::{
    state_id, Arity, Event, EventArg, Hook, Machine, Matcher, SchemaBuilder, StateBuilder, StateId,
};

state_id! {
    enum Phase {
        Idle,
        Running,
        Paused,
        Done,
    }
}

prop_compose! {
    fn arbitrary_phase()(variant in 0..4u8) -> Phase {
        match variant {
            0 => Phase::Idle,
            1 => Phase::Running,
            2 => Phase::Paused,
            _ => Phase::Done,
        }
    }
}

prop_compose! {
    fn arbitrary_payload()(values in prop::collection::vec(0..100i64, 0..5)) -> Vec<Value> {
        values.into_iter().map(|v| json!(v)).collect()
    }
}

/// Every phase is a state, no whitelists, no default.
fn open_schema() -> Arc<persona::Schema<Phase, ()>> {
    let schema = SchemaBuilder::<Phase, ()>::new()
        .state(StateBuilder::new(Phase::Idle).default())
        .unwrap()
        .state(StateBuilder::new(Phase::Running))
        .unwrap()
        .state(StateBuilder::new(Phase::Paused))
        .unwrap()
        .state(StateBuilder::new(Phase::Done))
        .unwrap()
        .build()
        .unwrap();
    Arc::new(schema)
}

proptest! {
    #[test]
    fn variadic_adaptation_is_total_and_complete(payload in arbitrary_payload()) {
        let source = ();
        let event = Event::new(&source, "point", &payload);

        let adapted = event.to_args(Arity::Variadic).unwrap();
        prop_assert_eq!(adapted.len(), payload.len() + 2);
        prop_assert_eq!(&adapted[0], &EventArg::Source(&source));
        prop_assert_eq!(&adapted[1], &EventArg::Name("point"));
    }

    #[test]
    fn exact_adaptation_succeeds_only_within_bounds(
        payload in arbitrary_payload(),
        arity in 0..8usize,
    ) {
        let source = ();
        let event = Event::new(&source, "point", &payload);
        let min = payload.len();
        let max = min + 2;

        let result = event.to_args(Arity::Exact(arity));
        if (min..=max).contains(&arity) {
            prop_assert_eq!(result.unwrap().len(), arity);
        } else {
            prop_assert!(result.is_err());
        }
    }

    #[test]
    fn adaptation_preserves_the_payload_suffix(payload in arbitrary_payload()) {
        let source = ();
        let event = Event::new(&source, "point", &payload);

        // the tightest exact arity drops source and name, nothing more
        let adapted = event.to_args(Arity::Exact(payload.len())).unwrap();
        let expected: Vec<EventArg<'_, ()>> = payload.iter().map(EventArg::Value).collect();
        prop_assert_eq!(adapted, expected);
    }

    #[test]
    fn matcher_any_accepts_everything(candidate in proptest::option::of(0..100u8)) {
        prop_assert!(Matcher::<u8>::Any.matches(candidate.as_ref()));
    }

    #[test]
    fn matcher_not_nil_and_absent_partition(candidate in proptest::option::of(0..100u8)) {
        let not_nil = Matcher::<u8>::NotNil.matches(candidate.as_ref());
        let absent = Matcher::<u8>::Absent.matches(candidate.as_ref());
        prop_assert_ne!(not_nil, absent);
        prop_assert_eq!(not_nil, candidate.is_some());
    }

    #[test]
    fn matcher_equal_agrees_with_equality(
        pattern in 0..100u8,
        candidate in proptest::option::of(0..100u8),
    ) {
        let matched = Matcher::Equal(pattern).matches(candidate.as_ref());
        prop_assert_eq!(matched, candidate == Some(pattern));
    }

    #[test]
    fn matcher_one_of_agrees_with_membership(
        pool in prop::collection::vec(0..20u8, 0..5),
        candidate in proptest::option::of(0..20u8),
    ) {
        let matched = Matcher::OneOf(pool.clone()).matches(candidate.as_ref());
        prop_assert_eq!(matched, candidate.map_or(false, |c| pool.contains(&c)));
    }

    #[test]
    fn transition_to_current_state_never_changes_anything(target in arbitrary_phase()) {
        let mut machine = Machine::new(open_schema(), ());

        machine.transition(None, &target, &[]).unwrap();
        prop_assert_eq!(machine.current_state(), Some(&target));

        prop_assert!(machine.transition(None, &target, &[]).unwrap());
        prop_assert_eq!(machine.current_state(), Some(&target));
    }

    #[test]
    fn noop_transition_fires_no_hooks(target in arbitrary_phase()) {
        let schema = SchemaBuilder::<Phase, Vec<String>>::new()
            .state(
                StateBuilder::new(Phase::Idle)
                    .default()
                    .on_enter(|log: &mut Vec<String>| log.push("enter".into()))
                    .on_exit(|log| log.push("exit".into())),
            )
            .unwrap()
            .state(
                StateBuilder::new(Phase::Running)
                    .on_enter(|log: &mut Vec<String>| log.push("enter".into()))
                    .on_exit(|log| log.push("exit".into())),
            )
            .unwrap()
            .state(
                StateBuilder::new(Phase::Paused)
                    .on_enter(|log: &mut Vec<String>| log.push("enter".into()))
                    .on_exit(|log| log.push("exit".into())),
            )
            .unwrap()
            .state(
                StateBuilder::new(Phase::Done)
                    .on_enter(|log: &mut Vec<String>| log.push("enter".into()))
                    .on_exit(|log| log.push("exit".into())),
            )
            .unwrap()
            .build()
            .unwrap();
        let mut machine = Machine::new(Arc::new(schema), Vec::new());

        machine.transition(None, &target, &[]).unwrap();
        let after_first = machine.context().len();

        machine.transition(None, &target, &[]).unwrap();
        prop_assert_eq!(machine.context().len(), after_first);
    }

    #[test]
    fn internal_callbacks_run_in_registration_order(count in 1..8usize) {
        let mut hook = Hook::<Vec<usize>>::new("ordered", &[]);
        for index in 0..count {
            hook.add_internal_callback(None, move |log| log.push(index));
        }

        let mut log = Vec::new();
        hook.execute(&mut log, &[]).unwrap();
        prop_assert_eq!(log, (0..count).collect::<Vec<_>>());
    }

    #[test]
    fn named_handles_never_register_twice(repeats in 1..6usize) {
        let mut hook = Hook::<u32>::new("counted", &[]);
        for _ in 0..repeats {
            hook.add_internal_callback(Some("bump"), |count| *count += 1);
        }
        prop_assert_eq!(hook.total_callbacks(), 1);

        let mut count = 0;
        hook.execute(&mut count, &[]).unwrap();
        prop_assert_eq!(count, 1);
    }

    #[test]
    fn state_id_roundtrip_serialization(phase in arbitrary_phase()) {
        let encoded = serde_json::to_string(&phase).unwrap();
        let decoded: Phase = serde_json::from_str(&encoded).unwrap();
        prop_assert_eq!(&phase, &decoded);
        prop_assert_eq!(phase.name(), decoded.name());
    }
}
