//! Builder for one state's behavior.

use std::sync::Arc;

use serde_json::Value;

use crate::engine::{
    HandlerFn, Machine, Matcher, RequestFilter, StateDef, StateError, StateId, ON_ENTER, ON_EXIT,
};

use super::error::DefinitionError;
use super::transition::TransitionDef;

type DefinedCallback<C> = (Option<&'static str>, Box<dyn Fn(&mut C) + Send + Sync>);

/// Fluent builder for a single state: its handlers, transitions, and
/// type-level enter/exit callbacks.
pub struct StateBuilder<S: StateId + 'static, C: 'static> {
    id: S,
    default: bool,
    handlers: Vec<(&'static str, HandlerFn<S, C>)>,
    transitions: Vec<TransitionDef<S, C>>,
    enter_callbacks: Vec<DefinedCallback<C>>,
    exit_callbacks: Vec<DefinedCallback<C>>,
}

impl<S: StateId + 'static, C: 'static> StateBuilder<S, C> {
    pub fn new(id: S) -> Self {
        Self {
            id,
            default: false,
            handlers: Vec::new(),
            transitions: Vec::new(),
            enter_callbacks: Vec::new(),
            exit_callbacks: Vec::new(),
        }
    }

    /// Mark this state as the schema's default. At most one state may be.
    pub fn default(mut self) -> Self {
        self.default = true;
        self
    }

    /// Declare a request this state services. The handler receives the
    /// machine, so it can read and mutate the context and transition.
    pub fn handles<F>(mut self, request: &'static str, handler: F) -> Self
    where
        F: Fn(&mut Machine<S, C>, &[Value]) -> Result<Value, StateError> + Send + Sync + 'static,
    {
        self.handlers.push((request, Arc::new(handler)));
        self
    }

    /// Declare a transition originating from this state.
    pub fn transition(mut self, def: TransitionDef<S, C>) -> Self {
        self.transitions.push(def);
        self
    }

    /// Register a type-level enter callback, shared by every machine.
    pub fn on_enter<F>(mut self, callback: F) -> Self
    where
        F: Fn(&mut C) + Send + Sync + 'static,
    {
        self.enter_callbacks.push((None, Box::new(callback)));
        self
    }

    /// Register a type-level enter callback under an explicit handle.
    /// Re-using a handle never creates a duplicate run.
    pub fn on_enter_named<F>(mut self, handle: &'static str, callback: F) -> Self
    where
        F: Fn(&mut C) + Send + Sync + 'static,
    {
        self.enter_callbacks.push((Some(handle), Box::new(callback)));
        self
    }

    /// Register a type-level exit callback, shared by every machine.
    pub fn on_exit<F>(mut self, callback: F) -> Self
    where
        F: Fn(&mut C) + Send + Sync + 'static,
    {
        self.exit_callbacks.push((None, Box::new(callback)));
        self
    }

    /// Register a type-level exit callback under an explicit handle.
    pub fn on_exit_named<F>(mut self, handle: &'static str, callback: F) -> Self
    where
        F: Fn(&mut C) + Send + Sync + 'static,
    {
        self.exit_callbacks.push((Some(handle), Box::new(callback)));
        self
    }

    /// Resolve the declarations into an immutable state definition plus
    /// the state-scoped filters produced by guards and actions, in the
    /// order they were declared.
    pub(crate) fn build(
        self,
    ) -> Result<(StateDef<S, C>, bool, Vec<RequestFilter<S, C>>), DefinitionError> {
        let mut def = StateDef::new(self.id.clone());
        let mut filters = Vec::new();

        for (request, handler) in self.handlers {
            if !def.add_handler(request, handler) {
                return Err(DefinitionError::DuplicateHandler {
                    request,
                    state: self.id.name().to_string(),
                });
            }
        }

        for declaration in self.transitions {
            let to = declaration.to.ok_or(DefinitionError::MissingTarget)?;

            if let Some(request) = declaration.on {
                let target = to.clone();
                let handler: HandlerFn<S, C> = Arc::new(move |machine, args| {
                    Ok(Value::Bool(machine.transition(Some(request), &target, args)?))
                });
                if !def.add_handler(request, handler) {
                    return Err(DefinitionError::DuplicateHandler {
                        request,
                        state: self.id.name().to_string(),
                    });
                }
            }

            def.add_valid_transition(to.clone());

            if let Some(predicate) = declaration.guard {
                filters.push(RequestFilter::new(
                    Matcher::Equal(self.id.clone()),
                    request_pattern(declaration.on),
                    Matcher::Equal(to.clone()),
                    move |ctx: &mut C| {
                        if (*predicate)(&*ctx) {
                            crate::engine::FilterVerdict::Continue
                        } else {
                            crate::engine::FilterVerdict::Cancel
                        }
                    },
                ));
            }

            if let Some(action) = declaration.action {
                filters.push(RequestFilter::from_action(
                    Matcher::Equal(self.id.clone()),
                    request_pattern(declaration.on),
                    Matcher::Equal(to.clone()),
                    action,
                ));
            }
        }

        for (handle, callback) in self.enter_callbacks {
            if let Some(hook) = def.hooks_mut().get_mut(ON_ENTER) {
                hook.add_internal_callback(handle, callback);
            }
        }
        for (handle, callback) in self.exit_callbacks {
            if let Some(hook) = def.hooks_mut().get_mut(ON_EXIT) {
                hook.add_internal_callback(handle, callback);
            }
        }

        Ok((def, self.default, filters))
    }
}

fn request_pattern(on: Option<&'static str>) -> Matcher<&'static str> {
    match on {
        Some(request) => Matcher::Equal(request),
        None => Matcher::Absent,
    }
}
