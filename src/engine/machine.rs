//! The per-context runtime: current-state tracking, request dispatch, and
//! the transition algorithm.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::hooks::{Arity, EventArg, Handle, Hook, HookError, HookTable};

use super::error::StateError;
use super::filter::FilterVerdict;
use super::schema::Schema;
use super::state::{StateDef, StateId, ON_ENTER, ON_EXIT};

/// A request handler attached to one state.
///
/// Handlers receive the machine itself, so they can inspect the context,
/// mutate it, and invoke [`Machine::transition`]; "handle request by
/// transitioning" is the common case and needs no special support.
pub type HandlerFn<S, C> =
    Arc<dyn Fn(&mut Machine<S, C>, &[Value]) -> Result<Value, StateError> + Send + Sync>;

/// One entity hosted by a schema: a mutable context value plus the
/// identifier of its active state.
///
/// The schema (state table, filters, type-level hooks) is shared read-only
/// across machines; only the current state, the context value, and a
/// lazily created per-instance copy of the hook tables are owned here. A
/// machine assumes a single logical caller at a time and performs no
/// locking.
pub struct Machine<S: StateId + 'static, C: 'static> {
    schema: Arc<Schema<S, C>>,
    context: C,
    current: Option<S>,
    instance_hooks: Option<HashMap<S, HookTable<C>>>,
}

impl<S: StateId + 'static, C: 'static> Machine<S, C> {
    /// Create a machine over `schema`. The current state starts unset and
    /// falls back to the schema's default state.
    pub fn new(schema: Arc<Schema<S, C>>, context: C) -> Self {
        Self {
            schema,
            context,
            current: None,
            instance_hooks: None,
        }
    }

    pub fn schema(&self) -> &Schema<S, C> {
        &self.schema
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    pub fn into_context(self) -> C {
        self.context
    }

    /// The active state identifier, falling back to the schema default
    /// when no transition has happened yet.
    pub fn current_state(&self) -> Option<&S> {
        let id = self.current.as_ref().or(self.schema.default_state());
        debug_assert!(id.map_or(true, |s| self.schema.contains(s)));
        id
    }

    /// Whether the active state handles `request`.
    pub fn can_handle(&self, request: &str) -> bool {
        self.current_state()
            .and_then(|id| self.schema.state(id))
            .is_some_and(|def| def.can_handle(request))
    }

    /// The union of request names handled by any state of the schema.
    pub fn all_handled_requests(&self) -> &[&'static str] {
        self.schema.all_handled_requests()
    }

    /// Forward `request` to the active state's handler.
    ///
    /// Context-wide filters matching `(current, request, no target)` run
    /// first; if any cancels, `Value::Bool(false)` is returned and nothing
    /// is forwarded. A request no state handles at all is a programming
    /// error ([`StateError::UnknownRequest`]); a request handled only by
    /// other states fails with [`StateError::WrongState`].
    pub fn dispatch(&mut self, request: &'static str, args: &[Value]) -> Result<Value, StateError> {
        let current = self
            .current_state()
            .cloned()
            .ok_or(StateError::NoCurrentState)?;
        if !self.schema.knows_request(request) {
            return Err(StateError::UnknownRequest { request });
        }
        if !self.run_request_filters(&current, Some(request), None) {
            return Ok(Value::Bool(false));
        }
        let handler = match self.state_def(&current).handler(request) {
            Some(handler) => Arc::clone(handler),
            None => {
                return Err(StateError::WrongState {
                    request,
                    state: current.name().to_string(),
                })
            }
        };
        handler(self, args)
    }

    /// Attempt a transition to `target`.
    ///
    /// Returns `Ok(true)` on commit, `Ok(false)` when a matching filter
    /// cancelled the attempt (no state change, no hooks), and an error
    /// when the target is unknown or outside the current state's
    /// whitelist. On success the current state's `on_exit` hook runs
    /// exactly once, then the target's `on_enter`, then the new state is
    /// committed; `args` become the hook events' payload.
    pub fn transition(
        &mut self,
        request: Option<&'static str>,
        target: &S,
        args: &[Value],
    ) -> Result<bool, StateError> {
        let current = self
            .current_state()
            .cloned()
            .ok_or(StateError::NoCurrentState)?;
        if &current == target {
            return Ok(true);
        }
        if !self.schema.contains(target) {
            return Err(StateError::UnknownTargetState {
                target: target.name().to_string(),
            });
        }
        if !self.run_request_filters(&current, request, Some(target)) {
            return Ok(false);
        }
        {
            let def = self.state_def(&current);
            if !def.valid_transitions().is_empty() && !def.valid_transitions().contains(target) {
                return Err(StateError::TransitionNotAllowed {
                    from: current.name().to_string(),
                    to: target.name().to_string(),
                });
            }
        }
        self.run_hook(&current, ON_EXIT, args)?;
        self.run_hook(target, ON_ENTER, args)?;
        self.current = Some(target.clone());
        assert_eq!(self.current_state(), Some(target));
        Ok(true)
    }

    /// Register an internal enter callback on this machine's own copy of
    /// `state`'s hooks. The first registration deep-copies the hook
    /// tables, so the schema and sibling machines are never affected.
    pub fn on_enter<F>(&mut self, state: &S, callback: F) -> Result<Handle, StateError>
    where
        F: Fn(&mut C) + Send + Sync + 'static,
    {
        Ok(self
            .instance_hook_mut(state, ON_ENTER)?
            .add_internal_callback(None, callback))
    }

    /// Register an internal exit callback on this machine's own copy of
    /// `state`'s hooks.
    pub fn on_exit<F>(&mut self, state: &S, callback: F) -> Result<Handle, StateError>
    where
        F: Fn(&mut C) + Send + Sync + 'static,
    {
        Ok(self
            .instance_hook_mut(state, ON_EXIT)?
            .add_internal_callback(None, callback))
    }

    /// Register an external callback with an explicit handle and arity on
    /// this machine's copy of one of `state`'s hooks.
    pub fn add_callback<F>(
        &mut self,
        state: &S,
        hook_name: &'static str,
        handle: Option<&'static str>,
        arity: Arity,
        callback: F,
    ) -> Result<Handle, StateError>
    where
        F: Fn(&[EventArg<'_, C>]) + Send + Sync + 'static,
    {
        let handle = self
            .instance_hook_mut(state, hook_name)?
            .add_external_callback(handle, arity, callback)?;
        Ok(handle)
    }

    /// This machine's mutable copy of the named hook on `state`, creating
    /// the per-instance deep copy of all hook tables on first use.
    pub fn instance_hook_mut(
        &mut self,
        state: &S,
        hook_name: &'static str,
    ) -> Result<&mut Hook<C>, StateError> {
        if !self.schema.contains(state) {
            return Err(StateError::UnknownTargetState {
                target: state.name().to_string(),
            });
        }
        let schema = Arc::clone(&self.schema);
        let tables = self.instance_hooks.get_or_insert_with(|| {
            schema
                .states()
                .map(|(id, def)| (id.clone(), def.hooks().derive()))
                .collect()
        });
        tables
            .get_mut(state)
            .and_then(|table| table.get_mut(hook_name))
            .ok_or_else(|| StateError::Hook(HookError::NoSuchHook(hook_name)))
    }

    fn state_def(&self, id: &S) -> &StateDef<S, C> {
        match self.schema.state(id) {
            Some(def) => def,
            // current_state only ever holds committed, validated ids
            None => panic!("state {:?} is not defined in the schema", id),
        }
    }

    /// Runs every filter matching the attempt, in registration order.
    /// Returns false as soon as one cancels.
    fn run_request_filters(
        &mut self,
        state: &S,
        request: Option<&'static str>,
        new_state: Option<&S>,
    ) -> bool {
        let schema = Arc::clone(&self.schema);
        for filter in schema.request_filters() {
            if filter.matches(Some(state), request.as_ref(), new_state)
                && filter.run(&mut self.context) == FilterVerdict::Cancel
            {
                return false;
            }
        }
        true
    }

    fn run_hook(
        &mut self,
        state: &S,
        hook_name: &'static str,
        args: &[Value],
    ) -> Result<(), StateError> {
        if let Some(tables) = &self.instance_hooks {
            if let Some(table) = tables.get(state) {
                table.execute(hook_name, &mut self.context, args)?;
                return Ok(());
            }
        }
        let schema = Arc::clone(&self.schema);
        let def = match schema.state(state) {
            Some(def) => def,
            None => panic!("state {:?} is not defined in the schema", state),
        };
        def.hooks().execute(hook_name, &mut self.context, args)?;
        Ok(())
    }
}

impl<S: StateId + 'static, C: fmt::Debug + 'static> fmt::Debug for Machine<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Machine")
            .field("current", &self.current_state())
            .field("context", &self.context)
            .finish()
    }
}
