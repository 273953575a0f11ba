//! Declarative transition descriptions.

use std::sync::Arc;

use crate::engine::{FilterAction, StateId};

pub(crate) type GuardFn<C> = Arc<dyn Fn(&C) -> bool + Send + Sync>;

/// One `transition` declaration on a state.
///
/// `to` is required. `on` names a request; declaring it auto-registers a
/// handler that performs the transition and returns its boolean result.
/// A guard becomes a request filter that cancels the attempt when the
/// predicate is false, and an action becomes a filter run on every
/// matching attempt; guards and actions are filters, not a separate
/// mechanism.
pub struct TransitionDef<S: StateId, C> {
    pub(crate) to: Option<S>,
    pub(crate) on: Option<&'static str>,
    pub(crate) guard: Option<GuardFn<C>>,
    pub(crate) action: Option<FilterAction<C>>,
}

impl<S: StateId, C> TransitionDef<S, C> {
    pub fn new() -> Self {
        Self {
            to: None,
            on: None,
            guard: None,
            action: None,
        }
    }

    /// Set the target state (required).
    pub fn to(mut self, state: S) -> Self {
        self.to = Some(state);
        self
    }

    /// Name the request that triggers this transition (optional). The
    /// declaring state gets a handler for it automatically.
    pub fn on(mut self, request: &'static str) -> Self {
        self.on = Some(request);
        self
    }

    /// Guard the transition with a predicate over the context (optional).
    /// A false predicate cancels the attempt with no state change.
    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        self.guard = Some(Arc::new(predicate));
        self
    }

    /// Attach an action run as a filter on every matching attempt
    /// (optional). Actions may mutate the context and may cancel.
    pub fn action<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut C) -> crate::engine::FilterVerdict + Send + Sync + 'static,
    {
        self.action = Some(Arc::new(action));
        self
    }
}

impl<S: StateId, C> Default for TransitionDef<S, C> {
    fn default() -> Self {
        Self::new()
    }
}
