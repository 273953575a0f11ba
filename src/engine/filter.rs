//! Request filters: pattern-matched interceptors that can observe or
//! cancel a dispatch or transition attempt.

use std::fmt;
use std::sync::Arc;

use super::matcher::Matcher;

/// What a filter action decided about the attempt it observed.
///
/// Cancellation is cooperative control flow, not an error: the first
/// `Cancel` stops filter evaluation and makes the whole operation report
/// failure without mutating any state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterVerdict {
    Continue,
    Cancel,
}

/// The executable part of a filter. Runs with the context as its scope and
/// may perform side effects freely.
pub type FilterAction<C> = Arc<dyn Fn(&mut C) -> FilterVerdict + Send + Sync>;

/// A `(state, request, new_state)` pattern triple plus an action.
///
/// A filter matches an attempted operation iff all three patterns match
/// the corresponding components. Filters are appended at definition time
/// and read in insertion order; they are never mutated afterwards.
pub struct RequestFilter<S, C> {
    state: Matcher<S>,
    request: Matcher<&'static str>,
    new_state: Matcher<S>,
    action: FilterAction<C>,
}

impl<S: PartialEq, C> RequestFilter<S, C> {
    pub fn new<F>(
        state: Matcher<S>,
        request: Matcher<&'static str>,
        new_state: Matcher<S>,
        action: F,
    ) -> Self
    where
        F: Fn(&mut C) -> FilterVerdict + Send + Sync + 'static,
    {
        Self::from_action(state, request, new_state, Arc::new(action))
    }

    pub fn from_action(
        state: Matcher<S>,
        request: Matcher<&'static str>,
        new_state: Matcher<S>,
        action: FilterAction<C>,
    ) -> Self {
        Self {
            state,
            request,
            new_state,
            action,
        }
    }

    /// Whether this filter applies to an attempt made from `state`, for
    /// `request` (absent on a bare transition call), toward `new_state`
    /// (absent on a plain dispatch).
    pub fn matches(
        &self,
        state: Option<&S>,
        request: Option<&&'static str>,
        new_state: Option<&S>,
    ) -> bool {
        self.state.matches(state)
            && self.request.matches(request)
            && self.new_state.matches(new_state)
    }

    pub(crate) fn run(&self, ctx: &mut C) -> FilterVerdict {
        (self.action)(ctx)
    }
}

impl<S: Clone, C> Clone for RequestFilter<S, C> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            request: self.request.clone(),
            new_state: self.new_state.clone(),
            action: Arc::clone(&self.action),
        }
    }
}

impl<S: fmt::Debug, C> fmt::Debug for RequestFilter<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestFilter")
            .field("state", &self.state)
            .field("request", &self.request)
            .field("new_state", &self.new_state)
            .finish()
    }
}
