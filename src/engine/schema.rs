//! The immutable type-level definition shared by all machines.

use std::collections::HashMap;
use std::fmt;

use super::filter::RequestFilter;
use super::state::{StateDef, StateId};

/// Everything that defines one kind of context: its state table, at most
/// one default state, the flat request-filter list in literal registration
/// order, and the union of handled request names.
///
/// A schema is produced by [`SchemaBuilder`](crate::builder::SchemaBuilder)
/// and never mutated afterwards; machines share it behind an `Arc`.
pub struct Schema<S: StateId + 'static, C: 'static> {
    states: HashMap<S, StateDef<S, C>>,
    order: Vec<S>,
    default_state: Option<S>,
    request_filters: Vec<RequestFilter<S, C>>,
    all_requests: Vec<&'static str>,
}

impl<S: StateId + 'static, C: 'static> Schema<S, C> {
    pub(crate) fn from_parts(
        states: HashMap<S, StateDef<S, C>>,
        order: Vec<S>,
        default_state: Option<S>,
        request_filters: Vec<RequestFilter<S, C>>,
        all_requests: Vec<&'static str>,
    ) -> Self {
        Self {
            states,
            order,
            default_state,
            request_filters,
            all_requests,
        }
    }

    pub fn state(&self, id: &S) -> Option<&StateDef<S, C>> {
        self.states.get(id)
    }

    pub fn contains(&self, id: &S) -> bool {
        self.states.contains_key(id)
    }

    /// The state marked default at definition time, if any.
    pub fn default_state(&self) -> Option<&S> {
        self.default_state.as_ref()
    }

    /// State definitions in the order they were declared.
    pub fn states(&self) -> impl Iterator<Item = (&S, &StateDef<S, C>)> {
        self.order.iter().filter_map(|id| {
            let def = self.states.get(id)?;
            Some((id, def))
        })
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// All filters, context-wide and state-scoped alike, in the literal
    /// order they were registered.
    pub fn request_filters(&self) -> &[RequestFilter<S, C>] {
        &self.request_filters
    }

    /// The union of request names handled by any state, in first-seen
    /// definition order.
    pub fn all_handled_requests(&self) -> &[&'static str] {
        &self.all_requests
    }

    pub fn knows_request(&self, request: &str) -> bool {
        self.all_requests.iter().any(|name| *name == request)
    }
}

impl<S: StateId, C> fmt::Debug for Schema<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("states", &self.order)
            .field("default_state", &self.default_state)
            .field("request_filters", &self.request_filters.len())
            .field("all_requests", &self.all_requests)
            .finish()
    }
}
