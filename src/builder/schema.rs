//! Builder producing immutable schemas.

use std::collections::HashMap;

use crate::engine::{FilterVerdict, Matcher, RequestFilter, Schema, StateDef, StateId};

use super::error::DefinitionError;
use super::state::StateBuilder;

/// Fluent builder for a [`Schema`].
///
/// States are registered in declaration order. A state's own guard and
/// action filters are merged into the schema-wide filter list at the point
/// the state is registered, so the literal registration order of all
/// filters is preserved end to end.
pub struct SchemaBuilder<S: StateId + 'static, C: 'static> {
    states: HashMap<S, StateDef<S, C>>,
    order: Vec<S>,
    default_state: Option<S>,
    filters: Vec<RequestFilter<S, C>>,
    all_requests: Vec<&'static str>,
}

impl<S: StateId + 'static, C: 'static> SchemaBuilder<S, C> {
    pub fn new() -> Self {
        Self {
            states: HashMap::new(),
            order: Vec::new(),
            default_state: None,
            filters: Vec::new(),
            all_requests: Vec::new(),
        }
    }

    /// Register a state. Fails on a duplicate identifier or a second
    /// default state.
    pub fn state(mut self, builder: StateBuilder<S, C>) -> Result<Self, DefinitionError> {
        let (def, is_default, local_filters) = builder.build()?;

        if self.states.contains_key(def.id()) {
            return Err(DefinitionError::DuplicateState(def.name().to_string()));
        }
        if is_default {
            if self.default_state.is_some() {
                return Err(DefinitionError::DuplicateDefault);
            }
            self.default_state = Some(def.id().clone());
        }

        for request in def.handled_requests() {
            if !self.all_requests.contains(&request) {
                self.all_requests.push(request);
            }
        }

        let id = def.id().clone();
        self.order.push(id.clone());
        self.states.insert(id, def);
        self.filters.extend(local_filters);
        Ok(self)
    }

    /// Register a context-wide request filter.
    pub fn request_filter<F>(
        mut self,
        state: Matcher<S>,
        request: Matcher<&'static str>,
        new_state: Matcher<S>,
        action: F,
    ) -> Self
    where
        F: Fn(&mut C) -> FilterVerdict + Send + Sync + 'static,
    {
        self.filters
            .push(RequestFilter::new(state, request, new_state, action));
        self
    }

    /// Produce the immutable schema. Fails if no states were defined.
    pub fn build(self) -> Result<Schema<S, C>, DefinitionError> {
        if self.states.is_empty() {
            return Err(DefinitionError::NoStates);
        }
        Ok(Schema::from_parts(
            self.states,
            self.order,
            self.default_state,
            self.filters,
            self.all_requests,
        ))
    }
}

impl<S: StateId + 'static, C: 'static> Default for SchemaBuilder<S, C> {
    fn default() -> Self {
        Self::new()
    }
}
