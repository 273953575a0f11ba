//! Definition-time errors for the schema and state builders.

use thiserror::Error;

/// Errors raised while defining a schema. All of these are fatal and
/// surface before any machine exists.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    #[error("state '{0}' already defined")]
    DuplicateState(String),

    #[error("cannot have more than one default state")]
    DuplicateDefault,

    #[error("transition declaration is missing a target state. Call .to(state)")]
    MissingTarget,

    #[error("request '{request}' already has a handler on state '{state}'")]
    DuplicateHandler {
        request: &'static str,
        state: String,
    },

    #[error("no states defined. Add at least one state")]
    NoStates,
}
