//! Runtime error taxonomy for the state engine.

use thiserror::Error;

use crate::hooks::HookError;

/// Errors surfaced by dispatch and transition at runtime.
///
/// Filter cancellation is deliberately not represented here: a cancelled
/// attempt is a normal control outcome reported as a boolean-false result,
/// not an error.
#[derive(Debug, Error)]
pub enum StateError {
    /// The transition target is not a state the schema defines.
    #[error("no state '{target}' defined")]
    UnknownTargetState { target: String },

    /// The current state's whitelist does not allow this target.
    #[error("not allowed to transition from {from} to {to}")]
    TransitionNotAllowed { from: String, to: String },

    /// The request is handled by some state, but not the one currently
    /// active. Distinct from [`StateError::UnknownRequest`], which is a
    /// programming error.
    #[error("request '{request}' not supported by state {state}")]
    WrongState {
        request: &'static str,
        state: String,
    },

    /// No state in the schema handles this request at all.
    #[error("request '{request}' is not handled by any state")]
    UnknownRequest { request: &'static str },

    /// The machine has no current state and its schema declares no
    /// default.
    #[error("no current state and no default state defined")]
    NoCurrentState,

    /// A hook callback failed to execute.
    #[error(transparent)]
    Hook(#[from] HookError),
}
