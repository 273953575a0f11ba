//! Errors raised by the hook dispatch subsystem.

use thiserror::Error;

/// Errors that can occur when registering or executing hook callbacks.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HookError {
    /// A callback's declared arity cannot be satisfied by the event's
    /// argument list. Raised at registration time when the arity is below
    /// the hook's declared parameter count, or at invocation time when it
    /// falls outside the adaptable range.
    #[error("callback arity {arity} is incompatible: must be between {min} and {max}")]
    IncompatibleArity {
        arity: usize,
        min: usize,
        max: usize,
    },

    /// The named hook is not defined on the table it was looked up in.
    #[error("no such hook: {0}")]
    NoSuchHook(&'static str),
}
