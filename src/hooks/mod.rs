//! The extension-point (hook) dispatch subsystem.
//!
//! Hooks are named, ordered, inheritable callback slots. The state engine
//! uses them for `on_enter`/`on_exit` points, but the subsystem is
//! independent of it: any context type can expose a [`HookTable`] and
//! execute hooks against itself.

pub mod callback;
pub mod error;
pub mod event;
pub mod hook;

pub use callback::{Callback, CallbackSet, Handle};
pub use error::HookError;
pub use event::{Arity, Event, EventArg};
pub use hook::{Hook, HookTable};
