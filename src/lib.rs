//! Persona: an embeddable state-pattern engine
//!
//! Persona attaches state-specific behavior to a host value (the
//! "context"): each state declares the requests it handles and the
//! transitions it allows, transitions run under programmable guards and
//! request filters that may cancel them, and ordered, inheritable
//! enter/exit hooks fire around every committed transition.
//!
//! # Core Concepts
//!
//! - **Schema**: the immutable type-level definition (states, filters,
//!   hooks) produced by [`SchemaBuilder`] and shared by all machines
//! - **Machine**: one entity's runtime, a context value plus its active
//!   state, with `dispatch` and `transition`
//! - **Request filters**: pattern-matched interceptors that can observe or
//!   cancel an attempt; guards are filters
//! - **Hooks**: ordered, arity-aware callback slots run at enter/exit
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use persona::builder::simple_transition;
//! use persona::{state_id, Machine, SchemaBuilder, StateBuilder};
//!
//! state_id! {
//!     enum Light {
//!         Proceed,
//!         Caution,
//!         Stop,
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let schema = SchemaBuilder::<Light, ()>::new()
//!     .state(
//!         StateBuilder::new(Light::Proceed)
//!             .default()
//!             .transition(simple_transition(Light::Caution, "cycle")),
//!     )?
//!     .state(
//!         StateBuilder::new(Light::Caution)
//!             .transition(simple_transition(Light::Stop, "cycle")),
//!     )?
//!     .state(
//!         StateBuilder::new(Light::Stop)
//!             .transition(simple_transition(Light::Proceed, "cycle")),
//!     )?
//!     .build()?;
//!
//! let mut light = Machine::new(Arc::new(schema), ());
//! assert_eq!(light.current_state(), Some(&Light::Proceed));
//!
//! light.dispatch("cycle", &[])?;
//! assert_eq!(light.current_state(), Some(&Light::Caution));
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod engine;
pub mod hooks;

// Re-export commonly used types
pub use builder::{DefinitionError, SchemaBuilder, StateBuilder, TransitionDef};
pub use engine::{
    FilterVerdict, Machine, Matcher, RequestFilter, Schema, StateDef, StateError, StateId,
};
pub use hooks::{Arity, Callback, CallbackSet, Event, EventArg, Handle, Hook, HookError, HookTable};
