//! The state/transition engine.
//!
//! - **StateId / StateDef**: state identity and per-state behavior
//! - **Schema**: the immutable type-level definition machines share
//! - **Machine**: per-context runtime with dispatch and transitions
//! - **RequestFilter / Matcher**: pattern-matched interceptors that can
//!   cancel an attempt

pub mod error;
pub mod filter;
pub mod machine;
pub mod matcher;
pub mod schema;
pub mod state;

pub use error::StateError;
pub use filter::{FilterAction, FilterVerdict, RequestFilter};
pub use machine::{HandlerFn, Machine};
pub use matcher::Matcher;
pub use schema::Schema;
pub use state::{StateDef, StateId, ON_ENTER, ON_EXIT};
