//! Declarative definition surface for schemas.
//!
//! This layer is sugar over the engine: it validates declarations eagerly
//! and produces the engine's configuration, but contains no transition
//! logic of its own.

pub mod error;
pub mod macros;
pub mod schema;
pub mod state;
pub mod transition;

pub use error::DefinitionError;
pub use schema::SchemaBuilder;
pub use state::StateBuilder;
pub use transition::TransitionDef;

use crate::engine::StateId;

/// Create an unconditional transition triggered by `request`.
///
/// # Example
///
/// ```
/// use persona::builder::simple_transition;
/// use persona::state_id;
///
/// state_id! {
///     enum MyState {
///         Start,
///         End,
///     }
/// }
///
/// let def = simple_transition::<MyState, ()>(MyState::End, "finish");
/// ```
pub fn simple_transition<S, C>(to: S, on: &'static str) -> TransitionDef<S, C>
where
    S: StateId + 'static,
    C: 'static,
{
    TransitionDef::new().to(to).on(on)
}

/// Create a transition triggered by `request` and guarded by a predicate
/// over the context.
///
/// # Example
///
/// ```
/// use persona::builder::guarded_transition;
/// use persona::state_id;
///
/// state_id! {
///     enum MyState {
///         Start,
///         End,
///     }
/// }
///
/// let def = guarded_transition::<MyState, u32, _>(MyState::End, "finish", |count| *count > 0);
/// ```
pub fn guarded_transition<S, C, F>(to: S, on: &'static str, guard: F) -> TransitionDef<S, C>
where
    S: StateId + 'static,
    C: 'static,
    F: Fn(&C) -> bool + Send + Sync + 'static,
{
    TransitionDef::new().to(to).on(on).when(guard)
}
