//! State identity and per-state behavior definitions.

use std::fmt;
use std::fmt::Debug;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::hooks::{Hook, HookTable};

use super::machine::HandlerFn;

/// The name of the extension point run when a state is entered.
pub const ON_ENTER: &str = "on_enter";
/// The name of the extension point run when a state is exited.
pub const ON_EXIT: &str = "on_exit";

/// Trait for state identifiers.
///
/// Identifiers are opaque, hashable, comparable values that uniquely key a
/// state within one schema. Plain enums are the usual implementation; the
/// [`state_id!`](crate::state_id) macro derives this trait for them.
///
/// # Required Traits
///
/// - `Clone` + `Eq` + `Hash`: identifiers key the schema's state table
/// - `Debug`: identifiers appear in diagnostics
/// - `Serialize` + `Deserialize`: identifiers are plain data
///
/// # Example
///
/// ```rust
/// use persona::StateId;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum Light {
///     Proceed,
///     Caution,
///     Stop,
/// }
///
/// impl StateId for Light {
///     fn name(&self) -> &str {
///         match self {
///             Self::Proceed => "Proceed",
///             Self::Caution => "Caution",
///             Self::Stop => "Stop",
///         }
///     }
/// }
/// ```
pub trait StateId:
    Clone + Eq + Hash + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// The identifier's name for display and diagnostics.
    fn name(&self) -> &str;
}

/// One named behavior unit attached to a schema.
///
/// A state declares which requests it handles, which target states are
/// legal to transition to (an empty set means unrestricted), and owns the
/// `on_enter`/`on_exit` extension points. Built once at definition time
/// and shared read-only across every machine of that schema.
pub struct StateDef<S: StateId + 'static, C: 'static> {
    id: S,
    valid_transitions: Vec<S>,
    handlers: Vec<(&'static str, HandlerFn<S, C>)>,
    hooks: HookTable<C>,
}

impl<S: StateId + 'static, C: 'static> StateDef<S, C> {
    pub(crate) fn new(id: S) -> Self {
        let mut hooks = HookTable::new();
        hooks.define(Hook::new(ON_ENTER, &[]));
        hooks.define(Hook::new(ON_EXIT, &[]));
        Self {
            id,
            valid_transitions: Vec::new(),
            handlers: Vec::new(),
            hooks,
        }
    }

    pub fn id(&self) -> &S {
        &self.id
    }

    pub fn name(&self) -> &str {
        self.id.name()
    }

    /// The identifiers this state may transition to. Empty means any known
    /// state is a legal target.
    pub fn valid_transitions(&self) -> &[S] {
        &self.valid_transitions
    }

    /// The request names this state can service, in definition order.
    pub fn handled_requests(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|(name, _)| *name).collect()
    }

    pub fn can_handle(&self, request: &str) -> bool {
        self.handlers.iter().any(|(name, _)| *name == request)
    }

    pub fn handler(&self, request: &str) -> Option<&HandlerFn<S, C>> {
        self.handlers
            .iter()
            .find(|(name, _)| *name == request)
            .map(|(_, handler)| handler)
    }

    pub fn hooks(&self) -> &HookTable<C> {
        &self.hooks
    }

    pub(crate) fn hooks_mut(&mut self) -> &mut HookTable<C> {
        &mut self.hooks
    }

    pub(crate) fn add_valid_transition(&mut self, target: S) {
        if !self.valid_transitions.contains(&target) {
            self.valid_transitions.push(target);
        }
    }

    /// Returns false if the request already has a handler on this state.
    pub(crate) fn add_handler(&mut self, request: &'static str, handler: HandlerFn<S, C>) -> bool {
        if self.can_handle(request) {
            return false;
        }
        self.handlers.push((request, handler));
        true
    }
}

impl<S: StateId + 'static, C: 'static> fmt::Debug for StateDef<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateDef")
            .field("id", &self.id)
            .field("valid_transitions", &self.valid_transitions)
            .field(
                "handled_requests",
                &self
                    .handlers
                    .iter()
                    .map(|(name, _)| *name)
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}
