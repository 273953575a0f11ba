//! Named, inheritable extension points.
//!
//! A [`Hook`] is a named slot a class of contexts exposes for extension.
//! Deriving a hook produces a child whose parent is a structural deep copy
//! of the original and whose own callback set starts empty; executing the
//! child runs the parent chain first (root to leaf), then its own
//! callbacks in insertion order. This is what lets instance-level
//! registration layer on top of type-level definitions without mutating
//! them.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::callback::{CallbackBody, CallbackSet, Handle};
use super::error::HookError;
use super::event::{Arity, EventArg};

/// A named extension point with an ordered callback set and an optional
/// inherited parent.
pub struct Hook<C> {
    name: &'static str,
    params: &'static [&'static str],
    parent: Option<Box<Hook<C>>>,
    callbacks: CallbackSet<C>,
}

impl<C> Hook<C> {
    /// Define a hook. `params` names the payload arguments callers are
    /// expected to pass on execution; it sets the floor for external
    /// callback arities.
    pub fn new(name: &'static str, params: &'static [&'static str]) -> Self {
        Self {
            name,
            params,
            parent: None,
            callbacks: CallbackSet::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn params(&self) -> &'static [&'static str] {
        self.params
    }

    pub fn callbacks(&self) -> &CallbackSet<C> {
        &self.callbacks
    }

    /// Derive an inheriting copy: the result's parent is a deep copy of
    /// this hook, and its own callback set is empty. Registration on the
    /// derived hook never affects the original.
    pub fn derive(&self) -> Hook<C> {
        Hook {
            name: self.name,
            params: self.params,
            parent: Some(Box::new(self.clone())),
            callbacks: CallbackSet::new(),
        }
    }

    /// Register a callback that runs in its defining scope with the
    /// event's argument list adapted to `arity`.
    ///
    /// An exact arity below the hook's declared parameter count can never
    /// be satisfied and is rejected here, at registration time.
    pub fn add_external_callback<F>(
        &mut self,
        handle: Option<&'static str>,
        arity: Arity,
        callback: F,
    ) -> Result<Handle, HookError>
    where
        F: Fn(&[EventArg<'_, C>]) + Send + Sync + 'static,
    {
        if let Arity::Exact(a) = arity {
            if a < self.params.len() {
                return Err(HookError::IncompatibleArity {
                    arity: a,
                    min: self.params.len(),
                    max: self.params.len() + 2,
                });
            }
        }
        Ok(self.callbacks.insert(
            handle,
            CallbackBody::External {
                arity,
                run: Arc::new(callback),
            },
        ))
    }

    /// Register a callback that runs against the event source. The
    /// signature carries no event arguments; this is the zero-argument
    /// contract for internal callbacks.
    pub fn add_internal_callback<F>(&mut self, handle: Option<&'static str>, callback: F) -> Handle
    where
        F: Fn(&mut C) + Send + Sync + 'static,
    {
        self.callbacks.insert(
            handle,
            CallbackBody::Internal {
                run: Arc::new(callback),
            },
        )
    }

    /// Register a bound-method callback: it runs against the event source
    /// and receives the raw payload arguments.
    pub fn add_method_callback<F>(&mut self, handle: Option<&'static str>, callback: F) -> Handle
    where
        F: Fn(&mut C, &[Value]) + Send + Sync + 'static,
    {
        self.callbacks.insert(
            handle,
            CallbackBody::Method {
                run: Arc::new(callback),
            },
        )
    }

    /// Execute the parent chain (root first), then this hook's own
    /// callbacks in ascending index order. Each callback sees an event
    /// with `source`, this hook's name, and `arguments`.
    pub fn execute(&self, source: &mut C, arguments: &[Value]) -> Result<(), HookError> {
        if let Some(parent) = &self.parent {
            parent.execute(source, arguments)?;
        }
        self.callbacks.execute(source, self.name, arguments)
    }

    /// Callback count including the parent chain.
    pub fn total_callbacks(&self) -> usize {
        self.callbacks.len() + self.parent.as_ref().map_or(0, |p| p.total_callbacks())
    }
}

impl<C> Clone for Hook<C> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            params: self.params,
            parent: self.parent.clone(),
            callbacks: self.callbacks.clone(),
        }
    }
}

impl<C> fmt::Debug for Hook<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hook")
            .field("name", &self.name)
            .field("own_callbacks", &self.callbacks.len())
            .field("total_callbacks", &self.total_callbacks())
            .finish()
    }
}

/// The set of hooks one class of contexts exposes, keyed by name.
///
/// Deriving a table derives every hook in it; this is the deep copy
/// performed at context-type derivation and at first instance access.
pub struct HookTable<C> {
    hooks: Vec<Hook<C>>,
}

impl<C> HookTable<C> {
    pub fn new() -> Self {
        Self { hooks: Vec::new() }
    }

    /// Define a hook on this table. A hook with the same name already
    /// present is left in place.
    pub fn define(&mut self, hook: Hook<C>) {
        if self.get(hook.name()).is_none() {
            self.hooks.push(hook);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Hook<C>> {
        self.hooks.iter().find(|h| h.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Hook<C>> {
        self.hooks.iter_mut().find(|h| h.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Hook<C>> {
        self.hooks.iter()
    }

    /// Deep-copy every hook via [`Hook::derive`].
    pub fn derive(&self) -> HookTable<C> {
        HookTable {
            hooks: self.hooks.iter().map(Hook::derive).collect(),
        }
    }

    /// Execute the named hook, failing with [`HookError::NoSuchHook`] if
    /// it is not defined here.
    pub fn execute(
        &self,
        name: &'static str,
        source: &mut C,
        arguments: &[Value],
    ) -> Result<(), HookError> {
        let hook = self.get(name).ok_or(HookError::NoSuchHook(name))?;
        hook.execute(source, arguments)
    }
}

impl<C> Clone for HookTable<C> {
    fn clone(&self) -> Self {
        Self {
            hooks: self.hooks.clone(),
        }
    }
}

impl<C> Default for HookTable<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for HookTable<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.hooks.iter()).finish()
    }
}
