//! Callbacks and the ordered sets that hold them.
//!
//! A callback is one registered unit of behavior bound to a hook. It is
//! addressed by a [`Handle`] (explicit, or auto-assigned from its insertion
//! index) and ordered by its insertion index. Two callbacks with equal
//! handles are the *same* callback, which is what prevents duplicate
//! registration.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::error::HookError;
use super::event::{Arity, Event, EventArg};

/// The identity key of a callback, independent of its execution order.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Handle {
    /// An explicitly chosen name.
    Named(&'static str),
    /// Auto-assigned from the insertion index, so anonymous callbacks are
    /// still addressable by position.
    Auto(usize),
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handle::Named(name) => write!(f, ":{name}"),
            Handle::Auto(index) => write!(f, "#{index}"),
        }
    }
}

type ExternalFn<C> = Arc<dyn Fn(&[EventArg<'_, C>]) + Send + Sync>;
type InternalFn<C> = Arc<dyn Fn(&mut C) + Send + Sync>;
type MethodFn<C> = Arc<dyn Fn(&mut C, &[Value]) + Send + Sync>;

/// The three execution styles a callback can take.
pub(crate) enum CallbackBody<C> {
    /// Runs in the scope where it was defined, receiving the event's
    /// argument list adapted to the declared arity.
    External { arity: Arity, run: ExternalFn<C> },
    /// Runs against the event source itself. The signature admits no event
    /// arguments, which is the zero-argument contract.
    Internal { run: InternalFn<C> },
    /// The bound-method form: runs against the event source with the raw
    /// payload arguments.
    Method { run: MethodFn<C> },
}

impl<C> Clone for CallbackBody<C> {
    fn clone(&self) -> Self {
        match self {
            Self::External { arity, run } => Self::External {
                arity: *arity,
                run: Arc::clone(run),
            },
            Self::Internal { run } => Self::Internal {
                run: Arc::clone(run),
            },
            Self::Method { run } => Self::Method {
                run: Arc::clone(run),
            },
        }
    }
}

/// One registered callback on a hook.
pub struct Callback<C> {
    handle: Handle,
    index: usize,
    body: CallbackBody<C>,
}

impl<C> Callback<C> {
    /// The identity key used for dedup.
    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    /// The insertion sequence number used for ordering.
    pub fn index(&self) -> usize {
        self.index
    }

    pub(crate) fn call(
        &self,
        ctx: &mut C,
        name: &str,
        arguments: &[Value],
    ) -> Result<(), HookError> {
        match &self.body {
            CallbackBody::External { arity, run } => {
                let event = Event::new(&*ctx, name, arguments);
                let args = event.to_args(*arity)?;
                run(&args);
                Ok(())
            }
            CallbackBody::Internal { run } => {
                run(ctx);
                Ok(())
            }
            CallbackBody::Method { run } => {
                run(ctx, arguments);
                Ok(())
            }
        }
    }
}

impl<C> Clone for Callback<C> {
    fn clone(&self) -> Self {
        Self {
            handle: self.handle.clone(),
            index: self.index,
            body: self.body.clone(),
        }
    }
}

impl<C> fmt::Debug for Callback<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.body {
            CallbackBody::External { .. } => "external",
            CallbackBody::Internal { .. } => "internal",
            CallbackBody::Method { .. } => "method",
        };
        f.debug_struct("Callback")
            .field("handle", &self.handle)
            .field("index", &self.index)
            .field("kind", &kind)
            .finish()
    }
}

/// An ordered, handle-deduplicated collection of callbacks for one hook.
///
/// Storage is by insertion index; handles are identity only. Inserting a
/// callback under a handle that is already present is a no-op, so the same
/// handle never produces a duplicate run.
pub struct CallbackSet<C> {
    callbacks: Vec<Callback<C>>,
}

impl<C> CallbackSet<C> {
    pub fn new() -> Self {
        Self {
            callbacks: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    /// The index the next inserted callback will receive.
    pub fn next_index(&self) -> usize {
        self.callbacks
            .iter()
            .map(|cb| cb.index + 1)
            .max()
            .unwrap_or(0)
    }

    /// Fetch a callback by insertion index.
    pub fn get_by_index(&self, index: usize) -> Option<&Callback<C>> {
        self.callbacks.iter().find(|cb| cb.index == index)
    }

    /// Fetch a callback by handle.
    pub fn get_by_handle(&self, handle: &Handle) -> Option<&Callback<C>> {
        self.callbacks.iter().find(|cb| &cb.handle == handle)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Callback<C>> {
        self.callbacks.iter()
    }

    pub(crate) fn insert(&mut self, handle: Option<&'static str>, body: CallbackBody<C>) -> Handle {
        let index = self.next_index();
        let handle = match handle {
            Some(name) => Handle::Named(name),
            None => Handle::Auto(index),
        };
        if self.get_by_handle(&handle).is_none() {
            self.callbacks.push(Callback {
                handle: handle.clone(),
                index,
                body,
            });
        }
        handle
    }

    pub(crate) fn execute(
        &self,
        ctx: &mut C,
        name: &str,
        arguments: &[Value],
    ) -> Result<(), HookError> {
        for callback in &self.callbacks {
            callback.call(ctx, name, arguments)?;
        }
        Ok(())
    }
}

impl<C> Clone for CallbackSet<C> {
    fn clone(&self) -> Self {
        Self {
            callbacks: self.callbacks.clone(),
        }
    }
}

impl<C> Default for CallbackSet<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for CallbackSet<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.callbacks.iter()).finish()
    }
}
