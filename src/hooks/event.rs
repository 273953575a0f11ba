//! Events delivered to hook callbacks.
//!
//! An [`Event`] is an immutable record of one hook execution: the source
//! context raising it, the hook's name, and a payload argument list. Its
//! [`to_args`](Event::to_args) method adapts the full argument list to a
//! callback's declared arity, so callbacks can receive exactly the prefix
//! of provenance they need.

use serde_json::Value;

use super::error::HookError;

/// The number of arguments a callback declares it accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arity {
    /// Accepts the full argument list, whatever its length.
    Variadic,
    /// Accepts exactly this many arguments.
    Exact(usize),
}

/// One element of an adapted callback argument list.
///
/// The full list for an event is `[Source, Name, payload...]`; adaptation
/// trims from the front, so a callback may see any suffix of that list.
#[derive(Debug, PartialEq)]
pub enum EventArg<'a, C> {
    /// The context that raised the event.
    Source(&'a C),
    /// The name of the hook being executed.
    Name(&'a str),
    /// One payload argument.
    Value(&'a Value),
}

/// An event triggering hook callbacks, created fresh per execution.
#[derive(Debug)]
pub struct Event<'a, C> {
    source: &'a C,
    name: &'a str,
    arguments: &'a [Value],
}

impl<'a, C> Event<'a, C> {
    pub fn new(source: &'a C, name: &'a str, arguments: &'a [Value]) -> Self {
        Self {
            source,
            name,
            arguments,
        }
    }

    /// The context that raised this event.
    pub fn source(&self) -> &'a C {
        self.source
    }

    /// The name of the hook being executed.
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// The payload arguments.
    pub fn arguments(&self) -> &'a [Value] {
        self.arguments
    }

    /// Adapt this event to an argument list for a callback of the given
    /// arity.
    ///
    /// The full list is `[Source, Name, payload...]` of length
    /// `N = 2 + payload.len()`. A variadic callback receives it unchanged.
    /// An exact arity `a` with `payload.len() <= a <= N` receives the last
    /// `a` elements: the source is trimmed first, then the name, but the
    /// payload itself is never truncated. Any other arity fails with
    /// [`HookError::IncompatibleArity`].
    pub fn to_args(&self, arity: Arity) -> Result<Vec<EventArg<'a, C>>, HookError> {
        let min = self.arguments.len();
        let max = min + 2;
        let take = match arity {
            Arity::Variadic => max,
            Arity::Exact(a) if (min..=max).contains(&a) => a,
            Arity::Exact(a) => {
                return Err(HookError::IncompatibleArity { arity: a, min, max });
            }
        };
        let mut full = Vec::with_capacity(max);
        full.push(EventArg::Source(self.source));
        full.push(EventArg::Name(self.name));
        full.extend(self.arguments.iter().map(EventArg::Value));
        Ok(full.split_off(max - take))
    }
}
