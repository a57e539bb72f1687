//! Introspection of a registry's event map.
//!
//! [`Events`] is a live, read-only view of the map and holds the registry's
//! lock for as long as it exists. [`RegistrySnapshot`] is an owned summary
//! that can be kept around, compared, or serialized into logs.

use std::collections::BTreeMap;
use std::sync::MutexGuard;

use serde::{Deserialize, Serialize};

use crate::callback::ListenerRecord;
use crate::registry::{lock, EventMap};

/// Live view of the registered event names and their listeners.
///
/// Returned by [`Registry::events`](crate::Registry::events). While a view is
/// alive, every call that registers, removes, or dispatches on the same
/// registry blocks, so drop it before calling back into the registry.
#[must_use = "the view holds the registry lock until dropped"]
pub struct Events<'a, P> {
    map: MutexGuard<'a, EventMap<P>>,
}

impl<'a, P> Events<'a, P> {
    pub(crate) fn new(map: MutexGuard<'a, EventMap<P>>) -> Self {
        Self { map }
    }

    /// Number of event names with at least one listener.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    /// Registered event names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.map.keys().map(String::as_str)
    }

    /// The listeners registered under `name`, in dispatch order.
    pub fn get(&self, name: &str) -> Option<Vec<ListenerRecord<P>>> {
        self.map.get(name).map(|listeners| lock(listeners).clone())
    }

    pub fn listener_count(&self, name: &str) -> usize {
        self.map
            .get(name)
            .map_or(0, |listeners| lock(listeners).len())
    }
}

/// Listener counts for a single event name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSummary {
    pub listeners: usize,
    /// How many of `listeners` are one-shot.
    pub once: usize,
}

/// Owned, name-sorted summary of a registry at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub events: BTreeMap<String, EventSummary>,
}

impl RegistrySnapshot {
    pub(crate) fn capture<P>(map: &EventMap<P>) -> Self {
        let events = map
            .iter()
            .map(|(name, listeners)| {
                let listeners = lock(listeners);
                let summary = EventSummary {
                    listeners: listeners.len(),
                    once: listeners.iter().filter(|record| record.once).count(),
                };
                (name.clone(), summary)
            })
            .collect();
        Self { events }
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&EventSummary> {
        self.events.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.events.keys().map(String::as_str)
    }
}
