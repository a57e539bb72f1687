use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;
use tracing::{debug, trace};

use crate::callback::{Callback, ListenerRecord};
use crate::error::OptionsError;
use crate::events::{Events, RegistrySnapshot};
use crate::names::{dispatch_names, registration_names};
use crate::options::RegistryOptions;
use crate::subscription::Subscription;

/// Listeners of one event name, in registration order.
pub(crate) type Listeners<P> = Arc<Mutex<Vec<ListenerRecord<P>>>>;

pub(crate) type EventMap<P> = HashMap<String, Listeners<P>>;

/// Callbacks never run under a registry lock, so a poisoned lock only means a
/// panic unwound past a guard elsewhere; the data is still consistent.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) struct Inner<P> {
    options: RegistryOptions,
    events: Mutex<EventMap<P>>,
}

/// In-process, synchronous publish/subscribe registry.
///
/// Listeners are registered under one or more event names and invoked, in
/// registration order, by [`emit`](Registry::emit). Listeners registered
/// under the wildcard name (`"*"` by default) run after the exact-name
/// listeners on every dispatch.
///
/// Event-name arguments are lists: `"created, updated"` applies to both
/// `created` and `updated`. Registration trims each name; `emit` and `off`
/// use names verbatim unless [`RegistryOptions::trim_dispatch_names`] is set.
///
/// Cloning a `Registry` creates another handle to the same listeners.
/// Callbacks may call back into the registry (register, remove, emit) while
/// being dispatched; no lock is held while a callback runs.
///
/// ## Example
///
/// ```
/// use event_registry::{Callback, Registry};
/// use std::sync::{Arc, Mutex};
///
/// let bus: Registry<String> = Registry::new();
/// let seen = Arc::new(Mutex::new(Vec::new()));
///
/// let sink = Arc::clone(&seen);
/// let greet = Callback::new(move |name: &String| sink.lock().unwrap().push(name.clone()));
///
/// let subscription = bus.on("joined, renamed", &greet);
/// bus.emit("joined", &"ada".to_string());
/// subscription.unsubscribe();
/// bus.emit("renamed", &"grace".to_string());
///
/// assert_eq!(*seen.lock().unwrap(), vec!["ada"]);
/// assert!(bus.events().is_empty());
/// ```
pub struct Registry<P = Value> {
    inner: Arc<Inner<P>>,
}

impl<P> Registry<P> {
    /// Create an empty registry with default options.
    pub fn new() -> Self {
        Self::from_valid_options(RegistryOptions::default())
    }

    /// Create an empty registry with custom options.
    pub fn with_options(options: RegistryOptions) -> Result<Self, OptionsError> {
        options.validate()?;
        Ok(Self::from_valid_options(options))
    }

    fn from_valid_options(options: RegistryOptions) -> Self {
        Self {
            inner: Arc::new(Inner {
                options,
                events: Mutex::new(HashMap::new()),
            }),
        }
    }

    pub(crate) fn from_inner(inner: Arc<Inner<P>>) -> Self {
        Self { inner }
    }

    pub(crate) fn inner(&self) -> &Arc<Inner<P>> {
        &self.inner
    }

    pub fn options(&self) -> &RegistryOptions {
        &self.inner.options
    }

    /// Register `callback` under every name in `names`.
    ///
    /// The returned [`Subscription`] removes `callback` from all of those
    /// names when invoked. An empty list registers nothing but still returns
    /// a usable subscription.
    pub fn on(&self, names: &str, callback: &Callback<P>) -> Subscription<P> {
        self.register(names, callback, false)
    }

    /// Register `callback` to run at most once under each name in `names`.
    ///
    /// Each name gets its own one-shot record, so `once("a, b", cb)` can fire
    /// once for `a` and once for `b`.
    pub fn once(&self, names: &str, callback: &Callback<P>) -> Subscription<P> {
        let names = registration_names(names, self.inner.options.separator);
        for name in &names {
            self.register(name, callback, true);
        }
        Subscription::new(self, names, callback.clone())
    }

    /// Register `callback` under every name in `names`, optionally as one-shot.
    pub fn register(&self, names: &str, callback: &Callback<P>, once: bool) -> Subscription<P> {
        let names = registration_names(names, self.inner.options.separator);
        {
            let mut events = lock(&self.inner.events);
            for name in &names {
                let listeners = events.entry(name.clone()).or_default();
                let mut listeners = lock(listeners);
                listeners.push(ListenerRecord::new(callback.clone(), once));
                trace!(event = %name, once, listeners = listeners.len(), "Registered listener");
            }
        }
        Subscription::new(self, names, callback.clone())
    }

    /// Dispatch `payload` to the listeners of every name in `names`.
    ///
    /// For each name, in list order, the exact-name listeners run first and
    /// the wildcard listeners second. A one-shot listener is removed right
    /// before it is invoked. A panicking callback unwinds out of `emit` and
    /// skips every listener after it; removals already made stay made.
    pub fn emit(&self, names: &str, payload: &P) {
        let options = &self.inner.options;
        for name in dispatch_names(names, options.separator, options.trim_dispatch_names) {
            // Both sequences are looked up before either pass runs.
            let exact = self.listeners(name);
            let wild = self.listeners(&options.wildcard);
            trace!(
                event = %name,
                listeners = exact.as_ref().map_or(0, |l| lock(l).len()),
                wildcard = wild.as_ref().map_or(0, |l| lock(l).len()),
                "Dispatching event"
            );
            if let Some(exact) = exact {
                self.dispatch(name, &exact, payload);
            }
            if let Some(wild) = wild {
                self.dispatch(&options.wildcard, &wild, payload);
            }
        }
    }

    /// One pass over `listeners`, visiting at most the records present when
    /// the pass starts.
    fn dispatch(&self, name: &str, listeners: &Listeners<P>, payload: &P) {
        let mut len = lock(listeners).len();
        let mut index = 0;
        while index < len {
            let (callback, emptied) = {
                let mut records = lock(listeners);
                let Some(record) = records.get(index) else {
                    // Shrunk by a callback earlier in this pass.
                    index += 1;
                    continue;
                };
                if record.once {
                    let record = records.remove(index);
                    len -= 1;
                    (record.callback, records.is_empty())
                } else {
                    index += 1;
                    (record.callback.clone(), false)
                }
            };
            if emptied {
                self.remove_if_empty(name, listeners);
            }
            callback.call(payload);
        }
    }

    /// Remove listeners.
    ///
    /// With an empty `names`, every listener of every event is removed,
    /// whatever `callback` is. Otherwise, for each name: without a callback
    /// the name is dropped entirely; with one, every record holding that
    /// callback is removed. Removing something that is not registered is a
    /// no-op.
    ///
    /// Dropping a name also empties its listener list, so a dispatch already
    /// running over that name stops there instead of finishing with the
    /// detached list.
    pub fn off(&self, names: &str, callback: Option<&Callback<P>>) {
        if names.is_empty() {
            self.clear();
            return;
        }
        let options = &self.inner.options;
        let mut events = lock(&self.inner.events);
        for name in dispatch_names(names, options.separator, options.trim_dispatch_names) {
            remove_from(&mut events, name, callback);
        }
    }

    /// Remove every listener of every event.
    ///
    /// Like [`off`](Registry::off), this also stops any pass in progress,
    /// including a wildcard pass that has not started yet.
    pub fn clear(&self) {
        let drained: Vec<Listeners<P>> = lock(&self.inner.events).drain().map(|(_, l)| l).collect();
        debug!(events = drained.len(), "Cleared registry");
        for listeners in drained {
            lock(&listeners).clear();
        }
    }

    /// Remove `callback` from each of `names`, taken as already-split names.
    pub(crate) fn remove_callback(&self, names: &[String], callback: &Callback<P>) {
        let mut events = lock(&self.inner.events);
        for name in names {
            remove_from(&mut events, name, Some(callback));
        }
    }

    /// Live, read-only view of the event map.
    ///
    /// The view holds the registry lock: calling `on`, `once`, `off` or
    /// `emit` on this registry from the same thread while it is alive
    /// deadlocks. Read from it in one expression or drop it explicitly;
    /// use [`snapshot`](Registry::snapshot) to keep a copy.
    #[must_use = "the view holds the registry lock until dropped"]
    pub fn events(&self) -> Events<'_, P> {
        Events::new(lock(&self.inner.events))
    }

    /// Owned summary of the registered events and their listener counts.
    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot::capture(&lock(&self.inner.events))
    }

    /// Number of listeners registered under exactly `name`.
    pub fn listener_count(&self, name: &str) -> usize {
        self.listeners(name).map_or(0, |listeners| lock(&listeners).len())
    }

    pub fn has_listeners(&self, name: &str) -> bool {
        self.listener_count(name) > 0
    }

    fn listeners(&self, name: &str) -> Option<Listeners<P>> {
        lock(&self.inner.events).get(name).cloned()
    }

    /// Drop `name` if it still maps to `listeners` and nothing was added since
    /// it was emptied.
    fn remove_if_empty(&self, name: &str, listeners: &Listeners<P>) {
        let mut events = lock(&self.inner.events);
        let current = events
            .get(name)
            .is_some_and(|l| Arc::ptr_eq(l, listeners) && lock(l).is_empty());
        if current {
            events.remove(name);
            debug!(event = %name, "Last listener consumed, removed event");
        }
    }
}

/// Remove `callback` (or everything, when `None`) from `name`, dropping the
/// name once it has no listeners left.
fn remove_from<P>(events: &mut EventMap<P>, name: &str, callback: Option<&Callback<P>>) {
    let Some(listeners) = events.get(name) else {
        return;
    };
    let emptied = {
        let mut records = lock(listeners);
        match callback {
            Some(callback) => {
                let before = records.len();
                records.retain(|record| !record.callback.same_as(callback));
                trace!(event = %name, removed = before - records.len(), "Removed listener");
            }
            None => {
                trace!(event = %name, removed = records.len(), "Removed all listeners");
                records.clear();
            }
        }
        records.is_empty()
    };
    if emptied {
        events.remove(name);
        debug!(event = %name, "Removed event");
    }
}

impl<P> Default for Registry<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> Clone for Registry<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P> std::fmt::Debug for Registry<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("options", &self.inner.options)
            .field("events", &self.snapshot().events)
            .finish()
    }
}
