use std::fmt;
use std::sync::{Arc, Weak};

use tracing::warn;

use crate::callback::Callback;
use crate::registry::{Inner, Registry};

/// What one registration call added: a callback under a set of names.
struct Registration<P> {
    names: Vec<String>,
    callback: Callback<P>,
}

/// Undo token returned by every registration.
///
/// [`unsubscribe`](Subscription::unsubscribe) removes the callbacks this
/// subscription registered from the names they were registered under.
/// [`on`](Subscription::on) and [`once`](Subscription::once) register more
/// listeners right away and return a new subscription that undoes the
/// earlier registrations and the new one together:
///
/// ```
/// use event_registry::{Callback, Registry};
///
/// let bus: Registry<u8> = Registry::new();
/// let noop = Callback::new(|_: &u8| {});
///
/// let all = bus.on("opened", &noop).once("closed", &noop).on("moved", &noop);
/// assert_eq!(bus.events().len(), 3);
///
/// all.unsubscribe();
/// assert!(bus.events().is_empty());
/// ```
///
/// Removal matches by name and callback identity, so unsubscribing also
/// removes the same callback if it was registered under the same name
/// elsewhere. Unsubscribing twice is harmless.
///
/// A subscription does not keep its registry alive. Once the registry is
/// dropped, unsubscribing does nothing and chained registrations are
/// discarded.
pub struct Subscription<P> {
    registry: Weak<Inner<P>>,
    registrations: Vec<Arc<Registration<P>>>,
}

impl<P> Subscription<P> {
    pub(crate) fn new(registry: &Registry<P>, names: Vec<String>, callback: Callback<P>) -> Self {
        Self {
            registry: Arc::downgrade(registry.inner()),
            registrations: vec![Arc::new(Registration { names, callback })],
        }
    }

    /// Remove every listener registered through this subscription.
    ///
    /// Earlier links of a chain are undone before later ones.
    pub fn unsubscribe(&self) {
        let Some(registry) = self.registry() else {
            return;
        };
        for registration in &self.registrations {
            registry.remove_callback(&registration.names, &registration.callback);
        }
    }

    /// Register `callback` under `names` and return a subscription covering
    /// this one's registrations plus the new one.
    pub fn on(&self, names: &str, callback: &Callback<P>) -> Subscription<P> {
        self.chain(names, callback, false)
    }

    /// Like [`on`](Subscription::on), with one-shot listeners.
    pub fn once(&self, names: &str, callback: &Callback<P>) -> Subscription<P> {
        self.chain(names, callback, true)
    }

    fn chain(&self, names: &str, callback: &Callback<P>, once: bool) -> Subscription<P> {
        let mut registrations = self.registrations.clone();
        match self.registry() {
            Some(registry) => {
                let next = if once {
                    registry.once(names, callback)
                } else {
                    registry.on(names, callback)
                };
                registrations.extend(next.registrations);
            }
            None => {
                warn!(events = %names, "Registry dropped, chained registration ignored");
            }
        }
        Subscription {
            registry: self.registry.clone(),
            registrations,
        }
    }

    /// Event names this subscription cleans up, in registration order.
    /// A name appears once per link that registered it.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.registrations
            .iter()
            .flat_map(|registration| registration.names.iter().map(String::as_str))
    }

    /// Whether the registry this subscription belongs to still exists.
    pub fn is_attached(&self) -> bool {
        self.registry.strong_count() > 0
    }

    fn registry(&self) -> Option<Registry<P>> {
        self.registry.upgrade().map(Registry::from_inner)
    }
}

impl<P> Clone for Subscription<P> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            registrations: self.registrations.clone(),
        }
    }
}

impl<P> fmt::Debug for Subscription<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("names", &self.names().collect::<Vec<_>>())
            .field("attached", &self.is_attached())
            .finish()
    }
}
