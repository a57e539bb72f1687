use std::fmt;
use std::sync::Arc;

/// Closure type for event listeners.
pub type ListenerFn<P> = dyn Fn(&P) + Send + Sync;

/// A listener function with identity.
///
/// Rust closures cannot be compared, so listeners are wrapped in a `Callback`
/// and compared by allocation: clones of one `Callback` are the same listener,
/// two `Callback::new` calls are different listeners even for identical code.
/// Unregistering by callback removes every record holding the same
/// allocation, including duplicates registered under the same name.
///
/// ```
/// use event_registry::Callback;
///
/// let a = Callback::new(|_: &u32| {});
/// let b = Callback::new(|_: &u32| {});
/// assert_eq!(a, a.clone());
/// assert_ne!(a, b);
/// ```
pub struct Callback<P> {
    func: Arc<ListenerFn<P>>,
}

impl<P> Callback<P> {
    pub fn new(func: impl Fn(&P) + Send + Sync + 'static) -> Self {
        Self {
            func: Arc::new(func),
        }
    }

    /// Invoke the listener with `payload`.
    pub fn call(&self, payload: &P) {
        (self.func)(payload)
    }

    /// Whether `self` and `other` are the same listener.
    pub fn same_as(&self, other: &Callback<P>) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

impl<P> Clone for Callback<P> {
    fn clone(&self) -> Self {
        Self {
            func: Arc::clone(&self.func),
        }
    }
}

impl<P> PartialEq for Callback<P> {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl<P> Eq for Callback<P> {}

impl<P> fmt::Debug for Callback<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Callback")
            .field(&Arc::as_ptr(&self.func).cast::<()>())
            .finish()
    }
}

/// One registration of a callback under one event name.
pub struct ListenerRecord<P> {
    pub callback: Callback<P>,
    /// Removed right before its first invocation.
    pub once: bool,
}

impl<P> ListenerRecord<P> {
    pub fn new(callback: Callback<P>, once: bool) -> Self {
        Self { callback, once }
    }
}

impl<P> Clone for ListenerRecord<P> {
    fn clone(&self) -> Self {
        Self {
            callback: self.callback.clone(),
            once: self.once,
        }
    }
}

impl<P> fmt::Debug for ListenerRecord<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRecord")
            .field("callback", &self.callback)
            .field("once", &self.once)
            .finish()
    }
}
