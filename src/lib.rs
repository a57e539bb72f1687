//! In-process, synchronous publish/subscribe registry.
//!
//! - [`Registry`] maps event names to ordered listeners and dispatches
//!   payloads to them, including one-shot listeners and a wildcard name
//!   that sees every event.
//! - [`Subscription`] is the undo token every registration returns; it can
//!   chain further registrations and remove them all at once.
//! - [`Callback`] gives listener closures an identity so they can be
//!   unregistered by reference.
//!
//! Event-name arguments are separator-delimited lists (`"saved, deleted"`).
//!
//! ```
//! use event_registry::{Callback, Registry};
//! use serde_json::{json, Value};
//! use std::sync::{Arc, Mutex};
//!
//! let bus: Registry = Registry::new();
//! let log = Arc::new(Mutex::new(Vec::new()));
//!
//! let sink = Arc::clone(&log);
//! let audit = Callback::new(move |payload: &Value| sink.lock().unwrap().push(payload.clone()));
//!
//! bus.once("*", &audit);
//! bus.emit("saved", &json!({ "id": 7 }));
//! bus.emit("saved", &json!({ "id": 8 }));
//!
//! assert_eq!(*log.lock().unwrap(), vec![json!({ "id": 7 })]);
//! ```

mod callback;
mod error;
mod events;
mod names;
mod options;
mod registry;
mod subscription;

pub use callback::{Callback, ListenerFn, ListenerRecord};
pub use error::OptionsError;
pub use events::{EventSummary, Events, RegistrySnapshot};
pub use options::{RegistryOptions, DEFAULT_SEPARATOR, DEFAULT_WILDCARD};
pub use registry::Registry;
pub use subscription::Subscription;
